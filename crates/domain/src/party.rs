// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The responsible party for a finalized transport.
//!
//! Either a merchant contact or a site employee signs for the transport,
//! never both. The mutual exclusion is enforced at construction time, not
//! by convention over two nullable fields.

use crate::error::DomainError;
use crate::types::{ContactId, EmployeeId, MerchantId, SiteId};
use serde::{Deserialize, Serialize};

/// The party responsible for a ticket's transport, a two-case union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsibleParty {
    /// A contact on the merchant's side accompanies the transport.
    MerchantContact(ContactId),
    /// An employee at the destination site receives the goods.
    SiteEmployee(EmployeeId),
}

impl ResponsibleParty {
    /// Builds a responsible party from the two optional selections of the
    /// transport form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResponsiblePartyConflict` if both are set and
    /// `DomainError::ResponsiblePartyMissing` if neither is.
    pub const fn from_optional(
        contact: Option<ContactId>,
        employee: Option<EmployeeId>,
    ) -> Result<Self, DomainError> {
        match (contact, employee) {
            (Some(contact_id), None) => Ok(Self::MerchantContact(contact_id)),
            (None, Some(employee_id)) => Ok(Self::SiteEmployee(employee_id)),
            (Some(_), Some(_)) => Err(DomainError::ResponsiblePartyConflict),
            (None, None) => Err(DomainError::ResponsiblePartyMissing),
        }
    }

    /// Returns the contact id if the merchant side is responsible.
    #[must_use]
    pub const fn contact_id(&self) -> Option<ContactId> {
        match self {
            Self::MerchantContact(contact_id) => Some(*contact_id),
            Self::SiteEmployee(_) => None,
        }
    }

    /// Returns the employee id if the site side is responsible.
    #[must_use]
    pub const fn employee_id(&self) -> Option<EmployeeId> {
        match self {
            Self::MerchantContact(_) => None,
            Self::SiteEmployee(employee_id) => Some(*employee_id),
        }
    }
}

/// A contact person on a merchant's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// The contact identifier.
    pub id: ContactId,
    /// The merchant this contact belongs to.
    pub merchant_id: MerchantId,
    /// The contact's display name.
    pub name: String,
    /// An optional phone number.
    pub phone: Option<String>,
}

/// An employee stationed at a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The employee identifier.
    pub id: EmployeeId,
    /// The site this employee is stationed at.
    pub site_id: SiteId,
    /// The employee's display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_contact_only_selects_merchant_side() {
        let party = ResponsibleParty::from_optional(Some(ContactId::new(7)), None).unwrap();
        assert_eq!(party, ResponsibleParty::MerchantContact(ContactId::new(7)));
        assert_eq!(party.contact_id(), Some(ContactId::new(7)));
        assert_eq!(party.employee_id(), None);
    }

    #[test]
    fn test_employee_only_selects_site_side() {
        let party = ResponsibleParty::from_optional(None, Some(EmployeeId::new(3))).unwrap();
        assert_eq!(party, ResponsibleParty::SiteEmployee(EmployeeId::new(3)));
        assert_eq!(party.employee_id(), Some(EmployeeId::new(3)));
        assert_eq!(party.contact_id(), None);
    }

    #[test]
    fn test_both_selected_is_a_conflict() {
        let result =
            ResponsibleParty::from_optional(Some(ContactId::new(7)), Some(EmployeeId::new(3)));
        assert_eq!(result, Err(DomainError::ResponsiblePartyConflict));
    }

    #[test]
    fn test_neither_selected_is_missing() {
        let result = ResponsibleParty::from_optional(None, None);
        assert_eq!(result, Err(DomainError::ResponsiblePartyMissing));
    }
}
