// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-step form payloads and required-field validation.
//!
//! Each workflow step has a form carrying the user's input for that step.
//! Validation reports every offending field in one pass as a set of
//! violations, never first-error-only, so a form can highlight all
//! problems at once.

use crate::error::CoreError;
use dp_ticket_domain::{
    ContactId, EmployeeId, EquipmentId, MerchantId, Money, SiteId, TicketStep, UserId,
    WorkflowTicket,
};
use serde::{Deserialize, Serialize};

/// One offending form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// The field path, e.g. `items[2].quantity`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldViolation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A line item as entered in the Creation step, before any cost data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// The item description.
    pub item_name: String,
    /// How many units to purchase.
    pub quantity: u32,
}

/// User input for step 1, Creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationForm {
    /// Short ticket title.
    pub title: String,
    /// Free-form description of the purchase.
    pub description: String,
    /// The equipment this purchase is for.
    pub equipment_id: Option<EquipmentId>,
    /// The user who will drive the ticket.
    pub responsible_user_id: Option<UserId>,
    /// The purchase lines.
    pub items: Vec<ItemDraft>,
}

/// User input for step 2, Purchasing.
///
/// Expected costs are positional: entry `i` prices the ticket's item `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasingForm {
    /// The selected merchant.
    pub merchant_id: Option<MerchantId>,
    /// Expected per-unit cost for each item, positionally.
    pub item_expected_costs: Vec<Option<Money>>,
    /// Optional down payment made to the merchant.
    pub down_payment: Option<Money>,
}

/// User input for step 3, Finalize Purchasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeForm {
    /// Actual per-unit cost for each item, positionally.
    pub item_actual_costs: Vec<Option<Money>>,
}

/// User input for step 4, Transporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportForm {
    /// Where the goods are picked up.
    pub from_location: String,
    /// The destination site.
    pub to_site: Option<SiteId>,
    /// What the transport cost.
    pub actual_transportation_cost: Option<Money>,
    /// Responsible merchant contact; mutually exclusive with the employee.
    pub responsible_contact: Option<ContactId>,
    /// Responsible site employee; mutually exclusive with the contact.
    pub responsible_employee: Option<EmployeeId>,
}

/// User input for one legacy flat-list step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyStepForm {
    /// A new display name, when renaming.
    pub name: Option<String>,
    /// The step's actual cost, once known.
    pub actual_cost: Option<Money>,
}

/// The form for any of the four workflow steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepForm {
    /// Step 1 input.
    Creation(CreationForm),
    /// Step 2 input.
    Purchasing(PurchasingForm),
    /// Step 3 input.
    FinalizePurchasing(FinalizeForm),
    /// Step 4 input.
    Transporting(TransportForm),
}

impl StepForm {
    /// Returns the step this form belongs to.
    #[must_use]
    pub const fn step(&self) -> TicketStep {
        match self {
            Self::Creation(_) => TicketStep::Creation,
            Self::Purchasing(_) => TicketStep::Purchasing,
            Self::FinalizePurchasing(_) => TicketStep::FinalizePurchasing,
            Self::Transporting(_) => TicketStep::Transporting,
        }
    }
}

/// Validates step 1 input.
///
/// Required: non-empty title and description, an equipment reference, a
/// responsible user, and at least one item with a name and a positive
/// quantity.
#[must_use]
pub fn validate_creation_form(form: &CreationForm) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    if form.title.trim().is_empty() {
        violations.push(FieldViolation::new("title", "must not be empty"));
    }
    if form.description.trim().is_empty() {
        violations.push(FieldViolation::new("description", "must not be empty"));
    }
    if form.equipment_id.is_none() {
        violations.push(FieldViolation::new(
            "equipment_id",
            "an equipment reference is required",
        ));
    }
    if form.responsible_user_id.is_none() {
        violations.push(FieldViolation::new(
            "responsible_user_id",
            "a responsible user is required",
        ));
    }
    if form.items.is_empty() {
        violations.push(FieldViolation::new("items", "at least one item is required"));
    }
    for (index, item) in form.items.iter().enumerate() {
        if item.item_name.trim().is_empty() {
            violations.push(FieldViolation::new(
                format!("items[{index}].item_name"),
                "must not be empty",
            ));
        }
        if item.quantity == 0 {
            violations.push(FieldViolation::new(
                format!("items[{index}].quantity"),
                "must be greater than zero",
            ));
        }
    }

    violations
}

/// Validates step 2 input against a ticket with `item_count` items.
///
/// Required: a merchant and a positive expected cost for every item. The
/// down payment, when present, must not be negative.
#[must_use]
pub fn validate_purchasing_form(form: &PurchasingForm, item_count: usize) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    if form.merchant_id.is_none() {
        violations.push(FieldViolation::new("merchant_id", "a merchant is required"));
    }
    if form.item_expected_costs.len() == item_count {
        for (index, cost) in form.item_expected_costs.iter().enumerate() {
            if !cost.is_some_and(|amount| amount > Money::zero()) {
                violations.push(FieldViolation::new(
                    format!("items[{index}].expected_cost_per_unit"),
                    "must be greater than zero",
                ));
            }
        }
    } else {
        violations.push(FieldViolation::new(
            "item_expected_costs",
            format!("must price all {item_count} items"),
        ));
    }
    if form.down_payment.is_some_and(Money::is_negative) {
        violations.push(FieldViolation::new("down_payment", "must not be negative"));
    }

    violations
}

/// Validates step 3 input against a ticket with `item_count` items.
///
/// Required: a positive actual cost for every item.
#[must_use]
pub fn validate_finalize_form(form: &FinalizeForm, item_count: usize) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    if form.item_actual_costs.len() == item_count {
        for (index, cost) in form.item_actual_costs.iter().enumerate() {
            if !cost.is_some_and(|amount| amount > Money::zero()) {
                violations.push(FieldViolation::new(
                    format!("items[{index}].actual_cost_per_unit"),
                    "must be greater than zero",
                ));
            }
        }
    } else {
        violations.push(FieldViolation::new(
            "item_actual_costs",
            format!("must price all {item_count} items"),
        ));
    }

    violations
}

/// Validates step 4 input.
///
/// Required: a non-empty pickup location, a destination site, a
/// non-negative transport cost, and exactly one responsible party.
#[must_use]
pub fn validate_transport_form(form: &TransportForm) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    if form.from_location.trim().is_empty() {
        violations.push(FieldViolation::new("from_location", "must not be empty"));
    }
    if form.to_site.is_none() {
        violations.push(FieldViolation::new(
            "to_site",
            "a destination site is required",
        ));
    }
    match form.actual_transportation_cost {
        None => violations.push(FieldViolation::new(
            "actual_transportation_cost",
            "the transportation cost is required",
        )),
        Some(cost) if cost.is_negative() => violations.push(FieldViolation::new(
            "actual_transportation_cost",
            "must not be negative",
        )),
        Some(_) => {}
    }
    match (form.responsible_contact, form.responsible_employee) {
        (Some(_), None) | (None, Some(_)) => {}
        (Some(_), Some(_)) => violations.push(FieldViolation::new(
            "responsible_party",
            "select either a merchant contact or a site employee, not both",
        )),
        (None, None) => violations.push(FieldViolation::new(
            "responsible_party",
            "a responsible party is required",
        )),
    }

    violations
}

/// Validates input for one legacy flat-list step.
#[must_use]
pub fn validate_legacy_step_form(form: &LegacyStepForm) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    if form
        .name
        .as_ref()
        .is_some_and(|name| name.trim().is_empty())
    {
        violations.push(FieldViolation::new("name", "must not be empty"));
    }
    if form.actual_cost.is_some_and(Money::is_negative) {
        violations.push(FieldViolation::new("actual_cost", "must not be negative"));
    }

    violations
}

/// Validates any step form against a ticket with `item_count` items.
#[must_use]
pub fn validate_step_form(form: &StepForm, item_count: usize) -> Vec<FieldViolation> {
    match form {
        StepForm::Creation(creation) => validate_creation_form(creation),
        StepForm::Purchasing(purchasing) => validate_purchasing_form(purchasing, item_count),
        StepForm::FinalizePurchasing(finalize) => validate_finalize_form(finalize, item_count),
        StepForm::Transporting(transport) => validate_transport_form(transport),
    }
}

/// Checks a step form, failing with the full violation set.
///
/// # Errors
///
/// Returns `CoreError::ValidationFailed` naming every offending field.
pub fn check_step_form(form: &StepForm, item_count: usize) -> Result<(), CoreError> {
    let violations = validate_step_form(form, item_count);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed {
            step: form.step(),
            violations,
        })
    }
}

/// Checks whether a ticket's stored state satisfies a step's
/// requirements.
///
/// This is the authoritative-side mirror of the form validators: it looks
/// at what has been persisted rather than what is being submitted, and is
/// what a service consults before honoring a completion request.
#[must_use]
pub fn step_requirements_met(ticket: &WorkflowTicket, step: TicketStep) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    match step {
        TicketStep::Creation => {
            if ticket.title.trim().is_empty() {
                violations.push(FieldViolation::new("title", "must not be empty"));
            }
            if ticket.description.trim().is_empty() {
                violations.push(FieldViolation::new("description", "must not be empty"));
            }
            if ticket.items.is_empty() {
                violations.push(FieldViolation::new("items", "at least one item is required"));
            }
        }
        TicketStep::Purchasing => {
            if ticket.merchant_id.is_none() {
                violations.push(FieldViolation::new("merchant_id", "a merchant is required"));
            }
            for (index, item) in ticket.items.iter().enumerate() {
                if !item
                    .expected_cost_per_unit
                    .is_some_and(|cost| cost > Money::zero())
                {
                    violations.push(FieldViolation::new(
                        format!("items[{index}].expected_cost_per_unit"),
                        "must be greater than zero",
                    ));
                }
            }
        }
        TicketStep::FinalizePurchasing => {
            for (index, item) in ticket.items.iter().enumerate() {
                if !item
                    .actual_cost_per_unit
                    .is_some_and(|cost| cost > Money::zero())
                {
                    violations.push(FieldViolation::new(
                        format!("items[{index}].actual_cost_per_unit"),
                        "must be greater than zero",
                    ));
                }
            }
        }
        TicketStep::Transporting => {
            if !ticket
                .transport_from
                .as_ref()
                .is_some_and(|from| !from.trim().is_empty())
            {
                violations.push(FieldViolation::new(
                    "from_location",
                    "must not be empty",
                ));
            }
            if ticket.transport_to_site.is_none() {
                violations.push(FieldViolation::new(
                    "to_site",
                    "a destination site is required",
                ));
            }
            if ticket.actual_transportation_cost.is_none() {
                violations.push(FieldViolation::new(
                    "actual_transportation_cost",
                    "the transportation cost is required",
                ));
            }
            if ticket.responsible_party.is_none() {
                violations.push(FieldViolation::new(
                    "responsible_party",
                    "a responsible party is required",
                ));
            }
        }
    }

    violations
}
