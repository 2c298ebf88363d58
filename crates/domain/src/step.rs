// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The four ordered workflow steps of a direct purchase ticket.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the four ordered phases of the direct purchase workflow.
///
/// The ordering derives from the declaration order: Creation < Purchasing
/// < `FinalizePurchasing` < Transporting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TicketStep {
    /// Step 1: title, description, equipment, and line items are captured.
    Creation,
    /// Step 2: merchant selection, expected unit costs, down payment.
    Purchasing,
    /// Step 3: actual unit costs are recorded.
    FinalizePurchasing,
    /// Step 4: transport details and the responsible party.
    Transporting,
}

impl TicketStep {
    /// All steps in workflow order.
    pub const ALL: [Self; 4] = [
        Self::Creation,
        Self::Purchasing,
        Self::FinalizePurchasing,
        Self::Transporting,
    ];

    /// Returns the string representation of the step.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Purchasing => "purchasing",
            Self::FinalizePurchasing => "finalize_purchasing",
            Self::Transporting => "transporting",
        }
    }

    /// Returns the 1-based step number (1..=4).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Creation => 1,
            Self::Purchasing => 2,
            Self::FinalizePurchasing => 3,
            Self::Transporting => 4,
        }
    }

    /// Resolves a 1-based step number to a step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStepIndex` if the index is outside 1..=4.
    pub const fn from_index(index: u8) -> Result<Self, DomainError> {
        match index {
            1 => Ok(Self::Creation),
            2 => Ok(Self::Purchasing),
            3 => Ok(Self::FinalizePurchasing),
            4 => Ok(Self::Transporting),
            _ => Err(DomainError::InvalidStepIndex(index)),
        }
    }

    /// Returns the step that follows this one after completion.
    ///
    /// `None` means completing this step completes the ticket.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Creation => Some(Self::Purchasing),
            Self::Purchasing => Some(Self::FinalizePurchasing),
            Self::FinalizePurchasing => Some(Self::Transporting),
            Self::Transporting => None,
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "creation" => Ok(Self::Creation),
            "purchasing" => Ok(Self::Purchasing),
            "finalize_purchasing" => Ok(Self::FinalizePurchasing),
            "transporting" => Ok(Self::Transporting),
            _ => Err(DomainError::InvalidStep(s.to_string())),
        }
    }
}

impl FromStr for TicketStep {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for TicketStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_string_round_trip() {
        for step in TicketStep::ALL {
            let s = step.as_str();
            match TicketStep::parse_str(s) {
                Ok(parsed) => assert_eq!(step, parsed),
                Err(e) => panic!("Failed to parse step string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_step_string() {
        let result = TicketStep::parse_str("shipping");
        assert!(result.is_err());
    }

    #[test]
    fn test_index_round_trip() {
        for step in TicketStep::ALL {
            assert_eq!(TicketStep::from_index(step.index()), Ok(step));
        }
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(TicketStep::from_index(0).is_err());
        assert!(TicketStep::from_index(5).is_err());
    }

    #[test]
    fn test_successor_chain() {
        assert_eq!(
            TicketStep::Creation.successor(),
            Some(TicketStep::Purchasing)
        );
        assert_eq!(
            TicketStep::Purchasing.successor(),
            Some(TicketStep::FinalizePurchasing)
        );
        assert_eq!(
            TicketStep::FinalizePurchasing.successor(),
            Some(TicketStep::Transporting)
        );
        assert_eq!(TicketStep::Transporting.successor(), None);
    }

    #[test]
    fn test_steps_are_ordered() {
        assert!(TicketStep::Creation < TicketStep::Purchasing);
        assert!(TicketStep::Purchasing < TicketStep::FinalizePurchasing);
        assert!(TicketStep::FinalizePurchasing < TicketStep::Transporting);
    }
}
