// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket status tracking and transition logic.
//!
//! For a non-legacy ticket the status mirrors the current step until the
//! final step completes. Status transitions follow the workflow order
//! strictly; the system never skips a phase or reopens a completed ticket.

use crate::error::DomainError;
use crate::step::TicketStep;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The overall status of a direct purchase ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// The ticket is in the Creation phase.
    Creation,
    /// The ticket is in the Purchasing phase.
    Purchasing,
    /// The ticket is in the Finalize Purchasing phase.
    FinalizePurchasing,
    /// The ticket is in the Transporting phase.
    Transporting,
    /// All four steps are complete. Terminal.
    Completed,
}

impl TicketStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Purchasing => "purchasing",
            Self::FinalizePurchasing => "finalize_purchasing",
            Self::Transporting => "transporting",
            Self::Completed => "completed",
        }
    }

    /// Returns the status mirroring an active step.
    #[must_use]
    pub const fn from_step(step: TicketStep) -> Self {
        match step {
            TicketStep::Creation => Self::Creation,
            TicketStep::Purchasing => Self::Purchasing,
            TicketStep::FinalizePurchasing => Self::FinalizePurchasing,
            TicketStep::Transporting => Self::Transporting,
        }
    }

    /// Returns the step this status mirrors, or `None` for a completed ticket.
    #[must_use]
    pub const fn active_step(self) -> Option<TicketStep> {
        match self {
            Self::Creation => Some(TicketStep::Creation),
            Self::Purchasing => Some(TicketStep::Purchasing),
            Self::FinalizePurchasing => Some(TicketStep::FinalizePurchasing),
            Self::Transporting => Some(TicketStep::Transporting),
            Self::Completed => None,
        }
    }

    /// Returns true if this status is terminal (no outgoing transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Validates that a transition from this status to another is permitted.
    ///
    /// The only permitted transition is to the status of the next step in
    /// workflow order, with `Transporting` transitioning to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let expected = self
            .active_step()
            .and_then(TicketStep::successor)
            .map_or(Self::Completed, Self::from_step);

        if new_status == expected {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "phases complete strictly in order".to_string(),
            })
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "creation" => Ok(Self::Creation),
            "purchasing" => Ok(Self::Purchasing),
            "finalize_purchasing" => Ok(Self::FinalizePurchasing),
            "transporting" => Ok(Self::Transporting),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
