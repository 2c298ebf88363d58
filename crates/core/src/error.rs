// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::schema::FieldViolation;
use dp_ticket_domain::{DomainError, TicketId, TicketStep};

/// Errors raised by the pure workflow core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A step's required fields did not validate.
    ValidationFailed {
        /// The step whose form failed.
        step: TicketStep,
        /// Every offending field.
        violations: Vec<FieldViolation>,
    },
    /// A step was targeted before its prerequisites completed.
    GatingViolation {
        /// The step being advanced to or completed.
        target: TicketStep,
        /// The incomplete prior steps, in order.
        missing: Vec<TicketStep>,
    },
    /// The ticket is completed; no further transitions are permitted.
    TerminalTicket {
        /// The completed ticket.
        ticket_id: TicketId,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::ValidationFailed { step, violations } => {
                let fields: Vec<&str> = violations
                    .iter()
                    .map(|violation| violation.field.as_str())
                    .collect();
                write!(
                    f,
                    "Validation failed for step '{step}': invalid fields [{}]",
                    fields.join(", ")
                )
            }
            Self::GatingViolation { target, missing } => {
                let names: Vec<&str> = missing.iter().map(TicketStep::as_str).collect();
                write!(
                    f,
                    "Cannot advance to step '{target}': incomplete prerequisites [{}]",
                    names.join(", ")
                )
            }
            Self::TerminalTicket { ticket_id } => {
                write!(f, "Ticket {ticket_id} is completed and cannot change")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
