// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A line item has a zero quantity.
    InvalidQuantity {
        /// The index of the offending item.
        item_index: usize,
    },
    /// A line item has an empty name.
    EmptyItemName {
        /// The index of the offending item.
        item_index: usize,
    },
    /// A monetary value could not be parsed as a decimal.
    InvalidMoney {
        /// The unparseable value.
        value: String,
    },
    /// A monetary value that must be non-negative was negative.
    NegativeMoney {
        /// The field carrying the value.
        field: String,
        /// The offending value.
        value: String,
    },
    /// A step name is not one of the four workflow steps.
    InvalidStep(String),
    /// A step index is outside 1..=4.
    InvalidStepIndex(u8),
    /// A ticket status string is not a valid status.
    InvalidStatus(String),
    /// A status transition is not permitted by the workflow lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is not allowed.
        reason: String,
    },
    /// A legacy step status string is not valid.
    InvalidLegacyStepStatus(String),
    /// Both a merchant contact and a site employee were named responsible.
    ResponsiblePartyConflict,
    /// A responsible party is required but neither case was provided.
    ResponsiblePartyMissing,
    /// A timestamp string could not be parsed.
    TimestampParse {
        /// The unparseable value.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// The wire shape of a ticket is internally inconsistent.
    MalformedTicket {
        /// Description of the inconsistency.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuantity { item_index } => {
                write!(f, "Item {item_index} has a zero quantity")
            }
            Self::EmptyItemName { item_index } => {
                write!(f, "Item {item_index} has an empty name")
            }
            Self::InvalidMoney { value } => {
                write!(f, "Invalid monetary value: '{value}'")
            }
            Self::NegativeMoney { field, value } => {
                write!(f, "Field '{field}' must not be negative, got {value}")
            }
            Self::InvalidStep(step) => write!(f, "Invalid workflow step: '{step}'"),
            Self::InvalidStepIndex(index) => {
                write!(f, "Invalid step index: {index}. Must be between 1 and 4")
            }
            Self::InvalidStatus(status) => write!(f, "Invalid ticket status: '{status}'"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidLegacyStepStatus(status) => {
                write!(f, "Invalid legacy step status: '{status}'")
            }
            Self::ResponsiblePartyConflict => {
                write!(
                    f,
                    "A ticket cannot name both a merchant contact and a site employee as responsible"
                )
            }
            Self::ResponsiblePartyMissing => {
                write!(f, "A responsible party is required but none was provided")
            }
            Self::TimestampParse { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
            Self::MalformedTicket { reason } => {
                write!(f, "Malformed ticket: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
