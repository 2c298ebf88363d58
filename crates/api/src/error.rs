// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::service::ServiceError;
use dp_ticket::{CoreError, FieldViolation};
use dp_ticket_domain::{DomainError, TicketId, TicketStep};

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the contract
/// the workflow engine exposes to its callers. Every failed operation
/// carries enough detail to reconstruct which step and which fields
/// failed; nothing is surfaced as a generic failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A step's required fields did not validate. Raised locally, before
    /// any network call.
    Validation {
        /// The step whose form failed.
        step: TicketStep,
        /// Every offending field.
        violations: Vec<FieldViolation>,
    },
    /// A legacy step's form did not validate.
    LegacyValidation {
        /// The flat-list index whose form failed.
        index: usize,
        /// Every offending field.
        violations: Vec<FieldViolation>,
    },
    /// A step was targeted before its prerequisites completed.
    PrerequisitesIncomplete {
        /// The step being advanced to or completed.
        target: TicketStep,
        /// The incomplete prior steps, in order.
        missing: Vec<TicketStep>,
    },
    /// The ticket is completed; no further transitions are permitted.
    TerminalState {
        /// The completed ticket.
        ticket_id: TicketId,
    },
    /// The service rejected the request; its reason is carried verbatim.
    /// Committed state was not rolled forward.
    Conflict {
        /// The service's rejection reason.
        message: String,
    },
    /// The transport failed. The held snapshot is unchanged and the same
    /// call may safely be retried.
    Network {
        /// A description of the transport failure.
        message: String,
    },
    /// The ticket id is unknown. Terminal for this session.
    NotFound {
        /// The unknown ticket id.
        ticket_id: TicketId,
    },
    /// Another request is still in flight for this ticket.
    Busy {
        /// The operation that was rejected.
        operation: String,
    },
    /// An operation needed a ticket but none is loaded yet.
    NoTicketLoaded,
    /// An operation was invoked against the wrong ticket shape.
    WrongTicketShape {
        /// The shape the operation requires: "workflow" or "legacy".
        expected: &'static str,
    },
    /// A legacy step index is outside the flat list.
    LegacyStepOutOfRange {
        /// The requested index.
        index: usize,
        /// The flat list length.
        len: usize,
    },
    /// An internal error occurred, e.g. a malformed service response.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { step, violations } => {
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
            Self::LegacyValidation { index, violations } => {
                let fields: Vec<&str> = violations
                    .iter()
                    .map(|violation| violation.field.as_str())
                    .collect();
                write!(
                    f,
                    "Validation failed for legacy step {index}: invalid fields [{}]",
                    fields.join(", ")
                )
            }
            Self::PrerequisitesIncomplete { target, missing } => {
                let names: Vec<&str> = missing.iter().map(TicketStep::as_str).collect();
                write!(
                    f,
                    "Prerequisites incomplete for step '{target}': [{}]",
                    names.join(", ")
                )
            }
            Self::TerminalState { ticket_id } => {
                write!(f, "Ticket {ticket_id} is completed and cannot change")
            }
            Self::Conflict { message } => write!(f, "Request rejected: {message}"),
            Self::Network { message } => write!(f, "Transport failure: {message}"),
            Self::NotFound { ticket_id } => write!(f, "Ticket {ticket_id} not found"),
            Self::Busy { operation } => {
                write!(
                    f,
                    "Cannot start '{operation}': another request is still in flight"
                )
            }
            Self::NoTicketLoaded => write!(f, "No ticket is loaded in this session"),
            Self::WrongTicketShape { expected } => {
                write!(f, "This operation requires a {expected} ticket")
            }
            Self::LegacyStepOutOfRange { index, len } => {
                write!(f, "Legacy step index {index} is out of range (len {len})")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// Domain errors at this layer mean the service returned a ticket the
/// client cannot make sense of; the engine never constructs invalid
/// domain state itself.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    ApiError::Internal {
        message: format!("malformed service response: {err}"),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::ValidationFailed { step, violations } => {
            ApiError::Validation { step, violations }
        }
        CoreError::GatingViolation { target, missing } => {
            ApiError::PrerequisitesIncomplete { target, missing }
        }
        CoreError::TerminalTicket { ticket_id } => ApiError::TerminalState { ticket_id },
    }
}

/// Translates a service error into an API error.
#[must_use]
pub fn translate_service_error(err: ServiceError) -> ApiError {
    match err {
        ServiceError::NotFound { ticket_id } => ApiError::NotFound { ticket_id },
        ServiceError::Conflict { message } => ApiError::Conflict { message },
        ServiceError::Network { message } => ApiError::Network { message },
    }
}
