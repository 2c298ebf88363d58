// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow gating decisions.
//!
//! Pure, side-effect-free decision functions over a ticket snapshot. The
//! gate only ever sees workflow tickets; legacy tickets carry a flat step
//! list with no ordering constraint and never reach these functions.

use crate::error::CoreError;
use dp_ticket_domain::{TicketStep, WorkflowTicket};

/// Returns the step that follows a completed step.
///
/// `None` means completing the step completes the ticket.
#[must_use]
pub const fn next_step_after_completion(step: TicketStep) -> Option<TicketStep> {
    step.successor()
}

/// Returns the incomplete steps strictly before `target`, in order.
///
/// An empty result means `target` may be advanced to.
#[must_use]
pub fn missing_prerequisites(ticket: &WorkflowTicket, target: TicketStep) -> Vec<TicketStep> {
    TicketStep::ALL
        .into_iter()
        .filter(|step| *step < target && !ticket.is_step_completed(*step))
        .collect()
}

/// Decides whether the displayed form may move to `target`.
///
/// Revisiting the current or an earlier step is always allowed. Moving
/// forward requires every prior step to be completed.
///
/// # Arguments
///
/// * `ticket` - The latest ticket snapshot
/// * `target` - The step being navigated to
/// * `pointer` - The step the form currently displays
#[must_use]
pub fn can_navigate_to(
    ticket: &WorkflowTicket,
    target: TicketStep,
    pointer: TicketStep,
) -> bool {
    target <= pointer || missing_prerequisites(ticket, target).is_empty()
}

/// Decides whether a step's form may be edited.
///
/// Any step up to the highest reached step is editable, including
/// already-completed steps. Editing a completed step is allowed but the
/// caller must surface a non-blocking warning, since downstream steps may
/// depend on its values.
#[must_use]
pub fn is_step_editable(ticket: &WorkflowTicket, step: TicketStep) -> bool {
    step <= ticket.highest_reached_step()
}

/// Checks a navigation request, naming the missing prerequisites.
///
/// # Errors
///
/// Returns `CoreError::GatingViolation` listing the incomplete prior
/// steps if the navigation is not allowed.
pub fn check_navigation(
    ticket: &WorkflowTicket,
    target: TicketStep,
    pointer: TicketStep,
) -> Result<(), CoreError> {
    if target <= pointer {
        return Ok(());
    }
    let missing = missing_prerequisites(ticket, target);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::GatingViolation { target, missing })
    }
}

/// Checks that a step may be completed right now.
///
/// A completed ticket admits no further completions; otherwise every
/// prior step must already be complete.
///
/// # Errors
///
/// Returns `CoreError::TerminalTicket` for a completed ticket and
/// `CoreError::GatingViolation` when prerequisites are incomplete.
pub fn check_completion_allowed(
    ticket: &WorkflowTicket,
    step: TicketStep,
) -> Result<(), CoreError> {
    if ticket.status.is_terminal() {
        return Err(CoreError::TerminalTicket {
            ticket_id: ticket.id,
        });
    }
    let missing = missing_prerequisites(ticket, step);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::GatingViolation {
            target: step,
            missing,
        })
    }
}
