// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use dp_ticket_domain::{TicketId, TicketStep};

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that drives a ticket forward.
/// This could be a user session or an automated process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "user", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed on a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`CompleteStep`", "`SaveStep`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of a ticket's observable state at a point in time.
///
/// Captured as a compact string summary; the remote service holds the
/// authoritative record, so the audit trail only needs enough to
/// reconstruct what the client saw before and after each action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event recording one workflow action.
///
/// Every successful mutating engine operation must produce exactly one
/// audit event; failed operations produce none. Events are immutable once
/// created and capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before the action (before)
/// - The state after the action (after)
/// - Which ticket and, where applicable, which step was touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The actor who initiated this action.
    pub actor: Actor,
    /// The cause or reason for this action.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the action.
    pub before: StateSnapshot,
    /// The state after the action.
    pub after: StateSnapshot,
    /// The ticket this event is scoped to.
    ///
    /// `None` only for the creation action, before an id exists.
    pub ticket_id: Option<TicketId>,
    /// The workflow step touched, where the action is step-scoped.
    pub step: Option<TicketStep>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the action
    /// * `cause` - The reason for the action
    /// * `action` - The action that was performed
    /// * `before` - The state before the action
    /// * `after` - The state after the action
    /// * `ticket_id` - The ticket scope, if an id exists yet
    /// * `step` - The step scope, for step-scoped actions
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        ticket_id: Option<TicketId>,
        step: Option<TicketStep>,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
            ticket_id,
            step,
        }
    }
}
