// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The persisted ticket record.
//!
//! Tickets come in two shapes: modern tickets move through the four gated
//! workflow phases, while legacy tickets (created before the phased
//! workflow existed) carry a flat step list with independent status. The
//! two are a tagged variant so gating logic can only ever be handed a
//! workflow ticket.

use crate::error::DomainError;
use crate::item::LineItem;
use crate::money::Money;
use crate::party::ResponsibleParty;
use crate::status::TicketStatus;
use crate::step::TicketStep;
use crate::types::{EquipmentId, MerchantId, SiteId, TicketId, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Completion tracking for one workflow step.
///
/// The remote service is authoritative for all three fields. `completed`
/// is monotonic; the timestamps are written once and never overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepProgress {
    /// Whether the step has been completed.
    pub completed: bool,
    /// When work on the step began.
    pub started_at: Option<OffsetDateTime>,
    /// When the step was completed.
    pub completed_at: Option<OffsetDateTime>,
}

impl StepProgress {
    /// Creates an empty progress record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completed: false,
            started_at: None,
            completed_at: None,
        }
    }
}

/// Per-step progress for all four workflow steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepProgressTable([StepProgress; 4]);

impl StepProgressTable {
    /// Creates a table with no progress recorded.
    #[must_use]
    pub const fn new() -> Self {
        Self([StepProgress::new(); 4])
    }

    /// Returns the progress record for a step.
    #[must_use]
    pub const fn get(&self, step: TicketStep) -> &StepProgress {
        &self.0[step.index() as usize - 1]
    }

    /// Returns a mutable progress record for a step.
    pub const fn get_mut(&mut self, step: TicketStep) -> &mut StepProgress {
        &mut self.0[step.index() as usize - 1]
    }

    /// Returns true if the step has been completed.
    #[must_use]
    pub const fn is_completed(&self, step: TicketStep) -> bool {
        self.get(step).completed
    }

    /// Returns the highest step that has been started, if any.
    #[must_use]
    pub fn highest_started(&self) -> Option<TicketStep> {
        TicketStep::ALL
            .into_iter()
            .rev()
            .find(|step| self.get(*step).started_at.is_some() || self.get(*step).completed)
    }
}

/// A modern ticket moving through the four gated workflow phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTicket {
    /// Server-assigned identifier.
    pub id: TicketId,
    /// Short ticket title.
    pub title: String,
    /// Free-form description of the purchase.
    pub description: String,
    /// The equipment this purchase is for.
    pub equipment_id: EquipmentId,
    /// The user currently responsible for driving the ticket.
    pub responsible_user_id: UserId,
    /// Overall status. Mirrors `current_step` until completion.
    pub status: TicketStatus,
    /// The step the ticket has advanced to.
    pub current_step: TicketStep,
    /// Per-step completion flags and timestamps.
    pub progress: StepProgressTable,
    /// Ordered purchase lines.
    pub items: Vec<LineItem>,
    /// The merchant selected in the Purchasing step.
    pub merchant_id: Option<MerchantId>,
    /// The down payment made in the Purchasing step. Never negative.
    pub down_payment: Option<Money>,
    /// Pickup location entered in the Transporting step.
    pub transport_from: Option<String>,
    /// Destination site selected in the Transporting step.
    pub transport_to_site: Option<SiteId>,
    /// What the transport actually cost.
    pub actual_transportation_cost: Option<Money>,
    /// Who signed for the transport. Set when transport is finalized.
    pub responsible_party: Option<ResponsibleParty>,
    /// When the ticket was created.
    pub created_at: OffsetDateTime,
}

impl WorkflowTicket {
    /// Returns the progress record for a step.
    #[must_use]
    pub const fn progress(&self, step: TicketStep) -> &StepProgress {
        self.progress.get(step)
    }

    /// Returns true if the step has been completed.
    #[must_use]
    pub const fn is_step_completed(&self, step: TicketStep) -> bool {
        self.progress.is_completed(step)
    }

    /// Returns the highest step the ticket has reached.
    ///
    /// For a completed ticket every step has been reached.
    #[must_use]
    pub fn highest_reached_step(&self) -> TicketStep {
        if self.status.is_terminal() {
            TicketStep::Transporting
        } else {
            self.progress
                .highest_started()
                .map_or(self.current_step, |started| {
                    started.max(self.current_step)
                })
        }
    }
}

/// Status of one step in a legacy ticket's flat list.
///
/// Legacy steps have no ordering constraint; each carries its own status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyStepStatus {
    /// Not yet worked on.
    Pending,
    /// Work has begun.
    InProgress,
    /// Finished. Only completed steps have a known actual cost.
    Completed,
}

impl LegacyStepStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns true if the step is finished.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidLegacyStepStatus(s.to_string())),
        }
    }
}

impl FromStr for LegacyStepStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// One entry in a legacy ticket's flat step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyStep {
    /// The step's display name.
    pub name: String,
    /// The step's independent status.
    pub status: LegacyStepStatus,
    /// What the step actually cost, once known.
    pub actual_cost: Option<Money>,
    /// When the step was completed.
    pub completed_at: Option<OffsetDateTime>,
}

impl LegacyStep {
    /// Creates a pending legacy step.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            status: LegacyStepStatus::Pending,
            actual_cost: None,
            completed_at: None,
        }
    }
}

/// A ticket created before the phased workflow existed.
///
/// Legacy tickets carry a flat step list; any step may be edited or
/// completed independently of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTicket {
    /// Server-assigned identifier.
    pub id: TicketId,
    /// Short ticket title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// The user currently responsible, when recorded.
    pub responsible_user_id: Option<UserId>,
    /// The flat step list.
    pub steps: Vec<LegacyStep>,
}

/// A procurement ticket in either of its two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ticket {
    /// A pre-workflow ticket with a flat step list.
    Legacy(LegacyTicket),
    /// A ticket moving through the four gated phases.
    Workflow(WorkflowTicket),
}

impl Ticket {
    /// Returns the ticket's identifier.
    #[must_use]
    pub const fn id(&self) -> TicketId {
        match self {
            Self::Legacy(ticket) => ticket.id,
            Self::Workflow(ticket) => ticket.id,
        }
    }

    /// Returns the ticket's title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Legacy(ticket) => &ticket.title,
            Self::Workflow(ticket) => &ticket.title,
        }
    }

    /// Returns true for a pre-workflow ticket.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Returns the workflow shape, if this is a modern ticket.
    #[must_use]
    pub const fn as_workflow(&self) -> Option<&WorkflowTicket> {
        match self {
            Self::Workflow(ticket) => Some(ticket),
            Self::Legacy(_) => None,
        }
    }

    /// Returns the legacy shape, if this is a pre-workflow ticket.
    #[must_use]
    pub const fn as_legacy(&self) -> Option<&LegacyTicket> {
        match self {
            Self::Legacy(ticket) => Some(ticket),
            Self::Workflow(_) => None,
        }
    }
}
