// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wire-shape normalization.
//!
//! The remote ticket service serves two historical shapes through one
//! endpoint: legacy tickets carry a flat `steps` array, modern tickets
//! carry phase fields. `RawTicket` covers the union; `normalize` resolves
//! it into the tagged [`Ticket`] variant and rejects inconsistent hybrids.
//! Monetary values travel as decimal strings and timestamps as RFC 3339.

use crate::error::DomainError;
use crate::item::LineItem;
use crate::money::Money;
use crate::party::ResponsibleParty;
use crate::status::TicketStatus;
use crate::step::TicketStep;
use crate::ticket::{
    LegacyStep, LegacyTicket, StepProgress, StepProgressTable, Ticket, WorkflowTicket,
};
use crate::types::{ContactId, EmployeeId, EquipmentId, MerchantId, SiteId, TicketId, UserId};
use crate::validation::{validate_down_payment, validate_items, validate_transport_cost};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// One line item as served on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLineItem {
    /// The item description.
    pub item_name: String,
    /// How many units are purchased.
    pub quantity: u32,
    /// Expected per-unit cost as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_cost_per_unit: Option<String>,
    /// Actual per-unit cost as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cost_per_unit: Option<String>,
}

/// One legacy flat-list step as served on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLegacyStep {
    /// The step's display name.
    pub name: String,
    /// The step's status string.
    pub status: String,
    /// Actual cost as a decimal string, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<String>,
    /// RFC 3339 completion timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Per-step progress as served on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStepProgress {
    /// Whether the step has been completed.
    #[serde(default)]
    pub completed: bool,
    /// RFC 3339 start timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// RFC 3339 completion timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// A ticket exactly as served by the remote ticket service.
///
/// This is the union of the legacy and modern shapes; [`RawTicket::normalize`]
/// resolves which one a given payload is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTicket {
    /// Server-assigned identifier.
    pub id: i64,
    /// Marks a pre-workflow ticket.
    #[serde(default)]
    pub is_legacy: bool,
    /// Short ticket title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// The equipment reference (modern tickets).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<i64>,
    /// The responsible user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<i64>,
    /// Status string (modern tickets).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Current step string (modern tickets).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    /// Flat step list (legacy tickets).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<RawLegacyStep>>,
    /// Per-step progress, four entries in workflow order (modern tickets).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_progress: Option<Vec<RawStepProgress>>,
    /// Purchase lines.
    #[serde(default)]
    pub items: Vec<RawLineItem>,
    /// Selected merchant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<i64>,
    /// Down payment as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<String>,
    /// Transport pickup location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_from: Option<String>,
    /// Transport destination site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_to_site: Option<i64>,
    /// Actual transport cost as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_transportation_cost: Option<String>,
    /// Responsible merchant contact, mutually exclusive with the employee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_contact_id: Option<i64>,
    /// Responsible site employee, mutually exclusive with the contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_employee_id: Option<i64>,
    /// RFC 3339 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl RawTicket {
    /// Resolves the wire shape into the tagged ticket variant.
    ///
    /// A payload with the legacy flag or a flat step list becomes a
    /// [`Ticket::Legacy`]; anything else must carry complete phase data.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if a cost or timestamp fails to parse, a
    /// quantity is zero, an item name is empty, both responsible parties
    /// are set, or the phase fields are missing or inconsistent.
    pub fn normalize(self) -> Result<Ticket, DomainError> {
        if self.is_legacy || self.steps.is_some() {
            self.normalize_legacy().map(Ticket::Legacy)
        } else {
            self.normalize_workflow().map(Ticket::Workflow)
        }
    }

    fn normalize_legacy(self) -> Result<LegacyTicket, DomainError> {
        let mut steps: Vec<LegacyStep> = Vec::new();
        for raw_step in self.steps.unwrap_or_default() {
            let status = raw_step.status.parse()?;
            let actual_cost = parse_money_field(raw_step.actual_cost.as_deref(), "actual_cost")?;
            let completed_at = parse_timestamp(raw_step.completed_at.as_deref())?;
            steps.push(LegacyStep {
                name: raw_step.name,
                status,
                actual_cost,
                completed_at,
            });
        }

        Ok(LegacyTicket {
            id: TicketId::new(self.id),
            title: self.title,
            description: self.description,
            responsible_user_id: self.responsible_user_id.map(UserId::new),
            steps,
        })
    }

    fn normalize_workflow(self) -> Result<WorkflowTicket, DomainError> {
        let current_step: TicketStep = self
            .current_step
            .as_deref()
            .ok_or_else(|| DomainError::MalformedTicket {
                reason: "ticket has neither phase data nor a legacy step list".to_string(),
            })?
            .parse()?;

        let status: TicketStatus = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => TicketStatus::from_step(current_step),
        };

        // An active status must mirror the current step.
        if let Some(active) = status.active_step()
            && active != current_step
        {
            return Err(DomainError::MalformedTicket {
                reason: format!(
                    "status '{status}' does not mirror current step '{current_step}'"
                ),
            });
        }

        let progress = match self.step_progress {
            None => StepProgressTable::new(),
            Some(raw_progress) => {
                if raw_progress.len() != 4 {
                    return Err(DomainError::MalformedTicket {
                        reason: format!(
                            "step_progress must have 4 entries, got {}",
                            raw_progress.len()
                        ),
                    });
                }
                let mut table = StepProgressTable::new();
                for (step, raw_entry) in TicketStep::ALL.into_iter().zip(raw_progress) {
                    *table.get_mut(step) = StepProgress {
                        completed: raw_entry.completed,
                        started_at: parse_timestamp(raw_entry.started_at.as_deref())?,
                        completed_at: parse_timestamp(raw_entry.completed_at.as_deref())?,
                    };
                }
                table
            }
        };

        let mut items: Vec<LineItem> = Vec::with_capacity(self.items.len());
        for (index, raw_item) in self.items.into_iter().enumerate() {
            let expected = parse_money_field(
                raw_item.expected_cost_per_unit.as_deref(),
                &format!("items[{index}].expected_cost_per_unit"),
            )?;
            let actual = parse_money_field(
                raw_item.actual_cost_per_unit.as_deref(),
                &format!("items[{index}].actual_cost_per_unit"),
            )?;
            items.push(LineItem {
                item_name: raw_item.item_name,
                quantity: raw_item.quantity,
                expected_cost_per_unit: expected,
                actual_cost_per_unit: actual,
            });
        }
        validate_items(&items)?;

        let down_payment = parse_money_field(self.down_payment.as_deref(), "down_payment")?;
        validate_down_payment(down_payment)?;

        let actual_transportation_cost = parse_money_field(
            self.actual_transportation_cost.as_deref(),
            "actual_transportation_cost",
        )?;
        validate_transport_cost(actual_transportation_cost)?;

        let responsible_party = match (self.responsible_contact_id, self.responsible_employee_id) {
            (None, None) => None,
            (contact, employee) => Some(ResponsibleParty::from_optional(
                contact.map(ContactId::new),
                employee.map(EmployeeId::new),
            )?),
        };

        let equipment_id = self
            .equipment_id
            .map(EquipmentId::new)
            .ok_or_else(|| DomainError::MalformedTicket {
                reason: "workflow ticket is missing its equipment reference".to_string(),
            })?;
        let responsible_user_id = self
            .responsible_user_id
            .map(UserId::new)
            .ok_or_else(|| DomainError::MalformedTicket {
                reason: "workflow ticket is missing its responsible user".to_string(),
            })?;
        let created_at = parse_timestamp(self.created_at.as_deref())?.ok_or_else(|| {
            DomainError::MalformedTicket {
                reason: "workflow ticket is missing its creation timestamp".to_string(),
            }
        })?;

        Ok(WorkflowTicket {
            id: TicketId::new(self.id),
            title: self.title,
            description: self.description,
            equipment_id,
            responsible_user_id,
            status,
            current_step,
            progress,
            items,
            merchant_id: self.merchant_id.map(MerchantId::new),
            down_payment,
            transport_from: self.transport_from,
            transport_to_site: self.transport_to_site.map(SiteId::new),
            actual_transportation_cost,
            responsible_party,
            created_at,
        })
    }
}

impl From<&Ticket> for RawTicket {
    fn from(ticket: &Ticket) -> Self {
        match ticket {
            Ticket::Legacy(legacy) => Self::from_legacy(legacy),
            Ticket::Workflow(workflow) => Self::from_workflow(workflow),
        }
    }
}

impl RawTicket {
    fn from_legacy(ticket: &LegacyTicket) -> Self {
        let steps = ticket
            .steps
            .iter()
            .map(|step| RawLegacyStep {
                name: step.name.clone(),
                status: step.status.as_str().to_string(),
                actual_cost: step.actual_cost.map(|cost| cost.to_string()),
                completed_at: format_timestamp(step.completed_at),
            })
            .collect();

        Self {
            id: ticket.id.value(),
            is_legacy: true,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            equipment_id: None,
            responsible_user_id: ticket.responsible_user_id.map(UserId::value),
            status: None,
            current_step: None,
            steps: Some(steps),
            step_progress: None,
            items: Vec::new(),
            merchant_id: None,
            down_payment: None,
            transport_from: None,
            transport_to_site: None,
            actual_transportation_cost: None,
            responsible_contact_id: None,
            responsible_employee_id: None,
            created_at: None,
        }
    }

    fn from_workflow(ticket: &WorkflowTicket) -> Self {
        let step_progress = TicketStep::ALL
            .into_iter()
            .map(|step| {
                let entry = ticket.progress.get(step);
                RawStepProgress {
                    completed: entry.completed,
                    started_at: format_timestamp(entry.started_at),
                    completed_at: format_timestamp(entry.completed_at),
                }
            })
            .collect();

        let items = ticket
            .items
            .iter()
            .map(|item| RawLineItem {
                item_name: item.item_name.clone(),
                quantity: item.quantity,
                expected_cost_per_unit: item.expected_cost_per_unit.map(|cost| cost.to_string()),
                actual_cost_per_unit: item.actual_cost_per_unit.map(|cost| cost.to_string()),
            })
            .collect();

        Self {
            id: ticket.id.value(),
            is_legacy: false,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            equipment_id: Some(ticket.equipment_id.value()),
            responsible_user_id: Some(ticket.responsible_user_id.value()),
            status: Some(ticket.status.as_str().to_string()),
            current_step: Some(ticket.current_step.as_str().to_string()),
            steps: None,
            step_progress: Some(step_progress),
            items,
            merchant_id: ticket.merchant_id.map(MerchantId::value),
            down_payment: ticket.down_payment.map(|payment| payment.to_string()),
            transport_from: ticket.transport_from.clone(),
            transport_to_site: ticket.transport_to_site.map(SiteId::value),
            actual_transportation_cost: ticket
                .actual_transportation_cost
                .map(|cost| cost.to_string()),
            responsible_contact_id: ticket
                .responsible_party
                .and_then(|party| party.contact_id())
                .map(ContactId::value),
            responsible_employee_id: ticket
                .responsible_party
                .and_then(|party| party.employee_id())
                .map(EmployeeId::value),
            created_at: format_timestamp(Some(ticket.created_at)),
        }
    }
}

fn parse_money_field(value: Option<&str>, field: &str) -> Result<Option<Money>, DomainError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let money: Money = raw.parse()?;
            if money.is_negative() {
                return Err(DomainError::NegativeMoney {
                    field: field.to_string(),
                    value: raw.to_string(),
                });
            }
            Ok(Some(money))
        }
    }
}

fn parse_timestamp(value: Option<&str>) -> Result<Option<OffsetDateTime>, DomainError> {
    match value {
        None => Ok(None),
        Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)
            .map(Some)
            .map_err(|e| DomainError::TimestampParse {
                value: raw.to_string(),
                error: e.to_string(),
            }),
    }
}

fn format_timestamp(value: Option<OffsetDateTime>) -> Option<String> {
    value.and_then(|timestamp| timestamp.format(&Rfc3339).ok())
}
