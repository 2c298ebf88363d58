// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-memory reference implementation of the ticket service.
//!
//! This is the authoritative side of the boundary in miniature: it
//! assigns ids, stamps started/completed timestamps exactly once,
//! enforces gating and terminal rules server-side, and serves both wire
//! shapes. The test suite drives the engine against it; it also documents
//! the behavior a production implementation must match.

use crate::service::{ServiceError, TicketService};
use async_trait::async_trait;
use dp_ticket::{
    CreationForm, FinalizeForm, LegacyStepForm, PurchasingForm, TransportForm,
    missing_prerequisites, step_requirements_met, validate_creation_form,
};
use dp_ticket_domain::{
    Contact, Employee, LegacyStepStatus, LegacyTicket, LineItem, MerchantId, RawTicket,
    ResponsibleParty, SiteId, StepProgressTable, Ticket, TicketId, TicketStatus, TicketStep,
    UserId, WorkflowTicket, validate_down_payment, validate_transport_cost,
};
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;

struct StoreState {
    next_id: i64,
    tickets: HashMap<TicketId, Ticket>,
    contacts: Vec<Contact>,
    employees: Vec<Employee>,
}

/// An in-memory [`TicketService`].
pub struct InMemoryTicketService {
    state: Mutex<StoreState>,
}

impl InMemoryTicketService {
    /// Creates an empty service with no reference data.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reference_data(Vec::new(), Vec::new())
    }

    /// Creates a service seeded with merchant contacts and site employees.
    #[must_use]
    pub fn with_reference_data(contacts: Vec<Contact>, employees: Vec<Employee>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_id: 1,
                tickets: HashMap::new(),
                contacts,
                employees,
            }),
        }
    }

    /// Inserts a ticket directly, bypassing the creation endpoint.
    ///
    /// Legacy tickets predate the workflow and cannot be created through
    /// it; this is the seam through which migrated data enters the store.
    pub async fn insert_ticket(&self, ticket: Ticket) {
        let mut state = self.state.lock().await;
        let id = ticket.id();
        state.next_id = state.next_id.max(id.value() + 1);
        state.tickets.insert(id, ticket);
    }
}

impl Default for InMemoryTicketService {
    fn default() -> Self {
        Self::new()
    }
}

fn conflict(message: impl Into<String>) -> ServiceError {
    ServiceError::Conflict {
        message: message.into(),
    }
}

fn workflow_mut<'a>(
    state: &'a mut StoreState,
    id: TicketId,
) -> Result<&'a mut WorkflowTicket, ServiceError> {
    match state.tickets.get_mut(&id) {
        None => Err(ServiceError::NotFound { ticket_id: id }),
        Some(Ticket::Legacy(_)) => Err(conflict("this operation requires a workflow ticket")),
        Some(Ticket::Workflow(workflow)) => Ok(workflow),
    }
}

fn editable_workflow_mut<'a>(
    state: &'a mut StoreState,
    id: TicketId,
) -> Result<&'a mut WorkflowTicket, ServiceError> {
    let ticket = workflow_mut(state, id)?;
    if ticket.status.is_terminal() {
        return Err(conflict("ticket is completed"));
    }
    Ok(ticket)
}

fn legacy_mut<'a>(
    state: &'a mut StoreState,
    id: TicketId,
) -> Result<&'a mut LegacyTicket, ServiceError> {
    match state.tickets.get_mut(&id) {
        None => Err(ServiceError::NotFound { ticket_id: id }),
        Some(Ticket::Workflow(_)) => Err(conflict("this operation requires a legacy ticket")),
        Some(Ticket::Legacy(legacy)) => Ok(legacy),
    }
}

fn items_from_drafts(form: &CreationForm, existing: &[LineItem]) -> Vec<LineItem> {
    form.items
        .iter()
        .enumerate()
        .map(|(index, draft)| {
            let mut item = LineItem::new(draft.item_name.clone(), draft.quantity);
            // Re-saving step 1 keeps cost data for lines that are still
            // the same item.
            if let Some(old) = existing.get(index)
                && old.item_name == item.item_name
            {
                item.expected_cost_per_unit = old.expected_cost_per_unit;
                item.actual_cost_per_unit = old.actual_cost_per_unit;
            }
            item
        })
        .collect()
}

fn apply_creation(
    ticket: &mut WorkflowTicket,
    form: &CreationForm,
) -> Result<(), ServiceError> {
    let violations = validate_creation_form(form);
    if !violations.is_empty() {
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        return Err(conflict(format!(
            "invalid step 1 payload: [{}]",
            fields.join(", ")
        )));
    }
    ticket.title = form.title.clone();
    ticket.description = form.description.clone();
    if let Some(equipment_id) = form.equipment_id {
        ticket.equipment_id = equipment_id;
    }
    if let Some(responsible) = form.responsible_user_id {
        ticket.responsible_user_id = responsible;
    }
    ticket.items = items_from_drafts(form, &ticket.items);
    Ok(())
}

fn apply_costs(
    items: &mut [LineItem],
    costs: &[Option<dp_ticket_domain::Money>],
    expected: bool,
) -> Result<(), ServiceError> {
    if costs.len() != items.len() {
        return Err(conflict(format!(
            "cost list must cover all {} items",
            items.len()
        )));
    }
    for (item, cost) in items.iter_mut().zip(costs) {
        if let Some(amount) = cost {
            if amount.is_negative() {
                return Err(conflict("unit costs must not be negative"));
            }
            if expected {
                item.expected_cost_per_unit = Some(*amount);
            } else {
                item.actual_cost_per_unit = Some(*amount);
            }
        }
    }
    Ok(())
}

fn complete_workflow_step(
    state: &mut StoreState,
    id: TicketId,
    step: TicketStep,
) -> Result<RawTicket, ServiceError> {
    let now = OffsetDateTime::now_utc();
    let ticket = workflow_mut(state, id)?;

    if ticket.status.is_terminal() {
        return Err(conflict("ticket is completed"));
    }
    if ticket.is_step_completed(step) {
        return Err(conflict(format!("step '{step}' is already completed")));
    }
    let missing = missing_prerequisites(ticket, step);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(TicketStep::as_str).collect();
        return Err(conflict(format!(
            "prerequisite steps are incomplete: [{}]",
            names.join(", ")
        )));
    }
    let unmet = step_requirements_met(ticket, step);
    if !unmet.is_empty() {
        let fields: Vec<&str> = unmet.iter().map(|v| v.field.as_str()).collect();
        return Err(conflict(format!(
            "required fields are missing: [{}]",
            fields.join(", ")
        )));
    }

    let new_status = step
        .successor()
        .map_or(TicketStatus::Completed, TicketStatus::from_step);
    ticket
        .status
        .validate_transition(new_status)
        .map_err(|err| conflict(err.to_string()))?;

    let progress = ticket.progress.get_mut(step);
    progress.completed = true;
    if progress.completed_at.is_none() {
        progress.completed_at = Some(now);
    }

    match step.successor() {
        Some(next) => {
            ticket.current_step = next;
            ticket.status = TicketStatus::from_step(next);
            let next_progress = ticket.progress.get_mut(next);
            if next_progress.started_at.is_none() {
                next_progress.started_at = Some(now);
            }
        }
        None => {
            ticket.status = TicketStatus::Completed;
        }
    }

    debug!(ticket_id = id.value(), step = %step, "completed workflow step");
    Ok(raw_of(state, id))
}

fn raw_of(state: &StoreState, id: TicketId) -> RawTicket {
    // Only called after a successful lookup in the same critical section.
    state
        .tickets
        .get(&id)
        .map_or_else(|| unreachable!("ticket vanished mid-operation"), RawTicket::from)
}

#[async_trait]
impl TicketService for InMemoryTicketService {
    async fn create_step1(&self, payload: CreationForm) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        let now = OffsetDateTime::now_utc();

        let id = TicketId::new(state.next_id);
        let mut ticket = WorkflowTicket {
            id,
            title: String::new(),
            description: String::new(),
            equipment_id: payload
                .equipment_id
                .ok_or_else(|| conflict("an equipment reference is required"))?,
            responsible_user_id: payload
                .responsible_user_id
                .ok_or_else(|| conflict("a responsible user is required"))?,
            status: TicketStatus::Creation,
            current_step: TicketStep::Creation,
            progress: StepProgressTable::new(),
            items: Vec::new(),
            merchant_id: None,
            down_payment: None,
            transport_from: None,
            transport_to_site: None,
            actual_transportation_cost: None,
            responsible_party: None,
            created_at: now,
        };
        apply_creation(&mut ticket, &payload)?;
        ticket.progress.get_mut(TicketStep::Creation).started_at = Some(now);

        state.next_id += 1;
        state.tickets.insert(id, Ticket::Workflow(ticket));
        debug!(ticket_id = id.value(), "created ticket");
        Ok(raw_of(&state, id))
    }

    async fn update_step1(
        &self,
        id: TicketId,
        payload: CreationForm,
    ) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        apply_creation(editable_workflow_mut(&mut state, id)?, &payload)?;
        Ok(raw_of(&state, id))
    }

    async fn complete_step1(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        complete_workflow_step(&mut state, id, TicketStep::Creation)
    }

    async fn update_step2(
        &self,
        id: TicketId,
        payload: PurchasingForm,
    ) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        let ticket = editable_workflow_mut(&mut state, id)?;

        validate_down_payment(payload.down_payment)
            .map_err(|err| conflict(err.to_string()))?;
        apply_costs(&mut ticket.items, &payload.item_expected_costs, true)?;
        if let Some(merchant_id) = payload.merchant_id {
            ticket.merchant_id = Some(merchant_id);
        }
        if let Some(down_payment) = payload.down_payment {
            ticket.down_payment = Some(down_payment);
        }
        Ok(raw_of(&state, id))
    }

    async fn complete_step2(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        complete_workflow_step(&mut state, id, TicketStep::Purchasing)
    }

    async fn update_step3(
        &self,
        id: TicketId,
        payload: FinalizeForm,
    ) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        let ticket = editable_workflow_mut(&mut state, id)?;
        apply_costs(&mut ticket.items, &payload.item_actual_costs, false)?;
        Ok(raw_of(&state, id))
    }

    async fn complete_step3(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        complete_workflow_step(&mut state, id, TicketStep::FinalizePurchasing)
    }

    async fn update_step4(
        &self,
        id: TicketId,
        payload: TransportForm,
    ) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        let ticket = editable_workflow_mut(&mut state, id)?;

        validate_transport_cost(payload.actual_transportation_cost)
            .map_err(|err| conflict(err.to_string()))?;
        let party = match (payload.responsible_contact, payload.responsible_employee) {
            (None, None) => None,
            (contact, employee) => Some(
                ResponsibleParty::from_optional(contact, employee)
                    .map_err(|err| conflict(err.to_string()))?,
            ),
        };

        if !payload.from_location.trim().is_empty() {
            ticket.transport_from = Some(payload.from_location.clone());
        }
        if let Some(site) = payload.to_site {
            ticket.transport_to_site = Some(site);
        }
        if let Some(cost) = payload.actual_transportation_cost {
            ticket.actual_transportation_cost = Some(cost);
        }
        ticket.responsible_party = party;
        Ok(raw_of(&state, id))
    }

    async fn complete_step4(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        complete_workflow_step(&mut state, id, TicketStep::Transporting)
    }

    async fn get_ticket_by_id(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        let state = self.state.lock().await;
        state
            .tickets
            .get(&id)
            .map(RawTicket::from)
            .ok_or(ServiceError::NotFound { ticket_id: id })
    }

    async fn delete_ticket(&self, id: TicketId) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        state
            .tickets
            .remove(&id)
            .map(|_| ())
            .ok_or(ServiceError::NotFound { ticket_id: id })
    }

    async fn delegate_ticket(
        &self,
        id: TicketId,
        new_responsible: UserId,
    ) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        match state.tickets.get_mut(&id) {
            None => return Err(ServiceError::NotFound { ticket_id: id }),
            Some(Ticket::Workflow(workflow)) => {
                workflow.responsible_user_id = new_responsible;
            }
            Some(Ticket::Legacy(legacy)) => {
                legacy.responsible_user_id = Some(new_responsible);
            }
        }
        Ok(raw_of(&state, id))
    }

    async fn update_legacy_step(
        &self,
        id: TicketId,
        index: usize,
        payload: LegacyStepForm,
    ) -> Result<RawTicket, ServiceError> {
        let mut state = self.state.lock().await;
        let legacy = legacy_mut(&mut state, id)?;
        let len = legacy.steps.len();
        let step = legacy
            .steps
            .get_mut(index)
            .ok_or_else(|| conflict(format!("step index {index} is out of range (len {len})")))?;

        if let Some(name) = payload.name {
            if name.trim().is_empty() {
                return Err(conflict("a step name must not be empty"));
            }
            step.name = name;
        }
        if let Some(cost) = payload.actual_cost {
            if cost.is_negative() {
                return Err(conflict("a step cost must not be negative"));
            }
            step.actual_cost = Some(cost);
        }
        if step.status == LegacyStepStatus::Pending {
            step.status = LegacyStepStatus::InProgress;
        }
        Ok(raw_of(&state, id))
    }

    async fn complete_legacy_step(
        &self,
        id: TicketId,
        index: usize,
    ) -> Result<RawTicket, ServiceError> {
        let now = OffsetDateTime::now_utc();
        let mut state = self.state.lock().await;
        let legacy = legacy_mut(&mut state, id)?;
        let len = legacy.steps.len();
        let step = legacy
            .steps
            .get_mut(index)
            .ok_or_else(|| conflict(format!("step index {index} is out of range (len {len})")))?;

        if step.status.is_completed() {
            return Err(conflict(format!("step {index} is already completed")));
        }
        step.status = LegacyStepStatus::Completed;
        if step.completed_at.is_none() {
            step.completed_at = Some(now);
        }
        debug!(ticket_id = id.value(), index, "completed legacy step");
        Ok(raw_of(&state, id))
    }

    async fn get_merchant_contacts(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Vec<Contact>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state
            .contacts
            .iter()
            .filter(|contact| contact.merchant_id == merchant_id)
            .cloned()
            .collect())
    }

    async fn get_site_employees(&self, site_id: SiteId) -> Result<Vec<Employee>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state
            .employees
            .iter()
            .filter(|employee| employee.site_id == site_id)
            .cloned()
            .collect())
    }
}
