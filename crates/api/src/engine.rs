// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The workflow engine.
//!
//! The engine owns the client-side state of one ticket session: the last
//! known server snapshot, the step pointer (which form is displayed), the
//! audit trail, and the one-time editing advisories. It is the only
//! component with side effects; every mutation goes through the remote
//! ticket service and the returned snapshot is adopted wholesale — the
//! service is authoritative for completion flags and timestamps.
//!
//! One engine serves one user session. Writes are serialized per ticket:
//! a write that arrives while another is in flight is rejected with
//! [`ApiError::Busy`] rather than queued. Reads wait for a pending write;
//! reference-data lookups bypass engine state entirely and may run
//! concurrently.

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_service_error,
};
use crate::service::TicketService;
use dp_ticket::{
    CostSummary, CreationForm, LegacyStepForm, StepForm, check_completion_allowed,
    check_navigation, check_step_form, is_step_editable, missing_prerequisites,
    validate_creation_form, validate_legacy_step_form,
};
use dp_ticket_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use dp_ticket_domain::{
    MerchantId, RawTicket, SiteId, Ticket, TicketId, TicketStep, UserId,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Where the session's form display currently points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPointer {
    /// One of the four workflow steps.
    Workflow(TicketStep),
    /// An index into a legacy ticket's flat step list.
    Legacy(usize),
}

/// The result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepNavigation {
    /// The step now displayed.
    pub step: TicketStep,
    /// True the first time the session navigates onto a step that is
    /// already completed: downstream steps may depend on its values, so
    /// the caller should warn before edits. Non-blocking.
    pub editing_completed_advisory: bool,
}

struct EngineState {
    ticket: Option<Ticket>,
    pointer: StepPointer,
    advised: BTreeSet<TicketStep>,
    trail: Vec<AuditEvent>,
    op_seq: u64,
}

impl EngineState {
    const fn new() -> Self {
        Self {
            ticket: None,
            pointer: StepPointer::Workflow(TicketStep::Creation),
            advised: BTreeSet::new(),
            trail: Vec::new(),
            op_seq: 0,
        }
    }

    fn snapshot_summary(&self) -> StateSnapshot {
        StateSnapshot::new(match &self.ticket {
            None => String::from("no-ticket"),
            Some(Ticket::Legacy(legacy)) => {
                let completed = legacy
                    .steps
                    .iter()
                    .filter(|step| step.status.is_completed())
                    .count();
                format!(
                    "ticket={},shape=legacy,steps={},completed={completed}",
                    legacy.id,
                    legacy.steps.len()
                )
            }
            Some(Ticket::Workflow(workflow)) => format!(
                "ticket={},status={},step={},items={}",
                workflow.id,
                workflow.status,
                workflow.current_step,
                workflow.items.len()
            ),
        })
    }

    fn record(
        &mut self,
        actor: &Actor,
        name: &str,
        details: String,
        before: StateSnapshot,
        step: Option<TicketStep>,
    ) {
        self.op_seq += 1;
        let after = self.snapshot_summary();
        let ticket_id = self.ticket.as_ref().map(Ticket::id);
        self.trail.push(AuditEvent::new(
            actor.clone(),
            Cause::new(format!("op-{}", self.op_seq), details.clone()),
            Action::new(name.to_string(), Some(details)),
            before,
            after,
            ticket_id,
            step,
        ));
    }
}

/// The workflow engine for one ticket session.
pub struct WorkflowEngine {
    service: Arc<dyn TicketService>,
    actor: Actor,
    state: Mutex<EngineState>,
}

impl WorkflowEngine {
    /// Creates an engine with no ticket loaded.
    ///
    /// # Arguments
    ///
    /// * `service` - The remote ticket service to drive
    /// * `actor` - Who this session acts as, for the audit trail
    #[must_use]
    pub fn new(service: Arc<dyn TicketService>, actor: Actor) -> Self {
        Self {
            service,
            actor,
            state: Mutex::new(EngineState::new()),
        }
    }

    /// Creates a new ticket by submitting step 1 data.
    ///
    /// On success the server-assigned snapshot is adopted and the pointer
    /// moves to the Creation step.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::Validation` (no network call) if required
    /// fields are missing, `ApiError::Busy` if another request is in
    /// flight, or a translated service error.
    pub async fn create_ticket(&self, form: CreationForm) -> Result<Ticket, ApiError> {
        let violations = validate_creation_form(&form);
        if !violations.is_empty() {
            return Err(ApiError::Validation {
                step: TicketStep::Creation,
                violations,
            });
        }

        let mut state = self.try_write("create_ticket")?;
        let before = state.snapshot_summary();

        let raw = self
            .service
            .create_step1(form)
            .await
            .map_err(translate_service_error)?;
        let ticket = raw.normalize().map_err(translate_domain_error)?;

        info!(ticket_id = ticket.id().value(), "created direct purchase ticket");
        state.ticket = Some(ticket.clone());
        state.pointer = StepPointer::Workflow(TicketStep::Creation);
        state.advised.clear();
        state.record(
            &self.actor,
            "CreateTicket",
            format!("Created ticket '{}'", ticket.title()),
            before,
            Some(TicketStep::Creation),
        );
        Ok(ticket)
    }

    /// Loads a ticket, replacing the held snapshot.
    ///
    /// The pointer resets to the highest step the ticket has reached; for
    /// a legacy ticket, to its first unfinished flat step.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::NotFound` for an unknown id (terminal for
    /// the session), `ApiError::Busy`, or a translated service error.
    pub async fn load_ticket(&self, id: TicketId) -> Result<Ticket, ApiError> {
        let mut state = self.try_write("load_ticket")?;

        let raw = self
            .service
            .get_ticket_by_id(id)
            .await
            .map_err(translate_service_error)?;
        let ticket = raw.normalize().map_err(translate_domain_error)?;

        state.pointer = initial_pointer(&ticket);
        state.advised.clear();
        state.ticket = Some(ticket.clone());
        debug!(ticket_id = id.value(), pointer = ?state.pointer, "loaded ticket");
        Ok(ticket)
    }

    /// Saves partial data for a step without completing it.
    ///
    /// No validation beyond shape and no gate approval: saving is always
    /// allowed on a step the ticket has reached, completed or not.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::PrerequisitesIncomplete` for a step the
    /// ticket has not reached, `ApiError::TerminalState` once the ticket
    /// is completed (post-completion corrections go through a separate
    /// path, not this engine), `ApiError::Busy`, or a translated service
    /// error — in which case the held snapshot is untouched.
    pub async fn save_step(&self, form: StepForm) -> Result<Ticket, ApiError> {
        let mut state = self.try_write("save_step")?;
        let step = form.step();
        let id = {
            let workflow = require_workflow(state.ticket.as_ref())?;
            if workflow.status.is_terminal() {
                return Err(ApiError::TerminalState {
                    ticket_id: workflow.id,
                });
            }
            if !is_step_editable(workflow, step) {
                return Err(ApiError::PrerequisitesIncomplete {
                    target: step,
                    missing: missing_prerequisites(workflow, step),
                });
            }
            workflow.id
        };
        let before = state.snapshot_summary();

        let raw = self.dispatch_update(id, form).await?;
        let ticket = raw.normalize().map_err(translate_domain_error)?;

        debug!(ticket_id = id.value(), step = %step, "saved step data");
        state.ticket = Some(ticket.clone());
        state.record(
            &self.actor,
            "SaveStep",
            format!("Saved data for step '{step}'"),
            before,
            Some(step),
        );
        Ok(ticket)
    }

    /// Validates and completes a step.
    ///
    /// Validation runs locally first; an invalid form makes no network
    /// call. A valid form is persisted, then completion is requested; the
    /// service's snapshot — carrying the authoritative completion flag
    /// and timestamps — is adopted, and the pointer advances unless this
    /// was the final step.
    ///
    /// If the save lands but the completion is rejected, the ticket keeps
    /// the saved data with the step still incomplete; re-invoking this
    /// call retries the completion.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::Validation` naming every offending field,
    /// `ApiError::PrerequisitesIncomplete` when prior steps are not
    /// completed, `ApiError::TerminalState` on a completed ticket,
    /// `ApiError::Busy`, or a translated service error.
    pub async fn complete_step(&self, form: StepForm) -> Result<Ticket, ApiError> {
        let mut state = self.try_write("complete_step")?;
        let step = form.step();
        let id = {
            let workflow = require_workflow(state.ticket.as_ref())?;
            check_step_form(&form, workflow.items.len()).map_err(translate_core_error)?;
            check_completion_allowed(workflow, step).map_err(translate_core_error)?;
            workflow.id
        };
        let before = state.snapshot_summary();

        // Persist first; completion is a separate, retryable request.
        let saved_raw = self.dispatch_update(id, form).await?;
        let saved = saved_raw.normalize().map_err(translate_domain_error)?;
        state.ticket = Some(saved);

        let completed_raw = match self.dispatch_complete(id, step).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(ticket_id = id.value(), step = %step, error = %err,
                    "step saved but completion was rejected");
                return Err(err);
            }
        };
        let ticket = completed_raw.normalize().map_err(translate_domain_error)?;

        info!(ticket_id = id.value(), step = %step, "completed step");
        state.ticket = Some(ticket.clone());
        if let Some(next) = step.successor() {
            state.pointer = StepPointer::Workflow(next);
        }
        state.record(
            &self.actor,
            "CompleteStep",
            format!("Completed step '{step}'"),
            before,
            Some(step),
        );
        Ok(ticket)
    }

    /// Moves the form display to another step.
    ///
    /// Revisiting an earlier step is always allowed; moving forward
    /// requires every prior step to be completed. Landing on an
    /// already-completed step raises a one-time, non-blocking advisory.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::PrerequisitesIncomplete` naming the
    /// incomplete steps; the pointer does not move.
    pub async fn go_to_step(&self, target: TicketStep) -> Result<StepNavigation, ApiError> {
        let mut state = self.try_write("go_to_step")?;

        let advisory = {
            let workflow = require_workflow(state.ticket.as_ref())?;
            let pointer = match state.pointer {
                StepPointer::Workflow(step) => step,
                StepPointer::Legacy(_) => TicketStep::Creation,
            };
            check_navigation(workflow, target, pointer).map_err(translate_core_error)?;
            workflow.is_step_completed(target) && !state.advised.contains(&target)
        };

        state.pointer = StepPointer::Workflow(target);
        if advisory {
            state.advised.insert(target);
        }
        debug!(step = %target, advisory, "navigated");
        Ok(StepNavigation {
            step: target,
            editing_completed_advisory: advisory,
        })
    }

    /// Saves data for one step of a legacy ticket's flat list.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::LegacyValidation`, `ApiError::Busy`, an
    /// out-of-range error, or a translated service error.
    pub async fn save_legacy_step(
        &self,
        index: usize,
        form: LegacyStepForm,
    ) -> Result<Ticket, ApiError> {
        let violations = validate_legacy_step_form(&form);
        if !violations.is_empty() {
            return Err(ApiError::LegacyValidation { index, violations });
        }

        let mut state = self.try_write("save_legacy_step")?;
        let id = require_legacy_step(state.ticket.as_ref(), index)?;
        let before = state.snapshot_summary();

        let raw = self
            .service
            .update_legacy_step(id, index, form)
            .await
            .map_err(translate_service_error)?;
        let ticket = raw.normalize().map_err(translate_domain_error)?;

        debug!(ticket_id = id.value(), index, "saved legacy step data");
        state.ticket = Some(ticket.clone());
        state.record(
            &self.actor,
            "SaveLegacyStep",
            format!("Saved data for legacy step {index}"),
            before,
            None,
        );
        Ok(ticket)
    }

    /// Completes one step of a legacy ticket's flat list.
    ///
    /// Legacy steps have no ordering constraint: the gate is never
    /// consulted and any index may complete independently.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::Busy`, an out-of-range error, or a
    /// translated service error.
    pub async fn complete_legacy_step(&self, index: usize) -> Result<Ticket, ApiError> {
        let mut state = self.try_write("complete_legacy_step")?;
        let id = require_legacy_step(state.ticket.as_ref(), index)?;
        let before = state.snapshot_summary();

        let raw = self
            .service
            .complete_legacy_step(id, index)
            .await
            .map_err(translate_service_error)?;
        let ticket = raw.normalize().map_err(translate_domain_error)?;

        info!(ticket_id = id.value(), index, "completed legacy step");
        state.ticket = Some(ticket.clone());
        state.record(
            &self.actor,
            "CompleteLegacyStep",
            format!("Completed legacy step {index}"),
            before,
            None,
        );
        Ok(ticket)
    }

    /// Reassigns the user responsible for the loaded ticket.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::NoTicketLoaded`, `ApiError::Busy`, or a
    /// translated service error.
    pub async fn delegate(&self, new_responsible: UserId) -> Result<Ticket, ApiError> {
        let mut state = self.try_write("delegate")?;
        let id = state.ticket.as_ref().ok_or(ApiError::NoTicketLoaded)?.id();
        let before = state.snapshot_summary();

        let raw = self
            .service
            .delegate_ticket(id, new_responsible)
            .await
            .map_err(translate_service_error)?;
        let ticket = raw.normalize().map_err(translate_domain_error)?;

        info!(
            ticket_id = id.value(),
            new_responsible = new_responsible.value(),
            "delegated ticket"
        );
        state.ticket = Some(ticket.clone());
        state.record(
            &self.actor,
            "DelegateTicket",
            format!("Delegated ticket to user {}", new_responsible.value()),
            before,
            None,
        );
        Ok(ticket)
    }

    /// Deletes the loaded ticket and clears the session state.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::NoTicketLoaded`, `ApiError::Busy`, or a
    /// translated service error.
    pub async fn delete_ticket(&self) -> Result<(), ApiError> {
        let mut state = self.try_write("delete_ticket")?;
        let id = state.ticket.as_ref().ok_or(ApiError::NoTicketLoaded)?.id();
        let before = state.snapshot_summary();

        self.service
            .delete_ticket(id)
            .await
            .map_err(translate_service_error)?;

        info!(ticket_id = id.value(), "deleted ticket");
        state.ticket = None;
        state.pointer = StepPointer::Workflow(TicketStep::Creation);
        state.advised.clear();
        state.record(
            &self.actor,
            "DeleteTicket",
            format!("Deleted ticket {id}"),
            before,
            None,
        );
        Ok(())
    }

    /// Lists the contacts of a merchant.
    ///
    /// Reference lookups bypass engine state and may run concurrently
    /// with each other and with a pending write.
    ///
    /// # Errors
    ///
    /// Fails with a translated service error.
    pub async fn merchant_contacts(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Vec<dp_ticket_domain::Contact>, ApiError> {
        self.service
            .get_merchant_contacts(merchant_id)
            .await
            .map_err(translate_service_error)
    }

    /// Lists the employees of a site.
    ///
    /// # Errors
    ///
    /// Fails with a translated service error.
    pub async fn site_employees(
        &self,
        site_id: SiteId,
    ) -> Result<Vec<dp_ticket_domain::Employee>, ApiError> {
        self.service
            .get_site_employees(site_id)
            .await
            .map_err(translate_service_error)
    }

    /// Returns the held snapshot, waiting out any pending write.
    pub async fn snapshot(&self) -> Option<Ticket> {
        self.state.lock().await.ticket.clone()
    }

    /// Returns where the form display currently points.
    pub async fn pointer(&self) -> StepPointer {
        self.state.lock().await.pointer
    }

    /// Reconciles the held snapshot's costs.
    ///
    /// # Errors
    ///
    /// Fails with `ApiError::NoTicketLoaded` before the first load.
    pub async fn cost_summary(&self) -> Result<CostSummary, ApiError> {
        self.state
            .lock()
            .await
            .ticket
            .as_ref()
            .map(CostSummary::for_ticket)
            .ok_or(ApiError::NoTicketLoaded)
    }

    /// Returns the session's audit trail so far.
    pub async fn audit_trail(&self) -> Vec<AuditEvent> {
        self.state.lock().await.trail.clone()
    }

    fn try_write(
        &self,
        operation: &str,
    ) -> Result<tokio::sync::MutexGuard<'_, EngineState>, ApiError> {
        self.state.try_lock().map_err(|_| {
            warn!(operation, "rejected: another request is in flight");
            ApiError::Busy {
                operation: operation.to_string(),
            }
        })
    }

    async fn dispatch_update(&self, id: TicketId, form: StepForm) -> Result<RawTicket, ApiError> {
        let result = match form {
            StepForm::Creation(creation) => self.service.update_step1(id, creation).await,
            StepForm::Purchasing(purchasing) => self.service.update_step2(id, purchasing).await,
            StepForm::FinalizePurchasing(finalize) => {
                self.service.update_step3(id, finalize).await
            }
            StepForm::Transporting(transport) => self.service.update_step4(id, transport).await,
        };
        result.map_err(translate_service_error)
    }

    async fn dispatch_complete(
        &self,
        id: TicketId,
        step: TicketStep,
    ) -> Result<RawTicket, ApiError> {
        let result = match step {
            TicketStep::Creation => self.service.complete_step1(id).await,
            TicketStep::Purchasing => self.service.complete_step2(id).await,
            TicketStep::FinalizePurchasing => self.service.complete_step3(id).await,
            TicketStep::Transporting => self.service.complete_step4(id).await,
        };
        result.map_err(translate_service_error)
    }
}

fn initial_pointer(ticket: &Ticket) -> StepPointer {
    match ticket {
        Ticket::Workflow(workflow) => StepPointer::Workflow(workflow.highest_reached_step()),
        Ticket::Legacy(legacy) => StepPointer::Legacy(
            legacy
                .steps
                .iter()
                .position(|step| !step.status.is_completed())
                .unwrap_or(0),
        ),
    }
}

fn require_workflow(
    ticket: Option<&Ticket>,
) -> Result<&dp_ticket_domain::WorkflowTicket, ApiError> {
    ticket
        .ok_or(ApiError::NoTicketLoaded)?
        .as_workflow()
        .ok_or(ApiError::WrongTicketShape {
            expected: "workflow",
        })
}

fn require_legacy_step(ticket: Option<&Ticket>, index: usize) -> Result<TicketId, ApiError> {
    let legacy = ticket
        .ok_or(ApiError::NoTicketLoaded)?
        .as_legacy()
        .ok_or(ApiError::WrongTicketShape { expected: "legacy" })?;
    if index >= legacy.steps.len() {
        return Err(ApiError::LegacyStepOutOfRange {
            index,
            len: legacy.steps.len(),
        });
    }
    Ok(legacy.id)
}
