// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{InMemoryTicketService, ServiceError, TicketService, WorkflowEngine};
use async_trait::async_trait;
use dp_ticket::{
    CreationForm, FinalizeForm, ItemDraft, LegacyStepForm, PurchasingForm, StepForm,
    TransportForm,
};
use dp_ticket_audit::Actor;
use dp_ticket_domain::{
    Contact, ContactId, Employee, EmployeeId, EquipmentId, LegacyStep, LegacyStepStatus,
    LegacyTicket, MerchantId, Money, RawTicket, SiteId, Ticket, TicketId, UserId,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

pub fn test_actor() -> Actor {
    Actor::new(String::from("user-20"), String::from("user"))
}

pub fn reference_contacts() -> Vec<Contact> {
    vec![Contact {
        id: ContactId::new(5),
        merchant_id: MerchantId::new(7),
        name: String::from("Dana Merchant"),
        phone: Some(String::from("555-0101")),
    }]
}

pub fn reference_employees() -> Vec<Employee> {
    vec![Employee {
        id: EmployeeId::new(6),
        site_id: SiteId::new(3),
        name: String::from("Sam Site"),
    }]
}

/// An engine wired to a fresh in-memory service with reference data.
pub fn engine_with_memory() -> (Arc<InMemoryTicketService>, WorkflowEngine) {
    let service = Arc::new(InMemoryTicketService::with_reference_data(
        reference_contacts(),
        reference_employees(),
    ));
    let engine = WorkflowEngine::new(service.clone(), test_actor());
    (service, engine)
}

pub fn valid_creation_form() -> CreationForm {
    CreationForm {
        title: String::from("Replace pump filters"),
        description: String::from("Spare filters for the north pump house"),
        equipment_id: Some(EquipmentId::new(10)),
        responsible_user_id: Some(UserId::new(20)),
        items: vec![ItemDraft {
            item_name: String::from("Filter"),
            quantity: 2,
        }],
    }
}

pub fn purchasing_form() -> PurchasingForm {
    PurchasingForm {
        merchant_id: Some(MerchantId::new(7)),
        item_expected_costs: vec![Some(Money::from_major(50))],
        down_payment: Some(Money::from_major(60)),
    }
}

pub fn finalize_form() -> FinalizeForm {
    FinalizeForm {
        item_actual_costs: vec![Some(Money::from_major(55))],
    }
}

pub fn transport_form() -> TransportForm {
    TransportForm {
        from_location: String::from("Central warehouse"),
        to_site: Some(SiteId::new(3)),
        actual_transportation_cost: Some(Money::from_major(25)),
        responsible_contact: None,
        responsible_employee: Some(EmployeeId::new(6)),
    }
}

/// Creates a ticket and completes steps 1..=n against the engine.
pub async fn drive_to_step(engine: &WorkflowEngine, completed_steps: u8) -> Ticket {
    let mut ticket = engine.create_ticket(valid_creation_form()).await.unwrap();
    let forms = [
        StepForm::Creation(valid_creation_form()),
        StepForm::Purchasing(purchasing_form()),
        StepForm::FinalizePurchasing(finalize_form()),
        StepForm::Transporting(transport_form()),
    ];
    for form in forms.into_iter().take(usize::from(completed_steps)) {
        ticket = engine.complete_step(form).await.unwrap();
    }
    ticket
}

/// A legacy ticket with three independent flat steps, one completed.
pub fn legacy_ticket(id: i64) -> LegacyTicket {
    LegacyTicket {
        id: TicketId::new(id),
        title: String::from("Old boiler overhaul"),
        description: String::from("Carried over from the old system"),
        responsible_user_id: Some(UserId::new(20)),
        steps: vec![
            LegacyStep {
                name: String::from("Order parts"),
                status: LegacyStepStatus::Completed,
                actual_cost: Some(Money::from_major(120)),
                completed_at: None,
            },
            LegacyStep::new(String::from("Fit parts")),
            LegacyStep::new(String::from("Inspect")),
        ],
    }
}

/// An engine holding a seeded legacy ticket.
pub async fn engine_with_legacy_ticket() -> (Arc<InMemoryTicketService>, WorkflowEngine, TicketId)
{
    let (service, engine) = engine_with_memory();
    let id = TicketId::new(90);
    service
        .insert_ticket(Ticket::Legacy(legacy_ticket(90)))
        .await;
    engine.load_ticket(id).await.unwrap();
    (service, engine, id)
}

/// A service whose every call fails at the transport.
pub struct FailingService;

fn network() -> ServiceError {
    ServiceError::Network {
        message: String::from("connection reset"),
    }
}

#[async_trait]
impl TicketService for FailingService {
    async fn create_step1(&self, _payload: CreationForm) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn update_step1(
        &self,
        _id: TicketId,
        _payload: CreationForm,
    ) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn complete_step1(&self, _id: TicketId) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn update_step2(
        &self,
        _id: TicketId,
        _payload: PurchasingForm,
    ) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn complete_step2(&self, _id: TicketId) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn update_step3(
        &self,
        _id: TicketId,
        _payload: FinalizeForm,
    ) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn complete_step3(&self, _id: TicketId) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn update_step4(
        &self,
        _id: TicketId,
        _payload: TransportForm,
    ) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn complete_step4(&self, _id: TicketId) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn get_ticket_by_id(&self, _id: TicketId) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn delete_ticket(&self, _id: TicketId) -> Result<(), ServiceError> {
        Err(network())
    }

    async fn delegate_ticket(
        &self,
        _id: TicketId,
        _new_responsible: UserId,
    ) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn update_legacy_step(
        &self,
        _id: TicketId,
        _index: usize,
        _payload: LegacyStepForm,
    ) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn complete_legacy_step(
        &self,
        _id: TicketId,
        _index: usize,
    ) -> Result<RawTicket, ServiceError> {
        Err(network())
    }

    async fn get_merchant_contacts(
        &self,
        _merchant_id: MerchantId,
    ) -> Result<Vec<Contact>, ServiceError> {
        Err(network())
    }

    async fn get_site_employees(&self, _site_id: SiteId) -> Result<Vec<Employee>, ServiceError> {
        Err(network())
    }
}

/// Delegates to an in-memory service, but `update_step2` parks until
/// released, to hold a write in flight deterministically.
pub struct BlockingService {
    pub inner: Arc<InMemoryTicketService>,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
    armed: AtomicBool,
}

impl BlockingService {
    pub fn new(inner: Arc<InMemoryTicketService>) -> Self {
        Self {
            inner,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            armed: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl TicketService for BlockingService {
    async fn create_step1(&self, payload: CreationForm) -> Result<RawTicket, ServiceError> {
        self.inner.create_step1(payload).await
    }

    async fn update_step1(
        &self,
        id: TicketId,
        payload: CreationForm,
    ) -> Result<RawTicket, ServiceError> {
        self.inner.update_step1(id, payload).await
    }

    async fn complete_step1(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        self.inner.complete_step1(id).await
    }

    async fn update_step2(
        &self,
        id: TicketId,
        payload: PurchasingForm,
    ) -> Result<RawTicket, ServiceError> {
        // Hold only the first write in flight; once released, later writes
        // pass straight through so the test can observe writes flowing again.
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.update_step2(id, payload).await
    }

    async fn complete_step2(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        self.inner.complete_step2(id).await
    }

    async fn update_step3(
        &self,
        id: TicketId,
        payload: FinalizeForm,
    ) -> Result<RawTicket, ServiceError> {
        self.inner.update_step3(id, payload).await
    }

    async fn complete_step3(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        self.inner.complete_step3(id).await
    }

    async fn update_step4(
        &self,
        id: TicketId,
        payload: TransportForm,
    ) -> Result<RawTicket, ServiceError> {
        self.inner.update_step4(id, payload).await
    }

    async fn complete_step4(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        self.inner.complete_step4(id).await
    }

    async fn get_ticket_by_id(&self, id: TicketId) -> Result<RawTicket, ServiceError> {
        self.inner.get_ticket_by_id(id).await
    }

    async fn delete_ticket(&self, id: TicketId) -> Result<(), ServiceError> {
        self.inner.delete_ticket(id).await
    }

    async fn delegate_ticket(
        &self,
        id: TicketId,
        new_responsible: UserId,
    ) -> Result<RawTicket, ServiceError> {
        self.inner.delegate_ticket(id, new_responsible).await
    }

    async fn update_legacy_step(
        &self,
        id: TicketId,
        index: usize,
        payload: LegacyStepForm,
    ) -> Result<RawTicket, ServiceError> {
        self.inner.update_legacy_step(id, index, payload).await
    }

    async fn complete_legacy_step(
        &self,
        id: TicketId,
        index: usize,
    ) -> Result<RawTicket, ServiceError> {
        self.inner.complete_legacy_step(id, index).await
    }

    async fn get_merchant_contacts(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Vec<Contact>, ServiceError> {
        self.inner.get_merchant_contacts(merchant_id).await
    }

    async fn get_site_employees(&self, site_id: SiteId) -> Result<Vec<Employee>, ServiceError> {
        self.inner.get_site_employees(site_id).await
    }
}
