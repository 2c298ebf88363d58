// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The remote ticket service boundary.
//!
//! The workflow engine is a client of this trait; the production
//! implementation lives behind the enterprise HTTP API and is not part of
//! this crate. The service is authoritative for completion flags and
//! timestamps — every mutation returns the full wire-shape snapshot and
//! the engine adopts it wholesale rather than computing flags itself.

use async_trait::async_trait;
use dp_ticket::{CreationForm, FinalizeForm, LegacyStepForm, PurchasingForm, TransportForm};
use dp_ticket_domain::{Contact, Employee, MerchantId, RawTicket, SiteId, TicketId, UserId};
use thiserror::Error;

/// Errors a ticket service implementation may return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The ticket id is unknown to the service.
    #[error("ticket {ticket_id} not found")]
    NotFound {
        /// The unknown ticket id.
        ticket_id: TicketId,
    },
    /// The service rejected the request, e.g. because of stale state.
    #[error("request rejected: {message}")]
    Conflict {
        /// The service's verbatim rejection reason.
        message: String,
    },
    /// The transport failed or timed out. Safe to retry.
    #[error("transport failure: {message}")]
    Network {
        /// A description of the transport failure.
        message: String,
    },
}

/// The remote ticket service consumed by the workflow engine.
///
/// Step updates persist partial data without completing; completions are
/// separate, idempotence-safe requests. A failed completion after a
/// successful update leaves the step saved but incomplete — the caller
/// retries the completion.
#[async_trait]
pub trait TicketService: Send + Sync {
    /// Creates a ticket from step 1 data, assigning its id.
    async fn create_step1(&self, payload: CreationForm) -> Result<RawTicket, ServiceError>;

    /// Re-saves step 1 data on an existing ticket.
    async fn update_step1(
        &self,
        id: TicketId,
        payload: CreationForm,
    ) -> Result<RawTicket, ServiceError>;

    /// Marks step 1 complete.
    async fn complete_step1(&self, id: TicketId) -> Result<RawTicket, ServiceError>;

    /// Saves step 2 (purchasing) data.
    async fn update_step2(
        &self,
        id: TicketId,
        payload: PurchasingForm,
    ) -> Result<RawTicket, ServiceError>;

    /// Marks step 2 complete.
    async fn complete_step2(&self, id: TicketId) -> Result<RawTicket, ServiceError>;

    /// Saves step 3 (finalize purchasing) data.
    async fn update_step3(
        &self,
        id: TicketId,
        payload: FinalizeForm,
    ) -> Result<RawTicket, ServiceError>;

    /// Marks step 3 complete.
    async fn complete_step3(&self, id: TicketId) -> Result<RawTicket, ServiceError>;

    /// Saves step 4 (transporting) data.
    async fn update_step4(
        &self,
        id: TicketId,
        payload: TransportForm,
    ) -> Result<RawTicket, ServiceError>;

    /// Marks step 4 complete, completing the ticket.
    async fn complete_step4(&self, id: TicketId) -> Result<RawTicket, ServiceError>;

    /// Fetches a ticket by id.
    async fn get_ticket_by_id(&self, id: TicketId) -> Result<RawTicket, ServiceError>;

    /// Deletes a ticket.
    async fn delete_ticket(&self, id: TicketId) -> Result<(), ServiceError>;

    /// Reassigns the user responsible for a ticket.
    async fn delegate_ticket(
        &self,
        id: TicketId,
        new_responsible: UserId,
    ) -> Result<RawTicket, ServiceError>;

    /// Saves data for one step of a legacy ticket's flat list.
    async fn update_legacy_step(
        &self,
        id: TicketId,
        index: usize,
        payload: LegacyStepForm,
    ) -> Result<RawTicket, ServiceError>;

    /// Completes one step of a legacy ticket's flat list.
    ///
    /// Legacy steps have no ordering constraint; any index may complete
    /// independently of the others.
    async fn complete_legacy_step(
        &self,
        id: TicketId,
        index: usize,
    ) -> Result<RawTicket, ServiceError>;

    /// Lists the contacts of a merchant.
    async fn get_merchant_contacts(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Vec<Contact>, ServiceError>;

    /// Lists the employees of a site.
    async fn get_site_employees(&self, site_id: SiteId) -> Result<Vec<Employee>, ServiceError>;
}
