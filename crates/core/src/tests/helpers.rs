// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use dp_ticket_domain::{
    EquipmentId, LegacyStep, LegacyStepStatus, LegacyTicket, LineItem, MerchantId, Money,
    StepProgressTable, TicketId, TicketStatus, TicketStep, UserId, WorkflowTicket,
};
use time::macros::datetime;

/// A fresh workflow ticket in the Creation phase with one uncosted item:
/// two "Filter" units.
pub fn ticket_at_creation() -> WorkflowTicket {
    let mut ticket = WorkflowTicket {
        id: TicketId::new(41),
        title: String::from("Replace pump filters"),
        description: String::from("Spare filters for the north pump house"),
        equipment_id: EquipmentId::new(10),
        responsible_user_id: UserId::new(20),
        status: TicketStatus::Creation,
        current_step: TicketStep::Creation,
        progress: StepProgressTable::new(),
        items: vec![LineItem::new(String::from("Filter"), 2)],
        merchant_id: None,
        down_payment: None,
        transport_from: None,
        transport_to_site: None,
        actual_transportation_cost: None,
        responsible_party: None,
        created_at: datetime!(2026-02-01 09:00 UTC),
    };
    ticket.progress.get_mut(TicketStep::Creation).started_at =
        Some(datetime!(2026-02-01 09:00 UTC));
    ticket
}

/// A ticket with step 1 completed, now in Purchasing.
pub fn ticket_at_purchasing() -> WorkflowTicket {
    let mut ticket = ticket_at_creation();
    complete_step(&mut ticket, TicketStep::Creation);
    ticket
}

/// A ticket with steps 1-2 completed (expected cost 50, down payment 60),
/// now in Finalize Purchasing.
pub fn ticket_at_finalize() -> WorkflowTicket {
    let mut ticket = ticket_at_purchasing();
    ticket.merchant_id = Some(MerchantId::new(7));
    ticket.items[0].expected_cost_per_unit = Some(Money::from_major(50));
    ticket.down_payment = Some(Money::from_major(60));
    complete_step(&mut ticket, TicketStep::Purchasing);
    ticket
}

/// A ticket with steps 1-3 completed (actual cost 55), now in
/// Transporting.
pub fn ticket_at_transporting() -> WorkflowTicket {
    let mut ticket = ticket_at_finalize();
    ticket.items[0].actual_cost_per_unit = Some(Money::from_major(55));
    complete_step(&mut ticket, TicketStep::FinalizePurchasing);
    ticket
}

/// A legacy ticket with three independent flat steps, one completed.
pub fn legacy_ticket() -> LegacyTicket {
    LegacyTicket {
        id: TicketId::new(12),
        title: String::from("Old boiler overhaul"),
        description: String::from("Carried over from the old system"),
        responsible_user_id: Some(UserId::new(20)),
        steps: vec![
            LegacyStep {
                name: String::from("Order parts"),
                status: LegacyStepStatus::Completed,
                actual_cost: Some(Money::from_major(120)),
                completed_at: Some(datetime!(2024-11-02 08:30 UTC)),
            },
            LegacyStep::new(String::from("Fit parts")),
            LegacyStep {
                name: String::from("Inspect"),
                status: LegacyStepStatus::InProgress,
                actual_cost: Some(Money::from_major(30)),
                completed_at: None,
            },
        ],
    }
}

/// Marks a step completed and advances the ticket, mimicking what the
/// authoritative service does on a completion request.
pub fn complete_step(ticket: &mut WorkflowTicket, step: TicketStep) {
    let now = datetime!(2026-02-02 12:00 UTC);
    let progress = ticket.progress.get_mut(step);
    progress.completed = true;
    progress.completed_at = Some(now);

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
}
