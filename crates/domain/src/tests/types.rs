// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the ticket record types.

use crate::{
    LegacyStep, LegacyStepStatus, LegacyTicket, LineItem, StepProgressTable, Ticket, TicketId,
    TicketStatus, TicketStep, WorkflowTicket,
};
use crate::{EquipmentId, UserId};
use time::OffsetDateTime;
use time::macros::datetime;

fn sample_workflow_ticket() -> WorkflowTicket {
    WorkflowTicket {
        id: TicketId::new(1),
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
    }
}

#[test]
fn test_empty_progress_table_has_no_started_step() {
    let table = StepProgressTable::new();
    assert_eq!(table.highest_started(), None);
    for step in TicketStep::ALL {
        assert!(!table.is_completed(step));
    }
}

#[test]
fn test_progress_table_tracks_highest_started_step() {
    let mut table = StepProgressTable::new();
    table.get_mut(TicketStep::Creation).completed = true;
    table.get_mut(TicketStep::Purchasing).started_at = Some(OffsetDateTime::UNIX_EPOCH);

    assert_eq!(table.highest_started(), Some(TicketStep::Purchasing));
    assert!(table.is_completed(TicketStep::Creation));
    assert!(!table.is_completed(TicketStep::Purchasing));
}

#[test]
fn test_highest_reached_step_on_fresh_ticket() {
    let ticket = sample_workflow_ticket();
    assert_eq!(ticket.highest_reached_step(), TicketStep::Creation);
}

#[test]
fn test_highest_reached_step_follows_current_step() {
    let mut ticket = sample_workflow_ticket();
    ticket.progress.get_mut(TicketStep::Creation).completed = true;
    ticket.current_step = TicketStep::Purchasing;
    ticket.status = TicketStatus::Purchasing;

    assert_eq!(ticket.highest_reached_step(), TicketStep::Purchasing);
}

#[test]
fn test_completed_ticket_has_reached_every_step() {
    let mut ticket = sample_workflow_ticket();
    ticket.status = TicketStatus::Completed;

    assert_eq!(ticket.highest_reached_step(), TicketStep::Transporting);
}

#[test]
fn test_ticket_variant_accessors() {
    let workflow = Ticket::Workflow(sample_workflow_ticket());
    assert!(!workflow.is_legacy());
    assert!(workflow.as_workflow().is_some());
    assert!(workflow.as_legacy().is_none());
    assert_eq!(workflow.id(), TicketId::new(1));
    assert_eq!(workflow.title(), "Replace pump filters");

    let legacy = Ticket::Legacy(LegacyTicket {
        id: TicketId::new(2),
        title: String::from("Old boiler overhaul"),
        description: String::new(),
        responsible_user_id: None,
        steps: vec![LegacyStep::new(String::from("Order parts"))],
    });
    assert!(legacy.is_legacy());
    assert!(legacy.as_legacy().is_some());
    assert!(legacy.as_workflow().is_none());
}

#[test]
fn test_new_legacy_step_is_pending() {
    let step = LegacyStep::new(String::from("Order parts"));
    assert_eq!(step.status, LegacyStepStatus::Pending);
    assert!(!step.status.is_completed());
    assert_eq!(step.actual_cost, None);
    assert_eq!(step.completed_at, None);
}

#[test]
fn test_legacy_step_status_round_trip() {
    for status in [
        LegacyStepStatus::Pending,
        LegacyStepStatus::InProgress,
        LegacyStepStatus::Completed,
    ] {
        let parsed: LegacyStepStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
    }
}
