// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for cost reconciliation.

use crate::{
    CostSummary, legacy_actual_total, line_actual, line_expected, remaining_payment,
    total_actual, total_expected, total_variance, variance,
};
use dp_ticket_domain::{LineItem, Money, Ticket};

use super::helpers::{legacy_ticket, ticket_at_creation, ticket_at_finalize, ticket_at_transporting};

fn costed_item(quantity: u32, expected: i64, actual: i64) -> LineItem {
    LineItem {
        item_name: String::from("Filter"),
        quantity,
        expected_cost_per_unit: Some(Money::from_major(expected)),
        actual_cost_per_unit: Some(Money::from_major(actual)),
    }
}

#[test]
fn test_uncosted_items_total_zero() {
    // Step 1 submitted with items only: no cost fields entered yet.
    let ticket = ticket_at_creation();

    assert_eq!(total_expected(&ticket.items), Money::zero());
    assert_eq!(total_actual(&ticket.items), Money::zero());
}

#[test]
fn test_expected_total_after_purchasing() {
    // Two filters at an expected 50 each.
    let ticket = ticket_at_finalize();

    assert_eq!(total_expected(&ticket.items), Money::from_major(100));
}

#[test]
fn test_actual_total_and_remaining_after_finalize() {
    // Two filters at an actual 55 each, down payment 60.
    let ticket = ticket_at_transporting();

    assert_eq!(total_actual(&ticket.items), Money::from_major(110));
    assert_eq!(
        remaining_payment(&ticket.items, ticket.down_payment),
        Money::from_major(50)
    );
    assert_eq!(total_variance(&ticket.items), Money::from_major(10));
}

#[test]
fn test_line_values_multiply_quantity() {
    let item = costed_item(3, 10, 12);

    assert_eq!(line_expected(&item), Money::from_major(30));
    assert_eq!(line_actual(&item), Money::from_major(36));
}

#[test]
fn test_variance_is_exactly_actual_minus_expected() {
    let item = costed_item(2, 50, 55);

    assert_eq!(variance(&item), line_actual(&item) - line_expected(&item));
    assert_eq!(variance(&item), Money::from_major(10));

    // Repeated computation must not drift.
    for _ in 0..100 {
        assert_eq!(variance(&item), Money::from_major(10));
    }
}

#[test]
fn test_variance_is_negative_under_budget() {
    let item = costed_item(1, 60, 45);

    assert_eq!(variance(&item), Money::from_major(-15));
}

#[test]
fn test_remaining_payment_never_negative() {
    // Down payment exceeds the actual total.
    let items = vec![costed_item(1, 40, 40)];

    assert_eq!(
        remaining_payment(&items, Some(Money::from_major(100))),
        Money::zero()
    );
}

#[test]
fn test_remaining_payment_without_down_payment() {
    let items = vec![costed_item(2, 50, 55)];

    assert_eq!(remaining_payment(&items, None), Money::from_major(110));
}

#[test]
fn test_fractional_costs_stay_exact() {
    let item = LineItem {
        item_name: String::from("Hose clamp"),
        quantity: 3,
        expected_cost_per_unit: Some("0.10".parse().unwrap()),
        actual_cost_per_unit: Some("0.20".parse().unwrap()),
    };

    // 3 × 0.10 = 0.30 and 3 × 0.20 = 0.60, exactly.
    assert_eq!(line_expected(&item), "0.30".parse().unwrap());
    assert_eq!(variance(&item), "0.30".parse().unwrap());
}

#[test]
fn test_legacy_total_sums_completed_steps_only() {
    let ticket = legacy_ticket();

    // One completed step at 120; the in-progress step's 30 is not yet a
    // known actual cost.
    assert_eq!(legacy_actual_total(&ticket.steps), Money::from_major(120));
}

#[test]
fn test_cost_summary_for_workflow_ticket() {
    let summary = CostSummary::for_ticket(&Ticket::Workflow(ticket_at_transporting()));

    assert_eq!(summary.total_expected, Money::from_major(100));
    assert_eq!(summary.total_actual, Money::from_major(110));
    assert_eq!(summary.total_variance, Money::from_major(10));
    assert_eq!(summary.down_payment, Some(Money::from_major(60)));
    assert_eq!(summary.remaining_payment, Money::from_major(50));
}

#[test]
fn test_cost_summary_for_legacy_ticket() {
    let summary = CostSummary::for_ticket(&Ticket::Legacy(legacy_ticket()));

    assert_eq!(summary.total_expected, Money::zero());
    assert_eq!(summary.total_actual, Money::from_major(120));
    assert_eq!(summary.down_payment, None);
    assert_eq!(summary.remaining_payment, Money::from_major(120));
}
