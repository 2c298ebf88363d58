// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cost reconciliation.
//!
//! Deterministic arithmetic over a ticket's items and payments; no I/O.
//! Absent cost fields count as zero here — whether they were *entered* is
//! a validation concern, not a reconciliation one.

use dp_ticket_domain::{LegacyStep, LineItem, Money, Ticket};

/// The expected cost of one line: quantity times expected unit cost.
#[must_use]
pub fn line_expected(item: &LineItem) -> Money {
    item.expected_cost_per_unit.unwrap_or_else(Money::zero) * item.quantity
}

/// The actual cost of one line: quantity times actual unit cost.
#[must_use]
pub fn line_actual(item: &LineItem) -> Money {
    item.actual_cost_per_unit.unwrap_or_else(Money::zero) * item.quantity
}

/// The total expected cost over all lines.
#[must_use]
pub fn total_expected(items: &[LineItem]) -> Money {
    items.iter().map(line_expected).sum()
}

/// The total actual cost over all lines.
#[must_use]
pub fn total_actual(items: &[LineItem]) -> Money {
    items.iter().map(line_actual).sum()
}

/// The signed cost variance of one line.
///
/// Positive means over budget, negative under budget.
#[must_use]
pub fn variance(item: &LineItem) -> Money {
    line_actual(item) - line_expected(item)
}

/// The signed cost variance over all lines.
#[must_use]
pub fn total_variance(items: &[LineItem]) -> Money {
    total_actual(items) - total_expected(items)
}

/// The balance still owed after the down payment.
///
/// Never negative: overpaying the down payment leaves a remaining
/// balance of zero, not a refund.
#[must_use]
pub fn remaining_payment(items: &[LineItem], down_payment: Option<Money>) -> Money {
    (total_actual(items) - down_payment.unwrap_or_else(Money::zero)).floored_at_zero()
}

/// The actual cost total of a legacy flat step list.
///
/// Only completed steps are summed: a step that has not finished has no
/// known actual cost yet.
#[must_use]
pub fn legacy_actual_total(steps: &[LegacyStep]) -> Money {
    steps
        .iter()
        .filter(|step| step.status.is_completed())
        .map(|step| step.actual_cost.unwrap_or_else(Money::zero))
        .sum()
}

/// The reconciled cost figures for one ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostSummary {
    /// Total expected cost across all lines.
    pub total_expected: Money,
    /// Total actual cost across all lines.
    pub total_actual: Money,
    /// Signed aggregate variance; positive means over budget.
    pub total_variance: Money,
    /// The down payment, if one was made.
    pub down_payment: Option<Money>,
    /// The non-negative balance still owed.
    pub remaining_payment: Money,
}

impl CostSummary {
    /// Reconciles either ticket shape.
    ///
    /// Legacy tickets have no expected costs or down payment; their
    /// actual total sums completed steps only.
    #[must_use]
    pub fn for_ticket(ticket: &Ticket) -> Self {
        match ticket {
            Ticket::Workflow(workflow) => {
                let expected = total_expected(&workflow.items);
                let actual = total_actual(&workflow.items);
                Self {
                    total_expected: expected,
                    total_actual: actual,
                    total_variance: actual - expected,
                    down_payment: workflow.down_payment,
                    remaining_payment: remaining_payment(&workflow.items, workflow.down_payment),
                }
            }
            Ticket::Legacy(legacy) => {
                let actual = legacy_actual_total(&legacy.steps);
                Self {
                    total_expected: Money::zero(),
                    total_actual: actual,
                    total_variance: actual,
                    down_payment: None,
                    remaining_payment: actual.floored_at_zero(),
                }
            }
        }
    }
}
