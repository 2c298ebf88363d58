// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::item::LineItem;
use crate::money::Money;

/// Validates structural constraints on a ticket's line items.
///
/// Every item must have a non-empty name and a quantity greater than
/// zero. This does NOT check cost fields; which costs are required is a
/// per-step concern.
///
/// # Errors
///
/// Returns an error naming the first offending item index.
pub fn validate_items(items: &[LineItem]) -> Result<(), DomainError> {
    for (item_index, item) in items.iter().enumerate() {
        if item.item_name.trim().is_empty() {
            return Err(DomainError::EmptyItemName { item_index });
        }
        if item.quantity == 0 {
            return Err(DomainError::InvalidQuantity { item_index });
        }
    }
    Ok(())
}

/// Validates that a down payment, when present, is non-negative.
///
/// # Errors
///
/// Returns `DomainError::NegativeMoney` for a negative amount.
pub fn validate_down_payment(down_payment: Option<Money>) -> Result<(), DomainError> {
    validate_non_negative(down_payment, "down_payment")
}

/// Validates that a transport cost, when present, is non-negative.
///
/// # Errors
///
/// Returns `DomainError::NegativeMoney` for a negative amount.
pub fn validate_transport_cost(cost: Option<Money>) -> Result<(), DomainError> {
    validate_non_negative(cost, "actual_transportation_cost")
}

fn validate_non_negative(value: Option<Money>, field: &str) -> Result<(), DomainError> {
    match value {
        Some(amount) if amount.is_negative() => Err(DomainError::NegativeMoney {
            field: field.to_string(),
            value: amount.to_string(),
        }),
        _ => Ok(()),
    }
}
