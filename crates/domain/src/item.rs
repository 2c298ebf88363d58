// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One purchasable line on a direct purchase ticket.
///
/// Cost fields stay `None` until the step that introduces them: expected
/// unit cost is entered in Purchasing, actual unit cost in Finalize
/// Purchasing. `None` is treated as zero for arithmetic but is distinct
/// from zero for validation ("not yet entered").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The item description entered in the Creation step.
    pub item_name: String,
    /// How many units are purchased. Always greater than zero.
    pub quantity: u32,
    /// Per-unit cost quoted in the Purchasing step.
    pub expected_cost_per_unit: Option<Money>,
    /// Per-unit cost actually paid, recorded in Finalize Purchasing.
    pub actual_cost_per_unit: Option<Money>,
}

impl LineItem {
    /// Creates a line item with no cost data yet.
    ///
    /// # Arguments
    ///
    /// * `item_name` - The item description
    /// * `quantity` - How many units are purchased
    #[must_use]
    pub const fn new(item_name: String, quantity: u32) -> Self {
        Self {
            item_name,
            quantity,
            expected_cost_per_unit: None,
            actual_cost_per_unit: None,
        }
    }
}
