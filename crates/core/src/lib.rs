// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod gate;
mod reconcile;
mod schema;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use gate::{
    can_navigate_to, check_completion_allowed, check_navigation, is_step_editable,
    missing_prerequisites, next_step_after_completion,
};
pub use reconcile::{
    CostSummary, legacy_actual_total, line_actual, line_expected, remaining_payment,
    total_actual, total_expected, total_variance, variance,
};
pub use schema::{
    CreationForm, FieldViolation, FinalizeForm, ItemDraft, LegacyStepForm, PurchasingForm,
    StepForm, TransportForm, check_step_form, step_requirements_met, validate_creation_form,
    validate_finalize_form, validate_legacy_step_form, validate_purchasing_form,
    validate_step_form, validate_transport_form,
};
