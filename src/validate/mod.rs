//! Directive validation: document-level structural checks plus per-step
//! semantic analysis of every handler and schedule.
//!
//! Validation is a pure, synchronous traversal. Every check appends to a
//! shared problem collector rather than stopping at the first failure, so a
//! single run reports every defect in the document.

pub mod steps;
pub mod structural;

use crate::error::{Problems, ValidationFailure};
use crate::schema::Directive;

/// Validate an entire directive. Returns every problem found, in discovery
/// order, or `Ok` when the document is internally consistent.
pub fn validate(directive: &Directive) -> Result<(), ValidationFailure> {
    let mut problems = Problems::new();
    structural::validate_directive(directive, &mut problems);
    problems.into_result()
}
