//! Validation engine for directive documents.
//!
//! A directive is a declarative workflow description: it names a set of
//! callable functions (runnables) and composes them into request handlers
//! and time-based schedules via ordered steps, parallel groups, and
//! for-each iteration. This crate proves such a document is well-formed and
//! internally consistent before any runtime sees it; it never executes
//! anything.

pub mod error;
pub mod fqfn;
pub mod schema;
pub mod validate;
