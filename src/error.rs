//! Error types for directive validation.
//!
//! Validation never stops at the first defect: every check appends a
//! [`Problem`] to a shared [`Problems`] collector and the whole document is
//! always traversed. The only failure surfaced from a validation run is the
//! aggregate [`ValidationFailure`]; FQFN lookup misses ([`FnNotFound`]) are
//! returned individually at the call site.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Handler,
    Schedule,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Handler => write!(f, "handler"),
            ScopeKind::Schedule => write!(f, "schedule"),
        }
    }
}

/// The handler or schedule a step-level problem was found in.
///
/// Handlers are named by their trigger (`GET /users`), schedules by their
/// declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: String,
}

impl Scope {
    pub fn handler(name: impl Into<String>) -> Self {
        Scope {
            kind: ScopeKind::Handler,
            name: name.into(),
        }
    }

    pub fn schedule(name: impl Into<String>) -> Self {
        Scope {
            kind: ScopeKind::Schedule,
            name: name.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.kind, self.name)
    }
}

/// A malformed `with` entry. Entries must split into exactly two parts on
/// the literal `": "` separator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("with entry '{entry}' has wrong format: found {parts} parts separated by ': ', expected 2")]
pub struct WithParseError {
    pub entry: String,
    pub parts: usize,
}

/// Broad classification of a [`Problem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    Structural,
    DuplicateDefinition,
    Reference,
    Dependency,
    Syntax,
    Policy,
    Shape,
}

/// One defect found while validating a directive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Problem {
    #[error("identifier is missing")]
    MissingIdentifier,

    #[error("{field} is not a valid semantic version")]
    InvalidVersion { field: &'static str },

    #[error("no runnables listed")]
    NoRunnables,

    #[error("duplicate fn {name} found")]
    DuplicateRunnable { name: String },

    #[error("runnable at position {position} is missing a name")]
    RunnableMissingName { position: usize },

    #[error("runnable at position {position} is missing a namespace")]
    RunnableMissingNamespace { position: usize },

    #[error("handler for resource {resource} is missing an input type")]
    HandlerMissingType { resource: String },

    #[error("handler at position {position} is missing a resource")]
    HandlerMissingResource { position: usize },

    #[error("handler for resource {resource} is a request handler but does not specify a method")]
    HandlerMissingMethod { resource: String },

    #[error("handler for resource {resource} has no steps")]
    HandlerNoSteps { resource: String },

    #[error("handler for {name} ends with a group step but does not declare a 'response' key")]
    AmbiguousResponse { name: String },

    #[error("handler for {name} declares a response key that is never produced: {key}")]
    ResponseKeyNotFound { name: String, key: String },

    #[error("schedule at position {position} has no name")]
    ScheduleMissingName { position: usize },

    #[error("schedule {name} has no steps")]
    ScheduleNoSteps { name: String },

    #[error("schedule {name} has a zero 'every' interval")]
    ScheduleZeroInterval { name: String },

    #[error("step at position {step} in {scope} is not exactly one of fn, group, or forEach")]
    InvalidStepShape { scope: Scope, step: usize },

    #[error("{scope} lists fn at step {step} that does not exist: {fn_name} (did you forget a namespace?)")]
    UnknownFn {
        scope: Scope,
        step: usize,
        fn_name: String,
    },

    #[error("{scope} has an invalid 'with' value at step {step}: {source}")]
    MalformedWith {
        scope: Scope,
        step: usize,
        #[source]
        source: WithParseError,
    },

    #[error("{scope} has a 'with' value at step {step} referencing a key that is not yet available: {key}")]
    UnavailableStateKey {
        scope: Scope,
        step: usize,
        key: String,
    },

    #[error("{scope} sets 'onErr.any' at step {step} while specific codes are listed, use 'other' instead")]
    OnErrAnyWithCodes { scope: Scope, step: usize },

    #[error("{scope} sets 'onErr.other' at step {step} while no specific codes are listed, use 'any' instead")]
    OnErrOtherWithoutCodes { scope: Scope, step: usize },

    #[error("{scope} has an invalid 'onErr.{field}' directive at step {step}: {directive}")]
    InvalidOnErrDirective {
        scope: Scope,
        step: usize,
        field: &'static str,
        directive: String,
    },

    #[error("{scope} has an invalid 'onErr' directive for code {code} at step {step}: {directive}")]
    InvalidOnErrCode {
        scope: Scope,
        step: usize,
        code: u16,
        directive: String,
    },

    #[error("forEach at position {step} in {scope} is missing its 'as' value")]
    ForEachMissingAs { scope: Scope, step: usize },

    #[error("forEach at position {step} in {scope} must not set 'fn.as' or 'fn.with'")]
    ForEachInnerCall { scope: Scope, step: usize },
}

impl Problem {
    pub fn kind(&self) -> ProblemKind {
        match self {
            Problem::MissingIdentifier
            | Problem::InvalidVersion { .. }
            | Problem::NoRunnables
            | Problem::RunnableMissingName { .. }
            | Problem::RunnableMissingNamespace { .. }
            | Problem::HandlerMissingType { .. }
            | Problem::HandlerMissingResource { .. }
            | Problem::HandlerMissingMethod { .. }
            | Problem::HandlerNoSteps { .. }
            | Problem::AmbiguousResponse { .. }
            | Problem::ScheduleMissingName { .. }
            | Problem::ScheduleNoSteps { .. }
            | Problem::ScheduleZeroInterval { .. } => ProblemKind::Structural,
            Problem::DuplicateRunnable { .. } => ProblemKind::DuplicateDefinition,
            Problem::UnknownFn { .. } => ProblemKind::Reference,
            Problem::UnavailableStateKey { .. } | Problem::ResponseKeyNotFound { .. } => {
                ProblemKind::Dependency
            }
            Problem::MalformedWith { .. } => ProblemKind::Syntax,
            Problem::OnErrAnyWithCodes { .. }
            | Problem::OnErrOtherWithoutCodes { .. }
            | Problem::InvalidOnErrDirective { .. }
            | Problem::InvalidOnErrCode { .. } => ProblemKind::Policy,
            Problem::InvalidStepShape { .. }
            | Problem::ForEachMissingAs { .. }
            | Problem::ForEachInnerCall { .. } => ProblemKind::Shape,
        }
    }
}

/// Accumulates every defect found during one validation run.
#[derive(Debug, Default)]
pub struct Problems(Vec<Problem>);

impl Problems {
    pub fn new() -> Self {
        Problems::default()
    }

    pub fn push(&mut self, problem: Problem) {
        self.0.push(problem);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Problem] {
        &self.0
    }

    /// `Ok` when nothing was collected, otherwise the aggregate failure.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { problems: self.0 })
        }
    }
}

/// Aggregate of every problem found in one validation run, in discovery
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub problems: Vec<Problem>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "found {} problems:", self.problems.len())?;
        for problem in &self.problems {
            write!(f, "\n\t{problem}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// FQFN lookup miss. Raised only by [`crate::fqfn::FqfnResolver::resolve`],
/// never part of the aggregate validation result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fn {0} does not exist")]
pub struct FnNotFound(pub String);

/// Failure decoding or encoding a directive document.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct CodecError(#[from] serde_yaml::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_renders_one_line_per_problem() {
        let failure = ValidationFailure {
            problems: vec![
                Problem::MissingIdentifier,
                Problem::InvalidVersion {
                    field: "appVersion",
                },
            ],
        };
        assert_eq!(
            failure.to_string(),
            "found 2 problems:\n\tidentifier is missing\n\tappVersion is not a valid semantic version"
        );
    }

    #[test]
    fn scope_displays_with_trigger_name() {
        let problem = Problem::UnknownFn {
            scope: Scope::handler("GET /users"),
            step: 1,
            fn_name: "fetch".into(),
        };
        assert_eq!(
            problem.to_string(),
            "handler for GET /users lists fn at step 1 that does not exist: fetch (did you forget a namespace?)"
        );
        assert_eq!(problem.kind(), ProblemKind::Reference);
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(Problems::new().into_result().is_ok());
    }
}
