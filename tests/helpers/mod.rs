use std::collections::BTreeMap;

use directive::error::{Problem, ProblemKind, ValidationFailure};
use directive::schema::*;

// =============================================================================
// Directive builders
// =============================================================================

/// Minimal valid directive: one default-namespace runnable and one request
/// handler with a single call step.
pub fn base_directive() -> Directive {
    Directive {
        identifier: "com.example.demo".into(),
        app_version: "0.1.0".into(),
        atmo_version: "0.4.0".into(),
        runnables: vec![runnable("fetch", "default")],
        handlers: vec![handler("GET", "/x", vec![call_step("fetch")])],
        schedules: vec![],
    }
}

pub fn runnable(name: &str, namespace: &str) -> Runnable {
    Runnable {
        name: name.into(),
        namespace: namespace.into(),
    }
}

pub fn handler(method: &str, resource: &str, steps: Vec<Executable>) -> Handler {
    Handler {
        input: Input {
            input_type: INPUT_TYPE_REQUEST.into(),
            method: method.into(),
            resource: resource.into(),
        },
        steps,
        response: None,
    }
}

pub fn schedule(name: &str, minutes: u32, steps: Vec<Executable>) -> Schedule {
    Schedule {
        name: name.into(),
        every: ScheduleEvery {
            minutes,
            ..Default::default()
        },
        state: BTreeMap::new(),
        steps,
    }
}

// =============================================================================
// Step builders
// =============================================================================

pub fn call(fn_name: &str) -> CallableFn {
    CallableFn {
        fn_name: fn_name.into(),
        ..Default::default()
    }
}

pub fn call_as(fn_name: &str, alias: &str) -> CallableFn {
    CallableFn {
        alias: Some(alias.into()),
        ..call(fn_name)
    }
}

pub fn call_with(fn_name: &str, with: Vec<&str>) -> CallableFn {
    CallableFn {
        with: with.into_iter().map(String::from).collect(),
        ..call(fn_name)
    }
}

pub fn step(call: CallableFn) -> Executable {
    Executable {
        call,
        ..Default::default()
    }
}

pub fn call_step(fn_name: &str) -> Executable {
    step(call(fn_name))
}

pub fn group_step(calls: Vec<CallableFn>) -> Executable {
    Executable {
        group: Some(calls),
        ..Default::default()
    }
}

pub fn for_each_step(source: &str, inner: CallableFn, output: &str) -> Executable {
    Executable {
        for_each: Some(ForEach {
            source: source.into(),
            call: inner,
            output: output.into(),
        }),
        ..Default::default()
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// Unwrap a validation result into its problem list (empty on success).
pub fn problems(result: Result<(), ValidationFailure>) -> Vec<Problem> {
    match result {
        Ok(()) => vec![],
        Err(failure) => failure.problems,
    }
}

pub fn assert_has_kind(problems: &[Problem], kind: ProblemKind) {
    assert!(
        problems.iter().any(|p| p.kind() == kind),
        "Expected a {:?} problem, got: {:?}",
        kind,
        problems
    );
}

pub fn assert_no_problems(problems: &[Problem]) {
    assert!(
        problems.is_empty(),
        "Expected no problems, got: {:?}",
        problems
    );
}
