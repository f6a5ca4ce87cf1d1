//! Step-sequence validation.
//!
//! Walks a handler's or schedule's steps strictly in order, tracking the
//! set of state keys guaranteed to exist at each point. The walk is
//! forward-only and single-pass: a binding may only reference a key
//! produced by a strictly earlier step (or the seeded initial state), and
//! group members are all validated against the same pre-step state, so
//! they cannot observe each other's output.

use std::collections::HashSet;

use crate::error::{Problem, Problems, Scope};
use crate::schema::{CallableFn, Executable, FnOnErr, StepKind, DIRECTIVE_CONTINUE, DIRECTIVE_RETURN};

/// Validate one step sequence against the known function identifiers,
/// starting from `state`. Returns the full available-state set accumulated
/// after the last step.
pub fn validate_steps(
    scope: &Scope,
    steps: &[Executable],
    mut state: HashSet<String>,
    fns: &HashSet<String>,
    problems: &mut Problems,
) -> HashSet<String> {
    for (step, executable) in steps.iter().enumerate() {
        match executable.kind() {
            None => {
                problems.push(Problem::InvalidStepShape {
                    scope: scope.clone(),
                    step,
                });
            }
            Some(StepKind::Call(call)) => {
                let key = validate_call(call, scope, step, &state, fns, problems);
                state.insert(key);
            }
            Some(StepKind::Group(calls)) => {
                let produced: Vec<String> = calls
                    .iter()
                    .map(|call| validate_call(call, scope, step, &state, fns, problems))
                    .collect();
                state.extend(produced);
            }
            Some(StepKind::ForEach(for_each)) => {
                if for_each.output.is_empty() {
                    problems.push(Problem::ForEachMissingAs {
                        scope: scope.clone(),
                        step,
                    });
                }
                // Iteration scoping forbids the inner call from renaming its
                // output or binding state itself.
                let inner_alias = for_each
                    .call
                    .alias
                    .as_deref()
                    .is_some_and(|alias| !alias.is_empty());
                if inner_alias || !for_each.call.with.is_empty() {
                    problems.push(Problem::ForEachInnerCall {
                        scope: scope.clone(),
                        step,
                    });
                }

                validate_call(&for_each.call, scope, step, &state, fns, problems);

                // The forEach's own 'as' is the produced key, not the inner
                // call's.
                state.insert(for_each.output.clone());
            }
        }
    }

    state
}

/// Validate one call against the pre-step state. Returns the state key the
/// call produces.
fn validate_call(
    call: &CallableFn,
    scope: &Scope,
    step: usize,
    state: &HashSet<String>,
    fns: &HashSet<String>,
    problems: &mut Problems,
) -> String {
    if !fns.contains(&call.fn_name) {
        problems.push(Problem::UnknownFn {
            scope: scope.clone(),
            step,
            fn_name: call.fn_name.clone(),
        });
    }

    match call.bindings() {
        Err(err) => {
            problems.push(Problem::MalformedWith {
                scope: scope.clone(),
                step,
                source: err,
            });
        }
        Ok(bindings) => {
            for binding in bindings {
                if !state.contains(&binding.source_key) {
                    problems.push(Problem::UnavailableStateKey {
                        scope: scope.clone(),
                        step,
                        key: binding.source_key.clone(),
                    });
                }
            }
        }
    }

    if let Some(on_err) = &call.on_err {
        check_on_err(on_err, scope, step, problems);
    }

    call.produced_key().to_string()
}

fn is_directive(value: &str) -> bool {
    value == DIRECTIVE_CONTINUE || value == DIRECTIVE_RETURN
}

fn check_on_err(on_err: &FnOnErr, scope: &Scope, step: usize, problems: &mut Problems) {
    // When specific codes are listed the wildcard is 'other', not 'any'.
    if !on_err.code.is_empty() && !on_err.any.is_empty() {
        problems.push(Problem::OnErrAnyWithCodes {
            scope: scope.clone(),
            step,
        });
    } else if !on_err.any.is_empty() && !is_directive(&on_err.any) {
        problems.push(Problem::InvalidOnErrDirective {
            scope: scope.clone(),
            step,
            field: "any",
            directive: on_err.any.clone(),
        });
    }

    // And without codes the wildcard is 'any', not 'other'.
    if on_err.code.is_empty() && !on_err.other.is_empty() {
        problems.push(Problem::OnErrOtherWithoutCodes {
            scope: scope.clone(),
            step,
        });
    } else if !on_err.other.is_empty() && !is_directive(&on_err.other) {
        problems.push(Problem::InvalidOnErrDirective {
            scope: scope.clone(),
            step,
            field: "other",
            directive: on_err.other.clone(),
        });
    }

    for (code, directive) in &on_err.code {
        if !is_directive(directive) {
            problems.push(Problem::InvalidOnErrCode {
                scope: scope.clone(),
                step,
                code: *code,
                directive: directive.clone(),
            });
        }
    }
}
