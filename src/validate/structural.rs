//! Document-level structural validation rules.

use std::collections::HashSet;

use crate::error::{Problem, Problems, Scope};
use crate::schema::{Directive, StepKind, INPUT_TYPE_REQUEST, NAMESPACE_DEFAULT};
use crate::validate::steps;

/// Run all document-level checks, driving step validation for each handler
/// and schedule. Appends every problem found to `problems`.
pub fn validate_directive(directive: &Directive, problems: &mut Problems) {
    check_identifier(directive, problems);
    check_versions(directive, problems);
    let fns = check_runnables(directive, problems);
    check_handlers(directive, &fns, problems);
    check_schedules(directive, &fns, problems);
}

fn is_valid_version(version: &str) -> bool {
    semver::Version::parse(version).is_ok()
}

fn check_identifier(directive: &Directive, problems: &mut Problems) {
    if directive.identifier.is_empty() {
        problems.push(Problem::MissingIdentifier);
    }
}

fn check_versions(directive: &Directive, problems: &mut Problems) {
    if !is_valid_version(&directive.app_version) {
        problems.push(Problem::InvalidVersion {
            field: "appVersion",
        });
    }
    if !is_valid_version(&directive.atmo_version) {
        problems.push(Problem::InvalidVersion {
            field: "atmoVersion",
        });
    }
}

/// Check runnable declarations and build the set of known function
/// identifiers for step validation. Default-namespace runnables are
/// registered under both their bare and namespaced names, so either form
/// resolves — and a bare-name clash with a default-namespace runnable is a
/// duplicate even across namespaces.
fn check_runnables(directive: &Directive, problems: &mut Problems) -> HashSet<String> {
    if directive.runnables.is_empty() {
        problems.push(Problem::NoRunnables);
    }

    let mut fns = HashSet::new();

    for (position, runnable) in directive.runnables.iter().enumerate() {
        let namespaced = runnable.namespaced();

        if fns.contains(&namespaced) || fns.contains(&runnable.name) {
            problems.push(Problem::DuplicateRunnable { name: namespaced });
            continue;
        }

        if runnable.name.is_empty() {
            problems.push(Problem::RunnableMissingName { position });
            continue;
        }
        if runnable.namespace.is_empty() {
            problems.push(Problem::RunnableMissingNamespace { position });
        }

        if runnable.namespace == NAMESPACE_DEFAULT {
            fns.insert(runnable.name.clone());
        }
        fns.insert(namespaced);
    }

    fns
}

fn check_handlers(directive: &Directive, fns: &HashSet<String>, problems: &mut Problems) {
    for (position, handler) in directive.handlers.iter().enumerate() {
        if handler.input.input_type.is_empty() {
            problems.push(Problem::HandlerMissingType {
                resource: handler.input.resource.clone(),
            });
        }
        if handler.input.resource.is_empty() {
            problems.push(Problem::HandlerMissingResource { position });
        }
        if handler.input.input_type == INPUT_TYPE_REQUEST && handler.input.method.is_empty() {
            problems.push(Problem::HandlerMissingMethod {
                resource: handler.input.resource.clone(),
            });
        }
        if handler.steps.is_empty() {
            problems.push(Problem::HandlerNoSteps {
                resource: handler.input.resource.clone(),
            });
            continue;
        }

        let scope = Scope::handler(handler.name());
        let state = steps::validate_steps(&scope, &handler.steps, HashSet::new(), fns, problems);

        let ends_with_group = handler
            .steps
            .last()
            .map(|step| matches!(step.kind(), Some(StepKind::Group(_))))
            .unwrap_or(false);

        match handler.response.as_deref() {
            None | Some("") => {
                if ends_with_group {
                    problems.push(Problem::AmbiguousResponse {
                        name: handler.name(),
                    });
                }
            }
            Some(response) => {
                if !state.contains(response) {
                    problems.push(Problem::ResponseKeyNotFound {
                        name: handler.name(),
                        key: response.to_string(),
                    });
                }
            }
        }
    }
}

fn check_schedules(directive: &Directive, fns: &HashSet<String>, problems: &mut Problems) {
    for (position, schedule) in directive.schedules.iter().enumerate() {
        if schedule.name.is_empty() {
            problems.push(Problem::ScheduleMissingName { position });
            continue;
        }
        if schedule.steps.is_empty() {
            problems.push(Problem::ScheduleNoSteps {
                name: schedule.name.clone(),
            });
            continue;
        }
        if schedule.interval_seconds() == 0 {
            problems.push(Problem::ScheduleZeroInterval {
                name: schedule.name.clone(),
            });
        }

        // The declared initial state seeds the available-state set.
        let seeded: HashSet<String> = schedule.state.keys().cloned().collect();

        steps::validate_steps(
            &Scope::schedule(schedule.name.as_str()),
            &schedule.steps,
            seeded,
            fns,
            problems,
        );
    }
}
