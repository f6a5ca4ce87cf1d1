//! Rust types mirroring the directive document shape.
//!
//! These types are the serde target for directive YAML. Wire field names are
//! part of the compatibility contract; optional fields follow omit-empty
//! semantics when encoding. Decoding is deliberately tolerant — flagging
//! structurally unsound documents is the validator's job, not serde's.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::WithParseError;

/// Input type for handlers triggered by an inbound request.
pub const INPUT_TYPE_REQUEST: &str = "request";

/// Namespace a runnable belongs to when none is given explicitly.
pub const NAMESPACE_DEFAULT: &str = "default";

/// `onErr` directive: carry on to the next step when the call fails.
pub const DIRECTIVE_CONTINUE: &str = "continue";
/// `onErr` directive: return from the handler or schedule when the call
/// fails.
pub const DIRECTIVE_RETURN: &str = "return";

// =============================================================================
// TOP-LEVEL DIRECTIVE
// =============================================================================

/// The root workflow document: a set of runnable functions plus the
/// handlers and schedules that compose them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directive {
    #[serde(default)]
    pub identifier: String,
    #[serde(rename = "appVersion", default)]
    pub app_version: String,
    /// Version of the engine this directive targets.
    #[serde(rename = "atmoVersion", default)]
    pub atmo_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runnables: Vec<Runnable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handlers: Vec<Handler>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedules: Vec<Schedule>,
}

/// A declared callable function identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Runnable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl Runnable {
    /// The `namespace#name` form of this runnable's identity.
    pub fn namespaced(&self) -> String {
        format!("{}#{}", self.namespace, self.name)
    }
}

// =============================================================================
// HANDLERS & SCHEDULES
// =============================================================================

/// Maps one input trigger to an ordered composition of steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Handler {
    #[serde(default)]
    pub input: Input,
    #[serde(default)]
    pub steps: Vec<Executable>,
    /// Which accumulated state key to return, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl Handler {
    /// Display name for this handler's trigger, e.g. `GET /users`.
    pub fn name(&self) -> String {
        format!("{} {}", self.input.method, self.input.resource)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Input {
    #[serde(rename = "type", default)]
    pub input_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default)]
    pub resource: String,
}

/// Maps a named recurring trigger to an ordered composition of steps,
/// optionally seeded with an initial state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub every: ScheduleEvery,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub state: BTreeMap<String, String>,
    #[serde(default)]
    pub steps: Vec<Executable>,
}

impl Schedule {
    /// Total recurrence interval in seconds.
    pub fn interval_seconds(&self) -> u64 {
        u64::from(self.every.seconds)
            + 60 * u64::from(self.every.minutes)
            + 60 * 60 * u64::from(self.every.hours)
            + 60 * 60 * 24 * u64::from(self.every.days)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleEvery {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub seconds: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub minutes: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub hours: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub days: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

// =============================================================================
// STEPS
// =============================================================================

/// One unit in a composition. On the wire this is a flat map carrying
/// either inline call fields, a `group` list, or a `forEach` map; exactly
/// one of the three must be present for the step to be well-formed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Executable {
    #[serde(flatten)]
    pub call: CallableFn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Vec<CallableFn>>,
    #[serde(rename = "forEach", default, skip_serializing_if = "Option::is_none")]
    pub for_each: Option<ForEach>,
}

/// The variant an [`Executable`] cleanly maps to.
#[derive(Debug, Clone, Copy)]
pub enum StepKind<'a> {
    Call(&'a CallableFn),
    Group(&'a [CallableFn]),
    ForEach(&'a ForEach),
}

impl Executable {
    /// Classify this step into exactly one variant, or `None` when the
    /// decoded shape matches none or more than one of them.
    pub fn kind(&self) -> Option<StepKind<'_>> {
        let has_fn = !self.call.fn_name.is_empty();
        match (has_fn, &self.group, &self.for_each) {
            (true, None, None) => Some(StepKind::Call(&self.call)),
            (false, Some(group), None) if !group.is_empty() => Some(StepKind::Group(group)),
            (false, None, Some(for_each)) => Some(StepKind::ForEach(for_each)),
            _ => None,
        }
    }
}

/// One function invocation: the fn to call, an optional alias for the state
/// key it produces, its `with` bindings, and an optional error policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallableFn {
    #[serde(rename = "fn", default, skip_serializing_if = "String::is_empty")]
    pub fn_name: String,
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub with: Vec<String>,
    #[serde(rename = "onErr", default, skip_serializing_if = "Option::is_none")]
    pub on_err: Option<FnOnErr>,
    /// Parsed form of `with`, populated on the first call to
    /// [`CallableFn::bindings`].
    #[serde(skip)]
    pub parsed_with: OnceLock<Vec<Binding>>,
}

impl CallableFn {
    /// Parse the `with` entries into bindings. Each entry must split into
    /// exactly two parts on the literal `": "` separator, alias first. The
    /// parse result is cached write-once; concurrent first calls are safe.
    pub fn bindings(&self) -> Result<&[Binding], WithParseError> {
        if let Some(parsed) = self.parsed_with.get() {
            return Ok(parsed);
        }

        let mut parsed = Vec::with_capacity(self.with.len());
        for entry in &self.with {
            let parts: Vec<&str> = entry.split(": ").collect();
            if parts.len() != 2 {
                return Err(WithParseError {
                    entry: entry.clone(),
                    parts: parts.len(),
                });
            }
            parsed.push(Binding {
                alias: parts[0].to_string(),
                source_key: parts[1].to_string(),
            });
        }

        Ok(self.parsed_with.get_or_init(|| parsed))
    }

    /// The state key this call produces: its alias when set, else the fn
    /// name itself.
    pub fn produced_key(&self) -> &str {
        match &self.alias {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.fn_name,
        }
    }
}

/// One parsed `with` entry: the local alias a call sees, and the state key
/// it is sourced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub alias: String,
    pub source_key: String,
}

/// Iterates a source state key, binding each element via an inner call and
/// producing a single output key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForEach {
    #[serde(rename = "in", default)]
    pub source: String,
    #[serde(rename = "fn", default)]
    pub call: CallableFn,
    #[serde(rename = "as", default)]
    pub output: String,
}

/// Error policy for one call: per-status-code directives plus the `any` and
/// `other` wildcards. Codes are ordered so problems are reported
/// deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FnOnErr {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub code: BTreeMap<u16, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub any: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub other: String,
}
