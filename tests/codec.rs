//! Integration tests for the YAML codec: decode tolerance, omit-empty
//! encoding, and validate-identical round-trips.

#[allow(dead_code)]
mod helpers;

use directive::schema::{decode, encode, StepKind};
use directive::validate::validate;
use helpers::*;

#[test]
fn example_directive_decodes_and_validates() {
    let yaml = include_str!("fixtures/example_directive.yaml");
    let directive = decode(yaml).expect("Should decode");

    assert_eq!(directive.identifier, "com.example.orders");
    assert_eq!(directive.runnables.len(), 4);
    assert_eq!(directive.handlers[0].response.as_deref(), Some("render"));
    assert_eq!(directive.schedules[0].interval_seconds(), 30 * 60);

    let steps = &directive.handlers[0].steps;
    assert!(matches!(steps[0].kind(), Some(StepKind::Call(_))));
    assert!(matches!(steps[1].kind(), Some(StepKind::Group(g)) if g.len() == 2));
    assert!(matches!(
        directive.schedules[0].steps[1].kind(),
        Some(StepKind::ForEach(_))
    ));

    validate(&directive).expect("Example directive should validate");
}

#[test]
fn on_err_codes_decode_as_integers() {
    let yaml = include_str!("fixtures/example_directive.yaml");
    let directive = decode(yaml).unwrap();
    let on_err = directive.handlers[0].steps[2]
        .call
        .on_err
        .as_ref()
        .unwrap();
    assert_eq!(on_err.code.get(&404).map(String::as_str), Some("continue"));
    assert_eq!(on_err.other, "return");
}

#[test]
fn valid_directive_round_trips_to_the_same_result() {
    let yaml = include_str!("fixtures/example_directive.yaml");
    let directive = decode(yaml).unwrap();
    validate(&directive).unwrap();

    let encoded = encode(&directive).unwrap();
    let decoded = decode(&encoded).expect("Encoded form should decode");
    validate(&decoded).expect("Round-tripped directive should validate");
}

#[test]
fn failing_directive_round_trips_to_the_same_problem_count() {
    let yaml = include_str!("fixtures/invalid_directive.yaml");
    let directive = decode(yaml).unwrap();
    let before = problems(validate(&directive));
    assert!(!before.is_empty());

    let encoded = encode(&directive).unwrap();
    let decoded = decode(&encoded).unwrap();
    let after = problems(validate(&decoded));
    assert_eq!(before.len(), after.len());
    assert_eq!(before, after);
}

#[test]
fn optional_fields_are_omitted_when_empty() {
    let encoded = encode(&base_directive()).unwrap();
    assert!(!encoded.contains("schedules"));
    assert!(!encoded.contains("response"));
    assert!(!encoded.contains("onErr"));
    assert!(!encoded.contains("with"));
    assert!(!encoded.contains("forEach"));
}

#[test]
fn decode_tolerates_absent_optional_fields() {
    let yaml = "\
identifier: com.example.min
appVersion: 0.1.0
atmoVersion: 0.4.0
runnables:
  - name: fetch
    namespace: default
";
    let directive = decode(yaml).expect("Should decode without handlers or schedules");
    assert!(directive.handlers.is_empty());
    assert!(directive.schedules.is_empty());
}

#[test]
fn structurally_invalid_yaml_is_a_codec_error() {
    let err = decode("runnables: definitely-not-a-list").unwrap_err();
    assert!(!err.to_string().is_empty());
}
