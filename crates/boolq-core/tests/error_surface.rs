use boolq_core::errors::{ErrorInfo, QueryError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "1")
        .with_context("reason", "example")
}

#[test]
fn validation_error_surface() {
    let err = QueryError::Validation(sample_info("empty-operands", "operands missing"));
    assert_eq!(err.info().code, "empty-operands");
    assert!(err.info().context.contains_key("id"));
}

#[test]
fn not_found_error_surface() {
    let err = QueryError::not_found("unknown-rule", "rule does not exist").with_context("rule", "r1");
    assert_eq!(err.info().code, "unknown-rule");
    assert_eq!(err.info().context.get("rule").map(String::as_str), Some("r1"));
}

#[test]
fn invariant_error_surface() {
    let err = QueryError::invariant("join-not-promotable", "no promotable secondary");
    assert_eq!(err.info().code, "join-not-promotable");
}

#[test]
fn hint_is_preserved() {
    let err =
        QueryError::Invariant(sample_info("shared-node", "double ownership").with_hint("re-import"));
    assert_eq!(err.info().hint.as_deref(), Some("re-import"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = QueryError::Validation(sample_info("empty-operands", "operands missing"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "Validation");
    assert_eq!(json["detail"]["code"], "empty-operands");
}

#[test]
fn display_includes_context() {
    let err = QueryError::not_found("unknown-group", "group does not exist")
        .with_context("group", "g42");
    let rendered = err.to_string();
    assert!(rendered.contains("unknown-group"));
    assert!(rendered.contains("g42"));
}
