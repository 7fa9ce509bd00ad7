use super::*;
use pretty_assertions::assert_eq;

#[test]
fn cast_failed_has_correct_kind() {
    let err = cast_failed("int", "String");
    assert_eq!(
        err.kind,
        EvalErrorKind::CastFailed {
            found: "int".to_string(),
            expected: "String".to_string(),
        }
    );
    assert_eq!(err.message, "cast failed: `int` is not a subtype of `String`");
}

#[test]
fn non_bool_comparison_formats_value() {
    let err = non_bool_comparison(RelationalOp::Lt, &Value::string("yes"));
    assert_eq!(err.message, "operator `<` returned `\"yes\"`, expected a bool");
}

#[test]
fn host_error_keeps_message() {
    let err = host_error("getter threw");
    assert_eq!(
        err.kind,
        EvalErrorKind::Host {
            message: "getter threw".to_string()
        }
    );
    assert_eq!(err.to_string(), "getter threw");
}

#[test]
fn with_span_keeps_innermost() {
    let err = null_assert_failed()
        .with_span(Span::new(3, 4))
        .with_span(Span::new(0, 10));
    assert_eq!(err.span, Some(Span::new(3, 4)));
    assert_eq!(err.to_string(), "null-assert pattern matched null at 3..4");
}

#[test]
fn kind_display_matches_message() {
    for err in [
        null_assert_failed(),
        non_exhaustive_match("int"),
        irrefutable_match_failed("List<int>"),
        member_not_found("length", "Point"),
        undefined_variable("a"),
        immutable_binding("b"),
        not_annotated(7),
    ] {
        assert_eq!(err.kind.to_string(), err.message);
    }
}
