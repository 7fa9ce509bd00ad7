use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_labels_and_notes() {
    let diag = Diagnostic::new(ErrorCode::E3002)
        .with_message("variable `x` is not bound by both branches")
        .with_label(Span::new(10, 15), "bound here only")
        .with_secondary_label(Span::new(20, 25), "other branch")
        .with_note("both sides of `||` must bind the same variables");

    assert!(diag.is_error());
    assert!(!diag.is_warning());
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_span(), Some(Span::new(10, 15)));
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn display_format() {
    let diag = Diagnostic::new(ErrorCode::W3001)
        .with_message("unreachable case")
        .with_label(Span::new(4, 9), "already covered")
        .with_note("remove this case");

    assert_eq!(
        diag.to_string(),
        "warning[W3001]: unreachable case\n  --> 4..9: already covered\n  = note: remove this case"
    );
}

#[test]
fn primary_span_skips_secondary_labels() {
    let diag = Diagnostic::new(ErrorCode::E3003)
        .with_secondary_label(Span::new(1, 2), "first binding")
        .with_label(Span::new(5, 6), "second binding");
    assert_eq!(diag.primary_span(), Some(Span::new(5, 6)));
}

#[test]
fn severity_follows_the_code() {
    assert_eq!(Severity::of(ErrorCode::W3001), Severity::Warning);
    assert_eq!(Severity::of(ErrorCode::E3001), Severity::Error);
    assert!(Diagnostic::new(ErrorCode::W3001).is_warning());
    assert!(Diagnostic::new(ErrorCode::E6001).is_error());
}
