use super::*;

#[test]
fn length_and_emptiness() {
    assert_eq!(Span::new(3, 9).len(), 6);
    assert!(Span::new(4, 4).is_empty());
    assert!(!Span::new(4, 4).is_dummy());
    assert!(Span::DUMMY.is_dummy());
    assert_eq!(Span::default(), Span::DUMMY);
}

#[test]
fn inverted_span_has_no_length() {
    assert_eq!(Span::new(9, 3).len(), 0);
}

#[test]
fn debug_and_display_use_range_syntax() {
    assert_eq!(format!("{:?}", Span::new(1, 4)), "1..4");
    assert_eq!(Span::new(1, 4).to_string(), "1..4");
}
