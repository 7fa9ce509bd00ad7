use super::*;
use crate::StringInterner;

#[test]
fn doubles_compare_by_bits() {
    assert_eq!(ConstValue::double(1.5), ConstValue::double(1.5));
    assert_ne!(ConstValue::double(0.0), ConstValue::double(-0.0));
    assert_eq!(ConstValue::double(2.25).as_double(), Some(2.25));
    assert_eq!(ConstValue::Int(2).as_double(), None);
}

#[test]
fn arena_keeps_spans() {
    let interner = StringInterner::new();
    let mut arena = ConstArena::new();

    let five = arena.value(ConstValue::Int(5), Span::new(0, 1));
    let limit = arena.reference(interner.intern("limit"), Span::new(4, 9));

    assert_eq!(arena.len(), 2);
    assert_eq!(arena.get(five), &ConstExpr::Value(ConstValue::Int(5)));
    assert_eq!(
        arena.get(limit),
        &ConstExpr::Reference(interner.intern("limit"))
    );
    assert_eq!(arena.span(limit), Span::new(4, 9));
}

#[test]
fn display_renders_literals() {
    let interner = StringInterner::new();
    let color = interner.intern("Color");
    let red = interner.intern("red");
    let key = interner.intern("k");

    assert_eq!(ConstValue::Null.display(&interner).to_string(), "null");
    assert_eq!(ConstValue::Int(-3).display(&interner).to_string(), "-3");
    assert_eq!(ConstValue::Str(key).display(&interner).to_string(), "\"k\"");
    assert_eq!(
        ConstValue::Enum {
            ty: color,
            variant: red
        }
        .display(&interner)
        .to_string(),
        "Color.red"
    );
}
