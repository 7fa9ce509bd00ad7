use super::*;
use pretty_assertions::assert_eq;
use sift_ir::StringInterner;

#[test]
fn numeric_equality_crosses_int_and_double() {
    assert_eq!(Value::Int(1), Value::Double(1.0));
    assert_ne!(Value::Int(1), Value::Double(1.5));
    assert_ne!(Value::Double(f64::NAN), Value::Double(f64::NAN));
    assert_ne!(Value::Int(0), Value::Bool(false));
}

#[test]
fn collections_compare_structurally() {
    let a = Value::list(Idx::INT, vec![Value::Int(1), Value::Int(2)]);
    let b = Value::list(Idx::NUM, vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(a, b);

    let m1 = Value::map(
        Idx::STR,
        Idx::INT,
        vec![(Value::string("a"), Value::Int(1)), (Value::string("b"), Value::Int(2))],
    );
    let m2 = Value::map(
        Idx::STR,
        Idx::INT,
        vec![(Value::string("b"), Value::Int(2)), (Value::string("a"), Value::Int(1))],
    );
    assert_eq!(m1, m2);
}

#[test]
fn records_ignore_named_field_order() {
    let interner = StringInterner::new();
    let (x, y) = (interner.intern("x"), interner.intern("y"));
    let a = Value::record(vec![Value::Int(0)], vec![(x, Value::Int(1)), (y, Value::Int(2))]);
    let b = Value::record(vec![Value::Int(0)], vec![(y, Value::Int(2)), (x, Value::Int(1))]);
    assert_eq!(a, b);
}

#[test]
fn runtime_types() {
    let interner = StringInterner::new();
    let mut pool = Pool::new();
    let name = interner.intern("name");

    let list = Value::list(Idx::STR, vec![]);
    let list_str = pool.list(Idx::STR);
    assert_eq!(list.runtime_type(&mut pool), list_str);

    let record = Value::record(vec![Value::Int(1)], vec![(name, Value::string("n"))]);
    let expected = pool.record(&[Idx::INT], &[(name, Idx::STR)]);
    assert_eq!(record.runtime_type(&mut pool), expected);

    assert_eq!(Value::Null.runtime_type(&mut pool), Idx::NULL);
}

#[test]
fn constants_materialize() {
    let interner = StringInterner::new();
    let hi = interner.intern("hi");
    assert_eq!(Value::from_const(ConstValue::Str(hi), &interner), Value::string("hi"));
    assert_eq!(
        Value::from_const(ConstValue::double(2.5), &interner),
        Value::Double(2.5)
    );
    assert!(Value::from_const(ConstValue::Null, &interner).is_null());
}

#[test]
fn display() {
    let list = Value::list(Idx::INT, vec![Value::Int(1), Value::string("a")]);
    assert_eq!(list.to_string(), "[1, \"a\"]");
}
