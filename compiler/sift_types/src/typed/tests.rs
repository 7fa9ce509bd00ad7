use super::*;
use pretty_assertions::assert_eq;

#[test]
fn slots_are_write_once() {
    let mut typed = TypedPatterns::new();
    let id = PatternId::new(3);

    assert_eq!(typed.set_required(id, Idx::INT), Ok(()));
    assert_eq!(
        typed.set_required(id, Idx::INT),
        Err(AnnotationConflict {
            pattern: id,
            slot: AnnotationSlot::Required,
        })
    );
    assert_eq!(typed.required_type(id), Some(Idx::INT));
    assert!(typed.is_annotated(id));
}

#[test]
fn unwritten_slots_read_as_absent() {
    let typed = TypedPatterns::new();
    let id = PatternId::new(0);
    assert_eq!(typed.schema(id), None);
    assert_eq!(typed.required_type(id), None);
    assert!(!typed.is_guaranteed(id));
    assert!(!typed.needs_implicit_cast(id));
    assert!(!typed.is_annotated(id));
    assert_eq!(typed.getter(id, 0), None);
}

#[test]
fn columns_are_independent() {
    let mut typed = TypedPatterns::new();
    let id = PatternId::new(1);
    assert_eq!(typed.set_schema(id, Idx::HOLE), Ok(()));
    assert_eq!(typed.set_matched(id, Idx::NUM), Ok(()));
    assert_eq!(typed.set_required(id, Idx::INT), Ok(()));
    assert_eq!(typed.set_guaranteed(id, false), Ok(()));
    assert_eq!(typed.set_constant(id, ConstValue::Int(1)), Ok(()));

    assert_eq!(typed.schema(id), Some(Idx::HOLE));
    assert_eq!(typed.matched_type(id), Some(Idx::NUM));
    assert_eq!(typed.constant(id), Some(ConstValue::Int(1)));
    assert_eq!(
        typed.set_constant(id, ConstValue::Int(2)).map_err(|c| c.slot),
        Err(AnnotationSlot::Constant)
    );
}
