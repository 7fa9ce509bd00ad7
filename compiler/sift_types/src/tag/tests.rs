use super::*;
use crate::Idx;

#[test]
fn primitive_tags_match_indices() {
    for raw in 0..Idx::PRIMITIVE_COUNT {
        let tag = Tag::primitive(raw);
        assert!(tag.is_some(), "no tag for {raw}");
        assert_eq!(tag.map(|t| t as u32), Some(raw));
        assert_eq!(tag.map(Tag::name), Idx::from_raw(raw).name());
    }
    assert_eq!(Tag::primitive(Idx::PRIMITIVE_COUNT), None);
}

#[test]
fn data_layout_categories() {
    assert!(Tag::List.uses_child());
    assert!(Tag::Nullable.uses_child());
    assert!(!Tag::Map.uses_child());
    for tag in [Tag::Map, Tag::Record, Tag::Named] {
        assert!(tag.uses_extra());
        assert!(!tag.is_primitive());
    }
    assert!(Tag::Hole.is_primitive());
}
