//! Human-readable type rendering for diagnostics and traces.

use sift_ir::StringLookup;

use crate::{Idx, Pool, Tag};

impl Pool {
    /// Render a type in source syntax: `List<int>`, `String?`, `(int, {bool b})`.
    pub fn format_type<I: StringLookup + ?Sized>(&self, idx: Idx, lookup: &I) -> String {
        let mut out = String::new();
        self.write_type(idx, lookup, &mut out);
        out
    }

    fn write_type<I: StringLookup + ?Sized>(&self, idx: Idx, lookup: &I, out: &mut String) {
        if let Some(name) = idx.name() {
            out.push_str(name);
            return;
        }
        if idx == Idx::NONE {
            out.push_str("<none>");
            return;
        }
        match self.tag(idx) {
            Tag::List => {
                out.push_str("List<");
                if let Some(elem) = self.list_elem(idx) {
                    self.write_type(elem, lookup, out);
                }
                out.push('>');
            }
            Tag::Nullable => {
                if let Some(inner) = self.nullable_inner(idx) {
                    self.write_type(inner, lookup, out);
                }
                out.push('?');
            }
            Tag::Map => {
                if let Some((key, value)) = self.map_types(idx) {
                    out.push_str("Map<");
                    self.write_type(key, lookup, out);
                    out.push_str(", ");
                    self.write_type(value, lookup, out);
                    out.push('>');
                }
            }
            Tag::Record => {
                let shape = self.record_shape(idx).unwrap_or_default();
                out.push('(');
                for (i, &ty) in shape.positional.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(ty, lookup, out);
                }
                if !shape.named.is_empty() {
                    if !shape.positional.is_empty() {
                        out.push_str(", ");
                    }
                    out.push('{');
                    for (i, &(name, ty)) in shape.named.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(ty, lookup, out);
                        out.push(' ');
                        out.push_str(lookup.lookup(name));
                    }
                    out.push('}');
                } else if shape.positional.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            Tag::Named => {
                if let Some((name, args)) = self.named_parts(idx) {
                    out.push_str(lookup.lookup(name));
                    if !args.is_empty() {
                        out.push('<');
                        for (i, &arg) in args.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            self.write_type(arg, lookup, out);
                        }
                        out.push('>');
                    }
                }
            }
            tag => out.push_str(tag.name()),
        }
    }
}
