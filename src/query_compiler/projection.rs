//! Projection tree: what to fetch for a matched entity.
//!
//! A [`ProjectionSpec`] is a root match pattern plus an ordered tree of named
//! fields. Each field takes one of the projection forms below; the tree is
//! rendered into a `match ... fetch { ... };` statement by [`ToTypeQl`].

use crate::typeql::{escape_string, Pattern, ToTypeQl, TypeQlWriter, Var};

/// Hard cap on every list projection (friends, followers, tags, reactions, pages).
pub const BOUNDED_LIST_LIMIT: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchField {
    /// Attribute read on the entity itself: `$page.name`, or `[$post.tag]`
    /// when the attribute is multi-valued.
    Attribute {
        var: Var,
        attribute: &'static str,
        multi: bool,
    },
    /// First value bound by a sub-match, `null` when nothing matches.
    FirstValue { pattern: Pattern, value: Var },
    /// Number of sub-match answers; zero when nothing matches.
    Count { pattern: Pattern },
    /// Sorted, truncated list of one value per sub-match answer.
    BoundedList {
        pattern: Pattern,
        value: Var,
        limit: usize,
    },
    /// Sorted, truncated list of nested documents.
    SubFetch {
        pattern: Pattern,
        sort: Option<Var>,
        limit: Option<usize>,
        fields: FetchObject,
    },
}

impl FetchField {
    pub fn attribute(var: &Var, attribute: &'static str) -> Self {
        FetchField::Attribute {
            var: var.clone(),
            attribute,
            multi: false,
        }
    }

    pub fn bounded_list(pattern: Pattern, value: Var) -> Self {
        FetchField::BoundedList {
            pattern,
            value,
            limit: BOUNDED_LIST_LIMIT,
        }
    }

    /// Cap on the number of elements this field can produce, if it is a list.
    pub fn limit(&self) -> Option<usize> {
        match self {
            FetchField::BoundedList { limit, .. } => Some(*limit),
            FetchField::SubFetch { limit, .. } => *limit,
            _ => None,
        }
    }

    fn write(&self, key: &str, writer: &mut TypeQlWriter) {
        let key = escape_string(key);
        match self {
            FetchField::Attribute {
                var,
                attribute,
                multi: false,
            } => writer.line(format!("\"{}\": {}.{},", key, var, attribute)),
            FetchField::Attribute {
                var,
                attribute,
                multi: true,
            } => writer.line(format!("\"{}\": [{}.{}],", key, var, attribute)),
            FetchField::FirstValue { pattern, value } => {
                writer.line(format!("\"{}\": (", key));
                writer.indent();
                write_match(pattern, writer);
                writer.line(format!("return first {};", value));
                writer.dedent();
                writer.line("),");
            }
            FetchField::Count { pattern } => {
                writer.line(format!("\"{}\": (", key));
                writer.indent();
                write_match(pattern, writer);
                writer.line("return count;");
                writer.dedent();
                writer.line("),");
            }
            FetchField::BoundedList {
                pattern,
                value,
                limit,
            } => {
                writer.line(format!("\"{}\": [", key));
                writer.indent();
                write_match(pattern, writer);
                writer.line(format!("sort {};", value));
                writer.line(format!("limit {};", limit));
                writer.line(format!("return {{ {} }};", value));
                writer.dedent();
                writer.line("],");
            }
            FetchField::SubFetch {
                pattern,
                sort,
                limit,
                fields,
            } => {
                writer.line(format!("\"{}\": [", key));
                writer.indent();
                write_match(pattern, writer);
                if let Some(sort) = sort {
                    writer.line(format!("sort {};", sort));
                }
                if let Some(limit) = limit {
                    writer.line(format!("limit {};", limit));
                }
                fields.write_fetch(writer);
                writer.dedent();
                writer.line("],");
            }
        }
    }
}

fn write_match(pattern: &Pattern, writer: &mut TypeQlWriter) {
    writer.line("match");
    writer.indent();
    for statement in pattern.statements() {
        writer.line(statement);
    }
    writer.dedent();
}

/// Ordered set of named fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchObject {
    entries: Vec<(String, FetchField)>,
}

impl FetchObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; a later field with the same key replaces the earlier one
    /// in place.
    pub fn insert(&mut self, key: impl Into<String>, field: FetchField) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = field,
            None => self.entries.push((key, field)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FetchField> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn write_fetch(&self, writer: &mut TypeQlWriter) {
        writer.line("fetch {");
        writer.indent();
        for (key, field) in &self.entries {
            field.write(key, writer);
        }
        writer.dedent();
        writer.line("};");
    }
}

/// Root of a compiled read: which entities to match and what to fetch for each.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSpec {
    pub root: Pattern,
    pub root_var: Var,
    pub fields: FetchObject,
}

impl ToTypeQl for ProjectionSpec {
    fn write_typeql(&self, writer: &mut TypeQlWriter) {
        write_match(&self.root, writer);
        self.fields.write_fetch(writer);
    }
}
