//! Composable validators that turn untyped JSON into typed values.
//!
//! A [`Schema<T>`] is a shared function from `&Value` to either a `T` or a
//! [`DecodeFailure`] pinpointing the offending node. Larger schemas are built
//! from the free functions in this module; nothing here knows about pull
//! requests.

pub mod failure;

pub use failure::{DecodeFailure, PathSegment};

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::quote;

static NULL: Value = Value::Null;

type Check<T> = dyn Fn(&Value) -> Result<T, DecodeFailure> + Send + Sync;

/// A validator producing `T` from raw JSON.
pub struct Schema<T> {
    check: Arc<Check<T>>,
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
        }
    }
}

impl<T: 'static> Schema<T> {
    pub fn new(check: impl Fn(&Value) -> Result<T, DecodeFailure> + Send + Sync + 'static) -> Self {
        Self {
            check: Arc::new(check),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<T, DecodeFailure> {
        (self.check)(value)
    }
}

/// Accepts exactly the string `expected`.
pub fn literal(expected: &'static str) -> Schema<()> {
    Schema::new(move |value| match value.as_str() {
        Some(s) if s == expected => Ok(()),
        _ => Err(DecodeFailure::new(
            format!("expected literal {}", quote(expected)),
            value,
        )),
    })
}

/// Accepts one of a closed set of strings, mapping each to its variant.
pub fn enumeration<T>(variants: &'static [(&'static str, T)]) -> Schema<T>
where
    T: Clone + Sync + 'static,
{
    Schema::new(move |value| {
        value
            .as_str()
            .and_then(|s| variants.iter().find(|(name, _)| *name == s))
            .map(|(_, variant)| variant.clone())
            .ok_or_else(|| {
                DecodeFailure::new(format!("expected one of {}", quoted_list(variants)), value)
            })
    })
}

pub fn string() -> Schema<String> {
    string_min_length(0)
}

/// A string of at least `min` characters.
pub fn string_min_length(min: usize) -> Schema<String> {
    Schema::new(move |value| match value.as_str() {
        Some(s) if s.chars().count() >= min => Ok(s.to_owned()),
        Some(_) => Err(DecodeFailure::new(
            format!("expected string of at least {} characters", min),
            value,
        )),
        None => Err(DecodeFailure::new("expected string", value)),
    })
}

/// A whole number no smaller than `min`. Floats are rejected even when integral.
pub fn integer(min: i64) -> Schema<i64> {
    Schema::new(move |value| match value.as_i64() {
        Some(n) if n >= min => Ok(n),
        _ => Err(DecodeFailure::new(format!("expected integer >= {}", min), value)),
    })
}

pub fn nullable<T: 'static>(inner: Schema<T>) -> Schema<Option<T>> {
    Schema::new(move |value| {
        if value.is_null() {
            Ok(None)
        } else {
            inner.validate(value).map(Some)
        }
    })
}

pub fn array<T: 'static>(item: Schema<T>) -> Schema<Vec<T>> {
    bounded_array(item, 0, None)
}

/// An array whose length lies in `min..=max` (`max` of `None` is unbounded).
pub fn bounded_array<T: 'static>(item: Schema<T>, min: usize, max: Option<usize>) -> Schema<Vec<T>> {
    Schema::new(move |value| {
        let items = value
            .as_array()
            .ok_or_else(|| DecodeFailure::new("expected array", value))?;

        let len = items.len();
        if len < min || max.is_some_and(|max| len > max) {
            let bounds = match max {
                Some(max) => format!("{}..={}", min, max),
                None => format!("{}..", min),
            };
            return Err(DecodeFailure::new(
                format!("expected array length {}, got {}", bounds, len),
                value,
            ));
        }

        items
            .iter()
            .enumerate()
            .map(|(index, element)| {
                item.validate(element)
                    .map_err(|f| f.within(PathSegment::Index(index)))
            })
            .collect()
    })
}

/// Member access for [`record`] builders.
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
}

impl Fields<'_> {
    /// Validate member `name`. An absent member is checked as `null`, so only
    /// nullable members may be left out.
    pub fn field<T: 'static>(&self, name: &str, schema: &Schema<T>) -> Result<T, DecodeFailure> {
        let value = self.object.get(name).unwrap_or(&NULL);
        schema
            .validate(value)
            .map_err(|f| f.within(PathSegment::Field(name.to_owned())))
    }
}

/// An object with named members. Members the builder does not ask for are
/// ignored.
pub fn record<T, F>(build: F) -> Schema<T>
where
    T: 'static,
    F: Fn(&Fields<'_>) -> Result<T, DecodeFailure> + Send + Sync + 'static,
{
    Schema::new(move |value| {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeFailure::new("expected object", value))?;
        build(&Fields { object })
    })
}

/// An object whose `discriminator` member selects which branch schema
/// validates the whole object.
pub fn tagged_union<T: 'static>(
    discriminator: &'static str,
    branches: Vec<(&'static str, Schema<T>)>,
) -> Schema<T> {
    Schema::new(move |value| {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeFailure::new("expected object", value))?;
        let tag_value = object.get(discriminator).unwrap_or(&NULL);

        let branch = tag_value
            .as_str()
            .and_then(|tag| branches.iter().find(|(name, _)| *name == tag))
            .map(|(_, schema)| schema)
            .ok_or_else(|| {
                DecodeFailure::new(format!("expected one of {}", quoted_list(&branches)), tag_value)
                    .within(PathSegment::Field(discriminator.to_owned()))
            })?;

        branch.validate(value)
    })
}

/// An object with arbitrary keys and uniformly shaped values.
pub fn dictionary<T: 'static>(key: Schema<String>, entry: Schema<T>) -> Schema<BTreeMap<String, T>> {
    Schema::new(move |value| {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeFailure::new("expected object", value))?;

        object
            .iter()
            .map(|(name, member)| -> Result<(String, T), DecodeFailure> {
                let validated = key
                    .validate(&Value::String(name.clone()))
                    .map_err(|f| f.within(PathSegment::Key(name.clone())))?;
                let member = entry
                    .validate(member)
                    .map_err(|f| f.within(PathSegment::Field(name.clone())))?;
                Ok((validated, member))
            })
            .collect()
    })
}

/// Validate with `first`, then reshape the result. A reshape error is reported
/// at the node `first` validated.
pub fn chain<A, B, F>(first: Schema<A>, reshape: F) -> Schema<B>
where
    A: 'static,
    B: 'static,
    F: Fn(A) -> Result<B, String> + Send + Sync + 'static,
{
    Schema::new(move |value| {
        let validated = first.validate(value)?;
        reshape(validated).map_err(|reason| DecodeFailure::new(reason, value))
    })
}

/// Unwrap a connection envelope `{edges: [{node: T}, ...]}` into the nodes,
/// in order. Pagination metadata is not requested and not kept.
pub fn edges_to_nodes<T: 'static>(node: Schema<T>) -> Schema<Vec<T>> {
    let edges = array(edge(node));
    record(move |f| f.field("edges", &edges))
}

/// Unwrap a connection envelope holding at most one edge into its node.
pub fn maybe_edge_to_node<T: 'static>(node: Schema<T>) -> Schema<Option<T>> {
    let edges = bounded_array(edge(node), 0, Some(1));
    let connection = record(move |f| f.field("edges", &edges));

    chain(connection, |mut nodes: Vec<T>| match nodes.len() {
        0 | 1 => Ok(nodes.pop()),
        n => Err(format!("expected at most one edge, got {}", n)),
    })
}

fn edge<T: 'static>(node: Schema<T>) -> Schema<T> {
    record(move |f| f.field("node", &node))
}

fn quoted_list<T>(entries: &[(&'static str, T)]) -> String {
    entries
        .iter()
        .map(|(name, _)| quote(name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    const COLORS: &[(&str, Color)] = &[("RED", Color::Red), ("GREEN", Color::Green)];

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle { radius: i64 },
        Label { text: String },
    }

    fn shape_schema() -> Schema<Shape> {
        tagged_union(
            "kind",
            vec![
                (
                    "circle",
                    record(|f| {
                        f.field("kind", &literal("circle"))?;
                        Ok(Shape::Circle {
                            radius: f.field("radius", &integer(0))?,
                        })
                    }),
                ),
                (
                    "label",
                    record(|f| {
                        f.field("kind", &literal("label"))?;
                        Ok(Shape::Label {
                            text: f.field("text", &string())?,
                        })
                    }),
                ),
            ],
        )
    }

    fn field_path(names: &[&str]) -> Vec<PathSegment> {
        names
            .iter()
            .map(|n| PathSegment::Field(n.to_string()))
            .collect()
    }

    #[test]
    fn test_literal() {
        assert!(literal("User").validate(&json!("User")).is_ok());
        let failure = literal("User").validate(&json!("Team")).unwrap_err();
        assert_eq!(failure.reason(), r#"expected literal "User""#);
    }

    #[test]
    fn test_enumeration_accepts_members_only() {
        let schema = enumeration(COLORS);
        assert_eq!(schema.validate(&json!("GREEN")).unwrap(), Color::Green);

        let failure = schema.validate(&json!("green")).unwrap_err();
        assert_eq!(failure.reason(), r#"expected one of "RED", "GREEN""#);
        assert_eq!(failure.value(), &json!("green"));
        assert!(schema.validate(&json!(1)).is_err());
    }

    #[test]
    fn test_string_min_length() {
        assert_eq!(string().validate(&json!("")).unwrap(), "");
        assert!(string().validate(&json!(null)).is_err());
        assert!(string_min_length(3).validate(&json!("abc")).is_ok());
        let failure = string_min_length(3).validate(&json!("ab")).unwrap_err();
        assert_eq!(failure.reason(), "expected string of at least 3 characters");
    }

    #[test]
    fn test_integer_minimum_is_inclusive() {
        assert_eq!(integer(1).validate(&json!(1)).unwrap(), 1);
        assert!(integer(1).validate(&json!(0)).is_err());
        assert!(integer(1).validate(&json!(2.5)).is_err());
        assert!(integer(1).validate(&json!("3")).is_err());
    }

    #[test]
    fn test_nullable() {
        let schema = nullable(string());
        assert_eq!(schema.validate(&json!(null)).unwrap(), None);
        assert_eq!(schema.validate(&json!("x")).unwrap(), Some("x".to_string()));
        assert!(schema.validate(&json!(5)).is_err());
    }

    #[test]
    fn test_array_reports_index() {
        let failure = array(integer(0)).validate(&json!([1, 2, "x"])).unwrap_err();
        assert_eq!(failure.path(), &[PathSegment::Index(2)]);
        assert!(array(integer(0)).validate(&json!({"0": 1})).is_err());
    }

    #[test]
    fn test_bounded_array_length() {
        let schema = bounded_array(integer(0), 1, Some(2));
        assert!(schema.validate(&json!([1])).is_ok());
        assert!(schema.validate(&json!([1, 2])).is_ok());
        assert_eq!(
            schema.validate(&json!([])).unwrap_err().reason(),
            "expected array length 1..=2, got 0"
        );
        assert!(schema.validate(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_record_missing_and_nested_fields() {
        let inner = record(|f| f.field("login", &string()));
        let schema = record(move |f| {
            Ok((
                f.field("author", &inner)?,
                f.field("merged", &nullable(string()))?,
            ))
        });

        let ok = schema.validate(&json!({"author": {"login": "octo"}, "extra": true}));
        assert_eq!(ok.unwrap(), ("octo".to_string(), None));

        let failure = schema.validate(&json!({"author": {}})).unwrap_err();
        assert_eq!(failure.path(), field_path(&["author", "login"]).as_slice());
        assert_eq!(failure.reason(), "expected string");
    }

    #[test]
    fn test_tagged_union_dispatch() {
        let schema = shape_schema();
        assert_eq!(
            schema.validate(&json!({"kind": "circle", "radius": 3})).unwrap(),
            Shape::Circle { radius: 3 }
        );
        assert_eq!(
            schema.validate(&json!({"kind": "label", "text": "hi"})).unwrap(),
            Shape::Label { text: "hi".to_string() }
        );
    }

    #[test]
    fn test_tagged_union_unknown_tag() {
        let failure = shape_schema()
            .validate(&json!({"kind": "square", "side": 2}))
            .unwrap_err();
        assert_eq!(failure.path(), field_path(&["kind"]).as_slice());
        assert_eq!(failure.reason(), r#"expected one of "circle", "label""#);
        assert_eq!(failure.value(), &json!("square"));
    }

    #[test]
    fn test_tagged_union_branch_failure() {
        let failure = shape_schema()
            .validate(&json!({"kind": "label", "text": 9}))
            .unwrap_err();
        assert_eq!(failure.path(), field_path(&["text"]).as_slice());
    }

    #[test]
    fn test_dictionary() {
        let schema = dictionary(string_min_length(2), integer(0));
        let parsed = schema.validate(&json!({"ab": 1, "cd": 2})).unwrap();
        assert_eq!(parsed.get("cd"), Some(&2));

        let failure = schema.validate(&json!({"x": 1})).unwrap_err();
        assert_eq!(failure.path(), &[PathSegment::Key("x".to_string())]);
        assert_eq!(failure.value(), &json!("x"));

        let failure = schema.validate(&json!({"ok": -1})).unwrap_err();
        assert_eq!(failure.path(), field_path(&["ok"]).as_slice());
        assert_eq!(failure.reason(), "expected integer >= 0");
    }

    #[test]
    fn test_dictionary_render() {
        let schema = dictionary(string_min_length(2), record(|f| f.field("n", &integer(0))));

        let root = json!({"x": {"n": 123456}});
        let failure = schema.validate(&root).unwrap_err();
        assert_eq!(
            failure.render(&root),
            r#"key "x": expected string of at least 2 characters: "x""#
        );

        let root = json!({"ok": {"n": -1}});
        let failure = schema.validate(&root).unwrap_err();
        assert_eq!(failure.render(&root), r#""ok": "n": expected integer >= 0: -1"#);
    }

    #[test]
    fn test_chain_reshapes_and_keeps_paths() {
        let wrapped = record(|f| f.field("inner", &integer(0)));
        let doubled = chain(wrapped, |n| {
            if n > 100 {
                Err(format!("too large: {}", n))
            } else {
                Ok(n * 2)
            }
        });
        let outer = record(move |f| f.field("value", &doubled));

        assert_eq!(outer.validate(&json!({"value": {"inner": 4}})).unwrap(), 8);

        let first_stage = outer.validate(&json!({"value": {"inner": "4"}})).unwrap_err();
        assert_eq!(first_stage.path(), field_path(&["value", "inner"]).as_slice());

        let second_stage = outer.validate(&json!({"value": {"inner": 101}})).unwrap_err();
        assert_eq!(second_stage.path(), field_path(&["value"]).as_slice());
        assert_eq!(second_stage.reason(), "too large: 101");
        assert_eq!(second_stage.value(), &json!({"inner": 101}));
    }

    #[test]
    fn test_edges_to_nodes_preserves_order() {
        let items = vec!["c", "a", "b", "a"];
        let envelope = json!({
            "edges": items.iter().map(|i| json!({"node": i})).collect::<Vec<_>>(),
            "pageInfo": {"hasNextPage": true},
        });
        let nodes = edges_to_nodes(string()).validate(&envelope).unwrap();
        assert_eq!(nodes, items);

        let empty = edges_to_nodes(string()).validate(&json!({"edges": []})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_edges_to_nodes_failure_path() {
        let envelope = json!({"edges": [{"node": "a"}, {"node": 2}]});
        let failure = edges_to_nodes(string()).validate(&envelope).unwrap_err();
        assert_eq!(
            failure.path(),
            &[
                PathSegment::Field("edges".to_string()),
                PathSegment::Index(1),
                PathSegment::Field("node".to_string()),
            ]
        );
    }

    #[test]
    fn test_maybe_edge_to_node() {
        let schema = maybe_edge_to_node(integer(0));
        assert_eq!(schema.validate(&json!({"edges": []})).unwrap(), None);
        assert_eq!(
            schema.validate(&json!({"edges": [{"node": 5}]})).unwrap(),
            Some(5)
        );

        let failure = schema
            .validate(&json!({"edges": [{"node": 5}, {"node": 6}]}))
            .unwrap_err();
        assert_eq!(failure.path(), field_path(&["edges"]).as_slice());
        assert_eq!(failure.reason(), "expected array length 0..=1, got 2");
    }
}
