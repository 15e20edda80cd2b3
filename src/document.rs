//! Converts a parsed HCL body into a JSON value tree.
//!
//! Blocks are accumulated by their identifier and labels. Each label opens another object level
//! and the innermost level is always an array of block bodies, so repeated blocks with the same
//! path end up as separate elements in source order:
//!
//! ```hcl
//! provider "aws" { alias = "one" }
//! provider "aws" { alias = "two" }
//! ```
//!
//! becomes
//!
//! ```json
//! {"provider": {"aws": [{"alias": "one"}, {"alias": "two"}]}}
//! ```

use crate::ast::{Attribute, Block, Body, Expression, Number, Structure, Value};
use crate::{Error, Result};
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::trace;
use serde_json::{Map, Value as JsonValue};

/// Converts a parsed `Body` into a JSON object.
///
/// ## Errors
///
/// Returns an error if an attribute is defined twice within the same body or if a block collides
/// with an attribute or with blocks of a different label depth.
pub fn body_to_value(body: Body<'_>) -> Result<JsonValue> {
    into_node_map(body).map(|map| Node::Block(map).into())
}

// Blocks sharing an identifier need to be merged before they can be turned into JSON, hence the
// detour over a map of nodes.
enum Node {
    Attribute(JsonValue),
    Block(IndexMap<String, Node>),
    BlockBodies(Vec<JsonValue>),
}

impl From<Node> for JsonValue {
    fn from(node: Node) -> JsonValue {
        match node {
            Node::Attribute(value) => value,
            Node::Block(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(key, node)| (key, node.into()))
                    .collect(),
            ),
            Node::BlockBodies(bodies) => JsonValue::Array(bodies),
        }
    }
}

fn into_node_map(body: Body<'_>) -> Result<IndexMap<String, Node>> {
    let mut map = IndexMap::new();

    for structure in body {
        match structure {
            Structure::Attribute(attr) => insert_attribute(&mut map, attr)?,
            Structure::Block(block) => insert_block(&mut map, block)?,
        }
    }

    Ok(map)
}

fn insert_attribute(map: &mut IndexMap<String, Node>, attr: Attribute<'_>) -> Result<()> {
    match map.entry(attr.key.to_owned()) {
        Entry::Occupied(entry) => match entry.get() {
            Node::Attribute(_) => Err(Error::DuplicateAttribute {
                name: attr.key.to_owned(),
            }),
            _ => Err(Error::BlockConflict {
                path: attr.key.to_owned(),
            }),
        },
        Entry::Vacant(entry) => {
            entry.insert(Node::Attribute(expression_to_value(attr.expr)));
            Ok(())
        }
    }
}

fn insert_block(map: &mut IndexMap<String, Node>, block: Block<'_>) -> Result<()> {
    let path = block.path();
    trace!("accumulating block `{}`", path);

    let body = body_to_value(block.body)?;
    let key = block.identifier.to_owned();

    insert_block_body(map, key, block.labels.into_iter(), body)
        .ok_or(Error::BlockConflict { path })
}

// Walks down one object level per label and appends the body to the array at the end of the
// path. Returns `None` if a node along the path has a different kind.
fn insert_block_body(
    map: &mut IndexMap<String, Node>,
    key: String,
    mut labels: std::vec::IntoIter<String>,
    body: JsonValue,
) -> Option<()> {
    match labels.next() {
        Some(label) => match map.entry(key).or_insert_with(|| Node::Block(IndexMap::new())) {
            Node::Block(inner) => insert_block_body(inner, label, labels, body),
            _ => None,
        },
        None => match map.entry(key).or_insert_with(|| Node::BlockBodies(Vec::new())) {
            Node::BlockBodies(bodies) => {
                bodies.push(body);
                Some(())
            }
            _ => None,
        },
    }
}

/// Converts an expression into its JSON representation.
///
/// Literal values and collections are converted structurally, templates are emitted as strings and
/// every other expression is wrapped into `${` and `}`.
pub fn expression_to_value(expr: Expression<'_>) -> JsonValue {
    match expr {
        Expression::Value(value) => value_to_json(value),
        Expression::TemplateExpr(template) => JsonValue::String(template),
        expr => JsonValue::String(expr.interpolate()),
    }
}

fn value_to_json(value: Value<'_>) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(b),
        Value::Number(Number::Int(int)) => JsonValue::from(int),
        Value::Number(Number::UInt(uint)) => JsonValue::from(uint),
        // Non-finite floats are rejected by the parser.
        Value::Number(Number::Float(float)) => JsonValue::from(float),
        Value::String(s) => JsonValue::String(s),
        Value::Tuple(tuple) => tuple.into_iter().map(expression_to_value).collect(),
        Value::Object(object) => {
            let mut map = Map::new();

            for item in object {
                map.insert(item.0.to_key(), expression_to_value(item.1));
            }

            JsonValue::Object(map)
        }
    }
}
