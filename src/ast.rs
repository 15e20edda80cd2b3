//! The syntax tree produced by the parser.
//!
//! Literal values and collections are represented structurally. Every other expression keeps the
//! source text it was parsed from, which is all that is needed to emit it as an interpolation
//! string.

use std::fmt;

/// The body of a HCL config file or block.
pub type Body<'a> = Vec<Structure<'a>>;

/// Possible HCL structures.
#[derive(Debug, PartialEq, Clone)]
pub enum Structure<'a> {
    /// An Attribute is a key-value pair where the key is a string identifier. The value can be a
    /// literal value or complex expression.
    Attribute(Attribute<'a>),
    /// A nested block which has an identifier, zero or more labels and a body.
    Block(Block<'a>),
}

impl<'a> From<Attribute<'a>> for Structure<'a> {
    fn from(attr: Attribute<'a>) -> Self {
        Structure::Attribute(attr)
    }
}

impl<'a> From<Block<'a>> for Structure<'a> {
    fn from(block: Block<'a>) -> Self {
        Structure::Block(block)
    }
}

/// A key-value pair within a body.
#[derive(Debug, PartialEq, Clone)]
pub struct Attribute<'a> {
    /// The attribute name.
    pub key: &'a str,
    /// The attribute value.
    pub expr: Expression<'a>,
}

impl<'a> Attribute<'a> {
    /// Creates a new `Attribute`.
    pub fn new(key: &'a str, expr: Expression<'a>) -> Self {
        Attribute { key, expr }
    }
}

/// A block like `resource "aws_lb" "example" { ... }`.
#[derive(Debug, PartialEq, Clone)]
pub struct Block<'a> {
    /// The block type, e.g. `resource`.
    pub identifier: &'a str,
    /// The block labels with escape sequences already decoded.
    pub labels: Vec<String>,
    /// The block body.
    pub body: Body<'a>,
}

impl<'a> Block<'a> {
    /// Creates a new `Block`.
    pub fn new(identifier: &'a str, labels: Vec<String>, body: Body<'a>) -> Self {
        Block {
            identifier,
            labels,
            body,
        }
    }

    /// Returns the block identifier followed by its labels, joined by dots.
    pub fn path(&self) -> String {
        std::iter::once(self.identifier)
            .chain(self.labels.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// An expression on the right-hand side of an attribute.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression<'a> {
    /// A literal value or a collection.
    Value(Value<'a>),
    /// A quoted string or heredoc which contains template sequences.
    TemplateExpr(String),
    /// Any other expression, e.g. a traversal, function call or for-expression.
    RawExpr(&'a str),
    /// Raw operation expression.
    Operation(&'a str),
    /// Raw conditional expression.
    Conditional(&'a str),
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Value(val) => write!(f, "{}", val),
            Expression::TemplateExpr(tpl) => write!(f, "{}", tpl),
            Expression::RawExpr(raw) => write!(f, "{}", raw),
            Expression::Operation(op) => write!(f, "{}", op),
            Expression::Conditional(cond) => write!(f, "{}", cond),
        }
    }
}

impl<'a> Expression<'a> {
    /// Interpolate the expression as a string by wrapping it into `${` and `}` if it is neither a
    /// literal nor a template.
    pub fn interpolate(&self) -> String {
        let raw = match self {
            Expression::RawExpr(raw) => raw,
            Expression::Operation(op) => op,
            Expression::Conditional(cond) => cond,
            _ => return self.to_string(),
        };

        format!("${{{}}}", raw)
    }
}

impl<'a> From<Value<'a>> for Expression<'a> {
    fn from(value: Value<'a>) -> Self {
        Expression::Value(value)
    }
}

/// Represents any HCL value that can be converted without evaluation.
#[derive(Debug, PartialEq, Clone)]
pub enum Value<'a> {
    /// Represents a HCL null value.
    Null,
    /// Represents a HCL boolean.
    Bool(bool),
    /// Represents a HCL number, either integer or float.
    Number(Number),
    /// Represents a HCL string with escape sequences decoded.
    String(String),
    /// Represents a HCL tuple.
    Tuple(Vec<Expression<'a>>),
    /// Represents a HCL object.
    Object(Vec<ObjectItem<'a>>),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(num) => write!(f, "{}", num),
            Value::String(s) => write!(f, "{}", s),
            Value::Tuple(tuple) => {
                let items = tuple
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");

                write!(f, "[{}]", items)
            }
            Value::Object(object) => {
                let items = object
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");

                write!(f, "{{{}}}", items)
            }
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value<'_> {
    fn from(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }
}

impl From<&str> for Value<'_> {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

/// A single `key = value` item of an object constructor.
#[derive(Debug, PartialEq, Clone)]
pub struct ObjectItem<'a>(pub ObjectKey<'a>, pub Expression<'a>);

impl fmt::Display for ObjectItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.0, self.1)
    }
}

/// The key of an object item.
#[derive(Debug, PartialEq, Clone)]
pub enum ObjectKey<'a> {
    /// A bare identifier used as key.
    Identifier(&'a str),
    /// Any other key expression.
    Expression(Expression<'a>),
}

impl ObjectKey<'_> {
    /// Returns the string the key is emitted as in JSON.
    pub fn to_key(&self) -> String {
        match self {
            ObjectKey::Identifier(ident) => ident.to_string(),
            ObjectKey::Expression(expr) => expr.interpolate(),
        }
    }
}

impl fmt::Display for ObjectKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKey::Identifier(ident) => write!(f, "{}", ident),
            ObjectKey::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

/// Represents a HCL number.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Number {
    /// Represents a integer.
    Int(i64),
    /// Represents a positive integer which does not fit into an `i64`.
    UInt(u64),
    /// Represents a float.
    Float(f64),
}

impl Number {
    /// Parses a numeric literal.
    ///
    /// Floats without a fractional part that fit into an `i64` or `u64` are treated as integers,
    /// so `1.0` and `1e3` become `1` and `1000`. Returns `None` for non-finite results.
    pub fn parse(s: &str) -> Option<Number> {
        if let Ok(int) = s.parse::<i64>() {
            return Some(Number::Int(int));
        }

        if let Ok(uint) = s.parse::<u64>() {
            return Some(Number::UInt(uint));
        }

        let float = s.parse::<f64>().ok().filter(|f| f.is_finite())?;

        if float.fract() != 0.0 {
            Some(Number::Float(float))
        } else if float >= i64::MIN as f64 && float < i64::MAX as f64 {
            Some(Number::Int(float as i64))
        } else if float > 0.0 && float < u64::MAX as f64 {
            Some(Number::UInt(float as u64))
        } else {
            Some(Number::Float(float))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(int) => write!(f, "{}", int),
            Number::UInt(uint) => write!(f, "{}", uint),
            Number::Float(float) => write!(f, "{}", float),
        }
    }
}
