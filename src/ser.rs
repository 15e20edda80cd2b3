//! This module provides a `Serializer` which writes JSON values with sorted object keys.

use crate::Result;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use serde_json::Value;
use std::io;

/// Options for the `Serializer`.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializeOptions {
    /// Emit output data in a pretty format.
    pub pretty: bool,
    /// Number of spaces per indentation level when `pretty` is set.
    pub indent: usize,
    /// Write `<`, `>`, `&`, U+2028 and U+2029 as `\u` escape sequences.
    pub escape_html: bool,
    /// Emit a trailing newline.
    pub newline: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            pretty: false,
            indent: 4,
            escape_html: true,
            newline: false,
        }
    }
}

impl SerializeOptions {
    /// Creates new `SerializeOptions`.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A `SerializerBuilder` can be used to build a `Serializer` with certain
/// `SerializeOptions`.
///
/// ## Example
///
/// ```
/// use hcl2json::ser::SerializerBuilder;
///
/// let writer = std::io::stdout();
/// let serializer = SerializerBuilder::new()
///     .pretty(true)
///     .indent(2)
///     .newline(true)
///     .build(writer);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SerializerBuilder {
    opts: SerializeOptions,
}

impl SerializerBuilder {
    /// Creates a new `SerializerBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit output data in a pretty format.
    pub fn pretty(&mut self, yes: bool) -> &mut Self {
        self.opts.pretty = yes;
        self
    }

    /// Sets the number of spaces per indentation level for pretty output.
    pub fn indent(&mut self, indent: usize) -> &mut Self {
        self.opts.indent = indent;
        self
    }

    /// Controls whether HTML special characters are escaped.
    pub fn escape_html(&mut self, yes: bool) -> &mut Self {
        self.opts.escape_html = yes;
        self
    }

    /// Emit a trailing newline.
    pub fn newline(&mut self, yes: bool) -> &mut Self {
        self.opts.newline = yes;
        self
    }

    /// Builds the `Serializer` for the given writer.
    pub fn build<W>(&self, writer: W) -> Serializer<W>
    where
        W: io::Write,
    {
        Serializer::with_options(writer, self.opts.clone())
    }
}

/// A `Serializer` can serialize a `Value` into a writer as JSON.
///
/// Object keys are always written in lexicographical byte order, regardless of the order in which
/// they were inserted.
pub struct Serializer<W> {
    writer: W,
    opts: SerializeOptions,
}

impl<W> Serializer<W>
where
    W: io::Write,
{
    /// Creates a new `Serializer` for writer with options.
    pub fn with_options(writer: W, opts: SerializeOptions) -> Self {
        Self { writer, opts }
    }

    /// Serializes the given `Value` and writes the output to the underlying writer.
    ///
    /// ## Errors
    ///
    /// Returns an error if writing to the underlying writer fails.
    pub fn serialize(&mut self, value: &Value) -> Result<()> {
        let value = SortedKeys(value);
        let escape_html = self.opts.escape_html;

        if self.opts.pretty {
            let indent = " ".repeat(self.opts.indent);
            let formatter = EscapeFormatter::new(
                PrettyFormatter::with_indent(indent.as_bytes()),
                escape_html,
            );
            let mut ser = serde_json::Serializer::with_formatter(&mut self.writer, formatter);
            value.serialize(&mut ser)?;
        } else {
            let formatter = EscapeFormatter::new(CompactFormatter, escape_html);
            let mut ser = serde_json::Serializer::with_formatter(&mut self.writer, formatter);
            value.serialize(&mut ser)?;
        }

        if self.opts.newline {
            self.writer.write_all(b"\n")?;
        }

        self.writer.flush()?;

        Ok(())
    }

    /// Consumes the `Serializer` and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Serializes `value` into a byte vector.
///
/// ## Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn to_vec(value: &Value, opts: SerializeOptions) -> Result<Vec<u8>> {
    let mut ser = Serializer::with_options(Vec::with_capacity(128), opts);
    ser.serialize(value)?;
    Ok(ser.into_inner())
}

// Serializes a `Value` with object keys in sorted order. The `preserve_order` feature of
// serde_json keeps insertion order, so the keys are sorted while serializing.
struct SortedKeys<'a>(&'a Value);

impl Serialize for SortedKeys<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.0 {
            Value::Array(array) => serializer.collect_seq(array.iter().map(SortedKeys)),
            Value::Object(object) => {
                let mut entries: Vec<_> = object.iter().collect();
                entries.sort_unstable_by(|lhs, rhs| lhs.0.cmp(rhs.0));

                serializer.collect_map(
                    entries
                        .into_iter()
                        .map(|(key, value)| (key, SortedKeys(value))),
                )
            }
            value => value.serialize(serializer),
        }
    }
}

// Wraps another formatter and additionally escapes characters which are unsafe to embed into
// HTML.
struct EscapeFormatter<F> {
    inner: F,
    escape_html: bool,
}

impl<F> EscapeFormatter<F> {
    fn new(inner: F, escape_html: bool) -> Self {
        EscapeFormatter { inner, escape_html }
    }
}

impl<F> Formatter for EscapeFormatter<F>
where
    F: Formatter,
{
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.escape_html {
            return self.inner.write_string_fragment(writer, fragment);
        }

        let mut start = 0;

        for (index, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };

            if start < index {
                self.inner
                    .write_string_fragment(writer, &fragment[start..index])?;
            }

            writer.write_all(escaped.as_bytes())?;
            start = index + ch.len_utf8();
        }

        if start < fragment.len() {
            self.inner.write_string_fragment(writer, &fragment[start..])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn to_string(value: &Value, opts: SerializeOptions) -> String {
        String::from_utf8(to_vec(value, opts).unwrap()).unwrap()
    }

    #[test]
    fn test_sorted_keys() {
        let value = json!({"b": 1, "a": {"z": [{"y": 1, "x": 2}], "_": null}, "B": true});

        assert_eq!(
            to_string(&value, SerializeOptions::new()),
            r#"{"B":true,"a":{"_":null,"z":[{"x":2,"y":1}]},"b":1}"#
        );
    }

    #[test]
    fn test_escape_html() {
        let value = json!({"cond": "${a > 2 && b < 3}", "<key>": "line\u{2028}sep\u{2029}"});

        assert_eq!(
            to_string(&value, SerializeOptions::new()),
            r#"{"\u003ckey\u003e":"line\u2028sep\u2029","cond":"${a \u003e 2 \u0026\u0026 b \u003c 3}"}"#
        );
    }

    #[test]
    fn test_escape_html_disabled() {
        let value = json!({"cond": "${a > 2 && \"b\"}"});
        let opts = SerializeOptions {
            escape_html: false,
            ..Default::default()
        };

        assert_eq!(to_string(&value, opts), r#"{"cond":"${a > 2 && \"b\"}"}"#);
    }

    #[test]
    fn test_pretty() {
        let value = json!({"b": [1, {}], "a": []});
        let mut ser = SerializerBuilder::new()
            .pretty(true)
            .indent(2)
            .newline(true)
            .build(Vec::new());

        ser.serialize(&value).unwrap();

        assert_eq!(
            String::from_utf8(ser.into_inner()).unwrap(),
            "{\n  \"a\": [],\n  \"b\": [\n    1,\n    {}\n  ]\n}\n"
        );
    }

    #[test]
    fn test_pretty_default_indent() {
        let value = json!({"provider": {"aws": [{"alias": "one"}]}});
        let opts = SerializeOptions {
            pretty: true,
            ..Default::default()
        };

        assert_eq!(
            to_string(&value, opts),
            "{\n    \"provider\": {\n        \"aws\": [\n            {\n                \"alias\": \"one\"\n            }\n        ]\n    }\n}"
        );
    }
}
