//! Convert HCL documents into JSON.
//!
//! Blocks become arrays of objects nested below their labels, literal values are passed through
//! as JSON literals and every other expression is kept as an interpolation string like
//! `"${var.enabled ? 1 : 0}"`. Expressions are never evaluated.
//!
//! ## Example
//!
//! ```
//! use hcl2json::{convert_str, ConvertOptions};
//!
//! let input = r#"
//! provider "aws" {
//!   version = "=2.46.0"
//!   alias   = "one"
//! }
//! "#;
//!
//! let json = convert_str(input, "main.tf", &ConvertOptions::default())?;
//!
//! assert_eq!(json, r#"{"provider":{"aws":[{"alias":"one","version":"=2.46.0"}]}}"#);
//! # Ok::<(), hcl2json::Error>(())
//! ```
#![warn(missing_docs)]

use log::debug;
use std::fs::canonicalize;
use std::path::{Path, PathBuf};

pub use error::*;
pub use parser::parse;
pub use sink::Sink;
pub use source::Source;

pub mod ast;
pub mod document;
mod error;
mod parser;
pub mod ser;
mod sink;
mod source;
pub mod template;

/// Options for converting HCL into JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Write `<`, `>`, `&`, U+2028 and U+2029 as `\u` escape sequences. Defaults to `true`.
    pub escape_html: bool,
    /// Emit indented output instead of compact JSON. Defaults to `false`.
    pub pretty: bool,
    /// Number of spaces per indentation level if `pretty` is set. Defaults to `4`.
    pub indent: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            escape_html: true,
            pretty: false,
            indent: 4,
        }
    }
}

impl From<&ConvertOptions> for ser::SerializeOptions {
    fn from(opts: &ConvertOptions) -> Self {
        ser::SerializeOptions {
            pretty: opts.pretty,
            indent: opts.indent,
            escape_html: opts.escape_html,
            newline: false,
        }
    }
}

/// Converts the HCL document in `input` into JSON.
///
/// The `filename` is only used in syntax error messages and may be empty.
///
/// ## Errors
///
/// Returns an error if `input` is not valid UTF-8, is not valid HCL or contains conflicting
/// attribute or block definitions. No output is produced in that case.
pub fn convert_bytes(input: &[u8], filename: &str, opts: &ConvertOptions) -> Result<Vec<u8>> {
    let input = std::str::from_utf8(input)?;
    let value = to_value(input, filename)?;

    ser::to_vec(&value, opts.into())
}

/// Converts the HCL document in `input` into a JSON string.
///
/// ## Errors
///
/// See [`convert_bytes`].
pub fn convert_str(input: &str, filename: &str, opts: &ConvertOptions) -> Result<String> {
    let value = to_value(input, filename)?;
    let bytes = ser::to_vec(&value, opts.into())?;

    // The serializer only ever writes valid UTF-8.
    String::from_utf8(bytes).map_err(|err| Error::InvalidUtf8(err.utf8_error()))
}

/// Parses the HCL document in `input` and converts it into a `serde_json::Value`.
///
/// Object keys of the returned value are in source order. Use the [`ser`] module to write them
/// sorted.
///
/// ## Errors
///
/// Returns an error if `input` is not valid HCL or contains conflicting attribute or block
/// definitions.
pub fn to_value(input: &str, filename: &str) -> Result<serde_json::Value> {
    let body = parse(input, filename)?;

    debug!(
        "parsed {} top-level structures from `{}`",
        body.len(),
        if filename.is_empty() { "<input>" } else { filename }
    );

    document::body_to_value(body)
}

trait PathExt {
    fn relative_to<P>(&self, path: P) -> Option<PathBuf>
    where
        P: AsRef<Path>;

    fn relative_to_cwd(&self) -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .and_then(|base| self.relative_to(base))
    }

    fn glob_files(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

impl<T> PathExt for T
where
    T: AsRef<Path>,
{
    fn relative_to<P>(&self, base: P) -> Option<PathBuf>
    where
        P: AsRef<Path>,
    {
        let (path, base) = (canonicalize(self).ok()?, canonicalize(base).ok()?);
        pathdiff::diff_paths(path, base)
    }

    fn glob_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = self.as_ref().join(pattern);

        let mut paths = glob::glob(&full_pattern.to_string_lossy())
            .map_err(|err| Error::glob_pattern(full_pattern.display(), err))?
            .filter_map(|result| match result {
                Ok(path) => path.is_file().then(|| Ok(path)),
                Err(err) => Some(Err(err.into())),
            })
            .collect::<Result<Vec<_>>>()?;

        paths.sort();

        Ok(paths)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_str() {
        let input = "cond = test3 > 2 ? 1: 0\nname = \"a&b\"";

        assert_eq!(
            convert_str(input, "", &ConvertOptions::default()).unwrap(),
            "{\"cond\":\"${test3 \\u003e 2 ? 1: 0}\",\"name\":\"a\\u0026b\"}"
        );

        let opts = ConvertOptions {
            escape_html: false,
            ..Default::default()
        };

        assert_eq!(
            convert_str(input, "", &opts).unwrap(),
            r#"{"cond":"${test3 > 2 ? 1: 0}","name":"a&b"}"#
        );
    }

    #[test]
    fn test_convert_bytes() {
        let opts = ConvertOptions::default();

        assert_eq!(convert_bytes(b"", "", &opts).unwrap(), b"{}");
        assert_eq!(
            convert_bytes(b"b = 1\na = [true, null]", "", &opts).unwrap(),
            br#"{"a":[true,null],"b":1}"#
        );
        assert!(matches!(
            convert_bytes(b"a = \"\xff\"", "", &opts),
            Err(Error::InvalidUtf8(_))
        ));
        assert!(matches!(
            convert_bytes(b"resource {", "main.tf", &opts),
            Err(Error::Syntax(msg)) if msg.contains("main.tf")
        ));
    }

    #[test]
    fn test_convert_large_integers() {
        let opts = ConvertOptions::default();

        assert_eq!(
            convert_str("a = 12345678901234567890\nb = -9223372036854775808", "", &opts).unwrap(),
            r#"{"a":12345678901234567890,"b":-9223372036854775808}"#
        );
    }

    #[test]
    fn test_convert_surrogate_pairs() {
        let opts = ConvertOptions::default();

        assert_eq!(
            convert_str(r#"a = "\uD83D\uDE00""#, "", &opts).unwrap(),
            "{\"a\":\"\u{1F600}\"}"
        );
        assert!(matches!(
            convert_str(r#"a = "\uD83D""#, "", &opts),
            Err(Error::Syntax(_))
        ));
    }

    #[test]
    fn test_to_value_keeps_source_order() {
        let value = to_value("b = 1\na = 2", "").unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().collect();

        assert_eq!(keys, ["b", "a"]);
    }
}
