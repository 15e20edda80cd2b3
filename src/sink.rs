use crate::{Error, PathExt, Result};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Where converted JSON is written to. `-` on the command line selects stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum Sink {
    /// Stdout sink.
    Stdout,
    /// Output file.
    Path(PathBuf),
}

impl Sink {
    /// Checks that the sink can be written to without clobbering existing data.
    ///
    /// Stdout and paths that do not exist yet are always writable. An existing regular file is
    /// only writable if `overwrite` is set.
    ///
    /// ## Errors
    ///
    /// Returns `Error::SinkNotAFile` if the path exists but is not a regular file and
    /// `Error::SinkExists` if it is a file and `overwrite` is `false`.
    pub fn check_writable(&self, overwrite: bool) -> Result<()> {
        let path = match self {
            Self::Stdout => return Ok(()),
            Self::Path(path) if !path.exists() => return Ok(()),
            Self::Path(path) => path,
        };

        if !path.is_file() {
            Err(Error::SinkNotAFile {
                path: self.to_string(),
            })
        } else if !overwrite {
            Err(Error::SinkExists {
                path: self.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Returns a writer for the sink. Output files are created or truncated.
    ///
    /// ## Errors
    ///
    /// Returns an error if the output file cannot be created.
    pub fn to_writer(&self) -> Result<Box<dyn Write>> {
        let writer: Box<dyn Write> = match self {
            Self::Stdout => Box::new(io::stdout()),
            Self::Path(path) => Box::new(fs::File::create(path)?),
        };

        Ok(writer)
    }
}

impl From<&str> for Sink {
    fn from(s: &str) -> Self {
        match s {
            "-" => Self::Stdout,
            path => Self::Path(PathBuf::from(path)),
        }
    }
}

impl FromStr for Sink {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(From::from(s))
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "<stdout>"),
            // Existing files are shown relative to the working directory.
            Self::Path(path) => path
                .relative_to_cwd()
                .unwrap_or_else(|| path.clone())
                .display()
                .fmt(f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env::temp_dir;

    #[test]
    fn test_from_str() {
        assert_eq!(Sink::from_str("-"), Ok(Sink::Stdout));
        assert_eq!(
            Sink::from_str("out.json"),
            Ok(Sink::Path(PathBuf::from("out.json")))
        );
    }

    #[test]
    fn test_check_writable() {
        assert!(Sink::Stdout.check_writable(false).is_ok());
        assert!(Sink::from("tests/fixtures/missing.json")
            .check_writable(false)
            .is_ok());
        assert!(Sink::from("Cargo.toml").check_writable(true).is_ok());
        assert!(matches!(
            Sink::from("Cargo.toml").check_writable(false),
            Err(Error::SinkExists { path }) if path == "Cargo.toml"
        ));
        assert!(matches!(
            Sink::from("src").check_writable(true),
            Err(Error::SinkNotAFile { path }) if path == "src"
        ));
    }

    #[test]
    fn test_to_writer() {
        let path = temp_dir().join(format!("hcl2json-sink-{}.json", std::process::id()));
        let sink = Sink::Path(path.clone());

        sink.to_writer().unwrap().write_all(b"{}").unwrap();
        assert!(matches!(
            sink.check_writable(false),
            Err(Error::SinkExists { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_to_string() {
        assert_eq!(&Sink::Stdout.to_string(), "<stdout>");
        assert_eq!(&Sink::from("Cargo.toml").to_string(), "Cargo.toml");
        assert_eq!(
            &Sink::Path(fs::canonicalize("src/lib.rs").unwrap()).to_string(),
            "src/lib.rs"
        );
        assert_eq!(&Sink::from("missing/out.json").to_string(), "missing/out.json");
    }
}
