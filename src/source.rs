use crate::{Error, PathExt, Result};
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A source of HCL input.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Stdin source.
    Stdin,
    /// Local file or directory source.
    Path(PathBuf),
}

impl Source {
    /// Returns `Some` if the source is a local path, `None` otherwise.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Stdin => None,
        }
    }

    /// Returns `true` if the `Source` is a local path and the path exists on disk and is pointing
    /// at a directory.
    pub fn is_dir(&self) -> bool {
        self.as_path().map(|path| path.is_dir()).unwrap_or(false)
    }

    /// The name used to refer to the source in syntax errors. Empty for stdin.
    pub fn filename(&self) -> String {
        match self {
            Self::Stdin => String::new(),
            Self::Path(_) => self.to_string(),
        }
    }

    /// If source is a local path, this returns sources for all files matching the glob pattern.
    ///
    /// ## Errors
    ///
    /// Returns an error if the source is not of variant `Source::Path`, the pattern is invalid or
    /// if there is a `io::Error` while reading the file system.
    pub fn glob_files(&self, pattern: &str) -> Result<Vec<Source>> {
        match self.as_path() {
            Some(path) => Ok(path
                .glob_files(pattern)?
                .iter()
                .map(|path| Self::from(path.as_path()))
                .collect()),
            None => Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "stdin cannot be globbed",
            ))),
        }
    }

    /// Returns a reader to read from the source.
    ///
    /// ## Errors
    ///
    /// May return an error if the source is `Source::Path` and the file cannot be opened.
    pub fn to_reader(&self) -> Result<Box<dyn Read>> {
        let reader: Box<dyn Read> = match self {
            Self::Stdin => Box::new(io::stdin()),
            Self::Path(path) => Box::new(fs::File::open(path)?),
        };

        Ok(reader)
    }

    /// Reads the complete source into memory.
    ///
    /// ## Errors
    ///
    /// Returns an error if the source cannot be opened or read.
    pub fn read_to_end(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.to_reader()?.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        if s == "-" {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(s))
        }
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(From::from(s))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
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

    #[test]
    fn test_from_str() {
        assert_eq!(Source::from_str("-"), Ok(Source::Stdin));
        assert_eq!(
            Source::from_str("main.tf"),
            Ok(Source::Path(PathBuf::from("main.tf")))
        );
    }

    #[test]
    fn test_to_string() {
        assert_eq!(&Source::Stdin.to_string(), "<stdin>");
        assert_eq!(&Source::from("Cargo.toml").to_string(), "Cargo.toml");
        assert_eq!(
            &Source::from(std::fs::canonicalize("src/lib.rs").unwrap().as_path()).to_string(),
            "src/lib.rs"
        );
        assert_eq!(
            &Source::from("/non-existent/path").to_string(),
            "/non-existent/path"
        );
    }

    #[test]
    fn test_filename() {
        assert_eq!(Source::Stdin.filename(), "");
        assert_eq!(Source::from("Cargo.toml").filename(), "Cargo.toml");
    }

    #[test]
    fn test_glob_files() {
        let sources = Source::from("tests/fixtures").glob_files("*.hcl").unwrap();
        assert!(sources.contains(&Source::from("tests/fixtures/single-provider.hcl")));
        assert!(sources.iter().all(|source| !source.is_dir()));

        assert!(Source::from("-").glob_files("*.hcl").is_err());
        assert!(matches!(
            Source::from("src/").glob_files("***"),
            Err(Error::GlobPattern { .. })
        ));
    }

    #[test]
    fn test_read_to_end() {
        let source = Source::from("tests/fixtures/single-provider.hcl");
        let content = source.read_to_end().unwrap();
        assert!(content.starts_with(b"\nprovider \"aws\""));
        assert!(Source::from("/non-existent/path").read_to_end().is_err());
    }
}
