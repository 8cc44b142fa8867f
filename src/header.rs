//! Representation of email header data.

use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

/// An error indicating an invalid header field name or header line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderFieldError;

impl Display for HeaderFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid header field")
    }
}

impl std::error::Error for HeaderFieldError {}

/// A header field name.
///
/// Field names compare and hash case-insensitively, the way header names are
/// matched in mail processing.
#[derive(Clone, Eq)]
pub struct FieldName(Box<str>);

impl FieldName {
    pub fn new(value: impl Into<Box<str>>) -> Result<Self, HeaderFieldError> {
        let value = value.into();
        if value.is_empty() {
            return Err(HeaderFieldError);
        }
        if !value.chars().all(|c| c.is_ascii_graphic() && c != ':') {
            return Err(HeaderFieldError);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Debug for FieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for FieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq for FieldName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl PartialEq<&str> for FieldName {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for FieldName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

/// A complete header line as it appears on the wire, without the trailing
/// CRLF.
///
/// The line may be folded: continuation lines are separated by CRLF and start
/// with space or tab. The field name is kept alongside the line for matching;
/// the stored line is emitted byte for byte, which is what a signature
/// computed over the serialized header requires.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderLine {
    name: FieldName,
    line: String,
}

impl HeaderLine {
    /// Creates a header line from a name and a value.
    ///
    /// A single space is inserted after the colon; the value must not carry
    /// its own leading whitespace.
    pub fn new(name: impl Into<Box<str>>, value: &str) -> Result<Self, HeaderFieldError> {
        let name = FieldName::new(name)?;
        check_value(value)?;
        let line = format!("{}: {}", name.as_ref(), value);
        Ok(Self { name, line })
    }

    /// Creates a header line from a complete raw line, for example
    /// `"From: me@example.org"`.
    ///
    /// The line is stored verbatim.
    pub fn from_line(line: impl Into<String>) -> Result<Self, HeaderFieldError> {
        let line = line.into();
        let (name, value) = line.split_once(':').ok_or(HeaderFieldError)?;
        let name = FieldName::new(name)?;
        check_value(value)?;
        Ok(Self { name, line })
    }

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// The complete line, without the trailing CRLF.
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl Display for HeaderLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

fn check_value(value: &str) -> Result<(), HeaderFieldError> {
    for (i, line) in value.split("\r\n").enumerate() {
        // no stray CR and LF
        if line.contains('\r') || line.contains('\n') {
            return Err(HeaderFieldError);
        }
        if i > 0 {
            // only folded continuation lines, none of them blank, no
            // trailing CRLF
            if !line.starts_with(' ') && !line.starts_with('\t') {
                return Err(HeaderFieldError);
            }
            if line.chars().all(|c| c == ' ' || c == '\t') {
                return Err(HeaderFieldError);
            }
        }
    }
    Ok(())
}
