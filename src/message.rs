//! The message collaborator interface.

use crate::header::{HeaderFieldError, HeaderLine};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io::{self, Read, Write},
};

/// An error on the message side of serialization.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MessageError {
    /// Pending changes could not be re-materialized into a consistent
    /// header/content state.
    Commit(Box<str>),
    /// The message has neither materialized content nor a content stream.
    MissingContent,
    /// The declared content transfer encoding is not recognized.
    UnknownTransferEncoding(Box<str>),
    /// A header field could not be represented.
    InvalidHeader(HeaderFieldError),
}

impl Display for MessageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit(reason) => write!(f, "failed to commit pending changes: {reason}"),
            Self::MissingContent => write!(f, "no message content available"),
            Self::UnknownTransferEncoding(name) => {
                write!(f, "unknown content transfer encoding \"{name}\"")
            }
            Self::InvalidHeader(error) => error.fmt(f),
        }
    }
}

impl Error for MessageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidHeader(error) => Some(error),
            _ => None,
        }
    }
}

impl From<HeaderFieldError> for MessageError {
    fn from(error: HeaderFieldError) -> Self {
        Self::InvalidHeader(error)
    }
}

/// A trait for email messages that can be serialized with a signature.
///
/// This is the capability set the serializer needs from a message
/// implementation: committing pending changes, the committed/modified state,
/// access to the content in its three possible forms, ordered header
/// enumeration, and the 8-bit transport flag.
///
/// Content is acquired over the first applicable path, in this order:
///
/// * a *modified* message has its live content written through the filter
///   for its declared transfer encoding ([`write_content`]);
/// * a message without materialized raw content is drained byte for byte
///   from its [`content_stream`];
/// * otherwise [`raw_content`] is copied as-is.
///
/// [`write_content`]: SignableMessage::write_content
/// [`content_stream`]: SignableMessage::content_stream
/// [`raw_content`]: SignableMessage::raw_content
pub trait SignableMessage {
    /// Re-materializes headers and content into a consistent state.
    ///
    /// Idempotent. After a successful call the headers describing the
    /// content encoding match the bytes the content will produce.
    fn commit_changes(&mut self) -> Result<(), MessageError>;

    /// Whether pending structural changes have been committed.
    fn is_committed(&self) -> bool;

    /// Whether the content has been modified since it was last materialized.
    fn is_modified(&self) -> bool;

    /// The declared content transfer encoding name, for example
    /// `"quoted-printable"`.
    ///
    /// `None` means the content needs no encoding and passes through as-is.
    fn transfer_encoding(&self) -> Option<&str>;

    /// Writes the live, unencoded content to `sink`.
    fn write_content(&self, sink: &mut dyn Write) -> io::Result<()>;

    /// The already-materialized, transfer-encoded content bytes, if any.
    fn raw_content(&self) -> Option<&[u8]>;

    /// A reader over the stored content, for messages whose raw content is
    /// not materialized in memory.
    fn content_stream(&self) -> Result<Box<dyn Read + '_>, MessageError>;

    /// All header lines, in their original order, duplicates preserved.
    fn header_lines(&self) -> Box<dyn Iterator<Item = &HeaderLine> + '_>;

    /// Header lines in their original order, skipping those whose name is in
    /// `exclude`.
    ///
    /// Names are matched case-insensitively.
    fn header_lines_excluding<'a>(
        &'a self,
        exclude: &'a [&str],
    ) -> Box<dyn Iterator<Item = &'a HeaderLine> + 'a> {
        Box::new(
            self.header_lines()
                .filter(move |header| !exclude.iter().any(|name| *header.name() == *name)),
        )
    }

    /// Sets the 8-bit-clean transport flag.
    fn set_allow_8bit(&mut self, allow: bool);

    /// Whether 8-bit-clean transport is enabled.
    fn allow_8bit(&self) -> bool;
}
