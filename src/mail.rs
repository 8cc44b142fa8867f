//! A minimal in-memory message.

use crate::{
    encode::TransferEncoding,
    header::{HeaderFieldError, HeaderLine},
    message::{MessageError, SignableMessage},
    util::CanonicalStr,
};
use std::io::{self, Read, Write};

/// A flat in-memory message: an ordered header list, one content part, and
/// a declared content transfer encoding.
///
/// This is not a MIME object model; there is no multipart structure and no
/// parsing. It is the smallest message that can carry a signed
/// serialization.
///
/// A message whose content was set with [`set_content`] is *modified*: its
/// content is written through the declared transfer encoding filter when
/// the body is produced, and [`commit_changes`] re-materializes the
/// *Content-Transfer-Encoding* header to match. A message whose content was
/// set with [`set_raw_content`] carries already-encoded wire bytes, which
/// are emitted as-is.
///
/// [`set_content`]: MemoryMail::set_content
/// [`set_raw_content`]: MemoryMail::set_raw_content
/// [`commit_changes`]: SignableMessage::commit_changes
#[derive(Clone, Debug)]
pub struct MemoryMail {
    headers: Vec<HeaderLine>,
    content: Vec<u8>,
    raw_content: Option<Vec<u8>>,
    encoding: TransferEncoding,
    committed: bool,
    modified: bool,
    allow_8bit: bool,
}

impl MemoryMail {
    /// Creates an empty message with a `7bit` transfer encoding.
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            content: Vec::new(),
            raw_content: None,
            encoding: TransferEncoding::SevenBit,
            committed: false,
            modified: true,
            allow_8bit: false,
        }
    }

    /// The header lines, in order.
    pub fn headers(&self) -> &[HeaderLine] {
        &self.headers
    }

    /// Appends a header line, keeping any existing lines with the same
    /// name.
    pub fn append_header(&mut self, name: &str, value: &str) -> Result<(), HeaderFieldError> {
        self.headers.push(HeaderLine::new(name, value)?);
        Ok(())
    }

    /// Replaces the first header with the given name and removes any
    /// further ones; appends when absent.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HeaderFieldError> {
        let header = HeaderLine::new(name, value)?;
        if let Some(index) = self.headers.iter().position(|h| *h.name() == name) {
            self.headers[index] = header;
            let mut i = index + 1;
            while i < self.headers.len() {
                if *self.headers[i].name() == name {
                    self.headers.remove(i);
                } else {
                    i += 1;
                }
            }
        } else {
            self.headers.push(header);
        }
        Ok(())
    }

    /// Removes all headers with the given name.
    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|h| *h.name() != name);
    }

    /// Sets the live content and its target transfer encoding.
    ///
    /// Marks the message modified: the content will be written through the
    /// encoding filter when the body is produced.
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>, encoding: TransferEncoding) {
        self.content = content.into();
        self.encoding = encoding;
        self.raw_content = None;
        self.modified = true;
        self.committed = false;
    }

    /// Sets already-encoded wire content, as read from an existing message.
    ///
    /// The bytes are emitted as-is. The headers are taken to describe these
    /// bytes already, so the message counts as committed and unmodified.
    pub fn set_raw_content(&mut self, raw: impl Into<Vec<u8>>, encoding: TransferEncoding) {
        self.raw_content = Some(raw.into());
        self.encoding = encoding;
        self.modified = false;
        self.committed = true;
    }
}

impl Default for MemoryMail {
    fn default() -> Self {
        Self::new()
    }
}

impl SignableMessage for MemoryMail {
    fn commit_changes(&mut self) -> Result<(), MessageError> {
        if self.modified {
            self.set_header("Content-Transfer-Encoding", self.encoding.canonical_str())?;
        }
        self.committed = true;
        Ok(())
    }

    fn is_committed(&self) -> bool {
        self.committed
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn transfer_encoding(&self) -> Option<&str> {
        Some(self.encoding.canonical_str())
    }

    fn write_content(&self, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(&self.content)
    }

    fn raw_content(&self) -> Option<&[u8]> {
        self.raw_content.as_deref()
    }

    fn content_stream(&self) -> Result<Box<dyn Read + '_>, MessageError> {
        match &self.raw_content {
            Some(raw) => Ok(Box::new(raw.as_slice())),
            None => Err(MessageError::MissingContent),
        }
    }

    fn header_lines(&self) -> Box<dyn Iterator<Item = &HeaderLine> + '_> {
        Box::new(self.headers.iter())
    }

    fn set_allow_8bit(&mut self, allow: bool) {
        self.allow_8bit = allow;
    }

    fn allow_8bit(&self) -> bool {
        self.allow_8bit
    }
}
