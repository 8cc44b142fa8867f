// dkimseal – serialization of DKIM-signed email messages
// Copyright © 2026 The dkimseal developers
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.

//! Signed serialization of messages.

use crate::{
    body::EncodedBody,
    message::{MessageError, SignableMessage},
    signer::{HeaderSigner, SigningError, SigningView},
};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io::{self, Write},
};
use tracing::trace;

const CRLF: &[u8] = b"\r\n";

/// An error that occurs while serializing a signed message.
#[derive(Debug)]
pub enum SerializeError {
    /// Reading content or writing to the sink failed.
    Io(io::Error),
    /// The message could not provide a consistent view of itself.
    Message(MessageError),
    /// The signer could not produce a signature header.
    Signing(SigningError),
}

impl Display for SerializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => error.fmt(f),
            Self::Message(error) => error.fmt(f),
            Self::Signing(error) => error.fmt(f),
        }
    }
}

impl Error for SerializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Message(error) => Some(error),
            Self::Signing(error) => Some(error),
        }
    }
}

impl From<io::Error> for SerializeError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<MessageError> for SerializeError {
    fn from(error: MessageError) -> Self {
        Self::Message(error)
    }
}

impl From<SigningError> for SerializeError {
    fn from(error: SigningError) -> Self {
        Self::Signing(error)
    }
}

/// A message paired with the signer that will sign it.
///
/// The pair serializes to an RFC 822 byte stream whose first header is the
/// freshly computed signature header. Any [`SignableMessage`]
/// implementation can be wrapped; the serializer composes with the message
/// rather than extending a concrete message type.
///
/// See the crate-level documentation for a complete example.
pub struct DkimMessage<M, S> {
    message: M,
    signer: S,
}

impl<M, S> DkimMessage<M, S>
where
    M: SignableMessage,
    S: HeaderSigner,
{
    /// Pairs a message with a signer.
    ///
    /// The message's 8-bit transport flag is cleared here, and stays
    /// cleared; see [`set_allow_8bit`](Self::set_allow_8bit).
    pub fn new(message: M, signer: S) -> Self {
        let mut message = message;
        message.set_allow_8bit(false);
        Self { message, signer }
    }

    /// The wrapped message.
    pub fn message(&self) -> &M {
        &self.message
    }

    /// Releases the wrapped message.
    pub fn into_message(self) -> M {
        self.message
    }

    /// Requests 8-bit-clean transport for the message.
    ///
    /// The request is overridden: the flag is always left at 7-bit,
    /// whatever the argument. A relay that may pass 8-bit content through a
    /// 7-bit hop can re-encode the body in transit, which breaks the signed
    /// body hash; keeping a 7-bit-safe transfer encoding prevents that.
    pub fn set_allow_8bit(&mut self, _allow: bool) {
        self.message.set_allow_8bit(false);
    }

    /// Serializes the signed message to `sink`.
    ///
    /// Equivalent to [`write_to_excluding`](Self::write_to_excluding) with
    /// an empty exclusion set.
    pub fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<(), SerializeError> {
        self.write_to_excluding(sink, &[])
    }

    /// Serializes the signed message to `sink`, omitting headers named in
    /// `exclude`.
    ///
    /// The body is frozen first and the signer is invoked once on the
    /// frozen bytes; the signature is recomputed on every call. Output
    /// order is fixed: signature header line, the remaining header lines in
    /// their original order, one empty line, then the frozen body bytes
    /// verbatim. Every header line and the separator are CRLF-terminated,
    /// independent of the host platform's line endings. The sink is flushed
    /// but not closed.
    ///
    /// # Errors
    ///
    /// Message and signer failures surface before anything is written. A
    /// failure while writing leaves a truncated stream in the sink; the
    /// output must then be discarded.
    pub fn write_to_excluding<W: Write + ?Sized>(
        &mut self,
        sink: &mut W,
        exclude: &[&str],
    ) -> Result<(), SerializeError> {
        let body = EncodedBody::freeze(&mut self.message)?;

        let view = SigningView::new(&self.message, &body);
        let signature_line = self.signer.sign_header(&view)?;
        trace!(len = signature_line.len(), "signature header obtained");

        write_line(sink, &signature_line)?;
        for header in self.message.header_lines_excluding(exclude) {
            write_line(sink, header.as_str())?;
        }
        sink.write_all(CRLF)?;
        sink.flush()?;

        sink.write_all(body.as_bytes())?;
        sink.flush()?;

        Ok(())
    }
}

/// Writes a CRLF-terminated header line.
fn write_line<W: Write + ?Sized>(sink: &mut W, line: &str) -> io::Result<()> {
    sink.write_all(&line_bytes(line))?;
    sink.write_all(CRLF)
}

/// Transcodes header text to bytes by truncating each character to its low
/// eight bits.
///
/// This is the historical RFC 822 transport convention for header text, not
/// a general text encoding; callers must not put characters above U+00FF in
/// header lines.
fn line_bytes(line: &str) -> Vec<u8> {
    line.chars().map(|c| c as u8).collect()
}
