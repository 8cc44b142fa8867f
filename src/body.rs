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

//! Frozen message bodies.

use crate::{
    encode::{EncodingWriter, TransferEncoding},
    message::{MessageError, SignableMessage},
    serialize::SerializeError,
};
use bstr::ByteSlice;
use std::{
    fmt::{self, Debug, Formatter},
    io,
};
use tracing::trace;

/// A byte-for-byte snapshot of a message body as it will be transmitted.
///
/// The snapshot is taken once per serialization call. The signature is
/// computed over these bytes, and exactly these bytes are written after the
/// headers; there is no re-encoding in between.
#[derive(Clone, Eq, PartialEq)]
pub struct EncodedBody(Box<[u8]>);

impl EncodedBody {
    /// Freezes the message body into a snapshot.
    ///
    /// Pending changes are committed first when necessary, so that the
    /// headers describing the encoding match the bytes produced here. The
    /// content is then acquired over the first applicable path: modified
    /// content is written through the filter for the declared transfer
    /// encoding, content without materialized raw bytes is drained from the
    /// message's content stream, and already-materialized raw bytes are
    /// copied as-is.
    pub fn freeze(message: &mut dyn SignableMessage) -> Result<Self, SerializeError> {
        if !message.is_committed() {
            message.commit_changes()?;
        }

        let mut buffer = Vec::new();
        if message.is_modified() {
            let encoding = match message.transfer_encoding() {
                Some(name) => TransferEncoding::from_name(name)
                    .ok_or_else(|| MessageError::UnknownTransferEncoding(name.into()))?,
                None => TransferEncoding::default(),
            };
            trace!(encoding = %encoding, "encoding modified content");
            let mut filter = EncodingWriter::new(&mut buffer, encoding);
            message.write_content(&mut filter)?;
            filter.finish()?;
        } else if let Some(content) = message.raw_content() {
            trace!("copying materialized content");
            buffer.extend_from_slice(content);
        } else {
            trace!("draining content stream");
            let mut stream = message.content_stream()?;
            io::copy(&mut stream, &mut buffer)?;
        }

        trace!(len = buffer.len(), "message body frozen");
        Ok(Self(buffer.into_boxed_slice()))
    }

    /// The body bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for EncodedBody {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for EncodedBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncodedBody").field(&self.0.as_bstr()).finish()
    }
}
