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

//! A library serializing outgoing email messages with a DKIM signature.
//!
//! A DKIM signature is computed over canonicalized header and body octets;
//! any divergence between the bytes handed to the signer and the bytes put
//! on the wire invalidates it. This library owns that boundary: it freezes
//! the message body into a single immutable buffer, obtains one
//! ready-to-emit signature header line from a signer, and writes the
//! signature header, the remaining headers and exactly the frozen body
//! bytes to a sink.
//!
//! Signing itself is not implemented here. The [`HeaderSigner`] trait is
//! the boundary to an implementation owning canonicalization, hashing and
//! the private key, and the [`SignableMessage`] trait is the boundary to a
//! message representation. [`MemoryMail`] is a minimal flat message for
//! callers that do not bring their own.
//!
//! Serialization also pins the message to 7-bit-safe transport: a request
//! to switch to 8-bit transport encoding is silently overridden, because a
//! downstream relay re-encoding 8-bit content would break the signed body
//! hash.
//!
//! # Usage
//!
//! ```
//! use dkimseal::{
//!     DkimMessage, HeaderSigner, MemoryMail, SigningError, SigningView, TransferEncoding,
//! };
//!
//! // A stand-in for a real DKIM signer implementation.
//! struct StaticSigner;
//!
//! impl HeaderSigner for StaticSigner {
//!     fn sign_header(&self, _message: &SigningView<'_>) -> Result<String, SigningError> {
//!         Ok("DKIM-Signature: v=1; a=rsa-sha256; d=example.com; s=sel; b=".into())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut mail = MemoryMail::new();
//! mail.append_header("From", "alice@example.com")?;
//! mail.append_header("To", "bob@example.com")?;
//! mail.set_content("Hello, Bob!\r\n", TransferEncoding::QuotedPrintable);
//!
//! let mut message = DkimMessage::new(mail, StaticSigner);
//!
//! let mut out = Vec::new();
//! message.write_to(&mut out)?;
//! assert!(out.starts_with(b"DKIM-Signature:"));
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod encode;
pub mod header;
pub mod mail;
pub mod message;
pub mod serialize;
pub mod signer;
mod util;

pub use crate::{
    body::EncodedBody,
    encode::{EncodingWriter, TransferEncoding},
    header::{FieldName, HeaderFieldError, HeaderLine},
    mail::MemoryMail,
    message::{MessageError, SignableMessage},
    serialize::{DkimMessage, SerializeError},
    signer::{HeaderSigner, SigningError, SigningView},
    util::CanonicalStr,
};
