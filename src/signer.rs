//! The signer collaborator interface.

use crate::{body::EncodedBody, header::HeaderLine, message::SignableMessage};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// An error produced by a [`HeaderSigner`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SigningError {
    /// A header required by the signature profile is missing from the
    /// message.
    MissingRequiredHeader,
    /// The requested canonicalization is not supported.
    UnsupportedCanonicalization,
    /// The signing key could not be used.
    KeyFailure,
    /// The cryptographic signing operation failed.
    SigningFailure,
}

impl Display for SigningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredHeader => write!(f, "required header not present"),
            Self::UnsupportedCanonicalization => write!(f, "canonicalization not supported"),
            Self::KeyFailure => write!(f, "signing key unusable"),
            Self::SigningFailure => write!(f, "signing operation failed"),
        }
    }
}

impl Error for SigningError {}

/// A read-only view of a message whose body has been frozen for signing.
///
/// A signature covers the canonicalized headers and the exact body bytes
/// that will be transmitted; both are available here. The frozen body lives
/// only for the duration of one serialization call.
pub struct SigningView<'a> {
    message: &'a dyn SignableMessage,
    encoded_body: &'a EncodedBody,
}

impl<'a> SigningView<'a> {
    pub(crate) fn new(message: &'a dyn SignableMessage, encoded_body: &'a EncodedBody) -> Self {
        Self {
            message,
            encoded_body,
        }
    }

    /// All header lines of the message, in their original order.
    pub fn header_lines(&self) -> Box<dyn Iterator<Item = &'a HeaderLine> + 'a> {
        self.message.header_lines()
    }

    /// The frozen body, byte-identical to the bytes written out after the
    /// headers.
    pub fn encoded_body(&self) -> &'a EncodedBody {
        self.encoded_body
    }
}

/// A trait for producing a signature header over a frozen message.
///
/// The signer owns canonicalization algorithm selection, hashing and the
/// cryptographic signature. It is invoked exactly once per serialization
/// and returns one complete, ready-to-emit header line including the header
/// name and excluding the trailing CRLF, for example
/// `DKIM-Signature: v=1; a=rsa-sha256; ...`.
pub trait HeaderSigner {
    /// Computes the signature header line for the message.
    fn sign_header(&self, message: &SigningView<'_>) -> Result<String, SigningError>;
}

impl<S: HeaderSigner + ?Sized> HeaderSigner for &S {
    fn sign_header(&self, message: &SigningView<'_>) -> Result<String, SigningError> {
        (**self).sign_header(message)
    }
}
