use base64ct::{Base64, Encoding};
use dkimseal::{HeaderSigner, MemoryMail, SigningError, SigningView, TransferEncoding};
use sha2::{Digest, Sha256};
use std::cell::{Cell, RefCell};

/// A signer that records what it was given and emits a deterministic
/// signature header carrying a real SHA-256 hash of the frozen body.
pub struct MockSigner {
    pub calls: Cell<usize>,
    pub seen_bodies: RefCell<Vec<Vec<u8>>>,
    pub fail: Option<SigningError>,
}

impl MockSigner {
    pub fn new() -> Self {
        Self {
            calls: Cell::new(0),
            seen_bodies: RefCell::new(Vec::new()),
            fail: None,
        }
    }

    pub fn failing(error: SigningError) -> Self {
        Self {
            fail: Some(error),
            ..Self::new()
        }
    }
}

impl HeaderSigner for MockSigner {
    fn sign_header(&self, message: &SigningView<'_>) -> Result<String, SigningError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(error) = self.fail {
            return Err(error);
        }

        let body = message.encoded_body().as_bytes().to_vec();
        let body_hash = Base64::encode_string(Sha256::digest(&body).as_slice());
        self.seen_bodies.borrow_mut().push(body);

        Ok(format!(
            "DKIM-Signature: v=1; a=rsa-sha256; c=relaxed/simple; d=example.com; s=test; \
             bh={body_hash}; h=From:To:Subject; b=dGVzdHNpZ25hdHVyZQ=="
        ))
    }
}

/// A signer that always returns the same header line.
pub struct StaticSigner(pub &'static str);

impl HeaderSigner for StaticSigner {
    fn sign_header(&self, _message: &SigningView<'_>) -> Result<String, SigningError> {
        Ok(self.0.to_owned())
    }
}

pub fn simple_mail() -> MemoryMail {
    let mut mail = MemoryMail::new();
    mail.append_header("From", "alice@example.com").unwrap();
    mail.append_header("To", "bob@example.com").unwrap();
    mail.append_header("Subject", "greetings").unwrap();
    mail
}

pub fn raw_mail(body: &str) -> MemoryMail {
    let mut mail = simple_mail();
    mail.set_raw_content(body, TransferEncoding::SevenBit);
    mail
}

/// Splits serialized output into header lines and body at the empty line.
pub fn split_output(output: &[u8]) -> (Vec<String>, Vec<u8>) {
    let pos = output
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header/body separator");
    let headers = std::str::from_utf8(&output[..pos])
        .unwrap()
        .split("\r\n")
        .map(str::to_owned)
        .collect();
    let body = output[pos + 4..].to_vec();
    (headers, body)
}
