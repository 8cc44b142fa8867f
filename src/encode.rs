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

//! Content transfer encodings.
//!
//! The filters applied to message content so that it survives 7-bit
//! transport: identity for `7bit`, `8bit` and `binary`, streaming
//! Quoted-Printable (RFC 2045, section 6.7) and streaming base64 (RFC 2045,
//! section 6.8), both with 76-column output lines.

use crate::util::CanonicalStr;
use base64ct::{Base64, Encoding};
use std::{
    fmt::{self, Display, Formatter},
    io::{self, Write},
};

/// Maximum length of an encoded output line, excluding the CRLF.
const LINE_WIDTH: usize = 76;

/// Input bytes consumed per full base64 output line.
const BASE64_LINE_INPUT: usize = 57;

/// A content transfer encoding.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TransferEncoding {
    /// 7-bit ASCII content, written as-is.
    #[default]
    SevenBit,
    /// 8-bit content, written as-is.
    EightBit,
    /// Arbitrary binary content, written as-is.
    Binary,
    /// Quoted-Printable content encoding.
    QuotedPrintable,
    /// Base64 content encoding.
    Base64,
}

impl TransferEncoding {
    /// Looks up an encoding by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("7bit") {
            Some(Self::SevenBit)
        } else if name.eq_ignore_ascii_case("8bit") {
            Some(Self::EightBit)
        } else if name.eq_ignore_ascii_case("binary") {
            Some(Self::Binary)
        } else if name.eq_ignore_ascii_case("quoted-printable") {
            Some(Self::QuotedPrintable)
        } else if name.eq_ignore_ascii_case("base64") {
            Some(Self::Base64)
        } else {
            None
        }
    }

    /// Whether content passes through this encoding unchanged.
    pub fn is_identity(self) -> bool {
        matches!(self, Self::SevenBit | Self::EightBit | Self::Binary)
    }
}

impl CanonicalStr for TransferEncoding {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::SevenBit => "7bit",
            Self::EightBit => "8bit",
            Self::Binary => "binary",
            Self::QuotedPrintable => "quoted-printable",
            Self::Base64 => "base64",
        }
    }
}

impl Display for TransferEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

/// A write-through encoding filter.
///
/// Bytes written to the filter are encoded and forwarded to the underlying
/// sink. The filter holds partial state between writes (a held-back
/// whitespace byte for Quoted-Printable, an incomplete input line for
/// base64); [`finish`] emits it and flushes the sink. Dropping the writer
/// without finishing loses that state.
///
/// [`finish`]: EncodingWriter::finish
pub struct EncodingWriter<W> {
    sink: W,
    codec: Codec,
}

enum Codec {
    Identity,
    QuotedPrintable {
        line_len: usize,
        pending_wsp: Option<u8>,
        skip_lf: bool,
    },
    Base64 {
        pending: Vec<u8>,
    },
}

impl<W: Write> EncodingWriter<W> {
    pub fn new(sink: W, encoding: TransferEncoding) -> Self {
        let codec = match encoding {
            TransferEncoding::QuotedPrintable => Codec::QuotedPrintable {
                line_len: 0,
                pending_wsp: None,
                skip_lf: false,
            },
            TransferEncoding::Base64 => Codec::Base64 {
                pending: Vec::with_capacity(BASE64_LINE_INPUT),
            },
            _ => Codec::Identity,
        };
        Self { sink, codec }
    }

    /// Emits any buffered encoder state, flushes, and returns the sink.
    pub fn finish(mut self) -> io::Result<W> {
        match &mut self.codec {
            Codec::Identity => {}
            Codec::QuotedPrintable {
                line_len,
                pending_wsp,
                ..
            } => {
                // whitespace at the very end of the data must not be left
                // literal
                if let Some(wsp) = pending_wsp.take() {
                    qp_emit(&mut self.sink, line_len, &qp_escape(wsp))?;
                }
            }
            Codec::Base64 { pending } => {
                if !pending.is_empty() {
                    let mut line = Base64::encode_string(pending.as_slice());
                    line.push_str("\r\n");
                    self.sink.write_all(line.as_bytes())?;
                    pending.clear();
                }
            }
        }
        self.sink.flush()?;
        Ok(self.sink)
    }
}

impl<W: Write> Write for EncodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.codec {
            Codec::Identity => return self.sink.write(buf),
            Codec::QuotedPrintable {
                line_len,
                pending_wsp,
                skip_lf,
            } => {
                for &b in buf {
                    qp_byte(&mut self.sink, line_len, pending_wsp, skip_lf, b)?;
                }
            }
            Codec::Base64 { pending } => {
                pending.extend_from_slice(buf);
                while pending.len() >= BASE64_LINE_INPUT {
                    let rest = pending.split_off(BASE64_LINE_INPUT);
                    let mut line = Base64::encode_string(pending.as_slice());
                    line.push_str("\r\n");
                    self.sink.write_all(line.as_bytes())?;
                    *pending = rest;
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

fn qp_byte<W: Write>(
    sink: &mut W,
    line_len: &mut usize,
    pending_wsp: &mut Option<u8>,
    skip_lf: &mut bool,
    b: u8,
) -> io::Result<()> {
    if b == b'\n' && *skip_lf {
        *skip_lf = false;
        return Ok(());
    }
    *skip_lf = false;

    // CR, LF and CRLF all become a hard CRLF break; whitespace before a
    // break must be encoded, not left literal
    if b == b'\r' || b == b'\n' {
        if let Some(wsp) = pending_wsp.take() {
            qp_emit(sink, line_len, &qp_escape(wsp))?;
        }
        sink.write_all(b"\r\n")?;
        *line_len = 0;
        *skip_lf = b == b'\r';
        return Ok(());
    }

    if let Some(wsp) = pending_wsp.take() {
        qp_emit(sink, line_len, &[wsp])?;
    }

    if b == b' ' || b == b'\t' {
        *pending_wsp = Some(b);
    } else if (33..=126).contains(&b) && b != b'=' {
        qp_emit(sink, line_len, &[b])?;
    } else {
        qp_emit(sink, line_len, &qp_escape(b))?;
    }
    Ok(())
}

/// Writes one literal or escaped token, inserting a soft line break when the
/// token would not fit before the wrap column.
fn qp_emit<W: Write>(sink: &mut W, line_len: &mut usize, token: &[u8]) -> io::Result<()> {
    if *line_len + token.len() > LINE_WIDTH - 1 {
        sink.write_all(b"=\r\n")?;
        *line_len = 0;
    }
    sink.write_all(token)?;
    *line_len += token.len();
    Ok(())
}

fn qp_escape(b: u8) -> [u8; 3] {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    [b'=', HEX[usize::from(b >> 4)], HEX[usize::from(b & 0xf)]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(encoding: TransferEncoding, input: &[u8]) -> Vec<u8> {
        let mut writer = EncodingWriter::new(Vec::new(), encoding);
        writer.write_all(input).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn from_name_ok() {
        assert_eq!(
            TransferEncoding::from_name("Quoted-Printable"),
            Some(TransferEncoding::QuotedPrintable)
        );
        assert_eq!(TransferEncoding::from_name("7BIT"), Some(TransferEncoding::SevenBit));

        assert_eq!(TransferEncoding::from_name("uuencode"), None);
    }

    #[test]
    fn identity_passthrough() {
        assert_eq!(encode(TransferEncoding::SevenBit, b"abc \xff\r\n"), b"abc \xff\r\n");
        assert_eq!(encode(TransferEncoding::Binary, b"\x00\x01"), b"\x00\x01");
    }

    #[test]
    fn qp_plain_text() {
        assert_eq!(encode(TransferEncoding::QuotedPrintable, b"pure ascii text"), b"pure ascii text");
    }

    #[test]
    fn qp_escapes() {
        assert_eq!(encode(TransferEncoding::QuotedPrintable, b"caf\xc3\xa9"), b"caf=C3=A9");
        assert_eq!(encode(TransferEncoding::QuotedPrintable, b"a=b"), b"a=3Db");
    }

    #[test]
    fn qp_trailing_whitespace() {
        assert_eq!(encode(TransferEncoding::QuotedPrintable, b"trailing \r\nx"), b"trailing=20\r\nx");
        assert_eq!(encode(TransferEncoding::QuotedPrintable, b"tab\t"), b"tab=09");
    }

    #[test]
    fn qp_line_breaks_normalized() {
        assert_eq!(
            encode(TransferEncoding::QuotedPrintable, b"a\r\nb\nc\rd"),
            b"a\r\nb\r\nc\r\nd"
        );
    }

    #[test]
    fn qp_soft_line_break() {
        let input = vec![b'x'; 100];
        let mut expected = vec![b'x'; 75];
        expected.extend_from_slice(b"=\r\n");
        expected.extend_from_slice(&[b'x'; 25]);
        assert_eq!(encode(TransferEncoding::QuotedPrintable, &input), expected);
    }

    #[test]
    fn base64_basic() {
        assert_eq!(encode(TransferEncoding::Base64, b"Hello\r\n"), b"SGVsbG8NCg==\r\n");
        assert_eq!(encode(TransferEncoding::Base64, b""), b"");
    }

    #[test]
    fn base64_line_wrapping() {
        let input = vec![b'A'; 58];

        let mut expected = "QUFB".repeat(19);
        expected.push_str("\r\n");
        expected.push_str("QQ==\r\n");

        assert_eq!(encode(TransferEncoding::Base64, &input), expected.as_bytes());
    }

    #[test]
    fn base64_split_writes() {
        let mut writer = EncodingWriter::new(Vec::new(), TransferEncoding::Base64);
        writer.write_all(b"Hel").unwrap();
        writer.write_all(b"lo\r\n").unwrap();
        assert_eq!(writer.finish().unwrap(), b"SGVsbG8NCg==\r\n");
    }
}
