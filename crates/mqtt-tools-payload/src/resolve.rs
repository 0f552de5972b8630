//! Resolution of command-line arguments into message payloads.

use crate::ascii85::{self, Ascii85Error};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

/// How an argument is turned into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// The argument itself, as UTF-8 text
    Literal,
    /// Contents of the file named by the remainder
    FileReference,
    /// Hex-encoded remainder
    HexEncoded,
    /// Standard base64-encoded remainder
    Base64Encoded,
    /// Ascii85-encoded remainder
    Ascii85Encoded,
}

/// Recognized prefixes, in precedence order.
const PREFIXES: [(&str, Directive); 4] = [
    ("@", Directive::FileReference),
    ("hex:", Directive::HexEncoded),
    ("b64:", Directive::Base64Encoded),
    ("a85:", Directive::Ascii85Encoded),
];

impl Directive {
    /// Select the directive for `arg` and return it with the remainder
    /// after the prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use mqtt_tools_payload::Directive;
    ///
    /// assert_eq!(Directive::classify("hex:00ff"), (Directive::HexEncoded, "00ff"));
    /// assert_eq!(Directive::classify("hello"), (Directive::Literal, "hello"));
    /// ```
    #[must_use]
    pub fn classify(arg: &str) -> (Self, &str) {
        PREFIXES
            .iter()
            .find_map(|&(prefix, directive)| {
                arg.strip_prefix(prefix).map(|rest| (directive, rest))
            })
            .unwrap_or((Self::Literal, arg))
    }

    /// Produce the payload bytes for `rest`.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Io`] if a referenced file cannot be read and a
    /// decode error if the remainder is malformed for its encoding.
    pub fn decode(self, rest: &str) -> Result<Vec<u8>, PayloadError> {
        match self {
            Self::Literal => Ok(rest.as_bytes().to_vec()),
            Self::FileReference => fs::read(rest).map_err(|source| PayloadError::Io {
                path: PathBuf::from(rest),
                source,
            }),
            Self::HexEncoded => Ok(hex::decode(rest)?),
            Self::Base64Encoded => Ok(STANDARD.decode(rest)?),
            Self::Ascii85Encoded => Ok(ascii85::decode(rest)?),
        }
    }

    /// Whether payloads of this kind are printable text.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Literal)
    }
}

/// A resolved message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Raw message bytes
    pub bytes: Vec<u8>,
    /// True when the bytes came from literal text and can be logged verbatim
    pub is_text: bool,
}

impl Payload {
    /// Wrap bytes of unknown content, such as standard input.
    #[must_use]
    pub fn binary(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            is_text: false,
        }
    }

    /// Render the payload for a log line.
    ///
    /// Text is shown as-is; anything else as lowercase hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use mqtt_tools_payload::{resolve, Payload};
    ///
    /// assert_eq!(resolve("hello").unwrap().display(), "hello");
    /// assert_eq!(Payload::binary(b"hi".to_vec()).display(), "6869");
    /// ```
    #[must_use]
    pub fn display(&self) -> Cow<'_, str> {
        if self.is_text {
            String::from_utf8_lossy(&self.bytes)
        } else {
            Cow::Owned(hex::encode(&self.bytes))
        }
    }
}

/// Resolve a command-line argument into a payload.
///
/// The first matching prefix wins: `@` (file), `hex:`, `b64:`, `a85:`.
/// Anything else is literal text.
///
/// # Errors
///
/// Returns error if a referenced file cannot be read or an encoded
/// remainder is malformed.
///
/// # Examples
///
/// ```
/// use mqtt_tools_payload::resolve;
///
/// let payload = resolve("b64:aGVsbG8=").unwrap();
/// assert_eq!(payload.bytes, b"hello");
/// assert!(!payload.is_text);
/// ```
pub fn resolve(arg: &str) -> Result<Payload, PayloadError> {
    let (directive, rest) = Directive::classify(arg);
    let bytes = directive.decode(rest)?;

    tracing::debug!(?directive, len = bytes.len(), "Resolved payload argument");

    Ok(Payload {
        bytes,
        is_text: directive.is_text(),
    })
}

/// Errors that can occur while resolving a payload argument.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// Referenced file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path taken from the argument
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// Hex decoding failed
    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
    /// Base64 decoding failed
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Ascii85 decoding failed
    #[error("ascii85 decode error: {0}")]
    Ascii85(#[from] Ascii85Error),
}

impl PayloadError {
    /// True for malformed encoded input, false for I/O failures.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn literal_is_text() {
        for arg in ["hello", "", "hex", "b64", "a85", "x@y", "HEX:00"] {
            let payload = resolve(arg).unwrap();
            assert!(payload.is_text, "{arg:?} should be literal");
            assert_eq!(payload.bytes, arg.as_bytes());
        }
    }

    #[test]
    fn literal_keeps_unicode_bytes() {
        let payload = resolve("grüße ✓").unwrap();
        assert_eq!(payload.bytes, "grüße ✓".as_bytes());
        assert_eq!(payload.display(), "grüße ✓");
    }

    #[test]
    fn prefix_precedence() {
        assert_eq!(Directive::classify("@hex:00").0, Directive::FileReference);
        assert_eq!(Directive::classify("hex:b64:"), (Directive::HexEncoded, "b64:"));
        assert_eq!(Directive::classify("b64:a85:"), (Directive::Base64Encoded, "a85:"));
        assert_eq!(Directive::classify("a85:@x"), (Directive::Ascii85Encoded, "@x"));
        assert_eq!(Directive::classify(" @x"), (Directive::Literal, " @x"));
    }

    #[test]
    fn hex_payload() {
        let payload = resolve("hex:68656c6c6f").unwrap();
        assert_eq!(payload.bytes, b"hello");
        assert!(!payload.is_text);
        assert_eq!(payload.display(), "68656c6c6f");

        assert_eq!(resolve("hex:DEADbeef").unwrap().bytes, [0xde, 0xad, 0xbe, 0xef]);
        assert!(resolve("hex:").unwrap().bytes.is_empty());
    }

    #[test]
    fn hex_round_trip() {
        let data: Vec<u8> = (0..=255u8).collect();
        let payload = resolve(&format!("hex:{}", hex::encode(&data))).unwrap();
        assert_eq!(payload.bytes, data);
    }

    #[test]
    fn hex_rejects_malformed() {
        for arg in ["hex:zz", "hex:abc", "hex:0g"] {
            let err = resolve(arg).unwrap_err();
            assert!(matches!(err, PayloadError::Hex(_)), "{arg}: {err}");
            assert!(err.is_decode());
        }
    }

    #[test]
    fn base64_payload() {
        let payload = resolve("b64:aGVsbG8=").unwrap();
        assert_eq!(payload.bytes, b"hello");
        assert!(!payload.is_text);

        let data: Vec<u8> = (0..=255u8).rev().collect();
        let payload = resolve(&format!("b64:{}", STANDARD.encode(&data))).unwrap();
        assert_eq!(payload.bytes, data);
    }

    #[test]
    fn base64_rejects_malformed() {
        for arg in ["b64:aGVsbG8", "b64:aGVs*G8=", "b64:a==="] {
            let err = resolve(arg).unwrap_err();
            assert!(matches!(err, PayloadError::Base64(_)), "{arg}: {err}");
        }
    }

    #[test]
    fn ascii85_payload() {
        let payload = resolve("a85:BOu!rDZ").unwrap();
        assert_eq!(payload.bytes, b"hello");
        assert!(!payload.is_text);
    }

    #[test]
    fn ascii85_large_payload_is_not_truncated() {
        let data: Vec<u8> = (0..4096u32)
            .map(|i| u8::try_from(i.wrapping_mul(31) % 251).unwrap())
            .collect();
        let payload = resolve(&format!("a85:{}", ascii85::encode(&data))).unwrap();
        assert_eq!(payload.bytes.len(), data.len());
        assert_eq!(payload.bytes, data);
    }

    #[test]
    fn ascii85_rejects_malformed() {
        let err = resolve("a85:BOu!rD").unwrap_err();
        assert!(matches!(err, PayloadError::Ascii85(Ascii85Error::TruncatedGroup { .. })));
        assert!(err.is_decode());
    }

    #[test]
    fn file_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let contents = [0u8, 1, 2, 0xff, b'\n', b'x'];
        file.write_all(&contents).unwrap();

        let payload = resolve(&format!("@{}", file.path().display())).unwrap();
        assert_eq!(payload.bytes, contents);
        assert!(!payload.is_text);
    }

    #[test]
    fn file_missing() {
        let err = resolve("@/nonexistent/path").unwrap_err();
        assert!(matches!(err, PayloadError::Io { .. }));
        assert!(!err.is_decode());
        assert!(err.to_string().contains("/nonexistent/path"));
    }

    #[test]
    fn file_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(&format!("@{}", dir.path().display())).unwrap_err();
        assert!(matches!(err, PayloadError::Io { .. }));
    }

    #[test]
    fn binary_display_is_lowercase_hex() {
        let payload = Payload::binary(vec![0xAB, 0x00, 0x7f]);
        assert_eq!(payload.display(), "ab007f");
    }
}
