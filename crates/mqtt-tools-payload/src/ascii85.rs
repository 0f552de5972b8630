//! Ascii85 codec (btoa alphabet, no `<~ ~>` framing).
//!
//! Digits are the 85 characters `!`..=`u`. Four bytes map to five digits,
//! most significant first, and an all-zero group is abbreviated to `z`.
//! A trailing group of `n` bytes encodes to `n + 1` digits.
//!
//! Decoding is push-based: a [`Decoder`] appends to a caller-owned `Vec<u8>`,
//! so output is never bounded by a fixed buffer.

/// Value of the first digit `!`.
const DIGIT_BASE: u8 = b'!';
/// Last digit, also used to pad a trailing partial group.
const DIGIT_MAX: u8 = b'u';
/// Digits per 4-byte group.
const GROUP_DIGITS: usize = 5;

/// Incremental ascii85 decoder.
///
/// Feed input with [`Decoder::push`] as many times as needed, then call
/// [`Decoder::finish`] to flush the trailing partial group.
///
/// # Examples
///
/// ```
/// use mqtt_tools_payload::ascii85::Decoder;
///
/// let mut out = Vec::new();
/// let mut decoder = Decoder::new();
/// decoder.push(b"BOu!r", &mut out).unwrap();
/// decoder.push(b"DZ", &mut out).unwrap();
/// decoder.finish(&mut out).unwrap();
/// assert_eq!(out, b"hello");
/// ```
#[derive(Debug, Default)]
pub struct Decoder {
    digits: [u8; GROUP_DIGITS],
    len: usize,
    offset: usize,
}

impl Decoder {
    /// Create a decoder positioned at the start of input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `input`, appending complete groups to `out`.
    ///
    /// Bytes up to and including space are skipped.
    ///
    /// # Errors
    ///
    /// Returns error on a byte outside the alphabet, a `z` inside a group,
    /// or a group whose value does not fit in 32 bits.
    pub fn push(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), Ascii85Error> {
        for &byte in input {
            let offset = self.offset;
            self.offset += 1;

            match byte {
                0..=b' ' => {}
                b'z' if self.len == 0 => out.extend_from_slice(&[0; 4]),
                b'z' => return Err(Ascii85Error::MisplacedZ { offset }),
                DIGIT_BASE..=DIGIT_MAX => {
                    self.digits[self.len] = byte - DIGIT_BASE;
                    self.len += 1;
                    if self.len == GROUP_DIGITS {
                        let word =
                            group_value(&self.digits).ok_or(Ascii85Error::Overflow { offset })?;
                        out.extend_from_slice(&word.to_be_bytes());
                        self.len = 0;
                    }
                }
                _ => return Err(Ascii85Error::InvalidByte { byte, offset }),
            }
        }
        Ok(())
    }

    /// Flush a trailing partial group into `out` and end decoding.
    ///
    /// # Errors
    ///
    /// Returns error if the input ended with a one-digit group, which
    /// carries no complete byte, or if the padded group overflows.
    pub fn finish(self, out: &mut Vec<u8>) -> Result<(), Ascii85Error> {
        match self.len {
            0 => Ok(()),
            1 => Err(Ascii85Error::TruncatedGroup {
                offset: self.offset,
            }),
            len => {
                let mut digits = self.digits;
                digits[len..].fill(DIGIT_MAX - DIGIT_BASE);
                let word = group_value(&digits).ok_or(Ascii85Error::Overflow {
                    offset: self.offset,
                })?;
                out.extend_from_slice(&word.to_be_bytes()[..len - 1]);
                Ok(())
            }
        }
    }
}

/// Decode a complete ascii85 string.
///
/// # Errors
///
/// Returns error if the input is not valid ascii85.
///
/// # Examples
///
/// ```
/// use mqtt_tools_payload::ascii85;
///
/// assert_eq!(ascii85::decode("BOu!rDZ").unwrap(), b"hello");
/// assert_eq!(ascii85::decode("z").unwrap(), [0, 0, 0, 0]);
/// ```
pub fn decode(input: &str) -> Result<Vec<u8>, Ascii85Error> {
    let mut out = Vec::with_capacity(input.len() / GROUP_DIGITS * 4 + 4);
    let mut decoder = Decoder::new();
    decoder.push(input.as_bytes(), &mut out)?;
    decoder.finish(&mut out)?;
    Ok(out)
}

/// Encode bytes as ascii85.
///
/// # Examples
///
/// ```
/// use mqtt_tools_payload::ascii85;
///
/// assert_eq!(ascii85::encode(b"hello"), "BOu!rDZ");
/// ```
#[must_use]
pub fn encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(4) * GROUP_DIGITS);

    for chunk in input.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(word);

        if chunk.len() == 4 && value == 0 {
            out.push('z');
            continue;
        }

        let mut digits = [0u8; GROUP_DIGITS];
        for digit in digits.iter_mut().rev() {
            // value % 85 always fits in a u8
            #[allow(clippy::cast_possible_truncation)]
            let rem = (value % 85) as u8;
            *digit = rem + DIGIT_BASE;
            value /= 85;
        }
        out.extend(digits[..=chunk.len()].iter().copied().map(char::from));
    }

    out
}

fn group_value(digits: &[u8; GROUP_DIGITS]) -> Option<u32> {
    let value = digits
        .iter()
        .fold(0u64, |acc, &digit| acc * 85 + u64::from(digit));
    u32::try_from(value).ok()
}

/// Errors that can occur while decoding ascii85.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Ascii85Error {
    /// Byte outside the ascii85 alphabet
    #[error("invalid ascii85 byte {byte:#04x} at offset {offset}")]
    InvalidByte {
        /// Offending byte
        byte: u8,
        /// Position in the input
        offset: usize,
    },
    /// `z` appeared in the middle of a group
    #[error("misplaced 'z' at offset {offset}")]
    MisplacedZ {
        /// Position in the input
        offset: usize,
    },
    /// Group value exceeds 32 bits
    #[error("ascii85 group overflows 32 bits at offset {offset}")]
    Overflow {
        /// Position of the last digit of the group
        offset: usize,
    },
    /// Input ended with a single leftover digit
    #[error("ascii85 input truncated at offset {offset}")]
    TruncatedGroup {
        /// Length of the input
        offset: usize,
    },
}
