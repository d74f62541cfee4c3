use std::fmt::{Display, Formatter, Result as FmtResult};

/// Modified UTF-8 format used in class files.
///
/// See [this `DataInput` section for details][0]. Quoting from that section:
///
/// > The differences between this format and the standard UTF-8 format are the following:
/// >
/// >  * The null byte `\u0000` is encoded in 2-byte format rather than 1-byte, so that the encoded
/// >    strings never have embedded nulls.
/// >  * Only the 1-byte, 2-byte, and 3-byte formats are used.
/// >  * Supplementary characters are represented in the form of surrogate pairs.
///
/// [0]: https://docs.oracle.com/en/java/javase/17/docs/api/java.base/java/io/DataInput.html#modified-utf-8
pub fn encode_modified_utf8(string: &str) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::with_capacity(string.len());
    for c in string.chars() {
        // Handle the exception for how `\u{0000}` is represented
        let len: usize = if c == '\u{0000}' { 2 } else { c.len_utf8() };
        let code: u32 = c as u32;

        match len {
            1 => buffer.push(code as u8),
            2 => {
                buffer.push((code >> 6 & 0x1F) as u8 | 0b1100_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
            3 => {
                buffer.push((code >> 12 & 0x0F) as u8 | 0b1110_0000);
                buffer.push((code >> 6 & 0x3F) as u8 | 0b1000_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }

            // Supplementary characters: main divergence from unicode
            _ => {
                buffer.push(0b1110_1101);
                buffer.push(((code >> 16 & 0x0F) as u8).wrapping_sub(1) & 0x0F | 0b1010_0000);
                buffer.push((code >> 10 & 0x3F) as u8 | 0b1000_0000);

                buffer.push(0b1110_1101);
                buffer.push((code >> 6 & 0x0F) as u8 | 0b1011_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
        }
    }
    buffer
}

/// Byte sequence that is not valid modified UTF-8
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ModifiedUtf8Error {
    /// Offset of the first byte of the offending sequence
    pub offset: usize,
}

impl Display for ModifiedUtf8Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "invalid modified UTF-8 sequence at byte {}", self.offset)
    }
}

impl std::error::Error for ModifiedUtf8Error {}

const HIGH_SURROGATES: std::ops::Range<u32> = 0xD800..0xDC00;
const LOW_SURROGATES: std::ops::Range<u32> = 0xDC00..0xE000;

/// Inverse of [`encode_modified_utf8`]
///
/// Anything `encode_modified_utf8` would never produce is rejected: raw NUL bytes, overlong forms
/// (other than `C0 80`), 4-byte UTF-8 sequences, and surrogates that don't come in a high-low pair.
/// The last case is valid in a class file, but can't be represented by a Rust `String`.
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String, ModifiedUtf8Error> {
    let mut string = String::with_capacity(bytes.len());
    let mut offset = 0;

    while offset < bytes.len() {
        let error = ModifiedUtf8Error { offset };
        let (unit, len) = decode_code_unit(bytes, offset)?;

        let code_point = if HIGH_SURROGATES.contains(&unit) {
            let (low, low_len) = decode_code_unit(bytes, offset + len).map_err(|_| error)?;
            if !LOW_SURROGATES.contains(&low) {
                return Err(error);
            }
            offset += len + low_len;
            0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        } else if LOW_SURROGATES.contains(&unit) {
            return Err(error);
        } else {
            offset += len;
            unit
        };

        string.push(char::from_u32(code_point).ok_or(error)?);
    }

    Ok(string)
}

/// Decode one UTF-16 code unit, returning it along with the number of bytes it used
fn decode_code_unit(bytes: &[u8], offset: usize) -> Result<(u32, usize), ModifiedUtf8Error> {
    let error = ModifiedUtf8Error { offset };
    let continuation = |i: usize| -> Result<u32, ModifiedUtf8Error> {
        match bytes.get(offset + i) {
            Some(byte) if byte & 0b1100_0000 == 0b1000_0000 => Ok((byte & 0x3F) as u32),
            _ => Err(error),
        }
    };

    let first = *bytes.get(offset).ok_or(error)? as u32;
    match first {
        0x01..=0x7F => Ok((first, 1)),
        0xC0..=0xDF => {
            let unit = (first & 0x1F) << 6 | continuation(1)?;
            if unit != 0 && unit < 0x80 {
                Err(error)
            } else {
                Ok((unit, 2))
            }
        }
        0xE0..=0xEF => {
            let unit = (first & 0x0F) << 12 | continuation(1)? << 6 | continuation(2)?;
            if unit < 0x800 {
                Err(error)
            } else {
                Ok((unit, 3))
            }
        }
        _ => Err(error),
    }
}

#[cfg(test)]
mod encode_modified_utf8_tests {
    use super::*;

    #[test]
    fn containing_null_byte() {
        assert_eq!(encode_modified_utf8("a\x00a"), vec![97, 192, 128, 97]);
    }

    #[test]
    fn simple_ascii() {
        assert_eq!(encode_modified_utf8("foo"), vec![102, 111, 111]);
        assert_eq!(
            encode_modified_utf8("com/example/Foo"),
            b"com/example/Foo".to_vec()
        );
    }

    #[test]
    fn two_and_three_byte_encodings() {
        assert_eq!(
            encode_modified_utf8("ĄǍǞ"),
            vec![196, 132, 199, 141, 199, 158]
        );
        assert_eq!(
            encode_modified_utf8("ऄअॲ"),
            vec![224, 164, 132, 224, 164, 133, 224, 165, 178]
        );
    }

    #[test]
    fn supplementary_characters() {
        assert_eq!(
            encode_modified_utf8("\u{10000}\u{dffff}\u{10FFFF}"),
            vec![
                237, 160, 128, 237, 176, 128, 237, 172, 191, 237, 191, 191, 237, 175, 191, 237,
                191, 191
            ]
        );
    }
}
