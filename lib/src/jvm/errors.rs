use super::class_file::{ConstantIndex, ConstantTag, Version};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug)]
pub enum Error {
    /// Input ended in the middle of a header field
    TruncatedInput { field: &'static str },

    /// First four bytes aren't `0xCAFEBABE`
    InvalidMagic(u32),

    /// Class file is newer than [`Version::MAX_SUPPORTED`]
    UnsupportedClassVersion(Version),

    /// `constant_pool_count` of 0 (the smallest valid count is 1, for an empty pool)
    InvalidConstantPoolCount(u16),

    /// Unrecognized tag byte in the constant pool
    UnsupportedConstantTag { index: ConstantIndex, tag: u8 },

    /// Payload of a constant could not be read, or doesn't fit in the pool
    MalformedConstant {
        index: ConstantIndex,
        tag: ConstantTag,
    },

    /// Payload of a `Utf8` constant is not valid modified UTF-8
    InvalidModifiedUtf8 { index: ConstantIndex, offset: usize },

    /// Expected a `Class` constant
    NotAClassConstant {
        index: ConstantIndex,
        found: ConstantTag,
    },

    /// Expected a `Utf8` constant
    NotAUtf8Constant {
        index: ConstantIndex,
        found: ConstantTag,
    },

    /// Index is 0, refers to the unusable slot after a wide constant, or is past the end of the
    /// pool
    IndexOutOfRange { index: ConstantIndex, size: u16 },

    /// New payload has the wrong size for the constant (or is too long for a `Utf8` length
    /// prefix)
    PayloadLength {
        index: ConstantIndex,
        tag: ConstantTag,
        actual: usize,
    },

    /// Requested span is not inside the input buffer
    InvalidRange {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// Pattern passed to a bulk rename did not compile
    InvalidPattern(regex::Error),

    IoError(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Error::TruncatedInput { field } => {
                write!(f, "input ended while reading the {}", field)
            }
            Error::InvalidMagic(magic) => {
                write!(f, "not a class file (magic number {:#010x})", magic)
            }
            Error::UnsupportedClassVersion(version) => write!(
                f,
                "unsupported class file version {} (newest supported is {})",
                version,
                Version::MAX_SUPPORTED
            ),
            Error::InvalidConstantPoolCount(count) => {
                write!(f, "invalid constant pool count {}", count)
            }
            Error::UnsupportedConstantTag { index, tag } => {
                write!(f, "unsupported constant tag {} at {}", tag, index)
            }
            Error::MalformedConstant { index, tag } => {
                write!(f, "malformed {:?} constant at {}", tag, index)
            }
            Error::InvalidModifiedUtf8 { index, offset } => write!(
                f,
                "invalid modified UTF-8 in constant {} at byte {}",
                index, offset
            ),
            Error::NotAClassConstant { index, found } => {
                write!(f, "expected a Class constant at {}, found {:?}", index, found)
            }
            Error::NotAUtf8Constant { index, found } => {
                write!(f, "expected a Utf8 constant at {}, found {:?}", index, found)
            }
            Error::IndexOutOfRange { index, size } => write!(
                f,
                "constant pool index {} is not usable in a pool of size {}",
                index, size
            ),
            Error::PayloadLength { index, tag, actual } => write!(
                f,
                "payload of {} bytes does not fit {:?} constant {}",
                actual, tag, index
            ),
            Error::InvalidRange {
                offset,
                length,
                available,
            } => write!(
                f,
                "range of {} bytes at offset {} is outside of the {} byte input",
                length, offset, available
            ),
            Error::InvalidPattern(err) => write!(f, "invalid rename pattern: {}", err),
            Error::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidPattern(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Error {
        Error::InvalidPattern(err)
    }
}
