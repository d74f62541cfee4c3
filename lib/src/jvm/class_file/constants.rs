use super::{decode_modified_utf8, encode_modified_utf8};
use crate::jvm::{read_bytes, Deserialize, Error, Serialize};
use crate::util::Width;
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// Tags of the [constants in the constant pool][0]
///
/// Only the constants defined up to Java 8 are included, since later class file versions are
/// rejected before the constant pool is read.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.4
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum ConstantTag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    FieldRef = 9,
    MethodRef = 10,
    InterfaceMethodRef = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    InvokeDynamic = 18,
}

impl ConstantTag {
    /// Size in bytes of the payload following the tag, or `None` for `Utf8` (which has its own
    /// `u16` length prefix)
    pub fn payload_width(self) -> Option<usize> {
        match self {
            ConstantTag::Utf8 => None,
            ConstantTag::Class | ConstantTag::String | ConstantTag::MethodType => Some(2),
            ConstantTag::MethodHandle => Some(3),
            ConstantTag::Integer
            | ConstantTag::Float
            | ConstantTag::FieldRef
            | ConstantTag::MethodRef
            | ConstantTag::InterfaceMethodRef
            | ConstantTag::NameAndType
            | ConstantTag::InvokeDynamic => Some(4),
            ConstantTag::Long | ConstantTag::Double => Some(8),
        }
    }
}

/// Almost all constants have width 1, except for `Long` and `Double`. Quoting JVMS §4.4.5:
///
/// > All 8-byte constants take up two entries in the constant_pool table of the class file. If a
/// > CONSTANT_Long_info or CONSTANT_Double_info structure is the item in the constant_pool table
/// > at index n, then the next usable item in the pool is located at index n+2. The constant_pool
/// > index n+1 must be valid but is considered unusable.
/// >
/// > In retrospect, making 8-byte constants take two constant pool entries was a poor choice.
impl Width for ConstantTag {
    fn width(&self) -> usize {
        match self {
            ConstantTag::Long | ConstantTag::Double => 2,
            _ => 1,
        }
    }
}

/// The unrecognized byte is handed back as the error
impl TryFrom<u8> for ConstantTag {
    type Error = u8;

    fn try_from(tag: u8) -> Result<ConstantTag, u8> {
        match tag {
            1 => Ok(ConstantTag::Utf8),
            3 => Ok(ConstantTag::Integer),
            4 => Ok(ConstantTag::Float),
            5 => Ok(ConstantTag::Long),
            6 => Ok(ConstantTag::Double),
            7 => Ok(ConstantTag::Class),
            8 => Ok(ConstantTag::String),
            9 => Ok(ConstantTag::FieldRef),
            10 => Ok(ConstantTag::MethodRef),
            11 => Ok(ConstantTag::InterfaceMethodRef),
            12 => Ok(ConstantTag::NameAndType),
            15 => Ok(ConstantTag::MethodHandle),
            16 => Ok(ConstantTag::MethodType),
            18 => Ok(ConstantTag::InvokeDynamic),
            other => Err(other),
        }
    }
}

impl From<ConstantTag> for u8 {
    fn from(tag: ConstantTag) -> u8 {
        tag as u8
    }
}

/// Index into the constant pool (starting at 1)
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct ConstantIndex(pub u16);

impl Display for ConstantIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

impl Serialize for ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for ConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        u16::deserialize(reader).map(ConstantIndex)
    }
}

/// Constant as in the constant pool
///
/// The payload is kept exactly as it appears after the tag in the class file (minus the length
/// prefix for `Utf8`), so that a constant which is never touched serializes back to the same
/// bytes. Most payloads are just indices of other constants.
#[derive(Clone, Eq, PartialEq)]
pub struct Constant {
    tag: ConstantTag,
    index: ConstantIndex,
    payload: Vec<u8>,
}

impl Constant {
    /// Make a constant, checking that the payload has the right size for the tag
    pub fn new(
        tag: ConstantTag,
        index: ConstantIndex,
        payload: Vec<u8>,
    ) -> Result<Constant, Error> {
        Constant::check_payload(tag, index, &payload)?;
        Ok(Constant {
            tag,
            index,
            payload,
        })
    }

    /// Make a `Utf8` constant holding the modified UTF-8 encoding of `text`
    pub fn utf8(index: ConstantIndex, text: &str) -> Result<Constant, Error> {
        Constant::new(ConstantTag::Utf8, index, encode_modified_utf8(text))
    }

    /// Read the payload of a constant whose tag has already been consumed
    pub fn read<R: ReadBytesExt>(
        reader: &mut R,
        tag: ConstantTag,
        index: ConstantIndex,
    ) -> Result<Constant, Error> {
        let payload = match tag.payload_width() {
            Some(width) => read_bytes(reader, width),
            None => u16::deserialize(reader).and_then(|len| read_bytes(reader, len as usize)),
        };
        let payload = payload.map_err(|_| Error::MalformedConstant { index, tag })?;
        Ok(Constant {
            tag,
            index,
            payload,
        })
    }

    pub(crate) fn check_payload(
        tag: ConstantTag,
        index: ConstantIndex,
        payload: &[u8],
    ) -> Result<(), Error> {
        let fits = match tag.payload_width() {
            Some(width) => payload.len() == width,
            None => payload.len() <= u16::MAX as usize,
        };
        if fits {
            Ok(())
        } else {
            Err(Error::PayloadLength {
                index,
                tag,
                actual: payload.len(),
            })
        }
    }

    pub fn tag(&self) -> ConstantTag {
        self.tag
    }

    /// Slot this constant occupies in its pool
    pub fn index(&self) -> ConstantIndex {
        self.index
    }

    /// Payload bytes, without the tag (and without the length prefix for `Utf8`)
    pub fn raw_data(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the payload bytes
    ///
    /// For `Utf8` constants the bytes must already be modified UTF-8. The length prefix is
    /// recomputed whenever the constant is serialized.
    pub fn set_raw_data(&mut self, payload: Vec<u8>) -> Result<(), Error> {
        Constant::check_payload(self.tag, self.index, &payload)?;
        self.payload = payload;
        Ok(())
    }

    /// Decoded contents of a `Utf8` constant
    pub fn text(&self) -> Result<String, Error> {
        self.expect_utf8()?;
        decode_modified_utf8(&self.payload).map_err(|err| Error::InvalidModifiedUtf8 {
            index: self.index,
            offset: err.offset,
        })
    }

    /// Overwrite the contents of a `Utf8` constant
    pub fn set_text(&mut self, text: &str) -> Result<(), Error> {
        self.expect_utf8()?;
        self.set_raw_data(encode_modified_utf8(text))
    }

    /// Index held in the first two bytes of a `Class`, `String` or `MethodType` payload
    pub fn referenced_index(&self) -> Option<ConstantIndex> {
        match self.tag {
            ConstantTag::Class | ConstantTag::String | ConstantTag::MethodType => Some(
                ConstantIndex(u16::from_be_bytes([self.payload[0], self.payload[1]])),
            ),
            _ => None,
        }
    }

    fn expect_utf8(&self) -> Result<(), Error> {
        if self.tag == ConstantTag::Utf8 {
            Ok(())
        } else {
            Err(Error::NotAUtf8Constant {
                index: self.index,
                found: self.tag,
            })
        }
    }
}

impl Width for Constant {
    fn width(&self) -> usize {
        self.tag.width()
    }
}

impl Serialize for Constant {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        u8::from(self.tag).serialize(writer)?;
        if self.tag == ConstantTag::Utf8 {
            (self.payload.len() as u16).serialize(writer)?;
        }
        writer.write_all(&self.payload)
    }
}

impl Debug for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.tag {
            ConstantTag::Utf8 => match decode_modified_utf8(&self.payload) {
                Ok(text) => write!(f, "Utf8({:?})", text),
                Err(_) => write!(f, "Utf8({:02x?})", self.payload),
            },
            ConstantTag::Class | ConstantTag::String | ConstantTag::MethodType => {
                let target = u16::from_be_bytes([self.payload[0], self.payload[1]]);
                write!(f, "{:?}(#{})", self.tag, target)
            }
            _ => write!(f, "{:?}({:02x?})", self.tag, self.payload),
        }
    }
}
