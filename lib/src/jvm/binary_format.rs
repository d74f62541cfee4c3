use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Result;

/// Utility trait for serializing data inside class files
///
/// Java class files have some peculiarities that make it useful to define an extra trait (instead
/// of just using `serde`):
///
///   - tags are always `u8`
///   - everything is big-endian
///   - lengths are usually `u16`
///
pub trait Serialize: Sized {
    /// Serialize construct into a binary output stream
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()>;
}

/// Reading counterpart of [`Serialize`], for fixed-width fields
///
/// Errors are the raw `std::io` ones: it is up to the caller to decide whether a short read means
/// a truncated header or a malformed constant.
pub trait Deserialize: Sized {
    /// Deserialize construct from a binary input stream
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self>;
}

impl Serialize for u8 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(*self)
    }
}

impl Serialize for u16 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(*self)
    }
}

impl Serialize for u32 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(*self)
    }
}

impl Deserialize for u8 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        reader.read_u8()
    }
}

impl Deserialize for u16 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        reader.read_u16::<BigEndian>()
    }
}

impl Deserialize for u32 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        reader.read_u32::<BigEndian>()
    }
}

/// Read exactly `len` bytes
pub fn read_bytes<R: ReadBytesExt>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buffer = vec![0; len];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::{Cursor, ErrorKind};

    #[test]
    fn integers_are_big_endian() {
        let mut bytes = vec![];
        0xCAFEu16.serialize(&mut bytes).unwrap();
        0xDEAD_BEEFu32.serialize(&mut bytes).unwrap();
        assert_eq!(bytes, vec![0xCA, 0xFE, 0xDE, 0xAD, 0xBE, 0xEF]);

        let mut reader = Cursor::new(&bytes[..]);
        assert_eq!(u16::deserialize(&mut reader).unwrap(), 0xCAFE);
        assert_eq!(u32::deserialize(&mut reader).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn short_reads_are_eof() {
        let mut reader = Cursor::new(&[0x01u8][..]);
        let err = u16::deserialize(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

        let mut reader = Cursor::new(&[1u8, 2, 3][..]);
        let err = read_bytes(&mut reader, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
