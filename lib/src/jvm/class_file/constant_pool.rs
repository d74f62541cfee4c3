use super::{Constant, ConstantIndex, ConstantTag};
use crate::jvm::{Error, Serialize};
use crate::util::{Offset, OffsetError, OffsetVec, Width};
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::iter;

/// Constant pool of a parsed class file
///
/// Slots are addressed starting from 1. Slot 0 and the slot following every `Long` or `Double`
/// are unusable: lookups on them fail with [`Error::IndexOutOfRange`] just like lookups past the
/// end of the pool.
#[derive(Clone, PartialEq, Eq)]
pub struct ConstantPool {
    constants: OffsetVec<Constant>,
}

impl ConstantPool {
    /// Read the entries of a constant pool
    ///
    /// The reader must be positioned right after the `constant_pool_count` field, and
    /// `declared_size` is the value of that field.
    pub fn parse<R: ReadBytesExt>(
        reader: &mut R,
        declared_size: u16,
    ) -> Result<ConstantPool, Error> {
        if declared_size == 0 {
            return Err(Error::InvalidConstantPoolCount(declared_size));
        }

        let end = Offset(declared_size as usize);
        let mut constants = OffsetVec::new_starting_at(Offset(1));
        while constants.offset_len() < end {
            let index = ConstantIndex(constants.offset_len().0 as u16);
            let tag = reader.read_u8().map_err(|_| Error::TruncatedInput {
                field: "constant pool tag",
            })?;
            let tag = ConstantTag::try_from(tag)
                .map_err(|tag| Error::UnsupportedConstantTag { index, tag })?;

            // The unusable second slot of a wide constant still has to be inside the pool
            if constants.offset_len().0 + tag.width() > end.0 {
                return Err(Error::MalformedConstant { index, tag });
            }

            let constant = Constant::read(reader, tag, index)?;
            log::trace!("{} = {:?}", index, constant);
            constants.push(constant);
        }

        log::debug!(
            "Read constant pool with {} constants in {} slots",
            constants.len(),
            declared_size - 1
        );
        Ok(ConstantPool { constants })
    }

    /// Value of the `constant_pool_count` field (one more than the largest usable index)
    pub fn declared_size(&self) -> u16 {
        self.constants.offset_len().0 as u16
    }

    /// Number of constants (wide constants count once)
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Look up a constant
    pub fn get(&self, index: ConstantIndex) -> Result<&Constant, Error> {
        let size = self.declared_size();
        self.constants
            .get_offset(Offset(index.0 as usize))
            .map_err(|err| out_of_range(index, size, err))
    }

    /// Look up a constant for modification
    pub fn get_mut(&mut self, index: ConstantIndex) -> Result<&mut Constant, Error> {
        let size = self.declared_size();
        self.constants
            .get_offset_mut(Offset(index.0 as usize))
            .map_err(|err| out_of_range(index, size, err))
    }

    /// Contents of a slot, or `None` if the slot is a hole or out of range
    pub fn slot(&self, index: ConstantIndex) -> Option<&Constant> {
        self.constants.get_offset(Offset(index.0 as usize)).ok()
    }

    /// Every slot from 1 up to (but excluding) the declared size, including holes
    pub fn slots(&self) -> impl Iterator<Item = (ConstantIndex, Option<&Constant>)> {
        self.constants.iter().flat_map(|(offset, _, constant)| {
            let index = offset.0 as u16;
            let hole = (constant.width() == 2).then(|| (ConstantIndex(index + 1), None));
            iter::once((ConstantIndex(index), Some(constant))).chain(hole)
        })
    }

    /// Constants in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Constant> {
        self.constants.iter().map(|(_, _, constant)| constant)
    }

    /// Constants in slot order, for modification
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Constant> {
        self.constants.iter_mut().map(|(_, constant)| constant)
    }
}

fn out_of_range(index: ConstantIndex, size: u16, err: OffsetError) -> Error {
    log::trace!("Lookup of {} failed: {:?}", index, err);
    Error::IndexOutOfRange { index, size }
}

/// Holes contribute no bytes: they are implied by the width of the preceding constant
impl Serialize for ConstantPool {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.declared_size().serialize(writer)?;
        for constant in self.iter() {
            constant.serialize(writer)?;
        }
        Ok(())
    }
}

impl Debug for ConstantPool {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.constants.fmt(f)
    }
}
