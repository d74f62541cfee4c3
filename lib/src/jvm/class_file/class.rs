use crate::jvm::class_file::{
    encode_modified_utf8, Constant, ConstantIndex, ConstantPool, ConstantTag, Version,
};
use crate::jvm::{ClassAccessFlags, Deserialize, Error, Serialize};
use byteorder::{ReadBytesExt, WriteBytesExt};
use regex::Regex;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Class file, parsed only as far as the `super_class` field
///
/// Everything after `super_class` (interfaces, fields, methods, attributes) is kept as an opaque
/// trailer and copied through verbatim. Names are edited by rewriting `Utf8` constants in place,
/// so no constant pool index ever moves.
///
/// See the [`class` file format of the JVM][0].
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html
#[derive(Debug, Clone)]
pub struct ClassFile {
    version: Version,
    constants: ConstantPool,
    access_flags: u16,
    this_class: ConstantIndex,
    super_class: ConstantIndex,
    trailer: Vec<u8>,
    original: Vec<u8>,
}

impl ClassFile {
    /// Magic header bytes that go at the front of the serialized class file
    pub const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

    /// Parse a class file
    pub fn parse(bytes: &[u8]) -> Result<ClassFile, Error> {
        let mut reader = Cursor::new(bytes);

        let magic: u32 = read_field(&mut reader, "magic number")?;
        if magic != u32::from_be_bytes(ClassFile::MAGIC) {
            return Err(Error::InvalidMagic(magic));
        }

        let version: Version = read_field(&mut reader, "class file version")?;
        if !version.is_supported() {
            return Err(Error::UnsupportedClassVersion(version));
        }

        let constant_pool_count: u16 = read_field(&mut reader, "constant pool count")?;
        let constants = ConstantPool::parse(&mut reader, constant_pool_count)?;

        let access_flags: u16 = read_field(&mut reader, "access flags")?;
        let this_class: ConstantIndex = read_field(&mut reader, "this class index")?;
        let super_class: ConstantIndex = read_field(&mut reader, "super class index")?;

        let trailer = bytes[reader.position() as usize..].to_vec();
        log::debug!(
            "Parsed class file version {} ({} bytes, {} byte trailer)",
            version,
            bytes.len(),
            trailer.len()
        );

        Ok(ClassFile {
            version,
            constants,
            access_flags,
            this_class,
            super_class,
            trailer,
            original: bytes.to_vec(),
        })
    }

    /// Parse a class file occupying `length` bytes starting at `offset`
    pub fn parse_range(bytes: &[u8], offset: usize, length: usize) -> Result<ClassFile, Error> {
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= bytes.len())
            .ok_or(Error::InvalidRange {
                offset,
                length,
                available: bytes.len(),
            })?;
        ClassFile::parse(&bytes[offset..end])
    }

    /// Read and parse a class file from disk
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ClassFile, Error> {
        let bytes = fs::read(path)?;
        ClassFile::parse(&bytes)
    }

    /// Encode the class file into bytes
    ///
    /// Without any modifications, this reproduces the input to [`ClassFile::parse`].
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::with_capacity(self.original.len());
        self.serialize(&mut bytes)?;
        Ok(bytes)
    }

    /// Save the class file to disk
    pub fn save_to_path<P: AsRef<Path>>(
        &self,
        path: P,
        create_missing_directories: bool,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        if create_missing_directories {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn constant_pool(&self) -> &ConstantPool {
        &self.constants
    }

    /// Direct access to the constants
    ///
    /// Renames done through here are seen by the name accessors, since those always re-resolve
    /// the `Class` to `Utf8` chain.
    pub fn constant_pool_mut(&mut self) -> &mut ConstantPool {
        &mut self.constants
    }

    pub fn this_class(&self) -> ConstantIndex {
        self.this_class
    }

    /// Index of the superclass, which is 0 only for `java/lang/Object`
    pub fn super_class(&self) -> ConstantIndex {
        self.super_class
    }

    /// Undecoded bytes following the `super_class` field
    pub fn trailer(&self) -> &[u8] {
        &self.trailer
    }

    /// Input this class file was parsed from, regardless of later modifications
    pub fn original_bytes(&self) -> &[u8] {
        &self.original
    }

    pub fn access_flags(&self) -> u16 {
        self.access_flags
    }

    /// Overwrite the access flags (no validation of which bits are set)
    pub fn set_access_flags(&mut self, access_flags: u16) {
        self.access_flags = access_flags;
    }

    pub fn class_access_flags(&self) -> ClassAccessFlags {
        ClassAccessFlags::from_bits_retain(self.access_flags)
    }

    /// Binary name of this class (eg. `com/example/Foo`)
    pub fn class_name(&self) -> Result<String, Error> {
        self.resolve_class_name(self.this_class)
    }

    pub fn set_class_name(&mut self, name: &str) -> Result<(), Error> {
        self.rename_class_constant(self.this_class, name)
    }

    /// Binary name of the superclass (eg. `java/lang/Object`)
    pub fn super_class_name(&self) -> Result<String, Error> {
        self.resolve_class_name(self.super_class)
    }

    pub fn set_super_class_name(&mut self, name: &str) -> Result<(), Error> {
        self.rename_class_constant(self.super_class, name)
    }

    /// Name of the class referred to by the `Class` constant at `index`
    pub fn resolve_class_name(&self, index: ConstantIndex) -> Result<String, Error> {
        let name_index = self.class_name_index(index)?;
        self.constants.get(name_index)?.text()
    }

    /// Overwrite the `Utf8` constant holding the name of the `Class` constant at `index`
    ///
    /// Other constants sharing that `Utf8` constant (eg. a `String` with the same contents) see
    /// the new name too.
    pub fn rename_class_constant(
        &mut self,
        index: ConstantIndex,
        name: &str,
    ) -> Result<(), Error> {
        let name_index = self.class_name_index(index)?;
        self.constants.get_mut(name_index)?.set_text(name)?;
        log::debug!("Renamed class {} to {:?}", index, name);
        Ok(())
    }

    /// Follow a `Class` constant to the index of the `Utf8` constant holding its name
    fn class_name_index(&self, index: ConstantIndex) -> Result<ConstantIndex, Error> {
        let class = self.constants.get(index)?;
        let name_index = match (class.tag(), class.referenced_index()) {
            (ConstantTag::Class, Some(name_index)) => name_index,
            (found, _) => return Err(Error::NotAClassConstant { index, found }),
        };

        let name = self.constants.get(name_index)?;
        if name.tag() != ConstantTag::Utf8 {
            return Err(Error::NotAUtf8Constant {
                index: name_index,
                found: name.tag(),
            });
        }
        Ok(name_index)
    }

    /// Replace every match of `pattern` in every `Utf8` constant
    ///
    /// This deliberately covers the whole constant pool and not just class names: descriptors
    /// (`Lcom/example/Foo;`), member names, and string literals are all rewritten. The
    /// replacement may refer to capture groups (`$1`, `${name}`).
    ///
    /// Returns how many constants changed. If any constant can't be decoded or the result
    /// doesn't fit in a constant, nothing is modified.
    pub fn rename_all(&mut self, pattern: &str, replacement: &str) -> Result<usize, Error> {
        let regex = Regex::new(pattern)?;
        self.rename_all_regex(&regex, replacement)
    }

    /// Same as [`ClassFile::rename_all`], but with an already compiled pattern
    pub fn rename_all_regex(&mut self, regex: &Regex, replacement: &str) -> Result<usize, Error> {
        let mut renamed: Vec<(ConstantIndex, Vec<u8>)> = vec![];
        for constant in self.constants.iter() {
            if constant.tag() != ConstantTag::Utf8 {
                continue;
            }
            let text = constant.text()?;
            let replaced = regex.replace_all(&text, replacement);
            if replaced != text.as_str() {
                log::trace!("{}: {:?} -> {:?}", constant.index(), text, replaced);
                let payload = encode_modified_utf8(&replaced);
                Constant::check_payload(ConstantTag::Utf8, constant.index(), &payload)?;
                renamed.push((constant.index(), payload));
            }
        }

        let count = renamed.len();
        for (index, payload) in renamed {
            self.constants.get_mut(index)?.set_raw_data(payload)?;
        }
        log::debug!("Replaced /{}/ in {} constants", regex.as_str(), count);
        Ok(count)
    }
}

impl Serialize for ClassFile {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&ClassFile::MAGIC)?;
        self.version.serialize(writer)?;
        self.constants.serialize(writer)?;
        self.access_flags.serialize(writer)?;
        self.this_class.serialize(writer)?;
        self.super_class.serialize(writer)?;
        writer.write_all(&self.trailer)?;
        Ok(())
    }
}

/// Read a header field, where running out of input means the class file is truncated
fn read_field<T: Deserialize, R: ReadBytesExt>(
    reader: &mut R,
    field: &'static str,
) -> Result<T, Error> {
    T::deserialize(reader).map_err(|_| Error::TruncatedInput { field })
}
