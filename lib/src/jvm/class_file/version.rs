use crate::jvm::{Deserialize, Serialize};
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Result;

/// Version of the class file, which is used to verify that the JVM has the
/// necessary features to interpret the class
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Version {
    pub minor_version: u16,
    pub major_version: u16,
}

impl Version {
    /// JVM class file version corresponding to Java SE 8 (released March 2014)
    pub const JAVA8: Version = Version {
        minor_version: 0,
        major_version: 52,
    };

    /// Newest class file format that can be parsed
    ///
    /// Java 9 introduced `Module` and `Package` constants and Java 11 introduced `Dynamic`
    /// constants, none of which are understood here.
    pub const MAX_SUPPORTED: Version = Version::JAVA8;

    /// Only the major version is checked: minor versions never change the constant pool layout
    pub fn is_supported(&self) -> bool {
        self.major_version <= Version::MAX_SUPPORTED.major_version
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.major_version, self.minor_version)
    }
}

impl Serialize for Version {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.minor_version.serialize(writer)?;
        self.major_version.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for Version {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self> {
        let minor_version = u16::deserialize(reader)?;
        let major_version = u16::deserialize(reader)?;
        Ok(Version {
            minor_version,
            major_version,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn java8_is_the_ceiling() {
        assert!(Version::JAVA8.is_supported());
        assert!(Version {
            minor_version: 3,
            major_version: 45
        }
        .is_supported());
        assert!(!Version {
            minor_version: 0,
            major_version: 0x35
        }
        .is_supported());
    }

    #[test]
    fn minor_version_comes_first() {
        let mut bytes = vec![];
        Version::JAVA8.serialize(&mut bytes).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 52]);
        assert_eq!(Version::JAVA8.to_string(), "52.0");
    }
}
