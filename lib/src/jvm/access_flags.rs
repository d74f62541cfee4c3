use bitflags::bitflags;

bitflags! {
    /// [Access flags on classes][0]
    ///
    /// Class files store these as a plain `u16` and bits outside of the ones named here are kept
    /// as they are (see `ClassAccessFlags::from_bits_retain`).
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.1-200-E.1
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}
