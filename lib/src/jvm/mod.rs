//! Edit compiled JVM classes
//!
//! Only the header and constant pool of a class file are decoded. Everything past the
//! `super_class` field (interfaces, fields, methods, attributes) is carried along as opaque bytes,
//! so edits are limited to what can be done by rewriting constants: renaming the class, its
//! superclass, or any text in the constant pool, and replacing the access flags.
//!
//! ### Simple example
//!
//! Consider the following class, compiled with Java 8:
//!
//! ```java,ignore,no_run
//! package com.example;
//!
//! public class Foo {
//!     public static Foo getFoo() { return new Foo(); }
//! }
//! ```
//!
//! Moving it to `com/example/Bar` (including the return type of `getFoo` and the method name
//! itself) can be done as follows:
//!
//! ```no_run
//! use classhug::jvm::class_file::ClassFile;
//! use classhug::jvm::Error;
//!
//! # fn rename_class() -> Result<(), Error> {
//! let mut class = ClassFile::read_from_path("com/example/Foo.class")?;
//! assert_eq!(class.class_name()?, "com/example/Foo");
//!
//! // Touches every `Utf8` constant: names, descriptors, and string literals
//! class.rename_all("Foo", "Bar")?;
//! assert_eq!(class.class_name()?, "com/example/Bar");
//!
//! class.save_to_path("com/example/Bar.class", true)?;
//! # Ok(())
//! # }
//! ```

mod access_flags;
mod binary_format;
pub mod class_file;
mod errors;

pub use access_flags::*;
pub use binary_format::*;
pub use errors::*;

pub use crate::util::Width;
