//! Minimal in-place editor for JVM class files
//!
//! See [`jvm`] for an example.

pub mod jvm;
mod util;
