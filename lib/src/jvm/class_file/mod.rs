mod class;
mod constant_pool;
mod constants;
mod modified_utf8;
mod version;

pub use class::*;
pub use constant_pool::*;
pub use constants::*;
pub use modified_utf8::*;
pub use version::*;
