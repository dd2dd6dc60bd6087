//! Target platform handling.
//!
//! Cross-compiling only changes the name of the produced executable, so this
//! module is limited to identifying a target OS and its executable suffix.

pub mod os;

pub use os::Os;
