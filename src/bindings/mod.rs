pub mod ffi;

#[cfg(feature = "python")]
pub mod python;
