//! Image processing utilities.
//!
//! # Modules
//!
//! - [`portrait`]: square crop and resize for profile pictures

pub mod portrait;

pub use portrait::{PortraitOptions, crop_portrait};
