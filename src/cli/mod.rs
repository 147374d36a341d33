//! Command-line interface module.

mod args;
pub mod build;
pub mod crop;

pub use args::{BuildArgs, Cli, Commands, CropArgs};
