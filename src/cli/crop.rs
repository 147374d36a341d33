//! `crop` command: square portrait from a larger photo.

use super::CropArgs;
use crate::image::{PortraitOptions, crop_portrait};
use anyhow::Result;

pub fn run_crop(args: &CropArgs) -> Result<()> {
    let options = PortraitOptions {
        size: args.size,
        x: args.x,
        y: args.y,
        crop_size: args.crop_size,
    };
    crop_portrait(&args.input, &args.output, options)?;
    Ok(())
}
