use std::sync::Arc;

use druid::piet::ImageFormat;
use druid::ImageBuf;
use image::RgbImage;

pub mod viewer;

pub use viewer::show;

pub fn convert_image(img: &RgbImage) -> ImageBuf {
    let raw: Arc<[u8]> = img.as_raw().clone().into();

    ImageBuf::from_raw(
        raw,
        ImageFormat::Rgb,
        img.width() as usize,
        img.height() as usize,
    )
}
