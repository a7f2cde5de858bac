use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::{debug, info};

use crate::coord::Frame;
use crate::datfile::DatFile;
use crate::error::{Error, Result};
use crate::painter::{ColorScale, GridPainter, Painter};

const BANNER_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BANNER_TEXT: Rgb<u8> = Rgb([0, 0, 0]);

/// Output file for `input`: its stem with a `.png` extension, inside `out_dir`.
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "fractal".into());
    name.push(".png");
    out_dir.join(name)
}

#[derive(Clone, Debug)]
pub struct Figure {
    pub image: RgbImage,
    pub title: String,
    pub extent: Frame<f64>,
}

impl Figure {
    pub fn new(image: RgbImage, title: String, extent: Frame<f64>) -> Self {
        Self {
            image,
            title,
            extent,
        }
    }

    pub fn render<C: ColorScale>(dat: &DatFile, painter: &GridPainter<C>) -> Self {
        let image = painter.paint(&dat.grid);
        Self::new(image, dat.title(), dat.extent().clone())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Nearest-neighbour resize so the longer side is `max_side` pixels.
    pub fn fit(mut self, max_side: u32) -> Self {
        let (w, h) = self.image.dimensions();
        let max_side = max_side.max(1);
        let (nw, nh) = if w >= h {
            let nh = (h as f64 * max_side as f64 / w as f64).round() as u32;
            (max_side, nh.max(1))
        } else {
            let nw = (w as f64 * max_side as f64 / h as f64).round() as u32;
            (nw.max(1), max_side)
        };
        if (nw, nh) != (w, h) {
            debug!(from = ?(w, h), to = ?(nw, nh), "resizing figure");
            self.image = imageops::resize(&self.image, nw, nh, FilterType::Nearest);
        }
        self
    }

    /// Adds a band above the image with the title drawn in the given
    /// TrueType font.
    pub fn with_title_banner(mut self, font_data: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(font_data).ok_or(Error::Font)?;
        let (w, h) = self.image.dimensions();
        let px = (w as f32 / 30.0).clamp(12.0, 48.0);
        let scale = Scale::uniform(px);
        let banner = (px * 1.8).ceil() as u32;

        let mut canvas = RgbImage::from_pixel(w, h + banner, BANNER_BACKGROUND);
        imageops::replace(&mut canvas, &self.image, 0, banner as i64);

        let (text_w, text_h) = text_size(scale, &font, &self.title);
        let x = ((w as i32 - text_w) / 2).max(0);
        let y = ((banner as i32 - text_h) / 2).max(0);
        draw_text_mut(&mut canvas, BANNER_TEXT, x, y, scale, &font, &self.title);

        self.image = canvas;
        Ok(self)
    }

    /// Writes the figure. PNG output carries the title and extent as text
    /// chunks; other extensions go through `image`'s format detection.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if ext.is_empty() || ext == "png" {
            self.save_png(path)?;
        } else {
            let format =
                ImageFormat::from_path(path).map_err(|_| Error::UnsupportedFormat(ext.clone()))?;
            self.image.save_with_format(path, format)?;
        }
        info!(path = %path.display(), width = self.width(), height = self.height(), "wrote image");
        Ok(())
    }

    fn save_png(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width(), self.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.add_text_chunk("Title".to_string(), self.title.clone())?;
        encoder.add_text_chunk("Extent".to_string(), self.extent.to_string())?;
        encoder.add_text_chunk(
            "Software".to_string(),
            format!("fracplot {}", env!("CARGO_PKG_VERSION")),
        )?;

        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.image.as_raw())?;
        writer.finish()?;
        Ok(())
    }
}
