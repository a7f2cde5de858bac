use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::datfile::DatFile;
use crate::error::Error;
use crate::figure::Figure;
use crate::painter::{Colormap, GridPainter, Normalize};

pub mod coord;
pub mod datfile;
pub mod error;
pub mod figure;
#[cfg(feature = "gui")]
pub mod gui;
pub mod painter;

pub use error::Result;

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub colormap: Colormap,
    /// Overrides the grid minimum as the bottom of the color range.
    pub vmin: Option<f64>,
    /// Overrides the grid maximum as the top of the color range.
    pub vmax: Option<f64>,
    /// Longer side of the output in pixels; one pixel per cell when unset.
    pub fit: Option<u32>,
    /// TrueType font for drawing the title above the image.
    pub font: Option<PathBuf>,
}

pub fn render(dat: &DatFile, opts: &RenderOptions) -> Result<Figure> {
    let range = dat.value_range();
    let norm = Normalize::from_range(range).with_bounds(opts.vmin, opts.vmax)?;
    let painter = GridPainter::new(opts.colormap, norm);
    if painter.norm().is_degenerate() {
        warn!(
            value = painter.norm().vmin,
            "color range is empty, every cell gets the same color"
        );
    }
    let mut figure = Figure::render(dat, &painter);
    info!(
        title = %figure.title,
        colormap = %opts.colormap,
        min = range.0,
        max = range.1,
        "rendered grid"
    );

    if let Some(max_side) = opts.fit {
        figure = figure.fit(max_side);
    }
    if let Some(path) = &opts.font {
        let font_data = fs::read(path).map_err(|e| Error::io(path, e))?;
        figure = figure.with_title_banner(font_data)?;
    }
    Ok(figure)
}
