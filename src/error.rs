use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("data file is empty")]
    EmptyFile,

    #[error("header must have 7 fields, found {0}")]
    HeaderFieldCount(usize),

    #[error("invalid header field {name}: {value:?}")]
    HeaderField { name: &'static str, value: String },

    #[error("header width and height must be greater than zero")]
    ZeroDimension,

    #[error("invalid grid value {value:?} at row {row}, column {col}")]
    GridValue {
        row: usize,
        col: usize,
        value: String,
    },

    #[error("grid shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("color range is inverted: vmin {vmin} is greater than vmax {vmax}")]
    InvalidRange { vmin: f64, vmax: f64 },

    #[error("unsupported output format: {0:?}")]
    UnsupportedFormat(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("png encoding error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("font data could not be loaded")]
    Font,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
