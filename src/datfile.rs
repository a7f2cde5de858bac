//! Reader for the `.dat` grid files written by the fractal producer.
//!
//! The first line is a header of seven whitespace-separated fields:
//!
//! ```text
//! WIDTH HEIGHT ELAPSED X_MIN X_MAX Y_MIN Y_MAX
//! ```
//!
//! followed by `HEIGHT` lines of `WIDTH` integers each.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use ndarray::Array2;
use tracing::debug;

use crate::coord::Frame;
use crate::error::{Error, Result};

const HEADER_FIELDS: [&str; 7] = ["width", "height", "elapsed", "x_min", "x_max", "y_min", "y_max"];

#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub width: usize,
    pub height: usize,
    /// Seconds the producer spent computing the grid.
    pub elapsed: f64,
    pub extent: Frame<f64>,
}

fn parse_field<T: FromStr>(idx: usize, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::HeaderField {
        name: HEADER_FIELDS[idx],
        value: value.to_string(),
    })
}

impl FromStr for Header {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        if fields.len() != HEADER_FIELDS.len() {
            return Err(Error::HeaderFieldCount(fields.len()));
        }

        let width: usize = parse_field(0, fields[0])?;
        let height: usize = parse_field(1, fields[1])?;
        if width == 0 || height == 0 {
            return Err(Error::ZeroDimension);
        }
        let elapsed: f64 = parse_field(2, fields[2])?;
        let x_min: f64 = parse_field(3, fields[3])?;
        let x_max: f64 = parse_field(4, fields[4])?;
        let y_min: f64 = parse_field(5, fields[5])?;
        let y_max: f64 = parse_field(6, fields[6])?;

        Ok(Self {
            width,
            height,
            elapsed,
            extent: Frame::from_nums(x_min, x_max, y_min, y_max),
        })
    }
}

#[derive(Clone, Debug)]
pub struct DatFile {
    pub header: Header,
    /// Labels indexed `[[row, col]]`, row 0 first in the file.
    pub grid: Array2<i32>,
}

impl DatFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        debug!(path = %path.display(), "reading data file");
        Self::parse(BufReader::new(file))
    }

    pub fn parse<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(Error::EmptyFile);
        }
        let header: Header = line.parse()?;
        debug!(
            width = header.width,
            height = header.height,
            elapsed = header.elapsed,
            "parsed header"
        );

        let Header { width, height, .. } = header;
        let mut cells: Vec<i32> = Vec::new();
        let mut row = 0;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if row == height {
                return Err(Error::ShapeMismatch(format!(
                    "header declares {} rows but the file has more",
                    height
                )));
            }

            let start = cells.len();
            for (col, token) in line.split_ascii_whitespace().enumerate() {
                let value = token.parse().map_err(|_| Error::GridValue {
                    row,
                    col,
                    value: token.to_string(),
                })?;
                cells.push(value);
            }
            let found = cells.len() - start;
            if found != width {
                return Err(Error::ShapeMismatch(format!(
                    "row {} has {} columns, header declares {}",
                    row, found, width
                )));
            }
            row += 1;
        }

        if row != height {
            return Err(Error::ShapeMismatch(format!(
                "header declares {} rows, file has {}",
                height, row
            )));
        }

        let grid = Array2::from_shape_vec((height, width), cells)
            .map_err(|e| Error::ShapeMismatch(e.to_string()))?;
        Ok(Self { header, grid })
    }

    pub fn width(&self) -> usize {
        self.header.width
    }

    pub fn height(&self) -> usize {
        self.header.height
    }

    pub fn extent(&self) -> &Frame<f64> {
        &self.header.extent
    }

    pub fn title(&self) -> String {
        format!(
            "Newton fractal - {}x{} - time: {:.2}s",
            self.header.width, self.header.height, self.header.elapsed
        )
    }

    /// Smallest and largest label in the grid.
    pub fn value_range(&self) -> (i32, i32) {
        self.grid
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = "3 2 1.2345 -0.05000000000000000 0.05000000000000000 -0.05000000000000000 0.05000000000000000\n\
                          0 1 2\n\
                          5 4 1000\n";

    #[test]
    fn test_parse_sample() {
        let dat = DatFile::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dat.width(), 3);
        assert_eq!(dat.height(), 2);
        assert_eq!(dat.header.elapsed, 1.2345);
        assert_eq!(dat.extent(), &Frame::from_nums(-0.05, 0.05, -0.05, 0.05));
        assert_eq!(dat.grid[[0, 2]], 2);
        assert_eq!(dat.grid[[1, 0]], 5);
        assert_eq!(dat.value_range(), (0, 1000));
    }

    #[test]
    fn test_title() {
        let dat = DatFile::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dat.title(), "Newton fractal - 3x2 - time: 1.23s");
    }

    #[test]
    fn test_crlf_and_trailing_blank_lines() {
        let data = "2 2 0.5 0 1 0 1\r\n1 2\r\n3 4\r\n\r\n\n";
        let dat = DatFile::parse(data.as_bytes()).unwrap();
        assert_eq!(dat.grid.shape(), &[2, 2]);
        assert_eq!(dat.grid[[1, 1]], 4);
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(DatFile::parse("".as_bytes()), Err(Error::EmptyFile)));
    }

    #[test]
    fn test_header_field_count() {
        let err = "2 2 0.5 0 1 0".parse::<Header>().unwrap_err();
        assert!(matches!(err, Error::HeaderFieldCount(6)));
    }

    #[test]
    fn test_header_bad_field() {
        let err = "2 x 0.5 0 1 0 1".parse::<Header>().unwrap_err();
        match err {
            Error::HeaderField { name, value } => {
                assert_eq!(name, "height");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!(
            "-2 2 0.5 0 1 0 1".parse::<Header>(),
            Err(Error::HeaderField { name: "width", .. })
        ));
    }

    #[test]
    fn test_header_zero_dimension() {
        assert!(matches!(
            "0 2 0.5 0 1 0 1".parse::<Header>(),
            Err(Error::ZeroDimension)
        ));
    }

    #[test]
    fn test_short_row() {
        let data = "3 2 0.5 0 1 0 1\n1 2 3\n4 5\n";
        assert!(matches!(
            DatFile::parse(data.as_bytes()),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_row_count_mismatch() {
        let missing = "2 3 0.5 0 1 0 1\n1 2\n3 4\n";
        assert!(matches!(
            DatFile::parse(missing.as_bytes()),
            Err(Error::ShapeMismatch(_))
        ));
        let extra = "2 1 0.5 0 1 0 1\n1 2\n3 4\n";
        assert!(matches!(
            DatFile::parse(extra.as_bytes()),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_oversized_header() {
        for data in [
            "4294967296 4294967296 0.5 0 1 0 1\n1 2\n",
            "100000000 100000000 0.5 0 1 0 1\n1 2\n",
        ] {
            assert!(matches!(
                DatFile::parse(data.as_bytes()),
                Err(Error::ShapeMismatch(_))
            ));
        }
    }

    #[test]
    fn test_bad_grid_value() {
        let data = "2 2 0.5 0 1 0 1\n1 2\n3 4.5\n";
        match DatFile::parse(data.as_bytes()) {
            Err(Error::GridValue { row, col, value }) => {
                assert_eq!((row, col), (1, 1));
                assert_eq!(value, "4.5");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let err = DatFile::open("/nonexistent/fractal.dat").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
