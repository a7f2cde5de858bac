use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use lazy_static::lazy_static;
use ndarray::Array2;

use crate::error::Error;

/// Maps a normalized value in `[0, 1]` to a color.
pub trait ColorScale {
    fn color(&self, frac: f64) -> Rgb<u8>;
}

pub trait Painter {
    fn value_color(&self, value: i32) -> Rgb<u8>;

    /// One pixel per cell; pixel `(x, y)` shows `grid[[y, x]]`.
    fn paint(&self, grid: &Array2<i32>) -> RgbImage {
        let width: u32 = grid.ncols() as u32;
        let height: u32 = grid.nrows() as u32;

        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let value = grid[[y as usize, x as usize]];
                img.put_pixel(x, y, self.value_color(value));
            }
        }
        img
    }
}

fn mix(a: u8, b: u8, frac: f64) -> u8 {
    let af = a as f64;
    let bf = b as f64;
    let m = af * (1.0 - frac) + bf * frac;
    f64::round(m) as u8
}

fn mix_rgb(a: [u8; 3], b: [u8; 3], frac: f64) -> Rgb<u8> {
    Rgb([
        mix(a[0], b[0], frac),
        mix(a[1], b[1], frac),
        mix(a[2], b[2], frac),
    ])
}

/// White at 0, black at 1.
pub struct Greyscale;

impl ColorScale for Greyscale {
    fn color(&self, frac: f64) -> Rgb<u8> {
        let frac = frac.clamp(0.0, 1.0);
        let v: u8 = 255 - (frac * 255.0).round() as u8;
        Rgb([v, v, v])
    }
}

const RAINBOW_STOPS: [[u8; 3]; 10] = [
    [0xbe, 0x0a, 0xff],
    [0x58, 0x0a, 0xff],
    [0x14, 0x7d, 0xf5],
    [0x0a, 0xef, 0xff],
    [0x0a, 0xff, 0x99],
    [0xa1, 0xff, 0x0a],
    [0xde, 0xff, 0x0a],
    [0xff, 0xd3, 0x00],
    [0xff, 0x87, 0x00],
    [0xff, 0x00, 0x00],
];

/// Violet through green to red.
pub struct Rainbow;

impl ColorScale for Rainbow {
    fn color(&self, frac: f64) -> Rgb<u8> {
        let last = RAINBOW_STOPS.len() - 1;
        let scaled = frac.clamp(0.0, 1.0) * last as f64;
        let n = (scaled.floor() as usize).min(last - 1);
        mix_rgb(RAINBOW_STOPS[n], RAINBOW_STOPS[n + 1], scaled - n as f64)
    }
}

// Anchor colors of the shifted twilight palette, as (position, rgb).
// Both ends are the same dark violet so the palette wraps around.
const TWILIGHT_SHIFTED_STOPS: [(f64, [f64; 3]); 13] = [
    (0.00, [0.186, 0.072, 0.232]),
    (0.08, [0.330, 0.180, 0.520]),
    (0.15, [0.370, 0.330, 0.670]),
    (0.25, [0.380, 0.520, 0.750]),
    (0.35, [0.580, 0.670, 0.800]),
    (0.42, [0.770, 0.800, 0.860]),
    (0.50, [0.886, 0.850, 0.888]),
    (0.58, [0.850, 0.740, 0.720]),
    (0.65, [0.790, 0.560, 0.470]),
    (0.75, [0.700, 0.340, 0.270]),
    (0.85, [0.550, 0.160, 0.300]),
    (0.92, [0.380, 0.090, 0.310]),
    (1.00, [0.186, 0.072, 0.232]),
];

const LUT_SIZE: usize = 256;

fn to_u8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn build_lut(stops: &[(f64, [f64; 3])], size: usize) -> Vec<Rgb<u8>> {
    (0..size)
        .map(|i| {
            let t = i as f64 / (size - 1) as f64;
            let k = stops
                .windows(2)
                .position(|w| t <= w[1].0)
                .unwrap_or(stops.len() - 2);
            let (t0, c0) = stops[k];
            let (t1, c1) = stops[k + 1];
            let frac = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            Rgb([
                to_u8(c0[0] + (c1[0] - c0[0]) * frac),
                to_u8(c0[1] + (c1[1] - c0[1]) * frac),
                to_u8(c0[2] + (c1[2] - c0[2]) * frac),
            ])
        })
        .collect()
}

lazy_static! {
    static ref TWILIGHT_SHIFTED_LUT: Vec<Rgb<u8>> = build_lut(&TWILIGHT_SHIFTED_STOPS, LUT_SIZE);
}

/// Cyclic palette: dark violet, blue, near white, orange, red, back to dark.
pub struct TwilightShifted;

impl ColorScale for TwilightShifted {
    fn color(&self, frac: f64) -> Rgb<u8> {
        let idx = (frac.clamp(0.0, 1.0) * LUT_SIZE as f64).floor() as usize;
        TWILIGHT_SHIFTED_LUT[idx.min(LUT_SIZE - 1)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    TwilightShifted,
    Rainbow,
    Greyscale,
}

impl Colormap {
    pub const NAMES: [&'static str; 3] = ["twilight-shifted", "rainbow", "greyscale"];
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "twilight-shifted" => Ok(Colormap::TwilightShifted),
            "rainbow" => Ok(Colormap::Rainbow),
            "greyscale" | "grayscale" => Ok(Colormap::Greyscale),
            _ => Err(format!(
                "unknown colormap {:?}, expected one of: {}",
                s,
                Self::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colormap::TwilightShifted => Self::NAMES[0],
            Colormap::Rainbow => Self::NAMES[1],
            Colormap::Greyscale => Self::NAMES[2],
        };
        f.write_str(name)
    }
}

impl ColorScale for Colormap {
    fn color(&self, frac: f64) -> Rgb<u8> {
        match self {
            Colormap::TwilightShifted => TwilightShifted.color(frac),
            Colormap::Rainbow => Rainbow.color(frac),
            Colormap::Greyscale => Greyscale.color(frac),
        }
    }
}

/// Linear mapping of `[vmin, vmax]` onto `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    pub fn from_range((lo, hi): (i32, i32)) -> Self {
        Self::new(lo as f64, hi as f64)
    }

    /// Replaces either bound; the result must still have `vmin <= vmax`.
    pub fn with_bounds(self, vmin: Option<f64>, vmax: Option<f64>) -> crate::Result<Self> {
        let norm = Self::new(vmin.unwrap_or(self.vmin), vmax.unwrap_or(self.vmax));
        if norm.vmin > norm.vmax {
            return Err(Error::InvalidRange {
                vmin: norm.vmin,
                vmax: norm.vmax,
            });
        }
        Ok(norm)
    }

    pub fn is_degenerate(&self) -> bool {
        self.vmax == self.vmin
    }

    /// A degenerate range maps every value to 0.
    pub fn frac(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((value - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0)
    }
}

pub struct GridPainter<C: ColorScale> {
    scale: C,
    norm: Normalize,
}

impl<C: ColorScale> GridPainter<C> {
    pub fn new(scale: C, norm: Normalize) -> Self {
        Self { scale, norm }
    }

    pub fn norm(&self) -> Normalize {
        self.norm
    }
}

impl<C: ColorScale> Painter for GridPainter<C> {
    fn value_color(&self, value: i32) -> Rgb<u8> {
        self.scale.color(self.norm.frac(value as f64))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_greyscale_endpoints() {
        assert_eq!(Greyscale.color(0.0), Rgb([255, 255, 255]));
        assert_eq!(Greyscale.color(1.0), Rgb([0, 0, 0]));
        assert_eq!(Greyscale.color(7.0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_rainbow_endpoints() {
        assert_eq!(Rainbow.color(0.0), Rgb([0xbe, 0x0a, 0xff]));
        assert_eq!(Rainbow.color(1.0), Rgb([0xff, 0x00, 0x00]));
    }

    #[test]
    fn test_twilight_shifted_wraps() {
        let lo = TwilightShifted.color(0.0);
        let hi = TwilightShifted.color(1.0);
        assert_eq!(lo, hi);
        assert_eq!(lo, Rgb([to_u8(0.186), to_u8(0.072), to_u8(0.232)]));

        // middle of the palette is the lightest color
        let mid = TwilightShifted.color(0.5);
        let brightness = |c: Rgb<u8>| c.0.iter().map(|&v| v as u32).sum::<u32>();
        for i in 0..=20 {
            let c = TwilightShifted.color(i as f64 / 20.0);
            assert!(brightness(c) <= brightness(mid));
        }
    }

    #[test]
    fn test_lut_size() {
        assert_eq!(TWILIGHT_SHIFTED_LUT.len(), LUT_SIZE);
    }

    #[test]
    fn test_colormap_names() {
        for name in Colormap::NAMES {
            let cmap: Colormap = name.parse().unwrap();
            assert_eq!(cmap.to_string(), name);
        }
        assert_eq!("twilight_shifted".parse::<Colormap>(), Ok(Colormap::TwilightShifted));
        assert_eq!("grayscale".parse::<Colormap>(), Ok(Colormap::Greyscale));
        assert!("viridis".parse::<Colormap>().is_err());
    }

    #[test]
    fn test_normalize() {
        let norm = Normalize::from_range((0, 1000));
        assert_eq!(norm.frac(0.0), 0.0);
        assert_eq!(norm.frac(500.0), 0.5);
        assert_eq!(norm.frac(2000.0), 1.0);

        let flat = Normalize::from_range((7, 7));
        assert!(flat.is_degenerate());
        assert_eq!(flat.frac(7.0), 0.0);

        let clipped = norm.with_bounds(None, Some(100.0)).unwrap();
        assert_eq!(clipped, Normalize::new(0.0, 100.0));
    }

    #[test]
    fn test_normalize_inverted_bounds() {
        let norm = Normalize::from_range((0, 1000));
        assert!(matches!(
            norm.with_bounds(Some(600.0), None),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            norm.with_bounds(Some(5.0), Some(1.0)),
            Err(Error::InvalidRange { .. })
        ));
        assert!(norm.with_bounds(Some(5.0), Some(5.0)).is_ok());
    }

    #[test]
    fn test_twilight_shifted_bins() {
        // frac falls into bin floor(frac * 256), the top edge into the last bin
        assert_eq!(TwilightShifted.color(0.5), TWILIGHT_SHIFTED_LUT[128]);
        assert_eq!(TwilightShifted.color(0.9 / 256.0), TWILIGHT_SHIFTED_LUT[0]);
        assert_eq!(TwilightShifted.color(1.5 / 256.0), TWILIGHT_SHIFTED_LUT[1]);
        assert_eq!(TwilightShifted.color(255.9 / 256.0), TWILIGHT_SHIFTED_LUT[255]);
        assert_eq!(TwilightShifted.color(1.0), TWILIGHT_SHIFTED_LUT[255]);
    }

    #[test]
    fn test_paint_orientation() {
        let grid = array![[0, 1, 2], [2, 1, 0]];
        let painter = GridPainter::new(Greyscale, Normalize::from_range((0, 2)));
        let img = painter.paint(&grid);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(2, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(0, 1), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([127, 127, 127]));
    }
}
