#[cfg(feature = "gui")]
use druid::{Data, Lens};
use num::{traits::NumOps, Num, One};

trait Two {
    fn two() -> Self;
}

impl<T> Two for T
where
    T: One + NumOps,
{
    fn two() -> Self {
        T::one() + T::one()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "gui", derive(Data, Lens))]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + Copy,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }

    pub fn center(&self) -> T {
        (self.max + self.min) / T::two()
    }
}

impl Axis<f64> {
    /// Value at `frac` of the way from `min` to `max`.
    pub fn lerp(&self, frac: f64) -> f64 {
        self.min + frac * self.length()
    }
}

/// Spatial extent covered by a grid: `x` spans the columns left to right,
/// `y` spans the rows with row 0 at `y.max`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "gui", derive(Data, Lens))]
pub struct Frame<T> {
    pub x: Axis<T>,
    pub y: Axis<T>,
}

impl<T> Frame<T>
where
    T: Num + Copy,
{
    pub fn new(x: Axis<T>, y: Axis<T>) -> Self {
        Self { x, y }
    }

    pub fn from_nums(x1: T, x2: T, y1: T, y2: T) -> Self {
        Self::new(Axis::new(x1, x2), Axis::new(y1, y2))
    }
}

impl Frame<f64> {
    /// Maps a fractional image position (0 at the left/top edge, 1 at the
    /// right/bottom edge) to data coordinates.
    pub fn point_at(&self, fx: f64, fy: f64) -> (f64, f64) {
        (self.x.lerp(fx), self.y.lerp(1.0 - fy))
    }

    /// Data coordinate at the center of cell (`col`, `row`) of a
    /// `width` x `height` grid.
    pub fn pixel_center(&self, col: usize, row: usize, width: usize, height: usize) -> (f64, f64) {
        let fx = (col as f64 + 0.5) / width as f64;
        let fy = (row as f64 + 0.5) / height as f64;
        self.point_at(fx, fy)
    }
}

impl std::fmt::Display for Frame<f64> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}]",
            self.x.min, self.x.max, self.y.min, self.y.max
        )
    }
}
