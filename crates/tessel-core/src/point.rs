//! Plain 2-D/3-D points and min/max scalar ranges.

use std::ops::{Add, Mul, Sub};

/// A point (or displacement) in the grid plane, in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point2 {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// A point whose components are both NaN; used as a "no result" value.
    pub const NAN: Self = Self {
        x: f64::NAN,
        y: f64::NAN,
    };

    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Euclidean length of the vector from the origin.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// 2-D cross product (z component of the 3-D cross product).
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// `true` if either component is NaN.
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Arithmetic mean of `points`, or the origin for an empty slice.
    pub fn centroid(points: &[Point2]) -> Self {
        if points.is_empty() {
            return Self::ZERO;
        }
        let sum = points.iter().fold(Self::ZERO, |acc, &p| acc + p);
        sum * (1.0 / points.len() as f64)
    }
}

impl Add for Point2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A point in 3-D space. Grid elements carry a common `z`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    /// x component.
    pub x: f64,
    /// y component.
    pub y: f64,
    /// z component.
    pub z: f64,
}

impl Point3 {
    /// Construct a point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Lift a planar point to height `z`.
    pub const fn from_planar(p: Point2, z: f64) -> Self {
        Self { x: p.x, y: p.y, z }
    }

    /// Drop the `z` component.
    pub const fn planar(self) -> Point2 {
        Point2 {
            x: self.x,
            y: self.y,
        }
    }
}

/// Running minimum and maximum of a set of scalars.
///
/// # Examples
///
/// ```
/// use tessel_core::ScalarRange;
///
/// let r = ScalarRange::from_values([3.0, -1.0, 2.5]);
/// assert_eq!(r.min, -1.0);
/// assert_eq!(r.max, 3.0);
/// assert_eq!(r.span(), 4.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarRange {
    /// Smallest value seen.
    pub min: f64,
    /// Largest value seen.
    pub max: f64,
}

impl ScalarRange {
    /// Construct from explicit bounds.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range that contains nothing; the first [`update`](Self::update)
    /// sets both bounds.
    pub const fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// `true` if no value has been folded in.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Extend the range to include `v`.
    pub fn update(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    /// `max - min`, or 0 for an empty range.
    pub fn span(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }

    /// `true` if `min <= v <= max`.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Fold a sequence of values into a range.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut r = Self::empty();
        for v in values {
            r.update(v);
        }
        r
    }
}

impl Default for ScalarRange {
    fn default() -> Self {
        Self::empty()
    }
}
