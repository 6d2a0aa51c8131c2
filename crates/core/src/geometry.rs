//! Geometric primitives in point units with a top-left origin.

use serde::{Deserialize, Serialize};

/// Tolerance for comparing computed coordinates.
pub const EPSILON: f64 = 1e-6;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Axis along which elements are grouped.
///
/// `Rows` groups by vertical position (members share a top), `Columns` by
/// horizontal position (members share a left).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Rows,
    Columns,
}

impl Axis {
    /// Leading coordinate of `g` along this axis.
    #[inline]
    pub fn start(self, g: &Geometry) -> f64 {
        match self {
            Axis::Rows => g.top,
            Axis::Columns => g.left,
        }
    }

    /// Extent of `g` along this axis (height for rows, width for columns).
    #[inline]
    pub fn extent(self, g: &Geometry) -> f64 {
        match self {
            Axis::Rows => g.height,
            Axis::Columns => g.width,
        }
    }

    pub fn other(self) -> Axis {
        match self {
            Axis::Rows => Axis::Columns,
            Axis::Columns => Axis::Rows,
        }
    }
}

/// Position and size of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds a geometry from two corners.
    pub fn from_corners(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Inclusive containment: a point on the border is inside.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Returns a copy centred on `other`'s centre, keeping this size.
    pub fn centered_in(&self, other: &Geometry) -> Geometry {
        let (cx, cy) = other.center();
        Geometry::new(
            cx - self.width / 2.0,
            cy - self.height / 2.0,
            self.width,
            self.height,
        )
    }

    pub fn with_position(&self, left: f64, top: f64) -> Geometry {
        Geometry { left, top, ..*self }
    }

    pub fn with_size(&self, width: f64, height: f64) -> Geometry {
        Geometry {
            width,
            height,
            ..*self
        }
    }

    pub fn approx_eq(&self, other: &Geometry, epsilon: f64) -> bool {
        approx_eq(self.left, other.left, epsilon)
            && approx_eq(self.top, other.top, epsilon)
            && approx_eq(self.width, other.width, epsilon)
            && approx_eq(self.height, other.height, epsilon)
    }
}

/// Smallest geometry covering every input, or `None` for an empty input.
pub fn bounding_box<'a, I>(geoms: I) -> Option<Geometry>
where
    I: IntoIterator<Item = &'a Geometry>,
{
    let mut left = f64::INFINITY;
    let mut top = f64::INFINITY;
    let mut right = f64::NEG_INFINITY;
    let mut bottom = f64::NEG_INFINITY;
    let mut any = false;
    for g in geoms {
        any = true;
        left = left.min(g.left);
        top = top.min(g.top);
        right = right.max(g.right());
        bottom = bottom.max(g.bottom());
    }
    any.then(|| Geometry::from_corners(left, top, right, bottom))
}

/// Arithmetic mean, or `None` when empty.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}
