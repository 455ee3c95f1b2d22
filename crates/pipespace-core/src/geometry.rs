//! Geometric primitives for pipe arrangement drawings.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in drawing space
//! - [`Bounds`] - A rectangular box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Pipespace uses the drafting convention of CAD tools, not the screen one:
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```
//!
//! - **Origin**: The left end of the common bottom line
//! - **X-axis**: Along the row of pipes
//! - **Y-axis**: Increases upward, away from the bottom line
//!
//! All values are millimetres.

/// A 2D point in drawing space.
///
/// # Examples
///
/// ```
/// # use pipespace_core::geometry::Point;
/// let center = Point::new(84.0, 84.0);
/// let above = center.add_point(Point::new(0.0, 42.0));
/// assert_eq!(above.y(), 126.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// An axis-aligned rectangle described by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds spanning the two corner points, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Creates the square bounds of a circle.
    pub fn around_circle(center: Point, radius: f64) -> Self {
        Self {
            min_x: center.x - radius,
            min_y: center.y - radius,
            max_x: center.x + radius,
            max_y: center.y + radius,
        }
    }

    pub fn min_x(self) -> f64 {
        self.min_x
    }

    pub fn min_y(self) -> f64 {
        self.min_y
    }

    pub fn max_x(self) -> f64 {
        self.max_x
    }

    pub fn max_y(self) -> f64 {
        self.max_y
    }

    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pipespace_core::geometry::{Bounds, Point};
    /// let pipe = Bounds::around_circle(Point::new(84.0, 84.0), 84.0);
    /// let line = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(363.0, 0.0));
    ///
    /// let all = pipe.merge(&line);
    /// assert_eq!(all.width(), 363.0);
    /// assert_eq!(all.height(), 168.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_with_coordinates() {
        let p = Point::new(1.0, 2.0).with_y(7.0);
        assert_eq!(p, Point::new(1.0, 7.0));
    }

    #[test]
    fn test_bounds_from_corners_orders_coordinates() {
        let b = Bounds::from_corners(Point::new(10.0, 50.0), Point::new(-5.0, 20.0));
        assert_eq!(b.min_x(), -5.0);
        assert_eq!(b.min_y(), 20.0);
        assert_eq!(b.max_x(), 10.0);
        assert_eq!(b.max_y(), 50.0);
    }

    #[test]
    fn test_bounds_expand() {
        let b = Bounds::around_circle(Point::new(0.0, 0.0), 10.0).expand(5.0);
        assert_eq!(b.width(), 30.0);
        assert_eq!(b.height(), 30.0);
    }
}
