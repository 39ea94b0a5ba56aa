//! Geometric primitives for detected text regions.
//!
//! This module provides the point and oriented-box types used throughout the
//! pipeline, along with the convex-hull / rotating-calipers computation of
//! minimum-area enclosing rectangles and the corner-role assignment used by
//! the reading-order sequencer.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle with center, size, and rotation, representing a candidate
/// text region.
///
/// A box with center `(-1, -1)` and zero size is the reserved line-break
/// sentinel: it never carries text and is excluded from all geometric
/// output. Use [`OrientedBox::line_break`] to construct one and
/// [`OrientedBox::is_line_break`] to test for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    /// The center point of the rectangle.
    pub center: Point,
    /// The width of the rectangle.
    pub width: f32,
    /// The height of the rectangle.
    pub height: f32,
    /// The rotation angle of the rectangle in degrees.
    pub angle: f32,
}

impl OrientedBox {
    /// Creates a new oriented box.
    pub fn new(center: Point, width: f32, height: f32, angle: f32) -> Self {
        Self {
            center,
            width,
            height,
            angle,
        }
    }

    /// Creates the reserved line-break sentinel.
    pub const fn line_break() -> Self {
        Self {
            center: Point::new(-1.0, -1.0),
            width: 0.0,
            height: 0.0,
            angle: 0.0,
        }
    }

    /// Returns true if this box is the line-break sentinel.
    pub fn is_line_break(&self) -> bool {
        self.center.x == -1.0 && self.center.y == -1.0 && self.width == 0.0 && self.height == 0.0
    }

    /// Gets the length of the shorter side of the rectangle.
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Gets the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Gets the four corner points of the rectangle in local corner order
    /// (before any role assignment).
    pub fn corner_points(&self) -> [Point; 4] {
        let cos_a = (self.angle * PI / 180.0).cos();
        let sin_a = (self.angle * PI / 180.0).sin();

        let w_2 = self.width / 2.0;
        let h_2 = self.height / 2.0;

        let corners = [(-w_2, -h_2), (w_2, -h_2), (w_2, h_2), (-w_2, h_2)];

        corners.map(|(x, y)| {
            Point::new(
                x * cos_a - y * sin_a + self.center.x,
                x * sin_a + y * cos_a + self.center.y,
            )
        })
    }

    /// Gets the axis-aligned bounding rectangle of the box as
    /// `(x_min, y_min, width, height)`.
    pub fn bounding_rect(&self) -> (f32, f32, f32, f32) {
        let corners = self.corner_points();
        let mut x_min = f32::INFINITY;
        let mut y_min = f32::INFINITY;
        let mut x_max = f32::NEG_INFINITY;
        let mut y_max = f32::NEG_INFINITY;
        for p in corners {
            x_min = x_min.min(p.x);
            y_min = y_min.min(p.y);
            x_max = x_max.max(p.x);
            y_max = y_max.max(p.y);
        }
        (x_min, y_min, x_max - x_min, y_max - y_min)
    }
}

/// The four corners of an [`OrientedBox`] with reading-order roles assigned.
///
/// Derived on demand during sequencing, never stored. Only the top-left
/// corner participates in the ordering decision; the remaining roles are
/// assigned deterministically so the structure stays internally consistent.
#[derive(Debug, Clone, Copy)]
pub struct BoxCorners {
    /// The corner minimizing (y, then x).
    pub top_left: Point,
    /// The remaining corner on the top edge.
    pub top_right: Point,
    /// The corner maximizing (y, then x).
    pub bottom_right: Point,
    /// The remaining corner on the bottom edge.
    pub bottom_left: Point,
}

impl BoxCorners {
    /// Assigns corner roles for the given box.
    ///
    /// Top-left is the corner with the smallest y, breaking ties by the
    /// smallest x; bottom-right is the corner with the largest y, breaking
    /// ties by the largest x. Of the two remaining corners, the one with
    /// the larger x becomes top-right.
    pub fn of(bx: &OrientedBox) -> Self {
        let pts = bx.corner_points();

        let mut order: Vec<usize> = (0..4).collect();
        order.sort_by(|&a, &b| {
            (pts[a].y, pts[a].x)
                .partial_cmp(&(pts[b].y, pts[b].x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top_left = pts[order[0]];
        let bottom_right = pts[order[3]];
        let (mid_a, mid_b) = (pts[order[1]], pts[order[2]]);
        let (top_right, bottom_left) = if mid_a.x >= mid_b.x {
            (mid_a, mid_b)
        } else {
            (mid_b, mid_a)
        };

        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }
}

/// Computes the minimum-area oriented rectangle enclosing the given points.
///
/// Uses the rotating-calipers algorithm over the convex hull. Fewer than 3
/// points (or a degenerate hull) fall back to the axis-aligned bounding
/// rectangle of the input.
pub fn min_area_rect(points: &[Point]) -> OrientedBox {
    if points.len() < 3 {
        return axis_aligned_rect(points);
    }

    let hull = convex_hull(points);
    if hull.len() < 3 {
        return axis_aligned_rect(points);
    }

    let mut min_area = f32::MAX;
    let mut min_rect = OrientedBox::new(Point::new(0.0, 0.0), 0.0, 0.0, 0.0);

    let n = hull.len();
    for i in 0..n {
        let j = (i + 1) % n;

        let edge_x = hull[j].x - hull[i].x;
        let edge_y = hull[j].y - hull[i].y;
        let edge_length = (edge_x * edge_x + edge_y * edge_y).sqrt();

        // Skip degenerate edges
        if edge_length < f32::EPSILON {
            continue;
        }

        let nx = edge_x / edge_length;
        let ny = edge_y / edge_length;

        // Perpendicular vector
        let px = -ny;
        let py = nx;

        // Project all hull points onto the edge and perpendicular axes
        let mut min_n = f32::MAX;
        let mut max_n = f32::MIN;
        let mut min_p = f32::MAX;
        let mut max_p = f32::MIN;

        for point in &hull {
            let proj_n = nx * (point.x - hull[i].x) + ny * (point.y - hull[i].y);
            min_n = min_n.min(proj_n);
            max_n = max_n.max(proj_n);

            let proj_p = px * (point.x - hull[i].x) + py * (point.y - hull[i].y);
            min_p = min_p.min(proj_p);
            max_p = max_p.max(proj_p);
        }

        let width = max_n - min_n;
        let height = max_p - min_p;
        let area = width * height;

        if area < min_area {
            min_area = area;

            let center_n = (min_n + max_n) / 2.0;
            let center_p = (min_p + max_p) / 2.0;

            let center_x = hull[i].x + center_n * nx + center_p * px;
            let center_y = hull[i].y + center_n * ny + center_p * py;

            let angle_deg = f32::atan2(ny, nx) * 180.0 / PI;

            min_rect = OrientedBox::new(Point::new(center_x, center_y), width, height, angle_deg);
        }
    }

    min_rect
}

fn axis_aligned_rect(points: &[Point]) -> OrientedBox {
    let Some((min_x, max_x)) = points.iter().map(|p| p.x).minmax().into_option() else {
        return OrientedBox::new(Point::new(0.0, 0.0), 0.0, 0.0, 0.0);
    };
    let Some((min_y, max_y)) = points.iter().map(|p| p.y).minmax().into_option() else {
        return OrientedBox::new(Point::new(0.0, 0.0), 0.0, 0.0, 0.0);
    };

    OrientedBox::new(
        Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
        max_x - min_x,
        max_y - min_y,
        0.0,
    )
}

/// Computes the convex hull of a point set using Graham's scan.
fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut points = points.to_vec();

    // Find the point with the lowest y-coordinate (and leftmost if tied)
    let mut start_idx = 0;
    for i in 1..points.len() {
        if points[i].y < points[start_idx].y
            || (points[i].y == points[start_idx].y && points[i].x < points[start_idx].x)
        {
            start_idx = i;
        }
    }
    points.swap(0, start_idx);
    let start_point = points[0];

    // Sort points by polar angle with respect to the start point
    points[1..].sort_by(|a, b| {
        let cross = cross_product(&start_point, a, b);
        if cross == 0.0 {
            // Collinear: sort by distance from the start point
            let dist_a = (a.x - start_point.x).powi(2) + (a.y - start_point.y).powi(2);
            let dist_b = (b.x - start_point.x).powi(2) + (b.y - start_point.y).powi(2);
            dist_a
                .partial_cmp(&dist_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        } else if cross > 0.0 {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    });

    let mut hull: Vec<Point> = Vec::new();
    for point in points {
        while hull.len() > 1
            && cross_product(&hull[hull.len() - 2], &hull[hull.len() - 1], &point) <= 0.0
        {
            hull.pop();
        }
        hull.push(point);
    }

    hull
}

fn cross_product(p1: &Point, p2: &Point, p3: &Point) -> f32 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_roundtrip() {
        let sentinel = OrientedBox::line_break();
        assert!(sentinel.is_line_break());
        assert!(!OrientedBox::new(Point::new(0.0, 0.0), 1.0, 1.0, 0.0).is_line_break());
    }

    #[test]
    fn test_min_area_rect_axis_aligned() {
        let points = vec![
            Point::new(10.0, 20.0),
            Point::new(50.0, 20.0),
            Point::new(50.0, 40.0),
            Point::new(10.0, 40.0),
        ];
        let rect = min_area_rect(&points);

        assert!((rect.center.x - 30.0).abs() < 1e-3);
        assert!((rect.center.y - 30.0).abs() < 1e-3);
        assert!((rect.min_side() - 20.0).abs() < 1e-3);
        assert!((rect.area() - 800.0).abs() < 1e-1);
    }

    #[test]
    fn test_min_area_rect_degenerate() {
        let points = vec![Point::new(5.0, 5.0), Point::new(9.0, 5.0)];
        let rect = min_area_rect(&points);
        assert!((rect.width - 4.0).abs() < 1e-6);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn test_corner_roles_axis_aligned() {
        let bx = OrientedBox::new(Point::new(30.0, 30.0), 40.0, 20.0, 0.0);
        let corners = BoxCorners::of(&bx);

        assert!((corners.top_left.x - 10.0).abs() < 1e-3);
        assert!((corners.top_left.y - 20.0).abs() < 1e-3);
        assert!((corners.top_right.x - 50.0).abs() < 1e-3);
        assert!((corners.bottom_right.y - 40.0).abs() < 1e-3);
        assert!(corners.bottom_left.x < corners.bottom_right.x);
    }

    #[test]
    fn test_bounding_rect_rotated() {
        // A square rotated 45 degrees has a bounding box wider than its side
        let bx = OrientedBox::new(Point::new(0.0, 0.0), 10.0, 10.0, 45.0);
        let (x, y, w, h) = bx.bounding_rect();
        let diag = 10.0 * std::f32::consts::SQRT_2;
        assert!((w - diag).abs() < 1e-3);
        assert!((h - diag).abs() < 1e-3);
        assert!((x + diag / 2.0).abs() < 1e-3);
        assert!((y + diag / 2.0).abs() < 1e-3);
    }
}
