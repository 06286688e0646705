use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

use crate::models::BoundingBox;

/// Douglas-Peucker tolerance in pixels
pub const POLYGON_EPSILON: f64 = 3.0;

/// Contours of an edge map with their simplified polygons and boxes.
///
/// The four vectors are aligned and sorted by enclosed area, largest first.
/// Equal areas keep the order in which border following found them.
#[derive(Debug, Clone, Default)]
pub struct ContourSet {
    pub contours: Vec<Contour<i32>>,
    pub polygons: Vec<Vec<Point<i32>>>,
    pub boxes: Vec<BoundingBox>,
    pub areas: Vec<f64>,
}

impl ContourSet {
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Number of hole borders in the set
    pub fn hole_count(&self) -> usize {
        self.contours
            .iter()
            .filter(|c| matches!(c.border_type, BorderType::Hole))
            .count()
    }
}

/// Find outer and hole borders in a binary edge image and rank them by area
pub fn analyze_contours(edges: &GrayImage) -> ContourSet {
    let found = find_contours::<i32>(edges);
    let areas: Vec<f64> = found.iter().map(|c| enclosed_area(&c.points)).collect();

    let mut order: Vec<usize> = (0..found.len()).collect();
    order.sort_by(|&a, &b| areas[b].total_cmp(&areas[a]));

    let mut slots: Vec<Option<Contour<i32>>> = found.into_iter().map(Some).collect();
    let mut set = ContourSet::default();
    for index in order {
        let Some(contour) = slots[index].take() else {
            continue;
        };
        let polygon = simplify(&contour.points);
        let Some(bbox) = bounding_rect(&polygon) else {
            continue;
        };
        set.areas.push(areas[index]);
        set.polygons.push(polygon);
        set.boxes.push(bbox);
        set.contours.push(contour);
    }

    set
}

/// Closed Douglas-Peucker simplification; tiny contours are kept as-is
pub fn simplify(points: &[Point<i32>]) -> Vec<Point<i32>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    approximate_polygon_dp(points, POLYGON_EPSILON, true)
}

/// Area enclosed by a closed point sequence (shoelace formula)
pub fn enclosed_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

/// Smallest upright rectangle containing every point, sizes inclusive
pub fn bounding_rect(points: &[Point<i32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let min_x = min_x.max(0);
    let min_y = min_y.max(0);

    Some(BoundingBox::new(
        min_x as u32,
        min_y as u32,
        (max_x - min_x + 1).max(1) as u32,
        (max_y - min_y + 1).max(1) as u32,
    ))
}
