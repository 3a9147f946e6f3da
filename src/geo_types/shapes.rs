//! Kinda weird that these are missing from geo_types, but ok, here they are.
use crate::geo_types::boolean::BooleanOp;
use geo_types::{coord, Coord, LineString, MultiPolygon, Polygon};
use std::f64::consts::PI;

/// Closed ring from an open list of coordinates.
fn closed_ring(mut coords: Vec<Coord<f64>>) -> LineString<f64> {
    if let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied()) {
        if first != last {
            coords.push(first);
        }
    }
    LineString::new(coords)
}

/// Regular polygon with `sides` vertices on a circle of `radius` around x,y. The first
/// vertex sits at `rotation` radians (0 is "east", increasing clockwise on an SVG).
pub fn regular_poly(sides: usize, x: f64, y: f64, radius: f64, rotation: f64) -> Polygon<f64> {
    let sides = sides.max(3);
    Polygon::new(
        closed_ring(
            (0..sides)
                .map(|i| {
                    let angle = rotation + 2.0 * PI * (i as f64) / (sides as f64);
                    coord! {x: x + radius * angle.cos(), y: y + radius * angle.sin()}
                })
                .collect(),
        ),
        vec![],
    )
}

/// Circle of the given *diameter*, approximated by a regular polygon.
pub fn circle(x: f64, y: f64, diameter: f64, sides: usize) -> Polygon<f64> {
    regular_poly(sides, x, y, diameter.abs() / 2.0, 0.0)
}

/// Axis aligned square centered on x,y.
pub fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
    let half = size / 2.0;
    Polygon::new(
        closed_ring(vec![
            coord! {x: x - half, y: y - half},
            coord! {x: x + half, y: y - half},
            coord! {x: x + half, y: y + half},
            coord! {x: x - half, y: y + half},
        ]),
        vec![],
    )
}

/// Equilateral triangle with its vertices `size` away from the center.
pub fn triangle(x: f64, y: f64, size: f64, rotation: f64) -> Polygon<f64> {
    regular_poly(3, x, y, size, rotation)
}

/// Star-ish polygon. Each entry of `radii` is one vertex, spread evenly around
/// the circle starting at `angle_offset`. Alternating long and short radii give
/// you lobes and valleys.
pub fn star(x: f64, y: f64, radii: &[f64], angle_offset: f64) -> Polygon<f64> {
    let count = radii.len() as f64;
    Polygon::new(
        closed_ring(
            radii
                .iter()
                .enumerate()
                .map(|(i, radius)| {
                    let angle = angle_offset + 2.0 * PI * (i as f64) / count;
                    coord! {x: x + radius * angle.cos(), y: y + radius * angle.sin()}
                })
                .collect(),
        ),
        vec![],
    )
}

/// Equivalent of a zero buffer: runs the polygon through the boolean engine so
/// self intersections get resolved into valid (multi)polygons.
pub fn repair(poly: &Polygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![poly.clone()]).union(&MultiPolygon::new(vec![]))
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::Area;

    #[test]
    fn test_square_area() {
        let sq = square(10.0, 10.0, 20.0);
        assert!((sq.unsigned_area() - 400.0).abs() < 1e-9);
        assert_eq!(sq.exterior().0.len(), 5);
    }

    #[test]
    fn test_circle_is_closed_and_close_to_pi_r2() {
        let c = circle(0.0, 0.0, 200.0, 64);
        assert_eq!(c.exterior().0.first(), c.exterior().0.last());
        let expected = PI * 100.0 * 100.0;
        // 64-gon is within half a percent of the real circle
        assert!((c.unsigned_area() - expected).abs() / expected < 0.005);
    }

    #[test]
    fn test_triangle_vertices() {
        let t = triangle(0.0, 0.0, 10.0, 0.0);
        let first = t.exterior().0[0];
        assert!((first.x - 10.0).abs() < 1e-9);
        assert!(first.y.abs() < 1e-9);
        assert_eq!(t.exterior().0.len(), 4);
    }

    #[test]
    fn test_repair_bowtie() {
        // Self intersecting bowtie splits into two triangles.
        let bowtie = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![],
        );
        let fixed = repair(&bowtie);
        assert!(fixed.unsigned_area() > 0.0);
        assert!((fixed.unsigned_area() - 50.0).abs() < 1e-6);
    }
}
