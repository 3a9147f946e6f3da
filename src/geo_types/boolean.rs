use crate::errors::GeometryError;
use crate::geo_types::flatten::FlattenPolygons;
use geo::BooleanOps;
use geo_types::{Geometry, MultiPolygon, Polygon};

/// Boolean operations trait. Used to give boolean caps to geo_types
/// shapes. Basically just a wrapper on the geo boolean ops that always
/// hands back a MultiPolygon, since that's what every op can produce.
pub trait BooleanOp {
    /// Subtract other from self
    fn difference(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64>;

    /// The combination of both other and self
    fn union(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64>;

    /// Returns only the portion of self that overlaps other
    fn intersection(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64>;
}

impl BooleanOp for MultiPolygon<f64> {
    fn difference(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        BooleanOps::difference(self, other)
    }

    fn union(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        BooleanOps::union(self, other)
    }

    fn intersection(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        BooleanOps::intersection(self, other)
    }
}

impl BooleanOp for Polygon<f64> {
    fn difference(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        BooleanOps::difference(self, other)
    }

    fn union(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        BooleanOps::union(self, other)
    }

    fn intersection(&self, other: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        BooleanOps::intersection(self, other)
    }
}

/// Unary union; merges a whole pile of polygons into their combined outline.
/// Done as a pairwise tree reduction so big piles don't keep re-processing one
/// ever growing accumulator.
pub fn unary_union<'a, I>(polys: I) -> MultiPolygon<f64>
where
    I: IntoIterator<Item = &'a Polygon<f64>>,
{
    let mut layer: Vec<MultiPolygon<f64>> = polys
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p.clone()]))
        .collect();
    if layer.is_empty() {
        return MultiPolygon::new(vec![]);
    }
    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => BooleanOp::union(a, b),
                [a] => a.clone(),
                _ => MultiPolygon::new(vec![]),
            })
            .collect();
    }
    // A single input still gets normalized (holes, orientation, self intersections).
    let merged = layer.pop().unwrap_or_else(|| MultiPolygon::new(vec![]));
    BooleanOp::union(&merged, &MultiPolygon::new(vec![]))
}

/// Union of every polygon found in an arbitrary geometry.
pub fn unary_union_geometry(geo: &Geometry<f64>) -> Result<MultiPolygon<f64>, GeometryError> {
    let polys = geo.flatten_polys()?;
    Ok(unary_union(polys.0.iter()))
}
