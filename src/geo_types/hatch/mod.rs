use crate::geo_types::clip::LineClip;
use geo::bounding_rect::BoundingRect;
use geo::rotate::Rotate;
use geo_types::{LineString, MultiLineString, MultiPolygon, Point, Polygon, Rect};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

pub mod line;
pub use line::LineHatch;
pub mod exponential;
pub use exponential::ExponentialHatch;
pub mod wave;
pub use wave::WaveHatch;
pub mod noise;
pub use noise::NoiseHatch;

/// #InvalidHatchGeometry
/// A bunch of excuses that the hatching traits will throw ;)
/// CouldNotGenerateHatch is just the total failure of the system.
/// InvalidBoundary means that we couldn't create a container boundary for the hatchlines.
/// InvalidResultGeometry means we calculated SOMEHING, but it's irrevocably broken.
#[derive(Debug)]
pub enum InvalidHatchGeometry {
    CouldNotGenerateHatch,
    InvalidBoundary,
    InvalidResultGeometry,
}

/// Display is required for these InvalidHatchGeometry Errors to be used in our Result fields.
impl Display for InvalidHatchGeometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            InvalidHatchGeometry::CouldNotGenerateHatch => f.write_str("Could not generate hatch"),
            InvalidHatchGeometry::InvalidBoundary => {
                f.write_str("Could not process boundary geometry")
            }
            InvalidHatchGeometry::InvalidResultGeometry => {
                f.write_str("Processed hatch, but result geometry was invalid")
            }
        }
    }
}

impl Error for InvalidHatchGeometry {}

/// # HatchPattern
/// Returns a MultiLineString which draws a hatch pattern which fills the entire
/// bbox area. Set up as a trait so the developer can add new patterns at their
/// leisure. Patterns always draw "horizontally"; the [`Hatch`] trait takes care of
/// rotating them into place.
pub trait HatchPattern: Debug + Send + Sync {
    fn generate(&self, bbox: &Rect<f64>, scale: f64, pen: f64) -> MultiLineString<f64>;
}

pub type Hatches = Arc<Box<dyn HatchPattern>>;

/// # Hatch
/// Trait which can be implemented for various geo_types, to provide fills
/// on their interiors. Requires an instance of a Pattern type, which
/// will be used to generate the hatch lines. Angle is the angle to rotate
/// the hatch pattern in degrees (0 is horizontal, 90 is vertical on an SVG).
/// Scale is the distance between lines (although other Pattern types may not
/// honor this exactly). Pen is the pen width; clipped pieces shorter than the
/// pen are dropped since the plotter would just draw a dot.
///
/// # Example hatching
/// ```rust
/// use std::sync::Arc;
/// use penwork::geo_types::hatch::{Hatch, LineHatch};
/// use penwork::geo_types::shapes::square;
///
/// let poly = square(50.0, 50.0, 40.0);
/// let hatch = poly
///     .hatch(Arc::new(Box::new(LineHatch {})), 45.0, 5.0, 0.5)
///     .expect("Got some hatches in here failin'");
/// assert!(!hatch.0.is_empty());
/// ```
pub trait Hatch {
    fn hatch(
        &self,
        pattern: Hatches,
        angle: f64,
        scale: f64,
        pen: f64,
    ) -> Result<MultiLineString<f64>, InvalidHatchGeometry>;
}

/// The no-hatch option
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoHatch {}

impl NoHatch {
    pub fn gen() -> Hatches {
        Arc::new(Box::new(Self::default()))
    }
}

impl HatchPattern for NoHatch {
    fn generate(&self, _bbox: &Rect<f64>, _scale: f64, _pen: f64) -> MultiLineString<f64> {
        MultiLineString::new(vec![])
    }
}

fn line_length(ls: &LineString<f64>) -> f64 {
    ls.lines().map(|l| l.dx().hypot(l.dy())).sum()
}

impl Hatch for MultiPolygon<f64> {
    fn hatch(
        &self,
        pattern: Hatches,
        angle: f64,
        scale: f64,
        pen: f64,
    ) -> Result<MultiLineString<f64>, InvalidHatchGeometry> {
        if self.0.is_empty() {
            return Ok(MultiLineString::new(vec![]));
        }
        if !(scale > 0.0) {
            return Err(InvalidHatchGeometry::CouldNotGenerateHatch);
        }
        let bbox = self
            .bounding_rect()
            .ok_or(InvalidHatchGeometry::InvalidBoundary)?;
        let pivot = Point::from(bbox.center());

        // Rotate the region into the pattern's frame, and use the bounds of that.
        // Hatch the whole multipolygon at once so disjoint parts line up.
        let frame = bbox
            .to_polygon()
            .rotate_around_point(-angle, pivot)
            .bounding_rect()
            .ok_or(InvalidHatchGeometry::CouldNotGenerateHatch)?;

        let hatch_lines = pattern
            .generate(&frame, scale, pen)
            .rotate_around_point(angle, pivot);
        if hatch_lines.0.is_empty() {
            return Ok(MultiLineString::new(vec![]));
        }

        let clipped = hatch_lines.clip_to(self);
        if clipped.0.iter().any(|ls| ls.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite())) {
            return Err(InvalidHatchGeometry::InvalidResultGeometry);
        }
        Ok(MultiLineString::new(
            clipped
                .0
                .into_iter()
                .filter(|ls| line_length(ls) >= pen)
                .collect(),
        ))
    }
}

impl Hatch for Polygon<f64> {
    fn hatch(
        &self,
        pattern: Hatches,
        angle: f64,
        scale: f64,
        pen: f64,
    ) -> Result<MultiLineString<f64>, InvalidHatchGeometry> {
        MultiPolygon::new(vec![self.clone()]).hatch(pattern, angle, scale, pen)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo_types::shapes::square;
    use geo::{Contains, Intersects};
    use geo_types::coord;
    use std::str::FromStr;
    use wkt::Wkt;

    fn diamond() -> Polygon<f64> {
        Polygon::<f64>::new(
            LineString::<f64>::new(vec![
                coord! {x: 0.0, y: 20.0},
                coord! {x: 20.0, y: 0.0},
                coord! {x: 0.0, y: -20.0},
                coord! {x: -20.0, y: 0.0},
                coord! {x: 0.0, y: 20.0},
            ]),
            vec![],
        )
    }

    #[test]
    fn test_box_hatch() {
        let rect = Rect::<f64>::new(coord! {x: 0.0, y: 0.0}, coord! {x: 100.0, y: 100.0});
        let lines = LineHatch {}.generate(&rect, 10.0, 1.0);
        assert_eq!(lines.0.len(), 10);
    }

    #[test]
    fn test_trait_hatch_poly() {
        let hatches = diamond()
            .hatch(LineHatch::gen(), 0.0, 5.0, 0.0)
            .expect("Failed to Ok the hatches.");
        // Rows at -17.5, -12.5 .. 17.5
        assert_eq!(hatches.0.len(), 8);
    }

    #[test]
    fn test_hatch_stays_inside() {
        let poly = diamond();
        let region = MultiPolygon::new(vec![poly.clone()]);
        let hatches = poly
            .hatch(LineHatch::gen(), 30.0, 3.0, 0.1)
            .expect("Angled hatch failed");
        assert!(!hatches.0.is_empty());
        for ls in hatches.iter() {
            let a = ls.0[0];
            let b = ls.0[ls.0.len() - 1];
            let mid = Point::from(a + (b - a) / 2.0);
            assert!(region.contains(&mid) || region.intersects(&mid));
        }
    }

    #[test]
    fn test_hatch_angle_direction() {
        // 90 degrees gives vertical lines.
        let hatches = square(0.0, 0.0, 40.0)
            .hatch(LineHatch::gen(), 90.0, 5.0, 0.5)
            .expect("Vertical hatch failed");
        for ls in hatches.iter() {
            let a = ls.0[0];
            let b = ls.0[ls.0.len() - 1];
            assert!((a.x - b.x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_polygon_with_hole() {
        let poly: Polygon<f64> = Polygon::try_from(
            Wkt::<f64>::from_str(
                "POLYGON ((0 0, 100 0, 100 100, 0 100, 0 0), (40 40, 60 40, 60 60, 40 60, 40 40))",
            )
            .expect("Failed to load WKT"),
        )
        .expect("Failed to load box");
        let hatches = poly
            .hatch(LineHatch::gen(), 0.0, 5.0, 0.5)
            .expect("Holey hatch failed");
        let hole = square(50.0, 50.0, 19.0);
        for ls in hatches.iter() {
            for c in ls.coords() {
                assert!(!hole.contains(&Point::from(*c)));
            }
        }
    }

    #[test]
    fn test_empty_region() {
        let hatches = MultiPolygon::<f64>::new(vec![])
            .hatch(LineHatch::gen(), 0.0, 5.0, 0.5)
            .expect("Empty regions hatch to nothing");
        assert!(hatches.0.is_empty());
    }

    #[test]
    fn test_zero_scale_is_error() {
        assert!(square(0.0, 0.0, 10.0)
            .hatch(LineHatch::gen(), 0.0, 0.0, 0.5)
            .is_err());
    }

    #[test]
    fn test_no_hatch() {
        let hatches = square(0.0, 0.0, 10.0)
            .hatch(NoHatch::gen(), 0.0, 1.0, 0.5)
            .expect("No hatch is still a hatch");
        assert!(hatches.0.is_empty());
    }
}
