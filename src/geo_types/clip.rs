use geo::BooleanOps;
use geo_types::{LineString, MultiLineString, MultiPolygon, Polygon};

/// Pieces shorter than this are numerical crumbs from the clipper and get dropped.
const MIN_SEGMENT: f64 = 1e-9;

/// Clip lines with a region. Useful for keeping hatches inside their shape, or
/// for clipping lines behind another object to emulate 3D without the... 3D?
pub trait LineClip {
    /// Keep only the parts of self inside the region.
    fn clip_to(&self, region: &MultiPolygon<f64>) -> MultiLineString<f64>;

    /// Keep only the parts of self outside the region.
    fn clip_outside(&self, region: &MultiPolygon<f64>) -> MultiLineString<f64>;
}

fn usable(ls: &LineString<f64>) -> bool {
    if ls.0.len() < 2 {
        return false;
    }
    ls.lines()
        .any(|l| (l.dx().powi(2) + l.dy().powi(2)).sqrt() > MIN_SEGMENT)
}

fn tidy(mls: MultiLineString<f64>) -> MultiLineString<f64> {
    MultiLineString::new(mls.0.into_iter().filter(usable).collect())
}

impl LineClip for MultiLineString<f64> {
    fn clip_to(&self, region: &MultiPolygon<f64>) -> MultiLineString<f64> {
        if self.0.is_empty() || region.0.is_empty() {
            return MultiLineString::new(vec![]);
        }
        tidy(region.clip(self, false))
    }

    fn clip_outside(&self, region: &MultiPolygon<f64>) -> MultiLineString<f64> {
        if region.0.is_empty() {
            return tidy(self.clone());
        }
        tidy(region.clip(self, true))
    }
}

impl LineClip for LineString<f64> {
    fn clip_to(&self, region: &MultiPolygon<f64>) -> MultiLineString<f64> {
        MultiLineString::new(vec![self.clone()]).clip_to(region)
    }

    fn clip_outside(&self, region: &MultiPolygon<f64>) -> MultiLineString<f64> {
        MultiLineString::new(vec![self.clone()]).clip_outside(region)
    }
}

/// Polygon convenience, so a lone shape can be used as the clip region.
pub fn clip_to_polygon(lines: &MultiLineString<f64>, poly: &Polygon<f64>) -> MultiLineString<f64> {
    lines.clip_to(&MultiPolygon::new(vec![poly.clone()]))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo_types::shapes::square;
    use geo::Contains;

    fn length(ls: &LineString<f64>) -> f64 {
        ls.lines().map(|l| l.dx().hypot(l.dy())).sum()
    }

    #[test]
    fn test_clip_simple() {
        let lines = MultiLineString::new(vec![LineString::from(vec![(-50.0, 0.0), (50.0, 0.0)])]);
        let region = MultiPolygon::new(vec![square(0.0, 0.0, 20.0)]);
        let clipped = lines.clip_to(&region);
        assert_eq!(clipped.0.len(), 1);
        assert!((length(&clipped.0[0]) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_two_holes_in_line() {
        // A line across two disjoint squares comes back as two pieces.
        let lines = MultiLineString::new(vec![LineString::from(vec![(-50.0, 0.0), (50.0, 0.0)])]);
        let region = MultiPolygon::new(vec![square(-20.0, 0.0, 10.0), square(20.0, 0.0, 10.0)]);
        let clipped = lines.clip_to(&region);
        assert_eq!(clipped.0.len(), 2);
        for piece in clipped.0.iter() {
            let mid = piece.0[0] + (piece.0[piece.0.len() - 1] - piece.0[0]) / 2.0;
            assert!(region.contains(&geo_types::Point::from(mid)));
        }
    }

    #[test]
    fn test_clip_outside() {
        let line = LineString::from(vec![(-50.0, 0.0), (50.0, 0.0)]);
        let region = MultiPolygon::new(vec![square(0.0, 0.0, 20.0)]);
        let outside = line.clip_outside(&region);
        assert_eq!(outside.0.len(), 2);
    }

    #[test]
    fn test_clip_to_polygon() {
        let lines = MultiLineString::new(vec![LineString::from(vec![(0.0, -50.0), (0.0, 50.0)])]);
        let clipped = clip_to_polygon(&lines, &square(0.0, 0.0, 30.0));
        assert_eq!(clipped.0.len(), 1);
        assert!((length(&clipped.0[0]) - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_empty_region() {
        let lines = MultiLineString::new(vec![LineString::from(vec![(0.0, 0.0), (1.0, 0.0)])]);
        assert!(lines.clip_to(&MultiPolygon::new(vec![])).0.is_empty());
    }
}
