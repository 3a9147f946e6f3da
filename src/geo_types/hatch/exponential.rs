use super::{HatchPattern, Hatches};
use geo_types::{coord, LineString, MultiLineString, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Gaps never shrink below this fraction of the base spacing, otherwise a
/// growth under 1.0 would never reach the edge of the box.
const MIN_GAP_FRACTION: f64 = 0.05;
const MAX_ROWS: usize = 10_000;

/// Parallel lines whose spacing grows geometrically from the middle of the
/// box outwards: `gap_k = scale * growth^k`, mirrored on both sides.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExponentialHatch {
    pub growth: f64,
}

impl Default for ExponentialHatch {
    fn default() -> Self {
        ExponentialHatch { growth: 1.15 }
    }
}

impl ExponentialHatch {
    pub fn gen(growth: f64) -> Hatches {
        Arc::new(Box::new(ExponentialHatch { growth }))
    }

    /// Row offsets from the centre line, including 0.
    fn offsets(&self, half_extent: f64, scale: f64) -> Vec<f64> {
        let mut out = vec![0.0];
        let floor = scale * MIN_GAP_FRACTION;
        let mut gap = scale;
        let mut offset = 0.0;
        while out.len() < MAX_ROWS {
            offset += gap.max(floor);
            if offset > half_extent {
                break;
            }
            out.push(offset);
            gap *= self.growth.abs();
        }
        out
    }
}

impl HatchPattern for ExponentialHatch {
    fn generate(&self, bbox: &Rect<f64>, scale: f64, _pen: f64) -> MultiLineString<f64> {
        if !(scale > 0.0) {
            return MultiLineString::new(vec![]);
        }
        let min = bbox.min();
        let max = bbox.max();
        let centre = (min.y + max.y) / 2.0;
        let mut rows: Vec<f64> = vec![];
        for offset in self.offsets(bbox.height() / 2.0, scale) {
            rows.push(centre - offset);
            if offset > 0.0 {
                rows.push(centre + offset);
            }
        }
        rows.sort_by(|a, b| a.total_cmp(b));

        MultiLineString::new(
            rows.iter()
                .enumerate()
                .map(|(i, y)| {
                    let (from, to) = if i % 2 == 0 {
                        (min.x, max.x)
                    } else {
                        (max.x, min.x)
                    };
                    LineString::new(vec![coord! {x: from, y: *y}, coord! {x: to, y: *y}])
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_gaps_grow() {
        let rect = Rect::new(coord! {x: 0.0, y: -100.0}, coord! {x: 10.0, y: 100.0});
        let lines = ExponentialHatch { growth: 1.5 }.generate(&rect, 4.0, 0.5);
        let ys: Vec<f64> = lines.0.iter().map(|l| l.0[0].y).collect();
        // Mirrored about the centre, with the centre line itself.
        assert_eq!(ys.len() % 2, 1);
        let upper: Vec<f64> = ys.iter().copied().filter(|y| *y >= 0.0).collect();
        assert_eq!(upper[0], 0.0);
        assert!((upper[1] - 4.0).abs() < 1e-9);
        assert!((upper[2] - 10.0).abs() < 1e-9);
        for w in upper.windows(3) {
            assert!(w[2] - w[1] > w[1] - w[0]);
        }
        assert!(ys.iter().all(|y| y.abs() <= 100.0));
    }

    #[test]
    fn test_shrinking_growth_terminates() {
        let rect = Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: 10.0, y: 1000.0});
        let lines = ExponentialHatch { growth: 0.5 }.generate(&rect, 10.0, 0.5);
        assert!(lines.0.len() > 10);
        assert!(lines.0.len() < MAX_ROWS * 2);
    }
}
