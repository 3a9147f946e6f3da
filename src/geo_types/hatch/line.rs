use super::{HatchPattern, Hatches};
use geo_types::{coord, LineString, MultiLineString, Rect};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// The basic parallel LineHatch. Rows sit half a spacing in from the edges,
/// and every other row runs backwards so a plotter can zig-zag through them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct LineHatch {}

impl LineHatch {
    pub fn gen() -> Hatches {
        Arc::new(Box::new(Self::default()))
    }
}

impl HatchPattern for LineHatch {
    fn generate(&self, bbox: &Rect<f64>, scale: f64, _pen: f64) -> MultiLineString<f64> {
        let min = bbox.min();
        let max = bbox.max();
        let mut lines: Vec<LineString<f64>> = vec![];
        if !(scale > 0.0) {
            return MultiLineString::new(lines);
        }
        let mut y = min.y + scale / 2.0;
        let mut count = 0u32;
        while y < max.y {
            let (from, to) = if count % 2 == 0 {
                (min.x, max.x)
            } else {
                (max.x, min.x)
            };
            lines.push(LineString::new(vec![
                coord! {x: from, y: y},
                coord! {x: to, y: y},
            ]));
            y += scale;
            count += 1;
        }
        MultiLineString::new(lines)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rows_alternate() {
        let rect = Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: 10.0, y: 30.0});
        let lines = LineHatch {}.generate(&rect, 10.0, 0.5);
        assert_eq!(lines.0.len(), 3);
        assert_eq!(lines.0[0].0[0].x, 0.0);
        assert_eq!(lines.0[1].0[0].x, 10.0);
        assert_eq!(lines.0[1].0[0].y, 15.0);
    }
}
