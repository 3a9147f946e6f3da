use super::wave::sample_step;
use super::{HatchPattern, Hatches};
use geo_types::{coord, LineString, MultiLineString, Rect};
use noise::{NoiseFn, OpenSimplex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Rows displaced by an OpenSimplex field. `frequency` scales the coordinates
/// fed to the field, `amplitude` the displacement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NoiseHatch {
    pub seed: u32,
    pub amplitude: f64,
    pub frequency: f64,
}

impl Default for NoiseHatch {
    fn default() -> Self {
        NoiseHatch {
            seed: 42,
            amplitude: 6.0,
            frequency: 0.02,
        }
    }
}

impl NoiseHatch {
    pub fn gen(seed: u32, amplitude: f64, frequency: f64) -> Hatches {
        Arc::new(Box::new(NoiseHatch {
            seed,
            amplitude,
            frequency,
        }))
    }
}

impl HatchPattern for NoiseHatch {
    fn generate(&self, bbox: &Rect<f64>, scale: f64, pen: f64) -> MultiLineString<f64> {
        if !(scale > 0.0) {
            return MultiLineString::new(vec![]);
        }
        let field = OpenSimplex::new(self.seed);
        let min = bbox.min();
        let max = bbox.max();
        let amp = self.amplitude.abs();
        // One sample per 1/8th of a noise "feature"
        let feature = if self.frequency.abs() > 0.0 {
            1.0 / self.frequency.abs()
        } else {
            max.x - min.x
        };
        let step = sample_step(feature * 2.0, pen);
        let samples = ((max.x - min.x) / step).ceil().max(1.0) as usize;

        let mut lines = vec![];
        let mut y = min.y - amp + scale / 2.0;
        while y < max.y + amp {
            lines.push(LineString::new(
                (0..=samples)
                    .map(|i| {
                        let x = (min.x + step * i as f64).min(max.x);
                        let n = field.get([x * self.frequency, y * self.frequency]);
                        coord! {x: x, y: y + amp * n}
                    })
                    .collect(),
            ));
            y += scale;
        }
        MultiLineString::new(lines)
    }
}
