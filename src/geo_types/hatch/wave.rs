use super::{HatchPattern, Hatches};
use geo_types::{coord, LineString, MultiLineString, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

/// Sine wave rows every `scale` units. The rows extend an amplitude past the
/// box so troughs still reach the corners.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WaveHatch {
    pub amplitude: f64,
    pub wavelength: f64,
}

impl Default for WaveHatch {
    fn default() -> Self {
        WaveHatch {
            amplitude: 4.0,
            wavelength: 40.0,
        }
    }
}

impl WaveHatch {
    pub fn gen(amplitude: f64, wavelength: f64) -> Hatches {
        Arc::new(Box::new(WaveHatch {
            amplitude,
            wavelength,
        }))
    }
}

/// Sample step along a curved row. Finer than the pen is pointless.
pub(crate) fn sample_step(wavelength: f64, pen: f64) -> f64 {
    (wavelength / 16.0).max(pen).max(0.25)
}

impl HatchPattern for WaveHatch {
    fn generate(&self, bbox: &Rect<f64>, scale: f64, pen: f64) -> MultiLineString<f64> {
        if !(scale > 0.0) || !(self.wavelength > 0.0) {
            return MultiLineString::new(vec![]);
        }
        let min = bbox.min();
        let max = bbox.max();
        let amp = self.amplitude.abs();
        let step = sample_step(self.wavelength, pen);
        let samples = ((max.x - min.x) / step).ceil().max(1.0) as usize;

        let mut lines = vec![];
        let mut y = min.y - amp + scale / 2.0;
        while y < max.y + amp {
            lines.push(LineString::new(
                (0..=samples)
                    .map(|i| {
                        let x = (min.x + step * i as f64).min(max.x);
                        coord! {x: x, y: y + amp * (2.0 * PI * (x - min.x) / self.wavelength).sin()}
                    })
                    .collect(),
            ));
            y += scale;
        }
        MultiLineString::new(lines)
    }
}
