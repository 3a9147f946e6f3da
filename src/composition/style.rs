use crate::geo_types::hatch::{ExponentialHatch, Hatches, LineHatch, NoiseHatch, WaveHatch};
use serde::{Deserialize, Serialize};

/// The five colour palette the compositions are drawn from.
pub const PALETTE: [&str; 5] = ["#4361ee", "#4cc9f0", "#ef476f", "#ffd166", "#06d6a0"];

/// Dashed outline colours for the region debug view.
pub const REGION_COLORS: [&str; 5] = ["red", "green", "blue", "orange", "purple"];

/// Which family of lines fills a region.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub enum LineKind {
    #[default]
    Straight,
    Exponential {
        growth: f64,
    },
    Wavy {
        amplitude: f64,
        wavelength: f64,
    },
    Noise {
        seed: u32,
        amplitude: f64,
        frequency: f64,
    },
}

impl LineKind {
    pub fn pattern(&self) -> Hatches {
        match self {
            LineKind::Straight => LineHatch::gen(),
            LineKind::Exponential { growth } => ExponentialHatch::gen(*growth),
            LineKind::Wavy {
                amplitude,
                wavelength,
            } => WaveHatch::gen(*amplitude, *wavelength),
            LineKind::Noise {
                seed,
                amplitude,
                frequency,
            } => NoiseHatch::gen(*seed, *amplitude, *frequency),
        }
    }
}

/// A hatch recipe: one pass per angle (degrees), `spacing` apart. `line`
/// overrides the composition's line kind table for this recipe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HatchStyle {
    pub angles: Vec<f64>,
    pub spacing: f64,
    #[serde(default)]
    pub line: Option<LineKind>,
}

impl HatchStyle {
    pub fn new(angles: &[f64], spacing: f64) -> HatchStyle {
        HatchStyle {
            angles: angles.to_vec(),
            spacing,
            line: None,
        }
    }
}

/// Single angles, perpendicular pairs, then a few odd mixes.
pub fn default_patterns() -> Vec<HatchStyle> {
    vec![
        HatchStyle::new(&[0.0], 12.0),
        HatchStyle::new(&[15.0], 12.0),
        HatchStyle::new(&[30.0], 12.0),
        HatchStyle::new(&[45.0], 12.0),
        HatchStyle::new(&[60.0], 12.0),
        HatchStyle::new(&[75.0], 12.0),
        HatchStyle::new(&[90.0], 12.0),
        HatchStyle::new(&[0.0, 90.0], 12.0),
        HatchStyle::new(&[15.0, 105.0], 12.0),
        HatchStyle::new(&[30.0, 120.0], 12.0),
        HatchStyle::new(&[45.0, 135.0], 12.0),
        HatchStyle::new(&[0.0, 45.0], 12.0),
        HatchStyle::new(&[30.0, 75.0], 12.0),
        HatchStyle::new(&[15.0, 60.0], 12.0),
        HatchStyle::new(&[0.0, 30.0, 60.0, 90.0], 20.0),
        HatchStyle::new(&[15.0, 45.0, 75.0], 18.0),
    ]
}

/// Picks the hatch recipe and line family for a colour. Tables wrap around, an
/// empty pattern table falls back to plain horizontal lines.
pub fn style_for(
    color_index: usize,
    patterns: &[HatchStyle],
    line_kinds: &[LineKind],
) -> (HatchStyle, LineKind) {
    let style = if patterns.is_empty() {
        HatchStyle::new(&[0.0], 12.0)
    } else {
        patterns[color_index % patterns.len()].clone()
    };
    let line = match &style.line {
        Some(line) => line.clone(),
        None if line_kinds.is_empty() => LineKind::Straight,
        None => line_kinds[color_index % line_kinds.len()].clone(),
    };
    (style, line)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let patterns = default_patterns();
        assert_eq!(patterns.len(), 16);
        assert_eq!(patterns[14].angles, vec![0.0, 30.0, 60.0, 90.0]);
        assert_eq!(patterns[15].spacing, 18.0);
    }

    #[test]
    fn test_style_wraps() {
        let patterns = default_patterns();
        let kinds = vec![
            LineKind::Straight,
            LineKind::Exponential { growth: 1.2 },
        ];
        let (style, line) = style_for(17, &patterns, &kinds);
        assert_eq!(style.angles, vec![15.0]);
        assert_eq!(line, LineKind::Exponential { growth: 1.2 });
    }

    #[test]
    fn test_style_override_and_empty_tables() {
        let mut patterns = vec![HatchStyle::new(&[45.0], 6.0)];
        patterns[0].line = Some(LineKind::Wavy {
            amplitude: 2.0,
            wavelength: 20.0,
        });
        let (_, line) = style_for(3, &patterns, &[LineKind::Straight]);
        assert!(matches!(line, LineKind::Wavy { .. }));

        let (style, line) = style_for(3, &[], &[]);
        assert_eq!(style.angles, vec![0.0]);
        assert_eq!(line, LineKind::Straight);
    }
}
