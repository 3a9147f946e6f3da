//! Rows of wavy lines. Three flavours:
//!
//! * `Random`: sine rows with per-row amplitude, wavelength and phase, a slow
//!   amplitude swell and a bit of jitter, each row with its own pen width.
//! * `Flowing`: straight rows pushed around by two octaves of OpenSimplex.
//! * `Topographic`: fBm Perlin plus ripples spreading from a 3x3 grid of
//!   centres, with pen widths that swell and shrink down the page.
//!
//! Rows are sampled as points and smoothed into cubic Béziers on output.
use crate::context::Context;
use crate::geo_types::svg::SmoothCurve;
use geo_types::{coord, Coord};
use log::{debug, info};
use noise::{Fbm, MultiFractal, NoiseFn, OpenSimplex, Perlin};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavePattern {
    Random,
    #[default]
    Flowing,
    Topographic,
}

impl WavePattern {
    /// How the sampled rows get smoothed.
    pub fn curve(&self) -> SmoothCurve {
        match self {
            WavePattern::Random => SmoothCurve::Thirds,
            WavePattern::Flowing | WavePattern::Topographic => SmoothCurve::Midpoint,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RandomWaveParams {
    pub width: f64,
    pub height: f64,
    pub num_waves: usize,
    pub min_wave_height: f64,
    pub max_wave_height: f64,
    pub min_wavelength: f64,
    pub max_wavelength: f64,
    pub min_stroke_width: f64,
    pub max_stroke_width: f64,
    pub line_spacing: f64,
    pub randomness: f64,
    pub variation_frequency: f64,
}

impl Default for RandomWaveParams {
    fn default() -> Self {
        RandomWaveParams {
            width: 800.0,
            height: 600.0,
            num_waves: 20,
            min_wave_height: 10.0,
            max_wave_height: 50.0,
            min_wavelength: 50.0,
            max_wavelength: 150.0,
            min_stroke_width: 1.0,
            max_stroke_width: 4.0,
            line_spacing: 6.0,
            randomness: 0.3,
            variation_frequency: 2.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FlowingParams {
    pub width: f64,
    pub height: f64,
    pub num_lines: usize,
    pub line_spacing: f64,
    pub noise_scale: f64,
    pub distortion_strength: f64,
    pub stroke_width: f64,
}

impl Default for FlowingParams {
    fn default() -> Self {
        FlowingParams {
            width: 800.0,
            height: 600.0,
            num_lines: 100,
            line_spacing: 6.0,
            noise_scale: 0.0025,
            distortion_strength: 65.0,
            stroke_width: 0.6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TopographicParams {
    pub width: f64,
    pub height: f64,
    pub num_lines: usize,
    pub line_spacing: f64,
    pub noise_scale: f64,
    pub distortion_strength: f64,
    pub line_width_variation: bool,
    pub min_stroke_width: f64,
    pub max_stroke_width: f64,
    pub octaves: usize,
    pub persistence: f64,
    pub lacunarity: f64,
}

impl Default for TopographicParams {
    fn default() -> Self {
        TopographicParams {
            width: 800.0,
            height: 800.0,
            num_lines: 65,
            line_spacing: 12.0,
            noise_scale: 0.005,
            distortion_strength: 40.0,
            line_width_variation: true,
            min_stroke_width: 0.5,
            max_stroke_width: 2.0,
            octaves: 2,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Everything the `waves` command needs. Only the section matching `pattern`
/// is used.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WaveParams {
    pub pattern: WavePattern,
    pub seed: u64,
    pub random: RandomWaveParams,
    pub flowing: FlowingParams,
    pub topographic: TopographicParams,
}

impl Default for WaveParams {
    fn default() -> Self {
        WaveParams {
            pattern: WavePattern::default(),
            seed: 42,
            random: RandomWaveParams::default(),
            flowing: FlowingParams::default(),
            topographic: TopographicParams::default(),
        }
    }
}

impl WaveParams {
    /// Canvas size of the selected pattern.
    pub fn size(&self) -> (f64, f64) {
        match self.pattern {
            WavePattern::Random => (self.random.width, self.random.height),
            WavePattern::Flowing => (self.flowing.width, self.flowing.height),
            WavePattern::Topographic => (self.topographic.width, self.topographic.height),
        }
    }

    pub fn set_size(&mut self, width: Option<f64>, height: Option<f64>) {
        let (w, h) = match self.pattern {
            WavePattern::Random => (&mut self.random.width, &mut self.random.height),
            WavePattern::Flowing => (&mut self.flowing.width, &mut self.flowing.height),
            WavePattern::Topographic => {
                (&mut self.topographic.width, &mut self.topographic.height)
            }
        };
        if let Some(width) = width {
            *w = width;
        }
        if let Some(height) = height {
            *h = height;
        }
    }
}

/// One sampled row and the pen it's drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveLine {
    pub points: Vec<Coord<f64>>,
    pub stroke_width: f64,
}

/// A finished set of rows, ready to draw.
#[derive(Debug, Clone)]
pub struct WaveSet {
    pub width: f64,
    pub height: f64,
    pub curve: SmoothCurve,
    pub lines: Vec<WaveLine>,
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Uniform draw that tolerates swapped or equal bounds.
fn uniform<R: Rng>(rng: &mut R, a: f64, b: f64) -> f64 {
    if a == b {
        a
    } else {
        rng.gen_range(a.min(b)..=a.max(b))
    }
}

pub fn random_wavy<R: Rng>(params: &RandomWaveParams, rng: &mut R) -> Vec<WaveLine> {
    let r = params.randomness;
    let num_points = if params.min_wavelength > 0.0 {
        ((params.width / params.min_wavelength) * 20.0) as usize
    } else {
        0
    };
    let xs = linspace(0.0, params.width, num_points);
    let swell: Vec<f64> = linspace(0.0, params.variation_frequency * 2.0 * PI, num_points)
        .into_iter()
        .map(|t| 1.0 + t.sin() * r)
        .collect();

    (0..params.num_waves)
        .map(|row| {
            let base_y = row as f64 * params.line_spacing;
            let wave_height = uniform(rng, params.min_wave_height, params.max_wave_height)
                * (1.0 + uniform(rng, -r, r));
            let wavelength = uniform(rng, params.min_wavelength, params.max_wavelength)
                * (1.0 + uniform(rng, -r, r));
            let phase = uniform(rng, 0.0, 2.0 * PI);

            let points = xs
                .iter()
                .zip(swell.iter())
                .map(|(x, swell)| {
                    let sine = ((x / wavelength) * 2.0 * PI + phase).sin();
                    let jitter = uniform(rng, -r * 5.0, r * 5.0);
                    coord! {x: *x, y: base_y + sine * wave_height * swell + jitter}
                })
                .collect();
            WaveLine {
                points,
                stroke_width: uniform(rng, params.min_stroke_width, params.max_stroke_width),
            }
        })
        .collect()
}

pub fn flowing_lines(params: &FlowingParams, seed: u32) -> Vec<WaveLine> {
    let field = OpenSimplex::new(seed);
    let xs = linspace(0.0, params.width, (params.width / 5.0) as usize);
    let (s, strength) = (params.noise_scale, params.distortion_strength);

    (0..params.num_lines)
        .map(|row| {
            let base_y = row as f64 * params.line_spacing;
            let points = xs
                .iter()
                .map(|x| {
                    let primary = field.get([x * s, base_y * s]);
                    let secondary = field.get([x * s * 2.5, base_y * s * 2.5 + 1000.0]);
                    coord! {x: *x, y: base_y + primary * strength * 3.0 + secondary * strength}
                })
                .collect();
            WaveLine {
                points,
                stroke_width: params.stroke_width,
            }
        })
        .collect()
}

/// Ripple centres: a 3x3 grid at 20%, 50% and 80% of each axis, each with a
/// random strength.
fn ripple_centres<R: Rng>(width: f64, height: f64, rng: &mut R) -> Vec<(f64, f64, f64)> {
    let mut centres = vec![];
    for i in 0..3 {
        for j in 0..3 {
            centres.push((
                width * (0.2 + 0.3 * i as f64),
                height * (0.2 + 0.3 * j as f64),
                uniform(rng, 0.5, 1.5),
            ));
        }
    }
    centres
}

pub fn topographic<R: Rng>(params: &TopographicParams, seed: u32, rng: &mut R) -> Vec<WaveLine> {
    let fbm = Fbm::<Perlin>::new(seed)
        .set_octaves(params.octaves.max(1))
        .set_persistence(params.persistence)
        .set_lacunarity(params.lacunarity);
    let xs = linspace(0.0, params.width, (params.width / 4.0) as usize);
    let centres = ripple_centres(params.width, params.height, rng);
    let (s, strength) = (params.noise_scale, params.distortion_strength);

    (0..params.num_lines)
        .map(|row| {
            let base_y = row as f64 * params.line_spacing;
            let stroke_width = if params.line_width_variation {
                let position = 0.5 + 0.5 * (row as f64 / 10.0).sin();
                let jitter = 0.7 + 0.3 * rng.gen::<f64>();
                params.min_stroke_width
                    + (params.max_stroke_width - params.min_stroke_width) * position * jitter
            } else {
                params.min_stroke_width
            };
            let points = xs
                .iter()
                .map(|x| {
                    let n = fbm.get([x * s, base_y * s]);
                    let ripple: f64 = centres
                        .iter()
                        .map(|(cx, cy, c_strength)| {
                            let d = (x - cx).hypot(base_y - cy);
                            if d > 0.0 {
                                (d * 0.03).sin() / (1.0 + d / 200.0) * c_strength
                            } else {
                                0.0
                            }
                        })
                        .sum();
                    coord! {x: *x, y: base_y + n * strength + ripple * strength * 0.8}
                })
                .collect();
            WaveLine {
                points,
                stroke_width,
            }
        })
        .collect()
}

/// The noise crate takes a u32 seed. Fold the high half in so seeds that
/// only differ above bit 31 still give different fields.
pub fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

impl WaveSet {
    /// Runs the selected generator.
    pub fn generate(params: &WaveParams) -> WaveSet {
        let mut rng = SmallRng::seed_from_u64(params.seed);
        let seed = noise_seed(params.seed);
        let lines = match params.pattern {
            WavePattern::Random => random_wavy(&params.random, &mut rng),
            WavePattern::Flowing => flowing_lines(&params.flowing, seed),
            WavePattern::Topographic => topographic(&params.topographic, seed, &mut rng),
        };
        let (width, height) = params.size();
        info!(
            "Generated {} {:?} rows on a {}x{} canvas",
            lines.len(),
            params.pattern,
            width,
            height
        );
        WaveSet {
            width,
            height,
            curve: params.pattern.curve(),
            lines,
        }
    }

    pub fn render(&self, ctx: &mut Context) {
        ctx.background("white")
            .group("waves")
            .stroke("black")
            .fill("none");
        for line in &self.lines {
            if line.points.len() < 2 {
                debug!("Skipping a row with {} points", line.points.len());
                continue;
            }
            ctx.pen(line.stroke_width).smooth(&line.points, self.curve);
        }
    }
}
