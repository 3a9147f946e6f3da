//! Constellations.
//!
//! Points are scattered over the canvas (uniformly, or on a staggered
//! diagonal grid), and every pair at a middling distance is tied together by
//! a bundle of noisy strands. The strands start tight and fan out as the
//! noise gets stronger, so each bundle reads like a frayed rope. Every point
//! gets a small black marker, optionally a big coloured accent shape, and
//! filled noisy blobs can go underneath everything.
use crate::composition::PALETTE;
use crate::context::Context;
use crate::geo_types::shapes::{circle, square};
use crate::geo_types::svg::SmoothCurve;
use crate::waves::noise_seed;
use geo_types::{coord, Coord, LineString, MultiLineString, Polygon};
use kurbo::BezPath;
use log::{debug, info};
use noise::{NoiseFn, Perlin};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Size multipliers for accents; the exponent of 1.5, so big ones are rare.
const ACCENT_STEPS: [i32; 6] = [1, 1, 1, 2, 2, 3];

const BLOB_KNOTS: usize = 16;

/// Where the points go.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum PointLayout {
    Random {
        count: usize,
    },
    /// A cols x rows lattice spanning the canvas edge to edge, odd rows
    /// shifted half a column right. Each position survives with probability
    /// `keep`.
    DiagonalGrid {
        cols: usize,
        rows: usize,
        keep: f64,
    },
}

impl Default for PointLayout {
    fn default() -> Self {
        PointLayout::Random { count: 15 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConstellationParams {
    pub width: f64,
    pub height: f64,
    pub layout: PointLayout,
    /// Pairs closer than this are left alone.
    pub min_distance: f64,
    /// And so are pairs further apart than this.
    pub max_distance: f64,
    /// Strands per bundle.
    pub strands: usize,
    /// Most interior knots a bundle can have.
    pub max_knots: usize,
    pub strand_stroke: f64,
    pub accents: bool,
    pub blobs: usize,
    pub blob_radius: f64,
    pub palette: Vec<String>,
    pub seed: u64,
}

impl Default for ConstellationParams {
    fn default() -> Self {
        ConstellationParams {
            width: 1100.0,
            height: 1700.0,
            layout: PointLayout::default(),
            min_distance: 200.0,
            max_distance: 450.0,
            strands: 50,
            max_knots: 8,
            strand_stroke: 1.0,
            accents: false,
            blobs: 0,
            blob_radius: 60.0,
            palette: PALETTE.iter().map(|c| c.to_string()).collect(),
            seed: 42,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Circle,
    Triangle,
    Square,
}

impl MarkerKind {
    const ALL: [MarkerKind; 3] = [MarkerKind::Circle, MarkerKind::Triangle, MarkerKind::Square];

    pub fn random<R: Rng>(rng: &mut R) -> MarkerKind {
        MarkerKind::ALL[rng.gen_range(0..MarkerKind::ALL.len())]
    }
}

/// The little black dot on every point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub at: Coord<f64>,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn polygon(&self) -> Polygon<f64> {
        let Coord { x, y } = self.at;
        match self.kind {
            MarkerKind::Circle => circle(x, y, 5.0, 16),
            MarkerKind::Triangle => Polygon::new(
                LineString::from(vec![
                    (x - 3.0, y + 3.0),
                    (x + 3.0, y + 3.0),
                    (x, y - 3.0),
                    (x - 3.0, y + 3.0),
                ]),
                vec![],
            ),
            MarkerKind::Square => square(x, y, 5.0),
        }
    }
}

/// All the strands between two points. Each strand is a row of knots meant
/// for [`SmoothCurve::CatmullRom`], finishing with `to` twice.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub from: Coord<f64>,
    pub to: Coord<f64>,
    pub knots: usize,
    pub strands: Vec<Vec<Coord<f64>>>,
}

/// A big filled shape sitting on a point, with the odd cut line across it.
#[derive(Debug, Clone, PartialEq)]
pub struct Accent {
    pub kind: MarkerKind,
    pub at: Coord<f64>,
    pub size: f64,
    pub color: String,
    pub outline: Polygon<f64>,
    pub lines: MultiLineString<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub center: Coord<f64>,
    /// Outline knots, once around.
    pub knots: Vec<Coord<f64>>,
    pub color: String,
    pub stroke_width: f64,
}

impl Blob {
    /// Closed curve through every knot.
    pub fn path(&self) -> BezPath {
        let mut knots = self.knots.clone();
        knots.extend(self.knots.iter().take(3));
        let mut path = SmoothCurve::CatmullRom.bez_path(&knots);
        if !path.elements().is_empty() {
            path.close_path();
        }
        path
    }
}

fn uniform<R: Rng>(rng: &mut R, a: f64, b: f64) -> f64 {
    if a == b {
        a
    } else {
        rng.gen_range(a.min(b)..=a.max(b))
    }
}

/// Perlin squeezed into [0, 1].
fn unit_noise(noise: &Perlin, at: [f64; 3]) -> f64 {
    (noise.get(at) * 0.5 + 0.5).clamp(0.0, 1.0)
}

fn pick_color<R: Rng>(palette: &[String], rng: &mut R) -> String {
    palette
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "black".to_string())
}

/// Rotates `local` by `angle` about the origin, then moves it to `origin`.
fn place(origin: Coord<f64>, angle: f64, local: Coord<f64>) -> Coord<f64> {
    let (sin, cos) = angle.sin_cos();
    coord! {
        x: origin.x + local.x * cos - local.y * sin,
        y: origin.y + local.x * sin + local.y * cos,
    }
}

pub fn diagonal_grid<R: Rng>(
    width: f64,
    height: f64,
    cols: usize,
    rows: usize,
    keep: f64,
    rng: &mut R,
) -> Vec<Coord<f64>> {
    let pitch_x = if cols > 1 { width / (cols - 1) as f64 } else { 0.0 };
    let pitch_y = if rows > 1 { height / (rows - 1) as f64 } else { 0.0 };
    let mut out = vec![];
    for i in 0..cols {
        for j in 0..rows {
            let stagger = if j % 2 == 1 { pitch_x / 2.0 } else { 0.0 };
            let at = coord! {x: pitch_x * i as f64 + stagger, y: pitch_y * j as f64};
            if rng.gen::<f64>() < keep {
                out.push(at);
            }
        }
    }
    out
}

pub fn place_points<R: Rng>(params: &ConstellationParams, rng: &mut R) -> Vec<Coord<f64>> {
    match params.layout {
        PointLayout::Random { count } => (0..count)
            .map(|_| {
                coord! {
                    x: uniform(rng, 0.0, params.width),
                    y: uniform(rng, 0.0, params.height),
                }
            })
            .collect(),
        PointLayout::DiagonalGrid { cols, rows, keep } => {
            diagonal_grid(params.width, params.height, cols, rows, keep, rng)
        }
    }
}

/// Index pairs `i < j` whose distance is strictly between `min` and `max`.
pub fn pairs(points: &[Coord<f64>], min: f64, max: f64) -> Vec<(usize, usize)> {
    let mut out = vec![];
    for (i, a) in points.iter().enumerate() {
        for j in (i + 1..points.len()).rev() {
            let b = points[j];
            let d = (b.x - a.x).hypot(b.y - a.y);
            if d > min && d < max {
                out.push((i, j));
            }
        }
    }
    out
}

/// A bundle of `strands` noisy curves from `from` to `to`.
///
/// Worked in a frame with `from` at the origin and `to` on the +x axis. The
/// knots sit evenly along the axis at random heights, and strand `j` pushes
/// them around by noise scaled with `(j / strands)²`. Everything is also
/// pulled back by a fifth of the distance, so the first strand is the
/// knots themselves shifted up and left.
pub fn connect<R: Rng>(
    from: Coord<f64>,
    to: Coord<f64>,
    strands: usize,
    max_knots: usize,
    noise: &Perlin,
    rng: &mut R,
) -> Bundle {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let angle = dy.atan2(dx);
    let dst = dx.hypot(dy);
    let knots = rng.gen_range(1..=max_knots.max(1));
    let heights: Vec<f64> = (0..knots)
        .map(|_| uniform(rng, -1.0, 1.0) * dst * 0.25)
        .collect();
    let pull = dst / 5.0;

    let strands = (0..strands)
        .map(|j| {
            let t = j as f64 * 0.01;
            let scale = (j as f64 / strands as f64).powi(2);
            let mut row: Vec<Coord<f64>> = heights
                .iter()
                .enumerate()
                .map(|(i, yy)| {
                    let xx = (i + 1) as f64 * dst / (knots + 1) as f64;
                    let off_x = unit_noise(noise, [t, i as f64, xx]) * dst * scale - pull;
                    let off_y = unit_noise(noise, [t, i as f64, *yy]) * dst * scale - pull;
                    place(from, angle, coord! {x: xx + off_x, y: yy + off_y})
                })
                .collect();
            row.push(to);
            row.push(to);
            row
        })
        .collect();
    Bundle {
        from,
        to,
        knots,
        strands,
    }
}

/// A filled accent shape on `at`. `width` is the canvas width, which sets
/// the base size.
pub fn accent<R: Rng>(at: Coord<f64>, width: f64, palette: &[String], rng: &mut R) -> Accent {
    let kind = MarkerKind::random(rng);
    let step = ACCENT_STEPS[rng.gen_range(0..ACCENT_STEPS.len())];
    let size = width * 0.1 * 1.5f64.powi(step);
    let color = pick_color(palette, rng);
    let half = size / 2.0;
    let mut lines = vec![];

    let outline = match kind {
        MarkerKind::Circle => {
            if rng.gen::<f64>() < 0.2 {
                if rng.gen::<f64>() < 0.5 {
                    lines.push(LineString::from(vec![(at.x - half, at.y), (at.x + half, at.y)]));
                } else {
                    lines.push(LineString::from(vec![(at.x, at.y - half), (at.x, at.y + half)]));
                }
                if rng.gen::<f64>() < 0.9 {
                    let a = uniform(rng, PI / 12.0, 2.0 * PI - PI / 12.0);
                    let rim = coord! {x: at.x + a.cos() * half, y: at.y + a.sin() * half};
                    lines.push(LineString::new(vec![rim, at]));
                }
            }
            circle(at.x, at.y, size, 64)
        }
        MarkerKind::Triangle => {
            let h = size * 3f64.sqrt() / 2.0;
            let rotation = rng.gen_range(0..4) as f64 * PI / 2.0;
            let corner = |x: f64, y: f64| place(at, rotation, coord! {x: x, y: y});
            if rng.gen::<f64>() < 0.2 {
                lines.push(LineString::new(vec![
                    corner(-h / 3.0, 0.0),
                    corner(2.0 * h / 3.0, 0.0),
                ]));
            }
            Polygon::new(
                LineString::new(vec![
                    corner(-h / 3.0, -half),
                    corner(-h / 3.0, half),
                    corner(2.0 * h / 3.0, 0.0),
                    corner(-h / 3.0, -half),
                ]),
                vec![],
            )
        }
        MarkerKind::Square => square(at.x, at.y, size),
    };
    Accent {
        kind,
        at,
        size,
        color,
        outline,
        lines: MultiLineString::new(lines),
    }
}

/// A wobbly disc. Knots sit between 0.65 and 1 times `radius` from the
/// centre, and the outline gets thinner the further it is from
/// `canvas_center`.
pub fn blob<R: Rng>(
    center: Coord<f64>,
    radius: f64,
    canvas_center: Coord<f64>,
    color: String,
    rng: &mut R,
) -> Blob {
    let wobble = radius * 0.35;
    let knots = (0..BLOB_KNOTS)
        .map(|i| {
            let r = radius.min(radius + uniform(rng, -wobble, wobble));
            let a = 2.0 * PI * i as f64 / BLOB_KNOTS as f64;
            coord! {x: center.x + r * a.cos(), y: center.y + r * a.sin()}
        })
        .collect();
    let d = (center.x - canvas_center.x).hypot(center.y - canvas_center.y);
    Blob {
        center,
        knots,
        color,
        stroke_width: (5.0 - d * 0.01).max(0.0),
    }
}

#[derive(Debug, Clone)]
pub struct Constellation {
    pub params: ConstellationParams,
    pub points: Vec<Coord<f64>>,
    pub bundles: Vec<Bundle>,
    pub markers: Vec<Marker>,
    pub accents: Vec<Accent>,
    pub blobs: Vec<Blob>,
}

impl Constellation {
    pub fn new(params: ConstellationParams) -> Constellation {
        Constellation {
            params,
            points: vec![],
            bundles: vec![],
            markers: vec![],
            accents: vec![],
            blobs: vec![],
        }
    }

    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> &mut Self {
        let p = &self.params;
        let noise = Perlin::new(noise_seed(p.seed));
        let points = place_points(p, rng);
        let linked = pairs(&points, p.min_distance, p.max_distance);
        debug!("{} points, {} linked pairs", points.len(), linked.len());

        let bundles = linked
            .iter()
            .map(|(i, j)| connect(points[*i], points[*j], p.strands, p.max_knots, &noise, rng))
            .collect();
        let markers = points
            .iter()
            .map(|at| Marker {
                at: *at,
                kind: MarkerKind::random(rng),
            })
            .collect();
        let accents = if p.accents {
            points
                .iter()
                .map(|at| accent(*at, p.width, &p.palette, rng))
                .collect()
        } else {
            vec![]
        };
        let middle = coord! {x: p.width / 2.0, y: p.height / 2.0};
        let blobs = (0..p.blobs)
            .map(|_| {
                let at = coord! {
                    x: uniform(rng, 0.0, p.width),
                    y: uniform(rng, 0.0, p.height),
                };
                let color = pick_color(&p.palette, rng);
                blob(at, p.blob_radius, middle, color, rng)
            })
            .collect();

        self.points = points;
        self.bundles = bundles;
        self.markers = markers;
        self.accents = accents;
        self.blobs = blobs;
        info!(
            "Constellation of {} points: {} bundles, {} accents, {} blobs",
            self.points.len(),
            self.bundles.len(),
            self.accents.len(),
            self.blobs.len()
        );
        self
    }

    pub fn render(&self, ctx: &mut Context) {
        ctx.background("white");
        if !self.blobs.is_empty() {
            ctx.group("blobs").stroke("black");
            for blob in &self.blobs {
                ctx.fill(&blob.color).pen(blob.stroke_width).path(&blob.path());
            }
        }
        if !self.accents.is_empty() {
            ctx.group("accents");
            for accent in &self.accents {
                ctx.stroke("none").fill(&accent.color).poly(&accent.outline);
                // Cut lines are painted in the background colour.
                ctx.stroke("white").fill("none").pen(5.0).lines(&accent.lines);
            }
        }
        ctx.group("connections")
            .stroke("black")
            .fill("none")
            .pen(self.params.strand_stroke);
        for bundle in &self.bundles {
            for strand in &bundle.strands {
                ctx.smooth(strand, SmoothCurve::CatmullRom);
            }
        }
        ctx.group("markers").stroke("none").fill("black");
        for marker in &self.markers {
            ctx.poly(&marker.polygon());
        }
    }
}
