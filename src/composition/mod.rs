//! Hatched geometric compositions.
//!
//! Random circles, squares and triangles are stacked by z-index. Each shape only
//! keeps the part of itself that nothing above it covers, those visible regions
//! are merged per colour, and every colour gets its own family of hatch lines
//! clipped to its region. The result is a set of plotter layers: one per colour
//! plus a heavy outline of the whole cluster.
use crate::context::Context;
use crate::errors::GeometryError;
use crate::geo_types::boolean::{unary_union, BooleanOp};
use crate::geo_types::hatch::Hatch;
use crate::geo_types::shapes::{circle, repair, square, triangle};
use geo::{Area, Centroid, Intersects};
use geo_types::{coord, Coord, Line, LineString, MultiLineString, MultiPolygon, Polygon};
use log::{debug, info, warn};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;

pub mod style;

pub use style::{default_patterns, style_for, HatchStyle, LineKind, PALETTE, REGION_COLORS};

/// Regions smaller than this are considered fully covered.
const MIN_REGION_AREA: f64 = 1e-6;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
}

/// One shape in the stack. `size` is the diameter for circles, the side for
/// squares, and the centre to vertex distance for triangles.
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color_index: usize,
    pub z_index: usize,
    pub rotation: f64,
    /// The outline as drawn, before any repair.
    pub outline: Polygon<f64>,
    /// Repaired polygon used for all the boolean work.
    pub polygon: MultiPolygon<f64>,
}

impl Shape {
    /// A shape on layer 0 with colour 0; see [`Shape::at_z`] and
    /// [`Shape::colored`]. `circle_sides` only matters for circles.
    pub fn new(
        kind: ShapeKind,
        center: Coord<f64>,
        size: f64,
        rotation: f64,
        circle_sides: usize,
    ) -> Shape {
        let (x, y) = (center.x, center.y);
        let outline = match kind {
            ShapeKind::Circle => circle(x, y, size, circle_sides),
            ShapeKind::Square => square(x, y, size),
            ShapeKind::Triangle => triangle(x, y, size, rotation),
        };
        let polygon = repair(&outline);
        Shape {
            kind,
            x,
            y,
            size,
            color_index: 0,
            z_index: 0,
            rotation,
            outline,
            polygon,
        }
    }

    pub fn at_z(mut self, z_index: usize) -> Shape {
        self.z_index = z_index;
        self
    }

    pub fn colored(mut self, color_index: usize) -> Shape {
        self.color_index = color_index;
        self
    }

    /// Edges of the drawn outline as two point lines.
    pub fn outline_segments(&self) -> Vec<LineString<f64>> {
        self.outline
            .exterior()
            .lines()
            .map(|l| LineString::new(vec![l.start, l.end]))
            .collect()
    }

    /// Does the shape fit inside the canvas, `padding` in from every edge?
    pub fn fits(&self, width: f64, height: f64, padding: f64) -> bool {
        let reach = match self.kind {
            ShapeKind::Circle | ShapeKind::Square => self.size / 2.0,
            ShapeKind::Triangle => self.size,
        };
        self.x - reach >= padding
            && self.x + reach <= width - padding
            && self.y - reach >= padding
            && self.y + reach <= height - padding
    }
}

/// The visible part of a shape after everything above it is cut away.
#[derive(Debug, Clone)]
pub struct ShapeRegion {
    pub shape: usize,
    pub color_index: usize,
    pub region: MultiPolygon<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CompositionParams {
    pub width: f64,
    pub height: f64,
    pub num_shapes: usize,
    pub padding: f64,
    pub circle_sides: usize,
    pub palette: Vec<String>,
    pub patterns: Vec<HatchStyle>,
    pub line_kinds: Vec<LineKind>,
    pub hatch_stroke: f64,
    pub outline_stroke: f64,
    pub seed: u64,
}

impl Default for CompositionParams {
    fn default() -> Self {
        CompositionParams {
            width: 1200.0,
            height: 1800.0,
            num_shapes: 40,
            padding: 50.0,
            circle_sides: 64,
            palette: PALETTE.iter().map(|c| c.to_string()).collect(),
            patterns: default_patterns(),
            line_kinds: vec![LineKind::Straight],
            hatch_stroke: 1.0,
            outline_stroke: 10.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Composition {
    pub params: CompositionParams,
    pub shapes: Vec<Shape>,
}

fn is_covered(region: &MultiPolygon<f64>) -> bool {
    region.0.is_empty() || region.unsigned_area() < MIN_REGION_AREA
}

fn is_finite(mp: &MultiPolygon<f64>) -> bool {
    mp.iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors().iter()))
        .all(|ring| ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite()))
}

fn checked_difference(
    region: &MultiPolygon<f64>,
    other: &MultiPolygon<f64>,
) -> Result<MultiPolygon<f64>, GeometryError> {
    if !is_finite(region) || !is_finite(other) {
        return Err(GeometryError::BooleanOpFailed(
            "input has non-finite coordinates".to_string(),
        ));
    }
    let diff = BooleanOp::difference(region, other);
    if is_finite(&diff) {
        Ok(diff)
    } else {
        Err(GeometryError::BooleanOpFailed(
            "difference produced non-finite coordinates".to_string(),
        ))
    }
}

/// One step of the z-order cut. None once `other` hides the region completely.
/// A failed subtraction leaves the region as it was.
fn cut(region: MultiPolygon<f64>, other: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    match checked_difference(&region, other) {
        Ok(diff) if is_covered(&diff) => None,
        Ok(diff) => Some(diff),
        Err(e) => {
            warn!("Keeping region after failed subtraction: {}", e);
            Some(region)
        }
    }
}

impl Composition {
    fn palette_len(&self) -> usize {
        self.params.palette.len().max(1)
    }

    fn assign_colors(&mut self) {
        let n = self.palette_len();
        for (i, shape) in self.shapes.iter_mut().enumerate() {
            shape.color_index = i % n;
        }
    }

    /// Throws `num_shapes` random shapes at the canvas and keeps the ones
    /// that fit. z-index is the attempt number, so rejected attempts leave
    /// gaps.
    pub fn random<R: Rng>(params: CompositionParams, rng: &mut R) -> Composition {
        let (w, h, pad) = (params.width, params.height, params.padding);
        let mut shapes = vec![];
        for attempt in 0..params.num_shapes {
            let x = rng.gen_range(pad..=(w - pad).max(pad));
            let y = rng.gen_range(pad..=(h - pad).max(pad));
            let center = coord! {x: x, y: y};
            let shape = match rng.gen_range(0..3) {
                0 => {
                    let diameter = rng.gen_range(50.0..=240.0);
                    Shape::new(ShapeKind::Circle, center, diameter, 0.0, params.circle_sides)
                }
                1 => {
                    let size = rng.gen_range(50.0..=400.0);
                    Shape::new(ShapeKind::Square, center, size, 0.0, 4)
                }
                _ => {
                    let size = rng.gen_range(25.0..=400.0);
                    let rotation = rng.gen_range(0..=3) as f64 * (PI / 2.0);
                    Shape::new(ShapeKind::Triangle, center, size, rotation, 3)
                }
            }
            .at_z(attempt);
            if shape.fits(w, h, pad) {
                debug!(
                    "Kept {:?} #{} at {:.1},{:.1} size {:.1}",
                    shape.kind, attempt, x, y, shape.size
                );
                shapes.push(shape);
            }
        }
        info!(
            "Kept {} of {} shape attempts",
            shapes.len(),
            params.num_shapes
        );
        let mut comp = Composition { params, shapes };
        comp.assign_colors();
        comp
    }

    /// Five overlapping shapes in known places. Handy for checking the region
    /// logic by eye.
    pub fn fixed(params: CompositionParams) -> Composition {
        let sides = params.circle_sides;
        let layout = [
            (ShapeKind::Square, 300.0, 300.0, 400.0),
            (ShapeKind::Circle, 800.0, 300.0, 200.0),
            (ShapeKind::Circle, 350.0, 550.0, 100.0),
            (ShapeKind::Triangle, 800.0, 900.0, 350.0),
            (ShapeKind::Square, 800.0, 1200.0, 300.0),
        ];
        let shapes = layout
            .iter()
            .enumerate()
            .map(|(z, (kind, x, y, size))| {
                Shape::new(*kind, coord! {x: *x, y: *y}, *size, 0.0, sides).at_z(z)
            })
            .collect();
        let mut comp = Composition { params, shapes };
        comp.assign_colors();
        comp
    }

    /// Visible region of every shape, back to front. Shapes that end up
    /// completely hidden are left out.
    pub fn effective_regions(&self) -> Vec<ShapeRegion> {
        let mut order: Vec<usize> = (0..self.shapes.len()).collect();
        order.sort_by_key(|i| self.shapes[*i].z_index);

        let mut regions = vec![];
        for &idx in &order {
            let shape = &self.shapes[idx];
            let mut region = Some(shape.polygon.clone());
            for &other_idx in &order {
                let other = &self.shapes[other_idx];
                if other.z_index <= shape.z_index {
                    continue;
                }
                let Some(current) = region.take() else {
                    break;
                };
                if !current.intersects(&other.polygon) {
                    region = Some(current);
                    continue;
                }
                region = cut(current, &other.polygon);
                if region.is_none() {
                    debug!("Shape z={} is hidden by z={}", shape.z_index, other.z_index);
                }
            }
            if let Some(region) = region {
                if !is_covered(&region) {
                    regions.push(ShapeRegion {
                        shape: idx,
                        color_index: shape.color_index,
                        region,
                    });
                }
            }
        }
        regions
    }

    /// Effective regions merged per colour, ordered by colour index.
    pub fn color_regions(&self) -> Vec<(usize, MultiPolygon<f64>)> {
        let mut by_color: BTreeMap<usize, Vec<Polygon<f64>>> = BTreeMap::new();
        for region in self.effective_regions() {
            by_color
                .entry(region.color_index)
                .or_default()
                .extend(region.region.0);
        }
        by_color
            .into_iter()
            .map(|(c, polys)| (c, unary_union(polys.iter())))
            .filter(|(_, region)| !region.0.is_empty())
            .collect()
    }

    /// Hatch lines for every colour, clipped to that colour's region.
    pub fn hatch_lines(&self) -> BTreeMap<usize, MultiLineString<f64>> {
        let regions = self.color_regions();
        let params = &self.params;
        regions
            .par_iter()
            .map(|(color, region)| {
                let (style, line) = style_for(*color, &params.patterns, &params.line_kinds);
                let mut lines: Vec<LineString<f64>> = vec![];
                for angle in &style.angles {
                    match region.hatch(line.pattern(), *angle, style.spacing, params.hatch_stroke)
                    {
                        Ok(hatch) => lines.extend(hatch.0),
                        Err(e) => warn!(
                            "Could not hatch colour {} at {} degrees: {}",
                            color, angle, e
                        ),
                    }
                }
                debug!("Colour {} has {} hatch lines", color, lines.len());
                (*color, MultiLineString::new(lines))
            })
            .collect::<Vec<(usize, MultiLineString<f64>)>>()
            .into_iter()
            .collect()
    }

    /// Outer boundary of the whole stack as individual segments. Falls back to
    /// every shape's own edges if the union comes back empty.
    pub fn composite_outline(&self) -> MultiLineString<f64> {
        if self.shapes.is_empty() {
            return MultiLineString::new(vec![]);
        }
        let merged = unary_union(self.shapes.iter().flat_map(|s| s.polygon.0.iter()));
        if merged.0.is_empty() {
            warn!("Union of all shapes is empty, using the raw shape outlines");
            return MultiLineString::new(
                self.shapes
                    .iter()
                    .flat_map(|s| s.outline_segments())
                    .collect(),
            );
        }
        MultiLineString::new(
            merged
                .iter()
                .flat_map(|p| p.exterior().lines())
                .map(|l: Line<f64>| LineString::new(vec![l.start, l.end]))
                .collect(),
        )
    }

    fn color_of(&self, color_index: usize) -> &str {
        self.params
            .palette
            .get(color_index % self.palette_len())
            .map(|c| c.as_str())
            .unwrap_or("black")
    }

    /// Plotter output: one group of hatch lines per colour, then the outline.
    pub fn render(&self, ctx: &mut Context) {
        ctx.background("white").stroke("black").fill("none");
        for (color, lines) in self.hatch_lines() {
            ctx.group(&format!("color-{}", color))
                .pen(self.params.hatch_stroke)
                .lines(&lines);
        }
        ctx.group("outlines")
            .pen(self.params.outline_stroke)
            .lines(&self.composite_outline());
    }

    /// Filled shapes with "C{n}" labels, optionally with the hatching on top.
    pub fn render_shapes(&self, ctx: &mut Context, show_hatching: bool) {
        ctx.background("white").group("shapes").stroke("none");
        for shape in &self.shapes {
            ctx.fill(self.color_of(shape.color_index))
                .poly(&shape.outline);
        }
        ctx.group("outlines")
            .fill("none")
            .stroke("black")
            .pen(2.0)
            .lines(&self.composite_outline());
        if show_hatching {
            ctx.group("hatching").pen(0.5);
            for lines in self.hatch_lines().values() {
                ctx.lines(lines);
            }
        }
        ctx.group("labels")
            .stroke("none")
            .fill("white")
            .font("sans-serif", 12.0)
            .anchor("middle");
        for shape in &self.shapes {
            ctx.text(shape.x, shape.y, &format!("C{}", shape.color_index));
        }
    }

    /// Debug view of the region computation: filled shapes, each visible region
    /// dashed in its colour's marker colour, the composite outline on top.
    pub fn render_regions(&self, ctx: &mut Context) {
        ctx.background("white").group("shapes").stroke("none");
        for shape in &self.shapes {
            ctx.fill(self.color_of(shape.color_index))
                .poly(&shape.outline);
        }
        ctx.group("regions")
            .fill("none")
            .pen(2.0)
            .dash(Some("5,5"))
            .font("sans-serif", 14.0)
            .anchor("middle");
        for region in self.effective_regions() {
            let marker = REGION_COLORS[region.color_index % REGION_COLORS.len()];
            let rings: Vec<LineString<f64>> =
                region.region.iter().map(|p| p.exterior().clone()).collect();
            ctx.stroke(marker).fill("none").lines(&MultiLineString::new(rings));
            if region.region.0.len() == 1 {
                if let Some(centroid) = region.region.centroid() {
                    let at: Coord<f64> = centroid.into();
                    ctx.stroke("none")
                        .fill(marker)
                        .text(at.x, at.y, &format!("C{}", region.color_index));
                }
            }
        }
        ctx.group("outlines")
            .dash(None)
            .stroke("black")
            .fill("none")
            .pen(2.0)
            .lines(&self.composite_outline());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::Contains;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn small_params() -> CompositionParams {
        CompositionParams {
            width: 400.0,
            height: 400.0,
            ..CompositionParams::default()
        }
    }

    #[test]
    fn test_fixed_scenario() {
        let comp = Composition::fixed(CompositionParams::default());
        assert_eq!(comp.shapes.len(), 5);
        let colors: Vec<usize> = comp.shapes.iter().map(|s| s.color_index).collect();
        assert_eq!(colors, vec![0, 1, 2, 3, 4]);
        assert_eq!(comp.shapes[3].kind, ShapeKind::Triangle);
    }

    #[test]
    fn test_square_cuts_triangle() {
        let comp = Composition::fixed(CompositionParams::default());
        let regions = comp.effective_regions();
        // Nothing is fully hidden in the fixed scenario.
        assert_eq!(regions.len(), 5);
        let triangle = &comp.shapes[3];
        let region = &regions[3].region;
        assert_eq!(regions[3].shape, 3);
        assert!(region.unsigned_area() < triangle.polygon.unsigned_area());
        // Under the bottom square
        assert!(!region.contains(&geo_types::Point::new(700.0, 1100.0)));
        assert!(region.contains(&geo_types::Point::new(900.0, 900.0)));
        // The top of the stack is never cut.
        assert!((regions[4].region.unsigned_area() - 300.0 * 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_shape_layers() {
        let shape = Shape::new(ShapeKind::Square, coord! {x: 50.0, y: 60.0}, 20.0, 0.0, 4)
            .at_z(3)
            .colored(2);
        assert_eq!((shape.z_index, shape.color_index), (3, 2));
        assert_eq!((shape.x, shape.y), (50.0, 60.0));
        assert!((shape.polygon.unsigned_area() - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_hidden_shape_is_dropped() {
        let params = small_params();
        let sides = params.circle_sides;
        let comp = Composition {
            shapes: vec![
                Shape::new(ShapeKind::Circle, coord! {x: 200.0, y: 200.0}, 50.0, 0.0, sides),
                Shape::new(ShapeKind::Square, coord! {x: 200.0, y: 200.0}, 200.0, 0.0, sides)
                    .at_z(1)
                    .colored(1),
            ],
            params,
        };
        let regions = comp.effective_regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].shape, 1);
    }

    #[test]
    fn test_regions_are_disjoint() {
        let mut rng = SmallRng::seed_from_u64(7);
        let comp = Composition::random(
            CompositionParams {
                num_shapes: 12,
                ..small_params()
            },
            &mut rng,
        );
        let regions = comp.effective_regions();
        for (i, a) in regions.iter().enumerate() {
            for b in regions.iter().skip(i + 1) {
                let overlap = BooleanOp::intersection(&a.region, &b.region);
                assert!(overlap.unsigned_area() < 1e-3);
            }
        }
    }

    #[test]
    fn test_random_is_deterministic() {
        let a = Composition::random(small_params(), &mut SmallRng::seed_from_u64(42));
        let b = Composition::random(small_params(), &mut SmallRng::seed_from_u64(42));
        assert_eq!(a.shapes.len(), b.shapes.len());
        for (sa, sb) in a.shapes.iter().zip(b.shapes.iter()) {
            assert_eq!(sa.outline, sb.outline);
        }
        for s in &a.shapes {
            assert!(s.fits(400.0, 400.0, 50.0));
        }
    }

    #[test]
    fn test_hatch_lines_stay_in_color_region() {
        let comp = Composition::fixed(CompositionParams::default());
        let regions: BTreeMap<usize, MultiPolygon<f64>> = comp.color_regions().into_iter().collect();
        let hatches = comp.hatch_lines();
        assert_eq!(hatches.len(), 5);
        for (color, lines) in hatches.iter() {
            assert!(!lines.0.is_empty());
            let region = &regions[color];
            for piece in lines.iter() {
                let a = piece.0[0];
                let b = piece.0[piece.0.len() - 1];
                let mid = geo_types::Point::from(a + (b - a) / 2.0);
                assert!(region.contains(&mid) || region.intersects(&mid));
            }
        }
    }

    fn nan_square() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (f64::NAN, 0.0),
                (10.0, 10.0),
                (0.0, 10.0),
                (0.0, 0.0),
            ]),
            vec![],
        )])
    }

    #[test]
    fn test_failed_subtraction_keeps_region() {
        let region = MultiPolygon::new(vec![square(0.0, 0.0, 20.0)]);
        assert!(checked_difference(&region, &nan_square()).is_err());
        let kept = cut(region.clone(), &nan_square()).expect("Region should survive");
        assert_eq!(kept, region);
    }

    #[test]
    fn test_cut() {
        let region = MultiPolygon::new(vec![square(0.0, 0.0, 20.0)]);
        let half = MultiPolygon::new(vec![square(10.0, 0.0, 20.0)]);
        let cut_region = cut(region.clone(), &half).expect("Half is still visible");
        assert!((cut_region.unsigned_area() - 200.0).abs() < 1e-6);
        let cover = MultiPolygon::new(vec![square(0.0, 0.0, 40.0)]);
        assert!(cut(region, &cover).is_none());
    }

    #[test]
    fn test_composite_outline_falls_back_to_shape_edges() {
        // Polygons that repaired away to nothing leave nothing to union.
        let flat = |x: f64, z: usize| {
            let mut shape = Shape::new(ShapeKind::Square, coord! {x: x, y: 100.0}, 50.0, 0.0, 4);
            shape.polygon = MultiPolygon::new(vec![]);
            shape.at_z(z)
        };
        let comp = Composition {
            shapes: vec![flat(100.0, 0), flat(200.0, 1)],
            params: small_params(),
        };
        let outline = comp.composite_outline();
        assert_eq!(outline.0.len(), 8);
        assert!(outline.0.iter().all(|l| l.0.len() == 2));
        assert!(outline.0.contains(&LineString::from(vec![(75.0, 75.0), (125.0, 75.0)])));
    }

    #[test]
    fn test_composite_outline() {
        let comp = Composition::fixed(CompositionParams::default());
        let outline = comp.composite_outline();
        assert!(!outline.0.is_empty());
        assert!(outline.0.iter().all(|l| l.0.len() == 2));
    }

    #[test]
    fn test_render_groups() {
        let comp = Composition::fixed(CompositionParams::default());
        let mut ctx = Context::new(comp.params.width, comp.params.height);
        comp.render(&mut ctx);
        let names: Vec<&str> = ctx.to_layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["default", "color-0", "color-1", "color-2", "color-3", "color-4", "outlines"]
        );
    }

    #[test]
    fn test_render_shapes_without_hatching() {
        let comp = Composition::fixed(CompositionParams::default());
        let mut ctx = Context::new(comp.params.width, comp.params.height);
        comp.render_shapes(&mut ctx, false);
        let names: Vec<&str> = ctx.to_layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["default", "shapes", "outlines", "labels"]);

        let mut ctx = Context::new(comp.params.width, comp.params.height);
        comp.render_shapes(&mut ctx, true);
        assert!(ctx.to_layers().iter().any(|l| l.name == "hatching"));
    }

    #[test]
    fn test_region_labels_keep_group_style() {
        let comp = Composition::fixed(CompositionParams::default());
        let mut ctx = Context::new(comp.params.width, comp.params.height);
        comp.render_regions(&mut ctx);
        let svg = ctx.to_svg().expect("svg").to_string();
        let regions = &svg[svg.find("id=\"regions\"").expect("regions")
            ..svg.find("id=\"outlines\"").expect("outlines")];
        let single = comp
            .effective_regions()
            .iter()
            .filter(|r| r.region.0.len() == 1)
            .count();
        assert!(single > 0);
        assert_eq!(regions.matches("<text").count(), single);
        assert!(regions.contains("stroke-dasharray=\"5,5\""));
    }
}
