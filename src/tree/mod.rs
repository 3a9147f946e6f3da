//! Bloodgood maple silhouettes.
//!
//! A slightly bent trunk, a crown of 3-5 limbs, and recursive branching
//! underneath them. Leaves are little five lobed stars dropped at branch tips,
//! at some joints, and in clusters around the outer branches. All the leaves
//! are unioned into a single silhouette so the plotter can fill it in one go.
use crate::context::Context;
use crate::geo_types::boolean::unary_union;
use crate::geo_types::shapes::{repair, star};
use geo_types::{coord, Coord, LineString, MultiPolygon, Polygon};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TreeParams {
    pub width: f64,
    pub height: f64,
    pub branch_iterations: usize,
    pub leaf_color: String,
    pub branch_color: String,
    pub trunk_width: f64,
    pub seed: u64,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            width: 800.0,
            height: 1000.0,
            branch_iterations: 7,
            leaf_color: "#8B0000".to_string(),
            branch_color: "#1A0F0B".to_string(),
            trunk_width: 20.0,
            seed: 42,
        }
    }
}

/// A three point branch polyline: start, bent middle, end.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub line: LineString<f64>,
    pub width: f64,
    pub level: usize,
    pub parent: Option<usize>,
}

impl Branch {
    pub fn end(&self) -> Coord<f64> {
        self.line.0.last().copied().unwrap_or(coord! {x: 0.0, y: 0.0})
    }

    /// Pen width on output; thins out the further from the trunk it is.
    pub fn stroke_width(&self) -> f64 {
        (self.width * (1.1 - self.level as f64 * 0.1)).max(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf {
    pub position: Coord<f64>,
    pub size: f64,
}

#[derive(Debug, Clone)]
pub struct MapleTree {
    pub params: TreeParams,
    pub branches: Vec<Branch>,
    pub leaves: Vec<Leaf>,
    pub silhouette: MultiPolygon<f64>,
}

fn uniform<R: Rng>(rng: &mut R, a: f64, b: f64) -> f64 {
    if a == b {
        a
    } else {
        rng.gen_range(a.min(b)..=a.max(b))
    }
}

impl MapleTree {
    pub fn new(params: TreeParams) -> MapleTree {
        MapleTree {
            params,
            branches: vec![],
            leaves: vec![],
            silhouette: MultiPolygon::new(vec![]),
        }
    }

    fn trunk_height(&self) -> f64 {
        self.params.height * 0.3
    }

    fn root(&self) -> Coord<f64> {
        coord! {x: (self.params.width / 2.0).floor(), y: self.params.height * 0.8}
    }

    /// Grow the whole tree: trunk, crown, and finally the leaf silhouette.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> &mut Self {
        self.branches.clear();
        self.leaves.clear();
        let trunk_top = self.generate_trunk(rng);
        self.generate_crown(trunk_top, rng);
        self.create_silhouette(rng);
        info!(
            "Maple has {} branches, {} leaves, {} silhouette parts",
            self.branches.len(),
            self.leaves.len(),
            self.silhouette.0.len()
        );
        self
    }

    /// The trunk is branch 0. Returns the top of the trunk.
    pub fn generate_trunk<R: Rng>(&mut self, rng: &mut R) -> Coord<f64> {
        let root = self.root();
        let height = self.trunk_height();
        let bend = self.params.width * 0.05;
        let mid_x = root.x + uniform(rng, -bend, bend);
        let top = coord! {x: root.x, y: root.y - height};
        self.branches.push(Branch {
            line: LineString::new(vec![root, coord! {x: mid_x, y: root.y - height * 0.5}, top]),
            width: self.params.trunk_width,
            level: 0,
            parent: None,
        });
        top
    }

    /// 3-5 limbs heading roughly upwards from the top of the trunk.
    pub fn generate_crown<R: Rng>(&mut self, trunk_top: Coord<f64>, rng: &mut R) {
        let limbs = rng.gen_range(3..=5);
        for _ in 0..limbs {
            let direction = -PI / 2.0 + uniform(rng, -PI / 4.0, PI / 4.0);
            let length = self.trunk_height() * (0.5 + uniform(rng, 0.0, 0.3));
            let width = self.params.trunk_width * 0.6;
            self.recursive_branch(Some(0), trunk_top, direction, length, width, 1, rng);
        }
    }

    /// Lays down one branch and returns its end point.
    fn generate_branch<R: Rng>(
        &mut self,
        parent: Option<usize>,
        start: Coord<f64>,
        direction: f64,
        length: f64,
        width: f64,
        level: usize,
        rng: &mut R,
    ) -> Coord<f64> {
        let angle = direction + uniform(rng, -PI / 6.0, PI / 6.0);
        let actual = length * (1.0 + uniform(rng, -0.2, 0.2));
        let end = coord! {x: start.x + actual * angle.cos(), y: start.y + actual * angle.sin()};
        let bend = length * 0.3;
        let mid = coord! {
            x: (start.x + end.x) / 2.0 + uniform(rng, -bend, bend),
            y: (start.y + end.y) / 2.0 + uniform(rng, -bend, bend),
        };
        self.branches.push(Branch {
            line: LineString::new(vec![start, mid, end]),
            width,
            level,
            parent,
        });
        end
    }

    /// Branch, then fork. Past the iteration limit a branch is just a leaf.
    pub fn recursive_branch<R: Rng>(
        &mut self,
        parent: Option<usize>,
        start: Coord<f64>,
        direction: f64,
        length: f64,
        width: f64,
        level: usize,
        rng: &mut R,
    ) {
        if level >= self.params.branch_iterations {
            self.add_leaf(start, level, rng);
            return;
        }
        let end = self.generate_branch(parent, start, direction, length, width, level, rng);
        let current = self.branches.len() - 1;

        let forks = if level < 3 {
            rng.gen_range(2..=3)
        } else {
            rng.gen_range(1..=2)
        };
        for i in 0..forks {
            let new_direction = if i == 0 {
                direction + uniform(rng, -PI / 4.0, PI / 4.0)
            } else if rng.gen::<f64>() < 0.5 {
                direction + uniform(rng, PI / 4.0, PI / 2.0)
            } else {
                direction + uniform(rng, -PI / 2.0, -PI / 4.0)
            };
            let new_length = length * (0.6 + uniform(rng, 0.0, 0.2));
            self.recursive_branch(
                Some(current),
                end,
                new_direction,
                new_length,
                width * 0.7,
                level + 1,
                rng,
            );
            if level >= 2 && rng.gen::<f64>() < 0.7 {
                self.add_leaf(end, level, rng);
            }
        }
    }

    fn add_leaf<R: Rng>(&mut self, position: Coord<f64>, level: usize, rng: &mut R) {
        let base = 20.0 - level as f64;
        let size = (base * (0.8 + uniform(rng, 0.0, 0.4))).max(5.0);
        self.leaves.push(Leaf { position, size });
    }

    /// Five lobes: ten points alternating between peaks and valleys, randomly
    /// turned.
    pub fn leaf_shape<R: Rng>(position: Coord<f64>, size: f64, rng: &mut R) -> Polygon<f64> {
        let angle_offset = uniform(rng, 0.0, 2.0 * PI);
        let radii: Vec<f64> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    size * (0.8 + uniform(rng, 0.0, 0.4))
                } else {
                    size * (0.3 + uniform(rng, 0.0, 0.2))
                }
            })
            .collect();
        star(position.x, position.y, &radii, angle_offset)
    }

    /// Unions every leaf, plus extra clusters around the outer branches, into
    /// the silhouette.
    pub fn create_silhouette<R: Rng>(&mut self, rng: &mut R) {
        let mut shapes: Vec<Polygon<f64>> = self
            .leaves
            .iter()
            .map(|leaf| MapleTree::leaf_shape(leaf.position, leaf.size, rng))
            .collect();

        for branch in self.branches.iter().filter(|b| b.level >= 3) {
            let end = branch.end();
            let spread = 30.0 - branch.level as f64 * 2.0;
            let count = rng.gen_range(3..=7);
            for _ in 0..count {
                let at = coord! {
                    x: end.x + uniform(rng, -spread, spread),
                    y: end.y + uniform(rng, -spread, spread),
                };
                let size = uniform(rng, 10.0, 20.0);
                shapes.push(MapleTree::leaf_shape(at, size, rng));
            }
        }
        debug!("Unioning {} leaf shapes", shapes.len());

        self.silhouette = if shapes.is_empty() {
            let (w, h) = (self.params.width, self.params.height);
            repair(&Polygon::new(
                LineString::from(vec![(w / 2.0, 0.0), (0.0, h), (w, h), (w / 2.0, 0.0)]),
                vec![],
            ))
        } else {
            unary_union(shapes.iter())
        };
    }

    /// Branches first, then the leaves on top. Holes in the canopy are
    /// painted white.
    pub fn render(&self, ctx: &mut Context) {
        ctx.background("white")
            .group("branches")
            .stroke(&self.params.branch_color)
            .fill("none");
        for branch in &self.branches {
            ctx.pen(branch.stroke_width())
                .lines(&geo_types::MultiLineString::new(vec![branch.line.clone()]));
        }
        ctx.group("leaves").stroke("none");
        for part in self.silhouette.iter() {
            ctx.fill(&self.params.leaf_color)
                .poly(&Polygon::new(part.exterior().clone(), vec![]));
            for hole in part.interiors() {
                ctx.fill("white").poly(&Polygon::new(hole.clone(), vec![]));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::Area;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grown(iterations: usize, seed: u64) -> MapleTree {
        let mut tree = MapleTree::new(TreeParams {
            branch_iterations: iterations,
            ..TreeParams::default()
        });
        tree.generate(&mut SmallRng::seed_from_u64(seed));
        tree
    }

    #[test]
    fn test_single_trunk() {
        let tree = grown(5, 1);
        let trunks = tree.branches.iter().filter(|b| b.level == 0).count();
        assert_eq!(trunks, 1);
        let trunk = &tree.branches[0];
        assert_eq!(trunk.line.0[0], coord! {x: 400.0, y: 800.0});
        assert_eq!(trunk.end(), coord! {x: 400.0, y: 500.0});
        assert_eq!(trunk.width, 20.0);
    }

    #[test]
    fn test_branch_structure() {
        let tree = grown(6, 2);
        for (i, branch) in tree.branches.iter().enumerate().skip(1) {
            let parent = branch.parent.expect("Only the trunk is parentless");
            assert!(parent < i);
            assert_eq!(tree.branches[parent].level + 1, branch.level);
            assert!(branch.level < 6);
            assert_eq!(branch.line.0.len(), 3);
            // Each fork starts where its parent ends.
            assert_eq!(branch.line.0[0], tree.branches[parent].end());
        }
        let limbs = tree.branches.iter().filter(|b| b.level == 1).count();
        assert!((3..=5).contains(&limbs));
    }

    #[test]
    fn test_widths_shrink() {
        let tree = grown(5, 3);
        for branch in tree.branches.iter().skip(1) {
            let expected = 20.0 * 0.6 * 0.7f64.powi(branch.level as i32 - 1);
            assert!((branch.width - expected).abs() < 1e-9);
            assert!(branch.stroke_width() >= 1.0);
        }
    }

    #[test]
    fn test_leaves_and_silhouette() {
        let tree = grown(6, 4);
        assert!(!tree.leaves.is_empty());
        assert!(tree.leaves.iter().all(|l| l.size >= 5.0));
        assert!(!tree.silhouette.0.is_empty());
        assert!(tree.silhouette.unsigned_area() > 0.0);
    }

    #[test]
    fn test_fallback_silhouette() {
        let mut tree = MapleTree::new(TreeParams::default());
        tree.create_silhouette(&mut SmallRng::seed_from_u64(0));
        // Half of the canvas: the triangle from the top middle to the bottom corners.
        assert!((tree.silhouette.unsigned_area() - 800.0 * 1000.0 / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_leaf_shape() {
        let leaf = MapleTree::leaf_shape(coord! {x: 0.0, y: 0.0}, 10.0, &mut SmallRng::seed_from_u64(5));
        assert_eq!(leaf.exterior().0.len(), 11);
        for c in leaf.exterior().coords() {
            assert!(c.x.hypot(c.y) <= 12.0 + 1e-9);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = grown(5, 9);
        let b = grown(5, 9);
        assert_eq!(a.branches, b.branches);
        assert_eq!(a.silhouette, b.silhouette);
    }
}
