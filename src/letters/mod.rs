//! Typographic grids: a short letter sequence repeated down the page in
//! staggered word columns, with an optional scattering of long red boxes
//! laid over the grid.
use crate::context::Context;
use crate::errors::ConfigError;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Box length in cells along its long side.
const RECT_CELLS: f64 = 5.0;

/// Most rows (or columns) a grid will ever get.
pub const MAX_AXIS_CELLS: usize = 4096;

/// Largest grid `validate` accepts.
pub const MAX_CELLS: usize = 1_000_000;

/// Cells along one axis. Zero when the pitch can't lay anything out.
fn cell_count(extent: f64, step: f64) -> usize {
    if !(step.is_finite() && step > 0.0 && extent.is_finite()) {
        return 0;
    }
    let n = (extent / step).max(0.0);
    if n >= MAX_AXIS_CELLS as f64 {
        MAX_AXIS_CELLS
    } else {
        n as usize + 1
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LetterParams {
    pub width: f64,
    pub height: f64,
    pub cell_size: f64,
    /// Font size in px. Half the cell, rounded down, when not set.
    pub letter_size: Option<f64>,
    pub x_offset_factor: f64,
    pub y_offset_factor: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub sequence: Vec<String>,
    pub add_rectangles: bool,
    pub rectangle_fraction: f64,
    pub font_family: String,
    pub seed: u64,
}

impl Default for LetterParams {
    fn default() -> Self {
        LetterParams {
            width: 800.0,
            height: 800.0,
            cell_size: 26.0,
            letter_size: None,
            x_offset_factor: 0.33,
            y_offset_factor: 0.5,
            horizontal_spacing: 1.0,
            vertical_spacing: 1.0,
            sequence: ["a", "u", "r", "e"].iter().map(|s| s.to_string()).collect(),
            add_rectangles: false,
            rectangle_fraction: 0.15,
            font_family: "'Roboto Mono', monospace".to_string(),
            seed: 42,
        }
    }
}

impl LetterParams {
    pub fn letter_size(&self) -> f64 {
        self.letter_size
            .unwrap_or_else(|| (self.cell_size / 2.0).floor())
    }

    /// Column pitch
    pub fn h_step(&self) -> f64 {
        self.cell_size * self.horizontal_spacing
    }

    /// Row pitch
    pub fn v_step(&self) -> f64 {
        self.cell_size * self.vertical_spacing
    }

    pub fn cols(&self) -> usize {
        cell_count(self.width, self.h_step())
    }

    pub fn rows(&self) -> usize {
        cell_count(self.height, self.v_step())
    }

    /// Rejects pitches and canvas sizes that can't make a sensible grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (h, v) = (self.h_step(), self.v_step());
        if !(h.is_finite() && h > 0.0 && v.is_finite() && v > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "letters: cell_size and spacings must be positive, got a {}x{} pitch",
                h, v
            )));
        }
        if !(self.width.is_finite() && self.width >= 0.0)
            || !(self.height.is_finite() && self.height >= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "letters: bad canvas size {}x{}",
                self.width, self.height
            )));
        }
        let (cw, rh) = (self.width / h, self.height / v);
        if cw >= MAX_AXIS_CELLS as f64
            || rh >= MAX_AXIS_CELLS as f64
            || self.cols() * self.rows() > MAX_CELLS
        {
            return Err(ConfigError::Invalid(format!(
                "letters: a {:.0}x{:.0} grid is too big",
                cw, rh
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub letter: String,
    pub col: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An overlay box anchored on a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRect {
    pub orientation: Orientation,
    pub col: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct LetterGrid {
    pub params: LetterParams,
    pub placements: Vec<Placement>,
    /// Row major; `None` where no letter landed.
    pub grid: Vec<Vec<Option<String>>>,
    pub rectangles: Vec<GridRect>,
}

/// Python style `range(start, stop, step)` over signed bounds, so a stop
/// below the start just yields nothing.
fn stepped(start: i64, stop: i64, step: usize) -> impl Iterator<Item = usize> {
    (start..stop.max(start)).step_by(step).map(|v| v as usize)
}

impl LetterGrid {
    pub fn new(params: LetterParams) -> LetterGrid {
        let rows = params.rows();
        let cols = params.cols();
        LetterGrid {
            params,
            placements: vec![],
            grid: vec![vec![None; cols]; rows],
            rectangles: vec![],
        }
    }

    /// Lay out the letters, and the boxes if they're turned on.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> &mut Self {
        self.place_letters();
        self.rectangles = if self.params.add_rectangles {
            self.pick_rectangles(rng)
        } else {
            vec![]
        };
        info!(
            "Letter grid {}x{}: {} letters, {} boxes",
            self.params.cols(),
            self.params.rows(),
            self.placements.len(),
            self.rectangles.len()
        );
        self
    }

    /// Each column runs the sequence top to bottom, starting one letter later
    /// than the column to its left.
    pub fn place_letters(&mut self) {
        let p = &self.params;
        let (h, v) = (p.h_step(), p.v_step());
        let (cols, rows) = (p.cols(), p.rows());
        let len = p.sequence.len();
        self.placements.clear();
        self.grid = vec![vec![None; cols]; rows];
        if len == 0 {
            return;
        }
        let word_rows = rows / len;
        for col in 0..cols {
            for word_row in 0..word_rows {
                for i in 0..len {
                    let letter = p.sequence[(col + i) % len].clone();
                    let row = word_row * len + i;
                    let x = col as f64 * h + h * p.x_offset_factor;
                    let y = (word_row * len) as f64 * v + i as f64 * v + v * p.y_offset_factor;
                    self.grid[row][col] = Some(letter.clone());
                    self.placements.push(Placement {
                        letter,
                        col,
                        row,
                        x,
                        y,
                    });
                }
            }
        }
    }

    /// Every cell a box may start from, horizontal ones first.
    pub fn rectangle_candidates(&self) -> Vec<(Orientation, usize, usize)> {
        let cols = self.params.cols() as i64;
        let rows = self.params.rows() as i64;
        let mut out = vec![];
        for col in stepped(0, cols - 4, 4) {
            for row in stepped(0, rows, 4) {
                out.push((Orientation::Horizontal, col, row));
            }
        }
        for col in stepped(2, cols - 4, 4) {
            for row in stepped(2, rows, 4) {
                out.push((Orientation::Horizontal, col, row));
            }
        }
        for col in stepped(0, cols - 4, 4) {
            for row in stepped(2, rows, 4) {
                out.push((Orientation::Vertical, col, row));
            }
        }
        for col in stepped(2, cols - 4, 4) {
            for row in stepped(4, rows - 4, 4) {
                out.push((Orientation::Vertical, col, row));
            }
        }
        out
    }

    /// Box geometry for a cell. Boxes are centred on the row's midline.
    pub fn rect_at(&self, orientation: Orientation, col: usize, row: usize) -> GridRect {
        let (h, v) = (self.params.h_step(), self.params.v_step());
        let long = RECT_CELLS * h;
        let short = self.params.cell_size;
        let x = col as f64 * h;
        let mid = row as f64 * v + v / 2.0;
        let (y, width, height) = match orientation {
            Orientation::Horizontal => (mid - short / 2.0, long, short),
            Orientation::Vertical => (mid - long / 2.0, short, long),
        };
        GridRect {
            orientation,
            col,
            row,
            x,
            y,
            width,
            height,
        }
    }

    /// Shuffle the candidates and keep a fraction of them.
    pub fn pick_rectangles<R: Rng>(&self, rng: &mut R) -> Vec<GridRect> {
        let mut candidates = self.rectangle_candidates();
        candidates.shuffle(rng);
        let keep = (candidates.len() as f64 * self.params.rectangle_fraction.clamp(0.0, 1.0))
            as usize;
        debug!("Keeping {} of {} box candidates", keep, candidates.len());
        candidates
            .into_iter()
            .take(keep)
            .map(|(o, col, row)| self.rect_at(o, col, row))
            .collect()
    }

    pub fn render(&self, ctx: &mut Context) {
        ctx.background("white")
            .group("letters")
            .font(&self.params.font_family, self.params.letter_size())
            .anchor("start")
            .stroke("black")
            .pen(0.1)
            .fill("black");
        for placement in &self.placements {
            ctx.text(placement.x, placement.y, &placement.letter);
        }
        if self.rectangles.is_empty() {
            return;
        }
        ctx.group("rectangles").fill("none").stroke("red").pen(2.0);
        for rect in &self.rectangles {
            ctx.rect(rect.x, rect.y, rect.width, rect.height);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::Primitive;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults() {
        let params = LetterParams::default();
        assert_eq!(params.letter_size(), 13.0);
        // 800 / 26 = 30.77
        assert_eq!(params.cols(), 31);
        assert_eq!(params.rows(), 31);
    }

    #[test]
    fn test_zero_pitch_makes_no_grid() {
        for params in [
            LetterParams {
                cell_size: 0.0,
                ..LetterParams::default()
            },
            LetterParams {
                horizontal_spacing: 0.0,
                ..LetterParams::default()
            },
            LetterParams {
                vertical_spacing: f64::NAN,
                ..LetterParams::default()
            },
        ] {
            assert!(params.validate().is_err());
            let mut grid = LetterGrid::new(params);
            grid.generate(&mut SmallRng::seed_from_u64(1));
            assert!(grid.placements.is_empty());
            assert!(grid.rectangle_candidates().is_empty());
        }
    }

    #[test]
    fn test_huge_grid_is_capped() {
        let params = LetterParams {
            cell_size: 1e-9,
            ..LetterParams::default()
        };
        assert_eq!(params.cols(), MAX_AXIS_CELLS);
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));
        assert!(LetterParams::default().validate().is_ok());
    }

    #[test]
    fn test_letter_layout() {
        let mut grid = LetterGrid::new(LetterParams::default());
        grid.place_letters();
        // 31 rows makes 7 full words per column.
        assert_eq!(grid.placements.len(), 31 * 7 * 4);
        let first = &grid.placements[0];
        assert_eq!(first.letter, "a");
        assert!((first.x - 26.0 * 0.33).abs() < 1e-9);
        assert!((first.y - 13.0).abs() < 1e-9);

        // Column 1 starts one letter along the sequence.
        assert_eq!(grid.grid[0][1].as_deref(), Some("u"));
        assert_eq!(grid.grid[3][1].as_deref(), Some("a"));
        assert_eq!(grid.grid[5][2].as_deref(), Some("e"));
        // The partial word at the bottom is left empty.
        assert!(grid.grid[30].iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_empty_sequence() {
        let mut grid = LetterGrid::new(LetterParams {
            sequence: vec![],
            ..LetterParams::default()
        });
        grid.place_letters();
        assert!(grid.placements.is_empty());
    }

    #[test]
    fn test_rectangle_geometry() {
        let grid = LetterGrid::new(LetterParams::default());
        let horizontal = grid.rect_at(Orientation::Horizontal, 4, 2);
        assert_eq!(horizontal.x, 104.0);
        assert_eq!(horizontal.y, 2.0 * 26.0 + 13.0 - 13.0);
        assert_eq!((horizontal.width, horizontal.height), (130.0, 26.0));
        let vertical = grid.rect_at(Orientation::Vertical, 4, 2);
        assert_eq!(vertical.y, 65.0 - 65.0);
        assert_eq!((vertical.width, vertical.height), (26.0, 130.0));
    }

    #[test]
    fn test_rectangle_candidates() {
        let grid = LetterGrid::new(LetterParams::default());
        let candidates = grid.rectangle_candidates();
        // cols < 27: 0..24 step 4 gives 7, 2..26 gives 7.
        // rows < 31: 0.. gives 8, 2.. gives 8, 4..27 gives 6.
        let horizontal = 7 * 8 + 7 * 8;
        let vertical = 7 * 8 + 7 * 6;
        assert_eq!(candidates.len(), horizontal + vertical);
        assert!(candidates.iter().all(|(_, col, _)| *col < 27));
    }

    #[test]
    fn test_small_grid_has_no_candidates() {
        let grid = LetterGrid::new(LetterParams {
            width: 50.0,
            height: 50.0,
            ..LetterParams::default()
        });
        assert!(grid.rectangle_candidates().is_empty());
    }

    #[test]
    fn test_pick_rectangles() {
        let params = LetterParams {
            add_rectangles: true,
            ..LetterParams::default()
        };
        let mut grid = LetterGrid::new(params);
        let mut rng = SmallRng::seed_from_u64(3);
        grid.generate(&mut rng);
        let total = grid.rectangle_candidates().len();
        assert_eq!(grid.rectangles.len(), (total as f64 * 0.15) as usize);

        let mut again = LetterGrid::new(grid.params.clone());
        again.generate(&mut SmallRng::seed_from_u64(3));
        assert_eq!(grid.rectangles, again.rectangles);
    }

    #[test]
    fn test_render_groups() {
        let params = LetterParams {
            add_rectangles: true,
            ..LetterParams::default()
        };
        let mut grid = LetterGrid::new(params);
        grid.generate(&mut SmallRng::seed_from_u64(1));
        let mut ctx = Context::new(800.0, 800.0);
        grid.render(&mut ctx);
        let layers = ctx.to_layers();
        assert_eq!(layers[1].name, "letters");
        assert_eq!(layers[1].operations.len(), grid.placements.len());
        assert_eq!(layers[1].operations[0].style.font_size, 13.0);
        assert_eq!(layers[2].name, "rectangles");
        assert!(layers[2]
            .operations
            .iter()
            .all(|op| matches!(op.primitive, Primitive::Rect { .. })
                && op.style.stroke_color == "red"));
    }

    #[test]
    fn test_no_rectangle_group_when_off() {
        let mut grid = LetterGrid::new(LetterParams::default());
        grid.generate(&mut SmallRng::seed_from_u64(1));
        let mut ctx = Context::new(800.0, 800.0);
        grid.render(&mut ctx);
        assert!(ctx.to_layers().iter().all(|l| l.name != "rectangles"));
    }
}
