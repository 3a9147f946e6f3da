//! Generative pen-plotter art pipelines
//!
//! Five independent generators, all drawing into the same canvas-style
//! [`context::Context`] and coming out as SVG (or a PNG preview):
//!
//! * [`composition`]: stacked shapes cut down to their visible regions by
//!   z-index, then hatched per colour with straight, exponential, wavy or
//!   noisy lines.
//! * [`waves`]: rows of wavy, flowing, or topographic lines.
//! * [`tree`]: a recursive Bloodgood maple with a leafy silhouette.
//! * [`letters`]: typographic letter grids.
//! * [`constellation`]: points tied together by bundles of noisy strands.
//!
//! The polygon toolkit underneath (hatching, clipping, booleans) lives in
//! [`geo_types`] and is built on [`geo`].
//!
//! [`geo`]: https://docs.rs/geo

/// Extensions/Traits for geo_types geometry: shapes, booleans, clipping and
/// hatching.
pub mod geo_types;

/// Error types for the library.
pub mod errors;

/// Drawing context, the thing every generator draws into.
pub mod context;

/// PNG previews of a context.
pub mod raster;

/// Z-index hatched compositions.
pub mod composition;

/// Wavy and noise line patterns.
pub mod waves;

/// Bloodgood maple silhouettes.
pub mod tree;

/// Letter grids.
pub mod letters;

/// Noise-curve bundles between scattered points.
pub mod constellation;

/// RON config files.
pub mod config;

/// Stderr logging for the binary.
pub mod logger;

/// Make your life easy! Just import prelude::* and ignore all the warnings!
pub mod prelude {
    pub use crate::composition::{Composition, CompositionParams, Shape, ShapeKind};
    pub use crate::config::Config;
    pub use crate::constellation::{Constellation, ConstellationParams, PointLayout};
    pub use crate::context::Context;
    pub use crate::geo_types::boolean::BooleanOp;
    pub use crate::geo_types::clip::LineClip;
    pub use crate::geo_types::hatch::{Hatch, HatchPattern, Hatches};
    pub use crate::geo_types::svg::{SmoothCurve, ToSvg};
    pub use crate::letters::{LetterGrid, LetterParams};
    pub use crate::raster::Rasterizer;
    pub use crate::tree::{MapleTree, TreeParams};
    pub use crate::waves::{WaveParams, WavePattern, WaveSet};
}
