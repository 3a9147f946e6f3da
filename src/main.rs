use anyhow::{anyhow, Context as _, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::info;
use penwork::composition::Composition;
use penwork::config::Config;
use penwork::constellation::{Constellation, PointLayout};
use penwork::context::Context;
use penwork::letters::LetterGrid;
use penwork::logger::StderrLogger;
use penwork::raster::{parse_color, Rasterizer};
use penwork::tree::MapleTree;
use penwork::waves::{WavePattern, WaveSet};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

/// Generative pen-plotter sketches, written out as SVG.
#[derive(Parser, Debug)]
#[command(name = "penwork", version, about)]
struct Cli {
    /// More logging. Repeat for more.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct Common {
    /// RON config file. Flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    /// SVG output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a PNG preview here
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum PatternArg {
    Random,
    Flowing,
    Topographic,
}

impl From<PatternArg> for WavePattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::Random => WavePattern::Random,
            PatternArg::Flowing => WavePattern::Flowing,
            PatternArg::Topographic => WavePattern::Topographic,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutArg {
    Random,
    Grid,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Z-index hatched shape composition
    Hatch {
        #[command(flatten)]
        common: Common,
        /// Use the five shape debugging layout instead of random shapes
        #[arg(long)]
        fixed: bool,
        /// Draw the visible region outlines instead of the hatching
        #[arg(long, conflicts_with = "shapes")]
        regions: bool,
        /// Draw filled, labelled shapes with the hatching on top
        #[arg(long)]
        shapes: bool,
        /// With --shapes, leave the hatching off
        #[arg(long, requires = "shapes")]
        no_hatching: bool,
    },
    /// Wavy line patterns
    Waves {
        #[command(flatten)]
        common: Common,
        #[arg(short, long, value_enum)]
        pattern: Option<PatternArg>,
    },
    /// Bloodgood maple silhouette
    Tree {
        #[command(flatten)]
        common: Common,
        #[arg(short, long)]
        iterations: Option<usize>,
        #[arg(long)]
        leaf_color: Option<String>,
        #[arg(long)]
        branch_color: Option<String>,
    },
    /// Letter grid
    Letters {
        #[command(flatten)]
        common: Common,
        /// Letters to cycle through, eg: "aure"
        #[arg(long)]
        sequence: Option<String>,
        /// Scatter red boxes over the grid
        #[arg(long)]
        rectangles: bool,
    },
    /// Points tied together by bundles of noisy strands
    Constellation {
        #[command(flatten)]
        common: Common,
        /// Random scatter, or the staggered diagonal grid
        #[arg(short, long, value_enum)]
        layout: Option<LayoutArg>,
        /// Big coloured shapes on every point
        #[arg(long)]
        accents: bool,
        /// How many filled blobs to put underneath
        #[arg(long)]
        blobs: Option<usize>,
    },
}

impl Common {
    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Loading config {}", path.display())),
            None => Ok(Config::default()),
        }
    }

    fn output_or(&self, default: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default))
    }
}

fn check_color(color: &str) -> Result<()> {
    parse_color(color)?;
    Ok(())
}

fn write_outputs(ctx: &Context, svg: &Path, png: Option<&Path>) -> Result<()> {
    ctx.save_svg(svg)
        .with_context(|| format!("Writing {}", svg.display()))?;
    info!("Wrote {}", svg.display());
    if let Some(png) = png {
        Rasterizer::default()
            .save_png(ctx, png)
            .with_context(|| format!("Writing {}", png.display()))?;
    }
    Ok(())
}

/// Which picture `hatch` draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HatchView {
    Plot,
    Regions,
    Shapes { hatching: bool },
}

impl HatchView {
    fn from_flags(regions: bool, shapes: bool, no_hatching: bool) -> HatchView {
        if regions {
            HatchView::Regions
        } else if shapes {
            HatchView::Shapes {
                hatching: !no_hatching,
            }
        } else {
            HatchView::Plot
        }
    }
}

fn hatch(common: &Common, fixed: bool, view: HatchView) -> Result<Context> {
    let mut params = common.load_config()?.hatch_params();
    params.seed = common.seed.unwrap_or(params.seed);
    params.width = common.width.unwrap_or(params.width);
    params.height = common.height.unwrap_or(params.height);
    for color in &params.palette {
        check_color(color)?;
    }
    let comp = if fixed {
        Composition::fixed(params)
    } else {
        let mut rng = SmallRng::seed_from_u64(params.seed);
        Composition::random(params, &mut rng)
    };
    let mut ctx = Context::new(comp.params.width, comp.params.height);
    match view {
        HatchView::Plot => comp.render(&mut ctx),
        HatchView::Regions => comp.render_regions(&mut ctx),
        HatchView::Shapes { hatching } => comp.render_shapes(&mut ctx, hatching),
    }
    Ok(ctx)
}

fn waves(common: &Common, pattern: Option<PatternArg>) -> Result<Context> {
    let mut params = common.load_config()?.wave_params();
    if let Some(pattern) = pattern {
        params.pattern = pattern.into();
    }
    params.seed = common.seed.unwrap_or(params.seed);
    params.set_size(common.width, common.height);
    let set = WaveSet::generate(&params);
    let mut ctx = Context::new(set.width, set.height);
    set.render(&mut ctx);
    Ok(ctx)
}

fn tree(
    common: &Common,
    iterations: Option<usize>,
    leaf_color: Option<String>,
    branch_color: Option<String>,
) -> Result<Context> {
    let mut params = common.load_config()?.tree_params();
    params.seed = common.seed.unwrap_or(params.seed);
    params.width = common.width.unwrap_or(params.width);
    params.height = common.height.unwrap_or(params.height);
    params.branch_iterations = iterations.unwrap_or(params.branch_iterations);
    params.leaf_color = leaf_color.unwrap_or(params.leaf_color);
    params.branch_color = branch_color.unwrap_or(params.branch_color);
    check_color(&params.leaf_color)?;
    check_color(&params.branch_color)?;

    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut ctx = Context::new(params.width, params.height);
    MapleTree::new(params).generate(&mut rng).render(&mut ctx);
    Ok(ctx)
}

fn letters(common: &Common, sequence: Option<String>, rectangles: bool) -> Result<Context> {
    let mut params = common.load_config()?.letter_params();
    params.seed = common.seed.unwrap_or(params.seed);
    params.width = common.width.unwrap_or(params.width);
    params.height = common.height.unwrap_or(params.height);
    if let Some(sequence) = sequence {
        params.sequence = sequence.chars().map(|c| c.to_string()).collect();
    }
    params.add_rectangles |= rectangles;
    params.validate()?;

    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut ctx = Context::new(params.width, params.height);
    LetterGrid::new(params).generate(&mut rng).render(&mut ctx);
    Ok(ctx)
}

fn constellation(
    common: &Common,
    layout: Option<LayoutArg>,
    accents: bool,
    blobs: Option<usize>,
) -> Result<Context> {
    let mut params = common.load_config()?.constellation_params();
    params.seed = common.seed.unwrap_or(params.seed);
    params.width = common.width.unwrap_or(params.width);
    params.height = common.height.unwrap_or(params.height);
    params.layout = match (layout, params.layout) {
        (Some(LayoutArg::Random), PointLayout::Random { .. }) | (None, _) => params.layout,
        (Some(LayoutArg::Grid), PointLayout::DiagonalGrid { .. }) => params.layout,
        (Some(LayoutArg::Random), _) => PointLayout::Random { count: 15 },
        (Some(LayoutArg::Grid), _) => PointLayout::DiagonalGrid {
            cols: 5,
            rows: 10,
            keep: 0.5,
        },
    };
    params.accents |= accents;
    params.blobs = blobs.unwrap_or(params.blobs);
    for color in &params.palette {
        check_color(color)?;
    }

    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut ctx = Context::new(params.width, params.height);
    Constellation::new(params).generate(&mut rng).render(&mut ctx);
    Ok(ctx)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::init(StderrLogger::level_for(cli.verbose))
        .map_err(|e| anyhow!("Failed to set logger: {}", e))?;

    let (ctx, common, default_out) = match cli.command {
        Command::Hatch {
            common,
            fixed,
            regions,
            shapes,
            no_hatching,
        } => {
            let view = HatchView::from_flags(regions, shapes, no_hatching);
            (hatch(&common, fixed, view)?, common, "hatch.svg")
        }
        Command::Waves { common, pattern } => (waves(&common, pattern)?, common, "waves.svg"),
        Command::Tree {
            common,
            iterations,
            leaf_color,
            branch_color,
        } => (
            tree(&common, iterations, leaf_color, branch_color)?,
            common,
            "maple.svg",
        ),
        Command::Letters {
            common,
            sequence,
            rectangles,
        } => (letters(&common, sequence, rectangles)?, common, "letters.svg"),
        Command::Constellation {
            common,
            layout,
            accents,
            blobs,
        } => (
            constellation(&common, layout, accents, blobs)?,
            common,
            "constellation.svg",
        ),
    };
    write_outputs(&ctx, &common.output_or(default_out), common.png.as_deref())
}
