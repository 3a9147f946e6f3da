use penwork::composition::{Composition, CompositionParams};
use penwork::config::Config;
use penwork::constellation::{Constellation, ConstellationParams, PointLayout};
use penwork::context::Context;
use penwork::letters::{LetterGrid, LetterParams};
use penwork::raster::Rasterizer;
use penwork::tree::{MapleTree, TreeParams};
use penwork::waves::{WaveParams, WavePattern, WaveSet};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn fixed_composition_to_svg() {
    let comp = Composition::fixed(CompositionParams::default());
    let mut ctx = Context::new(1200.0, 1800.0);
    comp.render(&mut ctx);
    let svg = ctx.to_svg().expect("svg").to_string();
    assert!(svg.contains("viewBox=\"0 0 1200 1800\""));
    for color in 0..5 {
        assert!(svg.contains(&format!("id=\"color-{}\"", color)));
    }
    assert!(svg.find("id=\"color-4\"") < svg.find("id=\"outlines\""));
}

#[test]
fn random_composition_png_preview() {
    let params = CompositionParams {
        width: 300.0,
        height: 300.0,
        num_shapes: 6,
        padding: 20.0,
        ..CompositionParams::default()
    };
    let mut rng = SmallRng::seed_from_u64(5);
    let comp = Composition::random(params, &mut rng);
    let mut ctx = Context::new(300.0, 300.0);
    comp.render_shapes(&mut ctx, false);
    let img = Rasterizer::default().render(&ctx).expect("png");
    assert_eq!((img.width(), img.height()), (300, 300));
}

#[test]
fn every_wave_pattern_renders() {
    for pattern in [
        WavePattern::Random,
        WavePattern::Flowing,
        WavePattern::Topographic,
    ] {
        let mut params = WaveParams {
            pattern,
            ..WaveParams::default()
        };
        params.set_size(Some(200.0), Some(150.0));
        let set = WaveSet::generate(&params);
        assert!(!set.lines.is_empty(), "{:?} made no rows", pattern);
        let mut ctx = Context::new(set.width, set.height);
        set.render(&mut ctx);
        let svg = ctx.to_svg().expect("svg").to_string();
        assert!(svg.contains("id=\"waves\""));
        assert!(svg.contains("width=\"200px\""));
    }
}

#[test]
fn small_maple_to_svg() {
    let params = TreeParams {
        width: 400.0,
        height: 500.0,
        branch_iterations: 4,
        ..TreeParams::default()
    };
    let mut tree = MapleTree::new(params);
    tree.generate(&mut SmallRng::seed_from_u64(9));
    assert!(!tree.silhouette.0.is_empty());
    let mut ctx = Context::new(400.0, 500.0);
    tree.render(&mut ctx);
    let svg = ctx.to_svg().expect("svg").to_string();
    assert!(svg.contains("id=\"branches\""));
    assert!(svg.contains("id=\"leaves\""));
    assert!(svg.contains("#8B0000"));
}

#[test]
fn letters_from_config() {
    let path = std::env::temp_dir().join(format!("penwork-letters-{}.ron", std::process::id()));
    std::fs::write(
        &path,
        r#"(letters: Some((width: 260.0, height: 260.0, sequence: ["x", "y"], add_rectangles: true)))"#,
    )
    .expect("write config");
    let config = Config::load(&path).expect("load config");
    let _ = std::fs::remove_file(&path);

    let params: LetterParams = config.letter_params();
    let mut grid = LetterGrid::new(params);
    grid.generate(&mut SmallRng::seed_from_u64(2));
    // 11 rows of 11 columns, 5 two letter words per column.
    assert_eq!(grid.placements.len(), 11 * 5 * 2);
    let mut ctx = Context::new(260.0, 260.0);
    grid.render(&mut ctx);
    let svg = ctx.to_svg().expect("svg").to_string();
    assert_eq!(svg.matches("<text").count(), 110);
    assert!(svg.contains("Roboto Mono"));
}

#[test]
fn grid_constellation_png_preview() {
    let params = ConstellationParams {
        width: 400.0,
        height: 600.0,
        layout: PointLayout::DiagonalGrid {
            cols: 3,
            rows: 5,
            keep: 1.0,
        },
        min_distance: 100.0,
        max_distance: 300.0,
        strands: 8,
        blobs: 2,
        ..ConstellationParams::default()
    };
    let mut sky = Constellation::new(params);
    sky.generate(&mut SmallRng::seed_from_u64(3));
    assert_eq!(sky.points.len(), 15);
    assert!(!sky.bundles.is_empty());

    let mut ctx = Context::new(400.0, 600.0);
    sky.render(&mut ctx);
    let svg = ctx.to_svg().expect("svg").to_string();
    assert!(svg.find("id=\"blobs\"") < svg.find("id=\"connections\""));
    let img = Rasterizer {
        scale: 0.5,
        system_fonts: false,
    }
    .render(&ctx)
    .expect("png");
    assert_eq!((img.width(), img.height()), (200, 300));
    assert!(img.pixels().any(|p| p.0 != [255, 255, 255, 255]));
}
