use penwork::context::Context;
use penwork::raster::Rasterizer;
use penwork::tree::{MapleTree, TreeParams};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::Path;

fn main() {
    // A little row of saplings, each from its own seed.
    for seed in 0..3u64 {
        let params = TreeParams {
            width: 400.0,
            height: 500.0,
            branch_iterations: 5,
            trunk_width: 10.0,
            seed,
            ..TreeParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut tree = MapleTree::new(params);
        tree.generate(&mut rng);
        println!(
            "Seed {}: {} branches, {} leaves",
            seed,
            tree.branches.len(),
            tree.leaves.len()
        );

        let mut ctx = Context::new(400.0, 500.0);
        tree.render(&mut ctx);
        ctx.save_svg(Path::new(&format!("maple_{}.svg", seed)))
            .expect("Failed to write svg");
        Rasterizer::default()
            .save_png(&ctx, Path::new(&format!("maple_{}.png", seed)))
            .expect("Failed to write png");
    }
}
