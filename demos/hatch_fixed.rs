use penwork::composition::style::LineKind;
use penwork::composition::{Composition, CompositionParams};
use penwork::context::Context;
use penwork::raster::Rasterizer;
use std::path::Path;

fn main() {
    // Same five shapes each time, one line family per colour.
    let params = CompositionParams {
        line_kinds: vec![
            LineKind::Straight,
            LineKind::Exponential { growth: 1.15 },
            LineKind::Wavy {
                amplitude: 4.0,
                wavelength: 40.0,
            },
            LineKind::Noise {
                seed: 42,
                amplitude: 6.0,
                frequency: 0.02,
            },
        ],
        ..CompositionParams::default()
    };
    let comp = Composition::fixed(params);

    let mut ctx = Context::new(comp.params.width, comp.params.height);
    comp.render(&mut ctx);
    ctx.save_svg(Path::new("hatch_fixed.svg"))
        .expect("Failed to write hatch_fixed.svg");

    let mut regions = Context::new(comp.params.width, comp.params.height);
    comp.render_regions(&mut regions);
    regions
        .save_svg(Path::new("hatch_fixed_regions.svg"))
        .expect("Failed to write hatch_fixed_regions.svg");

    let mut shapes = Context::new(comp.params.width, comp.params.height);
    comp.render_shapes(&mut shapes, true);
    Rasterizer::default()
        .save_png(&shapes, Path::new("hatch_fixed_shapes.png"))
        .expect("Failed to write hatch_fixed_shapes.png");

    for region in comp.effective_regions() {
        let shape = &comp.shapes[region.shape];
        println!(
            "Shape {:?} z{} colour {}: {} part(s)",
            shape.kind,
            shape.z_index,
            region.color_index,
            region.region.0.len()
        );
    }
}
