/// Crosshatching! You can fill your polys with lines, which is really useful
/// for plotters, because all you can draw is lines (or dots if you're a *monster*).
pub mod hatch;

/// Trait to convert geometry into an SVG object (or specifically, SVG components)
pub mod svg;

/// Trait to clip lines by a region. Hatch lines are clipped to the visible part
/// of each shape with this.
pub mod clip;

/// Helper to flatten all the polygons (or lines) from a Geometry into a Multi* type
pub mod flatten;

/// Boolean ops for geo_types
pub mod boolean;

/// Primitive shapes: regular polygons, circles, squares, triangles and stars.
pub mod shapes;
