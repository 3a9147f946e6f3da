//! Provides the [`crate::context::Context`] struct which gives us a canvas-style drawing
//! context for the generators. Operations are collected into named layers and
//! later turned into an SVG [`Document`] or handed to the rasterizer.
use crate::errors::ContextError;
use crate::geo_types::svg::SmoothCurve;
use geo_types::{coord, Coord, LineString, MultiLineString, MultiPolygon, Polygon};
pub use kurbo::BezPath;
pub use kurbo::Point as BezPoint;
use log::debug;
use svg::node::element::{Group, Rectangle};
use svg::Document;

pub mod operation;

pub use operation::{OPLayer, Operation, Primitive, Style};

/// Layer that takes any drawing done before a group is picked.
pub const DEFAULT_LAYER: &str = "default";

/// # Context
///
/// A Context is a _drawing_ context, used to perform operations against a
/// pseudo-canvas. Those operations are later collected up and turned into
/// an SVG (or a PNG preview, see [`crate::raster`]).
///
/// # Example
///
/// ```rust
/// use penwork::context::Context;
/// use penwork::geo_types::shapes::square;
///
/// let mut ctx = Context::new(100.0, 100.0);
/// ctx.background("white")
///     .group("boxes")
///     .stroke("black")
///     .fill("red")
///     .pen(0.5)
///     .poly(&square(50.0, 50.0, 20.0))
///     .push()
///     .dash(Some("4,2"))
///     .stroke("blue")
///     .line(0.0, 0.0, 100.0, 100.0)
///     .pop()
///     .unwrap()
///     .text(50.0, 90.0, "a");
/// let svg = ctx.to_svg().unwrap().to_string();
/// assert!(svg.contains("id=\"boxes\""));
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    width: f64,
    height: f64,
    background: Option<String>,
    layers: Vec<OPLayer>,
    current_layer: usize,
    style: Style,
    stack: Vec<(Style, usize)>,
}

impl Context {
    /// I can haz a new default drawing context? Size is in px.
    pub fn new(width: f64, height: f64) -> Context {
        Context {
            width,
            height,
            background: None,
            layers: vec![OPLayer {
                name: DEFAULT_LAYER.to_string(),
                operations: vec![],
            }],
            current_layer: 0,
            style: Style::default(),
            stack: vec![],
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Paint the whole canvas before anything else.
    pub fn background(&mut self, color: &str) -> &mut Self {
        self.background = Some(color.to_string());
        self
    }

    /// Switch to the named layer, creating it at the end of the layer list
    /// if it doesn't exist yet.
    pub fn group(&mut self, name: &str) -> &mut Self {
        self.current_layer = match self.layers.iter().position(|l| l.name == name) {
            Some(idx) => idx,
            None => {
                self.layers.push(OPLayer {
                    name: name.to_string(),
                    operations: vec![],
                });
                self.layers.len() - 1
            }
        };
        self
    }

    /// Pushes the current state onto the stack.
    pub fn push(&mut self) -> &mut Self {
        self.stack.push((self.style.clone(), self.current_layer));
        self
    }

    /// Pops the previous state off the stack
    pub fn pop(&mut self) -> Result<&mut Self, ContextError> {
        let (style, layer) = self.stack.pop().ok_or(ContextError::PoppedEmptyStack)?;
        self.style = style;
        self.current_layer = layer;
        Ok(self)
    }

    /// Sets the stroke color
    pub fn stroke(&mut self, color: &str) -> &mut Self {
        self.style.stroke_color = color.to_string();
        self
    }

    /// Sets the fill color. "none" turns filling off.
    pub fn fill(&mut self, color: &str) -> &mut Self {
        self.style.fill_color = color.to_string();
        self
    }

    /// Sets the pen width
    pub fn pen(&mut self, width: f64) -> &mut Self {
        self.style.pen_width = width;
        self
    }

    /// Sets (or clears) the SVG dash array, eg: "5,5"
    pub fn dash(&mut self, dash: Option<&str>) -> &mut Self {
        self.style.dash = dash.map(|d| d.to_string());
        self
    }

    pub fn font(&mut self, family: &str, size: f64) -> &mut Self {
        self.style.font_family = family.to_string();
        self.style.font_size = size;
        self
    }

    fn add_operation(&mut self, primitive: Primitive) -> &mut Self {
        let op = Operation {
            primitive,
            style: self.style.clone(),
        };
        if op.is_empty() {
            return self;
        }
        self.layers[self.current_layer].operations.push(op);
        self
    }

    /// SVG text-anchor for following text: "start", "middle" or "end".
    pub fn anchor(&mut self, anchor: &str) -> &mut Self {
        self.style.text_anchor = anchor.to_string();
        self
    }

    /// Draws a simple line from x0,y0 to x1,y1
    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> &mut Self {
        self.add_operation(Primitive::Lines(MultiLineString::new(vec![
            LineString::new(vec![coord! {x: x0, y: y0}, coord! {x: x1, y: y1}]),
        ])))
    }

    pub fn lines(&mut self, lines: &MultiLineString<f64>) -> &mut Self {
        self.add_operation(Primitive::Lines(lines.clone()))
    }

    pub fn poly(&mut self, poly: &Polygon<f64>) -> &mut Self {
        self.add_operation(Primitive::Polygons(MultiPolygon::new(vec![poly.clone()])))
    }

    pub fn polygons(&mut self, polys: &MultiPolygon<f64>) -> &mut Self {
        self.add_operation(Primitive::Polygons(polys.clone()))
    }

    /// Draws a bezier path
    pub fn path(&mut self, bezier: &BezPath) -> &mut Self {
        self.add_operation(Primitive::Curve(bezier.clone()))
    }

    /// Smooths a row of samples into a bezier path and draws it.
    pub fn smooth(&mut self, points: &[Coord<f64>], curve: SmoothCurve) -> &mut Self {
        self.add_operation(Primitive::Curve(curve.bez_path(points)))
    }

    /// Axis aligned rectangle, top left corner at x,y
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.add_operation(Primitive::Rect {
            x,
            y,
            width,
            height,
        })
    }

    /// Text with its baseline anchored at x,y in the current font
    pub fn text(&mut self, x: f64, y: f64, content: &str) -> &mut Self {
        self.add_operation(Primitive::Text {
            x,
            y,
            content: content.to_string(),
        })
    }

    /// The layers in drawing order. Empty layers are kept so callers can
    /// rely on group order.
    pub fn to_layers(&self) -> &[OPLayer] {
        &self.layers
    }

    /// Take this giant complex thing and generate an SVG Document, or an error. Whatever.
    pub fn to_svg(&self) -> Result<Document, ContextError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ContextError::SvgGenerationError(format!(
                "Invalid canvas size {}x{}",
                self.width, self.height
            )));
        }
        let mut svg = Document::new()
            .set("width", format!("{}px", self.width))
            .set("height", format!("{}px", self.height))
            .set("viewBox", (0.0, 0.0, self.width, self.height));

        if let Some(color) = &self.background {
            svg = svg.add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", self.width)
                    .set("height", self.height)
                    .set("fill", color.clone()),
            );
        }

        for layer in &self.layers {
            // The implicit default layer only shows up if something was drawn on it.
            if layer.name == DEFAULT_LAYER && layer.operations.is_empty() {
                continue;
            }
            debug!(
                "Layer {} has {} operations",
                layer.name,
                layer.operations.len()
            );
            let group = layer
                .operations
                .iter()
                .fold(Group::new().set("id", layer.name.clone()), |g, op| {
                    op.add_to(g)
                });
            svg = svg.add(group);
        }
        Ok(svg)
    }

    /// Writes the SVG to disk.
    pub fn save_svg(&self, path: &std::path::Path) -> Result<(), ContextError> {
        let doc = self.to_svg()?;
        svg::save(path, &doc).map_err(|e| ContextError::SvgGenerationError(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo_types::shapes::square;

    #[test]
    fn test_context_new() {
        let context = Context::new(10.0, 20.0);
        assert_eq!(context.width(), 10.0);
        assert_eq!(context.to_layers().len(), 1);
        assert!(context.background_color().is_none());
    }

    #[test]
    fn test_pop_empty_stack() {
        let mut context = Context::new(10.0, 10.0);
        assert!(matches!(
            context.pop(),
            Err(ContextError::PoppedEmptyStack)
        ));
    }

    #[test]
    fn test_push_pop_restores_state() {
        let mut context = Context::new(100.0, 100.0);
        context
            .group("a")
            .stroke("red")
            .push()
            .group("b")
            .stroke("blue")
            .line(0.0, 0.0, 1.0, 1.0)
            .pop()
            .expect("Stack should not be empty")
            .line(0.0, 0.0, 2.0, 2.0);
        let layers = context.to_layers();
        assert_eq!(layers[1].name, "a");
        assert_eq!(layers[1].operations[0].style.stroke_color, "red");
        assert_eq!(layers[2].name, "b");
        assert_eq!(layers[2].operations[0].style.stroke_color, "blue");
    }

    #[test]
    fn test_groups_in_insertion_order() {
        let mut context = Context::new(100.0, 100.0);
        context
            .group("second-drawn-first")
            .poly(&square(10.0, 10.0, 5.0))
            .group("later")
            .rect(0.0, 0.0, 5.0, 5.0)
            .group("second-drawn-first")
            .poly(&square(20.0, 20.0, 5.0));
        let svg = context.to_svg().expect("svg").to_string();
        let first = svg.find("second-drawn-first").expect("first group");
        let later = svg.find("later").expect("later group");
        assert!(first < later);
        assert!(!svg.contains("id=\"default\""));
    }

    #[test]
    fn test_document_size_and_background() {
        let mut context = Context::new(800.0, 600.0);
        context.background("white");
        let svg = context.to_svg().expect("svg").to_string();
        assert!(svg.contains("width=\"800px\""));
        assert!(svg.contains("height=\"600px\""));
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
        assert!(svg.contains("fill=\"white\""));
    }

    #[test]
    fn test_empty_geometry_is_skipped() {
        let mut context = Context::new(10.0, 10.0);
        context.lines(&MultiLineString::new(vec![]));
        assert!(context.to_layers()[0].operations.is_empty());
    }

    #[test]
    fn test_bad_size() {
        assert!(Context::new(0.0, 10.0).to_svg().is_err());
    }
}
