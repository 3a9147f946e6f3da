use crate::geo_types::svg::ToSvg;
use geo_types::{MultiLineString, MultiPolygon};
pub use kurbo::BezPath;
use kurbo::PathEl;
use svg::node::element::path::Data;
use svg::node::element::{Group, Path, Rectangle, Text};

/// Styling snapshot taken when an operation is recorded. The context keeps
/// one of these as its current state, and push/pop saves and restores it.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub stroke_color: String,
    pub fill_color: String,
    pub pen_width: f64,
    pub dash: Option<String>,
    pub line_join: String,
    pub line_cap: String,
    pub font_family: String,
    pub font_size: f64,
    pub text_anchor: String,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            stroke_color: "black".to_string(),
            fill_color: "none".to_string(),
            pen_width: 1.0,
            dash: None,
            line_join: "round".to_string(),
            line_cap: "round".to_string(),
            font_family: "monospace".to_string(),
            font_size: 12.0,
            text_anchor: "start".to_string(),
        }
    }
}

/// The thing being drawn.
#[derive(Clone, Debug)]
pub enum Primitive {
    Lines(MultiLineString<f64>),
    Polygons(MultiPolygon<f64>),
    Curve(BezPath),
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
    },
}

/// Operations are the recorded drawing calls: some geometry plus the
/// Context state at the time it was drawn.
#[derive(Clone, Debug)]
pub struct Operation {
    pub primitive: Primitive,
    pub style: Style,
}

/// A named layer of operations, rendered as an SVG group in the order the
/// layer was first drawn to.
#[derive(Clone, Debug, Default)]
pub struct OPLayer {
    pub name: String,
    pub operations: Vec<Operation>,
}

/// SVG path data for a kurbo path.
pub fn bez_to_data(path: &BezPath) -> Data {
    path.elements().iter().fold(Data::new(), |data, el| match el {
        PathEl::MoveTo(p) => data.move_to((p.x, p.y)),
        PathEl::LineTo(p) => data.line_to((p.x, p.y)),
        PathEl::QuadTo(c, p) => data.quadratic_curve_to((c.x, c.y, p.x, p.y)),
        PathEl::CurveTo(c1, c2, p) => data.cubic_curve_to((c1.x, c1.y, c2.x, c2.y, p.x, p.y)),
        PathEl::ClosePath => data.close(),
    })
}

impl Operation {
    fn styled_path(&self, data: Data) -> Path {
        let path = Path::new()
            .set("d", data)
            .set("fill", self.style.fill_color.clone())
            .set("stroke", self.style.stroke_color.clone())
            .set("stroke-width", self.style.pen_width)
            .set("stroke-linejoin", self.style.line_join.clone())
            .set("stroke-linecap", self.style.line_cap.clone());
        match &self.style.dash {
            Some(dash) => path.set("stroke-dasharray", dash.clone()),
            None => path,
        }
    }

    /// Is there anything to draw?
    pub fn is_empty(&self) -> bool {
        match &self.primitive {
            Primitive::Lines(mls) => mls.0.is_empty(),
            Primitive::Polygons(mp) => mp.0.is_empty(),
            Primitive::Curve(path) => path.elements().is_empty(),
            Primitive::Rect { .. } => false,
            Primitive::Text { content, .. } => content.is_empty(),
        }
    }

    /// Adds this operation's SVG element to the group.
    pub fn add_to(&self, group: Group) -> Group {
        match &self.primitive {
            Primitive::Lines(mls) => group.add(self.styled_path(mls.to_path_data())),
            Primitive::Polygons(mp) => group.add(
                self.styled_path(mp.to_path_data())
                    .set("fill-rule", "evenodd"),
            ),
            Primitive::Curve(path) => group.add(self.styled_path(bez_to_data(path))),
            Primitive::Rect {
                x,
                y,
                width,
                height,
            } => {
                let rect = Rectangle::new()
                    .set("x", *x)
                    .set("y", *y)
                    .set("width", *width)
                    .set("height", *height)
                    .set("fill", self.style.fill_color.clone())
                    .set("stroke", self.style.stroke_color.clone())
                    .set("stroke-width", self.style.pen_width);
                match &self.style.dash {
                    Some(dash) => group.add(rect.set("stroke-dasharray", dash.clone())),
                    None => group.add(rect),
                }
            }
            Primitive::Text { x, y, content } => group.add(
                Text::new(content.clone())
                    .set("x", *x)
                    .set("y", *y)
                    .set("font-family", self.style.font_family.clone())
                    .set("font-size", self.style.font_size)
                    .set("text-anchor", self.style.text_anchor.clone())
                    .set("fill", self.style.fill_color.clone())
                    .set("stroke", self.style.stroke_color.clone())
                    .set("stroke-width", self.style.pen_width),
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use kurbo::Point as BezPoint;

    #[test]
    fn test_bez_to_data() {
        let mut path = BezPath::new();
        path.move_to(BezPoint::new(0.0, 0.0));
        path.curve_to(
            BezPoint::new(1.0, 1.0),
            BezPoint::new(2.0, 1.0),
            BezPoint::new(3.0, 0.0),
        );
        path.close_path();
        let rendered = Path::new().set("d", bez_to_data(&path)).to_string();
        assert!(rendered.contains("M0,0"));
        assert!(rendered.contains("C1,1,2,1,3,0"));
    }

    #[test]
    fn test_dashed_rect() {
        let op = Operation {
            primitive: Primitive::Rect {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
            },
            style: Style {
                dash: Some("5,5".to_string()),
                ..Style::default()
            },
        };
        let rendered = op.add_to(Group::new()).to_string();
        assert!(rendered.contains("stroke-dasharray=\"5,5\""));
        assert!(!op.is_empty());
    }
}
