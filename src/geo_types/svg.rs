use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use kurbo::{BezPath, Point as BezPoint};
use serde::{Deserialize, Serialize};
use svg::node::element::path::Data;
use svg::node::element::Path;

pub trait ToSvg {
    /// Convert the Geometry into an SVG PathData item
    fn to_path_data(&self) -> Data;

    /// Convert the Geometry into a bare SVG Path; styling is up to the caller.
    fn to_path(&self) -> Path {
        Path::new().set("d", self.to_path_data())
    }
}

fn append_linestring(mut data: Data, ls: &LineString<f64>, close: bool) -> Data {
    let mut coords = ls.coords();
    if let Some(first) = coords.next() {
        data = data.move_to((first.x, first.y));
        for c in coords {
            data = data.line_to((c.x, c.y));
        }
        if close {
            data = data.close();
        }
    }
    data
}

fn append_polygon(mut data: Data, poly: &Polygon<f64>) -> Data {
    data = append_linestring(data, poly.exterior(), true);
    for ring in poly.interiors() {
        data = append_linestring(data, ring, true);
    }
    data
}

impl ToSvg for LineString<f64> {
    fn to_path_data(&self) -> Data {
        append_linestring(Data::new(), self, false)
    }
}

impl ToSvg for MultiLineString<f64> {
    fn to_path_data(&self) -> Data {
        self.iter()
            .fold(Data::new(), |data, ls| append_linestring(data, ls, false))
    }
}

impl ToSvg for Polygon<f64> {
    fn to_path_data(&self) -> Data {
        append_polygon(Data::new(), self)
    }
}

impl ToSvg for MultiPolygon<f64> {
    fn to_path_data(&self) -> Data {
        self.iter().fold(Data::new(), append_polygon)
    }
}

/// One step of a smoothed curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveSegment {
    Line(Coord<f64>),
    Cubic(Coord<f64>, Coord<f64>, Coord<f64>),
}

/// How a row of sampled points gets turned into cubic Béziers. Thirds and
/// Midpoint eat the samples three at a time and finish any leftovers with
/// straight lines.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothCurve {
    /// Control x at 1/3 and 2/3 of the chord, control y from the two skipped
    /// samples.
    Thirds,
    /// Control points half way along the first and last legs, at the height
    /// of the neighbouring sample.
    #[default]
    Midpoint,
    /// Uniform Catmull-Rom through every sample but the first and last, which
    /// only steer the ends. Fewer than four samples draw nothing.
    CatmullRom,
}

fn catmull_rom(points: &[Coord<f64>]) -> Vec<CurveSegment> {
    points
        .windows(4)
        .map(|w| {
            let (p0, p1, p2, p3) = (w[0], w[1], w[2], w[3]);
            CurveSegment::Cubic(p1 + (p2 - p0) / 6.0, p2 - (p3 - p1) / 6.0, p2)
        })
        .collect()
}

impl SmoothCurve {
    /// Where the pen goes down.
    pub fn start(&self, points: &[Coord<f64>]) -> Option<Coord<f64>> {
        match self {
            SmoothCurve::CatmullRom if points.len() < 4 => None,
            SmoothCurve::CatmullRom => Some(points[1]),
            _ => points.first().copied(),
        }
    }

    pub fn segments(&self, points: &[Coord<f64>]) -> Vec<CurveSegment> {
        if *self == SmoothCurve::CatmullRom {
            return catmull_rom(points);
        }
        let mut out = vec![];
        let mut i = 0;
        while i + 3 < points.len() {
            let (p0, p1, p2, p3) = (points[i], points[i + 1], points[i + 2], points[i + 3]);
            let (c1, c2) = match self {
                SmoothCurve::Thirds => (
                    Coord {
                        x: p0.x + (p3.x - p0.x) / 3.0,
                        y: p1.y,
                    },
                    Coord {
                        x: p0.x + 2.0 * (p3.x - p0.x) / 3.0,
                        y: p2.y,
                    },
                ),
                _ => (
                    Coord {
                        x: p0.x + (p1.x - p0.x) * 0.5,
                        y: p1.y,
                    },
                    Coord {
                        x: p3.x - (p3.x - p2.x) * 0.5,
                        y: p2.y,
                    },
                ),
            };
            out.push(CurveSegment::Cubic(c1, c2, p3));
            i += 3;
        }
        while i + 1 < points.len() {
            i += 1;
            out.push(CurveSegment::Line(points[i]));
        }
        out
    }

    pub fn path_data(&self, points: &[Coord<f64>]) -> Data {
        let Some(first) = self.start(points) else {
            return Data::new();
        };
        self.segments(points).into_iter().fold(
            Data::new().move_to((first.x, first.y)),
            |data, seg| match seg {
                CurveSegment::Line(p) => data.line_to((p.x, p.y)),
                CurveSegment::Cubic(c1, c2, p) => {
                    data.cubic_curve_to((c1.x, c1.y, c2.x, c2.y, p.x, p.y))
                }
            },
        )
    }

    pub fn bez_path(&self, points: &[Coord<f64>]) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.start(points) else {
            return path;
        };
        path.move_to(BezPoint::new(first.x, first.y));
        for seg in self.segments(points) {
            match seg {
                CurveSegment::Line(p) => path.line_to(BezPoint::new(p.x, p.y)),
                CurveSegment::Cubic(c1, c2, p) => path.curve_to(
                    BezPoint::new(c1.x, c1.y),
                    BezPoint::new(c2.x, c2.y),
                    BezPoint::new(p.x, p.y),
                ),
            }
        }
        path
    }
}
