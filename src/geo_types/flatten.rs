use crate::errors::GeometryError;
use geo_types::{Geometry, LineString, MultiLineString, MultiPolygon, Polygon};

pub trait FlattenPolygons {
    fn flatten_polys(&self) -> Result<MultiPolygon<f64>, GeometryError>;
}

impl FlattenPolygons for Geometry<f64> {
    fn flatten_polys(&self) -> Result<MultiPolygon<f64>, GeometryError> {
        match self {
            Geometry::Polygon(poly) => Ok(MultiPolygon::<f64>::new(vec![poly.clone()])),
            Geometry::MultiPolygon(polys) => Ok(polys.clone()),
            Geometry::Rect(rect) => Ok(MultiPolygon::new(vec![rect.to_polygon()])),
            Geometry::Triangle(tri) => Ok(MultiPolygon::new(vec![tri.to_polygon()])),
            Geometry::GeometryCollection(gc) => {
                let polys: Vec<Polygon<f64>> = gc
                    .iter()
                    .map(|g| g.flatten_polys().map(|mp| mp.0).unwrap_or_default())
                    .flatten()
                    .collect();
                Ok(MultiPolygon::new(polys))
            }
            _ => Err(GeometryError::EmptyGeometry),
        }
    }
}

/// Line flavoured sibling of [`FlattenPolygons`]. Polygons contribute their rings,
/// so you can stroke anything.
pub trait FlattenLines {
    fn flatten_lines(&self) -> MultiLineString<f64>;
}

impl FlattenLines for Geometry<f64> {
    fn flatten_lines(&self) -> MultiLineString<f64> {
        let mut out: Vec<LineString<f64>> = vec![];
        match self {
            Geometry::Line(line) => out.push(LineString::new(vec![line.start, line.end])),
            Geometry::LineString(ls) => out.push(ls.clone()),
            Geometry::MultiLineString(mls) => out.extend(mls.0.iter().cloned()),
            Geometry::Polygon(poly) => {
                out.push(poly.exterior().clone());
                out.extend(poly.interiors().iter().cloned());
            }
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    out.push(poly.exterior().clone());
                    out.extend(poly.interiors().iter().cloned());
                }
            }
            Geometry::Rect(rect) => out.push(rect.to_polygon().exterior().clone()),
            Geometry::Triangle(tri) => out.push(tri.to_polygon().exterior().clone()),
            Geometry::GeometryCollection(gc) => {
                for g in gc {
                    out.extend(g.flatten_lines().0);
                }
            }
            Geometry::Point(_) | Geometry::MultiPoint(_) => (),
        }
        MultiLineString::new(out)
    }
}
