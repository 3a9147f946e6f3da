//! PNG previews. The context is written out as SVG and handed to resvg, so the
//! preview shows exactly what the SVG shows: fills, dashes and text included.
use crate::context::Context;
use crate::errors::ContextError;
use image::{Rgba, RgbaImage};
use log::{debug, info};
use resvg::{tiny_skia, usvg};
use std::path::Path;

/// Paints Contexts into pixels.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    /// Pixels per canvas unit.
    pub scale: f32,
    /// Load the system fonts for text. Without them text is dropped.
    pub system_fonts: bool,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Rasterizer {
            scale: 1.0,
            system_fonts: true,
        }
    }
}

/// Parses a CSS colour. None means "don't paint".
pub fn parse_color(color: &str) -> Result<Option<[u8; 4]>, ContextError> {
    let trimmed = color.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let parsed = csscolorparser::parse(trimmed)
        .map_err(|e| ContextError::RasterError(format!("Bad colour {:?}: {}", color, e)))?;
    Ok(Some(parsed.to_rgba8()))
}

impl Rasterizer {
    fn options(&self) -> usvg::Options<'static> {
        let mut opt = usvg::Options::default();
        if self.system_fonts {
            opt.fontdb_mut().load_system_fonts();
            debug!("Loaded {} font faces", opt.fontdb.len());
        }
        opt
    }

    /// Render the whole context at `scale` pixels per unit.
    pub fn render(&self, ctx: &Context) -> Result<RgbaImage, ContextError> {
        let (w, h) = (
            (ctx.width() * self.scale as f64).ceil(),
            (ctx.height() * self.scale as f64).ceil(),
        );
        if !(w >= 1.0 && h >= 1.0 && w <= u32::MAX as f64 && h <= u32::MAX as f64) {
            return Err(ContextError::RasterError(format!(
                "Invalid canvas size {}x{} at scale {}",
                ctx.width(),
                ctx.height(),
                self.scale
            )));
        }
        let svg = ctx.to_svg()?.to_string();
        let tree = usvg::Tree::from_str(&svg, &self.options())
            .map_err(|e| ContextError::RasterError(e.to_string()))?;
        let mut pixmap = tiny_skia::Pixmap::new(w as u32, h as u32).ok_or_else(|| {
            ContextError::RasterError(format!("Could not allocate a {}x{} pixmap", w, h))
        })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.scale, self.scale),
            &mut pixmap.as_mut(),
        );

        let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
        for (px, out) in pixmap.pixels().iter().zip(img.pixels_mut()) {
            let c = px.demultiply();
            *out = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(img)
    }

    pub fn save_png(&self, ctx: &Context, path: &Path) -> Result<(), ContextError> {
        let img = self.render(ctx)?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| ContextError::RasterError(e.to_string()))?;
        info!("Wrote {}x{} preview to {}", img.width(), img.height(), path.display());
        Ok(())
    }
}
