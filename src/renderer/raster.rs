//! PNG export of rendered slides through resvg.

use log::warn;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::error::{Error, Result};
use super::measure::LoadedFont;

/// Turns slide SVG into PNG bytes with a fixed font setup.
pub struct Rasterizer<'a> {
    font: Option<&'a LoadedFont>,
}

impl<'a> Rasterizer<'a> {
    /// Rasterize with `font`, or with whatever system fonts exist if `None`.
    pub fn new(font: Option<&'a LoadedFont>) -> Self {
        if font.is_none() {
            warn!("no font configured; drawing with system fonts");
        }
        Self { font }
    }

    pub fn render_png(&self, svg: &str) -> Result<Vec<u8>> {
        let mut options = usvg::Options::default();
        match self.font {
            Some(font) => {
                options.font_family = font.family.clone();
                options.fontdb_mut().load_font_data(font.data().to_vec());
            }
            None => options.fontdb_mut().load_system_fonts(),
        }

        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| Error::Render(format!("failed to parse slide SVG: {e}")))?;

        let size = tree.size().to_int_size();
        let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            Error::Render(format!("failed to allocate {}x{} pixmap", size.width(), size.height()))
        })?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| Error::Render(format!("failed to encode PNG: {e}")))
    }
}
