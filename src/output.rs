//! Writing rendered slides to disk.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::renderer::raster::Rasterizer;
use crate::renderer::Slide;

/// File name for a slide title; path separators are replaced so a title
/// can never escape the song directory.
pub fn slide_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    format!("{stem}.png")
}

/// Rasterize each slide and write it as `<dir>/<title>.png`, creating
/// `dir` if needed. Stops at the first failure.
pub fn write_slides(slides: &[Slide], dir: &Path, rasterizer: &Rasterizer) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut written = Vec::with_capacity(slides.len());
    for slide in slides {
        let png = rasterizer.render_png(&slide.svg)?;
        let path = dir.join(slide_file_name(&slide.title));
        fs::write(&path, &png).map_err(|e| Error::io(&path, e))?;
        info!("wrote {} ({} bytes)", path.display(), png.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_become_file_names() {
        assert_eq!(slide_file_name("Verse 1"), "Verse 1.png");
        assert_eq!(slide_file_name("Intro/Outro"), "Intro_Outro.png");
    }
}
