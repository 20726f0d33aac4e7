//! SVG builder — accumulates SVG elements and produces the final string.

pub(super) struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
    font_family: Option<String>,
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64, font_family: Option<&str>) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
            font_family: font_family.map(String::from),
        }
    }

    pub(super) fn build(self) -> String {
        // Lyrics rely on runs of spaces, so whitespace must not collapse.
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xml:space="preserve" viewBox="0 0 {} {}" width="{}" height="{}""#,
            self.width, self.height, self.width, self.height
        );
        if let Some(family) = &self.font_family {
            svg.push_str(&format!(r#" font-family="{}""#, escape(family)));
        }
        svg.push_str(">\n");
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub(super) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="{:.3}"/>"#,
            x, y, w, h, fill, opacity
        ));
    }

    /// Left-anchored text with its baseline at `y`.
    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, size: f64, fill: &str, opacity: f64) {
        if content.is_empty() {
            return;
        }
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" fill="{}" fill-opacity="{:.3}">{}</text>"#,
            x, y, size, fill, opacity, escape(content)
        ));
    }
}

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
