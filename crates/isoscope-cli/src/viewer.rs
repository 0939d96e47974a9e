//! Standalone HTML pages that display a structure with 3Dmol.js.

use isoscope::core::io::traits::StructureFormat;
use isoscope::render::palette::{b_factor_color_function, legend};
use isoscope::render::{Colouring, StructureRenderer, Viewport};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const VIEWER_SCRIPT_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/3Dmol/2.1.0/3Dmol-min.js";

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Failed to write viewer page: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot display an empty structure")]
    EmptyStructure,
    #[error("Unknown viewer handle {0}")]
    UnknownHandle(usize),
    #[error("Failed to encode structure: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewHandle(usize);

struct Page {
    format: StructureFormat,
    text: String,
    colouring: Colouring,
    viewport: Viewport,
}

/// Writes each loaded structure as an HTML page at `output`.
///
/// A later `load` overwrites the file; `resize` rewrites the page of the given handle.
pub struct HtmlViewer {
    output: PathBuf,
    title: String,
    pages: Vec<Page>,
}

impl HtmlViewer {
    pub fn new(output: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            title: title.into(),
            pages: Vec::new(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    fn write_page(&self, page: &Page) -> Result<(), ViewerError> {
        let html = render_page(&self.title, page)?;
        std::fs::write(&self.output, html)?;
        info!("Wrote 3D viewer to {:?}", self.output);
        Ok(())
    }
}

impl StructureRenderer for HtmlViewer {
    type Handle = ViewHandle;
    type Error = ViewerError;

    fn load(
        &mut self,
        format: StructureFormat,
        text: &str,
        colouring: &Colouring,
    ) -> Result<ViewHandle, ViewerError> {
        if text.trim().is_empty() {
            return Err(ViewerError::EmptyStructure);
        }
        let page = Page {
            format,
            text: text.to_string(),
            colouring: colouring.clone(),
            viewport: Viewport::default(),
        };
        self.write_page(&page)?;
        self.pages.push(page);
        Ok(ViewHandle(self.pages.len() - 1))
    }

    fn resize(&mut self, handle: &ViewHandle, viewport: Viewport) -> Result<(), ViewerError> {
        let page = self
            .pages
            .get_mut(handle.0)
            .ok_or(ViewerError::UnknownHandle(handle.0))?;
        page.viewport = viewport;
        let html = render_page(&self.title, page)?;
        std::fs::write(&self.output, html)?;
        Ok(())
    }
}

/// JSON-encodes `text` for embedding in an inline script.
fn script_literal(text: &str) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(text)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_page(title: &str, page: &Page) -> Result<String, ViewerError> {
    let style = match &page.colouring {
        Colouring::Spectrum => "{cartoon: {color: 'spectrum'}}".to_string(),
        Colouring::Confidence(_) => format!("{{cartoon: {{colorfunc: {}}}}}", b_factor_color_function()),
    };

    let mut legend_html = String::new();
    if let Colouring::Confidence(summary) = &page.colouring {
        legend_html.push_str("<table class=\"legend\">\n");
        for row in legend(summary) {
            let _ = writeln!(
                legend_html,
                "<tr><td><span class=\"swatch\" style=\"background:{}\"></span></td><td>{}</td><td>{}</td><td>{:.1}%</td></tr>",
                row.color, row.label, row.range, row.percent
            );
        }
        legend_html.push_str("</table>\n");
        match summary.mean {
            Some(mean) => {
                let _ = writeln!(legend_html, "<p>Mean pLDDT: {:.1}</p>", mean);
            }
            None => legend_html.push_str("<p>Mean pLDDT: n/a</p>\n"),
        }
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{script_url}"></script>
<style>
body {{ font-family: sans-serif; margin: 1.5rem; }}
#viewer {{ width: {width}px; height: {height}px; position: relative; border: 1px solid #ddd; }}
.legend td {{ padding: 2px 8px; }}
.swatch {{ display: inline-block; width: 14px; height: 14px; }}
</style>
</head>
<body>
<h1>{title}</h1>
<div id="viewer"></div>
{legend}<script>
const structure = {data};
const viewer = $3Dmol.createViewer(document.getElementById("viewer"), {{backgroundColor: 0xffffff}});
viewer.addModel(structure, "{format}");
viewer.setStyle({{}}, {style});
viewer.zoomTo();
viewer.render();
</script>
</body>
</html>
"#,
        title = escape_html(title),
        script_url = VIEWER_SCRIPT_URL,
        width = page.viewport.width,
        height = page.viewport.height,
        legend = legend_html,
        data = script_literal(&page.text)?,
        format = page.format.tag(),
        style = style,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoscope::core::io::pdb::compute_confidence_summary;

    const PDB: &str = "ATOM      1  CA  ALA A   1      11.104   6.134  -6.504  1.00 95.00           C\nEND\n";

    #[test]
    fn load_writes_confidence_page_with_legend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.html");
        let mut viewer = HtmlViewer::new(&path, "P04637 <TP53>");
        let summary = compute_confidence_summary(PDB);

        viewer
            .load(StructureFormat::Pdb, PDB, &Colouring::Confidence(summary))
            .unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("P04637 &lt;TP53&gt;"));
        assert!(html.contains("viewer.addModel(structure, \"pdb\")"));
        assert!(html.contains("colorfunc"));
        assert!(html.contains("#0053D6"));
        assert!(html.contains("100.0%"));
        assert!(html.contains("Mean pLDDT: 95.0"));
        assert!(html.contains("width: 960px; height: 600px"));
    }

    #[test]
    fn spectrum_page_has_no_legend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.html");
        let mut viewer = HtmlViewer::new(&path, "model");

        viewer.load(StructureFormat::Cif, "data_model\n", &Colouring::Spectrum).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("color: 'spectrum'"));
        assert!(html.contains("\"cif\""));
        assert!(!html.contains("class=\"legend\""));
    }

    #[test]
    fn resize_rewrites_viewport() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.html");
        let mut viewer = HtmlViewer::new(&path, "model");
        let handle = viewer.load(StructureFormat::Pdb, PDB, &Colouring::Spectrum).unwrap();

        viewer
            .resize(&handle, Viewport { width: 400, height: 300 })
            .unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("width: 400px; height: 300px"));
        assert!(matches!(
            viewer.resize(&ViewHandle(7), Viewport::default()),
            Err(ViewerError::UnknownHandle(7))
        ));
    }

    #[test]
    fn empty_structure_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut viewer = HtmlViewer::new(dir.path().join("view.html"), "model");
        assert!(matches!(
            viewer.load(StructureFormat::Pdb, " \n", &Colouring::Spectrum),
            Err(ViewerError::EmptyStructure)
        ));
    }

    #[test]
    fn embedded_text_cannot_close_the_script() {
        let literal = script_literal("REMARK </script>\n").unwrap();
        assert!(!literal.contains("</script>"));
        assert!(literal.starts_with('"'));
    }
}
