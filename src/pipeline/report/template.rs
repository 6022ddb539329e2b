use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tokio::sync::OnceCell;

use super::ReportError;

const TEMPLATE_TITLE: &str = "MedPredict Diagnostic Report";
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// The shared report template, read from disk on first use and then held
/// read-only for every export.
#[derive(Debug)]
pub struct TemplateStore {
    path: Option<PathBuf>,
    bytes: OnceCell<Arc<[u8]>>,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            bytes: OnceCell::new(),
        }
    }

    /// A store that is already loaded.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            path: None,
            bytes: OnceCell::new_with(Some(bytes.into())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Template bytes. A failed read is not cached; the next call retries.
    pub async fn load(&self) -> Result<Arc<[u8]>, ReportError> {
        let bytes = self
            .bytes
            .get_or_try_init(|| async {
                let path = self
                    .path
                    .as_deref()
                    .ok_or_else(|| ReportError::TemplateUnavailable("no template path".into()))?;
                let data = tokio::fs::read(path).await.map_err(|e| {
                    tracing::error!(path = %path.display(), error = %e, "Report template unreadable");
                    ReportError::TemplateUnavailable(format!("{}: {e}", path.display()))
                })?;
                tracing::info!(path = %path.display(), bytes = data.len(), "Report template loaded");
                Ok::<_, ReportError>(Arc::from(data))
            })
            .await?;
        Ok(Arc::clone(bytes))
    }

    pub fn is_loaded(&self) -> bool {
        self.bytes.initialized()
    }
}

/// A4 template with the title block and disclaimer kept inside the top
/// 250pt, leaving the rest of the page for report lines.
pub fn render_default_template() -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) =
        PdfDocument::new(TEMPLATE_TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Encode(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Encode(format!("PDF font error: {e}")))?;

    let top = PAGE_HEIGHT_MM;
    layer.use_text("MedPredict", 24.0, Mm(17.6), Mm(top - 25.0), &bold);
    layer.use_text(TEMPLATE_TITLE, 14.0, Mm(17.6), Mm(top - 35.0), &font);
    layer.use_text(
        "This report was produced by an automated prediction service.",
        9.0,
        Mm(17.6),
        Mm(top - 50.0),
        &font,
    );
    layer.use_text(
        "It is not a diagnosis. Discuss the result with a qualified clinician.",
        9.0,
        Mm(17.6),
        Mm(top - 55.0),
        &font,
    );
    layer.use_text("Patient details", 12.0, Mm(17.6), Mm(top - 75.0), &bold);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Encode(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Encode(format!("PDF buffer error: {e}")))
}

/// Write the default template to `path`, creating parent directories.
pub fn write_default_template(path: &Path) -> Result<(), ReportError> {
    let bytes = render_default_template()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ReportError::Encode(format!("{}: {e}", parent.display())))?;
    }
    std::fs::write(path, bytes).map_err(|e| ReportError::Encode(format!("{}: {e}", path.display())))
}
