//! Export pipeline: a rendered résumé becomes a downloadable file.
//!
//! Two independent paths:
//!   - raster: mounted document → `Rasterizer` → A4 image PDF (`raster`)
//!   - structured: `Profile` → Word document tree → .docx package (`structured`)

pub mod raster;
pub mod structured;
pub mod surface;
pub mod wkhtml;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use thiserror::Error;

pub use self::raster::{export_raster, RasterOptions, Rasterizer};
pub use self::structured::export_structured;
pub use self::surface::{RenderSurface, PREVIEW_ELEMENT_ID};
pub use self::wkhtml::WkhtmlRasterizer;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Element '{0}' is not mounted")]
    ElementNotFound(String),

    #[error("Export failed: {0:#}")]
    ExportFailed(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Download name for a résumé: its title plus the format extension.
///
/// Path separators and quotes are replaced so the name survives a
/// `Content-Disposition` header; a blank title falls back to `resume`.
pub fn export_filename(title: &str, format: ExportFormat) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' | '\r' | '\n' => '_',
            c => c,
        })
        .collect();
    let stem = if cleaned.is_empty() { "resume" } else { cleaned.as_str() };
    format!("{stem}.{}", format.extension())
}

/// Bytes left unescaped in an RFC 5987 `filename*` value (its `attr-char` set).
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// A finished export, ready to send as a download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Bytes,
}

impl ExportedFile {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// `Content-Disposition` value for the download.
    ///
    /// Carries an ASCII-only `filename` for legacy clients and the exact
    /// UTF-8 name as `filename*`.
    pub fn content_disposition(&self) -> String {
        let fallback: String = self
            .filename
            .chars()
            .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            utf8_percent_encode(&self.filename, ATTR_CHAR)
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-flight tracking
// ────────────────────────────────────────────────────────────────────────────

/// Which formats are currently being exported. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct ExportStatus {
    pdf: Arc<AtomicBool>,
    docx: Arc<AtomicBool>,
}

impl ExportStatus {
    fn flag(&self, format: ExportFormat) -> &Arc<AtomicBool> {
        match format {
            ExportFormat::Pdf => &self.pdf,
            ExportFormat::Docx => &self.docx,
        }
    }

    /// Marks `format` as in flight. `None` if an export of that format is already running.
    pub fn try_begin(&self, format: ExportFormat) -> Option<ExportGuard> {
        let flag = self.flag(format);
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard {
                flag: flag.clone(),
                format,
            })
    }

    pub fn is_exporting(&self, format: ExportFormat) -> bool {
        self.flag(format).load(Ordering::Acquire)
    }
}

/// Clears the in-flight mark when dropped, however the export ends.
#[derive(Debug)]
pub struct ExportGuard {
    flag: Arc<AtomicBool>,
    format: ExportFormat,
}

impl ExportGuard {
    pub fn format(&self) -> ExportFormat {
        self.format
    }
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
