use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::export::{ExportStatus, Rasterizer, RenderSurface};
use crate::store::AppStore;
use crate::templates::TemplateRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The single owner of session state; every mutation goes through this lock.
    pub store: Arc<Mutex<AppStore>>,
    pub renderer: Arc<TemplateRenderer>,
    /// Rendered documents that exports can target by element id.
    pub surface: Arc<RenderSurface>,
    /// Pluggable rasterizer. Default: WkhtmlRasterizer (binary from RASTERIZER_BIN).
    pub rasterizer: Arc<dyn Rasterizer>,
    pub exports: ExportStatus,
}
