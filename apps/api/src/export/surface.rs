use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use super::ExportError;
use crate::templates::RenderedDocument;

/// Element id the editor preview is mounted under.
pub const PREVIEW_ELEMENT_ID: &str = "resume-preview";

/// Rendered documents addressable by element id.
///
/// Exports look their source up here, so an export can only target what has
/// actually been rendered.
#[derive(Debug, Default)]
pub struct RenderSurface {
    mounted: RwLock<HashMap<String, RenderedDocument>>,
}

impl RenderSurface {
    /// Mounts `document` under `element_id`, replacing whatever was there.
    pub async fn mount(&self, element_id: &str, document: RenderedDocument) {
        debug!("Mounting {} document as '{element_id}'", document.template);
        self.mounted.write().await.insert(element_id.to_string(), document);
    }

    pub async fn unmount(&self, element_id: &str) -> Option<RenderedDocument> {
        self.mounted.write().await.remove(element_id)
    }

    pub async fn resolve(&self, element_id: &str) -> Result<RenderedDocument, ExportError> {
        self.mounted
            .read()
            .await
            .get(element_id)
            .cloned()
            .ok_or_else(|| ExportError::ElementNotFound(element_id.to_string()))
    }
}
