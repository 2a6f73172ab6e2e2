pub mod editor;
pub mod health;
pub mod profile;
pub mod resumes;
pub mod session;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts and session
        .route("/api/v1/auth/register", post(session::handle_register))
        .route("/api/v1/auth/login", post(session::handle_login))
        .route("/api/v1/auth/logout", post(session::handle_logout))
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/navigation", put(session::handle_navigate))
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        // Résumés
        .route("/api/v1/templates", get(resumes::handle_list_templates))
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route("/api/v1/resumes/:id", patch(resumes::handle_update_resume))
        .route(
            "/api/v1/resumes/:id/select",
            post(resumes::handle_select_resume),
        )
        // Editor
        .route("/api/v1/editor/preview", get(editor::handle_preview))
        .route("/api/v1/editor/export/pdf", post(editor::handle_export_pdf))
        .route(
            "/api/v1/editor/export/docx",
            post(editor::handle_export_docx),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use image::{Rgba, RgbaImage};
    use serde_json::{json, Value};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::InMemoryAuthProvider;
    use crate::config::{Config, StorageBackend};
    use crate::export::{ExportFormat, ExportStatus, RasterOptions, Rasterizer, RenderSurface};
    use crate::storage::{KeyValueStore, MemoryStore, PersistenceGateway, PROFILE_KEY, RESUMES_KEY, USER_KEY};
    use crate::store::AppStore;
    use crate::templates::{RenderedDocument, TemplateId, TemplateRenderer};

    /// Two A4 pages worth of white pixels at 210 px wide.
    /// Records the template of every document it is handed.
    #[derive(Default)]
    struct StubRasterizer {
        seen: std::sync::Mutex<Vec<TemplateId>>,
    }

    #[async_trait]
    impl Rasterizer for StubRasterizer {
        async fn rasterize(&self, target: &RenderedDocument, _options: &RasterOptions) -> anyhow::Result<RgbaImage> {
            self.seen.lock().unwrap().push(target.template);
            Ok(RgbaImage::from_pixel(210, 594, Rgba([255, 255, 255, 255])))
        }
    }

    struct Harness {
        app: Router,
        state: AppState,
        kv: Arc<MemoryStore>,
        rasterizer: Arc<StubRasterizer>,
    }

    impl Harness {
        fn last_rasterized(&self) -> Option<TemplateId> {
            self.rasterizer.seen.lock().unwrap().last().copied()
        }
    }

    async fn make_harness() -> Harness {
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            storage: StorageBackend::Memory,
            public_base_url: "https://fastcv.com/r".to_string(),
            rasterizer_bin: "wkhtmltoimage".to_string(),
            auth_latency: Duration::ZERO,
        };
        let kv = Arc::new(MemoryStore::default());
        let rasterizer = Arc::new(StubRasterizer::default());
        let auth = Arc::new(InMemoryAuthProvider::new(config.auth_latency));
        let store = AppStore::load(PersistenceGateway::new(kv.clone()), auth, config.public_base_url.clone())
            .await
            .unwrap();

        let state = AppState {
            config,
            store: Arc::new(Mutex::new(store)),
            renderer: Arc::new(TemplateRenderer::new().unwrap()),
            surface: Arc::new(RenderSurface::default()),
            rasterizer: rasterizer.clone(),
            exports: ExportStatus::default(),
        };
        Harness {
            app: build_router(state.clone()),
            state,
            kv,
            rasterizer,
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn onboard(app: &Router) -> String {
        let response = send(
            app,
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({ "email": "anna@example.com", "password": "secret", "name": "Анна" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            app,
            Method::PUT,
            "/api/v1/profile",
            Some(json!({
                "fullName": "Анна Смирнова",
                "email": "anna@example.com",
                "position": "Backend-разработчик",
                "summary": "Пишу сервисы на Rust.",
                "skills": [{ "id": "s1", "name": "Rust", "level": "Эксперт", "category": "" }]
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({ "templateId": "executive" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let h = make_harness().await;
        let response = send(&h.app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["service"], "fastcv-api");
    }

    #[tokio::test]
    async fn test_register_lands_on_profile_page() {
        let h = make_harness().await;
        let response = send(
            &h.app,
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({ "email": "anna@example.com", "password": "secret", "name": "Анна" })),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["page"], "profile");
        assert_eq!(body["user"]["profileComplete"], false);
    }

    #[tokio::test]
    async fn test_bad_login_is_auth_failed() {
        let h = make_harness().await;
        let response = send(
            &h.app,
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": "x" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "AUTH_FAILED");
    }

    #[tokio::test]
    async fn test_resumes_require_signed_in_user() {
        let h = make_harness().await;
        let response = send(&h.app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_validation_lists_fields() {
        let h = make_harness().await;
        send(
            &h.app,
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({ "email": "anna@example.com", "password": "secret", "name": "Анна" })),
        )
        .await;

        let response = send(&h.app, Method::PUT, "/api/v1/profile", Some(json!({ "fullName": "Анна" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["fields"][0]["field"], "email");
        assert_eq!(body["error"]["fields"][1]["field"], "position");
    }

    #[tokio::test]
    async fn test_create_resume_without_profile_is_rejected() {
        let h = make_harness().await;
        send(
            &h.app,
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({ "email": "anna@example.com", "password": "secret", "name": "Анна" })),
        )
        .await;

        let response = send(&h.app, Method::POST, "/api/v1/resumes", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "PROFILE_REQUIRED");
        assert_eq!(h.state.store.lock().await.user().unwrap().resume_count, 0);
    }

    #[tokio::test]
    async fn test_create_defaults_title_and_publish_sets_url() {
        let h = make_harness().await;
        let id = onboard(&h.app).await;

        let list = body_json(send(&h.app, Method::GET, "/api/v1/resumes", None).await).await;
        assert_eq!(list["resumes"][0]["title"], "Резюме 1");
        assert_eq!(list["resumes"][0]["templateId"], "executive");
        assert_eq!(list["nextTitle"], "Резюме 2");

        let response = send(
            &h.app,
            Method::PATCH,
            &format!("/api/v1/resumes/{id}"),
            Some(json!({ "isPublic": true })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["publicUrl"], format!("https://fastcv.com/r/{id}"));
    }

    #[tokio::test]
    async fn test_select_unknown_resume_is_not_found() {
        let h = make_harness().await;
        onboard(&h.app).await;
        let response = send(&h.app, Method::POST, "/api/v1/resumes/missing/select", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(h.state.store.lock().await.current_resume().is_none());
    }

    #[tokio::test]
    async fn test_preview_renders_selected_template() {
        let h = make_harness().await;
        onboard(&h.app).await;

        let response = send(&h.app, Method::GET, "/api/v1/editor/preview", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("Анна Смирнова"));
        assert!(html.contains("tpl-executive"));
        assert!(h.state.surface.resolve("resume-preview").await.is_ok());
    }

    #[tokio::test]
    async fn test_pdf_export_before_preview_is_element_not_found() {
        let h = make_harness().await;
        onboard(&h.app).await;
        let response = send(&h.app, Method::POST, "/api/v1/editor/export/pdf", None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "ELEMENT_NOT_FOUND");
        assert!(!h.state.exports.is_exporting(ExportFormat::Pdf));
    }

    #[tokio::test]
    async fn test_pdf_export_downloads_paginated_file() {
        let h = make_harness().await;
        onboard(&h.app).await;
        send(&h.app, Method::GET, "/api/v1/editor/preview", None).await;

        let response = send(&h.app, Method::POST, "/api/v1/editor/export/pdf", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION].as_bytes().to_vec();
        let disposition = String::from_utf8(disposition).unwrap();
        assert!(disposition.starts_with("attachment; filename=\"______ 1.pdf\""));
        assert!(disposition.ends_with("filename*=UTF-8''%D0%A0%D0%B5%D0%B7%D1%8E%D0%BC%D0%B5%201.pdf"));

        let bytes = body_bytes(response).await;
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[tokio::test]
    async fn test_pdf_export_follows_newly_created_resume() {
        let h = make_harness().await;
        onboard(&h.app).await;
        send(&h.app, Method::GET, "/api/v1/editor/preview", None).await;

        let response = send(
            &h.app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({ "templateId": "classic", "title": "Second" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(&h.app, Method::POST, "/api/v1/editor/export/pdf", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.contains("filename=\"Second.pdf\""));
        assert_eq!(h.last_rasterized(), Some(TemplateId::Classic));
        assert_eq!(
            h.state.surface.resolve("resume-preview").await.unwrap().template,
            TemplateId::Classic
        );
    }

    #[tokio::test]
    async fn test_pdf_export_follows_template_change_and_selection() {
        let h = make_harness().await;
        let first = onboard(&h.app).await;
        send(&h.app, Method::GET, "/api/v1/editor/preview", None).await;

        let response = send(
            &h.app,
            Method::PATCH,
            &format!("/api/v1/resumes/{first}"),
            Some(json!({ "templateId": "creative" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        send(&h.app, Method::POST, "/api/v1/editor/export/pdf", None).await;
        assert_eq!(h.last_rasterized(), Some(TemplateId::Creative));

        send(
            &h.app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({ "templateId": "modern" })),
        )
        .await;
        let response = send(&h.app, Method::POST, &format!("/api/v1/resumes/{first}/select"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(&h.app, Method::POST, "/api/v1/editor/export/pdf", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.last_rasterized(), Some(TemplateId::Creative));
    }

    #[tokio::test]
    async fn test_docx_export_downloads_package() {
        let h = make_harness().await;
        onboard(&h.app).await;

        let response = send(&h.app, Method::POST, "/api/v1/editor/export/docx", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            ExportFormat::Docx.content_type()
        );
        assert!(body_bytes(response).await.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_concurrent_export_of_same_format_is_rejected() {
        let h = make_harness().await;
        onboard(&h.app).await;

        let _running = h.state.exports.try_begin(ExportFormat::Docx).unwrap();
        let response = send(&h.app, Method::POST, "/api/v1/editor/export/docx", None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "EXPORT_IN_PROGRESS");
    }

    #[tokio::test]
    async fn test_logout_clears_storage_and_preview() {
        let h = make_harness().await;
        onboard(&h.app).await;
        send(&h.app, Method::GET, "/api/v1/editor/preview", None).await;

        let response = send(&h.app, Method::POST, "/api/v1/auth/logout", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["page"], "home");

        for key in [USER_KEY, PROFILE_KEY, RESUMES_KEY] {
            assert!(h.kv.get(key).await.unwrap().is_none(), "{key} survived logout");
        }
        assert!(h.state.surface.resolve("resume-preview").await.is_err());
    }

    #[tokio::test]
    async fn test_navigation_to_public_resume_records_id() {
        let h = make_harness().await;
        let response = send(
            &h.app,
            Method::PUT,
            "/api/v1/navigation",
            Some(json!({ "page": "public-resume", "publicResumeId": "abc" })),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["page"], "public-resume");
        assert_eq!(body["publicResumeId"], "abc");
    }
}
