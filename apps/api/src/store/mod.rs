//! Application state store: the single owner of session state.
//!
//! Which fields are populated determines the state:
//! no user is anonymous, a user without `profile_complete` is mid-onboarding,
//! and a user with it can create résumés.
//! Every mutation that changes a persisted record writes it through the
//! gateway before it is committed in memory.

pub mod validation;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::{AuthError, AuthProvider};
use crate::models::{Page, Profile, ProfileUpdate, Resume, ResumeUpdate, User};
use crate::storage::{PersistenceGateway, StorageError};
use crate::templates::TemplateId;

pub use self::validation::{validate_profile, FieldError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("No user is signed in")]
    Unauthorized,

    #[error("A profile is required before creating a résumé")]
    ProfileRequired,

    #[error("Résumé '{0}' not found")]
    NotFound(String),

    #[error("Profile form has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Serializable view of the session, as the client sees it on load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub page: Page,
    pub user: Option<User>,
    pub profile: Option<Profile>,
    pub current_resume: Option<ResumeSummary>,
    pub public_resume_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: String,
    pub title: String,
    pub template_id: TemplateId,
    pub is_public: bool,
}

impl From<&Resume> for ResumeSummary {
    fn from(resume: &Resume) -> Self {
        ResumeSummary {
            id: resume.id.clone(),
            title: resume.title.clone(),
            template_id: resume.template_id,
            is_public: resume.is_public,
        }
    }
}

pub struct AppStore {
    page: Page,
    user: Option<User>,
    profile: Option<Profile>,
    resumes: Vec<Resume>,
    current_resume: Option<Resume>,
    public_resume_id: Option<String>,
    gateway: PersistenceGateway,
    auth: Arc<dyn AuthProvider>,
    public_base_url: String,
}

impl AppStore {
    /// Restores the persisted session. A stored user lands on the dashboard.
    pub async fn load(
        gateway: PersistenceGateway,
        auth: Arc<dyn AuthProvider>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let user = gateway.load_user().await?;
        let profile = gateway.load_profile().await?;
        let resumes = gateway.load_resumes().await?;

        let page = if user.is_some() { Page::Dashboard } else { Page::Home };
        info!(
            "Session loaded: user={}, resumes={}",
            user.as_ref().map(|u| u.id.as_str()).unwrap_or("-"),
            resumes.len()
        );

        Ok(AppStore {
            page,
            user,
            profile,
            resumes,
            current_resume: None,
            public_resume_id: None,
            gateway,
            auth,
            public_base_url: public_base_url.into(),
        })
    }

    // ── Read access ────────────────────────────────────────────────────────

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn resumes(&self) -> &[Resume] {
        &self.resumes
    }

    pub fn current_resume(&self) -> Option<&Resume> {
        self.current_resume.as_ref()
    }

    pub fn public_resume_id(&self) -> Option<&str> {
        self.public_resume_id.as_deref()
    }

    pub fn require_user(&self) -> Result<&User, StoreError> {
        self.user.as_ref().ok_or(StoreError::Unauthorized)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            page: self.page,
            user: self.user.clone(),
            profile: self.profile.clone(),
            current_resume: self.current_resume.as_ref().map(ResumeSummary::from),
            public_resume_id: self.public_resume_id.clone(),
        }
    }

    /// Default title the dashboard offers for the next résumé.
    pub fn next_resume_title(&self) -> String {
        format!("Резюме {}", self.resumes.len() + 1)
    }

    // ── Navigation ─────────────────────────────────────────────────────────

    pub fn set_page(&mut self, page: Page) {
        debug!("Navigate {:?} -> {:?}", self.page, page);
        self.page = page;
    }

    pub fn set_public_resume_id(&mut self, id: Option<String>) {
        self.public_resume_id = id;
    }

    // ── Accounts ───────────────────────────────────────────────────────────

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, StoreError> {
        let user = self.auth.login(email, password).await.map_err(|e| {
            warn!("Login rejected: {e}");
            e
        })?;
        self.gateway.save_user(&user).await?;

        info!("User {} signed in", user.id);
        self.page = Page::Dashboard;
        Ok(&*self.user.insert(user))
    }

    pub async fn register(&mut self, email: &str, password: &str, name: &str) -> Result<&User, StoreError> {
        let user = self.auth.register(email, password, name).await.map_err(|e| {
            warn!("Registration rejected: {e}");
            e
        })?;
        self.gateway.save_user(&user).await?;

        self.page = Page::Profile;
        Ok(&*self.user.insert(user))
    }

    /// Drops all user-scoped state, in memory and in storage.
    pub async fn logout(&mut self) -> Result<(), StoreError> {
        self.gateway.clear_session().await?;

        if let Some(user) = self.user.take() {
            info!("User {} signed out", user.id);
        }
        self.profile = None;
        self.resumes.clear();
        self.current_resume = None;
        self.page = Page::Home;
        Ok(())
    }

    // ── Profile ────────────────────────────────────────────────────────────

    /// Merges a profile form submission and moves on to the dashboard.
    ///
    /// The first submission carrying both a full name and an email marks the
    /// user's profile as complete.
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Result<&Profile, StoreError> {
        let merged = update.apply(self.profile.clone());
        validate_profile(&merged).map_err(StoreError::Validation)?;

        self.gateway.save_profile(&merged).await?;

        if let Some(user) = self.user.as_ref() {
            if !user.profile_complete && merged.has_identity() {
                let updated = User {
                    profile_complete: true,
                    ..user.clone()
                };
                self.gateway.save_user(&updated).await?;
                info!("Profile complete for user {}", updated.id);
                self.user = Some(updated);
            }
        }

        self.page = Page::Dashboard;
        Ok(&*self.profile.insert(merged))
    }

    // ── Résumés ────────────────────────────────────────────────────────────

    /// Snapshots the current profile into a new selected résumé and returns its id.
    pub async fn create_resume(&mut self, template_id: TemplateId, title: &str) -> Result<String, StoreError> {
        let user = self.require_user()?;
        let profile = self.profile.as_ref().ok_or(StoreError::ProfileRequired)?;

        let resume = Resume::new(&user.id, template_id, title, profile.clone());
        let updated_user = User {
            resume_count: user.resume_count + 1,
            ..user.clone()
        };

        let mut resumes = self.resumes.clone();
        resumes.push(resume.clone());
        self.gateway.save_resumes(&resumes).await?;
        self.gateway.save_user(&updated_user).await?;

        info!("Created résumé {} ({}) with template {}", resume.id, resume.title, resume.template_id);
        let id = resume.id.clone();
        self.resumes = resumes;
        self.current_resume = Some(resume);
        self.user = Some(updated_user);
        Ok(id)
    }

    pub async fn update_resume(&mut self, id: &str, update: ResumeUpdate) -> Result<&Resume, StoreError> {
        let index = self
            .resumes
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut resumes = self.resumes.clone();
        resumes[index].apply(update, &self.public_base_url, Utc::now());
        self.gateway.save_resumes(&resumes).await?;

        self.resumes = resumes;
        let updated = &self.resumes[index];
        if self.current_resume.as_ref().is_some_and(|r| r.id == id) {
            self.current_resume = Some(updated.clone());
        }
        debug!("Updated résumé {id}");
        Ok(updated)
    }

    /// Selects the résumé with `id`, or clears the selection when none matches.
    pub fn select_resume(&mut self, id: &str) -> Option<&Resume> {
        self.current_resume = self.resumes.iter().find(|r| r.id == id).cloned();
        if self.current_resume.is_none() {
            debug!("No résumé {id} to select; selection cleared");
        }
        self.current_resume.as_ref()
    }
}
