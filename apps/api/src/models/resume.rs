use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::profile::Profile;
use crate::templates::TemplateId;

/// A named, templated snapshot of a profile.
///
/// `profile` is a copy taken when the résumé was created; later profile edits
/// do not reach it unless the résumé itself is updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: String,
    pub user_id: String,
    pub template_id: TemplateId,
    pub title: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

/// Fields the editor may change on an existing résumé.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeUpdate {
    pub template_id: Option<TemplateId>,
    pub title: Option<String>,
    pub profile: Option<Profile>,
    pub is_public: Option<bool>,
}

impl Resume {
    pub fn new(user_id: &str, template_id: TemplateId, title: &str, profile: Profile) -> Self {
        let now = Utc::now();
        Resume {
            id: super::new_id(),
            user_id: user_id.to_string(),
            template_id,
            title: title.to_string(),
            profile,
            created_at: now,
            updated_at: now,
            is_public: false,
            public_url: None,
        }
    }

    /// Merges `update` in place and refreshes `updated_at`.
    ///
    /// Publishing derives `public_url` from `public_base_url` and the résumé id;
    /// unpublishing clears it.
    pub fn apply(&mut self, update: ResumeUpdate, public_base_url: &str, now: DateTime<Utc>) {
        if let Some(template_id) = update.template_id {
            self.template_id = template_id;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(profile) = update.profile {
            self.profile = profile;
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
            self.public_url = is_public.then(|| public_url(public_base_url, &self.id));
        }
        self.updated_at = now;
    }
}

/// Shareable link for a published résumé.
pub fn public_url(base: &str, resume_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), resume_id)
}
