use std::fmt;

use serde::{Deserialize, Serialize};

/// The canonical résumé content of one person.
///
/// Field names serialize in camelCase so stored blobs keep the storage format
/// the web client has always written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub birth_year: i32,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    pub position: String,
    pub summary: String,

    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,

    pub achievements: Vec<String>,
    pub certificates: Vec<Certificate>,
    pub projects: Vec<Project>,
    pub languages: Vec<Language>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl Profile {
    /// True once both a full name and an email are filled in.
    pub fn has_identity(&self) -> bool {
        !self.full_name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_year: i32,
    pub end_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    /// Ignored when `current` is set.
    pub end_date: String,
    pub current: bool,
    /// Bullet lines, in display order.
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
    pub category: String,
}

/// Proficiency tiers, ascending.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SkillLevel {
    #[serde(rename = "Начинающий")]
    Beginner,
    #[default]
    #[serde(rename = "Средний")]
    Intermediate,
    #[serde(rename = "Продвинутый")]
    Advanced,
    #[serde(rename = "Эксперт")]
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Начинающий",
            SkillLevel::Intermediate => "Средний",
            SkillLevel::Advanced => "Продвинутый",
            SkillLevel::Expert => "Эксперт",
        }
    }

    /// 1-based position of the tier.
    pub fn tier(&self) -> u8 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Expert => 4,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certificate {
    pub id: String,
    pub name: String,
    pub organization: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub id: String,
    pub name: String,
    pub level: LanguageLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageLevel {
    A1,
    A2,
    #[default]
    B1,
    B2,
    C1,
    C2,
    #[serde(rename = "Родной")]
    Native,
}

/// A partial profile submitted by the profile form. Present fields replace the
/// stored ones; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub position: Option<String>,
    pub summary: Option<String>,
    pub education: Option<Vec<Education>>,
    pub experience: Option<Vec<Experience>>,
    pub skills: Option<Vec<Skill>>,
    pub achievements: Option<Vec<String>>,
    pub certificates: Option<Vec<Certificate>>,
    pub projects: Option<Vec<Project>>,
    pub languages: Option<Vec<Language>>,
    pub additional_info: Option<String>,
}

impl ProfileUpdate {
    /// Merges this update over `base` (or over an empty profile).
    ///
    /// Optional text fields submitted blank are cleared rather than stored empty.
    pub fn apply(self, base: Option<Profile>) -> Profile {
        let mut profile = base.unwrap_or_default();

        if let Some(v) = self.full_name {
            profile.full_name = v;
        }
        if let Some(v) = self.email {
            profile.email = v;
        }
        if let Some(v) = self.phone {
            profile.phone = v;
        }
        if let Some(v) = self.birth_year {
            profile.birth_year = v;
        }
        if let Some(v) = self.location {
            profile.location = v;
        }
        if let Some(v) = self.position {
            profile.position = v;
        }
        if let Some(v) = self.summary {
            profile.summary = v;
        }
        if let Some(v) = self.education {
            profile.education = v;
        }
        if let Some(v) = self.experience {
            profile.experience = v;
        }
        if let Some(v) = self.skills {
            profile.skills = v;
        }
        if let Some(v) = self.achievements {
            profile.achievements = v;
        }
        if let Some(v) = self.certificates {
            profile.certificates = v;
        }
        if let Some(v) = self.projects {
            profile.projects = v;
        }
        if let Some(v) = self.languages {
            profile.languages = v;
        }

        merge_optional(&mut profile.photo, self.photo);
        merge_optional(&mut profile.linkedin, self.linkedin);
        merge_optional(&mut profile.github, self.github);
        merge_optional(&mut profile.website, self.website);
        merge_optional(&mut profile.additional_info, self.additional_info);

        profile
    }
}

fn merge_optional(slot: &mut Option<String>, update: Option<String>) {
    if let Some(v) = update {
        *slot = if v.trim().is_empty() { None } else { Some(v) };
    }
}
