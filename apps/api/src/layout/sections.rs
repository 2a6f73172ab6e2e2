//! Section model: the résumé content resolved once from a `Profile` and read by
//! every output path (HTML templates, the Word package).
//!
//! Sections that would render empty are already absent here, so no consumer can
//! emit a heading without content under it.

use serde::Serialize;

use crate::models::profile::{Profile, SkillLevel};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// The optional body sections a layout may order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Links,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Email,
    Phone,
    Location,
}

impl ContactKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ContactKind::Email => "📧",
            ContactKind::Phone => "📱",
            ContactKind::Location => "📍",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub kind: ContactKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub name: String,
    pub position: String,
    /// Email, phone, location in that order, blanks dropped.
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RangeEnd {
    Present,
    Until(String),
}

/// A start/end pair; the "present" wording is chosen by the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: RangeEnd,
}

impl DateRange {
    pub fn display(&self, present_label: &str) -> String {
        match &self.end {
            RangeEnd::Present => format!("{} – {}", self.start, present_label),
            RangeEnd::Until(end) => format!("{} – {}", self.start, end),
        }
    }

    pub fn is_current(&self) -> bool {
        self.end == RangeEnd::Present
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceItem {
    pub role: String,
    pub company: String,
    pub location: String,
    pub dates: DateRange,
    pub bullets: Vec<String>,
}

impl ExperienceItem {
    /// Company and location joined by `separator`, skipping whichever is blank.
    pub fn company_line(&self, separator: &str) -> String {
        [self.company.trim(), self.location.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationItem {
    pub degree: String,
    pub field: String,
    pub institution: String,
    pub years: DateRange,
    pub gpa: Option<String>,
}

impl EducationItem {
    pub fn degree_line(&self) -> String {
        if self.field.trim().is_empty() {
            self.degree.clone()
        } else {
            format!("{} - {}", self.degree, self.field)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillItem {
    pub name: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkKind {
    LinkedIn,
    GitHub,
    Website,
}

impl LinkKind {
    pub fn label(&self) -> &'static str {
        match self {
            LinkKind::LinkedIn => "LinkedIn",
            LinkKind::GitHub => "GitHub",
            LinkKind::Website => "Website",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkItem {
    pub kind: LinkKind,
    pub url: String,
}

/// Fully resolved résumé content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeSections {
    pub header: HeaderBlock,
    pub summary: Option<String>,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<SkillItem>,
    /// LinkedIn, GitHub, Website in that order, absent ones dropped.
    pub links: Vec<LinkItem>,
}

// ────────────────────────────────────────────────────────────────────────────
// Resolution
// ────────────────────────────────────────────────────────────────────────────

impl ResumeSections {
    pub fn from_profile(profile: &Profile) -> Self {
        let contacts = [
            (ContactKind::Email, &profile.email),
            (ContactKind::Phone, &profile.phone),
            (ContactKind::Location, &profile.location),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(kind, value)| Contact {
            kind,
            value: value.clone(),
        })
        .collect();

        let experience = profile
            .experience
            .iter()
            .map(|exp| ExperienceItem {
                role: exp.position.clone(),
                company: exp.company.clone(),
                location: exp.location.clone(),
                dates: DateRange {
                    start: exp.start_date.clone(),
                    end: if exp.current {
                        RangeEnd::Present
                    } else {
                        RangeEnd::Until(exp.end_date.clone())
                    },
                },
                bullets: exp.description.clone(),
            })
            .collect();

        let education = profile
            .education
            .iter()
            .map(|edu| EducationItem {
                degree: edu.degree.clone(),
                field: edu.field.clone(),
                institution: edu.institution.clone(),
                years: DateRange {
                    start: edu.start_year.to_string(),
                    end: RangeEnd::Until(edu.end_year.to_string()),
                },
                gpa: edu.gpa.clone().filter(|g| !g.trim().is_empty()),
            })
            .collect();

        let skills = profile
            .skills
            .iter()
            .map(|s| SkillItem {
                name: s.name.clone(),
                level: s.level,
            })
            .collect();

        let links = [
            (LinkKind::LinkedIn, &profile.linkedin),
            (LinkKind::GitHub, &profile.github),
            (LinkKind::Website, &profile.website),
        ]
        .into_iter()
        .filter_map(|(kind, url)| {
            url.as_ref()
                .filter(|u| !u.trim().is_empty())
                .map(|u| LinkItem {
                    kind,
                    url: u.clone(),
                })
        })
        .collect();

        ResumeSections {
            header: HeaderBlock {
                name: profile.full_name.clone(),
                position: profile.position.clone(),
                contacts,
            },
            summary: Some(profile.summary.clone()).filter(|s| !s.trim().is_empty()),
            experience,
            education,
            skills,
            links,
        }
    }

    /// Whether `kind` has anything to show.
    pub fn has(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Summary => self.summary.is_some(),
            SectionKind::Experience => !self.experience.is_empty(),
            SectionKind::Education => !self.education.is_empty(),
            SectionKind::Skills => !self.skills.is_empty(),
            SectionKind::Links => !self.links.is_empty(),
        }
    }

    /// `name (level)` for every skill, joined by `separator`.
    pub fn skills_line(&self, separator: &str) -> String {
        self.skills
            .iter()
            .map(|s| format!("{} ({})", s.name, s.level))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `Label: url` for every present link, joined by `separator`.
    pub fn links_line(&self, separator: &str) -> String {
        self.links
            .iter()
            .map(|l| format!("{}: {}", l.kind.label(), l.url))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
