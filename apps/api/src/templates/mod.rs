//! Template renderer: turns a `Profile` into a standalone HTML document in one of
//! the four visual styles.
//!
//! Every template shares the same section model and the same handlebars partials;
//! a `TemplateStyle` record decides order, titles, colours and skill display.

pub mod style;

use std::fmt;

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::layout::sections::{ResumeSections, SectionKind};
use crate::models::profile::Profile;
use crate::templates::style::{meter_fill, style_for, SkillDisplay, TemplateStyle};

/// Render width in CSS pixels: 8.5in at 96 dpi.
pub const RENDER_WIDTH_PX: u32 = 816;
/// Minimum render height in CSS pixels: 11in at 96 dpi.
pub const RENDER_MIN_HEIGHT_PX: u32 = 1056;

// ────────────────────────────────────────────────────────────────────────────
// Template ids
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of visual templates. Unknown ids resolve to `Modern`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateId {
    #[default]
    Modern,
    Classic,
    Creative,
    Executive,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Modern,
        TemplateId::Classic,
        TemplateId::Creative,
        TemplateId::Executive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Classic => "classic",
            TemplateId::Creative => "creative",
            TemplateId::Executive => "executive",
        }
    }

    /// Human-readable name shown in the template picker.
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateId::Modern => "Современный",
            TemplateId::Classic => "Классический",
            TemplateId::Creative => "Креативный",
            TemplateId::Executive => "Руководитель",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        TemplateId::ALL.into_iter().find(|t| t.as_str() == id)
    }

    /// Like `parse`, but falls back to the default template.
    pub fn resolve(id: &str) -> Self {
        Self::parse(id).unwrap_or_else(|| {
            debug!("Unknown template id '{id}', falling back to {}", TemplateId::default());
            TemplateId::default()
        })
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TemplateId {
    fn from(id: String) -> Self {
        TemplateId::resolve(&id)
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.as_str().to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

/// A rendered résumé, ready to preview or rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub template: TemplateId,
    pub html: String,
    pub width_px: u32,
}

/// Holds the compiled partials. Build once at startup and share.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

const PARTIALS: &[(&str, &str)] = &[
    ("document", include_str!("partials/document.hbs")),
    ("header", include_str!("partials/header.hbs")),
    ("summary", include_str!("partials/summary.hbs")),
    ("experience", include_str!("partials/experience.hbs")),
    ("education", include_str!("partials/education.hbs")),
    ("skills", include_str!("partials/skills.hbs")),
    ("links", include_str!("partials/links.hbs")),
];

impl TemplateRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    /// Renders `profile` with the template named `template_id`, falling back to
    /// the default template for unknown ids.
    pub fn render(&self, profile: &Profile, template_id: &str) -> Result<RenderedDocument, RenderError> {
        self.render_template(profile, TemplateId::resolve(template_id))
    }

    pub fn render_template(
        &self,
        profile: &Profile,
        template: TemplateId,
    ) -> Result<RenderedDocument, RenderError> {
        let style = style_for(template);
        let sections = ResumeSections::from_profile(profile);

        let mut body = self
            .registry
            .render("header", &header_context(&sections, style))?;

        for kind in style.sections {
            if !sections.has(*kind) {
                continue;
            }
            let (partial, ctx) = section_context(*kind, &sections, style);
            body.push_str(&self.registry.render(partial, &ctx)?);
        }

        let html = self.registry.render(
            "document",
            &json!({
                "title": sections.header.name,
                "style": style,
                "width_px": RENDER_WIDTH_PX,
                "min_height_px": RENDER_MIN_HEIGHT_PX,
                "body": body,
            }),
        )?;

        Ok(RenderedDocument {
            template,
            html,
            width_px: RENDER_WIDTH_PX,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial contexts
// ────────────────────────────────────────────────────────────────────────────

fn header_context(sections: &ResumeSections, style: &TemplateStyle) -> Value {
    let contacts: Vec<String> = sections
        .header
        .contacts
        .iter()
        .map(|c| {
            if style.contact_icons {
                format!("{} {}", c.kind.icon(), c.value)
            } else {
                c.value.clone()
            }
        })
        .collect();

    json!({
        "name": sections.header.name,
        "position": sections.header.position,
        "contacts": contacts,
    })
}

fn section_context(
    kind: SectionKind,
    sections: &ResumeSections,
    style: &TemplateStyle,
) -> (&'static str, Value) {
    let title = style.title_for(kind);
    match kind {
        SectionKind::Summary => (
            "summary",
            json!({
                "title": title,
                "text": sections.summary,
                "align": style.summary_align,
            }),
        ),
        SectionKind::Experience => {
            let items: Vec<Value> = sections
                .experience
                .iter()
                .map(|e| {
                    json!({
                        "role": e.role,
                        "company_line": e.company_line(style.company_separator),
                        "dates": e.dates.display(style.present_label),
                        "bullets": e.bullets,
                    })
                })
                .collect();
            ("experience", json!({ "title": title, "items": items }))
        }
        SectionKind::Education => {
            let items: Vec<Value> = sections
                .education
                .iter()
                .map(|e| {
                    let (degree, field) = if style.degree_with_field {
                        (e.degree_line(), String::new())
                    } else {
                        (e.degree.clone(), e.field.clone())
                    };
                    json!({
                        "degree": degree,
                        "field": field,
                        "institution": e.institution,
                        "years": e.years.display(style.present_label),
                        "gpa": if style.show_gpa { e.gpa.clone() } else { None },
                    })
                })
                .collect();
            ("education", json!({ "title": title, "items": items }))
        }
        SectionKind::Skills => {
            let items: Vec<Value> = sections
                .skills
                .iter()
                .map(|s| {
                    let label = match style.skill_display {
                        SkillDisplay::ChipsWithLevel => format!("{} ({})", s.name, s.level),
                        _ => s.name.clone(),
                    };
                    let filled = meter_fill(s.level.tier());
                    let dots: Vec<bool> = (0..5).map(|i| i < filled).collect();
                    json!({
                        "name": s.name,
                        "level": s.level.label(),
                        "label": label,
                        "dots": dots,
                    })
                })
                .collect();
            (
                "skills",
                json!({
                    "title": title,
                    "items": items,
                    "chips": matches!(style.skill_display, SkillDisplay::ChipsWithLevel | SkillDisplay::Chips),
                    "grid": style.skill_display == SkillDisplay::NameLevelGrid,
                    "meter": style.skill_display == SkillDisplay::DotMeter,
                }),
            )
        }
        SectionKind::Links => {
            let items: Vec<String> = sections
                .links
                .iter()
                .map(|l| format!("{}: {}", l.kind.label(), l.url))
                .collect();
            ("links", json!({ "items": items }))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
