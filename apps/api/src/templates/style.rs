//! Style records for the four visual templates.
//!
//! A template is nothing more than one of these records applied to the shared
//! section model by the shared partials.

use serde::Serialize;

use crate::layout::sections::SectionKind;
use crate::templates::TemplateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStyle {
    /// Left-aligned, accent rule underneath.
    Underlined,
    /// Centred, thin grey rule underneath.
    Centered,
    /// Gradient card.
    Banner,
    /// Full-bleed dark band.
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingCase {
    AsWritten,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Divider {
    LeftBar,
    Plain,
    Dot,
    ShortRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillDisplay {
    /// Pills reading `name (level)`.
    ChipsWithLevel,
    /// Two columns of name / level rows.
    NameLevelGrid,
    /// Pills with the name only.
    Chips,
    /// Five dots, filled by proficiency tier.
    DotMeter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    Left,
    Justify,
    Center,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SectionTitles {
    pub summary: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateStyle {
    pub id: TemplateId,
    pub font_family: &'static str,
    pub accent: &'static str,
    pub accent_soft: &'static str,
    pub accent_alt: &'static str,
    pub header: HeaderStyle,
    pub heading_case: HeadingCase,
    pub divider: Divider,
    pub titles: SectionTitles,
    pub present_label: &'static str,
    pub company_separator: &'static str,
    pub contact_icons: bool,
    pub summary_align: TextAlign,
    /// Degree and field on one line instead of two.
    pub degree_with_field: bool,
    pub show_gpa: bool,
    pub skill_display: SkillDisplay,
    pub sections: &'static [SectionKind],
}

const MODERN: TemplateStyle = TemplateStyle {
    id: TemplateId::Modern,
    font_family: "'Inter', 'Helvetica Neue', Arial, sans-serif",
    accent: "#2563eb",
    accent_soft: "#dbeafe",
    accent_alt: "#1e40af",
    header: HeaderStyle::Underlined,
    heading_case: HeadingCase::AsWritten,
    divider: Divider::LeftBar,
    titles: SectionTitles {
        summary: "О себе",
        experience: "Опыт работы",
        education: "Образование",
        skills: "Навыки",
    },
    present_label: "настоящее время",
    company_separator: " • ",
    contact_icons: true,
    summary_align: TextAlign::Left,
    degree_with_field: true,
    show_gpa: true,
    skill_display: SkillDisplay::ChipsWithLevel,
    sections: &[
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Links,
    ],
};

const CLASSIC: TemplateStyle = TemplateStyle {
    id: TemplateId::Classic,
    font_family: "Georgia, 'Times New Roman', serif",
    accent: "#374151",
    accent_soft: "#f3f4f6",
    accent_alt: "#111827",
    header: HeaderStyle::Centered,
    heading_case: HeadingCase::Upper,
    divider: Divider::Plain,
    titles: SectionTitles {
        summary: "Профессиональное резюме",
        experience: "Профессиональный опыт",
        education: "Образование",
        skills: "Ключевые навыки",
    },
    present_label: "настоящее время",
    company_separator: ", ",
    contact_icons: false,
    summary_align: TextAlign::Justify,
    degree_with_field: false,
    show_gpa: true,
    skill_display: SkillDisplay::NameLevelGrid,
    sections: &[
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
    ],
};

const CREATIVE: TemplateStyle = TemplateStyle {
    id: TemplateId::Creative,
    font_family: "'Poppins', 'Helvetica Neue', Arial, sans-serif",
    accent: "#7e22ce",
    accent_soft: "#f3e8ff",
    accent_alt: "#db2777",
    header: HeaderStyle::Banner,
    heading_case: HeadingCase::AsWritten,
    divider: Divider::Dot,
    titles: SectionTitles {
        summary: "О себе",
        experience: "Опыт работы",
        education: "Образование",
        skills: "Навыки",
    },
    present_label: "сейчас",
    company_separator: " • ",
    contact_icons: true,
    summary_align: TextAlign::Left,
    degree_with_field: false,
    show_gpa: false,
    skill_display: SkillDisplay::Chips,
    sections: &[
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Education,
    ],
};

const EXECUTIVE: TemplateStyle = TemplateStyle {
    id: TemplateId::Executive,
    font_family: "'Helvetica Neue', Arial, sans-serif",
    accent: "#111827",
    accent_soft: "#e5e7eb",
    accent_alt: "#d1d5db",
    header: HeaderStyle::Dark,
    heading_case: HeadingCase::Upper,
    divider: Divider::ShortRule,
    titles: SectionTitles {
        summary: "Executive Summary",
        experience: "Professional Experience",
        education: "Education",
        skills: "Core Competencies",
    },
    present_label: "Present",
    company_separator: ", ",
    contact_icons: false,
    summary_align: TextAlign::Center,
    degree_with_field: false,
    show_gpa: false,
    skill_display: SkillDisplay::DotMeter,
    sections: &[
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
    ],
};

pub fn style_for(id: TemplateId) -> &'static TemplateStyle {
    match id {
        TemplateId::Modern => &MODERN,
        TemplateId::Classic => &CLASSIC,
        TemplateId::Creative => &CREATIVE,
        TemplateId::Executive => &EXECUTIVE,
    }
}

impl TemplateStyle {
    pub fn title_for(&self, kind: SectionKind) -> &'static str {
        match kind {
            SectionKind::Summary => self.titles.summary,
            SectionKind::Experience => self.titles.experience,
            SectionKind::Education => self.titles.education,
            SectionKind::Skills => self.titles.skills,
            SectionKind::Links => "",
        }
    }
}

/// Number of filled dots (out of five) on the skill meter.
pub fn meter_fill(tier: u8) -> usize {
    (tier as usize + 1).min(5)
}
