//! Structured export: a Word document built straight from profile data.
//!
//! The document tree is built first (`WordDocument`), then written out with
//! `docx-rs`. The visual template never influences the output; every résumé
//! exports with the same Word layout.

use std::io::Cursor;

use anyhow::Context;
use bytes::Bytes;
use docx_rs::{AlignmentType, Docx, LineSpacing, Paragraph, Run, Style, StyleType};
use tracing::{debug, info};

use super::{ExportError, ExportFormat, ExportedFile};
use crate::layout::sections::ResumeSections;
use crate::models::Profile;

const ACCENT: &str = "156dcf";
const MUTED: &str = "666666";
const HEADING_STYLE: &str = "Heading2";

const PRESENT_LABEL: &str = "настоящее время";
const CONTACT_SEPARATOR: &str = " | ";
const COMPANY_SEPARATOR: &str = " • ";
const SKILL_SEPARATOR: &str = " • ";
const LINK_SEPARATOR: &str = " | ";

pub const HEADING_SUMMARY: &str = "О СЕБЕ";
pub const HEADING_EXPERIENCE: &str = "ОПЫТ РАБОТЫ";
pub const HEADING_EDUCATION: &str = "ОБРАЗОВАНИЕ";
pub const HEADING_SKILLS: &str = "НАВЫКИ";
pub const HEADING_LINKS: &str = "ССЫЛКИ";

// ────────────────────────────────────────────────────────────────────────────
// Document tree
// ────────────────────────────────────────────────────────────────────────────

/// A text run. `size` is in half-points.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRun {
    pub text: String,
    pub size: usize,
    pub bold: bool,
    pub color: Option<&'static str>,
}

impl WordRun {
    fn new(text: impl Into<String>, size: usize) -> Self {
        Self {
            text: text.into(),
            size,
            bold: false,
            color: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordAlign {
    #[default]
    Left,
    Center,
    Justify,
}

/// A paragraph. Spacing is in twentieths of a point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordParagraph {
    pub runs: Vec<WordRun>,
    pub align: WordAlign,
    pub heading: bool,
    pub spacing_before: Option<u32>,
    pub spacing_after: Option<u32>,
}

impl WordParagraph {
    fn new(runs: Vec<WordRun>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    fn single(run: WordRun) -> Self {
        Self::new(vec![run])
    }

    fn heading(title: &str) -> Self {
        Self {
            heading: true,
            ..Self::single(WordRun::new(title, 24).bold().color(ACCENT))
        }
        .spacing(Some(400), 200)
    }

    fn align(mut self, align: WordAlign) -> Self {
        self.align = align;
        self
    }

    fn spacing(mut self, before: Option<u32>, after: u32) -> Self {
        self.spacing_before = before;
        self.spacing_after = Some(after);
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordDocument {
    pub paragraphs: Vec<WordParagraph>,
}

impl WordDocument {
    /// Title block, then each non-empty section in the fixed Word order:
    /// about, experience, education, skills, links.
    pub fn from_sections(sections: &ResumeSections) -> Self {
        let mut paragraphs = Vec::new();

        let header = &sections.header;
        paragraphs.push(
            WordParagraph::single(WordRun::new(&header.name, 32).bold().color(ACCENT))
                .align(WordAlign::Center)
                .spacing(None, 200),
        );
        paragraphs.push(
            WordParagraph::single(WordRun::new(&header.position, 24).color(MUTED))
                .align(WordAlign::Center)
                .spacing(None, 400),
        );
        let contacts = header
            .contacts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let separator = if i == 0 { "" } else { CONTACT_SEPARATOR };
                WordRun::new(format!("{separator}{} {}", c.kind.icon(), c.value), 20)
            })
            .collect();
        paragraphs.push(
            WordParagraph::new(contacts)
                .align(WordAlign::Center)
                .spacing(None, 400),
        );

        if let Some(summary) = &sections.summary {
            paragraphs.push(WordParagraph::heading(HEADING_SUMMARY));
            paragraphs.push(
                WordParagraph::single(WordRun::new(summary, 20))
                    .align(WordAlign::Justify)
                    .spacing(None, 400),
            );
        }

        if !sections.experience.is_empty() {
            paragraphs.push(WordParagraph::heading(HEADING_EXPERIENCE));
            for item in &sections.experience {
                paragraphs.push(WordParagraph::single(WordRun::new(&item.role, 22).bold()).spacing(Some(200), 100));
                paragraphs.push(
                    WordParagraph::single(WordRun::new(item.company_line(COMPANY_SEPARATOR), 20).color(ACCENT))
                        .spacing(None, 100),
                );
                paragraphs.push(
                    WordParagraph::single(WordRun::new(item.dates.display(PRESENT_LABEL), 18).color(MUTED))
                        .spacing(None, 200),
                );
                for bullet in &item.bullets {
                    paragraphs.push(WordParagraph::single(WordRun::new(format!("• {bullet}"), 20)).spacing(None, 100));
                }
            }
        }

        if !sections.education.is_empty() {
            paragraphs.push(WordParagraph::heading(HEADING_EDUCATION));
            for item in &sections.education {
                paragraphs.push(WordParagraph::single(WordRun::new(item.degree_line(), 22).bold()).spacing(Some(200), 100));
                paragraphs.push(
                    WordParagraph::single(WordRun::new(&item.institution, 20).color(ACCENT)).spacing(None, 100),
                );
                let mut runs = vec![WordRun::new(item.years.display(PRESENT_LABEL), 18).color(MUTED)];
                if let Some(gpa) = &item.gpa {
                    runs.push(WordRun::new(format!(" | Средний балл: {gpa}"), 18).color(MUTED));
                }
                paragraphs.push(WordParagraph::new(runs).spacing(None, 200));
            }
        }

        if !sections.skills.is_empty() {
            paragraphs.push(WordParagraph::heading(HEADING_SKILLS));
            paragraphs.push(WordParagraph::single(WordRun::new(sections.skills_line(SKILL_SEPARATOR), 20)).spacing(None, 400));
        }

        if !sections.links.is_empty() {
            paragraphs.push(WordParagraph::heading(HEADING_LINKS));
            paragraphs.push(
                WordParagraph::single(WordRun::new(sections.links_line(LINK_SEPARATOR), 20)).spacing(None, 400),
            );
        }

        Self { paragraphs }
    }

    /// Heading texts in document order.
    pub fn headings(&self) -> Vec<String> {
        self.paragraphs
            .iter()
            .filter(|p| p.heading)
            .map(WordParagraph::text)
            .collect()
    }

    pub fn to_docx(&self) -> Docx {
        let heading_style = Style::new(HEADING_STYLE, StyleType::Paragraph)
            .name("Heading 2")
            .bold()
            .color(ACCENT);

        self.paragraphs
            .iter()
            .fold(Docx::new().add_style(heading_style), |docx, p| {
                docx.add_paragraph(to_docx_paragraph(p))
            })
    }

    /// Serializes the document into a .docx (zip) package.
    pub fn pack(&self) -> anyhow::Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.to_docx()
            .build()
            .pack(&mut buffer)
            .context("Failed to write Word package")?;
        Ok(buffer.into_inner())
    }
}

fn to_docx_paragraph(p: &WordParagraph) -> Paragraph {
    let mut paragraph = p.runs.iter().fold(Paragraph::new(), |para, r| {
        let mut run = Run::new().add_text(&r.text).size(r.size);
        if r.bold {
            run = run.bold();
        }
        if let Some(color) = r.color {
            run = run.color(color);
        }
        para.add_run(run)
    });

    paragraph = match p.align {
        WordAlign::Left => paragraph,
        WordAlign::Center => paragraph.align(AlignmentType::Center),
        WordAlign::Justify => paragraph.align(AlignmentType::Both),
    };
    if p.heading {
        paragraph = paragraph.style(HEADING_STYLE);
    }

    let mut spacing = LineSpacing::new();
    if let Some(before) = p.spacing_before {
        spacing = spacing.before(before);
    }
    if let Some(after) = p.spacing_after {
        spacing = spacing.after(after);
    }
    paragraph.line_spacing(spacing)
}

/// Lays `profile` out as a Word document tree.
///
/// Every template exports to the same layout; `template_id` is only logged.
pub fn word_document(profile: &Profile, template_id: &str) -> WordDocument {
    debug!("Structured export ignores template '{template_id}'");
    WordDocument::from_sections(&ResumeSections::from_profile(profile))
}

/// Exports `profile` as a Word document named `filename`.
pub fn export_structured(profile: &Profile, template_id: &str, filename: &str) -> Result<ExportedFile, ExportError> {
    let document = word_document(profile, template_id);
    let bytes = document.pack()?;

    info!(
        "Exported Word document {filename} ({} paragraphs, {} bytes)",
        document.paragraphs.len(),
        bytes.len()
    );
    Ok(ExportedFile {
        filename: filename.to_string(),
        format: ExportFormat::Docx,
        bytes: Bytes::from(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Education, Experience, Skill, SkillLevel};

    fn make_profile() -> Profile {
        Profile {
            full_name: "Анна Смирнова".to_string(),
            email: "anna@example.com".to_string(),
            phone: "+7 900 000-00-00".to_string(),
            location: "Казань".to_string(),
            position: "Backend-разработчик".to_string(),
            summary: "Пишу сервисы на Rust.".to_string(),
            experience: vec![Experience {
                company: "Яндекс".to_string(),
                position: "Инженер".to_string(),
                location: "Москва".to_string(),
                start_date: "2021-03".to_string(),
                end_date: String::new(),
                current: true,
                description: vec!["Сервис платежей".to_string(), "Миграция на tokio".to_string()],
                ..Default::default()
            }],
            education: vec![Education {
                institution: "КФУ".to_string(),
                degree: "Бакалавр".to_string(),
                field: "Информатика".to_string(),
                start_year: 2015,
                end_year: 2019,
                gpa: Some("4.8".to_string()),
                ..Default::default()
            }],
            skills: vec![
                Skill {
                    name: "Go".to_string(),
                    level: SkillLevel::Advanced,
                    ..Default::default()
                },
                Skill {
                    name: "Rust".to_string(),
                    level: SkillLevel::Expert,
                    ..Default::default()
                },
            ],
            github: Some("github.com/anna".to_string()),
            website: Some("anna.dev".to_string()),
            ..Default::default()
        }
    }

    fn build(profile: &Profile) -> WordDocument {
        WordDocument::from_sections(&ResumeSections::from_profile(profile))
    }

    fn texts(doc: &WordDocument) -> Vec<String> {
        doc.paragraphs.iter().map(WordParagraph::text).collect()
    }

    #[test]
    fn test_full_profile_section_order() {
        let doc = build(&make_profile());
        assert_eq!(
            doc.headings(),
            vec![
                HEADING_SUMMARY,
                HEADING_EXPERIENCE,
                HEADING_EDUCATION,
                HEADING_SKILLS,
                HEADING_LINKS
            ]
        );
    }

    #[test]
    fn test_title_block() {
        let doc = build(&make_profile());
        let name = &doc.paragraphs[0];
        assert_eq!(name.text(), "Анна Смирнова");
        assert_eq!(name.align, WordAlign::Center);
        assert_eq!(name.runs[0].size, 32);
        assert!(name.runs[0].bold);
        assert_eq!(name.runs[0].color, Some(ACCENT));

        assert_eq!(doc.paragraphs[1].text(), "Backend-разработчик");
        assert_eq!(
            doc.paragraphs[2].text(),
            "📧 anna@example.com | 📱 +7 900 000-00-00 | 📍 Казань"
        );
    }

    #[test]
    fn test_contact_line_skips_blank_parts() {
        let profile = Profile {
            phone: String::new(),
            ..make_profile()
        };
        assert_eq!(build(&profile).paragraphs[2].text(), "📧 anna@example.com | 📍 Казань");
    }

    #[test]
    fn test_no_experience_means_no_heading() {
        let profile = Profile {
            experience: vec![],
            ..make_profile()
        };
        let doc = build(&profile);
        assert!(!doc.headings().iter().any(|h| h == HEADING_EXPERIENCE));
        assert_eq!(doc.headings().len(), 4);
    }

    #[test]
    fn test_empty_optional_sections_are_omitted() {
        let profile = Profile {
            full_name: "Анна".to_string(),
            email: "a@b.c".to_string(),
            ..Default::default()
        };
        let doc = build(&profile);
        assert!(doc.headings().is_empty());
        assert_eq!(doc.paragraphs.len(), 3);
    }

    #[test]
    fn test_current_experience_reads_present() {
        let all = texts(&build(&make_profile()));
        assert!(all.contains(&"Яндекс • Москва".to_string()));
        assert!(all.contains(&"2021-03 – настоящее время".to_string()));
        assert!(all.contains(&"• Сервис платежей".to_string()));
        let first = all.iter().position(|t| t == "• Сервис платежей").unwrap();
        assert_eq!(all[first + 1], "• Миграция на tokio");
    }

    #[test]
    fn test_education_with_gpa_suffix() {
        let all = texts(&build(&make_profile()));
        assert!(all.contains(&"Бакалавр - Информатика".to_string()));
        assert!(all.contains(&"2015 – 2019 | Средний балл: 4.8".to_string()));
    }

    #[test]
    fn test_skills_and_links_lines() {
        let all = texts(&build(&make_profile()));
        assert!(all.contains(&"Go (Продвинутый) • Rust (Эксперт)".to_string()));
        assert!(all.contains(&"GitHub: github.com/anna | Website: anna.dev".to_string()));
    }

    #[test]
    fn test_headings_carry_heading_style() {
        let doc = build(&make_profile());
        let heading = doc.paragraphs.iter().find(|p| p.heading).unwrap();
        assert_eq!(heading.spacing_before, Some(400));
        assert_eq!(heading.spacing_after, Some(200));
        assert_eq!(heading.runs[0].size, 24);
        assert_eq!(heading.runs[0].color, Some(ACCENT));
    }

    #[test]
    fn test_summary_is_justified() {
        let doc = build(&make_profile());
        let summary = doc
            .paragraphs
            .iter()
            .find(|p| p.text() == "Пишу сервисы на Rust.")
            .unwrap();
        assert_eq!(summary.align, WordAlign::Justify);
    }

    #[test]
    fn test_export_writes_zip_package() {
        let file = export_structured(&make_profile(), "modern", "Резюме 1.docx").unwrap();
        assert_eq!(file.filename, "Резюме 1.docx");
        assert_eq!(file.format, ExportFormat::Docx);
        assert!(file.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_template_id_does_not_change_layout() {
        let profile = make_profile();
        let modern = word_document(&profile, "modern");
        assert_eq!(modern, word_document(&profile, "executive"));
        assert_eq!(modern, word_document(&profile, "no-such-template"));
        assert_eq!(modern, build(&profile));
    }
}
