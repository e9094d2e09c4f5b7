// src/extractors/fields.rs
//! Per-field extraction from a single entry node.
//!
//! Every field has a [`FieldSpec`]: an ordered list of structural patterns
//! (Tier A) and, for entry fields, the index of the line that holds the field
//! in the entry's flattened text (Tier B). Tier B is only consulted when no
//! pattern produced a value, so a structural match always wins even when the
//! positional line says something else.
//!
//! The positional index is fixed per field. Entries that omit a line (a job
//! without a company line, say) shift everything after it, and Tier B will
//! then read the wrong line. That is accepted: the structural patterns cover
//! the common markup, and a smarter guess would be just as fragile.

use crate::dom::{DocumentNode, Pattern};
use crate::extractors::section::SectionLabel;
use crate::extractors::strategy::{first_success, Strategy};
use crate::models::{EducationEntry, ExperienceEntry};
use crate::utils::text::{collapse_line_breaks, non_blank};
use once_cell::sync::Lazy;

/// Separates the organization from the employment type on a company line.
pub const COMPANY_SEPARATOR: &str = " · ";

/// Ordered extraction strategies for one named field.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    patterns: Vec<Pattern>,
    line_index: Option<usize>,
}

impl FieldSpec {
    /// Field with a positional fallback at `line_index`.
    pub fn new(name: &'static str, patterns: &[&'static str], line_index: usize) -> Self {
        Self {
            name,
            patterns: Pattern::compile_all(patterns),
            line_index: Some(line_index),
        }
    }

    /// Field that is only ever read through its structural patterns.
    pub fn structural_only(name: &'static str, patterns: &[&'static str]) -> Self {
        Self {
            name,
            patterns: Pattern::compile_all(patterns),
            line_index: None,
        }
    }
}

// --- Profile header fields ---
pub static NAME: Lazy<FieldSpec> = Lazy::new(|| {
    FieldSpec::structural_only(
        "name",
        &[
            "h1.text-heading-xlarge",
            "div.ph5.pb5 h1",
            "h1.sJlATPGtyhrnuKlKqeFAWOzgrMgdvKOBE",
            "h1.inline.t-24",
        ],
    )
});

pub static HEADLINE: Lazy<FieldSpec> = Lazy::new(|| {
    FieldSpec::structural_only(
        "headline",
        &[
            "div.text-body-medium.break-words",
            "div.text-body-medium",
            "div.ph5.pb5 div.text-body-medium",
        ],
    )
});

// --- Experience entry fields ---
pub static TITLE: Lazy<FieldSpec> = Lazy::new(|| {
    FieldSpec::new(
        "title",
        &[
            "div.mr1.t-bold",
            "div.align-items-center.mr1.t-bold",
            "span.t-bold",
            "span.t-16.t-bold",
            ".t-bold",
            "div.align-items-center",
        ],
        0,
    )
});

pub static COMPANY: Lazy<FieldSpec> = Lazy::new(|| {
    FieldSpec::new(
        "company",
        &[
            "span.t-14.t-normal",
            "span.t-14.t-normal.t-black",
            "span.pv-entity__secondary-title",
            ".t-14.t-normal",
        ],
        1,
    )
});

pub static EXPERIENCE_DATES: Lazy<FieldSpec> = Lazy::new(|| {
    FieldSpec::new(
        "date_range",
        &[
            "span.t-14.t-normal.t-black--light",
            "span.pv-entity__date-range",
            ".t-14.t-normal.t-black--light",
        ],
        2,
    )
});

// --- Education entry fields ---
pub static SCHOOL: Lazy<FieldSpec> = Lazy::new(|| {
    FieldSpec::new(
        "school",
        &[
            "div.mr1.hoverable-link-text.t-bold",
            "div.align-items-center.mr1.hoverable-link-text.t-bold",
            "span.t-bold",
            "h3.pv-entity__school-name",
            ".t-bold",
            "div.align-items-center",
        ],
        0,
    )
});

pub static DEGREE: Lazy<FieldSpec> = Lazy::new(|| {
    FieldSpec::new(
        "degree",
        &[
            "span.t-14.t-normal",
            "span.pv-entity__secondary-title",
            "p.pv-entity__degree-name",
            ".t-14.t-normal",
        ],
        1,
    )
});

pub static EDUCATION_DATES: Lazy<FieldSpec> = Lazy::new(|| {
    FieldSpec::new(
        "date_range",
        &[
            "span.t-14.t-normal.t-black--light",
            "p.pv-entity__dates",
            ".t-14.t-normal.t-black--light",
        ],
        2,
    )
});

struct FieldTarget<'e, N> {
    entry: &'e N,
    spec: &'e FieldSpec,
}

/// Extracts one field from `entry`: structural patterns first, then the
/// positional line of the flattened text.
pub fn extract<N: DocumentNode>(entry: &N, spec: &FieldSpec) -> Option<String> {
    let target = FieldTarget { entry, spec };
    let strategies = [
        Strategy::new("structural", structural::<N>),
        Strategy::new("positional", positional::<N>),
    ];
    let goal = format!("extract '{}'", spec.name);
    first_success(&goal, &target, &strategies)
}

// The first pattern with any match decides; an empty text there is a miss for
// the whole tier rather than a reason to try the next pattern.
fn structural<N: DocumentNode>(target: &FieldTarget<'_, N>) -> Option<String> {
    for pattern in &target.spec.patterns {
        if let Some(first) = target.entry.query(pattern).first() {
            let value = non_blank(&first.inner_text());
            tracing::debug!(
                "{} extracted: {:?} using selector: {}",
                target.spec.name,
                value,
                pattern.source()
            );
            return value;
        }
    }
    None
}

fn positional<N: DocumentNode>(target: &FieldTarget<'_, N>) -> Option<String> {
    let index = target.spec.line_index?;
    let text = target.entry.inner_text();
    let value = text.split('\n').nth(index).and_then(non_blank);
    if value.is_some() {
        tracing::debug!("{} extracted from text line {}: {:?}", target.spec.name, index, value);
    }
    value
}

/// Splits a company line into `(company, employment_type)`.
///
/// Line breaks are collapsed first. Without a separator the employment type
/// is `Some("")`, distinguishing "no type on the line" from "no line at all".
pub fn split_company(raw: &str) -> (Option<String>, Option<String>) {
    let line = collapse_line_breaks(raw);
    match line.split_once(COMPANY_SEPARATOR) {
        Some((company, employment_type)) => (
            non_blank(company),
            Some(employment_type.trim().to_string()),
        ),
        None => match non_blank(&line) {
            Some(company) => (Some(company), Some(String::new())),
            None => (None, None),
        },
    }
}

/// An entry type that can be read out of one item node of its section.
pub trait SectionEntry: Sized + serde::Serialize {
    const SECTION: SectionLabel;

    fn from_node<N: DocumentNode>(node: &N) -> Self;

    fn is_blank(&self) -> bool;
}

impl SectionEntry for ExperienceEntry {
    const SECTION: SectionLabel = SectionLabel::Experience;

    fn from_node<N: DocumentNode>(node: &N) -> Self {
        let (company, employment_type) = match extract(node, &COMPANY) {
            Some(raw) => split_company(&raw),
            None => (None, None),
        };
        ExperienceEntry {
            title: extract(node, &TITLE),
            company,
            employment_type,
            date_range: extract(node, &EXPERIENCE_DATES),
        }
    }

    fn is_blank(&self) -> bool {
        ExperienceEntry::is_blank(self)
    }
}

impl SectionEntry for EducationEntry {
    const SECTION: SectionLabel = SectionLabel::Education;

    fn from_node<N: DocumentNode>(node: &N) -> Self {
        EducationEntry {
            school: extract(node, &SCHOOL),
            degree: extract(node, &DEGREE),
            date_range: extract(node, &EDUCATION_DATES),
        }
    }

    fn is_blank(&self) -> bool {
        EducationEntry::is_blank(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{ElementRef, Html};

    fn entry_of(doc: &Html) -> ElementRef<'_> {
        let pattern = Pattern::parse("li").unwrap();
        doc.root_element().query(&pattern)[0]
    }

    #[test]
    fn positional_fallback_reads_plain_entry() {
        let doc = Html::parse_document(
            r#"<ul><li><div>VP Engineering</div><div>Acme Corp · Full-time</div><div>Jan 2020 - Present</div></li></ul>"#,
        );
        let entry = ExperienceEntry::from_node(&entry_of(&doc));

        assert_eq!(entry.title.as_deref(), Some("VP Engineering"));
        assert_eq!(entry.company.as_deref(), Some("Acme Corp"));
        assert_eq!(entry.employment_type.as_deref(), Some("Full-time"));
        assert_eq!(entry.date_range.as_deref(), Some("Jan 2020 - Present"));
    }

    #[test]
    fn structural_match_beats_positional_line() {
        let doc = Html::parse_document(
            r#"<ul><li>
                <div>Line zero</div>
                <div><span class="t-bold">Chief Scientist</span></div>
            </li></ul>"#,
        );
        let title = extract(&entry_of(&doc), &TITLE);
        assert_eq!(title.as_deref(), Some("Chief Scientist"));
    }

    #[test]
    fn first_matching_pattern_decides_even_when_blank() {
        // `span.t-bold` matches but is empty; `div.align-items-center` is never tried.
        let doc = Html::parse_document(
            r#"<ul><li><div>Fallback title</div><span class="t-bold">  </span><div class="align-items-center">Other</div></li></ul>"#,
        );
        let title = extract(&entry_of(&doc), &TITLE);
        assert_eq!(title.as_deref(), Some("Fallback title"));
    }

    #[test]
    fn out_of_range_line_is_absent() {
        let doc = Html::parse_document(r#"<ul><li><div>Only a title</div></li></ul>"#);
        let entry = ExperienceEntry::from_node(&entry_of(&doc));
        assert_eq!(entry.title.as_deref(), Some("Only a title"));
        assert_eq!(entry.company, None);
        assert_eq!(entry.employment_type, None);
        assert_eq!(entry.date_range, None);
    }

    #[test]
    fn degree_keeps_internal_line_breaks() {
        let doc = Html::parse_document(
            r#"<ul><li><span class="t-bold">MIT</span><span class="t-14 t-normal">Bachelor's<br>of Science</span></li></ul>"#,
        );
        let entry = EducationEntry::from_node(&entry_of(&doc));
        assert_eq!(entry.school.as_deref(), Some("MIT"));
        assert_eq!(entry.degree.as_deref(), Some("Bachelor's\nof Science"));
    }

    #[test]
    fn structural_company_line_is_split() {
        let doc = Html::parse_document(
            r#"<ul><li>
                <span class="t-bold">Founder</span>
                <span class="t-14 t-normal">Stealth Startup · Self-employed</span>
                <span class="t-14 t-normal t-black--light">2021 - Present · 3 yrs</span>
            </li></ul>"#,
        );
        let entry = ExperienceEntry::from_node(&entry_of(&doc));
        assert_eq!(entry.company.as_deref(), Some("Stealth Startup"));
        assert_eq!(entry.employment_type.as_deref(), Some("Self-employed"));
        assert_eq!(entry.date_range.as_deref(), Some("2021 - Present · 3 yrs"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let doc = Html::parse_document(
            r#"<ul><li><div>Advisor</div><div>Example Labs</div></li></ul>"#,
        );
        let entry = entry_of(&doc);
        assert_eq!(extract(&entry, &COMPANY), extract(&entry, &COMPANY));
        assert_eq!(ExperienceEntry::from_node(&entry), ExperienceEntry::from_node(&entry));
    }

    #[test]
    fn header_fields_have_no_positional_fallback() {
        let doc = Html::parse_document(r#"<ul><li><div>Not a name</div></li></ul>"#);
        assert_eq!(extract(&entry_of(&doc), &NAME), None);
    }

    #[test]
    fn company_split_cases() {
        assert_eq!(
            split_company("Acme Corp · Full-time"),
            (Some("Acme Corp".to_string()), Some("Full-time".to_string()))
        );
        assert_eq!(
            split_company("Acme Corp · Full-time · Remote"),
            (Some("Acme Corp".to_string()), Some("Full-time · Remote".to_string()))
        );
        assert_eq!(
            split_company("Acme Corp"),
            (Some("Acme Corp".to_string()), Some(String::new()))
        );
        assert_eq!(
            split_company("Acme\nCorp · Contract"),
            (Some("Acme Corp".to_string()), Some("Contract".to_string()))
        );
        assert_eq!(split_company("  "), (None, None));
    }
}
