// src/analysis/mod.rs
//! Batch-level statistics over persisted profile rows.
//!
//! Works purely on [`ProfileRow`]s so it can run long after, and apart from,
//! the extraction that produced them. List columns that are missing, blank or
//! not valid JSON count as empty lists.

use crate::models::{EducationEntry, ExperienceEntry, ProfileRow};
use crate::utils::text::collapse_line_breaks;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

pub const REPORT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectSummary {
    pub profile_url: String,
    pub name: Option<String>,
    pub headline: Option<String>,
    pub num_experiences: usize,
    pub num_educations: usize,
    pub degrees: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub total_records: usize,
    pub avg_experiences: f64,
    pub avg_educations: f64,
    pub degree_counts: Vec<ValueCount>,
    pub school_counts: Vec<ValueCount>,
    pub subjects: Vec<SubjectSummary>,
}

/// Decodes a JSON list column; absent, blank or malformed text gives an empty list.
pub fn decode_entries<E: DeserializeOwned>(column: Option<&str>) -> Vec<E> {
    let Some(text) = column.map(str::trim).filter(|text| !text.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str(text) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Treating undecodable list column as empty: {}", e);
            Vec::new()
        }
    }
}

/// Normalized form of a degree or school used for counting.
fn normalized(value: Option<&str>) -> Option<String> {
    let value = collapse_line_breaks(value?);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Counts values, most frequent first; ties keep first-seen order.
pub fn value_counts<I: IntoIterator<Item = String>>(values: I) -> Vec<ValueCount> {
    let mut counts: Vec<ValueCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for value in values {
        match positions.get(&value) {
            Some(&position) => counts[position].count += 1,
            None => {
                positions.insert(value.clone(), counts.len());
                counts.push(ValueCount { value, count: 1 });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count)); // stable
    counts
}

fn mean(total: usize, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        total as f64 / n as f64
    }
}

/// Recomputes the whole summary from `rows`.
pub fn summarize(rows: &[ProfileRow]) -> AggregateSummary {
    let mut subjects = Vec::with_capacity(rows.len());
    let mut all_degrees = Vec::new();
    let mut all_schools = Vec::new();
    let mut total_experiences = 0;
    let mut total_educations = 0;

    for row in rows {
        let experiences: Vec<ExperienceEntry> = decode_entries(row.experiences.as_deref());
        let education: Vec<EducationEntry> = decode_entries(row.education.as_deref());

        let degrees: Vec<String> = education
            .iter()
            .filter_map(|edu| normalized(edu.degree.as_deref()))
            .collect();
        all_degrees.extend(degrees.iter().cloned());
        all_schools.extend(education.iter().filter_map(|edu| normalized(edu.school.as_deref())));

        total_experiences += experiences.len();
        total_educations += education.len();

        subjects.push(SubjectSummary {
            profile_url: row.profile_url.clone(),
            name: row.name.clone(),
            headline: row.headline.clone(),
            num_experiences: experiences.len(),
            num_educations: education.len(),
            degrees,
        });
    }

    AggregateSummary {
        total_records: rows.len(),
        avg_experiences: mean(total_experiences, rows.len()),
        avg_educations: mean(total_educations, rows.len()),
        degree_counts: value_counts(all_degrees),
        school_counts: value_counts(all_schools),
        subjects,
    }
}

fn push_counts(out: &mut String, title: &str, counts: &[ValueCount], top: usize) {
    out.push_str(&format!("{}:\n", title));
    if counts.is_empty() {
        out.push_str("  (none)\n");
    }
    for entry in counts.iter().take(top) {
        out.push_str(&format!("  {:<40} {}\n", entry.value, entry.count));
    }
    out.push('\n');
}

/// Plain-text report: totals, averages, top values and one block per subject.
pub fn render_report(summary: &AggregateSummary, top: usize) -> String {
    let mut out = String::from("=====================================\n");
    out.push_str("          PROFILE SUMMARY            \n");
    out.push_str("=====================================\n");
    out.push_str(&format!("Total Profiles: {}\n", summary.total_records));
    out.push_str(&format!("Average Number of Experiences: {:.2}\n", summary.avg_experiences));
    out.push_str(&format!("Average Number of Educations: {:.2}\n\n", summary.avg_educations));

    push_counts(&mut out, "Most Common Degrees", &summary.degree_counts, top);
    push_counts(&mut out, "Most Common Schools", &summary.school_counts, top);

    out.push_str("------- Individual Summaries -------\n");
    for subject in &summary.subjects {
        out.push_str(&format!(
            "- {} | {}\n",
            subject.name.as_deref().unwrap_or("n/a"),
            subject.headline.as_deref().unwrap_or("n/a")
        ));
        out.push_str(&format!(
            "  Experiences: {}, Educations: {}\n",
            subject.num_experiences, subject.num_educations
        ));
        if !subject.degrees.is_empty() {
            out.push_str(&format!("  Degrees: {}\n", subject.degrees.join(", ")));
        }
        out.push('\n');
    }
    out
}
