// src/models/mod.rs
use serde::{Deserialize, Serialize};

use crate::utils::text::non_blank;

fn all_blank(fields: &[&Option<String>]) -> bool {
    fields
        .iter()
        .all(|field| field.as_deref().map_or(true, |value| value.trim().is_empty()))
}

/// One job in the experience section. Only extracted keys are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Present but empty when the company line carried no employment type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
}

impl ExperienceEntry {
    pub fn is_blank(&self) -> bool {
        all_blank(&[&self.title, &self.company, &self.employment_type, &self.date_range])
    }
}

/// One school in the education section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
}

impl EducationEntry {
    pub fn is_blank(&self) -> bool {
        all_blank(&[&self.school, &self.degree, &self.date_range])
    }
}

/// Finalized extraction result for one subject.
///
/// Constructed only through [`ProfileRecordBuilder`]; there is no way to
/// mutate a record once it has been built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    profile_url: String,
    name: Option<String>,
    headline: Option<String>,
    experiences: Vec<ExperienceEntry>,
    education: Vec<EducationEntry>,
}

impl ProfileRecord {
    /// Record for a subject whose document yielded nothing usable.
    pub fn empty(profile_url: &str) -> Self {
        ProfileRecordBuilder::new(profile_url).build()
    }

    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn headline(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    pub fn experiences(&self) -> &[ExperienceEntry] {
        &self.experiences
    }

    pub fn education(&self) -> &[EducationEntry] {
        &self.education
    }

    /// True when no field at all could be extracted.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.headline.is_none()
            && self.experiences.is_empty()
            && self.education.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ProfileRecordBuilder {
    profile_url: String,
    name: Option<String>,
    headline: Option<String>,
    experiences: Vec<ExperienceEntry>,
    education: Vec<EducationEntry>,
}

impl ProfileRecordBuilder {
    pub fn new(profile_url: &str) -> Self {
        Self {
            profile_url: profile_url.to_string(),
            name: None,
            headline: None,
            experiences: Vec::new(),
            education: Vec::new(),
        }
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name.as_deref().and_then(non_blank);
        self
    }

    pub fn headline(mut self, headline: Option<String>) -> Self {
        self.headline = headline.as_deref().and_then(non_blank);
        self
    }

    /// Blank entries are dropped; order of the rest is kept.
    pub fn experiences(mut self, entries: Vec<ExperienceEntry>) -> Self {
        self.experiences = entries.into_iter().filter(|entry| !entry.is_blank()).collect();
        self
    }

    pub fn education(mut self, entries: Vec<EducationEntry>) -> Self {
        self.education = entries.into_iter().filter(|entry| !entry.is_blank()).collect();
        self
    }

    pub fn build(self) -> ProfileRecord {
        ProfileRecord {
            profile_url: self.profile_url,
            name: self.name,
            headline: self.headline,
            experiences: self.experiences,
            education: self.education,
        }
    }
}

/// Tabular form of a record as persisted; the list columns hold JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub profile_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub experiences: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
}

impl ProfileRow {
    pub fn from_record(record: &ProfileRecord) -> Result<Self, serde_json::Error> {
        Ok(Self {
            profile_url: record.profile_url.clone(),
            name: record.name.clone(),
            headline: record.headline.clone(),
            experiences: Some(serde_json::to_string(&record.experiences)?),
            education: Some(serde_json::to_string(&record.education)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str) -> ExperienceEntry {
        ExperienceEntry {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn builder_drops_blank_values_and_entries() {
        let record = ProfileRecordBuilder::new("https://www.linkedin.com/in/someone/")
            .name(Some("  Ada Lovelace \n".to_string()))
            .headline(Some("   ".to_string()))
            .experiences(vec![
                job("Founder"),
                ExperienceEntry {
                    employment_type: Some(String::new()),
                    ..Default::default()
                },
                job("Engineer"),
            ])
            .build();

        assert_eq!(record.name(), Some("Ada Lovelace"));
        assert_eq!(record.headline(), None);
        let titles: Vec<_> = record.experiences().iter().map(|e| e.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("Founder"), Some("Engineer")]);
        assert!(!record.is_empty());
    }

    #[test]
    fn empty_record_has_no_fields() {
        let record = ProfileRecord::empty("https://www.linkedin.com/in/ghost/");
        assert!(record.is_empty());
        assert_eq!(record.profile_url(), "https://www.linkedin.com/in/ghost/");
    }

    #[test]
    fn row_encodes_only_extracted_keys() {
        let record = ProfileRecordBuilder::new("u")
            .experiences(vec![ExperienceEntry {
                company: Some("Acme Corp".to_string()),
                employment_type: Some(String::new()),
                ..Default::default()
            }])
            .build();
        let row = ProfileRow::from_record(&record).unwrap();

        assert_eq!(
            row.experiences.as_deref(),
            Some(r#"[{"company":"Acme Corp","employment_type":""}]"#)
        );
        assert_eq!(row.education.as_deref(), Some("[]"));
        assert_eq!(row.name, None);
    }
}
