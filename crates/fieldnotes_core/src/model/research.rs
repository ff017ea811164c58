//! Research entries and mental models.

use super::record::{
    contains_folded, parse_score, require, unknown_field, EditableRecord, Record, RecordId,
    Searchable, ValidationError,
};
use serde::{Deserialize, Serialize};

pub const RESEARCH_ENTRIES_KEY: &str = "research_entries";
pub const MENTAL_MODELS_KEY: &str = "mental_models";

const CONFIDENCE_MIN: u8 = 1;
const CONFIDENCE_MAX: u8 = 10;

/// One paper or idea studied through first principles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchEntry {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub first_principles: String,
    #[serde(default)]
    pub mental_model: String,
    /// Self-rated understanding, nominally 1-10.
    #[serde(default = "default_confidence")]
    pub confidence: u8,
    #[serde(default)]
    pub connections: String,
    /// Math markup, rendered by the post-render hook.
    #[serde(default)]
    pub key_equations: String,
}

fn default_confidence() -> u8 {
    5
}

impl ResearchEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            link: String::new(),
            tags: Vec::new(),
            first_principles: String::new(),
            mental_model: String::new(),
            confidence: default_confidence(),
            connections: String::new(),
            key_equations: String::new(),
        }
    }

    /// Confidence clamped to 1..=10 for display.
    pub fn display_confidence(&self) -> u8 {
        self.confidence.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
    }
}

/// Renders a 1..=10 star bar, clamping out-of-range values.
pub fn confidence_stars(confidence: u8) -> String {
    let filled = usize::from(confidence.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX));
    let empty = usize::from(CONFIDENCE_MAX) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// Splits comma-separated tag input, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl Record for ResearchEntry {
    const COLLECTION_KEY: &'static str = RESEARCH_ENTRIES_KEY;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(RESEARCH_ENTRIES_KEY, "title", &self.title)
    }
}

impl EditableRecord for ResearchEntry {
    fn apply_edit(&mut self, field: &str, value: &str) -> Result<(), ValidationError> {
        match field {
            "title" => self.title = value.to_string(),
            "link" => self.link = value.to_string(),
            "tags" => self.tags = parse_tags(value),
            "firstPrinciples" => self.first_principles = value.to_string(),
            "mentalModel" => self.mental_model = value.to_string(),
            "confidence" => self.confidence = parse_score("confidence", value)?,
            "connections" => self.connections = value.to_string(),
            "keyEquations" => self.key_equations = value.to_string(),
            other => return Err(unknown_field(RESEARCH_ENTRIES_KEY, other)),
        }
        Ok(())
    }
}

impl Searchable for ResearchEntry {
    fn matches(&self, query: &str) -> bool {
        contains_folded(&self.title, query)
            || contains_folded(&self.first_principles, query)
            || self.tags.iter().any(|tag| contains_folded(tag, query))
    }
}

/// A reusable thinking tool, described layer by layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentalModel {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ordered lines, one per layer.
    #[serde(default)]
    pub layers: Vec<String>,
    #[serde(default)]
    pub research_application: String,
    #[serde(default)]
    pub example: String,
}

impl MentalModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: String::new(),
            layers: Vec::new(),
            research_application: String::new(),
            example: String::new(),
        }
    }
}

/// Splits multi-line layer input into ordered non-empty lines.
pub fn parse_layers(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl Record for MentalModel {
    const COLLECTION_KEY: &'static str = MENTAL_MODELS_KEY;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(MENTAL_MODELS_KEY, "name", &self.name)
    }
}

impl EditableRecord for MentalModel {
    fn apply_edit(&mut self, field: &str, value: &str) -> Result<(), ValidationError> {
        match field {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "layers" => self.layers = parse_layers(value),
            "researchApplication" => self.research_application = value.to_string(),
            "example" => self.example = value.to_string(),
            other => return Err(unknown_field(MENTAL_MODELS_KEY, other)),
        }
        Ok(())
    }
}

impl Searchable for MentalModel {
    fn matches(&self, query: &str) -> bool {
        contains_folded(&self.name, query) || contains_folded(&self.description, query)
    }
}

#[cfg(test)]
mod tests {
    use super::{confidence_stars, parse_layers, parse_tags, ResearchEntry};
    use crate::model::record::EditableRecord;

    #[test]
    fn stars_clamp_out_of_range_confidence() {
        assert_eq!(confidence_stars(0).chars().filter(|c| *c == '★').count(), 1);
        assert_eq!(confidence_stars(42).chars().filter(|c| *c == '★').count(), 10);
        assert_eq!(confidence_stars(7).chars().count(), 10);
    }

    #[test]
    fn tags_and_layers_drop_blank_items() {
        assert_eq!(parse_tags(" ml, ,physics ,"), vec!["ml", "physics"]);
        assert_eq!(parse_layers("first\n\n  second  \n"), vec!["first", "second"]);
    }

    #[test]
    fn apply_edit_rejects_unknown_field_and_bad_confidence() {
        let mut entry = ResearchEntry::new("Attention");
        assert!(entry.apply_edit("colour", "red").is_err());
        assert!(entry.apply_edit("confidence", "high").is_err());
        entry.apply_edit("confidence", "8").unwrap();
        assert_eq!(entry.confidence, 8);
    }
}
