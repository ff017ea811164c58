//! Papers, skills and the home-page text collections (courses, insights, reads).

use super::record::{require, unknown_field, EditableRecord, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

pub const PAPERS_KEY: &str = "papers";
pub const SKILLS_KEY: &str = "skills";
pub const COURSES_KEY: &str = "phd_courses";
pub const INSIGHTS_KEY: &str = "phd_insights";
pub const READS_KEY: &str = "phd_reads";

/// Paper bookmarked for later reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: RecordId,
    pub title: String,
    pub external_link: String,
    /// Epoch milliseconds.
    pub date_added: i64,
}

impl Record for Paper {
    const COLLECTION_KEY: &'static str = PAPERS_KEY;

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
        require(PAPERS_KEY, "title", &self.title)?;
        require(PAPERS_KEY, "externalLink", &self.external_link)
    }
}

/// Skill being practiced, with free-form notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    /// Epoch milliseconds.
    pub date_added: i64,
}

impl Record for Skill {
    const COLLECTION_KEY: &'static str = SKILLS_KEY;

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
        require(SKILLS_KEY, "title", &self.title)
    }
}

impl EditableRecord for Skill {
    fn apply_edit(&mut self, field: &str, value: &str) -> Result<(), ValidationError> {
        match field {
            "title" => self.title = value.to_string(),
            "notes" => self.notes = value.to_string(),
            other => return Err(unknown_field(SKILLS_KEY, other)),
        }
        Ok(())
    }
}

macro_rules! text_record {
    ($(#[$meta:meta])* $name:ident, $key:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub id: RecordId,
            pub title: String,
            pub content: String,
            /// Display date captured at creation, if any.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub date: Option<String>,
        }

        impl $name {
            pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
                Self {
                    id: 0,
                    title: title.into(),
                    content: content.into(),
                    date: None,
                }
            }
        }

        impl Record for $name {
            const COLLECTION_KEY: &'static str = $key;

            fn id(&self) -> RecordId {
                self.id
            }

            fn set_id(&mut self, id: RecordId) {
                self.id = id;
            }

            fn label(&self) -> &str {
                &self.title
            }
        }

        impl EditableRecord for $name {
            fn apply_edit(&mut self, field: &str, value: &str) -> Result<(), ValidationError> {
                match field {
                    "title" => self.title = value.to_string(),
                    "content" => self.content = value.to_string(),
                    other => return Err(unknown_field($key, other)),
                }
                Ok(())
            }
        }
    };
}

text_record!(
    /// Course accordion item; created with placeholder text.
    Course,
    COURSES_KEY
);
text_record!(
    /// Short research insight.
    Insight,
    INSIGHTS_KEY
);
text_record!(
    /// "2-minute read" carousel slide.
    Read,
    READS_KEY
);
