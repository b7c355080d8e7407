use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Gender label assigned to a speaker by the classification chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unknown => "unknown",
        }
    }

    /// Parse a judge response. Anything outside the contract vocabulary maps
    /// to `Unknown`.
    pub fn from_label(label: &str) -> Gender {
        match label.trim().to_lowercase().as_str() {
            "female" => Gender::Female,
            "male" => Gender::Male,
            _ => Gender::Unknown,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named speaker in the script together with the lines attributed to them.
///
/// Identity is the name alone: two `Speaker` values with the same name are
/// the same character, whatever their gender fields say. That keeps
/// participant sets stable while classification resolves.
#[derive(Debug, Clone, Serialize)]
pub struct Speaker {
    pub name: String,
    pub lines: Vec<String>,
    pub gender: Gender,
}

impl Speaker {
    pub fn new(name: impl Into<String>, lines: Vec<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            lines,
            gender,
        }
    }
}

impl PartialEq for Speaker {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Speaker {}

impl Hash for Speaker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Speaker {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Speaker {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// A conversational window reconstructed by the segmenter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub participants: BTreeSet<Speaker>,
    pub dialogue: Vec<String>,
    pub about_men: bool,
    pub context: String,
}

impl Conversation {
    /// True when every participant is female and at least two are present.
    pub fn is_female_only(&self) -> bool {
        self.participants.len() >= 2
            && self
                .participants
                .iter()
                .all(|s| s.gender == Gender::Female)
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.participants.iter().map(|s| s.name.as_str()).collect();
        write!(
            f,
            "Conversation between {} ({})",
            names.join(", "),
            if self.about_men {
                "about men"
            } else {
                "not about men"
            }
        )
    }
}

/// Outcome of a full Bechdel analysis run.
///
/// `failure_reasons` is present exactly when the verdict is FAIL (including
/// a cross-validation downgrade); `conversations` is present whenever
/// segmentation ran, even on failure, for transparency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub passes_test: bool,
    pub female_characters: Vec<Speaker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversations: Option<Vec<Conversation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reasons: Option<Vec<String>>,
}
