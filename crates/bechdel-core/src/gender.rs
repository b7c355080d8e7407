use tracing::{debug, warn};

use crate::judge::{JudgeOutcome, JudgeService};
use crate::model::Gender;

const FEMALE_NAMES: &[&str] = &[
    "mary", "patricia", "linda", "barbara", "elizabeth", "jennifer", "maria", "susan", "margaret",
    "dorothy", "sarah", "jessica", "helen", "nancy", "betty", "karen", "lisa", "anna", "emma",
    "emily", "alice", "jane", "anne", "jean", "judy", "rose", "catherine", "martha",
];

const MALE_NAMES: &[&str] = &[
    "james", "john", "robert", "michael", "william", "david", "richard", "charles", "joseph",
    "thomas", "george", "donald", "kenneth", "steven", "edward", "brian", "ronald", "anthony",
    "kevin", "jason", "matthew", "gary", "timothy", "jose", "larry", "jeffrey", "frank", "scott",
    "eric",
];

const FEMALE_INDICATORS: &[&str] = &[
    "she", "her", "hers", "herself", "girl", "woman", "lady", "mother", "sister", "aunt",
    "daughter", "wife", "girlfriend", "mrs", "miss", "ms",
];

const MALE_INDICATORS: &[&str] = &[
    "he", "him", "his", "himself", "boy", "man", "guy", "father", "brother", "uncle", "son",
    "husband", "boyfriend", "mr", "sir",
];

const FEMALE_SUFFIXES: &[&str] = &["a", "ie", "y", "i"];
const FEMALE_SUFFIX_EXCLUSIONS: &[&str] = &["by", "ey", "dy", "ty"];
const MALE_SUFFIXES: &[&str] = &["son", "ton", "er", "or", "en"];

/// Layered gender classification: lexicon, then morphology, then the
/// speaker's own dialogue, then script context, then the external judge.
/// Each stage either decides or defers to the next; the first decisive
/// stage wins.
#[derive(Debug, Default)]
pub struct GenderClassifier;

impl GenderClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a speaker's gender. Pure with respect to its inputs apart
    /// from the judge cache: identical name/lines/context yield the same
    /// label within a run.
    pub async fn classify(
        &self,
        name: &str,
        lines: &[String],
        script_text: Option<&str>,
        judge: &JudgeService,
    ) -> Gender {
        let first_name = name
            .split_whitespace()
            .next()
            .unwrap_or(name)
            .to_lowercase();

        let local_stages: [&dyn Fn() -> Option<Gender>; 4] = [
            &|| name_lexicon(&first_name),
            &|| name_suffix(&first_name),
            &|| indicator_majority(lines.iter().map(String::as_str)),
            &|| script_text.and_then(|text| context_majority(name, text)),
        ];

        if let Some(gender) = local_stages.iter().find_map(|stage| stage()) {
            debug!(name, gender = %gender, "gender resolved locally");
            return gender;
        }

        // Final fallback: ask the judge, but only when we have any context
        // to hand it.
        let Some(script) = script_text else {
            return Gender::Unknown;
        };
        let context = if lines.is_empty() {
            script.to_string()
        } else {
            lines.join("\n")
        };

        match judge.classify_gender(name, &context).await {
            JudgeOutcome::Answer(gender) => {
                debug!(name, gender = %gender, "gender resolved by judge");
                gender
            }
            JudgeOutcome::Unavailable => Gender::Unknown,
            JudgeOutcome::Failed(reason) => {
                warn!(name, reason, "judge gender lookup failed");
                Gender::Unknown
            }
        }
    }
}

fn name_lexicon(first_name: &str) -> Option<Gender> {
    if FEMALE_NAMES.contains(&first_name) {
        Some(Gender::Female)
    } else if MALE_NAMES.contains(&first_name) {
        Some(Gender::Male)
    } else {
        None
    }
}

fn name_suffix(first_name: &str) -> Option<Gender> {
    let ends_with_any = |suffixes: &[&str]| suffixes.iter().any(|s| first_name.ends_with(s));
    if ends_with_any(FEMALE_SUFFIXES) && !ends_with_any(FEMALE_SUFFIX_EXCLUSIONS) {
        Some(Gender::Female)
    } else if ends_with_any(MALE_SUFFIXES) {
        Some(Gender::Male)
    } else {
        None
    }
}

/// Count indicator words across the given lines and apply the strict 2x
/// majority rule. Zero counts on both sides stay inconclusive.
fn indicator_majority<'a>(lines: impl Iterator<Item = &'a str>) -> Option<Gender> {
    let mut female = 0usize;
    let mut male = 0usize;
    for line in lines {
        for word in line.to_lowercase().split_whitespace() {
            if FEMALE_INDICATORS.contains(&word) {
                female += 1;
            }
            if MALE_INDICATORS.contains(&word) {
                male += 1;
            }
        }
    }
    if female > male * 2 {
        Some(Gender::Female)
    } else if male > female * 2 {
        Some(Gender::Male)
    } else {
        None
    }
}

/// Sentence-level context scan: every period-delimited unit mentioning the
/// name contributes its indicator counts.
fn context_majority(name: &str, text: &str) -> Option<Gender> {
    indicator_majority(text.split('.').filter(|sentence| sentence.contains(name)))
}
