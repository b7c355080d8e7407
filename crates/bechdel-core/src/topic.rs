use tracing::{debug, warn};

use crate::judge::{JudgeOutcome, JudgeService};

const MALE_TOPIC_INDICATORS: &[&str] = &[
    "he", "him", "his", "himself", "boy", "man", "guy", "father", "brother", "uncle", "son",
    "husband", "boyfriend", "mr", "sir", "dad", "daddy", "grandpa", "grandfather",
];

/// Fraction of male-indicator words above which a block counts as "about
/// men" (strict).
const MALE_TOPIC_RATIO: f64 = 0.1;

/// Decides whether a block of dialogue is primarily about men.
#[derive(Debug, Default)]
pub struct TopicClassifier;

impl TopicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Ask the judge first; on an unavailable or failed call, fall back to
    /// the lexicon-ratio heuristic. Both paths answer the same question but
    /// use their own thresholds, so they are not required to agree.
    pub async fn about_men(&self, dialogue: &[String], judge: &JudgeService) -> bool {
        match judge.classify_topic(&dialogue.join("\n")).await {
            JudgeOutcome::Answer(about_men) => {
                debug!(about_men, "topic resolved by judge");
                about_men
            }
            JudgeOutcome::Unavailable => self.lexicon_ratio(dialogue),
            JudgeOutcome::Failed(reason) => {
                warn!(reason, "judge topic lookup failed, using lexicon ratio");
                self.lexicon_ratio(dialogue)
            }
        }
    }

    /// Rule-based path: count male-indicator occurrences over all words
    /// (multiset, not unique words). An empty block is not about men.
    pub fn lexicon_ratio(&self, dialogue: &[String]) -> bool {
        let mut male_refs = 0usize;
        let mut total_words = 0usize;

        for line in dialogue {
            for word in line.to_lowercase().split_whitespace() {
                total_words += 1;
                if MALE_TOPIC_INDICATORS.contains(&word) {
                    male_refs += 1;
                }
            }
        }

        if total_words == 0 {
            return false;
        }
        let ratio = male_refs as f64 / total_words as f64;
        debug!(male_refs, total_words, ratio, "lexicon topic ratio");
        ratio > MALE_TOPIC_RATIO
    }
}
