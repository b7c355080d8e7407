use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::errors::BechdelError;
use crate::extract::SpeakerLines;
use crate::judge::JudgeService;
use crate::model::{Conversation, Speaker};
use crate::topic::TopicClassifier;

/// Reconstructs conversational windows from per-speaker line groups.
///
/// Cross-speaker chronology is not recorded by the extractor, so the
/// flattened sequence walks the groups in their iteration order (first
/// appearance). This is an approximation of true speaking order, kept as
/// documented behavior; scripts with more than two speakers may interleave
/// differently than they were performed.
#[derive(Debug, Default)]
pub struct ConversationSegmenter;

impl ConversationSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Partition the flattened dialogue into overlapping windows. Windows
    /// are emitted on every speaker change once two participants are
    /// present, plus once at the end of the sequence; the end-of-sequence
    /// snapshot may duplicate the last speaker-change snapshot, which is
    /// preserved as is.
    pub async fn segment(
        &self,
        speaker_lines: &[SpeakerLines],
        speakers: &HashMap<String, Speaker>,
        topics: &TopicClassifier,
        judge: &JudgeService,
    ) -> Result<Vec<Conversation>, BechdelError> {
        let sequence: Vec<(&str, &str)> = speaker_lines
            .iter()
            .filter(|group| speakers.contains_key(&group.name))
            .flat_map(|group| {
                group
                    .lines
                    .iter()
                    .map(|line| (group.name.as_str(), line.as_str()))
            })
            .collect();

        let mut conversations = Vec::new();
        if sequence.len() < 2 {
            return Ok(conversations);
        }

        let lookup = |name: &str| -> Result<&Speaker, BechdelError> {
            speakers.get(name).ok_or_else(|| {
                BechdelError::Conversation(format!("speaker {name:?} missing from roster"))
            })
        };

        let mut participants: BTreeSet<Speaker> = BTreeSet::new();
        let mut dialogue: Vec<String> = Vec::new();
        let mut last_speaker: Option<&str> = None;

        for (i, &(name, line)) in sequence.iter().enumerate() {
            let current = lookup(name)?;
            participants.insert(current.clone());
            dialogue.push(line.to_string());

            let speaker_changed = last_speaker.is_some_and(|last| last != name);

            if speaker_changed && participants.len() >= 2 {
                debug!(
                    participants = participants.len(),
                    window = dialogue.len(),
                    "emitting conversation window"
                );
                let context = format!("Conversation at sequence {i}");
                conversations.push(
                    self.snapshot(&participants, &dialogue, &context, topics, judge)
                        .await,
                );
            }

            // Collapse history to a two-line handoff window whenever the
            // speaker changes (or on the very first tuple).
            if (last_speaker.is_none() || speaker_changed) && dialogue.len() > 1 {
                let previous_line = dialogue[dialogue.len() - 2].clone();
                dialogue = vec![previous_line, line.to_string()];
                participants = match last_speaker {
                    Some(last) => BTreeSet::from([lookup(last)?.clone(), current.clone()]),
                    None => BTreeSet::from([current.clone()]),
                };
            }

            last_speaker = Some(name);

            if i == sequence.len() - 1 && participants.len() >= 2 {
                let context = "Final conversation in sequence".to_string();
                conversations.push(
                    self.snapshot(&participants, &dialogue, &context, topics, judge)
                        .await,
                );
            }
        }

        Ok(conversations)
    }

    async fn snapshot(
        &self,
        participants: &BTreeSet<Speaker>,
        dialogue: &[String],
        context: &str,
        topics: &TopicClassifier,
        judge: &JudgeService,
    ) -> Conversation {
        let about_men = topics.about_men(dialogue, judge).await;
        Conversation {
            participants: participants.clone(),
            dialogue: dialogue.to_vec(),
            about_men,
            context: context.to_string(),
        }
    }
}
