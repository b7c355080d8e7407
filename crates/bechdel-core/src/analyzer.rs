use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::JudgeConfig;
use crate::errors::BechdelError;
use crate::extract::DialogueExtractor;
use crate::gender::GenderClassifier;
use crate::judge::{JudgeOutcome, JudgeService};
use crate::model::{AnalysisResult, Conversation, Gender, Speaker};
use crate::segment::ConversationSegmenter;
use crate::source::ScriptSource;
use crate::topic::TopicClassifier;

/// Composition root for the analysis pipeline. Owns the judgment service
/// and threads it by reference through the classifiers.
pub struct BechdelAnalyzer {
    extractor: DialogueExtractor,
    genders: GenderClassifier,
    segmenter: ConversationSegmenter,
    topics: TopicClassifier,
    judge: Arc<JudgeService>,
}

impl BechdelAnalyzer {
    pub fn new(judge: JudgeService) -> Self {
        Self {
            extractor: DialogueExtractor::new(),
            genders: GenderClassifier::new(),
            segmenter: ConversationSegmenter::new(),
            topics: TopicClassifier::new(),
            judge: Arc::new(judge),
        }
    }

    /// Analyzer with no judgment service: rule-based heuristics only.
    pub fn offline() -> Self {
        Self::new(JudgeService::disabled())
    }

    /// Analyzer talking to the Ollama server named by the config.
    pub fn from_config(config: JudgeConfig) -> anyhow::Result<Self> {
        Ok(Self::new(JudgeService::from_config(config)?))
    }

    /// Run the three-criterion evaluation over raw script text.
    pub async fn analyze_script(&self, script_text: &str) -> Result<AnalysisResult, BechdelError> {
        let speaker_lines = self.extractor.extract(script_text);
        debug!(speakers = speaker_lines.len(), "extracted dialogue");

        let mut speakers: HashMap<String, Speaker> = HashMap::new();
        let mut female_characters: Vec<Speaker> = Vec::new();
        for group in &speaker_lines {
            let gender = self
                .genders
                .classify(&group.name, &group.lines, Some(script_text), &self.judge)
                .await;
            let speaker = Speaker::new(group.name.clone(), group.lines.clone(), gender);
            if gender == Gender::Female {
                female_characters.push(speaker.clone());
            }
            speakers.insert(group.name.clone(), speaker);
        }

        let conversations = self
            .segmenter
            .segment(&speaker_lines, &speakers, &self.topics, &self.judge)
            .await?;
        info!(
            female = female_characters.len(),
            conversations = conversations.len(),
            "pipeline stages complete"
        );

        // Criterion 1: at least two named female characters.
        if female_characters.len() < 2 {
            return Ok(fail(
                female_characters,
                conversations,
                "Fewer than two female characters found",
            ));
        }

        // Criterion 2: these women talk to each other.
        let female_conversations: Vec<&Conversation> = conversations
            .iter()
            .filter(|conv| conv.is_female_only())
            .collect();
        if female_conversations.is_empty() {
            return Ok(fail(
                female_characters,
                conversations,
                "No conversations between female characters found",
            ));
        }

        // Criterion 3: at least one of those conversations is not about men.
        let qualifying: Vec<&Conversation> = female_conversations
            .into_iter()
            .filter(|conv| !conv.about_men)
            .collect();
        if qualifying.is_empty() {
            return Ok(fail(
                female_characters,
                conversations,
                "All conversations between female characters are about men",
            ));
        }

        // Tentative PASS; give the judge a chance to overrule it. The judge
        // only ever has downgrade power: a FAIL is never submitted.
        let validated = self
            .cross_validate(&female_characters, &qualifying)
            .await;

        let mut result = AnalysisResult {
            passes_test: true,
            female_characters,
            conversations: Some(conversations),
            failure_reasons: None,
        };
        if !validated {
            result.passes_test = false;
            result.failure_reasons =
                Some(vec!["LLM validation determined test should fail".to_string()]);
        }
        Ok(result)
    }

    /// Read a script from disk and analyze it.
    pub async fn analyze_script_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<AnalysisResult, BechdelError> {
        let script_text = std::fs::read_to_string(path)?;
        self.analyze_script(&script_text).await
    }

    /// Resolve a title through the external script source, then analyze.
    /// `Ok(None)` when no script was found.
    pub async fn analyze_movie(
        &self,
        title: &str,
        source: &dyn ScriptSource,
    ) -> anyhow::Result<Option<AnalysisResult>> {
        let Some(script_text) = source.fetch(title).await? else {
            warn!(title, "no script found");
            return Ok(None);
        };
        info!(title, "script resolved, analyzing");
        Ok(Some(self.analyze_script(&script_text).await?))
    }

    /// Best-effort external confirmation of a tentative PASS. Any judge
    /// trouble keeps the rule-based verdict.
    async fn cross_validate(
        &self,
        female_characters: &[Speaker],
        qualifying: &[&Conversation],
    ) -> bool {
        let names: Vec<String> = female_characters
            .iter()
            .map(|s| s.name.clone())
            .collect();
        let texts: Vec<Vec<String>> = qualifying
            .iter()
            .map(|conv| conv.dialogue.clone())
            .collect();

        match self.judge.validate_verdict(&names, &texts, true).await {
            JudgeOutcome::Answer(validated) => {
                if !validated {
                    info!("judge overturned tentative pass");
                }
                validated
            }
            JudgeOutcome::Unavailable => true,
            JudgeOutcome::Failed(reason) => {
                warn!(reason, "verdict validation failed, keeping rule-based result");
                true
            }
        }
    }
}

fn fail(
    female_characters: Vec<Speaker>,
    conversations: Vec<Conversation>,
    reason: &str,
) -> AnalysisResult {
    AnalysisResult {
        passes_test: false,
        female_characters,
        conversations: Some(conversations),
        failure_reasons: Some(vec![reason.to_string()]),
    }
}
