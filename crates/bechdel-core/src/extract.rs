use once_cell::sync::Lazy;
use regex::Regex;

/// A speaker cue starts a line: one or more uppercase words followed by a
/// colon. The dialogue block runs until the next cue or end of text.
static CUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(?P<speaker>[A-Z]+(?: [A-Z]+)*):").unwrap());

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One speaker's lines, in the order they appear in the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLines {
    pub name: String,
    pub lines: Vec<String>,
}

/// Parses screenplay-formatted text into per-speaker dialogue.
#[derive(Debug, Default)]
pub struct DialogueExtractor;

impl DialogueExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract dialogue grouped by speaker, speakers ordered by first
    /// appearance. Speakers whose every block cleans down to nothing are
    /// absent from the output; a script with no cues yields an empty list.
    pub fn extract(&self, text: &str) -> Vec<SpeakerLines> {
        let mut groups: Vec<SpeakerLines> = Vec::new();

        // Cue positions first; each dialogue block is the slice between a
        // cue and the next one (or end of text).
        let cues: Vec<(&str, usize, usize)> = CUE
            .captures_iter(text)
            .map(|caps| {
                let cue = caps.get(0).expect("whole match always present");
                let speaker = caps.name("speaker").expect("speaker group always present");
                (speaker.as_str(), cue.start(), cue.end())
            })
            .collect();

        for (i, &(speaker, _, dialogue_start)) in cues.iter().enumerate() {
            let block_end = cues.get(i + 1).map_or(text.len(), |&(_, start, _)| start);
            let dialogue = clean_dialogue(&text[dialogue_start..block_end]);
            if dialogue.is_empty() {
                continue;
            }
            match groups.iter_mut().find(|g| g.name == speaker) {
                Some(group) => group.lines.push(dialogue),
                None => groups.push(SpeakerLines {
                    name: speaker.to_string(),
                    lines: vec![dialogue],
                }),
            }
        }

        groups
    }
}

/// Strip parenthetical stage directions, collapse whitespace runs, trim.
fn clean_dialogue(raw: &str) -> String {
    let stripped = PARENTHETICAL.replace_all(raw, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}
