//! Human-readable report over an [`AnalysisResult`], one section per aspect
//! of the verdict.

use std::collections::BTreeSet;
use std::fmt::Write;

use bechdel_core::model::{AnalysisResult, Speaker};

const RULE: &str =
    "--------------------------------------------------------------------------------";

pub fn render(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\nBechdel Test Result: {}",
        if result.passes_test { "PASS" } else { "FAIL" }
    );

    section(&mut out, "All Characters");
    for speaker in roster(result) {
        let _ = writeln!(out, "- {} (Gender: {})", speaker.name, speaker.gender);
    }

    section(&mut out, "Female Characters");
    for speaker in &result.female_characters {
        let _ = writeln!(out, "- {}", speaker.name);
    }

    if let Some(conversations) = &result.conversations {
        section(&mut out, "Conversations Between Female Characters");
        let female: Vec<_> = conversations
            .iter()
            .filter(|conv| conv.is_female_only())
            .collect();
        if female.is_empty() {
            let _ = writeln!(out, "No conversations between female characters found.");
        }
        for (i, conv) in female.iter().enumerate() {
            let names: Vec<&str> = conv.participants.iter().map(|s| s.name.as_str()).collect();
            let _ = writeln!(out, "\nConversation {}:", i + 1);
            let _ = writeln!(out, "Participants: {}", names.join(", "));
            let _ = writeln!(out, "Dialog:");
            for line in &conv.dialogue {
                let _ = writeln!(out, "{line}");
            }
            let _ = writeln!(out, "{}", &RULE[..40]);
        }
    }

    if let Some(reasons) = &result.failure_reasons {
        section(&mut out, "Failure Reasons");
        for reason in reasons {
            let _ = writeln!(out, "- {reason}");
        }
    }

    out
}

/// Every speaker seen in any conversation window, ordered by name.
fn roster(result: &AnalysisResult) -> BTreeSet<&Speaker> {
    result
        .conversations
        .iter()
        .flatten()
        .flat_map(|conv| conv.participants.iter())
        .collect()
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{RULE}");
}
