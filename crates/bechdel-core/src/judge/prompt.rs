//! Prompt templates for the three judgment operations. Each asks for a
//! closed vocabulary so responses stay machine-checkable.

pub(crate) fn gender_prompt(character_name: &str, context: &str) -> String {
    format!(
        "Analyze the character name and context to determine their likely gender.\n\
         Focus only on clear gender indicators and respond with only \"female\", \"male\", or \"unknown\".\n\
         \n\
         Character Name: {character_name}\n\
         Context: {context}\n\
         \n\
         Gender:"
    )
}

pub(crate) fn topic_prompt(dialogue: &str) -> String {
    format!(
        "Analyze this conversation to determine if it's primarily about men/male characters.\n\
         Consider mentions of men, male pronouns, and masculine terms.\n\
         Respond with only \"true\" if it's about men or \"false\" if it's not.\n\
         \n\
         Conversation:\n\
         {dialogue}\n\
         \n\
         Is this conversation primarily about men?"
    )
}

pub(crate) fn validation_prompt(
    female_names: &[String],
    conversations: &[Vec<String>],
    tentative_pass: bool,
) -> String {
    let joined_conversations = conversations
        .iter()
        .map(|dialogue| dialogue.join("\n"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Validate if this script passes the Bechdel test:\n\
         1. Has at least two named female characters: {}\n\
         2. These women talk to each other\n\
         3. Their conversation is not primarily about men\n\
         \n\
         Conversations:\n\
         {}\n\
         \n\
         Original analysis result: {}\n\
         \n\
         Respond with only \"true\" if the test passes or \"false\" if it fails.",
        female_names.join(", "),
        joined_conversations,
        if tentative_pass { "PASS" } else { "FAIL" },
    )
}
