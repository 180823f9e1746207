//! Prompt templates for every LLM-backed feature.

use crate::llm::ChatMessage;

pub const NAME_SYSTEM_PROMPT_TEMPLATE: &str = "You are a translator that specializes in converting names to {target_language}. \
     If the name has a common {target_language} equivalent, use that. \
     Otherwise, use a phonetic rendering that sounds similar in {target_language}. \
     Respond with ONLY the translated name, without quotes or explanations.";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_name_prompt(name: &str, target_language: &str) -> Vec<ChatMessage> {
    // {target_language} is a placeholder for string replacement, not a format argument
    vec![
        ChatMessage::system(NAME_SYSTEM_PROMPT_TEMPLATE.replace("{target_language}", target_language)),
        ChatMessage::user(format!("Translate this name to {target_language}: {name}")),
    ]
}

pub fn build_welcome_prompt(
    member_name: &str,
    guild_name: &str,
    translated_name: Option<&str>,
    language: &str,
) -> Vec<ChatMessage> {
    let name_info = translated_name
        .map(|t| format!(" Their name has been translated to {language} as '{t}'."))
        .unwrap_or_default();

    vec![ChatMessage::user(format!(
        "Generate a friendly, warm welcome message for a new Discord user named {member_name} \
         who just joined the server {guild_name}.{name_info} \
         The message should be 2-3 sentences, conversational, and welcoming. \
         Don't use hashtags or emojis and only English."
    ))]
}

pub fn build_goodbye_prompt(member_name: &str, guild_name: &str, language: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(format!(
        "Generate a brief, thoughtful goodbye message for a Discord user named {member_name} \
         who just left the server {guild_name}. \
         The message should be 1-2 sentences, respectful, and wishing them well. \
         Don't use hashtags or emojis and only English. \
         The server's primary language is {language}."
    ))]
}
