//! Discussion service - Scripts a host discussion of an article
//!
//! Builds the prompt from the host panel and the article, asks the
//! inference backend for a JSON script and turns the reply into a
//! [`Discussion`]. Models like to wrap JSON in code fences or add a sentence
//! around it, so parsing is tolerant of both.

use std::{fmt, sync::Arc};

use domain::{Article, DialogueLine, Discussion, Host};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::InferencePort};

/// Messages requested per minute of podcast
pub const MESSAGES_PER_MINUTE: u32 = 2;

/// Configuration for discussion generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionConfig {
    /// Language the hosts speak
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "Russian".to_string()
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScriptEntry {
    #[serde(default)]
    host: String,
    #[serde(default)]
    content: String,
}

/// Service that turns an article into a scripted discussion
pub struct DiscussionService {
    inference: Arc<dyn InferencePort>,
    config: DiscussionConfig,
}

impl fmt::Debug for DiscussionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscussionService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DiscussionService {
    /// Create a discussion service with the default configuration
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self::with_config(inference, DiscussionConfig::default())
    }

    /// Create a discussion service with custom configuration
    pub fn with_config(inference: Arc<dyn InferencePort>, config: DiscussionConfig) -> Self {
        Self { inference, config }
    }

    /// Script a discussion of `article` between `hosts`
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails, the reply is not a JSON list of
    /// messages, or the list holds nothing to say.
    #[instrument(skip(self, article, hosts), fields(title = %article.title, hosts = hosts.len()))]
    pub async fn generate(
        &self,
        article: &Article,
        hosts: &[Host],
        target_minutes: u32,
    ) -> Result<Discussion, ApplicationError> {
        let target_messages = target_minutes * MESSAGES_PER_MINUTE;
        let system_prompt = self.system_prompt(hosts, target_messages, target_minutes);
        let user_prompt = self.user_prompt(article);

        info!(
            target_messages,
            model = %self.inference.current_model(),
            "Requesting discussion script"
        );
        let result = self
            .inference
            .generate_with_system(&system_prompt, &user_prompt)
            .await?;
        debug!(
            latency_ms = result.latency_ms,
            tokens = ?result.tokens_used,
            "Script received"
        );

        let lines = parse_script(&result.content)?;
        for speaker in unknown_speakers(&lines, hosts) {
            warn!(speaker, "Script uses a speaker outside the panel");
        }

        let discussion = Discussion::new(article.title.clone(), lines)?;
        info!(lines = discussion.len(), "Discussion generated");
        Ok(discussion)
    }

    /// System prompt describing the panel, the length and the output format
    #[must_use]
    pub fn system_prompt(&self, hosts: &[Host], target_messages: u32, target_minutes: u32) -> String {
        let panel = hosts
            .iter()
            .map(Host::describe)
            .collect::<Vec<_>>()
            .join("\n");
        let language = &self.config.language;

        format!(
            "Generate a lively tech podcast discussion in {language} between these hosts \
             about the following article:\n\n\
             {panel}\n\n\
             The discussion should sound natural and unscripted. Hosts react to each other, \
             disagree and show emotion.\n\n\
             RULES:\n\
             1. Each response is 2-5 sentences long, with varying lengths\n\
             2. Generate approximately {target_messages} messages in total \
             (about {MESSAGES_PER_MINUTE} per minute for {target_minutes} minutes)\n\
             3. Each host speaks roughly the same number of times\n\
             4. Open with a short introduction of the topic and close with a short summary\n\n\
             Format the output as a JSON array of messages, where each message has a \"host\" \
             field (the host's name) and a \"content\" field (what they say in {language})."
        )
    }

    /// User prompt carrying the article
    #[must_use]
    pub fn user_prompt(&self, article: &Article) -> String {
        format!(
            "Article Title: {}\n\nArticle Content: {}\n\nPlease respond in {} language only.",
            article.title, article.content, self.config.language
        )
    }
}

/// Parse a model reply into dialogue lines
///
/// Accepts a bare JSON array, one wrapped in a ```` ``` ```` or
/// ```` ```json ```` fence, or an array embedded in surrounding text.
/// Entries without content are skipped.
///
/// # Errors
///
/// Returns `ApplicationError::Discussion` if no JSON array can be parsed.
pub fn parse_script(reply: &str) -> Result<Vec<DialogueLine>, ApplicationError> {
    let body = strip_code_fence(reply);

    let entries: Vec<ScriptEntry> = match serde_json::from_str(body) {
        Ok(entries) => entries,
        Err(first_error) => embedded_array(body)
            .and_then(|slice| serde_json::from_str(slice).ok())
            .ok_or_else(|| {
                ApplicationError::Discussion(format!(
                    "failed to parse response as JSON: {first_error}"
                ))
            })?,
    };

    Ok(entries
        .into_iter()
        .filter(|entry| !entry.content.trim().is_empty())
        .map(|entry| DialogueLine::new(entry.host.trim(), entry.content.trim()))
        .collect())
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"));

    match inner {
        Some(inner) => inner.strip_suffix("```").unwrap_or(inner).trim(),
        None => trimmed,
    }
}

/// Slice from the first `[` to the last `]`
fn embedded_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

fn unknown_speakers<'a>(lines: &'a [DialogueLine], hosts: &[Host]) -> Vec<&'a str> {
    let mut unknown: Vec<&str> = Vec::new();
    for line in lines {
        let speaker = line.speaker.as_str();
        if !hosts.iter().any(|h| h.name == speaker) && !unknown.contains(&speaker) {
            unknown.push(speaker);
        }
    }
    unknown
}

#[cfg(test)]
mod tests {
    use domain::{DomainError, VoiceGender};

    use super::*;
    use crate::ports::{InferenceResult, MockInferencePort};

    fn article() -> Article {
        Article::new("https://example.com/a", "Rust in space", "Rust now flies satellites.")
    }

    fn reply(content: &str) -> InferenceResult {
        InferenceResult {
            content: content.to_string(),
            model: "gpt-4o".to_string(),
            tokens_used: None,
            latency_ms: 1,
        }
    }

    #[test]
    fn parses_bare_array() {
        let lines = parse_script(r#"[{"host":"Мария","content":"Привет!"}]"#).unwrap();
        assert_eq!(lines, [DialogueLine::new("Мария", "Привет!")]);
    }

    #[test]
    fn parses_fenced_array() {
        let reply = "```json\n[{\"host\":\"A\",\"content\":\"one\"},{\"host\":\"B\",\"content\":\"two\"}]\n```";
        let lines = parse_script(reply).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], DialogueLine::new("B", "two"));

        let plain = "```\n[{\"host\":\"A\",\"content\":\"one\"}]\n```";
        assert_eq!(parse_script(plain).unwrap().len(), 1);
    }

    #[test]
    fn parses_array_embedded_in_prose() {
        let reply = "Here is the script:\n[{\"host\":\"A\",\"content\":\"one\"}]\nEnjoy!";
        assert_eq!(parse_script(reply).unwrap(), [DialogueLine::new("A", "one")]);
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_script("I cannot help with that.").unwrap_err();
        assert!(matches!(err, ApplicationError::Discussion(_)));
    }

    #[test]
    fn skips_entries_without_content() {
        let reply = r#"[{"host":"A","content":"  "},{"host":"B"},{"host":"C","content":"kept"}]"#;
        assert_eq!(parse_script(reply).unwrap(), [DialogueLine::new("C", "kept")]);
    }

    #[test]
    fn system_prompt_lists_panel_and_target() {
        let service = DiscussionService::new(Arc::new(MockInferencePort::new()));
        let hosts = vec![Host::new("Anna", VoiceGender::Female, "curious", "shimmer")];

        let prompt = service.system_prompt(&hosts, 20, 10);

        assert!(prompt.contains("Anna (female): curious"));
        assert!(prompt.contains("approximately 20 messages"));
        assert!(prompt.contains("10 minutes"));
        assert!(prompt.contains("\"host\""));
    }

    #[test]
    fn user_prompt_carries_article_and_language() {
        let service = DiscussionService::with_config(
            Arc::new(MockInferencePort::new()),
            DiscussionConfig {
                language: "German".to_string(),
            },
        );
        assert_eq!(
            service.user_prompt(&article()),
            "Article Title: Rust in space\n\nArticle Content: Rust now flies satellites.\n\n\
             Please respond in German language only."
        );
    }

    #[tokio::test]
    async fn generate_builds_discussion() {
        let mut inference = MockInferencePort::new();
        inference
            .expect_current_model()
            .returning(|| "gpt-4o".to_string());
        inference
            .expect_generate_with_system()
            .withf(|system, _| system.contains("approximately 6 messages"))
            .times(1)
            .returning(|_, _| {
                Ok(reply(
                    r#"[{"host":"Мария","content":"Начнём."},{"host":"Дмитрий","content":"Ну..."}]"#,
                ))
            });
        let service = DiscussionService::new(Arc::new(inference));

        let discussion = service
            .generate(&article(), &Host::default_panel(), 3)
            .await
            .unwrap();

        assert_eq!(discussion.title, "Rust in space");
        assert_eq!(discussion.len(), 2);
        assert_eq!(discussion.lines[0].speaker, "Мария");
    }

    #[tokio::test]
    async fn empty_script_is_an_error() {
        let mut inference = MockInferencePort::new();
        inference
            .expect_current_model()
            .returning(|| "gpt-4o".to_string());
        inference
            .expect_generate_with_system()
            .returning(|_, _| Ok(reply("[]")));
        let service = DiscussionService::new(Arc::new(inference));

        let err = service
            .generate(&article(), &Host::default_panel(), 5)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::EmptyDiscussion(_))
        ));
    }

    #[tokio::test]
    async fn inference_errors_propagate() {
        let mut inference = MockInferencePort::new();
        inference
            .expect_current_model()
            .returning(|| "gpt-4o".to_string());
        inference
            .expect_generate_with_system()
            .returning(|_, _| Err(ApplicationError::Inference("boom".to_string())));
        let service = DiscussionService::new(Arc::new(inference));

        let err = service
            .generate(&article(), &Host::default_panel(), 5)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Inference(_)));
    }
}
