use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Spoken when the interview wraps up; `{name}` is replaced by the candidate's name
    pub closing_remarks: String,

    /// Spoken when the call cannot be matched to a session
    pub continuation_prompt: String,

    /// Number of trailing candidate utterances given to the question generator
    pub context_window: usize,

    /// Generated questions must be longer than this many characters (trimmed)
    pub min_question_chars: usize,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            closing_remarks: "Thank you for your time today, {name}. That concludes our \
                              interview. The team will review the conversation and get back \
                              to you soon. Goodbye!"
                .to_string(),
            continuation_prompt: "Thanks, could you tell me a bit more about that?".to_string(),
            context_window: 3,
            min_question_chars: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Upper bound for a single generation call
    pub timeout_secs: u64,

    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 15,
            max_tokens: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// NATS server URL; notifications are only logged when unset
    pub nats_url: Option<String>,

    /// Subject prefix, the notification kind is appended
    pub subject_prefix: String,

    /// Base path for links to interview results
    pub link_base: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            nats_url: None,
            subject_prefix: "interview.notifications".to_string(),
            link_base: "/interviews".to_string(),
        }
    }
}

impl Config {
    /// Load from a config file (extension optional), overridden by `INTERVIEW__*` env vars
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("INTERVIEW").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
