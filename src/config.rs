use crate::utils::RetryPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Top-level pipeline configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// AI backend selection
    pub ai: AiConfig,
    /// Retry budgets, one per call class
    pub retry: RetryConfig,
    /// Deadlines in seconds, one per call
    pub timeouts: TimeoutConfig,
    /// User-Agent sent when fetching pages
    pub user_agent: String,
    /// Whether to ask the AI backend for a photo when a source has none
    pub generate_images: bool,
    /// Upper bound on page text handed to the text normalizer
    pub max_page_text_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            retry: RetryConfig::default(),
            timeouts: TimeoutConfig::default(),
            user_agent: default_user_agent(),
            generate_images: true,
            max_page_text_chars: default_max_page_text_chars(),
        }
    }
}

/// Main AI configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Default provider to use when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            fallback: FallbackConfig::default(),
        }
    }
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model used for structured and search calls (e.g., "gemini-2.5-flash").
    /// Left empty, the provider's built-in models are used.
    #[serde(default)]
    pub model: String,
    /// Model used for image generation; image generation is skipped when unset
    pub image_model: Option<String>,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Configuration used for a provider that is named but not configured
    pub fn for_provider(name: &str) -> Self {
        let (model, image_model) = match name {
            "openai" => ("gpt-4.1-mini", "gpt-image-1"),
            _ => ("gemini-2.5-flash", "gemini-2.5-flash-image"),
        };
        Self {
            enabled: true,
            model: model.to_string(),
            image_model: Some(image_model.to_string()),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }

    /// Fill in the built-in models when no model was configured
    pub fn with_default_models(&self, name: &str) -> Self {
        if !self.model.trim().is_empty() {
            return self.clone();
        }
        let defaults = Self::for_provider(name);
        Self {
            model: defaults.model,
            image_model: self.image_model.clone().or(defaults.image_model),
            ..self.clone()
        }
    }
}

/// Configuration for provider fallback
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
}

/// Retry budget for one call class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicyConfig {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Initial delay between retries in milliseconds (uses exponential backoff)
    pub initial_delay_ms: u64,
}

impl RetryPolicyConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.initial_delay_ms))
    }
}

/// Each call class starts from its own defaults; a config source only needs
/// to name the fields it changes.
#[derive(Debug, Deserialize, Clone)]
#[serde(from = "RetryOverrides")]
pub struct RetryConfig {
    /// Page fetches
    pub network: RetryPolicyConfig,
    /// Structured generation, search and vision calls
    pub ai_generation: RetryPolicyConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            network: RetryPolicyConfig {
                max_attempts: 3,
                initial_delay_ms: default_retry_delay_ms(),
            },
            ai_generation: RetryPolicyConfig {
                max_attempts: 2,
                initial_delay_ms: default_retry_delay_ms(),
            },
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RetryOverrides {
    network: RetryPolicyOverride,
    ai_generation: RetryPolicyOverride,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RetryPolicyOverride {
    max_attempts: Option<u32>,
    initial_delay_ms: Option<u64>,
}

impl RetryPolicyOverride {
    fn apply(self, base: RetryPolicyConfig) -> RetryPolicyConfig {
        RetryPolicyConfig {
            max_attempts: self.max_attempts.unwrap_or(base.max_attempts),
            initial_delay_ms: self.initial_delay_ms.unwrap_or(base.initial_delay_ms),
        }
    }
}

impl From<RetryOverrides> for RetryConfig {
    fn from(overrides: RetryOverrides) -> Self {
        let defaults = RetryConfig::default();
        Self {
            network: overrides.network.apply(defaults.network),
            ai_generation: overrides.ai_generation.apply(defaults.ai_generation),
        }
    }
}

/// Per-call deadlines, in seconds
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimeoutConfig {
    pub fetch: u64,
    pub probe: u64,
    pub page_text: u64,
    pub transcript: u64,
    pub text_normalize: u64,
    pub image_analysis: u64,
    pub image_generation: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            fetch: 15,
            probe: 5,
            page_text: 30,
            transcript: 30,
            text_normalize: 20,
            image_analysis: 30,
            image_generation: 30,
        }
    }
}

impl TimeoutConfig {
    pub fn fetch(&self) -> Duration {
        Duration::from_secs(self.fetch)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe)
    }

    pub fn page_text(&self) -> Duration {
        Duration::from_secs(self.page_text)
    }

    pub fn transcript(&self) -> Duration {
        Duration::from_secs(self.transcript)
    }

    pub fn text_normalize(&self) -> Duration {
        Duration::from_secs(self.text_normalize)
    }

    pub fn image_analysis(&self) -> Duration {
        Duration::from_secs(self.image_analysis)
    }

    pub fn image_generation(&self) -> Duration {
        Duration::from_secs(self.image_generation)
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; RecipeExtractBot/1.0; +https://github.com/recipe-extract)".to_string()
}

fn default_max_page_text_chars() -> usize {
    20_000
}

impl PipelineConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE__AI__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`PipelineConfig::load`] for the precedence rules.
pub fn load_config() -> Result<PipelineConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE__RETRY__NETWORK__MAX_ATTEMPTS
        .add_source(
            Environment::with_prefix("RECIPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
