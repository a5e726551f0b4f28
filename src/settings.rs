use config::{Config, ConfigError, Environment, File};
use dotenv::dotenv;
use serde::Deserialize;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Presence toggles CAPTCHA verification; absent means every
    /// submission skips the round trip.
    #[serde(default)]
    pub recaptcha_secret_key: Option<String>,

    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    #[serde(default = "default_smtp_from")]
    pub smtp_from: String,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default)]
    pub admin_session_token: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "CreatorIT-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_smtp_port() -> u16 {
    587
}
fn default_smtp_from() -> String {
    "CreatorIT <no-reply@creatorit.in>".to_string()
}
fn default_admin_email() -> String {
    "hello@creatorit.in".to_string()
}
fn default_site_url() -> String {
    "https://creatorit.in".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!("config/{}", env_name.to_string().to_lowercase()))
                    .required(false),
            )
            .add_source(Environment::with_prefix("APP").separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject critical env values if missing
        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;
        config.admin_session_token =
            fill_or_env(config.admin_session_token, "APP_ADMIN_SESSION_TOKEN")?;

        if config.recaptcha_secret_key.is_none() {
            config.recaptcha_secret_key = env::var("APP_RECAPTCHA_SECRET_KEY").ok();
        }
        if config.smtp_host.is_none() {
            config.smtp_host = env::var("APP_SMTP_HOST").ok();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.admin_session_token.len() < 16 {
            errors.push("ADMIN_SESSION_TOKEN must be at least 16 characters");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.smtp_host.is_some() && self.smtp_from.trim().is_empty() {
            errors.push("SMTP_FROM cannot be empty when SMTP_HOST is set");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn smtp_configured(&self) -> bool {
        self.smtp_host.is_some()
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field(
                "recaptcha_secret_key",
                &self.recaptcha_secret_key.as_deref().unwrap_or("[NOT SET]").redact(),
            )
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field(
                "smtp_password",
                &self.smtp_password.as_deref().unwrap_or("[NOT SET]").redact(),
            )
            .field("smtp_from", &self.smtp_from)
            .field("admin_email", &self.admin_email)
            .field("site_url", &self.site_url)
            .field("admin_session_token", &self.admin_session_token.redact())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "CreatorIT Test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/creatorit_test".into(),
            cors_allowed_origins: vec!["*".into()],
            recaptcha_secret_key: None,
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "CreatorIT <no-reply@creatorit.in>".into(),
            admin_email: "hello@creatorit.in".into(),
            site_url: "https://creatorit.in".into(),
            admin_session_token: "test-session-token-123".into(),
        }
    }

    #[test]
    fn validate_accepts_test_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_session_token() {
        let mut config = base_config();
        config.admin_session_token = "short".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_wildcard_cors_in_production() {
        let mut config = base_config();
        config.env = AppEnvironment::Production;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_never_leaks_secrets() {
        let mut config = base_config();
        config.recaptcha_secret_key = Some("super-secret-captcha-key".into());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-captcha-key"));
        assert!(!rendered.contains("creatorit_test"));
    }
}
