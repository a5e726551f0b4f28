use serde::Deserialize;
use std::time::Duration;

const VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
const SCORE_THRESHOLD: f64 = 0.5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tokens the frontend sends when its own CAPTCHA widget failed to load.
/// These mean "skip verification", not evidence of abuse.
const SKIP_TOKENS: [&str; 3] = ["no-captcha-available", "captcha-failed", "captcha-error"];

#[derive(Debug, Clone, PartialEq)]
pub struct CaptchaOutcome {
    pub success: bool,
    pub score: Option<f64>,
}

impl CaptchaOutcome {
    fn pass() -> Self {
        CaptchaOutcome {
            success: true,
            score: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
}

/// Client for a reCAPTCHA-style verification service.
///
/// Policy is availability over strictness: no configured secret means the
/// deployment opted out of CAPTCHA, and a broken integration (network or
/// parse failure) must never block legitimate submissions, so both paths
/// pass the check.
pub struct CaptchaVerifier {
    secret: Option<String>,
    client: reqwest::Client,
    verify_url: String,
}

impl CaptchaVerifier {
    /// Panics if the HTTP client cannot be built; construction happens
    /// once at startup and a client without the timeout is worse than
    /// refusing to boot.
    pub fn new(secret: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build CAPTCHA HTTP client");

        CaptchaVerifier {
            secret,
            client,
            verify_url: VERIFY_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_verify_url(mut self, url: &str) -> Self {
        self.verify_url = url.to_string();
        self
    }

    pub async fn verify(&self, token: Option<&str>) -> CaptchaOutcome {
        let token = match token {
            Some(t) if !SKIP_TOKENS.contains(&t) => t,
            _ => return CaptchaOutcome::pass(),
        };

        let secret = match &self.secret {
            Some(secret) => secret,
            None => return CaptchaOutcome::pass(),
        };

        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", secret.as_str()), ("response", token)])
            .send()
            .await;

        match response {
            Ok(resp) => match resp.json::<VerifyResponse>().await {
                Ok(body) => interpret(body),
                Err(e) => {
                    tracing::warn!("CAPTCHA response parsing failed, failing open: {}", e);
                    CaptchaOutcome::pass()
                }
            },
            Err(e) => {
                tracing::warn!("CAPTCHA service unreachable, failing open: {}", e);
                CaptchaOutcome::pass()
            }
        }
    }
}

/// Scored responses pass at or above the threshold; boolean-only responses
/// pass on success alone.
fn interpret(response: VerifyResponse) -> CaptchaOutcome {
    let success = match response.score {
        Some(score) => response.success && score >= SCORE_THRESHOLD,
        None => response.success,
    };

    CaptchaOutcome {
        success,
        score: response.score,
    }
}
