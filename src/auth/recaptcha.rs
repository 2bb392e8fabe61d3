//! Google reCAPTCHA v2 verification.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::RecaptchaInfo;

/// Google's server-side verification endpoint.
pub const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifier for reCAPTCHA responses submitted with a form.
#[derive(Debug, Clone)]
pub struct Recaptcha {
    info: RecaptchaInfo,
    endpoint: String,
    client: reqwest::Client,
}

impl Recaptcha {
    pub fn new(info: RecaptchaInfo) -> Self {
        Self::with_endpoint(info, SITEVERIFY_URL)
    }

    /// Verifier that posts to a different endpoint.
    pub fn with_endpoint(info: RecaptchaInfo, endpoint: impl Into<String>) -> Self {
        Self {
            info,
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.info.enabled
    }

    /// Public key rendered into the registration page.
    pub fn site_key(&self) -> &str {
        &self.info.site_key
    }

    /// Check a widget response. Always true when reCAPTCHA is disabled.
    ///
    /// Network and decoding failures count as not verified.
    pub async fn verify(&self, response: &str, remote_ip: Option<&str>) -> bool {
        if !self.info.enabled {
            return true;
        }
        if response.is_empty() {
            debug!("Empty reCAPTCHA response");
            return false;
        }

        let mut form = vec![
            ("secret", self.info.secret.as_str()),
            ("response", response),
        ];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let result = match self.client.post(&self.endpoint).form(&form).send().await {
            Ok(resp) => resp.json::<SiteVerifyResponse>().await,
            Err(e) => {
                warn!(error = %e, "reCAPTCHA request failed");
                return false;
            }
        };

        match result {
            Ok(body) => {
                if !body.success {
                    debug!(errors = ?body.error_codes, "reCAPTCHA rejected");
                }
                body.success
            }
            Err(e) => {
                warn!(error = %e, "reCAPTCHA response could not be decoded");
                false
            }
        }
    }
}
