use anyhow::Result;
use reqwest::Client;
use tracing::{debug, info};

/// Settings for the outbound SMS provider. All values come from the
/// environment at startup; when they are absent the server simply runs
/// without a notifier.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Provider API root, e.g. `https://api.twilio.com/2010-04-01`.
    pub api_url: String,
    /// Number alerts are sent from.
    pub from_number: String,
    /// Fixed recipient for all alerts.
    pub to_number: String,
}

/// Thin client for a Twilio-style messages endpoint.
pub struct SmsGateway {
    client: Client,
    config: SmsConfig,
}

impl SmsGateway {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Submit a new-message alert naming the sender. Best effort: the
    /// caller logs and drops any error, and nothing is retried.
    pub async fn notify_new_message(&self, from_username: &str) -> Result<()> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_url, self.config.account_sid
        );

        let body = alert_body(from_username);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("Body", body.as_str()),
                ("From", self.config.from_number.as_str()),
                ("To", self.config.to_number.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        debug!("SMS provider responded {}", response.status());
        info!("SMS alert sent for new message from {}", from_username);
        Ok(())
    }
}

fn alert_body(from_username: &str) -> String {
    format!("You received a new courier message from {}!", from_username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_body_names_the_sender() {
        let body = alert_body("alice");
        assert!(body.contains("alice"));
        assert!(body.contains("new courier message"));
    }
}
