use anyhow::{Context, Result};

use courier_notify::sms::SmsConfig;

const DEFAULT_SMS_API_URL: &str = "https://api.twilio.com/2010-04-01";

pub struct Config {
    pub secret_key: String,
    pub db_path: String,
    pub host: String,
    pub port: u16,
    /// Absent when the SMS provider is not configured; the server then
    /// runs without a notifier task.
    pub sms: Option<SmsConfig>,
}

impl Config {
    /// Read configuration from the environment, once, at startup. A
    /// missing signing secret is fatal here — never a per-request
    /// failure.
    pub fn from_env() -> Result<Self> {
        let secret_key =
            std::env::var("COURIER_SECRET_KEY").context("COURIER_SECRET_KEY must be set")?;

        let db_path = std::env::var("COURIER_DB_PATH").unwrap_or_else(|_| "courier.db".into());
        let host = std::env::var("COURIER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("COURIER_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("COURIER_PORT must be a port number")?;

        let sms = sms_from_env();

        Ok(Self {
            secret_key,
            db_path,
            host,
            port,
            sms,
        })
    }
}

fn sms_from_env() -> Option<SmsConfig> {
    let account_sid = std::env::var("COURIER_SMS_ACCOUNT_SID").ok()?;
    let auth_token = std::env::var("COURIER_SMS_AUTH_TOKEN").ok()?;
    let from_number = std::env::var("COURIER_SMS_FROM").ok()?;
    let to_number = std::env::var("COURIER_SMS_TO").ok()?;

    let api_url =
        std::env::var("COURIER_SMS_API_URL").unwrap_or_else(|_| DEFAULT_SMS_API_URL.into());

    Some(SmsConfig {
        account_sid,
        auth_token,
        api_url,
        from_number,
        to_number,
    })
}
