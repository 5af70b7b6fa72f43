use crate::error::AlerterError;
use configuration::Mail;
use reqwest::Client;
use serde::Serialize;
pub mod error;

/// The JSON payload for the mail relay's send endpoint.
#[derive(Debug, Serialize)]
struct SendMailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// A client for delivering finished reports through an HTTP mail relay.
pub struct MailAlerter {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
}

impl MailAlerter {
    /// Creates a new `MailAlerter`.
    ///
    /// Returns `None` if the endpoint, sender or recipient is missing from
    /// the configuration, allowing the system to gracefully run without
    /// delivery (dry runs, local development).
    pub fn new(config: &Mail) -> Option<Self> {
        if config.endpoint.is_empty() || config.from.is_empty() || config.to.is_empty() {
            tracing::warn!("Mailer is not configured (missing endpoint, sender or recipient).");
            return None;
        }
        Some(Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
        })
    }

    /// Sends one finished document to the configured recipient.
    ///
    /// Delivery failures are surfaced to the caller: unlike a data fetch,
    /// a failed send means the run produced no output and is fatal.
    pub async fn send_report(&self, subject: &str, html_body: &str) -> Result<(), AlerterError> {
        let payload = SendMailPayload {
            from: &self.from,
            to: &self.to,
            subject,
            html: html_body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to decode error response".to_string());
            return Err(AlerterError::ApiError(error_text));
        }

        tracing::info!(to = %self.to, "report delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_configuration_disables_delivery() {
        assert!(MailAlerter::new(&Mail::default()).is_none());

        let partial = Mail {
            endpoint: "https://relay.example.com/send".to_string(),
            api_key: String::new(),
            from: "reports@example.com".to_string(),
            to: String::new(),
        };
        assert!(MailAlerter::new(&partial).is_none());
    }

    #[test]
    fn test_complete_configuration_enables_delivery() {
        let mail = Mail {
            endpoint: "https://relay.example.com/send".to_string(),
            api_key: "secret".to_string(),
            from: "reports@example.com".to_string(),
            to: "desk@example.com".to_string(),
        };
        assert!(MailAlerter::new(&mail).is_some());
    }
}
