use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlerterError {
    #[error("Mail relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Mail relay returned an error: {0}")]
    ApiError(String),

    #[error("Mailer is not configured. Missing endpoint, sender or recipient.")]
    NotConfigured,
}
