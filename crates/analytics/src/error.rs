use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid lookback offset of {0} bars: the offset must be at least 1")]
    InvalidOffset(usize),
}
