use thiserror::Error;

/// Errors produced by the search and forecast pipelines.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A series in the forecast payload violated the parallel-array
    /// contract (length mismatch, bad sampling window, missing block).
    #[error("Malformed forecast series: {0}")]
    Shape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

/// Trim a response body down to something safe to embed in an error.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i <= MAX)
            .last()
            .map_or(0, |(i, _)| i);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_long_bodies() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert!(out.len() < 250);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn shape_error_message_contains_detail() {
        let err = WeatherError::shape("hourly arrays differ in length");
        assert!(err.to_string().contains("hourly arrays differ"));
    }
}
