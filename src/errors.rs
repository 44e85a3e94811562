//! src/errors.rs

use thiserror::Error;

/// Terminal outcome of a failed review call. None of these are retried by the client.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The request never reached the server or no response came back.
    #[error("could not reach review server: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("review server answered with status {status}: {body}")]
    Server { status: u16, body: String },

    /// The exchange succeeded but the body was empty or not the expected shape.
    #[error("malformed review response: {message}")]
    Protocol {
        message: String,
        body: Option<String>,
    },

    /// A well-formed response that reports its own failure.
    #[error("review failed: {0}")]
    Application(String),
}

impl ReviewError {
    pub fn protocol(message: impl Into<String>, body: Option<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            body,
        }
    }

    /// Short name of the failure class, used in logs and error documents.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::Protocol { .. } => "protocol",
            Self::Application(_) => "application",
        }
    }

    /// Raw response body kept around for display, when there is one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Server { body, .. } => Some(body),
            Self::Protocol { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}
