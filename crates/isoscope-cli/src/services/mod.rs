//! Clients for the remote services: UniProt, AlphaFold DB, ESMFold and a translation
//! endpoint. All of them share one [`HttpClient`].

pub mod alphafold;
pub mod esmfold;
pub mod http;
pub mod translation;
pub mod uniprot;

pub use alphafold::AlphaFoldClient;
pub use esmfold::EsmFoldClient;
pub use http::HttpClient;
pub use translation::Translator;
pub use uniprot::UniProtClient;

use isoscope::core::models::SchemaError;
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status} for {url}: {body}")]
    Status {
        service: &'static str,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("{service} is still rate limiting after {attempts} attempt(s): {url}")]
    RateLimited {
        service: &'static str,
        url: String,
        attempts: u32,
    },

    #[error("{service} returned an empty response for {url}")]
    EmptyResponse { service: &'static str, url: String },

    #[error("Unexpected {service} response: {source}")]
    Schema {
        service: &'static str,
        #[source]
        source: SchemaError,
    },

    #[error("Request cancelled")]
    Cancelled,
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Receiving side of a cancellation signal; the paired [`watch::Sender`] flips it to `true`.
#[derive(Debug, Clone)]
pub struct Cancellation {
    receiver: watch::Receiver<bool>,
}

impl Cancellation {
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (sender, receiver) = watch::channel(false);
        (sender, Self { receiver })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation is requested. Never resolves if the sender is dropped
    /// without cancelling.
    pub async fn cancelled(&mut self) {
        if self.receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancellation_resolves_after_signal() {
        let (sender, mut cancellation) = Cancellation::channel();
        assert!(!cancellation.is_cancelled());
        sender.send(true).unwrap();
        cancellation.cancelled().await;
        assert!(cancellation.is_cancelled());
    }

    #[tokio::test]
    async fn dropped_sender_does_not_cancel() {
        let (sender, mut cancellation) = Cancellation::channel();
        drop(sender);
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(50), cancellation.cancelled())
                .await;
        assert!(waited.is_err());
    }

    #[test]
    fn not_found_is_detected_from_status() {
        let err = ServiceError::Status {
            service: "AlphaFold",
            url: "http://x".into(),
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert!(err.is_not_found());
        assert!(!ServiceError::Cancelled.is_not_found());
    }
}
