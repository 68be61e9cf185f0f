use thiserror::Error;

/// Failure talking to the content source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The request never produced a response.
	#[error("content source unreachable: {0}")]
	Network(String),
	/// The source answered with a non-2xx status.
	#[error("content source returned {status}: {message}")]
	Status { status: u16, message: String },
	/// The body was not the expected JSON, even after extraction.
	#[error("malformed reply from content source: {0}")]
	Malformed(String),
}

impl FetchError {
	/// Network-class failures: no response, or an error status.
	pub fn is_network(&self) -> bool {
		matches!(self, FetchError::Network(_) | FetchError::Status { .. })
	}
}

/// Errors surfaced by the mind-map controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MindMapError {
	#[error("Please enter a topic.")]
	EmptyTopic,
}
