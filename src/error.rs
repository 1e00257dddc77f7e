//! Errors at the crate's fallible edges: provider input and configuration.
//!
//! Graph queries and the layout never fail; they degrade to empty results.

use thiserror::Error;

/// Errors from the provider boundary and configuration parsing.
#[derive(Error, Debug)]
pub enum Error {
	/// Malformed JSON document.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A data provider could not produce a graph.
	#[error("Provider error: {0}")]
	Provider(String),

	/// Configuration error.
	#[error("Configuration error: {0}")]
	Config(String),
}

impl Error {
	/// A [`Error::Provider`] from any message.
	pub fn provider(msg: impl Into<String>) -> Self {
		Self::Provider(msg.into())
	}

	/// A [`Error::Config`] from any message.
	pub fn config(msg: impl Into<String>) -> Self {
		Self::Config(msg.into())
	}
}

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;
