//! Parser trait and errors

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

/// Error type for request body parsing
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("Empty request body")]
	EmptyBody,

	#[error("Unsupported media type: {0}")]
	UnsupportedMediaType(String),

	#[error("Parse error: {0}")]
	ParseError(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Request body parser
#[async_trait]
pub trait Parser: Send + Sync {
	/// Media types this parser accepts
	fn media_types(&self) -> Vec<String>;

	/// Parse a request body
	async fn parse(&self, content_type: Option<&str>, body: Bytes) -> ParseResult<Value>;

	/// Whether `content_type` is handled by this parser
	///
	/// Parameters such as `charset` are ignored and `type/*` patterns match
	/// any subtype.
	fn can_parse(&self, content_type: Option<&str>) -> bool {
		let Some(content_type) = content_type else {
			return false;
		};
		let essence = content_type
			.split(';')
			.next()
			.unwrap_or_default()
			.trim()
			.to_ascii_lowercase();

		self.media_types().iter().any(|media_type| {
			match media_type.strip_suffix("/*") {
				Some(main_type) => essence
					.split_once('/')
					.is_some_and(|(main, _)| main == main_type),
				None => *media_type == essence,
			}
		})
	}
}
