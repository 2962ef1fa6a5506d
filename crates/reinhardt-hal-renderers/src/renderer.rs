//! Renderer trait, context and errors

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

/// Error type for response rendering
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Per-response rendering options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererContext {
	/// Indentation width, compact output when `None`
	pub indent: Option<usize>,
}

impl RendererContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_indent(mut self, indent: usize) -> Self {
		self.indent = Some(indent);
		self
	}
}

/// Response body renderer
#[async_trait]
pub trait Renderer: Send + Sync {
	/// Media type of rendered bodies
	fn media_type(&self) -> String;

	/// All media types this renderer can produce
	fn media_types(&self) -> Vec<String> {
		vec![self.media_type()]
	}

	/// Short format name used for `?format=` style selection
	fn format(&self) -> Option<&str> {
		None
	}

	async fn render(&self, data: &Value, context: Option<&RendererContext>) -> RenderResult<Bytes>;
}
