//! `application/hal+json` response renderer

use async_trait::async_trait;
use bytes::Bytes;
use reinhardt_hal_conf::{HAL_JSON_MEDIA_TYPE, HalSettings};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::renderer::{RenderResult, Renderer, RendererContext};

const PRETTY_INDENT: usize = 2;

/// HAL JSON renderer for REST API responses
#[derive(Debug, Clone, Default)]
pub struct HalJsonRenderer {
	/// Indentation used when the context does not set one
	pub indent: Option<usize>,
}

impl HalJsonRenderer {
	/// Creates a renderer producing compact output
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_renderers::HalJsonRenderer;
	///
	/// let renderer = HalJsonRenderer::new();
	/// assert_eq!(renderer.indent, None);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Indent output by `indent` spaces per level
	pub fn indent(mut self, indent: usize) -> Self {
		self.indent = Some(indent);
		self
	}

	/// Pretty-print when `settings.pretty_print` is set
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_conf::HalSettings;
	/// use reinhardt_hal_renderers::HalJsonRenderer;
	///
	/// let settings = HalSettings { pretty_print: true, ..HalSettings::default() };
	/// assert_eq!(HalJsonRenderer::from_settings(&settings).indent, Some(2));
	/// ```
	pub fn from_settings(settings: &HalSettings) -> Self {
		Self {
			indent: settings.pretty_print.then_some(PRETTY_INDENT),
		}
	}

	fn to_bytes(data: &Value, indent: Option<usize>) -> RenderResult<Vec<u8>> {
		match indent {
			None => Ok(serde_json::to_vec(data)?),
			Some(width) => {
				let indent = vec![b' '; width];
				let mut out = Vec::new();
				let mut ser =
					serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
				data.serialize(&mut ser)?;
				Ok(out)
			}
		}
	}
}

#[async_trait]
impl Renderer for HalJsonRenderer {
	fn media_type(&self) -> String {
		HAL_JSON_MEDIA_TYPE.to_string()
	}

	fn media_types(&self) -> Vec<String> {
		vec![HAL_JSON_MEDIA_TYPE.to_string(), "application/json".to_string()]
	}

	fn format(&self) -> Option<&str> {
		Some("hal")
	}

	async fn render(&self, data: &Value, context: Option<&RendererContext>) -> RenderResult<Bytes> {
		if data.is_null() {
			return Ok(Bytes::new());
		}

		let indent = context.and_then(|c| c.indent).or(self.indent);
		let body = Self::to_bytes(data, indent)?;
		tracing::trace!(bytes = body.len(), indent = ?indent, "rendered HAL document");
		Ok(Bytes::from(body))
	}
}
