//! `application/hal+json` request body parser

use async_trait::async_trait;
use bytes::Bytes;
use reinhardt_hal_conf::{HAL_JSON_MEDIA_TYPE, HalSettings, LINKS_FIELD_NAME};
use serde_json::{Map, Value};

use crate::parser::{ParseError, ParseResult, Parser};

/// HAL JSON parser for application/hal+json content type
///
/// Plain JSON objects are accepted as well. A document without a links
/// object gets an empty one so serializers always find the group.
#[derive(Debug, Clone)]
pub struct HalJsonParser {
	/// Whether to allow empty bodies (returns null)
	pub allow_empty: bool,
	links_field_name: String,
}

impl Default for HalJsonParser {
	fn default() -> Self {
		Self {
			allow_empty: false,
			links_field_name: LINKS_FIELD_NAME.to_string(),
		}
	}
}

impl HalJsonParser {
	/// Create a parser that rejects empty bodies
	///
	/// JSON without a finite number representation (`NaN`, `Infinity`) is
	/// already rejected by `serde_json`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_parsers::HalJsonParser;
	///
	/// let parser = HalJsonParser::new();
	/// assert!(!parser.allow_empty);
	/// assert_eq!(parser.links_field_name(), "_links");
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Use the links group name from `settings`
	pub fn from_settings(settings: &HalSettings) -> Self {
		Self {
			links_field_name: settings.links_field_name.clone(),
			..Self::default()
		}
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_parsers::HalJsonParser;
	///
	/// let parser = HalJsonParser::new().allow_empty(true);
	/// assert!(parser.allow_empty);
	/// ```
	pub fn allow_empty(mut self, allow: bool) -> Self {
		self.allow_empty = allow;
		self
	}

	pub fn links_field_name(&self) -> &str {
		&self.links_field_name
	}

	fn normalize(&self, mut document: Map<String, Value>) -> ParseResult<Value> {
		match document.get(&self.links_field_name) {
			None => {
				tracing::trace!(links = %self.links_field_name, "document has no links, injecting empty group");
				// keep the links group in front
				let mut normalized = Map::with_capacity(document.len() + 1);
				normalized.insert(self.links_field_name.clone(), Value::Object(Map::new()));
				normalized.append(&mut document);
				return Ok(Value::Object(normalized));
			}
			Some(Value::Object(_)) => {}
			Some(_) => {
				return Err(ParseError::ParseError(format!(
					"'{}' must be an object",
					self.links_field_name
				)));
			}
		}
		Ok(Value::Object(document))
	}
}

#[async_trait]
impl Parser for HalJsonParser {
	fn media_types(&self) -> Vec<String> {
		vec![HAL_JSON_MEDIA_TYPE.to_string(), "application/json".to_string()]
	}

	async fn parse(&self, content_type: Option<&str>, body: Bytes) -> ParseResult<Value> {
		if let Some(content_type) = content_type
			&& !self.can_parse(Some(content_type))
		{
			return Err(ParseError::UnsupportedMediaType(content_type.to_string()));
		}

		if body.is_empty() {
			if self.allow_empty {
				return Ok(Value::Null);
			}
			return Err(ParseError::EmptyBody);
		}

		let value = serde_json::from_slice::<Value>(&body)
			.map_err(|e| ParseError::ParseError(format!("Invalid JSON: {}", e)))?;

		match value {
			Value::Object(document) => self.normalize(document),
			other => Err(ParseError::ParseError(format!(
				"HAL document must be a JSON object, got {}",
				json_type_name(&other)
			))),
		}
	}
}

fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
