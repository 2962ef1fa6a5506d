//! URL reversal for generated hrefs

use crate::error::{SerializerError, SerializerResult};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reinhardt_hal_conf::HalSettings;
use std::collections::HashMap;
use url::Url;

/// Characters escaped when a lookup value becomes a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}')
	.add(b'/')
	.add(b'%')
	.add(b'\\');

/// Encode `value` as one path segment
///
/// Dot segments cannot be escaped and are rejected.
pub fn encode_path_segment(value: &str) -> Result<String, String> {
	if value.is_empty() || value == "." || value == ".." {
		return Err(format!("'{}' is not a valid path segment", value));
	}
	Ok(utf8_percent_encode(value, PATH_SEGMENT).to_string())
}

/// Whether a raw parameter value can be substituted without changing the path
fn is_safe_param(value: &str) -> bool {
	!value.is_empty()
		&& value != "."
		&& value != ".."
		&& !value.contains(['/', '?', '#', '\\'])
		&& !value.chars().any(char::is_whitespace)
}

/// Trait for URL reversal functionality
///
/// Implement this trait to plug a router into HAL serializers. The
/// abstraction keeps serializers independent of any routing crate.
///
/// # Example
///
/// ```rust,no_run,ignore
/// use std::collections::HashMap;
/// use reinhardt_hal_serializers::UrlReverser;
///
/// impl UrlReverser for MyRouter {
///     fn reverse(&self, name: &str, params: &HashMap<String, String>) -> Result<String, String> {
///         self.reverse(name, params).map_err(|e| e.to_string())
///     }
/// }
/// ```
pub trait UrlReverser: Send + Sync {
	/// Reverse a URL name to a path with parameters
	///
	/// # Arguments
	///
	/// * `name` - The route name
	/// * `params` - Map of parameter names to values
	///
	/// # Returns
	///
	/// The resolved URL or an error message
	fn reverse(&self, name: &str, params: &HashMap<String, String>) -> Result<String, String>;
}

/// Table of named path patterns
///
/// Patterns use `{param}` placeholders. When a base URL is set, reversed
/// paths are joined onto it and returned as absolute URLs. Parameter values
/// must already be path-safe: separators, query and fragment delimiters,
/// whitespace and dot segments are rejected.
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::{RouteTable, UrlReverser};
/// use std::collections::HashMap;
///
/// let routes = RouteTable::new()
///     .with_base_url("http://api.example.com/")
///     .unwrap()
///     .route("book-detail", "/books/{id}/");
///
/// let params = HashMap::from([("id".to_string(), "42".to_string())]);
/// assert_eq!(
///     routes.reverse("book-detail", &params).unwrap(),
///     "http://api.example.com/books/42/"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	base_url: Option<Url>,
	routes: HashMap<String, String>,
}

impl RouteTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Produce absolute URLs below `base_url`
	pub fn with_base_url(mut self, base_url: &str) -> SerializerResult<Self> {
		let url = Url::parse(base_url).map_err(|e| {
			SerializerError::ImproperlyConfigured(format!("invalid base URL '{}': {}", base_url, e))
		})?;
		self.base_url = Some(url);
		Ok(self)
	}

	/// Empty table using the configured base URL, if any
	pub fn from_settings(settings: &HalSettings) -> SerializerResult<Self> {
		match &settings.base_url {
			Some(base_url) => Self::new().with_base_url(base_url),
			None => Ok(Self::new()),
		}
	}

	/// Register a named pattern
	pub fn route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
		self.routes.insert(name.into(), pattern.into());
		self
	}

	pub fn contains(&self, name: &str) -> bool {
		self.routes.contains_key(name)
	}

	fn substitute(pattern: &str, params: &HashMap<String, String>) -> Result<String, String> {
		let mut path = String::with_capacity(pattern.len());
		let mut rest = pattern;

		while let Some(start) = rest.find('{') {
			path.push_str(&rest[..start]);
			let after = &rest[start + 1..];
			let end = after
				.find('}')
				.ok_or_else(|| format!("unterminated placeholder in pattern '{}'", pattern))?;
			let name = &after[..end];
			let value = params
				.get(name)
				.ok_or_else(|| format!("missing parameter '{}'", name))?;
			if !is_safe_param(value) {
				return Err(format!(
					"invalid value for parameter '{}': contains path separators, query delimiters or dot segments",
					name
				));
			}
			path.push_str(value);
			rest = &after[end + 1..];
		}
		path.push_str(rest);

		Ok(path)
	}
}

impl UrlReverser for RouteTable {
	fn reverse(&self, name: &str, params: &HashMap<String, String>) -> Result<String, String> {
		let pattern = self
			.routes
			.get(name)
			.ok_or_else(|| format!("no route named '{}'", name))?;
		let path = Self::substitute(pattern, params)?;

		match &self.base_url {
			Some(base) => base
				.join(&path)
				.map(|url| url.to_string())
				.map_err(|e| e.to_string()),
			None => Ok(path),
		}
	}
}

/// Reverse `view_name` for a lookup value
///
/// The lookup value is percent-encoded as a single path segment before it
/// reaches the reverser. Without a reverser, falls back to simple
/// path-based URL generation.
pub(crate) fn reverse_href(
	reverser: Option<&dyn UrlReverser>,
	view_name: &str,
	lookup_url_kwarg: &str,
	lookup_value: String,
	model: &str,
) -> SerializerResult<String> {
	let lookup_value =
		encode_path_segment(&lookup_value).map_err(|message| SerializerError::UrlReversal {
			view_name: view_name.to_string(),
			message,
		})?;
	match reverser {
		Some(reverser) => {
			let params = HashMap::from([(lookup_url_kwarg.to_string(), lookup_value)]);
			reverser
				.reverse(view_name, &params)
				.map_err(|message| SerializerError::UrlReversal {
					view_name: view_name.to_string(),
					message,
				})
		}
		None => Ok(format!("/{}/{}/", model, lookup_value)),
	}
}
