//! HAL settings and their validation

use crate::sources::SourceError;
use crate::{EMBEDDED_FIELD_NAME, LINKS_FIELD_NAME, URL_FIELD_NAME};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static SETTINGS: OnceCell<HalSettings> = OnceCell::new();

/// Error type for settings assembly and validation
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Source error: {0}")]
	Source(#[from] SourceError),

	#[error("Invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid value for '{key}': {message}")]
	Validation { key: String, message: String },

	#[error("Settings have already been configured")]
	AlreadyConfigured,
}

impl SettingsError {
	fn validation(key: &str, message: impl Into<String>) -> Self {
		Self::Validation {
			key: key.to_string(),
			message: message.into(),
		}
	}
}

/// Settings controlling HAL document shape, link generation and pagination
///
/// # Examples
///
/// ```
/// use reinhardt_hal_conf::HalSettings;
///
/// let settings = HalSettings::default();
/// assert_eq!(settings.default_depth, 0);
/// assert_eq!(settings.page_size, 10);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalSettings {
	/// Key of the hyperlink group
	pub links_field_name: String,
	/// Key of the inlined resources group
	pub embedded_field_name: String,
	/// Name of the identity link inside the hyperlink group
	pub url_field_name: String,
	/// Relation hops expanded into embedded content when a serializer
	/// declares no depth of its own
	pub default_depth: usize,
	/// Absolute URL prefix for generated hrefs
	pub base_url: Option<String>,
	/// Default page size for paginated collections
	pub page_size: usize,
	/// Query parameter carrying the page number
	pub page_query_param: String,
	/// Query parameter allowing clients to choose the page size
	pub page_size_query_param: Option<String>,
	/// Upper bound for client-chosen page sizes
	pub max_page_size: Option<usize>,
	/// Key of the embedded collection in paginated responses
	pub items_field_name: String,
	/// Render documents with indentation
	pub pretty_print: bool,
}

impl Default for HalSettings {
	fn default() -> Self {
		Self {
			links_field_name: LINKS_FIELD_NAME.to_string(),
			embedded_field_name: EMBEDDED_FIELD_NAME.to_string(),
			url_field_name: URL_FIELD_NAME.to_string(),
			default_depth: 0,
			base_url: None,
			page_size: 10,
			page_query_param: "page".to_string(),
			page_size_query_param: None,
			max_page_size: None,
			items_field_name: "items".to_string(),
			pretty_print: false,
		}
	}
}

impl HalSettings {
	/// Check internal consistency of the settings
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_conf::HalSettings;
	///
	/// let mut settings = HalSettings::default();
	/// settings.embedded_field_name = "_links".to_string();
	/// assert!(settings.validate().is_err());
	/// ```
	pub fn validate(&self) -> Result<(), SettingsError> {
		let reserved = [
			("links_field_name", &self.links_field_name),
			("embedded_field_name", &self.embedded_field_name),
			("url_field_name", &self.url_field_name),
			("page_query_param", &self.page_query_param),
			("items_field_name", &self.items_field_name),
		];
		for (key, value) in reserved {
			if value.trim().is_empty() {
				return Err(SettingsError::validation(key, "must not be empty"));
			}
		}

		let names = [
			("links_field_name", &self.links_field_name),
			("embedded_field_name", &self.embedded_field_name),
			("url_field_name", &self.url_field_name),
		];
		for (i, (key, value)) in names.iter().enumerate() {
			if let Some((other, _)) = names[..i].iter().find(|(_, v)| v == value) {
				return Err(SettingsError::validation(
					*key,
					format!("collides with {} '{}'", other, value),
				));
			}
		}

		if self.page_size == 0 {
			return Err(SettingsError::validation("page_size", "must be positive"));
		}

		if let Some(max) = self.max_page_size
			&& max < self.page_size
		{
			return Err(SettingsError::validation(
				"max_page_size",
				format!("{} is smaller than page_size {}", max, self.page_size),
			));
		}

		if let Some(base_url) = &self.base_url {
			url::Url::parse(base_url)
				.map_err(|e| SettingsError::validation("base_url", e.to_string()))?;
		}

		Ok(())
	}
}

/// Install process-wide settings
///
/// Settings can be installed once; later calls fail with
/// [`SettingsError::AlreadyConfigured`].
pub fn configure(settings: HalSettings) -> Result<(), SettingsError> {
	settings.validate()?;
	SETTINGS
		.set(settings)
		.map_err(|_| SettingsError::AlreadyConfigured)?;
	tracing::debug!("HAL settings configured");
	Ok(())
}

/// Process-wide settings, or the defaults when none were installed
pub fn hal_settings() -> &'static HalSettings {
	SETTINGS.get_or_init(HalSettings::default)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_default_settings_are_valid() {
		let settings = HalSettings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.links_field_name, "_links");
		assert_eq!(settings.embedded_field_name, "_embedded");
		assert_eq!(settings.url_field_name, "self");
		assert_eq!(settings.items_field_name, "items");
	}

	#[rstest]
	#[case("links_field_name")]
	#[case("embedded_field_name")]
	#[case("url_field_name")]
	fn test_empty_reserved_name_rejected(#[case] key: &str) {
		let mut settings = HalSettings::default();
		match key {
			"links_field_name" => settings.links_field_name = " ".to_string(),
			"embedded_field_name" => settings.embedded_field_name = String::new(),
			_ => settings.url_field_name = String::new(),
		}

		let err = settings.validate().unwrap_err();
		assert!(matches!(err, SettingsError::Validation { key: k, .. } if k == key));
	}

	#[rstest]
	#[case("_links", "_embedded", "self", None)]
	#[case("_links", "_links", "self", Some("embedded_field_name"))]
	#[case("_links", "_embedded", "_links", Some("url_field_name"))]
	#[case("_links", "_embedded", "_embedded", Some("url_field_name"))]
	#[case("self", "_embedded", "self", Some("url_field_name"))]
	fn test_reserved_names_pairwise_distinct(
		#[case] links: &str,
		#[case] embedded: &str,
		#[case] url: &str,
		#[case] rejected: Option<&str>,
	) {
		let settings = HalSettings {
			links_field_name: links.to_string(),
			embedded_field_name: embedded.to_string(),
			url_field_name: url.to_string(),
			..Default::default()
		};

		match rejected {
			None => assert!(settings.validate().is_ok()),
			Some(key) => {
				let err = settings.validate().unwrap_err();
				assert!(matches!(err, SettingsError::Validation { key: k, .. } if k == key));
			}
		}
	}

	#[rstest]
	fn test_zero_page_size_rejected() {
		let settings = HalSettings {
			page_size: 0,
			..Default::default()
		};
		assert!(settings.validate().is_err());
	}

	#[rstest]
	fn test_max_page_size_below_page_size_rejected() {
		let settings = HalSettings {
			page_size: 20,
			max_page_size: Some(5),
			..Default::default()
		};
		assert!(settings.validate().is_err());
	}

	#[rstest]
	#[case(Some("http://api.example.com/"), true)]
	#[case(Some("not a url"), false)]
	#[case(None, true)]
	fn test_base_url_validation(#[case] base_url: Option<&str>, #[case] valid: bool) {
		let settings = HalSettings {
			base_url: base_url.map(str::to_string),
			..Default::default()
		};
		assert_eq!(settings.validate().is_ok(), valid);
	}

	#[rstest]
	fn test_partial_deserialization_keeps_defaults() {
		let settings: HalSettings =
			serde_json::from_value(serde_json::json!({"default_depth": 2})).unwrap();
		assert_eq!(settings.default_depth, 2);
		assert_eq!(settings.links_field_name, "_links");
	}
}
