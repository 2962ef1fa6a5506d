//! Configuration sources for layered HAL settings
//!
//! Sources are merged in priority order
//! (environment variables > TOML files > defaults).

use crate::settings::{HalSettings, SettingsError};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Invalid source: {0}")]
	InvalidSource(String),
}

/// Built-in defaults, the lowest priority layer
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	defaults: HalSettings,
}

impl DefaultSource {
	/// Defaults of [`HalSettings`]
	pub fn new() -> Self {
		Self::default()
	}

	/// Use custom defaults instead of the built-in ones
	pub fn with_defaults(defaults: HalSettings) -> Self {
		Self { defaults }
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		match serde_json::to_value(&self.defaults)? {
			Value::Object(map) => Ok(map.into_iter().collect()),
			other => Err(SourceError::InvalidSource(format!(
				"defaults serialized to non-object value: {}",
				other
			))),
		}
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default settings".to_string()
	}
}

/// TOML file source
///
/// Settings may live at the top level of the file or inside a `[hal]` table.
pub struct TomlFileSource {
	path: PathBuf,
	required: bool,
}

impl TomlFileSource {
	/// Create a source reading the given file
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_conf::TomlFileSource;
	///
	/// // a missing file yields no settings instead of an error
	/// let source = TomlFileSource::new("settings/hal.toml").optional();
	/// ```
	pub fn new(path: impl AsRef<Path>) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			required: true,
		}
	}

	/// Treat a missing file as an empty source
	pub fn optional(mut self) -> Self {
		self.required = false;
		self
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			if self.required {
				return Err(SourceError::InvalidSource(format!(
					"settings file not found: {}",
					self.path.display()
				)));
			}
			tracing::debug!(path = %self.path.display(), "optional settings file missing");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let mut table: toml::Table = toml::from_str(&content)?;

		if let Some(toml::Value::Table(hal)) = table.remove("hal") {
			table = hal;
		}

		match serde_json::to_value(table)? {
			Value::Object(map) => Ok(map.into_iter().collect()),
			_ => Ok(IndexMap::new()),
		}
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Environment variable source
///
/// `HAL_DEFAULT_DEPTH=2` maps to the `default_depth` setting.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	/// Create a source reading `HAL_`-prefixed variables
	pub fn new() -> Self {
		Self {
			prefix: "HAL_".to_string(),
		}
	}

	/// Set a different prefix filter for environment variables
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_conf::EnvSource;
	///
	/// let source = EnvSource::new().with_prefix("API_HAL_");
	/// ```
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	fn parse_value(value: String) -> Value {
		if let Ok(num) = value.parse::<i64>() {
			return Value::Number(num.into());
		}
		match value.trim().to_lowercase().as_str() {
			"true" | "yes" | "on" => Value::Bool(true),
			"false" | "no" | "off" => Value::Bool(false),
			_ => Value::String(value),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();

		for (key, value) in std::env::vars() {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			config.insert(clean_key.to_lowercase(), Self::parse_value(value));
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// Merges configuration sources into validated [`HalSettings`]
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Create an empty builder
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a configuration source
	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge all sources in ascending priority and return the raw mapping
	pub fn merged(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut ordered: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
		ordered.sort_by_key(|s| s.priority());

		let mut merged = IndexMap::new();
		for source in ordered {
			let values = source.load()?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded settings source"
			);
			merged.extend(values);
		}
		Ok(merged)
	}

	/// Build and validate the settings
	pub fn build(&self) -> Result<HalSettings, SettingsError> {
		let merged = self.merged()?;
		let object: serde_json::Map<String, Value> = merged.into_iter().collect();
		let settings: HalSettings = serde_json::from_value(Value::Object(object))?;
		settings.validate()?;
		Ok(settings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;
	use std::io::Write;

	#[rstest]
	fn test_default_source_contains_every_setting() {
		let values = DefaultSource::new().load().unwrap();
		assert_eq!(values["links_field_name"], "_links");
		assert_eq!(values["page_size"], 10);
		assert!(values.contains_key("base_url"));
	}

	#[rstest]
	fn test_toml_source_reads_hal_table() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[hal]\ndefault_depth = 2\nurl_field_name = \"url\"").unwrap();

		let values = TomlFileSource::new(file.path()).load().unwrap();
		assert_eq!(values["default_depth"], 2);
		assert_eq!(values["url_field_name"], "url");
	}

	#[rstest]
	fn test_toml_source_missing_required_file() {
		let result = TomlFileSource::new("/nonexistent/hal.toml").load();
		assert!(matches!(result, Err(SourceError::InvalidSource(_))));
	}

	#[rstest]
	fn test_toml_source_missing_optional_file() {
		let values = TomlFileSource::new("/nonexistent/hal.toml")
			.optional()
			.load()
			.unwrap();
		assert!(values.is_empty());
	}

	#[rstest]
	#[serial(env)]
	fn test_env_source_overrides_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "page_size = 25\ndefault_depth = 1").unwrap();

		// SAFETY: serialized with other environment-mutating tests
		unsafe { std::env::set_var("HALTEST_PAGE_SIZE", "50") };

		let settings = SettingsBuilder::new()
			.add_source(EnvSource::new().with_prefix("HALTEST_"))
			.add_source(DefaultSource::new())
			.add_source(TomlFileSource::new(file.path()))
			.build()
			.unwrap();

		unsafe { std::env::remove_var("HALTEST_PAGE_SIZE") };

		assert_eq!(settings.page_size, 50);
		assert_eq!(settings.default_depth, 1);
		assert_eq!(settings.links_field_name, "_links");
	}

	#[rstest]
	#[serial(env)]
	fn test_env_source_parses_booleans() {
		unsafe { std::env::set_var("HALBOOL_PRETTY_PRINT", "on") };
		let values = EnvSource::new().with_prefix("HALBOOL_").load().unwrap();
		unsafe { std::env::remove_var("HALBOOL_PRETTY_PRINT") };

		assert_eq!(values["pretty_print"], Value::Bool(true));
	}

	#[rstest]
	fn test_build_rejects_invalid_merged_settings() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "links_field_name = \"_embedded\"").unwrap();

		let result = SettingsBuilder::new()
			.add_source(DefaultSource::new())
			.add_source(TomlFileSource::new(file.path()))
			.build();

		assert!(matches!(result, Err(SettingsError::Validation { .. })));
	}
}
