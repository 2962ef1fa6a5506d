//! # reinhardt-hal-conf
//!
//! Settings for HAL (Hypertext Application Language) serialization.
//!
//! Settings are assembled from layered sources in priority order
//! (environment variables > TOML files > defaults) and validated before use.
//!
//! ## Examples
//!
//! ```
//! use reinhardt_hal_conf::{DefaultSource, SettingsBuilder};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(DefaultSource::new())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.links_field_name, "_links");
//! assert_eq!(settings.embedded_field_name, "_embedded");
//! assert_eq!(settings.url_field_name, "self");
//! ```

pub mod settings;
pub mod sources;

pub use settings::{HalSettings, SettingsError, configure, hal_settings};
pub use sources::{
	ConfigSource, DefaultSource, EnvSource, SettingsBuilder, SourceError, TomlFileSource,
};

/// Reserved key holding hyperlinks in a HAL document
pub const LINKS_FIELD_NAME: &str = "_links";

/// Reserved key holding inlined resources in a HAL document
pub const EMBEDDED_FIELD_NAME: &str = "_embedded";

/// Link relation naming the resource itself
pub const URL_FIELD_NAME: &str = "self";

/// Media type of HAL JSON documents
pub const HAL_JSON_MEDIA_TYPE: &str = "application/hal+json";
