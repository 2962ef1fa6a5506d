//! # Reinhardt HAL
//!
//! HAL (Hypertext Application Language) support for Reinhardt REST APIs.
//!
//! Model records are rendered as HAL documents: hyperlinks under `_links`,
//! plain attributes at the top level and related resources inlined under
//! `_embedded` while nesting depth remains.
//!
//! ## Feature Flags
//!
//! - `minimal` - Settings and serializers only
//! - `full` (default) - Everything below
//! - `parsers` - HAL JSON request body parser
//! - `renderers` - HAL JSON response renderer
//! - `pagination` - Page number pagination producing HAL collections
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_hal::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = ModelRegistry::new()
//!     .with_model(
//!         ModelInfo::new("tag")
//!             .field(ModelField::attribute("id"))
//!             .field(ModelField::attribute("label")),
//!     )
//!     .unwrap();
//! let routes = RouteTable::new().route("tag-detail", "/tags/{id}/");
//!
//! let serializer = HalModelSerializer::new(Arc::new(registry), "tag")
//!     .unwrap()
//!     .with_url_reverser(Arc::new(routes));
//! let tag = Record::new("tag").with_value("id", 4).with_value("label", "rust");
//!
//! assert_eq!(
//!     serializer.to_representation(&tag).unwrap(),
//!     json!({"_links": {"self": {"href": "/tags/4/"}}, "id": 4, "label": "rust"})
//! );
//! ```

/// Layered HAL settings
pub mod conf {
	pub use reinhardt_hal_conf::*;
}

/// HAL model serializers
pub mod serializers {
	pub use reinhardt_hal_serializers::*;
}

#[cfg(feature = "parsers")]
pub mod parsers {
	pub use reinhardt_hal_parsers::*;
}

#[cfg(feature = "renderers")]
pub mod renderers {
	pub use reinhardt_hal_renderers::*;
}

#[cfg(feature = "pagination")]
pub mod pagination {
	pub use reinhardt_hal_pagination::*;
}

pub use reinhardt_hal_conf::{HalSettings, SettingsBuilder, SettingsError, configure, hal_settings};
pub use reinhardt_hal_serializers::{
	HalMeta, HalModelSerializer, ModelField, ModelInfo, ModelRegistry, NestedFields, Record,
	RouteTable, SerializerError, UrlReverser,
};

pub mod prelude {
	pub use reinhardt_hal_conf::{HalSettings, hal_settings};
	pub use reinhardt_hal_serializers::{
		ExtraKwargs, Field, HalMeta, HalModelSerializer, HyperlinkedIdentityField,
		HyperlinkedRelatedField, ModelField, ModelInfo, ModelRegistry, NestedFields, Record,
		Related, RouteTable, Serializer, SerializerError, UrlReverser, self_link,
	};

	#[cfg(feature = "parsers")]
	pub use reinhardt_hal_parsers::{HalJsonParser, ParseError, Parser};

	#[cfg(feature = "renderers")]
	pub use reinhardt_hal_renderers::{HalJsonRenderer, RenderError, Renderer, RendererContext};

	#[cfg(feature = "pagination")]
	pub use reinhardt_hal_pagination::{HalPage, HalPageNumberPagination, PaginationError};
}
