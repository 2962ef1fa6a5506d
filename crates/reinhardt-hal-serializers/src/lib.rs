//! HAL serializers for Reinhardt
//!
//! Renders model records as HAL documents: hyperlinks grouped under
//! `_links`, plain attributes at the top level and related resources inlined
//! under `_embedded` while nesting depth remains.
//!
//! ## Examples
//!
//! ```
//! use reinhardt_hal_serializers::{
//!     HalMeta, HalModelSerializer, ModelField, ModelInfo, ModelRegistry, NestedFields, Record,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = ModelRegistry::new()
//!     .with_model(
//!         ModelInfo::new("owner")
//!             .field(ModelField::attribute("id"))
//!             .field(ModelField::attribute("name"))
//!             .field(ModelField::attribute("email")),
//!     )
//!     .unwrap()
//!     .with_model(
//!         ModelInfo::new("pet")
//!             .field(ModelField::attribute("id"))
//!             .field(ModelField::attribute("name"))
//!             .field(ModelField::foreign_key("owner", "owner")),
//!     )
//!     .unwrap();
//!
//! let serializer = HalModelSerializer::new(Arc::new(registry), "pet")
//!     .unwrap()
//!     .with_meta(
//!         HalMeta::new().with_nested_fields(NestedFields::new().relation(
//!             "owner",
//!             ["name"],
//!             NestedFields::new(),
//!         )),
//!     );
//!
//! let owner = Record::new("owner")
//!     .with_value("id", 3)
//!     .with_value("name", "Ann")
//!     .with_value("email", "ann@example.com");
//! let pet = Record::new("pet")
//!     .with_value("id", 1)
//!     .with_value("name", "Rex")
//!     .with_one("owner", Some(owner));
//!
//! assert_eq!(
//!     serializer.to_representation(&pet).unwrap(),
//!     json!({
//!         "_links": {
//!             "self": {"href": "/pet/1/"},
//!             "owner": {"href": "/owner/3/"}
//!         },
//!         "id": 1,
//!         "name": "Rex",
//!         "_embedded": {
//!             "owner": {
//!                 "_links": {"self": {"href": "/owner/3/"}},
//!                 "name": "Ann"
//!             }
//!         }
//!     })
//! );
//! ```

pub mod error;
pub mod fields;
pub mod groups;
pub mod meta;
pub mod model;
pub mod nested_config;
pub mod record;
pub mod reverse;
pub mod serializer;

pub use error::{SerializerError, SerializerResult};
pub use fields::{
	AttributeField, Field, FieldClass, HyperlinkedIdentityField, HyperlinkedRelatedField, LinkValue,
	NestedField,
};
pub use groups::{HalEmbeddedSerializer, HalFieldGroups, HalLinksSerializer, LinkSource};
pub use meta::{ExtraKwargs, HalMeta};
pub use model::{FieldKind, ModelField, ModelInfo, ModelRegistry, RelationInfo};
pub use nested_config::{NestedFieldSpec, NestedFields};
pub use record::{Record, Related};
pub use reverse::{RouteTable, UrlReverser};
pub use serializer::{HalModelSerializer, Serializer, self_link};
