//! Link and embedded groups of a HAL representation
//!
//! [`HalModelSerializer::partition_fields`](crate::HalModelSerializer::partition_fields)
//! splits the fields of a serializer into a [`HalLinksSerializer`], plain
//! attributes and a [`HalEmbeddedSerializer`]. Rendering emits the groups in
//! that order.

use crate::error::SerializerResult;
use crate::fields::{AttributeField, Field, NestedField};
use crate::record::Record;
use crate::reverse::UrlReverser;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Source of one entry in the links group
#[derive(Debug, Clone)]
pub enum LinkSource {
	/// Related, many-related or identity field
	Field(Field),
	/// Parallel link of an embedded relation
	Embedded(NestedField),
}

/// Renders the `_links` group
///
/// Every entry renders as a link object `{"href": ...}`, or an array of link
/// objects for to-many relations.
#[derive(Debug, Clone, Default)]
pub struct HalLinksSerializer {
	fields: IndexMap<String, LinkSource>,
}

impl HalLinksSerializer {
	pub fn new(fields: IndexMap<String, LinkSource>) -> Self {
		Self { fields }
	}

	pub fn field_names(&self) -> Vec<&str> {
		self.fields.keys().map(String::as_str).collect()
	}

	pub fn fields(&self) -> &IndexMap<String, LinkSource> {
		&self.fields
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn to_representation(
		&self,
		record: &Record,
		reverser: Option<&dyn UrlReverser>,
	) -> SerializerResult<Value> {
		let mut links = Map::new();
		for (name, source) in &self.fields {
			let link = match source {
				LinkSource::Field(field) => field.to_link(record, reverser)?,
				LinkSource::Embedded(nested) => nested.to_link(record)?,
			};
			if let Some(link) = link {
				links.insert(name.clone(), link.to_hal());
			}
		}
		Ok(Value::Object(links))
	}
}

/// Renders the `_embedded` group
#[derive(Debug, Clone, Default)]
pub struct HalEmbeddedSerializer {
	fields: IndexMap<String, NestedField>,
}

impl HalEmbeddedSerializer {
	pub fn new(fields: IndexMap<String, NestedField>) -> Self {
		Self { fields }
	}

	pub fn field_names(&self) -> Vec<&str> {
		self.fields.keys().map(String::as_str).collect()
	}

	pub fn fields(&self) -> &IndexMap<String, NestedField> {
		&self.fields
	}

	pub fn to_representation(&self, record: &Record) -> SerializerResult<Value> {
		let mut embedded = Map::new();
		for (name, nested) in &self.fields {
			embedded.insert(name.clone(), nested.to_embedded(record)?);
		}
		Ok(Value::Object(embedded))
	}
}

/// Fields of a HAL serializer partitioned into output groups
#[derive(Debug, Clone)]
pub struct HalFieldGroups {
	pub(crate) links_key: String,
	pub(crate) embedded_key: String,
	pub links: Option<HalLinksSerializer>,
	pub fields: IndexMap<String, AttributeField>,
	pub embedded: Option<HalEmbeddedSerializer>,
}

impl HalFieldGroups {
	/// Output keys in rendering order
	pub fn keys(&self) -> Vec<&str> {
		let mut keys = Vec::with_capacity(self.fields.len() + 2);
		if self.links.is_some() {
			keys.push(self.links_key.as_str());
		}
		keys.extend(self.fields.keys().map(String::as_str));
		if self.embedded.is_some() {
			keys.push(self.embedded_key.as_str());
		}
		keys
	}

	/// Render `record`: links first, then plain attributes, then embedded
	pub fn render(&self, record: &Record, reverser: Option<&dyn UrlReverser>) -> SerializerResult<Value> {
		let mut representation = Map::new();

		if let Some(links) = &self.links {
			representation.insert(self.links_key.clone(), links.to_representation(record, reverser)?);
		}

		for (name, field) in &self.fields {
			representation.insert(name.clone(), field.to_representation(record));
		}

		if let Some(embedded) = &self.embedded {
			representation.insert(self.embedded_key.clone(), embedded.to_representation(record)?);
		}

		Ok(Value::Object(representation))
	}
}
