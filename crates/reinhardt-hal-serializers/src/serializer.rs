//! HalModelSerializer - HAL representation of model records
//!
//! Fields are derived from model metadata the way a hyperlinked model
//! serializer does it: the url field becomes an identity link, attributes
//! become plain fields and relations become hyperlinks, or nested
//! serializers while nesting depth remains. The fields are then partitioned
//! into `_links`, plain attributes and `_embedded`.

use crate::error::{SerializerError, SerializerResult};
use crate::fields::{
	AttributeField, Field, HyperlinkedIdentityField, HyperlinkedRelatedField, NestedField,
	parse_link,
};
use crate::groups::{HalEmbeddedSerializer, HalFieldGroups, HalLinksSerializer, LinkSource};
use crate::meta::HalMeta;
use crate::model::{ModelInfo, ModelRegistry, RelationInfo};
use crate::record::{Record, Related};
use crate::reverse::UrlReverser;
use indexmap::IndexMap;
use reinhardt_hal_conf::{HalSettings, hal_settings};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Conversion between an input type and its serialized form
pub trait Serializer {
	type Input;
	type Output;

	fn serialize(&self, input: &Self::Input) -> Result<Self::Output, SerializerError>;
	fn deserialize(&self, output: &Self::Output) -> Result<Self::Input, SerializerError>;
}

/// Serializer producing HAL representations of model records
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::{
///     HalModelSerializer, ModelField, ModelInfo, ModelRegistry, Record,
/// };
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = ModelRegistry::new()
///     .with_model(
///         ModelInfo::new("author")
///             .field(ModelField::attribute("id"))
///             .field(ModelField::attribute("name")),
///     )
///     .unwrap()
///     .with_model(
///         ModelInfo::new("book")
///             .field(ModelField::attribute("id"))
///             .field(ModelField::attribute("title"))
///             .field(ModelField::foreign_key("author", "author")),
///     )
///     .unwrap();
///
/// let serializer = HalModelSerializer::new(Arc::new(registry), "book").unwrap();
/// let book = Record::new("book")
///     .with_value("id", 1)
///     .with_value("title", "Dune")
///     .with_one(
///         "author",
///         Some(Record::new("author").with_value("id", 7).with_value("name", "Frank")),
///     );
///
/// assert_eq!(
///     serializer.to_representation(&book).unwrap(),
///     json!({
///         "_links": {
///             "self": {"href": "/book/1/"},
///             "author": {"href": "/author/7/"}
///         },
///         "id": 1,
///         "title": "Dune"
///     })
/// );
/// ```
#[derive(Clone)]
pub struct HalModelSerializer {
	model: Arc<ModelInfo>,
	registry: Arc<ModelRegistry>,
	meta: HalMeta,
	declared_fields: IndexMap<String, Field>,
	settings: Arc<HalSettings>,
	url_reverser: Option<Arc<dyn UrlReverser>>,
	include_links: bool,
}

impl fmt::Debug for HalModelSerializer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HalModelSerializer")
			.field("model", &self.model.name())
			.field("meta", &self.meta)
			.field("declared_fields", &self.declared_fields.keys().collect::<Vec<_>>())
			.field("has_url_reverser", &self.url_reverser.is_some())
			.field("include_links", &self.include_links)
			.finish()
	}
}

impl HalModelSerializer {
	/// Create a serializer for `model` using process-wide settings
	pub fn new(registry: Arc<ModelRegistry>, model: &str) -> SerializerResult<Self> {
		let model = registry.get(model)?;
		Ok(Self {
			model,
			registry,
			meta: HalMeta::new(),
			declared_fields: IndexMap::new(),
			settings: Arc::new(hal_settings().clone()),
			url_reverser: None,
			include_links: true,
		})
	}

	/// Set the meta configuration
	pub fn with_meta(mut self, meta: HalMeta) -> Self {
		self.meta = meta;
		self
	}

	/// Use explicit settings instead of the process-wide ones
	pub fn with_settings(mut self, settings: Arc<HalSettings>) -> Self {
		self.settings = settings;
		self
	}

	/// Reverse hrefs through `reverser`
	pub fn with_url_reverser(mut self, reverser: Arc<dyn UrlReverser>) -> Self {
		self.url_reverser = Some(reverser);
		self
	}

	/// Declare a field explicitly, overriding the generated one
	pub fn declare_field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
		self.declared_fields.insert(name.into(), field.into());
		self
	}

	/// Drop the links group from the output
	pub fn without_links(mut self) -> Self {
		self.include_links = false;
		self
	}

	pub fn model(&self) -> &ModelInfo {
		&self.model
	}

	pub fn meta(&self) -> &HalMeta {
		&self.meta
	}

	pub fn settings(&self) -> &HalSettings {
		&self.settings
	}

	pub fn url_reverser(&self) -> Option<&dyn UrlReverser> {
		self.url_reverser.as_deref()
	}

	/// Nesting depth of this serializer
	pub fn depth(&self) -> usize {
		self.meta.depth().unwrap_or(self.settings.default_depth)
	}

	/// Names of the fields this serializer renders, in order
	///
	/// The explicit field list (or the url field followed by every model
	/// field), then declared fields and `nested_fields` relations not yet
	/// listed, minus excluded fields.
	pub fn field_names(&self) -> SerializerResult<Vec<String>> {
		let url_field = &self.settings.url_field_name;
		let explicit = self.meta.fields().is_some();

		let mut names: Vec<String> = match self.meta.fields() {
			Some(fields) => fields.to_vec(),
			None => std::iter::once(url_field.clone())
				.chain(self.model.fields().iter().map(|f| f.name.clone()))
				.collect(),
		};

		for declared in self.declared_fields.keys() {
			if names.contains(declared) {
				continue;
			}
			if explicit {
				return Err(SerializerError::ImproperlyConfigured(format!(
					"field '{}' is declared on the '{}' serializer but not included in its fields",
					declared,
					self.model.name()
				)));
			}
			names.push(declared.clone());
		}

		for relation in self.meta.nested_fields().names() {
			if !names.iter().any(|n| n == relation) {
				names.push(relation.to_string());
			}
		}

		names.retain(|name| !self.meta.exclude().contains(name));
		Ok(names)
	}

	/// Build the fields of this serializer
	pub fn get_fields(&self) -> SerializerResult<IndexMap<String, Field>> {
		let depth = self.depth();
		let mut fields = IndexMap::new();

		for name in self.field_names()? {
			if let Some(declared) = self.declared_fields.get(&name) {
				fields.insert(name, declared.clone());
				continue;
			}

			let mut field = if name == self.settings.url_field_name {
				Field::HyperlinkedIdentity(self.build_url_field())
			} else {
				self.build_model_field(&name, depth)?
			};
			if let Some(kwargs) = self.meta.extra_kwargs(&name) {
				field.apply_extra_kwargs(kwargs);
			}
			fields.insert(name, field);
		}

		Ok(fields)
	}

	fn build_model_field(&self, name: &str, depth: usize) -> SerializerResult<Field> {
		let model_field = self
			.model
			.get_field(name)
			.ok_or_else(|| SerializerError::UnknownField {
				model: self.model.name().to_string(),
				field: name.to_string(),
			})?;

		match self.model.relation_info(name)? {
			None => {
				let mut field = AttributeField::new(name);
				field.read_only = model_field.read_only
					|| name == self.model.primary_key()
					|| self.meta.is_read_only(name);
				field.required = model_field.required;
				Ok(Field::Attribute(field))
			}
			Some(relation) if depth > 0 || self.meta.nested_fields().contains(name) => {
				self.build_nested_field(name, &relation, depth).map(Field::Nested)
			}
			Some(relation) => {
				let mut field = self.build_relational_field(name, &relation)?;
				field.read_only |= model_field.read_only || self.meta.is_read_only(name);
				field.required = model_field.required && !field.read_only;
				Ok(Field::HyperlinkedRelated(field))
			}
		}
	}

	/// Identity link of the model's detail view
	pub fn build_url_field(&self) -> HyperlinkedIdentityField {
		HyperlinkedIdentityField::new(self.model.view_name()).lookup_field(self.model.primary_key())
	}

	/// Hyperlink to the related model's detail view
	pub fn build_relational_field(
		&self,
		name: &str,
		relation: &RelationInfo,
	) -> SerializerResult<HyperlinkedRelatedField> {
		let related = self.registry.get(&relation.related_model)?;
		let mut field = HyperlinkedRelatedField::new(name, related.view_name())
			.lookup_field(related.primary_key())
			.related_model(related.name());
		field.many = relation.to_many;
		field.read_only = relation.reverse;
		Ok(field)
	}

	/// Nested HAL serializer for a relation, one depth unit shallower
	///
	/// A `nested_fields` entry for the relation selects the nested fields
	/// and configures the nested serializer's own relations. The identity
	/// link is always kept so the parent can link the embedded resource.
	pub fn build_nested_field(
		&self,
		name: &str,
		relation: &RelationInfo,
		depth: usize,
	) -> SerializerResult<NestedField> {
		let related = self.registry.get(&relation.related_model)?;
		let mut meta = HalMeta::new().with_depth(depth.saturating_sub(1));

		if let Some(spec) = self.meta.nested_fields().get(name) {
			let url_field = self.settings.url_field_name.clone();
			let mut fields = vec![url_field.clone()];
			fields.extend(spec.fields.iter().filter(|f| **f != url_field).cloned());
			meta = meta.with_fields(fields).with_nested_fields(spec.nested.clone());
		}

		tracing::debug!(
			model = %self.model.name(),
			relation = %name,
			related = %related.name(),
			depth = depth.saturating_sub(1),
			"building nested serializer"
		);

		let serializer = HalModelSerializer {
			model: related,
			registry: Arc::clone(&self.registry),
			meta,
			declared_fields: IndexMap::new(),
			settings: Arc::clone(&self.settings),
			url_reverser: self.url_reverser.clone(),
			include_links: true,
		};

		let mut field = NestedField::new(name, serializer);
		field.many = relation.to_many;
		Ok(field)
	}

	/// Identity field rendered under the url field name, if any
	pub fn identity_field(&self) -> SerializerResult<Option<HyperlinkedIdentityField>> {
		let url_field = &self.settings.url_field_name;

		if let Some(declared) = self.declared_fields.get(url_field) {
			return Ok(match declared {
				Field::HyperlinkedIdentity(field) => Some(field.clone()),
				_ => None,
			});
		}

		if !self.field_names()?.contains(url_field) {
			return Ok(None);
		}

		let mut field = Field::HyperlinkedIdentity(self.build_url_field());
		if let Some(kwargs) = self.meta.extra_kwargs(url_field) {
			field.apply_extra_kwargs(kwargs);
		}
		Ok(match field {
			Field::HyperlinkedIdentity(field) => Some(field),
			_ => None,
		})
	}

	/// Partition the fields into links, plain attributes and embedded
	/// resources
	///
	/// Embedded relations also get an entry in the links group pointing at
	/// the embedded resource, so consumers always receive a link.
	pub fn partition_fields(&self) -> SerializerResult<HalFieldGroups> {
		let mut link_fields = IndexMap::new();
		let mut plain_fields = IndexMap::new();
		let mut embedded_fields = IndexMap::new();

		for (name, field) in self.get_fields()? {
			match field {
				Field::Nested(nested) => {
					if nested.serializer.identity_field()?.is_some() {
						link_fields.insert(name.clone(), LinkSource::Embedded(nested.clone()));
					} else {
						tracing::warn!(
							model = %self.model.name(),
							relation = %name,
							"embedded serializer has no identity field, no link synthesized"
						);
					}
					embedded_fields.insert(name, nested);
				}
				Field::Attribute(attribute) => {
					plain_fields.insert(name, attribute);
				}
				field => {
					link_fields.insert(name, LinkSource::Field(field));
				}
			}
		}

		tracing::debug!(
			model = %self.model.name(),
			links = link_fields.len(),
			fields = plain_fields.len(),
			embedded = embedded_fields.len(),
			"partitioned HAL fields"
		);

		let links = self
			.include_links
			.then(|| HalLinksSerializer::new(link_fields));
		let embedded = (!embedded_fields.is_empty())
			.then(|| HalEmbeddedSerializer::new(embedded_fields));

		Ok(HalFieldGroups {
			links_key: self.settings.links_field_name.clone(),
			embedded_key: self.settings.embedded_field_name.clone(),
			links,
			fields: plain_fields,
			embedded,
		})
	}

	fn check_model(&self, record: &Record) -> SerializerResult<()> {
		if record.model() != self.model.name() {
			return Err(SerializerError::ModelMismatch {
				expected: self.model.name().to_string(),
				found: record.model().to_string(),
			});
		}
		Ok(())
	}

	/// HAL representation of `record`
	pub fn to_representation(&self, record: &Record) -> SerializerResult<Value> {
		self.check_model(record)?;
		let groups = self.partition_fields()?;
		tracing::trace!(model = %self.model.name(), "rendering HAL representation");
		groups.render(record, self.url_reverser())
	}

	/// HAL representations of `records` as a JSON array
	pub fn serialize_many(&self, records: &[Record]) -> SerializerResult<Value> {
		let groups = self.partition_fields()?;
		let mut items = Vec::with_capacity(records.len());
		for record in records {
			self.check_model(record)?;
			items.push(groups.render(record, self.url_reverser())?);
		}
		Ok(Value::Array(items))
	}

	/// Validate a HAL document from client input into a record
	///
	/// A missing links group counts as empty. Writable attributes are
	/// copied, writable relation links become href relations, and read-only
	/// fields, identity links and embedded resources are ignored.
	pub fn to_internal_value(&self, data: &Value) -> SerializerResult<Record> {
		let Value::Object(data) = data else {
			return Err(SerializerError::InvalidInput(format!(
				"expected a HAL object for model '{}'",
				self.model.name()
			)));
		};

		let links_key = &self.settings.links_field_name;
		let empty = serde_json::Map::new();
		let links = match data.get(links_key) {
			None | Some(Value::Null) => &empty,
			Some(Value::Object(links)) => links,
			Some(_) => {
				return Err(SerializerError::validation(
					links_key.clone(),
					"Expected an object of links.",
				));
			}
		};

		let mut record = Record::new(self.model.name());
		for (name, field) in self.get_fields()? {
			if field.is_read_only() {
				continue;
			}
			match field {
				Field::Attribute(attribute) => match data.get(&name) {
					Some(value) => record.set_value(attribute.source, value.clone()),
					None if attribute.required => {
						return Err(SerializerError::validation(name, "This field is required."));
					}
					None => {}
				},
				Field::HyperlinkedRelated(related) => match links.get(&name) {
					Some(value) => {
						let link = parse_link(&name, value, related.many)?;
						if related.required && matches!(link, Related::Href(None)) {
							return Err(SerializerError::validation(name, "This field may not be null."));
						}
						record.set_related(related.source, link);
					}
					None if related.required => {
						return Err(SerializerError::validation(name, "This field is required."));
					}
					None => {}
				},
				Field::HyperlinkedIdentity(_) | Field::Nested(_) => {}
			}
		}

		Ok(record)
	}
}

impl Serializer for HalModelSerializer {
	type Input = Record;
	type Output = Value;

	fn serialize(&self, input: &Self::Input) -> Result<Self::Output, SerializerError> {
		self.to_representation(input)
	}

	fn deserialize(&self, output: &Self::Output) -> Result<Self::Input, SerializerError> {
		self.to_internal_value(output)
	}
}

/// Href of the identity link in a HAL representation
///
/// Suitable for a `Location` header after creating a resource.
///
/// # Examples
///
/// ```
/// use reinhardt_hal_conf::HalSettings;
/// use reinhardt_hal_serializers::self_link;
/// use serde_json::json;
///
/// let doc = json!({"_links": {"self": {"href": "/books/1/"}}, "title": "Dune"});
/// assert_eq!(self_link(&doc, &HalSettings::default()), Some("/books/1/"));
/// assert_eq!(self_link(&json!({"title": "Dune"}), &HalSettings::default()), None);
/// ```
pub fn self_link<'a>(representation: &'a Value, settings: &HalSettings) -> Option<&'a str> {
	representation
		.get(&settings.links_field_name)?
		.get(&settings.url_field_name)?
		.get("href")?
		.as_str()
}
