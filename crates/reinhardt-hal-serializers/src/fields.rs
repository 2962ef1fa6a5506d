//! Serializer fields and their HAL classification
//!
//! Every field of a HAL serializer falls into one of three groups:
//! hyperlinks (related, many-related and identity fields), embedded
//! resources (nested serializers) and plain attributes.

use crate::error::{SerializerError, SerializerResult};
use crate::meta::ExtraKwargs;
use crate::record::{Record, Related, lookup_string};
use crate::reverse::{UrlReverser, reverse_href};
use crate::serializer::HalModelSerializer;
use serde_json::{Value, json};

/// HAL group a field is rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
	/// Rendered into the `_links` group
	Link,
	/// Rendered into the `_embedded` group
	Embedded,
	/// Rendered as a plain attribute
	Plain,
}

/// Rendered value of a link field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkValue {
	One(Option<String>),
	Many(Vec<String>),
}

impl LinkValue {
	/// HAL link object(s): `{"href": ...}` or an array of them
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_serializers::fields::LinkValue;
	/// use serde_json::json;
	///
	/// assert_eq!(LinkValue::One(Some("/a/1/".into())).to_hal(), json!({"href": "/a/1/"}));
	/// assert_eq!(LinkValue::One(None).to_hal(), json!({"href": null}));
	/// assert_eq!(
	///     LinkValue::Many(vec!["/a/1/".into(), "/a/2/".into()]).to_hal(),
	///     json!([{"href": "/a/1/"}, {"href": "/a/2/"}])
	/// );
	/// ```
	pub fn to_hal(&self) -> Value {
		match self {
			LinkValue::One(href) => json!({ "href": href }),
			LinkValue::Many(hrefs) => Value::Array(hrefs.iter().map(|h| json!({ "href": h })).collect()),
		}
	}
}

/// Plain attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeField {
	pub source: String,
	pub read_only: bool,
	pub required: bool,
}

impl AttributeField {
	pub fn new(source: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			read_only: false,
			required: false,
		}
	}

	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Attribute value, `null` when the record does not carry it
	pub fn to_representation(&self, record: &Record) -> Value {
		match record.value(&self.source) {
			Some(value) => value.clone(),
			None => {
				tracing::trace!(model = %record.model(), field = %self.source, "attribute missing, rendering null");
				Value::Null
			}
		}
	}
}

/// Hyperlink to a related record, or to many related records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkedRelatedField {
	pub source: String,
	pub view_name: String,
	pub lookup_field: String,
	pub lookup_url_kwarg: String,
	pub related_model: String,
	pub many: bool,
	pub read_only: bool,
	pub required: bool,
}

impl HyperlinkedRelatedField {
	/// Link field reversing `view_name` with the `id` of the related record
	pub fn new(source: impl Into<String>, view_name: impl Into<String>) -> Self {
		let source = source.into();
		Self {
			related_model: source.clone(),
			source,
			view_name: view_name.into(),
			lookup_field: String::from("id"),
			lookup_url_kwarg: String::from("id"),
			many: false,
			read_only: false,
			required: false,
		}
	}

	/// Look up related records by `field`
	pub fn lookup_field(mut self, field: impl Into<String>) -> Self {
		let field = field.into();
		self.lookup_url_kwarg = field.clone();
		self.lookup_field = field;
		self
	}

	/// Model used for fallback hrefs when no reverser is configured
	pub fn related_model(mut self, model: impl Into<String>) -> Self {
		self.related_model = model.into();
		self
	}

	/// Mark as a to-many link
	pub fn many(mut self) -> Self {
		self.many = true;
		self
	}

	/// Require the link on input
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	fn href_for(&self, related: &Record, reverser: Option<&dyn UrlReverser>) -> SerializerResult<String> {
		let lookup = related
			.lookup_value(&self.lookup_field)
			.ok_or_else(|| SerializerError::MissingLookupValue {
				model: related.model().to_string(),
				field: self.lookup_field.clone(),
			})?;
		reverse_href(reverser, &self.view_name, &self.lookup_url_kwarg, lookup, related.model())
	}

	fn href_for_lookup(&self, lookup: String, reverser: Option<&dyn UrlReverser>) -> SerializerResult<String> {
		reverse_href(reverser, &self.view_name, &self.lookup_url_kwarg, lookup, &self.related_model)
	}

	/// Link(s) of the relation on `record`
	///
	/// Falls back to a raw lookup value stored as an attribute of the same
	/// name when the record carries no related records.
	pub fn to_link(&self, record: &Record, reverser: Option<&dyn UrlReverser>) -> SerializerResult<LinkValue> {
		match record.related(&self.source) {
			Some(Related::One(Some(related))) => Ok(LinkValue::One(Some(self.href_for(related, reverser)?))),
			Some(Related::One(None)) => Ok(LinkValue::One(None)),
			Some(Related::Many(related)) => related
				.iter()
				.map(|r| self.href_for(r, reverser))
				.collect::<SerializerResult<Vec<_>>>()
				.map(LinkValue::Many),
			Some(Related::Href(href)) => Ok(LinkValue::One(href.clone())),
			Some(Related::Hrefs(hrefs)) => Ok(LinkValue::Many(hrefs.clone())),
			None => match record.value(&self.source) {
				Some(Value::Array(lookups)) => lookups
					.iter()
					.filter_map(lookup_string)
					.map(|lookup| self.href_for_lookup(lookup, reverser))
					.collect::<SerializerResult<Vec<_>>>()
					.map(LinkValue::Many),
				Some(value) => match lookup_string(value) {
					Some(lookup) => Ok(LinkValue::One(Some(self.href_for_lookup(lookup, reverser)?))),
					None if self.many => Ok(LinkValue::Many(Vec::new())),
					None => Ok(LinkValue::One(None)),
				},
				None => Err(SerializerError::MissingRelation {
					model: record.model().to_string(),
					field: self.source.clone(),
				}),
			},
		}
	}
}

/// Hyperlink to the record itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkedIdentityField {
	pub view_name: String,
	pub lookup_field: String,
	pub lookup_url_kwarg: String,
}

impl HyperlinkedIdentityField {
	/// Identity link reversing `view_name` with the record's `id`
	pub fn new(view_name: impl Into<String>) -> Self {
		Self {
			view_name: view_name.into(),
			lookup_field: String::from("id"),
			lookup_url_kwarg: String::from("id"),
		}
	}

	/// Look up the record by `field`
	pub fn lookup_field(mut self, field: impl Into<String>) -> Self {
		let field = field.into();
		self.lookup_url_kwarg = field.clone();
		self.lookup_field = field;
		self
	}

	/// Href of `record`
	pub fn href(&self, record: &Record, reverser: Option<&dyn UrlReverser>) -> SerializerResult<String> {
		let lookup = record
			.lookup_value(&self.lookup_field)
			.ok_or_else(|| SerializerError::MissingLookupValue {
				model: record.model().to_string(),
				field: self.lookup_field.clone(),
			})?;
		reverse_href(reverser, &self.view_name, &self.lookup_url_kwarg, lookup, record.model())
	}

	pub fn to_link(&self, record: &Record, reverser: Option<&dyn UrlReverser>) -> SerializerResult<LinkValue> {
		Ok(LinkValue::One(Some(self.href(record, reverser)?)))
	}
}

/// Related record(s) rendered with a nested HAL serializer
#[derive(Debug, Clone)]
pub struct NestedField {
	pub source: String,
	pub many: bool,
	pub serializer: Box<HalModelSerializer>,
}

impl NestedField {
	pub fn new(source: impl Into<String>, serializer: HalModelSerializer) -> Self {
		Self {
			source: source.into(),
			many: false,
			serializer: Box::new(serializer),
		}
	}

	pub fn many(mut self) -> Self {
		self.many = true;
		self
	}

	fn related<'a>(&self, record: &'a Record) -> SerializerResult<&'a Related> {
		record
			.related(&self.source)
			.ok_or_else(|| SerializerError::MissingRelation {
				model: record.model().to_string(),
				field: self.source.clone(),
			})
	}

	/// Inlined representation(s) of the related record(s)
	pub fn to_embedded(&self, record: &Record) -> SerializerResult<Value> {
		match self.related(record)? {
			Related::One(Some(related)) => self.serializer.to_representation(related),
			Related::One(None) => Ok(Value::Null),
			Related::Many(related) => self.serializer.serialize_many(related),
			Related::Href(_) | Related::Hrefs(_) => Err(SerializerError::UnresolvedRelation {
				field: self.source.clone(),
				reason: "only hrefs are known for this relation".to_string(),
			}),
		}
	}

	/// Link(s) pointing at the embedded record(s), built from the nested
	/// serializer's identity field
	///
	/// Returns `None` when the nested serializer has no identity field.
	pub fn to_link(&self, record: &Record) -> SerializerResult<Option<LinkValue>> {
		let Some(identity) = self.serializer.identity_field()? else {
			return Ok(None);
		};
		let reverser = self.serializer.url_reverser();

		let link = match self.related(record)? {
			Related::One(Some(related)) => LinkValue::One(Some(identity.href(related, reverser)?)),
			Related::One(None) => LinkValue::One(None),
			Related::Many(related) => LinkValue::Many(
				related
					.iter()
					.map(|r| identity.href(r, reverser))
					.collect::<SerializerResult<Vec<_>>>()?,
			),
			Related::Href(href) => LinkValue::One(href.clone()),
			Related::Hrefs(hrefs) => LinkValue::Many(hrefs.clone()),
		};
		Ok(Some(link))
	}
}

/// A serializer field
#[derive(Debug, Clone)]
pub enum Field {
	Attribute(AttributeField),
	HyperlinkedRelated(HyperlinkedRelatedField),
	HyperlinkedIdentity(HyperlinkedIdentityField),
	Nested(NestedField),
}

impl Field {
	/// Group this field is rendered into
	pub fn class(&self) -> FieldClass {
		match self {
			Field::HyperlinkedRelated(_) | Field::HyperlinkedIdentity(_) => FieldClass::Link,
			Field::Nested(_) => FieldClass::Embedded,
			Field::Attribute(_) => FieldClass::Plain,
		}
	}

	pub fn is_link_field(&self) -> bool {
		self.class() == FieldClass::Link
	}

	pub fn is_embedded_field(&self) -> bool {
		self.class() == FieldClass::Embedded
	}

	/// Whether the field is ignored on input
	pub fn is_read_only(&self) -> bool {
		match self {
			Field::Attribute(f) => f.read_only,
			Field::HyperlinkedRelated(f) => f.read_only,
			Field::HyperlinkedIdentity(_) | Field::Nested(_) => true,
		}
	}

	/// Apply per-field overrides
	pub fn apply_extra_kwargs(&mut self, kwargs: &ExtraKwargs) {
		match self {
			Field::Attribute(f) => {
				if let Some(read_only) = kwargs.read_only {
					f.read_only = read_only;
				}
				if let Some(required) = kwargs.required {
					f.required = required;
				}
			}
			Field::HyperlinkedRelated(f) => {
				if let Some(view_name) = &kwargs.view_name {
					f.view_name = view_name.clone();
				}
				if let Some(lookup_field) = &kwargs.lookup_field {
					f.lookup_field = lookup_field.clone();
					f.lookup_url_kwarg = lookup_field.clone();
				}
				if let Some(kwarg) = &kwargs.lookup_url_kwarg {
					f.lookup_url_kwarg = kwarg.clone();
				}
				if let Some(read_only) = kwargs.read_only {
					f.read_only = read_only;
				}
				if let Some(required) = kwargs.required {
					f.required = required;
				}
			}
			Field::HyperlinkedIdentity(f) => {
				if let Some(view_name) = &kwargs.view_name {
					f.view_name = view_name.clone();
				}
				if let Some(lookup_field) = &kwargs.lookup_field {
					f.lookup_field = lookup_field.clone();
					f.lookup_url_kwarg = lookup_field.clone();
				}
				if let Some(kwarg) = &kwargs.lookup_url_kwarg {
					f.lookup_url_kwarg = kwarg.clone();
				}
			}
			Field::Nested(_) => {}
		}
	}

	/// Render a link field
	pub(crate) fn to_link(&self, record: &Record, reverser: Option<&dyn UrlReverser>) -> SerializerResult<Option<LinkValue>> {
		match self {
			Field::HyperlinkedRelated(f) => f.to_link(record, reverser).map(Some),
			Field::HyperlinkedIdentity(f) => f.to_link(record, reverser).map(Some),
			Field::Nested(f) => f.to_link(record),
			Field::Attribute(_) => Ok(None),
		}
	}
}

impl From<AttributeField> for Field {
	fn from(field: AttributeField) -> Self {
		Field::Attribute(field)
	}
}

impl From<HyperlinkedRelatedField> for Field {
	fn from(field: HyperlinkedRelatedField) -> Self {
		Field::HyperlinkedRelated(field)
	}
}

impl From<HyperlinkedIdentityField> for Field {
	fn from(field: HyperlinkedIdentityField) -> Self {
		Field::HyperlinkedIdentity(field)
	}
}

impl From<NestedField> for Field {
	fn from(field: NestedField) -> Self {
		Field::Nested(field)
	}
}

/// Parse a HAL link value from client input
///
/// Accepts `{"href": ...}`, an array of link objects, `{"href": [...]}`
/// and bare href strings.
pub(crate) fn parse_link(name: &str, value: &Value, many: bool) -> SerializerResult<Related> {
	fn href_of(name: &str, value: &Value) -> SerializerResult<Option<String>> {
		match value {
			Value::String(s) => Ok(Some(s.clone())),
			Value::Null => Ok(None),
			Value::Object(map) => match map.get("href") {
				Some(Value::String(s)) => Ok(Some(s.clone())),
				Some(Value::Null) => Ok(None),
				_ => Err(SerializerError::validation(name, "Expected a link object with an 'href' string.")),
			},
			_ => Err(SerializerError::validation(name, "Expected a link object.")),
		}
	}

	fn collect(name: &str, items: &[Value]) -> SerializerResult<Vec<String>> {
		items
			.iter()
			.filter_map(|item| href_of(name, item).transpose())
			.collect()
	}

	if many {
		match value {
			Value::Array(items) => Ok(Related::Hrefs(collect(name, items)?)),
			Value::Object(map) => match map.get("href") {
				Some(Value::Array(items)) => Ok(Related::Hrefs(collect(name, items)?)),
				_ => Ok(Related::Hrefs(href_of(name, value)?.into_iter().collect())),
			},
			_ => Err(SerializerError::validation(name, "Expected a list of link objects.")),
		}
	} else {
		Ok(Related::Href(href_of(name, value)?))
	}
}
