//! Records: model instances with their related records
//!
//! A [`Record`] carries attribute values and relation values of a single
//! model instance. Relations either hold the related records themselves,
//! which allows embedding them, or already-resolved hrefs as produced by
//! parsing HAL input.

use crate::error::{SerializerError, SerializerResult};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Value of a relation on a record
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
	/// To-one relation with the related record, `None` when unset
	One(Option<Box<Record>>),
	/// To-many relation with the related records
	Many(Vec<Record>),
	/// To-one relation known only by its href
	Href(Option<String>),
	/// To-many relation known only by hrefs
	Hrefs(Vec<String>),
}

impl Related {
	/// Whether the related records are available for embedding
	pub fn is_resolved(&self) -> bool {
		matches!(self, Related::One(_) | Related::Many(_))
	}
}

/// A model instance
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::record::{Record, Related};
///
/// let author = Record::new("author").with_value("id", 7).with_value("name", "Ann");
/// let book = Record::new("book")
///     .with_value("id", 1)
///     .with_value("title", "Dune")
///     .with_one("author", Some(author));
///
/// assert_eq!(book.model(), "book");
/// assert_eq!(book.lookup_value("id"), Some("1".to_string()));
/// assert!(matches!(book.related("author"), Some(Related::One(Some(_)))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	model: String,
	values: IndexMap<String, Value>,
	relations: IndexMap<String, Related>,
}

impl Record {
	/// Create an empty record of `model`
	pub fn new(model: impl Into<String>) -> Self {
		Self {
			model: model.into(),
			values: IndexMap::new(),
			relations: IndexMap::new(),
		}
	}

	/// Build a record from any serializable value
	///
	/// The value must serialize to a JSON object; its keys become attribute
	/// values.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_serializers::record::Record;
	/// use serde::Serialize;
	///
	/// #[derive(Serialize)]
	/// struct Tag {
	///     id: i64,
	///     label: String,
	/// }
	///
	/// let record = Record::from_serialize("tag", &Tag { id: 3, label: "rust".into() }).unwrap();
	/// assert_eq!(record.value("label").unwrap(), "rust");
	/// ```
	pub fn from_serialize<T: Serialize>(model: impl Into<String>, value: &T) -> SerializerResult<Self> {
		let model = model.into();
		match serde_json::to_value(value)? {
			Value::Object(map) => Ok(Self {
				model,
				values: map.into_iter().collect(),
				relations: IndexMap::new(),
			}),
			other => Err(SerializerError::InvalidInput(format!(
				"record of model '{}' must serialize to an object, got {}",
				model, other
			))),
		}
	}

	/// Builder-style attribute assignment
	pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set_value(name, value);
		self
	}

	/// Builder-style to-one relation assignment
	pub fn with_one(mut self, name: impl Into<String>, related: Option<Record>) -> Self {
		self.set_related(name, Related::One(related.map(Box::new)));
		self
	}

	/// Builder-style to-many relation assignment
	pub fn with_many(mut self, name: impl Into<String>, related: Vec<Record>) -> Self {
		self.set_related(name, Related::Many(related));
		self
	}

	/// Builder-style relation assignment
	pub fn with_related(mut self, name: impl Into<String>, related: Related) -> Self {
		self.set_related(name, related);
		self
	}

	pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.values.insert(name.into(), value.into());
	}

	pub fn set_related(&mut self, name: impl Into<String>, related: Related) {
		self.relations.insert(name.into(), related);
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn value(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn values(&self) -> &IndexMap<String, Value> {
		&self.values
	}

	pub fn related(&self, name: &str) -> Option<&Related> {
		self.relations.get(name)
	}

	pub fn relations(&self) -> &IndexMap<String, Related> {
		&self.relations
	}

	/// String form of an attribute used in URL lookups
	///
	/// JSON strings are returned without quotes; `null` and missing values
	/// yield `None`.
	pub fn lookup_value(&self, field: &str) -> Option<String> {
		self.values.get(field).and_then(lookup_string)
	}
}

/// String form of a lookup value, `None` for `null`
pub(crate) fn lookup_string(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}
