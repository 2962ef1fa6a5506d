//! Model metadata used to derive HAL serializer fields
//!
//! Models are described explicitly through [`ModelInfo`] and collected in a
//! [`ModelRegistry`]. Serializers consult the registry to classify fields
//! as attributes or relations and to follow relations to the related model.

use crate::error::{SerializerError, SerializerResult};
use indexmap::IndexMap;
use std::sync::Arc;

/// Kind of a model field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
	/// Plain column value
	Attribute,
	/// Many-to-one relation
	ForeignKey { to: String },
	/// One-to-one relation
	OneToOne { to: String },
	/// Many-to-many relation
	ManyToMany { to: String },
	/// Reverse side of a relation declared on another model
	Reverse { to: String, many: bool },
}

impl FieldKind {
	/// Name of the related model, if this is a relation
	pub fn related_model(&self) -> Option<&str> {
		match self {
			FieldKind::Attribute => None,
			FieldKind::ForeignKey { to }
			| FieldKind::OneToOne { to }
			| FieldKind::ManyToMany { to }
			| FieldKind::Reverse { to, .. } => Some(to),
		}
	}

	/// Whether this field is a relation
	pub fn is_relation(&self) -> bool {
		!matches!(self, FieldKind::Attribute)
	}

	/// Whether this relation points at many records
	pub fn is_to_many(&self) -> bool {
		matches!(
			self,
			FieldKind::ManyToMany { .. } | FieldKind::Reverse { many: true, .. }
		)
	}
}

/// A single field declared on a model
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::model::{FieldKind, ModelField};
///
/// let field = ModelField::foreign_key("author", "author").required();
/// assert_eq!(field.kind.related_model(), Some("author"));
/// assert!(field.required);
/// assert!(!field.read_only);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelField {
	pub name: String,
	pub kind: FieldKind,
	pub read_only: bool,
	pub required: bool,
}

impl ModelField {
	fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
			read_only: false,
			required: false,
		}
	}

	/// Plain attribute field
	pub fn attribute(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Attribute)
	}

	/// Many-to-one relation to `to`
	pub fn foreign_key(name: impl Into<String>, to: impl Into<String>) -> Self {
		Self::new(name, FieldKind::ForeignKey { to: to.into() })
	}

	/// One-to-one relation to `to`
	pub fn one_to_one(name: impl Into<String>, to: impl Into<String>) -> Self {
		Self::new(name, FieldKind::OneToOne { to: to.into() })
	}

	/// Many-to-many relation to `to`
	pub fn many_to_many(name: impl Into<String>, to: impl Into<String>) -> Self {
		Self::new(name, FieldKind::ManyToMany { to: to.into() })
	}

	/// Reverse accessor of a relation declared on `to`
	///
	/// Reverse relations are read-only.
	pub fn reverse(name: impl Into<String>, to: impl Into<String>, many: bool) -> Self {
		let mut field = Self::new(name, FieldKind::Reverse { to: to.into(), many });
		field.read_only = true;
		field
	}

	/// Mark field as read-only
	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}

	/// Mark field as required on input
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
}

/// Relation details of a model field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationInfo {
	pub field_name: String,
	pub related_model: String,
	pub to_many: bool,
	pub reverse: bool,
}

/// Metadata of one model
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::model::{ModelField, ModelInfo};
///
/// let info = ModelInfo::new("book")
///     .field(ModelField::attribute("id").read_only())
///     .field(ModelField::attribute("title").required())
///     .field(ModelField::foreign_key("author", "author"));
///
/// assert_eq!(info.primary_key(), "id");
/// assert_eq!(info.view_name(), "book-detail");
/// assert_eq!(info.field_names(), vec!["id", "title", "author"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
	name: String,
	primary_key: String,
	view_name: String,
	fields: Vec<ModelField>,
}

impl ModelInfo {
	/// Create model metadata with `id` as primary key and
	/// `<name>-detail` as detail view
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			view_name: format!("{}-detail", name),
			name,
			primary_key: String::from("id"),
			fields: Vec::new(),
		}
	}

	/// Use a different primary key field
	pub fn with_primary_key(mut self, name: impl Into<String>) -> Self {
		self.primary_key = name.into();
		self
	}

	/// Use a different detail view name
	pub fn with_view_name(mut self, name: impl Into<String>) -> Self {
		self.view_name = name.into();
		self
	}

	/// Declare a field
	pub fn field(mut self, field: ModelField) -> Self {
		self.fields.push(field);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn primary_key(&self) -> &str {
		&self.primary_key
	}

	pub fn view_name(&self) -> &str {
		&self.view_name
	}

	pub fn fields(&self) -> &[ModelField] {
		&self.fields
	}

	pub fn field_names(&self) -> Vec<&str> {
		self.fields.iter().map(|f| f.name.as_str()).collect()
	}

	/// Get a field by name
	pub fn get_field(&self, name: &str) -> Option<&ModelField> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// Relation details of `name`, `None` for attributes
	pub fn relation_info(&self, name: &str) -> SerializerResult<Option<RelationInfo>> {
		let field = self
			.get_field(name)
			.ok_or_else(|| SerializerError::UnknownField {
				model: self.name.clone(),
				field: name.to_string(),
			})?;

		Ok(field.kind.related_model().map(|related| RelationInfo {
			field_name: field.name.clone(),
			related_model: related.to_string(),
			to_many: field.kind.is_to_many(),
			reverse: matches!(field.kind, FieldKind::Reverse { .. }),
		}))
	}
}

/// Registry of model metadata
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
	models: IndexMap<String, Arc<ModelInfo>>,
}

impl ModelRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a model
	///
	/// # Errors
	///
	/// Fails when a model of the same name is already registered.
	pub fn register(&mut self, info: ModelInfo) -> SerializerResult<()> {
		if self.models.contains_key(info.name()) {
			return Err(SerializerError::DuplicateModel(info.name().to_string()));
		}
		tracing::debug!(model = %info.name(), fields = info.fields().len(), "registered model");
		self.models.insert(info.name().to_string(), Arc::new(info));
		Ok(())
	}

	/// Builder-style registration
	pub fn with_model(mut self, info: ModelInfo) -> SerializerResult<Self> {
		self.register(info)?;
		Ok(self)
	}

	/// Look up a model by name
	pub fn get(&self, name: &str) -> SerializerResult<Arc<ModelInfo>> {
		self.models
			.get(name)
			.cloned()
			.ok_or_else(|| SerializerError::UnknownModel(name.to_string()))
	}

	/// Relation details of `model.field`
	pub fn relation_info(&self, model: &str, field: &str) -> SerializerResult<Option<RelationInfo>> {
		self.get(model)?.relation_info(field)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.models.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.models.len()
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}

	/// Check that every relation targets a registered model
	pub fn validate(&self) -> SerializerResult<()> {
		for model in self.models.values() {
			for field in model.fields() {
				if let Some(related) = field.kind.related_model()
					&& !self.models.contains_key(related)
				{
					return Err(SerializerError::ImproperlyConfigured(format!(
						"relation '{}.{}' targets unknown model '{}'",
						model.name(),
						field.name,
						related
					)));
				}
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(FieldKind::Attribute, None, false)]
	#[case(FieldKind::ForeignKey { to: "a".into() }, Some("a"), false)]
	#[case(FieldKind::OneToOne { to: "b".into() }, Some("b"), false)]
	#[case(FieldKind::ManyToMany { to: "c".into() }, Some("c"), true)]
	#[case(FieldKind::Reverse { to: "d".into(), many: true }, Some("d"), true)]
	#[case(FieldKind::Reverse { to: "e".into(), many: false }, Some("e"), false)]
	fn test_field_kind_relation_details(
		#[case] kind: FieldKind,
		#[case] related: Option<&str>,
		#[case] to_many: bool,
	) {
		assert_eq!(kind.related_model(), related);
		assert_eq!(kind.is_relation(), related.is_some());
		assert_eq!(kind.is_to_many(), to_many);
	}

	#[rstest]
	fn test_reverse_field_is_read_only() {
		let field = ModelField::reverse("books", "book", true);
		assert!(field.read_only);
	}

	#[rstest]
	fn test_relation_info() {
		let info = ModelInfo::new("book")
			.field(ModelField::attribute("title"))
			.field(ModelField::many_to_many("tags", "tag"));

		assert_eq!(info.relation_info("title").unwrap(), None);

		let tags = info.relation_info("tags").unwrap().unwrap();
		assert_eq!(tags.related_model, "tag");
		assert!(tags.to_many);
		assert!(!tags.reverse);

		assert!(matches!(
			info.relation_info("missing"),
			Err(SerializerError::UnknownField { .. })
		));
	}

	#[rstest]
	fn test_custom_primary_key_and_view() {
		let info = ModelInfo::new("tag")
			.with_primary_key("slug")
			.with_view_name("tags-detail");
		assert_eq!(info.primary_key(), "slug");
		assert_eq!(info.view_name(), "tags-detail");
	}

	#[rstest]
	fn test_registry_rejects_duplicates() {
		let mut registry = ModelRegistry::new();
		registry.register(ModelInfo::new("book")).unwrap();
		assert!(matches!(
			registry.register(ModelInfo::new("book")),
			Err(SerializerError::DuplicateModel(_))
		));
		assert_eq!(registry.len(), 1);
	}

	#[rstest]
	fn test_registry_validate_dangling_relation() {
		let registry = ModelRegistry::new()
			.with_model(ModelInfo::new("book").field(ModelField::foreign_key("author", "author")))
			.unwrap();
		assert!(matches!(
			registry.validate(),
			Err(SerializerError::ImproperlyConfigured(_))
		));

		let registry = registry.with_model(ModelInfo::new("author")).unwrap();
		assert!(registry.validate().is_ok());
		let author = registry.relation_info("book", "author").unwrap().unwrap();
		assert_eq!(author.related_model, "author");
		assert!(!author.to_many);
	}

	#[rstest]
	fn test_registry_unknown_model() {
		let registry = ModelRegistry::new();
		assert!(matches!(
			registry.get("nope"),
			Err(SerializerError::UnknownModel(name)) if name == "nope"
		));
	}
}
