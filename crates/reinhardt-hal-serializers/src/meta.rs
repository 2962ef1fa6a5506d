//! Meta configuration for HAL serializers
//!
//! Django REST Framework-style options: which fields to include or exclude,
//! how deep relations are embedded, per-relation nested field selection and
//! per-field overrides of generated link fields.

use crate::nested_config::NestedFields;
use indexmap::IndexMap;

/// Overrides applied to a generated field
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::ExtraKwargs;
///
/// let kwargs = ExtraKwargs::new().lookup_field("name").view_name("custom-detail");
/// assert_eq!(kwargs.lookup_field.as_deref(), Some("name"));
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraKwargs {
	pub view_name: Option<String>,
	pub lookup_field: Option<String>,
	pub lookup_url_kwarg: Option<String>,
	pub read_only: Option<bool>,
	pub required: Option<bool>,
}

impl ExtraKwargs {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn view_name(mut self, name: impl Into<String>) -> Self {
		self.view_name = Some(name.into());
		self
	}

	pub fn lookup_field(mut self, name: impl Into<String>) -> Self {
		self.lookup_field = Some(name.into());
		self
	}

	pub fn lookup_url_kwarg(mut self, name: impl Into<String>) -> Self {
		self.lookup_url_kwarg = Some(name.into());
		self
	}

	pub fn read_only(mut self, read_only: bool) -> Self {
		self.read_only = Some(read_only);
		self
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = Some(required);
		self
	}
}

/// Configuration builder for HAL serializers
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::{HalMeta, NestedFields};
///
/// let meta = HalMeta::new()
///     .with_fields(["id", "name", "related_resource_1"])
///     .with_depth(1)
///     .with_nested_fields(NestedFields::new().relation("owner", ["name"], NestedFields::new()));
///
/// assert_eq!(meta.depth(), Some(1));
/// assert!(meta.nested_fields().contains("owner"));
/// assert!(meta.is_field_included("name"));
/// assert!(!meta.is_field_included("email"));
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct HalMeta {
	fields: Option<Vec<String>>,
	exclude: Vec<String>,
	depth: Option<usize>,
	nested_fields: NestedFields,
	extra_kwargs: IndexMap<String, ExtraKwargs>,
	read_only_fields: Vec<String>,
}

impl HalMeta {
	/// Create a configuration including all fields
	pub fn new() -> Self {
		Self::default()
	}

	/// Specify which fields to include
	pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.fields = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Specify which fields to exclude
	pub fn with_exclude(mut self, exclude: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.exclude = exclude.into_iter().map(Into::into).collect();
		self
	}

	/// Number of relation hops expanded into embedded content
	pub fn with_depth(mut self, depth: usize) -> Self {
		self.depth = Some(depth);
		self
	}

	/// Per-relation field selection for embedded resources
	pub fn with_nested_fields(mut self, nested_fields: NestedFields) -> Self {
		self.nested_fields = nested_fields;
		self
	}

	/// Overrides for the generated field `name`
	pub fn with_extra_kwargs(mut self, name: impl Into<String>, kwargs: ExtraKwargs) -> Self {
		self.extra_kwargs.insert(name.into(), kwargs);
		self
	}

	/// Specify which fields are read-only
	pub fn with_read_only_fields(
		mut self,
		fields: impl IntoIterator<Item = impl Into<String>>,
	) -> Self {
		self.read_only_fields = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn fields(&self) -> Option<&[String]> {
		self.fields.as_deref()
	}

	pub fn exclude(&self) -> &[String] {
		&self.exclude
	}

	pub fn depth(&self) -> Option<usize> {
		self.depth
	}

	pub fn nested_fields(&self) -> &NestedFields {
		&self.nested_fields
	}

	pub fn extra_kwargs(&self, name: &str) -> Option<&ExtraKwargs> {
		self.extra_kwargs.get(name)
	}

	pub fn all_extra_kwargs(&self) -> &IndexMap<String, ExtraKwargs> {
		&self.extra_kwargs
	}

	/// Check if a field should be included in serialization
	pub fn is_field_included(&self, field_name: &str) -> bool {
		if self.exclude.iter().any(|f| f == field_name) {
			return false;
		}

		match &self.fields {
			Some(fields) => fields.iter().any(|f| f == field_name),
			None => true,
		}
	}

	/// Check if a field is read-only
	pub fn is_read_only(&self, field_name: &str) -> bool {
		self.read_only_fields.iter().any(|f| f == field_name)
	}
}
