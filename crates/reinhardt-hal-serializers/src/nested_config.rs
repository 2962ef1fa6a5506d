//! Per-relation field selection for embedded resources
//!
//! A [`NestedFields`] mapping names relations to embed and chooses the fields
//! of each embedded representation, with a further mapping for relations of
//! the embedded resource.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field selection for one embedded relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Vec<String>, NestedFields)", into = "(Vec<String>, NestedFields)")]
pub struct NestedFieldSpec {
	/// Fields of the embedded representation
	pub fields: Vec<String>,
	/// Configuration for relations of the embedded resource
	pub nested: NestedFields,
}

impl NestedFieldSpec {
	pub fn new(fields: impl IntoIterator<Item = impl Into<String>>, nested: NestedFields) -> Self {
		Self {
			fields: fields.into_iter().map(Into::into).collect(),
			nested,
		}
	}
}

impl From<(Vec<String>, NestedFields)> for NestedFieldSpec {
	fn from((fields, nested): (Vec<String>, NestedFields)) -> Self {
		Self { fields, nested }
	}
}

impl From<NestedFieldSpec> for (Vec<String>, NestedFields) {
	fn from(spec: NestedFieldSpec) -> Self {
		(spec.fields, spec.nested)
	}
}

/// Mapping from relation name to embedded field selection
///
/// Deserializes from the tuple form used in settings files:
/// `{"relation": [["field", ...], {nested mapping}]}`.
///
/// # Examples
///
/// ```
/// use reinhardt_hal_serializers::NestedFields;
///
/// let nested = NestedFields::new().relation(
///     "related_resource_2",
///     ["name"],
///     NestedFields::new().relation("related_resources_1", ["id", "name"], NestedFields::new()),
/// );
///
/// assert!(nested.contains("related_resource_2"));
/// let spec = nested.get("related_resource_2").unwrap();
/// assert_eq!(spec.fields, vec!["name"]);
/// assert!(spec.nested.contains("related_resources_1"));
///
/// let parsed: NestedFields = serde_json::from_str(
///     r#"{"related_resource_2": [["name"], {"related_resources_1": [["id", "name"], {}]}]}"#,
/// ).unwrap();
/// assert_eq!(parsed, nested);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedFields(IndexMap<String, NestedFieldSpec>);

impl NestedFields {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a relation with its field list and deeper configuration
	pub fn relation(
		mut self,
		name: impl Into<String>,
		fields: impl IntoIterator<Item = impl Into<String>>,
		nested: NestedFields,
	) -> Self {
		self.0.insert(name.into(), NestedFieldSpec::new(fields, nested));
		self
	}

	pub fn get(&self, name: &str) -> Option<&NestedFieldSpec> {
		self.0.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Relation names in declaration order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_names_keep_declaration_order() {
		let nested = NestedFields::new()
			.relation("zeta", ["a"], NestedFields::new())
			.relation("alpha", ["b"], NestedFields::new());
		assert_eq!(nested.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
		assert_eq!(nested.len(), 2);
	}

	#[rstest]
	fn test_serialize_to_tuple_form() {
		let nested = NestedFields::new().relation("author", ["name"], NestedFields::new());
		let value = serde_json::to_value(&nested).unwrap();
		assert_eq!(value, serde_json::json!({"author": [["name"], {}]}));
	}

	#[rstest]
	fn test_deserialize_rejects_malformed_entry() {
		let result: Result<NestedFields, _> = serde_json::from_str(r#"{"author": ["name"]}"#);
		assert!(result.is_err());
	}
}
