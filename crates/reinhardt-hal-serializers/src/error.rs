//! Error type for HAL serialization

/// Error type for HAL serializer construction, rendering and parsing
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
	#[error("Unknown model '{0}'")]
	UnknownModel(String),

	#[error("Model '{0}' is already registered")]
	DuplicateModel(String),

	#[error("Model '{model}' has no field '{field}'")]
	UnknownField { model: String, field: String },

	#[error("Improperly configured: {0}")]
	ImproperlyConfigured(String),

	#[error("Expected a record of model '{expected}', got '{found}'")]
	ModelMismatch { expected: String, found: String },

	#[error("Record of model '{model}' has no value for relation '{field}'")]
	MissingRelation { model: String, field: String },

	#[error("Record of model '{model}' has no value for lookup field '{field}'")]
	MissingLookupValue { model: String, field: String },

	#[error("Relation '{field}' cannot be embedded: {reason}")]
	UnresolvedRelation { field: String, reason: String },

	#[error("URL reversal error for view '{view_name}': {message}")]
	UrlReversal { view_name: String, message: String },

	#[error("Invalid input: {0}")]
	InvalidInput(String),

	#[error("Validation failed for '{field}': {message}")]
	Validation { field: String, message: String },

	#[error("Serde error: {0}")]
	Serde(#[from] serde_json::Error),
}

impl SerializerError {
	/// Create a field validation error
	pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Validation {
			field: field.into(),
			message: message.into(),
		}
	}

	/// Check if this is a validation error on client input
	pub fn is_validation_error(&self) -> bool {
		matches!(self, Self::Validation { .. } | Self::InvalidInput(_))
	}
}

/// Result alias for HAL serializer operations
pub type SerializerResult<T> = Result<T, SerializerError>;
