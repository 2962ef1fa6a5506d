//! Page number pagination for HAL collections
//!
//! A paginated collection is a HAL document of its own: navigation links
//! (`self`, `first`, `last`, `next`, `previous`) under the links group,
//! `count` and `page_size` as plain fields and the page items embedded under
//! the items relation.
//!
//! ## Example
//!
//! ```
//! use reinhardt_hal_pagination::HalPageNumberPagination;
//! use serde_json::json;
//!
//! let paginator = HalPageNumberPagination::new().page_size(2);
//! let items = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];
//!
//! let page = paginator
//!     .paginate(&items, Some("2"), None, "http://api.example.com/pets/?page=2")
//!     .unwrap();
//!
//! assert_eq!(
//!     page.to_value().unwrap(),
//!     json!({
//!         "_links": {
//!             "self": {"href": "http://api.example.com/pets/?page=2"},
//!             "first": {"href": "http://api.example.com/pets/?page=1"},
//!             "last": {"href": "http://api.example.com/pets/?page=2"},
//!             "previous": {"href": "http://api.example.com/pets/?page=1"}
//!         },
//!         "count": 3,
//!         "page_size": 2,
//!         "_embedded": {"items": [{"id": 3}]}
//!     })
//! );
//! ```

use reinhardt_hal_conf::{EMBEDDED_FIELD_NAME, HalSettings, LINKS_FIELD_NAME, URL_FIELD_NAME};
use serde::Serialize;
use serde_json::{Map, Value, json};
use url::Url;

/// Error type for pagination
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
	#[error("Invalid page: {0}")]
	InvalidPage(String),

	#[error("Page {page} is out of range, there are {num_pages} pages")]
	PageOutOfRange { page: usize, num_pages: usize },

	#[error("Invalid request URL '{url}': {message}")]
	InvalidUrl { url: String, message: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type PaginationResult<T> = Result<T, PaginationError>;

/// Placeholder origin for resolving relative request URLs
const RELATIVE_BASE: &str = "http://relative.invalid";

/// Navigation hrefs of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
	pub self_href: String,
	pub first: String,
	pub last: String,
	pub next: Option<String>,
	pub previous: Option<String>,
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct HalPage<T> {
	pub items: Vec<T>,
	/// Current page number, starting at 1
	pub number: usize,
	pub num_pages: usize,
	/// Total number of items in the collection
	pub count: usize,
	pub page_size: usize,
	pub links: PageLinks,
	links_field_name: String,
	embedded_field_name: String,
	url_field_name: String,
	items_field_name: String,
}

impl<T> HalPage<T> {
	pub fn has_next(&self) -> bool {
		self.links.next.is_some()
	}

	pub fn has_previous(&self) -> bool {
		self.links.previous.is_some()
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

impl<T: Serialize> HalPage<T> {
	/// HAL document of the page
	pub fn to_value(&self) -> PaginationResult<Value> {
		let mut links = Map::new();
		links.insert(self.url_field_name.clone(), json!({ "href": self.links.self_href }));
		links.insert("first".to_string(), json!({ "href": self.links.first }));
		links.insert("last".to_string(), json!({ "href": self.links.last }));
		if let Some(next) = &self.links.next {
			links.insert("next".to_string(), json!({ "href": next }));
		}
		if let Some(previous) = &self.links.previous {
			links.insert("previous".to_string(), json!({ "href": previous }));
		}

		let items = self
			.items
			.iter()
			.map(serde_json::to_value)
			.collect::<Result<Vec<_>, _>>()?;
		let mut embedded = Map::new();
		embedded.insert(self.items_field_name.clone(), Value::Array(items));

		let mut document = Map::new();
		document.insert(self.links_field_name.clone(), Value::Object(links));
		document.insert("count".to_string(), json!(self.count));
		document.insert("page_size".to_string(), json!(self.page_size));
		document.insert(self.embedded_field_name.clone(), Value::Object(embedded));
		Ok(Value::Object(document))
	}
}

/// Page number based pagination producing HAL collection documents
#[derive(Debug, Clone)]
pub struct HalPageNumberPagination {
	/// Default page size
	pub page_size: usize,
	/// Query parameter name for page number
	pub page_query_param: String,
	/// Query parameter name for page size (optional)
	pub page_size_query_param: Option<String>,
	/// Maximum allowed page size
	pub max_page_size: Option<usize>,
	/// Strings that represent the last page
	pub last_page_strings: Vec<String>,
	links_field_name: String,
	embedded_field_name: String,
	url_field_name: String,
	items_field_name: String,
}

impl Default for HalPageNumberPagination {
	fn default() -> Self {
		Self {
			page_size: 10,
			page_query_param: "page".to_string(),
			page_size_query_param: None,
			max_page_size: None,
			last_page_strings: vec!["last".to_string()],
			links_field_name: LINKS_FIELD_NAME.to_string(),
			embedded_field_name: EMBEDDED_FIELD_NAME.to_string(),
			url_field_name: URL_FIELD_NAME.to_string(),
			items_field_name: "items".to_string(),
		}
	}
}

impl HalPageNumberPagination {
	pub fn new() -> Self {
		Self::default()
	}

	/// Paginator configured from `settings`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_conf::HalSettings;
	/// use reinhardt_hal_pagination::HalPageNumberPagination;
	///
	/// let settings = HalSettings {
	///     page_size: 25,
	///     page_size_query_param: Some("size".to_string()),
	///     ..HalSettings::default()
	/// };
	/// let paginator = HalPageNumberPagination::from_settings(&settings);
	/// assert_eq!(paginator.page_size, 25);
	/// assert_eq!(paginator.page_size_query_param.as_deref(), Some("size"));
	/// ```
	pub fn from_settings(settings: &HalSettings) -> Self {
		Self {
			page_size: settings.page_size,
			page_query_param: settings.page_query_param.clone(),
			page_size_query_param: settings.page_size_query_param.clone(),
			max_page_size: settings.max_page_size,
			last_page_strings: vec!["last".to_string()],
			links_field_name: settings.links_field_name.clone(),
			embedded_field_name: settings.embedded_field_name.clone(),
			url_field_name: settings.url_field_name.clone(),
			items_field_name: settings.items_field_name.clone(),
		}
	}

	pub fn page_size(mut self, size: usize) -> Self {
		self.page_size = size;
		self
	}

	pub fn max_page_size(mut self, size: usize) -> Self {
		self.max_page_size = Some(size);
		self
	}

	pub fn page_size_query_param(mut self, param: impl Into<String>) -> Self {
		self.page_size_query_param = Some(param.into());
		self
	}

	/// Relation name the page items are embedded under
	pub fn items_field_name(mut self, name: impl Into<String>) -> Self {
		self.items_field_name = name.into();
		self
	}

	/// Page size requested by the client, clamped to `max_page_size`
	///
	/// Falls back to the default page size when the client sends nothing
	/// usable or page sizes are not client-controlled.
	fn effective_page_size(&self, page_size_param: Option<&str>) -> usize {
		let requested = self
			.page_size_query_param
			.as_ref()
			.and(page_size_param)
			.and_then(|p| p.trim().parse::<usize>().ok())
			.filter(|size| *size > 0);

		let size = requested.unwrap_or(self.page_size).max(1);
		match self.max_page_size {
			Some(max) => size.min(max.max(1)),
			None => size,
		}
	}

	fn parse_page_number(&self, page_str: &str, num_pages: usize) -> PaginationResult<usize> {
		let page_str = page_str.trim();
		if self.last_page_strings.iter().any(|s| s == page_str) {
			return Ok(num_pages);
		}

		match page_str.parse::<usize>() {
			Ok(0) => Err(PaginationError::InvalidPage(
				"That page number is less than 1".to_string(),
			)),
			Ok(n) => Ok(n),
			Err(_) => Err(PaginationError::InvalidPage(format!(
				"'{}' is not a page number",
				page_str
			))),
		}
	}

	fn build_url(&self, request_url: &str, page: usize) -> PaginationResult<String> {
		let (mut url, relative) = match Url::parse(request_url) {
			Ok(url) => (url, false),
			Err(url::ParseError::RelativeUrlWithoutBase) => {
				let base = Url::parse(RELATIVE_BASE).map_err(|e| invalid_url(request_url, e))?;
				(base.join(request_url).map_err(|e| invalid_url(request_url, e))?, true)
			}
			Err(e) => return Err(invalid_url(request_url, e)),
		};

		let mut pairs: Vec<(String, String)> = url
			.query_pairs()
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect();
		match pairs.iter_mut().find(|(k, _)| *k == self.page_query_param) {
			Some(pair) => pair.1 = page.to_string(),
			None => pairs.push((self.page_query_param.clone(), page.to_string())),
		}
		url.query_pairs_mut().clear().extend_pairs(pairs);

		if relative {
			return Ok(match url.query() {
				Some(query) => format!("{}?{}", url.path(), query),
				None => url.path().to_string(),
			});
		}
		Ok(url.to_string())
	}

	/// Select the requested page of `items`
	///
	/// `page_param` and `page_size_param` are the raw query values; hrefs are
	/// built from `request_url` keeping its other query parameters.
	pub fn paginate<T: Clone>(
		&self,
		items: &[T],
		page_param: Option<&str>,
		page_size_param: Option<&str>,
		request_url: &str,
	) -> PaginationResult<HalPage<T>> {
		let count = items.len();
		let page_size = self.effective_page_size(page_size_param);
		let num_pages = count.div_ceil(page_size).max(1);

		let number = match page_param {
			Some(param) => self.parse_page_number(param, num_pages)?,
			None => 1,
		};
		if number > num_pages {
			return Err(PaginationError::PageOutOfRange {
				page: number,
				num_pages,
			});
		}

		let start = (number - 1) * page_size;
		let end = (start + page_size).min(count);
		let page_items = items[start..end].to_vec();

		let links = PageLinks {
			self_href: self.build_url(request_url, number)?,
			first: self.build_url(request_url, 1)?,
			last: self.build_url(request_url, num_pages)?,
			next: (number < num_pages)
				.then(|| self.build_url(request_url, number + 1))
				.transpose()?,
			previous: (number > 1)
				.then(|| self.build_url(request_url, number - 1))
				.transpose()?,
		};

		tracing::debug!(page = number, num_pages, count, page_size, "paginated collection");

		Ok(HalPage {
			items: page_items,
			number,
			num_pages,
			count,
			page_size,
			links,
			links_field_name: self.links_field_name.clone(),
			embedded_field_name: self.embedded_field_name.clone(),
			url_field_name: self.url_field_name.clone(),
			items_field_name: self.items_field_name.clone(),
		})
	}
}

fn invalid_url(url: &str, error: url::ParseError) -> PaginationError {
	PaginationError::InvalidUrl {
		url: url.to_string(),
		message: error.to_string(),
	}
}
