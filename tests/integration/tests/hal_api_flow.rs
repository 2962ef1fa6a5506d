//! End-to-end HAL request/response flow
//!
//! Serializes records, renders them to bytes, parses them back as a client
//! would send them, validates input and paginates collections.

use bytes::Bytes;
use reinhardt_hal::conf::HalSettings;
use reinhardt_hal::pagination::{HalPageNumberPagination, PaginationError};
use reinhardt_hal::parsers::{HalJsonParser, Parser};
use reinhardt_hal::renderers::{HalJsonRenderer, Renderer, RendererContext};
use reinhardt_hal::serializers::{
	HalMeta, HalModelSerializer, ModelRegistry, NestedFields, Record, Related, RouteTable,
	SerializerError, self_link,
};
use reinhardt_hal_integration_tests::{
	Owner, Pet, Tag, pet_record, pet_records, pet_shop_registry, pet_shop_routes,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

struct PetShop {
	registry: Arc<ModelRegistry>,
	routes: Arc<RouteTable>,
	settings: Arc<HalSettings>,
}

impl PetShop {
	fn serializer(&self, model: &str) -> HalModelSerializer {
		HalModelSerializer::new(Arc::clone(&self.registry), model)
			.unwrap()
			.with_settings(Arc::clone(&self.settings))
			.with_url_reverser(self.routes.clone())
	}

	fn detail_serializer(&self) -> HalModelSerializer {
		self.serializer("pet").with_meta(HalMeta::new().with_nested_fields(
			NestedFields::new()
				.relation("owner", ["name"], NestedFields::new())
				.relation("tags", ["label"], NestedFields::new()),
		))
	}
}

#[fixture]
fn shop() -> PetShop {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	PetShop {
		registry: pet_shop_registry().unwrap(),
		routes: pet_shop_routes("http://testserver/").unwrap(),
		settings: Arc::new(HalSettings::default()),
	}
}

fn tom() -> Record {
	let pet = Pet {
		id: 1,
		name: "Tom".to_string(),
		species: "cat".to_string(),
	};
	let owner = Owner {
		id: 1,
		name: "Ann".to_string(),
	};
	let tags = [
		Tag {
			id: 1,
			label: "indoor".to_string(),
		},
		Tag {
			id: 2,
			label: "calm".to_string(),
		},
	];
	pet_record(&pet, &owner, &tags).unwrap()
}

#[rstest]
fn test_detail_representation(shop: PetShop) {
	let representation = shop.detail_serializer().to_representation(&tom()).unwrap();

	assert_eq!(
		representation,
		json!({
			"_links": {
				"self": {"href": "http://testserver/pets/1/"},
				"owner": {"href": "http://testserver/owners/1/"},
				"tags": [
					{"href": "http://testserver/tags/indoor/"},
					{"href": "http://testserver/tags/calm/"}
				]
			},
			"id": 1,
			"name": "Tom",
			"species": "cat",
			"_embedded": {
				"owner": {
					"_links": {"self": {"href": "http://testserver/owners/1/"}},
					"name": "Ann"
				},
				"tags": [
					{"_links": {"self": {"href": "http://testserver/tags/indoor/"}}, "label": "indoor"},
					{"_links": {"self": {"href": "http://testserver/tags/calm/"}}, "label": "calm"}
				]
			}
		})
	);
}

#[rstest]
#[tokio::test]
async fn test_render_then_parse_preserves_document(shop: PetShop) {
	let representation = shop.detail_serializer().to_representation(&tom()).unwrap();

	let body = HalJsonRenderer::new()
		.render(&representation, Some(&RendererContext::new().with_indent(2)))
		.await
		.unwrap();
	let parsed = HalJsonParser::new()
		.parse(Some("application/hal+json"), body)
		.await
		.unwrap();

	assert_eq!(parsed, representation);
	let keys: Vec<_> = parsed.as_object().unwrap().keys().cloned().collect();
	assert_eq!(keys, vec!["_links", "id", "name", "species", "_embedded"]);
}

#[rstest]
#[tokio::test]
async fn test_client_update_with_links(shop: PetShop) {
	let body = Bytes::from(
		r#"{
			"_links": {
				"self": {"href": "http://testserver/pets/1/"},
				"owner": {"href": "http://testserver/owners/2/"},
				"tags": [{"href": "http://testserver/tags/calm/"}]
			},
			"id": 1,
			"name": "Tommy",
			"species": "cat"
		}"#,
	);

	let data = HalJsonParser::new().parse(Some("application/hal+json"), body).await.unwrap();
	let record = shop.serializer("pet").to_internal_value(&data).unwrap();

	assert_eq!(record.value("name"), Some(&json!("Tommy")));
	assert_eq!(
		record.related("owner"),
		Some(&Related::Href(Some("http://testserver/owners/2/".to_string())))
	);
	assert_eq!(
		record.related("tags"),
		Some(&Related::Hrefs(vec!["http://testserver/tags/calm/".to_string()]))
	);
}

#[rstest]
#[tokio::test]
async fn test_client_create_without_links(shop: PetShop) {
	let data = HalJsonParser::new()
		.parse(Some("application/json"), Bytes::from(r#"{"name": "Rex", "species": "dog"}"#))
		.await
		.unwrap();
	assert_eq!(data["_links"], json!({}));

	let record = shop.serializer("pet").to_internal_value(&data).unwrap();

	assert_eq!(record.value("species"), Some(&json!("dog")));
	assert!(record.relations().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_client_create_missing_required_field(shop: PetShop) {
	let data = HalJsonParser::new()
		.parse(Some("application/hal+json"), Bytes::from(r#"{"species": "dog"}"#))
		.await
		.unwrap();

	let err = shop.serializer("pet").to_internal_value(&data).unwrap_err();

	assert!(matches!(err, SerializerError::Validation { ref field, .. } if field == "name"));
}

#[rstest]
fn test_location_header_from_self_link(shop: PetShop) {
	let representation = shop.serializer("pet").to_representation(&tom()).unwrap();

	assert_eq!(
		self_link(&representation, &shop.settings),
		Some("http://testserver/pets/1/")
	);
}

#[rstest]
fn test_embedding_requires_resolved_relation(shop: PetShop) {
	let record = tom().with_related("owner", Related::Href(Some("http://testserver/owners/1/".into())));

	let err = shop.detail_serializer().to_representation(&record).unwrap_err();

	assert!(matches!(err, SerializerError::UnresolvedRelation { .. }));
}

#[rstest]
fn test_embedding_owner_with_all_fields_needs_reverse_relation(shop: PetShop) {
	let serializer = shop.serializer("pet").with_meta(HalMeta::new().with_depth(1));

	let err = serializer.to_representation(&tom()).unwrap_err();

	assert!(matches!(
		err,
		SerializerError::MissingRelation { ref model, ref field } if model == "owner" && field == "pets"
	));
}

#[rstest]
#[tokio::test]
async fn test_paginated_collection(shop: PetShop) {
	let serializer = shop.serializer("pet").with_meta(HalMeta::new().with_fields(["self", "name"]));
	let items = serializer.serialize_many(&pet_records(5).unwrap()).unwrap();
	let Value::Array(items) = items else {
		panic!("expected an array of representations");
	};
	let paginator = HalPageNumberPagination::from_settings(&shop.settings).page_size(2);

	let page = paginator
		.paginate(&items, Some("2"), None, "http://testserver/pets/?species=cat&page=2")
		.unwrap();
	let document = page.to_value().unwrap();

	assert_eq!(
		document,
		json!({
			"_links": {
				"self": {"href": "http://testserver/pets/?species=cat&page=2"},
				"first": {"href": "http://testserver/pets/?species=cat&page=1"},
				"last": {"href": "http://testserver/pets/?species=cat&page=3"},
				"next": {"href": "http://testserver/pets/?species=cat&page=3"},
				"previous": {"href": "http://testserver/pets/?species=cat&page=1"}
			},
			"count": 5,
			"page_size": 2,
			"_embedded": {
				"items": [
					{"_links": {"self": {"href": "http://testserver/pets/3/"}}, "name": "pet-3"},
					{"_links": {"self": {"href": "http://testserver/pets/4/"}}, "name": "pet-4"}
				]
			}
		})
	);

	let body = HalJsonRenderer::new().render(&document, None).await.unwrap();
	assert!(body.starts_with(b"{\"_links\":"));
}

#[rstest]
fn test_paginating_past_the_end(shop: PetShop) {
	let items = shop.serializer("pet").serialize_many(&pet_records(3).unwrap()).unwrap();
	let items = items.as_array().unwrap();

	let result = HalPageNumberPagination::from_settings(&shop.settings).paginate(items, Some("2"), None, "/pets/");

	assert!(matches!(result, Err(PaginationError::PageOutOfRange { page: 2, num_pages: 1 })));
}
