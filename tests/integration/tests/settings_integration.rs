//! Layered settings driving serializers, parsers and pagination

use bytes::Bytes;
use reinhardt_hal::conf::{DefaultSource, EnvSource, HalSettings, SettingsBuilder, TomlFileSource};
use reinhardt_hal::pagination::HalPageNumberPagination;
use reinhardt_hal::parsers::{HalJsonParser, Parser};
use reinhardt_hal::renderers::{HalJsonRenderer, Renderer};
use reinhardt_hal::serializers::{HalMeta, HalModelSerializer, self_link};
use reinhardt_hal_integration_tests::{pet_records, pet_shop_registry, pet_shop_routes};
use rstest::rstest;
use serial_test::serial;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn settings_file(content: &str) -> NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
	file.write_all(content.as_bytes()).unwrap();
	file
}

fn build(file: &NamedTempFile) -> HalSettings {
	SettingsBuilder::new()
		.add_source(DefaultSource::new())
		.add_source(TomlFileSource::new(file.path()))
		.add_source(EnvSource::new().with_prefix("HAL_IT_"))
		.build()
		.unwrap()
}

#[rstest]
#[serial(hal_env)]
fn test_toml_group_names_reach_the_serializer() {
	let file = settings_file(
		r#"
[hal]
links_field_name = "links"
embedded_field_name = "embedded"
default_depth = 1
"#,
	);
	let settings = Arc::new(build(&file));
	let serializer = HalModelSerializer::new(pet_shop_registry().unwrap(), "pet")
		.unwrap()
		.with_settings(Arc::clone(&settings))
		.with_url_reverser(pet_shop_routes("http://testserver/").unwrap())
		.with_meta(HalMeta::new().with_exclude(["owner"]));
	let records = pet_records(1).unwrap();

	let representation = serializer.to_representation(&records[0]).unwrap();

	let keys: Vec<_> = representation.as_object().unwrap().keys().cloned().collect();
	assert_eq!(keys, vec!["links", "id", "name", "species", "embedded"]);
	assert_eq!(self_link(&representation, &settings), Some("http://testserver/pets/1/"));
	assert_eq!(representation["embedded"]["tags"], serde_json::json!([]));
}

#[rstest]
#[serial(hal_env)]
fn test_environment_overrides_file() {
	let file = settings_file("page_size = 3\npretty_print = false\n");
	// SAFETY: serialized with every other test touching HAL_IT_ variables
	unsafe {
		std::env::set_var("HAL_IT_PAGE_SIZE", "2");
		std::env::set_var("HAL_IT_PRETTY_PRINT", "true");
	}

	let settings = build(&file);

	unsafe {
		std::env::remove_var("HAL_IT_PAGE_SIZE");
		std::env::remove_var("HAL_IT_PRETTY_PRINT");
	}
	assert_eq!(settings.page_size, 2);
	assert!(settings.pretty_print);
	assert_eq!(HalJsonRenderer::from_settings(&settings).indent, Some(2));

	let items: Vec<i32> = (1..=5).collect();
	let page = HalPageNumberPagination::from_settings(&settings)
		.paginate(&items, Some("last"), None, "/numbers/")
		.unwrap();
	assert_eq!(page.items, vec![5]);
	assert_eq!(page.num_pages, 3);
}

#[rstest]
#[serial(hal_env)]
fn test_conflicting_group_names_are_rejected() {
	let file = settings_file("links_field_name = \"_embedded\"\n");

	let result = SettingsBuilder::new()
		.add_source(DefaultSource::new())
		.add_source(TomlFileSource::new(file.path()))
		.build();

	assert!(result.is_err());
}

#[rstest]
#[serial(hal_env)]
#[tokio::test]
async fn test_parser_and_renderer_follow_settings() {
	let file = settings_file("links_field_name = \"links\"\npretty_print = true\n");
	let settings = build(&file);

	let parsed = HalJsonParser::from_settings(&settings)
		.parse(Some("application/hal+json"), Bytes::from(r#"{"name": "Rex"}"#))
		.await
		.unwrap();
	let body = HalJsonRenderer::from_settings(&settings)
		.render(&parsed, None)
		.await
		.unwrap();

	assert_eq!(
		std::str::from_utf8(&body).unwrap(),
		"{\n  \"links\": {},\n  \"name\": \"Rex\"\n}"
	);
}
