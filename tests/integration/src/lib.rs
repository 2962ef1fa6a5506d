//! Integration test utilities for Reinhardt HAL
//!
//! A small pet shop model graph shared by the integration tests:
//! owners, pets belonging to an owner, and tags attached to pets.

use reinhardt_hal::serializers::{
	ModelField, ModelInfo, ModelRegistry, Record, RouteTable, SerializerResult,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct Owner {
	pub id: i64,
	pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tag {
	pub id: i64,
	pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pet {
	pub id: i64,
	pub name: String,
	pub species: String,
}

/// Registry with the owner, pet and tag models
pub fn pet_shop_registry() -> SerializerResult<Arc<ModelRegistry>> {
	let registry = ModelRegistry::new()
		.with_model(
			ModelInfo::new("owner")
				.field(ModelField::attribute("id"))
				.field(ModelField::attribute("name").required())
				.field(ModelField::reverse("pets", "pet", true)),
		)?
		.with_model(
			ModelInfo::new("tag")
				.with_primary_key("label")
				.field(ModelField::attribute("id"))
				.field(ModelField::attribute("label").required()),
		)?
		.with_model(
			ModelInfo::new("pet")
				.field(ModelField::attribute("id"))
				.field(ModelField::attribute("name").required())
				.field(ModelField::attribute("species"))
				.field(ModelField::foreign_key("owner", "owner"))
				.field(ModelField::many_to_many("tags", "tag")),
		)?;
	registry.validate()?;
	Ok(Arc::new(registry))
}

/// Routes for the pet shop detail views below `base_url`
pub fn pet_shop_routes(base_url: &str) -> SerializerResult<Arc<RouteTable>> {
	let routes = RouteTable::new()
		.with_base_url(base_url)?
		.route("owner-detail", "/owners/{id}/")
		.route("pet-detail", "/pets/{id}/")
		.route("tag-detail", "/tags/{label}/");
	Ok(Arc::new(routes))
}

/// Build a pet record with its owner and tags resolved
pub fn pet_record(pet: &Pet, owner: &Owner, tags: &[Tag]) -> SerializerResult<Record> {
	let owner = Record::from_serialize("owner", owner)?;
	let tags = tags
		.iter()
		.map(|tag| Record::from_serialize("tag", tag))
		.collect::<SerializerResult<Vec<_>>>()?;

	Ok(Record::from_serialize("pet", pet)?
		.with_one("owner", Some(owner))
		.with_many("tags", tags))
}

/// Pets named `pet-1` to `pet-<count>`, all owned by owner 1
pub fn pet_records(count: i64) -> SerializerResult<Vec<Record>> {
	let owner = Owner {
		id: 1,
		name: "Ann".to_string(),
	};
	(1..=count)
		.map(|id| {
			let pet = Pet {
				id,
				name: format!("pet-{}", id),
				species: "cat".to_string(),
			};
			pet_record(&pet, &owner, &[])
		})
		.collect()
}
