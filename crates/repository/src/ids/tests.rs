use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use resdex_primitives::{ResourceId, ResourceType};

use super::*;
use crate::error::IdError;

fn compiled(ty: ResourceType, name: &str, raw: i32) -> CompiledIdTable {
	let mut table = CompiledIdTable::new();
	table.insert(ty, name, ResourceId::from_raw(raw)).unwrap();
	table
}

#[test]
fn first_minted_id_is_one_above_the_base() {
	let ids = DynamicIdAllocator::new();
	let id = ids.get_or_assign(ResourceType::Drawable, "icon").unwrap();
	assert_eq!(id.raw(), ResourceId::DYNAMIC_MIN + 1);
	assert!(id.is_dynamic());
	assert_eq!(id.package(), ResourceId::APP_PACKAGE);
}

#[test]
fn same_name_in_different_types_gets_different_ids() {
	let ids = DynamicIdAllocator::new();
	let a = ids.get_or_assign(ResourceType::String, "title").unwrap();
	let b = ids.get_or_assign(ResourceType::Id, "title").unwrap();
	assert_ne!(a, b);
	assert_eq!(ids.resolve(b), Some((ResourceType::Id, Arc::from("title"))));
}

#[test]
fn exhausting_the_range_is_an_error() {
	let ids = DynamicIdAllocator::with_base(ResourceId::DYNAMIC_MAX - 1).unwrap();
	let last = ids.get_or_assign(ResourceType::Id, "a").unwrap();
	assert_eq!(last.raw(), ResourceId::DYNAMIC_MAX);
	assert_eq!(
		ids.get_or_assign(ResourceType::Id, "b"),
		Err(IdError::Exhausted { last })
	);
	// Already-assigned ids keep resolving.
	assert_eq!(ids.get_or_assign(ResourceType::Id, "a"), Ok(last));
}

#[test]
fn base_outside_dynamic_range_is_rejected() {
	assert!(matches!(
		DynamicIdAllocator::with_base(0x7f01_0000),
		Err(IdError::InvalidBase { .. })
	));
}

#[test]
fn reset_rewinds_the_seed() {
	let ids = DynamicIdAllocator::new();
	let first = ids.get_or_assign(ResourceType::Layout, "main").unwrap();
	ids.get_or_assign(ResourceType::Layout, "other").unwrap();
	ids.reset();
	assert!(ids.is_empty());
	assert_eq!(ids.resolve(first), None);
	assert_eq!(ids.get_or_assign(ResourceType::Color, "accent").unwrap(), first);
}

#[test]
fn concurrent_first_requests_agree() {
	let ids = Arc::new(DynamicIdAllocator::new());
	let handles: Vec<_> = (0..8)
		.map(|_| {
			let ids = Arc::clone(&ids);
			thread::spawn(move || {
				(0..64)
					.map(|i| ids.get_or_assign(ResourceType::Id, &format!("id{i}")).unwrap())
					.collect::<Vec<_>>()
			})
		})
		.collect();
	let results: Vec<Vec<ResourceId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
	for result in &results[1..] {
		assert_eq!(result, &results[0]);
	}
	assert_eq!(ids.len(), 64);
}

#[test]
fn styleable_arrays_resolve_by_value() {
	let ids = DynamicIdAllocator::new();
	let array = ids.declare_styleable("MyView", &["color", "size"]).unwrap();
	assert_eq!(array.len(), 2);
	let copy: Vec<ResourceId> = array.to_vec();
	assert_eq!(ids.resolve_styleable_array(&copy).as_deref(), Some("MyView"));
	assert_eq!(ids.resolve_styleable_array(&copy[..1]), None);
	assert_eq!(ids.declare_styleable("MyView", &["color", "size"]).unwrap(), array);
}

#[test]
fn compiled_table_rejects_dynamic_ids() {
	let mut table = CompiledIdTable::new();
	let dynamic = ResourceId::from_raw(ResourceId::DYNAMIC_MIN + 5);
	assert_eq!(
		table.insert(ResourceType::String, "x", dynamic),
		Err(IdError::NotCompiled { id: dynamic })
	);
	assert!(table.insert_styleable("S", &[dynamic]).is_err());
	assert!(table.is_empty());
}

#[test]
fn compiled_table_extend_lets_later_win() {
	let mut table = compiled(ResourceType::String, "app_name", 0x7f0c_0001);
	table.extend(&compiled(ResourceType::String, "app_name", 0x7f0c_0002));
	assert_eq!(
		table.id_of(ResourceType::String, "app_name"),
		Some(ResourceId::from_raw(0x7f0c_0002))
	);
	assert_eq!(table.resolve(ResourceId::from_raw(0x7f0c_0001)), None);
	assert_eq!(table.len(), 1);
}

#[test]
fn resolver_prefers_compiled_ids() {
	let resolver = ResourceIdResolver::new(
		compiled(ResourceType::String, "app_name", 0x7f0c_0001),
		DynamicIdAllocator::new(),
	);
	assert_eq!(
		resolver.id_for(ResourceType::String, "app_name").unwrap().raw(),
		0x7f0c_0001
	);
	let fresh = resolver.id_for(ResourceType::String, "added_while_editing").unwrap();
	assert!(fresh.is_dynamic());
	assert_eq!(
		resolver.resolve(fresh),
		Some((ResourceType::String, Arc::from("added_while_editing")))
	);
	assert_eq!(
		resolver.resolve(ResourceId::from_raw(0x7f0c_0001)),
		Some((ResourceType::String, Arc::from("app_name")))
	);
	assert_eq!(resolver.resolve(ResourceId::from_raw(0x7f0c_0099)), None);
}

#[test]
fn resolver_swaps_compiled_table() {
	let resolver = ResourceIdResolver::default();
	let dynamic = resolver.id_for(ResourceType::Layout, "main").unwrap();

	let mut table = compiled(ResourceType::Layout, "main", 0x7f0b_0000);
	table
		.insert_styleable("MyView", &[ResourceId::from_raw(0x7f01_0000), ResourceId::from_raw(0x7f01_0001)])
		.unwrap();
	resolver.set_compiled(table);

	assert_eq!(resolver.id_for(ResourceType::Layout, "main").unwrap().raw(), 0x7f0b_0000);
	// The old dynamic id is still reverse-resolvable for in-flight callers.
	assert_eq!(resolver.resolve(dynamic), Some((ResourceType::Layout, Arc::from("main"))));
	assert_eq!(
		resolver
			.resolve_styleable_array(&[ResourceId::from_raw(0x7f01_0000), ResourceId::from_raw(0x7f01_0001)])
			.as_deref(),
		Some("MyView")
	);
}

proptest! {
	#[test]
	fn distinct_names_get_distinct_dynamic_ids(names in proptest::collection::hash_set("[a-z_]{1,12}", 1..64)) {
		let ids = DynamicIdAllocator::new();
		let mut seen = std::collections::HashSet::new();
		for name in &names {
			let id = ids.get_or_assign(ResourceType::Drawable, name).unwrap();
			prop_assert!(id.is_dynamic());
			prop_assert!(!id.is_compiled());
			prop_assert!(seen.insert(id));
			prop_assert_eq!(ids.get_or_assign(ResourceType::Drawable, name).unwrap(), id);
		}
	}
}
