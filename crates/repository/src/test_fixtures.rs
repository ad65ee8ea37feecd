//! Shared helpers for unit tests.

use std::path::Path;
use std::sync::Arc;

use resdex_primitives::{Qualifiers, ResourceItem, ResourceType};

use crate::ids::CompiledIdTable;
use crate::leaf::{PackageRepository, SyntheticRepository};
use crate::node::{ResourceItemMap, ResourceRepository};

/// Groups items by name, in order, with no deduplication.
pub(crate) fn item_map(items: Vec<ResourceItem>) -> ResourceItemMap {
	let mut map = ResourceItemMap::default();
	for item in items {
		map.entry(Arc::clone(item.name_arc()))
			.or_default()
			.push(Arc::new(item));
	}
	map
}

/// Text values declared for `name`, in map order.
pub(crate) fn values(map: &ResourceItemMap, name: &str) -> Vec<String> {
	map.get(name)
		.map(|items| items.iter().map(|item| item.value().to_string()).collect())
		.unwrap_or_default()
}

pub(crate) fn string(name: &str, text: &str) -> ResourceItem {
	ResourceItem::text(ResourceType::String, name, text)
}

pub(crate) fn qualified(name: &str, text: &str, qualifiers: &str) -> ResourceItem {
	string(name, text).with_qualifiers(Qualifiers::new(qualifiers))
}

pub(crate) fn synthetic(label: &str, items: Vec<ResourceItem>) -> Arc<SyntheticRepository> {
	Arc::new(SyntheticRepository::with_values(label, items))
}

pub(crate) fn package(name: &str, items: Vec<ResourceItem>) -> Arc<PackageRepository> {
	Arc::new(PackageRepository::library(name, items, CompiledIdTable::new()))
}

/// Erases a concrete repository for use as a composite child.
pub(crate) fn node<R: ResourceRepository + 'static>(repo: &Arc<R>) -> Arc<dyn ResourceRepository> {
	Arc::clone(repo) as Arc<dyn ResourceRepository>
}

/// Writes `contents` to `root/relative`, creating parent folders.
pub(crate) fn write_file(root: &Path, relative: &str, contents: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap();
	}
	std::fs::write(path, contents).unwrap();
}
