//! Leaf repositories: one physical or synthetic source each.
//!
//! # Role
//!
//! Every leaf publishes an immutable [`LeafContents`] through an `ArcSwap` and owns a
//! [`ModificationTracker`](crate::node::ModificationTracker). Readers never take a lock on
//! a clean leaf. A leaf never merges across sources; that is the composite's job.
//!
//! # Kinds
//!
//! | Type | Source | Changes |
//! |------|--------|---------|
//! | [`FolderRepository`] | one resource directory | change events, batched |
//! | [`PackageRepository`] | precompiled library or platform package | never |
//! | [`SyntheticRepository`] | build-system-injected values | wholesale replacement |

mod folder;
mod package;
mod parse;
mod scan;
mod synthetic;

use std::collections::BTreeSet;
use std::sync::Arc;

pub use folder::{FolderRepository, ResourceChange};
pub use package::PackageRepository;
pub use parse::{LineParser, NoValues, ParsedItem, ResourceFile, ValuesParser};
use resdex_primitives::{ResourceItem, ResourceType};
use rustc_hash::FxHashMap;
pub use synthetic::SyntheticRepository;

use crate::node::{ResourceItemMap, empty_map};

/// Immutable per-type index of one leaf's items.
#[derive(Debug, Default)]
pub(crate) struct LeafContents {
	by_type: FxHashMap<ResourceType, Arc<ResourceItemMap>>,
}

impl LeafContents {
	/// Groups items by type and name, keeping declaration order.
	///
	/// Repeated `(type, name, qualifiers)` declarations are tolerated: for types other than
	/// `Id` the later declaration replaces the earlier one in place.
	pub(crate) fn from_items<I>(items: I) -> Self
	where
		I: IntoIterator<Item = Arc<ResourceItem>>,
	{
		let mut by_type: FxHashMap<ResourceType, ResourceItemMap> = FxHashMap::default();
		for item in items {
			let list = by_type
				.entry(item.ty())
				.or_default()
				.entry(Arc::clone(item.name_arc()))
				.or_default();

			if !item.ty().allows_duplicates()
				&& let Some(slot) = list.iter_mut().find(|e| e.qualifiers() == item.qualifiers())
			{
				tracing::trace!(
					reference = %item.reference(),
					qualifiers = %item.qualifiers(),
					"duplicate declaration; last one wins"
				);
				*slot = item;
				continue;
			}
			list.push(item);
		}

		Self {
			by_type: by_type
				.into_iter()
				.map(|(ty, map)| (ty, Arc::new(map)))
				.collect(),
		}
	}

	pub(crate) fn items_of_type(&self, ty: ResourceType) -> Arc<ResourceItemMap> {
		self.by_type.get(&ty).cloned().unwrap_or_else(empty_map)
	}

	pub(crate) fn has_item(&self, ty: ResourceType, name: &str) -> bool {
		self.by_type.get(&ty).is_some_and(|map| map.contains_key(name))
	}

	pub(crate) fn has_any_of_type(&self, ty: ResourceType) -> bool {
		self.by_type.get(&ty).is_some_and(|map| !map.is_empty())
	}

	pub(crate) fn types_present(&self) -> BTreeSet<ResourceType> {
		self.by_type
			.iter()
			.filter(|(_, map)| !map.is_empty())
			.map(|(ty, _)| *ty)
			.collect()
	}

	/// Total number of declarations.
	pub(crate) fn item_count(&self) -> usize {
		self.by_type
			.values()
			.flat_map(|map| map.values())
			.map(|list| list.len())
			.sum()
	}
}

#[cfg(test)]
mod tests;
