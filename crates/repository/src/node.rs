//! The query contract shared by every repository in the tree.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use resdex_primitives::{ResourceItem, ResourceType};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

/// Qualified variants declared for one resource name, in precedence order.
pub type ItemList = SmallVec<[Arc<ResourceItem>; 2]>;

/// Name → variants for one resource type, in insertion order.
pub type ResourceItemMap = IndexMap<Arc<str>, ItemList, FxBuildHasher>;

static EMPTY: LazyLock<Arc<ResourceItemMap>> = LazyLock::new(Arc::default);

/// Returns the shared empty map.
pub(crate) fn empty_map() -> Arc<ResourceItemMap> {
	Arc::clone(&EMPTY)
}

/// A node of the repository tree: a leaf over one source, or a composite of children.
///
/// Queries for missing data return empty results. Querying a disposed node is a lifecycle
/// bug in the caller and panics.
pub trait ResourceRepository: Send + Sync + fmt::Debug {
	/// Short human-readable label for logs.
	fn label(&self) -> &str;

	/// Returns the current modification count.
	///
	/// The count never decreases and moves whenever a later query could return different
	/// data. Leaves with pending changes apply them first.
	fn modification_count(&self) -> u64;

	/// Returns the authoritative view of one resource type.
	fn items_of_type(&self, ty: ResourceType) -> Arc<ResourceItemMap>;

	/// Returns the variants of one resource; empty if it is not declared.
	fn items(&self, ty: ResourceType, name: &str) -> ItemList {
		self.items_of_type(ty).get(name).cloned().unwrap_or_default()
	}

	fn has_item(&self, ty: ResourceType, name: &str) -> bool {
		self.items_of_type(ty).contains_key(name)
	}

	fn has_any_of_type(&self, ty: ResourceType) -> bool {
		!self.items_of_type(ty).is_empty()
	}

	/// Returns every type with at least one declaration.
	fn types_present(&self) -> BTreeSet<ResourceType>;

	/// Releases the node. Later queries panic.
	fn dispose(&self);

	fn is_disposed(&self) -> bool;
}

/// Panics with the node label if the node has been disposed.
#[track_caller]
pub(crate) fn assert_live(disposed: bool, label: &str) {
	if disposed {
		panic!("query on disposed resource repository `{label}`");
	}
}

/// Monotonic modification counter for a leaf.
#[derive(Debug)]
pub struct ModificationTracker(AtomicU64);

impl ModificationTracker {
	pub const fn new() -> Self {
		Self(AtomicU64::new(1))
	}

	/// Returns the current count.
	#[inline]
	pub fn get(&self) -> u64 {
		self.0.load(Ordering::Acquire)
	}

	/// Increments the count and returns the new value.
	#[inline]
	pub fn bump(&self) -> u64 {
		self.0.fetch_add(1, Ordering::AcqRel) + 1
	}
}

impl Default for ModificationTracker {
	fn default() -> Self {
		Self::new()
	}
}
