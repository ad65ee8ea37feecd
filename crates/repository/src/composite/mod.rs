//! Composite repositories: ordered aggregates of child repositories.
//!
//! # Role
//!
//! A [`CompositeRepository`] merges its children's items per resource type on demand and
//! caches the result until a child's modification count moves. Children are polled on
//! every query; they hold no reference back to their parents, so one child may sit under
//! any number of composites.
//!
//! # Invariants
//!
//! - The cache lock is never held while calling into a child.
//! - A merge is only cached if the children readings before and after it are identical and
//!   still current (see `invariants::test_concurrent_change_never_caches_stale_merge`).
//! - Replacing the child list is a single atomic swap; readers see the old list or the new
//!   one, never a mix.

pub(crate) mod cache;
pub(crate) mod merge;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use resdex_primitives::ResourceType;
use tracing::{debug, trace};

use self::cache::{CacheState, Generations};
use crate::node::{ResourceItemMap, ResourceRepository, assert_live, empty_map};

/// Child list published as one unit.
struct ChildList {
	version: u64,
	nodes: Vec<Arc<dyn ResourceRepository>>,
}

/// One consistent reading of the children and their counts.
struct Reading {
	children: Arc<ChildList>,
	gens: Generations,
}

/// An ordered aggregate of repositories; later children take precedence.
pub struct CompositeRepository {
	label: Arc<str>,
	children: ArcSwap<ChildList>,
	versions: AtomicU64,
	cache: Mutex<CacheState>,
	disposed: AtomicBool,
}

impl CompositeRepository {
	/// Creates a composite over `children`, lowest precedence first.
	pub fn new(label: impl Into<Arc<str>>, children: Vec<Arc<dyn ResourceRepository>>) -> Self {
		let gens: Generations = children.iter().map(|c| c.modification_count()).collect();
		Self {
			label: label.into(),
			children: ArcSwap::from_pointee(ChildList {
				version: 0,
				nodes: children,
			}),
			versions: AtomicU64::new(0),
			cache: Mutex::new(CacheState::new(0, &gens)),
			disposed: AtomicBool::new(false),
		}
	}

	/// Returns the current children, lowest precedence first.
	pub fn children(&self) -> Vec<Arc<dyn ResourceRepository>> {
		self.children.load().nodes.clone()
	}

	pub fn child_count(&self) -> usize {
		self.children.load().nodes.len()
	}

	/// Appends a child with the highest precedence.
	pub fn add_child(&self, child: Arc<dyn ResourceRepository>) {
		self.assert_live();
		self.publish(|current| {
			let mut nodes = current.nodes.clone();
			nodes.push(Arc::clone(&child));
			nodes
		});
		debug!(composite = %self.label, child = child.label(), "child added");
	}

	/// Atomically swaps the whole child list.
	pub fn replace_children(&self, children: Vec<Arc<dyn ResourceRepository>>) {
		self.assert_live();
		let count = children.len();
		self.publish(|_| children.clone());
		debug!(composite = %self.label, children = count, "children replaced");
	}

	/// Number of resource types with a cached merge.
	pub fn cached_type_count(&self) -> usize {
		self.cache.lock().cached_types()
	}

	/// Publishes the list built by `nodes` from the current one.
	///
	/// The version is allocated after loading the list it replaces and the swap only lands
	/// if that list is still current, so published versions only ever grow.
	fn publish(&self, mut nodes: impl FnMut(&ChildList) -> Vec<Arc<dyn ResourceRepository>>) {
		self.children.rcu(|current| {
			let nodes = nodes(&**current);
			ChildList {
				version: self.next_version(),
				nodes,
			}
		});
	}

	fn next_version(&self) -> u64 {
		self.versions.fetch_add(1, Ordering::AcqRel) + 1
	}

	fn assert_live(&self) {
		assert_live(self.disposed.load(Ordering::Acquire), &self.label);
	}

	/// Loads the child list and polls every child. Takes no lock of this composite.
	fn read(&self) -> Reading {
		let children = self.children.load_full();
		let gens = children.nodes.iter().map(|c| c.modification_count()).collect();
		Reading { children, gens }
	}

	fn observe(&self, reading: &Reading) -> u64 {
		self.cache.lock().observe(reading.children.version, &reading.gens)
	}

	/// Returns the cached merge for `ty` if it is current for `reading`.
	fn cached(&self, reading: &Reading, ty: ResourceType) -> Option<Arc<ResourceItemMap>> {
		let mut cache = self.cache.lock();
		cache.observe(reading.children.version, &reading.gens);
		cache.get(ty)
	}
}

impl ResourceRepository for CompositeRepository {
	fn label(&self) -> &str {
		&self.label
	}

	fn modification_count(&self) -> u64 {
		self.assert_live();
		let reading = self.read();
		self.observe(&reading)
	}

	fn items_of_type(&self, ty: ResourceType) -> Arc<ResourceItemMap> {
		self.assert_live();
		let before = self.read();

		match before.children.nodes.as_slice() {
			[] => {
				self.observe(&before);
				return empty_map();
			}
			[only] => {
				self.observe(&before);
				return only.items_of_type(ty);
			}
			_ => {}
		}

		if let Some(hit) = self.cached(&before, ty) {
			trace!(composite = %self.label, %ty, "merged cache hit");
			return hit;
		}

		let merged = Arc::new(merge::merge_children(&before.children.nodes, ty));
		let after = self.read();

		let mut cache = self.cache.lock();
		let unchanged = Arc::ptr_eq(&before.children, &after.children) && before.gens == after.gens;
		if unchanged && cache.is_current(before.children.version, &before.gens) {
			cache.store(ty, Arc::clone(&merged));
			debug!(
				composite = %self.label,
				%ty,
				names = merged.len(),
				children = before.children.nodes.len(),
				"merged"
			);
		} else {
			cache.observe(after.children.version, &after.gens);
			debug!(composite = %self.label, %ty, "children moved during merge; result not cached");
		}
		merged
	}

	fn has_item(&self, ty: ResourceType, name: &str) -> bool {
		self.assert_live();
		let reading = self.read();
		if let Some(map) = self.cached(&reading, ty) {
			return map.contains_key(name);
		}
		reading.children.nodes.iter().any(|c| c.has_item(ty, name))
	}

	fn has_any_of_type(&self, ty: ResourceType) -> bool {
		self.assert_live();
		let reading = self.read();
		if let Some(map) = self.cached(&reading, ty) {
			return !map.is_empty();
		}
		reading.children.nodes.iter().any(|c| c.has_any_of_type(ty))
	}

	fn types_present(&self) -> BTreeSet<ResourceType> {
		self.assert_live();
		let children = self.children.load_full();
		children
			.nodes
			.iter()
			.flat_map(|c| c.types_present())
			.collect()
	}

	fn dispose(&self) {
		if self.disposed.swap(true, Ordering::AcqRel) {
			return;
		}
		self.publish(|_| Vec::new());
		self.cache.lock().clear();
		debug!(composite = %self.label, "disposed");
	}

	fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Acquire)
	}
}

impl fmt::Debug for CompositeRepository {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let children = self.children.load();
		f.debug_struct("CompositeRepository")
			.field("label", &self.label)
			.field(
				"children",
				&children.nodes.iter().map(|c| c.label()).collect::<Vec<_>>(),
			)
			.finish()
	}
}
