//! Numeric resource ids.
//!
//! # Role
//!
//! Translates between `(type, name)` pairs and [`ResourceId`](resdex_primitives::ResourceId)s.
//! Compiled ids come from a caller-owned [`CompiledIdTable`]; resources without one get a
//! stable dynamic id from the [`DynamicIdAllocator`]. The two numeric spaces are disjoint,
//! so [`ResourceIdResolver`] never has to guess which table an id belongs to.
//!
//! # Invariants
//!
//! - A `(type, name)` pair keeps its dynamic id until the allocator is reset (see
//!   `invariants::test_dynamic_id_stability`).
//! - Dynamic ids are never handed out twice and never fall in the compiled range.
//! - Exhausting the dynamic range is an error, never a wrap.

mod compiled;
mod dynamic;
mod resolver;

pub use compiled::CompiledIdTable;
pub use dynamic::DynamicIdAllocator;
pub use resolver::ResourceIdResolver;

use std::sync::Arc;

use resdex_primitives::{ResourceId, ResourceType};
use rustc_hash::FxHashMap;

/// Two-way `(type, name)` ↔ id index shared by both tables.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdIndex {
	by_name: FxHashMap<ResourceType, FxHashMap<Arc<str>, ResourceId>>,
	by_id: FxHashMap<ResourceId, (ResourceType, Arc<str>)>,
	styleables: FxHashMap<Arc<[ResourceId]>, Arc<str>>,
}

impl IdIndex {
	pub(crate) fn get(&self, ty: ResourceType, name: &str) -> Option<ResourceId> {
		self.by_name.get(&ty)?.get(name).copied()
	}

	pub(crate) fn resolve(&self, id: ResourceId) -> Option<(ResourceType, Arc<str>)> {
		self.by_id.get(&id).cloned()
	}

	/// Records both directions. A previous id of the same `(type, name)` stops resolving.
	pub(crate) fn insert(&mut self, ty: ResourceType, name: Arc<str>, id: ResourceId) {
		if let Some(old) = self
			.by_name
			.entry(ty)
			.or_default()
			.insert(Arc::clone(&name), id)
			&& old != id
		{
			self.by_id.remove(&old);
		}
		self.by_id.insert(id, (ty, name));
	}

	pub(crate) fn insert_styleable(&mut self, name: Arc<str>, ids: Arc<[ResourceId]>) {
		self.styleables.insert(ids, name);
	}

	pub(crate) fn styleable_name(&self, ids: &[ResourceId]) -> Option<Arc<str>> {
		self.styleables.get(ids).cloned()
	}

	pub(crate) fn extend(&mut self, other: &IdIndex) {
		for (id, (ty, name)) in &other.by_id {
			self.insert(*ty, Arc::clone(name), *id);
		}
		for (ids, name) in &other.styleables {
			self.styleables.insert(Arc::clone(ids), Arc::clone(name));
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.by_id.len()
	}

	pub(crate) fn clear(&mut self) {
		self.by_name.clear();
		self.by_id.clear();
		self.styleables.clear();
	}
}

#[cfg(test)]
mod tests;
