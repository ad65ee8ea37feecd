use std::sync::Arc;

use resdex_primitives::{ResourceId, ResourceType};

use super::IdIndex;
use crate::error::IdError;

/// Ids assigned by a resource compiler, owned by the caller.
///
/// Built once per package from its symbol table and never mutated after publication;
/// the resolver swaps whole tables instead.
#[derive(Debug, Clone, Default)]
pub struct CompiledIdTable {
	index: IdIndex,
}

impl CompiledIdTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a compiled id. Ids from the dynamic range are rejected.
	pub fn insert(&mut self, ty: ResourceType, name: &str, id: ResourceId) -> Result<(), IdError> {
		if !id.is_compiled() {
			return Err(IdError::NotCompiled { id });
		}
		self.index.insert(ty, Arc::from(name), id);
		Ok(())
	}

	/// Records a declared styleable array, reverse-indexed by its full value.
	pub fn insert_styleable(&mut self, name: &str, ids: &[ResourceId]) -> Result<(), IdError> {
		if let Some(&id) = ids.iter().find(|id| !id.is_compiled()) {
			return Err(IdError::NotCompiled { id });
		}
		self.index.insert_styleable(Arc::from(name), Arc::from(ids));
		Ok(())
	}

	pub fn id_of(&self, ty: ResourceType, name: &str) -> Option<ResourceId> {
		self.index.get(ty, name)
	}

	pub fn resolve(&self, id: ResourceId) -> Option<(ResourceType, Arc<str>)> {
		self.index.resolve(id)
	}

	/// Name of the styleable whose array equals `ids` element for element.
	pub fn styleable_name(&self, ids: &[ResourceId]) -> Option<Arc<str>> {
		self.index.styleable_name(ids)
	}

	/// Merges `other` into `self`; entries of `other` win.
	pub fn extend(&mut self, other: &CompiledIdTable) {
		self.index.extend(&other.index);
	}

	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
