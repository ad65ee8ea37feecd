use std::sync::Arc;

use arc_swap::ArcSwap;
use resdex_primitives::{ResourceId, ResourceType};

use super::{CompiledIdTable, DynamicIdAllocator};
use crate::error::IdError;

/// Id lookups for one project context: compiled ids first, dynamic ids for the rest.
#[derive(Debug)]
pub struct ResourceIdResolver {
	compiled: ArcSwap<CompiledIdTable>,
	dynamic: DynamicIdAllocator,
}

impl ResourceIdResolver {
	pub fn new(compiled: CompiledIdTable, dynamic: DynamicIdAllocator) -> Self {
		Self {
			compiled: ArcSwap::from_pointee(compiled),
			dynamic,
		}
	}

	/// Returns the compiled id of `(ty, name)` if known, else its dynamic id.
	pub fn id_for(&self, ty: ResourceType, name: &str) -> Result<ResourceId, IdError> {
		match self.compiled.load().id_of(ty, name) {
			Some(id) => Ok(id),
			None => self.dynamic.get_or_assign(ty, name),
		}
	}

	pub fn resolve(&self, id: ResourceId) -> Option<(ResourceType, Arc<str>)> {
		if id.is_dynamic() {
			return self.dynamic.resolve(id);
		}
		self.compiled.load().resolve(id)
	}

	pub fn resolve_styleable_array(&self, ids: &[ResourceId]) -> Option<Arc<str>> {
		self.compiled
			.load()
			.styleable_name(ids)
			.or_else(|| self.dynamic.resolve_styleable_array(ids))
	}

	/// Publishes a new compiled table, typically after a build.
	///
	/// Dynamic ids stay assigned; names that now have a compiled id simply stop using them.
	pub fn set_compiled(&self, table: CompiledIdTable) {
		tracing::debug!(entries = table.len(), "compiled id table replaced");
		self.compiled.store(Arc::new(table));
	}

	pub fn compiled(&self) -> Arc<CompiledIdTable> {
		self.compiled.load_full()
	}

	pub fn dynamic(&self) -> &DynamicIdAllocator {
		&self.dynamic
	}
}

impl Default for ResourceIdResolver {
	fn default() -> Self {
		Self::new(CompiledIdTable::default(), DynamicIdAllocator::new())
	}
}
