use std::sync::Arc;

use parking_lot::RwLock;
use resdex_primitives::{ResourceId, ResourceType};
use tracing::{debug, trace};

use super::IdIndex;
use crate::config::IdOptions;
use crate::error::IdError;

/// Mints stable ids for resources that have no compiled id yet.
///
/// Lookups of already-assigned ids take the read lock only. Entries are never evicted:
/// a resource that disappears keeps its id in case it comes back.
#[derive(Debug)]
pub struct DynamicIdAllocator {
	table: RwLock<DynamicIdTable>,
}

#[derive(Debug)]
struct DynamicIdTable {
	base: i32,
	/// Last minted id, or the base before the first allocation.
	seed: i32,
	index: IdIndex,
}

impl DynamicIdTable {
	fn new(base: i32) -> Self {
		Self {
			base,
			seed: base,
			index: IdIndex::default(),
		}
	}
}

impl DynamicIdAllocator {
	/// Creates an allocator seeded at the start of the dynamic range.
	pub fn new() -> Self {
		Self {
			table: RwLock::new(DynamicIdTable::new(ResourceId::DYNAMIC_MIN)),
		}
	}

	/// Creates an allocator with a custom seed inside the dynamic range.
	pub fn with_base(base: i32) -> Result<Self, IdError> {
		IdOptions { dynamic_base: base }.validate()?;
		Ok(Self {
			table: RwLock::new(DynamicIdTable::new(base)),
		})
	}

	/// Returns the id of `(ty, name)`, minting one on first request.
	///
	/// Concurrent first requests for the same pair agree on a single id.
	pub fn get_or_assign(&self, ty: ResourceType, name: &str) -> Result<ResourceId, IdError> {
		if let Some(id) = self.table.read().index.get(ty, name) {
			return Ok(id);
		}

		let mut table = self.table.write();
		if let Some(id) = table.index.get(ty, name) {
			return Ok(id);
		}
		let last = ResourceId::from_raw(table.seed);
		let next = table
			.seed
			.checked_add(1)
			.ok_or(IdError::Exhausted { last })?;
		table.seed = next;
		let id = ResourceId::from_raw(next);
		table.index.insert(ty, Arc::from(name), id);
		trace!(%ty, resource = name, %id, "dynamic id assigned");
		Ok(id)
	}

	/// Returns the id already assigned to `(ty, name)`, without minting.
	pub fn get(&self, ty: ResourceType, name: &str) -> Option<ResourceId> {
		self.table.read().index.get(ty, name)
	}

	pub fn resolve(&self, id: ResourceId) -> Option<(ResourceType, Arc<str>)> {
		if !id.is_dynamic() {
			return None;
		}
		self.table.read().index.resolve(id)
	}

	/// Assigns dynamic ids to every attribute of a styleable and records the array.
	///
	/// Returns the array in attribute order; calling again with the same attributes
	/// returns the same array.
	pub fn declare_styleable(&self, name: &str, attrs: &[&str]) -> Result<Arc<[ResourceId]>, IdError> {
		let ids: Arc<[ResourceId]> = attrs
			.iter()
			.map(|attr| self.get_or_assign(ResourceType::Attr, attr))
			.collect::<Result<_, _>>()?;
		self.table
			.write()
			.index
			.insert_styleable(Arc::from(name), Arc::clone(&ids));
		Ok(ids)
	}

	/// Name of the styleable declared with exactly this array.
	pub fn resolve_styleable_array(&self, ids: &[ResourceId]) -> Option<Arc<str>> {
		self.table.read().index.styleable_name(ids)
	}

	/// Number of assigned ids.
	pub fn len(&self) -> usize {
		self.table.read().index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Forgets every assignment and rewinds the seed. Only for full context disposal.
	pub fn reset(&self) {
		let mut table = self.table.write();
		let dropped = table.index.len();
		table.index.clear();
		table.seed = table.base;
		debug!(dropped, "dynamic ids reset");
	}
}

impl Default for DynamicIdAllocator {
	fn default() -> Self {
		Self::new()
	}
}
