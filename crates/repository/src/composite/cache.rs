//! Per-composite cache bookkeeping.
//!
//! # Role
//!
//! Tracks which children readings the cached maps were built from and owns the composite's
//! modification count. All methods run under the composite's cache lock; none of them call
//! into children.

use std::sync::Arc;

use resdex_primitives::ResourceType;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::node::ResourceItemMap;

/// Children modification counts, in child order.
pub(crate) type Generations = SmallVec<[u64; 8]>;

pub(crate) struct CacheState {
	generation: u64,
	/// Version of the child list the cache was built against.
	version: u64,
	/// Children counts at the last observed change.
	seen: Generations,
	by_type: FxHashMap<ResourceType, Arc<ResourceItemMap>>,
}

impl CacheState {
	pub(crate) fn new(version: u64, gens: &[u64]) -> Self {
		Self {
			generation: initial_generation(gens),
			version,
			seen: Generations::from_slice(gens),
			by_type: FxHashMap::default(),
		}
	}

	/// Folds a fresh reading of the children into the state and returns the generation.
	///
	/// A reading that differs from the last one discards every cached type and bumps the
	/// generation. A reading that is older than the last one (a racing reader loaded the
	/// children before another thread observed newer counts) is ignored.
	pub(crate) fn observe(&mut self, version: u64, gens: &[u64]) -> u64 {
		if version < self.version || (version == self.version && !self.is_newer(gens)) {
			return self.generation;
		}

		let next = self.generation + 1;
		self.generation = match gens {
			// Forward a single child's count so both report the same value when possible.
			[only] => next.max(*only),
			_ => next,
		};
		self.version = version;
		self.seen = Generations::from_slice(gens);
		if !self.by_type.is_empty() {
			tracing::debug!(
				generation = self.generation,
				discarded = self.by_type.len(),
				"child changed; merged cache discarded"
			);
			self.by_type.clear();
		}
		self.generation
	}

	/// Returns true if the cache was built against exactly this reading.
	pub(crate) fn is_current(&self, version: u64, gens: &[u64]) -> bool {
		self.version == version && self.seen.as_slice() == gens
	}

	pub(crate) fn get(&self, ty: ResourceType) -> Option<Arc<ResourceItemMap>> {
		self.by_type.get(&ty).cloned()
	}

	pub(crate) fn store(&mut self, ty: ResourceType, map: Arc<ResourceItemMap>) {
		self.by_type.insert(ty, map);
	}

	pub(crate) fn cached_types(&self) -> usize {
		self.by_type.len()
	}

	pub(crate) fn clear(&mut self) {
		self.by_type.clear();
	}

	fn is_newer(&self, gens: &[u64]) -> bool {
		gens.len() != self.seen.len() || gens.iter().zip(&self.seen).any(|(new, old)| new > old)
	}
}

fn initial_generation(gens: &[u64]) -> u64 {
	match gens {
		[only] => *only,
		_ => 1,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cached(state: &mut CacheState) {
		state.store(ResourceType::String, Arc::default());
	}

	#[test]
	fn unchanged_reading_keeps_cache_and_generation() {
		let mut state = CacheState::new(1, &[3, 4]);
		cached(&mut state);
		assert_eq!(state.observe(1, &[3, 4]), 1);
		assert_eq!(state.cached_types(), 1);
	}

	#[test]
	fn child_change_bumps_and_clears() {
		let mut state = CacheState::new(1, &[3, 4]);
		cached(&mut state);
		assert_eq!(state.observe(1, &[3, 5]), 2);
		assert_eq!(state.cached_types(), 0);
		assert!(state.is_current(1, &[3, 5]));
	}

	#[test]
	fn stale_reading_is_ignored() {
		let mut state = CacheState::new(1, &[3, 4]);
		assert_eq!(state.observe(1, &[3, 6]), 2);
		cached(&mut state);
		assert_eq!(state.observe(1, &[3, 5]), 2);
		assert_eq!(state.cached_types(), 1);
		assert_eq!(state.observe(0, &[9, 9]), 2);
	}

	#[test]
	fn new_child_list_bumps() {
		let mut state = CacheState::new(1, &[3, 4]);
		assert_eq!(state.observe(2, &[3, 4]), 2);
		assert_eq!(state.observe(3, &[1]), 3);
	}

	#[test]
	fn single_child_count_is_forwarded() {
		let mut state = CacheState::new(1, &[7]);
		assert_eq!(state.observe(1, &[7]), 7);
		assert_eq!(state.observe(1, &[12]), 12);
		// A replacement child with a lower count must not move the generation backwards.
		assert_eq!(state.observe(2, &[2]), 13);
	}
}
