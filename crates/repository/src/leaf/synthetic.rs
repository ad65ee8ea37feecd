use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use resdex_primitives::{ResourceItem, ResourceType};

use super::LeafContents;
use crate::node::{ModificationTracker, ResourceItemMap, ResourceRepository, assert_live};

/// Leaf over values injected by the build system rather than read from files.
pub struct SyntheticRepository {
	label: Arc<str>,
	values: Mutex<Vec<ResourceItem>>,
	published: ArcSwap<LeafContents>,
	tracker: ModificationTracker,
	disposed: AtomicBool,
}

impl SyntheticRepository {
	pub fn new(label: impl Into<Arc<str>>) -> Self {
		Self::with_values(label, Vec::new())
	}

	pub fn with_values(label: impl Into<Arc<str>>, values: Vec<ResourceItem>) -> Self {
		let contents = LeafContents::from_items(values.iter().cloned().map(Arc::new));
		Self {
			label: label.into(),
			values: Mutex::new(values),
			published: ArcSwap::from_pointee(contents),
			tracker: ModificationTracker::new(),
			disposed: AtomicBool::new(false),
		}
	}

	/// Replaces every value. Returns false, without touching the modification count, if
	/// the new values equal the current ones.
	pub fn set_values(&self, values: Vec<ResourceItem>) -> bool {
		self.assert_live();
		let mut current = self.values.lock();
		if *current == values {
			return false;
		}
		let contents = LeafContents::from_items(values.iter().cloned().map(Arc::new));
		*current = values;
		self.published.store(Arc::new(contents));
		let generation = self.tracker.bump();
		tracing::debug!(label = %self.label, values = current.len(), generation, "synthetic values replaced");
		true
	}

	/// Returns a copy of the current values in declaration order.
	pub fn values(&self) -> Vec<ResourceItem> {
		self.values.lock().clone()
	}

	fn assert_live(&self) {
		assert_live(self.disposed.load(Ordering::Acquire), &self.label);
	}

	fn contents(&self) -> Arc<LeafContents> {
		self.assert_live();
		self.published.load_full()
	}
}

impl ResourceRepository for SyntheticRepository {
	fn label(&self) -> &str {
		&self.label
	}

	fn modification_count(&self) -> u64 {
		self.assert_live();
		self.tracker.get()
	}

	fn items_of_type(&self, ty: ResourceType) -> Arc<ResourceItemMap> {
		self.contents().items_of_type(ty)
	}

	fn has_item(&self, ty: ResourceType, name: &str) -> bool {
		self.contents().has_item(ty, name)
	}

	fn has_any_of_type(&self, ty: ResourceType) -> bool {
		self.contents().has_any_of_type(ty)
	}

	fn types_present(&self) -> BTreeSet<ResourceType> {
		self.contents().types_present()
	}

	fn dispose(&self) {
		if self.disposed.swap(true, Ordering::AcqRel) {
			return;
		}
		self.published.store(Arc::default());
		tracing::debug!(label = %self.label, "synthetic values disposed");
	}

	fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Acquire)
	}
}

impl fmt::Debug for SyntheticRepository {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SyntheticRepository")
			.field("label", &self.label)
			.field("generation", &self.tracker.get())
			.finish_non_exhaustive()
	}
}
