use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use resdex_primitives::{ResourceItem, ResourceType, SourceLocation};

use super::LeafContents;
use crate::ids::CompiledIdTable;
use crate::node::{ModificationTracker, ResourceItemMap, ResourceRepository, assert_live};

/// Leaf over a precompiled package: a library archive or the platform itself.
///
/// Contents are decoded by the caller and never change, so the modification count stays
/// at its initial value for the life of the leaf.
pub struct PackageRepository {
	library: Arc<str>,
	framework: bool,
	contents: LeafContents,
	compiled: Arc<CompiledIdTable>,
	tracker: ModificationTracker,
	disposed: AtomicBool,
}

impl PackageRepository {
	/// Creates a library package leaf.
	pub fn library(library: &str, items: Vec<ResourceItem>, compiled: CompiledIdTable) -> Self {
		Self::build(library, false, items, compiled)
	}

	/// Creates the platform package leaf; every item is marked as framework.
	pub fn framework(items: Vec<ResourceItem>, compiled: CompiledIdTable) -> Self {
		Self::build("android", true, items, compiled)
	}

	fn build(library: &str, framework: bool, items: Vec<ResourceItem>, compiled: CompiledIdTable) -> Self {
		let library: Arc<str> = Arc::from(library);
		let source = SourceLocation::Package(Arc::clone(&library));
		let contents = LeafContents::from_items(items.into_iter().map(|item| {
			Arc::new(
				item.with_framework(framework)
					.with_source(source.clone()),
			)
		}));
		tracing::debug!(%library, framework, items = contents.item_count(), "package loaded");
		Self {
			library,
			framework,
			contents,
			compiled: Arc::new(compiled),
			tracker: ModificationTracker::new(),
			disposed: AtomicBool::new(false),
		}
	}

	pub fn library_name(&self) -> &str {
		&self.library
	}

	pub fn is_framework(&self) -> bool {
		self.framework
	}

	/// Compiled ids declared by the package.
	pub fn compiled_ids(&self) -> &Arc<CompiledIdTable> {
		&self.compiled
	}

	fn contents(&self) -> &LeafContents {
		assert_live(self.disposed.load(Ordering::Acquire), &self.library);
		&self.contents
	}
}

impl ResourceRepository for PackageRepository {
	fn label(&self) -> &str {
		&self.library
	}

	fn modification_count(&self) -> u64 {
		assert_live(self.disposed.load(Ordering::Acquire), &self.library);
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
		tracing::debug!(library = %self.library, "package disposed");
	}

	fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Acquire)
	}
}

impl fmt::Debug for PackageRepository {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PackageRepository")
			.field("library", &self.library)
			.field("framework", &self.framework)
			.finish_non_exhaustive()
	}
}
