use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use indexmap::IndexSet;
use parking_lot::Mutex;
use resdex_primitives::ResourceType;
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

use super::LeafContents;
use super::parse::ValuesParser;
use super::scan::{FileIndex, Scanner};
use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::node::{ModificationTracker, ResourceItemMap, ResourceRepository, assert_live};

/// A change reported for a path under a resource directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
	Added(PathBuf),
	Changed(PathBuf),
	Removed(PathBuf),
}

impl ResourceChange {
	pub fn path(&self) -> &Path {
		match self {
			Self::Added(path) | Self::Changed(path) | Self::Removed(path) => path,
		}
	}
}

/// Leaf over one resource directory (`res/`).
///
/// The directory is scanned once on construction. Change events only queue the affected
/// path; the next query applies every queued path under the leaf's scan lock and moves
/// the modification count by exactly one, however many paths were queued.
pub struct FolderRepository {
	root: PathBuf,
	label: Arc<str>,
	parser: Arc<dyn ValuesParser>,
	options: ScanOptions,
	published: ArcSwap<LeafContents>,
	tracker: ModificationTracker,
	pending: Mutex<IndexSet<PathBuf, FxBuildHasher>>,
	dirty: AtomicBool,
	/// Per-file declarations; held for the duration of a rescan.
	files: Mutex<FileIndex>,
	disposed: AtomicBool,
}

impl FolderRepository {
	/// Scans `root` synchronously and returns the populated leaf.
	///
	/// Change events must name paths under `root` in the same form (both canonical, or both
	/// as given here).
	pub fn scan(
		root: impl Into<PathBuf>,
		parser: Arc<dyn ValuesParser>,
		options: ScanOptions,
	) -> Result<Self, ScanError> {
		let root = root.into();
		let mut files = FileIndex::new();
		Scanner {
			root: &root,
			parser: parser.as_ref(),
			options: &options,
		}
		.scan_root(&mut files)?;

		let contents = LeafContents::from_files(&files);
		debug!(
			root = %root.display(),
			files = files.len(),
			items = contents.item_count(),
			"resource directory scanned"
		);

		Ok(Self {
			label: Arc::from(root.display().to_string()),
			root,
			parser,
			options,
			published: ArcSwap::from_pointee(contents),
			tracker: ModificationTracker::new(),
			pending: Mutex::new(IndexSet::default()),
			dirty: AtomicBool::new(false),
			files: Mutex::new(files),
			disposed: AtomicBool::new(false),
		})
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Queues a change. The leaf is rescanned lazily on the next query.
	pub fn notify(&self, change: ResourceChange) {
		trace!(root = %self.root.display(), ?change, "change queued");
		self.pending.lock().insert(change.path().to_path_buf());
		self.dirty.store(true, Ordering::Release);
	}

	/// Queues several changes as one batch.
	pub fn notify_all(&self, changes: impl IntoIterator<Item = ResourceChange>) {
		for change in changes {
			self.notify(change);
		}
	}

	/// Returns true if a change for `path` is queued but not applied yet.
	pub fn is_scan_pending(&self, path: &Path) -> bool {
		self.pending.lock().contains(path)
	}

	/// Applies every queued change now.
	pub fn sync(&self) {
		self.assert_live();
		self.ensure_fresh();
	}

	/// Number of files currently contributing declarations.
	pub fn file_count(&self) -> usize {
		self.assert_live();
		self.ensure_fresh();
		self.files.lock().len()
	}

	fn assert_live(&self) {
		assert_live(self.disposed.load(Ordering::Acquire), &self.label);
	}

	fn contents(&self) -> Arc<LeafContents> {
		self.assert_live();
		self.ensure_fresh();
		self.published.load_full()
	}

	fn ensure_fresh(&self) {
		if !self.dirty.load(Ordering::Acquire) {
			return;
		}

		let mut files = self.files.lock();
		self.dirty.store(false, Ordering::Release);
		let batch = std::mem::take(&mut *self.pending.lock());
		if batch.is_empty() {
			// Another reader applied the batch while this one waited for the lock.
			return;
		}

		let scanner = Scanner {
			root: &self.root,
			parser: self.parser.as_ref(),
			options: &self.options,
		};
		for path in &batch {
			scanner.rescan_path(path, &mut files);
		}

		self.published.store(Arc::new(LeafContents::from_files(&files)));
		let generation = self.tracker.bump();
		debug!(
			root = %self.root.display(),
			paths = batch.len(),
			files = files.len(),
			generation,
			"resource directory rescanned"
		);
	}
}

impl LeafContents {
	pub(crate) fn from_files(files: &FileIndex) -> Self {
		Self::from_items(files.values().flatten().cloned())
	}
}

impl ResourceRepository for FolderRepository {
	fn label(&self) -> &str {
		&self.label
	}

	fn modification_count(&self) -> u64 {
		self.assert_live();
		self.ensure_fresh();
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
		self.pending.lock().clear();
		self.published.store(Arc::default());
		debug!(root = %self.root.display(), "resource directory disposed");
	}

	fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Acquire)
	}
}

impl fmt::Debug for FolderRepository {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FolderRepository")
			.field("root", &self.root)
			.field("generation", &self.tracker.get())
			.finish_non_exhaustive()
	}
}
