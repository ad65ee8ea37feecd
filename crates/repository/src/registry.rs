//! Lookup of folder leaves by directory.
//!
//! One [`FolderRepository`] per resource directory, shared by every aggregate that
//! includes the directory. The registry is an ordinary value owned by the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::leaf::{FolderRepository, ValuesParser};
use crate::node::ResourceRepository;

/// Canonical directory path → folder leaf.
pub struct FolderRegistry {
	parser: Arc<dyn ValuesParser>,
	options: ScanOptions,
	leaves: RwLock<FxHashMap<PathBuf, Arc<FolderRepository>>>,
}

impl FolderRegistry {
	pub fn new(parser: Arc<dyn ValuesParser>, options: ScanOptions) -> Self {
		Self {
			parser,
			options,
			leaves: RwLock::new(FxHashMap::default()),
		}
	}

	/// Returns the leaf for `dir`, scanning and registering it on first request.
	///
	/// The scan runs without holding the registry lock. If another thread registers the
	/// same directory meanwhile, its leaf is returned and this one is dropped.
	pub fn get_or_create(&self, dir: &Path) -> Result<Arc<FolderRepository>, ScanError> {
		let key = canonical(dir)?;
		if let Some(leaf) = self.leaves.read().get(&key) {
			return Ok(Arc::clone(leaf));
		}

		let scanned = Arc::new(FolderRepository::scan(
			key.clone(),
			Arc::clone(&self.parser),
			self.options.clone(),
		)?);

		let mut leaves = self.leaves.write();
		if let Some(existing) = leaves.get(&key) {
			let existing = Arc::clone(existing);
			drop(leaves);
			scanned.dispose();
			return Ok(existing);
		}
		leaves.insert(key, Arc::clone(&scanned));
		Ok(scanned)
	}

	/// Returns the leaf for `dir` if one is registered.
	pub fn get(&self, dir: &Path) -> Option<Arc<FolderRepository>> {
		let key = canonical(dir).ok()?;
		self.leaves.read().get(&key).cloned()
	}

	/// Disposes and forgets the leaf for `dir`. Returns false if none was registered.
	pub fn remove(&self, dir: &Path) -> bool {
		let key = canonical(dir).unwrap_or_else(|_| dir.to_path_buf());
		let Some(leaf) = self.leaves.write().remove(&key) else {
			return false;
		};
		leaf.dispose();
		debug!(root = %key.display(), "folder leaf removed");
		true
	}

	/// Disposes and forgets every leaf.
	pub fn reset(&self) {
		let leaves = std::mem::take(&mut *self.leaves.write());
		for leaf in leaves.values() {
			leaf.dispose();
		}
		debug!(count = leaves.len(), "folder registry reset");
	}

	pub fn len(&self) -> usize {
		self.leaves.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl std::fmt::Debug for FolderRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FolderRegistry")
			.field("leaves", &self.len())
			.finish_non_exhaustive()
	}
}

fn canonical(dir: &Path) -> Result<PathBuf, ScanError> {
	dir.canonicalize().map_err(|error| ScanError::Io {
		path: dir.to_path_buf(),
		error,
	})
}
