//! Per-module aggregates.
//!
//! # Role
//!
//! A [`RepositoryManager`] owns the three composites a module exposes, each created on
//! first request and guarded by its own lock:
//!
//! | Aggregate | Children, lowest precedence first |
//! |-----------|-----------------------------------|
//! | module    | the module's resource folders |
//! | project   | module aggregates of every local dependency, then this module's |
//! | app       | library packages, the project aggregate, synthetic build values |
//!
//! Dependencies are followed transitively; a direct dependency outranks the modules it
//! depends on. The manager never holds an aggregate lock while building children, so
//! managers of dependent modules may be queried in any order.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use resdex_primitives::{Qualifiers, ResourceItem};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::composite::CompositeRepository;
use crate::ids::{CompiledIdTable, ResourceIdResolver};
use crate::leaf::{FolderRepository, PackageRepository, SyntheticRepository};
use crate::node::{ResourceRepository, assert_live};

type Slot = Mutex<Option<Arc<CompositeRepository>>>;

/// Inputs of one module's aggregates.
#[derive(Clone, Default)]
pub struct ModuleRoots {
	/// Resource folders, lowest precedence first (e.g. `main` before a flavor overlay).
	pub folders: Vec<Arc<FolderRepository>>,
	/// Local modules this module depends on, nearest first.
	pub dependencies: Vec<Arc<RepositoryManager>>,
	/// Library packages, in dependency order.
	pub libraries: Vec<Arc<PackageRepository>>,
}

impl fmt::Debug for ModuleRoots {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModuleRoots")
			.field("folders", &self.folders.iter().map(|l| l.root()).collect::<Vec<_>>())
			.field(
				"dependencies",
				&self.dependencies.iter().map(|m| m.name()).collect::<Vec<_>>(),
			)
			.field(
				"libraries",
				&self.libraries.iter().map(|l| l.library_name()).collect::<Vec<_>>(),
			)
			.finish()
	}
}

/// Owner of one module's module, project and app aggregates.
pub struct RepositoryManager {
	name: Arc<str>,
	roots: RwLock<ModuleRoots>,
	build_values: Arc<SyntheticRepository>,
	ids: ResourceIdResolver,
	module: Slot,
	project: Slot,
	app: Slot,
	disposed: AtomicBool,
}

impl RepositoryManager {
	pub fn new(name: &str, roots: ModuleRoots, ids: ResourceIdResolver) -> Self {
		Self {
			name: Arc::from(name),
			roots: RwLock::new(roots),
			build_values: Arc::new(SyntheticRepository::new(format!("{name} build values"))),
			ids,
			module: Mutex::new(None),
			project: Mutex::new(None),
			app: Mutex::new(None),
			disposed: AtomicBool::new(false),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the aggregate of this module's own resource folders.
	pub fn module_resources(&self) -> Arc<CompositeRepository> {
		self.assert_live();
		self.get_or_init(&self.module, "module", || self.module_children())
	}

	/// Returns the aggregate of this module and its local dependencies.
	pub fn project_resources(&self) -> Arc<CompositeRepository> {
		self.assert_live();
		self.get_or_init(&self.project, "project", || self.project_children())
	}

	/// Returns the aggregate of libraries, project resources and build values.
	pub fn app_resources(&self) -> Arc<CompositeRepository> {
		self.assert_live();
		self.get_or_init(&self.app, "app", || self.app_children())
	}

	pub fn cached_module_resources(&self) -> Option<Arc<CompositeRepository>> {
		self.module.lock().clone()
	}

	pub fn cached_project_resources(&self) -> Option<Arc<CompositeRepository>> {
		self.project.lock().clone()
	}

	pub fn cached_app_resources(&self) -> Option<Arc<CompositeRepository>> {
		self.app.lock().clone()
	}

	/// Synthetic values injected by the build; the highest-precedence app child.
	pub fn build_values(&self) -> &Arc<SyntheticRepository> {
		&self.build_values
	}

	/// Replaces the build values. Returns false if they were unchanged.
	pub fn set_build_values(&self, values: Vec<ResourceItem>) -> bool {
		self.assert_live();
		self.build_values.set_values(values)
	}

	pub fn ids(&self) -> &ResourceIdResolver {
		&self.ids
	}

	pub fn roots(&self) -> ModuleRoots {
		self.roots.read().clone()
	}

	/// Swaps the module's inputs and the children of every aggregate created so far.
	///
	/// Aggregates not yet created pick up the new roots when first requested.
	pub fn update_roots(&self, roots: ModuleRoots) {
		self.assert_live();
		*self.roots.write() = roots;

		if let Some(module) = self.cached_module_resources() {
			module.replace_children(self.module_children());
		}
		if let Some(project) = self.cached_project_resources() {
			project.replace_children(self.project_children());
		}
		if let Some(app) = self.cached_app_resources() {
			app.replace_children(self.app_children());
		}
		debug!(module = %self.name, "roots updated");
	}

	/// Forgets every aggregate; the next request rebuilds it.
	///
	/// Forgotten aggregates are left live: a dependent module's project aggregate may
	/// still list this module's aggregate as a child until its own roots are updated.
	pub fn reset(&self) {
		let mut forgotten = 0;
		for slot in [&self.module, &self.project, &self.app] {
			if slot.lock().take().is_some() {
				forgotten += 1;
			}
		}
		debug!(module = %self.name, forgotten, "aggregates reset");
	}

	/// Disposes every aggregate and the build values, and clears dynamic ids.
	///
	/// Folder and package leaves are not disposed; they belong to whoever created them.
	pub fn dispose(&self) {
		if self.disposed.swap(true, Ordering::AcqRel) {
			return;
		}
		for slot in [&self.app, &self.project, &self.module] {
			if let Some(aggregate) = slot.lock().take() {
				aggregate.dispose();
			}
		}
		self.build_values.dispose();
		self.ids.dynamic().reset();
		debug!(module = %self.name, "repository manager disposed");
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Acquire)
	}

	/// Library packages visible to this module, including those of its dependencies.
	///
	/// Packages are deduplicated by library name; the first occurrence wins.
	pub fn library_resources(&self) -> Vec<Arc<PackageRepository>> {
		let mut seen = FxHashSet::default();
		let mut libraries = Vec::new();
		let own = self.roots.read().libraries.clone();
		let inherited = self
			.dependency_closure()
			.into_iter()
			.flat_map(|dep| dep.roots.read().libraries.clone());
		for library in own.into_iter().chain(inherited) {
			if seen.insert(library.library_name().to_owned()) {
				libraries.push(library);
			}
		}
		libraries
	}

	/// Finds a visible library package by name.
	pub fn find_library(&self, name: &str) -> Option<Arc<PackageRepository>> {
		self.library_resources()
			.into_iter()
			.find(|library| library.library_name() == name)
	}

	/// Merges the compiled id tables of every visible library, later libraries winning.
	pub fn library_compiled_ids(&self) -> CompiledIdTable {
		let mut table = CompiledIdTable::new();
		for library in self.library_resources() {
			table.extend(library.compiled_ids());
		}
		table
	}

	/// Roots of every resource folder of this module and its local dependencies, in
	/// project precedence order. Each directory is listed once.
	pub fn all_resource_dirs(&self) -> Vec<PathBuf> {
		let mut seen = FxHashSet::default();
		let mut dirs = Vec::new();
		let closure = self.dependency_closure();
		let folders = closure
			.iter()
			.rev()
			.flat_map(|dep| dep.roots.read().folders.clone())
			.chain(self.roots.read().folders.clone());
		for folder in folders {
			if seen.insert(folder.root().to_path_buf()) {
				dirs.push(folder.root().to_path_buf());
			}
		}
		dirs
	}

	/// Locales with resources in this module or its local dependencies, as `ll` or
	/// `ll-RR`. Library packages and build values are not consulted.
	pub fn locales_in_project(&self) -> BTreeSet<String> {
		self.project_qualifiers()
			.iter()
			.filter_map(|q| q.locale().map(|locale| locale.to_string()))
			.collect()
	}

	/// Language codes of [`Self::locales_in_project`].
	pub fn languages_in_project(&self) -> BTreeSet<String> {
		self.project_qualifiers()
			.iter()
			.filter_map(|q| q.locale().map(|locale| locale.language.to_owned()))
			.collect()
	}

	fn project_qualifiers(&self) -> BTreeSet<Qualifiers> {
		let project = self.project_resources();
		let mut qualifiers = BTreeSet::new();
		for ty in project.types_present() {
			for items in project.items_of_type(ty).values() {
				qualifiers.extend(items.iter().map(|item| item.qualifiers().clone()));
			}
		}
		qualifiers
	}

	fn assert_live(&self) {
		assert_live(self.disposed.load(Ordering::Acquire), &self.name);
	}

	/// Returns the slot's aggregate, creating it outside the lock if absent.
	///
	/// If another thread fills the slot first, the aggregate built here is disposed.
	fn get_or_init(
		&self,
		slot: &Slot,
		kind: &str,
		children: impl FnOnce() -> Vec<Arc<dyn ResourceRepository>>,
	) -> Arc<CompositeRepository> {
		if let Some(existing) = slot.lock().as_ref() {
			return Arc::clone(existing);
		}

		let built = Arc::new(CompositeRepository::new(
			format!("{} {kind}", self.name),
			children(),
		));

		let mut guard = slot.lock();
		if let Some(existing) = guard.as_ref() {
			let existing = Arc::clone(existing);
			drop(guard);
			built.dispose();
			return existing;
		}
		*guard = Some(Arc::clone(&built));
		debug!(module = %self.name, kind, children = built.child_count(), "aggregate created");
		built
	}

	fn module_children(&self) -> Vec<Arc<dyn ResourceRepository>> {
		self.roots
			.read()
			.folders
			.iter()
			.map(|folder| Arc::clone(folder) as Arc<dyn ResourceRepository>)
			.collect()
	}

	fn project_children(&self) -> Vec<Arc<dyn ResourceRepository>> {
		let mut children: Vec<Arc<dyn ResourceRepository>> = self
			.dependency_closure()
			.iter()
			.rev()
			.map(|dep| dep.module_resources() as Arc<dyn ResourceRepository>)
			.collect();
		children.push(self.module_resources());
		children
	}

	fn app_children(&self) -> Vec<Arc<dyn ResourceRepository>> {
		let mut children: Vec<Arc<dyn ResourceRepository>> = self
			.library_resources()
			.into_iter()
			.map(|library| library as Arc<dyn ResourceRepository>)
			.collect();
		children.push(self.project_resources());
		children.push(Arc::clone(&self.build_values) as Arc<dyn ResourceRepository>);
		children
	}

	/// Every local module reachable through dependencies, depth first, nearest first.
	/// Cycles and diamonds are visited once.
	fn dependency_closure(&self) -> Vec<Arc<RepositoryManager>> {
		let mut visited: FxHashSet<*const RepositoryManager> = FxHashSet::default();
		visited.insert(std::ptr::from_ref(self));
		let mut out = Vec::new();
		let mut stack: Vec<Arc<RepositoryManager>> =
			self.roots.read().dependencies.iter().rev().cloned().collect();
		while let Some(dep) = stack.pop() {
			if !visited.insert(Arc::as_ptr(&dep)) {
				continue;
			}
			stack.extend(dep.roots.read().dependencies.iter().rev().cloned());
			out.push(dep);
		}
		out
	}
}

impl fmt::Debug for RepositoryManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RepositoryManager")
			.field("name", &self.name)
			.field("module", &self.module.lock().is_some())
			.field("project", &self.project.lock().is_some())
			.field("app", &self.app.lock().is_some())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use resdex_primitives::ResourceType;

	use super::*;
	use crate::config::ScanOptions;
	use crate::leaf::LineParser;
	use crate::test_fixtures::{package, qualified, string, write_file};

	fn folder(root: &std::path::Path) -> Arc<FolderRepository> {
		std::fs::create_dir_all(root).unwrap();
		Arc::new(FolderRepository::scan(root, Arc::new(LineParser), ScanOptions::default()).unwrap())
	}

	fn manager(name: &str, roots: ModuleRoots) -> Arc<RepositoryManager> {
		Arc::new(RepositoryManager::new(name, roots, ResourceIdResolver::default()))
	}

	#[test]
	fn aggregates_are_created_once() {
		let app = manager("app", ModuleRoots::default());
		assert!(app.cached_app_resources().is_none());
		let first = app.app_resources();
		assert!(Arc::ptr_eq(&first, &app.app_resources()));
		assert!(app.cached_project_resources().is_some());
		assert!(app.cached_module_resources().is_some());
	}

	#[test]
	fn build_values_outrank_libraries() {
		let roots = ModuleRoots {
			libraries: vec![package("appcompat", vec![string("abc_title", "lib")])],
			..ModuleRoots::default()
		};
		let app = manager("app", roots);
		app.set_build_values(vec![string("abc_title", "build")]);
		let items = app.app_resources().items(ResourceType::String, "abc_title");
		assert_eq!(items.len(), 1);
		assert_eq!(items[0].value().as_text(), Some("build"));
	}

	#[test]
	fn libraries_are_inherited_and_deduplicated() {
		let lib = manager(
			"lib",
			ModuleRoots {
				libraries: vec![
					package("core", vec![string("a", "1")]),
					package("appcompat", vec![string("b", "old")]),
				],
				..ModuleRoots::default()
			},
		);
		let app = manager(
			"app",
			ModuleRoots {
				dependencies: vec![Arc::clone(&lib)],
				libraries: vec![package("appcompat", vec![string("b", "new")])],
				..ModuleRoots::default()
			},
		);
		let names: Vec<_> = app
			.library_resources()
			.iter()
			.map(|l| l.library_name().to_owned())
			.collect();
		assert_eq!(names, ["appcompat", "core"]);
		assert!(app.find_library("core").is_some());
		assert!(app.find_library("missing").is_none());
	}

	#[test]
	fn dependency_cycles_terminate() {
		let a = manager("a", ModuleRoots::default());
		let b = manager(
			"b",
			ModuleRoots {
				dependencies: vec![Arc::clone(&a)],
				..ModuleRoots::default()
			},
		);
		a.update_roots(ModuleRoots {
			dependencies: vec![Arc::clone(&b)],
			..ModuleRoots::default()
		});
		assert_eq!(a.project_resources().child_count(), 2);
		// Break the cycle so both managers can drop.
		a.update_roots(ModuleRoots::default());
	}

	#[test]
	fn reset_forgets_without_disposing() {
		let app = manager("app", ModuleRoots::default());
		let old = app.project_resources();
		app.reset();
		assert!(app.cached_project_resources().is_none());
		assert!(!old.is_disposed());
		assert!(!Arc::ptr_eq(&old, &app.project_resources()));
	}

	#[test]
	fn dispose_disposes_aggregates_and_ids() {
		let app = manager("app", ModuleRoots::default());
		let aggregate = app.app_resources();
		app.ids().id_for(ResourceType::Id, "x").unwrap();
		app.dispose();
		assert!(aggregate.is_disposed());
		assert!(app.ids().dynamic().is_empty());
		assert!(app.cached_app_resources().is_none());
	}

	#[test]
	#[should_panic(expected = "disposed resource repository `app`")]
	fn disposed_manager_panics() {
		let app = manager("app", ModuleRoots::default());
		app.dispose();
		app.module_resources();
	}

	#[test]
	fn languages_come_from_project_resources_only() {
		let dep = manager(
			"dep",
			ModuleRoots {
				libraries: vec![package("lib", vec![qualified("title", "Hola", "es")])],
				..ModuleRoots::default()
			},
		);
		let app = manager(
			"app",
			ModuleRoots {
				dependencies: vec![Arc::clone(&dep)],
				..ModuleRoots::default()
			},
		);
		app.set_build_values(vec![qualified("flavor", "Ciao", "it")]);
		assert!(app.languages_in_project().is_empty());

		let dir = tempfile::tempdir().unwrap();
		write_file(dir.path(), "app/values-fr-rCA/strings.txt", "string/title = Bonjour\n");
		write_file(dir.path(), "app/values-land/strings.txt", "string/title = Wide\n");
		write_file(dir.path(), "app/drawable-de-hdpi/icon.png", "");
		write_file(dir.path(), "dep/values-fr/strings.txt", "string/title = Salut\n");
		write_file(dir.path(), "dep/values-b+sr+Latn/strings.txt", "string/title = Zdravo\n");
		dep.update_roots(ModuleRoots {
			folders: vec![folder(&dir.path().join("dep"))],
			..dep.roots()
		});
		app.update_roots(ModuleRoots {
			folders: vec![folder(&dir.path().join("app"))],
			..app.roots()
		});

		assert_eq!(
			app.locales_in_project().into_iter().collect::<Vec<_>>(),
			["de", "fr", "fr-CA", "sr"]
		);
		assert_eq!(
			app.languages_in_project().into_iter().collect::<Vec<_>>(),
			["de", "fr", "sr"]
		);
	}

	#[test]
	fn resource_dirs_cover_the_dependency_closure() {
		let dir = tempfile::tempdir().unwrap();
		let base = folder(&dir.path().join("base"));
		let shared = folder(&dir.path().join("shared"));
		let core = manager(
			"core",
			ModuleRoots {
				folders: vec![Arc::clone(&base)],
				..ModuleRoots::default()
			},
		);
		let feature = manager(
			"feature",
			ModuleRoots {
				folders: vec![Arc::clone(&shared)],
				dependencies: vec![Arc::clone(&core)],
				..ModuleRoots::default()
			},
		);
		let app = manager(
			"app",
			ModuleRoots {
				folders: vec![folder(&dir.path().join("main")), Arc::clone(&shared)],
				dependencies: vec![feature, core],
				..ModuleRoots::default()
			},
		);

		let dirs = app.all_resource_dirs();
		let names: Vec<_> = dirs
			.iter()
			.map(|d| d.file_name().unwrap().to_string_lossy().into_owned())
			.collect();
		assert_eq!(names, ["base", "shared", "main"]);
	}

	#[test]
	fn library_ids_merge_in_order() {
		let mut first = CompiledIdTable::new();
		first
			.insert(ResourceType::String, "a", resdex_primitives::ResourceId::from_raw(0x7f0c_0001))
			.unwrap();
		let app = manager(
			"app",
			ModuleRoots {
				libraries: vec![Arc::new(PackageRepository::library("core", Vec::new(), first))],
				..ModuleRoots::default()
			},
		);
		let table = app.library_compiled_ids();
		assert_eq!(
			table.id_of(ResourceType::String, "a").map(|id| id.raw()),
			Some(0x7f0c_0001)
		);
		app.ids().set_compiled(table);
		assert_eq!(app.ids().id_for(ResourceType::String, "a").unwrap().raw(), 0x7f0c_0001);
	}
}
