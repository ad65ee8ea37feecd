//! Executable invariants of the repository tree.
//!
//! Each `inv_*` function asserts one property; the matching `test_*` wrapper runs it as a
//! unit test and is what module docs link to.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use resdex_primitives::{ResourceItem, ResourceType};

use crate::composite::CompositeRepository;
use crate::ids::DynamicIdAllocator;
use crate::leaf::SyntheticRepository;
use crate::node::{ResourceItemMap, ResourceRepository};

fn string(name: &str, text: &str) -> ResourceItem {
	ResourceItem::text(ResourceType::String, name, text)
}

fn leaf(label: &str, items: Vec<ResourceItem>) -> Arc<SyntheticRepository> {
	Arc::new(SyntheticRepository::with_values(label, items))
}

fn composite(label: &str, children: &[Arc<dyn ResourceRepository>]) -> Arc<CompositeRepository> {
	Arc::new(CompositeRepository::new(label, children.to_vec()))
}

fn texts(repo: &dyn ResourceRepository, ty: ResourceType, name: &str) -> Vec<String> {
	repo.items(ty, name)
		.iter()
		.map(|item| item.value().to_string())
		.collect()
}

/// Invariant: a later child wins over an earlier one for identical qualifiers.
pub(crate) fn inv_merge_precedence() {
	let a = leaf("a", vec![string("app_name", "A")]);
	let b = leaf("b", vec![string("app_name", "B")]);
	let c = composite("c", &[a, b]);
	assert_eq!(texts(c.as_ref(), ResourceType::String, "app_name"), ["B"]);
}

#[cfg_attr(test, test)]
pub(crate) fn test_merge_precedence() {
	inv_merge_precedence()
}

/// Invariant: variants under different qualifiers all survive the merge.
pub(crate) fn inv_qualifier_coexistence() {
	let a = leaf("a", vec![string("app_name", "default")]);
	let b = leaf(
		"b",
		vec![string("app_name", "fr").with_qualifiers("fr".into())],
	);
	let c = composite("c", &[a, b]);
	let mut got = texts(c.as_ref(), ResourceType::String, "app_name");
	got.sort();
	assert_eq!(got, ["default", "fr"]);
}

#[cfg_attr(test, test)]
pub(crate) fn test_qualifier_coexistence() {
	inv_qualifier_coexistence()
}

/// Invariant: repeated `Id` declarations across children are all kept.
pub(crate) fn inv_id_non_suppression() {
	let a = leaf("a", vec![ResourceItem::id("button1")]);
	let b = leaf("b", vec![ResourceItem::id("button1")]);
	let c = composite("c", &[a, b]);
	assert_eq!(c.items(ResourceType::Id, "button1").len(), 2);
}

#[cfg_attr(test, test)]
pub(crate) fn test_id_non_suppression() {
	inv_id_non_suppression()
}

/// Invariant: identical `(type, name, qualifiers)` in several children resolves to the
/// last child's declaration, whatever the number of children.
pub(crate) fn inv_identical_declarations_last_child_wins() {
	let children: Vec<Arc<dyn ResourceRepository>> = (0..4)
		.map(|i| leaf(&format!("l{i}"), vec![string("title", &i.to_string())]) as Arc<dyn ResourceRepository>)
		.collect();
	let c = composite("c", &children);
	assert_eq!(texts(c.as_ref(), ResourceType::String, "title"), ["3"]);
}

#[cfg_attr(test, test)]
pub(crate) fn test_identical_declarations_last_child_wins() {
	inv_identical_declarations_last_child_wins()
}

/// Invariant: repeated queries without a change return the same cached map and do not
/// move the modification count.
pub(crate) fn inv_idempotent_queries() {
	let c = composite(
		"c",
		&[leaf("a", vec![string("x", "1")]), leaf("b", vec![string("y", "2")])],
	);
	let gen_before = c.modification_count();
	let first = c.items_of_type(ResourceType::String);
	let second = c.items_of_type(ResourceType::String);
	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(c.modification_count(), gen_before);
}

#[cfg_attr(test, test)]
pub(crate) fn test_idempotent_queries() {
	inv_idempotent_queries()
}

/// Invariant: a change strictly increases the count of the leaf and of every composite
/// above it; a no-op change moves neither.
pub(crate) fn inv_monotonic_generation() {
	let a = leaf("a", vec![string("x", "1")]);
	let b = leaf("b", Vec::new());
	let c = composite("c", &[a.clone(), b]);

	let (leaf_gen, comp_gen) = (a.modification_count(), c.modification_count());
	assert!(!a.set_values(vec![string("x", "1")]));
	assert_eq!(a.modification_count(), leaf_gen);
	assert_eq!(c.modification_count(), comp_gen);

	assert!(a.set_values(vec![string("x", "2")]));
	assert!(a.modification_count() > leaf_gen);
	let bumped = c.modification_count();
	assert!(bumped > comp_gen);
	assert_eq!(c.modification_count(), bumped);
}

#[cfg_attr(test, test)]
pub(crate) fn test_monotonic_generation() {
	inv_monotonic_generation()
}

/// Invariant: a one-child composite returns exactly what the child returns.
pub(crate) fn inv_single_child_equivalence() {
	let a = leaf("a", vec![string("x", "1"), ResourceItem::id("b1")]);
	let c = composite("c", &[a.clone()]);
	for ty in [ResourceType::String, ResourceType::Id, ResourceType::Layout] {
		assert!(Arc::ptr_eq(&c.items_of_type(ty), &a.items_of_type(ty)));
	}
	assert_eq!(c.types_present(), a.types_present());
	assert_eq!(c.modification_count(), a.modification_count());
	assert_eq!(c.cached_type_count(), 0);

	a.set_values(vec![string("x", "2")]);
	assert!(Arc::ptr_eq(
		&c.items_of_type(ResourceType::String),
		&a.items_of_type(ResourceType::String)
	));
}

#[cfg_attr(test, test)]
pub(crate) fn test_single_child_equivalence() {
	inv_single_child_equivalence()
}

/// Invariant: a change three levels down reaches the top on its next query, without the
/// top recomputing anything beforehand.
pub(crate) fn inv_invalidation_propagation() {
	let folder = leaf("res", vec![string("title", "old")]);
	let other = leaf("other", vec![string("other", "x")]);
	let module = composite("module", &[folder.clone(), other]);
	let project = composite("project", &[leaf("dep", Vec::new()), module]);
	let app = composite("app", &[leaf("lib", Vec::new()), project]);

	assert_eq!(texts(app.as_ref(), ResourceType::String, "title"), ["old"]);
	let before = app.modification_count();
	assert_eq!(app.cached_type_count(), 1);

	folder.set_values(vec![string("title", "new")]);
	// Nothing above the leaf has looked yet.
	assert_eq!(app.cached_type_count(), 1);

	assert!(app.modification_count() > before);
	assert_eq!(app.cached_type_count(), 0);
	assert_eq!(texts(app.as_ref(), ResourceType::String, "title"), ["new"]);
}

#[cfg_attr(test, test)]
pub(crate) fn test_invalidation_propagation() {
	inv_invalidation_propagation()
}

/// A leaf that applies a pending change right after serving a read, as a concurrent
/// writer would in the middle of a parent's merge.
#[derive(Debug)]
struct ChangesDuringRead {
	inner: Arc<SyntheticRepository>,
	pending: Mutex<Option<Vec<ResourceItem>>>,
}

impl ResourceRepository for ChangesDuringRead {
	fn label(&self) -> &str {
		self.inner.label()
	}

	fn modification_count(&self) -> u64 {
		self.inner.modification_count()
	}

	fn items_of_type(&self, ty: ResourceType) -> Arc<ResourceItemMap> {
		let served = self.inner.items_of_type(ty);
		if let Some(next) = self.pending.lock().take() {
			self.inner.set_values(next);
		}
		served
	}

	fn types_present(&self) -> BTreeSet<ResourceType> {
		self.inner.types_present()
	}

	fn dispose(&self) {
		self.inner.dispose()
	}

	fn is_disposed(&self) -> bool {
		self.inner.is_disposed()
	}
}

/// Invariant: a merge that raced with a child change is returned but never cached.
pub(crate) fn inv_concurrent_change_never_caches_stale_merge() {
	let racing = Arc::new(ChangesDuringRead {
		inner: leaf("racing", vec![string("title", "old")]),
		pending: Mutex::new(Some(vec![string("title", "new")])),
	});
	let c = composite("c", &[leaf("base", Vec::new()), racing]);

	assert_eq!(texts(c.as_ref(), ResourceType::String, "title"), ["old"]);
	assert_eq!(c.cached_type_count(), 0);

	assert_eq!(texts(c.as_ref(), ResourceType::String, "title"), ["new"]);
	assert_eq!(c.cached_type_count(), 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_concurrent_change_never_caches_stale_merge() {
	inv_concurrent_change_never_caches_stale_merge()
}

/// Invariant: dynamic ids are stable per name, unique across names, and never compiled.
pub(crate) fn inv_dynamic_id_stability() {
	let ids = DynamicIdAllocator::new();
	let icon = ids.get_or_assign(ResourceType::Drawable, "icon").unwrap();
	assert_eq!(ids.get_or_assign(ResourceType::Drawable, "icon").unwrap(), icon);
	let logo = ids.get_or_assign(ResourceType::Drawable, "logo").unwrap();
	assert_ne!(icon, logo);
	assert!(icon.is_dynamic() && !icon.is_compiled());
	assert!(logo.is_dynamic() && !logo.is_compiled());
}

#[cfg_attr(test, test)]
pub(crate) fn test_dynamic_id_stability() {
	inv_dynamic_id_stability()
}
