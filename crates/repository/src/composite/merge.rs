//! Merging children's per-type maps.
//!
//! # Role
//!
//! Pure functions with no locking. The caller decides whether the result is cacheable.
//!
//! # Invariants
//!
//! - Later children take precedence (see `invariants::test_merge_precedence`).
//! - Differently qualified variants coexist (see `invariants::test_qualifier_coexistence`).
//! - `Id` declarations are never suppressed (see `invariants::test_id_non_suppression`).

use std::sync::Arc;

use resdex_primitives::ResourceType;

use crate::node::{ResourceItemMap, ResourceRepository};

/// Merges every child's map for `ty`, highest precedence (last child) first.
pub(crate) fn merge_children(children: &[Arc<dyn ResourceRepository>], ty: ResourceType) -> ResourceItemMap {
	let mut acc = ResourceItemMap::default();
	for child in children.iter().rev() {
		let incoming = child.items_of_type(ty);
		merge_into(&mut acc, &incoming, ty);
	}
	acc
}

/// Folds a lower-precedence map into the accumulator.
///
/// A name seen for the first time takes all of its items. For a known name, an incoming
/// item is dropped if an item from a higher-precedence source already carries exactly the
/// same qualifiers. Items of types that allow duplicates are always appended.
pub(crate) fn merge_into(acc: &mut ResourceItemMap, incoming: &ResourceItemMap, ty: ResourceType) {
	for (name, items) in incoming {
		let Some(existing) = acc.get_mut(name) else {
			acc.insert(Arc::clone(name), items.clone());
			continue;
		};

		if ty.allows_duplicates() {
			existing.extend(items.iter().cloned());
			continue;
		}

		// Only compare against what higher-precedence sources contributed.
		let prior = existing.len();
		for item in items {
			let shadowed = existing[..prior]
				.iter()
				.any(|kept| kept.qualifiers() == item.qualifiers());
			if !shadowed {
				existing.push(Arc::clone(item));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use resdex_primitives::{Qualifiers, ResourceItem};

	use super::*;
	use crate::test_fixtures::{item_map, values};

	#[test]
	fn first_sighting_takes_every_item() {
		let mut acc = ResourceItemMap::default();
		let incoming = item_map(vec![
			ResourceItem::text(ResourceType::String, "a", "1"),
			ResourceItem::text(ResourceType::String, "a", "2")
				.with_qualifiers(Qualifiers::new("fr")),
		]);
		merge_into(&mut acc, &incoming, ResourceType::String);
		assert_eq!(values(&acc, "a"), vec!["1", "2"]);
	}

	#[test]
	fn equal_qualifiers_from_lower_precedence_are_dropped() {
		let mut acc = item_map(vec![ResourceItem::text(ResourceType::String, "a", "high")]);
		let incoming = item_map(vec![
			ResourceItem::text(ResourceType::String, "a", "low"),
			ResourceItem::text(ResourceType::String, "a", "low-fr")
				.with_qualifiers(Qualifiers::new("fr")),
		]);
		merge_into(&mut acc, &incoming, ResourceType::String);
		assert_eq!(values(&acc, "a"), vec!["high", "low-fr"]);
	}

	#[test]
	fn ids_are_appended() {
		let mut acc = item_map(vec![ResourceItem::id("button1")]);
		let incoming = item_map(vec![ResourceItem::id("button1")]);
		merge_into(&mut acc, &incoming, ResourceType::Id);
		assert_eq!(acc["button1"].len(), 2);
	}
}
