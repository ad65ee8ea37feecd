use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use resdex_primitives::{Qualifiers, ResourceItem, ResourceType, SourceLocation};

use super::*;
use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::ids::CompiledIdTable;
use crate::node::ResourceRepository;
use crate::test_fixtures::{qualified, string, values, write_file};

fn scan(root: &Path) -> FolderRepository {
	FolderRepository::scan(root, Arc::new(LineParser), ScanOptions::default()).unwrap()
}

fn sample_tree(root: &Path) {
	write_file(root, "values/strings.txt", "string/app_name = App\ncolor/accent = #ff0000\n");
	write_file(root, "values-fr/strings.txt", "string/app_name = Appli\n");
	write_file(
		root,
		"layout/main.xml",
		r#"<LinearLayout><Button android:id="@+id/button1"/><TextView android:id="@+id/label"/></LinearLayout>"#,
	);
	write_file(root, "drawable-hdpi/icon.9.png", "");
	write_file(root, "drawable-hdpi/.DS_Store", "");
	write_file(root, "values/strings.txt~", "string/backup = x\n");
	write_file(root, "notafolder/ignored.txt", "string/nope = x\n");
}

#[test]
fn initial_scan_indexes_every_folder_kind() {
	let dir = tempfile::tempdir().unwrap();
	sample_tree(dir.path());
	let leaf = scan(dir.path());

	let strings = leaf.items_of_type(ResourceType::String);
	assert_eq!(values(&strings, "app_name"), ["App", "Appli"]);
	assert!(!strings.contains_key("backup"));
	assert!(!strings.contains_key("nope"));

	let app_name = leaf.items(ResourceType::String, "app_name");
	assert!(app_name[0].qualifiers().is_default());
	assert_eq!(app_name[1].qualifiers().as_str(), "fr");
	assert_eq!(
		app_name[0].source(),
		&SourceLocation::File(Arc::from(dir.path().join("values/strings.txt").as_path()))
	);

	let icon = leaf.items(ResourceType::Drawable, "icon");
	assert_eq!(icon.len(), 1);
	assert_eq!(icon[0].qualifiers().as_str(), "hdpi");

	assert!(leaf.has_item(ResourceType::Layout, "main"));
	assert!(leaf.has_item(ResourceType::Id, "button1"));
	assert!(leaf.has_item(ResourceType::Id, "label"));
	assert_eq!(
		leaf.types_present(),
		BTreeSet::from([
			ResourceType::Color,
			ResourceType::Drawable,
			ResourceType::Id,
			ResourceType::Layout,
			ResourceType::String,
		])
	);
	assert_eq!(leaf.file_count(), 4);
}

#[test]
fn malformed_values_file_is_skipped() {
	let dir = tempfile::tempdir().unwrap();
	write_file(dir.path(), "values/good.txt", "string/ok = fine\n");
	write_file(dir.path(), "values/bad.txt", "string/first = x\nthis is not a declaration\n");
	let leaf = scan(dir.path());
	assert!(leaf.has_item(ResourceType::String, "ok"));
	assert!(!leaf.has_item(ResourceType::String, "first"));
}

#[test]
fn missing_root_is_an_error() {
	let dir = tempfile::tempdir().unwrap();
	let err = FolderRepository::scan(dir.path().join("res"), Arc::new(NoValues), ScanOptions::default())
		.unwrap_err();
	assert!(matches!(err, ScanError::NotADirectory(_)));
}

#[test]
fn batched_changes_bump_once() {
	let dir = tempfile::tempdir().unwrap();
	sample_tree(dir.path());
	let leaf = scan(dir.path());
	let before = leaf.modification_count();

	write_file(dir.path(), "values/strings.txt", "string/app_name = Renamed\n");
	write_file(dir.path(), "values/more.txt", "string/extra = 1\n");
	fs::remove_file(dir.path().join("drawable-hdpi/icon.9.png")).unwrap();
	leaf.notify_all([
		ResourceChange::Changed(dir.path().join("values/strings.txt")),
		ResourceChange::Added(dir.path().join("values/more.txt")),
		ResourceChange::Removed(dir.path().join("drawable-hdpi/icon.9.png")),
	]);
	assert!(leaf.is_scan_pending(&dir.path().join("values/more.txt")));

	assert_eq!(leaf.modification_count(), before + 1);
	assert!(!leaf.is_scan_pending(&dir.path().join("values/more.txt")));
	assert_eq!(values(&leaf.items_of_type(ResourceType::String), "app_name"), ["Renamed", "Appli"]);
	assert!(leaf.has_item(ResourceType::String, "extra"));
	assert!(!leaf.has_item(ResourceType::Color, "accent"));
	assert!(!leaf.has_any_of_type(ResourceType::Drawable));
	assert_eq!(leaf.modification_count(), before + 1);
}

#[test]
fn added_and_removed_folders() {
	let dir = tempfile::tempdir().unwrap();
	sample_tree(dir.path());
	let leaf = scan(dir.path());

	write_file(dir.path(), "values-de/strings.txt", "string/app_name = Anwendung\n");
	leaf.notify(ResourceChange::Added(dir.path().join("values-de")));
	assert_eq!(leaf.items(ResourceType::String, "app_name").len(), 3);

	fs::remove_dir_all(dir.path().join("layout")).unwrap();
	leaf.notify(ResourceChange::Removed(dir.path().join("layout")));
	assert!(!leaf.has_any_of_type(ResourceType::Layout));
	assert!(!leaf.has_any_of_type(ResourceType::Id));
}

#[test]
fn sync_applies_pending_changes() {
	let dir = tempfile::tempdir().unwrap();
	let leaf = scan(dir.path());
	write_file(dir.path(), "raw/blob.bin", "");
	leaf.notify(ResourceChange::Added(dir.path().join("raw/blob.bin")));
	leaf.sync();
	assert!(!leaf.is_scan_pending(&dir.path().join("raw/blob.bin")));
	assert!(leaf.has_item(ResourceType::Raw, "blob"));
}

#[test]
fn unrelated_change_never_lowers_generation() {
	let dir = tempfile::tempdir().unwrap();
	sample_tree(dir.path());
	let leaf = scan(dir.path());
	let before = leaf.modification_count();
	leaf.notify(ResourceChange::Changed(dir.path().join("README")));
	assert!(leaf.modification_count() >= before);
	assert_eq!(leaf.items(ResourceType::String, "app_name").len(), 2);
}

#[test]
#[should_panic(expected = "disposed resource repository")]
fn disposed_folder_panics() {
	let dir = tempfile::tempdir().unwrap();
	let leaf = scan(dir.path());
	leaf.dispose();
	leaf.items_of_type(ResourceType::String);
}

#[test]
#[should_panic(expected = "disposed resource repository")]
fn file_count_after_dispose_panics() {
	let dir = tempfile::tempdir().unwrap();
	sample_tree(dir.path());
	let leaf = scan(dir.path());
	assert!(leaf.file_count() > 0);
	leaf.dispose();
	leaf.file_count();
}

#[test]
fn dispose_is_idempotent_for_every_leaf_kind() {
	let values = SyntheticRepository::with_values("build", vec![string("flavor", "demo")]);
	values.dispose();
	values.dispose();
	assert!(values.is_disposed());

	let library = PackageRepository::library("lib", vec![string("title", "x")], CompiledIdTable::new());
	library.dispose();
	library.dispose();
	assert!(library.is_disposed());

	let dir = tempfile::tempdir().unwrap();
	let folder = scan(dir.path());
	folder.dispose();
	folder.dispose();
	assert!(folder.is_disposed());
}

#[test]
#[should_panic(expected = "disposed resource repository")]
fn disposed_synthetic_panics() {
	let values = SyntheticRepository::with_values("build", vec![string("flavor", "demo")]);
	values.dispose();
	values.dispose();
	values.items_of_type(ResourceType::String);
}

#[test]
fn duplicate_declarations_in_one_leaf() {
	let contents = LeafContents::from_items(
		[
			string("title", "first"),
			qualified("title", "fr", "fr"),
			string("title", "second"),
			ResourceItem::id("button1"),
			ResourceItem::id("button1"),
		]
		.into_iter()
		.map(Arc::new),
	);
	assert_eq!(values(&contents.items_of_type(ResourceType::String), "title"), ["second", "fr"]);
	assert_eq!(contents.items_of_type(ResourceType::Id)["button1"].len(), 2);
	assert_eq!(contents.item_count(), 4);
}

#[test]
fn framework_package_marks_items() {
	let leaf = PackageRepository::framework(vec![string("ok", "OK")], CompiledIdTable::new());
	let ok = leaf.items(ResourceType::String, "ok");
	assert!(ok[0].is_framework());
	assert_eq!(ok[0].reference(), "@android:string/ok");
	assert_eq!(ok[0].source(), &SourceLocation::Package(Arc::from("android")));
	assert!(leaf.is_framework());
	assert_eq!(leaf.modification_count(), leaf.modification_count());
}

#[test]
fn library_package_keeps_project_items() {
	let leaf = PackageRepository::library(
		"appcompat",
		vec![string("abc_action_bar_title", "Title").with_qualifiers(Qualifiers::new("land"))],
		CompiledIdTable::new(),
	);
	let items = leaf.items(ResourceType::String, "abc_action_bar_title");
	assert!(!items[0].is_framework());
	assert_eq!(items[0].qualifiers().as_str(), "land");
	assert_eq!(leaf.library_name(), "appcompat");
}

#[test]
fn synthetic_replacement_with_equal_values_is_a_no_op() {
	let leaf = SyntheticRepository::with_values("build", vec![string("flavor", "demo")]);
	let before = leaf.modification_count();
	assert!(!leaf.set_values(vec![string("flavor", "demo")]));
	assert_eq!(leaf.modification_count(), before);

	assert!(leaf.set_values(vec![string("flavor", "full")]));
	assert_eq!(leaf.modification_count(), before + 1);
	assert_eq!(leaf.values(), vec![string("flavor", "full")]);
	assert_eq!(values(&leaf.items_of_type(ResourceType::String), "flavor"), ["full"]);
}
