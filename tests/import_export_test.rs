//! Round-trip tests between export and import

mod common;

use quill::admin::export::{export_blogs, ExportFormat};
use quill::admin::import::import_blogs;
use quill::storage::{BlogQuery, Page};

#[test]
fn test_exported_csv_can_be_reimported() {
    let source = common::test_store();
    let blog = common::create_blog(&source, "Travels Well");
    let category = source.get_or_create_category("Web Development").unwrap();
    source.set_blog_categories(blog.id, &[category.id]).unwrap();
    source.set_draft_many(&[blog.id], false).unwrap();

    let bytes = export_blogs(&source, &BlogQuery::default(), ExportFormat::Csv).unwrap();

    // Import into a fresh store; extra columns (id, slug, timestamps) are
    // simply ignored by the importer
    let target = common::test_store();
    let report = import_blogs(&target, &bytes).unwrap();
    assert_eq!(report.created, 1);
    assert!(report.errors.is_empty());

    let listed = target
        .list_blogs(&BlogQuery::default(), Page::new(1, 10))
        .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].title, "Travels Well");
    // The published flag survived the trip
    assert!(!listed.items[0].is_draft);

    let categories = target.list_categories(true).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Web Development");
}

#[test]
fn test_export_filtered_to_published_only() {
    let store = common::test_store();
    common::create_blog(&store, "Draft stays home");
    let published = common::create_blog(&store, "Published travels");
    store.set_draft_many(&[published.id], false).unwrap();

    let query = BlogQuery {
        is_draft: Some(false),
        ..Default::default()
    };
    let bytes = export_blogs(&store, &query, ExportFormat::Csv).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.contains("Published travels"));
    assert!(!text.contains("Draft stays home"));
}

#[test]
fn test_json_export_shape() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Shaped post");
    common::create_comment(&store, blog.id, "counted");

    let bytes = export_blogs(&store, &BlogQuery::default(), ExportFormat::Json).unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(rows[0]["title"], "Shaped post");
    assert_eq!(rows[0]["slug"], "shaped-post");
    assert_eq!(rows[0]["comment_count"], 1);
}
