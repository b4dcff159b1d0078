//! Integration tests for the content store

mod common;

use chrono::{Datelike, Utc};
use quill::models::NewBlog;
use quill::storage::{BlogQuery, CommentQuery, Page};

#[test]
fn test_deleting_blog_cascades_comments() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Parent post");
    let other = common::create_blog(&store, "Survivor post");

    common::create_comment(&store, blog.id, "On the doomed post");
    common::create_comment(&store, blog.id, "Also doomed");
    let kept = common::create_comment(&store, other.id, "Kept");

    assert!(store.delete_blog(blog.id).unwrap());

    let stats = store.content_stats().unwrap();
    assert_eq!(stats.blogs, 1);
    assert_eq!(stats.comments, 1);
    assert_eq!(store.get_comment(kept.id).unwrap().unwrap().comment, "Kept");
}

#[test]
fn test_date_hierarchy_drilldown() {
    let store = common::test_store();
    common::create_blog(&store, "Dated post");

    let now = Utc::now();
    let query = BlogQuery {
        year: Some(now.year()),
        month: Some(now.month()),
        day: Some(now.day()),
        ..Default::default()
    };
    assert_eq!(store.list_blogs(&query, Page::new(1, 10)).unwrap().total, 1);

    let query = BlogQuery {
        year: Some(now.year() - 1),
        ..Default::default()
    };
    assert_eq!(store.list_blogs(&query, Page::new(1, 10)).unwrap().total, 0);
}

#[test]
fn test_category_filter_joins_through_m2m() {
    let store = common::test_store();
    let tagged = common::create_blog(&store, "Tagged post");
    common::create_blog(&store, "Untagged post");

    let category = store.get_or_create_category("Security").unwrap();
    store.set_blog_categories(tagged.id, &[category.id]).unwrap();

    let query = BlogQuery {
        category_id: Some(category.id),
        ..Default::default()
    };
    let listed = store.list_blogs(&query, Page::new(1, 10)).unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].id, tagged.id);
}

#[test]
fn test_bulk_publish_only_touches_selected_rows() {
    let store = common::test_store();
    let selected = common::create_blog(&store, "Selected");
    let untouched = common::create_blog(&store, "Untouched");

    let changed = store.set_draft_many(&[selected.id], false).unwrap();
    assert_eq!(changed, 1);

    assert!(!store.get_blog(selected.id).unwrap().unwrap().is_draft);
    assert!(store.get_blog(untouched.id).unwrap().unwrap().is_draft);
}

#[test]
fn test_bulk_update_ignores_missing_ids() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Exists");

    // One real id, one that never existed
    let changed = store.set_draft_many(&[blog.id, 9999], false).unwrap();
    assert_eq!(changed, 1);
}

#[test]
fn test_comment_count_annotation_in_list() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Counted post");
    common::create_comment(&store, blog.id, "one");
    let second = common::create_comment(&store, blog.id, "two");

    // Inactive comments still count
    store.set_active_many(&[second.id], false).unwrap();

    let listed = store
        .list_blogs(&BlogQuery::default(), Page::new(1, 10))
        .unwrap();
    assert_eq!(listed.items[0].comment_count, 2);
}

#[test]
fn test_default_ordering_title_then_newest() {
    let store = common::test_store();
    common::create_blog(&store, "zebra post");
    common::create_blog(&store, "Alpha post");
    common::create_blog(&store, "middle post");

    let listed = store
        .list_blogs(&BlogQuery::default(), Page::new(1, 10))
        .unwrap();
    let titles: Vec<&str> = listed.items.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha post", "middle post", "zebra post"]);
}

#[test]
fn test_comment_search_is_case_insensitive() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Host");
    common::create_comment(&store, blog.id, "EXCELLENT point");
    common::create_comment(&store, blog.id, "meh");

    let query = CommentQuery {
        search: Some("excellent".to_string()),
        ..Default::default()
    };
    assert_eq!(
        store.list_comments(&query, Page::new(1, 10)).unwrap().total,
        1
    );
}

#[test]
fn test_persistent_store_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.db");

    {
        let store = quill::storage::SqliteStore::open(&path).unwrap();
        store
            .create_blog(&NewBlog {
                title: "Persisted".to_string(),
                ..Default::default()
            })
            .unwrap();
    }

    let reopened = quill::storage::SqliteStore::open(&path).unwrap();
    let listed = reopened
        .list_blogs(&BlogQuery::default(), Page::new(1, 10))
        .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].title, "Persisted");
}
