//! Tests for model semantics through the store

mod common;

use quill::models::{slugify, BlogPatch};
use quill::slugify as slugify_reexport;

#[test]
fn test_slugify_matches_reexport() {
    assert_eq!(slugify("A Title"), slugify_reexport("A Title"));
}

#[test]
fn test_saving_with_new_title_updates_slug() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Original Heading");
    assert_eq!(blog.slug, "original-heading");

    let updated = store
        .update_blog(
            blog.id,
            &BlogPatch {
                title: Some("Fresh Heading Instead".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Fresh Heading Instead");
    assert_eq!(updated.slug, "fresh-heading-instead");
}

#[test]
fn test_saving_same_title_keeps_slug_and_created_date() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Unchanging Title");

    let updated = store
        .update_blog(
            blog.id,
            &BlogPatch {
                title: Some("Unchanging Title".to_string()),
                body: Some("New body".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.slug, blog.slug);
    assert_eq!(updated.date_created, blog.date_created);
}

#[test]
fn test_new_blog_defaults() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Defaults Check");

    assert!(blog.is_draft);
    assert_eq!(blog.date_created, blog.last_modified);
}

#[test]
fn test_slug_punctuation_is_preserved() {
    let store = common::test_store();
    let blog = common::create_blog(&store, "Hello, World!");
    assert_eq!(blog.slug, "hello,-world!");
}
