use corkboard_core::db::open_db_in_memory;
use corkboard_core::{
    ArticleService, ArticleServiceError, NewArticle, SqliteArticleRepository,
    SqliteHashtagRepository,
};
use rusqlite::Connection;

fn service(
    conn: &Connection,
) -> ArticleService<SqliteArticleRepository<'_>, SqliteHashtagRepository<'_>> {
    ArticleService::new(
        SqliteArticleRepository::new(conn),
        SqliteHashtagRepository::new(conn),
    )
}

fn hashtag_row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM hashtags;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_article_associates_parsed_hashtags_sorted() {
    let conn = open_db_in_memory().unwrap();
    let sut = service(&conn);

    let article = sut
        .create_article(NewArticle::new("uno", "first", "body #spring then #java"))
        .unwrap();

    assert_eq!(article.hashtags, vec!["java", "spring"]);
    assert_eq!(hashtag_row_count(&conn), 2);
}

#[test]
fn create_article_without_tokens_creates_no_hashtags() {
    let conn = open_db_in_memory().unwrap();
    let sut = service(&conn);

    let article = sut
        .create_article(NewArticle::new("uno", "plain", "no tokens here"))
        .unwrap();

    assert!(article.hashtags.is_empty());
    assert_eq!(hashtag_row_count(&conn), 0);
}

#[test]
fn update_article_replaces_associations_and_collects_orphans() {
    let conn = open_db_in_memory().unwrap();
    let sut = service(&conn);

    let created = sut
        .create_article(NewArticle::new("uno", "t", "#java #spring"))
        .unwrap();
    assert_eq!(created.hashtags, vec!["java", "spring"]);

    let updated = sut
        .update_article(created.id, "t", "#java only now")
        .unwrap();
    assert_eq!(updated.hashtags, vec!["java"]);

    // `spring` lost its last reference and must be gone from the catalog.
    assert_eq!(hashtag_row_count(&conn), 1);
}

#[test]
fn update_keeps_hashtags_referenced_by_other_articles() {
    let conn = open_db_in_memory().unwrap();
    let sut = service(&conn);

    let first = sut
        .create_article(NewArticle::new("uno", "a", "#shared #mine"))
        .unwrap();
    sut.create_article(NewArticle::new("dos", "b", "#shared"))
        .unwrap();

    sut.update_article(first.id, "a", "nothing anymore").unwrap();

    // `mine` is orphaned and deleted; `shared` survives via the second article.
    assert_eq!(hashtag_row_count(&conn), 1);
    let survivor: String = conn
        .query_row("SELECT name FROM hashtags;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(survivor, "shared");
}

#[test]
fn delete_article_collects_its_orphaned_hashtags() {
    let conn = open_db_in_memory().unwrap();
    let sut = service(&conn);

    let first = sut
        .create_article(NewArticle::new("uno", "a", "#shared #solo"))
        .unwrap();
    let second = sut
        .create_article(NewArticle::new("dos", "b", "#shared"))
        .unwrap();

    sut.delete_article(first.id).unwrap();
    assert_eq!(hashtag_row_count(&conn), 1);

    sut.delete_article(second.id).unwrap();
    assert_eq!(hashtag_row_count(&conn), 0);
    assert!(sut.get_article(first.id).unwrap().is_none());
}

#[test]
fn editing_back_a_removed_hashtag_recreates_it() {
    let conn = open_db_in_memory().unwrap();
    let sut = service(&conn);

    let created = sut
        .create_article(NewArticle::new("uno", "t", "#java"))
        .unwrap();
    sut.update_article(created.id, "t", "no tags").unwrap();
    assert_eq!(hashtag_row_count(&conn), 0);

    let restored = sut.update_article(created.id, "t", "#java again").unwrap();
    assert_eq!(restored.hashtags, vec!["java"]);
    assert_eq!(hashtag_row_count(&conn), 1);
}

#[test]
fn validation_rejects_blank_and_oversized_input() {
    let conn = open_db_in_memory().unwrap();
    let sut = service(&conn);

    match sut.create_article(NewArticle::new("uno", "   ", "body")) {
        Err(ArticleServiceError::InvalidTitle) => {}
        other => panic!("expected invalid title, got {other:?}"),
    }

    match sut.create_article(NewArticle::new("uno", "t", "  ")) {
        Err(ArticleServiceError::InvalidContent) => {}
        other => panic!("expected invalid content, got {other:?}"),
    }

    let oversized = "x".repeat(10_001);
    match sut.create_article(NewArticle::new("uno", "t", oversized)) {
        Err(ArticleServiceError::ContentTooLong { chars, max }) => {
            assert_eq!(chars, 10_001);
            assert_eq!(max, 10_000);
        }
        other => panic!("expected content-too-long, got {other:?}"),
    }
}

#[test]
fn update_of_missing_article_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let sut = service(&conn);

    match sut.update_article(4242, "t", "body") {
        Err(ArticleServiceError::ArticleNotFound(id)) => assert_eq!(id, 4242),
        other => panic!("expected article-not-found, got {other:?}"),
    }
}
