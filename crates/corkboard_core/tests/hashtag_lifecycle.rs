use corkboard_core::db::open_db_in_memory;
use corkboard_core::{
    ArticleRepository, Hashtag, HashtagRepository, HashtagService, NewArticle, RepoError,
    RepoResult, SqliteArticleRepository, SqliteHashtagRepository,
};
use std::collections::BTreeSet;

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn resolve_creates_rows_lazily_and_reuses_them() {
    let conn = open_db_in_memory().unwrap();
    let service = HashtagService::new(SqliteHashtagRepository::new(&conn));

    let first = service.resolve(&names(&["java", "spring"])).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "java");
    assert_eq!(first[1].name, "spring");

    let second = service.resolve(&names(&["java", "spring", "부트"])).unwrap();
    assert_eq!(second.len(), 3);
    let reused: Vec<_> = second
        .iter()
        .filter(|hashtag| first.iter().any(|existing| existing.id == hashtag.id))
        .collect();
    assert_eq!(reused.len(), 2, "existing rows must be reused, not recreated");
}

#[test]
fn resolve_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let service = HashtagService::new(SqliteHashtagRepository::new(&conn));

    let resolved = service.resolve(&names(&["Java", "java"])).unwrap();
    assert_eq!(resolved.len(), 2);
    assert_ne!(resolved[0].id, resolved[1].id);
}

#[test]
fn resolve_of_empty_set_touches_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = HashtagService::new(SqliteHashtagRepository::new(&conn));

    assert!(service.resolve(&BTreeSet::new()).unwrap().is_empty());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM hashtags;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn cleanup_deletes_orphans_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = HashtagService::new(SqliteHashtagRepository::new(&conn));

    let resolved = service.resolve(&names(&["orphan"])).unwrap();
    let id = resolved[0].id;

    service.cleanup_orphans(&[id]).unwrap();
    let repo = SqliteHashtagRepository::new(&conn);
    assert!(repo.find_by_name("orphan").unwrap().is_none());

    // Second pass finds the row already gone and stays a no-op.
    service.cleanup_orphans(&[id]).unwrap();
    assert!(repo.find_by_name("orphan").unwrap().is_none());
}

#[test]
fn cleanup_keeps_hashtags_still_referenced_by_an_article() {
    let conn = open_db_in_memory().unwrap();
    let articles = SqliteArticleRepository::new(&conn);
    let service = HashtagService::new(SqliteHashtagRepository::new(&conn));

    let article_id = articles
        .create_article(&NewArticle::new("uno", "title", "#kept body"))
        .unwrap();
    let resolved = service.resolve(&names(&["kept"])).unwrap();
    let hashtag_id = resolved[0].id;
    articles
        .replace_article_hashtags(article_id, &[hashtag_id])
        .unwrap();

    service.cleanup_orphans(&[hashtag_id]).unwrap();

    let repo = SqliteHashtagRepository::new(&conn);
    let survivor = repo.find_by_name("kept").unwrap();
    assert_eq!(survivor.map(|hashtag| hashtag.id), Some(hashtag_id));
}

/// Repository double that always loses the create race, the way a second
/// process would when both resolve the same new name concurrently.
struct RacingRepository<'conn> {
    inner: SqliteHashtagRepository<'conn>,
}

impl HashtagRepository for RacingRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Hashtag>> {
        self.inner.find_by_name(name)
    }

    fn find_by_names(&self, names: &BTreeSet<String>) -> RepoResult<Vec<Hashtag>> {
        self.inner.find_by_names(names)
    }

    fn create(&self, name: &str) -> RepoResult<Hashtag> {
        // The competing writer commits first, then our insert collides.
        self.inner.create(name)?;
        Err(RepoError::DuplicateHashtagName(name.to_string()))
    }

    fn count_referencing_articles(&self, id: i64) -> RepoResult<u64> {
        self.inner.count_referencing_articles(id)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        self.inner.delete(id)
    }

    fn delete_if_orphaned(&self, id: i64) -> RepoResult<bool> {
        self.inner.delete_if_orphaned(id)
    }
}

#[test]
fn resolve_recovers_from_duplicate_name_race_by_refetching() {
    let conn = open_db_in_memory().unwrap();
    let service = HashtagService::new(RacingRepository {
        inner: SqliteHashtagRepository::new(&conn),
    });

    let resolved = service.resolve(&names(&["raced"])).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name, "raced");

    let repo = SqliteHashtagRepository::new(&conn);
    let persisted = repo.find_by_name("raced").unwrap().unwrap();
    assert_eq!(persisted.id, resolved[0].id);
}

#[test]
fn delete_if_orphaned_keeps_a_row_that_gained_a_reference() {
    let conn = open_db_in_memory().unwrap();
    let articles = SqliteArticleRepository::new(&conn);
    let repo = SqliteHashtagRepository::new(&conn);

    let hashtag = repo.create("contested").unwrap();
    let article_id = articles
        .create_article(&NewArticle::new("uno", "title", "#contested body"))
        .unwrap();
    // The association lands before cleanup gets to the candidate, the way a
    // concurrent resolve on another article would.
    articles
        .replace_article_hashtags(article_id, &[hashtag.id])
        .unwrap();

    assert!(!repo.delete_if_orphaned(hashtag.id).unwrap());
    assert!(repo.find_by_name("contested").unwrap().is_some());

    // Once the reference goes away the same call deletes, then no-ops.
    articles.replace_article_hashtags(article_id, &[]).unwrap();
    assert!(repo.delete_if_orphaned(hashtag.id).unwrap());
    assert!(!repo.delete_if_orphaned(hashtag.id).unwrap());
}

#[test]
fn create_surfaces_duplicate_name_as_semantic_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHashtagRepository::new(&conn);

    repo.create("taken").unwrap();
    match repo.create("taken") {
        Err(RepoError::DuplicateHashtagName(name)) => assert_eq!(name, "taken"),
        other => panic!("expected duplicate-name error, got {other:?}"),
    }
}

#[test]
fn create_does_not_mislabel_other_constraint_failures_as_duplicates() {
    let conn = open_db_in_memory().unwrap();
    // A non-UNIQUE constraint on the same insert path must come back as a
    // DB error, not as a duplicate that resolve would quietly re-fetch.
    conn.execute_batch(
        "CREATE TEMP TRIGGER block_forbidden_hashtag
         BEFORE INSERT ON hashtags
         WHEN NEW.name = 'forbidden'
         BEGIN
             SELECT RAISE(ABORT, 'blocked by trigger');
         END;",
    )
    .unwrap();

    let repo = SqliteHashtagRepository::new(&conn);
    match repo.create("forbidden") {
        Err(RepoError::Db(_)) => {}
        other => panic!("expected a DB error, got {other:?}"),
    }
}
