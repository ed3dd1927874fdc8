//! Integration tests for specification repositories
//!
//! Query construction is checked without a database. The tests at the end
//! need a running PostgreSQL reachable through `DATABASE_URL` and are ignored
//! by default.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use spechaus::prelude::*;

#[derive(Debug, Entity)]
#[entity(table = "users")]
pub struct User;

#[derive(Debug, Entity)]
pub struct Order;

/// Active users, the canonical example
struct ActiveUserSpecification;

impl Specification for ActiveUserSpecification {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool {
        entity.is::<User>()
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        Ok(Some(Expr::eq(&format!("{}.active", alias), json!(true))))
    }
}

struct ByEmailSpecification {
    email: String,
}

impl ByEmailSpecification {
    fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
        }
    }
}

impl Specification for ByEmailSpecification {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool {
        entity.is::<User>()
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        Ok(Some(Expr::eq(
            &format!("{}.email", alias),
            json!(self.email.as_str()),
        )))
    }
}

/// Records how often it is consulted and returns a fixed condition
struct RecordingSpecification {
    supported: bool,
    condition: Option<Expr>,
    modify_calls: AtomicUsize,
}

impl RecordingSpecification {
    fn new(supported: bool, condition: Option<Expr>) -> Self {
        Self {
            supported,
            condition,
            modify_calls: AtomicUsize::new(0),
        }
    }

    fn modify_calls(&self) -> usize {
        self.modify_calls.load(Ordering::SeqCst)
    }
}

impl Specification for RecordingSpecification {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        self.supported
    }

    fn modify(&self, _query: &mut QueryBuilder, _alias: &str) -> Result<Option<Expr>, QueryError> {
        self.modify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.condition.clone())
    }
}

/// Counts invocations, remembers what it saw and marks the query it touched
#[derive(Default)]
struct RecordingModifier {
    calls: AtomicUsize,
    seen_statement: Mutex<Option<String>>,
}

impl RecordingModifier {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Modifier for RecordingModifier {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut seen) = self.seen_statement.lock() {
            *seen = Some(query.statement().to_string());
        }
        query.set_hint("marker", json!(call));
        Ok(())
    }
}

struct FailingModifier;

impl Modifier for FailingModifier {
    fn modify(&self, _query: &mut Query) -> Result<(), QueryError> {
        Err(QueryError::InvalidPagination("rejected".to_string()))
    }
}

fn users() -> SpecificationRepository<User> {
    SpecificationRepository::new()
}

// ========================================
// Canonical rendering
// ========================================

#[test]
fn test_active_users_query() {
    let query = users().matching(&ActiveUserSpecification, None).unwrap();

    assert_eq!(query.dql(), "SELECT e FROM User e WHERE e.active = true");
    assert_eq!(query.sql(), "SELECT e.* FROM users e WHERE e.active = $1");
    assert_eq!(query.params(), &[json!(true)]);
}

#[test]
fn test_active_users_count_query() {
    let query = users()
        .count_matching(&ActiveUserSpecification, None)
        .unwrap();

    assert_eq!(
        query.dql(),
        "SELECT COUNT(e) FROM User e WHERE e.active = true"
    );
    assert_eq!(
        query.sql(),
        "SELECT COUNT(e) FROM users e WHERE e.active = $1"
    );
    assert!(query.is_count());
}

#[test]
fn test_custom_alias_is_used_throughout() {
    let repository = SpecificationRepository::<User>::with_alias("u").unwrap();
    let query = repository.matching(&ActiveUserSpecification, None).unwrap();

    assert_eq!(query.alias(), "u");
    assert_eq!(query.dql(), "SELECT u FROM User u WHERE u.active = true");
    assert_eq!(query.sql(), "SELECT u.* FROM users u WHERE u.active = $1");
}

// ========================================
// Unsupported specifications
// ========================================

#[test]
fn test_unsupported_specification_names_both_sides() {
    let orders = SpecificationRepository::<Order>::new();
    let spec = ByEmailSpecification::new("foo@example.com");

    let error = orders.matching(&spec, None).unwrap_err();
    match &error {
        RepositoryError::UnsupportedSpecification {
            specification,
            entity,
        } => {
            assert_eq!(specification, "ByEmailSpecification");
            assert_eq!(entity, "Order");
        }
        other => panic!("Expected UnsupportedSpecification, got {:?}", other),
    }
    assert_eq!(
        error.to_string(),
        "Specification \"ByEmailSpecification\" not supported by this repository (entity \"Order\")"
    );
}

#[test]
fn test_unsupported_specification_is_never_applied() {
    let spec = RecordingSpecification::new(false, Some(Expr::eq("e.id", json!(1))));
    let modifier = RecordingModifier::default();

    assert!(matches!(
        users().matching(&spec, Some(&modifier)),
        Err(RepositoryError::UnsupportedSpecification { .. })
    ));
    assert!(matches!(
        users().count_matching(&spec, Some(&modifier)),
        Err(RepositoryError::UnsupportedSpecification { .. })
    ));
    assert_eq!(spec.modify_calls(), 0);
    assert_eq!(modifier.calls(), 0);
}

#[test]
fn test_entity_bound_specification() {
    let spec = Comparison::eq("email", "foo@example.com").for_entity::<User>();

    assert!(users().matching(&spec, None).is_ok());
    match SpecificationRepository::<Order>::new().count_matching(&spec, None) {
        Err(RepositoryError::UnsupportedSpecification {
            specification,
            entity,
        }) => {
            assert_eq!(specification, "Comparison");
            assert_eq!(entity, "Order");
        }
        other => panic!("Expected UnsupportedSpecification, got {:?}", other),
    }
}

// ========================================
// Conditions
// ========================================

#[test]
fn test_empty_condition_leaves_query_unfiltered() {
    let none = RecordingSpecification::new(true, None);
    let empty_group = RecordingSpecification::new(true, Some(Expr::and(vec![])));

    for spec in [&none, &empty_group] {
        let query = users().matching(spec, None).unwrap();
        assert_eq!(query.condition(), None);
        assert_eq!(query.sql(), "SELECT e.* FROM users e");
        assert_eq!(query.dql(), "SELECT e FROM User e");
        assert_eq!(spec.modify_calls(), 1);
    }
}

#[test]
fn test_condition_is_attached_unchanged() {
    let condition = Expr::or(vec![
        Expr::eq("e.role", json!("admin")),
        Expr::and(vec![
            Expr::gte("e.age", json!(18)),
            Expr::is_null("e.deleted_at"),
        ]),
    ]);
    let spec = RecordingSpecification::new(true, Some(condition.clone()));

    let query = users().matching(&spec, None).unwrap();

    assert_eq!(query.condition(), Some(&condition));
    assert_eq!(spec.modify_calls(), 1);
}

#[test]
fn test_selection_and_count_share_condition() {
    let spec = Comparison::eq("active", true)
        .and(Like::ends_with("email", "@example.com"))
        .and(Not::new(In::new("role", ["banned", "suspended"])))
        .and(OrderBy::asc("email"));

    let selection = users().matching(&spec, None).unwrap();
    let count = users().count_matching(&spec, None).unwrap();

    assert_eq!(selection.condition(), count.condition());
    assert_eq!(selection.params(), count.params());
    assert_eq!(
        selection.sql(),
        "SELECT e.* FROM users e WHERE e.active = $1 AND e.email LIKE $2 \
         AND NOT (e.role IN ($3, $4)) ORDER BY e.email ASC"
    );
    assert_eq!(
        count.sql(),
        "SELECT COUNT(e) FROM users e WHERE e.active = $1 AND e.email LIKE $2 \
         AND NOT (e.role IN ($3, $4))"
    );
}

#[test]
fn test_null_equality_matches_missing_values() {
    let spec = Comparison::eq("deleted_at", Value::Null).and(Comparison::ne("email", Value::Null));
    let query = users().matching(&spec, None).unwrap();

    assert_eq!(
        query.sql(),
        "SELECT e.* FROM users e WHERE e.deleted_at IS NULL AND e.email IS NOT NULL"
    );
    assert!(query.params().is_empty());

    assert!(matches!(
        users().count_matching(&Comparison::lt("age", Value::Null), None),
        Err(RepositoryError::Query(QueryError::NullComparison { .. }))
    ));
}

#[test]
fn test_composite_with_join() {
    let spec = AndX::default()
        .with(Join::inner("orders", "o").on("id", "user_id"))
        .with(Comparison::gt("total", 100).in_alias("o"))
        .with(ActiveUserSpecification);

    let query = users().matching(&spec, None).unwrap();

    assert_eq!(
        query.sql(),
        "SELECT e.* FROM users e INNER JOIN orders o ON e.id = o.user_id \
         WHERE o.total > $1 AND e.active = $2"
    );
    assert_eq!(query.params(), &[json!(100), json!(true)]);
}

#[test]
fn test_specification_errors_pass_through() {
    let unknown_alias = Comparison::eq("total", 1).in_alias("o");

    match users().matching(&unknown_alias, None) {
        Err(RepositoryError::Query(QueryError::UnknownAlias { alias, .. })) => {
            assert_eq!(alias, "o")
        }
        other => panic!("Expected UnknownAlias, got {:?}", other),
    }

    assert!(matches!(
        users().count_matching(&Comparison::eq("e-mail", "x"), None),
        Err(RepositoryError::Query(QueryError::InvalidIdentifier(_)))
    ));
}

// ========================================
// Modifiers
// ========================================

#[test]
fn test_modifier_runs_once_on_returned_query() {
    let modifier = RecordingModifier::default();

    let query = users()
        .matching(&ActiveUserSpecification, Some(&modifier))
        .unwrap();

    assert_eq!(modifier.calls(), 1);
    assert_eq!(query.hint("marker"), Some(&json!(1)));
    // the condition was already part of the finalized statement
    assert_eq!(
        modifier.seen_statement.lock().unwrap().as_deref(),
        Some("SELECT e.* FROM users e WHERE e.active = $1")
    );

    let count = users()
        .count_matching(&ActiveUserSpecification, Some(&modifier))
        .unwrap();
    assert_eq!(modifier.calls(), 2);
    assert_eq!(count.hint("marker"), Some(&json!(2)));
}

#[test]
fn test_no_modifier_means_no_adjustments() {
    let query = users().matching(&ActiveUserSpecification, None).unwrap();

    assert_eq!(query.max_results(), None);
    assert_eq!(query.first_result(), None);
    assert!(query.hints().is_empty());
}

#[test]
fn test_pagination_modifier() {
    let window = ModifierChain::new()
        .with(Page::new(3, 20))
        .with(StatementTimeout(std::time::Duration::from_millis(500)));

    let query = users()
        .matching(&ActiveUserSpecification, Some(&window))
        .unwrap();

    assert_eq!(
        query.sql(),
        "SELECT e.* FROM users e WHERE e.active = $1 LIMIT 20 OFFSET 40"
    );
    assert_eq!(
        query.dql(),
        "SELECT e FROM User e WHERE e.active = true LIMIT 20 OFFSET 40"
    );
    assert_eq!(query.statement_timeout_ms(), Some(500));
}

#[test]
fn test_modifier_errors_pass_through() {
    assert!(matches!(
        users().matching(&ActiveUserSpecification, Some(&FailingModifier)),
        Err(RepositoryError::Query(QueryError::InvalidPagination(_)))
    ));
    assert!(matches!(
        users().count_matching(&ActiveUserSpecification, Some(&Page::new(0, 10))),
        Err(RepositoryError::Query(QueryError::InvalidPagination(_)))
    ));
}

// ========================================
// PostgreSQL
// ========================================

#[derive(Debug, FromRow, Entity)]
#[entity(name = "Member", table = "spechaus_test_members")]
pub struct Member {
    pub id: i32,
    pub email: String,
    pub active: bool,
    pub age: i32,
}

async fn setup_spechaus() -> SpecHaus {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    SpecHaus::with_pool(pool, RepositoryConfig::default())
}

async fn seed_members(spechaus: &SpecHaus) {
    let pool = spechaus.pool();
    let _ = sqlx::query("DROP TABLE IF EXISTS spechaus_test_members")
        .execute(pool)
        .await;
    sqlx::query(
        "CREATE TABLE spechaus_test_members (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL,
            active BOOLEAN NOT NULL,
            age INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create table");

    for (id, email, active, age) in [
        (1, "ada@example.com", true, 36),
        (2, "bob@example.com", false, 17),
        (3, "cy@example.org", true, 52),
        (4, "dee@example.com", true, 15),
    ] {
        sqlx::query(
            "INSERT INTO spechaus_test_members (id, email, active, age) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(email)
        .bind(active)
        .bind(age)
        .execute(pool)
        .await
        .expect("Failed to insert member");
    }
}

async fn cleanup_members(spechaus: &SpecHaus) {
    let _ = sqlx::query("DROP TABLE IF EXISTS spechaus_test_members")
        .execute(spechaus.pool())
        .await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_and_count_matching() {
    let spechaus = setup_spechaus().await;
    spechaus.health_check().await.unwrap();
    seed_members(&spechaus).await;

    let spec = Comparison::eq("active", true)
        .and(Comparison::gte("age", 18))
        .and(OrderBy::desc("age"));

    let members: Vec<Member> = spechaus.find_matching(&spec, None).await.unwrap();
    let emails: Vec<&str> = members.iter().map(|m| m.email.as_str()).collect();
    assert_eq!(emails, ["cy@example.org", "ada@example.com"]);

    let total = spechaus
        .count_where_matching::<Member>(&Comparison::eq("active", true), None)
        .await
        .unwrap();
    assert_eq!(total, 3);

    let ordered_total = spechaus
        .count_where_matching::<Member>(&spec, None)
        .await
        .unwrap();
    assert_eq!(ordered_total, 2);

    let ada: Option<Member> = spechaus
        .find_one_matching(&Comparison::eq("email", "ada@example.com"))
        .await
        .unwrap();
    assert_eq!(ada.map(|m| m.id), Some(1));

    cleanup_members(&spechaus).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_paged_pattern_search() {
    let spechaus = setup_spechaus().await;
    seed_members(&spechaus).await;

    let spec = Like::ends_with("email", "@example.com").and(OrderBy::asc("id"));
    let window = ModifierChain::new()
        .with(Page::new(2, 2))
        .with(StatementTimeout(std::time::Duration::from_secs(5)));

    let page: Vec<Member> = spechaus.find_matching(&spec, Some(&window)).await.unwrap();
    let ids: Vec<i32> = page.iter().map(|m| m.id).collect();
    assert_eq!(ids, [4]);

    let total = spechaus
        .count_where_matching::<Member>(&spec, Some(&Limit(10)))
        .await
        .unwrap();
    assert_eq!(total, 3);

    let paged_count = spechaus
        .count_where_matching::<Member>(&spec, Some(&window))
        .await;
    assert!(matches!(
        paged_count,
        Err(SpecHausError::Repository(RepositoryError::Query(
            QueryError::InvalidPagination(_)
        )))
    ));

    cleanup_members(&spechaus).await;
}
