mod common;

use common::{Fixture, SCHEMA_SQL, SEED_SQL};
use listing_core::{Dialect, DialectError};
use listing_db::*;

#[tokio::test]
async fn all_expected_tables_report_row_counts() {
    let fixture = Fixture::seeded();
    let store = fixture.store().await;

    let results = verify_tables(&store, "sqlite3", EXPECTED_TABLES, |_| {}).await;
    let lines: Vec<String> = results.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "users: OK (rows=2)",
            "categories: OK (rows=3)",
            "expenses: OK (rows=3)",
        ]
    );
    assert!(results.iter().all(TableCheckResult::exists));
}

#[tokio::test]
async fn missing_tables_do_not_stop_the_run() {
    let fixture = Fixture::with_sql(
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
         INSERT INTO categories (name) VALUES ('food');",
    );
    let store = fixture.store().await;

    let results = verify_tables(&store, "sqlite3", EXPECTED_TABLES, |_| {}).await;
    assert_eq!(results.len(), 3);
    assert!(matches!(results[0].status, TableStatus::NotFound));
    assert_eq!(results[1].rows(), Some(1));
    assert!(matches!(results[2].status, TableStatus::NotFound));
    assert_eq!(results[0].to_string(), "users: NOT FOUND");
    assert_eq!(results[0].rows(), None);
}

#[tokio::test]
async fn unsupported_dialect_fails_each_table_independently() {
    let fixture = Fixture::seeded();
    let store = fixture.store().await;

    let results = verify_tables(&store, "mysql", EXPECTED_TABLES, |_| {}).await;
    assert_eq!(results.len(), EXPECTED_TABLES.len());
    for (result, table) in results.iter().zip(EXPECTED_TABLES) {
        assert_eq!(result.table, *table);
        assert!(matches!(
            result.status,
            TableStatus::ExistenceFailed(VerifyError::Dialect(DialectError::Unsupported(_)))
        ));
        assert_eq!(
            result.to_string(),
            format!("{table}: error checking existence: unsupported dialect: mysql")
        );
    }
}

#[tokio::test]
async fn unsupported_dialect_is_not_a_false_negative() {
    let fixture = Fixture::seeded();
    let store = fixture.store().await;

    let err = table_exists(&store, "oracle", "users").await.unwrap_err();
    assert!(matches!(err, VerifyError::Dialect(_)));
}

#[tokio::test]
async fn dialect_must_match_store_engine() {
    let fixture = Fixture::seeded();
    let store = fixture.store().await;

    let err = table_exists(&store, "postgres", "users").await.unwrap_err();
    assert!(matches!(
        err,
        VerifyError::DialectMismatch {
            dialect: Dialect::Postgres,
            store: Dialect::Sqlite,
        }
    ));
}

#[tokio::test]
async fn dialect_aliases_are_accepted() {
    let fixture = Fixture::seeded();
    let store = fixture.store().await;

    assert!(table_exists(&store, "sqlite", "users").await.unwrap());
    assert!(!table_exists(&store, "SQLite3", "ghosts").await.unwrap());
}

#[tokio::test]
async fn views_are_not_tables() {
    let fixture = Fixture::with_sql(&format!(
        "{SCHEMA_SQL}{SEED_SQL}CREATE VIEW cheap AS SELECT * FROM products WHERE price < 300;"
    ));
    let store = fixture.store().await;

    assert!(!table_exists(&store, "sqlite3", "cheap").await.unwrap());
}

#[tokio::test]
async fn awkward_table_names_are_quoted_for_counting() {
    let fixture = Fixture::with_sql(
        r#"CREATE TABLE "odd""name" (id INTEGER);
           INSERT INTO "odd""name" VALUES (1), (2);"#,
    );
    let store = fixture.store().await;

    let result = verify_table(&store, "sqlite3", "odd\"name").await;
    assert_eq!(result.rows(), Some(2));
    assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
}

#[tokio::test]
async fn results_are_reported_in_order_as_they_complete() {
    let fixture = Fixture::seeded();
    let store = fixture.store().await;

    let mut seen = Vec::new();
    verify_tables(&store, "sqlite3", &["expenses", "missing", "users"], |r| {
        seen.push(r.to_string())
    })
    .await;
    assert_eq!(
        seen,
        vec![
            "expenses: OK (rows=3)",
            "missing: NOT FOUND",
            "users: OK (rows=2)",
        ]
    );
}

#[tokio::test]
async fn sqlite_connections_enforce_foreign_keys() {
    let fixture = Fixture::seeded();
    let store = fixture.store().await;
    let Store::Sqlite(pool) = &store else {
        panic!("expected a SQLite store");
    };

    for _ in 0..pool.size() {
        let enabled: i64 = pool
            .run(None, |conn| {
                Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    let insert = pool
        .run(None, |conn| {
            conn.execute(
                "INSERT INTO products (name, category_id, price) VALUES ('Orphan', 99, 1)",
                [],
            )?;
            Ok(())
        })
        .await;
    assert!(insert.is_err());
}

#[tokio::test]
async fn count_failure_is_reported_and_the_run_continues() {
    // A virtual table whose module this build does not provide: it is listed
    // in sqlite_master as a table, but any read from it fails.
    let fixture = Fixture::with_sql(&format!(
        "{SCHEMA_SQL}{SEED_SQL}
         PRAGMA writable_schema = ON;
         INSERT INTO sqlite_master (type, name, tbl_name, rootpage, sql)
         VALUES ('table', 'ledger', 'ledger', 0,
                 'CREATE VIRTUAL TABLE ledger USING missing_module(entry)');
         PRAGMA writable_schema = OFF;"
    ));
    let store = fixture.store().await;

    let results = verify_tables(&store, "sqlite3", &["ledger", "users"], |_| {}).await;

    assert!(matches!(results[0].status, TableStatus::CountFailed(_)));
    assert!(results[0].exists());
    assert_eq!(results[0].rows(), None);
    let line = results[0].to_string();
    assert!(line.starts_with("ledger: error counting rows: "), "{line}");
    assert!(line.contains("missing_module"), "{line}");

    assert_eq!(results[1].to_string(), "users: OK (rows=2)");
}
