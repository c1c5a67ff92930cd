#![allow(dead_code)]

use std::path::PathBuf;

use listing_core::Dialect;
use listing_db::{Store, StoreOptions};
use rusqlite::Connection;
use tempfile::TempDir;

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE products (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    price INTEGER NOT NULL
);

CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    email TEXT NOT NULL
);

CREATE TABLE expenses (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    category_id INTEGER NOT NULL REFERENCES categories(id),
    amount INTEGER NOT NULL
);
"#;

pub const SEED_SQL: &str = r#"
INSERT INTO categories (id, name) VALUES (1, 'food'), (2, 'toys'), (3, 'books');

INSERT INTO products (id, name, category_id, price) VALUES
    (1, 'Rice', 1, 350),
    (2, 'Apple', 1, 120),
    (3, 'Robot', 2, 4999),
    (4, 'Novel', 3, 1599),
    (5, 'Bread', 1, 275),
    (6, 'Puzzle', 2, 1850);

INSERT INTO users (id, email) VALUES (1, 'ana@example.com'), (2, 'bo@example.com');

INSERT INTO expenses (id, user_id, category_id, amount) VALUES
    (1, 1, 1, 350),
    (2, 1, 2, 1850),
    (3, 2, 3, 1599);
"#;

/// A temporary SQLite database file that lives as long as the fixture.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    /// Create a database file and run `sql` against it.
    pub fn with_sql(sql: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(sql).unwrap();
        Self { _dir: dir, path }
    }

    /// Full schema with the standard seed rows.
    pub fn seeded() -> Self {
        Self::with_sql(&format!("{SCHEMA_SQL}{SEED_SQL}"))
    }

    pub fn dsn(&self) -> String {
        format!("sqlite3://{}", self.path.display())
    }

    pub async fn store(&self) -> Store {
        Store::connect(Dialect::Sqlite, &self.dsn(), &StoreOptions::default().pool_size(2))
            .await
            .unwrap()
    }
}
