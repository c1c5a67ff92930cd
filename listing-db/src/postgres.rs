//! PostgreSQL backend on top of an `sqlx` connection pool.

use listing_core::{Dialect, ProductRecord, QueryFragment, SqlValue};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use crate::error::StoreError;

/// Connect a pool of at most `max_connections` to `url`.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    log::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .min_connections(1)
        .connect(url)
        .await?;
    log::info!("Database connection established");
    Ok(pool)
}

pub(crate) async fn fetch_products(
    pool: &PgPool,
    fragment: &QueryFragment,
) -> Result<Vec<ProductRecord>, StoreError> {
    let sql = fragment.sql();
    let mut query = sqlx::query(&sql);
    for arg in fragment.args() {
        query = match arg {
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Int(i) => query.bind(*i),
        };
    }
    let rows = query.fetch_all(pool).await?;
    rows.iter()
        .map(row_to_product)
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

pub(crate) async fn table_exists(pool: &PgPool, table: &str) -> Result<bool, StoreError> {
    let exists: bool = sqlx::query_scalar(Dialect::Postgres.table_exists_sql())
        .bind(table)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub(crate) async fn count_rows(pool: &PgPool, sql: &str) -> Result<i64, StoreError> {
    let count: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
    Ok(count)
}

fn row_to_product(row: &PgRow) -> Result<ProductRecord, sqlx::Error> {
    Ok(ProductRecord {
        id: get_int(row, 0)?,
        name: row.try_get(1)?,
        category: row.try_get(2)?,
        price: get_int(row, 3)?,
    })
}

/// Read an integer column declared as either `INTEGER` or `BIGINT`.
fn get_int(row: &PgRow, index: usize) -> Result<i64, sqlx::Error> {
    match row.try_get::<i64, _>(index) {
        Err(sqlx::Error::ColumnDecode { .. }) => row.try_get::<i32, _>(index).map(i64::from),
        other => other,
    }
}
