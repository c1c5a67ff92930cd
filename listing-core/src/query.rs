//! Parameterized statement construction.
//!
//! A statement is accumulated fragment by fragment. Every fragment that
//! carries a value gets the next positional placeholder, and the value is
//! appended to the argument list in the same step, so text and arguments
//! can never drift apart.

use crate::criteria::ListingCriteria;
use crate::dialect::Dialect;

/// Base listing statement. `WHERE 1=1` lets every filter start with `AND`.
pub const LISTING_BASE_SQL: &str = "SELECT p.id, p.name, c.name AS category, p.price \
     FROM products p \
     JOIN categories c ON p.category_id = c.id \
     WHERE 1=1";

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

/// A finished statement: ordered SQL fragments plus the arguments bound to
/// their placeholders.
///
/// Placeholders are numbered `1..=args.len()` in the order they appear in
/// the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFragment {
    dialect: Dialect,
    parts: Vec<String>,
    args: Vec<SqlValue>,
}

impl QueryFragment {
    /// The full statement text.
    pub fn sql(&self) -> String {
        self.parts.join(" ")
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// Accumulates fragments into a [`QueryFragment`].
///
/// The builder is scoped to a single statement; its placeholder counter is
/// the length of the argument list, so a fragment that binds nothing
/// cannot consume a slot.
#[derive(Debug)]
pub struct QueryBuilder {
    dialect: Dialect,
    parts: Vec<String>,
    args: Vec<SqlValue>,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect, base: impl Into<String>) -> Self {
        Self {
            dialect,
            parts: vec![base.into()],
            args: Vec::new(),
        }
    }

    /// Index the next bound value will receive.
    pub fn next_index(&self) -> usize {
        self.args.len() + 1
    }

    /// Append literal SQL that binds nothing.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.parts.push(sql.to_string());
        self
    }

    /// Append `sql` followed by the next placeholder, and bind `value` to it.
    pub fn push_bind(&mut self, sql: &str, value: impl Into<SqlValue>) -> &mut Self {
        let placeholder = self.dialect.placeholder(self.next_index());
        self.parts.push(format!("{sql} {placeholder}"));
        self.args.push(value.into());
        self
    }

    pub fn build(self) -> QueryFragment {
        QueryFragment {
            dialect: self.dialect,
            parts: self.parts,
            args: self.args,
        }
    }
}

/// Build the product listing statement for `criteria`.
///
/// Filters are applied in a fixed order (category, minimum price, maximum
/// price), then the ordering clause, then `LIMIT` and `OFFSET`, which are
/// always the last two arguments.
pub fn build_listing_query(criteria: &ListingCriteria, dialect: Dialect) -> QueryFragment {
    let mut builder = QueryBuilder::new(dialect, LISTING_BASE_SQL);

    if let Some(category) = &criteria.category {
        builder.push_bind("AND c.name =", category.as_str());
    }
    if let Some(min) = criteria.min_price {
        builder.push_bind("AND p.price >=", min);
    }
    if let Some(max) = criteria.max_price {
        builder.push_bind("AND p.price <=", max);
    }
    if let Some(order_by) = criteria.sort.order_by() {
        builder.push(order_by);
    }

    builder
        .push_bind("LIMIT", criteria.limit)
        .push_bind("OFFSET", criteria.offset);
    builder.build()
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
