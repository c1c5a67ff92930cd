use thiserror::Error;

/// Database engine families a connection can target.
///
/// Each variant owns the conventions that differ between engines:
/// positional placeholder syntax, table introspection, and the
/// connection-string prefix accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

const ALL_DIALECTS: &[Dialect] = &[Dialect::Sqlite, Dialect::Postgres];

impl Dialect {
    /// Canonical name used on the command line and in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite3",
            Self::Postgres => "postgres",
        }
    }

    /// All accepted names for this dialect (case-insensitive matching).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Sqlite => &["sqlite3", "sqlite"],
            Self::Postgres => &["postgres", "postgresql", "pg"],
        }
    }

    /// URL schemes that identify this dialect in a connection string.
    fn url_prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::Sqlite => &["sqlite3://", "sqlite://"],
            Self::Postgres => &["postgres://", "postgresql://"],
        }
    }

    /// Positional placeholder for the 1-based argument `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Sqlite => format!("?{index}"),
            Self::Postgres => format!("${index}"),
        }
    }

    /// Introspection statement that checks whether a table exists.
    ///
    /// Binds the table name as its only argument. SQLite answers with a
    /// match count from its catalog table, PostgreSQL with a boolean from
    /// `information_schema`.
    pub fn table_exists_sql(&self) -> &'static str {
        match self {
            Self::Sqlite => "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            Self::Postgres => {
                "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)"
            }
        }
    }

    /// Connection target handed to the driver.
    ///
    /// SQLite drivers expect a plain file path, so a `sqlite3://` or
    /// `sqlite://` prefix is stripped. PostgreSQL URLs pass through as-is.
    pub fn connection_target<'a>(&self, dsn: &'a str) -> &'a str {
        match self {
            Self::Sqlite => self
                .url_prefixes()
                .iter()
                .find_map(|prefix| dsn.strip_prefix(prefix))
                .unwrap_or(dsn),
            Self::Postgres => dsn,
        }
    }

    /// Guess the dialect from a connection string.
    ///
    /// URL schemes win; otherwise anything that looks like a file path or
    /// `:memory:` is treated as SQLite.
    pub fn detect(dsn: &str) -> Option<Self> {
        let lower = dsn.to_lowercase();
        for &dialect in ALL_DIALECTS {
            if dialect.url_prefixes().iter().any(|p| lower.starts_with(p)) {
                return Some(dialect);
            }
        }
        if lower.contains("://") {
            return None;
        }
        if lower == ":memory:" || lower.ends_with(".db") || lower.ends_with(".sqlite") {
            return Some(Self::Sqlite);
        }
        None
    }

    /// Every supported dialect.
    pub fn all() -> &'static [Dialect] {
        ALL_DIALECTS
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no supported dialect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    #[error("unsupported dialect: {0}")]
    Unsupported(String),
}

impl std::str::FromStr for Dialect {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_DIALECTS
            .iter()
            .copied()
            .find(|d| d.aliases().contains(&lower.as_str()))
            .ok_or_else(|| DialectError::Unsupported(s.to_string()))
    }
}
