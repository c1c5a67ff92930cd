//! Store-independent core of the catalog listing.
//!
//! Holds the listing criteria, the SQL dialects we target, and the
//! fragment-accumulating query builder that turns criteria into a
//! parameterized statement. Nothing here touches a database.

pub mod criteria;
pub mod dialect;
pub mod query;
pub mod record;

pub use criteria::{DEFAULT_LIMIT, DEFAULT_OFFSET, ListingCriteria, ListingParams, SortMode};
pub use dialect::{Dialect, DialectError};
pub use query::{LISTING_BASE_SQL, QueryBuilder, QueryFragment, SqlValue, build_listing_query};
pub use record::ProductRecord;
