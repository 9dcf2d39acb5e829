// condenser_api compatibility objects.
// Rows come from a `RowSource`; every field transform lives in `normalize`.

pub mod objects;
pub mod source;
pub mod votes;

pub use objects::{build_accounts, build_posts, LegacyAccount, LegacyPost};
pub use source::{PgRowSource, RowSource};
