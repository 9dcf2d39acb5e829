// Leaf value transforms: asset amounts, reputation scores, text and dates.
// Pure functions only; nothing here touches the row source.

pub mod amount;
pub mod reputation;
pub mod text;

pub use amount::{amount, legacy_amount, parse_amount, Amount, Asset};
pub use reputation::{display_to_raw, raw_to_display};
