//! Shared data model for cohort harmonization.
//!
//! Tables are Polars `DataFrame`s whose columns are all `String` typed; the
//! helpers in [`table`] keep that convention in one place. Identifier sets,
//! sex coding and the immutable run summaries live alongside.

pub mod ids;
pub mod sex;
pub mod summary;
pub mod table;

pub use ids::{IdentifierSet, intersect3};
pub use sex::{SexCodes, SexGroup};
pub use summary::{HarmonizationSummary, SexSplitSummary};
pub use table::{column_names, has_column, string_frame, trimmed_values};
