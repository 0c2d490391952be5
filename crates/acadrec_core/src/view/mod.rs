//! View layer: what a given caller is shown.
//!
//! # Responsibility
//! - Role projection and filters over the full roster.
//! - Read-only aggregates (class summaries, class listings, profile card).
//!
//! # Invariants
//! - Views never mutate the table they are derived from.

pub mod profile;
pub mod projection;
pub mod summary;

pub use profile::profile_card;
pub use projection::{pass_flag, project, ColumnMatch, ViewFilter};
pub use summary::{class_summaries, known_classes, student_classes, ClassSummary, GENERAL_CLASS};
