//! Command implementations.

pub mod classify;
pub mod examples;
pub mod profile;
pub mod query;

pub use self::classify::execute_classify;
pub use self::examples::execute_examples;
pub use self::profile::execute_profile;
pub use self::query::{execute_query, process_query, QueryOutcome};
