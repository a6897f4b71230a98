//! P.O.M.S Domain Layer
//!
//! Core value objects and trait seams for turning free-text portfolio queries
//! into structured records. Nothing in here talks to the network; model
//! providers and the extraction pipeline live in other crates.
//!
//! ## Key Concepts
//!
//! - **Order**: a trading instruction (buy, sell, hold, roll)
//! - **PortfolioHolding**: a request for position or exposure data
//! - **PortfolioPerformance**: a request for account returns over a window
//! - **Extraction**: one of the three collections produced by a model call
//! - **Intent**: which pipeline a query belongs to
//! - **Conversation**: the chat transcript handed to a model provider
//!
//! ## Date tokens
//!
//! Holdings and performance requests carry `start_date`/`end_date` strings.
//! The symbolic tokens `"today"` and `"YTD"` (and a missing start date) are
//! resolved by [`dates::normalize_window`] when a record is built from model
//! output, so callers only ever see concrete ISO-8601 dates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conversation;
pub mod dates;
pub mod extraction;
pub mod holding;
pub mod intent;
pub mod order;
pub mod performance;
pub mod traits;

// Re-exports for convenience
pub use conversation::{Conversation, Message, ToolCall, ToolSpec};
pub use dates::NormalizeDates;
pub use extraction::{Extraction, ExtractionSchema};
pub use holding::{Holdings, PortfolioHolding};
pub use intent::{Intent, KeywordClassifier};
pub use order::{Order, OrderAction, Orders};
pub use performance::{PortfolioPerformance, Performances};
