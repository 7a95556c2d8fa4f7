//! Fair-price suggestions for farm produce from the Agmarknet mandi price feed.
//!
//! A free-text product name is resolved to feed commodity labels, each label
//! is tried in turn until the feed returns usable records, and the most
//! recent day's reports are summarized into a single suggested price.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod pricing;
pub mod search;
pub mod service;
pub mod state;

pub use error::{Error, ErrorKind, Result};
