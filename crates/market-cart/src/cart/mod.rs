//! Cart module.
//!
//! Contains the item types and the pure in-memory cart state.

mod item;
mod state;

pub use item::{CartItem, NewCartItem};
pub use state::{CartState, DecrementOutcome};
