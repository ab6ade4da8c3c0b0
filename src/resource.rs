//! Typed grocery item records.
//!
//! The store holds plain JSON documents; [`Item`] is the checked view handlers
//! return to clients.

pub mod item;

pub use item::Item;
