//! vc.ru API integration surface exposed to the poll loop.
//!
//! Submodules provide the HTTP client wrapper, the entry classification rules,
//! and strongly typed response models.
pub mod client;
pub mod select;
pub mod types;

pub use client::VcApi;
pub use select::{PROMO_TITLE, Verdict, classify};
pub use types::Entry;
