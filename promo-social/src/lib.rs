//! Social network clients used by the promo commenter.
//!
//! Only the vc.ru pipeline is implemented. [`PromoFeed`] is the seam the poll
//! loop is written against, so the loop never talks to HTTP directly.
pub mod feed;
pub mod vc;

pub use feed::PromoFeed;
