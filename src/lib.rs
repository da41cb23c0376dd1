//! Secret Santa gift exchange backend.
//!
//! Session-cookie authentication, a yearly circular gift assignment engine,
//! and per-user Amazon wishlists behind a JSON API. Product scraping and
//! outbound email are external collaborators behind the [`products`] and
//! [`email`] traits.

pub mod app;
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod matches;
pub mod products;
pub mod state;
pub mod users;
pub mod wishlist;

#[cfg(test)]
pub(crate) mod test_util;
