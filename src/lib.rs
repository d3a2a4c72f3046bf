#![deny(clippy::all, clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]
//! # xkcd-vk-poster
//!
//! Picks a random xkcd comic and publishes it, hover text as caption, on a
//! VK group wall.
//!
//! A run goes through:
//! - [`comic::latest_index`] and [`comic::fetch_comic`]
//! - [`UploadServer`] and [`UploadedPhoto`]
//! - [`SavedPhoto`]
//! - [`WallPost`]
//!
//! [`Publisher`] sequences them and removes the downloaded image on every
//! exit path.
//!
//! ## Example: posting one comic.
//!
//! ```rust,no_run
//! # type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
//! use xkcd_vk_poster::{Config, Publisher};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let config = Config::new("vk1.a.token", 218375442);
//!     let publisher = Publisher::new(config)?;
//!
//!     let report = publisher.run().await?;
//!     println!("comic #{} ended in stage {}", report.index(), report.stage());
//!     Ok(())
//! }
//! ```
//!
//! [`UploadServer`]: crate::upload::UploadServer
//! [`UploadedPhoto`]: crate::upload::UploadedPhoto
//! [`SavedPhoto`]:   crate::photo::SavedPhoto
//! [`WallPost`]:     crate::wall::WallPost

/// Client module contains [`Client`] for talking to the comic service and the platform.
pub mod client;

/// Run configuration.
pub mod config;

/// Contains [`Error`]s returned by every step of a run.
///
/// [`Error`]: crate::error::Error
pub mod error;

/// The downloaded image and its cleanup.
pub mod image;

/// Sequencing of a whole run.
pub mod publisher;

pub(crate) mod models;

pub(crate) mod result;

pub use client::Client;
pub use config::Config;
pub use models::*;
pub use publisher::{Outcome, Publisher, Report, Stage};
