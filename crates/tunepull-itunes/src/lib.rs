// SPDX-License-Identifier: GPL-3.0-or-later

//! iTunes Search API client for fetching track metadata.
//!
//! This crate provides a client for the public Search API (song search
//! with a fixed result ceiling) and a fetcher for raw artwork bytes.
//! Neither performs retries; a failed call surfaces to the caller.

pub mod artwork;
pub mod client;
pub mod error;
pub mod models;

pub use artwork::ArtworkFetcher;
pub use client::ItunesClient;
pub use error::{FetchError, Result, SearchError};
pub use models::{Candidate, SearchResponse, SearchTerms};
