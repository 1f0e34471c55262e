//! API client library for cinedex.
//!
//! Provides the OMDb movie directory client and the poster image
//! reachability probe.

/// OMDb movie directory client.
pub mod omdb;

/// Poster image reachability probe.
pub mod probe;
