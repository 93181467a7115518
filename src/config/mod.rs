//! # tagsql Configuration Module
//!
//! This module centralizes the constants shared by the annotation parser, the
//! value codecs and the database manager. Constants that depend on each other
//! are co-located and checked with compile-time assertions.
//!
//! ## Module Organization
//!
//! - [`constants`]: Annotation grammar markers, codec formats and defaults

pub mod constants;
pub use constants::*;
