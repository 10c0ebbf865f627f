//! # stitchmap
//!
//! This crate provides a codec and an in-memory model for the Source Map v3
//! format, including the merge operation needed when generated files are
//! concatenated.
//!
//! ## Getting Started
//!
//! ```ignore
//! use stitchmap::SourceMap;
//!
//! // Load a source map from a buffer
//! let mut sm = SourceMap::from(buf).unwrap();
//!
//! // Decode the mapping table (lazy; the string is only decoded once)
//! let first = sm.mappings().unwrap().first().cloned().unwrap();
//! println!("first mapping: {first:?}");
//!
//! // Stitch another map below it, shifted by the lines already written
//! sm.append(&mut other, 25).unwrap();
//! sm.write(&mut out).unwrap();
//! ```
//!
//! ## Overview
//!
//! ### `SourceMap`
//!
//! [SourceMap] is the aggregate: version, generated file name, source root,
//! the interned `sources`/`names` tables with their contents, and the mapping
//! table. The `mappings` string is decoded on first access and re-encoded on
//! write; a map that is loaded and written back untouched round-trips its
//! encoded string byte for byte.
//!
//! ### `Mapping`
//!
//! [Mapping] is one decoded segment of the `mappings` table. It stores
//! indices into the owning map's tables; the map resolves them to strings,
//! full paths and content on demand.
//!
//! ### `DecodeMode`
//!
//! [DecodeMode] selects how nonconformant `mappings` input is handled.
//! The default is [lenient](DecodeMode::Lenient): bogus segments are dropped
//! instead of failing the whole map, which matches what the wider tooling
//! ecosystem emits and expects.
//!
//! ## Sharing
//!
//! Lazy work (mapping decode, source path resolution) happens behind
//! `&mut self`. Warm a map from its single owner first, then share it freely
//! for the `&self` accessors; there is no interior mutability.

mod error;
mod mapping;
mod mappings;
mod path;
mod sourcemap;
mod splitter;
mod vlq;

pub use error::*;
pub use mapping::*;
pub use mappings::*;
pub use sourcemap::*;
