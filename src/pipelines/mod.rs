//! Render pipeline builders.
//!
//! - `unlit` draws vertex-coloured geometry with no lighting applied

pub mod unlit;
