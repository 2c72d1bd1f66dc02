//! # Base types for larkchess
//!
//! This is an auxiliary crate for `larkchess`, which contains some core stuff. It was split from
//! the main crate, so everything declared here can be used in the build script for `larkchess`.
//!
//! Normally you don't want to use this crate directly. Use `larkchess` instead.

pub mod bitboard;
pub mod bitboard_consts;
pub mod geometry;
pub mod magics;
pub mod types;
