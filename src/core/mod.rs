//! Core types shared across the engine

pub mod cursor;
pub mod error;
pub mod value;
