//! Building blocks shared by the puzzle solutions

pub mod grid;
pub mod interval;
pub mod parse;
pub mod reduce;
pub mod search;
