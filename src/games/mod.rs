//! Game implementations.

pub mod xiangqi;
