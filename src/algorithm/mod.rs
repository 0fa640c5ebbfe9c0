//! Algorithm implementations for organisation group generation
//!
//! This module contains the grouping key resolution, provider partitioning,
//! target organisation lookup and the generator that orchestrates them.

pub mod grouping;
