//! Algorithm implementations
//!
//! This module contains the risk adjustment scoring pipeline.

pub mod raf;
