//! Setup module for the Module Forge application.
//!
//! This module contains setup functionality for visualization
//! and execution of a fill.

pub mod execution;
pub mod visualization;
