//! CLI infrastructure for the smartcab toolkit
//!
//! This module provides the command-line interface for training the learning
//! agent and for running the non-learning baseline driver.

pub mod commands;
pub mod output;
