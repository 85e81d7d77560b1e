//! # Workflows Module
//!
//! End-to-end procedures built on a [`Session`](crate::engine::session::Session).
//!
//! - **Setup Workflow** ([`setup`]) - Load, build, solvate, ionize and write the output
//!   files in one pass, honouring the pipeline switches of the form.

pub mod setup;
