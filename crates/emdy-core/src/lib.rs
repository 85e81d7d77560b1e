//! # EMDY Setup
//!
//! Prepares a biomolecular structure for molecular dynamics: builds its
//! topology, solvates it, adds ions and writes topology and coordinate files.
//! The modeling itself is done by a library behind the
//! [`SetupLibrary`](core::library::SetupLibrary) trait; results are shown
//! through a [`Viewer`](core::viewer::Viewer).
//!
//! ## Architecture
//!
//! - **[`core`]: The Vocabulary.** Option enums, box geometry and the traits for
//!   the modeling library and the viewer, plus dry-run implementations of both.
//!
//! - **[`engine`]: The Logic Core.** The form, its validation, the box-field
//!   policy and the [`Session`](engine::session::Session) that dispatches stages
//!   and owns the current model.
//!
//! - **[`workflows`]: The Public API.** The full setup pipeline in one call.

pub mod core;
pub mod engine;
pub mod workflows;
