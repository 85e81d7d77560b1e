//! # Core Module
//!
//! Stateless building blocks shared by the engine and by front-ends.
//!
//! - **Models** ([`models`]) - closed enums for formats, box shapes, solvents, ions and
//!   preparation options, plus box geometry.
//! - **Library boundary** ([`library`]) - the [`library::SetupLibrary`] trait through which
//!   every molecular-modeling operation is delegated.
//! - **Viewer boundary** ([`viewer`]) - the [`viewer::Viewer`] trait for the host display.
//! - **Dry run** ([`dry_run`]) - recording implementations of both traits.

pub mod dry_run;
pub mod library;
pub mod models;
pub mod viewer;
