//! # Engine Module
//!
//! The stateful layer. It turns a filled-in form into library calls and keeps
//! the model that results from them.
//!
//! - **Configuration** ([`config`]) - The form: every option a user can set, with its default
//! - **Validation** ([`validation`]) - Field checks per action, reported before any library call
//! - **Box policy** ([`box_policy`]) - Which box fields a shape exposes, and the resolved boundary
//! - **Session** ([`session`]) - Stage dispatch, the current model and the viewer objects
//! - **Progress** ([`progress`]) - Events emitted while a session works
//! - **Errors** ([`error`]) - Validation and session failures

pub mod box_policy;
pub mod config;
pub mod error;
pub mod progress;
pub mod session;
pub mod stage;
pub mod validation;
