// src/client/mod.rs

//! Composer command client.
//!
//! - [`catalog`] maps each named operation to its argument prefix and
//!   execution mode.
//! - [`args`] applies the argument rewriting every spawn goes through.
//! - [`composer`] is the [`ComposerClient`] itself: one method per
//!   operation, all funnelling into a single launch path that logs to the
//!   client's output emitter.

pub mod args;
pub mod catalog;
pub mod composer;

pub use args::{NO_ANSI, NO_PROGRESS, rewrite_args};
pub use catalog::Operation;
pub use composer::ComposerClient;
