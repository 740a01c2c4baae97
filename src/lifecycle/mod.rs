// src/lifecycle/mod.rs

//! Lifetime bookkeeping for listeners and background observers.
//!
//! - [`disposable`] defines the single-operation [`Disposable`] handle and
//!   the ordered, best-effort [`DisposableSet`].
//! - [`emitter`] is a small synchronous event emitter whose subscriptions
//!   are disposables, so whoever registers a listener can bound its lifetime.

pub mod disposable;
pub mod emitter;

pub use disposable::{Disposable, DisposableSet, FnDisposable, to_disposable};
pub use emitter::{EventEmitter, Subscription};
