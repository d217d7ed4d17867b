// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser host for scrollwork.
//!
//! This crate binds the [`Host`](scrollwork_core::host::Host) port to
//! browser APIs:
//!
//! - [`WebHost`]: `IntersectionObserver`, passive `scroll` listeners,
//!   `requestAnimationFrame`, the `(prefers-reduced-motion: reduce)` media
//!   query, and CSS `transform` writes.
//! - [`reveal_with_class`]: attaches a reveal target that adds a CSS class
//!   once visible.
//! - [`ConsoleSink`]: a [`TraceSink`](scrollwork_core::trace::TraceSink)
//!   that logs to the browser console.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Forwards to `scrollwork_core/trace`.

#![no_std]

extern crate alloc;

mod class;
mod console;
mod host;

pub use class::{VISIBLE_CLASS, reveal_with_class, reveal_with_default_class};
pub use console::ConsoleSink;
pub use host::WebHost;
pub use scrollwork_core::host::Host;
