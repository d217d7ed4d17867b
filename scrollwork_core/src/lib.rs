// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-driven visual behaviors over an injected host capability port.
//!
//! `scrollwork_core` implements two independent behaviors that a view layer
//! attaches to elements while mounted and releases when unmounted. It is
//! `no_std` compatible (with `alloc`) and never touches a real rendering
//! environment directly: every viewport capability is reached through the
//! [`Host`](host::Host) trait.
//!
//! # Architecture
//!
//! ```text
//!   View (mount/unmount)
//!       │
//!       ├──► ScrollReveal::attach() ──► RevealHandle ──► is_visible()
//!       │          │
//!       │          ▼
//!       │    Host::observe_intersection() ──► IntersectionEntry
//!       │
//!       └──► ParallaxController::register_layer()
//!                  │
//!                  ▼
//!   Host::on_scroll() ──► Host::request_frame() ──► Host::set_layer_offset()
//! ```
//!
//! **[`reveal`]** — One-shot `Pending -> Visible` state machine per target.
//! Falls back to immediately visible when the host cannot observe
//! intersection or the user asked for reduced motion.
//!
//! **[`parallax`]** — Layer registry plus a frame-coalescing update loop that
//! offsets each layer by `speed_factor × scroll`.
//!
//! **[`host`]** — The [`Host`](host::Host) capability port and the
//! [`Subscription`](host::Subscription) disposer every subscription returns.
//!
//! **[`margin`]** — CSS-style root margin parsing and viewport expansion.
//!
//! **[`intersect`]** — Rectangle intersection ratios.
//!
//! **[`motion`]** — The reduced-motion accessibility signal.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! behavior instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `testing` (disabled by default): Exposes the scripted
//!   [`FakeHost`](testing::FakeHost) for downstream tests.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod host;
pub mod intersect;
pub mod margin;
pub mod motion;
pub mod parallax;
pub mod reveal;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod trace;
