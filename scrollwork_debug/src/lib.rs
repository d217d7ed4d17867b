// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for scrollwork diagnostics.
//!
//! This crate provides [`TraceSink`](scrollwork_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`] — in-memory log of [`recorder::RecordedEvent`]s.
//! - [`json::export`] — writes a recording as a JSON array of event objects.

pub mod json;
pub mod pretty;
pub mod recorder;
