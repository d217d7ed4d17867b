// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;
use alloc::string::String;

use scrollwork_core::trace::{
    FrameEvent, IntersectionEvent, ParallaxStateEvent, RevealAttachEvent, RevealDetachEvent,
    RevealEvent, ScrollEvent, TraceSink,
};
use wasm_bindgen::JsValue;

/// A [`TraceSink`] that logs one line per event with `console.log`.
///
/// Scroll events are skipped unless [`with_scroll_events`](Self::with_scroll_events)
/// is set, as they arrive at input rate and drown everything else out.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    scroll_events: bool,
}

impl ConsoleSink {
    /// Creates a sink that skips scroll events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log every scroll notification.
    #[must_use]
    pub fn with_scroll_events(mut self, enabled: bool) -> Self {
        self.scroll_events = enabled;
        self
    }

    fn log(line: String) {
        web_sys::console::log_1(&JsValue::from_str(&line));
    }
}

impl TraceSink for ConsoleSink {
    fn on_reveal_attach(&mut self, e: &RevealAttachEvent) {
        Self::log(format!(
            "[reveal:attach] target={} threshold={} watching={}",
            e.target, e.threshold, e.watching,
        ));
    }

    fn on_intersection(&mut self, e: &IntersectionEvent) {
        Self::log(format!(
            "[intersection] target={} ratio={:.3} intersecting={} accepted={}",
            e.target, e.ratio, e.is_intersecting, e.accepted,
        ));
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        Self::log(format!("[reveal] target={} cause={:?}", e.target, e.cause));
    }

    fn on_reveal_detach(&mut self, e: &RevealDetachEvent) {
        Self::log(format!(
            "[reveal:detach] target={} visible={}",
            e.target, e.visible,
        ));
    }

    fn on_scroll(&mut self, e: &ScrollEvent) {
        if self.scroll_events {
            Self::log(format!("[scroll] coalesced={}", e.coalesced));
        }
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        Self::log(format!(
            "[frame] index={} scroll={:.1} layers={}",
            e.frame_index, e.scroll_offset, e.layers,
        ));
    }

    fn on_parallax_state(&mut self, e: &ParallaxStateEvent) {
        Self::log(format!(
            "[parallax] state={:?} layers={}",
            e.state, e.layers,
        ));
    }
}
