// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use scrollwork_core::trace::{
    FrameEvent, IntersectionEvent, ParallaxStateEvent, RevealAttachEvent, RevealDetachEvent,
    RevealEvent, ScrollEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_reveal_attach(&mut self, e: &RevealAttachEvent) {
        let _ = writeln!(
            self.writer,
            "[reveal:attach] target={} threshold={} watching={}",
            e.target, e.threshold, e.watching,
        );
    }

    fn on_intersection(&mut self, e: &IntersectionEvent) {
        let _ = writeln!(
            self.writer,
            "[intersection] target={} ratio={:.3} intersecting={} accepted={}",
            e.target, e.ratio, e.is_intersecting, e.accepted,
        );
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        let _ = writeln!(
            self.writer,
            "[reveal] target={} cause={:?}",
            e.target, e.cause,
        );
    }

    fn on_reveal_detach(&mut self, e: &RevealDetachEvent) {
        let _ = writeln!(
            self.writer,
            "[reveal:detach] target={} visible={}",
            e.target, e.visible,
        );
    }

    fn on_scroll(&mut self, e: &ScrollEvent) {
        let _ = writeln!(self.writer, "[scroll] coalesced={}", e.coalesced);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] index={} scroll={:.1} layers={}",
            e.frame_index, e.scroll_offset, e.layers,
        );
    }

    fn on_parallax_state(&mut self, e: &ParallaxStateEvent) {
        let _ = writeln!(
            self.writer,
            "[parallax] state={:?} layers={}",
            e.state, e.layers,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollwork_core::trace::{ParallaxState, RevealCause};

    #[test]
    fn pretty_print_reveal() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_reveal(&RevealEvent {
            target: 4,
            cause: RevealCause::ReducedMotion,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[reveal] target=4 cause=ReducedMotion\n");
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_scroll(&ScrollEvent { coalesced: true });
        sink.on_frame(&FrameEvent {
            frame_index: 2,
            scroll_offset: 120.0,
            layers: 3,
        });
        sink.on_parallax_state(&ParallaxStateEvent {
            state: ParallaxState::Suspended,
            layers: 3,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "[scroll] coalesced=true",
                "[frame] index=2 scroll=120.0 layers=3",
                "[parallax] state=Suspended layers=3",
            ]
        );
    }
}
