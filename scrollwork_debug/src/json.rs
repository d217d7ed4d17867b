// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter.
//!
//! [`export`] writes the events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) as a JSON array. Every
//! object carries a `seq` (position in the recording) and a `kind` (see
//! [`RecordedEvent::kind`]); the remaining keys are the event's fields.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events
        .iter()
        .enumerate()
        .map(|(seq, e)| to_value(seq, e))
        .collect();
    serde_json::to_writer_pretty(writer, &values)?;
    Ok(())
}

/// Converts one event to its JSON object.
#[must_use]
pub fn to_value(seq: usize, event: &RecordedEvent) -> Value {
    let kind = event.kind();
    match event {
        RecordedEvent::RevealAttach(e) => json!({
            "seq": seq,
            "kind": kind,
            "target": e.target,
            "threshold": e.threshold,
            "watching": e.watching,
        }),
        RecordedEvent::Intersection(e) => json!({
            "seq": seq,
            "kind": kind,
            "target": e.target,
            "ratio": e.ratio,
            "is_intersecting": e.is_intersecting,
            "accepted": e.accepted,
        }),
        RecordedEvent::Reveal(e) => json!({
            "seq": seq,
            "kind": kind,
            "target": e.target,
            "cause": format!("{:?}", e.cause),
        }),
        RecordedEvent::RevealDetach(e) => json!({
            "seq": seq,
            "kind": kind,
            "target": e.target,
            "visible": e.visible,
        }),
        RecordedEvent::Scroll(e) => json!({
            "seq": seq,
            "kind": kind,
            "coalesced": e.coalesced,
        }),
        RecordedEvent::Frame(e) => json!({
            "seq": seq,
            "kind": kind,
            "frame_index": e.frame_index,
            "scroll_offset": e.scroll_offset,
            "layers": e.layers,
        }),
        RecordedEvent::ParallaxState(e) => json!({
            "seq": seq,
            "kind": kind,
            "state": format!("{:?}", e.state),
            "layers": e.layers,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use scrollwork_core::trace::{
        FrameEvent, ParallaxState, ParallaxStateEvent, RevealCause, RevealEvent, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_parallax_state(&ParallaxStateEvent {
            state: ParallaxState::Enabled,
            layers: 2,
        });
        rec.on_frame(&FrameEvent {
            frame_index: 0,
            scroll_offset: 340.0,
            layers: 2,
        });
        rec.on_reveal(&RevealEvent {
            target: 7,
            cause: RevealCause::Intersection,
        });

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["kind"], "parallax_state");
        assert_eq!(parsed[0]["state"], "Enabled");

        assert_eq!(parsed[1]["seq"], 1);
        assert_eq!(parsed[1]["scroll_offset"], 340.0);

        assert_eq!(parsed[2]["kind"], "reveal");
        assert_eq!(parsed[2]["cause"], "Intersection");
        assert_eq!(parsed[2]["target"], 7);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
