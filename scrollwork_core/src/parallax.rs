// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallax layers driven by scroll position.
//!
//! A [`ParallaxController`] keeps a [`LayerRegistry`] of elements and their
//! speed factors, and keeps each element's vertical offset at
//! `scroll_offset × speed_factor`.
//!
//! # Update loop
//!
//! ```text
//!   scroll ──► scroll ──► scroll          (passive listener)
//!     │          │          │
//!     └──► request_frame ◄──┘              (only if none pending)
//!                │
//!                ▼
//!   read scroll_offset once ──► set_layer_offset() for every layer
//! ```
//!
//! Any number of scroll notifications between two display frames collapse
//! into a single pass. Each pass recomputes from the absolute scroll
//! position, so a skipped frame only delays the visual update.
//!
//! # Reduced motion
//!
//! While the host reports reduced motion the controller is *suspended*: the
//! scroll listener and any pending frame are released, and (by default)
//! every layer is reset to its neutral position. When the preference flips
//! back, the controller resubscribes and resynchronizes.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Vec2;

use crate::host::{Host, Subscription};
use crate::motion::MotionPreference;
use crate::trace::{FrameEvent, ParallaxState, ParallaxStateEvent, ScrollEvent, Tracer};

/// Controller configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParallaxConfig {
    /// Start enabled. A disabled controller accepts registrations but
    /// attaches no listeners until [`ParallaxController::enable`].
    pub enabled: bool,
    /// Reset every layer to its neutral position when reduced motion turns
    /// on mid-session. When `false`, layers freeze where they are.
    pub reset_on_reduced_motion: bool,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reset_on_reduced_motion: true,
        }
    }
}

/// One registered layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxLayer<E> {
    /// The element to offset.
    pub element: E,
    /// Multiplier applied to the scroll offset. Unconstrained: values in
    /// `(0, 1)` trail the scroll, negative values move against it, `1.0`
    /// tracks it exactly.
    pub speed_factor: f64,
}

impl<E> ParallaxLayer<E> {
    /// Offset of this layer at `scroll_offset`.
    #[inline]
    #[must_use]
    pub fn offset_at(&self, scroll_offset: f64) -> Vec2 {
        Vec2::new(0.0, scroll_offset * self.speed_factor)
    }
}

/// Insertion-ordered set of layers keyed by element identity.
#[derive(Clone, Debug)]
pub struct LayerRegistry<E> {
    layers: Vec<ParallaxLayer<E>>,
}

impl<E> Default for LayerRegistry<E> {
    fn default() -> Self {
        Self { layers: Vec::new() }
    }
}

impl<E: Clone + PartialEq> LayerRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer. Returns `false` (and keeps the existing speed) if
    /// `element` is already registered.
    pub fn register(&mut self, element: E, speed_factor: f64) -> bool {
        if self.contains(&element) {
            return false;
        }
        self.layers.push(ParallaxLayer {
            element,
            speed_factor,
        });
        true
    }

    /// Removes the layer for `element`, returning it if present.
    pub fn unregister(&mut self, element: &E) -> Option<ParallaxLayer<E>> {
        let pos = self.layers.iter().position(|l| l.element == *element)?;
        Some(self.layers.remove(pos))
    }

    /// Returns `true` if `element` is registered.
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.layers.iter().any(|l| l.element == *element)
    }

    /// Returns the speed factor registered for `element`.
    #[must_use]
    pub fn speed_of(&self, element: &E) -> Option<f64> {
        self.layers
            .iter()
            .find(|l| l.element == *element)
            .map(|l| l.speed_factor)
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterates layers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParallaxLayer<E>> {
        self.layers.iter()
    }

    /// Copies the current layers so an update pass can run while the
    /// registry is mutated.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ParallaxLayer<E>> {
        self.layers.clone()
    }

    /// Removes every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

/// Keeps registered layers offset in proportion to the scroll position.
///
/// The controller must be torn down when its owning view unmounts, either
/// with [`teardown`](Self::teardown) or by dropping it.
pub struct ParallaxController<H: Host> {
    shared: Rc<Shared<H>>,
}

struct Shared<H: Host> {
    host: Rc<H>,
    config: ParallaxConfig,
    /// Sampled once at construction; never re-checked.
    supported: bool,
    layers: RefCell<LayerRegistry<H::Element>>,

    enabled: Cell<bool>,
    suspended: Cell<bool>,
    torn_down: Cell<bool>,
    /// Transforms have been written since the last reset.
    touched: Cell<bool>,

    /// Ticket of the one outstanding frame request, if any.
    pending: Cell<Option<u64>>,
    next_ticket: Cell<u64>,
    frames_applied: Cell<u64>,

    scroll_sub: RefCell<Option<Subscription>>,
    motion_sub: RefCell<Option<Subscription>>,
    frame_sub: RefCell<Option<Subscription>>,

    tracer: Tracer,
}

impl<H: Host> fmt::Debug for ParallaxController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.shared;
        f.debug_struct("ParallaxController")
            .field("config", &s.config)
            .field("supported", &s.supported)
            .field("enabled", &s.enabled.get())
            .field("suspended", &s.suspended.get())
            .field("torn_down", &s.torn_down.get())
            .field("layers", &s.layers.borrow().len())
            .field("pending", &s.pending.get().is_some())
            .finish_non_exhaustive()
    }
}

impl<H: Host> ParallaxController<H> {
    /// Creates a controller on `host`, enabling it if `config.enabled`.
    #[must_use]
    pub fn new(host: Rc<H>, config: ParallaxConfig) -> Self {
        Self::with_tracer(host, config, Tracer::none())
    }

    /// Like [`new`](Self::new), routing trace events to `tracer`.
    #[must_use]
    pub fn with_tracer(host: Rc<H>, config: ParallaxConfig, tracer: Tracer) -> Self {
        let supported = host.capabilities().can_drive_layers();
        let controller = Self {
            shared: Rc::new(Shared {
                host,
                config,
                supported,
                layers: RefCell::new(LayerRegistry::new()),
                enabled: Cell::new(false),
                suspended: Cell::new(false),
                torn_down: Cell::new(false),
                touched: Cell::new(false),
                pending: Cell::new(None),
                next_ticket: Cell::new(0),
                frames_applied: Cell::new(0),
                scroll_sub: RefCell::new(None),
                motion_sub: RefCell::new(None),
                frame_sub: RefCell::new(None),
                tracer,
            }),
        };
        if config.enabled {
            controller.enable();
        }
        controller
    }

    /// Attaches the scroll and motion-preference listeners.
    ///
    /// No-op if already enabled, torn down, or if the host had no viewport
    /// (or no frame primitive) when the controller was created.
    pub fn enable(&self) {
        let s = &self.shared;
        if s.torn_down.get() || s.enabled.get() {
            return;
        }
        if !s.supported {
            s.trace_state(ParallaxState::Unsupported);
            return;
        }
        s.enabled.set(true);

        let weak = Rc::downgrade(s);
        let motion = s
            .host
            .on_motion_preference_change(Box::new(move |pref: MotionPreference| {
                if let Some(s) = weak.upgrade() {
                    Shared::on_motion_change(&s, pref);
                }
            }));
        *s.motion_sub.borrow_mut() = motion;
        s.trace_state(ParallaxState::Enabled);

        if s.host.motion_preference().is_reduced() {
            s.suspended.set(true);
            s.trace_state(ParallaxState::Suspended);
        } else {
            Shared::resume(s);
        }
    }

    /// Releases all listeners and any pending frame. Registered layers are
    /// kept and their transforms are left as they are.
    pub fn disable(&self) {
        let s = &self.shared;
        if !s.enabled.replace(false) {
            return;
        }
        s.suspended.set(false);
        s.release_subscriptions();
        s.trace_state(ParallaxState::Disabled);
    }

    /// Permanently stops the controller: releases every listener, cancels
    /// any pending frame, and forgets all layers.
    ///
    /// Idempotent, and safe if the controller was never enabled.
    pub fn teardown(&self) {
        let s = &self.shared;
        if s.torn_down.replace(true) {
            return;
        }
        s.enabled.set(false);
        s.suspended.set(false);
        s.release_subscriptions();
        s.trace_state(ParallaxState::TornDown);
        s.layers.borrow_mut().clear();
    }

    /// Registers `element` with `speed_factor`.
    ///
    /// Returns `false` if the element is already registered or the
    /// controller has been torn down. Registration is accepted while
    /// disabled; the layer starts moving once the controller is enabled.
    pub fn register_layer(&self, element: H::Element, speed_factor: f64) -> bool {
        let s = &self.shared;
        if s.torn_down.get() {
            return false;
        }
        let inserted = s.layers.borrow_mut().register(element, speed_factor);
        if inserted && s.is_active() {
            Shared::request_tick(s);
        }
        inserted
    }

    /// Removes `element`, restoring its neutral transform if one was
    /// applied. Returns `false` if it was not registered.
    pub fn unregister_layer(&self, element: &H::Element) -> bool {
        let s = &self.shared;
        let removed = s.layers.borrow_mut().unregister(element);
        let Some(layer) = removed else {
            return false;
        };
        if s.touched.get() {
            s.host.clear_layer_offset(&layer.element);
        }
        true
    }

    /// Returns `true` while listeners are attached.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.get()
    }

    /// Returns `false` if the host could not drive layers at construction.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.shared.supported
    }

    /// Returns `true` while reduced motion holds updates off.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.shared.suspended.get()
    }

    /// Returns `true` after [`teardown`](Self::teardown).
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.shared.torn_down.get()
    }

    /// Returns `true` while a frame update is scheduled.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.shared.pending.get().is_some()
    }

    /// Number of registered layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.shared.layers.borrow().len()
    }

    /// Returns `true` if `element` is registered.
    #[must_use]
    pub fn contains_layer(&self, element: &H::Element) -> bool {
        self.shared.layers.borrow().contains(element)
    }

    /// Number of update passes applied so far.
    #[must_use]
    pub fn frames_applied(&self) -> u64 {
        self.shared.frames_applied.get()
    }
}

impl<H: Host> Drop for ParallaxController<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<H: Host> Shared<H> {
    fn is_active(&self) -> bool {
        self.enabled.get() && !self.suspended.get() && !self.torn_down.get()
    }

    fn trace_state(&self, state: ParallaxState) {
        self.tracer.parallax_state(&ParallaxStateEvent {
            state,
            layers: self.layers.borrow().len(),
        });
    }

    fn resume(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        let scroll = this.host.on_scroll(Box::new(move || {
            if let Some(s) = weak.upgrade() {
                Self::on_scroll(&s);
            }
        }));
        *this.scroll_sub.borrow_mut() = scroll;

        if !this.layers.borrow().is_empty() {
            Self::request_tick(this);
        }
    }

    fn on_scroll(this: &Rc<Self>) {
        if !this.is_active() {
            return;
        }
        this.tracer.scroll(&ScrollEvent {
            coalesced: this.pending.get().is_some(),
        });
        Self::request_tick(this);
    }

    /// Schedules one update pass unless one is already pending.
    fn request_tick(this: &Rc<Self>) {
        if this.pending.get().is_some() || !this.is_active() {
            return;
        }
        let ticket = this.next_ticket.get();
        this.next_ticket.set(ticket + 1);
        this.pending.set(Some(ticket));

        let weak = Rc::downgrade(this);
        let frame = this.host.request_frame(Box::new(move || {
            if let Some(s) = weak.upgrade() {
                s.run_frame(ticket);
            }
        }));

        match frame {
            // Still waiting for the frame; keep the handle for cancellation.
            Some(frame) if this.pending.get() == Some(ticket) => {
                *this.frame_sub.borrow_mut() = Some(frame);
            }
            // The host ran the frame synchronously.
            Some(_) => {}
            None => this.pending.set(None),
        }
    }

    fn run_frame(&self, ticket: u64) {
        if self.pending.get() != Some(ticket) {
            return;
        }
        let finished = self.frame_sub.borrow_mut().take();
        if !self.is_active() {
            self.pending.set(None);
            drop(finished);
            return;
        }

        // Cleared before writing so a layer registered mid-pass schedules
        // its own follow-up frame.
        self.pending.set(None);

        let scroll_offset = self.host.scroll_offset();
        let layers = self.layers.borrow().snapshot();
        let mut updated = 0;
        for layer in &layers {
            // Skip layers unregistered by an earlier write in this pass.
            if !self.layers.borrow().contains(&layer.element) {
                continue;
            }
            self.touched.set(true);
            self.host
                .set_layer_offset(&layer.element, layer.offset_at(scroll_offset));
            updated += 1;
        }

        let frame_index = self.frames_applied.get();
        self.frames_applied.set(frame_index + 1);
        self.tracer.frame(&FrameEvent {
            frame_index,
            scroll_offset,
            layers: updated,
        });
        drop(finished);
    }

    fn on_motion_change(this: &Rc<Self>, pref: MotionPreference) {
        if this.torn_down.get() || !this.enabled.get() {
            return;
        }
        if pref.is_reduced() {
            if this.suspended.replace(true) {
                return;
            }
            this.pending.set(None);
            let frame = this.frame_sub.borrow_mut().take();
            drop(frame);
            let scroll = this.scroll_sub.borrow_mut().take();
            drop(scroll);
            if this.config.reset_on_reduced_motion {
                this.reset_layers();
            }
            this.trace_state(ParallaxState::Suspended);
        } else {
            if !this.suspended.replace(false) {
                return;
            }
            this.trace_state(ParallaxState::Resumed);
            Self::resume(this);
        }
    }

    fn reset_layers(&self) {
        if !self.touched.replace(false) {
            return;
        }
        let layers = self.layers.borrow().snapshot();
        for layer in &layers {
            self.host.clear_layer_offset(&layer.element);
        }
    }

    fn release_subscriptions(&self) {
        self.pending.set(None);
        let frame = self.frame_sub.borrow_mut().take();
        let scroll = self.scroll_sub.borrow_mut().take();
        let motion = self.motion_sub.borrow_mut().take();
        drop((frame, scroll, motion));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Capabilities;
    use crate::testing::{FakeElement, FakeHost};

    const A: FakeElement = FakeElement(1);
    const B: FakeElement = FakeElement(2);

    fn controller(host: &Rc<FakeHost>) -> ParallaxController<FakeHost> {
        ParallaxController::new(Rc::clone(host), ParallaxConfig::default())
    }

    fn y(host: &FakeHost, el: FakeElement) -> Option<f64> {
        host.offset_of(el).map(|v| v.y)
    }

    #[test]
    fn offset_is_speed_times_scroll() {
        let layer = ParallaxLayer {
            element: A,
            speed_factor: 0.4,
        };
        assert_eq!(layer.offset_at(250.0), Vec2::new(0.0, 100.0));
        let layer = ParallaxLayer {
            element: B,
            speed_factor: -0.2,
        };
        assert_eq!(layer.offset_at(500.0), Vec2::new(0.0, -100.0));
    }

    #[test]
    fn offsets_applied_on_frame() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        ctl.register_layer(A, 0.4);
        ctl.register_layer(B, -0.2);
        host.run_frame();

        host.scroll_to(250.0);
        host.run_frame();
        assert_eq!(y(&host, A), Some(100.0));

        host.scroll_to(500.0);
        host.run_frame();
        assert_eq!(y(&host, B), Some(-100.0));
        assert_eq!(y(&host, A), Some(200.0));
    }

    #[test]
    fn registry_deduplicates_by_identity() {
        let mut reg = LayerRegistry::new();
        assert!(reg.register(A, 0.5));
        assert!(!reg.register(A, 0.9));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.speed_of(&A), Some(0.5));
        assert!(reg.unregister(&B).is_none());
        assert!(reg.unregister(&A).is_some());
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_registration_is_a_no_op() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        assert!(ctl.register_layer(A, 0.3));
        assert!(!ctl.register_layer(A, 0.7));
        assert_eq!(ctl.layer_count(), 1);
        assert!(!ctl.unregister_layer(&B));
        assert!(ctl.unregister_layer(&A));
        assert!(!ctl.unregister_layer(&A));
        assert_eq!(ctl.layer_count(), 0);
    }

    #[test]
    fn scroll_bursts_coalesce_into_one_pass() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        ctl.register_layer(A, 0.5);
        ctl.register_layer(B, 1.0);
        assert_eq!(host.frame_requests(), 1);
        host.run_frame();
        let writes_before = host.transform_writes();

        for step in 1..=20 {
            host.scroll_to(f64::from(step) * 10.0);
        }
        assert_eq!(host.frame_requests(), 2);
        assert_eq!(host.pending_frames(), 1);
        assert!(ctl.has_pending_frame());

        assert_eq!(host.run_frame(), 1);
        assert_eq!(host.transform_writes() - writes_before, 2);
        // Uses the position current at the frame, not any intermediate one.
        assert_eq!(y(&host, A), Some(100.0));
        assert_eq!(y(&host, B), Some(200.0));
        assert!(!ctl.has_pending_frame());
    }

    #[test]
    fn reduced_motion_at_enable_never_moves_layers() {
        let host = Rc::new(FakeHost::new());
        host.set_reduced_motion(true);
        let ctl = controller(&host);
        ctl.register_layer(A, 0.5);
        assert!(ctl.is_suspended());
        assert_eq!(host.active_scroll_listeners(), 0);

        host.scroll_to(300.0);
        host.run_frame();
        assert_eq!(host.transform_writes(), 0);
        assert_eq!(host.frame_requests(), 0);
    }

    #[test]
    fn missing_viewport_makes_enable_inert() {
        let host = Rc::new(FakeHost::with_capabilities(Capabilities::NONE));
        let ctl = controller(&host);
        ctl.enable();
        assert!(!ctl.is_supported());
        assert!(!ctl.is_enabled());
        assert_eq!(host.live_subscriptions(), 0);
        assert!(ctl.register_layer(A, 0.5));
        host.scroll_to(100.0);
        assert_eq!(host.transform_writes(), 0);
    }

    #[test]
    fn support_is_sampled_once() {
        let host = Rc::new(FakeHost::with_capabilities(Capabilities::NONE));
        let ctl = ParallaxController::new(
            Rc::clone(&host),
            ParallaxConfig {
                enabled: false,
                ..ParallaxConfig::default()
            },
        );
        host.set_capabilities(Capabilities::ALL);
        ctl.enable();
        assert!(!ctl.is_enabled());
        assert_eq!(host.live_subscriptions(), 0);
    }

    #[test]
    fn disabled_controller_accepts_layers_but_attaches_nothing() {
        let host = Rc::new(FakeHost::new());
        host.scroll_to(100.0);
        let ctl = ParallaxController::new(
            Rc::clone(&host),
            ParallaxConfig {
                enabled: false,
                ..ParallaxConfig::default()
            },
        );
        assert!(ctl.register_layer(A, 0.5));
        assert_eq!(host.live_subscriptions(), 0);
        assert_eq!(host.frame_requests(), 0);

        ctl.enable();
        assert_eq!(host.active_scroll_listeners(), 1);
        assert_eq!(host.active_motion_listeners(), 1);
        host.run_frame();
        assert_eq!(y(&host, A), Some(50.0));
    }

    #[test]
    fn disable_keeps_registry_and_releases_listeners() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        ctl.register_layer(A, 0.5);
        ctl.disable();
        assert!(!ctl.is_enabled());
        assert_eq!(host.live_subscriptions(), 0);
        assert_eq!(ctl.layer_count(), 1);

        ctl.enable();
        assert!(ctl.is_enabled());
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn teardown_neutralizes_retained_callbacks() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        ctl.register_layer(A, 0.5);
        host.run_frame();
        host.scroll_to(200.0);
        assert_eq!(host.pending_frames(), 1);
        let writes = host.transform_writes();

        ctl.teardown();
        assert_eq!(host.live_subscriptions(), 0);
        assert_eq!(host.pending_frames(), 0);
        assert!(!ctl.has_pending_frame());

        host.replay_scroll();
        host.replay_cancelled_frames();
        host.run_frame();
        assert_eq!(host.transform_writes(), writes);

        // Idempotent, and registration is refused afterwards.
        ctl.teardown();
        assert!(!ctl.register_layer(B, 1.0));
        assert_eq!(ctl.layer_count(), 0);
    }

    #[test]
    fn teardown_without_enable_is_safe() {
        let host = Rc::new(FakeHost::new());
        let ctl = ParallaxController::new(
            Rc::clone(&host),
            ParallaxConfig {
                enabled: false,
                ..ParallaxConfig::default()
            },
        );
        ctl.teardown();
        assert!(ctl.is_torn_down());
        ctl.enable();
        assert!(!ctl.is_enabled());
    }

    #[test]
    fn drop_releases_everything() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        ctl.register_layer(A, 0.5);
        host.scroll_to(10.0);
        drop(ctl);
        assert_eq!(host.live_subscriptions(), 0);
        host.replay_cancelled_frames();
        assert_eq!(host.transform_writes(), 0);
    }

    #[test]
    fn live_reduced_motion_resets_then_resumes() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        ctl.register_layer(A, 0.5);
        host.scroll_to(100.0);
        host.run_frame();
        assert_eq!(y(&host, A), Some(50.0));

        host.scroll_to(200.0);
        assert_eq!(host.pending_frames(), 1);
        host.set_reduced_motion(true);
        assert!(ctl.is_suspended());
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.active_scroll_listeners(), 0);
        assert_eq!(y(&host, A), None);

        let writes = host.transform_writes();
        host.replay_scroll();
        host.replay_cancelled_frames();
        assert_eq!(host.transform_writes(), writes);

        host.set_reduced_motion(false);
        assert!(!ctl.is_suspended());
        assert_eq!(host.active_scroll_listeners(), 1);
        host.run_frame();
        assert_eq!(y(&host, A), Some(100.0));
    }

    #[test]
    fn freeze_instead_of_reset_when_configured() {
        let host = Rc::new(FakeHost::new());
        let ctl = ParallaxController::new(
            Rc::clone(&host),
            ParallaxConfig {
                reset_on_reduced_motion: false,
                ..ParallaxConfig::default()
            },
        );
        ctl.register_layer(A, 0.5);
        host.scroll_to(100.0);
        host.run_frame();
        host.set_reduced_motion(true);
        assert_eq!(y(&host, A), Some(50.0));
    }

    #[test]
    fn unregister_restores_neutral_transform() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        ctl.register_layer(A, 0.5);
        host.scroll_to(100.0);
        host.run_frame();
        assert!(host.offset_of(A).is_some());
        ctl.unregister_layer(&A);
        assert_eq!(host.offset_of(A), None);
    }

    #[test]
    fn registry_mutation_during_pass_is_safe() {
        let host = Rc::new(FakeHost::new());
        let ctl = Rc::new(controller(&host));
        ctl.register_layer(A, 0.5);
        ctl.register_layer(B, 1.0);
        host.run_frame();

        let weak = Rc::downgrade(&ctl);
        host.set_write_hook(move |el| {
            if el == A
                && let Some(ctl) = weak.upgrade()
            {
                ctl.unregister_layer(&B);
                ctl.register_layer(FakeElement(3), 2.0);
            }
        });
        host.scroll_to(100.0);
        host.run_frame();

        // The pass ran over its snapshot; the registry reflects the edits.
        assert!(!ctl.contains_layer(&B));
        assert!(ctl.contains_layer(&FakeElement(3)));
        assert_eq!(ctl.layer_count(), 2);
        assert_eq!(ctl.frames_applied(), 2);
        host.run_frame();
        assert_eq!(y(&host, FakeElement(3)), Some(200.0));
    }

    #[test]
    fn passes_recompute_from_absolute_position() {
        let host = Rc::new(FakeHost::new());
        let ctl = controller(&host);
        ctl.register_layer(A, 0.25);
        host.scroll_to(400.0);
        host.scroll_to(40.0);
        host.run_frame();
        assert_eq!(y(&host, A), Some(10.0));
        host.scroll_to(0.0);
        host.run_frame();
        assert_eq!(y(&host, A), Some(0.0));
        assert_eq!(ctl.frames_applied(), 2);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_marks_coalesced_scrolls() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Scrolls {
            coalesced: usize,
            fresh: usize,
            frames: usize,
        }
        impl TraceSink for Scrolls {
            fn on_scroll(&mut self, e: &ScrollEvent) {
                if e.coalesced {
                    self.coalesced += 1;
                } else {
                    self.fresh += 1;
                }
            }
            fn on_frame(&mut self, _: &FrameEvent) {
                self.frames += 1;
            }
        }

        let sink = Rc::new(RefCell::new(Scrolls::default()));
        let host = Rc::new(FakeHost::new());
        let ctl = ParallaxController::with_tracer(
            Rc::clone(&host),
            ParallaxConfig::default(),
            Tracer::new(sink.clone()),
        );
        ctl.register_layer(A, 0.5);
        host.run_frame();
        host.scroll_to(1.0);
        host.scroll_to(2.0);
        host.scroll_to(3.0);
        host.run_frame();
        let s = sink.borrow();
        assert_eq!(s.fresh, 1);
        assert_eq!(s.coalesced, 2);
        assert_eq!(s.frames, 2);
    }
}
