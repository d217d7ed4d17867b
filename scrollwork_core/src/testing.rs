// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted host for tests.
//!
//! [`FakeHost`] implements [`Host`] entirely in memory. Nothing happens on
//! its own: tests scroll, pump frames, flip the motion preference, and
//! report intersections explicitly, then inspect the live-subscription
//! counters and the transforms that were written.
//!
//! Cancelled callbacks are retained rather than dropped so a test can replay
//! them ([`replay_scroll`](FakeHost::replay_scroll),
//! [`replay_cancelled_frames`](FakeHost::replay_cancelled_frames),
//! [`replay_intersection`](FakeHost::replay_intersection)), simulating a
//! notification that was already queued when the subscription went away.
//!
//! Only compiled for tests or with the `testing` feature.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::mem;

use kurbo::{Rect, Vec2};

use crate::host::{
    Capabilities, FrameCallback, Host, IntersectionCallback, IntersectionEntry, MotionCallback,
    ObserveOptions, ScrollCallback, Subscription,
};
use crate::intersect;
use crate::motion::MotionPreference;

/// An element of the fake host, identified by number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FakeElement(pub u32);

struct Slot<T: ?Sized> {
    id: u64,
    active: bool,
    callback: Rc<RefCell<Box<T>>>,
}

struct Observer {
    slot: Slot<dyn FnMut(IntersectionEntry)>,
    element: FakeElement,
    options: ObserveOptions,
}

#[derive(Default)]
struct State {
    caps: Cell<Capabilities>,
    scroll: Cell<f64>,
    reduced: Cell<bool>,
    next_id: Cell<u64>,

    observers: RefCell<Vec<Observer>>,
    scroll_listeners: RefCell<Vec<Slot<dyn FnMut()>>>,
    motion_listeners: RefCell<Vec<Slot<dyn FnMut(MotionPreference)>>>,
    frames: RefCell<Vec<(u64, FrameCallback)>>,
    cancelled_frames: RefCell<Vec<FrameCallback>>,
    frame_requests: Cell<usize>,

    offsets: RefCell<Vec<(FakeElement, Vec2)>>,
    writes: Cell<usize>,
    write_hook: RefCell<Option<Rc<RefCell<Box<dyn FnMut(FakeElement)>>>>>,
}

impl State {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

/// An in-memory [`Host`] driven by the test.
pub struct FakeHost {
    state: Rc<State>,
}

impl fmt::Debug for FakeHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeHost")
            .field("caps", &self.state.caps.get())
            .field("scroll", &self.state.scroll.get())
            .field("reduced", &self.state.reduced.get())
            .field("live_subscriptions", &self.live_subscriptions())
            .finish_non_exhaustive()
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// Creates a host with every capability.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::ALL)
    }

    /// Creates a host with the given capabilities.
    #[must_use]
    pub fn with_capabilities(caps: Capabilities) -> Self {
        let state = State::default();
        state.caps.set(caps);
        Self {
            state: Rc::new(state),
        }
    }

    /// Changes the reported capabilities.
    pub fn set_capabilities(&self, caps: Capabilities) {
        self.state.caps.set(caps);
    }

    // -- Driving --

    /// Sets the scroll position and notifies active scroll listeners.
    pub fn scroll_to(&self, offset: f64) {
        self.state.scroll.set(offset);
        let listeners = active_callbacks(&self.state.scroll_listeners.borrow());
        for listener in listeners {
            (*listener.borrow_mut())();
        }
    }

    /// Invokes every scroll listener ever registered, including cancelled
    /// ones.
    pub fn replay_scroll(&self) {
        let listeners: Vec<_> = self
            .state
            .scroll_listeners
            .borrow()
            .iter()
            .map(|s| Rc::clone(&s.callback))
            .collect();
        for listener in listeners {
            (*listener.borrow_mut())();
        }
    }

    /// Runs every frame callback requested so far. Callbacks requested while
    /// running wait for the next call. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let frames = mem::take(&mut *self.state.frames.borrow_mut());
        let count = frames.len();
        for (_, callback) in frames {
            callback();
        }
        count
    }

    /// Runs frame callbacks whose requests were cancelled. Returns how many
    /// ran.
    pub fn replay_cancelled_frames(&self) -> usize {
        let frames = mem::take(&mut *self.state.cancelled_frames.borrow_mut());
        let count = frames.len();
        for callback in frames {
            callback();
        }
        count
    }

    /// Sets the motion preference, notifying listeners if it changed.
    pub fn set_reduced_motion(&self, reduced: bool) {
        if self.state.reduced.replace(reduced) == reduced {
            return;
        }
        let pref = MotionPreference::from_reduced(reduced);
        let listeners = active_callbacks(&self.state.motion_listeners.borrow());
        for listener in listeners {
            (*listener.borrow_mut())(pref);
        }
    }

    /// Delivers `entry` to every active observer of `element`. Returns how
    /// many observers received it.
    pub fn report_intersection(&self, element: FakeElement, entry: IntersectionEntry) -> usize {
        let callbacks: Vec<_> = self
            .state
            .observers
            .borrow()
            .iter()
            .filter(|o| o.slot.active && o.element == element)
            .map(|o| Rc::clone(&o.slot.callback))
            .collect();
        let count = callbacks.len();
        for callback in callbacks {
            (*callback.borrow_mut())(entry);
        }
        count
    }

    /// Shorthand for [`report_intersection`](Self::report_intersection) with
    /// [`IntersectionEntry::from_ratio`].
    pub fn report_ratio(&self, element: FakeElement, ratio: f64) -> usize {
        self.report_intersection(element, IntersectionEntry::from_ratio(ratio))
    }

    /// Computes each active observer's entry for `element` from geometry,
    /// applying that observer's root margin to `viewport`.
    pub fn report_geometry(&self, element: FakeElement, target: Rect, viewport: Rect) -> usize {
        let deliveries: Vec<_> = self
            .state
            .observers
            .borrow()
            .iter()
            .filter(|o| o.slot.active && o.element == element)
            .map(|o| {
                let root = o.options.root_margin.expand(viewport);
                (Rc::clone(&o.slot.callback), intersect::entry_for(target, root))
            })
            .collect();
        let count = deliveries.len();
        for (callback, entry) in deliveries {
            (*callback.borrow_mut())(entry);
        }
        count
    }

    /// Delivers `entry` to every observer of `element` ever registered,
    /// including cancelled ones.
    pub fn replay_intersection(&self, element: FakeElement, entry: IntersectionEntry) {
        let callbacks: Vec<_> = self
            .state
            .observers
            .borrow()
            .iter()
            .filter(|o| o.element == element)
            .map(|o| Rc::clone(&o.slot.callback))
            .collect();
        for callback in callbacks {
            (*callback.borrow_mut())(entry);
        }
    }

    /// Installs a hook run after every transform write.
    pub fn set_write_hook(&self, hook: impl FnMut(FakeElement) + 'static) {
        let hook: Box<dyn FnMut(FakeElement)> = Box::new(hook);
        *self.state.write_hook.borrow_mut() = Some(Rc::new(RefCell::new(hook)));
    }

    // -- Inspection --

    /// Active intersection observers.
    #[must_use]
    pub fn active_observers(&self) -> usize {
        self.state
            .observers
            .borrow()
            .iter()
            .filter(|o| o.slot.active)
            .count()
    }

    /// Observe options of the most recent active observer of `element`.
    #[must_use]
    pub fn observe_options(&self, element: FakeElement) -> Option<ObserveOptions> {
        self.state
            .observers
            .borrow()
            .iter()
            .rev()
            .find(|o| o.slot.active && o.element == element)
            .map(|o| o.options)
    }

    /// Active scroll listeners.
    #[must_use]
    pub fn active_scroll_listeners(&self) -> usize {
        count_active(&self.state.scroll_listeners.borrow())
    }

    /// Active motion-preference listeners.
    #[must_use]
    pub fn active_motion_listeners(&self) -> usize {
        count_active(&self.state.motion_listeners.borrow())
    }

    /// Frame callbacks waiting for [`run_frame`](Self::run_frame).
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.state.frames.borrow().len()
    }

    /// Total number of frame requests ever made.
    #[must_use]
    pub fn frame_requests(&self) -> usize {
        self.state.frame_requests.get()
    }

    /// Every subscription not yet released.
    #[must_use]
    pub fn live_subscriptions(&self) -> usize {
        self.active_observers()
            + self.active_scroll_listeners()
            + self.active_motion_listeners()
            + self.pending_frames()
    }

    /// Current offset of `element`, or `None` if untransformed.
    #[must_use]
    pub fn offset_of(&self, element: FakeElement) -> Option<Vec2> {
        self.state
            .offsets
            .borrow()
            .iter()
            .find(|(el, _)| *el == element)
            .map(|(_, offset)| *offset)
    }

    /// Number of transform writes (sets and clears) so far.
    #[must_use]
    pub fn transform_writes(&self) -> usize {
        self.state.writes.get()
    }

    fn record_write(&self, element: FakeElement, offset: Option<Vec2>) {
        {
            let mut offsets = self.state.offsets.borrow_mut();
            offsets.retain(|(el, _)| *el != element);
            if let Some(offset) = offset {
                offsets.push((element, offset));
            }
        }
        self.state.writes.set(self.state.writes.get() + 1);
        let hook = self.state.write_hook.borrow().clone();
        if let Some(hook) = hook
            && let Ok(mut hook) = hook.try_borrow_mut()
        {
            (*hook)(element);
        }
    }
}

fn active_callbacks<T: ?Sized>(slots: &[Slot<T>]) -> Vec<Rc<RefCell<Box<T>>>> {
    slots
        .iter()
        .filter(|s| s.active)
        .map(|s| Rc::clone(&s.callback))
        .collect()
}

fn count_active<T: ?Sized>(slots: &[Slot<T>]) -> usize {
    slots.iter().filter(|s| s.active).count()
}

fn deactivate<T: ?Sized>(slots: &mut [Slot<T>], id: u64) {
    if let Some(slot) = slots.iter_mut().find(|s| s.id == id) {
        slot.active = false;
    }
}

impl Host for FakeHost {
    type Element = FakeElement;

    fn capabilities(&self) -> Capabilities {
        self.state.caps.get()
    }

    fn observe_intersection(
        &self,
        target: &FakeElement,
        options: &ObserveOptions,
        callback: IntersectionCallback,
    ) -> Option<Subscription> {
        if !self.capabilities().can_observe_intersection() {
            return None;
        }
        let id = self.state.next_id();
        self.state.observers.borrow_mut().push(Observer {
            slot: Slot {
                id,
                active: true,
                callback: Rc::new(RefCell::new(callback)),
            },
            element: *target,
            options: *options,
        });
        let weak: Weak<State> = Rc::downgrade(&self.state);
        Some(Subscription::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut observers = state.observers.borrow_mut();
            if let Some(o) = observers.iter_mut().find(|o| o.slot.id == id) {
                o.slot.active = false;
            }
        }))
    }

    fn scroll_offset(&self) -> f64 {
        if self.capabilities().viewport {
            self.state.scroll.get()
        } else {
            0.0
        }
    }

    fn on_scroll(&self, listener: ScrollCallback) -> Option<Subscription> {
        if !self.capabilities().viewport {
            return None;
        }
        let id = self.state.next_id();
        self.state.scroll_listeners.borrow_mut().push(Slot {
            id,
            active: true,
            callback: Rc::new(RefCell::new(listener)),
        });
        let weak = Rc::downgrade(&self.state);
        Some(Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                deactivate(&mut state.scroll_listeners.borrow_mut(), id);
            }
        }))
    }

    fn request_frame(&self, callback: FrameCallback) -> Option<Subscription> {
        if !self.capabilities().frames {
            return None;
        }
        let id = self.state.next_id();
        self.state.frames.borrow_mut().push((id, callback));
        self.state
            .frame_requests
            .set(self.state.frame_requests.get() + 1);
        let weak = Rc::downgrade(&self.state);
        Some(Subscription::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let cancelled = {
                let mut frames = state.frames.borrow_mut();
                frames
                    .iter()
                    .position(|(fid, _)| *fid == id)
                    .map(|pos| frames.remove(pos).1)
            };
            if let Some(callback) = cancelled {
                state.cancelled_frames.borrow_mut().push(callback);
            }
        }))
    }

    fn motion_preference(&self) -> MotionPreference {
        if self.capabilities().motion_query {
            MotionPreference::from_reduced(self.state.reduced.get())
        } else {
            MotionPreference::NoPreference
        }
    }

    fn on_motion_preference_change(&self, listener: MotionCallback) -> Option<Subscription> {
        if !self.capabilities().motion_query {
            return None;
        }
        let id = self.state.next_id();
        self.state.motion_listeners.borrow_mut().push(Slot {
            id,
            active: true,
            callback: Rc::new(RefCell::new(listener)),
        });
        let weak = Rc::downgrade(&self.state);
        Some(Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                deactivate(&mut state.motion_listeners.borrow_mut(), id);
            }
        }))
    }

    fn set_layer_offset(&self, element: &FakeElement, offset: Vec2) {
        self.record_write(*element, Some(offset));
    }

    fn clear_layer_offset(&self, element: &FakeElement) {
        self.record_write(*element, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriptions_are_counted_until_released() {
        let host = FakeHost::new();
        let scroll = host.on_scroll(Box::new(|| {})).unwrap();
        let frame = host.request_frame(Box::new(|| {})).unwrap();
        assert_eq!(host.live_subscriptions(), 2);
        drop(scroll);
        frame.cancel();
        assert_eq!(host.live_subscriptions(), 0);
        assert_eq!(host.replay_cancelled_frames(), 1);
    }

    #[test]
    fn missing_capabilities_refuse_subscriptions() {
        let host = FakeHost::with_capabilities(Capabilities::NONE);
        assert!(host.on_scroll(Box::new(|| {})).is_none());
        assert!(host.request_frame(Box::new(|| {})).is_none());
        assert!(
            host.on_motion_preference_change(Box::new(|_: MotionPreference| {}))
                .is_none()
        );
        assert_eq!(host.motion_preference(), MotionPreference::NoPreference);
    }

    #[test]
    fn frames_requested_during_a_run_wait_for_the_next() {
        let host = Rc::new(FakeHost::new());
        let h = Rc::clone(&host);
        let _sub = host.request_frame(Box::new(move || {
            // Dropped immediately: cancels the nested request.
            let _ = h.request_frame(Box::new(|| {}));
        }));
        assert_eq!(host.run_frame(), 1);
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.frame_requests(), 2);
    }
}
