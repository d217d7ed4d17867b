// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal-on-scroll behavior.
//!
//! [`ScrollReveal`] decides, once per target, when an element should be
//! marked visible. Each [`RevealHandle`] is a tiny state machine:
//!
//! ```text
//!   Pending ──► Visible   (terminal, never reverts)
//! ```
//!
//! The transition fires on the first of these, checked in order at attach
//! time and then re-checked as intersection reports arrive:
//!
//! 1. The host cannot observe intersection → visible during `attach`.
//! 2. Reduced motion is requested → visible during `attach`.
//! 3. An intersection report reaches the threshold → visible when reported.
//!
//! On transition the flag is set, the intersection watch is released, and
//! the `on_visible` callback runs, all in the same synchronous turn. Any
//! report already in flight after that point is ignored.
//!
//! Consumers reflect the flag as a class toggle (e.g. `is-visible`) or an
//! equivalent style; this module never touches element styling itself.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::host::{Host, IntersectionEntry, ObserveOptions, Subscription};
use crate::margin::RootMargin;
use crate::trace::{
    IntersectionEvent, RevealAttachEvent, RevealCause, RevealDetachEvent, RevealEvent, Tracer,
};

/// Callback run once when a target becomes visible.
pub type OnVisible = Box<dyn FnOnce()>;

/// Per-target reveal configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealOptions {
    /// Minimum intersection ratio, in `[0, 1]`.
    pub threshold: f64,
    /// Adjustment applied to the viewport before testing.
    pub root_margin: RootMargin,
}

impl RevealOptions {
    /// Default threshold: a tenth of the target must be in view.
    pub const DEFAULT_THRESHOLD: f64 = 0.1;

    /// Creates options with the default threshold and root margin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            root_margin: RootMargin::REVEAL_DEFAULT,
        }
    }

    /// Sets the threshold. Values are clamped to `[0, 1]`; NaN keeps the
    /// default.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = sanitize_threshold(threshold);
        self
    }

    /// Sets the root margin.
    #[must_use]
    pub const fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }

    fn observe_options(&self) -> ObserveOptions {
        ObserveOptions {
            threshold: sanitize_threshold(self.threshold),
            root_margin: self.root_margin,
        }
    }
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        RevealOptions::DEFAULT_THRESHOLD
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

/// State of one reveal target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealState {
    /// Waiting for the target to come into view.
    Pending,
    /// The target has been revealed. Terminal.
    Visible,
}

/// Attaches reveal watches to elements of one host.
///
/// The behavior itself only carries shared configuration; all per-target
/// state lives in the returned [`RevealHandle`]s.
pub struct ScrollReveal<H: Host> {
    host: Rc<H>,
    options: RevealOptions,
    tracer: Tracer,
    next_target: Cell<u64>,
}

impl<H: Host> fmt::Debug for ScrollReveal<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollReveal")
            .field("options", &self.options)
            .field("attached", &self.next_target.get())
            .finish_non_exhaustive()
    }
}

impl<H: Host> ScrollReveal<H> {
    /// Creates a behavior that attaches targets on `host` with `options`.
    #[must_use]
    pub fn new(host: Rc<H>, options: RevealOptions) -> Self {
        Self {
            host,
            options,
            tracer: Tracer::none(),
            next_target: Cell::new(0),
        }
    }

    /// Routes trace events for every target attached from now on.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    /// Returns the default options used by [`attach`](Self::attach).
    #[must_use]
    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Returns the host this behavior attaches to.
    #[must_use]
    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// Starts watching `element` with the behavior's default options.
    pub fn attach(
        &self,
        element: H::Element,
        on_visible: Option<OnVisible>,
    ) -> RevealHandle<H::Element> {
        self.attach_with(element, self.options, on_visible)
    }

    /// Starts watching `element` with per-target `options`.
    ///
    /// Never fails: if the host cannot observe intersection, or reduced
    /// motion is requested, the returned handle is already visible and
    /// `on_visible` has already run.
    pub fn attach_with(
        &self,
        element: H::Element,
        options: RevealOptions,
        on_visible: Option<OnVisible>,
    ) -> RevealHandle<H::Element> {
        let id = self.next_target.get();
        self.next_target.set(id + 1);

        let observe = options.observe_options();
        let target = Rc::new(RevealTarget {
            id,
            element,
            threshold: observe.threshold,
            visible: Cell::new(false),
            detached: Cell::new(false),
            watch: RefCell::new(None),
            on_visible: RefCell::new(on_visible),
            tracer: self.tracer.clone(),
        });

        let watching = self.start_watch(&target, &observe);
        self.tracer.reveal_attach(&RevealAttachEvent {
            target: id,
            threshold: observe.threshold,
            watching,
        });

        RevealHandle { target }
    }

    /// Runs the attach-time checks and, when they pass, starts the watch.
    /// Returns whether a watch is now active.
    fn start_watch(&self, target: &Rc<RevealTarget<H::Element>>, observe: &ObserveOptions) -> bool {
        if !self.host.capabilities().can_observe_intersection() {
            target.reveal(RevealCause::Unsupported);
            return false;
        }
        if self.host.motion_preference().is_reduced() {
            target.reveal(RevealCause::ReducedMotion);
            return false;
        }

        let weak: Weak<RevealTarget<H::Element>> = Rc::downgrade(target);
        let subscription = self.host.observe_intersection(
            &target.element,
            observe,
            Box::new(move |entry| {
                if let Some(target) = weak.upgrade() {
                    target.on_entry(entry);
                }
            }),
        );

        let Some(subscription) = subscription else {
            target.reveal(RevealCause::Unsupported);
            return false;
        };
        // A host may report synchronously while registering.
        if target.is_settled() {
            subscription.cancel();
            return false;
        }
        *target.watch.borrow_mut() = Some(subscription);
        true
    }
}

struct RevealTarget<E> {
    id: u64,
    element: E,
    threshold: f64,
    visible: Cell<bool>,
    detached: Cell<bool>,
    watch: RefCell<Option<Subscription>>,
    on_visible: RefCell<Option<OnVisible>>,
    tracer: Tracer,
}

impl<E> RevealTarget<E> {
    fn is_settled(&self) -> bool {
        self.visible.get() || self.detached.get()
    }

    fn on_entry(&self, entry: IntersectionEntry) {
        if self.is_settled() {
            return;
        }
        let accepted = entry.reaches(self.threshold);
        self.tracer.intersection(&IntersectionEvent {
            target: self.id,
            ratio: entry.ratio,
            is_intersecting: entry.is_intersecting,
            accepted,
        });
        if accepted {
            self.reveal(RevealCause::Intersection);
        }
    }

    fn reveal(&self, cause: RevealCause) {
        if self.visible.get() {
            return;
        }
        self.visible.set(true);
        let watch = self.watch.borrow_mut().take();
        drop(watch);
        self.tracer.reveal(&RevealEvent {
            target: self.id,
            cause,
        });
        let on_visible = self.on_visible.borrow_mut().take();
        if let Some(on_visible) = on_visible {
            on_visible();
        }
    }

    fn detach(&self) {
        if self.detached.replace(true) {
            return;
        }
        let watch = self.watch.borrow_mut().take();
        drop(watch);
        let on_visible = self.on_visible.borrow_mut().take();
        drop(on_visible);
        self.tracer.reveal_detach(&RevealDetachEvent {
            target: self.id,
            visible: self.visible.get(),
        });
    }
}

/// A live reveal watch on one element.
///
/// Dropping the handle detaches it.
pub struct RevealHandle<E> {
    target: Rc<RevealTarget<E>>,
}

impl<E> RevealHandle<E> {
    /// Returns `true` once the target has been revealed.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.target.visible.get()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> RevealState {
        if self.is_visible() {
            RevealState::Visible
        } else {
            RevealState::Pending
        }
    }

    /// Returns the element to bind visibility styling to.
    #[must_use]
    pub fn element(&self) -> &E {
        &self.target.element
    }

    /// Per-behavior serial number of this target.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.target.id
    }

    /// Returns `true` while an intersection watch is held.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.target.watch.borrow().is_some()
    }

    /// Returns `true` after [`detach`](Self::detach).
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.target.detached.get()
    }

    /// Releases the intersection watch. A pending target stays pending and
    /// its `on_visible` callback never runs.
    ///
    /// Idempotent, and safe after the target has been revealed.
    pub fn detach(&self) {
        self.target.detach();
    }
}

impl<E> Drop for RevealHandle<E> {
    fn drop(&mut self) {
        self.target.detach();
    }
}

impl<E: fmt::Debug> fmt::Debug for RevealHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealHandle")
            .field("id", &self.target.id)
            .field("element", &self.target.element)
            .field("state", &self.state())
            .field("watching", &self.is_watching())
            .finish()
    }
}
