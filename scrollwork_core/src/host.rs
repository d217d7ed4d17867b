// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capability port.
//!
//! Both behaviors reach the rendering environment exclusively through the
//! [`Host`] trait. A host provides four capabilities, each of which may be
//! missing:
//!
//! - **Intersection** — [`observe_intersection`](Host::observe_intersection)
//!   reports how much of a target lies inside the margin-adjusted viewport.
//! - **Scroll** — [`scroll_offset`](Host::scroll_offset) and
//!   [`on_scroll`](Host::on_scroll). Listeners are registered passive: they
//!   never block the host's scroll handling.
//! - **Frames** — [`request_frame`](Host::request_frame) runs a callback
//!   before the next display refresh.
//! - **Motion preference** — [`motion_preference`](Host::motion_preference)
//!   and [`on_motion_preference_change`](Host::on_motion_preference_change).
//!
//! Every subscribing method returns `Option<Subscription>`. `None` means the
//! capability is unavailable; behaviors then fall back to their safe defaults
//! (always visible, static layers) instead of reporting an error.
//!
//! # Crate boundaries
//!
//! `scrollwork_core` owns the behaviors and this contract module. Host
//! crates (e.g. `scrollwork_backend_web`) implement [`Host`] with platform
//! glue. Application code depends on both and attaches behaviors to
//! elements from its view lifecycle.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Vec2;

use crate::margin::RootMargin;
use crate::motion::MotionPreference;

/// Receives intersection reports for one observed target.
pub type IntersectionCallback = Box<dyn FnMut(IntersectionEntry)>;

/// Receives scroll notifications.
pub type ScrollCallback = Box<dyn FnMut()>;

/// Runs once before the next display refresh.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Receives motion-preference changes.
pub type MotionCallback = Box<dyn FnMut(MotionPreference)>;

/// Which capabilities a host can provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// A live viewport exists (false when rendering non-interactively).
    pub viewport: bool,
    /// Viewport intersection can be observed.
    pub intersection: bool,
    /// Callbacks can be scheduled for the next display frame.
    pub frames: bool,
    /// The motion preference can be queried and watched.
    pub motion_query: bool,
}

impl Capabilities {
    /// Every capability is available.
    pub const ALL: Self = Self {
        viewport: true,
        intersection: true,
        frames: true,
        motion_query: true,
    };

    /// No capability is available (non-interactive rendering).
    pub const NONE: Self = Self {
        viewport: false,
        intersection: false,
        frames: false,
        motion_query: false,
    };

    /// Whether reveal targets can wait for a real intersection.
    #[inline]
    #[must_use]
    pub const fn can_observe_intersection(self) -> bool {
        self.viewport && self.intersection
    }

    /// Whether scroll-driven layer updates are possible at all.
    #[inline]
    #[must_use]
    pub const fn can_drive_layers(self) -> bool {
        self.viewport && self.frames
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

/// One intersection report for an observed target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Fraction of the target's area inside the observed region, in `[0, 1]`.
    pub ratio: f64,
    /// Whether the target touches the observed region at all.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// A target entirely outside the observed region.
    pub const OUTSIDE: Self = Self {
        ratio: 0.0,
        is_intersecting: false,
    };

    /// Creates an entry from a ratio; any positive ratio counts as
    /// intersecting.
    #[inline]
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        Self {
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    /// Returns `true` if this entry satisfies `threshold`.
    #[inline]
    #[must_use]
    pub fn reaches(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

/// Parameters for [`Host::observe_intersection`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserveOptions {
    /// Minimum ratio the host should report crossings for.
    pub threshold: f64,
    /// Adjustment applied to the viewport before testing.
    pub root_margin: RootMargin,
}

/// Cancellation handle returned by every host subscription.
///
/// The cancel action runs exactly once: on [`cancel`](Self::cancel) or when
/// the subscription is dropped, whichever comes first. Behaviors store their
/// subscriptions in `Option`s so that releasing one is a `take()`.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a subscription that runs `cancel` when released.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Creates a subscription with nothing to release.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Cancels the subscription now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// The rendering environment as seen by the behaviors.
///
/// Implementations are single-threaded and shared through `Rc` for as long
/// as any behavior uses them. All methods take `&self`; hosts use interior
/// mutability where they need it.
///
/// Hosts must tolerate a subscription being cancelled from inside its own
/// callback, and must not hold internal borrows while invoking callbacks.
pub trait Host: 'static {
    /// The element type behaviors attach to. Equality is element identity.
    type Element: Clone + PartialEq + fmt::Debug + 'static;

    /// Reports which capabilities this host provides.
    fn capabilities(&self) -> Capabilities;

    /// Starts observing `target`, delivering entries to `callback` until the
    /// returned subscription is released.
    fn observe_intersection(
        &self,
        target: &Self::Element,
        options: &ObserveOptions,
        callback: IntersectionCallback,
    ) -> Option<Subscription>;

    /// Current vertical scroll position of the page.
    fn scroll_offset(&self) -> f64;

    /// Registers a passive scroll listener.
    fn on_scroll(&self, listener: ScrollCallback) -> Option<Subscription>;

    /// Schedules `callback` for the next display frame. Releasing the
    /// subscription before the frame cancels it.
    fn request_frame(&self, callback: FrameCallback) -> Option<Subscription>;

    /// Current motion preference. Hosts without a motion query report
    /// [`MotionPreference::NoPreference`].
    fn motion_preference(&self) -> MotionPreference;

    /// Registers a listener for motion-preference changes.
    fn on_motion_preference_change(&self, listener: MotionCallback) -> Option<Subscription>;

    /// Applies `offset` to `element` as a translation transform.
    fn set_layer_offset(&self, element: &Self::Element, offset: Vec2);

    /// Restores `element` to its untransformed state.
    fn clear_layer_offset(&self, element: &Self::Element);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[test]
    fn subscription_cancels_once_on_drop() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = Subscription::new(move || c.set(c.get() + 1));
        drop(sub);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn explicit_cancel_does_not_run_twice() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        Subscription::new(move || c.set(c.get() + 1)).cancel();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn entry_threshold() {
        assert!(!IntersectionEntry::from_ratio(0.05).reaches(0.1));
        assert!(IntersectionEntry::from_ratio(0.1).reaches(0.1));
        assert!(!IntersectionEntry::OUTSIDE.reaches(0.0));
    }

    #[test]
    fn capability_predicates() {
        assert!(Capabilities::ALL.can_observe_intersection());
        assert!(Capabilities::ALL.can_drive_layers());
        let no_frames = Capabilities {
            frames: false,
            ..Capabilities::ALL
        };
        assert!(!no_frames.can_drive_layers());
        assert!(!Capabilities::NONE.can_observe_intersection());
    }
}
