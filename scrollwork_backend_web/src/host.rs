// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The browser [`Host`] implementation.
//!
//! Every subscription owns the JS closure it registered. Releasing the
//! [`Subscription`] unregisters the listener (or disconnects the observer,
//! or cancels the animation frame) and then drops the closure, so nothing
//! leaks across mount/unmount cycles.
//!
//! Capabilities are probed once in [`WebHost::new`]. Outside a browser
//! (no `window`) every capability is missing and the behaviors fall back
//! to their static defaults.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString as _};
use core::cell::Cell;
use core::fmt;

use js_sys::{Array, Reflect};
use kurbo::Vec2;
use scrollwork_core::host::{
    Capabilities, FrameCallback, Host, IntersectionCallback, IntersectionEntry, MotionCallback,
    ObserveOptions, ScrollCallback, Subscription,
};
use scrollwork_core::motion::MotionPreference;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MediaQueryList, MediaQueryListEvent, Window,
};

// Direct global bindings, as `web_sys::Window` would make every frame
// request fetch and unwrap the window again.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type ObserverClosure = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// A [`Host`] backed by the current browser window.
pub struct WebHost {
    window: Option<Window>,
    motion_query: Option<MediaQueryList>,
    caps: Capabilities,
}

impl fmt::Debug for WebHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebHost")
            .field("caps", &self.caps)
            .finish_non_exhaustive()
    }
}

impl Default for WebHost {
    fn default() -> Self {
        Self::new()
    }
}

impl WebHost {
    /// Probes the current global scope and creates a host.
    #[must_use]
    pub fn new() -> Self {
        let Some(window) = web_sys::window() else {
            return Self {
                window: None,
                motion_query: None,
                caps: Capabilities::NONE,
            };
        };

        let motion_query = if has_global(&window, "matchMedia") {
            window
                .match_media(MotionPreference::MEDIA_QUERY)
                .ok()
                .flatten()
        } else {
            None
        };
        let caps = Capabilities {
            viewport: window.document().is_some(),
            intersection: has_global(&window, "IntersectionObserver"),
            frames: has_global(&window, "requestAnimationFrame"),
            motion_query: motion_query.is_some(),
        };

        Self {
            window: Some(window),
            motion_query,
            caps,
        }
    }

    /// Returns the window this host is bound to, if any.
    #[must_use]
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

fn has_global(window: &Window, name: &str) -> bool {
    Reflect::has(window, &JsValue::from_str(name)).unwrap_or(false)
}

impl Host for WebHost {
    type Element = HtmlElement;

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn observe_intersection(
        &self,
        target: &HtmlElement,
        options: &ObserveOptions,
        mut callback: IntersectionCallback,
    ) -> Option<Subscription> {
        if !self.caps.can_observe_intersection() {
            return None;
        }

        let closure: ObserverClosure = Closure::wrap(Box::new(
            move |entries: Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    callback(IntersectionEntry {
                        ratio: entry.intersection_ratio(),
                        is_intersecting: entry.is_intersecting(),
                    });
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_string());
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init).ok()?;
        observer.observe(target);

        Some(Subscription::new(move || {
            observer.disconnect();
            drop(closure);
        }))
    }

    fn scroll_offset(&self) -> f64 {
        self.window
            .as_ref()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn on_scroll(&self, listener: ScrollCallback) -> Option<Subscription> {
        let window = self.window.clone().filter(|_| self.caps.viewport)?;
        let closure = Closure::wrap(listener);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .ok()?;

        Some(Subscription::new(move || {
            let _ = window
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            drop(closure);
        }))
    }

    fn request_frame(&self, callback: FrameCallback) -> Option<Subscription> {
        if !self.caps.frames {
            return None;
        }

        // Set once the browser has run the callback; cancelling after that
        // must not hand a stale id to `cancelAnimationFrame`.
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        let closure = Closure::once(move || {
            f.set(true);
            callback();
        });
        let id = request_animation_frame(closure.as_ref().unchecked_ref());

        Some(Subscription::new(move || {
            if !fired.get() {
                cancel_animation_frame(id);
            }
            drop(closure);
        }))
    }

    fn motion_preference(&self) -> MotionPreference {
        self.motion_query
            .as_ref()
            .map_or(MotionPreference::NoPreference, |q| {
                MotionPreference::from_reduced(q.matches())
            })
    }

    fn on_motion_preference_change(&self, mut listener: MotionCallback) -> Option<Subscription> {
        let query = self.motion_query.clone()?;
        let closure = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            listener(MotionPreference::from_reduced(event.matches()));
        }) as Box<dyn FnMut(MediaQueryListEvent)>);

        query
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .ok()?;

        Some(Subscription::new(move || {
            let _ = query
                .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            drop(closure);
        }))
    }

    fn set_layer_offset(&self, element: &HtmlElement, offset: Vec2) {
        let _ = element
            .style()
            .set_property("transform", &transform_value(offset));
    }

    fn clear_layer_offset(&self, element: &HtmlElement) {
        let _ = element.style().remove_property("transform");
    }
}

/// CSS `transform` value for a layer offset.
fn transform_value(offset: Vec2) -> String {
    if offset.x == 0.0 {
        format!("translateY({}px)", offset.y)
    } else {
        format!("translate({}px, {}px)", offset.x, offset.y)
    }
}
