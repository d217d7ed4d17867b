// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class-toggling reveal targets.

use alloc::boxed::Box;
use alloc::string::String;

use scrollwork_core::reveal::{RevealHandle, ScrollReveal};
use web_sys::HtmlElement;

use crate::WebHost;

/// Class added to revealed elements by [`reveal_with_default_class`].
pub const VISIBLE_CLASS: &str = "is-visible";

/// Attaches `element` to `reveal` and adds `class` to it once visible.
///
/// Stylesheets key their entrance transition off the class; the element
/// starts without it and keeps it after the handle is dropped.
pub fn reveal_with_class(
    reveal: &ScrollReveal<WebHost>,
    element: HtmlElement,
    class: &str,
) -> RevealHandle<HtmlElement> {
    let target = element.clone();
    let class = String::from(class);
    reveal.attach(
        element,
        Some(Box::new(move || {
            let _ = target.class_list().add_1(&class);
        })),
    )
}

/// [`reveal_with_class`] with [`VISIBLE_CLASS`].
pub fn reveal_with_default_class(
    reveal: &ScrollReveal<WebHost>,
    element: HtmlElement,
) -> RevealHandle<HtmlElement> {
    reveal_with_class(reveal, element, VISIBLE_CLASS)
}
