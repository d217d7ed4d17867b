// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: reveal-on-scroll sections under a parallax hero.
//!
//! Builds a page with a three-layer hero whose layers drift at different
//! speeds while scrolling, followed by content sections that fade in as they
//! enter the viewport. With `prefers-reduced-motion: reduce` the layers stay
//! put and every section is shown immediately.
//!
//! Build with: `wasm-pack build --target web demos/web_scroll`
//!
//! Then serve `demos/web_scroll/` and open `index.html` in a browser. Enable
//! the `trace` feature to log behavior events to the console.

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::mem;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use scrollwork_backend_web::{WebHost, reveal_with_default_class};
use scrollwork_core::parallax::{ParallaxConfig, ParallaxController};
use scrollwork_core::reveal::{RevealOptions, ScrollReveal};
use scrollwork_core::trace::Tracer;

const HERO_HEIGHT: f64 = 640.0;

/// Hero layers: (speed factor, size in px, background).
const HERO_LAYERS: [(f64, f64, &str); 3] = [
    (0.2, 520.0, "radial-gradient(circle, #1d3b6e 0%, transparent 70%)"),
    (0.5, 280.0, "radial-gradient(circle, #3e7bd6 0%, transparent 70%)"),
    (0.8, 120.0, "radial-gradient(circle, #9cc4ff 0%, transparent 70%)"),
];

const SECTIONS: [&str; 6] = [
    "Perception",
    "Planning",
    "Manipulation",
    "Navigation",
    "Learning",
    "Safety",
];

const STYLESHEET: &str = "
.reveal { opacity: 0; transform: translateY(24px); transition: opacity 600ms ease-out, transform 600ms ease-out; }
.reveal.is-visible { opacity: 1; transform: none; }
@media (prefers-reduced-motion: reduce) { .reveal { transition: none; } }
";

fn element(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(document.create_element(tag)?.unchecked_into())
}

fn style(el: &HtmlElement, css: &str) -> Result<(), JsValue> {
    el.style().set_css_text(css);
    Ok(())
}

fn tracer() -> Tracer {
    #[cfg(feature = "trace")]
    {
        use core::cell::RefCell;
        Tracer::new(Rc::new(RefCell::new(scrollwork_backend_web::ConsoleSink::new())))
    }
    #[cfg(not(feature = "trace"))]
    {
        Tracer::none()
    }
}

fn create_hero(document: &Document) -> Result<(HtmlElement, Vec<(HtmlElement, f64)>), JsValue> {
    let hero = element(document, "header")?;
    style(
        &hero,
        &format!(
            "position: relative; height: {HERO_HEIGHT}px; overflow: hidden; display: flex; align-items: center; justify-content: center;"
        ),
    )?;

    let mut layers = Vec::with_capacity(HERO_LAYERS.len());
    for (speed, size, background) in HERO_LAYERS {
        let layer = element(document, "div")?;
        style(
            &layer,
            &format!(
                "position: absolute; left: 50%; top: 50%; width: {size}px; height: {size}px; margin: -{half}px 0 0 -{half}px; border-radius: 50%; background: {background}; will-change: transform;",
                half = size / 2.0,
            ),
        )?;
        hero.append_child(&layer)?;
        layers.push((layer, speed));
    }

    let title = element(document, "h1")?;
    title.set_text_content(Some("scrollwork"));
    style(&title, "position: relative; font-size: 64px; letter-spacing: 0.04em;")?;
    hero.append_child(&title)?;

    Ok((hero, layers))
}

fn create_section(document: &Document, heading: &str) -> Result<HtmlElement, JsValue> {
    let section = element(document, "section")?;
    section.set_class_name("reveal");
    style(
        &section,
        "max-width: 720px; margin: 0 auto 160px; padding: 48px; border-radius: 16px; background: #182034;",
    )?;
    let h2 = element(document, "h2")?;
    h2.set_text_content(Some(heading));
    section.append_child(&h2)?;
    let body = element(document, "p")?;
    body.set_text_content(Some(
        "This block fades in once a tenth of it has crossed into the viewport.",
    ));
    section.append_child(&body)?;
    Ok(section)
}

/// Entry point for the web-scroll demo.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let sheet = element(&document, "style")?;
    sheet.set_text_content(Some(STYLESHEET));
    body.append_child(&sheet)?;

    let (hero, hero_layers) = create_hero(&document)?;
    body.append_child(&hero)?;

    let host = Rc::new(WebHost::new());
    let tracer = tracer();

    let parallax =
        ParallaxController::with_tracer(Rc::clone(&host), ParallaxConfig::default(), tracer.clone());
    for (layer, speed) in hero_layers {
        parallax.register_layer(layer, speed);
    }

    let reveal = ScrollReveal::new(Rc::clone(&host), RevealOptions::new()).with_tracer(tracer);
    let mut handles = Vec::with_capacity(SECTIONS.len());
    for heading in SECTIONS {
        let section = create_section(&document, heading)?;
        body.append_child(&section)?;
        handles.push(reveal_with_default_class(&reveal, section));
    }

    // The page never unmounts; keep both behaviors alive for its lifetime.
    mem::forget(parallax);
    mem::forget(handles);
    Ok(())
}
