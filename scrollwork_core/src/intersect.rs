// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection geometry.
//!
//! Browsers compute intersection ratios natively; these helpers give hosts
//! without a native primitive (and the test fake) the same semantics:
//! rectangles that share only an edge still count as intersecting, and a
//! zero-area target that intersects reports a ratio of `1.0`.

use kurbo::Rect;

use crate::host::IntersectionEntry;

/// Returns the fraction of `target`'s area that lies within `root`, in
/// `[0, 1]`.
#[must_use]
pub fn intersection_ratio(target: Rect, root: Rect) -> f64 {
    entry_for(target, root).ratio
}

/// Builds the [`IntersectionEntry`] a host would report for `target`
/// against the (margin-expanded) `root` region.
#[must_use]
pub fn entry_for(target: Rect, root: Rect) -> IntersectionEntry {
    let target = target.abs();
    let root = root.abs();
    let x0 = target.x0.max(root.x0);
    let y0 = target.y0.max(root.y0);
    let x1 = target.x1.min(root.x1);
    let y1 = target.y1.min(root.y1);

    if x1 < x0 || y1 < y0 {
        return IntersectionEntry::OUTSIDE;
    }

    let target_area = target.area();
    let ratio = if target_area > 0.0 {
        ((x1 - x0) * (y1 - y0) / target_area).clamp(0.0, 1.0)
    } else {
        1.0
    };
    IntersectionEntry {
        ratio,
        is_intersecting: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    #[test]
    fn fully_inside() {
        let target = Rect::new(100.0, 100.0, 200.0, 200.0);
        assert_eq!(intersection_ratio(target, VIEWPORT), 1.0);
    }

    #[test]
    fn partially_below_the_fold() {
        // Top quarter of a 400 px tall target is on screen.
        let target = Rect::new(0.0, 500.0, 100.0, 900.0);
        assert_eq!(intersection_ratio(target, VIEWPORT), 0.25);
    }

    #[test]
    fn disjoint_is_outside() {
        let target = Rect::new(0.0, 700.0, 100.0, 800.0);
        let entry = entry_for(target, VIEWPORT);
        assert_eq!(entry, IntersectionEntry::OUTSIDE);
    }

    #[test]
    fn edge_adjacent_intersects_with_zero_ratio() {
        let target = Rect::new(0.0, 600.0, 100.0, 700.0);
        let entry = entry_for(target, VIEWPORT);
        assert!(entry.is_intersecting);
        assert_eq!(entry.ratio, 0.0);
    }

    #[test]
    fn zero_area_target_inside_reports_full_ratio() {
        let target = Rect::new(50.0, 50.0, 50.0, 50.0);
        assert_eq!(intersection_ratio(target, VIEWPORT), 1.0);
    }
}
