// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root margins for intersection observation.
//!
//! A [`RootMargin`] grows or shrinks the viewport region used when deciding
//! whether a reveal target is visible. It uses the CSS `margin` shorthand
//! (`top right bottom left`, one to four values), where each value is either
//! a pixel length or a percentage of the viewport. Positive values grow the
//! region; negative values shrink it, so `"0px 0px -50px 0px"` only counts a
//! target once it is 50 px above the bottom edge.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use kurbo::Rect;

/// One side of a [`RootMargin`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute offset in CSS pixels.
    Px(f64),
    /// Offset as a percentage of the viewport extent along the same axis.
    Percent(f64),
}

impl Length {
    /// A zero offset.
    pub const ZERO: Self = Self::Px(0.0);

    /// Resolves to pixels against a viewport extent (width for horizontal
    /// sides, height for vertical ones).
    #[inline]
    #[must_use]
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

impl FromStr for Length {
    type Err = ParseRootMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRootMarginError::InvalidLength(s.to_string());
        if let Some(num) = s.strip_suffix("px") {
            return num.parse().map(Self::Px).map_err(|_| invalid());
        }
        if let Some(num) = s.strip_suffix('%') {
            return num.parse().map(Self::Percent).map_err(|_| invalid());
        }
        // Unitless lengths are only meaningful for zero.
        match s.parse::<f64>() {
            Ok(v) if v == 0.0 => Ok(Self::ZERO),
            _ => Err(invalid()),
        }
    }
}

/// Four-sided offset applied to the viewport for intersection testing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    /// Top side.
    pub top: Length,
    /// Right side.
    pub right: Length,
    /// Bottom side.
    pub bottom: Length,
    /// Left side.
    pub left: Length,
}

impl RootMargin {
    /// No margin: the region equals the viewport.
    pub const ZERO: Self = Self::uniform(Length::ZERO);

    /// The reveal default: the bottom edge is pulled in by 50 px, so targets
    /// trigger slightly after they scroll into view.
    pub const REVEAL_DEFAULT: Self = Self::new(
        Length::ZERO,
        Length::ZERO,
        Length::Px(-50.0),
        Length::ZERO,
    );

    /// Creates a margin from its four sides.
    #[inline]
    #[must_use]
    pub const fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates a margin with the same length on every side.
    #[inline]
    #[must_use]
    pub const fn uniform(len: Length) -> Self {
        Self::new(len, len, len, len)
    }

    /// Applies the margin to `viewport`, returning the region used for
    /// intersection tests.
    #[must_use]
    pub fn expand(&self, viewport: Rect) -> Rect {
        let w = viewport.width();
        let h = viewport.height();
        Rect::new(
            viewport.x0 - self.left.resolve(w),
            viewport.y0 - self.top.resolve(h),
            viewport.x1 + self.right.resolve(w),
            viewport.y1 + self.bottom.resolve(h),
        )
    }
}

impl fmt::Display for RootMargin {
    /// Prints the four-value form accepted by `IntersectionObserver`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = ParseRootMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sides = [Length::ZERO; 4];
        let mut count = 0;
        for token in s.split_ascii_whitespace() {
            if count == 4 {
                return Err(ParseRootMarginError::TooManyValues(
                    s.split_ascii_whitespace().count(),
                ));
            }
            sides[count] = token.parse()?;
            count += 1;
        }
        let [a, b, c, d] = sides;
        // CSS shorthand expansion.
        match count {
            0 => Err(ParseRootMarginError::Empty),
            1 => Ok(Self::uniform(a)),
            2 => Ok(Self::new(a, b, a, b)),
            3 => Ok(Self::new(a, b, c, b)),
            _ => Ok(Self::new(a, b, c, d)),
        }
    }
}

/// Errors from parsing a [`RootMargin`] or [`Length`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseRootMarginError {
    /// The input contained no values.
    Empty,
    /// More than four values were given (carries the count).
    TooManyValues(usize),
    /// A value was not a `px` length, a percentage, or a bare `0`.
    InvalidLength(String),
}

impl fmt::Display for ParseRootMarginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("root margin is empty"),
            Self::TooManyValues(n) => {
                write!(f, "root margin takes at most 4 values, got {n}")
            }
            Self::InvalidLength(token) => {
                write!(f, "invalid root margin length {token:?} (expected px or %)")
            }
        }
    }
}

impl core::error::Error for ParseRootMarginError {}
