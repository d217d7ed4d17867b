// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reduced-motion accessibility preference.
//!
//! [`MotionPreference`] mirrors the `prefers-reduced-motion` media feature.
//! It is process-wide and read-only from this crate's perspective: behaviors
//! read it through [`Host::motion_preference`] and may watch it through
//! [`Host::on_motion_preference_change`].
//!
//! [`Host::motion_preference`]: crate::host::Host::motion_preference
//! [`Host::on_motion_preference_change`]: crate::host::Host::on_motion_preference_change

/// The user's motion preference as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MotionPreference {
    /// No preference expressed; animated effects are allowed.
    #[default]
    NoPreference,
    /// The user asked for animated effects to be minimized.
    Reduce,
}

impl MotionPreference {
    /// Builds a preference from a "reduced motion requested" flag.
    #[inline]
    #[must_use]
    pub const fn from_reduced(reduced: bool) -> Self {
        if reduced {
            Self::Reduce
        } else {
            Self::NoPreference
        }
    }

    /// Returns `true` if the user asked for reduced motion.
    #[inline]
    #[must_use]
    pub const fn is_reduced(self) -> bool {
        matches!(self, Self::Reduce)
    }

    /// The media query a host evaluates to obtain this preference.
    pub const MEDIA_QUERY: &'static str = "(prefers-reduced-motion: reduce)";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_motion() {
        assert!(!MotionPreference::default().is_reduced());
    }

    #[test]
    fn from_reduced_flag() {
        assert_eq!(MotionPreference::from_reduced(true), MotionPreference::Reduce);
        assert_eq!(
            MotionPreference::from_reduced(false),
            MotionPreference::NoPreference
        );
    }
}
