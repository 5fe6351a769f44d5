// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity levels and the gate rule shared by dispatchers and sinks.
//!
//! Levels are declared in a fixed order and that order *is* the rank:
//!
//! | Level        | Rank |
//! |--------------|------|
//! | `Disabled`   | 0    |
//! | `Debug`      | 1    |
//! | `Info`       | 2    |
//! | `Warning`    | 3    |
//! | `Error`      | 4    |
//! | `FatalError` | 5    |
//! | `Verbose`    | 6    |
//!
//! A configured level acts as a *floor* for a sink or dispatcher. A message at
//! `level` passes a floor when the floor is not [`Severity::Disabled`] and
//! `level.rank() <= floor.rank()`. So a floor of `Warning` admits `Debug`,
//! `Info` and `Warning` but rejects `Error`.
//!
//! `Verbose` ranks above `FatalError`. This is the historical order and it is
//! kept as-is for compatibility, even though it reads oddly: a floor of
//! `FatalError` does not admit `Verbose` messages.
//!
//! ```
//! use debuggable::Severity;
//!
//! assert!(Severity::Warning.allows(Severity::Debug));
//! assert!(!Severity::Warning.allows(Severity::Error));
//! assert!(!Severity::Disabled.allows(Severity::Debug));
//! ```

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    /// Only meaningful as a floor: emit nothing.
    #[default]
    Disabled = 0,
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
    FatalError = 5,
    Verbose = 6,
}

impl Severity {
    /// Every level, in rank order.
    pub const ALL: [Severity; 7] = [
        Severity::Disabled,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::FatalError,
        Severity::Verbose,
    ];

    /// The declared rank of this level.
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Whether a message may be emitted at this level at all.
    #[inline]
    pub const fn is_emittable(self) -> bool {
        !matches!(self, Severity::Disabled)
    }

    /**
    Treating `self` as a floor, returns whether a message at `level` passes.

    A `Disabled` floor rejects everything, and `Disabled` is never an emittable
    level, so it never passes either.
    */
    #[inline]
    pub const fn allows(self, level: Severity) -> bool {
        if !self.is_emittable() || !level.is_emittable() {
            return false;
        }
        level.rank() <= self.rank()
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Disabled => "disabled",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::FatalError => "fatal_error",
            Severity::Verbose => "verbose",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Severity`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid severity '{input}' - expected one of disabled, debug, info, warning, error, fatal_error, verbose")]
pub struct ParseSeverityError {
    input: String,
}

impl ParseSeverityError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "disabled" | "disable" | "off" => Ok(Severity::Disabled),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal_error" | "fatalerror" | "fatal" => Ok(Severity::FatalError),
            "verbose" => Ok(Severity::Verbose),
            _ => Err(ParseSeverityError::new(s)),
        }
    }
}

/*
Boilerplate notes.

Copy/Clone/Eq/Hash are trivial for a fieldless enum.
Ord is derived and agrees with rank() because the discriminants follow declaration order.
Default is Disabled, matching the factory default floor.
From<u8> is not provided; ranks outside 0..=6 have no meaning.
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_declaration_order() {
        let ranks: Vec<u8> = Severity::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(Severity::Verbose > Severity::FatalError);
    }

    #[test]
    fn disabled_floor_rejects_every_level() {
        for level in Severity::ALL {
            assert!(!Severity::Disabled.allows(level), "{level} passed a disabled floor");
        }
    }

    #[test]
    fn disabled_level_never_passes() {
        for floor in Severity::ALL {
            assert!(!floor.allows(Severity::Disabled));
        }
    }

    #[test]
    fn floor_admits_levels_at_or_below_its_rank() {
        assert!(Severity::Warning.allows(Severity::Debug));
        assert!(Severity::Warning.allows(Severity::Warning));
        assert!(!Severity::Warning.allows(Severity::Error));
        assert!(Severity::FatalError.allows(Severity::Debug));
        assert!(!Severity::FatalError.allows(Severity::Verbose));
        assert!(Severity::Verbose.allows(Severity::FatalError));
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("Fatal-Error".parse::<Severity>(), Ok(Severity::FatalError));
        assert_eq!(" VERBOSE ".parse::<Severity>(), Ok(Severity::Verbose));
        assert_eq!("off".parse::<Severity>(), Ok(Severity::Disabled));
        let err = "loud".parse::<Severity>().unwrap_err();
        assert_eq!(err.input(), "loud");
        assert!(err.to_string().contains("loud"));
    }
}
