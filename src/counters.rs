//! Displayed metric values and the shared observation interface.
//!
//! This module provides the [`Observable`] trait implemented by everything
//! the observers can render, the [`CounterValue`] they render, and the
//! [`Maximum`](maximum::Maximum) cell that holds each displayed value of the
//! dashboard.

pub mod maximum;

use std::fmt::{Debug, Display};

/// The value shown for a metric.
///
/// # Examples
///
/// ```rust
/// use conteggi::counters::CounterValue;
///
/// assert_eq!(CounterValue::Unset.to_string(), "----");
/// assert_eq!(CounterValue::Unsigned(1234).to_string(), "1234");
/// assert_eq!(CounterValue::Unset.as_option(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CounterValue {
    /// Nothing has been observed yet.
    #[default]
    Unset,
    /// An unsigned 64-bit value.
    Unsigned(u64),
}

impl CounterValue {
    /// Returns the value, or `None` if unset.
    pub fn as_option(&self) -> Option<u64> {
        match self {
            CounterValue::Unset => None,
            CounterValue::Unsigned(v) => Some(*v),
        }
    }

    /// Returns the value, treating unset as zero.
    pub fn as_u64(&self) -> u64 {
        self.as_option().unwrap_or(0)
    }

    /// Returns `true` if nothing has been observed.
    pub fn is_unset(&self) -> bool {
        matches!(self, CounterValue::Unset)
    }
}

impl Display for CounterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterValue::Unset => write!(f, "----"),
            CounterValue::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

impl From<Option<u64>> for CounterValue {
    fn from(value: Option<u64>) -> Self {
        value.map_or(CounterValue::Unset, CounterValue::Unsigned)
    }
}

/// A trait for types whose current value can be read and exported.
///
/// Implemented by the dashboard's [`Panel`](crate::dashboard::Panel)s, so
/// they can be handed to the table and JSON observers.
pub trait Observable: Debug {
    /// Returns the name shown for this metric. May be empty.
    fn name(&self) -> &str;

    /// Returns the current value.
    fn value(&self) -> CounterValue;

    /// Returns a one-line description. Empty by default.
    fn description(&self) -> &str {
        ""
    }
}

impl Display for dyn Observable + '_ {
    /// Formats the metric as `name:value` if named, or just `value` otherwise.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name().is_empty() {
            write!(f, "{}:{}", self.name(), self.value())
        } else {
            write!(f, "{}", self.value())
        }
    }
}
