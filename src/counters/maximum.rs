//! Keep-the-largest value cell.
//!
//! The dashboard keeps each displayed metric in a [`Maximum`], so a late poll
//! result can never pull a displayed count below a value already shown from
//! a notification.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::counters::CounterValue;

/// Cell value meaning "nothing observed". Observed values are stored plus one.
const EMPTY: u64 = 0;

/// The largest value observed so far, or nothing.
///
/// Unlike a plain atomic maximum, a `Maximum` distinguishes "nothing
/// observed yet" from an observed `0`.
///
/// # Examples
///
/// ```rust
/// use conteggi::counters::maximum::Maximum;
/// use conteggi::counters::CounterValue;
///
/// let shown = Maximum::new();
/// assert_eq!(shown.value(), CounterValue::Unset);
///
/// shown.observe(12);
/// shown.observe(9);   // a stale poll result, ignored
/// shown.observe(13);
///
/// assert_eq!(shown.get(), Some(13));
/// ```
pub struct Maximum {
    cell: AtomicU64,
}

impl Maximum {
    /// Creates a cell with nothing observed.
    pub const fn new() -> Self {
        Maximum {
            cell: AtomicU64::new(EMPTY),
        }
    }

    /// Raises the cell to `value` if it is larger than anything seen so far.
    ///
    /// `u64::MAX` is clamped to `u64::MAX - 1`.
    #[inline]
    pub fn observe(&self, value: u64) {
        self.cell.fetch_max(value.saturating_add(1), Ordering::Relaxed);
    }

    /// Returns the largest observed value, or `None` if nothing was observed.
    #[inline]
    pub fn get(&self) -> Option<u64> {
        match self.cell.load(Ordering::Relaxed) {
            EMPTY => None,
            stored => Some(stored - 1),
        }
    }

    /// Returns the largest observed value as a [`CounterValue`].
    #[inline]
    pub fn value(&self) -> CounterValue {
        self.get().into()
    }
}

impl Default for Maximum {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Maximum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Maximum({})", self.value())
    }
}
