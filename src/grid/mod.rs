//! Weekly time grid.
//!
//! A grid of `days × periods_per_day` slots, addressed either by a flat
//! slot index in `[0, S-1]` or by `(day, period)` coordinates. Slots are
//! numbered day-major: all periods of day 0, then day 1, and so on.
//!
//! Nothing here is stored per slot; every coordinate is derived on demand.

/// A (day, period) coordinate derived from a flat slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSlot {
    /// Flat slot index.
    pub index: usize,
    /// Zero-based day.
    pub day: usize,
    /// Zero-based period within the day.
    pub period: usize,
}

/// Largest slot count [`TimeGrid::validate`] accepts.
pub const MAX_SLOTS: usize = 1 << 16;

/// Shape of the recurring weekly grid.
///
/// # Examples
///
/// ```
/// use u_timetable::grid::TimeGrid;
///
/// let grid = TimeGrid::REFERENCE;
/// assert_eq!(grid.slot_count(), 35);
/// assert_eq!(grid.slot_index(2, 3), 17);
/// assert_eq!(grid.day_of(17), 2);
/// assert_eq!(grid.period_of(17), 3);
/// assert_eq!(grid.first_period_slots(), vec![0, 7, 14, 21, 28]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeGrid {
    days: usize,
    periods_per_day: usize,
}

impl TimeGrid {
    /// Five days of seven periods.
    pub const REFERENCE: TimeGrid = TimeGrid {
        days: 5,
        periods_per_day: 7,
    };

    /// Creates a grid. Use [`validate`](Self::validate) before relying on it.
    pub const fn new(days: usize, periods_per_day: usize) -> Self {
        Self {
            days,
            periods_per_day,
        }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn periods_per_day(&self) -> usize {
        self.periods_per_day
    }

    /// Total number of slots `S`, saturating at `usize::MAX`.
    pub fn slot_count(&self) -> usize {
        self.days.saturating_mul(self.periods_per_day)
    }

    pub fn slot_index(&self, day: usize, period: usize) -> usize {
        day * self.periods_per_day + period
    }

    pub fn day_of(&self, slot: usize) -> usize {
        slot / self.periods_per_day
    }

    pub fn period_of(&self, slot: usize) -> usize {
        slot % self.periods_per_day
    }

    /// Full coordinate of a slot.
    pub fn slot(&self, index: usize) -> TimeSlot {
        TimeSlot {
            index,
            day: self.day_of(index),
            period: self.period_of(index),
        }
    }

    /// Slots that open a day: `{0, p, 2p, ...}`.
    pub fn first_period_slots(&self) -> Vec<usize> {
        (0..self.days).map(|day| self.slot_index(day, 0)).collect()
    }

    /// Whether `slot` lies inside the grid.
    pub fn contains(&self, slot: usize) -> bool {
        slot < self.slot_count()
    }

    /// Validates the grid shape.
    ///
    /// Both dimensions must be non-zero and the grid may hold at most
    /// [`MAX_SLOTS`] slots.
    pub fn validate(&self) -> Result<(), String> {
        if self.days == 0 {
            return Err("grid must have at least one day".into());
        }
        if self.periods_per_day == 0 {
            return Err("grid must have at least one period per day".into());
        }
        match self.days.checked_mul(self.periods_per_day) {
            Some(slots) if slots <= MAX_SLOTS => Ok(()),
            _ => Err(format!(
                "grid of {} days x {} periods exceeds {MAX_SLOTS} slots",
                self.days, self.periods_per_day
            )),
        }
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::REFERENCE
    }
}
