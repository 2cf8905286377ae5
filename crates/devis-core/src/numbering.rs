//! Year-scoped sequential document numbers (`DEV-2024-001`).

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::error::Result;

/// Width of the zero-padded sequence part.
const SEQUENCE_WIDTH: usize = 3;

/// Storage lookup needed by the allocator.
pub trait NumberStore {
    /// Lexicographically greatest document number starting with `prefix`, if any.
    fn greatest_number_with_prefix(&self, prefix: &str) -> Result<Option<String>>;
}

/// Issues document numbers of the form `PREFIX-YYYY-NNN`.
#[derive(Debug, Clone)]
pub struct NumberAllocator {
    prefix: String,
}

impl NumberAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Prefix shared by every number issued in the year of `today`.
    pub fn year_prefix(&self, today: NaiveDate) -> String {
        format!("{}-{}-", self.prefix, today.year())
    }

    /// Next number for the year of `today`.
    ///
    /// A greatest number whose suffix is not numeric restarts the sequence at 1.
    pub fn allocate<S: NumberStore + ?Sized>(&self, store: &S, today: NaiveDate) -> Result<String> {
        let prefix = self.year_prefix(today);
        let last = store.greatest_number_with_prefix(&prefix)?;

        let next = match last.as_deref() {
            None => 1,
            Some(number) => match next_sequence(&prefix, number) {
                Some(n) => n,
                None => {
                    warn!("Unparseable document number {}, restarting at 1", number);
                    1
                }
            },
        };

        let number = format_number(&prefix, next);
        debug!("Allocated document number {}", number);
        Ok(number)
    }
}

impl Default for NumberAllocator {
    fn default() -> Self {
        Self::new("DEV")
    }
}

/// Sequence following `number`, or `None` when its suffix is not a number.
pub fn next_sequence(prefix: &str, number: &str) -> Option<u32> {
    let suffix = number.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    suffix.parse::<u32>().ok()?.checked_add(1)
}

/// Concatenate `prefix` and the zero-padded `sequence`.
pub fn format_number(prefix: &str, sequence: u32) -> String {
    format!("{prefix}{sequence:0width$}", width = SEQUENCE_WIDTH)
}
