//! # Scheduling Slot Generator
//!
//! Produces the pickup time slots offered at checkout, honoring a minimum
//! advance notice and a fixed interval.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  now = 10:07, advance = 30 min, interval = 15 min                       │
//! │                                                                         │
//! │  1. Round now UP to the next interval boundary ──► 10:15                │
//! │  2. Step by the interval: 10:15, 10:30, 10:45, 11:00, ...               │
//! │  3. Keep only slots strictly after now + advance (10:37)                │
//! │     ──► first offered slot is 10:45                                     │
//! │  4. Stop at max_slots or after the 24 h horizon                         │
//! │                                                                         │
//! │  Slots are advisory: they are never reserved, and the sequence is       │
//! │  recomputed against the wall clock on every call - never cached.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Timelike, Utc};

/// Slot generation parameters. Interval comes from store settings; the rest
/// are house rules.
#[derive(Debug, Clone, Copy)]
pub struct SlotConfig {
    /// Minimum lead time before the first offered slot.
    pub min_advance_minutes: i64,
    /// Spacing between slots.
    pub interval_minutes: i64,
    /// Maximum number of slots offered.
    pub max_slots: usize,
    /// How far ahead slots are generated.
    pub horizon_hours: i64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        SlotConfig {
            min_advance_minutes: 30,
            interval_minutes: 15,
            max_slots: 20,
            horizon_hours: 24,
        }
    }
}

/// Generates the ordered sequence of offered pickup slots as "HH:MM" strings.
///
/// Pure in `now`: callers pass the current wall-clock time and must call
/// again (not reuse the result) once a boundary passes.
pub fn generate_slots(now: DateTime<Utc>, config: SlotConfig) -> Vec<String> {
    let interval = config.interval_minutes.max(1);

    // Round up to the next interval boundary, dropping seconds.
    let minute = now.minute() as i64;
    let rounded = (minute + interval - 1) / interval * interval;
    let hour_start = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let first_boundary = hour_start + Duration::minutes(rounded);

    let threshold = now + Duration::minutes(config.min_advance_minutes);
    let steps = (config.horizon_hours * 60 / interval).max(0);

    let mut slots: Vec<String> = Vec::with_capacity(config.max_slots);
    for i in 0..steps {
        let slot = first_boundary + Duration::minutes(i * interval);
        if slot > threshold {
            let label = slot.format("%H:%M").to_string();
            // The horizon can wrap past midnight; keep each label once.
            if !slots.contains(&label) {
                slots.push(label);
            }
        }
        if slots.len() >= config.max_slots {
            break;
        }
    }
    slots
}

// =============================================================================
// Unit Tests
// =============================================================================
