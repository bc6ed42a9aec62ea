//! Per-address integrity checks for inbound frames.
//!
//! Each [`RxCheck`] lists up to three mutually exclusive layouts of the same
//! signal group (e.g. accelerator reports that differ by powertrain). The first
//! layout seen on the bus is locked in; frames of the other layouts are then
//! ignored by the checker. For the locked layout every frame must:
//!
//! - carry a valid checksum, when the layout requires one
//! - advance its counter by exactly one (a wrong-counter score is kept and the
//!   frame is invalid once it reaches [`MAX_WRONG_COUNTERS`])
//! - keep arriving at its nominal frequency (checked by [`RxChecker::tick`])
//!
//! Frames whose address is not in the table pass through unchecked.

use tracing::trace;

use crate::frame::CanFrame;
use crate::hooks::SafetyHooks;
use crate::state::VehicleState;
use crate::{Micros, ts_elapsed};

/// Wrong-counter score at which a message is treated as invalid.
pub const MAX_WRONG_COUNTERS: u8 = 5;

/// Missed periods tolerated before a message counts as lagging.
pub const MAX_MISSED_MSGS: u32 = 10;

/// Lower bound on the lag threshold (µs).
pub const MIN_LAG_THRESHOLD_US: u32 = 1_000_000;

/// One expected inbound message layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxMessage {
    /// Frame identifier.
    pub addr: u32,
    /// Bus the message must arrive on.
    pub bus: u8,
    /// Exact payload length.
    pub len: u8,
    /// Verify the embedded checksum.
    pub check_checksum: bool,
    /// Counter wraps after this value; zero disables the counter check.
    pub max_counter: u8,
    /// Nominal rate (Hz).
    pub frequency_hz: u32,
}

impl RxMessage {
    /// Layout with no checksum, no counter and a 1 Hz nominal rate.
    pub const fn new(addr: u32, bus: u8, len: u8) -> Self {
        Self {
            addr,
            bus,
            len,
            check_checksum: false,
            max_counter: 0,
            frequency_hz: 1,
        }
    }

    /// Sets whether the checksum is verified.
    #[must_use]
    pub const fn with_checksum(mut self, check: bool) -> Self {
        self.check_checksum = check;
        self
    }

    /// Sets the counter wrap value.
    #[must_use]
    pub const fn with_max_counter(mut self, max_counter: u8) -> Self {
        self.max_counter = max_counter;
        self
    }

    /// Sets the nominal frequency.
    #[must_use]
    pub const fn with_frequency(mut self, hz: u32) -> Self {
        self.frequency_hz = hz;
        self
    }

    fn matches(&self, frame: &CanFrame) -> bool {
        self.addr == frame.addr() && self.bus == frame.bus() && usize::from(self.len) == frame.len()
    }

    fn lag_threshold_us(&self) -> u32 {
        let period = 1_000_000 / self.frequency_hz.max(1);
        period.saturating_mul(MAX_MISSED_MSGS).max(MIN_LAG_THRESHOLD_US)
    }
}

/// A group of mutually exclusive layouts checked as one signal source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxCheck {
    msgs: [Option<RxMessage>; 3],
}

impl RxCheck {
    /// Group with a single layout.
    pub const fn single(msg: RxMessage) -> Self {
        Self {
            msgs: [Some(msg), None, None],
        }
    }

    /// Group with two alternative layouts.
    pub const fn either(a: RxMessage, b: RxMessage) -> Self {
        Self {
            msgs: [Some(a), Some(b), None],
        }
    }

    /// Group with three alternative layouts.
    pub const fn any_of(a: RxMessage, b: RxMessage, c: RxMessage) -> Self {
        Self {
            msgs: [Some(a), Some(b), Some(c)],
        }
    }

    /// Layouts in declaration order.
    pub fn messages(&self) -> impl Iterator<Item = &RxMessage> {
        self.msgs.iter().flatten()
    }

    /// Returns `true` if any layout uses `addr` on `bus`.
    pub fn covers(&self, addr: u32, bus: u8) -> bool {
        self.messages().any(|m| m.addr == addr && m.bus == bus)
    }

    fn get(&self, index: usize) -> Option<&RxMessage> {
        self.msgs.get(index).and_then(Option::as_ref)
    }
}

/// Runtime status of one [`RxCheck`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RxCheckStatus {
    /// A frame matching one of the layouts has been seen.
    pub msg_seen: bool,
    /// Which layout was locked in.
    pub index: usize,
    /// Timestamp of the last matching frame.
    pub last_timestamp: Micros,
    /// Counter of the last matching frame.
    pub last_counter: u8,
    /// Wrong-counter score, `0..=MAX_WRONG_COUNTERS`.
    pub wrong_counters: u8,
    /// Checksum of the last matching frame was valid.
    pub valid_checksum: bool,
    /// Set by [`RxChecker::tick`] when the message stopped arriving.
    pub lagging: bool,
}

impl RxCheckStatus {
    fn is_valid(&self) -> bool {
        self.valid_checksum && self.wrong_counters < MAX_WRONG_COUNTERS
    }
}

#[derive(Debug, Clone)]
struct Entry {
    check: RxCheck,
    status: RxCheckStatus,
}

/// Address-check table plus the runtime status of each entry.
#[derive(Debug, Clone)]
pub struct RxChecker {
    entries: Vec<Entry>,
}

impl RxChecker {
    /// Builds a checker for `checks`; all entries start unseen.
    pub fn new(checks: &[RxCheck]) -> Self {
        Self {
            entries: checks
                .iter()
                .map(|&check| Entry {
                    check,
                    status: RxCheckStatus {
                        valid_checksum: true,
                        ..RxCheckStatus::default()
                    },
                })
                .collect(),
        }
    }

    /// Number of table entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for an empty table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table entries in order.
    pub fn checks(&self) -> impl Iterator<Item = &RxCheck> {
        self.entries.iter().map(|e| &e.check)
    }

    /// Status of entry `index`.
    pub fn status(&self, index: usize) -> Option<&RxCheckStatus> {
        self.entries.get(index).map(|e| &e.status)
    }

    /// Index of the entry `frame` belongs to, locking in its layout on first sight.
    pub fn find_index(&mut self, frame: &CanFrame) -> Option<usize> {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if !entry.status.msg_seen {
                let hit = entry.check.msgs.iter().position(|m| m.as_ref().is_some_and(|m| m.matches(frame)));
                if let Some(index) = hit {
                    entry.status.index = index;
                    entry.status.msg_seen = true;
                }
            }

            if entry.status.msg_seen
                && entry
                    .check
                    .get(entry.status.index)
                    .is_some_and(|m| m.matches(frame))
            {
                return Some(i);
            }
        }
        None
    }

    /// Runs counter and checksum checks on `frame`.
    ///
    /// Returns `false` for an invalid message, in which case control authority
    /// is revoked and the frame must not reach the rx hook.
    pub fn validate<H: SafetyHooks + ?Sized>(
        &mut self,
        frame: &CanFrame,
        hooks: &H,
        vehicle: &mut VehicleState,
        now: Micros,
    ) -> bool {
        let Some(i) = self.find_index(frame) else {
            return true;
        };
        let Some(entry) = self.entries.get_mut(i) else {
            return true;
        };
        let Some(msg) = entry.check.get(entry.status.index).copied() else {
            return true;
        };
        let status = &mut entry.status;
        status.last_timestamp = now;

        status.valid_checksum = if msg.check_checksum {
            match (hooks.checksum(frame), hooks.compute_checksum(frame)) {
                (Some(got), Some(expected)) => got == expected,
                _ => true,
            }
        } else {
            true
        };

        match hooks.counter(frame) {
            Some(counter) if msg.max_counter > 0 => {
                let modulus = u16::from(msg.max_counter) + 1;
                let expected = ((u16::from(status.last_counter) + 1) % modulus) as u8;
                status.wrong_counters = if expected == counter {
                    status.wrong_counters.saturating_sub(1)
                } else {
                    status.wrong_counters.saturating_add(1).min(MAX_WRONG_COUNTERS)
                };
                status.last_counter = counter;
            }
            _ => status.wrong_counters = 0,
        }

        let valid = status.is_valid();
        if !valid {
            trace!(
                addr = format_args!("{:#x}", frame.addr()),
                bus = frame.bus(),
                valid_checksum = status.valid_checksum,
                wrong_counters = status.wrong_counters,
                "rx address check failed"
            );
            vehicle.controls_allowed = false;
        }
        valid
    }

    /// Periodic freshness pass. Returns `true` when every entry is fresh and valid.
    ///
    /// Lagging entries revoke control authority.
    pub fn tick(&mut self, vehicle: &mut VehicleState, now: Micros) -> bool {
        let mut all_ok = true;
        for entry in &mut self.entries {
            let threshold = entry
                .check
                .get(entry.status.index)
                .map_or(MIN_LAG_THRESHOLD_US, RxMessage::lag_threshold_us);
            let lagging = ts_elapsed(now, entry.status.last_timestamp) > threshold;
            entry.status.lagging = lagging;
            if lagging {
                vehicle.controls_allowed = false;
            }
            if lagging || !entry.status.is_valid() {
                all_ok = false;
            }
        }
        all_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::hooks::{SafetyConfig, SafetyState};

    /// Counter in byte 0, checksum = sum of bytes 2.. in byte 1.
    struct SumHooks;

    impl SafetyHooks for SumHooks {
        fn safety_config(&self) -> SafetyConfig {
            SafetyConfig::default()
        }

        fn rx(&self, _frame: &CanFrame, _state: &mut SafetyState) -> bool {
            false
        }

        fn tx(&self, _frame: &CanFrame, _state: &mut SafetyState, _now: Micros) -> bool {
            true
        }

        fn fwd(&self, _bus: u8, _addr: u32) -> Option<u8> {
            None
        }

        fn counter(&self, frame: &CanFrame) -> Option<u8> {
            Some(frame.byte(0))
        }

        fn checksum(&self, frame: &CanFrame) -> Option<u32> {
            Some(u32::from(frame.byte(1)))
        }

        fn compute_checksum(&self, frame: &CanFrame) -> Option<u32> {
            let sum = frame.payload().iter().skip(2).fold(0u8, |a, b| a.wrapping_add(*b));
            Some(u32::from(sum))
        }
    }

    fn table() -> [RxCheck; 2] {
        [
            RxCheck::either(
                RxMessage::new(0x10, 0, 8).with_checksum(true).with_max_counter(0xF).with_frequency(100),
                RxMessage::new(0x11, 0, 8).with_checksum(true).with_max_counter(0xF).with_frequency(100),
            ),
            RxCheck::single(RxMessage::new(0x20, 0, 8).with_frequency(10)),
        ]
    }

    fn frame(addr: u32, counter: u8, data: u8) -> Result<CanFrame, FrameError> {
        CanFrame::new(addr, 0, &[counter, data, data, 0, 0, 0, 0, 0])
    }

    #[test]
    fn test_unknown_address_passes() -> Result<(), FrameError> {
        let mut rc = RxChecker::new(&table());
        let mut v = VehicleState::default();
        assert!(rc.validate(&frame(0x99, 0, 0)?, &SumHooks, &mut v, 0));
        Ok(())
    }

    #[test]
    fn test_first_alternative_seen_is_locked_in() -> Result<(), FrameError> {
        let mut rc = RxChecker::new(&table());
        assert_eq!(rc.find_index(&frame(0x11, 1, 0)?), Some(0));
        assert_eq!(rc.status(0).map(|s| s.index), Some(1));
        // The other layout of the same group is no longer matched.
        assert_eq!(rc.find_index(&frame(0x10, 1, 0)?), None);
        Ok(())
    }

    #[test]
    fn test_bad_checksum_revokes_authority() -> Result<(), FrameError> {
        let mut rc = RxChecker::new(&table());
        let mut v = VehicleState {
            controls_allowed: true,
            ..Default::default()
        };
        let bad = CanFrame::new(0x10, 0, &[1, 0x55, 1, 0, 0, 0, 0, 0])?;
        assert!(!rc.validate(&bad, &SumHooks, &mut v, 0));
        assert!(!v.controls_allowed);
        Ok(())
    }

    #[test]
    fn test_wrong_counters_accumulate() -> Result<(), FrameError> {
        let mut rc = RxChecker::new(&table());
        let mut v = VehicleState::default();
        // Counter stuck at 3: first frame is wrong (expected 1), then expected 4 each time.
        for n in 1..MAX_WRONG_COUNTERS {
            assert!(rc.validate(&frame(0x10, 3, 7)?, &SumHooks, &mut v, 0));
            assert_eq!(rc.status(0).map(|s| s.wrong_counters), Some(n));
        }
        assert!(!rc.validate(&frame(0x10, 3, 7)?, &SumHooks, &mut v, 0));

        // Correct sequence heals the score one step per frame.
        assert!(rc.validate(&frame(0x10, 4, 7)?, &SumHooks, &mut v, 0));
        assert_eq!(rc.status(0).map(|s| s.wrong_counters), Some(MAX_WRONG_COUNTERS - 1));
        assert!(rc.validate(&frame(0x10, 5, 7)?, &SumHooks, &mut v, 0));
        Ok(())
    }

    #[test]
    fn test_counter_wraps_at_max() -> Result<(), FrameError> {
        let mut rc = RxChecker::new(&table());
        let mut v = VehicleState::default();
        for c in (1..=0xF).chain(0..=2) {
            assert!(rc.validate(&frame(0x10, c, 0)?, &SumHooks, &mut v, 0));
        }
        assert_eq!(rc.status(0).map(|s| s.wrong_counters), Some(0));
        Ok(())
    }

    #[test]
    fn test_tick_flags_lagging() -> Result<(), FrameError> {
        let mut rc = RxChecker::new(&table());
        let mut v = VehicleState::default();
        assert!(rc.validate(&frame(0x10, 1, 0)?, &SumHooks, &mut v, 500_000));
        assert!(rc.validate(&frame(0x20, 0, 0)?, &SumHooks, &mut v, 500_000));
        assert!(rc.tick(&mut v, 1_400_000));

        v.controls_allowed = true;
        assert!(!rc.tick(&mut v, 1_600_000));
        assert!(!v.controls_allowed);
        assert_eq!(rc.status(0).map(|s| s.lagging), Some(true));
        Ok(())
    }
}
