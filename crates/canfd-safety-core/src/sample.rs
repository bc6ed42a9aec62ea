//! Rolling min/max tracker over the most recent signal values.

/// Number of values retained per tracker.
pub const MAX_SAMPLE_VALS: usize = 6;

/// Last [`MAX_SAMPLE_VALS`] values of a signal and their extrema.
///
/// Limiters compare commands against the extrema rather than the latest
/// value, so a single late frame cannot tighten or loosen a bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sample {
    values: [i32; MAX_SAMPLE_VALS],
    min: i32,
    max: i32,
}

impl Sample {
    /// Shifts `value` in as the newest entry and recomputes min/max.
    pub fn update(&mut self, value: i32) {
        self.values.rotate_right(1);
        if let Some(newest) = self.values.first_mut() {
            *newest = value;
        }
        self.min = self.values.iter().copied().min().unwrap_or(value);
        self.max = self.values.iter().copied().max().unwrap_or(value);
    }

    /// Most recent value.
    #[inline]
    pub fn latest(&self) -> i32 {
        self.values.first().copied().unwrap_or(0)
    }

    /// Smallest retained value.
    #[inline]
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Largest retained value.
    #[inline]
    pub fn max(&self) -> i32 {
        self.max
    }

    /// All retained values, newest first.
    pub fn values(&self) -> &[i32; MAX_SAMPLE_VALS] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_tracks_extrema() {
        let mut s = Sample::default();
        s.update(100);
        assert_eq!(s.latest(), 100);
        // Zero-initialised history still participates until shifted out.
        assert_eq!(s.min(), 0);
        assert_eq!(s.max(), 100);

        s.update(-40);
        assert_eq!(s.min(), -40);
        assert_eq!(s.max(), 100);
    }

    #[test]
    fn test_old_values_age_out() {
        let mut s = Sample::default();
        s.update(500);
        for _ in 0..MAX_SAMPLE_VALS {
            s.update(7);
        }
        assert_eq!(s.min(), 7);
        assert_eq!(s.max(), 7);
        assert_eq!(s.values(), &[7; MAX_SAMPLE_VALS]);
    }
}
