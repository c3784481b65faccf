//! Per-channel sample history

use crate::coefficients::{FilterBank, FILTER_SIZE, PHASES};

/// Ring of the last [`FILTER_SIZE`] samples of one channel
///
/// The write cursor is owned by the estimator and shared by every channel,
/// since all channels advance one slot per frame. With cursor `pos` the
/// newest sample sits at `pos` and the oldest at `(pos + 1) % FILTER_SIZE`.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChannelHistory {
    taps: [f64; FILTER_SIZE],
}

impl ChannelHistory {
    /// Overwrite the oldest slot with `sample`
    #[inline]
    pub(crate) fn write(&mut self, pos: usize, sample: f64) {
        self.taps[pos] = sample;
    }

    /// Sample `age` frames before the newest one
    #[inline]
    pub(crate) fn value_at(&self, pos: usize, age: usize) -> f64 {
        self.taps[(pos + FILTER_SIZE - age) % FILTER_SIZE]
    }

    /// Run every phase of `bank` over the history ending at `pos`
    #[inline]
    pub(crate) fn interpolate(&self, pos: usize, bank: &FilterBank) -> [f64; PHASES] {
        let mut out = [0.0; PHASES];
        for age in 0..FILTER_SIZE {
            let value = self.value_at(pos, age);
            for (acc, phase) in out.iter_mut().zip(bank.phases()) {
                *acc += phase[age] * value;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::SampleRate;

    #[test]
    fn test_value_at_walks_backwards_with_wraparound() {
        let mut history = ChannelHistory::default();
        for (pos, value) in (0..FILTER_SIZE).zip(1_i32..) {
            history.write(pos, f64::from(value));
        }
        assert_eq!(history.value_at(0, 0), 1.0);
        assert_eq!(history.value_at(0, 1), 12.0);
        assert_eq!(history.value_at(0, 11), 2.0);
        assert_eq!(history.value_at(5, 0), 6.0);
        assert_eq!(history.value_at(5, 5), 1.0);
        assert_eq!(history.value_at(5, 6), 12.0);
    }

    #[test]
    fn test_interpolate_newest_impulse_reads_first_taps() {
        let bank = SampleRate::Hz48000.filter_bank();
        let mut history = ChannelHistory::default();
        history.write(7, 1.0);

        let out = history.interpolate(7, bank);
        for (phase, value) in out.iter().enumerate() {
            assert_eq!(*value, bank.phase(phase)[0]);
        }
    }

    #[test]
    fn test_interpolate_oldest_impulse_reads_last_taps() {
        let bank = SampleRate::Hz44100.filter_bank();
        let mut history = ChannelHistory::default();
        // newest at 3, so the oldest slot is 4
        history.write(4, 1.0);

        let out = history.interpolate(3, bank);
        for (phase, value) in out.iter().enumerate() {
            assert_eq!(*value, bank.phase(phase)[FILTER_SIZE - 1]);
        }
    }
}
