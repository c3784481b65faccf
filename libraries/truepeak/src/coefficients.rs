//! Polyphase interpolation filter banks
//!
//! Each supported input rate has one 48-tap lowpass prototype, split into
//! four 12-tap phases. Only phases 0 and 1 are stored; phases 2 and 3 are
//! their time reversals.
//!
//! ```text
//! phase2[i] = phase1[11 - i]
//! phase3[i] = phase0[11 - i]
//! ```

use crate::error::TruePeakError;
use serde::Serialize;
use std::fmt;

/// Taps per phase (and ring buffer length per channel)
pub const FILTER_SIZE: usize = 12;

/// Number of interpolation phases (4x oversampling)
pub const PHASES: usize = 4;

/// ITU-R BS.1770 phase 0 for 48 kHz input
const PHASE0_48K: [f64; FILTER_SIZE] = [
    0.0017089843750,
    0.0109863281250,
    -0.0196533203125,
    0.0332031250000,
    -0.0594482421875,
    0.1373291015625,
    0.9721679687500,
    -0.1022949218750,
    0.0476074218750,
    -0.0266113281250,
    0.0148925781250,
    -0.0083007812500,
];

/// ITU-R BS.1770 phase 1 for 48 kHz input
const PHASE1_48K: [f64; FILTER_SIZE] = [
    -0.0291748046875,
    0.0292968750000,
    -0.0517578125000,
    0.0891113281250,
    -0.1665039062500,
    0.4650878906250,
    0.7797851562500,
    -0.2003173828125,
    0.1015625000000,
    -0.0582275390625,
    0.0330810546875,
    -0.0189208984375,
];

// 44.1 kHz phases come from an equiripple design (48 taps, transition band
// 22050 +/- 4000 Hz at 176.4 kHz) fitted to follow the 48 kHz table.
const PHASE0_44K: [f64; FILTER_SIZE] = [
    -0.01439987226416129112,
    0.00804428685766508424,
    -0.01987224313675403642,
    0.02961932948785491598,
    -0.05927231810554856040,
    0.13017896194978784141,
    0.99235970714512011792,
    -0.09710589955199680490,
    0.04833968399400932064,
    -0.02339943319366176444,
    0.01352769296977450984,
    -0.01180186154189016498,
];

const PHASE1_44K: [f64; FILTER_SIZE] = [
    -0.00172904083567296252,
    0.02915878488169267729,
    -0.04609955571114128514,
    0.08616031626350771633,
    -0.15946140818094267644,
    0.46467030920006835437,
    0.75915840241856424875,
    -0.19886324660220641714,
    0.09586897108756886610,
    -0.05455391567180414153,
    0.02950325446961841319,
    -0.01885897116569820731,
];

static BANK_44K: FilterBank = FilterBank::from_stored_phases(&PHASE0_44K, &PHASE1_44K);
static BANK_48K: FilterBank = FilterBank::from_stored_phases(&PHASE0_48K, &PHASE1_48K);

/// Input sample rates with a coefficient table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u32")]
pub enum SampleRate {
    /// 44100 Hz (CD)
    Hz44100,
    /// 48000 Hz (broadcast)
    Hz48000,
}

impl SampleRate {
    /// Rate in Hz
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz44100 => 44100,
            Self::Hz48000 => 48000,
        }
    }

    /// Filter bank used for this input rate
    pub fn filter_bank(self) -> &'static FilterBank {
        match self {
            Self::Hz44100 => &BANK_44K,
            Self::Hz48000 => &BANK_48K,
        }
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = TruePeakError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        match hz {
            44100 => Ok(Self::Hz44100),
            48000 => Ok(Self::Hz48000),
            other => Err(TruePeakError::UnsupportedSampleRate(other)),
        }
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> Self {
        rate.hz()
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

/// Four 12-tap phases of one interpolation filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    phases: [[f64; FILTER_SIZE]; PHASES],
}

impl FilterBank {
    const fn from_stored_phases(phase0: &[f64; FILTER_SIZE], phase1: &[f64; FILTER_SIZE]) -> Self {
        Self {
            phases: [*phase0, *phase1, reversed(phase1), reversed(phase0)],
        }
    }

    /// Taps of one phase (`0..PHASES`)
    ///
    /// # Panics
    /// Panics if `phase >= PHASES`.
    pub fn phase(&self, phase: usize) -> &[f64; FILTER_SIZE] {
        &self.phases[phase]
    }

    /// All four phases in order
    pub fn phases(&self) -> &[[f64; FILTER_SIZE]; PHASES] {
        &self.phases
    }

    /// Largest absolute tap across all phases
    ///
    /// This is the true peak a single unit impulse produces once it has
    /// travelled through the whole history.
    pub fn max_abs_tap(&self) -> f64 {
        self.phases
            .iter()
            .flatten()
            .fold(0.0_f64, |max, tap| max.max(tap.abs()))
    }
}

const fn reversed(taps: &[f64; FILTER_SIZE]) -> [f64; FILTER_SIZE] {
    let mut out = [0.0; FILTER_SIZE];
    let mut i = 0;
    while i < FILTER_SIZE {
        out[i] = taps[FILTER_SIZE - 1 - i];
        i += 1;
    }
    out
}
