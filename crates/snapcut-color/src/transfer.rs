//! Camera log encodings and their linearization curves.
#![allow(clippy::excessive_precision)]

use serde::{Deserialize, Serialize};

/// Log encoding of a source clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogFormat {
    /// ARRI LogC3 (EI 800).
    LogC,
    /// Sony S-Log3.
    SLog3,
    /// RED Log3G10.
    Log3G10,
    /// Panasonic V-Log.
    VLog,
    /// Kodak Cineon printing density.
    Cineon,
}

// ARRI LogC3, EI 800
const LOGC_A: f32 = 5.555556;
const LOGC_B: f32 = 0.052272;
const LOGC_C: f32 = 0.247190;
const LOGC_D: f32 = 0.385537;
const LOGC_E: f32 = 5.367655;
const LOGC_F: f32 = 0.092809;
const LOGC_CUT: f32 = 0.010591;
const LOGC_E_CUT: f32 = 0.149_651;

// Sony S-Log3
const SLOG3_CUT: f32 = 0.011_25;
const SLOG3_E_CUT: f32 = 0.167_360;

// RED Log3G10
const LOG3G10_A: f32 = 155.975_33;
const LOG3G10_B: f32 = 0.01;
const LOG3G10_C: f32 = 0.224_282;
const LOG3G10_G: f32 = 15.1927;

// Panasonic V-Log
const VLOG_B: f32 = 0.00873;
const VLOG_C: f32 = 0.241514;
const VLOG_D: f32 = 0.598206;
const VLOG_CUT: f32 = 0.01;
const VLOG_E_CUT: f32 = 0.181;

// Cineon: 10-bit black/white code values, 0.002 density per code value,
// negative gamma 0.6.
const CINEON_BLACK_CV: f32 = 95.0;
const CINEON_WHITE_CV: f32 = 685.0;
const CINEON_DENSITY: f32 = 0.002 / 0.6;

fn cineon_black() -> f32 {
    10.0_f32.powf((CINEON_BLACK_CV - CINEON_WHITE_CV) * CINEON_DENSITY)
}

impl LogFormat {
    pub const ALL: [Self; 5] = [Self::LogC, Self::SLog3, Self::Log3G10, Self::VLog, Self::Cineon];

    /// Decode a log-encoded value in [0, 1] to scene linear.
    pub fn to_linear(&self, v: f32) -> f32 {
        match self {
            Self::LogC => {
                if v <= LOGC_E_CUT {
                    (v - LOGC_F) / LOGC_E
                } else {
                    (10.0_f32.powf((v - LOGC_D) / LOGC_C) - LOGC_B) / LOGC_A
                }
            }
            Self::SLog3 => {
                if v >= SLOG3_E_CUT {
                    0.19 * 10.0_f32.powf((v * 1023.0 - 420.0) / 261.5) - 0.01
                } else {
                    (v * 1023.0 - 95.0) * SLOG3_CUT / (171.210_3 - 95.0)
                }
            }
            Self::Log3G10 => {
                if v < 0.0 {
                    v / LOG3G10_G - LOG3G10_B
                } else {
                    (10.0_f32.powf(v / LOG3G10_C) - 1.0) / LOG3G10_A - LOG3G10_B
                }
            }
            Self::VLog => {
                if v < VLOG_E_CUT {
                    (v - 0.125) / 5.6
                } else {
                    10.0_f32.powf((v - VLOG_D) / VLOG_C) - VLOG_B
                }
            }
            Self::Cineon => {
                let black = cineon_black();
                (10.0_f32.powf((v * 1023.0 - CINEON_WHITE_CV) * CINEON_DENSITY) - black)
                    / (1.0 - black)
            }
        }
    }

    /// Encode scene linear back to the log curve.
    pub fn from_linear(&self, x: f32) -> f32 {
        match self {
            Self::LogC => {
                if x <= LOGC_CUT {
                    LOGC_E * x + LOGC_F
                } else {
                    LOGC_C * (LOGC_A * x + LOGC_B).log10() + LOGC_D
                }
            }
            Self::SLog3 => {
                if x >= SLOG3_CUT {
                    (420.0 + 261.5 * ((x + 0.01) / 0.19).log10()) / 1023.0
                } else {
                    (x * (171.210_3 - 95.0) / SLOG3_CUT + 95.0) / 1023.0
                }
            }
            Self::Log3G10 => {
                let x = x + LOG3G10_B;
                if x < 0.0 {
                    x * LOG3G10_G
                } else {
                    LOG3G10_C * (x * LOG3G10_A + 1.0).log10()
                }
            }
            Self::VLog => {
                if x < VLOG_CUT {
                    5.6 * x + 0.125
                } else {
                    VLOG_C * (x + VLOG_B).log10() + VLOG_D
                }
            }
            Self::Cineon => {
                let black = cineon_black();
                let d = (x * (1.0 - black) + black).max(f32::MIN_POSITIVE);
                (d.log10() / CINEON_DENSITY + CINEON_WHITE_CV) / 1023.0
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LogC => "ARRI LogC",
            Self::SLog3 => "Sony S-Log3",
            Self::Log3G10 => "RED Log3G10",
            Self::VLog => "Panasonic V-Log",
            Self::Cineon => "Cineon",
        }
    }
}
