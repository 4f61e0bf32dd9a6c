use std::fmt;

use strum::{Display, EnumString};

use super::engine::RawDistances;

/// Tailwind component beyond this is corrected as if it were exactly this,
/// per the flight manual.
pub const MAX_TAILWIND_KT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum RunwaySurface {
    Paved,
    Grass,
}

/// Non-fatal conditions surfaced alongside a successful result.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    TailwindClamped { requested_kt: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::TailwindClamped { requested_kt } => write!(
                f,
                "tailwind of {requested_kt} kt entered, correction limited to \
                 {MAX_TAILWIND_KT} kt as per manual"
            ),
        }
    }
}

/// Corrected distances, rounded to the nearest whole meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeoffDistances {
    pub ground_roll_m: i64,
    pub distance_50ft_m: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corrections {
    pub wind_kt: f64,
    pub surface: RunwaySurface,
    pub slope_percent: f64,
}

impl Corrections {
    /// Applies wind, runway surface and slope corrections, in that order.
    /// Wind scales both distances; surface and slope scale the ground roll
    /// only.
    pub fn apply(&self, raw: RawDistances) -> (TakeoffDistances, Vec<Advisory>) {
        let mut ground_roll_m = raw.ground_roll_m;
        let mut distance_50ft_m = raw.distance_50ft_m;
        let mut advisories = Vec::new();

        if self.wind_kt > 0.0 {
            let factor = (self.wind_kt / 9.0) * 0.10;
            ground_roll_m *= 1.0 - factor;
            distance_50ft_m *= 1.0 - factor;
        } else if self.wind_kt < 0.0 {
            let mut tailwind_kt = self.wind_kt.abs();
            if tailwind_kt > MAX_TAILWIND_KT {
                advisories.push(Advisory::TailwindClamped {
                    requested_kt: tailwind_kt,
                });
                tailwind_kt = MAX_TAILWIND_KT;
            }
            let factor = (tailwind_kt / 2.0) * 0.10;
            ground_roll_m *= 1.0 + factor;
            distance_50ft_m *= 1.0 + factor;
        }

        ground_roll_m *= match self.surface {
            RunwaySurface::Paved => 0.9,
            RunwaySurface::Grass => 1.15,
        };

        ground_roll_m *= 1.0 + self.slope_percent * 0.07;

        (
            TakeoffDistances {
                ground_roll_m: ground_roll_m.round_ties_even() as i64,
                distance_50ft_m: distance_50ft_m.round_ties_even() as i64,
            },
            advisories,
        )
    }
}
