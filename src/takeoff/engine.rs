use log::debug;

use crate::math::interp::{bracket, lerp};

use super::{
    corrections::{Advisory, Corrections, RunwaySurface, TakeoffDistances},
    table::{Error, Measurement, PerformanceTable, TEMPERATURE_GRID_C, TableSet},
};

#[derive(Debug, Clone, PartialEq)]
pub struct TakeoffQuery {
    pub weight_kg: f64,
    pub pressure_altitude_ft: f64,
    pub temperature_c: f64,
    /// Positive for headwind, negative for tailwind.
    pub wind_kt: f64,
    pub surface: RunwaySurface,
    /// Fractional percent, 1.0 for a 1% upslope.
    pub slope_percent: f64,
}

/// Interpolated distances before any correction is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDistances {
    pub ground_roll_m: f64,
    pub distance_50ft_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TakeoffReport {
    pub distances: TakeoffDistances,
    pub advisories: Vec<Advisory>,
}

impl TableSet {
    /// Trilinear interpolation of the charted distances at an arbitrary
    /// (weight, pressure altitude, temperature) point. Each axis is
    /// collapsed in turn: temperature, then altitude, then weight.
    pub fn raw_distances(
        &self,
        weight_kg: f64,
        pressure_altitude_ft: f64,
        temperature_c: f64,
    ) -> Result<RawDistances, Error> {
        let weights = self.weights_kg();
        let (weight_lo, weight_hi) =
            bracket(&weights, weight_kg).ok_or(Error::NoWeightClasses)?;
        let low = self.table_for(weight_lo).ok_or(Error::NoWeightClasses)?;
        let high = self.table_for(weight_hi).ok_or(Error::NoWeightClasses)?;

        // Both tables are queried at the same altitude pair, so the bracket
        // is taken over the altitudes they have in common.
        let shared_altitudes: Vec<f64> = low
            .altitudes_ft()
            .iter()
            .copied()
            .filter(|a| high.altitudes_ft().contains(a))
            .collect();
        let alt_bracket =
            bracket(&shared_altitudes, pressure_altitude_ft).ok_or(Error::DisjointAltitudeGrids {
                low_kg: weight_lo,
                high_kg: weight_hi,
            })?;

        let temp_bracket = bracket(&TEMPERATURE_GRID_C, temperature_c).ok_or(Error::EmptyGrid {
            axis: "temperature",
        })?;

        debug!(
            "interpolating between {weight_lo} and {weight_hi} kg, altitudes {:?} ft, temperatures {:?} °C",
            alt_bracket, temp_bracket
        );

        let mut interpolated = [0.0; 2];
        for (out, measurement) in interpolated
            .iter_mut()
            .zip([Measurement::GroundRoll, Measurement::Distance50ft])
        {
            let v_lo = collapse(
                low,
                measurement,
                pressure_altitude_ft,
                temperature_c,
                alt_bracket,
                temp_bracket,
            )?;
            let v_hi = collapse(
                high,
                measurement,
                pressure_altitude_ft,
                temperature_c,
                alt_bracket,
                temp_bracket,
            )?;
            *out = lerp(v_lo, v_hi, weight_lo, weight_hi, weight_kg);
        }

        Ok(RawDistances {
            ground_roll_m: interpolated[0],
            distance_50ft_m: interpolated[1],
        })
    }

    /// Full computation: interpolate the raw distances, then apply the
    /// correction pipeline. Advisories never abort the computation; any
    /// lookup failure does, with no partial result.
    pub fn takeoff_distances(&self, query: &TakeoffQuery) -> Result<TakeoffReport, Error> {
        let raw = self.raw_distances(
            query.weight_kg,
            query.pressure_altitude_ft,
            query.temperature_c,
        )?;

        let corrections = Corrections {
            wind_kt: query.wind_kt,
            surface: query.surface,
            slope_percent: query.slope_percent,
        };
        let (distances, advisories) = corrections.apply(raw);

        Ok(TakeoffReport {
            distances,
            advisories,
        })
    }
}

/// Collapses the temperature axis at both bracket altitudes, then the
/// altitude axis, yielding one scalar for this table and measurement.
fn collapse(
    table: &PerformanceTable,
    measurement: Measurement,
    pressure_altitude_ft: f64,
    temperature_c: f64,
    (alt_lo, alt_hi): (f64, f64),
    (temp_lo, temp_hi): (f64, f64),
) -> Result<f64, Error> {
    let at_altitude = |altitude_ft: f64| -> Result<f64, Error> {
        let v_lo = table.lookup(altitude_ft, measurement, temp_lo)?;
        let v_hi = table.lookup(altitude_ft, measurement, temp_hi)?;
        Ok(lerp(v_lo, v_hi, temp_lo, temp_hi, temperature_c))
    };

    Ok(lerp(
        at_altitude(alt_lo)?,
        at_altitude(alt_hi)?,
        alt_lo,
        alt_hi,
        pressure_altitude_ft,
    ))
}
