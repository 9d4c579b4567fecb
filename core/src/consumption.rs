//! Air consumption over a square dive profile.
//!
//! All volumes are surface-equivalent liters. Every quantity is kept
//! unrounded; rounding for display happens in [`crate::report`].

use serde::Serialize;

use crate::error::InputError;
use crate::models::{require_positive, StopDepth, StopSchedule};

/// Absolute pressure (bar) at `depth` meters of water.
pub fn absolute_pressure(depth: f64) -> f64 {
    depth / 10.0 + 1.0
}

/// Consumption at one decompression stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopConsumption {
    pub depth: StopDepth,
    pub minutes: u32,
    /// Absolute pressure at the stop (bar)
    pub pressure: f64,
    /// Consumption rate at the stop (L/min)
    pub rate: f64,
    /// Volume used over the whole stop (L)
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consumption {
    /// Absolute pressure at maximum depth (bar)
    pub pressure_max: f64,
    /// Consumption rate at maximum depth (L/min)
    pub rate_at_depth: f64,
    /// Consumption rate at half the maximum depth, used for the ascent (L/min)
    pub rate_at_mid_depth: f64,
    /// Stops actually made, deepest first
    pub stops: Vec<StopConsumption>,
    pub total_stop_minutes: u32,
    pub total_stop_volume: f64,
    pub bottom_volume: f64,
    /// Free ascent time, stops excluded (min)
    pub ascent_time: f64,
    pub ascent_volume: f64,
    /// Total ascent duration: free ascent plus stops (min)
    pub dtr: f64,
    /// Bottom time plus DTR (min)
    pub total_dive_time: f64,
    pub total_volume: f64,
}

/// Compute gas use for `duration` minutes at `depth` followed by an ascent at
/// `ascent_speed` with the given stops.
pub fn compute_consumption(
    depth: f64,
    duration: f64,
    sac: f64,
    ascent_speed: f64,
    schedule: &StopSchedule,
) -> Result<Consumption, InputError> {
    require_positive("depth", depth)?;
    require_positive("duration", duration)?;
    require_positive("sac", sac)?;
    require_positive("ascent_speed", ascent_speed)?;

    let pressure_max = absolute_pressure(depth);
    let rate_at_depth = sac * pressure_max;
    let rate_at_mid_depth = sac * (depth / 20.0 + 1.0);

    let stops: Vec<StopConsumption> = schedule
        .stops()
        .map(|(stop, minutes)| {
            let pressure = absolute_pressure(f64::from(stop.meters()));
            let rate = sac * pressure;
            StopConsumption {
                depth: stop,
                minutes,
                pressure,
                rate,
                volume: rate * f64::from(minutes),
            }
        })
        .collect();
    let total_stop_minutes: u32 = stops.iter().map(|s| s.minutes).sum();
    let total_stop_volume: f64 = stops.iter().map(|s| s.volume).sum();

    let bottom_volume = duration * rate_at_depth;
    let ascent_time = depth / ascent_speed;
    let ascent_volume = ascent_time * rate_at_mid_depth;
    let dtr = ascent_time + f64::from(total_stop_minutes);
    let total_dive_time = duration + dtr;
    let total_volume = total_stop_volume + bottom_volume + ascent_volume;

    Ok(Consumption {
        pressure_max,
        rate_at_depth,
        rate_at_mid_depth,
        stops,
        total_stop_minutes,
        total_stop_volume,
        bottom_volume,
        ascent_time,
        ascent_volume,
        dtr,
        total_dive_time,
        total_volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_stop_dive() {
        let c = compute_consumption(20.0, 30.0, 20.0, 10.0, &StopSchedule::default()).unwrap();
        assert_eq!(c.pressure_max, 3.0);
        assert_eq!(c.rate_at_depth, 60.0);
        assert_eq!(c.rate_at_mid_depth, 40.0);
        assert_eq!(c.ascent_time, 2.0);
        assert_eq!(c.ascent_volume, 80.0);
        assert_eq!(c.bottom_volume, 1800.0);
        assert_eq!(c.total_stop_volume, 0.0);
        assert_eq!(c.total_volume, 1880.0);
        assert_eq!(c.dtr, 2.0);
        assert_eq!(c.total_dive_time, 32.0);
        assert!(c.stops.is_empty());
    }

    #[test]
    fn test_stops_breakdown() {
        let schedule = StopSchedule::new([0, 0, 3, 11, 32]);
        let c = compute_consumption(38.0, 32.0, 20.0, 15.0, &schedule).unwrap();

        assert_eq!(c.stops.len(), 3);
        let nine = &c.stops[0];
        assert_eq!(nine.depth, StopDepth::M9);
        assert!((nine.pressure - 1.9).abs() < 1e-12);
        assert!((nine.rate - 38.0).abs() < 1e-12);
        assert!((nine.volume - 114.0).abs() < 1e-9);

        let three = &c.stops[2];
        assert!((three.volume - 20.0 * 1.3 * 32.0).abs() < 1e-9);

        assert_eq!(c.total_stop_minutes, 46);
        let expected_stops = 38.0 * 3.0 + 20.0 * 1.6 * 11.0 + 20.0 * 1.3 * 32.0;
        assert!((c.total_stop_volume - expected_stops).abs() < 1e-9);

        let ascent_time = 38.0 / 15.0;
        assert!((c.ascent_time - ascent_time).abs() < 1e-12);
        assert!((c.dtr - (ascent_time + 46.0)).abs() < 1e-12);
        assert!((c.total_dive_time - (32.0 + ascent_time + 46.0)).abs() < 1e-12);
        assert!(
            (c.total_volume - (c.bottom_volume + c.ascent_volume + c.total_stop_volume)).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_intermediates_stay_unrounded() {
        // 25 / 9 min of ascent is not a round number; the volume must use it as is.
        let c = compute_consumption(25.0, 10.0, 20.0, 9.0, &StopSchedule::default()).unwrap();
        assert_eq!(c.ascent_volume, (25.0 / 9.0) * c.rate_at_mid_depth);
    }

    #[test]
    fn test_invalid_input() {
        let none = StopSchedule::default();
        assert_eq!(
            compute_consumption(0.0, 30.0, 20.0, 10.0, &none),
            Err(InputError::invalid("depth", 0.0))
        );
        assert_eq!(
            compute_consumption(20.0, -1.0, 20.0, 10.0, &none),
            Err(InputError::invalid("duration", -1.0))
        );
        assert!(compute_consumption(20.0, 30.0, 0.0, 10.0, &none).is_err());
        assert!(compute_consumption(20.0, 30.0, 20.0, 0.0, &none).is_err());
    }

    #[test]
    fn test_absolute_pressure() {
        assert_eq!(absolute_pressure(0.0), 1.0);
        assert_eq!(absolute_pressure(40.0), 5.0);
    }
}
