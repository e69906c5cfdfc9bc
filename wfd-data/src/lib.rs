//! Derived views over hourly weather records.
//!
//! Both views are rebuilt in full from the current record set on every
//! delivery; nothing here is patched incrementally.
//!
//! - [`day_forecast`] partitions records by local calendar day and computes
//!   per-day statistics.
//! - [`week_series`] reduces the days to one trend point per day for the
//!   selected metric.

pub mod day_forecast;
pub mod week_series;

/// Averaging of compass bearings.
pub mod wind {
    use serde::{Deserialize, Serialize};
    use wfd_utils::numbers::mean;

    /// How a day's "dominant" wind direction is averaged.
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
    pub enum WindDirectionMean {
        /// Plain mean of the bearings. 350° and 10° average to 180°.
        Arithmetic,
        /// Mean of the unit vectors, so 350° and 10° average to 0°.
        #[default]
        Vector,
    }

    impl WindDirectionMean {
        /// Mean bearing in degrees, None when there are no bearings.
        ///
        /// The vector mean is normalized to [0, 360). When the vectors cancel
        /// out there is no meaningful direction and the arithmetic mean is
        /// returned instead.
        pub fn mean(self, directions: &[f64]) -> Option<f64> {
            match self {
                WindDirectionMean::Arithmetic => mean(directions),
                WindDirectionMean::Vector => {
                    if directions.is_empty() {
                        return None;
                    }
                    let (sin, cos) = directions.iter().fold((0.0_f64, 0.0_f64), |(s, c), d| {
                        let rad = d.to_radians();
                        (s + rad.sin(), c + rad.cos())
                    });
                    if sin.hypot(cos) < 1e-9 {
                        return mean(directions);
                    }
                    // rem_euclid yields 360.0 for angles a hair below zero
                    let bearing = sin.atan2(cos).to_degrees().rem_euclid(360.0);
                    Some(if bearing >= 360.0 { 0.0 } else { bearing })
                }
            }
        }
    }

}
