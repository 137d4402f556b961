//! # Walkcast workspace
//!
//! Umbrella package for the walk-forward forecasting crates.
//!
//! - [`series_math`]: moving averages, additive decomposition and the
//!   regression estimators
//! - [`walk_forecast`]: data loading, feature construction and the
//!   walk-forward loop
//! - [`walkcast`]: application context, chart rendering and the command line
//!
//! ## Example
//!
//! ```
//! use walkcast_workspace::walk_forecast::config::{HORIZON_DAYS, SEASONAL_PERIOD};
//!
//! assert_eq!(SEASONAL_PERIOD, 12);
//! assert_eq!(HORIZON_DAYS, 30);
//! ```

pub use series_math;
pub use walk_forecast;
pub use walkcast;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_crates_are_reachable() {
        let config = walkcast::AppConfig::default();
        assert_eq!(config.forecast, walk_forecast::ForecastConfig::default());
        assert_eq!(
            config.forecast.boundary,
            series_math::BoundaryPolicy::Extrapolate
        );
    }
}
