//! Weather scoring: each factor is a downward parabola around its optimum,
//! floored at -1 and then weighted.

use crate::domain::types::WeatherReport;

/// Shape of a single weather factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor {
    pub width: f64,
    pub optimum: f64,
    pub weight: f64,
}

pub const TEMPERATURE: Factor = Factor { width: 15.0, optimum: 20.0, weight: 0.6 };
pub const HUMIDITY: Factor = Factor { width: 10.0, optimum: 50.0, weight: 0.05 };
pub const WIND_SPEED: Factor = Factor { width: 10.0, optimum: 4.0, weight: 0.05 };
pub const CLOUD_COVER: Factor = Factor { width: 50.0, optimum: 10.0, weight: 0.1 };
pub const RAIN: Factor = Factor { width: 2.5, optimum: 0.0, weight: 0.1 };
pub const SNOW: Factor = Factor { width: 2.5, optimum: 0.0, weight: 0.1 };

/// `max(-(1/width²)·(value-optimum)² + 1, -1) · weight`
pub fn weather_points(width: f64, optimum: f64, weight: f64, value: f64) -> f64 {
    let curve = -(1.0 / width.powi(2)) * (value - optimum).powi(2) + 1.0;
    curve.max(-1.0) * weight
}

impl Factor {
    pub fn points(&self, value: f64) -> f64 {
        weather_points(self.width, self.optimum, self.weight, value)
    }
}

/// Sum of all factor contributions. Missing rain or snow counts as zero.
pub fn weather_score(report: &WeatherReport) -> f64 {
    TEMPERATURE.points(report.temperature)
        + HUMIDITY.points(report.humidity)
        + WIND_SPEED.points(report.wind_speed)
        + CLOUD_COVER.points(report.cloud_cover)
        + RAIN.points(report.rain_1h.unwrap_or(0.0))
        + SNOW.points(report.snow_1h.unwrap_or(0.0))
}
