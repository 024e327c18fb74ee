//! Request-scoped summaries and their text rendering.

use std::fmt;

use serde_json::Number;

use crate::types::{DailyForecast, DailyForecastResponse, Location, Observation};

/// Rendered in place of any field the upstream left out.
pub const PLACEHOLDER: &str = "N/A";

/// Headline text used when the forecast carries none.
pub const NO_HEADLINE: &str = "No headline";

/// Result text when a city search matches nothing.
pub const NO_LOCATION_FOUND: &str = "No location found.";

/// Result text when current conditions come back empty.
pub const NO_WEATHER_DATA: &str = "No weather data available.";

/// A latitude/longitude pair. Range checks are left to the upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The `q` parameter for geoposition search: plain decimals, comma separated.
    ///
    /// Whole numbers keep one fractional digit (`1.0`, `-0.0`).
    pub fn query(&self) -> String {
        format!("{},{}", decimal(self.latitude), decimal(self.longitude))
    }
}

fn decimal(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// A resolved place and its location key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSummary {
    pub name: Option<String>,
    pub admin_area: Option<String>,
    pub country: Option<String>,
    pub key: Option<String>,
}

impl LocationSummary {
    /// Rendering for reverse geocoding.
    pub fn located(&self) -> String {
        format!(
            "Location: {}, {}, {}. Key: {}",
            Field(&self.name),
            Field(&self.admin_area),
            Field(&self.country),
            Field(&self.key)
        )
    }

    /// Rendering for a search match; the administrative area is omitted.
    pub fn found(&self) -> String {
        format!(
            "Found: {}, {}. Key: {}",
            Field(&self.name),
            Field(&self.country),
            Field(&self.key)
        )
    }
}

impl From<Location> for LocationSummary {
    fn from(location: Location) -> Self {
        Self {
            name: location.localized_name,
            admin_area: location.administrative_area.and_then(|a| a.localized_name),
            country: location.country.and_then(|c| c.localized_name),
            key: location.key,
        }
    }
}

/// A current weather snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSummary {
    pub description: Option<String>,
    pub temp_value: Option<Number>,
    pub temp_unit: Option<String>,
}

impl fmt::Display for ConditionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Current Weather: {}, Temperature: {}°{}",
            Field(&self.description),
            Field(&self.temp_value),
            Field(&self.temp_unit)
        )
    }
}

impl From<Observation> for ConditionSummary {
    fn from(observation: Observation) -> Self {
        let metric = observation.temperature.and_then(|t| t.metric);
        let (temp_value, temp_unit) = match metric {
            Some(m) => (m.value, m.unit),
            None => (None, None),
        };
        Self {
            description: observation.weather_text,
            temp_value,
            temp_unit,
        }
    }
}

/// A multi-day outlook. Days keep the upstream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSummary {
    pub headline: Option<String>,
    pub days: Vec<DailySummary>,
}

impl fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headline = self.headline.as_deref().unwrap_or(NO_HEADLINE);
        write!(f, "Forecast Headline: {headline}")?;
        for day in &self.days {
            write!(f, "\n{day}")?;
        }
        Ok(())
    }
}

impl From<DailyForecastResponse> for ForecastSummary {
    fn from(response: DailyForecastResponse) -> Self {
        Self {
            headline: response.headline.and_then(|h| h.text),
            days: response
                .daily_forecasts
                .unwrap_or_default()
                .into_iter()
                .map(DailySummary::from)
                .collect(),
        }
    }
}

/// One forecast day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySummary {
    /// `YYYY-MM-DD`; the time part of the upstream timestamp is dropped.
    pub date: Option<String>,
    pub phrase: Option<String>,
    pub min_temp: Option<Number>,
    pub max_temp: Option<Number>,
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}: {}, Min: {}°C, Max: {}°C",
            Field(&self.date),
            Field(&self.phrase),
            Field(&self.min_temp),
            Field(&self.max_temp)
        )
    }
}

impl From<DailyForecast> for DailySummary {
    fn from(day: DailyForecast) -> Self {
        let (min_temp, max_temp) = match day.temperature {
            Some(range) => (
                range.minimum.and_then(|m| m.value),
                range.maximum.and_then(|m| m.value),
            ),
            None => (None, None),
        };
        Self {
            date: day.date.as_deref().map(date_part).map(str::to_string),
            phrase: day.day.and_then(|d| d.icon_phrase),
            min_temp,
            max_temp,
        }
    }
}

/// Text before the first `T` of an ISO timestamp; plain dates pass through.
pub fn date_part(timestamp: &str) -> &str {
    timestamp
        .split_once('T')
        .map_or(timestamp, |(date, _)| date)
}

/// Displays the value, or [`PLACEHOLDER`] when absent.
struct Field<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Field<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str(PLACEHOLDER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(json: &str) -> Option<Number> {
        Some(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn date_part_truncates_timestamps() {
        assert_eq!(date_part("2024-05-01T08:00:00"), "2024-05-01");
        assert_eq!(date_part("2024-05-01T07:00:00+07:00"), "2024-05-01");
    }

    #[test]
    fn date_part_is_idempotent() {
        assert_eq!(date_part("2024-05-01"), "2024-05-01");
        assert_eq!(date_part(date_part("2024-05-01T08:00:00")), "2024-05-01");
        assert_eq!(date_part(""), "");
    }

    #[test]
    fn coordinates_query_uses_plain_decimals() {
        assert_eq!(Coordinates::new(-6.2, 106.816666).query(), "-6.2,106.816666");
        assert_eq!(Coordinates::new(0.00001, 12.5).query(), "0.00001,12.5");
    }

    #[test]
    fn coordinates_query_keeps_fraction_on_whole_numbers() {
        assert_eq!(Coordinates::new(1.0, -0.0).query(), "1.0,-0.0");
        assert_eq!(Coordinates::new(-90.0, 180.0).query(), "-90.0,180.0");
    }

    #[test]
    fn location_renders_placeholders() {
        let summary = LocationSummary {
            name: Some("Bandung".into()),
            key: Some("3431644".into()),
            ..Default::default()
        };
        assert_eq!(summary.located(), "Location: Bandung, N/A, N/A. Key: 3431644");
        assert_eq!(summary.found(), "Found: Bandung, N/A. Key: 3431644");
    }

    #[test]
    fn condition_keeps_number_representation() {
        let summary = ConditionSummary {
            description: Some("Partly sunny".into()),
            temp_value: number("20.0"),
            temp_unit: Some("C".into()),
        };
        assert_eq!(
            summary.to_string(),
            "Current Weather: Partly sunny, Temperature: 20.0°C"
        );

        let integral = ConditionSummary {
            temp_value: number("20"),
            ..summary
        };
        assert!(integral.to_string().ends_with("Temperature: 20°C"));
    }

    #[test]
    fn empty_condition_is_all_placeholders() {
        assert_eq!(
            ConditionSummary::default().to_string(),
            "Current Weather: N/A, Temperature: N/A°N/A"
        );
    }

    #[test]
    fn forecast_without_days_is_headline_only() {
        let summary = ForecastSummary::default();
        assert_eq!(summary.to_string(), "Forecast Headline: No headline");
    }

    #[test]
    fn forecast_lines_follow_headline() {
        let summary = ForecastSummary {
            headline: Some("Rain on Thursday".into()),
            days: vec![
                DailySummary {
                    date: Some("2024-05-01".into()),
                    phrase: Some("Thunderstorms".into()),
                    min_temp: number("24.1"),
                    max_temp: number("31.6"),
                },
                DailySummary {
                    date: Some("2024-05-02".into()),
                    ..Default::default()
                },
            ],
        };
        assert_eq!(
            summary.to_string(),
            "Forecast Headline: Rain on Thursday\n\
             - 2024-05-01: Thunderstorms, Min: 24.1°C, Max: 31.6°C\n\
             - 2024-05-02: N/A, Min: N/A°C, Max: N/A°C"
        );
    }
}
