//! AccuWeather response shapes.
//!
//! Every field is optional: the upstream omits or nulls fields freely, and a
//! missing value is rendered as a placeholder rather than rejected.

use serde::Deserialize;
use serde_json::Number;

/// A location from the geoposition or city search endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct Location {
    pub key: Option<String>,
    pub localized_name: Option<String>,
    pub administrative_area: Option<Named>,
    pub country: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct Named {
    pub localized_name: Option<String>,
}

/// One observation from the current conditions endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct Observation {
    pub weather_text: Option<String>,
    pub temperature: Option<ObservedTemperature>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct ObservedTemperature {
    pub metric: Option<Measurement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct Measurement {
    pub value: Option<Number>,
    pub unit: Option<String>,
}

/// Body of the daily forecast endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct DailyForecastResponse {
    pub headline: Option<Headline>,
    pub daily_forecasts: Option<Vec<DailyForecast>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct Headline {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct DailyForecast {
    pub date: Option<String>,
    pub temperature: Option<TemperatureRange>,
    pub day: Option<DayPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct TemperatureRange {
    pub minimum: Option<Measurement>,
    pub maximum: Option<Measurement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct DayPart {
    pub icon_phrase: Option<String>,
}
