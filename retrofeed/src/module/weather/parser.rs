///! api.weather.gov JSON parsers
///!
///! Measurements arrive in SI units with WMO unit codes and are converted
///! to display strings here.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use retrofeed_common::ForecastPeriod;
use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::feed::clock::format_time;

const NOT_AVAILABLE: &str = "N/A";

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// What `/points/{lat},{lon}` tells us about a location
#[derive(Debug, Clone, PartialEq)]
pub struct PointInfo {
    pub forecast_url: String,
    pub stations_url: String,
    /// "City, ST" of the nearest named place
    pub place: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    forecast: String,
    observation_stations: String,
    relative_location: Option<RelativeLocation>,
}

#[derive(Debug, Deserialize)]
struct RelativeLocation {
    properties: Place,
}

#[derive(Debug, Deserialize)]
struct Place {
    city: String,
    state: String,
}

pub fn parse_point(json: &str) -> Result<PointInfo> {
    let resp: PointResponse =
        serde_json::from_str(json).context("Failed to deserialize point JSON")?;
    let props = resp.properties;
    Ok(PointInfo {
        forecast_url: props.forecast,
        stations_url: props.observation_stations,
        place: props
            .relative_location
            .map(|r| format!("{}, {}", r.properties.city, r.properties.state)),
    })
}

#[derive(Debug, Deserialize)]
struct FeatureCollection<T> {
    features: Vec<Feature<T>>,
}

#[derive(Debug, Deserialize)]
struct Feature<T> {
    id: Option<String>,
    properties: T,
}

/// URL of the nearest station; the list is sorted by distance
pub fn parse_stations(json: &str) -> Result<String> {
    let resp: FeatureCollection<IgnoredAny> =
        serde_json::from_str(json).context("Failed to deserialize station list")?;
    resp.features
        .into_iter()
        .find_map(|f| f.id)
        .context("No observation stations near this point")
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Measurement {
    value: Option<f64>,
    #[serde(default)]
    unit_code: String,
}

impl Measurement {
    fn speed_mph(&self) -> Option<f64> {
        let v = self.value?;
        Some(match self.unit_code.as_str() {
            "wmoUnit:m_s-1" => v * 2.236_936,
            "wmoUnit:km_h-1" => v * 0.621_371,
            _ => v,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ObservationResponse {
    properties: ObservationProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObservationProperties {
    timestamp: String,
    text_description: Option<String>,
    // Stations that lack a sensor leave the field out entirely
    #[serde(default)]
    temperature: Measurement,
    #[serde(default)]
    dewpoint: Measurement,
    #[serde(default)]
    wind_direction: Measurement,
    #[serde(default)]
    wind_speed: Measurement,
    #[serde(default)]
    visibility: Measurement,
}

/// Current conditions as display strings
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub last_update: String,
    pub currently: String,
    pub temp_f: String,
    pub temp_c: String,
    pub wind_speed: String,
    pub visibility: String,
    pub dewpoint: String,
    pub comfort: String,
}

fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn compass_point(degrees: f64) -> &'static str {
    let index = (degrees.rem_euclid(360.0) / 22.5 + 0.5) as usize % 16;
    COMPASS[index]
}

/// How muggy a dewpoint (°F) feels
pub fn comfort_label(dewpoint_f: f64) -> &'static str {
    if dewpoint_f < 55.0 {
        "(dry)"
    } else if dewpoint_f < 60.0 {
        "(comfortable)"
    } else if dewpoint_f < 65.0 {
        "(sticky)"
    } else {
        "(oppressive)"
    }
}

fn format_wind(direction: Option<f64>, mph: Option<f64>) -> String {
    match (direction, mph) {
        (_, Some(mph)) if mph.round() == 0.0 => "Calm".to_string(),
        (Some(deg), Some(mph)) => format!("{} {:.0} mph", compass_point(deg), mph),
        (None, Some(mph)) => format!("{:.0} mph", mph),
        (_, None) => NOT_AVAILABLE.to_string(),
    }
}

fn format_visibility(meters: Option<f64>) -> String {
    match meters {
        Some(m) => {
            let miles = m / 1609.344;
            if miles < 1.0 {
                format!("{:.1} miles", miles)
            } else {
                format!("{:.0} miles", miles)
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn parse_observation(json: &str) -> Result<Conditions> {
    let resp: ObservationResponse =
        serde_json::from_str(json).context("Failed to deserialize observation JSON")?;
    let obs = resp.properties;

    let observed = DateTime::parse_from_rfc3339(&obs.timestamp)
        .with_context(|| format!("Bad observation timestamp '{}'", obs.timestamp))?
        .with_timezone(&Local);

    let temp_c = obs.temperature.value;
    let dewpoint_f = obs.dewpoint.value.map(c_to_f);

    Ok(Conditions {
        last_update: format_time(&observed),
        currently: obs
            .text_description
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        temp_f: temp_c.map_or(NOT_AVAILABLE.to_string(), |c| format!("{:.0}°F", c_to_f(c))),
        temp_c: temp_c.map_or(NOT_AVAILABLE.to_string(), |c| format!("{:.0}°C", c)),
        wind_speed: format_wind(obs.wind_direction.value, obs.wind_speed.speed_mph()),
        visibility: format_visibility(obs.visibility.value),
        dewpoint: dewpoint_f.map_or(NOT_AVAILABLE.to_string(), |f| format!("{:.0}°F", f)),
        comfort: dewpoint_f.map_or("", comfort_label).to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<RawPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    name: String,
    detailed_forecast: String,
}

pub fn parse_forecast(json: &str) -> Result<Vec<ForecastPeriod>> {
    let resp: ForecastResponse =
        serde_json::from_str(json).context("Failed to deserialize forecast JSON")?;
    Ok(resp
        .properties
        .periods
        .into_iter()
        .map(|p| ForecastPeriod {
            timeframe: p.name,
            forecast: p.detailed_forecast,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct AlertProperties {
    event: String,
}

/// Active alert event names, duplicates removed
pub fn parse_alerts(json: &str) -> Result<Vec<String>> {
    let resp: FeatureCollection<AlertProperties> =
        serde_json::from_str(json).context("Failed to deserialize alerts JSON")?;
    let mut events: Vec<String> = Vec::new();
    for feature in resp.features {
        if !events.contains(&feature.properties.event) {
            events.push(feature.properties.event);
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT: &str = r#"{"id":"https://api.weather.gov/points/45.52,-122.68","properties":{
        "gridId":"PQR","gridX":112,"gridY":103,
        "forecast":"https://api.weather.gov/gridpoints/PQR/112,103/forecast",
        "observationStations":"https://api.weather.gov/gridpoints/PQR/112,103/stations",
        "relativeLocation":{"type":"Feature","properties":{"city":"Portland","state":"OR",
            "distance":{"unitCode":"wmoUnit:m","value":1243.5}}}}}"#;

    const STATIONS: &str = r#"{"type":"FeatureCollection","features":[
        {"id":"https://api.weather.gov/stations/KPDX","properties":{"stationIdentifier":"KPDX","name":"Portland International Airport"}},
        {"id":"https://api.weather.gov/stations/KTTD","properties":{"stationIdentifier":"KTTD","name":"Troutdale Airport"}}
    ]}"#;

    const OBSERVATION: &str = r#"{"properties":{
        "timestamp":"2026-06-10T15:53:00+00:00",
        "textDescription":"Light Rain",
        "temperature":{"unitCode":"wmoUnit:degC","value":11.1},
        "dewpoint":{"unitCode":"wmoUnit:degC","value":9.4},
        "windDirection":{"unitCode":"wmoUnit:degree_(angle)","value":225},
        "windSpeed":{"unitCode":"wmoUnit:km_h-1","value":14.76},
        "visibility":{"unitCode":"wmoUnit:m","value":11270}
    }}"#;

    const FORECAST: &str = r#"{"properties":{"periods":[
        {"number":1,"name":"Tonight","detailedForecast":"Rain likely. Low around 44."},
        {"number":2,"name":"Wednesday","detailedForecast":"Showers. High near 55."}
    ]}}"#;

    const ALERTS: &str = r#"{"features":[
        {"id":"a","properties":{"event":"Wind Advisory","headline":"Wind Advisory issued June 10"}},
        {"id":"b","properties":{"event":"Flood Watch","headline":"Flood Watch issued June 10"}},
        {"id":"c","properties":{"event":"Wind Advisory","headline":"Wind Advisory updated June 10"}}
    ]}"#;

    #[test]
    fn test_parse_point() {
        let point = parse_point(POINT).unwrap();
        assert_eq!(point.forecast_url, "https://api.weather.gov/gridpoints/PQR/112,103/forecast");
        assert_eq!(point.stations_url, "https://api.weather.gov/gridpoints/PQR/112,103/stations");
        assert_eq!(point.place.as_deref(), Some("Portland, OR"));
    }

    #[test]
    fn test_parse_stations_picks_nearest() {
        assert_eq!(parse_stations(STATIONS).unwrap(), "https://api.weather.gov/stations/KPDX");
        assert!(parse_stations(r#"{"features":[]}"#).is_err());
    }

    #[test]
    fn test_parse_observation() {
        let conditions = parse_observation(OBSERVATION).unwrap();
        let observed = DateTime::parse_from_rfc3339("2026-06-10T15:53:00+00:00")
            .unwrap()
            .with_timezone(&Local);

        assert_eq!(conditions.last_update, format_time(&observed));
        assert_eq!(conditions.currently, "Light Rain");
        assert_eq!(conditions.temp_f, "52°F");
        assert_eq!(conditions.temp_c, "11°C");
        assert_eq!(conditions.wind_speed, "SW 9 mph");
        assert_eq!(conditions.visibility, "7 miles");
        assert_eq!(conditions.dewpoint, "49°F");
        assert_eq!(conditions.comfort, "(dry)");
    }

    #[test]
    fn test_parse_observation_with_gaps() {
        let json = r#"{"properties":{
            "timestamp":"2026-06-10T15:53:00+00:00",
            "textDescription":"",
            "temperature":{"unitCode":"wmoUnit:degC","value":null},
            "dewpoint":{"unitCode":"wmoUnit:degC","value":null},
            "windDirection":{"unitCode":"wmoUnit:degree_(angle)","value":null},
            "windSpeed":{"unitCode":"wmoUnit:km_h-1","value":0},
            "visibility":{"unitCode":"wmoUnit:m","value":null}
        }}"#;
        let conditions = parse_observation(json).unwrap();
        assert_eq!(conditions.currently, "N/A");
        assert_eq!(conditions.temp_f, "N/A");
        assert_eq!(conditions.wind_speed, "Calm");
        assert_eq!(conditions.visibility, "N/A");
        assert_eq!(conditions.comfort, "");
    }

    #[test]
    fn test_comfort_label_bands() {
        assert_eq!(comfort_label(40.0), "(dry)");
        assert_eq!(comfort_label(55.0), "(comfortable)");
        assert_eq!(comfort_label(62.0), "(sticky)");
        assert_eq!(comfort_label(65.0), "(oppressive)");
    }

    #[test]
    fn test_compass_point() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(350.0), "N");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(200.0), "SSW");
        assert_eq!(compass_point(-45.0), "NW");
    }

    #[test]
    fn test_parse_forecast_and_alerts() {
        let periods = parse_forecast(FORECAST).unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].timeframe, "Tonight");
        assert_eq!(periods[1].forecast, "Showers. High near 55.");

        assert_eq!(parse_alerts(ALERTS).unwrap(), vec!["Wind Advisory", "Flood Watch"]);
        assert!(parse_alerts(r#"{"features":[]}"#).unwrap().is_empty());
    }
}
