//! Static HTML dashboard rendering.
//!
//! Pure function of the `HistoricalDataset`: no clock, no I/O. The document
//! has three sections in fixed order: current conditions (newest reading),
//! the last 12 readings, and the per-day temperature ranges.
//!
//! Fixed-point cells (temperatures, wind speed in the tables) are rounded to
//! two decimals, half away from zero. An unavailable measurement renders as
//! `N/A` in those cells too; only a non-finite number is a render fault.

use std::fmt::{Display, Write};

use thiserror::Error;

use crate::db::models::{DailyRange, HistoricalDataset, Reading, RecentReading, NOT_AVAILABLE};
use crate::helpers::format_fixed_2dp;

/// Returned instead of a document when there is nothing to show yet.
pub const EMPTY_PLACEHOLDER: &str = "<p>No weather data available.</p>";

/// Written in place of the dashboard when rendering fails.
pub const RENDER_FAILURE_MESSAGE: &str = "Error generating html due to lack of data.";

/// Rows in the 24-hour table.
pub const HOURLY_ROWS: usize = 12;

const ICON_CLEAR: &str = "https://cdn.weatherapi.com/weather/64x64/day/113.png";
const ICON_CLOUDS: &str = "https://cdn.weatherapi.com/weather/64x64/day/116.png";
const ICON_RAIN: &str = "https://cdn.weatherapi.com/weather/64x64/day/302.png";
const ICON_SNOW: &str = "https://cdn.weatherapi.com/weather/64x64/day/338.png";
const ICON_THUNDERSTORM: &str = "https://cdn.weatherapi.com/weather/64x64/day/200.png";

/// Errors that abort rendering. No partial document is produced.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Non-numeric value for '{field}' cannot be formatted as fixed-point")]
    NonNumericMeasurement { field: &'static str },
    #[error("Not enough readings for the 24-hour table: found {found}, need {required}")]
    InsufficientHistory { found: usize, required: usize },
}

/// Map a condition label to its icon URL. Unrecognized labels, including an
/// unavailable condition, get the cloud icon.
pub fn condition_icon_url(condition: &Reading<String>) -> &'static str {
    let Reading::Value(text) = condition else {
        return ICON_CLOUDS;
    };

    match text.as_str() {
        "Clear" => ICON_CLEAR,
        "Clouds" => ICON_CLOUDS,
        "Rain" => ICON_RAIN,
        "Snow" => ICON_SNOW,
        "Thunderstorm" => ICON_THUNDERSTORM,
        other if other.contains("storm") => ICON_THUNDERSTORM,
        _ => ICON_CLOUDS,
    }
}

/// Render the dashboard document.
pub fn render(dataset: &HistoricalDataset) -> Result<String, RenderError> {
    if dataset.is_empty() {
        return Ok(EMPTY_PLACEHOLDER.to_string());
    }

    if dataset.recent.len() < HOURLY_ROWS {
        return Err(RenderError::InsufficientHistory {
            found: dataset.recent.len(),
            required: HOURLY_ROWS,
        });
    }

    let mut html = String::with_capacity(8 * 1024);
    html.push_str(DOCUMENT_HEAD);
    html.push_str("<body>\n<div class=\"container\">\n<h1>Weather Dashboard</h1>\n");

    render_current_conditions(&mut html, &dataset.recent[0]);
    render_hourly_table(&mut html, &dataset.recent[..HOURLY_ROWS])?;
    render_daily_table(&mut html, &dataset.weekly)?;

    html.push_str("</div>\n</body>\n</html>\n");
    Ok(html)
}

/// Render the dashboard, or the fixed failure message if rendering faults.
pub fn render_or_fallback(dataset: &HistoricalDataset) -> String {
    render(dataset).unwrap_or_else(|e| {
        tracing::error!("Error generating html: {}", e);
        RENDER_FAILURE_MESSAGE.to_string()
    })
}

fn render_current_conditions(html: &mut String, latest: &RecentReading) {
    let condition = escape_html(&latest.condition_text.to_string());

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<div id="current-conditions">
<div>
<img id="condition-icon" src="{icon}" alt="{condition}">
<p>{condition}</p>
</div>
<div>
<p id="temperature">{temperature}</p>
<p>Temperature</p>
</div>
<div>
<p id="humidity">{humidity}</p>
<p>Humidity</p>
</div>
<div>
<p id="wind">{wind}</p>
<p>Wind</p>
</div>
<div>
<p id="pressure">{pressure}</p>
<p>Pressure</p>
</div>
</div>
"#,
        icon = condition_icon_url(&latest.condition_text),
        temperature = decimal_with_unit(&latest.temperature_c, "°C"),
        humidity = with_unit(&latest.humidity_pct, "%"),
        wind = decimal_with_unit(&latest.wind_speed_ms, " m/s"),
        pressure = with_unit(&latest.pressure_mbar, " mbar"),
    );
}

fn render_hourly_table(html: &mut String, readings: &[RecentReading]) -> Result<(), RenderError> {
    html.push_str(
        "<div class=\"historical-data\">\n\
         <h2>Weather History for the Previous 24 Hours</h2>\n\
         <table>\n\
         <tr><th>Date</th><th>Time</th><th>Temperature</th><th>Humidity</th>\
         <th>Wind</th><th>Pressure</th><th>Condition</th></tr>\n",
    );

    for reading in readings {
        let temperature = fixed_cell(&reading.temperature_c, "temperature_c", "°C")?;
        let wind = fixed_cell(&reading.wind_speed_ms, "wind_speed_ms", " m/s")?;

        let _ = writeln!(
            html,
            "<tr class=\"hourly-row\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td></tr>",
            reading.recorded_at.format("%Y-%m-%d"),
            reading.recorded_at.format("%H:%M:%S"),
            temperature,
            with_unit(&reading.humidity_pct, "%"),
            wind,
            with_unit(&reading.pressure_mbar, " mbar"),
            escape_html(&reading.condition_text.to_string()),
        );
    }

    html.push_str("</table>\n</div>\n");
    Ok(())
}

fn render_daily_table(html: &mut String, days: &[DailyRange]) -> Result<(), RenderError> {
    html.push_str(
        "<div class=\"historical-data\">\n\
         <h2>Weather History for the Previous 7 Days</h2>\n\
         <table>\n\
         <tr><th>Date</th><th>Minimum Temperature</th><th>Maximum Temperature</th></tr>\n",
    );

    for day in days {
        let min = fixed_cell(&day.min_temperature_c, "min_temperature_c", "°C")?;
        let max = fixed_cell(&day.max_temperature_c, "max_temperature_c", "°C")?;

        let _ = writeln!(
            html,
            "<tr class=\"daily-row\"><td>{}</td><td>{}</td><td>{}</td></tr>",
            day.day.format("%Y-%m-%d"),
            min,
            max,
        );
    }

    html.push_str("</table>\n</div>\n");
    Ok(())
}

/// Verbatim value followed by its unit, or `N/A` alone.
fn with_unit<T: Display>(reading: &Reading<T>, unit: &str) -> String {
    match reading {
        Reading::Value(v) => format!("{}{}", v, unit),
        Reading::Unavailable => NOT_AVAILABLE.to_string(),
    }
}

/// Float value that always keeps a decimal point (`21.0°C`, not `21°C`),
/// or `N/A` alone.
fn decimal_with_unit(reading: &Reading<f64>, unit: &str) -> String {
    match reading {
        Reading::Value(v) if v.is_finite() && v.fract() == 0.0 => format!("{:.1}{}", v, unit),
        _ => with_unit(reading, unit),
    }
}

/// Two-decimal value followed by its unit, or `N/A` alone.
fn fixed_cell(
    reading: &Reading<f64>,
    field: &'static str,
    unit: &str,
) -> Result<String, RenderError> {
    match reading {
        Reading::Value(v) => format_fixed_2dp(*v)
            .map(|s| format!("{}{}", s, unit))
            .ok_or(RenderError::NonNumericMeasurement { field }),
        Reading::Unavailable => Ok(NOT_AVAILABLE.to_string()),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const DOCUMENT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Weather Dashboard</title>
<style>
body {
    font-family: sans-serif;
    background-color: #f0f0f0;
    margin: 0;
    padding: 0;
    display: flex;
    justify-content: center;
    align-items: center;
    min-height: 100vh;
}
.container {
    width: 90%;
    max-width: 800px;
    background-color: #fff;
    padding: 20px;
    border-radius: 8px;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
}
h1 {
    text-align: center;
    color: #555;
}
#current-conditions {
    display: flex;
    justify-content: space-around;
    align-items: center;
    margin-bottom: 20px;
    border-bottom: 1px solid #ddd;
    padding-bottom: 20px;
}
#current-conditions div {
    text-align: center;
}
#temperature {
    font-size: 2em;
    color: #e67e22;
}
#humidity, #wind, #pressure {
    font-size: 2em;
    color: #000;
}
#condition-icon {
    width: 100px;
    height: 100px;
    margin: 0 auto;
}
.historical-data {
    margin-top: 20px;
}
table {
    width: 100%;
    border-collapse: collapse;
    margin-top: 10px;
}
th, td {
    padding: 8px;
    border-bottom: 1px solid #ddd;
    text-align: center;
}
th {
    background-color: #f0f0f0;
}
@media (max-width: 600px) {
    #current-conditions {
        flex-direction: column;
    }
    table {
        display: block;
        overflow-x: auto;
    }
}
</style>
</head>
"#;
