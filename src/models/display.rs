//! Presentation of upstream records for the search views.
//!
//! Records are untyped. Their kind is inferred from which optional fields
//! are present, and only present fields are rendered.

use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const NO_RESULTS_MESSAGE: &str = "No results found for your search.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    Flight,
    Airport,
    Airline,
    Other,
}

impl DisplayKind {
    #[must_use]
    pub fn classify(record: &Value) -> Self {
        if record.get("flight").is_some() {
            Self::Flight
        } else if record.get("airport_name").is_some() {
            Self::Airport
        } else if record.get("airline_name").is_some() {
            Self::Airline
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub kind: DisplayKind,
    pub title: String,
    pub lines: Vec<String>,
}

/// What the results area shows for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Records(Vec<DisplayRecord>),
    /// Shown through the error-message path. An empty result set lands here
    /// too, even though it is not a failure.
    Message(String),
}

impl ResultsView {
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let records: Vec<DisplayRecord> = payload
            .get("data")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(DisplayRecord::from_value).collect())
            .unwrap_or_default();

        if records.is_empty() {
            Self::Message(NO_RESULTS_MESSAGE.to_string())
        } else {
            Self::Records(records)
        }
    }
}

fn text<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn number(value: &Value, field: &str) -> Option<i64> {
    let raw = value.get(field)?;
    raw.as_i64()
        .or_else(|| raw.as_str().and_then(|s| s.trim().parse().ok()))
}

fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn airport_label(name: Option<&str>, code: Option<&str>) -> Option<String> {
    match (name, code) {
        (Some(name), Some(code)) => Some(format!("{name} ({code})")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

fn leg_lines(label: &str, leg: &Value) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(airport) = airport_label(text(leg, "airport"), text(leg, "iata")) {
        lines.push(format!("{label}: {airport}"));
    }
    if let Some(terminal) = text(leg, "terminal") {
        lines.push(format!("  Terminal {terminal}"));
    }
    if let Some(gate) = text(leg, "gate") {
        lines.push(format!("  Gate {gate}"));
    }
    if let Some(scheduled) = text(leg, "scheduled") {
        lines.push(format!("  Scheduled: {}", format_timestamp(scheduled)));
    }
    if let Some(actual) = text(leg, "actual") {
        lines.push(format!("  Actual: {}", format_timestamp(actual)));
    }
    if let Some(delay) = number(leg, "delay") {
        lines.push(format!("  Delay: {delay} min"));
    }

    lines
}

impl DisplayRecord {
    #[must_use]
    pub fn from_value(record: &Value) -> Self {
        let kind = DisplayKind::classify(record);
        match kind {
            DisplayKind::Flight => Self::flight(record),
            DisplayKind::Airport => Self::airport(record),
            DisplayKind::Airline => Self::airline(record),
            DisplayKind::Other => Self {
                kind,
                title: "Result".to_string(),
                lines: Vec::new(),
            },
        }
    }

    fn flight(record: &Value) -> Self {
        let flight = &record["flight"];
        let airline = &record["airline"];

        let code = text(flight, "iata")
            .or_else(|| text(flight, "number"))
            .unwrap_or("Flight");
        let title = match text(airline, "name") {
            Some(name) => format!("{code} · {name}"),
            None => code.to_string(),
        };

        let mut lines = Vec::new();
        if let Some(status) = text(record, "flight_status") {
            lines.push(format!("Status: {status}"));
        }
        if let Some(date) = text(record, "flight_date") {
            lines.push(format!("Date: {date}"));
        }
        if let Some(departure) = record.get("departure").filter(|v| v.is_object()) {
            lines.extend(leg_lines("Departure", departure));
        }
        if let Some(arrival) = record.get("arrival").filter(|v| v.is_object()) {
            lines.extend(leg_lines("Arrival", arrival));
        }

        Self {
            kind: DisplayKind::Flight,
            title,
            lines,
        }
    }

    fn airport(record: &Value) -> Self {
        let title = airport_label(text(record, "airport_name"), text(record, "iata_code"))
            .unwrap_or_else(|| "Airport".to_string());

        let mut lines = Vec::new();
        if let Some(icao) = text(record, "icao_code") {
            lines.push(format!("ICAO: {icao}"));
        }
        if let Some(country) = text(record, "country_name") {
            lines.push(format!("Country: {country}"));
        }
        if let Some(timezone) = text(record, "timezone") {
            lines.push(format!("Timezone: {timezone}"));
        }

        Self {
            kind: DisplayKind::Airport,
            title,
            lines,
        }
    }

    fn airline(record: &Value) -> Self {
        let title = airport_label(text(record, "airline_name"), text(record, "iata_code"))
            .unwrap_or_else(|| "Airline".to_string());

        let mut lines = Vec::new();
        if let Some(callsign) = text(record, "callsign") {
            lines.push(format!("Callsign: {callsign}"));
        }
        if let Some(country) = text(record, "country_name") {
            lines.push(format!("Country: {country}"));
        }
        if let Some(status) = text(record, "status") {
            lines.push(format!("Status: {status}"));
        }

        Self {
            kind: DisplayKind::Airline,
            title,
            lines,
        }
    }
}

impl fmt::Display for DisplayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "• {}", self.title)?;
        for line in &self.lines {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}
