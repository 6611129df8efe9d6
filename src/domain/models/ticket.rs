use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One loosely-typed field of an upstream ticket. The helpdesk API does not
/// commit to a schema, so every value is decoded into this union and the
/// tabulation engine must tolerate missing or extra keys. Nested arrays and
/// objects are flattened to their JSON text rather than rejected.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TicketValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<serde_json::Value> for TicketValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TicketValue::Null,
            serde_json::Value::Bool(b) => TicketValue::Bool(b),
            serde_json::Value::Number(n) => TicketValue::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => TicketValue::Text(s),
            other => TicketValue::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for TicketValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(TicketValue::from(value))
    }
}

pub type TicketRecord = BTreeMap<String, TicketValue>;

/// Sentinel strings the upstream emits for "no value".
const EMPTY_SENTINELS: [&str; 4] = ["", "null", "None", "NaN"];

impl TicketValue {
    /// True for null and for the upstream's stringly empty markers.
    pub fn is_missing(&self) -> bool {
        match self {
            TicketValue::Null => true,
            TicketValue::Text(s) => EMPTY_SENTINELS.contains(&s.as_str()),
            _ => false,
        }
    }

    /// Numeric coercion: numbers pass through, numeric strings parse.
    /// Non-finite results count as unparseable.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            TicketValue::Number(n) => *n,
            TicketValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Renders the value as a CSV cell.
    pub fn to_cell(&self) -> String {
        match self {
            TicketValue::Null => String::new(),
            TicketValue::Bool(b) => b.to_string(),
            TicketValue::Number(n) => format_number(*n),
            TicketValue::Text(s) => s.clone(),
        }
    }
}

/// Whole numbers drop the trailing `.0` so epoch fields survive a
/// spreadsheet round trip.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// The fixed request shape the upstream helpdesk API expects. Every filter
/// field must be present in the payload even when unused.
#[derive(Debug, Clone, Serialize)]
pub struct TicketQuery {
    #[serde(rename = "API")]
    pub api_key: String,
    pub module: String,
    pub date_start: String,
    pub date_end: String,
    pub ticket_id: String,
    pub location: String,
    pub status: String,
    pub source: String,
    pub category: String,
    pub disposition: String,
    pub sub_disposition: String,
    pub comments: String,
    pub created_by: String,
    pub assigned_to: String,
    pub asset_name: String,
}

impl TicketQuery {
    pub fn helpdesk(api_key: &str, date_start_ms: i64, date_end_ms: Option<i64>) -> Self {
        Self {
            api_key: api_key.to_string(),
            module: "Helpdesk".to_string(),
            date_start: date_start_ms.to_string(),
            date_end: date_end_ms.map(|v| v.to_string()).unwrap_or_default(),
            ticket_id: String::new(),
            location: String::new(),
            status: String::new(),
            source: String::new(),
            category: String::new(),
            disposition: String::new(),
            sub_disposition: String::new(),
            comments: String::new(),
            created_by: String::new(),
            assigned_to: String::new(),
            asset_name: String::new(),
        }
    }
}
