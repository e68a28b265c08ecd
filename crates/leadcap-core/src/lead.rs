use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Raw submitted object, as received at `POST /api/leads`.
pub type LeadFields = Map<String, Value>;

/// A stored form submission.
///
/// Known fields are always present as strings (empty when not submitted).
/// Anything else the client sent is kept in `extra`, in submission order, and
/// flattened back into the JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub id: i64,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    /// Preferred class time.
    pub time: String,
    /// Studio location.
    pub center: String,
    /// Class type. Wire name is `type`.
    #[serde(rename = "type")]
    pub lead_type: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub utm_content: String,
    pub utm_term: String,
    pub gclid: String,
    pub fbclid: String,
    pub msclkid: String,
    pub ttclid: String,
    pub landing_page: String,
    pub referrer: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    /// Build a lead from a submitted object.
    ///
    /// Known keys are coerced with [`field_text`]; submitted `id` and
    /// `timestamp` keys are dropped so the server-assigned values win.
    pub fn from_fields(id: i64, timestamp: DateTime<Utc>, fields: LeadFields) -> Self {
        let mut lead = Self::blank(id, timestamp);
        for (key, value) in fields {
            if key == "id" || key == "timestamp" {
                continue;
            }
            if let Some(slot) = lead.known_field_mut(&key) {
                *slot = field_text(value);
            } else {
                lead.extra.insert(key, value);
            }
        }
        lead
    }

    fn known_field_mut(&mut self, key: &str) -> Option<&mut String> {
        let slot = match key {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "email" => &mut self.email,
            "phoneNumber" => &mut self.phone_number,
            "time" => &mut self.time,
            "center" => &mut self.center,
            "type" => &mut self.lead_type,
            "utm_source" => &mut self.utm_source,
            "utm_medium" => &mut self.utm_medium,
            "utm_campaign" => &mut self.utm_campaign,
            "utm_content" => &mut self.utm_content,
            "utm_term" => &mut self.utm_term,
            "gclid" => &mut self.gclid,
            "fbclid" => &mut self.fbclid,
            "msclkid" => &mut self.msclkid,
            "ttclid" => &mut self.ttclid,
            "landing_page" => &mut self.landing_page,
            "referrer" => &mut self.referrer,
            _ => return None,
        };
        Some(slot)
    }

    fn blank(id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            timestamp,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            time: String::new(),
            center: String::new(),
            lead_type: String::new(),
            utm_source: String::new(),
            utm_medium: String::new(),
            utm_campaign: String::new(),
            utm_content: String::new(),
            utm_term: String::new(),
            gclid: String::new(),
            fbclid: String::new(),
            msclkid: String::new(),
            ttclid: String::new(),
            landing_page: String::new(),
            referrer: String::new(),
            extra: Map::new(),
        }
    }

    /// `firstName lastName`, joined with a single space even when a part is empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Ingestion time as ISO-8601 UTC with millisecond precision.
    pub fn iso_timestamp(&self) -> String {
        iso_millis(&self.timestamp)
    }
}

/// Render a submitted JSON value as the text stored on a known field.
///
/// Strings pass through verbatim, `null` becomes empty, and every other value
/// is stored as its compact JSON text.
pub fn field_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn iso_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&iso_millis(ts))
}
