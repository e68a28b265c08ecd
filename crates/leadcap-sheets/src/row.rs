use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use leadcap_core::lead::Lead;

/// Row-1 titles written by `ensure_headers`, columns A through S.
pub const SHEET_HEADERS: [&str; 19] = [
    "Timestamp",
    "First Name",
    "Last Name",
    "Email",
    "Phone Number",
    "Preferred Time",
    "Studio Location",
    "Class Type",
    "UTM Source",
    "UTM Medium",
    "UTM Campaign",
    "UTM Content",
    "UTM Term",
    "Google Click ID",
    "Facebook Click ID",
    "Microsoft Click ID",
    "TikTok Click ID",
    "Landing Page",
    "Referrer",
];

/// A1-notation column span covered by [`SHEET_HEADERS`].
pub const LAST_COLUMN: &str = "S";

/// Build the appended row for `lead`, aligned with [`SHEET_HEADERS`].
pub fn sheet_row(lead: &Lead, timezone: Tz) -> Vec<String> {
    vec![
        format_sheet_timestamp(&lead.timestamp, timezone),
        lead.first_name.clone(),
        lead.last_name.clone(),
        lead.email.clone(),
        lead.phone_number.clone(),
        lead.time.clone(),
        lead.center.clone(),
        lead.lead_type.clone(),
        lead.utm_source.clone(),
        lead.utm_medium.clone(),
        lead.utm_campaign.clone(),
        lead.utm_content.clone(),
        lead.utm_term.clone(),
        lead.gclid.clone(),
        lead.fbclid.clone(),
        lead.msclkid.clone(),
        lead.ttclid.clone(),
        lead.landing_page.clone(),
        lead.referrer.clone(),
    ]
}

/// `d/m/yyyy, h:mm:ss am` in `timezone`, the en-IN short locale format.
pub fn format_sheet_timestamp(ts: &DateTime<Utc>, timezone: Tz) -> String {
    ts.with_timezone(&timezone)
        .format("%-d/%-m/%Y, %-I:%M:%S %P")
        .to_string()
}
