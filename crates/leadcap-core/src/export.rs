use std::sync::Arc;

use crate::{error::CoreError, lead::Lead};

pub const CSV_HEADERS: [&str; 16] = [
    "ID",
    "Date",
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Studio",
    "UTM Source",
    "UTM Medium",
    "UTM Campaign",
    "UTM Content",
    "UTM Term",
    "Google Click ID",
    "Facebook Click ID",
    "Landing Page",
    "Referrer",
];

/// Render leads as CSV, one row per lead in store order.
///
/// Every cell is quoted and every row, the header included, ends in `\n`.
/// Embedded quotes are doubled.
pub fn to_csv(leads: &[Arc<Lead>]) -> Result<String, CoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(leads.len().saturating_mul(256)));

    wtr.write_record(CSV_HEADERS)?;

    for lead in leads {
        let id = lead.id.to_string();
        let date = lead.iso_timestamp();
        wtr.write_record([
            id.as_str(),
            date.as_str(),
            lead.first_name.as_str(),
            lead.last_name.as_str(),
            lead.email.as_str(),
            lead.phone_number.as_str(),
            lead.center.as_str(),
            lead.utm_source.as_str(),
            lead.utm_medium.as_str(),
            lead.utm_campaign.as_str(),
            lead.utm_content.as_str(),
            lead.utm_term.as_str(),
            lead.gclid.as_str(),
            lead.fbclid.as_str(),
            lead.landing_page.as_str(),
            lead.referrer.as_str(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| CoreError::CsvFlush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
