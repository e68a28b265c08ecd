//! Campaign and source views over the lead store.
//!
//! Everything here is a single pass over a snapshot. Nothing is cached; each
//! request recomputes from the current leads.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::lead::Lead;

/// Bucket label for leads without a `utm_campaign`.
pub const NO_CAMPAIGN: &str = "No Campaign";
/// Placeholder for a missing `utm_source` / `utm_medium`.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub campaign: String,
    pub source: String,
    pub medium: String,
    pub count: u64,
    pub leads: Vec<CampaignLead>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignLead {
    pub name: String,
    pub email: String,
    pub date: String,
    pub center: String,
}

/// Group leads by `utm_campaign`, in order of first appearance.
///
/// `source` and `medium` are captured from the first lead seen in each bucket
/// and never updated by later leads.
pub fn campaign_stats(leads: &[Arc<Lead>]) -> Vec<CampaignSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<CampaignSummary> = Vec::new();

    for lead in leads {
        let campaign = or_default(&lead.utm_campaign, NO_CAMPAIGN);
        let slot = *index.entry(campaign).or_insert_with(|| {
            summaries.push(CampaignSummary {
                campaign: campaign.to_string(),
                source: or_default(&lead.utm_source, UNKNOWN).to_string(),
                medium: or_default(&lead.utm_medium, UNKNOWN).to_string(),
                count: 0,
                leads: Vec::new(),
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[slot];
        summary.count += 1;
        summary.leads.push(CampaignLead {
            name: lead.display_name(),
            email: lead.email.clone(),
            date: lead.iso_timestamp(),
            center: lead.center.clone(),
        });
    }

    summaries
}

/// Leads whose `utm_source` contains `query`, ignoring case.
///
/// `google` additionally matches any lead with a `gclid`, and `facebook` any
/// lead with an `fbclid`, whatever their `utm_source` says.
pub fn by_source(leads: &[Arc<Lead>], query: &str) -> Vec<Arc<Lead>> {
    let query = query.to_lowercase();
    leads
        .iter()
        .filter(|lead| {
            lead.utm_source.to_lowercase().contains(&query)
                || (query == "google" && !lead.gclid.is_empty())
                || (query == "facebook" && !lead.fbclid.is_empty())
        })
        .cloned()
        .collect()
}

/// Leads whose `utm_campaign` equals `campaign` exactly.
pub fn by_campaign(leads: &[Arc<Lead>], campaign: &str) -> Vec<Arc<Lead>> {
    leads
        .iter()
        .filter(|lead| lead.utm_campaign == campaign)
        .cloned()
        .collect()
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
