//! Conversion of raw Gamma records into canonical markets
//!
//! Normalization never fails. A sub-field that cannot be parsed is zeroed
//! (empty list, missing end date) and reported, the rest of the record is
//! kept: a partially populated market is more useful than none.

use polyfetch_core::parse::{log_degradation, parse_end_date, parse_json_string_array};
use polyfetch_core::{Market, Parsed};
use std::fmt;

use crate::types::GammaMarket;

/// A field that could not be parsed and was replaced by its zero value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedField {
    Outcomes,
    OutcomePrices,
    EndDate,
}

impl DegradedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradedField::Outcomes => "outcomes",
            DegradedField::OutcomePrices => "outcomePrices",
            DegradedField::EndDate => "endDate",
        }
    }
}

impl fmt::Display for DegradedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a raw record, logging every degraded field
pub fn normalize(raw: &GammaMarket) -> Market {
    let (market, degraded) = normalize_with_report(raw);
    for field in degraded {
        log_degradation(field.as_str(), &market.id);
    }
    market
}

/// Convert a raw record and report which fields were degraded
pub fn normalize_with_report(raw: &GammaMarket) -> (Market, Vec<DegradedField>) {
    let mut degraded = Vec::new();

    let outcomes = track(
        &mut degraded,
        DegradedField::Outcomes,
        parse_json_string_array(raw.outcomes.as_deref()),
    );
    let outcome_prices = track(
        &mut degraded,
        DegradedField::OutcomePrices,
        parse_json_string_array(raw.outcome_prices.as_deref()),
    );

    // endDateIso is authoritative; endDate only fills in when it is blank
    let date_field = raw
        .end_date_iso
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(raw.end_date.as_deref());
    let end_date = track(&mut degraded, DegradedField::EndDate, parse_end_date(date_field));

    let market = Market {
        id: raw.id.clone(),
        condition_id: raw.condition_id.clone().unwrap_or_default(),
        question: raw.question.clone().unwrap_or_default(),
        description: raw.description.clone().unwrap_or_default(),
        outcomes,
        outcome_prices,
        end_date,
        volume: raw.volume.clone().unwrap_or_default(),
        liquidity: raw.liquidity.clone().unwrap_or_default(),
        active: raw.active.unwrap_or(false) && !raw.closed.unwrap_or(false),
    };

    (market, degraded)
}

fn track<T>(degraded: &mut Vec<DegradedField>, field: DegradedField, parsed: Parsed<T>) -> T {
    let (value, was_degraded) = parsed.into_pair();
    if was_degraded {
        degraded.push(field);
    }
    value
}
