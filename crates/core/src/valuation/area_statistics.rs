//! Area-level price statistics.
//!
//! All figures are computed from listings observed inside the statistics
//! window; nothing is cached between requests. Listings without a
//! price-per-area count toward listing totals but not toward averages,
//! medians or the trend.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::properties::{AreaSample, ObservationWindow};
use crate::utils::time_utils;

use super::valuation_constants::{
    TREND_BASELINE_FROM_MONTHS, TREND_BASELINE_TO_MONTHS, TREND_RECENT_MONTHS,
};
use super::valuation_model::{AreaStatistics, AreaSummary};

/// Decimal places kept for the reported trend percentage.
const TREND_SCALE: u32 = 2;

/// `None` for an empty slice or a sum that does not fit in a `Decimal`.
pub fn average(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    sum.checked_div(Decimal::from(values.len()))
}

/// Continuous median: the mean of the two middle values for even counts.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(sorted[mid - 1] / dec!(2) + sorted[mid] / dec!(2))
    } else {
        Some(sorted[mid])
    }
}

fn priced<'a, I>(samples: I) -> Vec<Decimal>
where
    I: IntoIterator<Item = &'a AreaSample>,
{
    samples.into_iter().filter_map(|s| s.price_per_sqm).collect()
}

/// Percentage change of the last month's average price-per-area against the
/// average from six to five months before `window.end`.
///
/// Returns zero when either side has no samples, the older average is zero or
/// the change cannot be represented.
pub fn price_trend_pct<'a, I>(samples: I, window: &ObservationWindow) -> Decimal
where
    I: IntoIterator<Item = &'a AreaSample>,
{
    let as_of = window.end;
    let recent_from = time_utils::months_before(as_of, TREND_RECENT_MONTHS);
    let baseline_from = time_utils::months_before(as_of, TREND_BASELINE_FROM_MONTHS);
    let baseline_to = time_utils::months_before(as_of, TREND_BASELINE_TO_MONTHS);

    let mut recent = Vec::new();
    let mut older = Vec::new();
    for sample in samples {
        let Some(price) = sample.price_per_sqm else {
            continue;
        };
        let observed = sample.observed_at;
        if observed > as_of {
            continue;
        }
        if observed >= recent_from {
            recent.push(price);
        }
        if observed >= baseline_from && observed < baseline_to {
            older.push(price);
        }
    }

    match (average(&recent), average(&older)) {
        (Some(recent_avg), Some(older_avg)) if !older_avg.is_zero() => recent_avg
            .checked_sub(older_avg)
            .and_then(|change| change.checked_div(older_avg))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .map(|pct| pct.round_dp(TREND_SCALE))
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Neighborhood and district statistics for one location.
///
/// Returns `None` when the neighborhood has no priced samples inside
/// `window`; that is the "insufficient area data" condition. Listing counts
/// include every in-window listing.
pub fn get_area_statistics(
    city: &str,
    district: &str,
    neighborhood: &str,
    samples: &[AreaSample],
    window: &ObservationWindow,
) -> Option<AreaStatistics> {
    let district_samples: Vec<&AreaSample> = samples
        .iter()
        .filter(|s| s.city == city && s.district == district && window.contains(s.observed_at))
        .collect();
    let neighborhood_samples: Vec<&AreaSample> = district_samples
        .iter()
        .copied()
        .filter(|s| s.neighborhood == neighborhood)
        .collect();

    let neighborhood_prices = priced(neighborhood_samples.iter().copied());
    if neighborhood_prices.is_empty() {
        return None;
    }
    let district_prices = priced(district_samples.iter().copied());

    Some(AreaStatistics {
        city: city.to_string(),
        district: district.to_string(),
        neighborhood: neighborhood.to_string(),
        neighborhood_avg_price_per_sqm: average(&neighborhood_prices)?,
        neighborhood_median_price_per_sqm: median(&neighborhood_prices)?,
        neighborhood_listings: neighborhood_samples.len(),
        district_avg_price_per_sqm: average(&district_prices)?,
        district_median_price_per_sqm: median(&district_prices)?,
        district_listings: district_samples.len(),
        price_trend_pct: price_trend_pct(neighborhood_samples.iter().copied(), window),
    })
}

/// One summary per (city, district, neighborhood) found in `samples`, in
/// lexical order of the location. Areas without any priced listing are left
/// out.
pub fn summarize_areas(samples: &[AreaSample], window: &ObservationWindow) -> Vec<AreaSummary> {
    let mut groups: BTreeMap<(&str, &str, &str), Vec<&AreaSample>> = BTreeMap::new();
    for sample in samples.iter().filter(|s| window.contains(s.observed_at)) {
        groups
            .entry((
                sample.city.as_str(),
                sample.district.as_str(),
                sample.neighborhood.as_str(),
            ))
            .or_default()
            .push(sample);
    }

    groups
        .into_iter()
        .filter_map(|((city, district, neighborhood), group)| {
            let prices = priced(group.iter().copied());
            let ages: Vec<Decimal> = group
                .iter()
                .filter_map(|s| s.building_age.map(Decimal::from))
                .collect();
            Some(AreaSummary {
                city: city.to_string(),
                district: district.to_string(),
                neighborhood: neighborhood.to_string(),
                avg_price_per_sqm: average(&prices)?,
                avg_property_age: average(&ages),
                total_listings: group.len(),
                price_trend_pct: price_trend_pct(group.iter().copied(), window),
            })
        })
        .collect()
}
