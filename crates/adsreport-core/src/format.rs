//! Display formatting shared by the narrative and the HTML renderers.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::dates::DateRange;

/// Changes smaller than this (in percentage points) read as "No change".
pub const NO_CHANGE_THRESHOLD: f64 = 0.5;

pub const NO_CHANGE_LABEL: &str = "No change";

/// `$950.50` below 1000, `$1,500` (rounded, grouped) at or above.
#[must_use]
pub fn currency(value: f64) -> String {
    if value >= 1000.0 {
        format!("${}", group_thousands(round_to_u64(value)))
    } else {
        format!("${}", fixed(value, 2))
    }
}

/// Always two decimals, no grouping: `$1500.00`.
#[must_use]
pub fn currency_exact(value: f64) -> String {
    format!("${}", fixed(value, 2))
}

/// Rounded and grouped: `12,345`.
#[must_use]
pub fn count(value: u64) -> String {
    group_thousands(value)
}

#[must_use]
pub fn percent(value: f64) -> String {
    format!("{}%", fixed(value, 2))
}

#[must_use]
pub fn is_no_change(change: f64) -> bool {
    change.abs() < NO_CHANGE_THRESHOLD
}

/// KPI-card change text: `+12.3% vs last week`, or `No change`.
#[must_use]
pub fn change_text(change: f64, suffix: &str) -> String {
    if is_no_change(change) {
        return NO_CHANGE_LABEL.to_string();
    }
    format!("{}{suffix}", signed_pct(change, 1))
}

/// Table-cell change: `+12.34%`, or `No change`.
#[must_use]
pub fn change_pct(change: f64) -> String {
    if is_no_change(change) {
        return NO_CHANGE_LABEL.to_string();
    }
    signed_pct(change, 2)
}

/// CSS class for a KPI change. With `invert`, a decrease is good news.
#[must_use]
pub fn change_class(change: f64, invert: bool) -> &'static str {
    match direction(change, invert) {
        None => "neutral",
        Some(true) => "positive",
        Some(false) => "negative",
    }
}

/// CSS class for a table change cell; empty when there was no change.
#[must_use]
pub fn table_class(change: f64, invert: bool) -> &'static str {
    match direction(change, invert) {
        None => "",
        Some(true) => "change-positive",
        Some(false) => "change-negative",
    }
}

/// `ACM-2026-W01`, optionally prefixed (`RHM-ACM-2026-W01`).
#[must_use]
pub fn report_id(slug: &str, dates: &DateRange, prefix: Option<&str>) -> String {
    let short: String = slug.chars().take(3).collect::<String>().to_uppercase();
    let (year, week) = dates.iso_week();
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}-{short}-{year}-W{week:02}"),
        _ => format!("{short}-{year}-W{week:02}"),
    }
}

/// `decimals` places, with exact halves rounded away from zero
/// (`fixed(1.125, 2)` is `1.13`, `fixed(12.5, 0)` is `13`).
#[must_use]
pub fn fixed(value: f64, decimals: u32) -> String {
    let places = decimals as usize;
    match Decimal::from_f64_retain(value) {
        Some(d) => {
            let rounded =
                d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.places$}")
        }
        None => format!("{value:.places$}"),
    }
}

/// Escapes text destined for HTML element content or attribute values.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn signed_pct(change: f64, decimals: u32) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{sign}{}%", fixed(change, decimals))
}

fn direction(change: f64, invert: bool) -> Option<bool> {
    if is_no_change(change) {
        None
    } else if invert {
        Some(change < 0.0)
    } else {
        Some(change > 0.0)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn currency_below_one_thousand_keeps_cents() {
        assert_eq!(currency(950.5), "$950.50");
        assert_eq!(currency(0.0), "$0.00");
    }

    #[test]
    fn currency_at_or_above_one_thousand_rounds_and_groups() {
        assert_eq!(currency(1500.0), "$1,500");
        assert_eq!(currency(1000.0), "$1,000");
        assert_eq!(currency(1234.56), "$1,235");
        assert_eq!(currency(1_234_567.4), "$1,234,567");
    }

    #[test]
    fn currency_just_below_boundary_stays_in_decimal_branch() {
        let rendered = currency(999.995);
        assert_ne!(rendered, "$1,000");
        assert!(rendered.contains('.'), "{rendered}");
    }

    #[test]
    fn count_groups_thousands() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(12_345_678), "12,345,678");
    }

    #[test]
    fn no_change_label_below_half_a_percent() {
        assert_eq!(change_text(0.49, " vs last week"), "No change");
        assert_eq!(change_text(-0.49, " vs last week"), "No change");
        assert_eq!(change_pct(0.49), "No change");
        assert_eq!(change_pct(-0.49), "No change");
    }

    #[test]
    fn half_a_percent_is_a_real_change() {
        assert_eq!(change_text(0.5, " vs last week"), "+0.5% vs last week");
        assert_eq!(change_text(-0.5, " vs last week"), "-0.5% vs last week");
        assert_eq!(change_pct(0.5), "+0.50%");
        assert_eq!(change_pct(-0.5), "-0.50%");
    }

    #[test]
    fn change_text_uses_one_decimal_and_table_two() {
        assert_eq!(change_text(12.345, " cost savings"), "+12.3% cost savings");
        assert_eq!(change_pct(-44.444), "-44.44%");
    }

    #[test]
    fn exact_halves_round_away_from_zero() {
        assert_eq!(fixed(12.5, 0), "13");
        assert_eq!(fixed(-12.5, 0), "-13");
        assert_eq!(fixed(0.5, 2), "0.50");
        assert_eq!(change_pct(1.125), "+1.13%");
        assert_eq!(change_pct(-1.125), "-1.13%");
        assert_eq!(change_text(2.25, " vs last week"), "+2.3% vs last week");
        assert_eq!(currency_exact(1.125), "$1.13");
        assert_eq!(currency(2.675), "$2.67");
        assert_eq!(percent(3.125), "3.13%");
    }

    #[test]
    fn fixed_falls_back_for_values_outside_decimal_range() {
        assert_eq!(fixed(f64::NAN, 1), "NaN");
        assert_eq!(fixed(1e30, 0), format!("{:.0}", 1e30));
    }

    #[test]
    fn change_classes_respect_inversion() {
        assert_eq!(change_class(10.0, false), "positive");
        assert_eq!(change_class(10.0, true), "negative");
        assert_eq!(change_class(-10.0, true), "positive");
        assert_eq!(change_class(0.2, true), "neutral");
        assert_eq!(table_class(-3.0, false), "change-negative");
        assert_eq!(table_class(0.0, false), "");
    }

    #[test]
    fn report_id_uses_iso_week_of_window_end() {
        let dates = DateRange::ending_on(NaiveDate::from_ymd_opt(2026, 1, 3).unwrap());
        assert_eq!(report_id("acme", &dates, None), "ACM-2026-W01");
        assert_eq!(report_id("acme", &dates, Some("RHM")), "RHM-ACM-2026-W01");
        assert_eq!(report_id("ab", &dates, Some("")), "AB-2026-W01");
    }

    #[test]
    fn report_id_pads_week_and_uses_week_year() {
        let dates = DateRange::ending_on(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(report_id("reoptica", &dates, None), "REO-2025-W01");
        let dates = DateRange::ending_on(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(report_id("pfbhnc", &dates, None), "PFB-2026-W11");
    }

    #[test]
    fn html_escape_handles_markup_characters() {
        assert_eq!(
            html_escape(r#"Tom & Jerry's <"shop">"#),
            "Tom &amp; Jerry&#39;s &lt;&quot;shop&quot;&gt;"
        );
    }
}
