//! Typed ingestion boundary for spreadsheet-like input.
//!
//! Raw grids of [`Cell`]s are turned into typed rows here and nowhere else.
//! Malformed numbers become 0; malformed dates are an error.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::dates::DateRange;
use crate::model::{Client, PeriodMetrics, WeekMetrics};
use crate::IngestError;

/// One spreadsheet cell as delivered by the values API or a YAML snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    /// Trimmed text form; booleans and numbers are rendered, empty is `""`.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Empty => String::new(),
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.as_text().is_empty()
    }

    /// Boolean `true` or the text `TRUE` (any case).
    #[must_use]
    pub fn as_flag(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            Cell::Number(_) | Cell::Empty => false,
        }
    }

    /// Non-negative money amount; anything unparseable is 0.
    #[must_use]
    pub fn as_money(&self) -> Decimal {
        let parsed = match self {
            Cell::Number(n) => Decimal::from_f64(*n),
            Cell::Text(s) => Decimal::from_str(&strip_numeric(s)).ok(),
            Cell::Bool(_) | Cell::Empty => None,
        };
        match parsed {
            Some(d) if d >= Decimal::ZERO => d,
            _ => {
                if !self.is_blank() {
                    tracing::debug!(cell = ?self, "coercing malformed money cell to 0");
                }
                Decimal::ZERO
            }
        }
    }

    /// Non-negative whole count; fractions truncate, anything unparseable is 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_count(&self) -> u64 {
        let parsed = match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => f64::from_str(&strip_numeric(s)).ok(),
            Cell::Bool(_) | Cell::Empty => None,
        };
        match parsed {
            Some(n) if n.is_finite() && n >= 0.0 => n.trunc() as u64,
            _ => {
                if !self.is_blank() {
                    tracing::debug!(cell = ?self, "coercing malformed count cell to 0");
                }
                0
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

fn strip_numeric(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect()
}

fn cell(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&Cell::Empty)
}

/// Key/value rows (column A = key, column B = value). Rows with a blank key
/// or value are ignored.
#[must_use]
pub fn parse_key_values(rows: &[Vec<Cell>]) -> BTreeMap<String, String> {
    rows.iter()
        .filter_map(|row| {
            let key = cell(row, 0).as_text();
            let value = cell(row, 1).as_text();
            (!key.is_empty() && !value.is_empty()).then_some((key, value))
        })
        .collect()
}

/// A slug names a folder and a URL path segment: non-empty, lowercase
/// ASCII letters, digits and `-` only.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Drops a client whose slug could not be used as a path segment.
pub(crate) fn with_valid_slug(client: Client) -> Option<Client> {
    if is_valid_slug(&client.slug) {
        Some(client)
    } else {
        tracing::warn!(
            client = %client.name,
            slug = %client.slug,
            "skipping client with invalid slug"
        );
        None
    }
}

/// Client rows after a header: `name | slug | account id | active`.
/// Rows whose slug fails [`is_valid_slug`] are skipped with a warning.
#[must_use]
pub fn parse_client_rows(rows: &[Vec<Cell>]) -> Vec<Client> {
    rows.iter()
        .skip(1)
        .filter(|row| !cell(row, 0).is_blank())
        .map(|row| Client {
            name: cell(row, 0).as_text(),
            slug: cell(row, 1).as_text(),
            account_id: cell(row, 2).as_text(),
            active: cell(row, 3).as_flag(),
        })
        .filter_map(with_valid_slug)
        .collect()
}

/// Metric rows after a header: `client name | spend | impressions | clicks`.
#[must_use]
pub fn parse_metric_rows(rows: &[Vec<Cell>]) -> WeekMetrics {
    rows.iter()
        .skip(1)
        .filter(|row| !cell(row, 0).is_blank())
        .map(|row| {
            (
                cell(row, 0).as_text(),
                PeriodMetrics::new(
                    cell(row, 1).as_money(),
                    cell(row, 2).as_count(),
                    cell(row, 3).as_count(),
                ),
            )
        })
        .collect()
}

/// Parses a date written as `2026-01-04`, `1/4/2026` or `January 4, 2026`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Builds the run's [`DateRange`] from the `Date Range` key/value map.
///
/// # Errors
///
/// Returns [`IngestError`] if a key is missing, a date cannot be parsed, or
/// the windows are not two contiguous 7-day periods.
pub fn parse_date_range(values: &BTreeMap<String, String>) -> Result<DateRange, IngestError> {
    let get = |key: &'static str| -> Result<NaiveDate, IngestError> {
        let raw = values.get(key).ok_or(IngestError::MissingDate(key))?;
        parse_date(raw).ok_or_else(|| IngestError::InvalidDate {
            key,
            value: raw.clone(),
        })
    };

    Ok(DateRange::new(
        get("this_week_start")?,
        get("this_week_end")?,
        get("prev_week_start")?,
        get("prev_week_end")?,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[Cell]) -> Vec<Cell> {
        cells.to_vec()
    }

    #[test]
    fn money_accepts_numbers_and_formatted_text() {
        assert_eq!(Cell::Number(512.25).as_money(), Decimal::new(51_225, 2));
        assert_eq!(Cell::from("$1,200.50").as_money(), Decimal::new(120_050, 2));
    }

    #[test]
    fn malformed_numbers_coerce_to_zero() {
        assert_eq!(Cell::from("n/a").as_money(), Decimal::ZERO);
        assert_eq!(Cell::from("—").as_count(), 0);
        assert_eq!(Cell::Bool(true).as_count(), 0);
        assert_eq!(Cell::Empty.as_money(), Decimal::ZERO);
        assert_eq!(Cell::Number(-5.0).as_count(), 0);
        assert_eq!(Cell::from("-12").as_money(), Decimal::ZERO);
    }

    #[test]
    fn counts_truncate_fractions() {
        assert_eq!(Cell::Number(12.9).as_count(), 12);
        assert_eq!(Cell::from("10,432").as_count(), 10_432);
    }

    #[test]
    fn active_flag_accepts_bool_and_text() {
        assert!(Cell::Bool(true).as_flag());
        assert!(Cell::from("TRUE").as_flag());
        assert!(Cell::from("true").as_flag());
        assert!(!Cell::from("yes").as_flag());
        assert!(!Cell::Empty.as_flag());
    }

    #[test]
    fn key_values_skip_blank_rows() {
        let rows = vec![
            row(&["github_repo".into(), "acme/reports".into()]),
            row(&["email_bcc".into(), Cell::Empty]),
            row(&[]),
            row(&["  email_to ".into(), "ops@example.com".into()]),
        ];
        let map = parse_key_values(&rows);
        assert_eq!(map.len(), 2);
        assert_eq!(map["github_repo"], "acme/reports");
        assert_eq!(map["email_to"], "ops@example.com");
    }

    #[test]
    fn client_rows_skip_header_and_blank_names() {
        let rows = vec![
            row(&["Name".into(), "Slug".into(), "Customer ID".into(), "Active".into()]),
            row(&["Acme".into(), "acme".into(), "123-456-7890".into(), Cell::Bool(true)]),
            row(&[Cell::Empty, "ghost".into()]),
            row(&["Beta".into(), "beta".into()]),
        ];
        let clients = parse_client_rows(&rows);
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].slug, "acme");
        assert!(clients[0].active);
        assert_eq!(clients[1].account_id, "");
        assert!(!clients[1].active);
    }

    #[test]
    fn slug_charset() {
        assert!(is_valid_slug("acme"));
        assert!(is_valid_slug("beta-dental-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("../x"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("Acme"));
        assert!(!is_valid_slug("acme co"));
    }

    #[test]
    fn client_rows_with_unsafe_slugs_are_skipped() {
        let rows = vec![
            row(&["Name".into(), "Slug".into()]),
            row(&["Escape".into(), "../x".into(), Cell::Empty, Cell::Bool(true)]),
            row(&["Nested".into(), "a/b".into(), Cell::Empty, Cell::Bool(true)]),
            row(&["Blank".into(), Cell::Empty, Cell::Empty, Cell::Bool(true)]),
            row(&["Acme".into(), "acme".into(), Cell::Empty, Cell::Bool(true)]),
        ];
        let clients = parse_client_rows(&rows);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].slug, "acme");
    }

    #[test]
    fn metric_rows_are_keyed_by_client_name() {
        let rows = vec![
            row(&["Client".into(), "Spend".into(), "Impr.".into(), "Clicks".into()]),
            row(&[
                "Acme".into(),
                Cell::Number(500.0),
                Cell::Number(10_000.0),
                Cell::Number(300.0),
            ]),
            row(&["Beta".into(), "oops".into()]),
        ];
        let week = parse_metric_rows(&rows);
        assert_eq!(week["Acme"].clicks, 300);
        assert_eq!(week["Beta"], PeriodMetrics::default());
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 4);
        assert_eq!(parse_date("2026-01-04"), expected);
        assert_eq!(parse_date("1/4/2026"), expected);
        assert_eq!(parse_date("January 4, 2026"), expected);
        assert_eq!(parse_date("Jan 4, 2026"), expected);
        assert_eq!(parse_date("next monday"), None);
    }

    #[test]
    fn date_range_from_key_values() {
        let mut values = BTreeMap::new();
        values.insert("this_week_start".to_string(), "2026-01-04".to_string());
        values.insert("this_week_end".to_string(), "2026-01-10".to_string());
        values.insert("prev_week_start".to_string(), "2025-12-28".to_string());
        values.insert("prev_week_end".to_string(), "2026-01-03".to_string());
        let range = parse_date_range(&values).unwrap();
        assert_eq!(range.folder_suffix(), "jan4-10");
    }

    #[test]
    fn date_range_reports_missing_and_invalid_keys() {
        let mut values = BTreeMap::new();
        values.insert("this_week_start".to_string(), "soon".to_string());
        let err = parse_date_range(&values).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidDate {
                key: "this_week_start",
                ..
            }
        ));

        values.insert("this_week_start".to_string(), "2026-01-04".to_string());
        let err = parse_date_range(&values).unwrap_err();
        assert!(matches!(err, IngestError::MissingDate("this_week_end")));
    }
}
