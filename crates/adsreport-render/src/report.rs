use adsreport_core::dates::long_date;
use adsreport_core::format::{self, html_escape};
use adsreport_core::{Client, DateRange, InsightCard, MetricsComparison, Narrative};
use chrono::NaiveDate;

use crate::template::{Template, Values};
use crate::{Branding, TemplateError};

const REPORT_TEMPLATE: &str = include_str!("../templates/report.html");
const INSIGHT_CARD_TEMPLATE: &str = include_str!("../templates/insight_card.html");

/// Everything that varies between two clients' reports.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub client: &'a Client,
    pub comparison: &'a MetricsComparison,
    pub narrative: &'a Narrative,
    pub dates: &'a DateRange,
    pub generated_on: NaiveDate,
}

/// A finished per-client document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub report_id: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct ReportRenderer {
    page: Template,
    card: Template,
    branding: Branding,
    report_id_prefix: Option<String>,
}

impl ReportRenderer {
    #[must_use]
    pub fn new(branding: Branding, report_id_prefix: Option<String>) -> Self {
        Self {
            page: Template::new("report.html", REPORT_TEMPLATE),
            card: Template::new("insight_card.html", INSIGHT_CARD_TEMPLATE),
            branding,
            report_id_prefix,
        }
    }

    /// Renders one client's weekly report.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the value map and the embedded template
    /// disagree.
    pub fn render(&self, input: &ReportInput<'_>) -> Result<RenderedReport, TemplateError> {
        let report_id = format::report_id(
            &input.client.slug,
            input.dates,
            self.report_id_prefix.as_deref(),
        );
        let insights_html = self.cards_html(&input.narrative.cards())?;
        let values = report_values(input, &self.branding, &report_id, insights_html);
        Ok(RenderedReport {
            html: self.page.render(&values)?,
            report_id,
        })
    }

    fn cards_html(&self, cards: &[InsightCard]) -> Result<String, TemplateError> {
        cards
            .iter()
            .map(|card| {
                self.card.render(&Values::from([
                    ("kind", card.kind.as_str().to_string()),
                    ("icon", card.kind.icon().to_string()),
                    ("title", card.title.clone()),
                    ("text", card.text.clone()),
                ]))
            })
            .collect()
    }
}

fn report_values(
    input: &ReportInput<'_>,
    branding: &Branding,
    report_id: &str,
    insights_html: String,
) -> Values {
    let cur = &input.comparison.current;
    let prev = &input.comparison.previous;
    let ch = &input.comparison.changes;

    let spend_suffix = if ch.spend_pct < 0.0 {
        " cost savings"
    } else {
        DEFAULT_SUFFIX
    };
    let cpc_suffix = if ch.cpc_pct < 0.0 {
        " more efficient"
    } else {
        DEFAULT_SUFFIX
    };
    let ctr_change_text = if prev.ctr() > 0.0 {
        format::change_text(ch.ctr_pct, DEFAULT_SUFFIX)
    } else {
        "Industry avg: 2-3%".to_string()
    };

    let mut values = Values::from([
        ("client_name", html_escape(&input.client.name)),
        ("date_range", input.dates.current_label_html()),
        ("generated_date", long_date(input.generated_on)),
        ("executive_summary", input.narrative.summary.clone()),
        ("agency_name", html_escape(&branding.agency_name)),
        ("agency_url", html_escape(&branding.agency_url)),
        ("insights_html", insights_html),
        ("report_id", report_id.to_string()),
        ("ctr_badge", ctr_badge(cur.ctr()).to_string()),
        ("cpc_badge", cpc_badge(cur.cpc()).to_string()),
        ("clicks_badge", clicks_badge(ch.clicks_pct)),
    ]);

    let rows = [
        MetricRow {
            key: Key::Spend,
            display: format::currency(cur.spend_f64()),
            exact: format::currency_exact(cur.spend_f64()),
            previous: format::currency_exact(prev.spend_f64()),
            change: ch.spend_pct,
            change_text: format::change_text(ch.spend_pct, spend_suffix),
            invert: true,
        },
        MetricRow {
            key: Key::Ctr,
            display: format::percent(cur.ctr()),
            exact: format::percent(cur.ctr()),
            previous: format::percent(prev.ctr()),
            change: ch.ctr_pct,
            change_text: ctr_change_text,
            invert: false,
        },
        MetricRow {
            key: Key::Cpc,
            display: format::currency_exact(cur.cpc()),
            exact: format::currency_exact(cur.cpc()),
            previous: format::currency_exact(prev.cpc()),
            change: ch.cpc_pct,
            change_text: format::change_text(ch.cpc_pct, cpc_suffix),
            invert: true,
        },
        MetricRow {
            key: Key::Clicks,
            display: format::count(cur.clicks),
            exact: format::count(cur.clicks),
            previous: format::count(prev.clicks),
            change: ch.clicks_pct,
            change_text: format::change_text(ch.clicks_pct, DEFAULT_SUFFIX),
            invert: false,
        },
        MetricRow {
            key: Key::Impressions,
            display: format::count(cur.impressions),
            exact: format::count(cur.impressions),
            previous: format::count(prev.impressions),
            change: ch.impressions_pct,
            change_text: format::change_text(ch.impressions_pct, DEFAULT_SUFFIX),
            invert: false,
        },
    ];
    for row in rows {
        row.insert_into(&mut values);
    }
    values
}

const DEFAULT_SUFFIX: &str = " vs last week";

#[derive(Clone, Copy)]
enum Key {
    Spend,
    Ctr,
    Cpc,
    Clicks,
    Impressions,
}

impl Key {
    /// Placeholder names in template order: display, change class, change
    /// text, exact, previous, table change, table class.
    fn names(self) -> [&'static str; 7] {
        match self {
            Key::Spend => [
                "spend_display",
                "spend_change_class",
                "spend_change_text",
                "spend_exact",
                "prev_spend",
                "spend_change_pct",
                "spend_table_class",
            ],
            Key::Ctr => [
                "ctr_display",
                "ctr_change_class",
                "ctr_change_text",
                "ctr_exact",
                "prev_ctr",
                "ctr_change_pct",
                "ctr_table_class",
            ],
            Key::Cpc => [
                "cpc_display",
                "cpc_change_class",
                "cpc_change_text",
                "cpc_exact",
                "prev_cpc",
                "cpc_change_pct",
                "cpc_table_class",
            ],
            Key::Clicks => [
                "clicks_display",
                "clicks_change_class",
                "clicks_change_text",
                "clicks_exact",
                "prev_clicks",
                "clicks_change_pct",
                "clicks_table_class",
            ],
            Key::Impressions => [
                "impressions_display",
                "impressions_change_class",
                "impressions_change_text",
                "impressions_exact",
                "prev_impressions",
                "impressions_change_pct",
                "impressions_table_class",
            ],
        }
    }
}

/// One metric's KPI card and table row.
struct MetricRow {
    key: Key,
    display: String,
    exact: String,
    previous: String,
    change: f64,
    change_text: String,
    invert: bool,
}

impl MetricRow {
    fn insert_into(self, values: &mut Values) {
        let [display, change_class, change_text, exact, prev, change_pct, table_class] =
            self.key.names();
        values.insert(display, self.display);
        values.insert(
            change_class,
            format::change_class(self.change, self.invert).to_string(),
        );
        values.insert(change_text, self.change_text);
        values.insert(exact, self.exact);
        values.insert(prev, self.previous);
        values.insert(change_pct, format::change_pct(self.change));
        values.insert(
            table_class,
            format::table_class(self.change, self.invert).to_string(),
        );
    }
}

fn ctr_badge(ctr: f64) -> &'static str {
    if ctr >= 10.0 {
        r#"<span class="performance-badge excellent">Excellent</span>"#
    } else if ctr >= 5.0 {
        r#"<span class="performance-badge good">Strong</span>"#
    } else {
        ""
    }
}

fn cpc_badge(cpc: f64) -> &'static str {
    if cpc < 0.20 {
        r#"<span class="performance-badge excellent">Efficient</span>"#
    } else if cpc < 0.50 {
        r#"<span class="performance-badge good">Good</span>"#
    } else {
        ""
    }
}

fn clicks_badge(change: f64) -> String {
    if change > 50.0 {
        format!(
            r#"<span class="performance-badge excellent">+{}%</span>"#,
            format::fixed(change, 0)
        )
    } else if change.abs() < 5.0 {
        r#"<span class="performance-badge good">Stable</span>"#.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
