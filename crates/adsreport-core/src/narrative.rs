//! Threshold rules that turn a week-over-week comparison into prose.
//!
//! Every rule table below is evaluated top to bottom and the first match
//! wins within a table. Tables are independent of each other, so a report
//! can carry a CTR card and a momentum card at the same time. All
//! comparisons are strict: a change of exactly 50% is not "more than 50%".
//!
//! The text produced here is HTML fragment text (`<strong>`, entities) that
//! the renderer inserts verbatim.

use serde::Serialize;

use crate::format;
use crate::metrics::{ChangeSet, MetricsComparison};

/// At most this many recommendations are shown.
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Overall verdict on the week, used to open the executive summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Outstanding,
    Strong,
    Softness,
    Solid,
}

type TonePredicate = fn(&ChangeSet) -> bool;

/// Priority-ordered tone rules; [`Tone::Solid`] is the fallback.
const TONE_RULES: [(Tone, TonePredicate); 3] = [
    (Tone::Outstanding, |c| {
        c.clicks_pct > 50.0 || (c.ctr_pct > 20.0 && c.cpc_pct < -10.0)
    }),
    (Tone::Strong, |c| c.clicks_pct > 20.0 || c.cpc_pct < -15.0),
    (Tone::Softness, |c| c.clicks_pct < -20.0 || c.ctr_pct < -20.0),
];

impl Tone {
    #[must_use]
    pub fn select(changes: &ChangeSet) -> Self {
        TONE_RULES
            .iter()
            .find(|(_, applies)| applies(changes))
            .map_or(Tone::Solid, |(tone, _)| *tone)
    }

    /// Opening sentence of the summary, including its trailing space.
    #[must_use]
    pub fn opening(self) -> &'static str {
        match self {
            Tone::Outstanding => "<strong>Outstanding week with exceptional performance.</strong> ",
            Tone::Strong => "<strong>Strong performance this week.</strong> ",
            Tone::Softness => "This week showed some softness in key metrics. ",
            Tone::Solid => "Solid performance this week. ",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Outstanding => "outstanding",
            Tone::Strong => "strong",
            Tone::Softness => "softness",
            Tone::Solid => "solid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Success,
    Warning,
    Info,
}

impl InsightKind {
    /// CSS modifier class on the card icon.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InsightKind::Success => "success",
            InsightKind::Warning => "warning",
            InsightKind::Info => "info",
        }
    }

    /// HTML entity shown inside the icon bubble.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            InsightKind::Success => "&#10003;",
            InsightKind::Warning => "!",
            InsightKind::Info => "&rarr;",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightCard {
    pub kind: InsightKind,
    pub title: String,
    pub text: String,
}

impl InsightCard {
    fn new(kind: InsightKind, title: &str, text: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            text,
        }
    }
}

struct InsightRule {
    applies: fn(&MetricsComparison) -> bool,
    build: fn(&MetricsComparison) -> InsightCard,
}

const CTR_RULES: [InsightRule; 3] = [
    InsightRule {
        applies: |m| m.current.ctr() >= 10.0,
        build: |m| {
            let follow_up = if m.changes.ctr_pct > 5.0 {
                format!(
                    "The {}% improvement week-over-week indicates strong ad relevance.",
                    format::fixed(m.changes.ctr_pct, 0)
                )
            } else {
                "This indicates highly effective ad copy and targeting.".to_string()
            };
            InsightCard::new(
                InsightKind::Success,
                "Outstanding CTR Performance",
                format!(
                    "A {} CTR is exceptional&mdash;approximately 5-7x the industry average. {follow_up}",
                    format::percent(m.current.ctr())
                ),
            )
        },
    },
    InsightRule {
        applies: |m| m.current.ctr() >= 5.0,
        build: |m| {
            InsightCard::new(
                InsightKind::Success,
                "Strong Click-Through Rate",
                format!(
                    "A {} CTR is approximately 2x the industry average, indicating strong ad relevance and effective messaging.",
                    format::percent(m.current.ctr())
                ),
            )
        },
    },
    InsightRule {
        applies: |m| m.current.ctr() < 2.0,
        build: |m| {
            InsightCard::new(
                InsightKind::Warning,
                "CTR Optimization Opportunity",
                format!(
                    "A {} CTR is below industry average (2-3%). Recommend testing new ad copy and reviewing keyword relevance.",
                    format::percent(m.current.ctr())
                ),
            )
        },
    },
];

const MOMENTUM_RULES: [InsightRule; 3] = [
    InsightRule {
        applies: |m| m.changes.clicks_pct > 50.0 && m.changes.cpc_pct < 0.0,
        build: |m| {
            InsightCard::new(
                InsightKind::Success,
                "Exceptional Scale Achievement",
                format!(
                    "Clicks increased {}% while CPC decreased {}%. The campaign successfully scaled with improved efficiency.",
                    format::fixed(m.changes.clicks_pct, 0),
                    format::fixed(m.changes.cpc_pct.abs(), 0)
                ),
            )
        },
    },
    InsightRule {
        applies: |m| m.changes.cpc_pct < -15.0,
        build: |m| {
            InsightCard::new(
                InsightKind::Success,
                "Improved Cost Efficiency",
                format!(
                    "CPC dropped {}% from {} to {}. This demonstrates excellent optimization results.",
                    format::fixed(m.changes.cpc_pct.abs(), 0),
                    format::currency_exact(m.previous.cpc()),
                    format::currency_exact(m.current.cpc())
                ),
            )
        },
    },
    InsightRule {
        applies: |m| m.changes.clicks_pct < -15.0,
        build: |m| {
            InsightCard::new(
                InsightKind::Warning,
                "Traffic Volume Decline",
                format!(
                    "Clicks decreased {}% week-over-week. This may be due to seasonal factors, competitive pressure, or budget pacing. Recommend reviewing search impression share.",
                    format::fixed(m.changes.clicks_pct.abs(), 0)
                ),
            )
        },
    },
];

const INSIGHT_TABLES: [&[InsightRule]; 2] = [&CTR_RULES, &MOMENTUM_RULES];

struct RecommendationRule {
    applies: fn(&ChangeSet) -> bool,
    items: &'static [&'static str],
}

/// Each inner table contributes at most one rule's items.
const RECOMMENDATION_TABLES: [&[RecommendationRule]; 3] = [
    &[
        RecommendationRule {
            applies: |c| c.clicks_pct > 30.0,
            items: &[
                "Continue current strategy&mdash;the scaling approach is working well",
                "Monitor CTR trends as volume increases to ensure quality",
            ],
        },
        RecommendationRule {
            applies: |c| c.clicks_pct < -15.0,
            items: &[
                "Review search impression share to identify if budget or rank is limiting visibility",
                "Analyze search terms report for new keyword opportunities",
            ],
        },
    ],
    &[RecommendationRule {
        applies: |c| c.ctr_pct < -10.0,
        items: &["Test new ad copy variations to improve click-through rate"],
    }],
    &[
        RecommendationRule {
            applies: |c| c.cpc_pct > 15.0,
            items: &["Review bid strategy and quality scores to improve efficiency"],
        },
        RecommendationRule {
            applies: |c| c.cpc_pct < -10.0,
            items: &["Consider reinvesting cost savings to expand reach"],
        },
    ],
];

/// Appended when the rules above produce fewer than two items.
const FALLBACK_RECOMMENDATIONS: [&str; 2] = [
    "Monitor competitive landscape for opportunities",
    "Test similar audiences to scale while maintaining efficiency",
];

/// Everything the report says about one client's week, in words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub tone: Tone,
    pub summary: String,
    /// CTR and momentum cards, zero to two of them, in that order.
    pub insights: Vec<InsightCard>,
    /// At most [`MAX_RECOMMENDATIONS`] items, never fewer than two.
    pub recommendations: Vec<&'static str>,
}

impl Narrative {
    #[must_use]
    pub fn generate(comparison: &MetricsComparison) -> Self {
        let tone = Tone::select(&comparison.changes);
        Self {
            tone,
            summary: summary(tone, comparison),
            insights: insights(comparison),
            recommendations: recommendations(&comparison.changes),
        }
    }

    /// `1) first<br>2) second`, as shown in the recommendations card.
    #[must_use]
    pub fn numbered_recommendations(&self) -> String {
        self.recommendations
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}) {r}", i + 1))
            .collect::<Vec<_>>()
            .join("<br>")
    }

    /// The insight cards followed by the recommendations card.
    #[must_use]
    pub fn cards(&self) -> Vec<InsightCard> {
        let mut cards = self.insights.clone();
        cards.push(InsightCard::new(
            InsightKind::Info,
            "Recommendations",
            self.numbered_recommendations(),
        ));
        cards
    }
}

fn summary(tone: Tone, m: &MetricsComparison) -> String {
    let c = &m.changes;
    let mut details = Vec::with_capacity(4);

    if c.clicks_pct.abs() > 10.0 {
        let direction = if c.clicks_pct > 0.0 { "increased" } else { "decreased" };
        details.push(format!(
            "Clicks {direction} <strong>{}%</strong> to <strong>{}</strong>",
            format::fixed(c.clicks_pct.abs(), 0),
            format::count(m.current.clicks)
        ));
    }
    if c.ctr_pct.abs() > 10.0 {
        let direction = if c.ctr_pct > 0.0 { "improved" } else { "declined" };
        details.push(format!(
            "CTR {direction} to <strong>{}</strong>",
            format::percent(m.current.ctr())
        ));
    }
    if c.cpc_pct.abs() > 10.0 {
        let direction = if c.cpc_pct < 0.0 { "dropped" } else { "increased" };
        details.push(format!(
            "CPC {direction} <strong>{}%</strong> to <strong>{}</strong>",
            format::fixed(c.cpc_pct.abs(), 0),
            format::currency_exact(m.current.cpc())
        ));
    }
    details.push(format!(
        "Total investment of <strong>{}</strong>",
        format::currency_exact(m.current.spend_f64())
    ));

    format!("{}{}.", tone.opening(), details.join(". "))
}

fn insights(m: &MetricsComparison) -> Vec<InsightCard> {
    INSIGHT_TABLES
        .iter()
        .filter_map(|table| table.iter().find(|rule| (rule.applies)(m)))
        .map(|rule| (rule.build)(m))
        .collect()
}

fn recommendations(changes: &ChangeSet) -> Vec<&'static str> {
    let mut recs: Vec<&'static str> = RECOMMENDATION_TABLES
        .iter()
        .filter_map(|table| table.iter().find(|rule| (rule.applies)(changes)))
        .flat_map(|rule| rule.items.iter().copied())
        .collect();
    if recs.len() < 2 {
        recs.extend(FALLBACK_RECOMMENDATIONS);
    }
    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

#[cfg(test)]
#[path = "narrative_test.rs"]
mod tests;
