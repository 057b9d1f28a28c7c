//! Keyword routing of free-text questions to canned analyses.
//!
//! Routing is a fixed, ordered rule list. The first rule with a keyword
//! contained in the lower-cased question answers it, so a question that
//! mentions both "summary" and "highest" gets the summary. Reordering
//! [`RULES`] changes answers.

use serde::Serialize;

use crate::services::sheet::types::{ColumnProfile, Grid, TableSummary};
use crate::services::sheet::utils::{format_count, format_number};

pub const NEED_MORE_DATA: &str =
    "I need more data to provide analysis. Please upload a valid Excel file.";
pub const NO_NUMERIC_COLUMNS: &str =
    "I couldn't find any numeric columns to analyze. Try asking about the columns or a summary instead.";

const EXAMPLE_QUESTIONS: &[&str] = &[
    "What's the summary of this data?",
    "Which column has the highest values?",
    "Show me trends in the data",
    "What insights can you find?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    NeedMoreData,
    Summary,
    Highest,
    Lowest,
    Average,
    Trend,
    Insight,
    Columns,
    Help,
}

/// Everything a handler may read.
pub struct QueryContext<'a> {
    pub grid: &'a Grid,
    pub summary: &'a TableSummary,
    pub profiles: &'a [ColumnProfile],
}

struct Rule {
    intent: Intent,
    keywords: &'static [&'static str],
    handler: fn(&QueryContext<'_>) -> String,
}

impl Rule {
    fn matches(&self, question: &str) -> bool {
        self.keywords.iter().any(|keyword| question.contains(keyword))
    }
}

/// Evaluated top to bottom, first match wins.
const RULES: &[Rule] = &[
    Rule {
        intent: Intent::Summary,
        keywords: &["summary", "overview"],
        handler: summary_answer,
    },
    Rule {
        intent: Intent::Highest,
        keywords: &["highest", "maximum", "largest"],
        handler: highest_answer,
    },
    Rule {
        intent: Intent::Lowest,
        keywords: &["lowest", "minimum", "smallest"],
        handler: lowest_answer,
    },
    Rule {
        intent: Intent::Average,
        keywords: &["average", "mean"],
        handler: average_answer,
    },
    Rule {
        intent: Intent::Trend,
        keywords: &["trend", "pattern"],
        handler: trend_answer,
    },
    Rule {
        intent: Intent::Insight,
        keywords: &["insight", "analysis", "findings"],
        handler: insight_answer,
    },
    Rule {
        intent: Intent::Columns,
        keywords: &["column", "field"],
        handler: columns_answer,
    },
];

fn matching_rule(question: &str) -> Option<&'static Rule> {
    let question = question.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&question))
}

/// Intent the question routes to for this grid.
pub fn classify(question: &str, grid: &Grid) -> Intent {
    if grid.is_empty() {
        return Intent::NeedMoreData;
    }
    matching_rule(question).map_or(Intent::Help, |rule| rule.intent)
}

/// Answer a question about the table. Pure and deterministic.
pub fn answer_question(
    question: &str,
    grid: &Grid,
    summary: &TableSummary,
    profiles: &[ColumnProfile],
) -> String {
    route_question(question, grid, summary, profiles).1
}

/// Like [`answer_question`], also reporting which intent answered.
pub fn route_question(
    question: &str,
    grid: &Grid,
    summary: &TableSummary,
    profiles: &[ColumnProfile],
) -> (Intent, String) {
    if grid.is_empty() {
        return (Intent::NeedMoreData, NEED_MORE_DATA.to_string());
    }

    let ctx = QueryContext {
        grid,
        summary,
        profiles,
    };
    let (intent, answer) = match matching_rule(question) {
        Some(rule) => (rule.intent, (rule.handler)(&ctx)),
        None => (Intent::Help, help_answer(&ctx)),
    };
    tracing::debug!("Routed question to {:?}", intent);
    (intent, answer)
}

/// Opening assistant message for a freshly loaded file.
pub fn greeting(file_name: &str) -> String {
    let examples = EXAMPLE_QUESTIONS
        .iter()
        .map(|q| format!("• \"{}\"", q))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Hi! I'm your data analysis assistant. I can help you analyze your Excel file \"{}\". You can ask me questions like:\n\n{}\n\nWhat would you like to know about your data?",
        file_name, examples
    )
}

/// Profiles known to hold at least one column.
#[derive(Clone, Copy)]
struct Numeric<'a> {
    first: &'a ColumnProfile,
    all: &'a [ColumnProfile],
}

impl<'a> Numeric<'a> {
    fn new(all: &'a [ColumnProfile]) -> Option<Self> {
        all.first().map(|first| Self { first, all })
    }

    /// First profile with the best key; later ties lose.
    fn pick_by<F>(self, key: F, better: fn(f64, f64) -> bool) -> &'a ColumnProfile
    where
        F: Fn(&ColumnProfile) -> f64,
    {
        let mut best = self.first;
        for current in &self.all[1..] {
            if better(key(current), key(best)) {
                best = current;
            }
        }
        best
    }
}

/// Shared guard for every handler that needs a numeric column.
fn require_numeric<'a>(ctx: &QueryContext<'a>, render: impl FnOnce(Numeric<'a>) -> String) -> String {
    match Numeric::new(ctx.profiles) {
        Some(numeric) => render(numeric),
        None => NO_NUMERIC_COLUMNS.to_string(),
    }
}

fn greater(a: f64, b: f64) -> bool {
    a > b
}

fn less(a: f64, b: f64) -> bool {
    a < b
}

fn bullet_list<'a>(
    profiles: impl Iterator<Item = &'a ColumnProfile>,
    render: impl Fn(&ColumnProfile) -> String,
) -> String {
    profiles.map(render).collect::<Vec<_>>().join("\n")
}

fn summary_answer(ctx: &QueryContext<'_>) -> String {
    let s = ctx.summary;
    format!(
        "📊 **Data Summary:**\n\n\
         **Basic Info:**\n\
         • Total rows: {}\n\
         • Total columns: {}\n\
         • Numeric columns: {}\n\n\
         **Columns:** {}\n\n\
         **Data Quality:**\n\
         • Data completeness: {}%\n\
         • Non-empty rows: {}",
        format_count(s.total_rows),
        s.total_columns,
        s.numeric_column_count,
        ctx.grid.headers.join(", "),
        s.completeness,
        format_count(s.non_empty_rows),
    )
}

fn highest_answer(ctx: &QueryContext<'_>) -> String {
    require_numeric(ctx, |numeric| {
        let top = numeric.pick_by(|p| p.max, greater);
        format!(
            "🔝 **Highest Values:**\n\n\
             The column \"{}\" has the highest maximum value of **{}**.\n\n\
             **Top numeric columns by maximum value:**\n{}",
            top.name,
            format_number(top.max),
            bullet_list(numeric.all.iter().take(3), |p| format!("• {}: {}", p.name, format_number(p.max))),
        )
    })
}

fn lowest_answer(ctx: &QueryContext<'_>) -> String {
    require_numeric(ctx, |numeric| {
        let bottom = numeric.pick_by(|p| p.min, less);
        format!(
            "🔻 **Lowest Values:**\n\n\
             The column \"{}\" has the lowest minimum value of **{}**.\n\n\
             **Numeric columns by minimum value:**\n{}",
            bottom.name,
            format_number(bottom.min),
            bullet_list(numeric.all.iter().take(3), |p| format!("• {}: {}", p.name, format_number(p.min))),
        )
    })
}

fn average_answer(ctx: &QueryContext<'_>) -> String {
    require_numeric(ctx, |numeric| {
        format!(
            "📊 **Average Values:**\n\n{}",
            bullet_list(numeric.all.iter().take(5), |p| format!("• **{}**: {:.2}", p.name, p.avg)),
        )
    })
}

fn variability_label(profile: &ColumnProfile) -> &'static str {
    if profile.variability() > 1.0 {
        "High"
    } else {
        "Low"
    }
}

fn trend_answer(ctx: &QueryContext<'_>) -> String {
    require_numeric(ctx, |numeric| {
        let ranges = bullet_list(numeric.all.iter().take(3), |p| {
            format!(
                "• **{}**: Range {:.2} ({} variability)",
                p.name,
                p.range(),
                variability_label(p)
            )
        });
        let consistent = numeric.pick_by(ColumnProfile::variability, less);
        let variable = numeric.pick_by(ColumnProfile::variability, greater);

        format!(
            "📈 **Data Trends & Patterns:**\n\n\
             **Range Analysis:**\n{}\n\n\
             **Distribution Insights:**\n\
             • Most consistent data: {}\n\
             • Most variable data: {}",
            ranges,
            consistent.name,
            variable.name,
        )
    })
}

fn insight_answer(ctx: &QueryContext<'_>) -> String {
    let profiles = ctx.profiles;
    let mut findings = Vec::new();
    if let Some(numeric) = Numeric::new(profiles) {
        let top = numeric.pick_by(|p| p.sum, greater);
        findings.push(format!(
            "• Highest total value: {} ({})",
            top.name,
            format_number(top.sum)
        ));
        if profiles.len() > 1 {
            let balanced = numeric.pick_by(ColumnProfile::variability, less);
            findings.push(format!("• Most balanced range: {}", balanced.name));
        }
    }
    if findings.is_empty() {
        findings.push("• No quantitative columns were found".to_string());
    }

    let mut recommendations = Vec::new();
    if let Some(first) = profiles.first() {
        recommendations.push(format!(
            "• Consider visualizing the \"{}\" column for trends",
            first.name
        ));
    }
    recommendations.push("• Look for correlations between numeric fields".to_string());
    recommendations.push("• Check for any outliers in the data ranges".to_string());

    format!(
        "🔍 **Key Insights:**\n\n\
         **Data Structure:**\n\
         • Your dataset has {} records across {} fields\n\
         • {} columns contain quantitative data for analysis\n\n\
         **Notable Findings:**\n{}\n\n\
         **Recommendations:**\n{}",
        format_count(ctx.summary.total_rows),
        ctx.summary.total_columns,
        ctx.summary.numeric_column_count,
        findings.join("\n"),
        recommendations.join("\n"),
    )
}

fn columns_answer(ctx: &QueryContext<'_>) -> String {
    let headers = ctx.grid.headers.iter().enumerate().map(|(index, header)| {
        let numeric = ctx.profiles.iter().any(|p| p.index == index);
        format!(
            "{}. **{}** {}",
            index + 1,
            header,
            if numeric { "(Numeric)" } else { "(Text)" }
        )
    });

    format!(
        "📋 **Column Information:**\n\n\
         **All Columns ({}):**\n{}\n\n\
         **Numeric Columns for Analysis:**\n{}",
        ctx.grid.headers.len(),
        headers.collect::<Vec<_>>().join("\n"),
        bullet_list(ctx.profiles.iter(), |p| format!("• {}: {} values", p.name, p.count)),
    )
}

fn help_answer(ctx: &QueryContext<'_>) -> String {
    format!(
        "I can help analyze your data! Try asking about:\n\n\
         🔍 **Analysis Questions:**\n\
         • \"What's the summary of this data?\"\n\
         • \"Which column has the highest/lowest values?\"\n\
         • \"Show me the averages\"\n\
         • \"What trends do you see?\"\n\
         • \"What insights can you find?\"\n\
         • \"Tell me about the columns\"\n\n\
         Your data has {} rows and {} columns. What specific aspect would you like me to analyze?",
        format_count(ctx.summary.total_rows),
        ctx.summary.total_columns,
    )
}
