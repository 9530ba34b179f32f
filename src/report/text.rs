use crate::model::summary::AggregationMode;
use crate::report::{ReportContext, display_label, format_score, tie_break_label};

pub fn render_report_text(ctx: &ReportContext<'_>) -> String {
    let summary = ctx.summary;
    let mut out = String::new();

    out.push_str("Submission Ranking Report\n");
    out.push_str("=========================\n\n");

    out.push_str(&format!("Profile: {}\n", ctx.profile_name));
    out.push_str(&format!("Submissions: {}\n", summary.n_submissions()));
    out.push_str(&format!(
        "Tie-break: {}\n\n",
        tie_break_label(summary.tie_break)
    ));

    if summary.mode == AggregationMode::Categorized {
        out.push_str(&format!(
            "Categories: {}\n\n",
            summary.categories.join(", ")
        ));
        out.push_str("Best submission per category\n");
        for category in &summary.categories {
            if let Some(best) = summary.best_per_category.get(category) {
                out.push_str(&format!(
                    "{}: '{}' with mean score {}\n",
                    category,
                    display_label(&best.id, ctx.names),
                    format_score(best.score)
                ));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Best overall: '{}' with mean score {}\n\n",
        display_label(&summary.best_overall.id, ctx.names),
        format_score(summary.best_overall.score)
    ));

    out.push_str(&format!("Top {} submissions\n", summary.top.len()));
    for (i, entry) in summary.top.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} with mean score {}\n",
            i + 1,
            display_label(&entry.id, ctx.names),
            format_score(entry.score)
        ));
    }

    out
}
