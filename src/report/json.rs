use std::collections::BTreeMap;

use serde::Serialize;

use crate::input::names::NameTable;
use crate::model::summary::Summary;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData<'a> {
    pub tool: ToolMeta,
    pub profile: &'a str,
    pub n_submissions: usize,
    pub metrics: &'a [String],
    /// Display names of the ranked submissions that have one.
    pub display_names: BTreeMap<&'a str, &'a str>,
    #[serde(flatten)]
    pub summary: &'a Summary,
}

impl<'a> SummaryData<'a> {
    pub fn new(
        profile: &'a str,
        metrics: &'a [String],
        summary: &'a Summary,
        names: &'a NameTable,
    ) -> Self {
        let display_names = summary
            .ordering
            .iter()
            .filter_map(|s| names.get(&s.id).map(|name| (s.id.as_str(), name)))
            .collect();
        Self {
            tool: ToolMeta {
                name: "kira-subrank".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            profile,
            n_submissions: summary.n_submissions(),
            metrics,
            display_names,
            summary,
        }
    }
}

pub fn render_summary_json(data: &SummaryData<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}
