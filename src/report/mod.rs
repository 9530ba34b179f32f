pub mod json;
pub mod text;

use crate::input::names::NameTable;
use crate::model::profile::TieBreak;
use crate::model::summary::Summary;

#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub profile_name: &'a str,
    pub summary: &'a Summary,
    pub names: &'a NameTable,
}

pub fn format_score(v: f64) -> String {
    format!("{:.4}", v)
}

/// `id:name` when the id has a display name, otherwise the bare id.
pub fn display_label(id: &str, names: &NameTable) -> String {
    match names.get(id) {
        Some(name) if !name.is_empty() => format!("{id}:{name}"),
        _ => id.to_string(),
    }
}

pub fn tie_break_label(tie_break: TieBreak) -> &'static str {
    match tie_break {
        TieBreak::SubmissionId => "submission id",
        TieBreak::InputOrder => "input order",
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
