use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::input::names::NameTable;
use crate::model::summary::Summary;
use crate::model::table::MetricTable;
use crate::pipeline::stage2_ranks::Stage2Output;
use crate::report::json::{SummaryData, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::{ReportContext, format_score};

#[derive(Debug, Clone)]
pub struct Stage4Input<'a> {
    pub profile_name: &'a str,
    pub tables: &'a [MetricTable],
    pub ranks: &'a Stage2Output,
    pub summary: &'a Summary,
    pub names: &'a NameTable,
}

impl Stage4Input<'_> {
    pub fn metric_names(&self) -> Vec<String> {
        self.ranks.metrics.iter().map(|m| m.metric.clone()).collect()
    }

    pub fn report_text(&self) -> String {
        render_report_text(&ReportContext {
            profile_name: self.profile_name,
            summary: self.summary,
            names: self.names,
        })
    }
}

pub fn write_reports(input: &Stage4Input<'_>, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    let metrics = input.metric_names();
    let data = SummaryData::new(input.profile_name, &metrics, input.summary, input.names);
    let json = render_summary_json(&data).map_err(std::io::Error::other)?;
    write_text(&out_dir.join("summary.json"), &json)?;

    write_text(&out_dir.join("report.txt"), &input.report_text())?;
    write_metric_means(input, &metrics, &out_dir.join("metric_means.tsv"))?;
    write_ranks(input, &out_dir.join("ranks.tsv"))?;

    tracing::info!(out_dir = %out_dir.display(), "reports written");
    Ok(())
}

fn write_text(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(content.as_bytes())?;
    file.flush()
}

/// One row per submission in final order: position, composite, then the mean
/// rank of every metric.
fn write_metric_means(
    input: &Stage4Input<'_>,
    metrics: &[String],
    path: &Path,
) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write!(w, "position\tsubmission\tcomposite")?;
    for metric in metrics {
        write!(w, "\t{metric}")?;
    }
    writeln!(w)?;

    for (i, entry) in input.summary.ordering.iter().enumerate() {
        write!(
            w,
            "{}\t{}\t{}",
            i + 1,
            entry.id,
            format_score(entry.score)
        )?;
        let means = input.ranks.means.iter().find(|m| m.id == entry.id);
        for metric in metrics {
            let value = means.and_then(|m| m.means.get(metric)).copied();
            match value {
                Some(v) => write!(w, "\t{}", format_score(v))?,
                None => write!(w, "\tNA")?,
            }
        }
        writeln!(w)?;
    }
    w.flush()
}

/// Long format: one row per (submission, metric, sample).
fn write_ranks(input: &Stage4Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "submission\tmetric\tsample\tscore\trank")?;
    for (idx, table) in input.tables.iter().enumerate() {
        for metric in &input.ranks.metrics {
            let Some(scores) = table.column(&metric.metric) else {
                continue;
            };
            let Some(ranks) = metric.ranks.get(idx) else {
                continue;
            };
            for (sample, (score, rank)) in scores.iter().zip(ranks).enumerate() {
                let label = table
                    .keys
                    .as_ref()
                    .and_then(|k| k.get(sample))
                    .cloned()
                    .unwrap_or_else(|| sample.to_string());
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}",
                    table.id, metric.metric, label, score, rank
                )?;
            }
        }
    }
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
