use std::io::Write;

use clap::ValueEnum;
use roster_db::review::models::MergeCandidate;
use roster_matching::{CalibrationReport, CandidatePair, SubScoreKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

fn subscore_summary(pair: &CandidatePair) -> String {
    pair.subscores
        .iter()
        .map(|(kind, value)| format!("{kind}={value:.4}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_candidates<W: Write>(
    mut out: W,
    format: ReportFormat,
    candidates: &[CandidatePair],
) -> anyhow::Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, candidates)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            let mut header = vec!["left_id", "right_id", "score"];
            header.extend(SubScoreKind::ALL.iter().map(|k| k.as_str()));
            wtr.write_record(&header)?;
            for pair in candidates {
                let mut row = vec![
                    pair.left_id.clone(),
                    pair.right_id.clone(),
                    pair.display_score(),
                ];
                row.extend(
                    SubScoreKind::ALL
                        .iter()
                        .map(|k| pair.subscore(*k).map(|v| format!("{v:.4}")).unwrap_or_default()),
                );
                wtr.write_record(&row)?;
            }
            wtr.flush()?;
        }
        ReportFormat::Text => {
            if candidates.is_empty() {
                writeln!(out, "no candidate pairs found")?;
                return Ok(());
            }
            let left_width = candidates
                .iter()
                .map(|p| p.left_id.chars().count())
                .max()
                .unwrap_or(0)
                .max("left".len());
            let right_width = candidates
                .iter()
                .map(|p| p.right_id.chars().count())
                .max()
                .unwrap_or(0)
                .max("right".len());

            writeln!(
                out,
                "{:<6}  {:<left_width$}  {:<right_width$}  subscores",
                "score", "left", "right"
            )?;
            for pair in candidates {
                writeln!(
                    out,
                    "{}  {:<left_width$}  {:<right_width$}  {}",
                    pair.display_score(),
                    pair.left_id,
                    pair.right_id,
                    subscore_summary(pair)
                )?;
            }
        }
    }
    Ok(())
}

pub fn write_calibration<W: Write>(
    mut out: W,
    format: ReportFormat,
    report: &CalibrationReport,
) -> anyhow::Result<()> {
    if format == ReportFormat::Json {
        serde_json::to_writer_pretty(&mut out, report)?;
        writeln!(out)?;
        return Ok(());
    }

    let rate = |value: Option<f64>| value.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.4}"));
    writeln!(out, "true positives:     {}", report.true_positives)?;
    writeln!(out, "false positives:    {}", report.false_positives)?;
    writeln!(out, "false negatives:    {}", report.false_negatives)?;
    writeln!(out, "true negatives:     {}", report.true_negatives)?;
    writeln!(out, "unlabeled reported: {}", report.unlabeled_reported)?;
    writeln!(out, "precision:          {}", rate(report.precision))?;
    writeln!(out, "recall:             {}", rate(report.recall))?;
    writeln!(out, "f1:                 {}", rate(report.f1))?;
    Ok(())
}

pub fn write_review_queue<W: Write>(
    mut out: W,
    format: ReportFormat,
    rows: &[MergeCandidate],
) -> anyhow::Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rows)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            wtr.write_record(["id", "left_id", "right_id", "score", "status", "created_at"])?;
            for row in rows {
                wtr.write_record([
                    row.id.to_string(),
                    row.left_contact_id.clone(),
                    row.right_contact_id.clone(),
                    format!("{:.4}", row.score),
                    row.status.as_str().to_owned(),
                    row.created_at.to_rfc3339(),
                ])?;
            }
            wtr.flush()?;
        }
        ReportFormat::Text => {
            if rows.is_empty() {
                writeln!(out, "review queue is empty")?;
            }
            for row in rows {
                writeln!(
                    out,
                    "{}  {:.4}  {}  {}  {}",
                    row.id,
                    row.score,
                    row.status.as_str(),
                    row.left_contact_id,
                    row.right_contact_id
                )?;
            }
        }
    }
    Ok(())
}
