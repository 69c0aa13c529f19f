//! Text and JSON rendering of the CLI results.

use std::io::Write;

use anyhow::Result;
use machine_learning::metrics::Evaluation;
use serde::Serialize;

use predictor::{
    Prediction, Session,
    configs::Feature,
    data::{DatasetSummary, Describe, NeighborhoodEncoding, Row, Table},
};

#[derive(Serialize)]
struct PredictionReport<'a> {
    prediction: &'a Prediction,
    metrics: &'a Evaluation,
}

#[derive(Serialize)]
struct EvaluationReport<'a> {
    metrics: &'a Evaluation,
    features: &'a [Feature],
    train_rows: usize,
    test_rows: usize,
}

#[derive(Serialize)]
struct DatasetReport<'a> {
    records: Vec<Row<'a>>,
    summary: &'a DatasetSummary,
}

#[derive(Serialize)]
struct NeighborhoodEntry<'a> {
    code: usize,
    name: &'a str,
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_metrics<W: Write>(out: &mut W, metrics: &Evaluation) -> Result<()> {
    writeln!(out, "mean absolute error:     {:.2}", metrics.mean_absolute_error)?;
    writeln!(out, "root mean squared error: {:.2}", metrics.root_mean_squared_error)?;
    writeln!(out, "r squared:               {:.4}", metrics.r_squared)?;
    Ok(())
}

pub fn prediction<W: Write>(
    out: &mut W,
    prediction: &Prediction,
    metrics: &Evaluation,
    json: bool,
) -> Result<()> {
    if json {
        return write_json(out, &PredictionReport { prediction, metrics });
    }

    writeln!(
        out,
        "{} at {} sqm: {:.2} SAR ({:.2} SAR/sqm)",
        prediction.neighborhood, prediction.area, prediction.price, prediction.price_per_area
    )?;
    writeln!(out)?;
    write_metrics(out, metrics)
}

pub fn evaluation<W: Write>(out: &mut W, session: &Session, json: bool) -> Result<()> {
    let report = EvaluationReport {
        metrics: session.metrics(),
        features: session.features().features(),
        train_rows: session.train_len(),
        test_rows: session.test_len(),
    };
    if json {
        return write_json(out, &report);
    }

    writeln!(
        out,
        "trained on {} rows, scored on {} held-out rows",
        report.train_rows, report.test_rows
    )?;
    write_metrics(out, report.metrics)
}

pub fn dataset<W: Write>(
    out: &mut W,
    table: &Table,
    summary: &DatasetSummary,
    json: bool,
) -> Result<()> {
    if json {
        let records = table.rows().collect();
        return write_json(out, &DatasetReport { records, summary });
    }

    let cell = |value: Option<&str>| value.unwrap_or("-").to_string();
    let number = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
    for row in table.rows() {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            cell(row.neighborhood_name),
            cell(row.classification_name),
            cell(row.property_type_name),
            number(row.area),
            number(row.price_in_sar)
        )?;
    }

    writeln!(out, "\n{} rows", summary.rows)?;
    let columns = [
        ("price", summary.price),
        ("area", summary.area),
        ("price per area", summary.price_per_area),
    ];
    for (name, stats) in columns {
        if let Some(stats) = stats {
            write_describe(out, name, &stats)?;
        }
    }

    if let Some(averages) = &summary.by_neighborhood {
        writeln!(out, "\naverage price by neighborhood")?;
        for avg in averages {
            writeln!(
                out,
                "  {}: {:.2} SAR over {} sales",
                avg.neighborhood, avg.average_price, avg.count
            )?;
        }
    }

    Ok(())
}

fn write_describe<W: Write>(out: &mut W, name: &str, stats: &Describe) -> Result<()> {
    writeln!(
        out,
        "{name}: count {} mean {:.2} std {:.2} min {:.2} 25% {:.2} 50% {:.2} 75% {:.2} max {:.2}",
        stats.count,
        stats.mean,
        stats.std,
        stats.min,
        stats.q25,
        stats.median,
        stats.q75,
        stats.max
    )?;
    Ok(())
}

pub fn neighborhoods<W: Write>(
    out: &mut W,
    encoding: &NeighborhoodEncoding,
    json: bool,
) -> Result<()> {
    if json {
        let entries: Vec<_> = encoding
            .iter()
            .map(|(code, name)| NeighborhoodEntry { code, name })
            .collect();
        return write_json(out, &entries);
    }

    for (code, name) in encoding.iter() {
        writeln!(out, "{code}\t{name}")?;
    }
    Ok(())
}
