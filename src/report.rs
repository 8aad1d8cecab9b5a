//! Rendering of classification results: the per-document output file and the console
//! confusion-matrix report.
//!
//! Both are built fully in memory first, so a failed run never leaves a partial file.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::knn::{ClassificationRun, ConfusionMatrix, Evaluation};

/// Shortest round-trip form, keeping `.0` on integral values (`1.0`, `0.5`).
///
/// Scientific notation gets a signed exponent of at least two digits (`1e-05`, `1e+16`).
fn format_float(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

fn render_section(out: &mut String, header: &str, eval: &Evaluation) {
    out.push_str(header);
    out.push('\n');
    for (i, prediction) in eval.predictions.iter().enumerate() {
        let _ = write!(out, "array:{i} {}", prediction.truth);
        for (label, score) in prediction.tally.scores() {
            let _ = write!(out, " {label} {}", format_float(score));
        }
        out.push('\n');
    }
}

/// Renders the output file: a training section then a test section, one line per document.
///
/// Each line is `array:<index> <truth> <label> <count/k> <label> <count/k> ...` with labels in
/// ranked vote order.
pub fn render_output(run: &ClassificationRun) -> String {
    let mut out = String::new();
    render_section(&mut out, "%%%%% training data:", &run.train);
    render_section(&mut out, "%%%%% test data:", &run.test);
    out
}

/// Writes [`render_output`] to `path`, replacing any existing file.
pub fn write_output(path: impl AsRef<Path>, run: &ClassificationRun) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_output(run)).map_err(|e| Error::io(path, e))?;
    info!("wrote predictions to {}", path.display());
    Ok(())
}

fn render_matrix(out: &mut String, set: &str, accuracy_name: &str, cm: &ConfusionMatrix) {
    let labels = cm.labels();
    let _ = writeln!(
        out,
        "Confusion matrix for the {set} data:\nrow is the truth, column is the system output\n"
    );
    let _ = writeln!(out, "\t\t{}", labels.join(" "));
    for truth in labels {
        out.push_str(truth);
        for predicted in labels {
            let _ = write!(out, "\t{}", cm.get(truth, predicted));
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "\n{accuracy_name} accuracy={}",
        format_float(cm.accuracy())
    );
}

/// Renders both confusion matrices, rows being the truth and columns the system output,
/// each followed by its accuracy line.
pub fn render_console_report(train: &ConfusionMatrix, test: &ConfusionMatrix) -> String {
    let mut out = String::new();
    render_matrix(&mut out, "training", "Training", train);
    out.push_str("\n\n");
    render_matrix(&mut out, "test", "Test", test);
    out
}
