//! Flat-file loaders used by the `ngeval` binary
//!
//! Formats (whitespace delimited, blank lines ignored):
//! - expression matrix: one row of floats per item
//! - names: one item name per line
//! - assignments: one integer cluster ID per line (negative = unclustered)
//! - external clusters: `<name> <label>` per line, where labels are either all
//!   integers or all arbitrary strings

use crate::matrix::ExpressionMatrix;
use crate::partition::{Partition, UNCLUSTERED};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Parse a whitespace-delimited expression matrix
pub fn parse_matrix(text: &str) -> Result<ExpressionMatrix> {
    let mut rows = Vec::new();
    for (line_no, line) in content_lines(text) {
        let row = line
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .with_context(|| format!("Invalid number on line {}", line_no))?;
        rows.push(row);
    }
    ExpressionMatrix::from_rows(&rows).context("Malformed expression matrix")
}

pub fn load_matrix(path: &Path) -> Result<ExpressionMatrix> {
    parse_matrix(&read(path)?).with_context(|| format!("Failed to load {}", path.display()))
}

/// Parse item names (first token of each line)
pub fn parse_names(text: &str) -> Vec<String> {
    content_lines(text)
        .filter_map(|(_, line)| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

pub fn load_names(path: &Path) -> Result<Vec<String>> {
    Ok(parse_names(&read(path)?))
}

/// Parse one integer cluster ID per line
///
/// IDs must be below the number of assignments in the file.
pub fn parse_assignments(text: &str) -> Result<Partition> {
    let parsed = content_lines(text)
        .map(|(line_no, line)| {
            line.parse::<i64>()
                .map(|id| (line_no, id))
                .with_context(|| format!("Invalid cluster ID '{}' on line {}", line, line_no))
        })
        .collect::<Result<Vec<(usize, i64)>>>()?;

    let count = parsed.len();
    if let Some(&(line_no, id)) = parsed
        .iter()
        .find(|&&(_, id)| usize::try_from(id).is_ok_and(|id| id >= count))
    {
        bail!(
            "Cluster ID {} on line {} is out of range for {} assignments",
            id,
            line_no,
            count
        );
    }

    Ok(Partition::new(parsed.into_iter().map(|(_, id)| id).collect()))
}

pub fn load_assignments(path: &Path) -> Result<Partition> {
    parse_assignments(&read(path)?).with_context(|| format!("Failed to load {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LabelKind {
    Integer,
    Text,
}

/// Parse an external clustering of the named items
///
/// Items missing from the file stay unclustered, names not in `names` are
/// ignored. The kind of the first label decides how all labels are read:
/// integers are used as cluster IDs, text labels get dense IDs in order of
/// first appearance. An integer file containing a text label is an error.
pub fn parse_external_clusters(names: &[String], text: &str) -> Result<Partition> {
    let positions: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut labels = vec![UNCLUSTERED; names.len()];
    let mut label_kind = None;
    let mut text_ids: HashMap<String, i64> = HashMap::new();

    for (line_no, line) in content_lines(text) {
        let Some((name, label)) = line.split_once(char::is_whitespace) else {
            bail!("Line {} needs a name and a cluster label", line_no);
        };
        let label = label.trim();

        let kind = *label_kind.get_or_insert_with(|| {
            if label.parse::<i64>().is_ok() {
                LabelKind::Integer
            } else {
                LabelKind::Text
            }
        });

        let cluster_id = match kind {
            LabelKind::Integer => label.parse::<i64>().with_context(|| {
                format!(
                    "Line {}: label '{}' mixed with integer cluster IDs",
                    line_no, label
                )
            })?,
            LabelKind::Text => {
                let next = text_ids.len() as i64;
                *text_ids.entry(label.to_string()).or_insert(next)
            }
        };

        if let Some(&i) = positions.get(name) {
            labels[i] = cluster_id;
        }
    }

    Ok(Partition::new(labels))
}

pub fn load_external_clusters(names: &[String], path: &Path) -> Result<Partition> {
    parse_external_clusters(names, &read(path)?)
        .with_context(|| format!("Failed to load {}", path.display()))
}
