// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column-aligned text tables.

use std::io::Write;

use crate::color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    Plain,
    Muted,
    Status,
}

pub struct Column {
    name: &'static str,
    style: Style,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Self { name, style: Style::Plain }
    }

    pub fn muted(name: &'static str) -> Self {
        Self { name, style: Style::Muted }
    }

    /// Cells are colored by job status.
    pub fn status(name: &'static str) -> Self {
        Self { name, style: Style::Status }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Write the header and rows; widths come from the plain cell text so
    /// color codes do not skew alignment. The last column is not padded.
    pub fn render(&self, out: &mut (impl Write + ?Sized)) {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows.iter().filter_map(|r| r.get(i)).map(|c| c.chars().count()).fold(col.name.len(), usize::max)
            })
            .collect();
        let last = self.columns.len().saturating_sub(1);

        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| pad(col.name, widths[i], i == last))
            .collect();
        let _ = writeln!(out, "{}", color::header(header.join("  ").trim_end()));

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let text = row.get(i).map(String::as_str).unwrap_or("");
                    let padding = " ".repeat(if i == last { 0 } else { widths[i] - text.chars().count() });
                    let styled = match col.style {
                        Style::Plain => text.to_string(),
                        Style::Muted => color::muted(text),
                        Style::Status => color::status(text),
                    };
                    format!("{styled}{padding}")
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join("  ").trim_end());
        }
    }
}

fn pad(text: &str, width: usize, last: bool) -> String {
    if last {
        text.to_string()
    } else {
        format!("{text:<width$}")
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
