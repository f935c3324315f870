//! Generic tabular browser.
//!
//! A [`Table`] is a list of [`Column`]s. Rendering a slice of rows produces a
//! [`TableView`]: headers, a body in one of three states (loading skeleton,
//! empty message, populated rows) and an optional pagination footer. The
//! table keeps no page state; the footer only reports which page the
//! "Previous"/"Next" controls would move to and the caller decides.
//!
//! ```
//! use mf_admin::pagination::Pagination;
//! use mf_admin::table::{Accessor, Column, Table};
//!
//! #[derive(serde::Serialize)]
//! struct Row { name: String, nav: f64 }
//!
//! let table = Table::new(vec![
//!     Column::field("Name", "name"),
//!     Column::computed("NAV", |r: &Row| format!("{:.2}", r.nav)).style("mono"),
//! ]);
//! let rows = [Row { name: "Flexi Cap".into(), nav: 12.5 }];
//! let view = table.render(&rows, false, Some(Pagination::new(1, 1, 10)));
//! assert_eq!(view.rows().unwrap()[0][1].text, "12.50");
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::constants::{EMPTY_TABLE_MESSAGE, NOT_AVAILABLE, SKELETON_ROWS};
use crate::pagination::Pagination;

/// Render function of a computed column.
pub type RenderFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// How a column gets its value out of a row.
pub enum Accessor<T> {
    /// A top-level field of the row's serialized (camelCase) form.
    Field(&'static str),
    /// Any rendering of the whole row.
    Computed(RenderFn<T>),
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// One column of a [`Table`].
#[derive(Debug)]
pub struct Column<T> {
    pub header: String,
    pub accessor: Accessor<T>,
    /// Free-form style tag passed through to the cells (e.g. `"mono"`).
    pub style: Option<&'static str>,
}

impl<T> Column<T> {
    pub fn field(header: impl Into<String>, field: &'static str) -> Self {
        Self {
            header: header.into(),
            accessor: Accessor::Field(field),
            style: None,
        }
    }

    pub fn computed(
        header: impl Into<String>,
        render: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            header: header.into(),
            accessor: Accessor::Computed(Box::new(render)),
            style: None,
        }
    }

    pub fn style(mut self, style: &'static str) -> Self {
        self.style = Some(style);
        self
    }
}

/// Resolve a column against a row. `json` is the row's serialized form,
/// computed once per row and only when some column needs it.
fn resolve<T>(accessor: &Accessor<T>, row: &T, json: Option<&Value>) -> String {
    match accessor {
        Accessor::Computed(render) => render(row),
        Accessor::Field(name) => match json.and_then(|v| v.get(*name)) {
            None | Some(Value::Null) => NOT_AVAILABLE.to_owned(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        },
    }
}

/// A rendered cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub style: Option<&'static str>,
}

/// Body of a rendered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// Placeholder rows while data is loading; the count never depends on
    /// the data.
    Loading { rows: usize },
    /// One message row spanning every column.
    Empty { message: &'static str, colspan: usize },
    Rows(Vec<Vec<Cell>>),
}

/// Output of [`Table::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub body: TableBody,
    pub pagination: Option<Pagination>,
}

impl TableView {
    /// Populated rows, `None` while loading or empty.
    pub fn rows(&self) -> Option<&[Vec<Cell>]> {
        match &self.body {
            TableBody::Rows(rows) => Some(rows),
            _ => None,
        }
    }
}

/// Column definitions for one entity type.
#[derive(Debug)]
pub struct Table<T> {
    columns: Vec<Column<T>>,
}

impl<T: Serialize> Table<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Render `rows` in the state implied by `loading` and the row count.
    pub fn render(&self, rows: &[T], loading: bool, pagination: Option<Pagination>) -> TableView {
        let headers = self.columns.iter().map(|c| c.header.clone()).collect();

        let body = if loading {
            TableBody::Loading {
                rows: SKELETON_ROWS,
            }
        } else if rows.is_empty() {
            TableBody::Empty {
                message: EMPTY_TABLE_MESSAGE,
                colspan: self.columns.len(),
            }
        } else {
            TableBody::Rows(rows.iter().map(|row| self.render_row(row)).collect())
        };

        TableView {
            headers,
            body,
            pagination,
        }
    }

    fn render_row(&self, row: &T) -> Vec<Cell> {
        let needs_json = self
            .columns
            .iter()
            .any(|c| matches!(c.accessor, Accessor::Field(_)));
        let json = if needs_json {
            serde_json::to_value(row).ok()
        } else {
            None
        };

        self.columns
            .iter()
            .map(|column| Cell {
                text: resolve(&column.accessor, row, json.as_ref()),
                style: column.style,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

const SKELETON_CELL: &str = "░░░░";

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<Vec<String>> = match &self.body {
            TableBody::Loading { rows } => {
                vec![vec![SKELETON_CELL.to_owned(); self.headers.len()]; *rows]
            }
            TableBody::Empty { .. } => Vec::new(),
            TableBody::Rows(rows) => rows
                .iter()
                .map(|row| row.iter().map(|c| c.text.clone()).collect())
                .collect(),
        };

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for line in &lines {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(f, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &rule, &widths)?;

        if let TableBody::Empty { message, .. } = &self.body {
            writeln!(f, "{message}")?;
        }
        for line in &lines {
            write_line(f, line, &widths)?;
        }

        if let Some(pagination) = &self.pagination {
            writeln!(f)?;
            write!(f, "{pagination}")?;
            if let Some(page) = pagination.previous_page() {
                write!(f, "  [prev: {page}]")?;
            }
            if let Some(page) = pagination.next_page() {
                write!(f, "  [next: {page}]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}
