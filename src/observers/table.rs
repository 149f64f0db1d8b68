//! Table observer for pretty-printing the dashboard panels.
//!
//! Requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! conteggi = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use conteggi::observers::table::TableObserver;
//!
//! let observer = TableObserver::new().with_title("// DEV_METRICS_DASHBOARD");
//! println!("{}", observer.render(dashboard.panels()));
//! // // DEV_METRICS_DASHBOARD
//! // ╭──────────────┬─────────────────────────────────────────────┬───────╮
//! // │ Panel        │ Description                                 │ Value │
//! // ├──────────────┼─────────────────────────────────────────────┼───────┤
//! // │ SYSTEM_INIT  │ Total application initialization sequences. │ 128   │
//! // │ NAV_CYCLE    │ Internal routing events and tab switches.   │ ----  │
//! // ╰──────────────┴─────────────────────────────────────────────┴───────╯
//! ```
//!
//! In compact mode every panel becomes a `LABEL: value` cell laid out in a
//! grid, the way the dashboard shows its metric cards:
//!
//! ```rust,ignore
//! let observer = TableObserver::new().compact(true).columns(2);
//! // ╭───────────────────┬─────────────────╮
//! // │ SYSTEM_INIT: 128  │ NAV_CYCLE: 40   │
//! // ├───────────────────┼─────────────────┤
//! // │ OUTBOUND_SIG: 12  │ STREAM_OPS: 7   │
//! // ╰───────────────────┴─────────────────╯
//! ```

use crate::counters::Observable;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

/// Border style of the rendered table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// Box-drawing characters with rounded corners.
    #[default]
    Rounded,
    /// Plain `+`, `-` and `|`, for terminals and log files without Unicode.
    Ascii,
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Border style.
    pub style: TableStyle,
    /// Line printed above the table.
    pub title: Option<String>,
    /// Render `LABEL: value` cells instead of one row per panel.
    pub compact: bool,
    /// Cells per row in compact mode.
    pub columns: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            title: None,
            compact: false,
            columns: 1,
        }
    }
}

#[derive(Tabled)]
struct PanelRow {
    #[tabled(rename = "Panel")]
    label: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// An observer that renders metrics as a table. Unset values show as `----`.
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates an observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an observer from `config`.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the border style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Sets a title printed above the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Enables or disables compact mode.
    pub fn compact(mut self, enabled: bool) -> Self {
        self.config.compact = enabled;
        self
    }

    /// Sets the cells per row in compact mode. Zero is treated as one.
    pub fn columns(mut self, count: usize) -> Self {
        self.config.columns = count.max(1);
        self
    }

    /// Renders the metrics.
    ///
    /// An empty iterator yields an empty string in compact mode and a
    /// header-only table otherwise.
    pub fn render<'a>(&self, metrics: impl Iterator<Item = &'a dyn Observable>) -> String {
        let table = if self.config.compact {
            let cells: Vec<String> = metrics
                .map(|m| format!("{}: {}", m.name(), m.value()))
                .collect();
            if cells.is_empty() {
                return String::new();
            }
            let mut builder = Builder::default();
            for chunk in cells.chunks(self.config.columns.max(1)) {
                let mut row = chunk.to_vec();
                row.resize(self.config.columns.max(1), String::new());
                builder.push_record(row);
            }
            builder.build()
        } else {
            let rows: Vec<PanelRow> = metrics
                .map(|m| PanelRow {
                    label: m.name().to_string(),
                    description: m.description().to_string(),
                    value: m.value().to_string(),
                })
                .collect();
            Table::new(&rows)
        };
        self.finish(table)
    }

    fn finish(&self, mut table: Table) -> String {
        match self.config.style {
            TableStyle::Rounded => table.with(Style::rounded()),
            TableStyle::Ascii => table.with(Style::ascii()),
        };
        match &self.config.title {
            Some(title) => format!("{title}\n{table}"),
            None => table.to_string(),
        }
    }
}
