//! Desired holiday schedule
//!
//! The schedule is an ordered list of named holiday windows. The historical
//! input format is a table whose first row is a column header; here the
//! header is kept as its own value so data rows can never be confused with it.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::api::RemoteHoliday;

/// One desired holiday window. `from`/`to` are opaque and compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredHoliday {
    pub name: String,
    pub from: String,
    pub to: String,
}

impl DesiredHoliday {
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Same name and identical window
    pub fn matches(&self, remote: &RemoteHoliday) -> bool {
        self.name == remote.name && self.from == remote.from && self.to == remote.to
    }
}

/// Column titles shown above the schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleHeader(pub [String; 3]);

impl Default for ScheduleHeader {
    fn default() -> Self {
        Self(["Name".to_string(), "From".to_string(), "To".to_string()])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredSchedule {
    header: ScheduleHeader,
    rows: Vec<DesiredHoliday>,
}

/// On-disk shape of `hours.json`: either an object with a `holidays` list,
/// or the older bare table whose first row is the header
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HoursFile {
    Holidays {
        #[serde(default)]
        holidays: Vec<Vec<String>>,
    },
    Table(Vec<Vec<String>>),
}

impl DesiredSchedule {
    pub fn new(rows: Vec<DesiredHoliday>) -> Self {
        Self {
            header: ScheduleHeader::default(),
            rows,
        }
    }

    /// Build from a positional table. Row 0 is the header and is dropped
    /// whatever it contains.
    pub fn from_table(table: Vec<Vec<String>>) -> Result<Self> {
        let mut table = table.into_iter();
        let header = match table.next() {
            Some(first) if first.len() >= 3 => {
                ScheduleHeader([first[0].clone(), first[1].clone(), first[2].clone()])
            }
            _ => ScheduleHeader::default(),
        };

        let rows = table
            .enumerate()
            .map(|(i, row)| parse_row(row).with_context(|| format!("Invalid schedule row {}", i + 1)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { header, rows })
    }

    /// Parse the contents of an `hours.json` file
    pub fn from_json_str(content: &str) -> Result<Self> {
        let holidays =
            match serde_json::from_str(content).context("Failed to parse holiday schedule JSON")? {
                HoursFile::Holidays { holidays } => holidays,
                HoursFile::Table(table) => return Self::from_table(table),
            };

        let rows = holidays
            .into_iter()
            .enumerate()
            .map(|(i, row)| parse_row(row).with_context(|| format!("Invalid holiday entry {}", i)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(rows))
    }

    /// Load a schedule from an `hours.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read holiday schedule: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to load holiday schedule: {}", path.display()))
    }

    pub fn rows(&self) -> &[DesiredHoliday] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row equals `remote` on name, from and to
    pub fn contains_exact(&self, remote: &RemoteHoliday) -> bool {
        self.rows.iter().any(|row| row.matches(remote))
    }

    /// First row carrying `name`; later duplicates are never consulted
    pub fn first_named(&self, name: &str) -> Option<&DesiredHoliday> {
        self.rows.iter().find(|row| row.name == name)
    }

    /// Render header and rows as an aligned text table
    pub fn render_table(&self) -> String {
        let cells: Vec<[&str; 3]> = std::iter::once([
            self.header.0[0].as_str(),
            self.header.0[1].as_str(),
            self.header.0[2].as_str(),
        ])
        .chain(
            self.rows
                .iter()
                .map(|r| [r.name.as_str(), r.from.as_str(), r.to.as_str()]),
        )
        .collect();

        let mut widths = [0usize; 3];
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        cells
            .iter()
            .map(|row| {
                format!(
                    "{:<w0$}  {:<w1$}  {}",
                    row[0],
                    row[1],
                    row[2],
                    w0 = widths[0],
                    w1 = widths[1]
                )
                .trim_end()
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_row(row: Vec<String>) -> Result<DesiredHoliday> {
    let mut cells = row.into_iter();
    match (cells.next(), cells.next(), cells.next()) {
        (Some(name), Some(from), Some(to)) => Ok(DesiredHoliday::new(name, from, to)),
        _ => anyhow::bail!("expected [name, from, to]"),
    }
}
