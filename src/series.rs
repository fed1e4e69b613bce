//! Selection of result series returned by a time-series stats/query call.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ProbeError, Result};
use crate::value::{Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Stats,
    Query,
}

/// Tags a series must carry; extra tags on the series are ignored.
pub type TagFilter = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub name: String,
    pub tags: BTreeMap<String, String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Series {
    pub fn matches(&self, mode: RunMode, module: &str, tag_filter: &TagFilter) -> bool {
        if mode == RunMode::Query || module.is_empty() {
            return true;
        }
        self.name == module
            && tag_filter
                .iter()
                .all(|(key, expected)| self.tags.get(key) == Some(expected))
    }
}

pub fn select_series<'a>(
    all_series: &'a [Series],
    mode: RunMode,
    module: &str,
    tag_filter: &TagFilter,
) -> Vec<&'a Series> {
    all_series
        .iter()
        .filter(|s| s.matches(mode, module, tag_filter))
        .collect()
}

/// Which columns of a selected series become metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub mode: RunMode,
    /// Empty means every column.
    pub wanted: BTreeSet<String>,
    pub skip_time: bool,
}

impl ColumnFilter {
    fn includes(&self, column: &str) -> bool {
        if self.skip_time && column == "time" {
            return false;
        }
        self.mode == RunMode::Query || self.wanted.is_empty() || self.wanted.contains(column)
    }
}

/// Pull the wanted columns out of the single row of `series`.
///
/// A series without rows yields nothing; more than one row is an error since
/// there is no way to tell which one holds the current values.
pub fn extract_columns(series: &Series, filter: &ColumnFilter) -> Result<Vec<(String, Number)>> {
    let row = match series.rows.as_slice() {
        [] => {
            log::debug!("series {} has no rows", series.name);
            return Ok(Vec::new());
        }
        [row] => row,
        rows => {
            return Err(ProbeError::MultipleRows {
                series: series.name.clone(),
                rows: rows.len(),
            })
        }
    };

    if row.len() != series.columns.len() {
        return Err(ProbeError::RowShape {
            series: series.name.clone(),
            columns: series.columns.len(),
            cells: row.len(),
        });
    }

    let mut pairs = Vec::new();
    for (column, cell) in series.columns.iter().zip(row) {
        if !filter.includes(column) {
            continue;
        }
        let value = cell.as_number().ok_or_else(|| ProbeError::NotNumeric {
            series: series.name.clone(),
            column: column.clone(),
            value: cell.to_string(),
        })?;
        pairs.push((column.clone(), value));
    }
    Ok(pairs)
}

/// Select the matching series and collect their columns.
///
/// Producing no columns at all is reported as [`ProbeError::NoData`].
pub fn collect_metrics(
    all_series: &[Series],
    module: &str,
    tag_filter: &TagFilter,
    filter: &ColumnFilter,
    description: &str,
) -> Result<Vec<(String, Number)>> {
    let mut pairs = Vec::new();
    for series in select_series(all_series, filter.mode, module, tag_filter) {
        log::debug!("series {} {:?} matched", series.name, series.tags);
        pairs.extend(extract_columns(series, filter)?);
    }
    if pairs.is_empty() {
        return Err(ProbeError::NoData(description.to_string()));
    }
    Ok(pairs)
}
