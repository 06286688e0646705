//! Mapping a measured foot length to a product page.
//!
//! Charts live under a catalog root as `<platform>/<gender>.csv`, each with a
//! `cm,url` header.

use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{FootError, Result};

/// One row of a size chart
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SizeRow {
    pub cm: f64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeChart {
    pub rows: Vec<SizeRow>,
}

impl SizeChart {
    pub fn from_rows(rows: Vec<SizeRow>) -> Self {
        Self { rows }
    }

    /// Parse a chart from CSV; `origin` is only used in error messages
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let rows = csv_reader
            .deserialize()
            .collect::<std::result::Result<Vec<SizeRow>, csv::Error>>()
            .map_err(|source| FootError::Chart {
                path: origin.to_path_buf(),
                source,
            })?;
        Ok(Self { rows })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| FootError::io(path, e))?;
        Self::from_reader(file, path)
    }

    /// Row whose `cm` is closest to `foot_size_cm`.
    ///
    /// On an exact tie the smaller size wins; among rows with the same size
    /// the first one wins.
    pub fn nearest(&self, foot_size_cm: f64) -> Option<&SizeRow> {
        let mut best: Option<(&SizeRow, f64)> = None;
        for row in &self.rows {
            if !row.cm.is_finite() {
                continue;
            }
            let distance = (row.cm - foot_size_cm).abs();
            best = match best {
                None => Some((row, distance)),
                Some((current, current_distance)) => {
                    if distance < current_distance
                        || (distance == current_distance && row.cm < current.cm)
                    {
                        Some((row, distance))
                    } else {
                        Some((current, current_distance))
                    }
                }
            };
        }
        best.map(|(row, _)| row)
    }
}

/// Directory of per-platform, per-gender size charts
#[derive(Debug, Clone)]
pub struct SizeCatalog {
    root: PathBuf,
}

impl SizeCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where the chart for this pair would live, if the names are usable as
    /// path components
    pub fn chart_path(&self, platform: &str, gender: &str) -> Option<PathBuf> {
        let platform = path_component(platform)?;
        let gender = path_component(gender)?;
        Some(self.root.join(platform).join(format!("{gender}.csv")))
    }

    pub fn chart(&self, platform: &str, gender: &str) -> Result<SizeChart> {
        let not_found = || FootError::ChartNotFound {
            platform: platform.to_string(),
            gender: gender.to_string(),
        };
        let path = self.chart_path(platform, gender).ok_or_else(not_found)?;
        if !path.is_file() {
            return Err(not_found());
        }
        SizeChart::load(&path)
    }

    /// Product URL for the size nearest to `foot_size_cm`
    pub fn lookup(&self, foot_size_cm: f64, gender: &str, platform: &str) -> Result<String> {
        if !foot_size_cm.is_finite() {
            return Err(FootError::InvalidSize {
                value: foot_size_cm,
            });
        }

        let chart = self.chart(platform, gender)?;
        let row = chart.nearest(foot_size_cm).ok_or_else(|| FootError::EmptyChart {
            path: self.chart_path(platform, gender).unwrap_or_default(),
        })?;
        tracing::debug!(
            query = foot_size_cm,
            matched = row.cm,
            platform,
            gender,
            "size chart match"
        );
        Ok(row.url.clone())
    }
}

/// Lower-cased name, or None if it could escape the catalog directory
fn path_component(name: &str) -> Option<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
    {
        return None;
    }
    Some(name)
}
