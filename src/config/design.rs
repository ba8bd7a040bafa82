//! Design matrix references for the MLE module.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Numeric design matrix given inline on the command line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DesignGrid(Vec<Vec<f64>>);

impl DesignGrid {
    /// Parse `rows;separated,by,commas`, e.g. `"1,1;1,0"`.
    ///
    /// Every row must have the same number of finite values. A trailing `;`
    /// is tolerated.
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (i, row) in s
            .split(';')
            .map(str::trim)
            .enumerate()
            .filter(|(_, r)| !r.is_empty())
        {
            let values = row
                .split(',')
                .map(|v| {
                    let v = v.trim();
                    v.parse::<f64>()
                        .ok()
                        .filter(|x| x.is_finite())
                        .ok_or_else(|| format!("row {} holds non-numeric value '{v}'", i + 1))
                })
                .collect::<Result<Vec<_>, _>>()?;

            if let Some(first) = rows.first()
                && first.len() != values.len()
            {
                return Err(format!(
                    "row {} has {} columns, expected {}",
                    i + 1,
                    values.len(),
                    first.len()
                ));
            }
            rows.push(values);
        }

        if rows.is_empty() {
            return Err("design matrix is empty".to_string());
        }
        Ok(Self(rows))
    }

    /// Matrix rows, one per sample.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }

    /// Number of rows (samples).
    pub fn n_rows(&self) -> usize {
        self.0.len()
    }

    /// Number of columns (coefficients).
    pub fn n_cols(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }
}

/// Where the design matrix comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignMatrixRef {
    /// Matrix written on the command line.
    Inline(DesignGrid),
    /// Matrix file, read by the MLE handler.
    File(PathBuf),
}

impl DesignMatrixRef {
    /// Resolve a `--design-matrix` value.
    ///
    /// An existing file wins; otherwise a value containing `,` or `;` is
    /// parsed as an inline matrix. The file itself is never opened here.
    pub fn resolve(value: &str) -> Result<Self, String> {
        let path = Path::new(value);
        if path.is_file() {
            return Ok(Self::File(path.to_path_buf()));
        }
        if value.contains([',', ';']) {
            return DesignGrid::parse(value).map(Self::Inline);
        }
        Err(format!("design matrix file '{value}' does not exist"))
    }

    /// The inline grid, when the matrix was given on the command line.
    pub fn inline(&self) -> Option<&DesignGrid> {
        match self {
            Self::Inline(grid) => Some(grid),
            Self::File(_) => None,
        }
    }
}
