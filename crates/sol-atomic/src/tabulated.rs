// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Tabulated Rate Coefficients
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Two-column `(Te, value)` text tables.
//!
//! `#` and `;` start comments; blank lines are skipped. Every other line
//! must hold exactly two numbers. Evaluation interpolates linearly and
//! holds the end values outside the tabulated range.

use log::info;
use sol_math::interp::{check_table, interp1d_clamped};
use sol_types::error::{SolError, SolResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub path: String,
    pub temperature: Vec<f64>,
    pub value: Vec<f64>,
}

fn strip_comment(line: &str) -> &str {
    match line.find(['#', ';']) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

impl RateTable {
    pub fn from_file(path: &str) -> SolResult<Self> {
        info!("Loading data from file: {path}");
        let contents = std::fs::read_to_string(path)?;
        Self::parse(path, &contents)
    }

    /// Parse table text; `path` labels errors.
    pub fn parse(path: &str, contents: &str) -> SolResult<Self> {
        let mut temperature = Vec::new();
        let mut value = Vec::new();
        for (idx, raw) in contents.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let malformed = || SolError::TableFormat {
                path: path.to_string(),
                line: idx + 1,
                content: raw.to_string(),
            };
            let mut fields = line.split_whitespace();
            let t: f64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(malformed)?;
            let v: f64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(malformed)?;
            if fields.next().is_some() || !t.is_finite() || !v.is_finite() || v < 0.0 {
                return Err(malformed());
            }
            temperature.push(t);
            value.push(v);
        }
        if temperature.is_empty() {
            return Err(SolError::ConfigError(format!("Table '{path}' has no data")));
        }
        check_table(&temperature, &value)
            .map_err(|e| SolError::ConfigError(format!("Table '{path}': {e}")))?;
        Ok(RateTable {
            path: path.to_string(),
            temperature,
            value,
        })
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        interp1d_clamped(&self.temperature, &self.value, t)
    }
}
