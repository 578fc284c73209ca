// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Error Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("Non-finite {quantity} at cell {cell}: {value}")]
    NonFinite {
        quantity: &'static str,
        cell: usize,
        value: f64,
    },

    #[error("Malformed table '{path}' line {line}: {content}")]
    TableFormat {
        path: String,
        line: usize,
        content: String,
    },

    #[error("Communication error: {0}")]
    Communication(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Linear algebra error: {0}")]
    LinAlg(String),
}

pub type SolResult<T> = Result<T, SolError>;

/// Return `NonFinite` for the first non-finite entry of `values`.
pub fn ensure_finite(quantity: &'static str, values: &[f64]) -> SolResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(cell) => Err(SolError::NonFinite {
            quantity,
            cell,
            value: values[cell],
        }),
        None => Ok(()),
    }
}
