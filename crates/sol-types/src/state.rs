// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Field-Line State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{s, Array1};

use crate::config::MeshConfig;
use crate::constants::GUARD_CELLS;
use crate::error::{SolError, SolResult};

/// One rank's slice of the field line, with `GUARD_CELLS` guards per side.
/// Index 0 is upstream; the target sits beyond the last interior cell of
/// the last rank. Lengths are normalised to the hybrid Larmor radius.
#[derive(Debug, Clone)]
pub struct FieldLineMesh {
    /// Interior cells on this rank
    pub ny: usize,
    /// Interior cells on the whole line
    pub ny_global: usize,
    /// Global index of the first interior cell
    pub global_offset: usize,
    pub j: Array1<f64>,   // Jacobian (cross-section area)
    pub dy: Array1<f64>,  // cell length
    pub g22: Array1<f64>, // metric, physical length = dy * sqrt(g22)
    pub pos: Array1<f64>, // cell-centre position [m]
    /// Owns the upstream boundary
    pub first: bool,
    /// Owns the target boundary
    pub last: bool,
}

impl FieldLineMesh {
    /// Whole-line mesh with uniform spacing and area from the config profile.
    pub fn from_config(cfg: &MeshConfig, rho_s0: f64) -> SolResult<Self> {
        if cfg.ny < 2 {
            return Err(SolError::ConfigError(format!(
                "mesh.ny = {} must be >= 2",
                cfg.ny
            )));
        }
        if !(rho_s0.is_finite() && rho_s0 > 0.0) {
            return Err(SolError::ConfigError(format!(
                "rho_s0 = {rho_s0} must be > 0"
            )));
        }
        let dy_m = cfg.length / cfg.ny as f64;
        let area: Vec<f64> = (0..cfg.ny)
            .map(|i| cfg.area.evaluate((i as f64 + 0.5) * dy_m, i))
            .collect();
        Self::uniform(cfg.ny, dy_m / rho_s0, dy_m, &area)
    }

    /// Whole-line mesh: spacing `dy` (normalised), `dy_m` metres per cell,
    /// one area value per interior cell. Guard areas copy the nearest cell.
    pub fn uniform(ny: usize, dy: f64, dy_m: f64, area: &[f64]) -> SolResult<Self> {
        if area.len() != ny {
            return Err(SolError::ConfigError(format!(
                "Area profile has {} values for {ny} cells",
                area.len()
            )));
        }
        if let Some(bad) = area.iter().find(|a| !(a.is_finite() && **a > 0.0)) {
            return Err(SolError::PhysicsViolation(format!(
                "Jacobian must be finite and > 0, got {bad}"
            )));
        }
        if !(dy.is_finite() && dy > 0.0) {
            return Err(SolError::ConfigError(format!("dy = {dy} must be > 0")));
        }
        let n = ny + 2 * GUARD_CELLS;
        let j = Array1::from_shape_fn(n, |i| {
            let cell = i.saturating_sub(GUARD_CELLS).min(ny - 1);
            area[cell]
        });
        let pos = Array1::from_shape_fn(n, |i| (i as f64 - GUARD_CELLS as f64 + 0.5) * dy_m);
        Ok(FieldLineMesh {
            ny,
            ny_global: ny,
            global_offset: 0,
            j,
            dy: Array1::from_elem(n, dy),
            g22: Array1::ones(n),
            pos,
            first: true,
            last: true,
        })
    }

    /// Interior cells `offset..offset+ny` of a whole-line mesh, with guards.
    pub fn subdomain(&self, offset: usize, ny: usize) -> SolResult<Self> {
        if ny == 0 || offset + ny > self.ny {
            return Err(SolError::ConfigError(format!(
                "Subdomain {offset}+{ny} outside {} cells",
                self.ny
            )));
        }
        let range = s![offset..offset + ny + 2 * GUARD_CELLS];
        Ok(FieldLineMesh {
            ny,
            ny_global: self.ny_global,
            global_offset: self.global_offset + offset,
            j: self.j.slice(range).to_owned(),
            dy: self.dy.slice(range).to_owned(),
            g22: self.g22.slice(range).to_owned(),
            pos: self.pos.slice(range).to_owned(),
            first: self.first && offset == 0,
            last: self.last && offset + ny == self.ny,
        })
    }

    /// Index of the first interior cell.
    pub fn ystart(&self) -> usize {
        GUARD_CELLS
    }

    /// Index of the last interior cell.
    pub fn yend(&self) -> usize {
        GUARD_CELLS + self.ny - 1
    }

    /// Total cells including guards.
    pub fn len(&self) -> usize {
        self.ny + 2 * GUARD_CELLS
    }

    pub fn is_empty(&self) -> bool {
        self.ny == 0
    }

    /// Cell volume J·dy.
    pub fn volume(&self, i: usize) -> f64 {
        self.j[i] * self.dy[i]
    }

    /// Global interior index of local cell `i` (guards clamp to the ends).
    pub fn global_index(&self, i: usize) -> usize {
        (self.global_offset + i)
            .saturating_sub(GUARD_CELLS)
            .min(self.ny_global.saturating_sub(1))
    }

    /// Sum of f·J·dy over interior cells.
    pub fn integrate(&self, f: &Array1<f64>) -> f64 {
        (self.ystart()..=self.yend())
            .map(|i| f[i] * self.volume(i))
            .sum()
    }

    /// Zero-gradient guards at the physical ends owned by this rank.
    pub fn neumann(&self, f: &mut Array1<f64>) {
        let (ys, ye) = (self.ystart(), self.yend());
        for k in 1..=GUARD_CELLS {
            if self.first {
                f[ys - k] = f[ys];
            }
            if self.last {
                f[ye + k] = f[ye];
            }
        }
    }

    /// Guards mirror the interior with opposite sign: zero on the face.
    pub fn dirichlet_zero(&self, f: &mut Array1<f64>) {
        let (ys, ye) = (self.ystart(), self.yend());
        for k in 1..=GUARD_CELLS {
            if self.first {
                f[ys - k] = -f[ys + k - 1];
            }
            if self.last {
                f[ye + k] = -f[ye + 1 - k];
            }
        }
    }

    /// Upstream-only zero-gradient guards.
    pub fn neumann_lower(&self, f: &mut Array1<f64>) {
        if self.first {
            let ys = self.ystart();
            for k in 1..=GUARD_CELLS {
                f[ys - k] = f[ys];
            }
        }
    }

    /// Upstream-only reflecting guards.
    pub fn reflect_lower(&self, f: &mut Array1<f64>) {
        if self.first {
            let ys = self.ystart();
            for k in 1..=GUARD_CELLS {
                f[ys - k] = -f[ys + k - 1];
            }
        }
    }
}

/// Evolving variables on one mesh slice, guards included.
/// The same container holds time derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub ne: Array1<f64>,
    pub nvi: Array1<f64>,
    pub p: Array1<f64>,
    pub nn: Array1<f64>,
    pub nvn: Array1<f64>,
    pub pn: Array1<f64>,
}

impl FieldState {
    pub fn zeros(n: usize) -> Self {
        FieldState {
            ne: Array1::zeros(n),
            nvi: Array1::zeros(n),
            p: Array1::zeros(n),
            nn: Array1::zeros(n),
            nvn: Array1::zeros(n),
            pn: Array1::zeros(n),
        }
    }

    /// Static plasma and neutrals at uniform density and pressure.
    pub fn uniform(n: usize, ne: f64, p: f64, nn: f64, pn: f64) -> Self {
        FieldState {
            ne: Array1::from_elem(n, ne),
            nvi: Array1::zeros(n),
            p: Array1::from_elem(n, p),
            nn: Array1::from_elem(n, nn),
            nvn: Array1::zeros(n),
            pn: Array1::from_elem(n, pn),
        }
    }

    pub fn len(&self) -> usize {
        self.ne.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ne.is_empty()
    }

    /// Named references to every field, in a fixed order.
    pub fn fields(&self) -> [(&'static str, &Array1<f64>); 6] {
        [
            ("Ne", &self.ne),
            ("NVi", &self.nvi),
            ("P", &self.p),
            ("Nn", &self.nn),
            ("NVn", &self.nvn),
            ("Pn", &self.pn),
        ]
    }

    pub fn fields_mut(&mut self) -> [&mut Array1<f64>; 6] {
        [
            &mut self.ne,
            &mut self.nvi,
            &mut self.p,
            &mut self.nn,
            &mut self.nvn,
            &mut self.pn,
        ]
    }

    pub fn fill(&mut self, value: f64) {
        for f in self.fields_mut() {
            f.fill(value);
        }
    }

    /// Reject states whose fields do not match the mesh length.
    pub fn check_shape(&self, mesh: &FieldLineMesh) -> SolResult<()> {
        for (name, f) in self.fields() {
            if f.len() != mesh.len() {
                return Err(SolError::ConfigError(format!(
                    "Field {name} has {} cells, mesh has {}",
                    f.len(),
                    mesh.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(ny: usize) -> FieldLineMesh {
        FieldLineMesh::uniform(ny, 0.5, 0.1, &vec![2.0; ny]).expect("valid mesh")
    }

    #[test]
    fn test_uniform_mesh_layout() {
        let m = mesh(8);
        assert_eq!(m.len(), 12);
        assert_eq!(m.ystart(), 2);
        assert_eq!(m.yend(), 9);
        assert!((m.pos[m.ystart()] - 0.05).abs() < 1e-12);
        assert!((m.integrate(&Array1::ones(m.len())) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_subdomain_flags_and_offsets() {
        let m = mesh(8);
        let lower = m.subdomain(0, 3).expect("lower");
        let upper = m.subdomain(3, 5).expect("upper");
        assert!(lower.first && !lower.last);
        assert!(!upper.first && upper.last);
        assert_eq!(upper.global_offset, 3);
        assert_eq!(upper.global_index(upper.ystart()), 3);
        assert!(m.subdomain(6, 3).is_err());
    }

    #[test]
    fn test_boundary_helpers() {
        let m = mesh(4);
        let mut f = Array1::from_vec(vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 0.0]);
        m.neumann(&mut f);
        assert_eq!(f[0], 1.0);
        assert_eq!(f[1], 1.0);
        assert_eq!(f[6], 4.0);
        assert_eq!(f[7], 4.0);
        m.dirichlet_zero(&mut f);
        assert_eq!(f[1], -1.0);
        assert_eq!(f[0], -2.0);
        assert_eq!(f[6], -4.0);
        assert_eq!(f[7], -3.0);
    }

    #[test]
    fn test_rejects_bad_area() {
        assert!(FieldLineMesh::uniform(3, 1.0, 1.0, &[1.0, 0.0, 1.0]).is_err());
        assert!(FieldLineMesh::uniform(3, 1.0, 1.0, &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_state_shape_check() {
        let m = mesh(4);
        let state = FieldState::uniform(m.len(), 1.0, 2.0, 0.1, 0.1);
        assert!(state.check_shape(&m).is_ok());
        let short = FieldState::zeros(3);
        assert!(short.check_shape(&m).is_err());
    }
}
