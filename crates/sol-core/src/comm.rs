// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Rank Communication
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rank communication and field-line domain decomposition.
//!
//! The model reaches other ranks only through [`Communicator`]: one global
//! sum at initialisation, and per call the controller sum, the broadcast of
//! the redistributed recycling total and the fast-CX sums. Guard cells at
//! internal rank boundaries are filled by the caller before each call; the
//! helpers below split a whole-line array into rank slices, exchange guard
//! cells between in-process slices and stitch interiors back together.

use std::sync::{Arc, Barrier, Mutex};

use ndarray::{s, Array1};
use sol_types::constants::GUARD_CELLS;
use sol_types::error::{SolError, SolResult};
use sol_types::state::{FieldLineMesh, FieldState};

pub trait Communicator: Send + Sync {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// Sum over all ranks. Every rank receives the same value.
    fn reduce_sum(&self, value: f64) -> SolResult<f64>;

    fn reduce_max(&self, value: f64) -> SolResult<f64>;

    /// Value held by the single rank that passes `owner = true`.
    fn broadcast_from_owner(&self, value: f64, owner: bool) -> SolResult<f64>;
}

/// Single rank: reductions are the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn reduce_sum(&self, value: f64) -> SolResult<f64> {
        Ok(value)
    }

    fn reduce_max(&self, value: f64) -> SolResult<f64> {
        Ok(value)
    }

    fn broadcast_from_owner(&self, value: f64, owner: bool) -> SolResult<f64> {
        if owner {
            Ok(value)
        } else {
            Err(SolError::Communication(
                "Broadcast on a single rank that does not own the value".to_string(),
            ))
        }
    }
}

#[derive(Debug)]
struct Exchange {
    barrier: Barrier,
    slots: Mutex<Vec<Option<f64>>>,
}

/// In-process ranks backed by a shared barrier. Each handle of a group must
/// be driven from its own thread, and every rank must make the same
/// sequence of collective calls.
#[derive(Debug, Clone)]
pub struct SharedMemoryComm {
    rank: usize,
    size: usize,
    shared: Arc<Exchange>,
}

impl SharedMemoryComm {
    pub fn group(size: usize) -> SolResult<Vec<Self>> {
        if size == 0 {
            return Err(SolError::Communication(
                "Communicator group requires at least one rank".to_string(),
            ));
        }
        let shared = Arc::new(Exchange {
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![None; size]),
        });
        Ok((0..size)
            .map(|rank| SharedMemoryComm {
                rank,
                size,
                shared: Arc::clone(&shared),
            })
            .collect())
    }

    fn all_gather(&self, value: Option<f64>) -> SolResult<Vec<Option<f64>>> {
        let poisoned = |_| SolError::Communication(format!("Rank {} found a poisoned exchange", self.rank));
        {
            let mut slots = self.shared.slots.lock().map_err(poisoned)?;
            slots[self.rank] = value;
        }
        self.shared.barrier.wait();
        let gathered = self.shared.slots.lock().map_err(poisoned)?.clone();
        // Nobody may overwrite a slot until every rank has read it
        self.shared.barrier.wait();
        Ok(gathered)
    }
}

impl Communicator for SharedMemoryComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn reduce_sum(&self, value: f64) -> SolResult<f64> {
        // Rank order is fixed, so every rank sums in the same order
        Ok(self.all_gather(Some(value))?.into_iter().flatten().sum())
    }

    fn reduce_max(&self, value: f64) -> SolResult<f64> {
        Ok(self
            .all_gather(Some(value))?
            .into_iter()
            .flatten()
            .fold(f64::NEG_INFINITY, f64::max))
    }

    fn broadcast_from_owner(&self, value: f64, owner: bool) -> SolResult<f64> {
        let held: Vec<f64> = self
            .all_gather(owner.then_some(value))?
            .into_iter()
            .flatten()
            .collect();
        match held.as_slice() {
            [v] => Ok(*v),
            other => Err(SolError::Communication(format!(
                "Broadcast expects exactly one owning rank, found {}",
                other.len()
            ))),
        }
    }
}

// ── Decomposition ────────────────────────────────────────────────────

/// Interior cells `y_start..y_end` of the whole line, owned by `rank`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLineSlice {
    pub rank: usize,
    pub nranks: usize,
    pub ny_global: usize,
    pub ny: usize,
    pub y_start: usize,
    pub y_end: usize,
}

impl FieldLineSlice {
    pub fn owns_upstream(&self) -> bool {
        self.rank == 0
    }

    pub fn owns_target(&self) -> bool {
        self.rank + 1 == self.nranks
    }

    /// Local length including guards.
    pub fn len(&self) -> usize {
        self.ny + 2 * GUARD_CELLS
    }

    pub fn is_empty(&self) -> bool {
        self.ny == 0
    }
}

/// Near-equal split, remainder going to the upstream ranks. Each rank needs
/// at least `GUARD_CELLS` interior cells to feed its neighbours' guards.
pub fn decompose_field_line(ny_global: usize, nranks: usize) -> SolResult<Vec<FieldLineSlice>> {
    if nranks < 1 {
        return Err(SolError::ConfigError(
            "Decomposition requires nranks >= 1".to_string(),
        ));
    }
    if ny_global < nranks * GUARD_CELLS {
        return Err(SolError::ConfigError(format!(
            "Cannot split ny={ny_global} across nranks={nranks} with {GUARD_CELLS} guard cells"
        )));
    }

    let base = ny_global / nranks;
    let rem = ny_global % nranks;
    let mut out = Vec::with_capacity(nranks);
    let mut cursor = 0usize;
    for rank in 0..nranks {
        let ny = base + usize::from(rank < rem);
        out.push(FieldLineSlice {
            rank,
            nranks,
            ny_global,
            ny,
            y_start: cursor,
            y_end: cursor + ny,
        });
        cursor += ny;
    }
    Ok(out)
}

/// Per-rank meshes of a whole-line mesh.
pub fn mesh_slices(mesh: &FieldLineMesh, slices: &[FieldLineSlice]) -> SolResult<Vec<FieldLineMesh>> {
    slices
        .iter()
        .map(|sdef| {
            if sdef.ny_global != mesh.ny {
                return Err(SolError::ConfigError(format!(
                    "Slice/mesh mismatch: slice.ny_global={} mesh.ny={}",
                    sdef.ny_global, mesh.ny
                )));
            }
            mesh.subdomain(sdef.y_start, sdef.ny)
        })
        .collect()
}

fn check_slice(sdef: &FieldLineSlice, global_len: usize) -> SolResult<()> {
    if sdef.ny_global + 2 * GUARD_CELLS != global_len {
        return Err(SolError::ConfigError(format!(
            "Slice/global mismatch: slice.ny_global={} global length={global_len}",
            sdef.ny_global
        )));
    }
    if sdef.y_start >= sdef.y_end || sdef.y_end > sdef.ny_global {
        return Err(SolError::ConfigError(format!(
            "Invalid slice bounds y_start={} y_end={} ny_global={}",
            sdef.y_start, sdef.y_end, sdef.ny_global
        )));
    }
    Ok(())
}

/// Cut a whole-line array (guards included) into rank-local arrays whose
/// guards hold the neighbouring interior values.
pub fn split_with_guards(
    global: &Array1<f64>,
    slices: &[FieldLineSlice],
) -> SolResult<Vec<Array1<f64>>> {
    if slices.is_empty() {
        return Err(SolError::ConfigError(
            "No slices provided for split_with_guards".to_string(),
        ));
    }
    if global.iter().any(|v| !v.is_finite()) {
        return Err(SolError::PhysicsViolation(
            "Global array contains non-finite values".to_string(),
        ));
    }
    slices
        .iter()
        .map(|sdef| {
            check_slice(sdef, global.len())?;
            Ok(global
                .slice(s![sdef.y_start..sdef.y_end + 2 * GUARD_CELLS])
                .to_owned())
        })
        .collect()
}

/// Interior cells adjacent to the lower and upper guards.
pub fn pack_guard_cells(local: &Array1<f64>) -> SolResult<(Array1<f64>, Array1<f64>)> {
    let n = local.len();
    if n < 3 * GUARD_CELLS {
        return Err(SolError::ConfigError(format!(
            "Local slice has {n} cells, too few for {GUARD_CELLS} guard cells"
        )));
    }
    let lower = local.slice(s![GUARD_CELLS..2 * GUARD_CELLS]).to_owned();
    let upper = local.slice(s![n - 2 * GUARD_CELLS..n - GUARD_CELLS]).to_owned();
    Ok((lower, upper))
}

pub fn apply_guard_cells(
    local: &mut Array1<f64>,
    recv_lower: Option<&Array1<f64>>,
    recv_upper: Option<&Array1<f64>>,
) -> SolResult<()> {
    let n = local.len();
    if n < 3 * GUARD_CELLS {
        return Err(SolError::ConfigError(format!(
            "Local slice has {n} cells, too few for {GUARD_CELLS} guard cells"
        )));
    }
    for (name, recv) in [("Lower", recv_lower), ("Upper", recv_upper)] {
        if let Some(r) = recv {
            if r.len() != GUARD_CELLS {
                return Err(SolError::ConfigError(format!(
                    "{name} guard length mismatch: expected {GUARD_CELLS}, got {}",
                    r.len()
                )));
            }
            if r.iter().any(|v| !v.is_finite()) {
                return Err(SolError::PhysicsViolation(format!(
                    "{name} guard cells contain non-finite values"
                )));
            }
        }
    }
    if let Some(lower) = recv_lower {
        local.slice_mut(s![0..GUARD_CELLS]).assign(lower);
    }
    if let Some(upper) = recv_upper {
        local.slice_mut(s![n - GUARD_CELLS..n]).assign(upper);
    }
    Ok(())
}

/// Fill internal guards of in-process rank slices from their neighbours.
/// Physical guards are left alone.
pub fn serial_guard_exchange(
    locals: &mut [Array1<f64>],
    slices: &[FieldLineSlice],
) -> SolResult<()> {
    if locals.len() != slices.len() {
        return Err(SolError::ConfigError(format!(
            "Guard exchange mismatch: locals={} slices={}",
            locals.len(),
            slices.len()
        )));
    }
    let packed: Vec<(Array1<f64>, Array1<f64>)> =
        locals.iter().map(pack_guard_cells).collect::<SolResult<_>>()?;

    for (idx, local) in locals.iter_mut().enumerate() {
        let recv_lower = (!slices[idx].owns_upstream()).then(|| &packed[idx - 1].1);
        let recv_upper = (!slices[idx].owns_target()).then(|| &packed[idx + 1].0);
        apply_guard_cells(local, recv_lower, recv_upper)?;
    }
    Ok(())
}

/// Reassemble a whole-line array from rank interiors; the physical guards
/// come from the first and last slices.
pub fn stitch_without_guards(
    locals: &[Array1<f64>],
    slices: &[FieldLineSlice],
) -> SolResult<Array1<f64>> {
    let (Some(first), Some(last)) = (slices.first(), slices.last()) else {
        return Err(SolError::ConfigError(
            "No slices provided for stitch_without_guards".to_string(),
        ));
    };
    if locals.len() != slices.len() {
        return Err(SolError::ConfigError(format!(
            "Stitch mismatch: locals={} slices={}",
            locals.len(),
            slices.len()
        )));
    }
    let global_len = first.ny_global + 2 * GUARD_CELLS;
    let mut global = Array1::zeros(global_len);
    for (sdef, local) in slices.iter().zip(locals) {
        check_slice(sdef, global_len)?;
        if local.len() != sdef.len() {
            return Err(SolError::ConfigError(format!(
                "Local slice length {} does not match rank {} ({} expected)",
                local.len(),
                sdef.rank,
                sdef.len()
            )));
        }
        global
            .slice_mut(s![GUARD_CELLS + sdef.y_start..GUARD_CELLS + sdef.y_end])
            .assign(&local.slice(s![GUARD_CELLS..GUARD_CELLS + sdef.ny]));
    }
    let lower = &locals[0];
    let upper = &locals[locals.len() - 1];
    global
        .slice_mut(s![0..GUARD_CELLS])
        .assign(&lower.slice(s![0..GUARD_CELLS]));
    global
        .slice_mut(s![global_len - GUARD_CELLS..])
        .assign(&upper.slice(s![last.len() - GUARD_CELLS..]));
    Ok(global)
}

// ── Whole-state helpers ──────────────────────────────────────────────

pub fn split_state(global: &FieldState, slices: &[FieldLineSlice]) -> SolResult<Vec<FieldState>> {
    let mut out: Vec<FieldState> = slices.iter().map(|s| FieldState::zeros(s.len())).collect();
    for (k, (_, field)) in global.fields().into_iter().enumerate() {
        let parts = split_with_guards(field, slices)?;
        for (state, part) in out.iter_mut().zip(parts) {
            let mut targets = state.fields_mut();
            *targets[k] = part;
        }
    }
    Ok(out)
}

pub fn exchange_state_guards(locals: &mut [FieldState], slices: &[FieldLineSlice]) -> SolResult<()> {
    for k in 0..6 {
        let mut fields: Vec<Array1<f64>> =
            locals.iter().map(|s| s.fields()[k].1.clone()).collect();
        serial_guard_exchange(&mut fields, slices)?;
        for (state, field) in locals.iter_mut().zip(fields) {
            let mut targets = state.fields_mut();
            *targets[k] = field;
        }
    }
    Ok(())
}

pub fn stitch_state(locals: &[FieldState], slices: &[FieldLineSlice]) -> SolResult<FieldState> {
    let len = slices
        .first()
        .map(|s| s.ny_global + 2 * GUARD_CELLS)
        .unwrap_or(0);
    let mut global = FieldState::zeros(len);
    for k in 0..6 {
        let fields: Vec<Array1<f64>> = locals.iter().map(|s| s.fields()[k].1.clone()).collect();
        let stitched = stitch_without_guards(&fields, slices)?;
        let mut targets = global.fields_mut();
        *targets[k] = stitched;
    }
    Ok(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn ramp(ny: usize) -> Array1<f64> {
        Array1::from_shape_fn(ny + 2 * GUARD_CELLS, |i| i as f64 * 0.5 + 1.0)
    }

    #[test]
    fn test_decompose_balanced() {
        let slices = decompose_field_line(11, 3).expect("valid decomposition");
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].ny, 4);
        assert_eq!(slices[1].ny, 4);
        assert_eq!(slices[2].ny, 3);
        assert_eq!(slices[0].y_start, 0);
        assert_eq!(slices[2].y_end, 11);
        assert!(slices[0].owns_upstream() && !slices[0].owns_target());
        assert!(slices[2].owns_target());
    }

    #[test]
    fn test_decompose_rejects_thin_slices() {
        let err = decompose_field_line(5, 3).expect_err("5 cells cannot feed 3 ranks");
        match err {
            SolError::ConfigError(msg) => assert!(msg.contains("nranks=3"), "{msg}"),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_split_stitch_roundtrip() {
        let global = ramp(10);
        let slices = decompose_field_line(10, 3).expect("valid decomposition");
        let locals = split_with_guards(&global, &slices).expect("split");
        let stitched = stitch_without_guards(&locals, &slices).expect("stitch");
        assert_eq!(stitched, global);
    }

    #[test]
    fn test_guard_exchange_copies_neighbour_interior() {
        let global = ramp(8);
        let slices = decompose_field_line(8, 2).expect("valid decomposition");
        let mut locals = split_with_guards(&global, &slices).expect("split");
        for local in locals.iter_mut() {
            local.fill(-1.0);
            local
                .slice_mut(s![GUARD_CELLS..local.len() - GUARD_CELLS])
                .fill(0.0);
        }
        locals[0][GUARD_CELLS + 2] = 7.0;
        locals[0][GUARD_CELLS + 3] = 8.0;
        locals[1][GUARD_CELLS] = 9.0;
        serial_guard_exchange(&mut locals, &slices).expect("exchange");

        let n0 = locals[0].len();
        assert_eq!(locals[0][n0 - 2], 9.0);
        assert_eq!(locals[1][0], 7.0);
        assert_eq!(locals[1][1], 8.0);
        // Physical guards untouched
        assert_eq!(locals[0][0], -1.0);
        assert_eq!(locals[1][locals[1].len() - 1], -1.0);
    }

    #[test]
    fn test_apply_guard_rejects_bad_shape() {
        let mut local = Array1::zeros(8);
        let bad = Array1::zeros(GUARD_CELLS + 1);
        assert!(apply_guard_cells(&mut local, Some(&bad), None).is_err());
        let nan = Array1::from_elem(GUARD_CELLS, f64::NAN);
        assert!(apply_guard_cells(&mut local, None, Some(&nan)).is_err());
    }

    #[test]
    fn test_state_split_and_stitch() {
        let mut global = FieldState::uniform(12 + 2 * GUARD_CELLS, 1.0, 2.0, 0.5, 0.1);
        global.nvi = ramp(12);
        let slices = decompose_field_line(12, 4).expect("valid decomposition");
        let locals = split_state(&global, &slices).expect("split");
        assert_eq!(locals.len(), 4);
        assert_eq!(locals[1].nvi[0], global.nvi[slices[1].y_start]);
        let back = stitch_state(&locals, &slices).expect("stitch");
        assert_eq!(back, global);
    }

    #[test]
    fn test_serial_comm_identity() {
        let comm = SerialComm;
        assert_eq!(comm.reduce_sum(3.5).expect("sum"), 3.5);
        assert_eq!(comm.reduce_max(-1.0).expect("max"), -1.0);
        assert_eq!(comm.broadcast_from_owner(2.0, true).expect("bcast"), 2.0);
        assert!(comm.broadcast_from_owner(2.0, false).is_err());
    }

    #[test]
    fn test_shared_memory_reductions_agree() {
        let group = SharedMemoryComm::group(4).expect("group");
        let results: Vec<(f64, f64, f64)> = thread::scope(|scope| {
            let handles: Vec<_> = group
                .iter()
                .map(|comm| {
                    scope.spawn(move || {
                        let r = comm.rank() as f64;
                        let sum = comm.reduce_sum(r + 1.0).expect("sum");
                        let max = comm.reduce_max(r * 2.0).expect("max");
                        let owner = comm.rank() + 1 == comm.size();
                        let b = comm.broadcast_from_owner(10.0 * r, owner).expect("bcast");
                        (sum, max, b)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("rank thread")).collect()
        });
        for (sum, max, b) in results {
            assert!((sum - 10.0).abs() < 1e-12, "sum = {sum}");
            assert!((max - 6.0).abs() < 1e-12, "max = {max}");
            assert!((b - 30.0).abs() < 1e-12, "broadcast = {b}");
        }
    }

    #[test]
    fn test_broadcast_requires_single_owner() {
        let group = SharedMemoryComm::group(2).expect("group");
        let errors: Vec<bool> = thread::scope(|scope| {
            let handles: Vec<_> = group
                .iter()
                .map(|comm| scope.spawn(move || comm.broadcast_from_owner(1.0, true).is_err()))
                .collect();
            handles.into_iter().map(|h| h.join().expect("rank thread")).collect()
        });
        assert!(errors.iter().all(|e| *e));
    }
}
