#![cfg(test)]

use num_complex::Complex64;

use super::_tests_support::naive_state;
use super::evectmatrix::EvectMatrix;
use super::grid::GridDims;
use super::target::TargetState;

#[test]
fn workspace_matches_operator_plane_wave_block() {
    let state = naive_state(GridDims::new(4, 2, 1), 3);
    let target = TargetState::new(&state, 0.35).expect("target state");
    let workspace = target.workspace();
    assert_eq!(workspace.n, 8);
    assert_eq!(workspace.c, 2);
    assert_eq!(workspace.p, 3);
    assert_eq!(workspace.local_n, 8);
    assert_eq!(workspace.n_start, 0);
    assert_eq!(workspace.as_slice().len(), 8 * 2 * 3);
    assert_eq!(target.target_frequency, 0.35);
    assert_eq!(target.operator().num_bands(), 3);
}

#[test]
fn workspace_is_writable() {
    let state = naive_state(GridDims::new(2, 2, 1), 2);
    let mut target = TargetState::new(&state, 1.0).expect("target state");
    target
        .workspace_mut()
        .set(3, 1, 1, Complex64::new(1.0, -1.0));
    assert_eq!(target.workspace().get(3, 1, 1), Complex64::new(1.0, -1.0));
    assert_eq!(target.workspace().as_slice().iter().filter(|z| z.norm() > 0.0).count(), 1);
}

#[test]
fn evectmatrix_storage_is_band_fastest() {
    let m = EvectMatrix::zeros(6, 2, 4, 6, 0, 6).expect("allocation");
    assert_eq!(m.idx(0, 0, 1), 1);
    assert_eq!(m.idx(0, 1, 0), 4);
    assert_eq!(m.idx(1, 0, 0), 8);
    assert_eq!(m.as_slice().len(), 48);
}
