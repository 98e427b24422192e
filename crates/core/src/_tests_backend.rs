#![cfg(test)]

use num_complex::Complex64;

use super::_tests_support::NaiveEngine;
use super::backend::{
    Direction, LocalLayout, PlanSpec, TransformBinding, TransformEngine, TransformError,
    real_at, set_real_at,
};
use super::grid::GridDims;

#[test]
fn serial_complex_layout_owns_the_whole_grid() {
    let dims = GridDims::new(6, 4, 3);
    let layout = LocalLayout::serial_complex(dims);
    assert_eq!(layout.local_n, 72);
    assert_eq!(layout.alloc_n, 72);
    assert_eq!(layout.n_start, 0);
    assert_eq!(layout.local_nx, 6);
    assert_eq!(layout.local_ny, 4);
    assert_eq!(layout.fft_output_size, 72);
    assert_eq!(layout.fft_data_size, 72);
}

#[test]
fn serial_real_layout_pads_the_last_axis() {
    // 2D: last axis is y with 6 points, so 4 packed complex slots per row.
    let layout = LocalLayout::serial_real(GridDims::new(5, 6, 1));
    assert_eq!(layout.local_n, 30);
    assert_eq!(layout.fft_data_size, 5 * 4);
    assert_eq!(layout.fft_output_size, 5 * 2 * 4);

    // Odd last axis: 7 / 2 + 1 = 4.
    let layout = LocalLayout::serial_real(GridDims::new(2, 3, 7));
    assert_eq!(layout.fft_data_size, 6 * 4);
    assert_eq!(layout.fft_output_size, 6 * 8);

    // 1D keeps a single row.
    let layout = LocalLayout::serial_real(GridDims::new(8, 1, 1));
    assert_eq!(layout.fft_data_size, 5);
    assert_eq!(layout.fft_output_size, 10);
}

#[test]
fn plan_buffer_length_scales_with_batched_components() {
    let dims = GridDims::new(4, 4, 1);
    let spec = PlanSpec {
        dims,
        direction: Direction::Forward,
        howmany: 6,
        layout: LocalLayout::serial_real(dims),
    };
    assert_eq!(spec.buffer_len(), 6 * 4 * 3);
}

#[test]
fn real_view_addresses_interleaved_pairs() {
    let mut data = vec![Complex64::new(1.0, 2.0), Complex64::new(3.0, 4.0)];
    assert_eq!(real_at(&data, 0), 1.0);
    assert_eq!(real_at(&data, 1), 2.0);
    assert_eq!(real_at(&data, 3), 4.0);
    set_real_at(&mut data, 2, -7.5);
    set_real_at(&mut data, 1, 0.25);
    assert_eq!(data, vec![Complex64::new(1.0, 0.25), Complex64::new(-7.5, 4.0)]);
}

#[test]
fn binding_creates_one_plan_per_direction() {
    let engine = NaiveEngine { min_rank: 1 };
    let dims = GridDims::new(3, 2, 1);
    let layout = engine.local_layout(dims).expect("layout");
    let binding = TransformBinding::create(&engine, dims, 3, layout).expect("binding");
    assert_eq!(binding.forward.direction(), Direction::Forward);
    assert_eq!(binding.inverse.direction(), Direction::Inverse);
}

#[test]
fn plan_rejects_mismatched_buffer() {
    let engine = NaiveEngine { min_rank: 1 };
    let dims = GridDims::new(4, 1, 1);
    let layout = engine.local_layout(dims).expect("layout");
    let mut binding = TransformBinding::create(&engine, dims, 3, layout).expect("binding");
    let mut short = vec![Complex64::default(); 11];
    let err = binding.forward.execute(&mut short).expect_err("short buffer must fail");
    assert!(matches!(
        err,
        TransformError::BufferSize {
            expected: 12,
            actual: 11
        }
    ));
}

#[test]
fn naive_forward_transform_of_constant_is_a_dc_spike() {
    let engine = NaiveEngine { min_rank: 1 };
    let dims = GridDims::new(3, 2, 1);
    let layout = engine.local_layout(dims).expect("layout");
    let mut binding = TransformBinding::create(&engine, dims, 1, layout).expect("binding");
    let mut data = vec![Complex64::new(2.0, 0.0); 6];
    binding.forward.execute(&mut data).expect("forward");
    assert!((data[0] - Complex64::new(12.0, 0.0)).norm() < 1e-12);
    for value in &data[1..] {
        assert!(value.norm() < 1e-12);
    }
}
