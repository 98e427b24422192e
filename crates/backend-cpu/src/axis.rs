//! Strided 1D transforms along one axis of a batched row-major array.

use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};

/// One axis of a row-major `[d0][d1][d2]` array whose points each hold
/// `howmany` interleaved components.
///
/// Lines are gathered into a contiguous buffer so rustfft can process all of
/// them in a single call, then scattered back.
pub(crate) struct AxisPass {
    fft: Arc<dyn Fft<f64>>,
    len: usize,
    /// Points between successive entries along the axis.
    stride: usize,
    /// Independent blocks before the axis.
    outer: usize,
    howmany: usize,
    lines: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl AxisPass {
    pub(crate) fn new(
        planner: &mut FftPlanner<f64>,
        shape: [usize; 3],
        axis: usize,
        howmany: usize,
        direction: FftDirection,
    ) -> Self {
        let len = shape[axis];
        let stride = shape[axis + 1..].iter().product();
        let outer = shape[..axis].iter().product();
        let fft = planner.plan_fft(len, direction);
        let scratch = vec![Complex64::default(); fft.get_inplace_scratch_len()];
        let lines = vec![Complex64::default(); outer * stride * len * howmany];
        Self {
            fft,
            len,
            stride,
            outer,
            howmany,
            lines,
            scratch,
        }
    }

    /// Passes for every axis in `axes` longer than one point.
    pub(crate) fn for_axes(
        planner: &mut FftPlanner<f64>,
        shape: [usize; 3],
        axes: std::ops::Range<usize>,
        howmany: usize,
        direction: FftDirection,
    ) -> Vec<Self> {
        axes.filter(|&axis| shape[axis] > 1)
            .map(|axis| Self::new(planner, shape, axis, howmany, direction))
            .collect()
    }

    /// Complex slots of `data` this pass touches.
    pub(crate) fn span(&self) -> usize {
        self.outer * self.len * self.stride * self.howmany
    }

    /// Transforms the first [`span`](Self::span) slots of `data` in place.
    pub(crate) fn run(&mut self, data: &mut [Complex64]) {
        if self.lines.is_empty() {
            return;
        }
        debug_assert!(data.len() >= self.span());
        self.gather(data);
        self.fft.process_with_scratch(&mut self.lines, &mut self.scratch);
        self.scatter(data);
    }

    fn slot(&self, block: usize, offset: usize, t: usize, c: usize) -> usize {
        ((block * self.len + t) * self.stride + offset) * self.howmany + c
    }

    fn gather(&mut self, data: &[Complex64]) {
        let mut line = 0;
        for block in 0..self.outer {
            for offset in 0..self.stride {
                for c in 0..self.howmany {
                    let base = line * self.len;
                    for t in 0..self.len {
                        let src = self.slot(block, offset, t, c);
                        self.lines[base + t] = data[src];
                    }
                    line += 1;
                }
            }
        }
    }

    fn scatter(&self, data: &mut [Complex64]) {
        let mut line = 0;
        for block in 0..self.outer {
            for offset in 0..self.stride {
                for c in 0..self.howmany {
                    let base = line * self.len;
                    for t in 0..self.len {
                        data[self.slot(block, offset, t, c)] = self.lines[base + t];
                    }
                    line += 1;
                }
            }
        }
    }
}

pub(crate) fn fft_direction(direction: pwmax_core::backend::Direction) -> FftDirection {
    match direction {
        pwmax_core::backend::Direction::Forward => FftDirection::Forward,
        pwmax_core::backend::Direction::Inverse => FftDirection::Inverse,
    }
}
