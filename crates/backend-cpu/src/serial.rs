//! Single-process engines: full complex and Hermitian-packed real transforms.

use log::debug;
use num_complex::Complex64;
use pwmax_core::backend::{
    Direction, LocalLayout, PlanSpec, TransformEngine, TransformError, TransformKind,
    TransformPlan, real_at, set_real_at,
};
use pwmax_core::grid::GridDims;
use rustfft::FftPlanner;

use crate::axis::{AxisPass, fft_direction};

pub(crate) fn check_len(expected: usize, data: &[Complex64]) -> Result<(), TransformError> {
    if data.len() != expected {
        return Err(TransformError::BufferSize {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Complex-to-complex transforms over the whole grid in one process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComplexEngine;

impl TransformEngine for SerialComplexEngine {
    fn name(&self) -> &'static str {
        "serial-complex"
    }

    fn kind(&self) -> TransformKind {
        TransformKind::Complex
    }

    fn local_layout(&self, dims: GridDims) -> Result<LocalLayout, TransformError> {
        Ok(LocalLayout::serial_complex(dims))
    }

    fn create_plan(&self, spec: &PlanSpec) -> Result<Box<dyn TransformPlan>, TransformError> {
        let mut planner = FftPlanner::new();
        let passes = AxisPass::for_axes(
            &mut planner,
            spec.dims.as_array(),
            0..3,
            spec.howmany,
            fft_direction(spec.direction),
        );
        debug!(
            "planned {:?} complex transform over {:?} x {} components",
            spec.direction,
            spec.dims.shape(),
            spec.howmany
        );
        Ok(Box::new(SerialComplexPlan {
            direction: spec.direction,
            expected: spec.buffer_len(),
            passes,
        }))
    }
}

struct SerialComplexPlan {
    direction: Direction,
    expected: usize,
    passes: Vec<AxisPass>,
}

impl TransformPlan for SerialComplexPlan {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn execute(&mut self, data: &mut [Complex64]) -> Result<(), TransformError> {
        check_len(self.expected, data)?;
        for pass in &mut self.passes {
            pass.run(data);
        }
        Ok(())
    }
}

/// Real-to-complex transforms with the last non-trivial axis packed to its
/// `last_dim / 2 + 1` non-redundant coefficients.
///
/// Forward reads the padded real view of the buffer and writes the packed
/// spectrum; inverse reads the packed spectrum and writes real values with
/// zeroed padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialRealEngine;

impl TransformEngine for SerialRealEngine {
    fn name(&self) -> &'static str {
        "serial-real"
    }

    fn kind(&self) -> TransformKind {
        TransformKind::Real
    }

    fn local_layout(&self, dims: GridDims) -> Result<LocalLayout, TransformError> {
        Ok(LocalLayout::serial_real(dims))
    }

    fn create_plan(&self, spec: &PlanSpec) -> Result<Box<dyn TransformPlan>, TransformError> {
        let dims = spec.dims;
        let rank = dims.rank();
        let last = dims.last_dim();
        let packed = last / 2 + 1;
        let rows = dims.len() / last;
        // Leading axes flattened as `row = i * lead[1] + j`.
        let lead = match rank {
            1 => [1, 1],
            2 => [1, dims.nx],
            _ => [dims.nx, dims.ny],
        };
        let mut planner = FftPlanner::new();
        let passes = AxisPass::for_axes(
            &mut planner,
            dims.as_array(),
            0..3,
            spec.howmany,
            fft_direction(spec.direction),
        );
        debug!(
            "planned {:?} real transform over {:?} x {} components ({packed} packed of {last})",
            spec.direction,
            dims.shape(),
            spec.howmany
        );
        Ok(Box::new(SerialRealPlan {
            direction: spec.direction,
            expected: spec.buffer_len(),
            howmany: spec.howmany,
            last,
            packed,
            rows,
            lead,
            work: vec![Complex64::default(); dims.len() * spec.howmany],
            passes,
        }))
    }
}

struct SerialRealPlan {
    direction: Direction,
    expected: usize,
    howmany: usize,
    last: usize,
    packed: usize,
    rows: usize,
    lead: [usize; 2],
    /// Full unpacked complex grid.
    work: Vec<Complex64>,
    passes: Vec<AxisPass>,
}

impl SerialRealPlan {
    /// Row holding the frequencies `-G` of leading-axis row `row`.
    fn mirror_row(&self, row: usize) -> usize {
        let [a, b] = self.lead;
        let (i, j) = (row / b, row % b);
        ((a - i) % a) * b + (b - j) % b
    }

    fn forward(&mut self, data: &mut [Complex64]) {
        let h = self.howmany;
        let padded = 2 * self.packed;
        for row in 0..self.rows {
            for j in 0..self.last {
                for c in 0..h {
                    let value = real_at(data, (row * padded + j) * h + c);
                    self.work[(row * self.last + j) * h + c] = Complex64::new(value, 0.0);
                }
            }
        }
        for pass in &mut self.passes {
            pass.run(&mut self.work);
        }
        for row in 0..self.rows {
            let src = row * self.last * h;
            let dst = row * self.packed * h;
            data[dst..dst + self.packed * h].copy_from_slice(&self.work[src..src + self.packed * h]);
        }
    }

    fn inverse(&mut self, data: &mut [Complex64]) {
        let h = self.howmany;
        let padded = 2 * self.packed;
        for row in 0..self.rows {
            let mirror = self.mirror_row(row);
            for kz in 0..self.last {
                for c in 0..h {
                    self.work[(row * self.last + kz) * h + c] = if kz < self.packed {
                        data[(row * self.packed + kz) * h + c]
                    } else {
                        data[(mirror * self.packed + self.last - kz) * h + c].conj()
                    };
                }
            }
        }
        for pass in &mut self.passes {
            pass.run(&mut self.work);
        }
        for row in 0..self.rows {
            for j in 0..padded {
                for c in 0..h {
                    let value = if j < self.last {
                        self.work[(row * self.last + j) * h + c].re
                    } else {
                        0.0
                    };
                    set_real_at(data, (row * padded + j) * h + c, value);
                }
            }
        }
    }
}

impl TransformPlan for SerialRealPlan {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn execute(&mut self, data: &mut [Complex64]) -> Result<(), TransformError> {
        check_len(self.expected, data)?;
        match self.direction {
            Direction::Forward => self.forward(data),
            Direction::Inverse => self.inverse(data),
        }
        Ok(())
    }
}
