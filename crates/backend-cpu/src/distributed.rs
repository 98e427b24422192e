//! Slab-decomposed complex transforms.
//!
//! Each process owns a contiguous block of first-axis rows in plane-wave
//! space and a contiguous block of second-axis rows in the transposed real
//! space. The forward transform runs the trailing axes on the local x-slab,
//! swaps slabs with every other process, and finishes with the first axis.
//! Its output is stored transposed as `[local_ny][nx][nz]`; the inverse
//! expects that order and restores `[local_nx][ny][nz]`.

use std::sync::Arc;

use log::debug;
use num_complex::Complex64;
use pwmax_core::backend::{
    Direction, LocalLayout, PlanSpec, TransformEngine, TransformError, TransformKind,
    TransformPlan,
};
use pwmax_core::grid::GridDims;
use rustfft::FftPlanner;

use crate::axis::{AxisPass, fft_direction};
use crate::serial::check_len;

/// Contiguous block of rows owned by one process along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabSizes {
    pub start: usize,
    pub count: usize,
}

impl SlabSizes {
    /// Block distribution with `ceil(n / ranks)` rows per process; trailing
    /// processes may own fewer rows or none.
    pub fn block(n: usize, ranks: usize, rank: usize) -> Self {
        let block = n.div_ceil(ranks.max(1));
        let start = (rank * block).min(n);
        Self {
            start,
            count: block.min(n - start),
        }
    }

    pub fn partition(n: usize, ranks: usize) -> Vec<Self> {
        (0..ranks).map(|rank| Self::block(n, ranks, rank)).collect()
    }

    pub fn end(&self) -> usize {
        self.start + self.count
    }
}

/// Collective data exchange between the processes sharing one transform.
///
/// Every process calls [`all_to_all`](Self::all_to_all) the same number of
/// times in the same order.
pub trait SlabExchange: Send + Sync {
    fn ranks(&self) -> usize;

    fn rank(&self) -> usize;

    /// Sends `send[r]` to process `r` and returns the blocks received,
    /// indexed by source process.
    fn all_to_all(&self, send: Vec<Vec<Complex64>>) -> Result<Vec<Vec<Complex64>>, TransformError>;
}

/// Exchange for a single process; the slab swap degenerates to a transpose.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSlab;

impl SlabExchange for LocalSlab {
    fn ranks(&self) -> usize {
        1
    }

    fn rank(&self) -> usize {
        0
    }

    fn all_to_all(&self, send: Vec<Vec<Complex64>>) -> Result<Vec<Vec<Complex64>>, TransformError> {
        Ok(send)
    }
}

/// Complex transforms over a grid split in first-axis slabs.
#[derive(Debug)]
pub struct DistributedComplexEngine<X: SlabExchange> {
    exchange: Arc<X>,
}

impl<X: SlabExchange> DistributedComplexEngine<X> {
    pub fn new(exchange: X) -> Self {
        Self {
            exchange: Arc::new(exchange),
        }
    }

    /// This process's rank, checked against the reported process count.
    fn checked_rank(&self) -> Result<usize, TransformError> {
        let (rank, ranks) = (self.exchange.rank(), self.exchange.ranks());
        if ranks == 0 || rank >= ranks {
            return Err(TransformError::Exchange(format!(
                "rank {rank} is outside a group of {ranks} processes"
            )));
        }
        Ok(rank)
    }

    fn slabs(&self, dims: GridDims) -> (Vec<SlabSizes>, Vec<SlabSizes>) {
        let ranks = self.exchange.ranks();
        (
            SlabSizes::partition(dims.nx, ranks),
            SlabSizes::partition(dims.ny, ranks),
        )
    }
}

impl<X: SlabExchange + 'static> TransformEngine for DistributedComplexEngine<X> {
    fn name(&self) -> &'static str {
        "distributed-complex"
    }

    fn kind(&self) -> TransformKind {
        TransformKind::Complex
    }

    fn min_rank(&self) -> usize {
        2
    }

    fn local_layout(&self, dims: GridDims) -> Result<LocalLayout, TransformError> {
        if dims.rank() < 2 {
            return Err(TransformError::PlanCreation(format!(
                "slab decomposition needs at least two axes, got {}x{}x{}",
                dims.nx, dims.ny, dims.nz
            )));
        }
        let rank = self.checked_rank()?;
        let ranks = self.exchange.ranks();
        let x = SlabSizes::block(dims.nx, ranks, rank);
        let y = SlabSizes::block(dims.ny, ranks, rank);
        let local_n = x.count * dims.ny * dims.nz;
        let fft_output_size = dims.nx * y.count * dims.nz;
        Ok(LocalLayout {
            local_nx: x.count,
            local_x_start: x.start,
            local_ny: y.count,
            local_y_start: y.start,
            local_n,
            n_start: x.start * dims.ny * dims.nz,
            alloc_n: local_n,
            fft_output_size,
            fft_data_size: local_n.max(fft_output_size),
        })
    }

    fn create_plan(&self, spec: &PlanSpec) -> Result<Box<dyn TransformPlan>, TransformError> {
        let dims = spec.dims;
        let rank = self.checked_rank()?;
        let (x_slabs, y_slabs) = self.slabs(dims);
        let local_x = x_slabs[rank];
        let local_y = y_slabs[rank];
        let direction = fft_direction(spec.direction);
        let mut planner = FftPlanner::new();
        let slab_passes = AxisPass::for_axes(
            &mut planner,
            [local_x.count, dims.ny, dims.nz],
            1..3,
            spec.howmany,
            direction,
        );
        let row_passes = AxisPass::for_axes(
            &mut planner,
            [local_y.count, dims.nx, dims.nz],
            1..2,
            spec.howmany,
            direction,
        );
        debug!(
            "planned {:?} slab transform on rank {rank}/{}: x rows {}..{}, y rows {}..{}",
            spec.direction,
            x_slabs.len(),
            local_x.start,
            local_x.end(),
            local_y.start,
            local_y.end()
        );
        Ok(Box::new(DistributedPlan {
            direction: spec.direction,
            expected: spec.buffer_len(),
            exchange: Arc::clone(&self.exchange),
            dims,
            howmany: spec.howmany,
            rank,
            x_slabs,
            y_slabs,
            slab_passes,
            row_passes,
        }))
    }
}

struct DistributedPlan<X: SlabExchange> {
    direction: Direction,
    expected: usize,
    exchange: Arc<X>,
    dims: GridDims,
    howmany: usize,
    rank: usize,
    x_slabs: Vec<SlabSizes>,
    y_slabs: Vec<SlabSizes>,
    /// Trailing axes of the `[local_nx][ny][nz]` slab.
    slab_passes: Vec<AxisPass>,
    /// First axis of the transposed `[local_ny][nx][nz]` slab.
    row_passes: Vec<AxisPass>,
}

impl<X: SlabExchange> DistributedPlan<X> {
    fn swap(&self, send: Vec<Vec<Complex64>>) -> Result<Vec<Vec<Complex64>>, TransformError> {
        let received = self.exchange.all_to_all(send)?;
        if received.len() != self.x_slabs.len() {
            return Err(TransformError::Exchange(format!(
                "expected blocks from {} processes, got {}",
                self.x_slabs.len(),
                received.len()
            )));
        }
        Ok(received)
    }

    fn check_block(block: &[Complex64], expected: usize, source: usize) -> Result<(), TransformError> {
        if block.len() != expected {
            return Err(TransformError::Exchange(format!(
                "block from process {source} holds {} values, expected {expected}",
                block.len()
            )));
        }
        Ok(())
    }

    /// `[local_nx][ny][nz]` to `[local_ny][nx][nz]`.
    fn x_to_y(&self, data: &mut [Complex64]) -> Result<(), TransformError> {
        let GridDims { nx, ny, nz } = self.dims;
        let run = nz * self.howmany;
        let mine = self.x_slabs[self.rank];
        let send = self
            .y_slabs
            .iter()
            .map(|ys| {
                let mut block = Vec::with_capacity(mine.count * ys.count * run);
                for x in 0..mine.count {
                    for y in ys.start..ys.end() {
                        let from = (x * ny + y) * run;
                        block.extend_from_slice(&data[from..from + run]);
                    }
                }
                block
            })
            .collect();
        let received = self.swap(send)?;
        let my_y = self.y_slabs[self.rank];
        for (source, block) in received.iter().enumerate() {
            let xs = self.x_slabs[source];
            Self::check_block(block, xs.count * my_y.count * run, source)?;
            for xl in 0..xs.count {
                for yl in 0..my_y.count {
                    let from = (xl * my_y.count + yl) * run;
                    let to = (yl * nx + xs.start + xl) * run;
                    data[to..to + run].copy_from_slice(&block[from..from + run]);
                }
            }
        }
        Ok(())
    }

    /// `[local_ny][nx][nz]` back to `[local_nx][ny][nz]`.
    fn y_to_x(&self, data: &mut [Complex64]) -> Result<(), TransformError> {
        let GridDims { nx, ny, nz } = self.dims;
        let run = nz * self.howmany;
        let my_y = self.y_slabs[self.rank];
        let send = self
            .x_slabs
            .iter()
            .map(|xs| {
                let mut block = Vec::with_capacity(my_y.count * xs.count * run);
                for y in 0..my_y.count {
                    for x in xs.start..xs.end() {
                        let from = (y * nx + x) * run;
                        block.extend_from_slice(&data[from..from + run]);
                    }
                }
                block
            })
            .collect();
        let received = self.swap(send)?;
        let mine = self.x_slabs[self.rank];
        for (source, block) in received.iter().enumerate() {
            let ys = self.y_slabs[source];
            Self::check_block(block, ys.count * mine.count * run, source)?;
            for yl in 0..ys.count {
                for xl in 0..mine.count {
                    let from = (yl * mine.count + xl) * run;
                    let to = (xl * ny + ys.start + yl) * run;
                    data[to..to + run].copy_from_slice(&block[from..from + run]);
                }
            }
        }
        Ok(())
    }
}

impl<X: SlabExchange> TransformPlan for DistributedPlan<X> {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn execute(&mut self, data: &mut [Complex64]) -> Result<(), TransformError> {
        check_len(self.expected, data)?;
        match self.direction {
            Direction::Forward => {
                for pass in &mut self.slab_passes {
                    pass.run(data);
                }
                self.x_to_y(data)?;
                for pass in &mut self.row_passes {
                    pass.run(data);
                }
            }
            Direction::Inverse => {
                for pass in &mut self.row_passes {
                    pass.run(data);
                }
                self.y_to_x(data)?;
                for pass in &mut self.slab_passes {
                    pass.run(data);
                }
            }
        }
        Ok(())
    }
}
