//! CPU transform engines for `pwmax-core`, built on rustfft.
//!
//! - [`SerialComplexEngine`]: complex transforms over the whole grid.
//! - [`SerialRealEngine`]: real-input transforms with Hermitian packing.
//! - [`DistributedComplexEngine`]: slab-decomposed complex transforms over a
//!   caller-supplied [`SlabExchange`].
//!
//! All transforms are unnormalized and batched over interleaved components.

mod axis;
pub mod distributed;
pub mod serial;

pub use distributed::{DistributedComplexEngine, LocalSlab, SlabExchange, SlabSizes};
pub use serial::{SerialComplexEngine, SerialRealEngine};

use pwmax_core::backend::{TransformEngine, TransformKind};

/// Serial engine performing `kind` transforms.
pub fn engine_for(kind: TransformKind) -> Box<dyn TransformEngine> {
    match kind {
        TransformKind::Complex => Box::new(SerialComplexEngine),
        TransformKind::Real => Box::new(SerialRealEngine),
    }
}
