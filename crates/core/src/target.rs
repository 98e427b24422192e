//! Target-frequency wrapper around an operator state.

use crate::error::MaxwellError;
use crate::evectmatrix::EvectMatrix;
use crate::operator::OperatorState;

/// Pairs a borrowed [`OperatorState`] with a target frequency and a
/// two-component eigenvector workspace shaped like its plane-wave block.
#[derive(Debug)]
pub struct TargetState<'a> {
    operator: &'a OperatorState,
    pub target_frequency: f64,
    workspace: EvectMatrix,
}

impl<'a> TargetState<'a> {
    pub fn new(operator: &'a OperatorState, target_frequency: f64) -> Result<Self, MaxwellError> {
        let layout = operator.layout();
        let workspace = EvectMatrix::zeros(
            layout.n,
            2,
            operator.num_bands(),
            layout.local_n,
            layout.n_start,
            layout.alloc_n,
        )?;
        Ok(Self {
            operator,
            target_frequency,
            workspace,
        })
    }

    pub fn operator(&self) -> &'a OperatorState {
        self.operator
    }

    pub fn workspace(&self) -> &EvectMatrix {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut EvectMatrix {
        &mut self.workspace
    }
}
