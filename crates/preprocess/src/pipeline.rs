//! Ordered composition of preprocessing transforms.

use polars::prelude::*;

use crate::{PreprocessError, Transform};

/// An ordered sequence of transforms applied to a panel.
///
/// Steps run strictly in sequence, each feeding its output panel to the
/// next; the first failure aborts the pipeline and surfaces the step
/// error unchanged.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step, builder style.
    #[must_use]
    pub fn with_step(mut self, step: Box<dyn Transform>) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a step.
    pub fn push(&mut self, step: Box<dyn Transform>) {
        self.steps.push(step);
    }

    /// Number of steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check whether the pipeline has no steps.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the steps in application order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Apply every step in order.
    ///
    /// # Errors
    /// Returns the first step error encountered.
    pub fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, PreprocessError> {
        let mut lf = lf;
        for step in &self.steps {
            lf = step.apply(lf)?;
        }
        Ok(lf)
    }
}
