#![forbid(unsafe_code)]

//! The step producer contract.

use crate::error::ValidationError;
use crate::input::Limits;
use crate::sequence::StepSequence;

/// Turns an algorithm's input into its step sequence.
///
/// # Contract
///
/// - **Validate first**: every rejection happens before the first record is
///   produced. A lazy sequence returned from `produce` must already have
///   validated its input.
/// - **Deterministic**: identical input yields an identical sequence, record
///   for record. Backward stepping re-derives state from the prefix and
///   depends on this.
/// - **No UI coupling**: producers describe steps; they never draw them.
pub trait StepProducer {
    /// Raw input accepted from the host form.
    type Input: ?Sized;

    /// Short stable name (e.g. `"heap_sort"`), used in logs.
    fn name(&self) -> &'static str;

    /// Validate `input` and produce the step sequence.
    fn produce(&self, input: &Self::Input, limits: &Limits)
    -> Result<StepSequence, ValidationError>;
}

impl<P: StepProducer + ?Sized> StepProducer for &P {
    type Input = P::Input;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn produce(
        &self,
        input: &Self::Input,
        limits: &Limits,
    ) -> Result<StepSequence, ValidationError> {
        (**self).produce(input, limits)
    }
}

impl<P: StepProducer + ?Sized> StepProducer for Box<P> {
    type Input = P::Input;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn produce(
        &self,
        input: &Self::Input,
        limits: &Limits,
    ) -> Result<StepSequence, ValidationError> {
        (**self).produce(input, limits)
    }
}
