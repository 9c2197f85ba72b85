//! Series and parallel composition of filters
//!
//! Composite filters own their children by value, so a filter tree can never
//! share a node or contain a cycle.

use ndarray::Array1;

use crate::error::{FilterError, Result};
use crate::filters::{FeedforwardFeedbackComb, Filter, FilteredFeedbackComb, TappedDelayLine};
use crate::sample::Sample;

/// Closed set of filters that can be nested inside combinators
#[derive(Debug, Clone)]
pub enum FilterVariant<S> {
    TappedDelayLine(TappedDelayLine<S>),
    FeedforwardFeedbackComb(FeedforwardFeedbackComb<S>),
    FilteredFeedbackComb(FilteredFeedbackComb<S>),
    Series(SeriesCombination<S>),
    Parallel(ParallelCombination<S>),
}

impl<S: Sample> Filter<S> for FilterVariant<S> {
    #[inline]
    fn next(&mut self, input: S) -> S {
        match self {
            FilterVariant::TappedDelayLine(f) => f.next(input),
            FilterVariant::FeedforwardFeedbackComb(f) => f.next(input),
            FilterVariant::FilteredFeedbackComb(f) => f.next(input),
            FilterVariant::Series(f) => f.next(input),
            FilterVariant::Parallel(f) => f.next(input),
        }
    }

    fn transient_len(&self) -> usize {
        match self {
            FilterVariant::TappedDelayLine(f) => f.transient_len(),
            FilterVariant::FeedforwardFeedbackComb(f) => f.transient_len(),
            FilterVariant::FilteredFeedbackComb(f) => f.transient_len(),
            FilterVariant::Series(f) => f.transient_len(),
            FilterVariant::Parallel(f) => f.transient_len(),
        }
    }

    fn reset(&mut self) {
        match self {
            FilterVariant::TappedDelayLine(f) => f.reset(),
            FilterVariant::FeedforwardFeedbackComb(f) => f.reset(),
            FilterVariant::FilteredFeedbackComb(f) => f.reset(),
            FilterVariant::Series(f) => f.reset(),
            FilterVariant::Parallel(f) => f.reset(),
        }
    }
}

impl<S> From<TappedDelayLine<S>> for FilterVariant<S> {
    fn from(f: TappedDelayLine<S>) -> Self {
        FilterVariant::TappedDelayLine(f)
    }
}

impl<S> From<FeedforwardFeedbackComb<S>> for FilterVariant<S> {
    fn from(f: FeedforwardFeedbackComb<S>) -> Self {
        FilterVariant::FeedforwardFeedbackComb(f)
    }
}

impl<S> From<FilteredFeedbackComb<S>> for FilterVariant<S> {
    fn from(f: FilteredFeedbackComb<S>) -> Self {
        FilterVariant::FilteredFeedbackComb(f)
    }
}

impl<S> From<SeriesCombination<S>> for FilterVariant<S> {
    fn from(f: SeriesCombination<S>) -> Self {
        FilterVariant::Series(f)
    }
}

impl<S> From<ParallelCombination<S>> for FilterVariant<S> {
    fn from(f: ParallelCombination<S>) -> Self {
        FilterVariant::Parallel(f)
    }
}

/// Filters applied one after another, in order
///
/// Every child advances on every call, so draining the transients of the
/// chain drains each stage too. An empty series passes its input through.
#[derive(Debug, Clone)]
pub struct SeriesCombination<S> {
    units: Vec<FilterVariant<S>>,
}

impl<S: Sample> SeriesCombination<S> {
    pub fn new(units: Vec<FilterVariant<S>>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[FilterVariant<S>] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<S: Sample> Filter<S> for SeriesCombination<S> {
    #[inline]
    fn next(&mut self, input: S) -> S {
        self.units.iter_mut().fold(input, |x, unit| unit.next(x))
    }

    /// Each stage extends the response by its own tail
    fn transient_len(&self) -> usize {
        self.units.iter().map(|unit| unit.transient_len()).sum()
    }

    fn reset(&mut self) {
        for unit in self.units.iter_mut() {
            unit.reset();
        }
    }
}

/// Filters fed the same input, outputs reduced by a weight vector
///
/// `y[n] = Σ w_i f_i(x[n])`
#[derive(Debug, Clone)]
pub struct ParallelCombination<S> {
    units: Vec<FilterVariant<S>>,
    weights: Array1<S>,
    /// Per-child outputs, reused every sample
    outputs: Array1<S>,
}

impl<S: Sample> ParallelCombination<S> {
    /// # Arguments
    /// * `units` - Child filters
    /// * `weights` - One weight per child
    pub fn new(units: Vec<FilterVariant<S>>, weights: Array1<S>) -> Result<Self> {
        if weights.len() != units.len() {
            tracing::warn!(
                weights = weights.len(),
                filters = units.len(),
                "parallel combination weight count mismatch"
            );
            return Err(FilterError::WeightCountMismatch {
                weights: weights.len(),
                filters: units.len(),
            });
        }
        let outputs = Array1::zeros(units.len());
        Ok(Self { units, weights, outputs })
    }

    /// Equal unit weights
    pub fn summing(units: Vec<FilterVariant<S>>) -> Self {
        let n = units.len();
        Self {
            units,
            weights: Array1::ones(n),
            outputs: Array1::zeros(n),
        }
    }

    pub fn units(&self) -> &[FilterVariant<S>] {
        &self.units
    }

    pub fn weights(&self) -> &Array1<S> {
        &self.weights
    }
}

impl<S: Sample> Filter<S> for ParallelCombination<S> {
    #[inline]
    fn next(&mut self, input: S) -> S {
        for (unit, out) in self.units.iter_mut().zip(self.outputs.iter_mut()) {
            *out = unit.next(input);
        }
        self.weights.dot(&self.outputs)
    }

    /// Children run side by side, so the longest tail wins
    fn transient_len(&self) -> usize {
        self.units.iter().map(|unit| unit.transient_len()).max().unwrap_or(0)
    }

    fn reset(&mut self) {
        for unit in self.units.iter_mut() {
            unit.reset();
        }
        self.outputs.fill(S::zero());
    }
}
