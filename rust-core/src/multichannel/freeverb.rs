//! Freeverb stereo reverberator
//!
//! Each channel runs eight lowpass-feedback combs in parallel followed by four
//! all-pass approximations in series. The right channel uses the same delays
//! offset by `stereo_spread`; a 2x2 transform cross-mixes the two wet outputs.

use ndarray::{array, Array1};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filters::{
    FeedforwardFeedbackComb, FilterVariant, FilteredFeedbackComb, ParallelCombination, SeriesCombination,
};
use crate::multichannel::{ChannelFilter, MultiChannelFilter};
use crate::sample::Sample;

/// Loop delays of the parallel combs, in samples at 44.1 kHz
const COMB_DELAYS: [usize; 8] = [1557, 1617, 1491, 1422, 1277, 1356, 1188, 1116];

/// Delays of the series all-pass sections
const ALLPASS_DELAYS: [usize; 4] = [225, 556, 441, 341];

/// Freeverb parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeverbConfig {
    /// Extra delay of every right-channel section, in samples
    pub stereo_spread: usize,
    /// Gain of the unprocessed input
    pub dry: f64,
    /// Gain of each channel's own reverb
    pub wet1: f64,
    /// Gain of the opposite channel's reverb
    pub wet2: f64,
    /// High-frequency damping in the comb feedback, `[0, 1)`
    pub damp: f64,
    /// Comb feedback gain (room size)
    pub reflect: f64,
    /// All-pass feedback gain
    pub g: f64,
}

impl Default for FreeverbConfig {
    fn default() -> Self {
        Self {
            stereo_spread: 23,
            dry: 0.0,
            wet1: 1.0,
            wet2: 0.0,
            damp: 0.2,
            reflect: 0.84,
            g: 0.5,
        }
    }
}

fn channel<S: Sample>(config: &FreeverbConfig, spread: usize) -> Result<ChannelFilter<S>> {
    let alpha = S::from_f64(config.reflect * (1.0 - config.damp));
    let beta = S::from_f64(config.damp);
    let g = S::from_f64(config.g);

    let mut combs: Vec<FilterVariant<S>> = Vec::with_capacity(COMB_DELAYS.len());
    for delay in COMB_DELAYS {
        combs.push(FilteredFeedbackComb::new(alpha, beta, delay + spread)?.into());
    }
    let combs = ParallelCombination::new(combs, Array1::ones(COMB_DELAYS.len()))?;

    let mut allpasses: Vec<FilterVariant<S>> = Vec::with_capacity(ALLPASS_DELAYS.len());
    for delay in ALLPASS_DELAYS {
        allpasses.push(FeedforwardFeedbackComb::allpass(g, delay + spread)?.into());
    }

    let chain = SeriesCombination::new(vec![combs.into(), SeriesCombination::new(allpasses).into()]);
    Ok(Box::new(chain))
}

/// Build a stereo Freeverb as a two-channel filter
///
/// Channel 0 is left, channel 1 is right.
pub fn freeverb<S: Sample>(config: &FreeverbConfig) -> Result<MultiChannelFilter<S>> {
    let left = channel(config, 0)?;
    let right = channel(config, config.stereo_spread)?;

    let wet1 = S::from_f64(config.wet1);
    let wet2 = S::from_f64(config.wet2);
    let transform = array![[wet1, wet2], [wet2, wet1]];

    tracing::debug!(
        stereo_spread = config.stereo_spread,
        damp = config.damp,
        reflect = config.reflect,
        "freeverb created"
    );

    MultiChannelFilter::new(S::from_f64(config.dry), transform, vec![left, right])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::stream::{VecSink, VecSource};
    use approx::assert_abs_diff_eq;

    fn run(config: &FreeverbConfig, left: Vec<f64>, right: Vec<f64>, transients: usize) -> (Vec<f64>, Vec<f64>) {
        let mut reverb = freeverb::<f64>(config).unwrap();
        let mut sources = vec![VecSource::new(left), VecSource::new(right)];
        let mut sinks = vec![VecSink::new(), VecSink::new()];
        reverb.process(&mut sources, &mut sinks, transients).unwrap();
        let right = sinks.pop().unwrap().into_inner();
        let left = sinks.pop().unwrap().into_inner();
        (left, right)
    }

    #[test]
    fn test_output_length_and_determinism() {
        let config = FreeverbConfig::default();
        let input = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

        let (l1, r1) = run(&config, input.clone(), input.clone(), 200);
        let (l2, r2) = run(&config, input.clone(), input, 200);

        assert_eq!(l1.len(), 208);
        assert_eq!(r1.len(), 208);
        assert_eq!(l1, l2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_dry_only_passes_input() {
        let config = FreeverbConfig {
            dry: 1.0,
            wet1: 0.0,
            wet2: 0.0,
            ..FreeverbConfig::default()
        };
        let (l, r) = run(&config, vec![0.5, -1.0, 0.25], vec![2.0, 0.0, -3.0], 2);
        assert_eq!(l, vec![0.5, -1.0, 0.25, 0.0, 0.0]);
        assert_eq!(r, vec![2.0, 0.0, -3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_impulse_first_sample() {
        // Eight combs pass the impulse straight through, each of the four all-passes negates it
        let config = FreeverbConfig {
            stereo_spread: 0,
            ..FreeverbConfig::default()
        };
        let (l, r) = run(&config, vec![1.0], vec![0.0], 10);
        assert_abs_diff_eq!(l[0], 8.0, epsilon = 1e-12);
        assert!(r.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_cross_mix() {
        let config = FreeverbConfig {
            wet1: 0.0,
            wet2: 1.0,
            ..FreeverbConfig::default()
        };
        let (l, r) = run(&config, vec![1.0], vec![0.0], 10);
        assert!(l.iter().all(|&y| y == 0.0));
        assert_abs_diff_eq!(r[0], 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transient_len_is_longest_right_chain() {
        let reverb = freeverb::<f64>(&FreeverbConfig::default()).unwrap();
        assert_eq!(reverb.channel_count(), 2);
        // Longest comb plus all four all-passes, right channel adds the spread five times
        assert_eq!(reverb.transient_len(), 1617 + 225 + 556 + 441 + 341 + 5 * 23);
    }

    #[test]
    fn test_unstable_damping_rejected() {
        let config = FreeverbConfig {
            damp: 1.0,
            ..FreeverbConfig::default()
        };
        assert!(matches!(
            freeverb::<f64>(&config).err(),
            Some(FilterError::UnstableFeedback { .. })
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: FreeverbConfig = serde_json::from_str(r#"{"dry": 0.5, "wet1": 0.035, "stereo_spread": 0}"#).unwrap();
        assert_eq!(config.stereo_spread, 0);
        assert_abs_diff_eq!(config.dry, 0.5);
        assert_abs_diff_eq!(config.reflect, 0.84);

        let json = serde_json::to_string(&config).unwrap();
        let back: FreeverbConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
