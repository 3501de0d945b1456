use rand::seq::SliceRandom;
use rand::Rng;

use crate::synth::SynthError;

/// Returns one element of `vocabulary`, chosen uniformly with `rng`.
pub fn pick_random<'a, T, R>(vocabulary: &'a [T], rng: &mut R) -> Result<&'a T, SynthError>
where
    R: Rng + ?Sized,
{
    vocabulary.choose(rng).ok_or(SynthError::EmptyVocabulary)
}
