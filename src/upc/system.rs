//! Multi-pion system reconstruction
//!
//! Selected tracks are assigned the charged-pion mass and summed into one
//! system four-vector. For two-track systems the decay-plane azimuth is
//! `Δφ(p₁ + p₂, p₁ − p₂)`, with two conventions for which track is p₁:
//!
//! - **random**: the pair is shuffled on every call
//! - **charge**: the positive track is p₁
//!
//! Mass, pT and rapidity depend only on the sum and are unaffected by the
//! labeling.

use crate::config::UpcConfig;
use crate::data::Track;
use crate::kinematics::{delta_phi, FourMomentum, MASS_PION_CHARGED};
use rand::seq::SliceRandom;
use rand::Rng;

/// Four-vectors of `tracks` under the pion hypothesis
pub fn pion_four_momenta(tracks: &[&Track]) -> Vec<FourMomentum> {
    tracks
        .iter()
        .map(|t| t.four_momentum(MASS_PION_CHARGED))
        .collect()
}

/// Sum of the constituent four-vectors
pub fn reconstruct_system(vecs: &[FourMomentum]) -> FourMomentum {
    vecs.iter().copied().sum()
}

/// Net charge of the selected tracks
pub fn total_charge(tracks: &[&Track]) -> i32 {
    tracks.iter().map(|t| t.sign).sum()
}

/// Mass window, maximum pT and maximum |y| of the system
pub fn system_passes_cuts(system: &FourMomentum, cfg: &UpcConfig) -> bool {
    let mass = system.mass();
    if mass < cfg.system_mass_min || mass > cfg.system_mass_max {
        return false;
    }
    if system.transverse_momentum() > cfg.system_pt_max {
        return false;
    }
    if system.rapidity().abs() > cfg.system_y_max {
        return false;
    }
    true
}

fn pair_phi(one: &FourMomentum, two: &FourMomentum) -> f64 {
    delta_phi(&(*one + *two), &(*one - *two))
}

/// Decay azimuth with a fresh random labeling drawn from `rng`
///
/// Returns `None` unless exactly two vectors are given.
pub fn phi_random_with<R: Rng + ?Sized>(vecs: &[FourMomentum], rng: &mut R) -> Option<f64> {
    if vecs.len() != 2 {
        return None;
    }
    let mut order = [0usize, 1];
    order.shuffle(rng);
    Some(pair_phi(&vecs[order[0]], &vecs[order[1]]))
}

/// Decay azimuth with a random labeling from the thread RNG
pub fn phi_random(vecs: &[FourMomentum]) -> Option<f64> {
    phi_random_with(vecs, &mut rand::thread_rng())
}

/// Decay azimuth with the positive track first
///
/// If the first track is not positive the pair is swapped, so a like-sign
/// negative pair keeps the second track first.
pub fn phi_charge(tracks: &[&Track], vecs: &[FourMomentum]) -> Option<f64> {
    if tracks.len() != 2 || vecs.len() != 2 {
        return None;
    }
    if tracks[0].sign > 0 {
        Some(pair_phi(&vecs[0], &vecs[1]))
    } else {
        Some(pair_phi(&vecs[1], &vecs[0]))
    }
}
