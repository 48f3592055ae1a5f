//! Synthetic Events
//!
//! Seeded generators for both tasks, used by the CLI when no input file is
//! given and by the benches. The same seed always yields the same events.
//!
//! - UPC: mostly exclusive ρ⁰ → π⁺π⁻ at low pT, with like-sign pairs,
//!   four-pion events and detector noise mixed in
//! - strangeness: Λ → pπ⁻ and Λ̄ → p̄π⁺ decays in flight on top of
//!   combinatorial pairs, plus a handful of charged jets

use crate::data::{
    Collision, Jet, PidResponse, SelectionBit, StrangenessEvent, Track, UpcEvent, V0Candidate,
    ZdcInfo,
};
use crate::kinematics::{FourMomentum, MASS_LAMBDA, MASS_PION_CHARGED, MASS_PROTON};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const MASS_RHO: f64 = 0.775;
const WIDTH_RHO: f64 = 0.149;

/// Box-Muller normal deviate
fn gauss<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    mean + sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Boost `p` by velocity (bx, by, bz)
fn boost(p: &FourMomentum, bx: f64, by: f64, bz: f64) -> FourMomentum {
    let b2 = bx * bx + by * by + bz * bz;
    if b2 <= 0.0 {
        return *p;
    }
    let gamma = 1.0 / (1.0 - b2).sqrt();
    let bp = bx * p.px + by * p.py + bz * p.pz;
    let gamma2 = (gamma - 1.0) / b2;
    FourMomentum::new(
        gamma * (p.e + bp),
        p.px + gamma2 * bp * bx + gamma * bx * p.e,
        p.py + gamma2 * bp * by + gamma * by * p.e,
        p.pz + gamma2 * bp * bz + gamma * bz * p.e,
    )
}

/// Isotropic two-body decay of `parent` into masses `m1` and `m2`
fn two_body_decay<R: Rng + ?Sized>(
    rng: &mut R,
    parent: &FourMomentum,
    m1: f64,
    m2: f64,
) -> Option<(FourMomentum, FourMomentum)> {
    let m = parent.mass();
    if m <= m1 + m2 {
        return None;
    }
    let p = ((m * m - (m1 + m2).powi(2)) * (m * m - (m1 - m2).powi(2))).sqrt() / (2.0 * m);
    let cos_theta: f64 = rng.gen_range(-1.0..1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi: f64 = rng.gen_range(0.0..2.0 * PI);
    let (px, py, pz) = (p * sin_theta * phi.cos(), p * sin_theta * phi.sin(), p * cos_theta);

    let one = FourMomentum::from_xyzm(px, py, pz, m1);
    let two = FourMomentum::from_xyzm(-px, -py, -pz, m2);
    let (bx, by, bz) = (parent.px / parent.e, parent.py / parent.e, parent.pz / parent.e);
    Some((boost(&one, bx, by, bz), boost(&two, bx, by, bz)))
}

/// Parent four-vector from pT, rapidity, azimuth and mass
fn from_pt_y_phi(pt: f64, y: f64, phi: f64, mass: f64) -> FourMomentum {
    let mt = (pt * pt + mass * mass).sqrt();
    FourMomentum::new(mt * y.cosh(), pt * phi.cos(), pt * phi.sin(), mt * y.sinh())
}

fn quality_track<R: Rng + ?Sized>(rng: &mut R, p: &FourMomentum, sign: i32) -> Track {
    let mut track = Track {
        px: p.px,
        py: p.py,
        pz: p.pz,
        sign,
        dca_xy: gauss(rng, 0.0, 0.01),
        dca_z: gauss(rng, 0.0, 0.05),
        its_n_cls: rng.gen_range(5..=7),
        its_chi2_ncl: rng.gen_range(0.5..5.0),
        tpc_n_cls_findable: rng.gen_range(120..=150),
        tpc_chi2_ncl: rng.gen_range(0.5..2.5),
        tpc_signal: gauss(rng, 55.0, 5.0),
        has_its: true,
        has_tpc: true,
        has_tof: rng.gen_bool(0.6),
        is_primary_track: true,
        is_pv_contributor: true,
        is_global_track: true,
        is_global_track_wo_dca: true,
        ..Default::default()
    };
    track.eta = track.momentum_eta();
    track.tpc_n_cls_crossed_rows = track.tpc_n_cls_findable - rng.gen_range(0..15);
    track.tpc_n_cls_found = track.tpc_n_cls_crossed_rows - rng.gen_range(0..10);
    track
}

fn pion_pid<R: Rng + ?Sized>(rng: &mut R) -> PidResponse {
    PidResponse {
        tpc_n_sigma_el: gauss(rng, 4.0, 1.5),
        tpc_n_sigma_pi: gauss(rng, 0.0, 1.0),
        tpc_n_sigma_ka: gauss(rng, -3.0, 1.5),
        tpc_n_sigma_pr: gauss(rng, -6.0, 1.5),
        tof_n_sigma_pi: gauss(rng, 0.0, 1.0),
        tof_n_sigma_ka: gauss(rng, -4.0, 1.5),
        tof_n_sigma_pr: gauss(rng, -8.0, 2.0),
    }
}

fn proton_pid<R: Rng + ?Sized>(rng: &mut R) -> PidResponse {
    PidResponse {
        tpc_n_sigma_el: gauss(rng, -6.0, 2.0),
        tpc_n_sigma_pi: gauss(rng, 7.0, 1.5),
        tpc_n_sigma_ka: gauss(rng, 3.0, 1.5),
        tpc_n_sigma_pr: gauss(rng, 0.0, 1.0),
        tof_n_sigma_pi: gauss(rng, 9.0, 2.0),
        tof_n_sigma_ka: gauss(rng, 4.0, 1.5),
        tof_n_sigma_pr: gauss(rng, 0.0, 1.0),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// UPC
// ═══════════════════════════════════════════════════════════════════════════════

/// (common energy, time) of one ZN side
fn zdc_side<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    if rng.gen_bool(0.7) {
        return (gauss(rng, -0.5, 0.3), gauss(rng, 0.0, 4.0));
    }
    let time = if rng.gen_bool(0.9) {
        gauss(rng, 0.0, 0.5)
    } else {
        rng.gen_range(3.0..8.0)
    };
    (rng.gen_range(1.0..15.0), time)
}

fn upc_zdc<R: Rng + ?Sized>(rng: &mut R) -> ZdcInfo {
    let (energy_common_zna, time_zna) = zdc_side(rng);
    let (energy_common_znc, time_znc) = zdc_side(rng);
    ZdcInfo {
        energy_common_zna,
        energy_common_znc,
        time_zna,
        time_znc,
    }
}

fn upc_pions<R: Rng + ?Sized>(rng: &mut R, parent: &FourMomentum, signs: (i32, i32)) -> Vec<Track> {
    match two_body_decay(rng, parent, MASS_PION_CHARGED, MASS_PION_CHARGED) {
        Some((a, b)) => [(a, signs.0), (b, signs.1)]
            .iter()
            .map(|(p, sign)| {
                let mut track = quality_track(rng, p, *sign);
                track.pid = pion_pid(rng);
                track
            })
            .collect(),
        None => Vec::new(),
    }
}

fn upc_event<R: Rng + ?Sized>(rng: &mut R) -> UpcEvent {
    let mass = gauss(rng, MASS_RHO, WIDTH_RHO / 2.0).max(0.3);
    let pt = gauss(rng, 0.0, 0.05).abs();
    let parent = from_pt_y_phi(pt, rng.gen_range(-1.0..1.0), rng.gen_range(0.0..2.0 * PI), mass);

    let kind: f64 = rng.gen();
    let mut tracks = if kind < 0.8 {
        upc_pions(rng, &parent, (1, -1))
    } else if kind < 0.9 {
        let sign = if rng.gen_bool(0.5) { 1 } else { -1 };
        upc_pions(rng, &parent, (sign, sign))
    } else {
        let half = from_pt_y_phi(
            pt / 2.0,
            rng.gen_range(-0.5..0.5),
            rng.gen_range(0.0..2.0 * PI),
            mass,
        );
        let mut four = upc_pions(rng, &half, (1, -1));
        four.extend(upc_pions(rng, &half, (1, -1)));
        four
    };

    if rng.gen_bool(0.2) {
        let noise = FourMomentum::from_xyzm(
            gauss(rng, 0.0, 0.3),
            gauss(rng, 0.0, 0.3),
            gauss(rng, 0.0, 0.5),
            MASS_PION_CHARGED,
        );
        let sign = if rng.gen_bool(0.5) { 1 } else { -1 };
        let mut track = quality_track(rng, &noise, sign);
        track.is_pv_contributor = rng.gen_bool(0.3);
        track.dca_xy = gauss(rng, 0.0, 0.5);
        track.pid = pion_pid(rng);
        tracks.push(track);
    }

    let gap_side = if rng.gen_bool(0.85) { 2 } else { rng.gen_range(0..2) };
    UpcEvent {
        collision: Collision {
            pos_x: gauss(rng, 0.0, 0.01),
            pos_y: gauss(rng, 0.0, 0.01),
            pos_z: gauss(rng, 0.0, 6.0),
            num_contrib: tracks.iter().filter(|t| t.is_pv_contributor).count() as u32,
            sel8: true,
            gap_side,
            zdc: upc_zdc(rng),
            ..Default::default()
        },
        tracks,
    }
}

/// `n` UPC events from `seed`
pub fn synthetic_upc_events(n: usize, seed: u64) -> Vec<UpcEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let events: Vec<UpcEvent> = (0..n).map(|_| upc_event(&mut rng)).collect();
    log::info!("Generated {} synthetic UPC events (seed {})", events.len(), seed);
    events
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRANGENESS
// ═══════════════════════════════════════════════════════════════════════════════

fn pair_mass(pos: &Track, pos_mass: f64, neg: &Track, neg_mass: f64) -> f64 {
    (pos.four_momentum(pos_mass) + neg.four_momentum(neg_mass)).mass()
}

/// Candidate built from two tracks already pushed to `tracks`
fn v0_from_daughters<R: Rng + ?Sized>(
    rng: &mut R,
    tracks: &[Track],
    pos_track: usize,
    neg_track: usize,
    true_decay: bool,
) -> V0Candidate {
    let (pos, neg) = (&tracks[pos_track], &tracks[neg_track]);
    let (v0_cos_pa, dca_v0_daughters) = if true_decay {
        (rng.gen_range(0.996..1.0), rng.gen_range(0.0..0.4))
    } else {
        (rng.gen_range(0.95..1.0), rng.gen_range(0.0..1.0))
    };
    let sign = |rng: &mut R| if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    V0Candidate {
        pos_track,
        neg_track,
        px: pos.px + neg.px,
        py: pos.py + neg.py,
        pz: pos.pz + neg.pz,
        v0_radius: rng.gen_range(0.2..20.0),
        v0_cos_pa,
        dca_pos_to_pv: sign(rng) * rng.gen_range(0.02..1.0),
        dca_neg_to_pv: sign(rng) * rng.gen_range(0.02..1.0),
        dca_v0_daughters,
        m_lambda: pair_mass(pos, MASS_PROTON, neg, MASS_PION_CHARGED),
        m_anti_lambda: pair_mass(pos, MASS_PION_CHARGED, neg, MASS_PROTON),
    }
}

fn strangeness_event<R: Rng + ?Sized>(rng: &mut R) -> StrangenessEvent {
    let mut tracks = Vec::new();
    let mut v0s = Vec::new();

    for _ in 0..rng.gen_range(0..4) {
        let pt = rng.gen_range(0.3..6.0);
        let parent = from_pt_y_phi(
            pt,
            rng.gen_range(-0.8..0.8),
            rng.gen_range(0.0..2.0 * PI),
            MASS_LAMBDA,
        );
        let anti = rng.gen_bool(0.5);
        let (m_pos, m_neg) = if anti {
            (MASS_PION_CHARGED, MASS_PROTON)
        } else {
            (MASS_PROTON, MASS_PION_CHARGED)
        };
        let Some((p_pos, p_neg)) = two_body_decay(rng, &parent, m_pos, m_neg) else {
            continue;
        };
        let mut pos = quality_track(rng, &p_pos, 1);
        let mut neg = quality_track(rng, &p_neg, -1);
        pos.is_primary_track = false;
        neg.is_primary_track = false;
        pos.pid = if anti { pion_pid(rng) } else { proton_pid(rng) };
        neg.pid = if anti { proton_pid(rng) } else { pion_pid(rng) };
        tracks.push(pos);
        tracks.push(neg);
        let v0 = v0_from_daughters(rng, &tracks, tracks.len() - 2, tracks.len() - 1, true);
        v0s.push(v0);
    }

    for _ in 0..rng.gen_range(2..12) {
        let p = FourMomentum::from_xyzm(
            gauss(rng, 0.0, 1.0),
            gauss(rng, 0.0, 1.0),
            gauss(rng, 0.0, 1.0),
            MASS_PION_CHARGED,
        );
        let sign = if rng.gen_bool(0.5) { 1 } else { -1 };
        let mut track = quality_track(rng, &p, sign);
        track.pid = pion_pid(rng);
        track.is_global_track = rng.gen_bool(0.8);
        tracks.push(track);
    }

    let positives: Vec<usize> = (0..tracks.len()).filter(|&i| tracks[i].sign > 0).collect();
    let negatives: Vec<usize> = (0..tracks.len()).filter(|&i| tracks[i].sign < 0).collect();
    if !positives.is_empty() && !negatives.is_empty() {
        for _ in 0..rng.gen_range(0..6) {
            let pos = positives[rng.gen_range(0..positives.len())];
            let neg = negatives[rng.gen_range(0..negatives.len())];
            let v0 = v0_from_daughters(rng, &tracks, pos, neg, false);
            v0s.push(v0);
        }
    }

    let jets = (0..rng.gen_range(0..4))
        .map(|_| Jet {
            pt: rng.gen_range(5.0..80.0),
            eta: rng.gen_range(-0.5..0.5),
            phi: rng.gen_range(0.0..2.0 * PI),
            r: if rng.gen_bool(0.7) { 40 } else { 20 },
        })
        .collect();

    let mut collision = Collision {
        pos_x: gauss(rng, 0.0, 0.01),
        pos_y: gauss(rng, 0.0, 0.01),
        pos_z: gauss(rng, 0.0, 7.0),
        num_contrib: tracks.iter().filter(|t| t.is_pv_contributor).count() as u32,
        sel8: rng.gen_bool(0.95),
        gap_side: -1,
        ..Default::default()
    };
    for bit in SelectionBit::ALL {
        if rng.gen_bool(0.97) {
            collision.set_bit(bit);
        }
    }

    StrangenessEvent {
        collision,
        tracks,
        v0s,
        jets,
    }
}

/// `n` strangeness events from `seed`
pub fn synthetic_strangeness_events(n: usize, seed: u64) -> Vec<StrangenessEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let events: Vec<StrangenessEvent> = (0..n).map(|_| strangeness_event(&mut rng)).collect();
    log::info!(
        "Generated {} synthetic strangeness events (seed {})",
        events.len(),
        seed
    );
    events
}
