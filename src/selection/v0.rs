//! Lambda / anti-Lambda candidate selection
//!
//! Both hypotheses share the topological cuts and differ only in which
//! daughter is tested as the proton:
//!
//! | Hypothesis  | positive daughter | negative daughter |
//! |-------------|-------------------|-------------------|
//! | Lambda      | proton            | pion              |
//! | anti-Lambda | pion              | proton            |
//!
//! The daughter-DCA stage tests `|dca_pos_to_pv|` against both the negative and
//! the positive threshold; `dca_neg_to_pv` is never cut on here. The candidate
//! pre-filter is the only place the negative daughter's DCA is used.

use crate::config::V0SelectionConfig;
use crate::data::{Track, V0Candidate};
use crate::kinematics::{FourMomentum, MASS_LAMBDA};
use crate::selection::track::passes_single_track_selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum V0Hypothesis {
    Lambda,
    AntiLambda,
}

impl V0Hypothesis {
    /// (positive, negative) daughter nσ for the TPC test
    fn tpc_n_sigma(self, pos: &Track, neg: &Track) -> (f64, f64) {
        match self {
            V0Hypothesis::Lambda => (pos.pid.tpc_n_sigma_pr, neg.pid.tpc_n_sigma_pi),
            V0Hypothesis::AntiLambda => (pos.pid.tpc_n_sigma_pi, neg.pid.tpc_n_sigma_pr),
        }
    }

    /// (positive, negative) daughter nσ for the TOF test
    fn tof_n_sigma(self, pos: &Track, neg: &Track) -> (f64, f64) {
        match self {
            V0Hypothesis::Lambda => (pos.pid.tof_n_sigma_pr, neg.pid.tof_n_sigma_pi),
            V0Hypothesis::AntiLambda => (pos.pid.tof_n_sigma_pi, neg.pid.tof_n_sigma_pr),
        }
    }

    /// Precomputed invariant mass under this hypothesis
    pub fn mass(self, v0: &V0Candidate) -> f64 {
        match self {
            V0Hypothesis::Lambda => v0.m_lambda,
            V0Hypothesis::AntiLambda => v0.m_anti_lambda,
        }
    }
}

fn in_window(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

/// Loose candidate filter applied before either hypothesis
pub fn passes_v0_prefilter(v0: &V0Candidate, cfg: &V0SelectionConfig) -> bool {
    v0.dca_pos_to_pv.abs() > cfg.dca_pos_to_pv
        && v0.dca_neg_to_pv.abs() > cfg.dca_neg_to_pv
        && v0.dca_v0_daughters < cfg.prefilter_dca_v0_daughters_max
}

/// Candidate rapidity under the Lambda mass
pub fn v0_rapidity(v0: &V0Candidate) -> f64 {
    FourMomentum::from_xyzm(v0.px, v0.py, v0.pz, MASS_LAMBDA).rapidity()
}

/// Full selection of `v0` under `hypothesis`
pub fn passes_hypothesis(
    hypothesis: V0Hypothesis,
    v0: &V0Candidate,
    pos: &Track,
    neg: &Track,
    cfg: &V0SelectionConfig,
) -> bool {
    if cfg.require_single_track_selection
        && !(passes_single_track_selection(pos, &cfg.single_track)
            && passes_single_track_selection(neg, &cfg.single_track))
    {
        return false;
    }

    if cfg.require_tof {
        let (pos_n, neg_n) = hypothesis.tof_n_sigma(pos, neg);
        if !in_window(pos_n, cfg.n_sigma_tof_min, cfg.n_sigma_tof_max)
            || !in_window(neg_n, cfg.n_sigma_tof_min, cfg.n_sigma_tof_max)
        {
            return false;
        }
    }

    if v0.v0_radius < cfg.min_v0_radius
        || v0.v0_cos_pa < cfg.v0_cos_pa
        || pos.eta.abs() > cfg.eta_max
        || neg.eta.abs() > cfg.eta_max
    {
        return false;
    }

    // Both DCA thresholds apply to the positive daughter
    if v0.dca_pos_to_pv.abs() < cfg.dca_neg_to_pv {
        return false;
    }
    if v0.dca_pos_to_pv.abs() < cfg.dca_pos_to_pv {
        return false;
    }
    if v0.dca_v0_daughters > cfg.dca_v0_daughters_max {
        return false;
    }

    if cfg.require_tpc {
        let (pos_n, neg_n) = hypothesis.tpc_n_sigma(pos, neg);
        if !in_window(pos_n, cfg.n_sigma_tpc_min, cfg.n_sigma_tpc_max)
            || !in_window(neg_n, cfg.n_sigma_tpc_min, cfg.n_sigma_tpc_max)
        {
            return false;
        }
    }

    in_window(v0_rapidity(v0), cfg.y_min, cfg.y_max)
}

pub fn passes_lambda_selection(
    v0: &V0Candidate,
    pos: &Track,
    neg: &Track,
    cfg: &V0SelectionConfig,
) -> bool {
    passes_hypothesis(V0Hypothesis::Lambda, v0, pos, neg, cfg)
}

pub fn passes_anti_lambda_selection(
    v0: &V0Candidate,
    pos: &Track,
    neg: &Track,
    cfg: &V0SelectionConfig,
) -> bool {
    passes_hypothesis(V0Hypothesis::AntiLambda, v0, pos, neg, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PidResponse;

    fn candidate() -> V0Candidate {
        V0Candidate {
            pos_track: 0,
            neg_track: 1,
            px: 1.0,
            py: 0.5,
            pz: 0.2,
            v0_radius: 5.0,
            v0_cos_pa: 0.999,
            dca_pos_to_pv: 0.2,
            dca_neg_to_pv: -0.3,
            dca_v0_daughters: 0.3,
            m_lambda: 1.1157,
            m_anti_lambda: 1.2,
        }
    }

    fn daughter(eta: f64, pid: PidResponse) -> Track {
        Track {
            eta,
            has_tpc: true,
            tpc_n_cls_found: 100,
            tpc_n_cls_crossed_rows: 100,
            tpc_chi2_ncl: 1.0,
            pid,
            ..Default::default()
        }
    }

    fn proton_like() -> PidResponse {
        PidResponse {
            tpc_n_sigma_pr: 0.5,
            tpc_n_sigma_pi: 8.0,
            tof_n_sigma_pr: 0.3,
            tof_n_sigma_pi: 9.0,
            ..Default::default()
        }
    }

    fn pion_like() -> PidResponse {
        PidResponse {
            tpc_n_sigma_pi: -0.4,
            tpc_n_sigma_pr: -7.0,
            tof_n_sigma_pi: 0.1,
            tof_n_sigma_pr: -6.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_topological_defaults_accept() {
        let cfg = V0SelectionConfig::default();
        let pos = daughter(0.3, proton_like());
        let neg = daughter(-0.2, pion_like());
        assert!(passes_lambda_selection(&candidate(), &pos, &neg, &cfg));
        // Without PID requirements both hypotheses see the same cuts
        assert!(passes_anti_lambda_selection(&candidate(), &pos, &neg, &cfg));
    }

    #[test]
    fn test_pid_assigns_proton_per_hypothesis() {
        let cfg = V0SelectionConfig {
            require_tpc: true,
            require_tof: true,
            ..V0SelectionConfig::default()
        };
        let pos = daughter(0.3, proton_like());
        let neg = daughter(-0.2, pion_like());
        assert!(passes_lambda_selection(&candidate(), &pos, &neg, &cfg));
        assert!(!passes_anti_lambda_selection(&candidate(), &pos, &neg, &cfg));

        let pos = daughter(0.3, pion_like());
        let neg = daughter(-0.2, proton_like());
        assert!(!passes_lambda_selection(&candidate(), &pos, &neg, &cfg));
        assert!(passes_anti_lambda_selection(&candidate(), &pos, &neg, &cfg));
    }

    #[test]
    fn test_daughter_eta_limit() {
        let cfg = V0SelectionConfig::default();
        let pos = daughter(0.81, proton_like());
        let neg = daughter(0.0, pion_like());
        assert!(!passes_lambda_selection(&candidate(), &pos, &neg, &cfg));
        assert!(!passes_anti_lambda_selection(&candidate(), &neg, &pos, &cfg));
    }

    #[test]
    fn test_negative_dca_threshold_applies_to_positive_daughter() {
        let cfg = V0SelectionConfig {
            dca_neg_to_pv: 0.25,
            ..V0SelectionConfig::default()
        };
        let pos = daughter(0.0, proton_like());
        let neg = daughter(0.0, pion_like());

        // |dca_pos| = 0.2 < 0.25 rejects, although |dca_neg| = 0.3 would pass
        assert!(!passes_lambda_selection(&candidate(), &pos, &neg, &cfg));

        // A tiny negative-daughter DCA is not cut on
        let v0 = V0Candidate {
            dca_neg_to_pv: 0.0,
            ..candidate()
        };
        assert!(passes_lambda_selection(&v0, &pos, &neg, &V0SelectionConfig::default()));
    }

    #[test]
    fn test_rapidity_and_topology_cuts() {
        let cfg = V0SelectionConfig::default();
        let pos = daughter(0.0, proton_like());
        let neg = daughter(0.0, pion_like());

        let forward = V0Candidate { pz: 3.0, ..candidate() };
        assert!(v0_rapidity(&forward) > 0.5);
        assert!(!passes_lambda_selection(&forward, &pos, &neg, &cfg));

        let close = V0Candidate { v0_radius: 0.2, ..candidate() };
        assert!(!passes_lambda_selection(&close, &pos, &neg, &cfg));

        let poor_pointing = V0Candidate { v0_cos_pa: 0.99, ..candidate() };
        assert!(!passes_lambda_selection(&poor_pointing, &pos, &neg, &cfg));

        let far_daughters = V0Candidate { dca_v0_daughters: 1.5, ..candidate() };
        assert!(!passes_lambda_selection(&far_daughters, &pos, &neg, &cfg));
    }

    #[test]
    fn test_single_track_requirement() {
        let cfg = V0SelectionConfig {
            require_single_track_selection: true,
            ..V0SelectionConfig::default()
        };
        let pos = daughter(0.0, proton_like());
        let neg = Track {
            tpc_n_cls_found: 50,
            ..daughter(0.0, pion_like())
        };
        assert!(!passes_lambda_selection(&candidate(), &pos, &neg, &cfg));
        assert!(passes_lambda_selection(
            &candidate(),
            &pos,
            &neg,
            &V0SelectionConfig::default()
        ));
    }

    #[test]
    fn test_prefilter() {
        let cfg = V0SelectionConfig::default();
        assert!(passes_v0_prefilter(&candidate(), &cfg));
        assert!(!passes_v0_prefilter(&V0Candidate { dca_neg_to_pv: 0.01, ..candidate() }, &cfg));
        assert!(!passes_v0_prefilter(&V0Candidate { dca_v0_daughters: 0.6, ..candidate() }, &cfg));
    }

    #[test]
    fn test_hypothesis_mass() {
        assert!((V0Hypothesis::Lambda.mass(&candidate()) - 1.1157).abs() < 1e-12);
        assert!((V0Hypothesis::AntiLambda.mass(&candidate()) - 1.2).abs() < 1e-12);
    }
}
