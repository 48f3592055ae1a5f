//! Particle identification
//!
//! Per-species selection requires the TPC response inside `±n_sigma_tpc` and,
//! when the track reached TOF, the TOF response inside `±n_sigma_tof`. Tracks
//! without TOF skip the TOF test unless [`PidConfig::require_tof`] is set.

use crate::config::PidConfig;
use crate::data::Track;

fn passes_species(tpc_n_sigma: f64, tof_n_sigma: f64, has_tof: bool, cfg: &PidConfig) -> bool {
    let tpc_passed = tpc_n_sigma.abs() < cfg.n_sigma_tpc;
    let tof_passed = if has_tof {
        tof_n_sigma.abs() < cfg.n_sigma_tof
    } else {
        !cfg.require_tof
    };
    tpc_passed && tof_passed
}

pub fn passes_pion_pid(track: &Track, cfg: &PidConfig) -> bool {
    passes_species(
        track.pid.tpc_n_sigma_pi,
        track.pid.tof_n_sigma_pi,
        track.has_tof,
        cfg,
    )
}

pub fn passes_proton_pid(track: &Track, cfg: &PidConfig) -> bool {
    passes_species(
        track.pid.tpc_n_sigma_pr,
        track.pid.tof_n_sigma_pr,
        track.has_tof,
        cfg,
    )
}

/// Circular cut in the n-dimensional TPC pion nσ space: Σ nσ² < cut²
///
/// An empty set has radius zero and passes.
pub fn tracks_pass_joint_pion_pid<'a, I>(tracks: I, cut: f64) -> bool
where
    I: IntoIterator<Item = &'a Track>,
{
    let radius_sq: f64 = tracks
        .into_iter()
        .map(|t| t.pid.tpc_n_sigma_pi.powi(2))
        .sum();
    radius_sq < cut * cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PidResponse;

    fn track_with(pid: PidResponse, has_tof: bool) -> Track {
        Track {
            pid,
            has_tof,
            ..Default::default()
        }
    }

    #[test]
    fn test_pion_pid_tof_optional() {
        let cfg = PidConfig::default();
        let pid = PidResponse {
            tpc_n_sigma_pi: 1.0,
            tof_n_sigma_pi: 10.0,
            ..Default::default()
        };
        assert!(passes_pion_pid(&track_with(pid, false), &cfg));
        assert!(!passes_pion_pid(&track_with(pid, true), &cfg));
    }

    #[test]
    fn test_strict_mode_rejects_missing_tof() {
        let pid = PidResponse {
            tpc_n_sigma_pr: 0.5,
            tof_n_sigma_pr: 0.5,
            ..Default::default()
        };
        let strict = PidConfig::strict();
        assert!(!passes_proton_pid(&track_with(pid, false), &strict));
        assert!(passes_proton_pid(&track_with(pid, true), &strict));
    }

    #[test]
    fn test_tpc_window_is_exclusive() {
        let cfg = PidConfig::default();
        let pid = PidResponse {
            tpc_n_sigma_pr: -4.0,
            ..Default::default()
        };
        assert!(!passes_proton_pid(&track_with(pid, false), &cfg));
    }

    #[test]
    fn test_joint_pion_pid() {
        let a = track_with(PidResponse { tpc_n_sigma_pi: 2.0, ..Default::default() }, false);
        let b = track_with(PidResponse { tpc_n_sigma_pi: -2.0, ..Default::default() }, false);
        let c = track_with(PidResponse { tpc_n_sigma_pi: 2.5, ..Default::default() }, false);

        // 4 + 4 = 8 < 9
        assert!(tracks_pass_joint_pion_pid([&a, &b], 3.0));
        // 4 + 6.25 = 10.25 > 9
        assert!(!tracks_pass_joint_pion_pid([&a, &c], 3.0));
        assert!(tracks_pass_joint_pion_pid(Vec::<&Track>::new(), 3.0));
        // The cut is on the sum, not per track
        assert!(!tracks_pass_joint_pion_pid([&a, &b, &a], 3.0));
    }
}
