//! Single-track quality cuts
//!
//! Three flavors are used by the tasks:
//!
//! | Function | Used for |
//! |----------|----------|
//! | [`track_passes_cuts`] | general charged tracks (jet-track QA) |
//! | [`passes_single_track_selection`] | V0 daughters |
//! | [`upc_track_first_failure`] | pion candidates in UPC events |
//!
//! All thresholds are inclusive: a value equal to a minimum or maximum passes.
//! Tightening any one threshold can only shrink the accepted set.

use crate::config::{SingleTrackCuts, TrackCuts, UpcConfig};
use crate::data::Track;

/// General track quality selection, short-circuiting on the first failed cut
pub fn track_passes_cuts(track: &Track, cuts: &TrackCuts) -> bool {
    if track.pt() < cuts.min_pt {
        return false;
    }
    if track.eta.abs() > cuts.max_eta {
        return false;
    }
    if track.dca_xy.abs() > cuts.max_dca_xy {
        return false;
    }
    if track.dca_z.abs() > cuts.max_dca_z {
        return false;
    }
    if cuts.require_primary && !track.is_primary_track {
        return false;
    }
    if (track.tpc_n_cls_findable as f64) < cuts.min_tpc_findable_clusters {
        return false;
    }
    if (track.tpc_n_cls_crossed_rows as f64) < cuts.min_tpc_crossed_rows {
        return false;
    }
    if track.tpc_crossed_rows_over_findable() > cuts.max_crossed_rows_over_findable {
        return false;
    }
    if track.tpc_chi2_ncl > cuts.max_tpc_chi2 {
        return false;
    }
    if track.its_chi2_ncl > cuts.max_its_chi2 {
        return false;
    }
    if cuts.require_pv_contributor && !track.is_pv_contributor {
        return false;
    }
    true
}

/// Daughter-track selection for V0 candidates
pub fn passes_single_track_selection(track: &Track, cuts: &SingleTrackCuts) -> bool {
    if cuts.require_its && !track.has_its {
        return false;
    }
    if cuts.require_its && (track.its_n_cls as f64) < cuts.min_its_clusters {
        return false;
    }
    if !track.has_tpc {
        return false;
    }
    if (track.tpc_n_cls_found as f64) < cuts.min_tpc_found_clusters {
        return false;
    }
    if (track.tpc_n_cls_crossed_rows as f64) < cuts.min_tpc_crossed_rows {
        return false;
    }
    if track.tpc_chi2_ncl > cuts.max_tpc_chi2 {
        return false;
    }
    if track.eta < cuts.eta_min || track.eta > cuts.eta_max {
        return false;
    }
    if cuts.require_tof && !track.has_tof {
        return false;
    }
    true
}

// ═══════════════════════════════════════════════════════════════════════════════
// UPC TRACKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Bin labels of the UPC track selection counter
pub const UPC_TRACK_COUNTER_LABELS: [&str; 7] = [
    "all tracks",
    "PV contributor",
    "ITS + TPC hit",
    "TOF requirement",
    "DCA cut",
    "#eta cut",
    "2D TPC n#sigma_{#pi} cut",
];

/// Counter value of the joint PID bin
pub const UPC_TRACK_COUNTER_PID: f64 = 6.0;

/// Ordered UPC track cuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpcTrackStage {
    PvContributor,
    ItsTpcHit,
    TofRequirement,
    Dca,
    Eta,
}

impl UpcTrackStage {
    pub const ORDER: [UpcTrackStage; 5] = [
        UpcTrackStage::PvContributor,
        UpcTrackStage::ItsTpcHit,
        UpcTrackStage::TofRequirement,
        UpcTrackStage::Dca,
        UpcTrackStage::Eta,
    ];

    pub fn label(self) -> &'static str {
        UPC_TRACK_COUNTER_LABELS[self as usize + 1]
    }

    /// Counter value filled once this cut is passed
    pub fn counter_value(self) -> f64 {
        (self as usize + 1) as f64
    }

    pub fn passes(self, track: &Track, cfg: &UpcConfig) -> bool {
        match self {
            UpcTrackStage::PvContributor => track.is_pv_contributor,
            UpcTrackStage::ItsTpcHit => track.has_its && track.has_tpc,
            UpcTrackStage::TofRequirement => !cfg.require_tof || track.has_tof,
            UpcTrackStage::Dca => {
                track.dca_z.abs() <= cfg.tracks_dca_max
                    && track.dca_xy.abs() <= dynamic_dca_xy_max(track.pt())
            }
            UpcTrackStage::Eta => track.momentum_eta().abs() <= cfg.track_eta_max,
        }
    }

    /// Stages passed by a track whose first failure is `failure`
    pub fn passed_before(failure: Option<UpcTrackStage>) -> impl Iterator<Item = UpcTrackStage> {
        Self::ORDER
            .into_iter()
            .take_while(move |stage| Some(*stage) != failure)
    }
}

/// pT-dependent transverse DCA limit, 0.0182 + 0.0350 / pT^1.01 (cm)
pub fn dynamic_dca_xy_max(pt: f64) -> f64 {
    0.0182 + 0.0350 / pt.powf(1.01)
}

/// First UPC cut `track` fails, `None` if it is a pion candidate
pub fn upc_track_first_failure(track: &Track, cfg: &UpcConfig) -> Option<UpcTrackStage> {
    UpcTrackStage::ORDER
        .into_iter()
        .find(|stage| !stage.passes(track, cfg))
}

pub fn upc_track_passes_cuts(track: &Track, cfg: &UpcConfig) -> bool {
    upc_track_first_failure(track, cfg).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality_track() -> Track {
        Track {
            px: 0.5,
            py: 0.2,
            pz: 0.1,
            sign: 1,
            eta: 0.2,
            dca_xy: 0.01,
            dca_z: 0.1,
            its_n_cls: 6,
            its_chi2_ncl: 2.0,
            tpc_n_cls_findable: 120,
            tpc_n_cls_found: 110,
            tpc_n_cls_crossed_rows: 115,
            tpc_chi2_ncl: 1.5,
            has_its: true,
            has_tpc: true,
            is_primary_track: true,
            is_pv_contributor: true,
            is_global_track: true,
            is_global_track_wo_dca: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_general_cuts_accept_quality_track() {
        assert!(track_passes_cuts(&quality_track(), &TrackCuts::default()));
    }

    #[test]
    fn test_general_cuts_each_reject() {
        let cuts = TrackCuts::default();
        let variants: Vec<Track> = vec![
            Track { px: 0.1, py: 0.0, ..quality_track() },
            Track { eta: -0.81, ..quality_track() },
            Track { dca_xy: 0.6, ..quality_track() },
            Track { dca_z: -2.5, ..quality_track() },
            Track { is_primary_track: false, ..quality_track() },
            Track { tpc_n_cls_findable: 40, tpc_n_cls_crossed_rows: 40, ..quality_track() },
            Track { tpc_n_cls_crossed_rows: 60, ..quality_track() },
            Track { tpc_n_cls_findable: 60, tpc_n_cls_crossed_rows: 80, ..quality_track() },
            Track { tpc_chi2_ncl: 4.5, ..quality_track() },
            Track { its_chi2_ncl: 40.0, ..quality_track() },
            Track { is_pv_contributor: false, ..quality_track() },
        ];
        for (i, track) in variants.iter().enumerate() {
            assert!(!track_passes_cuts(track, &cuts), "variant {} accepted", i);
        }
    }

    #[test]
    fn test_optional_requirements_can_be_dropped() {
        let cuts = TrackCuts {
            require_primary: false,
            require_pv_contributor: false,
            ..TrackCuts::default()
        };
        let track = Track {
            is_primary_track: false,
            is_pv_contributor: false,
            ..quality_track()
        };
        assert!(track_passes_cuts(&track, &cuts));
    }

    #[test]
    fn test_single_track_selection() {
        let cuts = SingleTrackCuts::default();
        assert!(passes_single_track_selection(&quality_track(), &cuts));
        assert!(!passes_single_track_selection(
            &Track { has_tpc: false, ..quality_track() },
            &cuts
        ));
        assert!(!passes_single_track_selection(
            &Track { eta: 0.85, ..quality_track() },
            &cuts
        ));

        let with_its = SingleTrackCuts { require_its: true, ..cuts.clone() };
        assert!(!passes_single_track_selection(
            &Track { its_n_cls: 3, ..quality_track() },
            &with_its
        ));

        let with_tof = SingleTrackCuts { require_tof: true, ..cuts };
        assert!(!passes_single_track_selection(&quality_track(), &with_tof));
    }

    #[test]
    fn test_dynamic_dca_limit() {
        assert!((dynamic_dca_xy_max(1.0) - 0.0532).abs() < 1e-12);
        assert!(dynamic_dca_xy_max(0.2) > dynamic_dca_xy_max(2.0));
    }

    #[test]
    fn test_upc_stage_order() {
        let cfg = UpcConfig::default();
        assert_eq!(upc_track_first_failure(&quality_track(), &cfg), None);

        let no_pv = Track { is_pv_contributor: false, has_its: false, ..quality_track() };
        assert_eq!(upc_track_first_failure(&no_pv, &cfg), Some(UpcTrackStage::PvContributor));

        let no_its = Track { has_its: false, ..quality_track() };
        assert_eq!(upc_track_first_failure(&no_its, &cfg), Some(UpcTrackStage::ItsTpcHit));

        let tof_cfg = UpcConfig { require_tof: true, ..UpcConfig::default() };
        assert_eq!(
            upc_track_first_failure(&quality_track(), &tof_cfg),
            Some(UpcTrackStage::TofRequirement)
        );

        let displaced = Track { dca_xy: 0.2, ..quality_track() };
        assert_eq!(upc_track_first_failure(&displaced, &cfg), Some(UpcTrackStage::Dca));

        // Stored eta is ignored, the cut uses the momentum direction
        let forward = Track { pz: 2.0, eta: 0.0, ..quality_track() };
        assert_eq!(upc_track_first_failure(&forward, &cfg), Some(UpcTrackStage::Eta));
    }

    #[test]
    fn test_passed_before() {
        let passed: Vec<_> = UpcTrackStage::passed_before(Some(UpcTrackStage::Dca)).collect();
        assert_eq!(
            passed,
            vec![
                UpcTrackStage::PvContributor,
                UpcTrackStage::ItsTpcHit,
                UpcTrackStage::TofRequirement
            ]
        );
        assert_eq!(UpcTrackStage::passed_before(None).count(), 5);
        assert_eq!(UpcTrackStage::Eta.label(), "#eta cut");
    }
}
