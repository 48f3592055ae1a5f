//! Event Data Model
//!
//! Plain value types for one reconstructed event: the collision, its tracks,
//! V0 candidates and charged jets. Everything is read-only once decoded; the
//! selections never mutate their inputs.

use crate::kinematics::{phi_zero_to_two_pi, FourMomentum};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// COLLISION
// ═══════════════════════════════════════════════════════════════════════════════

/// Event-selection flags carried in [`Collision::selection_bits`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionBit {
    IsTriggerTvx,
    NoTimeFrameBorder,
    NoItsRoFrameBorder,
    IsVertexTofMatched,
    IsGoodZvtxFt0VsPv,
}

impl SelectionBit {
    pub const ALL: [SelectionBit; 5] = [
        SelectionBit::IsTriggerTvx,
        SelectionBit::NoTimeFrameBorder,
        SelectionBit::NoItsRoFrameBorder,
        SelectionBit::IsVertexTofMatched,
        SelectionBit::IsGoodZvtxFt0VsPv,
    ];

    pub fn mask(self) -> u32 {
        1 << (self as u32)
    }
}

/// Zero-degree neutron calorimeter readings, A and C side
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZdcInfo {
    pub energy_common_zna: f64,
    pub energy_common_znc: f64,
    /// ns
    pub time_zna: f64,
    /// ns
    pub time_znc: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Collision {
    pub pos_x: f64,
    pub pos_y: f64,
    /// Primary vertex z (cm)
    pub pos_z: f64,
    pub num_contrib: u32,
    /// Global event-quality flag
    pub sel8: bool,
    /// Bit set indexed by [`SelectionBit`]
    pub selection_bits: u32,
    /// Rapidity-gap side from the single-gap producer (0 = A, 1 = C, 2 = both)
    pub gap_side: i32,
    pub zdc: ZdcInfo,
}

impl Collision {
    pub fn has_bit(&self, bit: SelectionBit) -> bool {
        self.selection_bits & bit.mask() != 0
    }

    pub fn set_bit(&mut self, bit: SelectionBit) {
        self.selection_bits |= bit.mask();
    }

    /// Builder form of [`Collision::set_bit`]
    pub fn with_bits(mut self, bits: &[SelectionBit]) -> Self {
        for &bit in bits {
            self.set_bit(bit);
        }
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRACK
// ═══════════════════════════════════════════════════════════════════════════════

/// Detector PID response in units of expected resolution (nσ)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PidResponse {
    pub tpc_n_sigma_el: f64,
    pub tpc_n_sigma_pi: f64,
    pub tpc_n_sigma_ka: f64,
    pub tpc_n_sigma_pr: f64,
    pub tof_n_sigma_pi: f64,
    pub tof_n_sigma_ka: f64,
    pub tof_n_sigma_pr: f64,
}

/// Reconstructed charged track
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    /// Charge sign, ±1
    pub sign: i32,
    /// Pseudorapidity as stored by the reconstruction
    pub eta: f64,
    pub dca_xy: f64,
    pub dca_z: f64,

    pub its_n_cls: u32,
    pub its_chi2_ncl: f64,
    pub tpc_n_cls_findable: u32,
    pub tpc_n_cls_found: u32,
    pub tpc_n_cls_crossed_rows: u32,
    pub tpc_chi2_ncl: f64,
    /// TPC dE/dx
    pub tpc_signal: f64,

    pub has_its: bool,
    pub has_tpc: bool,
    pub has_tof: bool,

    pub is_primary_track: bool,
    pub is_pv_contributor: bool,
    pub is_global_track: bool,
    pub is_global_track_wo_dca: bool,

    pub pid: PidResponse,
}

impl Track {
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Azimuth in [0, 2π)
    pub fn phi(&self) -> f64 {
        phi_zero_to_two_pi(self.four_momentum(0.0).azimuthal_angle())
    }

    /// Pseudorapidity recomputed from the momentum components
    pub fn momentum_eta(&self) -> f64 {
        self.four_momentum(0.0).pseudorapidity()
    }

    /// Crossed rows over findable clusters, 0 when nothing is findable
    pub fn tpc_crossed_rows_over_findable(&self) -> f64 {
        if self.tpc_n_cls_findable == 0 {
            0.0
        } else {
            self.tpc_n_cls_crossed_rows as f64 / self.tpc_n_cls_findable as f64
        }
    }

    /// Four-momentum under a mass hypothesis
    pub fn four_momentum(&self, mass: f64) -> FourMomentum {
        FourMomentum::from_xyzm(self.px, self.py, self.pz, mass)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// V0 AND JETS
// ═══════════════════════════════════════════════════════════════════════════════

/// Neutral two-prong decay candidate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct V0Candidate {
    /// Index of the positive daughter in the event's track list
    pub pos_track: usize,
    /// Index of the negative daughter in the event's track list
    pub neg_track: usize,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    /// Decay radius (cm)
    pub v0_radius: f64,
    pub v0_cos_pa: f64,
    pub dca_pos_to_pv: f64,
    pub dca_neg_to_pv: f64,
    pub dca_v0_daughters: f64,
    pub m_lambda: f64,
    pub m_anti_lambda: f64,
}

impl V0Candidate {
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }
}

/// Charged jet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Jet {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    /// Resolution parameter stored as round(R * 100)
    pub r: u32,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Input of the UPC rho task
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpcEvent {
    pub collision: Collision,
    pub tracks: Vec<Track>,
}

/// Input of the Lambda task
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrangenessEvent {
    pub collision: Collision,
    pub tracks: Vec<Track>,
    pub v0s: Vec<V0Candidate>,
    pub jets: Vec<Jet>,
}

impl StrangenessEvent {
    /// Resolve the daughters of `v0`, `None` if either index is out of range
    pub fn daughters(&self, v0: &V0Candidate) -> Option<(&Track, &Track)> {
        Some((self.tracks.get(v0.pos_track)?, self.tracks.get(v0.neg_track)?))
    }
}
