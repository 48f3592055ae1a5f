//! Analysis Configuration
//!
//! Every threshold used by the selections lives in a serde struct whose
//! `Default` carries the standard analysis values. Fields missing from a JSON
//! file fall back to those defaults, so a config file only needs to list what
//! it overrides:
//!
//! ```json
//! { "upc": { "require_tof": true }, "lambda": { "v0": { "v0_cos_pa": 0.99 } } }
//! ```

use crate::error::AnalysisError;
use crate::histogram::{Axis, AxisSpec};
use crate::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Toggles for the ordered event-acceptance gates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSelectionConfig {
    pub sel8: bool,
    pub trigger_tvx: bool,
    pub apply_z_vertex_cut: bool,
    /// Accepted |z| of the primary vertex (cm)
    pub cut_z_vertex: f64,
    pub no_time_frame_border: bool,
    pub no_its_ro_frame_border: bool,
    pub vertex_tof_matched: bool,
    pub good_zvtx_ft0_vs_pv: bool,
}

impl Default for EventSelectionConfig {
    fn default() -> Self {
        Self {
            sel8: false,
            trigger_tvx: false,
            apply_z_vertex_cut: false,
            cut_z_vertex: 10.0,
            no_time_frame_border: false,
            no_its_ro_frame_border: false,
            vertex_tof_matched: true,
            good_zvtx_ft0_vs_pv: true,
        }
    }
}

impl EventSelectionConfig {
    /// Accept every event
    pub fn disabled() -> Self {
        Self {
            vertex_tof_matched: false,
            good_zvtx_ft0_vs_pv: false,
            ..Self::default()
        }
    }

    /// Every gate switched on
    pub fn strict() -> Self {
        Self {
            sel8: true,
            trigger_tvx: true,
            apply_z_vertex_cut: true,
            cut_z_vertex: 10.0,
            no_time_frame_border: true,
            no_its_ro_frame_border: true,
            vertex_tof_matched: true,
            good_zvtx_ft0_vs_pv: true,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRACK SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Quality cuts for general charged tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackCuts {
    pub min_pt: f64,
    pub max_eta: f64,
    pub max_dca_xy: f64,
    pub max_dca_z: f64,
    pub require_primary: bool,
    pub min_tpc_findable_clusters: f64,
    pub min_tpc_crossed_rows: f64,
    pub max_crossed_rows_over_findable: f64,
    pub max_tpc_chi2: f64,
    pub max_its_chi2: f64,
    pub require_pv_contributor: bool,
}

impl Default for TrackCuts {
    fn default() -> Self {
        Self {
            min_pt: 0.15,
            max_eta: 0.8,
            max_dca_xy: 0.5,
            max_dca_z: 2.0,
            require_primary: true,
            min_tpc_findable_clusters: 50.0,
            min_tpc_crossed_rows: 70.0,
            max_crossed_rows_over_findable: 1.2,
            max_tpc_chi2: 4.0,
            max_its_chi2: 36.0,
            require_pv_contributor: true,
        }
    }
}

/// Quality cuts applied to V0 daughters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleTrackCuts {
    pub require_its: bool,
    pub min_its_clusters: f64,
    pub min_tpc_found_clusters: f64,
    pub min_tpc_crossed_rows: f64,
    pub max_tpc_chi2: f64,
    pub eta_min: f64,
    pub eta_max: f64,
    pub require_tof: bool,
}

impl Default for SingleTrackCuts {
    fn default() -> Self {
        Self {
            require_its: false,
            min_its_clusters: 4.0,
            min_tpc_found_clusters: 80.0,
            min_tpc_crossed_rows: 80.0,
            max_tpc_chi2: 4.0,
            eta_min: -0.8,
            eta_max: 0.8,
            require_tof: false,
        }
    }
}

/// Per-species nσ windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    pub n_sigma_tpc: f64,
    pub n_sigma_tof: f64,
    /// Reject tracks without a TOF hit instead of skipping the TOF test
    pub require_tof: bool,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            n_sigma_tpc: 4.0,
            n_sigma_tof: 4.0,
            require_tof: false,
        }
    }
}

impl PidConfig {
    pub fn strict() -> Self {
        Self {
            n_sigma_tpc: 3.0,
            n_sigma_tof: 3.0,
            require_tof: true,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// V0 SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Topological and PID cuts for Lambda / anti-Lambda candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V0SelectionConfig {
    pub require_single_track_selection: bool,
    pub single_track: SingleTrackCuts,
    /// TOF nσ window on the daughters
    pub require_tof: bool,
    /// TPC nσ window on the daughters
    pub require_tpc: bool,
    pub v0_cos_pa: f64,
    pub dca_neg_to_pv: f64,
    pub dca_pos_to_pv: f64,
    pub dca_v0_daughters_max: f64,
    pub min_v0_radius: f64,
    /// Daughter |η| limit
    pub eta_max: f64,
    pub n_sigma_tpc_min: f64,
    pub n_sigma_tpc_max: f64,
    pub n_sigma_tof_min: f64,
    pub n_sigma_tof_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Daughter-DCA bound of the candidate pre-filter
    pub prefilter_dca_v0_daughters_max: f64,
}

impl Default for V0SelectionConfig {
    fn default() -> Self {
        Self {
            require_single_track_selection: false,
            single_track: SingleTrackCuts::default(),
            require_tof: false,
            require_tpc: false,
            v0_cos_pa: 0.995,
            dca_neg_to_pv: 0.05,
            dca_pos_to_pv: 0.05,
            dca_v0_daughters_max: 1.0,
            min_v0_radius: 0.4,
            eta_max: 0.8,
            n_sigma_tpc_min: -3.0,
            n_sigma_tpc_max: 3.0,
            n_sigma_tof_min: -3.0,
            n_sigma_tof_max: 3.0,
            y_min: -0.5,
            y_max: 0.5,
            prefilter_dca_v0_daughters_max: 0.5,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// UPC RHO TASK
// ═══════════════════════════════════════════════════════════════════════════════

/// Histogram binning of the rho task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpcAxes {
    pub m: AxisSpec,
    pub m_cut: AxisSpec,
    pub pt: AxisSpec,
    pub pt_cut: AxisSpec,
    pub pt2: AxisSpec,
    pub eta: AxisSpec,
    pub y: AxisSpec,
    pub phi: AxisSpec,
    pub phi_asymm: AxisSpec,
    pub momentum_from_phi: AxisSpec,
    pub pt_quantile: AxisSpec,
}

impl Default for UpcAxes {
    fn default() -> Self {
        Self {
            m: AxisSpec::uniform(1000, 0.0, 10.0),
            m_cut: AxisSpec::uniform(70, 0.5, 1.2),
            pt: AxisSpec::uniform(1000, 0.0, 10.0),
            pt_cut: AxisSpec::uniform(300, 0.0, 0.3),
            pt2: AxisSpec::uniform(300, 0.0, 0.09),
            eta: AxisSpec::uniform(180, -0.9, 0.9),
            y: AxisSpec::uniform(180, -0.9, 0.9),
            phi: AxisSpec::uniform(180, 0.0, 2.0 * PI),
            phi_asymm: AxisSpec::uniform(182, -PI, PI),
            momentum_from_phi: AxisSpec::uniform(400, -0.1, 0.1),
            pt_quantile: AxisSpec::variable(vec![
                0.0, 0.0181689, 0.0263408, 0.0330488, 0.0390369, 0.045058, 0.0512604,
                0.0582598, 0.066986, 0.0788085, 0.1,
            ]),
        }
    }
}

impl UpcAxes {
    fn all(&self) -> [(&'static str, &AxisSpec); 11] {
        [
            ("m", &self.m),
            ("m_cut", &self.m_cut),
            ("pt", &self.pt),
            ("pt_cut", &self.pt_cut),
            ("pt2", &self.pt2),
            ("eta", &self.eta),
            ("y", &self.y),
            ("phi", &self.phi),
            ("phi_asymm", &self.phi_asymm),
            ("momentum_from_phi", &self.momentum_from_phi),
            ("pt_quantile", &self.pt_quantile),
        ]
    }
}

/// Selections of the UPC rho (ππ) task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpcConfig {
    pub specify_gap_side: bool,
    pub gap_side: i32,
    pub require_tof: bool,
    pub collisions_pos_z_max: f64,
    /// ZN common-energy threshold separating 0n from Xn
    pub zn_common_energy_cut: f64,
    /// |ZN time| window (ns) for an in-time neutron signal
    pub zn_time_cut: f64,
    /// Radius of the joint TPC pion nσ cut
    pub tracks_tpc_n_sigma_pi_cut: f64,
    pub tracks_dca_max: f64,
    pub track_eta_max: f64,
    pub system_mass_min: f64,
    pub system_mass_max: f64,
    pub system_pt_max: f64,
    pub system_y_max: f64,
    pub axes: UpcAxes,
}

impl Default for UpcConfig {
    fn default() -> Self {
        Self {
            specify_gap_side: true,
            gap_side: 2,
            require_tof: false,
            collisions_pos_z_max: 10.0,
            zn_common_energy_cut: 0.0,
            zn_time_cut: 2.0,
            tracks_tpc_n_sigma_pi_cut: 3.0,
            tracks_dca_max: 1.0,
            track_eta_max: 0.9,
            system_mass_min: 0.5,
            system_mass_max: 1.2,
            system_pt_max: 0.1,
            system_y_max: 0.9,
            axes: UpcAxes::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LAMBDA TASK
// ═══════════════════════════════════════════════════════════════════════════════

/// Selections and process switches of the Lambda task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LambdaTaskConfig {
    pub process_v0: bool,
    pub process_jet_tracks: bool,
    pub event_selection: EventSelectionConfig,
    pub track_cuts: TrackCuts,
    /// Species PID on the daughters, applied when `apply_daughter_pid` is set
    pub pid: PidConfig,
    pub apply_daughter_pid: bool,
    pub v0: V0SelectionConfig,
    /// |z| cut of the jet-track pass (cm)
    pub vtx_cut: f64,
    pub jet_pt_min: f64,
    pub jet_r: f64,
}

impl Default for LambdaTaskConfig {
    fn default() -> Self {
        Self {
            process_v0: true,
            process_jet_tracks: true,
            event_selection: EventSelectionConfig::default(),
            track_cuts: TrackCuts::default(),
            pid: PidConfig::default(),
            apply_daughter_pid: false,
            v0: V0SelectionConfig::default(),
            vtx_cut: 10.0,
            jet_pt_min: 15.0,
            jet_r: 0.4,
        }
    }
}

impl LambdaTaskConfig {
    /// Jet resolution parameter in the stored integer convention
    pub fn jet_r_code(&self) -> u32 {
        (self.jet_r * 100.0).round() as u32
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOP LEVEL
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub upc: UpcConfig,
    pub lambda: LambdaTaskConfig,
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> AnalysisResult<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded analysis config from {:?}", path);
        Ok(config)
    }

    pub fn to_json(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject inverted windows, non-positive radii and unusable binning
    pub fn validate(&self) -> AnalysisResult<()> {
        let upc = &self.upc;
        ensure_window("upc.system_mass", upc.system_mass_min, upc.system_mass_max)?;
        ensure_positive("upc.zn_time_cut", upc.zn_time_cut)?;
        ensure_positive("upc.tracks_tpc_n_sigma_pi_cut", upc.tracks_tpc_n_sigma_pi_cut)?;
        ensure_positive("upc.collisions_pos_z_max", upc.collisions_pos_z_max)?;
        for (name, spec) in upc.axes.all() {
            Axis::from_spec(spec).map_err(|e| {
                AnalysisError::InvalidConfig(format!("upc.axes.{}: {}", name, e))
            })?;
        }

        let lambda = &self.lambda;
        ensure_positive("lambda.pid.n_sigma_tpc", lambda.pid.n_sigma_tpc)?;
        ensure_positive("lambda.pid.n_sigma_tof", lambda.pid.n_sigma_tof)?;
        ensure_positive(
            "lambda.event_selection.cut_z_vertex",
            lambda.event_selection.cut_z_vertex,
        )?;
        let v0 = &lambda.v0;
        ensure_window("lambda.v0.y", v0.y_min, v0.y_max)?;
        ensure_window("lambda.v0.n_sigma_tpc", v0.n_sigma_tpc_min, v0.n_sigma_tpc_max)?;
        ensure_window("lambda.v0.n_sigma_tof", v0.n_sigma_tof_min, v0.n_sigma_tof_max)?;
        ensure_window(
            "lambda.v0.single_track.eta",
            v0.single_track.eta_min,
            v0.single_track.eta_max,
        )?;
        Ok(())
    }
}

fn ensure_window(name: &str, min: f64, max: f64) -> AnalysisResult<()> {
    if min <= max {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig(format!(
            "{}: min {} exceeds max {}",
            name, min, max
        )))
    }
}

fn ensure_positive(name: &str, value: f64) -> AnalysisResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}
