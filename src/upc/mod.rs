//! UPC Rho Analysis
//!
//! Exclusive ρ⁰ → π⁺π⁻ candidates in ultra-peripheral collisions. Per event:
//!
//! ```text
//! collision QC ──► vertex / gap-side cut ──► ZDC topology tag
//!                                                  │
//!      ┌───────────────────────────────────────────┘
//!      ▼
//! per-track QC ──► UPC track cuts ──► joint TPC pion nσ cut
//!                                            │
//!                  ┌─────────────────────────┼──────────────────┐
//!                  ▼                         ▼                  ▼
//!            2 tracks: ππ              4 tracks, Q=0       6 tracks, Q=0
//!     raw ─► system cuts ─► selected     system/4pi          system/6pi
//!          ─► topology-routed fills
//! ```
//!
//! Two-track systems are split by net charge into the unlike-sign, like-sign
//! positive and like-sign negative channels. The topology tag only decides
//! which histograms a selected system lands in; it never rejects an event.

pub mod system;
pub mod tagging;

pub use system::{
    phi_charge, phi_random, phi_random_with, pion_four_momenta, reconstruct_system,
    system_passes_cuts, total_charge,
};
pub use tagging::{classify_topology, NeutronTopology};

use crate::config::{UpcAxes, UpcConfig};
use crate::data::{Track, UpcEvent};
use crate::histogram::{Axis, HistogramRegistry};
use crate::kinematics::FourMomentum;
use crate::selection::event::upc_collision_passes;
use crate::selection::pid::tracks_pass_joint_pion_pid;
use crate::selection::track::{
    upc_track_first_failure, UpcTrackStage, UPC_TRACK_COUNTER_LABELS, UPC_TRACK_COUNTER_PID,
};
use crate::task::AnalysisTask;
use crate::AnalysisResult;
use std::f64::consts::PI;

const SELECTION_COUNTER: &str = "QC/tracks/hSelectionCounter";

/// Net-charge channel of a two-pion system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeChannel {
    UnlikeSign,
    LikeSignPositive,
    LikeSignNegative,
}

impl ChargeChannel {
    pub const ALL: [ChargeChannel; 3] = [
        ChargeChannel::UnlikeSign,
        ChargeChannel::LikeSignPositive,
        ChargeChannel::LikeSignNegative,
    ];

    pub fn from_total_charge(charge: i32) -> Option<Self> {
        match charge {
            0 => Some(ChargeChannel::UnlikeSign),
            2 => Some(ChargeChannel::LikeSignPositive),
            -2 => Some(ChargeChannel::LikeSignNegative),
            _ => None,
        }
    }

    /// Path segment of the system histograms
    pub fn system_path(self) -> &'static str {
        match self {
            ChargeChannel::UnlikeSign => "unlike-sign",
            ChargeChannel::LikeSignPositive => "like-sign/positive",
            ChargeChannel::LikeSignNegative => "like-sign/negative",
        }
    }

    /// Path segment of the single-pion histograms, which do not split like-sign pairs
    pub fn pion_path(self) -> &'static str {
        match self {
            ChargeChannel::UnlikeSign => "unlike-sign",
            _ => "like-sign",
        }
    }
}

/// Prefix of the selected two-pion histograms for one topology and channel
pub fn cut_system_prefix(topology: Option<NeutronTopology>, channel: ChargeChannel) -> String {
    let selection = topology.map_or("no-selection", NeutronTopology::label);
    format!("system/2pi/cut/{}/{}", selection, channel.system_path())
}

/// Built axes, cloned into every histogram that uses them
struct Axes {
    m: Axis,
    m_cut: Axis,
    pt: Axis,
    pt_cut: Axis,
    pt2: Axis,
    eta: Axis,
    y: Axis,
    phi: Axis,
    phi_asymm: Axis,
    momentum_from_phi: Axis,
    pt_quantile: Axis,
}

impl Axes {
    fn build(spec: &UpcAxes) -> AnalysisResult<Self> {
        Ok(Self {
            m: Axis::from_spec(&spec.m)?,
            m_cut: Axis::from_spec(&spec.m_cut)?,
            pt: Axis::from_spec(&spec.pt)?,
            pt_cut: Axis::from_spec(&spec.pt_cut)?,
            pt2: Axis::from_spec(&spec.pt2)?,
            eta: Axis::from_spec(&spec.eta)?,
            y: Axis::from_spec(&spec.y)?,
            phi: Axis::from_spec(&spec.phi)?,
            phi_asymm: Axis::from_spec(&spec.phi_asymm)?,
            momentum_from_phi: Axis::from_spec(&spec.momentum_from_phi)?,
            pt_quantile: Axis::from_spec(&spec.pt_quantile)?,
        })
    }
}

fn uniform(bins: usize, min: f64, max: f64) -> AnalysisResult<Axis> {
    Axis::uniform(bins, min, max)
}

/// Quantities of one reconstructed two-pion system shared by all its fills
struct PairObservables {
    mass: f64,
    pt: f64,
    rapidity: f64,
    phi_random: f64,
    phi_charge: f64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TASK
// ═══════════════════════════════════════════════════════════════════════════════

/// UPC ρ⁰ task
pub struct RhoTask {
    config: UpcConfig,
    registry: HistogramRegistry,
    events_seen: u64,
    events_accepted: u64,
}

impl RhoTask {
    /// Create the task and register its histograms
    pub fn new(config: UpcConfig) -> AnalysisResult<Self> {
        let mut registry = HistogramRegistry::new("upc-rho");
        register_histograms(&mut registry, &config)?;
        log::info!("UPC rho task: {} histograms registered", registry.len());
        Ok(Self {
            config,
            registry,
            events_seen: 0,
            events_accepted: 0,
        })
    }

    pub fn config(&self) -> &UpcConfig {
        &self.config
    }

    /// Events that passed the collision cuts
    pub fn events_accepted(&self) -> u64 {
        self.events_accepted
    }

    /// Process one reconstructed event
    pub fn process_reco(&mut self, event: &UpcEvent) -> AnalysisResult<()> {
        self.events_seen += 1;
        let collision = &event.collision;
        self.fill_collision_qc(event)?;

        if !upc_collision_passes(collision, &self.config) {
            return Ok(());
        }
        self.events_accepted += 1;

        let topology = classify_topology(&collision.zdc, &self.config);

        let mut cut_tracks: Vec<&Track> = Vec::new();
        for track in &event.tracks {
            self.fill_raw_track_qc(track)?;
            self.registry.fill_1d(SELECTION_COUNTER, 0.0)?;

            let failure = upc_track_first_failure(track, &self.config);
            for stage in UpcTrackStage::passed_before(failure) {
                self.registry.fill_1d(SELECTION_COUNTER, stage.counter_value())?;
            }
            if failure.is_some() {
                continue;
            }

            cut_tracks.push(track);
            self.registry
                .fill_2d("QC/tracks/cut/hTpcSignalVsPt", track.pt(), track.tpc_signal)?;
            self.registry
                .fill_2d("QC/tracks/cut/hDcaXYZ", track.dca_z, track.dca_xy)?;
        }
        self.registry
            .fill_1d("QC/tracks/cut/hRemainingTracks", cut_tracks.len() as f64)?;

        if let [first, second] = cut_tracks.as_slice() {
            self.registry.fill_2d(
                "QC/tracks/cut/hTpcNSigmaPi2D",
                first.pid.tpc_n_sigma_pi,
                second.pid.tpc_n_sigma_pi,
            )?;
            self.registry.fill_2d(
                "QC/tracks/cut/hTpcNSigmaEl2D",
                first.pid.tpc_n_sigma_el,
                second.pid.tpc_n_sigma_el,
            )?;
        }

        if !tracks_pass_joint_pion_pid(
            cut_tracks.iter().copied(),
            self.config.tracks_tpc_n_sigma_pi_cut,
        ) {
            return Ok(());
        }
        self.registry
            .fill_1d_weighted(SELECTION_COUNTER, UPC_TRACK_COUNTER_PID, 2.0)?;

        let vecs = pion_four_momenta(&cut_tracks);
        let system = reconstruct_system(&vecs);
        let charge = total_charge(&cut_tracks);

        match cut_tracks.len() {
            2 => self.process_pair(&cut_tracks, &vecs, &system, charge, topology),
            4 if charge == 0 => self.fill_multi_pion("system/4pi", &system),
            6 if charge == 0 => self.fill_multi_pion("system/6pi", &system),
            _ => Ok(()),
        }
    }

    fn process_pair(
        &mut self,
        tracks: &[&Track],
        vecs: &[FourMomentum],
        system: &FourMomentum,
        charge: i32,
        topology: Option<NeutronTopology>,
    ) -> AnalysisResult<()> {
        let (Some(random), Some(by_charge)) = (phi_random(vecs), phi_charge(tracks, vecs)) else {
            return Ok(());
        };
        let obs = PairObservables {
            mass: system.mass(),
            pt: system.transverse_momentum(),
            rapidity: system.rapidity(),
            phi_random: random,
            phi_charge: by_charge,
        };
        let channel = ChargeChannel::from_total_charge(charge);

        if let Some(channel) = channel {
            self.fill_pions("no-selection", channel, vecs)?;
            let prefix = format!("system/2pi/raw/{}", channel.system_path());
            self.registry.fill_1d(&format!("{}/hM", prefix), obs.mass)?;
            self.registry.fill_1d(&format!("{}/hPt", prefix), obs.pt)?;
            self.registry
                .fill_2d(&format!("{}/hPtVsM", prefix), obs.mass, obs.pt)?;
            self.registry.fill_1d(&format!("{}/hY", prefix), obs.rapidity)?;
        }

        if !system_passes_cuts(system, &self.config) {
            return Ok(());
        }

        if let Some(channel) = channel {
            self.fill_pions("selected", channel, vecs)?;
            self.fill_cut_system(&cut_system_prefix(None, channel), &obs)?;
            if let Some(topology) = topology {
                log::trace!("{} {} pair, m = {:.3}", topology, channel.system_path(), obs.mass);
                self.fill_cut_system(&cut_system_prefix(Some(topology), channel), &obs)?;
            }
        }
        Ok(())
    }

    fn fill_collision_qc(&mut self, event: &UpcEvent) -> AnalysisResult<()> {
        let c = &event.collision;
        let zdc = &c.zdc;
        let r = &mut self.registry;
        r.fill_2d("QC/collisions/hPosXY", c.pos_x, c.pos_y)?;
        r.fill_1d("QC/collisions/hPosZ", c.pos_z)?;
        r.fill_2d(
            "QC/collisions/hZdcCommonEnergy",
            zdc.energy_common_zna,
            zdc.energy_common_znc,
        )?;
        r.fill_2d("QC/collisions/hZdcTime", zdc.time_zna, zdc.time_znc)?;
        r.fill_2d(
            "QC/collisions/hZnaTimeVsCommonEnergy",
            zdc.energy_common_zna,
            zdc.time_zna,
        )?;
        r.fill_2d(
            "QC/collisions/hZncTimeVsCommonEnergy",
            zdc.energy_common_znc,
            zdc.time_znc,
        )?;
        r.fill_1d("QC/collisions/hNumContrib", c.num_contrib as f64)?;
        r.fill_2d("QC/collisions/hZnaTimeVsPosZ", c.pos_z, zdc.time_zna)?;
        r.fill_2d("QC/collisions/hZncTimeVsPosZ", c.pos_z, zdc.time_znc)?;
        r.fill_2d(
            "QC/collisions/hPosZVsZnTimeAdd",
            (zdc.time_zna + zdc.time_znc) / 2.0,
            c.pos_z,
        )?;
        r.fill_2d(
            "QC/collisions/hPosZVsZnTimeSub",
            (zdc.time_zna - zdc.time_znc) / 2.0,
            c.pos_z,
        )?;
        Ok(())
    }

    fn fill_raw_track_qc(&mut self, track: &Track) -> AnalysisResult<()> {
        let r = &mut self.registry;
        r.fill_1d("QC/tracks/raw/hTpcNSigmaPi", track.pid.tpc_n_sigma_pi)?;
        r.fill_1d("QC/tracks/raw/hTofNSigmaPi", track.pid.tof_n_sigma_pi)?;
        r.fill_1d("QC/tracks/raw/hTpcNSigmaEl", track.pid.tpc_n_sigma_el)?;
        r.fill_2d("QC/tracks/raw/hDcaXYZ", track.dca_z, track.dca_xy)?;
        r.fill_1d("QC/tracks/raw/hItsNCls", track.its_n_cls as f64)?;
        r.fill_1d("QC/tracks/raw/hItsChi2NCl", track.its_chi2_ncl)?;
        r.fill_1d("QC/tracks/raw/hTpcChi2NCl", track.tpc_chi2_ncl)?;
        r.fill_1d("QC/tracks/raw/hTpcNClsFindable", track.tpc_n_cls_findable as f64)?;
        r.fill_1d(
            "QC/tracks/raw/hTpcNClsCrossedRows",
            track.tpc_n_cls_crossed_rows as f64,
        )?;
        Ok(())
    }

    /// Per-pion kinematics; φ is shifted by π onto [0, 2π]
    fn fill_pions(
        &mut self,
        stage: &str,
        channel: ChargeChannel,
        vecs: &[FourMomentum],
    ) -> AnalysisResult<()> {
        let prefix = format!("pions/{}/{}", stage, channel.pion_path());
        let (a, b) = (&vecs[0], &vecs[1]);
        self.registry.fill_2d(
            &format!("{}/hPt", prefix),
            a.transverse_momentum(),
            b.transverse_momentum(),
        )?;
        self.registry.fill_2d(
            &format!("{}/hEta", prefix),
            a.pseudorapidity(),
            b.pseudorapidity(),
        )?;
        self.registry.fill_2d(
            &format!("{}/hPhi", prefix),
            a.azimuthal_angle() + PI,
            b.azimuthal_angle() + PI,
        )?;
        Ok(())
    }

    fn fill_cut_system(&mut self, prefix: &str, obs: &PairObservables) -> AnalysisResult<()> {
        let r = &mut self.registry;
        let path = |name: &str| format!("{}/{}", prefix, name);
        r.fill_1d(&path("hM"), obs.mass)?;
        r.fill_1d(&path("hPt"), obs.pt)?;
        r.fill_1d(&path("hPt2"), obs.pt * obs.pt)?;
        r.fill_2d(&path("hPtVsM"), obs.mass, obs.pt)?;
        r.fill_1d(&path("hY"), obs.rapidity)?;
        r.fill_1d(&path("hPhiRandom"), obs.phi_random)?;
        r.fill_1d(&path("hPhiCharge"), obs.phi_charge)?;
        r.fill_2d(&path("hPhiRandomVsM"), obs.mass, obs.phi_random)?;
        r.fill_2d(&path("hPhiChargeVsM"), obs.mass, obs.phi_charge)?;
        r.fill_2d(
            &path("hPyVsPxRandom"),
            obs.pt * obs.phi_random.cos(),
            obs.pt * obs.phi_random.sin(),
        )?;
        r.fill_2d(
            &path("hPyVsPxCharge"),
            obs.pt * obs.phi_charge.cos(),
            obs.pt * obs.phi_charge.sin(),
        )?;
        r.fill_2d(&path("hMInPtQuantileBins"), obs.mass, obs.pt)?;
        Ok(())
    }

    fn fill_multi_pion(&mut self, prefix: &str, system: &FourMomentum) -> AnalysisResult<()> {
        let mass = system.mass();
        let pt = system.transverse_momentum();
        self.registry.fill_1d(&format!("{}/hM", prefix), mass)?;
        self.registry.fill_1d(&format!("{}/hPt", prefix), pt)?;
        self.registry.fill_2d(&format!("{}/hPtVsM", prefix), mass, pt)?;
        self.registry
            .fill_1d(&format!("{}/hY", prefix), system.rapidity())?;
        Ok(())
    }
}

impl AnalysisTask for RhoTask {
    type Event = UpcEvent;

    fn name(&self) -> &str {
        "upc-rho"
    }

    fn process(&mut self, event: &UpcEvent) -> AnalysisResult<()> {
        self.process_reco(event)
    }

    fn registry(&self) -> &HistogramRegistry {
        &self.registry
    }

    fn finish(&mut self) {
        log::info!(
            "UPC rho task: {} of {} events passed the collision cuts",
            self.events_accepted,
            self.events_seen
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HISTOGRAM REGISTRATION
// ═══════════════════════════════════════════════════════════════════════════════

fn register_histograms(r: &mut HistogramRegistry, config: &UpcConfig) -> AnalysisResult<()> {
    let axes = Axes::build(&config.axes)?;

    // Collisions
    r.add_2d("QC/collisions/hPosXY", uniform(2000, -0.1, 0.1)?, uniform(2000, -0.1, 0.1)?)?;
    r.add_1d("QC/collisions/hPosZ", uniform(400, -20.0, 20.0)?)?;
    r.add_1d("QC/collisions/hNumContrib", uniform(36, -0.5, 35.5)?)?;
    r.add_2d(
        "QC/collisions/hZdcCommonEnergy",
        uniform(250, -5.0, 20.0)?,
        uniform(250, -5.0, 20.0)?,
    )?;
    r.add_2d("QC/collisions/hZdcTime", uniform(200, -10.0, 10.0)?, uniform(200, -10.0, 10.0)?)?;
    r.add_2d(
        "QC/collisions/hZnaTimeVsCommonEnergy",
        uniform(250, -5.0, 20.0)?,
        uniform(200, -10.0, 10.0)?,
    )?;
    r.add_2d(
        "QC/collisions/hZncTimeVsCommonEnergy",
        uniform(250, -5.0, 20.0)?,
        uniform(200, -10.0, 10.0)?,
    )?;
    r.add_2d("QC/collisions/hZnaTimeVsPosZ", uniform(400, -20.0, 20.0)?, uniform(300, -1.5, 1.5)?)?;
    r.add_2d("QC/collisions/hZncTimeVsPosZ", uniform(400, -20.0, 20.0)?, uniform(300, -1.5, 1.5)?)?;
    r.add_2d(
        "QC/collisions/hPosZVsZnTimeAdd",
        uniform(300, -1.5, 1.5)?,
        uniform(400, -20.0, 20.0)?,
    )?;
    r.add_2d(
        "QC/collisions/hPosZVsZnTimeSub",
        uniform(300, -1.5, 1.5)?,
        uniform(400, -20.0, 20.0)?,
    )?;

    // All tracks
    r.add_1d("QC/tracks/raw/hTpcNSigmaPi", uniform(400, -10.0, 30.0)?)?;
    r.add_1d("QC/tracks/raw/hTofNSigmaPi", uniform(400, -20.0, 20.0)?)?;
    r.add_1d("QC/tracks/raw/hTpcNSigmaEl", uniform(400, -10.0, 30.0)?)?;
    r.add_2d("QC/tracks/raw/hDcaXYZ", uniform(1000, -5.0, 5.0)?, uniform(1000, -5.0, 5.0)?)?;
    r.add_1d("QC/tracks/raw/hItsNCls", uniform(11, -0.5, 10.5)?)?;
    r.add_1d("QC/tracks/raw/hItsChi2NCl", uniform(1000, 0.0, 100.0)?)?;
    r.add_1d("QC/tracks/raw/hTpcChi2NCl", uniform(1000, 0.0, 100.0)?)?;
    r.add_1d("QC/tracks/raw/hTpcNClsFindable", uniform(200, 0.0, 200.0)?)?;
    r.add_1d("QC/tracks/raw/hTpcNClsCrossedRows", uniform(200, 0.0, 200.0)?)?;

    // Selected tracks
    r.add_2d(
        "QC/tracks/cut/hTpcNSigmaPi2D",
        uniform(400, -10.0, 30.0)?,
        uniform(400, -10.0, 30.0)?,
    )?;
    r.add_2d(
        "QC/tracks/cut/hTpcNSigmaEl2D",
        uniform(400, -10.0, 30.0)?,
        uniform(400, -10.0, 30.0)?,
    )?;
    r.add_2d("QC/tracks/cut/hTpcSignalVsPt", axes.pt.clone(), uniform(500, 0.0, 500.0)?)?;
    r.add_1d("QC/tracks/cut/hRemainingTracks", uniform(21, -0.5, 20.5)?)?;
    r.add_2d("QC/tracks/cut/hDcaXYZ", uniform(1000, -5.0, 5.0)?, uniform(1000, -5.0, 5.0)?)?;

    let n_labels = UPC_TRACK_COUNTER_LABELS.len();
    r.add_1d(
        SELECTION_COUNTER,
        uniform(n_labels, -0.5, n_labels as f64 - 0.5)?.with_labels(&UPC_TRACK_COUNTER_LABELS)?,
    )?;

    // Single pions
    for stage in ["no-selection", "selected"] {
        for sign in ["unlike-sign", "like-sign"] {
            let prefix = format!("pions/{}/{}", stage, sign);
            r.add_2d(&format!("{}/hPt", prefix), axes.pt.clone(), axes.pt.clone())?;
            r.add_2d(&format!("{}/hEta", prefix), axes.eta.clone(), axes.eta.clone())?;
            r.add_2d(&format!("{}/hPhi", prefix), axes.phi.clone(), axes.phi.clone())?;
        }
    }

    // Raw two-pion systems
    for channel in ChargeChannel::ALL {
        let prefix = format!("system/2pi/raw/{}", channel.system_path());
        r.add_1d(&format!("{}/hM", prefix), axes.m.clone())?;
        r.add_1d(&format!("{}/hPt", prefix), axes.pt.clone())?;
        r.add_2d(&format!("{}/hPtVsM", prefix), axes.m.clone(), axes.pt.clone())?;
        r.add_1d(&format!("{}/hY", prefix), axes.y.clone())?;
    }

    // Selected two-pion systems, inclusive and per topology
    let selections = std::iter::once(None).chain(NeutronTopology::ALL.into_iter().map(Some));
    for topology in selections {
        for channel in ChargeChannel::ALL {
            register_cut_system(r, &axes, &cut_system_prefix(topology, channel))?;
        }
    }

    // Four- and six-pion systems
    for prefix in ["system/4pi", "system/6pi"] {
        r.add_1d(&format!("{}/hM", prefix), axes.m.clone())?;
        r.add_1d(&format!("{}/hPt", prefix), axes.pt.clone())?;
        r.add_2d(&format!("{}/hPtVsM", prefix), axes.m.clone(), axes.pt.clone())?;
        r.add_1d(&format!("{}/hY", prefix), axes.y.clone())?;
    }
    Ok(())
}

fn register_cut_system(r: &mut HistogramRegistry, axes: &Axes, prefix: &str) -> AnalysisResult<()> {
    let path = |name: &str| format!("{}/{}", prefix, name);
    r.add_1d(&path("hM"), axes.m_cut.clone())?;
    r.add_1d(&path("hPt"), axes.pt_cut.clone())?;
    r.add_1d(&path("hPt2"), axes.pt2.clone())?;
    r.add_2d(&path("hPtVsM"), axes.m_cut.clone(), axes.pt_cut.clone())?;
    r.add_1d(&path("hY"), axes.y.clone())?;
    r.add_1d(&path("hPhiRandom"), axes.phi_asymm.clone())?;
    r.add_1d(&path("hPhiCharge"), axes.phi_asymm.clone())?;
    r.add_2d(&path("hPhiRandomVsM"), axes.m_cut.clone(), axes.phi_asymm.clone())?;
    r.add_2d(&path("hPhiChargeVsM"), axes.m_cut.clone(), axes.phi_asymm.clone())?;
    r.add_2d(
        &path("hPyVsPxRandom"),
        axes.momentum_from_phi.clone(),
        axes.momentum_from_phi.clone(),
    )?;
    r.add_2d(
        &path("hPyVsPxCharge"),
        axes.momentum_from_phi.clone(),
        axes.momentum_from_phi.clone(),
    )?;
    r.add_2d(&path("hMInPtQuantileBins"), axes.m_cut.clone(), axes.pt_quantile.clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Collision, PidResponse, ZdcInfo};

    fn pion(px: f64, py: f64, pz: f64, sign: i32) -> Track {
        Track {
            px,
            py,
            pz,
            sign,
            dca_xy: 0.005,
            dca_z: 0.05,
            has_its: true,
            has_tpc: true,
            is_pv_contributor: true,
            tpc_signal: 70.0,
            pid: PidResponse {
                tpc_n_sigma_pi: 0.5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn event(tracks: Vec<Track>, zdc: ZdcInfo) -> UpcEvent {
        UpcEvent {
            collision: Collision {
                pos_z: 1.0,
                gap_side: 2,
                num_contrib: tracks.len() as u32,
                zdc,
                ..Default::default()
            },
            tracks,
        }
    }

    fn quiet_zdc() -> ZdcInfo {
        ZdcInfo {
            energy_common_zna: -1.0,
            energy_common_znc: -1.0,
            time_zna: 0.0,
            time_znc: 0.0,
        }
    }

    fn hm_entries(task: &RhoTask, path: &str) -> u64 {
        task.registry().get_1d(path).unwrap().entries
    }

    #[test]
    fn test_registry_layout() {
        let task = RhoTask::new(UpcConfig::default()).unwrap();
        let r = task.registry();
        assert!(r.contains("system/2pi/cut/0n0n/unlike-sign/hM"));
        assert!(r.contains("system/2pi/cut/XnXn/like-sign/negative/hMInPtQuantileBins"));
        assert!(r.contains("system/2pi/cut/no-selection/like-sign/positive/hPhiCharge"));
        assert!(r.contains("pions/selected/like-sign/hPhi"));
        assert!(r.contains("system/6pi/hY"));
        assert!(!r.contains("pions/selected/like-sign/positive/hPhi"));
    }

    #[test]
    fn test_charge_channels() {
        assert_eq!(ChargeChannel::from_total_charge(0), Some(ChargeChannel::UnlikeSign));
        assert_eq!(ChargeChannel::from_total_charge(-2), Some(ChargeChannel::LikeSignNegative));
        assert_eq!(ChargeChannel::from_total_charge(1), None);
        assert_eq!(ChargeChannel::LikeSignPositive.pion_path(), "like-sign");
        assert_eq!(
            cut_system_prefix(Some(NeutronTopology::XZero), ChargeChannel::LikeSignPositive),
            "system/2pi/cut/Xn0n/like-sign/positive"
        );
    }

    #[test]
    fn test_unlike_sign_pair_routed_by_topology() {
        let mut task = RhoTask::new(UpcConfig::default()).unwrap();
        let tracks = vec![pion(0.35, 0.01, 0.1, 1), pion(-0.35, 0.02, -0.05, -1)];
        task.process(&event(tracks, quiet_zdc())).unwrap();

        assert_eq!(hm_entries(&task, "system/2pi/raw/unlike-sign/hM"), 1);
        assert_eq!(hm_entries(&task, "system/2pi/cut/no-selection/unlike-sign/hM"), 1);
        assert_eq!(hm_entries(&task, "system/2pi/cut/0n0n/unlike-sign/hM"), 1);
        assert_eq!(hm_entries(&task, "system/2pi/cut/XnXn/unlike-sign/hM"), 0);
        assert!(task.registry().filled_under("system/2pi/raw/like-sign").is_empty());

        let counter = task.registry().get_1d(SELECTION_COUNTER).unwrap();
        assert_eq!(counter.labeled_content("all tracks"), Some(2.0));
        assert_eq!(counter.labeled_content("#eta cut"), Some(2.0));
        assert_eq!(counter.labeled_content("2D TPC n#sigma_{#pi} cut"), Some(2.0));
    }

    #[test]
    fn test_like_sign_pair() {
        let mut task = RhoTask::new(UpcConfig::default()).unwrap();
        let tracks = vec![pion(0.35, 0.01, 0.1, -1), pion(-0.35, 0.02, -0.05, -1)];
        task.process(&event(tracks, quiet_zdc())).unwrap();

        assert_eq!(hm_entries(&task, "system/2pi/raw/like-sign/negative/hM"), 1);
        assert_eq!(hm_entries(&task, "system/2pi/cut/0n0n/like-sign/negative/hM"), 1);
        assert!(task.registry().filled_under("system/2pi/cut/0n0n/unlike-sign").is_empty());
        assert_eq!(
            task.registry().get_2d("pions/selected/like-sign/hPt").unwrap().entries,
            1
        );
    }

    #[test]
    fn test_gap_side_rejection_keeps_collision_qc() {
        let mut task = RhoTask::new(UpcConfig::default()).unwrap();
        let mut ev = event(vec![pion(0.35, 0.01, 0.1, 1)], quiet_zdc());
        ev.collision.gap_side = 0;
        task.process(&ev).unwrap();

        assert_eq!(hm_entries(&task, "QC/collisions/hPosZ"), 1);
        assert_eq!(hm_entries(&task, "QC/tracks/raw/hTpcNSigmaPi"), 0);
        assert_eq!(task.events_accepted(), 0);
    }

    #[test]
    fn test_joint_pid_failure_stops_reconstruction() {
        let mut task = RhoTask::new(UpcConfig::default()).unwrap();
        let mut a = pion(0.35, 0.01, 0.1, 1);
        let mut b = pion(-0.35, 0.02, -0.05, -1);
        a.pid.tpc_n_sigma_pi = 2.5;
        b.pid.tpc_n_sigma_pi = -2.5;
        task.process(&event(vec![a, b], quiet_zdc())).unwrap();

        assert_eq!(hm_entries(&task, "QC/tracks/cut/hRemainingTracks"), 1);
        assert_eq!(task.registry().get_2d("QC/tracks/cut/hTpcNSigmaPi2D").unwrap().entries, 1);
        assert_eq!(hm_entries(&task, "system/2pi/raw/unlike-sign/hM"), 0);
    }

    #[test]
    fn test_four_pion_system() {
        let mut task = RhoTask::new(UpcConfig::default()).unwrap();
        let mut tracks = vec![
            pion(0.3, 0.1, 0.0, 1),
            pion(-0.3, 0.1, 0.0, -1),
            pion(0.2, -0.1, 0.1, 1),
            pion(-0.2, -0.1, -0.1, -1),
        ];
        for t in &mut tracks {
            t.pid.tpc_n_sigma_pi = 0.1;
        }
        task.process(&event(tracks, quiet_zdc())).unwrap();

        assert_eq!(hm_entries(&task, "system/4pi/hM"), 1);
        assert!(task.registry().filled_under("system/2pi").is_empty());
    }
}
