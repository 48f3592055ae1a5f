//! Lambda Polarization Task
//!
//! Two independent passes over each [`StrangenessEvent`], toggled by
//! [`LambdaTaskConfig::process_v0`] and [`LambdaTaskConfig::process_jet_tracks`]:
//!
//! | Pass | Gates | Output |
//! |------|-------|--------|
//! | V0 | event acceptance (`hNEvents`), candidate pre-filter | Lambda / anti-Lambda QA and mass |
//! | jet tracks | vertex z, sel8 (`hNEventsJet`) | global-track QA, jet kinematics |
//!
//! A candidate may pass both hypotheses and then fills both sets.

use crate::config::LambdaTaskConfig;
use crate::data::{StrangenessEvent, Track, V0Candidate};
use crate::histogram::{Axis, HistogramRegistry};
use crate::selection::event::{
    accept_event, event_counter_axis, EVENT_COUNTER_ALL, EVENT_COUNTER_SELECTED,
};
use crate::selection::pid::{passes_pion_pid, passes_proton_pid};
use crate::selection::track::track_passes_cuts;
use crate::selection::v0::{passes_hypothesis, passes_v0_prefilter, V0Hypothesis};
use crate::task::AnalysisTask;
use crate::AnalysisResult;

const EVENT_COUNTER: &str = "hNEvents";
const JET_EVENT_COUNTER: &str = "hNEventsJet";

/// Bin labels of `hNEventsJet`
pub const JET_EVENT_COUNTER_LABELS: [&str; 3] = ["all", "zvertex", "JCollisionSel::sel8"];

fn uniform(bins: usize, min: f64, max: f64) -> AnalysisResult<Axis> {
    Axis::uniform(bins, min, max)
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Per-task tallies reported by [`AnalysisTask::finish`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LambdaCounts {
    pub events: u64,
    pub accepted_events: u64,
    pub lambdas: u64,
    pub anti_lambdas: u64,
    pub jets: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TASK
// ═══════════════════════════════════════════════════════════════════════════════

pub struct LambdaTask {
    config: LambdaTaskConfig,
    registry: HistogramRegistry,
    counts: LambdaCounts,
}

impl LambdaTask {
    pub fn new(config: LambdaTaskConfig) -> AnalysisResult<Self> {
        let mut registry = HistogramRegistry::new("lambda");
        register_v0_histograms(&mut registry)?;
        register_jet_histograms(&mut registry)?;
        log::info!(
            "Lambda task: {} histograms registered (v0 pass: {}, jet pass: {})",
            registry.len(),
            config.process_v0,
            config.process_jet_tracks
        );
        Ok(Self {
            config,
            registry,
            counts: LambdaCounts::default(),
        })
    }

    pub fn config(&self) -> &LambdaTaskConfig {
        &self.config
    }

    pub fn counts(&self) -> LambdaCounts {
        self.counts
    }

    /// V0 pass: event acceptance, then both hypotheses per pre-filtered candidate
    pub fn process_v0(&mut self, event: &StrangenessEvent) -> AnalysisResult<()> {
        self.registry.fill_1d(EVENT_COUNTER, EVENT_COUNTER_ALL)?;
        let accepted = accept_event(
            &event.collision,
            &self.config.event_selection,
            self.registry.get_1d_mut(EVENT_COUNTER)?,
        );
        if !accepted {
            return Ok(());
        }
        self.registry.fill_1d(EVENT_COUNTER, EVENT_COUNTER_SELECTED)?;
        self.counts.accepted_events += 1;

        let mut n_v0 = 0usize;
        for v0 in &event.v0s {
            if !passes_v0_prefilter(v0, &self.config.v0) {
                continue;
            }
            n_v0 += 1;
            let Some((pos, neg)) = event.daughters(v0) else {
                log::debug!(
                    "V0 daughters ({}, {}) not in a track list of {}",
                    v0.pos_track,
                    v0.neg_track,
                    event.tracks.len()
                );
                continue;
            };

            if self.candidate_passes(V0Hypothesis::Lambda, v0, pos, neg) {
                self.fill_lambda(v0, pos, neg)?;
            }
            if self.candidate_passes(V0Hypothesis::AntiLambda, v0, pos, neg) {
                self.fill_anti_lambda(v0, pos, neg)?;
            }
        }
        self.registry.fill_1d("V0Counts", n_v0 as f64)?;
        Ok(())
    }

    /// Jet pass: global-track QA, selected-track kinematics and jet kinematics
    pub fn process_jet_tracks(&mut self, event: &StrangenessEvent) -> AnalysisResult<()> {
        let collision = &event.collision;
        self.registry.fill_1d(JET_EVENT_COUNTER, 0.5)?;
        if collision.pos_z.abs() > self.config.vtx_cut {
            return Ok(());
        }
        self.registry.fill_1d(JET_EVENT_COUNTER, 1.5)?;
        if !collision.sel8 {
            return Ok(());
        }
        self.registry.fill_1d(JET_EVENT_COUNTER, 2.5)?;

        for track in event.tracks.iter().filter(|t| t.is_global_track) {
            self.fill_track_qa(track)?;
            if !track_passes_cuts(track, &self.config.track_cuts) {
                continue;
            }
            self.registry.fill_1d("ptHistogram", track.pt())?;
            self.registry.fill_1d("etaHistogram", track.eta)?;
            self.registry.fill_1d("phiHistogram", track.phi())?;
        }

        let r_code = self.config.jet_r_code();
        let pt_min = self.config.jet_pt_min;
        let mut n_jets = 0usize;
        for jet in event.jets.iter().filter(|j| j.pt > pt_min && j.r == r_code) {
            self.registry.fill_1d("FJetaHistogram", jet.eta)?;
            self.registry.fill_1d("FJphiHistogram", jet.phi)?;
            self.registry.fill_1d("FJptHistogram", jet.pt)?;
            n_jets += 1;
        }
        self.registry.fill_1d("nJetsPerEvent", n_jets as f64)?;
        self.counts.jets += n_jets as u64;
        Ok(())
    }

    fn candidate_passes(
        &self,
        hypothesis: V0Hypothesis,
        v0: &V0Candidate,
        pos: &Track,
        neg: &Track,
    ) -> bool {
        if !passes_hypothesis(hypothesis, v0, pos, neg, &self.config.v0) {
            return false;
        }
        if !self.config.apply_daughter_pid {
            return true;
        }
        let pid = &self.config.pid;
        match hypothesis {
            V0Hypothesis::Lambda => passes_proton_pid(pos, pid) && passes_pion_pid(neg, pid),
            V0Hypothesis::AntiLambda => passes_pion_pid(pos, pid) && passes_proton_pid(neg, pid),
        }
    }

    fn fill_lambda(&mut self, v0: &V0Candidate, pos: &Track, neg: &Track) -> AnalysisResult<()> {
        let r = &mut self.registry;
        let pt = v0.pt();
        r.fill_1d("hPt", pt)?;
        r.fill_1d("V0Radius", v0.v0_radius)?;
        r.fill_1d("CosPA", v0.v0_cos_pa)?;
        r.fill_1d("V0DCANegToPV", v0.dca_neg_to_pv)?;
        r.fill_1d("V0DCAPosToPV", v0.dca_pos_to_pv)?;
        r.fill_1d("V0DCAV0Daughters", v0.dca_v0_daughters)?;
        r.fill_2d("hMassVsPtLambda", pt, v0.m_lambda)?;
        r.fill_1d("hMassLambda", v0.m_lambda)?;
        r.fill_1d("TPCNSigmaPosPr", pos.pid.tpc_n_sigma_pr)?;
        r.fill_1d("TPCNSigmaNegPi", neg.pid.tpc_n_sigma_pi)?;
        self.counts.lambdas += 1;
        Ok(())
    }

    fn fill_anti_lambda(
        &mut self,
        v0: &V0Candidate,
        pos: &Track,
        neg: &Track,
    ) -> AnalysisResult<()> {
        let r = &mut self.registry;
        r.fill_2d("hMassVsPtAntiLambda", v0.pt(), v0.m_anti_lambda)?;
        r.fill_1d("hMassAntiLambda", v0.m_anti_lambda)?;
        r.fill_1d("TPCNSigmaPosPi", pos.pid.tpc_n_sigma_pi)?;
        r.fill_1d("TPCNSigmaNegPr", neg.pid.tpc_n_sigma_pr)?;
        self.counts.anti_lambdas += 1;
        Ok(())
    }

    fn fill_track_qa(&mut self, track: &Track) -> AnalysisResult<()> {
        let r = &mut self.registry;
        r.fill_1d("hDCArToPv", track.dca_xy)?;
        r.fill_1d("hDCAzToPv", track.dca_z)?;
        r.fill_1d("rawpT", track.pt())?;
        r.fill_1d("hIsPrim", flag(track.is_primary_track))?;
        r.fill_1d("hIsGood", flag(track.is_global_track_wo_dca))?;
        r.fill_1d("hIsPrimCont", flag(track.is_pv_contributor))?;
        r.fill_1d("hFindableTPCClusters", track.tpc_n_cls_findable as f64)?;
        r.fill_1d("hFindableTPCRows", track.tpc_n_cls_crossed_rows as f64)?;
        r.fill_1d("hClustersVsRows", track.tpc_crossed_rows_over_findable())?;
        r.fill_1d("hTPCChi2", track.tpc_chi2_ncl)?;
        r.fill_1d("hITSChi2", track.its_chi2_ncl)?;
        r.fill_1d("h_track_pt", track.pt())?;
        r.fill_1d("h_track_eta", track.eta)?;
        r.fill_1d("h_track_phi", track.phi())?;
        Ok(())
    }
}

impl AnalysisTask for LambdaTask {
    type Event = StrangenessEvent;

    fn name(&self) -> &str {
        "lambda"
    }

    fn process(&mut self, event: &StrangenessEvent) -> AnalysisResult<()> {
        self.counts.events += 1;
        if self.config.process_jet_tracks {
            self.process_jet_tracks(event)?;
        }
        if self.config.process_v0 {
            self.process_v0(event)?;
        }
        Ok(())
    }

    fn registry(&self) -> &HistogramRegistry {
        &self.registry
    }

    fn finish(&mut self) {
        let c = self.counts;
        log::info!(
            "Lambda task: {} of {} events accepted, {} Lambda, {} anti-Lambda, {} jets",
            c.accepted_events,
            c.events,
            c.lambdas,
            c.anti_lambdas,
            c.jets
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HISTOGRAM REGISTRATION
// ═══════════════════════════════════════════════════════════════════════════════

fn register_v0_histograms(r: &mut HistogramRegistry) -> AnalysisResult<()> {
    r.add_1d(EVENT_COUNTER, event_counter_axis()?)?;
    r.add_1d("V0Counts", uniform(10, 0.0, 10.0)?)?;

    r.add_1d("hPt", uniform(100, 0.0, 10.0)?)?;
    r.add_1d("V0Radius", uniform(100, 0.0, 20.0)?)?;
    r.add_1d("CosPA", uniform(100, 0.9, 1.0)?)?;
    r.add_1d("V0DCANegToPV", uniform(100, -1.0, 1.0)?)?;
    r.add_1d("V0DCAPosToPV", uniform(100, -1.0, 1.0)?)?;
    r.add_1d("V0DCAV0Daughters", uniform(55, 0.0, 2.2)?)?;

    for name in ["hMassVsPtLambda", "hMassVsPtAntiLambda"] {
        r.add_2d(name, uniform(100, 0.0, 10.0)?, uniform(200, 1.016, 1.216)?)?;
    }
    r.add_1d("hMassLambda", uniform(200, 0.9, 1.2)?)?;
    r.add_1d("hMassAntiLambda", uniform(200, 0.9, 1.2)?)?;

    for name in ["TPCNSigmaPosPr", "TPCNSigmaNegPi", "TPCNSigmaPosPi", "TPCNSigmaNegPr"] {
        r.add_1d(name, uniform(100, -10.0, 10.0)?)?;
    }
    Ok(())
}

fn register_jet_histograms(r: &mut HistogramRegistry) -> AnalysisResult<()> {
    r.add_1d(
        JET_EVENT_COUNTER,
        uniform(4, 0.0, 4.0)?.with_labels(&JET_EVENT_COUNTER_LABELS)?,
    )?;

    r.add_1d("hDCArToPv", uniform(300, 0.0, 3.0)?)?;
    r.add_1d("hDCAzToPv", uniform(300, 0.0, 3.0)?)?;
    r.add_1d("rawpT", uniform(1000, 0.0, 10.0)?)?;
    for name in ["hIsPrim", "hIsGood", "hIsPrimCont"] {
        r.add_1d(name, uniform(2, -0.5, 1.5)?)?;
    }
    r.add_1d("hFindableTPCClusters", uniform(200, 0.0, 200.0)?)?;
    r.add_1d("hFindableTPCRows", uniform(200, 0.0, 200.0)?)?;
    r.add_1d("hClustersVsRows", uniform(200, 0.0, 2.0)?)?;
    r.add_1d("hTPCChi2", uniform(200, 0.0, 100.0)?)?;
    r.add_1d("hITSChi2", uniform(200, 0.0, 100.0)?)?;
    r.add_1d("h_track_pt", uniform(200, 0.0, 200.0)?)?;
    r.add_1d("h_track_eta", uniform(100, -1.0, 1.0)?)?;
    r.add_1d("h_track_phi", uniform(80, -1.0, 7.0)?)?;

    for prefix in ["", "FJ"] {
        r.add_1d(&format!("{}ptHistogram", prefix), uniform(200, 0.0, 200.0)?)?;
        r.add_1d(&format!("{}etaHistogram", prefix), uniform(30, -1.5, 1.5)?)?;
        r.add_1d(&format!("{}phiHistogram", prefix), uniform(200, -1.0, 7.0)?)?;
    }
    r.add_1d("nJetsPerEvent", uniform(10, 0.0, 10.0)?)?;
    Ok(())
}
