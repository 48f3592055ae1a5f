//! Event acceptance
//!
//! Seven gates evaluated in a fixed order, each behind its own toggle in
//! [`EventSelectionConfig`]. The first failing gate rejects the event. The
//! `hNEvents` counter gets one entry per gate passed, so its bins form a
//! non-increasing cut flow.

use crate::config::{EventSelectionConfig, UpcConfig};
use crate::data::{Collision, SelectionBit};
use crate::histogram::{Axis, Histogram1D};
use crate::AnalysisResult;

/// Bin labels of the event counter: "all", one per gate, then "Applied selected"
pub const EVENT_COUNTER_LABELS: [&str; 9] = [
    "all",
    "sel8",
    "TVX",
    "zvertex",
    "TFBorder",
    "ITSROFBorder",
    "isTOFVertexMatched",
    "isGoodZvtxFT0vsPV",
    "Applied selected",
];

/// Counter bin value for "all"
pub const EVENT_COUNTER_ALL: f64 = 0.5;
/// Counter bin value for "Applied selected"
pub const EVENT_COUNTER_SELECTED: f64 = 8.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStage {
    Sel8,
    TriggerTvx,
    ZVertex,
    TimeFrameBorder,
    ItsRoFrameBorder,
    VertexTofMatched,
    GoodZvtxFt0VsPv,
}

impl EventStage {
    /// Gates in evaluation order
    pub const ORDER: [EventStage; 7] = [
        EventStage::Sel8,
        EventStage::TriggerTvx,
        EventStage::ZVertex,
        EventStage::TimeFrameBorder,
        EventStage::ItsRoFrameBorder,
        EventStage::VertexTofMatched,
        EventStage::GoodZvtxFt0VsPv,
    ];

    pub fn label(self) -> &'static str {
        EVENT_COUNTER_LABELS[self.position() + 1]
    }

    fn position(self) -> usize {
        self as usize
    }

    /// Counter value filled once this gate is passed
    pub fn counter_value(self) -> f64 {
        self.position() as f64 + 1.5
    }

    fn enabled(self, cfg: &EventSelectionConfig) -> bool {
        match self {
            EventStage::Sel8 => cfg.sel8,
            EventStage::TriggerTvx => cfg.trigger_tvx,
            EventStage::ZVertex => cfg.apply_z_vertex_cut,
            EventStage::TimeFrameBorder => cfg.no_time_frame_border,
            EventStage::ItsRoFrameBorder => cfg.no_its_ro_frame_border,
            EventStage::VertexTofMatched => cfg.vertex_tof_matched,
            EventStage::GoodZvtxFt0VsPv => cfg.good_zvtx_ft0_vs_pv,
        }
    }

    /// Whether `collision` passes this gate, ignoring the toggle
    fn test(self, collision: &Collision, cfg: &EventSelectionConfig) -> bool {
        match self {
            EventStage::Sel8 => collision.sel8,
            EventStage::TriggerTvx => collision.has_bit(SelectionBit::IsTriggerTvx),
            EventStage::ZVertex => collision.pos_z.abs() <= cfg.cut_z_vertex,
            EventStage::TimeFrameBorder => collision.has_bit(SelectionBit::NoTimeFrameBorder),
            EventStage::ItsRoFrameBorder => collision.has_bit(SelectionBit::NoItsRoFrameBorder),
            EventStage::VertexTofMatched => collision.has_bit(SelectionBit::IsVertexTofMatched),
            EventStage::GoodZvtxFt0VsPv => collision.has_bit(SelectionBit::IsGoodZvtxFt0VsPv),
        }
    }

    /// Disabled gates always pass
    pub fn passes(self, collision: &Collision, cfg: &EventSelectionConfig) -> bool {
        !self.enabled(cfg) || self.test(collision, cfg)
    }
}

/// Axis of the `hNEvents` counter
pub fn event_counter_axis() -> AnalysisResult<Axis> {
    Axis::uniform(10, 0.0, 10.0)?.with_labels(&EVENT_COUNTER_LABELS)
}

/// First gate that rejects `collision`, `None` if the event is accepted
pub fn first_failed_stage(collision: &Collision, cfg: &EventSelectionConfig) -> Option<EventStage> {
    EventStage::ORDER
        .into_iter()
        .find(|stage| !stage.passes(collision, cfg))
}

/// Run the gates in order, filling `counter` for every gate passed
pub fn accept_event(
    collision: &Collision,
    cfg: &EventSelectionConfig,
    counter: &mut Histogram1D,
) -> bool {
    for stage in EventStage::ORDER {
        if !stage.passes(collision, cfg) {
            log::trace!("event rejected at {}", stage.label());
            return false;
        }
        counter.fill(stage.counter_value());
    }
    true
}

/// Vertex-z and gap-side acceptance of the UPC task
pub fn upc_collision_passes(collision: &Collision, cfg: &UpcConfig) -> bool {
    if collision.pos_z.abs() > cfg.collisions_pos_z_max {
        return false;
    }
    if cfg.specify_gap_side && collision.gap_side != cfg.gap_side {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_collision() -> Collision {
        Collision {
            sel8: true,
            pos_z: 3.0,
            ..Default::default()
        }
        .with_bits(&SelectionBit::ALL)
    }

    fn counter() -> Histogram1D {
        Histogram1D::new(event_counter_axis().unwrap())
    }

    #[test]
    fn test_default_requires_tof_matched_and_good_zvtx() {
        let cfg = EventSelectionConfig::default();
        let mut collision = good_collision();
        assert_eq!(first_failed_stage(&collision, &cfg), None);

        collision.selection_bits = SelectionBit::IsGoodZvtxFt0VsPv.mask();
        assert_eq!(
            first_failed_stage(&collision, &cfg),
            Some(EventStage::VertexTofMatched)
        );

        collision.sel8 = false;
        collision.pos_z = 50.0;
        collision.selection_bits =
            SelectionBit::IsVertexTofMatched.mask() | SelectionBit::IsGoodZvtxFt0VsPv.mask();
        assert_eq!(first_failed_stage(&collision, &cfg), None);
    }

    #[test]
    fn test_counter_is_a_cut_flow() {
        let cfg = EventSelectionConfig::strict();
        let mut h = counter();

        assert!(accept_event(&good_collision(), &cfg, &mut h));

        let mut far = good_collision();
        far.pos_z = -12.0;
        assert!(!accept_event(&far, &cfg, &mut h));

        assert_eq!(h.labeled_content("sel8"), Some(2.0));
        assert_eq!(h.labeled_content("TVX"), Some(2.0));
        assert_eq!(h.labeled_content("zvertex"), Some(1.0));
        assert_eq!(h.labeled_content("isGoodZvtxFT0vsPV"), Some(1.0));
        assert_eq!(h.labeled_content("all"), Some(0.0));
    }

    #[test]
    fn test_rejection_matches_first_failed_stage() {
        let cfg = EventSelectionConfig::strict();
        let mut collision = good_collision();
        collision.selection_bits &= !SelectionBit::NoItsRoFrameBorder.mask();

        let mut h = counter();
        assert_eq!(
            first_failed_stage(&collision, &cfg),
            Some(EventStage::ItsRoFrameBorder)
        );
        assert!(!accept_event(&collision, &cfg, &mut h));
        assert_eq!(h.labeled_content("TFBorder"), Some(1.0));
        assert_eq!(h.labeled_content("ITSROFBorder"), Some(0.0));
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(EventStage::Sel8.label(), "sel8");
        assert_eq!(EventStage::GoodZvtxFt0VsPv.label(), "isGoodZvtxFT0vsPV");
        assert!((EventStage::ZVertex.counter_value() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_upc_collision_cuts() {
        let cfg = UpcConfig::default();
        let collision = Collision {
            pos_z: 9.9,
            gap_side: 2,
            ..Default::default()
        };
        assert!(upc_collision_passes(&collision, &cfg));

        let single_gap = Collision {
            gap_side: 0,
            ..collision.clone()
        };
        assert!(!upc_collision_passes(&single_gap, &cfg));

        let any_side = UpcConfig {
            specify_gap_side: false,
            ..UpcConfig::default()
        };
        assert!(upc_collision_passes(&single_gap, &any_side));

        let displaced = Collision {
            pos_z: -10.5,
            ..collision
        };
        assert!(!upc_collision_passes(&displaced, &cfg));
    }
}
