//! Selections
//!
//! Pure, stateless predicates over the [`crate::data`] value types. Rejection
//! is always a plain `false`; none of these functions can fail or mutate their
//! inputs. The only side effect anywhere in this module is the optional
//! stage counter filled by [`event::accept_event`].
//!
//! - [`event`]: ordered event-acceptance gates and the UPC collision cut
//! - [`track`]: general, V0-daughter and UPC track quality cuts
//! - [`pid`]: per-species nσ windows and the joint pion cut
//! - [`v0`]: Lambda / anti-Lambda candidate selection

pub mod event;
pub mod pid;
pub mod track;
pub mod v0;

pub use event::{accept_event, first_failed_stage, upc_collision_passes, EventStage};
pub use pid::{passes_pion_pid, passes_proton_pid, tracks_pass_joint_pion_pid};
pub use track::{
    passes_single_track_selection, track_passes_cuts, upc_track_first_failure,
    upc_track_passes_cuts, UpcTrackStage,
};
pub use v0::{
    passes_anti_lambda_selection, passes_lambda_selection, passes_v0_prefilter, V0Hypothesis,
};
