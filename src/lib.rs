//! # UPC and V0 Analysis
//!
//! Event, track and V0 selections with four-vector reconstruction for two
//! heavy-ion analyses: exclusive ρ⁰ → π⁺π⁻ in ultra-peripheral collisions
//! and Λ / Λ̄ reconstruction with charged-jet QA.
//!
//! ## Features
//! - Ordered event-acceptance gates with a labeled cut-flow counter
//! - Track quality, PID and V0 topological selections as pure predicates
//! - Multi-pion system reconstruction and decay-plane azimuth observables
//! - ZDC neutron-topology tagging (0n0n, Xn0n, 0nXn, XnXn)
//! - Path-keyed histogram registry filled per event
//! - JSON configuration with per-field defaults, JSON-lines event input
//!
//! ## Architecture
//!
//! ```text
//! events (JSON lines | synthetic)
//!         │
//!         ▼
//!   ┌─────────────┐     ┌──────────────────────────────┐
//!   │ AnalysisTask│────►│ selection: event/track/pid/v0│
//!   │  RhoTask    │     └──────────────────────────────┘
//!   │  LambdaTask │     ┌──────────────────────────────┐
//!   │             │────►│ kinematics + upc::system     │
//!   └──────┬──────┘     └──────────────────────────────┘
//!          │
//!          ▼
//!   HistogramRegistry ──► summary
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod histogram;
pub mod kinematics;
pub mod selection;
pub mod strangeness;
pub mod synthetic;
pub mod task;
pub mod upc;


pub use config::{
    AnalysisConfig, EventSelectionConfig, LambdaTaskConfig, PidConfig, SingleTrackCuts,
    TrackCuts, UpcAxes, UpcConfig, V0SelectionConfig,
};
pub use data::{
    Collision, Jet, PidResponse, SelectionBit, StrangenessEvent, Track, UpcEvent, V0Candidate,
    ZdcInfo,
};
pub use error::AnalysisError;
pub use histogram::{Axis, AxisSpec, Histogram, Histogram1D, Histogram2D, HistogramRegistry};
pub use kinematics::{
    delta_phi, FourMomentum, MASS_LAMBDA, MASS_PION_CHARGED, MASS_PROTON,
};
pub use selection::{
    accept_event, passes_anti_lambda_selection, passes_lambda_selection, passes_pion_pid,
    passes_proton_pid, passes_single_track_selection, track_passes_cuts,
    tracks_pass_joint_pion_pid, upc_track_passes_cuts, V0Hypothesis,
};
pub use strangeness::LambdaTask;
pub use task::{run, AnalysisTask, RunSummary};
pub use upc::{
    classify_topology, phi_charge, phi_random, reconstruct_system, system_passes_cuts,
    total_charge, ChargeChannel, NeutronTopology, RhoTask,
};

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        // Data
        Collision,
        Track,
        UpcEvent,
        StrangenessEvent,
        V0Candidate,

        // Configuration
        AnalysisConfig,
        UpcConfig,
        LambdaTaskConfig,

        // Tasks
        AnalysisTask,
        RhoTask,
        LambdaTask,
        HistogramRegistry,
        FourMomentum,

        // Result type
        AnalysisResult,
        AnalysisError,
    };
}
