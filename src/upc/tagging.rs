//! Neutron-emission topology from the zero-degree calorimeters
//!
//! Each side is "0n" when its common energy is below the threshold and "Xn"
//! when it is above the threshold with an in-time signal (|t| < window).
//! Comparisons are strict, so an energy exactly at the threshold, or an
//! above-threshold side that is out of time, matches no topology.

use crate::config::UpcConfig;
use crate::data::ZdcInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeutronTopology {
    /// No neutrons on either side
    ZeroZero,
    /// Neutrons on A only
    XZero,
    /// Neutrons on C only
    ZeroX,
    /// Neutrons on both sides
    XX,
}

impl NeutronTopology {
    /// Fill-routing priority order
    pub const ALL: [NeutronTopology; 4] = [
        NeutronTopology::ZeroZero,
        NeutronTopology::XZero,
        NeutronTopology::ZeroX,
        NeutronTopology::XX,
    ];

    /// Histogram path segment
    pub fn label(self) -> &'static str {
        match self {
            NeutronTopology::ZeroZero => "0n0n",
            NeutronTopology::XZero => "Xn0n",
            NeutronTopology::ZeroX => "0nXn",
            NeutronTopology::XX => "XnXn",
        }
    }
}

impl std::fmt::Display for NeutronTopology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Thresholds of the per-side classification
#[derive(Debug, Clone, Copy, PartialEq)]
struct ZdcThresholds {
    energy_cut: f64,
    time_cut: f64,
}

impl ZdcThresholds {
    fn from_config(cfg: &UpcConfig) -> Self {
        Self {
            energy_cut: cfg.zn_common_energy_cut,
            time_cut: cfg.zn_time_cut,
        }
    }

    fn no_neutron(&self, energy: f64) -> bool {
        energy < self.energy_cut
    }

    fn neutron_in_time(&self, energy: f64, time: f64) -> bool {
        energy > self.energy_cut && time.abs() < self.time_cut
    }
}

/// Classify one event's ZDC readings
pub fn classify_topology(zdc: &ZdcInfo, cfg: &UpcConfig) -> Option<NeutronTopology> {
    let thresholds = ZdcThresholds::from_config(cfg);
    let a_empty = thresholds.no_neutron(zdc.energy_common_zna);
    let c_empty = thresholds.no_neutron(zdc.energy_common_znc);
    let a_hit = thresholds.neutron_in_time(zdc.energy_common_zna, zdc.time_zna);
    let c_hit = thresholds.neutron_in_time(zdc.energy_common_znc, zdc.time_znc);

    if a_empty && c_empty {
        Some(NeutronTopology::ZeroZero)
    } else if a_hit && c_empty {
        Some(NeutronTopology::XZero)
    } else if a_empty && c_hit {
        Some(NeutronTopology::ZeroX)
    } else if a_hit && c_hit {
        Some(NeutronTopology::XX)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zdc(ea: f64, ec: f64, ta: f64, tc: f64) -> ZdcInfo {
        ZdcInfo {
            energy_common_zna: ea,
            energy_common_znc: ec,
            time_zna: ta,
            time_znc: tc,
        }
    }

    fn thresholds() -> UpcConfig {
        UpcConfig::default()
    }

    #[test]
    fn test_four_topologies() {
        let t = thresholds();
        assert_eq!(
            classify_topology(&zdc(-1.0, -1.0, 0.0, 0.0), &t),
            Some(NeutronTopology::ZeroZero)
        );
        assert_eq!(
            classify_topology(&zdc(5.0, -1.0, 0.5, 99.0), &t),
            Some(NeutronTopology::XZero)
        );
        assert_eq!(
            classify_topology(&zdc(-1.0, 5.0, 99.0, -1.0), &t),
            Some(NeutronTopology::ZeroX)
        );
        assert_eq!(
            classify_topology(&zdc(3.0, 4.0, 1.0, -1.5), &t),
            Some(NeutronTopology::XX)
        );
    }

    #[test]
    fn test_out_of_time_neutron_matches_nothing() {
        let t = thresholds();
        assert_eq!(classify_topology(&zdc(5.0, -1.0, 2.5, 0.0), &t), None);
        assert_eq!(classify_topology(&zdc(5.0, 5.0, 0.0, -2.0), &t), None);
    }

    #[test]
    fn test_energy_at_threshold_matches_nothing() {
        let t = thresholds();
        assert_eq!(classify_topology(&zdc(0.0, -1.0, 0.0, 0.0), &t), None);
        assert_eq!(classify_topology(&zdc(0.0, 0.0, 0.0, 0.0), &t), None);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = NeutronTopology::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["0n0n", "Xn0n", "0nXn", "XnXn"]);
        assert_eq!(NeutronTopology::XX.to_string(), "XnXn");
    }
}
