//! Relativistic Kinematics
//!
//! Four-momenta in natural units (c = 1, GeV) and the handful of derived
//! quantities the selections need:
//!
//! | Quantity | Definition |
//! |----------|------------|
//! | m        | √(E² − \|p\|²) |
//! | p_T      | √(p_x² + p_y²) |
//! | y        | ½ ln((E + p_z) / (E − p_z)) |
//! | η        | atanh(p_z / \|p\|) |
//! | φ        | atan2(p_y, p_x) |

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Charged pion mass (GeV/c²)
pub const MASS_PION_CHARGED: f64 = 0.13957039;
/// Proton mass (GeV/c²)
pub const MASS_PROTON: f64 = 0.93827208816;
/// Lambda baryon mass used for the candidate rapidity (GeV/c²)
pub const MASS_LAMBDA: f64 = 1.115683;

const TWO_PI: f64 = 2.0 * PI;

// ═══════════════════════════════════════════════════════════════════════════════
// FOUR-MOMENTUM
// ═══════════════════════════════════════════════════════════════════════════════

/// Four-momentum vector p^μ = (E, p_x, p_y, p_z)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourMomentum {
    /// Energy component
    pub e: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
}

impl FourMomentum {
    /// Create a new four-momentum from its components
    pub fn new(e: f64, px: f64, py: f64, pz: f64) -> Self {
        Self { e, px, py, pz }
    }

    /// Build an on-shell four-momentum from a three-momentum and a mass hypothesis
    pub fn from_xyzm(px: f64, py: f64, pz: f64, mass: f64) -> Self {
        let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
        Self { e, px, py, pz }
    }

    /// m² = E² − |p|²
    pub fn mass_squared(&self) -> f64 {
        self.e.powi(2) - self.px.powi(2) - self.py.powi(2) - self.pz.powi(2)
    }

    /// Invariant mass, 0 for spacelike vectors
    pub fn mass(&self) -> f64 {
        let m2 = self.mass_squared();
        if m2 >= 0.0 {
            m2.sqrt()
        } else {
            0.0
        }
    }

    /// |p| = √(p_x² + p_y² + p_z²)
    pub fn three_momentum_magnitude(&self) -> f64 {
        (self.px.powi(2) + self.py.powi(2) + self.pz.powi(2)).sqrt()
    }

    /// Transverse momentum p_T = √(p_x² + p_y²)
    pub fn transverse_momentum(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Rapidity y = ½ ln((E + p_z) / (E − p_z))
    pub fn rapidity(&self) -> f64 {
        let denom = self.e - self.pz;
        if denom.abs() > 1e-10 {
            0.5 * ((self.e + self.pz) / denom).ln()
        } else {
            f64::INFINITY
        }
    }

    /// Pseudorapidity η = atanh(p_z / |p|), 0 for a null three-momentum
    pub fn pseudorapidity(&self) -> f64 {
        let p = self.three_momentum_magnitude();
        if p > 0.0 {
            (self.pz / p).atanh()
        } else {
            0.0
        }
    }

    /// Azimuthal angle φ = atan2(p_y, p_x) in [−π, π]
    pub fn azimuthal_angle(&self) -> f64 {
        self.py.atan2(self.px)
    }

    /// Add two four-momenta
    pub fn add(&self, other: &Self) -> Self {
        Self {
            e: self.e + other.e,
            px: self.px + other.px,
            py: self.py + other.py,
            pz: self.pz + other.pz,
        }
    }

    /// Subtract two four-momenta
    pub fn subtract(&self, other: &Self) -> Self {
        Self {
            e: self.e - other.e,
            px: self.px - other.px,
            py: self.py - other.py,
            pz: self.pz - other.pz,
        }
    }
}

impl std::ops::Add for FourMomentum {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        FourMomentum::add(&self, &other)
    }
}

impl std::ops::Sub for FourMomentum {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        FourMomentum::subtract(&self, &other)
    }
}

impl std::ops::AddAssign for FourMomentum {
    fn add_assign(&mut self, other: Self) {
        *self = FourMomentum::add(self, &other);
    }
}

impl std::iter::Sum for FourMomentum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), |acc, p| acc + p)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ANGLES
// ═══════════════════════════════════════════════════════════════════════════════

/// Azimuthal difference φ(p1) − φ(p2), wrapped once into (−π, π]
pub fn delta_phi(p1: &FourMomentum, p2: &FourMomentum) -> f64 {
    wrap_delta_phi(p1.azimuthal_angle() - p2.azimuthal_angle())
}

/// Shift an angle difference by one turn if it falls outside (−π, π]
pub fn wrap_delta_phi(dphi: f64) -> f64 {
    if dphi > PI {
        dphi - TWO_PI
    } else if dphi <= -PI {
        dphi + TWO_PI
    } else {
        dphi
    }
}

/// Map an angle from [−π, π] onto [0, 2π)
pub fn phi_zero_to_two_pi(phi: f64) -> f64 {
    if phi < 0.0 {
        phi + TWO_PI
    } else {
        phi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_xyzm_is_on_shell() {
        let p = FourMomentum::from_xyzm(0.3, -0.4, 1.2, MASS_PION_CHARGED);
        assert!((p.mass() - MASS_PION_CHARGED).abs() < 1e-10);
        assert!((p.transverse_momentum() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pair_mass_at_rest() {
        // Back-to-back pions with |p| = q: M = 2√(q² + m²)
        let q = 0.35;
        let p1 = FourMomentum::from_xyzm(q, 0.0, 0.0, MASS_PION_CHARGED);
        let p2 = FourMomentum::from_xyzm(-q, 0.0, 0.0, MASS_PION_CHARGED);
        let system = p1 + p2;
        let expected = 2.0 * (q * q + MASS_PION_CHARGED * MASS_PION_CHARGED).sqrt();
        assert!((system.mass() - expected).abs() < 1e-12);
        assert!(system.transverse_momentum().abs() < 1e-12);
        assert!(system.rapidity().abs() < 1e-12);
    }

    #[test]
    fn test_rapidity_sign_follows_pz() {
        let forward = FourMomentum::from_xyzm(0.1, 0.0, 2.0, MASS_LAMBDA);
        let backward = FourMomentum::from_xyzm(0.1, 0.0, -2.0, MASS_LAMBDA);
        assert!(forward.rapidity() > 0.0);
        assert!((forward.rapidity() + backward.rapidity()).abs() < 1e-12);
    }

    #[test]
    fn test_pseudorapidity_transverse_track() {
        let p = FourMomentum::from_xyzm(1.0, 1.0, 0.0, MASS_PION_CHARGED);
        assert!(p.pseudorapidity().abs() < 1e-12);
        let tilted = FourMomentum::from_xyzm(1.0, 0.0, 1.0, MASS_PION_CHARGED);
        // η = atanh(1/√2) = ln(1 + √2)
        assert!((tilted.pseudorapidity() - (1.0 + 2f64.sqrt()).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_delta_phi_wraps_once() {
        let a = FourMomentum::from_xyzm((3.0f64).cos(), (3.0f64).sin(), 0.0, 0.0);
        let b = FourMomentum::from_xyzm((-3.0f64).cos(), (-3.0f64).sin(), 0.0, 0.0);
        let d = delta_phi(&a, &b);
        assert!((d - (6.0 - 2.0 * PI)).abs() < 1e-12);
        assert!((delta_phi(&b, &a) - (2.0 * PI - 6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_delta_phi_half_open_interval() {
        assert!((wrap_delta_phi(-PI) - PI).abs() < 1e-15);
        assert!((wrap_delta_phi(PI) - PI).abs() < 1e-15);
        assert!(wrap_delta_phi(0.0).abs() < 1e-15);
    }

    #[test]
    fn test_sum_of_empty_set_is_zero() {
        let total: FourMomentum = Vec::<FourMomentum>::new().into_iter().sum();
        assert_eq!(total, FourMomentum::default());
    }

    #[test]
    fn test_phi_zero_to_two_pi() {
        assert!((phi_zero_to_two_pi(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((phi_zero_to_two_pi(0.5) - 0.5).abs() < 1e-12);
    }
}
