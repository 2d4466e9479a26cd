//! H-Factor computation
//!
//! The H-Factor is a 0-1 trust score combining a node's confidence, a
//! depth-based weight and a fixed evidence-quality coefficient:
//!
//! ```text
//! hfactor = wi * (confidence / 100)^alpha * beta_i
//! wi      = sigmoid(k * (d0 - depth))
//! ```
//!
//! Nodes at or above the reference depth weigh close to 1; deeper nodes decay
//! toward 0.

use crate::Domain;

/// Reference depth for foundational nodes
pub const REFERENCE_DEPTH: f64 = 2.0;

/// Steepness of the depth sigmoid
pub const DEPTH_STEEPNESS: f64 = 1.5;

/// Evidence quality coefficient
pub const EVIDENCE_QUALITY: f64 = 0.95;

/// Logistic sigmoid
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Depth weight `wi` for a node at `depth`
pub fn depth_weight(depth: u32) -> f64 {
    sigmoid(DEPTH_STEEPNESS * (REFERENCE_DEPTH - f64::from(depth)))
}

/// Compute the H-Factor for a confidence percentage, depth and domain
///
/// The result is rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use hben_domain::hfactor::compute_hfactor;
/// use hben_domain::Domain;
///
/// // Foundational scientific claim held at 90%
/// assert_eq!(compute_hfactor(90.0, 0, Domain::Scientific), 0.82);
/// ```
pub fn compute_hfactor(confidence_percentage: f64, depth: u32, domain: Domain) -> f64 {
    let p = confidence_percentage / 100.0;
    let hfactor = depth_weight(depth) * p.powf(domain.alpha()) * EVIDENCE_QUALITY;
    round_to(hfactor, 2)
}

/// Round `value` to `decimals` decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
