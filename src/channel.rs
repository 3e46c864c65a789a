//! Physical channel model: directional gain, path loss, interference, and
//! Shannon capacity.
//!
//! This layer is pure: identical link geometry and azimuth assignments always
//! produce bit-identical capacities, and no randomness is involved. All
//! stochasticity in the system lives in the learning layer above.

use crate::geometry::{angle_offset_deg, Link};

/// Radio parameters driving the capacity computation.
///
/// The defaults are reference constants, not calibrated hardware values; they
/// are chosen so that a 100-unit boresight link lands near 10 Gbps and the
/// side lobe near 1 Gbps, which keeps the reward landscape sharply peaked at
/// the true bearing.
#[derive(Debug, Clone)]
pub struct ChannelParams {
    /// Transmit power (linear, arbitrary reference unit).
    pub tx_power: f64,
    /// Antenna gain at boresight (linear).
    pub main_lobe_gain: f64,
    /// Gain floor outside the main lobe (linear).
    pub side_lobe_gain: f64,
    /// Full width of the main lobe, degrees.
    pub beamwidth_deg: f64,
    /// Even cosine exponent shaping the peak inside the lobe.
    pub rolloff: i32,
    /// Path-loss exponent (2.0 = free space).
    pub path_loss_exponent: f64,
    /// Distance below which path loss stops growing.
    pub reference_distance: f64,
    /// Receiver noise floor (linear).
    pub noise_floor: f64,
    /// Bandwidth constant scaling log2(1 + SINR) into Gbps.
    pub bandwidth_ghz: f64,
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            tx_power: 1.0,
            main_lobe_gain: 10.0,
            side_lobe_gain: 0.01,
            beamwidth_deg: 30.0,
            rolloff: 10,
            path_loss_exponent: 2.0,
            reference_distance: 1.0,
            noise_floor: 1e-6,
            bandwidth_ghz: 1.0,
        }
    }
}

impl ChannelParams {
    /// Directional antenna gain at `offset_deg` away from boresight.
    ///
    /// Peaks at zero offset, falls off as cos^rolloff inside the half
    /// beamwidth, and floors at [`ChannelParams::side_lobe_gain`] outside.
    /// Monotonically non-increasing in |offset| as long as the lobe value at
    /// the beamwidth edge stays above the floor (true for the defaults).
    pub fn gain(&self, offset_deg: f64) -> f64 {
        let offset = offset_deg.abs();
        if offset <= self.beamwidth_deg / 2.0 {
            let alignment = offset.to_radians().cos().max(0.0);
            (self.main_lobe_gain * alignment.powi(self.rolloff)).max(self.side_lobe_gain)
        } else {
            self.side_lobe_gain
        }
    }

    /// Power received at `distance` with a pointing offset of `offset_deg`.
    ///
    /// Path loss is `d^−α` relative to the reference distance; distances
    /// inside the reference distance are clamped so the value stays bounded.
    pub fn received_power(&self, distance: f64, offset_deg: f64) -> f64 {
        let d = distance.max(self.reference_distance);
        self.tx_power * self.gain(offset_deg) / d.powf(self.path_loss_exponent)
    }

    /// Per-link Shannon capacities (Gbps) for a joint azimuth assignment.
    ///
    /// For link `i`: desired power comes from its own transmitter at the
    /// offset between the chosen azimuth and the true bearing; interference
    /// is the sum over every other transmitter `j` of `j`'s radiated power
    /// toward receiver `i`, evaluated at `j`'s chosen azimuth. Capacity is
    /// `bandwidth · log2(1 + SINR)`.
    ///
    /// # Panics
    ///
    /// Panics if `azimuths_deg.len() != links.len()`.
    pub fn capacities(&self, links: &[Link], azimuths_deg: &[f64]) -> Vec<f64> {
        assert_eq!(
            links.len(),
            azimuths_deg.len(),
            "one azimuth per link is required"
        );

        links
            .iter()
            .enumerate()
            .map(|(i, link)| {
                let offset = angle_offset_deg(azimuths_deg[i], link.bearing_deg());
                let signal = self.received_power(link.distance(), offset);

                let interference: f64 = links
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(j, other)| {
                        let bearing = other.tx.bearing_to(&link.rx);
                        let off = angle_offset_deg(azimuths_deg[j], bearing);
                        self.received_power(other.tx.distance_to(&link.rx), off)
                    })
                    .sum();

                let sinr = signal / (self.noise_floor + interference);
                self.bandwidth_ghz * (1.0 + sinr).log2()
            })
            .collect()
    }
}
