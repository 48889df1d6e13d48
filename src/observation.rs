//! Observation model: discretised state fingerprints built from telemetry
//!
//! An [`Observation`] keeps the raw continuous values and compares them
//! exactly. A [`Discretizer`] maps it to a [`BucketKey`] by splitting each
//! field's domain into equal-width buckets. Many raw observations share one
//! key, so the key is only ever used to group candidates; it never stands in
//! for equality.

use serde::{Deserialize, Serialize};

use crate::{
    arena::{ArenaSize, OpponentScan, Telemetry},
    types::{normalize_degrees, same_bits},
};

pub const MIN_ENERGY: f64 = 0.0;
pub const MAX_ENERGY: f64 = 100.0;
pub const MIN_ANGLE: f64 = 0.0;
pub const MAX_ANGLE: f64 = 360.0;
pub const MIN_DISTANCE: f64 = 0.0;
pub const MAX_DISTANCE: f64 = 400.0;
pub const DEFAULT_BUCKETS: u16 = 10;

/// Index of the equal-width bucket of `[min, max)` that contains `value`.
///
/// Computes `floor((value - min) * buckets / (max - min))`, clamped to
/// `[0, buckets - 1]` so out-of-range telemetry (energy above 100, distances
/// past 400) lands in the edge buckets.
pub fn bucket(min: f64, max: f64, buckets: u16, value: f64) -> u16 {
    let top = f64::from(buckets.saturating_sub(1));
    let index = ((value - min) * f64::from(buckets) / (max - min)).floor();
    // NaN casts to 0
    index.clamp(0.0, top) as u16
}

/// Nearest-opponent part of an observation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpponentReading {
    pub distance: f64,
    pub bearing: f64,
    pub heading: f64,
    pub energy: f64,
}

impl From<&OpponentScan> for OpponentReading {
    fn from(scan: &OpponentScan) -> Self {
        Self {
            distance: scan.distance,
            bearing: scan.bearing,
            heading: scan.heading,
            energy: scan.energy,
        }
    }
}

impl PartialEq for OpponentReading {
    fn eq(&self, other: &Self) -> bool {
        same_bits(self.distance, other.distance)
            && same_bits(self.bearing, other.bearing)
            && same_bits(self.heading, other.heading)
            && same_bits(self.energy, other.energy)
    }
}

impl Eq for OpponentReading {}

/// Immutable snapshot of our robot and, if one was scanned, its nearest
/// opponent.
///
/// Equality is bit-exact on every raw field. An observation without an
/// opponent never equals one with an opponent, whatever the values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
    pub energy: f64,
    pub heading: f64,
    pub gun_heading: f64,
    pub opponent: Option<OpponentReading>,
}

impl Observation {
    /// Build the observation for this tick.
    pub fn observe(telemetry: &Telemetry, nearest: Option<&OpponentScan>) -> Self {
        Self {
            x: telemetry.x,
            y: telemetry.y,
            energy: telemetry.energy,
            heading: telemetry.heading,
            gun_heading: telemetry.gun_heading,
            opponent: nearest.map(OpponentReading::from),
        }
    }

    pub fn has_opponent(&self) -> bool {
        self.opponent.is_some()
    }
}

impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        same_bits(self.x, other.x)
            && same_bits(self.y, other.y)
            && same_bits(self.energy, other.energy)
            && same_bits(self.heading, other.heading)
            && same_bits(self.gun_heading, other.gun_heading)
            && self.opponent == other.opponent
    }
}

impl Eq for Observation {}

/// Discretised fingerprint of an [`Observation`].
///
/// Own fields are x, y, energy, heading, gun heading. Opponent fields are
/// energy, bearing, heading, distance, and are absent (not zero) when no
/// opponent was scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey {
    pub own: [u16; 5],
    pub opponent: Option<[u16; 4]>,
}

/// Maps observations to bucket keys for a given arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discretizer {
    arena: ArenaSize,
    buckets: u16,
}

impl Discretizer {
    pub fn new(arena: ArenaSize, buckets: u16) -> Self {
        Self { arena, buckets }
    }

    pub fn arena(&self) -> ArenaSize {
        self.arena
    }

    pub fn buckets(&self) -> u16 {
        self.buckets
    }

    fn angle(&self, degrees: f64) -> u16 {
        bucket(MIN_ANGLE, MAX_ANGLE, self.buckets, normalize_degrees(degrees))
    }

    pub fn key(&self, observation: &Observation) -> BucketKey {
        let own = [
            bucket(0.0, self.arena.width, self.buckets, observation.x),
            bucket(0.0, self.arena.height, self.buckets, observation.y),
            bucket(MIN_ENERGY, MAX_ENERGY, self.buckets, observation.energy),
            self.angle(observation.heading),
            self.angle(observation.gun_heading),
        ];
        let opponent = observation.opponent.map(|opponent| {
            [
                bucket(MIN_ENERGY, MAX_ENERGY, self.buckets, opponent.energy),
                self.angle(opponent.bearing),
                self.angle(opponent.heading),
                bucket(MIN_DISTANCE, MAX_DISTANCE, self.buckets, opponent.distance),
            ]
        });
        BucketKey { own, opponent }
    }
}

impl Default for Discretizer {
    fn default() -> Self {
        Self::new(ArenaSize::default(), DEFAULT_BUCKETS)
    }
}

/// Closest scan, ties going to the lowest robot id.
pub fn nearest_opponent(scans: &[OpponentScan]) -> Option<&OpponentScan> {
    scans.iter().min_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.id.cmp(&b.id))
    })
}

/// Radar contacts received since the previous observation.
#[derive(Debug, Clone, Default)]
pub struct ScanBuffer {
    scans: Vec<OpponentScan>,
}

impl ScanBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scan: OpponentScan) {
        self.scans.push(scan);
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Select the nearest pending contact and clear the buffer.
    pub fn take_nearest(&mut self) -> Option<OpponentScan> {
        let nearest = nearest_opponent(&self.scans).copied();
        self.scans.clear();
        nearest
    }

    /// Observe `telemetry` together with the nearest pending contact.
    pub fn observe(&mut self, telemetry: &Telemetry) -> Observation {
        let nearest = self.take_nearest();
        Observation::observe(telemetry, nearest.as_ref())
    }
}
