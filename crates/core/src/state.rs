//! Field-state snapshot, anomaly vocabulary and intervention tags.
//!
//! [`FieldState`] is the plain data object the host's parameter widgets own.
//! The visualizer only ever reads it. Values may arrive out of range or
//! non-finite, so [`FieldState::sanitized`] produces the clamped copy the
//! simulation works from.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::params::{param_f64, param_string_list};
use crate::prng::RandomSource;

/// Particles per 50 units of intensity.
const PARTICLES_PER_HALF_INTENSITY: f64 = 250.0;

/// Range, default and description of one numeric field-state parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub key: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub description: &'static str,
}

impl ParamSpec {
    /// Clamps into `[min, max]`. NaN becomes the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

pub const INTENSITY: ParamSpec = ParamSpec {
    key: "intensity",
    min: 0.0,
    max: 100.0,
    default: 42.0,
    description: "Field intensity: particle count and force magnitude",
};
pub const FLUCTUATION: ParamSpec = ParamSpec {
    key: "fluctuation",
    min: 0.0,
    max: 100.0,
    default: 15.0,
    description: "Fluctuation: how fast field time advances",
};
pub const ENTANGLEMENT: ParamSpec = ParamSpec {
    key: "entanglement",
    min: 0.0,
    max: 100.0,
    default: 10.0,
    description: "Entanglement: particle color above 70, glow above 80",
};
pub const FREQUENCY: ParamSpec = ParamSpec {
    key: "frequency",
    min: 0.0,
    max: 20.0,
    default: 4.8,
    description: "Resonance frequency: angular multiplier of the field function",
};
pub const ENERGY_LEVEL: ParamSpec = ParamSpec {
    key: "energyLevel",
    min: 0.0,
    max: 200.0,
    default: 80.0,
    description: "Energy level: force, particle radius, trail fade, amber above 150",
};
pub const PARTICLE_SPIN: ParamSpec = ParamSpec {
    key: "particleSpin",
    min: -10.0,
    max: 10.0,
    default: 1.5,
    description: "Particle spin: constant angular offset of the field",
};

/// Every numeric parameter, in schema order.
pub const PARAM_SPECS: [ParamSpec; 6] = [
    INTENSITY,
    FLUCTUATION,
    ENTANGLEMENT,
    FREQUENCY,
    ENERGY_LEVEL,
    PARTICLE_SPIN,
];

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

/// A named toggle that adds a force and/or an overlay.
///
/// Declaration order is the overlay stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anomaly {
    TachyonLeak,
    FluxPinch,
    PhaseDrift,
    EventHorizon,
}

impl Anomaly {
    /// All anomalies in stacking order.
    pub const ALL: [Anomaly; 4] = [
        Anomaly::TachyonLeak,
        Anomaly::FluxPinch,
        Anomaly::PhaseDrift,
        Anomaly::EventHorizon,
    ];

    /// Display name used by the host ("Tachyon Leak", ...).
    pub fn name(self) -> &'static str {
        match self {
            Anomaly::TachyonLeak => "Tachyon Leak",
            Anomaly::FluxPinch => "Flux Pinch",
            Anomaly::PhaseDrift => "Phase Drift",
            Anomaly::EventHorizon => "Event Horizon",
        }
    }

    /// Looks up an anomaly by display name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Anomaly> {
        Anomaly::ALL.into_iter().find(|a| a.name() == name)
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of active anomalies. Iterates in [`Anomaly::ALL`] order regardless
/// of insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnomalySet {
    bits: u8,
}

impl AnomalySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from host names, dropping unknown ones.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|n| {
                let found = Anomaly::from_name(n.as_ref());
                if found.is_none() {
                    log::debug!("ignoring unknown anomaly {:?}", n.as_ref());
                }
                found
            })
            .collect()
    }

    pub fn insert(&mut self, anomaly: Anomaly) {
        self.bits |= anomaly.bit();
    }

    pub fn remove(&mut self, anomaly: Anomaly) {
        self.bits &= !anomaly.bit();
    }

    pub fn contains(&self, anomaly: Anomaly) -> bool {
        self.bits & anomaly.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Active anomalies in stacking order.
    pub fn iter(&self) -> impl Iterator<Item = Anomaly> {
        let set = *self;
        Anomaly::ALL.into_iter().filter(move |a| set.contains(*a))
    }
}

impl FromIterator<Anomaly> for AnomalySet {
    fn from_iter<T: IntoIterator<Item = Anomaly>>(iter: T) -> Self {
        let mut set = AnomalySet::new();
        for a in iter {
            set.insert(a);
        }
        set
    }
}

impl Serialize for AnomalySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for a in self.iter() {
            seq.serialize_element(a.name())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for AnomalySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(AnomalySet::from_names(names))
    }
}

// ---------------------------------------------------------------------------
// Intervention tag
// ---------------------------------------------------------------------------

/// Render-mode tag supplied by the diagnostic collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intervention {
    VectorTrace,
    ResonanceScan,
    VoidAnalysis,
    FluxGlow,
}

impl Intervention {
    pub const ALL: [Intervention; 4] = [
        Intervention::VectorTrace,
        Intervention::ResonanceScan,
        Intervention::VoidAnalysis,
        Intervention::FluxGlow,
    ];

    /// Wire tag, e.g. `"VOID_ANALYSIS"`.
    pub fn tag(self) -> &'static str {
        match self {
            Intervention::VectorTrace => "VECTOR_TRACE",
            Intervention::ResonanceScan => "RESONANCE_SCAN",
            Intervention::VoidAnalysis => "VOID_ANALYSIS",
            Intervention::FluxGlow => "FLUX_GLOW",
        }
    }

    /// Parses a wire tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Intervention> {
        Intervention::ALL.into_iter().find(|i| i.tag() == tag)
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// FieldState
// ---------------------------------------------------------------------------

/// Snapshot of the synthetic field's parameters.
///
/// Serializes with the host's camelCase keys, so a state object produced by
/// the web UI can be fed in unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldState {
    pub intensity: f64,
    pub fluctuation: f64,
    pub entanglement: f64,
    pub frequency: f64,
    pub energy_level: f64,
    pub particle_spin: f64,
    pub anomalies: AnomalySet,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            intensity: INTENSITY.default,
            fluctuation: FLUCTUATION.default,
            entanglement: ENTANGLEMENT.default,
            frequency: FREQUENCY.default,
            energy_level: ENERGY_LEVEL.default,
            particle_spin: PARTICLE_SPIN.default,
            anomalies: AnomalySet::new(),
        }
    }
}

impl FieldState {
    /// Extracts a state from a JSON object, falling back to defaults for
    /// missing or wrongly-typed keys. Unknown anomaly names are dropped.
    pub fn from_json(params: &Value) -> Self {
        Self {
            intensity: param_f64(params, INTENSITY.key, INTENSITY.default),
            fluctuation: param_f64(params, FLUCTUATION.key, FLUCTUATION.default),
            entanglement: param_f64(params, ENTANGLEMENT.key, ENTANGLEMENT.default),
            frequency: param_f64(params, FREQUENCY.key, FREQUENCY.default),
            energy_level: param_f64(params, ENERGY_LEVEL.key, ENERGY_LEVEL.default),
            particle_spin: param_f64(params, PARTICLE_SPIN.key, PARTICLE_SPIN.default),
            anomalies: AnomalySet::from_names(param_string_list(params, "anomalies")),
        }
    }

    /// Returns a copy with `anomaly` active.
    pub fn with_anomaly(mut self, anomaly: Anomaly) -> Self {
        self.anomalies.insert(anomaly);
        self
    }

    pub fn has(&self, anomaly: Anomaly) -> bool {
        self.anomalies.contains(anomaly)
    }

    /// Copy with every numeric field clamped into its documented range.
    /// NaN fields take their default.
    pub fn sanitized(&self) -> Self {
        Self {
            intensity: INTENSITY.clamp(self.intensity),
            fluctuation: FLUCTUATION.clamp(self.fluctuation),
            entanglement: ENTANGLEMENT.clamp(self.entanglement),
            frequency: FREQUENCY.clamp(self.frequency),
            energy_level: ENERGY_LEVEL.clamp(self.energy_level),
            particle_spin: PARTICLE_SPIN.clamp(self.particle_spin),
            anomalies: self.anomalies,
        }
    }

    /// Particle pool size for a simulation started from this state:
    /// `floor(250 * intensity / 50)`, using the clamped intensity.
    pub fn pool_size(&self) -> usize {
        let intensity = INTENSITY.clamp(self.intensity);
        (PARTICLES_PER_HALF_INTENSITY * intensity / 50.0).floor() as usize
    }

    /// One tick of the host's streaming random walk.
    ///
    /// Every value wanders by a small uniform step and is clamped back into
    /// range. Entanglement occasionally jumps by 20 instead.
    pub fn drift(&self, rng: &mut dyn RandomSource) -> Self {
        let mut walk = |value: f64, spec: &ParamSpec, factor: f64| {
            spec.clamp(value + (rng.next_f64() - 0.5) * factor)
        };
        let intensity = walk(self.intensity, &INTENSITY, 2.0);
        let energy_level = walk(self.energy_level, &ENERGY_LEVEL, 5.0);
        let particle_spin = walk(self.particle_spin, &PARTICLE_SPIN, 0.5);
        let fluctuation = walk(self.fluctuation, &FLUCTUATION, 1.0);
        let frequency = walk(self.frequency, &FREQUENCY, 0.1);
        let entanglement = if rng.next_f64() > 0.95 {
            ENTANGLEMENT.clamp(self.entanglement + 20.0)
        } else {
            ENTANGLEMENT.clamp(self.entanglement + (rng.next_f64() - 0.5) * 0.5)
        };
        Self {
            intensity,
            fluctuation,
            entanglement,
            frequency,
            energy_level,
            particle_spin,
            anomalies: self.anomalies,
        }
    }

    /// Current values as a JSON object with host keys.
    pub fn params(&self) -> Value {
        json!({
            INTENSITY.key: self.intensity,
            FLUCTUATION.key: self.fluctuation,
            ENTANGLEMENT.key: self.entanglement,
            FREQUENCY.key: self.frequency,
            ENERGY_LEVEL.key: self.energy_level,
            PARTICLE_SPIN.key: self.particle_spin,
            "anomalies": self.anomalies.iter().map(Anomaly::name).collect::<Vec<_>>(),
        })
    }

    /// Schema describing every parameter, its type, range and default.
    pub fn param_schema() -> Value {
        let mut schema = Map::new();
        for spec in PARAM_SPECS {
            schema.insert(
                spec.key.to_string(),
                json!({
                    "type": "number",
                    "default": spec.default,
                    "min": spec.min,
                    "max": spec.max,
                    "description": spec.description,
                }),
            );
        }
        schema.insert(
            "anomalies".to_string(),
            json!({
                "type": "array",
                "items": {
                    "type": "string",
                    "enum": Anomaly::ALL.iter().map(|a| a.name()).collect::<Vec<_>>(),
                },
                "default": [],
                "description": "Active anomalies; unknown names are ignored",
            }),
        );
        Value::Object(schema)
    }
}
