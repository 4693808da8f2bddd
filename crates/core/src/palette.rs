//! Fixed colors of the flux view.
//!
//! Particles pick one of three [`ParticleHue`]s when they are created; every
//! other element of the scene (background wash, grid, overlays) uses one of
//! the constants below.

use crate::color::Rgba;
use crate::state::FieldState;

/// Entanglement above which new particles are pink.
pub const ENTANGLED_THRESHOLD: f64 = 70.0;
/// Energy above which new (non-entangled) particles are amber.
pub const CHARGED_THRESHOLD: f64 = 150.0;

/// One of the three particle colors, frozen at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleHue {
    /// Pink `#f472b6`, high entanglement.
    Entangled,
    /// Amber `#fbbf24`, high energy.
    Charged,
    /// Cyan `#22d3ee`, everything else.
    Ambient,
}

impl ParticleHue {
    /// Priority: entanglement > 70, then energy > 150, then ambient.
    pub fn select(state: &FieldState) -> ParticleHue {
        if state.entanglement > ENTANGLED_THRESHOLD {
            ParticleHue::Entangled
        } else if state.energy_level > CHARGED_THRESHOLD {
            ParticleHue::Charged
        } else {
            ParticleHue::Ambient
        }
    }

    pub fn rgba(self) -> Rgba {
        match self {
            ParticleHue::Entangled => Rgba::rgb8(0xf4, 0x72, 0xb6),
            ParticleHue::Charged => Rgba::rgb8(0xfb, 0xbf, 0x24),
            ParticleHue::Ambient => Rgba::rgb8(0x22, 0xd3, 0xee),
        }
    }
}

/// Slate background `#020617`; the fade wash uses it with partial alpha.
pub fn background() -> Rgba {
    Rgba::rgb8(2, 6, 23)
}

/// Grid lines, cyan.
pub fn grid() -> Rgba {
    Rgba::rgb8(34, 211, 238)
}

/// Resonance scan ring, purple.
pub fn scan() -> Rgba {
    Rgba::rgb8(168, 85, 247)
}

/// Flux pinch ring, magenta.
pub fn pinch() -> Rgba {
    Rgba::rgb8(236, 72, 153)
}

/// Accretion disk ellipses, amber.
pub fn accretion() -> Rgba {
    Rgba::rgb8(251, 191, 36)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(entanglement: f64, energy_level: f64) -> FieldState {
        FieldState {
            entanglement,
            energy_level,
            ..FieldState::default()
        }
    }

    #[test]
    fn entanglement_wins_over_energy() {
        assert_eq!(ParticleHue::select(&state(90.0, 190.0)), ParticleHue::Entangled);
    }

    #[test]
    fn energy_selects_charged_when_not_entangled() {
        assert_eq!(ParticleHue::select(&state(10.0, 151.0)), ParticleHue::Charged);
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(ParticleHue::select(&state(70.0, 150.0)), ParticleHue::Ambient);
    }

    #[test]
    fn hue_colors_match_host_palette() {
        assert_eq!(ParticleHue::Entangled.rgba().to_rgba8(), [0xf4, 0x72, 0xb6, 0xff]);
        assert_eq!(ParticleHue::Charged.rgba().to_rgba8(), [0xfb, 0xbf, 0x24, 0xff]);
        assert_eq!(ParticleHue::Ambient.rgba().to_rgba8(), [0x22, 0xd3, 0xee, 0xff]);
    }

    #[test]
    fn scene_colors_are_opaque() {
        for c in [background(), grid(), scan(), pinch(), accretion()] {
            assert_eq!(c.a, 1.0);
        }
        assert_eq!(background().to_rgba8(), [2, 6, 23, 255]);
    }
}
