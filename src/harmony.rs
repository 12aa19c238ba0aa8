//! Color harmony rules as data.
//!
//! Each [`HarmonyType`] maps to a [`HarmonyRule`] describing how the
//! secondary, accent and optional second accent are derived from the base
//! color's HSV representation.

use serde::Serialize;
use std::fmt;

use crate::color::Hsv;

/// Named rule for picking related hues on the color wheel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyType {
    #[default]
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    Monochromatic,
}

/// Affine adjustment of one HSV channel: `(x * scale + offset)` clamped to
/// `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adjust {
    pub scale: f64,
    pub offset: f64,
    pub min: f64,
    pub max: f64,
}

impl Adjust {
    pub const KEEP: Adjust = Adjust::new(1.0, 0.0, 0.0, 1.0);

    pub const fn new(scale: f64, offset: f64, min: f64, max: f64) -> Self {
        Self { scale, offset, min, max }
    }

    pub const fn scale(scale: f64) -> Self {
        Self::new(scale, 0.0, 0.0, 1.0)
    }

    pub fn apply(&self, x: f64) -> f64 {
        (x * self.scale + self.offset).clamp(self.min, self.max)
    }
}

/// How one theme color is derived from the base: a hue rotation (wrapping
/// modulo one turn) plus saturation and value adjustments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Derivation {
    pub hue_shift: f64,
    pub saturation: Adjust,
    pub value: Adjust,
}

impl Derivation {
    pub const fn rotate(hue_shift: f64) -> Self {
        Self {
            hue_shift,
            saturation: Adjust::KEEP,
            value: Adjust::KEEP,
        }
    }

    pub fn apply(&self, base: Hsv) -> Hsv {
        Hsv {
            h: (base.h + self.hue_shift) % 1.0,
            s: self.saturation.apply(base.s),
            v: self.value.apply(base.v),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HarmonyRule {
    pub secondary: Derivation,
    pub accent: Derivation,
    pub accent2: Option<Derivation>,
}

const COMPLEMENTARY: HarmonyRule = HarmonyRule {
    secondary: Derivation::rotate(0.50),
    accent: Derivation::rotate(0.58),
    accent2: None,
};

const ANALOGOUS: HarmonyRule = HarmonyRule {
    secondary: Derivation {
        hue_shift: 0.08,
        saturation: Adjust::scale(0.9),
        value: Adjust::KEEP,
    },
    accent: Derivation {
        hue_shift: 0.16,
        saturation: Adjust::scale(0.8),
        value: Adjust::KEEP,
    },
    accent2: None,
};

const TRIADIC: HarmonyRule = HarmonyRule {
    secondary: Derivation::rotate(0.33),
    accent: Derivation::rotate(0.66),
    accent2: None,
};

const TETRADIC: HarmonyRule = HarmonyRule {
    secondary: Derivation::rotate(0.25),
    accent: Derivation::rotate(0.50),
    accent2: Some(Derivation::rotate(0.75)),
};

const MONOCHROMATIC: HarmonyRule = HarmonyRule {
    secondary: Derivation {
        hue_shift: 0.0,
        saturation: Adjust::new(0.7, 0.0, 0.1, 1.0),
        value: Adjust::KEEP,
    },
    accent: Derivation {
        hue_shift: 0.0,
        saturation: Adjust::KEEP,
        value: Adjust::new(0.7, 0.0, 0.2, 0.9),
    },
    accent2: None,
};

/// Very light tint of the base hue used for page backgrounds.
pub const BACKGROUND: Derivation = Derivation {
    hue_shift: 0.0,
    saturation: Adjust::new(1.0, -0.7, 0.0, 1.0),
    value: Adjust::new(1.0, 0.3, 0.0, 0.98),
};

/// Slightly stronger tint than [`BACKGROUND`], for cards and panels.
pub const SURFACE: Derivation = Derivation {
    hue_shift: 0.0,
    saturation: Adjust::new(1.0, -0.6, 0.0, 1.0),
    value: Adjust::new(1.0, 0.2, 0.0, 0.95),
};

impl HarmonyType {
    /// Used for any name that does not match a known harmony.
    pub const FALLBACK: HarmonyType = HarmonyType::Complementary;

    pub const ALL: [HarmonyType; 5] = [
        HarmonyType::Complementary,
        HarmonyType::Analogous,
        HarmonyType::Triadic,
        HarmonyType::Tetradic,
        HarmonyType::Monochromatic,
    ];

    pub fn rule(self) -> &'static HarmonyRule {
        match self {
            HarmonyType::Complementary => &COMPLEMENTARY,
            HarmonyType::Analogous => &ANALOGOUS,
            HarmonyType::Triadic => &TRIADIC,
            HarmonyType::Tetradic => &TETRADIC,
            HarmonyType::Monochromatic => &MONOCHROMATIC,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HarmonyType::Complementary => "complementary",
            HarmonyType::Analogous => "analogous",
            HarmonyType::Triadic => "triadic",
            HarmonyType::Tetradic => "tetradic",
            HarmonyType::Monochromatic => "monochromatic",
        }
    }

    /// Resolve a harmony by name, case-insensitively. Unknown names resolve to
    /// [`HarmonyType::FALLBACK`]; this never fails.
    pub fn from_name(name: &str) -> HarmonyType {
        let name = name.trim();
        match Self::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(name))
        {
            Some(harmony) => harmony,
            None => {
                log::debug!(
                    "unknown harmony type {name:?}, falling back to {}",
                    Self::FALLBACK
                );
                Self::FALLBACK
            }
        }
    }
}

impl fmt::Display for HarmonyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HarmonyType {
    fn from(name: &str) -> Self {
        HarmonyType::from_name(name)
    }
}
