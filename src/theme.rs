//! Theme generation from a single base color.

use serde::Serialize;
use std::fmt;

use crate::color::Color;
use crate::error::Result;
use crate::harmony::{BACKGROUND, Derivation, HarmonyType, SURFACE};

pub const DEFAULT_THEME_NAME: &str = "Custom Theme";
pub const DEFAULT_BASE_COLOR: Color = Color::new(0x34, 0x98, 0xdb);

pub const ERROR_COLOR: Color = Color::new(0xe7, 0x4c, 0x3c);
pub const WARNING_COLOR: Color = Color::new(0xf3, 0x9c, 0x12);
pub const SUCCESS_COLOR: Color = Color::new(0x2e, 0xcc, 0x71);
pub const TEXT_COLOR: Color = Color::new(0x33, 0x33, 0x33);
pub const TEXT_SECONDARY_COLOR: Color = Color::new(0x66, 0x66, 0x66);

/// The fixed slots a theme color can occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeRole {
    Primary,
    Secondary,
    Accent,
    Accent2,
    Background,
    Surface,
    Error,
    Warning,
    Success,
    Text,
    TextSecondary,
}

impl ThemeRole {
    pub const ALL: [ThemeRole; 11] = [
        ThemeRole::Primary,
        ThemeRole::Secondary,
        ThemeRole::Accent,
        ThemeRole::Accent2,
        ThemeRole::Background,
        ThemeRole::Surface,
        ThemeRole::Error,
        ThemeRole::Warning,
        ThemeRole::Success,
        ThemeRole::Text,
        ThemeRole::TextSecondary,
    ];

    /// Key used in exported JSON.
    pub fn name(self) -> &'static str {
        match self {
            ThemeRole::Primary => "primary",
            ThemeRole::Secondary => "secondary",
            ThemeRole::Accent => "accent",
            ThemeRole::Accent2 => "accent2",
            ThemeRole::Background => "background",
            ThemeRole::Surface => "surface",
            ThemeRole::Error => "error",
            ThemeRole::Warning => "warning",
            ThemeRole::Success => "success",
            ThemeRole::Text => "text",
            ThemeRole::TextSecondary => "textSecondary",
        }
    }

    pub fn from_name(name: &str) -> Option<ThemeRole> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ThemeRole::Primary => "Primary color for buttons, links, and highlights",
            ThemeRole::Secondary => "Secondary color for accents and contrasting elements",
            ThemeRole::Accent => "Accent color for special elements and calls to action",
            ThemeRole::Accent2 => "Additional accent color for complex designs",
            ThemeRole::Background => "Main background color",
            ThemeRole::Surface => "Card and surface background color",
            ThemeRole::Error => "Error messages and alerts",
            ThemeRole::Warning => "Warning messages and notifications",
            ThemeRole::Success => "Success messages and confirmations",
            ThemeRole::Text => "Primary text color",
            ThemeRole::TextSecondary => "Secondary text color for less emphasis",
        }
    }
}

impl fmt::Display for ThemeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named entry of a generated theme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThemeColor {
    pub name: ThemeRole,
    pub hex: Color,
    pub role: String,
}

impl ThemeColor {
    pub fn new(name: ThemeRole, hex: Color) -> Self {
        Self {
            name,
            hex,
            role: name.description().to_string(),
        }
    }
}

/// A generated theme: the inputs it was derived from and its ordered colors.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub base_color: Color,
    pub harmony: HarmonyType,
    pub colors: Vec<ThemeColor>,
}

impl Theme {
    /// A theme with no colors yet, as held by a fresh [`ThemeGenerator`].
    pub fn empty(base_color: Color, harmony: HarmonyType) -> Self {
        Self {
            name: DEFAULT_THEME_NAME.to_string(),
            base_color,
            harmony,
            colors: Vec::new(),
        }
    }

    /// Derive the full ordered palette for `base_color` under `harmony`.
    pub fn generate(base_color: Color, harmony: HarmonyType) -> Self {
        let hsv = base_color.to_hsv();
        let rule = harmony.rule();
        let derive = |d: &Derivation| Color::from_hsv(d.apply(hsv));

        let mut colors = Vec::with_capacity(11);
        colors.push(ThemeColor::new(ThemeRole::Primary, base_color));
        colors.push(ThemeColor::new(ThemeRole::Secondary, derive(&rule.secondary)));
        colors.push(ThemeColor::new(ThemeRole::Accent, derive(&rule.accent)));
        if let Some(accent2) = &rule.accent2 {
            colors.push(ThemeColor::new(ThemeRole::Accent2, derive(accent2)));
        }
        colors.extend([
            ThemeColor::new(ThemeRole::Background, derive(&BACKGROUND)),
            ThemeColor::new(ThemeRole::Surface, derive(&SURFACE)),
            ThemeColor::new(ThemeRole::Error, ERROR_COLOR),
            ThemeColor::new(ThemeRole::Warning, WARNING_COLOR),
            ThemeColor::new(ThemeRole::Success, SUCCESS_COLOR),
            ThemeColor::new(ThemeRole::Text, TEXT_COLOR),
            ThemeColor::new(ThemeRole::TextSecondary, TEXT_SECONDARY_COLOR),
        ]);

        log::debug!(
            "generated {} theme colors from {base_color} ({harmony})",
            colors.len()
        );

        Self {
            name: DEFAULT_THEME_NAME.to_string(),
            base_color,
            harmony,
            colors,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn get(&self, role: ThemeRole) -> Option<Color> {
        self.colors.iter().find(|c| c.name == role).map(|c| c.hex)
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Replace the hex of an existing entry. The entry's name and role text
    /// are never changed, and nothing is modified if `hex` is malformed or the
    /// theme has no entry for `role`.
    pub fn set_color(&mut self, role: ThemeRole, hex: &str) -> Result<bool> {
        let color = Color::from_hex(hex)?;
        match self.colors.iter_mut().find(|c| c.name == role) {
            Some(entry) => {
                entry.hex = color;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        crate::export::to_json(self)
    }

    pub fn to_power_bi(&self) -> Result<String> {
        crate::export::to_power_bi(self)
    }
}

/// Holds the base color and harmony selection, plus the most recently
/// generated theme for export.
///
/// Not meant to be shared between callers; keep one per session.
#[derive(Clone, Debug)]
pub struct ThemeGenerator {
    base_color: Color,
    harmony: HarmonyType,
    current: Theme,
}

impl Default for ThemeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeGenerator {
    pub fn new() -> Self {
        Self {
            base_color: DEFAULT_BASE_COLOR,
            harmony: HarmonyType::default(),
            current: Theme::empty(DEFAULT_BASE_COLOR, HarmonyType::default()),
        }
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    pub fn harmony_type(&self) -> HarmonyType {
        self.harmony
    }

    /// Parse and store a new base color. Leaves the generator untouched on
    /// error. Takes effect on the next [`generate`](Self::generate).
    pub fn set_base_color(&mut self, hex: &str) -> Result<()> {
        self.base_color = Color::from_hex(hex)?;
        Ok(())
    }

    pub fn set_base(&mut self, color: Color) {
        self.base_color = color;
    }

    /// Takes effect on the next [`generate`](Self::generate).
    pub fn set_harmony_type(&mut self, harmony: impl Into<HarmonyType>) {
        self.harmony = harmony.into();
    }

    /// Regenerate from the current base color and harmony, replacing the
    /// current theme wholesale.
    pub fn generate(&mut self) -> Theme {
        let theme = Theme::generate(self.base_color, self.harmony);
        self.current = theme.clone();
        theme
    }

    pub fn current(&self) -> &Theme {
        &self.current
    }

    /// Override one color of the current theme.
    pub fn customize(&mut self, role: ThemeRole, hex: &str) -> Result<bool> {
        self.current.set_color(role, hex)
    }

    pub fn export_to_json(&self) -> Result<String> {
        crate::export::to_json(&self.current)
    }

    pub fn export_to_power_bi(&self) -> Result<String> {
        crate::export::to_power_bi(&self.current)
    }
}
