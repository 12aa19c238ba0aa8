//! Serializers for generated themes.
//!
//! Both formats are pretty-printed JSON with two-space indentation.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::color::Color;
use crate::error::Result;
use crate::theme::{Theme, ThemeColor, ThemeRole};

pub const POWER_BI_BACKGROUND: &str = "#ffffff";
pub const POWER_BI_FOREGROUND: &str = "#333333";
pub const POWER_BI_TABLE_ACCENT: &str = "#f0f0f0";
pub const POWER_BI_SECONDARY_FOREGROUND: &str = "#666666";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThemeDocument<'a> {
    name: &'a str,
    base_color: Color,
    colors: ColorMap<'a>,
}

/// `{ name: hex, ... }` in theme order. A repeated name keeps its first
/// position and takes the last value.
struct ColorMap<'a>(&'a [ThemeColor]);

impl Serialize for ColorMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut entries: Vec<(ThemeRole, Color)> = Vec::with_capacity(self.0.len());
        for c in self.0 {
            match entries.iter_mut().find(|(name, _)| *name == c.name) {
                Some(slot) => slot.1 = c.hex,
                None => entries.push((c.name, c.hex)),
            }
        }

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, hex) in &entries {
            map.serialize_entry(name.name(), hex)?;
        }
        map.end()
    }
}

/// Power BI report theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerBiTheme {
    pub name: String,
    pub data_colors: Vec<String>,
    pub background: String,
    pub foreground: String,
    pub table_accent: String,
    pub secondary_foreground: String,
}

/// Where a theme role lands in a Power BI theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerBiField {
    DataColors,
    Background,
    Foreground,
    TableAccent,
    SecondaryForeground,
}

impl PowerBiField {
    /// Roles without a Power BI counterpart (such as `accent2`) map to `None`
    /// and are left out of the export.
    pub fn for_role(role: ThemeRole) -> Option<PowerBiField> {
        match role {
            ThemeRole::Primary
            | ThemeRole::Secondary
            | ThemeRole::Accent
            | ThemeRole::Success
            | ThemeRole::Warning
            | ThemeRole::Error => Some(PowerBiField::DataColors),
            ThemeRole::Background => Some(PowerBiField::Background),
            ThemeRole::Surface => Some(PowerBiField::TableAccent),
            ThemeRole::Text => Some(PowerBiField::Foreground),
            ThemeRole::TextSecondary => Some(PowerBiField::SecondaryForeground),
            ThemeRole::Accent2 => None,
        }
    }
}

impl PowerBiTheme {
    pub fn from_theme(theme: &Theme) -> Self {
        let mut out = PowerBiTheme {
            name: theme.name.clone(),
            data_colors: Vec::new(),
            background: POWER_BI_BACKGROUND.to_string(),
            foreground: POWER_BI_FOREGROUND.to_string(),
            table_accent: POWER_BI_TABLE_ACCENT.to_string(),
            secondary_foreground: POWER_BI_SECONDARY_FOREGROUND.to_string(),
        };

        for color in &theme.colors {
            let hex = color.hex.hex();
            match PowerBiField::for_role(color.name) {
                Some(PowerBiField::DataColors) => out.data_colors.push(hex),
                Some(PowerBiField::Background) => out.background = hex,
                Some(PowerBiField::Foreground) => out.foreground = hex,
                Some(PowerBiField::TableAccent) => out.table_accent = hex,
                Some(PowerBiField::SecondaryForeground) => out.secondary_foreground = hex,
                None => log::trace!("{} has no Power BI field, skipping", color.name),
            }
        }
        out
    }
}

/// `{ name, baseColor, colors: { <role>: <hex>, ... } }`
pub fn to_json(theme: &Theme) -> Result<String> {
    let doc = ThemeDocument {
        name: &theme.name,
        base_color: theme.base_color,
        colors: ColorMap(&theme.colors),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// `{ name, dataColors: [...], background, foreground, tableAccent, secondaryForeground }`
pub fn to_power_bi(theme: &Theme) -> Result<String> {
    Ok(serde_json::to_string_pretty(&PowerBiTheme::from_theme(theme))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::HarmonyType;
    use crate::theme::DEFAULT_BASE_COLOR;
    use serde_json::Value;

    fn base() -> Color {
        Color::from_hex("#3498db").unwrap()
    }

    #[test]
    fn json_has_one_entry_per_color_in_order() {
        let theme = Theme::generate(base(), HarmonyType::Tetradic);
        let json = to_json(&theme).unwrap();

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Custom Theme");
        assert_eq!(value["baseColor"], "#3498db");
        let colors = value["colors"].as_object().unwrap();
        assert_eq!(colors.len(), 11);
        assert_eq!(colors["accent2"], theme.get(ThemeRole::Accent2).unwrap().hex());
        assert_eq!(colors["textSecondary"], "#666666");

        // insertion order is kept in the text itself
        let primary = json.find("\"primary\"").unwrap();
        let secondary = json.find("\"secondary\"").unwrap();
        let text_secondary = json.find("\"textSecondary\"").unwrap();
        assert!(primary < secondary && secondary < text_secondary);
    }

    #[test]
    fn json_is_pretty_printed_with_two_spaces() {
        let theme = Theme::generate(base(), HarmonyType::Complementary);
        let json = to_json(&theme).unwrap();
        assert!(json.starts_with("{\n  \"name\": \"Custom Theme\",\n  \"baseColor\": \"#3498db\",\n  \"colors\": {\n    \"primary\": \"#3498db\","));
    }

    #[test]
    fn repeated_names_keep_last_value() {
        let mut theme = Theme::empty(base(), HarmonyType::Complementary);
        theme.colors.push(ThemeColor::new(ThemeRole::Primary, Color::new(1, 1, 1)));
        theme.colors.push(ThemeColor::new(ThemeRole::Text, Color::new(2, 2, 2)));
        theme.colors.push(ThemeColor::new(ThemeRole::Primary, Color::new(3, 3, 3)));

        let value: Value = serde_json::from_str(&to_json(&theme).unwrap()).unwrap();
        let colors = value["colors"].as_object().unwrap();
        assert_eq!(colors.len(), 2);
        assert_eq!(colors["primary"], "#030303");
    }

    #[test]
    fn power_bi_complementary_layout() {
        let theme = Theme::generate(base(), HarmonyType::Complementary);
        let value: Value = serde_json::from_str(&to_power_bi(&theme).unwrap()).unwrap();

        let data: Vec<&str> = value["dataColors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(data.len(), 6);
        assert_eq!(data[0], "#3498db");
        assert_eq!(data[1], theme.get(ThemeRole::Secondary).unwrap().hex());
        assert_eq!(data[2], theme.get(ThemeRole::Accent).unwrap().hex());
        assert_eq!(&data[3..], ["#e74c3c", "#f39c12", "#2ecc71"]);

        assert_eq!(value["background"], theme.get(ThemeRole::Background).unwrap().hex());
        assert_eq!(value["tableAccent"], theme.get(ThemeRole::Surface).unwrap().hex());
        assert_eq!(value["foreground"], "#333333");
        assert_eq!(value["secondaryForeground"], "#666666");
    }

    #[test]
    fn power_bi_drops_second_accent() {
        let theme = Theme::generate(base(), HarmonyType::Tetradic);
        let accent2 = theme.get(ThemeRole::Accent2).unwrap().hex();
        let json = to_power_bi(&theme).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dataColors"].as_array().unwrap().len(), 6);
        assert!(!json.contains("accent2"));
        assert!(
            !value["dataColors"]
                .as_array()
                .unwrap()
                .iter()
                .any(|v| v == &Value::from(accent2.as_str()))
        );
    }

    #[test]
    fn power_bi_defaults_fill_missing_fields() {
        let empty = Theme::empty(DEFAULT_BASE_COLOR, HarmonyType::Complementary);
        let pbi = PowerBiTheme::from_theme(&empty);
        assert!(pbi.data_colors.is_empty());
        assert_eq!(pbi.background, POWER_BI_BACKGROUND);
        assert_eq!(pbi.foreground, POWER_BI_FOREGROUND);
        assert_eq!(pbi.table_accent, POWER_BI_TABLE_ACCENT);
        assert_eq!(pbi.secondary_foreground, POWER_BI_SECONDARY_FOREGROUND);

        let json = to_power_bi(&empty).unwrap();
        let keys: Vec<usize> = [
            "\"name\"",
            "\"dataColors\"",
            "\"background\"",
            "\"foreground\"",
            "\"tableAccent\"",
            "\"secondaryForeground\"",
        ]
        .iter()
        .map(|k| json.find(k).unwrap())
        .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn renamed_theme_exports_its_name() {
        let theme = Theme::generate(base(), HarmonyType::Triadic).with_name("Harbor");
        let value: Value = serde_json::from_str(&to_power_bi(&theme).unwrap()).unwrap();
        assert_eq!(value["name"], "Harbor");
    }
}
