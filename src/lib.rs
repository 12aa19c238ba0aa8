use wasm_bindgen::prelude::*;
use js_sys::{Array, Object, Reflect};

pub mod color;
pub mod error;
pub mod export;
pub mod extractor;
pub mod harmony;
pub mod theme;

pub use color::{Color, Hsv};
pub use error::{Result, ThemeError};
pub use export::PowerBiTheme;
pub use extractor::{ColorExtractor, ExtractorConfig, RankedColor, calculate_diversity};
pub use harmony::HarmonyType;
pub use theme::{Theme, ThemeColor, ThemeGenerator, ThemeRole};

// ------------------------------------------------------------
// Native entry points
// ------------------------------------------------------------

/// Decode an encoded image and return its dominant colors.
pub fn analyze_bytes(input: &[u8], max_colors: usize) -> Result<Vec<RankedColor>> {
    let mut extractor = ColorExtractor::new();
    extractor.load_from_memory(input)?;
    extractor.analyze(max_colors)
}

/// Analyze an encoded image, take its most frequent color as the base and
/// generate a theme from it.
///
/// Returns the ranked colors alongside the theme. Fails with
/// [`ThemeError::EmptyImage`] when no pixel is opaque enough to count.
pub fn theme_from_bytes(
    input: &[u8],
    max_colors: usize,
    harmony: HarmonyType,
) -> Result<(Vec<RankedColor>, Theme)> {
    let mut colors = analyze_bytes(input, max_colors.max(1))?;
    let base = colors.first().ok_or(ThemeError::EmptyImage)?.color;
    colors.truncate(max_colors);

    let mut generator = ThemeGenerator::new();
    generator.set_base(base);
    generator.set_harmony_type(harmony);
    Ok((colors, generator.generate()))
}

/// [`calculate_diversity`] over hex strings. Fails on the first string that is
/// not a valid color.
pub fn diversity_of_hexes<S: AsRef<str>>(hexes: &[S]) -> Result<u32> {
    let colors = hexes
        .iter()
        .map(|hex| Color::from_hex(hex.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(calculate_diversity(&colors))
}

// ------------------------------------------------------------
// WebAssembly surface
// ------------------------------------------------------------

fn js_err(e: ThemeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn js_object(fields: &[(&str, JsValue)]) -> Result<Object, JsValue> {
    let obj = Object::new();
    for (key, value) in fields {
        Reflect::set(&obj, &JsValue::from_str(key), value)?;
    }
    Ok(obj)
}

fn ranked_to_js(colors: &[RankedColor]) -> Result<Array, JsValue> {
    let out = Array::new();
    for c in colors {
        let obj = js_object(&[
            ("hex", JsValue::from_str(&c.hex())),
            ("count", JsValue::from(c.count)),
            ("percentage", JsValue::from_str(&c.percentage)),
        ])?;
        out.push(&obj.into());
    }
    Ok(out)
}

fn theme_to_js(theme: &Theme) -> Result<Array, JsValue> {
    let out = Array::new();
    for c in &theme.colors {
        let obj = js_object(&[
            ("name", JsValue::from_str(c.name.name())),
            ("hex", JsValue::from_str(&c.hex.hex())),
            ("role", JsValue::from_str(&c.role)),
        ])?;
        out.push(&obj.into());
    }
    Ok(out)
}

/// Holds one decoded image so it can be analyzed and picked from repeatedly.
#[wasm_bindgen]
#[derive(Default)]
pub struct ImageAnalyzer {
    inner: ColorExtractor,
}

#[wasm_bindgen]
impl ImageAnalyzer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and keep an encoded image. The previous image stays loaded if
    /// decoding fails.
    pub fn load(&mut self, input: &[u8]) -> Result<(), JsValue> {
        self.inner.load_from_memory(input).map_err(js_err)
    }

    #[wasm_bindgen(getter, js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.dimensions().map_or(0, |(w, _)| w)
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.dimensions().map_or(0, |(_, h)| h)
    }

    /// Dominant colors as `[{ hex, count, percentage }]`.
    pub fn analyze(&self, max_colors: usize) -> Result<Array, JsValue> {
        let colors = self.inner.analyze(max_colors).map_err(js_err)?;
        ranked_to_js(&colors)
    }

    /// Hex of the pixel at `(x, y)`, at native resolution.
    #[wasm_bindgen(js_name = pixelColor)]
    pub fn pixel_color(&self, x: u32, y: u32) -> Result<String, JsValue> {
        Ok(self.inner.pixel_color(x, y).map_err(js_err)?.hex())
    }
}

/// Browser handle on a [`ThemeGenerator`]. Customizations made after
/// `generate` are what the exports serialize.
#[wasm_bindgen(js_name = ThemeGenerator)]
#[derive(Default)]
pub struct WasmThemeGenerator {
    inner: ThemeGenerator,
}

#[wasm_bindgen(js_class = ThemeGenerator)]
impl WasmThemeGenerator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(getter, js_name = baseColor)]
    pub fn base_color(&self) -> String {
        self.inner.base_color().hex()
    }

    #[wasm_bindgen(getter, js_name = harmonyType)]
    pub fn harmony_type(&self) -> String {
        self.inner.harmony_type().as_str().to_string()
    }

    #[wasm_bindgen(js_name = setBaseColor)]
    pub fn set_base_color(&mut self, hex: &str) -> Result<(), JsValue> {
        self.inner.set_base_color(hex).map_err(js_err)
    }

    /// Unknown names fall back to complementary.
    #[wasm_bindgen(js_name = setHarmonyType)]
    pub fn set_harmony_type(&mut self, harmony: &str) {
        self.inner.set_harmony_type(harmony);
    }

    /// Theme colors as `[{ name, hex, role }]`.
    pub fn generate(&mut self) -> Result<Array, JsValue> {
        theme_to_js(&self.inner.generate())
    }

    /// Replace the hex of a generated color. `false` when the current theme
    /// has no color by that name.
    pub fn customize(&mut self, name: &str, hex: &str) -> Result<bool, JsValue> {
        match ThemeRole::from_name(name) {
            Some(role) => self.inner.customize(role, hex).map_err(js_err),
            None => Ok(false),
        }
    }

    #[wasm_bindgen(js_name = exportToJson)]
    pub fn export_to_json(&self) -> Result<String, JsValue> {
        self.inner.export_to_json().map_err(js_err)
    }

    #[wasm_bindgen(js_name = exportToPowerBI)]
    pub fn export_to_power_bi(&self) -> Result<String, JsValue> {
        self.inner.export_to_power_bi().map_err(js_err)
    }
}

/// Dominant colors of an encoded image as `[{ hex, count, percentage }]`.
#[wasm_bindgen(js_name = analyzeImage)]
pub fn analyze_image(input: Vec<u8>, max_colors: usize) -> Result<Array, JsValue> {
    let colors = analyze_bytes(&input, max_colors).map_err(js_err)?;
    ranked_to_js(&colors)
}

/// Theme colors as `[{ name, hex, role }]` for a base color and harmony name.
/// Unknown harmony names fall back to complementary.
#[wasm_bindgen(js_name = generateTheme)]
pub fn generate_theme(base_hex: &str, harmony: &str) -> Result<Array, JsValue> {
    let mut generator = WasmThemeGenerator::new();
    generator.set_base_color(base_hex)?;
    generator.set_harmony_type(harmony);
    generator.generate()
}

/// 0-100 spread of a list of hex colors.
#[wasm_bindgen(js_name = colorDiversity)]
pub fn color_diversity(hexes: Array) -> Result<u32, JsValue> {
    let hexes = hexes
        .iter()
        .map(|val| {
            val.as_string()
                .ok_or_else(|| JsValue::from_str("Color values must be strings"))
        })
        .collect::<Result<Vec<_>, JsValue>>()?;
    diversity_of_hexes(&hexes).map_err(js_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    // Only success paths here: building a JsValue needs a wasm host.

    #[test]
    fn analyzer_picks_repeatedly_from_one_load() {
        let mut img = RgbaImage::from_pixel(6, 4, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 1, Rgba([0x12, 0x34, 0x56, 255]));
        img.put_pixel(5, 3, Rgba([0xfe, 0xdc, 0xba, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let mut analyzer = ImageAnalyzer::new();
        assert!(!analyzer.is_loaded());
        analyzer.load(&bytes).unwrap();
        assert!(analyzer.is_loaded());
        assert_eq!((analyzer.width(), analyzer.height()), (6, 4));
        assert_eq!(analyzer.pixel_color(1, 1).unwrap(), "#123456");
        assert_eq!(analyzer.pixel_color(5, 3).unwrap(), "#fedcba");
        assert_eq!(analyzer.pixel_color(0, 0).unwrap(), "#000000");
    }

    #[test]
    fn customized_colors_reach_both_exports() {
        let mut generator = WasmThemeGenerator::new();
        generator.set_base_color("#8E44AD").unwrap();
        generator.set_harmony_type("tetradic");
        assert_eq!(generator.base_color(), "#8e44ad");
        assert_eq!(generator.harmony_type(), "tetradic");
        generator.inner.generate();

        assert!(generator.customize("surface", "#abcdef").unwrap());
        assert!(generator.customize("accent2", "#000001").unwrap());
        assert!(!generator.customize("highlight", "#abcdef").unwrap());

        let json: serde_json::Value =
            serde_json::from_str(&generator.export_to_json().unwrap()).unwrap();
        assert_eq!(json["baseColor"], "#8e44ad");
        assert_eq!(json["colors"]["surface"], "#abcdef");
        assert_eq!(json["colors"]["accent2"], "#000001");

        let pbi: serde_json::Value =
            serde_json::from_str(&generator.export_to_power_bi().unwrap()).unwrap();
        assert_eq!(pbi["tableAccent"], "#abcdef");
    }

    #[test]
    fn diversity_of_hex_strings() {
        assert_eq!(diversity_of_hexes(&["#000000", "FFFFFF"]).unwrap(), 100);
        assert_eq!(diversity_of_hexes::<&str>(&[]).unwrap(), 0);
        assert_eq!(
            diversity_of_hexes(&["#ff0000".to_string(), "#000000".into(), "#00ff00".into()])
                .unwrap(),
            66
        );
        assert!(matches!(
            diversity_of_hexes(&["#000000", "#12345", "#ffffff"]),
            Err(ThemeError::InvalidColor(s)) if s == "#12345"
        ));
        assert!(matches!(
            diversity_of_hexes(&["#gg0000"]),
            Err(ThemeError::InvalidColor(_))
        ));
    }
}
