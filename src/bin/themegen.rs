use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use image_to_theme_wasm::{
    Color, ColorExtractor, HarmonyType, RankedColor, ThemeGenerator, ThemeRole, calculate_diversity,
};
use anyhow::{Context, Result, anyhow, bail};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Powerbi,
    Both,
}

/// Extract dominant colors from an image and derive a UI theme from them.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Maximum number of dominant colors to report
    #[arg(short = 'k', long, default_value_t = 10)]
    colors: usize,

    /// Color harmony (complementary, analogous, triadic, tetradic, monochromatic)
    #[arg(short = 'm', long, default_value = "complementary")]
    harmony: String,

    /// Base color as hex, instead of the most frequent image color
    #[arg(short, long, conflicts_with = "pick")]
    base: Option<String>,

    /// Use the pixel at X,Y (native resolution) as the base color
    #[arg(long, value_name = "X,Y")]
    pick: Option<String>,

    /// Which export files to write
    #[arg(short, long, value_enum, default_value_t = Format::Both)]
    format: Format,

    /// Output directory
    #[arg(short = 'd', long, default_value = ".")]
    out_dir: PathBuf,

    /// Theme name written into the exports
    #[arg(short, long, default_value = "Custom Theme")]
    name: String,

    /// Override a generated color, e.g. `--override accent=#ff8800` (repeatable)
    #[arg(short = 'o', long = "override", value_name = "NAME=HEX")]
    overrides: Vec<String>,

    /// Log analysis details
    #[arg(short, long)]
    verbose: bool,
}

fn parse_point(s: &str) -> Result<(u32, u32)> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y but got '{s}'"))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn print_colors(colors: &[RankedColor]) {
    for (i, c) in colors.iter().enumerate() {
        let Color { r, g, b } = c.color;
        println!(
            "{:>2}. {}  RGB({r}, {g}, {b})  {}% of image",
            i + 1,
            c.hex(),
            c.percentage
        );
    }
    let plain: Vec<_> = colors.iter().map(|c| c.color).collect();
    println!("Diversity: {}/100", calculate_diversity(&plain));
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let bytes = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let mut extractor = ColorExtractor::new();
    extractor
        .load_from_memory(&bytes)
        .context("image decoding failed")?;

    let colors = extractor.analyze(args.colors).context("color analysis failed")?;
    print_colors(&colors);

    let mut generator = ThemeGenerator::new();
    generator.set_harmony_type(HarmonyType::from_name(&args.harmony));

    if let Some(hex) = &args.base {
        generator.set_base_color(hex)?;
    } else if let Some(point) = &args.pick {
        let (x, y) = parse_point(point)?;
        generator.set_base(extractor.pixel_color(x, y)?);
    } else {
        let top = colors
            .first()
            .ok_or_else(|| anyhow!("image has no opaque pixels; pass --base"))?;
        generator.set_base(top.color);
    }

    generator.generate();
    for entry in &args.overrides {
        let (name, hex) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("expected NAME=HEX but got '{entry}'"))?;
        let role = ThemeRole::from_name(name.trim())
            .ok_or_else(|| anyhow!("unknown theme color '{name}'"))?;
        if !generator.customize(role, hex.trim())? {
            bail!("theme has no '{role}' color to override");
        }
    }

    let theme = generator.current().clone().with_name(args.name.as_str());
    println!("\nTheme from {} ({}):", theme.base_color, theme.harmony);
    for c in &theme.colors {
        println!("  {:<14} {}  {}", c.name.name(), c.hex, c.role);
    }

    fs::create_dir_all(&args.out_dir)?;
    let mut outputs = Vec::new();
    if matches!(args.format, Format::Json | Format::Both) {
        outputs.push(("theme.json", theme.to_json()?));
    }
    if matches!(args.format, Format::Powerbi | Format::Both) {
        outputs.push(("theme-powerbi.json", theme.to_power_bi()?));
    }
    for (file, contents) in outputs {
        let out_path = args.out_dir.join(file);
        fs::write(&out_path, contents)
            .with_context(|| format!("writing {}", out_path.display()))?;
        println!("Saved → {}", out_path.display());
    }

    Ok(())
}
