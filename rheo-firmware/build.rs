//! Build script for rheo-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates marquee.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate marquee.toml at compile time
///
/// The runtime parser falls back to defaults on error; catching a typo
/// here means the panel never silently boots with the wrong settings.
fn validate_config() {
    println!("cargo:rerun-if-changed=marquee.toml");

    let config_path = Path::new("marquee.toml");
    if !config_path.exists() {
        panic!("marquee.toml not found - the firmware requires it in the rheo-firmware directory");
    }

    let content = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("failed to read marquee.toml: {}", e));

    let config: toml::Value = toml::from_str(&content)
        .unwrap_or_else(|e| panic!("invalid TOML syntax in marquee.toml: {}", e));

    let mut errors = Vec::new();

    for section in ["panel", "text", "color", "scroll"] {
        if config.get(section).is_none() {
            errors.push(format!("missing [{}] section", section));
        }
    }

    if let Some(panel) = config.get("panel") {
        // The frame buffers are statically sized for 64x64
        check_int(panel, "panel", "width", 64, 64, &mut errors);
        check_int(panel, "panel", "height", 64, 64, &mut errors);
        check_int(panel, "panel", "bottom_shift", -4, 4, &mut errors);
        check_int(panel, "panel", "brightness", 0, 255, &mut errors);
    }

    if let Some(text) = config.get("text") {
        check_int(text, "text", "font_size", 1, 64, &mut errors);
        if !matches!(text.get("content"), Some(toml::Value::String(_))) {
            errors.push("[text] content must be a string".into());
        }
    }

    if let Some(color) = config.get("color") {
        for key in ["r", "g", "b"] {
            check_int(color, "color", key, 0, 255, &mut errors);
        }
        if let Some(scale) = color.get("rainbow_scale") {
            match scale.as_float() {
                Some(s) if s > 0.0 => {}
                _ => errors.push("[color] rainbow_scale must be a float > 0".into()),
            }
        }
    }

    if let Some(scroll) = config.get("scroll") {
        check_int(scroll, "scroll", "step", 1, 64, &mut errors);
        check_int(scroll, "scroll", "frame_ms", 1, 10_000, &mut errors);
    }

    if !errors.is_empty() {
        panic!("invalid marquee.toml:\n  {}", errors.join("\n  "));
    }

    println!("cargo:warning=marquee.toml validated successfully");
}

fn check_int(
    section: &toml::Value,
    section_name: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match section.get(key).and_then(|v| v.as_integer()) {
        Some(v) if (min..=max).contains(&v) => {}
        Some(v) => errors.push(format!(
            "[{}] {} = {} outside {}..={}",
            section_name, key, v, min, max
        )),
        None => errors.push(format!("[{}] missing integer '{}'", section_name, key)),
    }
}
