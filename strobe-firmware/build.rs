//! Build script for strobe-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const PANELS: &[&str] = &["ili9488", "st7789", "ili9806", "r61581", "st6201", "1p5623"];
const BUSES: &[&str] = &["pio", "pio-dma", "pio-fifo", "gpio"];
const CONTROLLERS: &[&str] = &["ft6236", "gt911", "ns2009", "tsc2007"];
const DIRECTION_FLAGS: &[&str] = &["none", "invert_x", "invert_y", "switch_xy"];
const GPIO_COUNT: i64 = 30;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x in OUT_DIR");
    f.write_all(memory_x).expect("write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a board.toml describing the panel, bus     ║\n\
            ║  and touch wiring. Create one in the strobe-firmware directory. ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\
                \n{}\n",
                e
            );
        }
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_flush(&config, &mut errors);
    validate_touch(&config, &mut errors);
    report(&errors);
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display").and_then(|d| d.as_table()) else {
        return;
    };

    check_name(display, "display", "panel", PANELS, errors);
    check_name(display, "display", "bus", BUSES, errors);

    let width = match display.get("bus_width") {
        Some(toml::Value::Integer(w @ (8 | 16))) => *w,
        Some(_) => {
            errors.push("[display] bus_width must be 8 or 16".to_string());
            8
        }
        None => 8,
    };

    if let Some(base) = check_pin(display, "display", "db_base", errors) {
        if base + width > GPIO_COUNT {
            errors.push(format!(
                "[display] data bus gpio{}..gpio{} runs past gpio{}",
                base,
                base + width - 1,
                GPIO_COUNT - 1
            ));
        }
    }

    for key in ["pin_wr", "pin_rs", "pin_cs", "pin_rst", "pin_rd", "pin_bl"] {
        check_pin(display, "display", key, errors);
    }

    match display.get("write_clock_khz") {
        Some(toml::Value::Integer(khz)) if *khz <= 0 => {
            errors.push("[display] write_clock_khz must be positive".to_string());
        }
        Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push("[display] write_clock_khz must be an integer".to_string()),
    }
}

fn validate_flush(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(flush) = config.get("flush").and_then(|f| f.as_table()) else {
        return;
    };

    for key in ["queue_depth", "ack_timeout_ms"] {
        match flush.get(key) {
            Some(toml::Value::Integer(v)) if *v <= 0 => {
                errors.push(format!("[flush] {} must be positive", key));
            }
            Some(toml::Value::Integer(_)) | None => {}
            Some(_) => errors.push(format!("[flush] {} must be an integer", key)),
        }
    }
}

fn validate_touch(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(touch) = config.get("touch").and_then(|t| t.as_table()) else {
        return;
    };

    check_name(touch, "touch", "controller", CONTROLLERS, errors);
    for key in ["pin_sda", "pin_scl", "pin_rst", "pin_irq"] {
        check_pin(touch, "touch", key, errors);
    }

    if let Some(value) = touch.get("direction") {
        match value {
            toml::Value::Integer(bits) if (0..=7).contains(bits) => {}
            toml::Value::String(direction) if direction.parse::<u8>().is_ok() => {}
            toml::Value::String(direction) => {
                for flag in direction.split('|').map(str::trim) {
                    if !DIRECTION_FLAGS.contains(&flag) {
                        errors.push(format!("[touch] unknown direction flag '{}'", flag));
                    }
                }
            }
            _ => errors.push("[touch] direction must be flags or bits 0-7".to_string()),
        }
    }
}

fn check_name(
    table: &toml::Table,
    section: &str,
    key: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        Some(toml::Value::String(name)) if !allowed.contains(&name.as_str()) => {
            errors.push(format!("[{}] unknown {} '{}'", section, key, name));
        }
        Some(toml::Value::String(_)) | None => {}
        Some(_) => errors.push(format!("[{}] {} must be a string", section, key)),
    }
}

/// Check a `gpioN` / `N` / `"none"` pin value, returning the number if set
fn check_pin(table: &toml::Table, section: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    let pin = match table.get(key)? {
        toml::Value::Integer(n) => Some(*n),
        toml::Value::String(s) if s == "none" => return None,
        toml::Value::String(s) => s.strip_prefix("gpio").unwrap_or(s).parse().ok(),
        _ => None,
    };

    match pin {
        Some(n) if (0..GPIO_COUNT).contains(&n) => Some(n),
        _ => {
            errors.push(format!("[{}] {} is not a GPIO 0-{}", section, key, GPIO_COUNT - 1));
            None
        }
    }
}

fn report(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid board configuration                              ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
