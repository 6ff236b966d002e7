//! Board configuration
//!
//! Boards are described by a small `board.toml` embedded into the firmware.
//! This is a minimal parser for the subset that file uses; it does NOT
//! support the full TOML spec and needs no allocator.
//!
//! Supported:
//! - `[display]`, `[flush]` and `[touch]` section headers
//! - `key = value` pairs (string, integer, boolean)
//! - Comments (`# ...`), also after a value
//!
//! Unknown keys are ignored so a board file can carry notes for other tools.
//!
//! ```toml
//! [display]
//! panel = "ili9488"
//! bus = "pio-dma"
//! bus_width = 8
//! db_base = "gpio0"
//!
//! [touch]
//! controller = "ft6236"
//! direction = "switch_xy|invert_y"
//! ```

use heapless::String as HString;
use strobe_hal::BusWidth;

use crate::flush::PipelineConfig;
use crate::touch::Direction;

/// Maximum length of a panel or controller name
pub const MAX_NAME_LEN: usize = 16;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value could not be parsed for its key
    InvalidValue,
    /// Pin is not `gpioN` / `N` or is out of range
    InvalidPin,
    /// Name longer than [`MAX_NAME_LEN`]
    NameTooLong,
    /// Bus width other than 8 or 16
    UnsupportedBusWidth(u8),
    /// Queue depth of zero
    EmptyQueue,
}

/// How the panel bus is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusDriver {
    /// PIO state machine fed by DMA
    #[default]
    PioDma,
    /// PIO state machine fed word by word through its FIFO
    PioFifo,
    /// Bit-banged GPIO
    Gpio,
}

/// `[display]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub panel: HString<MAX_NAME_LEN>,
    pub bus: BusDriver,
    pub bus_width: BusWidth,
    /// First data line; DB0..DBn occupy consecutive GPIOs from here
    pub db_base: u8,
    pub pin_wr: u8,
    pub pin_rs: u8,
    pub pin_cs: Option<u8>,
    pub pin_rst: u8,
    pub pin_rd: Option<u8>,
    pub pin_bl: Option<u8>,
    pub write_clock_khz: u32,
    pub skip_redundant: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut panel = HString::new();
        let _ = panel.push_str("ili9488");
        Self {
            panel,
            bus: BusDriver::PioDma,
            bus_width: BusWidth::Bits8,
            db_base: 0,
            pin_wr: 19,
            pin_rs: 20,
            pin_cs: Some(18),
            pin_rst: 22,
            pin_rd: Some(21),
            pin_bl: Some(28),
            write_clock_khz: 10_000,
            skip_redundant: true,
        }
    }
}

/// `[touch]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchConfig {
    pub controller: HString<MAX_NAME_LEN>,
    pub pin_sda: u8,
    pub pin_scl: u8,
    pub pin_rst: Option<u8>,
    pub pin_irq: Option<u8>,
    /// Overrides the controller's mounting orientation when set
    pub direction: Option<Direction>,
}

impl Default for TouchConfig {
    fn default() -> Self {
        let mut controller = HString::new();
        let _ = controller.push_str("ft6236");
        Self {
            controller,
            pin_sda: 26,
            pin_scl: 27,
            pin_rst: Some(16),
            pin_irq: Some(17),
            direction: None,
        }
    }
}

/// Complete board description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub display: DisplayConfig,
    pub flush: PipelineConfig,
    /// `None` when the board has no `[touch]` section
    pub touch: Option<TouchConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            flush: PipelineConfig::default(),
            touch: Some(TouchConfig::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Flush,
    Touch,
}

/// Parse a board file
///
/// Sections that are absent keep their defaults, except `[touch]` which is
/// only present if the file names it.
pub fn parse_board_config(input: &str) -> Result<BoardConfig, ConfigError> {
    let mut config = BoardConfig {
        touch: None,
        ..BoardConfig::default()
    };
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = match line[1..line.len() - 1].trim() {
                "display" => Section::Display,
                "flush" => Section::Flush,
                "touch" => {
                    config.touch.get_or_insert_with(TouchConfig::default);
                    Section::Touch
                }
                _ => return Err(ConfigError::InvalidSection),
            };
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(&mut config, section, key, value)?;
        }
    }

    if config.flush.queue_depth == 0 {
        return Err(ConfigError::EmptyQueue);
    }

    Ok(config)
}

fn apply_value(
    config: &mut BoardConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match section {
        Section::Display => {
            let display = &mut config.display;
            match key {
                "panel" => display.panel = parse_name(value)?,
                "bus" => display.bus = parse_bus_driver(value)?,
                "bus_width" => {
                    let bits: u8 = parse_int(value)?;
                    display.bus_width =
                        BusWidth::from_bits(bits).ok_or(ConfigError::UnsupportedBusWidth(bits))?;
                }
                "db_base" => display.db_base = parse_pin(value)?,
                "pin_wr" => display.pin_wr = parse_pin(value)?,
                "pin_rs" => display.pin_rs = parse_pin(value)?,
                "pin_cs" => display.pin_cs = parse_optional_pin(value)?,
                "pin_rst" => display.pin_rst = parse_pin(value)?,
                "pin_rd" => display.pin_rd = parse_optional_pin(value)?,
                "pin_bl" => display.pin_bl = parse_optional_pin(value)?,
                "write_clock_khz" => display.write_clock_khz = parse_int(value)?,
                "skip_redundant" => display.skip_redundant = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Flush => match key {
            "queue_depth" => config.flush.queue_depth = parse_int(value)?,
            "ack_timeout_ms" => config.flush.ack_timeout_ms = parse_int(value)?,
            _ => {}
        },
        Section::Touch => {
            let touch = config.touch.get_or_insert_with(TouchConfig::default);
            match key {
                "controller" => touch.controller = parse_name(value)?,
                "pin_sda" => touch.pin_sda = parse_pin(value)?,
                "pin_scl" => touch.pin_scl = parse_pin(value)?,
                "pin_rst" => touch.pin_rst = parse_optional_pin(value)?,
                "pin_irq" => touch.pin_irq = parse_optional_pin(value)?,
                "direction" => touch.direction = Some(parse_direction(value)?),
                _ => {}
            }
        }
        Section::Root => {}
    }
    Ok(())
}

/// Split "key = value", dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let mut value = value.trim();

    if let Some(hash_pos) = value.find('#') {
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value = value[..hash_pos].trim();
        }
    }

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Strip surrounding quotes; unquoted values pass through
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_name(value: &str) -> Result<HString<MAX_NAME_LEN>, ConfigError> {
    HString::try_from(parse_string(value)).map_err(|_| ConfigError::NameTooLong)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse a pin as `"gpio11"` or a bare number
fn parse_pin(value: &str) -> Result<u8, ConfigError> {
    let value = parse_string(value);
    let digits = value.strip_prefix("gpio").unwrap_or(value);
    let pin: u8 = digits.parse().map_err(|_| ConfigError::InvalidPin)?;
    if pin >= GPIO_COUNT {
        return Err(ConfigError::InvalidPin);
    }
    Ok(pin)
}

/// Like [`parse_pin`], with `"none"` for an unconnected line
fn parse_optional_pin(value: &str) -> Result<Option<u8>, ConfigError> {
    if parse_string(value) == "none" {
        return Ok(None);
    }
    parse_pin(value).map(Some)
}

fn parse_bus_driver(value: &str) -> Result<BusDriver, ConfigError> {
    match parse_string(value) {
        "pio-dma" | "pio" => Ok(BusDriver::PioDma),
        "pio-fifo" => Ok(BusDriver::PioFifo),
        "gpio" => Ok(BusDriver::Gpio),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse `"switch_xy|invert_y"`, `"none"`, or raw bits
fn parse_direction(value: &str) -> Result<Direction, ConfigError> {
    let value = parse_string(value);
    if let Ok(bits) = value.parse::<u8>() {
        return Ok(Direction::from_bits_truncate(bits));
    }

    let mut direction = Direction::NONE;
    for flag in value.split('|').map(str::trim) {
        direction |= match flag {
            "invert_x" => Direction::INVERT_X,
            "invert_y" => Direction::INVERT_Y,
            "switch_xy" => Direction::SWITCH_XY,
            "none" => Direction::NONE,
            _ => return Err(ConfigError::InvalidValue),
        };
    }
    Ok(direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        assert_eq!(parse_pin("gpio11"), Ok(11));
        assert_eq!(parse_pin("\"gpio0\""), Ok(0));
        assert_eq!(parse_pin("29"), Ok(29));
        assert_eq!(parse_pin("gpio30"), Err(ConfigError::InvalidPin));
        assert_eq!(parse_pin("pa3"), Err(ConfigError::InvalidPin));
        assert_eq!(parse_optional_pin("\"none\""), Ok(None));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(
            parse_direction("\"switch_xy|invert_y\""),
            Ok(Direction::SWITCH_XY | Direction::INVERT_Y)
        );
        assert_eq!(parse_direction("5"), Ok(Direction::from_bits_truncate(5)));
        assert_eq!(parse_direction("none"), Ok(Direction::NONE));
        assert_eq!(parse_direction("sideways"), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("a = 1 # note"), Some(("a", "1")));
        assert_eq!(
            parse_key_value("panel = \"a#b\""),
            Some(("panel", "\"a#b\""))
        );
        assert_eq!(parse_key_value("novalue ="), None);
    }

    #[test]
    fn test_empty_file_is_reference_board_without_touch() {
        let config = parse_board_config("").unwrap();
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.flush.ack_timeout_ms, 100);
        assert!(config.touch.is_none());
    }

    #[test]
    fn test_parse_full_board() {
        let input = r#"
# Reference board
[display]
panel = "r61581"
bus = "pio-fifo"
bus_width = 16
db_base = "gpio2"
pin_cs = "none"
write_clock_khz = 20000   # fast panel
skip_redundant = false
vendor_note = "ignored"

[flush]
queue_depth = 2
ack_timeout_ms = 50

[touch]
controller = "gt911"
pin_irq = "gpio15"
direction = "invert_x"
"#;
        let config = parse_board_config(input).unwrap();

        assert_eq!(config.display.panel.as_str(), "r61581");
        assert_eq!(config.display.bus, BusDriver::PioFifo);
        assert_eq!(config.display.bus_width, BusWidth::Bits16);
        assert_eq!(config.display.db_base, 2);
        assert_eq!(config.display.pin_cs, None);
        assert_eq!(config.display.write_clock_khz, 20_000);
        assert!(!config.display.skip_redundant);
        assert_eq!(config.flush.queue_depth, 2);
        assert_eq!(config.flush.ack_timeout_ms, 50);

        let touch = config.touch.unwrap();
        assert_eq!(touch.controller.as_str(), "gt911");
        assert_eq!(touch.pin_irq, Some(15));
        assert_eq!(touch.pin_sda, 26);
        assert_eq!(touch.direction, Some(Direction::INVERT_X));
    }

    #[test]
    fn test_unsupported_bus_width() {
        let result = parse_board_config("[display]\nbus_width = 9\n");
        assert_eq!(result, Err(ConfigError::UnsupportedBusWidth(9)));
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse_board_config("[panel]\n"),
            Err(ConfigError::InvalidSection)
        );
        assert_eq!(
            parse_board_config("[display]\nskip_redundant = yes\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_board_config("[flush]\nqueue_depth = 0\n"),
            Err(ConfigError::EmptyQueue)
        );
        assert_eq!(
            parse_board_config("[display]\npanel = \"a-very-long-panel-name\"\n"),
            Err(ConfigError::NameTooLong)
        );
    }
}
