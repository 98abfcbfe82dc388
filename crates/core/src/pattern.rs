use once_cell::sync::Lazy;
use regex::Regex;

static BOARD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\bmbed\b|\bSEGGER MSD\b)").expect("board pattern is valid"));

/// True when `text` names an mbed-enabled board or a SEGGER mass-storage
/// interface, as whole words, ignoring case.
pub fn is_board_name(text: &str) -> bool {
    BOARD_PATTERN.is_match(text)
}
