use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const MAC_ADDR: Color = Color::BrightYellow;
pub const SSID: Color = Color::BrightWhite;
pub const VENDOR: Color = Color::Magenta;

pub const SIGNAL_STRONG: Color = Color::Green;
pub const SIGNAL_FAIR: Color = Color::Yellow;
pub const SIGNAL_WEAK: Color = Color::Red;
