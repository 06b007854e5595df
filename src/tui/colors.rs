//! Color constants for the terminal user interface.

use ratatui::style::Color;

// These support priority accents on cards and bars

// Native Color::Blue is used for Medium priority

/// Used for Urgent priority
pub const URGENT_RED: Color = Color::Rgb(178, 34, 34);
/// Used for High priority
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for Low priority
pub const SLATE: Color = Color::Rgb(110, 110, 110);
/// Used for completed work
pub const DARK_GREEN: Color = Color::Rgb(0, 100, 0);
/// Used for the carried card and multi-select marks
pub const CARRY_CYAN: Color = Color::Rgb(0, 170, 170);
/// Used for the today column on the timeline
pub const TODAY_BLUE: Color = Color::Rgb(30, 60, 120);
