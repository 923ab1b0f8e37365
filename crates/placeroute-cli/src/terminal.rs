//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions and capability detection used by the
//! enhanced route renderer and the logo banner.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green for STRT tags.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse cyan for VIA tags.
    pub const TAG_VIA: &str = "\x1b[1;7;36m";
    /// Bold reverse magenta for GOAL tags.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";

    /// Bright bold white for place names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for tree lines and decorations.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for distances.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for durations.
    pub const GREEN: &str = "\x1b[32m";
    /// Orange (256-color) for the banner.
    pub const ORANGE: &str = "\x1b[38;5;208m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_via: &'static str,
    pub tag_goal: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_via: colors::TAG_VIA,
            tag_goal: colors::TAG_GOAL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            orange: colors::ORANGE,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_via: "",
            tag_goal: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            orange: "",
        }
    }

    /// `colored()` if the terminal supports ANSI colors, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    color_allowed(
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn color_allowed(no_color: bool, term: Option<&str>) -> bool {
    !no_color && !term.is_some_and(|term| term.eq_ignore_ascii_case("dumb"))
}

/// Check `LC_ALL` / `LANG` for a UTF-8 locale.
#[must_use]
pub fn supports_unicode() -> bool {
    locale_is_utf8(["LC_ALL", "LANG"].iter().filter_map(|key| std::env::var(key).ok()))
}

fn locale_is_utf8<I: IntoIterator<Item = String>>(values: I) -> bool {
    values
        .into_iter()
        .any(|value| value.to_uppercase().contains("UTF"))
}

/// Format whole minutes as `1 h 05 min` once they pass an hour.
///
/// # Examples
///
/// ```
/// # use placeroute_cli::terminal::format_minutes;
/// assert_eq!(format_minutes(2), "2 min");
/// assert_eq!(format_minutes(65), "1 h 05 min");
/// ```
#[must_use]
pub fn format_minutes(minutes: u64) -> String {
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {:02} min", minutes / 60, minutes % 60)
    }
}
