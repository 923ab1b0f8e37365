//! Output formatting for route and trip rendering.
//!
//! Plain and rich text come from the library renderers; the enhanced view
//! adds colored tags, per-leg details, and trip fares, and JSON serialises the library's
//! output structs directly.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use placeroute_lib::fare::format_vnd;
use placeroute_lib::{RouteOutput, RouteRenderMode, TripOutput};

use crate::terminal::{format_minutes, supports_color, supports_unicode, ColorPalette};

/// Output styles accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one waypoint per line.
    #[default]
    Text,
    /// Markdown-flavoured text with vehicle icon and coordinates.
    Rich,
    /// Colored tags with per-leg distance and time.
    Enhanced,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Banner and timing footer are suppressed for machine-readable output.
    pub fn is_decorated(self) -> bool {
        !matches!(self, OutputFormat::Json)
    }
}

/// Print the CLI logo banner.
pub fn print_logo() {
    use crate::terminal::colors;

    let (orange, reset) = if supports_color() {
        (colors::ORANGE, colors::RESET)
    } else {
        ("", "")
    };

    if supports_unicode() {
        println!(
            "{orange}╭──────────────────────────────╮
│  PLACEROUTE  ·  A* ROUTES    │
╰──────────────────────────────╯{reset}"
        );
    } else {
        println!(
            "{orange}+------------------------------+
|  PLACEROUTE  >> A* ROUTES    |
+------------------------------+{reset}"
        );
    }
}

/// Print the footer with elapsed time.
pub fn print_footer(elapsed: std::time::Duration) {
    use crate::terminal::colors;

    let (gray, reset) = if supports_color() {
        (colors::GRAY, colors::RESET)
    } else {
        ("", "")
    };

    let elapsed_ms = elapsed.as_millis();
    let time_str = if elapsed_ms < 1000 {
        format!("{}ms", elapsed_ms)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    };

    println!("\n{gray}Completed in {}{reset}", time_str);
}

/// Write any serialisable value as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn render_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Print a route in the requested format.
pub fn render_route(output: &RouteOutput, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", output.render(RouteRenderMode::PlainText)),
        OutputFormat::Rich => print!("{}", output.render(RouteRenderMode::RichText)),
        OutputFormat::Enhanced => {
            print!("{}", EnhancedRenderer::new(ColorPalette::detect()).route(output))
        }
        OutputFormat::Json => render_json(output)?,
    }
    Ok(())
}

/// Print a trip in the requested format.
pub fn render_trip(output: &TripOutput, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", output.render(RouteRenderMode::PlainText)),
        OutputFormat::Rich => print!("{}", output.render(RouteRenderMode::RichText)),
        OutputFormat::Enhanced => {
            print!("{}", EnhancedRenderer::new(ColorPalette::detect()).trip(output))
        }
        OutputFormat::Json => render_json(output)?,
    }
    Ok(())
}

/// Renderer for the enhanced format with colored STRT/VIA/GOAL tags.
pub struct EnhancedRenderer {
    palette: ColorPalette,
}

impl EnhancedRenderer {
    #[must_use]
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    /// Render a single route.
    pub fn route(&self, output: &RouteOutput) -> String {
        let p = &self.palette;
        let mut lines = Vec::new();
        let len = output.waypoints.len();
        for (i, place) in output.waypoints.iter().enumerate() {
            let (color, tag) = self.tag(i, len);
            lines.push(format!(
                "{color}{tag}{} {}{}{}",
                p.reset, p.white_bold, place.name, p.reset
            ));
            if let Some(next) = output.waypoints.get(i + 1) {
                let km = place.distance_to(next);
                let minutes = (km / output.vehicle.speed_kmh * 60.0).round() as u64;
                lines.push(self.detail(km, minutes));
            }
        }
        lines.push(self.footer(
            &output.vehicle.icon,
            &output.vehicle.name,
            output.distance_km,
            output.duration_min,
        ));
        lines.join("\n") + "\n"
    }

    /// Render a trip, one tagged line per stop.
    pub fn trip(&self, output: &TripOutput) -> String {
        let p = &self.palette;
        let mut lines = Vec::new();
        let len = output.segments.len();
        if let Some(first) = output.segments.first() {
            let (color, tag) = self.tag(0, len + 1);
            lines.push(format!(
                "{color}{tag}{} {}{}{}",
                p.reset, p.white_bold, first.from_name, p.reset
            ));
        }
        for (i, segment) in output.segments.iter().enumerate() {
            lines.push(self.detail(segment.distance_km, segment.duration_min));
            let (color, tag) = self.tag(i + 1, len + 1);
            lines.push(format!(
                "{color}{tag}{} {}{}{}",
                p.reset, p.white_bold, segment.to_name, p.reset
            ));
        }
        lines.push(self.footer(
            &output.vehicle.icon,
            &output.vehicle.name,
            output.distance_km,
            output.duration_min,
        ));
        if !output.fare_totals.is_empty() {
            lines.push(format!("  {}Fares:{}", p.orange, p.reset));
            for quote in &output.fare_totals {
                lines.push(format!(
                    "    {}{:<14}{} {}",
                    p.gray,
                    quote.name,
                    p.reset,
                    format_vnd(quote.cost_vnd)
                ));
            }
        }
        lines.join("\n") + "\n"
    }

    fn tag(&self, index: usize, len: usize) -> (&'static str, &'static str) {
        let p = &self.palette;
        if index == 0 {
            (p.tag_start, " STRT ")
        } else if index + 1 == len {
            (p.tag_goal, " GOAL ")
        } else {
            (p.tag_via, " VIA  ")
        }
    }

    fn detail(&self, km: f64, minutes: u64) -> String {
        let p = &self.palette;
        format!(
            "       {}│{} {}{:.2} km{}{}, {}{}{}",
            p.gray,
            p.reset,
            p.cyan,
            km,
            p.reset,
            p.gray,
            p.green,
            format_minutes(minutes),
            p.reset
        )
    }

    fn footer(&self, icon: &str, vehicle: &str, km: f64, minutes: u64) -> String {
        let p = &self.palette;
        format!(
            "\n{}───────────────────────────────{}\n  {}Total Distance:{} {}{:.2} km{}\n  {}Travel Time:{}    {}{}{} {} {}",
            p.gray,
            p.reset,
            p.cyan,
            p.reset,
            p.white_bold,
            km,
            p.reset,
            p.green,
            p.reset,
            p.white_bold,
            format_minutes(minutes),
            p.reset,
            icon,
            vehicle
        )
    }
}
