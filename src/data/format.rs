//! Display formatting for sizes, percentages and uptime.

/// Format an uptime in seconds, e.g. "3d 4h 12m", "5h 02m", "42s".
pub fn format_uptime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, total % 60)
    } else {
        format!("{}s", total)
    }
}

/// Format a size given in GB/GiB, switching to TB above 1000.
pub fn format_gb(gb: f64) -> String {
    if gb >= 1000.0 {
        format!("{:.1} TB", gb / 1024.0)
    } else if gb >= 100.0 {
        format!("{:.0} GB", gb)
    } else {
        format!("{:.1} GB", gb)
    }
}

/// Format a percentage with no decimals.
pub fn format_percent(percent: f64) -> String {
    format!("{:.0}%", percent)
}

/// Render a 0-7 sparkline as block characters, padded to `width`.
pub fn sparkline(levels: &[u8], width: usize) -> String {
    const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    if levels.is_empty() {
        return " ".repeat(width);
    }

    let skip = levels.len().saturating_sub(width);
    let line: String = levels[skip..]
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect();
    format!("{:>width$}", line, width = width)
}
