//! Colorful console output for batch events.
//!
//! Provides a custom `tracing` layer that formats optimizer events with
//! colors. Auto-initialized when the `console` feature is enabled.

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVE: &str = "lineforge_solver=info";

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect. Leaves an
/// already installed global subscriber in place.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(BatchConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let banner = r#"
 _     _            _____
| |   (_)_ __   ___|  ___|__  _ __ __ _  ___
| |   | | '_ \ / _ \ |_ / _ \| '__/ _` |/ _ \
| |___| | | | |  __/  _| (_) | | | (_| |  __/
|_____|_|_| |_|\___|_|  \___/|_|  \__, |\___|
                                  |___/
"#;

    let version_line = format!(
        "                 v{} - DFS Lineup Optimizer\n",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats batch events with colors.
pub struct BatchConsoleLayer;

impl<S: Subscriber> Layer<S> for BatchConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("lineforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_batch_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    format: Option<String>,
    bounder: Option<String>,
    captain: Option<String>,
    reason: Option<String>,
    status: Option<String>,
    requested: Option<u64>,
    eligible: Option<u64>,
    captain_candidates: Option<u64>,
    index: Option<u64>,
    generated: Option<u64>,
    attempts: Option<u64>,
    nodes: Option<u64>,
    elapsed_ms: Option<u64>,
    distinct_captains: Option<u64>,
    score: Option<f64>,
    salary: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "format" => self.format = Some(s),
            "bounder" => self.bounder = Some(s),
            "captain" => self.captain = Some(s),
            "reason" => self.reason = Some(s),
            "status" => self.status = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "captain" => self.captain = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "requested" => self.requested = Some(value),
            "eligible" => self.eligible = Some(value),
            "captain_candidates" => self.captain_candidates = Some(value),
            "index" => self.index = Some(value),
            "generated" => self.generated = Some(value),
            "attempts" => self.attempts = Some(value),
            "nodes" => self.nodes = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            "distinct_captains" => self.distinct_captains = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "score" => self.score = Some(value),
            "salary" => self.salary = Some(value),
            _ => {}
        }
    }
}

fn format_batch_event(v: &EventVisitor) -> String {
    match v.event.as_deref() {
        Some("batch_start") => format_batch_start(v),
        Some("lineup_accepted") => format_lineup_accepted(v),
        Some("attempt_infeasible") => format_attempt_infeasible(v),
        Some("batch_end") => format_batch_end(v),
        _ => String::new(),
    }
}

fn format_batch_start(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {} {} batch: requested ({}), eligible players ({}), bounder ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Batch]".bright_cyan(),
        v.format.as_deref().unwrap_or("Unknown").white().bold(),
        v.requested.unwrap_or(0).to_string().bright_yellow(),
        v.eligible.unwrap_or(0).to_string().bright_yellow(),
        v.bounder.as_deref().unwrap_or("N/A").bright_magenta()
    );
    if let Some(candidates) = v.captain_candidates.filter(|&c| c > 0) {
        output.push_str(&format!(
            ", captain candidates ({})",
            candidates.to_string().bright_yellow()
        ));
    }
    output
}

fn format_lineup_accepted(v: &EventVisitor) -> String {
    let mut output = format!(
        "    {} Lineup {:>3} | score {} | salary {}",
        "->".bright_blue(),
        (v.index.unwrap_or(0) + 1).to_string().white(),
        format!("{:.2}", v.score.unwrap_or(0.0)).bright_green(),
        format_salary(v.salary.unwrap_or(0.0)).yellow()
    );
    if let Some(captain) = &v.captain {
        output.push_str(&format!(" | CPT {}", captain.bright_cyan()));
    }
    if let Some(nodes) = v.nodes {
        output.push_str(&format!(
            " | {} nodes",
            nodes.to_formatted_string(&Locale::en).bright_black()
        ));
    }
    output
}

fn format_attempt_infeasible(v: &EventVisitor) -> String {
    format!(
        "{} {} {} Lineup {} not generated: {}",
        timestamp().bright_black(),
        "WARN".bright_yellow(),
        "[Batch]".bright_cyan(),
        (v.index.unwrap_or(0) + 1).to_string().white(),
        v.reason.as_deref().unwrap_or("unknown").yellow()
    )
}

fn format_batch_end(v: &EventVisitor) -> String {
    let generated = v.generated.unwrap_or(0);
    let requested = v.requested.unwrap_or(0);
    let complete = v.status.as_deref() == Some("Completed");

    let mut output = format!(
        "{} {} {} Batch ended: generated ({}/{}), time spent ({}), nodes ({}), attempts ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Batch]".bright_cyan(),
        generated.to_string().bright_yellow(),
        requested.to_string().bright_yellow(),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow(),
        v.nodes
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        v.attempts.unwrap_or(0).to_string().white()
    );

    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    let status_text = if complete {
        "BATCH COMPLETED"
    } else {
        "PARTIAL BATCH"
    };
    let status_colored = if complete {
        format!("  {}  ", status_text).bright_green().bold().to_string()
    } else {
        format!("  {}  ", status_text).bright_yellow().bold().to_string()
    };
    let status_padding = 56 - status_text.len() - 4;
    let left_pad = status_padding / 2;
    let right_pad = status_padding - left_pad;
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(
        &"╠══════════════════════════════════════════════════════════╣"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');
    output.push_str(&format!(
        "{}  {:<18}{:>36}  {}",
        "║".bright_cyan(),
        "Lineups:",
        format!("{generated} of {requested}"),
        "║".bright_cyan()
    ));
    output.push('\n');
    if let Some(captains) = v.distinct_captains.filter(|&c| c > 0) {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            "Distinct captains:",
            captains,
            "║".bright_cyan()
        ));
        output.push('\n');
    }
    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Dollars with thousands separators; captain halves keep their cents.
fn format_salary(salary: f64) -> String {
    let dollars = salary.trunc() as u64;
    let whole = format!("${}", dollars.to_formatted_string(&Locale::en));
    if salary.fract() == 0.0 {
        whole
    } else {
        format!("{whole}.50")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(49_800.0), "$49,800");
        assert_eq!(format_salary(4_999.5), "$4,999.50");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1_500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("solve_start".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_batch_event(&visitor).is_empty());
    }
}
