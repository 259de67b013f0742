//! Typewriter playback: either the frame schedule or a live animation.

use std::io::Write;
use std::time::Duration;

use clap::Args;
use folio::{Typewriter, TypewriterConfig};
use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, Result};
use crate::output::Outcome;
use crate::session::{self, GlobalArgs};

const CARET: char = '|';

#[derive(Debug, Clone, Args)]
pub struct TypeArgs {
    /// Text to reveal.
    pub text: String,

    /// Milliseconds per character (default from config).
    #[arg(long, value_name = "MS")]
    pub speed_ms: Option<u64>,

    /// Milliseconds before the first character (default from config).
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Animate in the terminal instead of printing the schedule.
    #[arg(long)]
    pub realtime: bool,
}

/// One state change of the reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    pub elapsed_ms: u64,
    pub display_text: String,
    pub is_complete: bool,
}

/// Every visible change from mount to completion, stepping tick to tick.
pub fn frames(text: &str, config: TypewriterConfig) -> Vec<FrameRecord> {
    let mut typewriter = Typewriter::new(text, config);
    let mut records = vec![record(&typewriter)];
    while let Some(wait) = typewriter.next_tick_in() {
        typewriter.advance(wait);
        let next = record(&typewriter);
        if records.last().is_none_or(|last| {
            last.display_text != next.display_text || last.is_complete != next.is_complete
        }) {
            records.push(next);
        }
    }
    records
}

fn record(typewriter: &Typewriter) -> FrameRecord {
    FrameRecord {
        elapsed_ms: typewriter.elapsed().as_millis() as u64,
        display_text: typewriter.display_text().to_string(),
        is_complete: typewriter.is_complete(),
    }
}

fn resolve_config(global: &GlobalArgs, args: &TypeArgs) -> Result<TypewriterConfig> {
    let configured = session::load_config(global)?.typewriter_config();
    let speed = args
        .speed_ms
        .map(Duration::from_millis)
        .unwrap_or(configured.speed);
    if speed.is_zero() {
        return Err(CliError::invalid("--speed-ms must be greater than 0"));
    }
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(configured.delay);
    Ok(TypewriterConfig { speed, delay })
}

pub fn run_type(global: &GlobalArgs, args: TypeArgs) -> Result<Outcome> {
    let config = resolve_config(global, &args)?;
    debug!(?config, chars = args.text.chars().count(), "typing");

    if args.realtime && !global.json {
        animate(&args.text, config, &mut std::io::stdout().lock())?;
        return Outcome::new("", &serde_json::Value::Null);
    }

    let records = frames(&args.text, config);
    let human = records
        .iter()
        .map(|f| {
            let caret = if f.is_complete { String::new() } else { CARET.to_string() };
            format!("{:>6}ms {}{caret}", f.elapsed_ms, f.display_text)
        })
        .collect::<Vec<_>>()
        .join("\n");
    Outcome::new(human, &records)
}

/// Redraw one line in place until the reveal completes.
fn animate(text: &str, config: TypewriterConfig, out: &mut impl Write) -> Result<()> {
    let mut typewriter = Typewriter::new(text, config);
    draw(&typewriter, out)?;
    while let Some(wait) = typewriter.next_tick_in() {
        std::thread::sleep(wait);
        typewriter.advance(wait);
        draw(&typewriter, out)?;
    }
    writeln!(out)?;
    Ok(())
}

fn draw(typewriter: &Typewriter, out: &mut impl Write) -> Result<()> {
    write!(out, "\r\x1b[2K{}", typewriter.display_text())?;
    if typewriter.caret_visible() {
        write!(out, "{CARET}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_has_one_frame_per_character() {
        let records = frames("abc", TypewriterConfig::from_millis(100, 300));
        let shown: Vec<(u64, &str, bool)> = records
            .iter()
            .map(|f| (f.elapsed_ms, f.display_text.as_str(), f.is_complete))
            .collect();
        assert_eq!(
            shown,
            vec![
                (0, "", false),
                (400, "a", false),
                (500, "ab", false),
                (600, "abc", true),
            ]
        );
    }

    #[test]
    fn empty_text_completes_when_delay_fires() {
        let records = frames("", TypewriterConfig::from_millis(50, 200));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].elapsed_ms, 200);
        assert!(records[1].is_complete);
    }

    #[test]
    fn animation_ends_with_full_text_and_no_caret() {
        let mut out = Vec::new();
        animate("hi", TypewriterConfig::from_millis(1, 0), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("\r\x1b[2Khi\n"));
        assert!(text.contains("h|"));
    }

    #[test]
    fn schedule_marks_pending_frames_with_caret() {
        let args = TypeArgs {
            text: "ab".into(),
            speed_ms: Some(10),
            delay_ms: Some(0),
            realtime: false,
        };
        let outcome = run_type(&GlobalArgs::default(), args).unwrap();
        let lines: Vec<&str> = outcome.human.lines().collect();
        assert_eq!(lines, vec!["     0ms |", "    10ms a|", "    20ms ab"]);
    }

    #[test]
    fn zero_speed_is_rejected() {
        let args = TypeArgs {
            text: "x".into(),
            speed_ms: Some(0),
            delay_ms: None,
            realtime: false,
        };
        let err = resolve_config(&GlobalArgs::default(), &args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
