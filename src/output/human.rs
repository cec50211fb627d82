#![forbid(unsafe_code)]

//! Human-readable output formatter
//!
//! Rendering goes through `termcolor::WriteColor` so the same code drives
//! colored terminal output and plain in-memory buffers.

use crate::context::Context;
use crate::rules::{EvaluationResult, RollOutcome, RuleSummary};
use std::io::{self, Write};
use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Human-readable formatter for rule listings and evaluation results
pub struct HumanFormatter;

impl HumanFormatter {
    /// Creates a new HumanFormatter
    pub fn new() -> Self {
        HumanFormatter
    }

    /// Renders a rule listing
    pub fn render_rules<W: WriteColor>(&self, w: &mut W, rules: &[RuleSummary]) -> io::Result<()> {
        if rules.is_empty() {
            writeln!(w, "No rules registered.")?;
            return Ok(());
        }

        writeln!(w, "Rules ({}):", rules.len())?;
        writeln!(w)?;
        for rule in rules {
            heading(w, &rule.name, Color::Cyan)?;
            writeln!(w, "  Description: {}", rule.description)?;
            writeln!(w)?;
        }
        Ok(())
    }

    /// Renders the outcome of an evaluation pass and the resulting context
    pub fn render_evaluation<W: WriteColor>(
        &self,
        w: &mut W,
        result: &EvaluationResult,
        ctx: &Context,
    ) -> io::Result<()> {
        let fired = if result.fired.is_empty() {
            "none".to_string()
        } else {
            result.fired.join(", ")
        };
        writeln!(
            w,
            "Checked {} rule(s), {} fired: {}",
            result.rules_checked,
            result.fired.len(),
            fired
        )?;
        writeln!(w)?;

        heading(w, "Context:", Color::Cyan)?;
        for (key, value) in ctx.iter() {
            writeln!(w, "  {} = {}", key, value)?;
        }
        Ok(())
    }

    /// Renders a dice-pool outcome
    pub fn render_roll<W: WriteColor>(
        &self,
        w: &mut W,
        outcome: &RollOutcome,
        difficulty: i64,
    ) -> io::Result<()> {
        let rolls: Vec<String> = outcome.rolls.iter().map(|r| r.to_string()).collect();
        writeln!(w, "Rolls: [{}]", rolls.join(", "))?;

        let color = if outcome.successes > 0 {
            Color::Green
        } else {
            Color::Red
        };
        write!(w, "Successes (>={}): ", difficulty)?;
        w.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(w, "{}", outcome.successes)?;
        w.reset()?;
        writeln!(w)
    }

    /// Formats a rule listing without color
    pub fn format_rules(&self, rules: &[RuleSummary]) -> String {
        render_plain(|w| self.render_rules(w, rules))
    }

    /// Formats an evaluation result without color
    pub fn format_evaluation(&self, result: &EvaluationResult, ctx: &Context) -> String {
        render_plain(|w| self.render_evaluation(w, result, ctx))
    }

    /// Formats a dice-pool outcome without color
    pub fn format_roll(&self, outcome: &RollOutcome, difficulty: i64) -> String {
        render_plain(|w| self.render_roll(w, outcome, difficulty))
    }

    /// Runs a render function against stdout with the given color choice
    pub fn write_to_stdout<F>(&self, color: ColorChoice, render: F) -> io::Result<()>
    where
        F: FnOnce(&Self, &mut StandardStream) -> io::Result<()>,
    {
        let mut stdout = StandardStream::stdout(color);
        render(self, &mut stdout)?;
        stdout.flush()
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn heading<W: WriteColor>(w: &mut W, text: &str, color: Color) -> io::Result<()> {
    w.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(w, "{}", text)?;
    w.reset()?;
    writeln!(w)
}

fn render_plain<F>(render: F) -> String
where
    F: FnOnce(&mut Buffer) -> io::Result<()>,
{
    let mut buffer = Buffer::no_color();
    // Writes into an in-memory buffer only fail on allocation
    if render(&mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}
