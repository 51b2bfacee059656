use std::io::{BufRead, Write};

use anyhow::Context as _;

use crate::{
    foundation::error::{ClockError, ClockResult},
    pipeline::RenderReport,
    sequence::Mode,
};

#[derive(Debug)]
pub enum SessionState {
    AwaitChoice,
    RunTimer,
    RunStopwatch,
    Error(ClockError),
}

/// Menu-driven loop: pick a mode, enter its numbers, render, repeat.
///
/// Bad menu choices, malformed numbers and non-fatal render errors are reported and the loop
/// goes back to the menu. Fatal errors end the session. End of input ends it cleanly.
pub struct Session<R, W> {
    input: R,
    output: W,
    state: SessionState,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            state: SessionState::AwaitChoice,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run<F>(&mut self, mut render: F) -> ClockResult<()>
    where
        F: FnMut(Mode) -> ClockResult<RenderReport>,
    {
        loop {
            let state = std::mem::replace(&mut self.state, SessionState::AwaitChoice);
            self.state = match state {
                SessionState::AwaitChoice => {
                    self.say("Choose an option:")?;
                    self.say("1. Timer")?;
                    self.say("2. Stopwatch")?;
                    let Some(choice) = self.prompt("Enter the number of your choice: ")? else {
                        return Ok(());
                    };
                    match choice.as_str() {
                        "1" => SessionState::RunTimer,
                        "2" => SessionState::RunStopwatch,
                        _ => {
                            self.say("Invalid choice. Please try again.")?;
                            SessionState::AwaitChoice
                        }
                    }
                }
                SessionState::RunTimer => {
                    let mode = self.read_timer()?;
                    match mode {
                        None => return Ok(()),
                        Some(Err(e)) => SessionState::Error(e),
                        Some(Ok(mode)) => self.render(mode, &mut render)?,
                    }
                }
                SessionState::RunStopwatch => {
                    let Some(input) = self.prompt("Duration in hours: ")? else {
                        return Ok(());
                    };
                    match parse_count("duration_hours", &input) {
                        Err(e) => SessionState::Error(e),
                        Ok(duration_hours) => {
                            self.render(Mode::Stopwatch { duration_hours }, &mut render)?
                        }
                    }
                }
                SessionState::Error(e) => {
                    tracing::warn!(error = %e, "request failed");
                    self.say(&format!("Error: {e}"))?;
                    SessionState::AwaitChoice
                }
            };
        }
    }

    /// `None` on end of input.
    fn read_timer(&mut self) -> ClockResult<Option<ClockResult<Mode>>> {
        let mut values = [0u64; 3];
        for (slot, (field, label)) in values.iter_mut().zip([
            ("hours", "Hours: "),
            ("minutes", "Minutes: "),
            ("seconds", "Seconds: "),
        ]) {
            let Some(input) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse_count(field, &input) {
                Ok(v) => *slot = v,
                Err(e) => return Ok(Some(Err(e))),
            }
        }
        let [hours, minutes, seconds] = values;
        Ok(Some(Ok(Mode::Timer {
            hours,
            minutes,
            seconds,
        })))
    }

    fn render<F>(&mut self, mode: Mode, render: &mut F) -> ClockResult<SessionState>
    where
        F: FnMut(Mode) -> ClockResult<RenderReport>,
    {
        match render(mode) {
            Ok(report) => {
                let label = match mode {
                    Mode::Timer { .. } => "Timer",
                    Mode::Stopwatch { .. } => "Stopwatch",
                };
                self.say(&format!(
                    "{label} video saved as '{}'",
                    report.out_path.display()
                ))?;
                Ok(SessionState::AwaitChoice)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => Ok(SessionState::Error(e)),
        }
    }

    fn say(&mut self, line: &str) -> ClockResult<()> {
        writeln!(self.output, "{line}").context("write to session output")?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> ClockResult<Option<String>> {
        write!(self.output, "{label}").context("write to session output")?;
        self.output.flush().context("flush session output")?;

        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("read session input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Parse a non-negative integer typed at a prompt.
pub fn parse_count(field: &str, input: &str) -> ClockResult<u64> {
    input
        .trim()
        .parse::<u64>()
        .map_err(|_| ClockError::invalid_input(field, input.trim()))
}
