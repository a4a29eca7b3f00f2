//! Line-oriented interactive session.

use std::io::{self, BufRead, Write};

use analytics::Telemetry;
use tracing::warn;

use crate::display::{format_chart, format_results, format_state, CHART_WIDTH};
use crate::form::Field;
use crate::tutorial::{CursorMove, TutorialCursor, TutorialFlag};
use crate::view_state::{Action, ViewState};

const HELP: &str = "\
Commands:
  set <field> <value>   fill in a field (no value clears it)
  show                  show every field and the current results
  calculate             compute both Graham fair prices
  analyze               generate the automated analysis
  chart                 draw the price comparison chart
  reset                 clear every field
  tutorial              walk through where each figure comes from
  help                  show this message
  quit                  leave
Fields: eps, bvps, growth, price (required), ev-ebitda, net-debt-ebitda,
        roe, net-margin, dividend-yield, fcf, sector";

enum Flow {
    Continue,
    Quit,
}

pub struct Session<'a, R, W> {
    input: R,
    output: W,
    telemetry: &'a Telemetry,
    flag: &'a TutorialFlag,
    state: ViewState,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(input: R, output: W, telemetry: &'a Telemetry, flag: &'a TutorialFlag) -> Self {
        Self {
            input,
            output,
            telemetry,
            flag,
            state: ViewState::default(),
        }
    }

    /// Run until `quit` or end of input and return the final state.
    pub fn run(mut self) -> io::Result<ViewState> {
        if !self.flag.is_seen() {
            run_tutorial(&mut self.input, &mut self.output, self.flag)?;
        }

        writeln!(
            self.output,
            "Graham fair value calculator. Type `help` for commands."
        )?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if let Flow::Quit = self.handle(line.trim())? {
                break;
            }
        }

        Ok(self.state)
    }

    fn handle(&mut self, line: &str) -> io::Result<Flow> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "" => {}
            "set" => self.set(rest)?,
            "show" => write!(self.output, "{}", format_state(&self.state))?,
            "calculate" | "calc" => {
                if self.dispatch(Action::Calculate)? {
                    if let Some(calculation) = &self.state.calculation {
                        write!(self.output, "{}", format_results(calculation))?;
                        write!(self.output, "{}", format_chart(&calculation.chart, CHART_WIDTH))?;
                    }
                }
            }
            "analyze" | "analysis" => {
                if self.dispatch(Action::GenerateAnalysis)? {
                    if let Some(report) = &self.state.narrative {
                        write!(self.output, "{}", report.to_plain_text())?;
                    }
                }
            }
            "chart" => match &self.state.calculation {
                Some(calculation) => {
                    write!(self.output, "{}", format_chart(&calculation.chart, CHART_WIDTH))?
                }
                None => writeln!(self.output, "Nothing to chart yet; run `calculate` first.")?,
            },
            "reset" => {
                if self.dispatch(Action::Reset)? {
                    writeln!(self.output, "All fields cleared.")?;
                }
            }
            "tutorial" => run_tutorial(&mut self.input, &mut self.output, self.flag)?,
            "help" | "?" => writeln!(self.output, "{HELP}")?,
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => writeln!(self.output, "Unknown command '{other}'. Type `help`.")?,
        }

        Ok(Flow::Continue)
    }

    fn set(&mut self, args: &str) -> io::Result<()> {
        let (name, value) = match args.split_once(char::is_whitespace) {
            Some((name, value)) => (name, value.trim()),
            None => (args, ""),
        };

        match name.parse::<Field>() {
            Ok(field) => {
                self.dispatch(Action::SetField(field, value.to_string()))?;
            }
            Err(e) => writeln!(self.output, "{e}. Type `help` for field names.")?,
        }
        Ok(())
    }

    /// Apply an action, forwarding its event. Returns whether it succeeded.
    fn dispatch(&mut self, action: Action) -> io::Result<bool> {
        match self.state.apply(action) {
            Ok(transition) => {
                if let Some(event) = transition.event {
                    self.telemetry.track(event);
                }
                self.state = transition.state;
                Ok(true)
            }
            Err(e) => {
                writeln!(self.output, "⚠️  {e}")?;
                Ok(false)
            }
        }
    }
}

/// Step through the tutorial, marking it seen when closed or finished.
pub fn run_tutorial<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    flag: &TutorialFlag,
) -> io::Result<()> {
    let mut cursor = TutorialCursor::start();
    let mut line = String::new();

    loop {
        let step = cursor.step();
        writeln!(output, "\n[{}] {}", cursor.progress(), step.title)?;
        writeln!(output, "{}", step.content)?;
        for (name, url) in step.links {
            writeln!(output, "  - {name}: {url}")?;
        }
        if let Some(field) = step.field {
            writeln!(output, "  (field `{}`, e.g. {})", field.key(), field.placeholder())?;
        }
        let next_hint = if cursor.is_last() { "finish" } else { "next" };
        write!(output, "[Enter] {next_hint}  [b] back  [q] close: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match line.trim().to_lowercase().as_str() {
            "q" | "quit" | "close" => break,
            "b" | "back" => cursor = cursor.previous(),
            _ => match cursor.next() {
                CursorMove::Step(next) => cursor = next,
                CursorMove::Finished => break,
            },
        }
    }
    writeln!(output)?;

    if let Err(e) = flag.mark_seen() {
        warn!("Could not save tutorial state to {}: {}", flag.path().display(), e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::STEPS;
    use narrative::SectionKind;
    use std::path::PathBuf;

    fn seen_flag() -> (TutorialFlag, PathBuf) {
        let dir = std::env::temp_dir().join(format!("graham-calc-session-{}", uuid::Uuid::new_v4()));
        let flag = TutorialFlag::new(&dir);
        flag.mark_seen().unwrap();
        (flag, dir)
    }

    fn run_script(script: &str, flag: &TutorialFlag) -> (ViewState, String) {
        let telemetry = Telemetry::disabled();
        let mut output = Vec::new();
        let state = Session::new(script.as_bytes(), &mut output, &telemetry, flag)
            .run()
            .unwrap();
        (state, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_full_session_produces_analysis() {
        let (flag, dir) = seen_flag();
        let script = "set eps 5.5\nset bvps 25\nset growth 10\nset price 30\n\
                      set sector Oil and gas\nset dy 6\ncalculate\nanalyze\nquit\n";
        let (state, output) = run_script(script, &flag);

        assert_eq!(state.form.sector, "Oil and gas");
        assert!(state.calculation.is_some());
        let report = state.narrative.unwrap();
        assert!(report.has_section(SectionKind::Dividends));
        assert!(output.contains("RESULTS"));
        assert!(output.contains("STOCK ANALYSIS REPORT"));
        assert!(!output.contains(STEPS[0].title));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_errors_are_reported_and_session_continues() {
        let (flag, dir) = seen_flag();
        let script = "analyze\ncalculate\nset ticker X\nfrobnicate\nchart\n";
        let (state, output) = run_script(script, &flag);

        assert!(output.contains("Calculate the fair prices before generating an analysis"));
        assert!(output.contains("please fill in at least"));
        assert!(output.contains("unknown field 'ticker'"));
        assert!(output.contains("Unknown command 'frobnicate'"));
        assert!(output.contains("Nothing to chart yet"));
        assert_eq!(state, ViewState::default());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_set_without_value_clears_field() {
        let (flag, dir) = seen_flag();
        let (state, _) = run_script("set roe 18\nset roe\nquit\n", &flag);
        assert_eq!(state.form.return_on_equity, "");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_reset_clears_state() {
        let (flag, dir) = seen_flag();
        let script = "set eps 5.5\nset bvps 25\nset growth 10\nset price 30\ncalculate\nreset\n";
        let (state, output) = run_script(script, &flag);
        assert_eq!(state, ViewState::default());
        assert!(output.contains("All fields cleared."));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_first_run_shows_tutorial_once() {
        let dir = std::env::temp_dir().join(format!("graham-calc-session-{}", uuid::Uuid::new_v4()));
        let flag = TutorialFlag::new(&dir);

        let (_, output) = run_script("q\nquit\n", &flag);
        assert!(output.contains(STEPS[0].title));
        assert!(flag.is_seen());

        let (_, output) = run_script("quit\n", &flag);
        assert!(!output.contains(STEPS[0].title));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_tutorial_navigation_to_finish() {
        let dir = std::env::temp_dir().join(format!("graham-calc-session-{}", uuid::Uuid::new_v4()));
        let flag = TutorialFlag::new(&dir);

        // `b` on the first step stays put; eight Enters then walk to the end
        let script = format!("b\n{}", "\n".repeat(STEPS.len()));
        let mut input = script.as_bytes();
        let mut output = Vec::new();
        run_tutorial(&mut input, &mut output, &flag).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("[Step 1 of 8]").count(), 2);
        assert!(output.contains("[Step 8 of 8]"));
        assert!(output.contains("[Enter] finish"));
        assert!(flag.is_seen());

        let _ = std::fs::remove_dir_all(dir);
    }
}
