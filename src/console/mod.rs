//! Line-based terminal collaborators.
//!
//! [`ConsoleDecisions`] asks every question on a writer and reads answers a
//! line at a time, re-asking until the answer is in the domain. End of input
//! is [`GameError::InputExhausted`]. [`ConsoleObserver`] prints the table
//! after each round.

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::ops::RangeInclusive;

use tracing::trace;

use crate::board::SquareId;
use crate::core::{Money, PlayerId};
use crate::error::{GameError, Result};
use crate::input::{Candidate, DecisionProvider, Prompt};
use crate::session::{PlayerSnapshot, SessionObserver, Snapshot};

/// Decision provider reading from `R` and prompting on `W`.
pub struct ConsoleDecisions<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleDecisions<StdinLock<'static>, Stdout> {
    /// Read stdin, prompt on stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleDecisions<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the provider, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Print `prompt` and read one trimmed line.
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{prompt} ")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(GameError::InputExhausted);
        }
        let line = line.trim().to_string();
        trace!(%prompt, answer = %line, "console answer");
        Ok(line)
    }

    /// Ask until `parse` accepts the answer.
    fn ask_until<T>(&mut self, prompt: &str, mut parse: impl FnMut(&str) -> Option<T>) -> Result<T> {
        loop {
            let line = self.read_line(prompt)?;
            if let Some(value) = parse(&line) {
                return Ok(value);
            }
            writeln!(self.writer, "Invalid answer: {line:?}")?;
        }
    }

    /// Print numbered options and read a 1-based number or a label.
    fn pick(&mut self, prompt: &Prompt, labels: &[&str]) -> Result<usize> {
        if labels.is_empty() {
            return Err(GameError::inconsistent(format!("no options for \"{prompt}\"")));
        }
        writeln!(self.writer, "{prompt}")?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.writer, "  {}. {label}", i + 1)?;
        }

        self.ask_until(">", |answer| match answer.parse::<usize>() {
            Ok(n) if (1..=labels.len()).contains(&n) => Some(n - 1),
            Ok(_) => None,
            Err(_) => labels.iter().position(|l| l.eq_ignore_ascii_case(answer)),
        })
    }

    fn pick_candidate<T: Copy>(&mut self, prompt: &Prompt, candidates: &[Candidate<T>]) -> Result<T> {
        let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
        let index = self.pick(prompt, &labels)?;
        candidates
            .get(index)
            .map(|c| c.id)
            .ok_or_else(|| GameError::inconsistent("candidate index out of range"))
    }
}

impl<R: BufRead, W: Write> DecisionProvider for ConsoleDecisions<R, W> {
    fn ask_yes_no(&mut self, prompt: &Prompt) -> Result<bool> {
        self.ask_until(&format!("{prompt} [y/n]"), |answer| {
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => Some(true),
                "n" | "no" => Some(false),
                _ => None,
            }
        })
    }

    fn ask_int(&mut self, prompt: &Prompt, domain: RangeInclusive<Money>) -> Result<Money> {
        let text = if *domain.end() == Money::MAX {
            format!("{prompt} [{}+]", domain.start())
        } else {
            format!("{prompt} [{}..{}]", domain.start(), domain.end())
        };
        self.ask_until(&text, |answer| {
            answer
                .trim_start_matches('$')
                .parse::<Money>()
                .ok()
                .filter(|value| domain.contains(value))
        })
    }

    fn ask_choice(&mut self, prompt: &Prompt, labels: &[&str]) -> Result<usize> {
        self.pick(prompt, labels)
    }

    fn ask_player(
        &mut self,
        prompt: &Prompt,
        candidates: &[Candidate<PlayerId>],
    ) -> Result<PlayerId> {
        self.pick_candidate(prompt, candidates)
    }

    fn ask_square(
        &mut self,
        prompt: &Prompt,
        candidates: &[Candidate<SquareId>],
    ) -> Result<SquareId> {
        self.pick_candidate(prompt, candidates)
    }

    fn ask_text(&mut self, prompt: &Prompt) -> Result<String> {
        self.ask_until(&prompt.to_string(), |answer| {
            (!answer.is_empty()).then(|| answer.to_string())
        })
    }
}

/// Prints the table after each round and the winner at the end.
pub struct ConsoleObserver<W> {
    writer: W,
}

impl ConsoleObserver<Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn print_table(&mut self, snapshot: &Snapshot) -> Result<()> {
        writeln!(self.writer, "=== After round {} ===", snapshot.round)?;
        for player in snapshot.active() {
            self.print_player(player)?;
        }
        Ok(())
    }

    fn print_player(&mut self, player: &PlayerSnapshot) -> Result<()> {
        let jail = if player.in_jail { " (in jail)" } else { "" };
        writeln!(
            self.writer,
            "{}: ${} on {}{jail}",
            player.name, player.cash, player.square
        )?;
        if !player.owned.is_empty() {
            writeln!(self.writer, "    owns {}", player.owned.join(", "))?;
        }
        Ok(())
    }
}

impl<W: Write> SessionObserver for ConsoleObserver<W> {
    fn round_completed(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.print_table(snapshot)
    }

    fn game_over(&mut self, winner: &PlayerSnapshot, _snapshot: &Snapshot) -> Result<()> {
        writeln!(self.writer, "{} wins!", winner.name)?;
        Ok(())
    }

    fn aborted(&mut self, snapshot: &Snapshot, error: &GameError) -> Result<()> {
        self.print_table(snapshot)?;
        writeln!(self.writer, "Game aborted: {error}")?;
        Ok(())
    }
}
