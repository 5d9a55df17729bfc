//! Candidate selection through an operator.
//!
//! The pipeline never touches stdin directly. It asks an [`Operator`],
//! which is a terminal in normal use and a scripted answer set in tests
//! or non-interactive runs.

use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use super::error::FetchError;
use crate::adapters::ArchiveApi;
use crate::domain::Candidate;

/// One line of the candidate listing shown to the operator
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    pub index: usize,
    pub candidate: &'a Candidate,
    pub details_url: String,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index: {}, Title: {}, Year: {}, Creator: {}, URL: {}",
            self.index,
            self.candidate.title,
            self.candidate.year.as_deref().unwrap_or("Unknown"),
            self.candidate.creator.as_deref().unwrap_or("Unknown"),
            self.details_url
        )
    }
}

/// Whoever picks the candidate and confirms the title
pub trait Operator {
    /// Show the candidates
    fn present(&mut self, listings: &[Listing<'_>]) -> Result<()>;

    /// Zero-based index of the chosen candidate
    fn choose_index(&mut self, count: usize) -> Result<usize>;

    /// A replacement title, or `None` to keep `current`
    fn confirm_or_replace_title(&mut self, current: &str) -> Result<Option<String>>;
}

/// The operator's decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub candidate: Candidate,
    /// Title to file the movie under
    pub title: String,
}

/// Present candidates and collect the operator's choice
pub fn select(
    operator: &mut dyn Operator,
    archive: &dyn ArchiveApi,
    candidates: &[Candidate],
) -> Result<Selection> {
    let listings: Vec<Listing<'_>> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| Listing {
            index,
            candidate,
            details_url: archive.details_url(&candidate.identifier),
        })
        .collect();
    operator.present(&listings)?;

    let index = operator.choose_index(candidates.len())?;
    let candidate = candidates
        .get(index)
        .cloned()
        .ok_or(FetchError::SelectionOutOfRange {
            index,
            count: candidates.len(),
        })?;
    info!(identifier = %candidate.identifier, title = %candidate.title, "Selected");

    let title = match operator.confirm_or_replace_title(&candidate.title)? {
        Some(replacement) => {
            info!(title = %replacement, "Title changed");
            replacement
        }
        None => candidate.title.clone(),
    };

    Ok(Selection { candidate, title })
}

/// Interpret a title-change answer: blank, "n" or "no" keep the title
pub fn parse_title_answer(answer: &str) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no") {
        None
    } else {
        Some(answer.to_string())
    }
}

/// Parse an index answer
pub fn parse_index(answer: &str) -> Result<usize, FetchError> {
    answer
        .trim()
        .parse::<usize>()
        .map_err(|_| FetchError::InvalidSelection {
            input: answer.trim().to_string(),
        })
}

/// Line-oriented operator over any reader/writer pair
pub struct TerminalOperator<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            anyhow::bail!("Input closed while waiting for an answer");
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Operator for TerminalOperator<R, W> {
    fn present(&mut self, listings: &[Listing<'_>]) -> Result<()> {
        for listing in listings {
            writeln!(self.output, "{}", listing)?;
        }
        Ok(())
    }

    fn choose_index(&mut self, _count: usize) -> Result<usize> {
        let answer = self.prompt("Choose an index: ")?;
        Ok(parse_index(&answer)?)
    }

    fn confirm_or_replace_title(&mut self, current: &str) -> Result<Option<String>> {
        writeln!(self.output, "Found: {}", current)?;
        let answer = self.prompt("Would you like to change the title? ")?;
        Ok(parse_title_answer(&answer))
    }
}

/// Operator with answers fixed up front (from flags or tests)
#[derive(Debug, Clone, Default)]
pub struct ScriptedOperator {
    pub index: usize,
    pub title_override: Option<String>,
    /// Listings shown so far, rendered as text
    pub shown: Vec<String>,
    /// Also print listings to stdout
    echo: bool,
}

impl ScriptedOperator {
    pub fn new(index: usize, title_override: Option<String>) -> Self {
        Self {
            index,
            title_override,
            shown: Vec::new(),
            echo: false,
        }
    }

    /// Builder: print listings as they are presented
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl Operator for ScriptedOperator {
    fn present(&mut self, listings: &[Listing<'_>]) -> Result<()> {
        for listing in listings {
            let line = listing.to_string();
            if self.echo {
                println!("{}", line);
            }
            self.shown.push(line);
        }
        Ok(())
    }

    fn choose_index(&mut self, _count: usize) -> Result<usize> {
        Ok(self.index)
    }

    fn confirm_or_replace_title(&mut self, _current: &str) -> Result<Option<String>> {
        Ok(self
            .title_override
            .as_deref()
            .and_then(parse_title_answer))
    }
}
