//! Line-oriented prompts
//!
//! Every prompt returns `Ok(None)` when the user quits, either by typing
//! `q` or by closing the input stream.

use std::io::{BufRead, Write};

use anyhow::Result;

/// Interactive questions asked by the workflow
pub trait Prompter {
    /// Pick one entry; returns its index
    fn select(&mut self, message: &str, choices: &[String], default: usize) -> Result<Option<usize>>;

    /// Pick at least one entry; returns the indices in ascending order
    fn multi_select(&mut self, message: &str, choices: &[String]) -> Result<Option<Vec<usize>>>;

    fn text(&mut self, message: &str, default: &str) -> Result<Option<String>>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>>;

    /// Show a line of output to the user
    fn say(&mut self, message: &str) -> Result<()>;
}

const QUIT: &str = "q";

/// Numbered menus over any reader and writer
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next trimmed input line, `None` at end of input or on `q`
    fn read_answer(&mut self) -> Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        if answer.eq_ignore_ascii_case(QUIT) {
            return Ok(None);
        }
        Ok(Some(answer.to_string()))
    }

    fn print_choices(&mut self, message: &str, choices: &[String]) -> Result<()> {
        writeln!(self.output, "{message}")?;
        for (idx, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", idx + 1, choice)?;
        }
        Ok(())
    }
}

fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn select(&mut self, message: &str, choices: &[String], default: usize) -> Result<Option<usize>> {
        if choices.is_empty() {
            return Ok(None);
        }
        let default = default.min(choices.len() - 1);
        self.print_choices(message, choices)?;

        loop {
            write!(self.output, "Choice [{}] (q to quit): ", default + 1)?;
            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match parse_choice(&answer, choices.len()) {
                Some(idx) => return Ok(Some(idx)),
                None => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}",
                    choices.len()
                )?,
            }
        }
    }

    fn multi_select(&mut self, message: &str, choices: &[String]) -> Result<Option<Vec<usize>>> {
        if choices.is_empty() {
            return Ok(None);
        }
        self.print_choices(message, choices)?;

        loop {
            write!(self.output, "Choices, e.g. 1,3 or all (q to quit): ")?;
            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case("all") {
                return Ok(Some((0..choices.len()).collect()));
            }

            let picked: Option<Vec<usize>> = answer
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(|part| parse_choice(part, choices.len()))
                .collect();
            match picked {
                Some(mut indices) if !indices.is_empty() => {
                    indices.sort_unstable();
                    indices.dedup();
                    return Ok(Some(indices));
                }
                _ => writeln!(self.output, "Please select one file or more")?,
            }
        }
    }

    fn text(&mut self, message: &str, default: &str) -> Result<Option<String>> {
        write!(self.output, "{message} [{default}]: ")?;
        Ok(self.read_answer()?.map(|answer| {
            if answer.is_empty() {
                default.to_string()
            } else {
                answer
            }
        }))
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{message} [{hint}]: ")?;
            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            match answer.to_ascii_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer y or n")?,
            }
        }
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::*;

    /// One scripted reply
    #[derive(Debug, Clone)]
    pub enum Answer {
        Select(usize),
        Multi(Vec<usize>),
        Text(String),
        Confirm(bool),
        Quit,
    }

    /// Prompter replaying canned answers and recording everything shown
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        pub questions: Vec<String>,
        pub messages: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                ..Self::default()
            }
        }

        pub fn said(&self, needle: &str) -> bool {
            self.messages.iter().any(|m| m.contains(needle))
        }

        fn next(&mut self, question: &str) -> Answer {
            self.questions.push(question.to_string());
            self.answers.pop_front().unwrap_or(Answer::Quit)
        }
    }

    impl Prompter for ScriptedPrompter {
        fn select(&mut self, message: &str, choices: &[String], _default: usize) -> Result<Option<usize>> {
            match self.next(message) {
                Answer::Select(idx) => {
                    assert!(idx < choices.len(), "{message}: {idx} not in {choices:?}");
                    Ok(Some(idx))
                }
                Answer::Quit => Ok(None),
                other => panic!("{message}: expected a selection, got {other:?}"),
            }
        }

        fn multi_select(&mut self, message: &str, _choices: &[String]) -> Result<Option<Vec<usize>>> {
            match self.next(message) {
                Answer::Multi(indices) => Ok(Some(indices)),
                Answer::Quit => Ok(None),
                other => panic!("{message}: expected a multi selection, got {other:?}"),
            }
        }

        fn text(&mut self, message: &str, default: &str) -> Result<Option<String>> {
            match self.next(message) {
                Answer::Text(text) if text.is_empty() => Ok(Some(default.to_string())),
                Answer::Text(text) => Ok(Some(text)),
                Answer::Quit => Ok(None),
                other => panic!("{message}: expected text, got {other:?}"),
            }
        }

        fn confirm(&mut self, message: &str, _default: bool) -> Result<Option<bool>> {
            match self.next(message) {
                Answer::Confirm(yes) => Ok(Some(yes)),
                Answer::Quit => Ok(None),
                other => panic!("{message}: expected a confirmation, got {other:?}"),
            }
        }

        fn say(&mut self, message: &str) -> Result<()> {
            self.messages.push(message.to_string());
            Ok(())
        }
    }
}
