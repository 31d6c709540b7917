//! Terminal implementation of the [`Host`] seam.
//!
//! Prompts go to stderr and answers come from stdin, so stdout carries only
//! results (documents, chat queries, info lines). Values given on the command
//! line pre-answer the matching prompt.

use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use colored::Colorize;

use aynorica_sync::{Host, InputRequest, PickItem};
use aynorica_watch::{StatusSink, StatusText};

#[derive(Debug, Default)]
pub struct TerminalHost {
    assume_yes: bool,
    preset_input: RefCell<Option<String>>,
    preset_pick: RefCell<Option<String>>,
    failed: Cell<bool>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with its accept choice.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Use `value` for the next text prompt instead of reading stdin.
    pub fn with_input(self, value: Option<String>) -> Self {
        *self.preset_input.borrow_mut() = value;
        self
    }

    /// Choose the entry labelled `label` at the next selection prompt.
    pub fn with_pick(self, label: Option<String>) -> Self {
        *self.preset_pick.borrow_mut() = label;
        self
    }

    /// Failure if any error was reported.
    pub fn exit_code(&self) -> ExitCode {
        if self.failed.get() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// One trimmed line from stdin; `None` on EOF or read error.
fn read_line(prompt: &str) -> Option<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

impl Host for TerminalHost {
    fn confirm(&self, message: &str, accept: &str, decline: &str) -> bool {
        if self.assume_yes {
            eprintln!("{message} {}", format!("[{accept}]").dimmed());
            return true;
        }
        let Some(answer) = read_line(&format!("{message} [{accept}/{decline}] ")) else {
            return false;
        };
        answer.eq_ignore_ascii_case(accept)
            || answer.eq_ignore_ascii_case("y")
            || answer.eq_ignore_ascii_case("yes")
    }

    fn input(&self, request: &InputRequest<'_>) -> Option<String> {
        if let Some(value) = self.preset_input.borrow_mut().take() {
            return match (request.validate)(&value) {
                None => Some(value),
                Some(message) => {
                    self.error(&message);
                    None
                }
            };
        }
        loop {
            let value = read_line(&format!("{} ({}): ", request.prompt, request.placeholder))?;
            match (request.validate)(&value) {
                None => return Some(value),
                Some(message) => self.warn(&message),
            }
        }
    }

    fn pick(&self, placeholder: &str, items: &[PickItem]) -> Option<usize> {
        if let Some(label) = self.preset_pick.borrow_mut().take() {
            let found = items.iter().position(|item| item.label == label);
            if found.is_none() {
                let choices: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
                self.error(&format!(
                    "'{label}' is not one of: {}",
                    choices.join(", ")
                ));
            }
            return found;
        }

        eprintln!("{}", placeholder.bold());
        for (n, item) in items.iter().enumerate() {
            let mut line = format!("  {}. {}", n + 1, item.label);
            if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
                line.push_str(&format!("  {}", description.dimmed()));
            }
            eprintln!("{line}");
            if let Some(detail) = &item.detail {
                eprintln!("     {}", detail.bright_black());
            }
        }
        let answer = read_line("> ")?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => Some(n - 1),
            _ => None,
        }
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {message}", "warning:".yellow().bold());
    }

    fn error(&self, message: &str) {
        self.failed.set(true);
        eprintln!("{} {message}", "error:".red().bold());
    }

    fn progress(&self, message: &str) {
        eprintln!("{}", message.dimmed());
    }

    fn show_document(&self, content: &str) {
        print!("{content}");
    }

    fn open_chat(&self, query: &str) {
        eprintln!("{}", "Run this in your Aynorica chat:".dimmed());
        println!("{query}");
    }
}

/// Status display on stderr; repeats of the same text are not reprinted.
#[derive(Debug, Default)]
pub struct TerminalStatus {
    last: Option<String>,
}

impl StatusSink for TerminalStatus {
    fn show(&mut self, status: &StatusText) {
        if self.last.as_deref() == Some(status.text.as_str()) {
            return;
        }
        eprintln!("{}", status.text.bold());
        self.last = Some(status.text.clone());
    }

    fn hide(&mut self) {
        self.last = None;
    }
}
