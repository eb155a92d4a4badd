// Blocking line input for the setup flow.
//
// Every question the synchronizer asks goes through one `PromptGateway`, which owns
// the only `LineSource`. The gateway trims input, applies defaults and reports what
// happened; it never decides whether an answer is valid.

use crate::log_debug;
use crate::logger::Logger;
use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// A blocking source of operator input, one line per call.
pub trait LineSource: Send {
    /// Shows `prompt` and waits for one line.
    ///
    /// # Returns
    /// * `Ok(Some(line))` - the raw line, without its newline.
    /// * `Ok(None)` - the input is closed (EOF); no more answers will come.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads from the terminal via `dialoguer`, or plain stdin when stdin is piped.
#[derive(Default)]
pub struct TerminalLineSource;

impl TerminalLineSource {
    pub fn new() -> Self {
        Self
    }
}

impl LineSource for TerminalLineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if io::stdin().is_terminal() {
            let line = dialoguer::Input::<String>::new()
                .with_prompt(prompt.trim_end().trim_end_matches(':'))
                .allow_empty(true)
                .interact_text()
                .map_err(|e| io::Error::other(e.to_string()))?;
            return Ok(Some(line));
        }

        eprint!("{}", prompt);
        io::stderr().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Answers from a fixed script, in order. Used for unattended runs
/// (`setup --answers <file>`) and by the tests.
///
/// Every prompt shown is recorded so callers can check what was asked.
#[derive(Default)]
pub struct ScriptedLineSource {
    answers: VecDeque<String>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLineSource {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Loads one answer per line from `path`.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::new(contents.lines()))
    }

    /// Shared view of the prompts shown so far.
    #[cfg(test)]
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.asked)
    }
}

impl LineSource for ScriptedLineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}

/// The single, serialized entry point for operator input.
pub struct PromptGateway {
    source: Box<dyn LineSource>,
    logger: Arc<dyn Logger>,
}

impl PromptGateway {
    pub fn new(source: Box<dyn LineSource>, logger: Arc<dyn Logger>) -> Self {
        Self { source, logger }
    }

    /// Reads one trimmed line. `None` means the source is closed or failed; a
    /// failure is reported on the error channel.
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        match self.source.read_line(prompt) {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => {
                log_debug!("[Prompt] Input closed while waiting for: {}", prompt);
                None
            }
            Err(e) => {
                self.logger
                    .error(&format!("Failed to read operator input: {}", e));
                None
            }
        }
    }

    /// Asks for a value for `label`, falling back to `default` on empty input.
    pub fn ask(&mut self, label: &str, default: &str) -> String {
        self.logger.info(&format!("Provide a value for \"{}\":", label));

        let answer = self
            .read_line(&format!("Value for {}: ", label))
            .unwrap_or_default();

        if answer.is_empty() {
            self.logger.warning(&format!(
                "User input was not provided for \"{}\". Default value applied: {}",
                label, default
            ));
            default.to_string()
        } else {
            self.logger
                .info(&format!("User provided value for \"{}\": {}", label, answer));
            answer
        }
    }
}
