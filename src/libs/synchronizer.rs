// Interactive setup of browser installations.
//
// The synchronizer is the only component that talks to the operator. For every
// browser it asks for an executable and a profile path, validates each one,
// stages the accepted values (asking before it overrides an existing value) and
// finally commits everything in one write.
//
// Session flow:
//
//   Idle -> CheckingExisting -> { Skip | Prompting } -> Validating
//        -> (Confirming ->) Staged -> Committing -> { Done | RetryPending }
//
// `Skip` and `Done` are terminal. `RetryPending` keeps the staged changes so
// `retry_commit` can write them again without prompting.

use crate::libs::change_set::BufferedChangeSet;
use crate::libs::configuration_store::{ConfigurationStore, StoreError};
use crate::libs::path_validator::PathValidator;
use crate::libs::prompt_gateway::PromptGateway;
use crate::libs::utilities::path_helpers::expand_path;
use crate::log_debug;
use crate::logger::Logger;
use crate::schemas::browser_config::{BrowserId, display_value};
use crate::schemas::config_key::ConfigKey;
use std::sync::Arc;

/// Where the current session is in the setup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    CheckingExisting,
    Skip,
    Prompting,
    Validating,
    Confirming,
    Staged,
    Committing,
    Done,
    RetryPending,
}

/// How a call to [`ConfigurationSynchronizer::initialize_configuration`] ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// A browser was already configured; nothing was asked or written.
    Skipped,
    /// The staged changes are on disk.
    Committed,
    /// Writing failed. The staged changes are still held by the synchronizer.
    RetryPending(StoreError),
}

/// Which browsers the operator asked to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserSelection {
    All,
    Single(BrowserId),
}

impl BrowserSelection {
    /// The browsers to visit, in the fixed supported order.
    pub fn browsers(self) -> Vec<BrowserId> {
        match self {
            BrowserSelection::All => BrowserId::ALL.to_vec(),
            BrowserSelection::Single(id) => vec![id],
        }
    }
}

pub struct ConfigurationSynchronizer {
    store: ConfigurationStore,
    prompts: PromptGateway,
    changes: BufferedChangeSet,
    logger: Arc<dyn Logger>,
    state: SessionState,
}

impl ConfigurationSynchronizer {
    /// `store` is expected to have been loaded already.
    pub fn new(store: ConfigurationStore, prompts: PromptGateway, logger: Arc<dyn Logger>) -> Self {
        Self {
            store,
            prompts,
            changes: BufferedChangeSet::new(),
            logger,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &ConfigurationStore {
        &self.store
    }

    pub fn changes(&self) -> &BufferedChangeSet {
        &self.changes
    }

    fn transition(&mut self, next: SessionState) {
        log_debug!("[Setup] {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Runs the whole setup session: skip check, browser selection, one task
    /// per selected browser, then a single commit.
    pub fn initialize_configuration(&mut self) -> SessionOutcome {
        self.transition(SessionState::CheckingExisting);
        if self.store.is_any_browser_configured() {
            self.logger
                .info("One or more browsers are already configured.");
            self.transition(SessionState::Skip);
            return SessionOutcome::Skipped;
        }

        let selection = self.get_user_browser_choice();
        self.get_requested_browser_setup(selection);
        self.commit()
    }

    /// Asks for `all` or a single browser, re-asking on unknown answers.
    pub fn get_user_browser_choice(&mut self) -> BrowserSelection {
        self.transition(SessionState::Prompting);
        let supported: Vec<&str> = BrowserId::ALL.iter().map(|id| id.as_str()).collect();

        loop {
            let answer = self
                .prompts
                .ask(&format!("browserChoice (all, {})", supported.join(", ")), "all")
                .to_lowercase();

            if answer == "all" {
                return BrowserSelection::All;
            }
            match answer.parse::<BrowserId>() {
                Ok(id) => return BrowserSelection::Single(id),
                Err(e) => self.logger.error(&format!("Invalid browser choice: {}", e)),
            }
        }
    }

    /// Runs the per-browser task for every selected browser, one after another
    /// in supported-list order.
    pub fn get_requested_browser_setup(&mut self, selection: BrowserSelection) {
        for browser in selection.browsers() {
            self.configure_browser(browser);
        }
    }

    /// Collects, validates and stages both paths for `browser`.
    ///
    /// The two paths are independent: an invalid executable does not stop the
    /// profile path from being staged and vice versa. Accepted paths are staged
    /// with `~` and `$VAR` already expanded.
    pub fn configure_browser(&mut self, browser: BrowserId) {
        self.transition(SessionState::Prompting);
        let executable_path = self.prompts.ask(&format!("{}Executable", browser), "");
        let profile_path = self.prompts.ask(&format!("{}ProfilePath", browser), "");

        self.transition(SessionState::Validating);
        if PathValidator::validate(&executable_path, true, self.logger.as_ref()) {
            let resolved = expand_path(&executable_path).to_string_lossy().to_string();
            self.set_buffered_config_key(ConfigKey::executable(browser), resolved);
        }

        self.transition(SessionState::Validating);
        if PathValidator::validate(&profile_path, false, self.logger.as_ref()) {
            let resolved = expand_path(&profile_path).to_string_lossy().to_string();
            self.set_buffered_config_key(ConfigKey::profile_path(browser), resolved);
        }
    }

    /// Stages `value` for `key`, asking first when it would replace a different
    /// committed value (including a stored `null`). Returns whether the value was
    /// staged.
    pub fn set_buffered_config_key(&mut self, key: ConfigKey, value: String) -> bool {
        let conflicting = self
            .store
            .current_value(key)
            .filter(|current| current.as_str() != Some(value.as_str()))
            .map(display_value);

        if let Some(current) = conflicting {
            self.transition(SessionState::Confirming);
            if !self.confirm_key_override(key, &current, &value) {
                self.logger.info(&format!(
                    "Kept existing value for \"{}\": {}",
                    key, current
                ));
                return false;
            }
        }

        self.changes.stage(key, value);
        self.transition(SessionState::Staged);
        true
    }

    /// Blocks until the operator answers `yes` or `no` (any case).
    ///
    /// There is no retry limit. A closed input source counts as `no`, since no
    /// valid answer can ever arrive.
    pub fn confirm_key_override(&mut self, key: ConfigKey, current: &str, candidate: &str) -> bool {
        let question = format!(
            "\"{}\" already exists, and is currently assigned to the value \"{}\". \
             Are you sure you would like to override this key, and replace it with \"{}\"? (yes/no):",
            key, current, candidate
        );

        match self.ask_yes_no(&question, "key override confirmation") {
            Some(answer) => answer,
            None => {
                self.logger.warning(&format!(
                    "No answer available for override of \"{}\"; keeping the current value.",
                    key
                ));
                false
            }
        }
    }

    /// Asks whether a failed commit should be written again. Closed input means no.
    pub fn confirm_retry(&mut self) -> bool {
        let question = format!(
            "{} staged change(s) could not be saved. Try saving again? (yes/no):",
            self.changes.len()
        );
        self.ask_yes_no(&question, "retry confirmation")
            .unwrap_or(false)
    }

    /// Repeats `question` until a yes/no answer arrives. `None` when the input closes.
    fn ask_yes_no(&mut self, question: &str, topic: &str) -> Option<bool> {
        loop {
            self.logger.info(question);
            let response = self.prompts.read_line("Enter your choice: ")?;

            match response.to_lowercase().as_str() {
                "yes" => return Some(true),
                "no" => return Some(false),
                other => self.logger.warning(&format!(
                    "Invalid input received for {}: {}",
                    topic, other
                )),
            }
        }
    }

    /// Commits the staged changes once.
    pub fn commit(&mut self) -> SessionOutcome {
        self.transition(SessionState::Committing);
        if self.changes.is_empty() {
            self.logger
                .warning("No browser paths were accepted; saving the configuration unchanged.");
        }

        match self.store.commit(&mut self.changes) {
            Ok(()) => {
                self.transition(SessionState::Done);
                SessionOutcome::Committed
            }
            Err(e) => {
                self.transition(SessionState::RetryPending);
                SessionOutcome::RetryPending(e)
            }
        }
    }

    /// Re-attempts a failed commit with the changes still held in memory.
    pub fn retry_commit(&mut self) -> SessionOutcome {
        if self.state != SessionState::RetryPending {
            log_debug!("[Setup] retry_commit called in state {:?}", self.state);
        }
        self.commit()
    }
}
