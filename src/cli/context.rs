use crate::{
    config::{Config, ConfigManager},
    core::{ids, time::SystemClock, AccountStore},
    storage::JsonFileStore,
};

use super::{
    commands,
    errors::{CliError, CommandError, CommandResult},
    format::MoneyFormat,
    output,
    registry::CommandRegistry,
    shell::parse_command_line,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Everything a command handler can reach: the account store, preferences and the command table.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    store: AccountStore,
    config_manager: ConfigManager,
    config: Config,
    money: MoneyFormat,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Opens the file-backed store under the data directory named by `config`.
    pub fn open(mode: CliMode, config_manager: ConfigManager, config: Config) -> Result<Self, CliError> {
        let data_dir = config.resolve_data_dir(config_manager.base_dir());
        tracing::debug!(data_dir = %data_dir.display(), "opening collection files");
        let storage = JsonFileStore::new(data_dir)?;
        let store = AccountStore::open(
            Box::new(storage),
            Box::new(SystemClock),
            config.storage_keys(),
        )?;
        Ok(Self::with_store(mode, store, config_manager, config))
    }

    pub fn with_store(
        mode: CliMode,
        store: AccountStore,
        config_manager: ConfigManager,
        config: Config,
    ) -> Self {
        output::set_color_enabled(config.ui_color_enabled);
        for warning in store.bootstrap_report().warnings() {
            output::warning(warning);
        }
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            store,
            money: MoneyFormat::from_config(&config),
            config_manager,
            config,
            last_command: None,
            running: true,
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AccountStore {
        &mut self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub fn money(&self) -> &MoneyFormat {
        &self.money
    }

    pub fn prompt(&self) -> String {
        "squareone> ".to_string()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    /// Millisecond timestamp id not yet used by `existing`.
    pub(crate) fn next_id<'a>(&self, existing: impl Iterator<Item = &'a str> + Clone) -> String {
        ids::unique_timestamp_id(self.store.clock(), |candidate| {
            existing.clone().any(|id| id == candidate)
        })
    }

    /// Updates one preference, persists it and applies what can change without a restart.
    pub(crate) fn set_config_value(&mut self, field: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set(field, value)?;
        self.config_manager.save(&updated)?;
        self.config = updated;
        self.money = MoneyFormat::from_config(&self.config);
        output::set_color_enabled(self.config.ui_color_enabled);
        tracing::info!(field, "config updated");
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    /// Tokenizes and runs one input line.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        let control = self.dispatch(&command, raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Did you mean `{best}`?"));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(_) | CommandError::Form(_) => {
                output::error(&err);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Store(ref inner) => {
                tracing::error!(
                    error = %inner,
                    command = self.last_command.as_deref().unwrap_or_default(),
                    "store operation failed"
                );
                output::error(format!("Could not save changes: {inner}"));
            }
            other => output::error(other),
        }
    }
}
