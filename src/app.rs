use anyhow::Result;

use crate::config::{ActiveThemes, OptionStore};
use crate::dispatch::{Dispatcher, SubOperation};
use crate::error::ShellError;
use crate::registry::{Theme, ThemeRegistry, change_candidates, uninstall_candidates};
use crate::ui::Console;
use crate::ui::display::{change_row, detail_lines, list_row};
use crate::validation::{confirmation_matches, is_quit, parse_index, validate_source};

const MENU_OPTIONS: [&str; 5] = ["I", "R", "C", "H", "Q"];

const SOURCE_PROMPT: &str = "Please provide a theme source, it can be either an URL or a filesystem path to a ZIP/directory within your server?\n[Q]uit";
const UNINSTALL_PROMPT: &str = "Which theme would you like to uninstall?\n[Q]uit";
const ACTIVATE_PROMPT: &str = "Which theme would you like to activate?\n[Q]uit";
const INSTALL_PROGRESS: &str = "Starting installation...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Install,
    Remove,
    Change,
    Help,
    Quit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "i" => Some(Self::Install),
            "r" => Some(Self::Remove),
            "c" => Some(Self::Change),
            "h" => Some(Self::Help),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// How an operation ended. The menu ignores it; direct sub-commands turn
/// `Failed` into a non-zero exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Aborted,
    Failed,
}

/// The interactive theme manager. Every prompt blocks on the console and
/// at most one sub-operation runs at a time.
pub struct App<R, D, O> {
    console: Console,
    registry: R,
    dispatcher: D,
    options: O,
    help: String,
}

impl<R, D, O> App<R, D, O>
where
    R: ThemeRegistry,
    D: Dispatcher,
    O: OptionStore,
{
    pub fn new(console: Console, registry: R, dispatcher: D, options: O, help: String) -> Self {
        Self {
            console,
            registry,
            dispatcher,
            options,
            help,
        }
    }

    /// Menu loop. Returns when the operator quits or input runs out.
    pub fn run_menu(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(answer) = self.console.ask("What would you like to do?", &MENU_OPTIONS)?
            else {
                break;
            };

            tracing::debug!("menu answer: {answer:?}");
            match MenuChoice::parse(&answer) {
                Some(MenuChoice::Quit) => break,
                Some(MenuChoice::Install) => {
                    self.install(None, true)?;
                }
                Some(MenuChoice::Remove) => {
                    self.uninstall(None)?;
                }
                Some(MenuChoice::Change) => {
                    self.change(None)?;
                }
                Some(MenuChoice::Help) => {
                    let help = self.help.clone();
                    self.console.out(&help)?;
                }
                None => self.report(ShellError::InvalidSelection)?,
            }
            self.console.hr()?;
        }
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        self.console.info("Themes Shell")?;
        self.console.hr()?;
        self.console.out("[I]nstall new theme")?;
        self.console.out("[R]emove an existing theme")?;
        self.console.out("[C]hange site theme")?;
        self.console.out("[H]elp")?;
        self.console.out("[Q]uit")?;
        Ok(())
    }

    /// Installs from `source`, or keeps prompting for one until an install
    /// succeeds or the operator quits.
    pub fn install(&mut self, source: Option<&str>, activate: bool) -> Result<Outcome> {
        if let Some(source) = source {
            if let Err(err) = validate_source(source) {
                self.report(err)?;
                return Ok(Outcome::Failed);
            }
            let installed = self.install_from(source, activate)?;
            return Ok(if installed {
                Outcome::Completed
            } else {
                Outcome::Failed
            });
        }

        let outcome = loop {
            let answer = self.console.ask(SOURCE_PROMPT, &[])?;
            let source = match answer {
                Some(source) if !is_quit(&source) => source,
                _ => {
                    self.console.err("Installation aborted")?;
                    break Outcome::Aborted;
                }
            };

            if let Err(err) = validate_source(&source) {
                self.report(err)?;
                continue;
            }

            if self.install_from(&source, activate)? {
                break Outcome::Completed;
            }
        };

        self.console.blank()?;
        Ok(outcome)
    }

    fn install_from(&mut self, source: &str, activate: bool) -> Result<bool> {
        self.console.inline(INSTALL_PROGRESS)?;
        let operation = SubOperation::Install {
            source: source.to_string(),
            theme: true,
            activate,
        };

        if self.dispatch(&operation)? {
            self.console
                .overwrite(&format!("{INSTALL_PROGRESS} successfully installed!"))?;
            self.invalidate_registry()?;
            Ok(true)
        } else {
            self.console.overwrite(&format!("{INSTALL_PROGRESS} failed!"))?;
            Ok(false)
        }
    }

    /// Uninstalls a theme after the operator retypes its exact name.
    pub fn uninstall(&mut self, target: Option<&str>) -> Result<Outcome> {
        let Some(all) = self.installed()? else {
            return Ok(Outcome::Failed);
        };
        let candidates = uninstall_candidates(all);
        if candidates.is_empty() {
            self.report(ShellError::NoCandidates("installed"))?;
            self.console.blank()?;
            return Ok(Outcome::Aborted);
        }

        let theme = match target {
            Some(name) => match candidates.into_iter().find(|t| t.name == name) {
                Some(theme) => theme,
                None => {
                    self.report(ShellError::UnknownTheme(name.to_string()))?;
                    return Ok(Outcome::Failed);
                }
            },
            None => {
                self.console.blank()?;
                for (i, theme) in candidates.iter().enumerate() {
                    self.console.index_row(i + 1, &theme.human_name)?;
                }
                self.console.blank()?;

                let Some(index) = self.select(UNINSTALL_PROMPT, candidates.len())? else {
                    self.console.blank()?;
                    return Ok(Outcome::Aborted);
                };
                candidates[index].clone()
            }
        };

        let outcome = self.confirm_and_uninstall(&theme)?;
        self.console.blank()?;
        Ok(outcome)
    }

    fn confirm_and_uninstall(&mut self, theme: &Theme) -> Result<Outcome> {
        self.console.hr()?;
        self.console.info("The following theme will be uninstalled")?;
        self.console.hr()?;
        for line in detail_lines(theme) {
            self.console.out(&line)?;
        }
        self.console.hr()?;
        self.console.blank()?;

        let typed = self
            .console
            .ask(&format!("Please type in \"{}\" to uninstall", theme.name), &[])?;
        let confirmed = typed
            .as_deref()
            .is_some_and(|typed| confirmation_matches(typed, &theme.name));
        if !confirmed {
            tracing::warn!("uninstall of {} not confirmed", theme.name);
            self.report(ShellError::ConfirmationMismatch)?;
            return Ok(Outcome::Aborted);
        }

        let operation = SubOperation::Uninstall {
            name: theme.name.clone(),
        };
        if self.dispatch(&operation)? {
            self.console.success("Plugin uninstalled!")?;
            self.invalidate_registry()?;
            Ok(Outcome::Completed)
        } else {
            self.console.err("Plugin could not be uninstalled.")?;
            Ok(Outcome::Failed)
        }
    }

    /// Activates one of the themes that is neither the front nor the back theme.
    pub fn change(&mut self, target: Option<&str>) -> Result<Outcome> {
        let Some(all) = self.installed()? else {
            return Ok(Outcome::Failed);
        };
        let Some(active) = self.active_themes()? else {
            return Ok(Outcome::Failed);
        };

        let candidates = change_candidates(all, &active);
        if candidates.is_empty() {
            self.report(ShellError::NoCandidates("disabled"))?;
            self.console.blank()?;
            return Ok(Outcome::Aborted);
        }

        let theme = match target {
            Some(name) => match candidates.into_iter().find(|t| t.name == name) {
                Some(theme) => theme,
                None => {
                    self.report(ShellError::UnknownTheme(name.to_string()))?;
                    return Ok(Outcome::Failed);
                }
            },
            None => {
                self.console.blank()?;
                for (i, theme) in candidates.iter().enumerate() {
                    self.console.index_row(i + 1, &change_row(theme))?;
                }
                self.console.blank()?;

                let Some(index) = self.select(ACTIVATE_PROMPT, candidates.len())? else {
                    self.console.blank()?;
                    return Ok(Outcome::Aborted);
                };
                candidates[index].clone()
            }
        };

        let operation = SubOperation::Activate {
            name: theme.name.clone(),
        };
        let outcome = if self.dispatch(&operation)? {
            self.console.success("Theme changed!")?;
            self.invalidate_registry()?;
            Outcome::Completed
        } else {
            self.console.err("Theme could not be changed.")?;
            Outcome::Failed
        };

        self.console.blank()?;
        Ok(outcome)
    }

    /// Prints every installed theme, marking the active ones.
    pub fn list(&mut self) -> Result<Outcome> {
        let Some(all) = self.installed()? else {
            return Ok(Outcome::Failed);
        };
        let Some(active) = self.active_themes()? else {
            return Ok(Outcome::Failed);
        };

        let themes = uninstall_candidates(all);
        if themes.is_empty() {
            self.console.out("No themes installed.")?;
            return Ok(Outcome::Completed);
        }
        for theme in &themes {
            self.console.out(&list_row(theme, &active))?;
        }
        Ok(Outcome::Completed)
    }

    /// Prompts for a 1-indexed entry until a valid one is given. `None`
    /// means the operator quit.
    fn select(&mut self, prompt: &str, len: usize) -> Result<Option<usize>> {
        loop {
            let answer = match self.console.ask(prompt, &[])? {
                Some(answer) if !is_quit(&answer) => answer,
                _ => {
                    self.console.err("Operation aborted")?;
                    return Ok(None);
                }
            };

            match parse_index(&answer, len) {
                Ok(index) => return Ok(Some(index)),
                Err(err) => self.report(err)?,
            }
        }
    }

    fn dispatch(&mut self, operation: &SubOperation) -> Result<bool> {
        let kind = operation.kind();
        match self.dispatcher.dispatch(operation) {
            Ok(0) => {
                tracing::info!(%kind, "sub-operation succeeded");
                Ok(true)
            }
            Ok(code) => {
                let failure = ShellError::SubOperationFailed {
                    operation: kind,
                    code,
                };
                tracing::warn!("{failure}");
                Ok(false)
            }
            Err(err) => {
                tracing::error!(%kind, "sub-operation could not run: {err:#}");
                self.console.blank()?;
                self.console.err(&format!("{err:#}"))?;
                Ok(false)
            }
        }
    }

    fn installed(&mut self) -> Result<Option<Vec<Theme>>> {
        match self.registry.list() {
            Ok(themes) => Ok(Some(themes)),
            Err(err) => {
                tracing::error!("listing plugins failed: {err:#}");
                self.console.err(&format!("Could not list themes: {err:#}"))?;
                Ok(None)
            }
        }
    }

    fn active_themes(&mut self) -> Result<Option<ActiveThemes>> {
        match ActiveThemes::lookup(&self.options) {
            Ok(active) => Ok(Some(active)),
            Err(err) => {
                tracing::error!("reading active themes failed: {err:#}");
                self.console
                    .err(&format!("Could not read active themes: {err:#}"))?;
                Ok(None)
            }
        }
    }

    fn invalidate_registry(&mut self) -> Result<()> {
        if let Err(err) = self.registry.drop_cache() {
            tracing::warn!("dropping registry cache failed: {err:#}");
            self.console
                .err(&format!("Could not refresh the theme list: {err:#}"))?;
        }
        Ok(())
    }

    fn report(&mut self, err: ShellError) -> Result<()> {
        self.console.err(&err.to_string())
    }
}
