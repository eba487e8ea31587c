use crate::config::ActiveThemes;
use crate::registry::{Theme, is_active};
use anyhow::Result;
use crossterm::{
    QueueableCommand,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::{self, Write};

/// Row for the change menu: human name plus front/back classification.
pub fn change_row(theme: &Theme) -> String {
    format!("{} [{}]", theme.human_name, theme.classification())
}

/// Row for `themes list`.
pub fn list_row(theme: &Theme, active: &ActiveThemes) -> String {
    let marker = if is_active(theme, active) { "*" } else { " " };
    format!(
        "{marker} {:<24} {:<9} {}",
        theme.name,
        theme.classification(),
        theme.human_name
    )
}

/// Name/description/path block shown before an uninstall confirmation.
pub fn detail_lines(theme: &Theme) -> Vec<String> {
    vec![
        format!("Name:        {}", theme.name),
        format!("Description: {}", theme.description),
        format!("Path:        {}", theme.path.display()),
    ]
}

pub fn print_error(message: &str) -> Result<()> {
    let mut stderr = io::stderr();
    stderr.queue(SetForegroundColor(Color::Red))?;
    stderr.queue(SetAttribute(Attribute::Bold))?;
    stderr.queue(Print("✗ "))?;
    stderr.queue(SetAttribute(Attribute::Reset))?;
    stderr.queue(SetForegroundColor(Color::Red))?;
    stderr.queue(Print(message))?;
    stderr.queue(ResetColor)?;
    writeln!(stderr)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn backend() -> Theme {
        Theme {
            name: "BackendTheme".to_string(),
            human_name: "Backend Theme".to_string(),
            description: "Admin look".to_string(),
            path: PathBuf::from("/srv/plugins/BackendTheme"),
            is_theme: true,
            is_admin: true,
        }
    }

    #[test]
    fn change_row_shows_classification() {
        assert_eq!(change_row(&backend()), "Backend Theme [backend]");
    }

    #[test]
    fn list_row_marks_active_theme() {
        let active = ActiveThemes {
            front: None,
            back: Some("BackendTheme".to_string()),
        };
        assert!(list_row(&backend(), &active).starts_with("* BackendTheme"));
        assert!(list_row(&backend(), &ActiveThemes::default()).starts_with("  BackendTheme"));
    }

    #[test]
    fn detail_lines_use_machine_name() {
        let lines = detail_lines(&backend());
        assert_eq!(lines[0], "Name:        BackendTheme");
        assert_eq!(lines[2], "Path:        /srv/plugins/BackendTheme");
    }
}
