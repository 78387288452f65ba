//! Operator selection prompts.
//!
//! Some GSX services ask which handling or catering operator should perform
//! them. GSX mirrors its menu into a text file, one line per entry; when the
//! first line is a known operator prompt the first operator is picked.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use super::error::BusError;
use super::menu::GsxMenu;

/// First-line prompts that ask for an operator.
pub const OPERATOR_PROMPTS: [&str; 2] = ["Select handling operator", "Select catering operator"];

/// What the menu file says about operator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorPrompt {
    /// The menu file does not exist.
    MenuUnavailable,
    /// The menu shows something other than an operator prompt.
    NotRequired,
    /// An operator must be chosen.
    Required,
}

/// Inspect the menu file.
///
/// A missing or unreadable file is reported as `MenuUnavailable`, not an error.
pub fn inspect_menu_file(path: &Path) -> OperatorPrompt {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return OperatorPrompt::MenuUnavailable,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Menu file unreadable");
            return OperatorPrompt::MenuUnavailable;
        }
    };

    let first = contents.lines().next().map(str::trim).unwrap_or_default();
    if OPERATOR_PROMPTS.contains(&first) {
        OperatorPrompt::Required
    } else {
        OperatorPrompt::NotRequired
    }
}

/// Wait for the prompt to appear, then pick the first operator if asked.
///
/// Returns `true` when a selection was made.
pub fn select_operator_if_prompted(
    menu: &GsxMenu<'_>,
    menu_file: &Path,
    delay: Duration,
) -> Result<bool, BusError> {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }

    match inspect_menu_file(menu_file) {
        OperatorPrompt::Required => {
            tracing::info!("Operator selection prompted, choosing first operator");
            menu.select(1)?;
            Ok(true)
        }
        OperatorPrompt::NotRequired => Ok(false),
        OperatorPrompt::MenuUnavailable => {
            tracing::debug!(
                path = %menu_file.display(),
                "No GSX menu file, skipping operator check"
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::memory::MemorySimBus;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempdir().unwrap();
        assert_eq!(
            inspect_menu_file(&dir.path().join("menu")),
            OperatorPrompt::MenuUnavailable
        );
    }

    #[test]
    fn test_handling_prompt_detected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu");
        fs::write(&path, "Select handling operator\nSwissport\nMenzies\n").unwrap();
        assert_eq!(inspect_menu_file(&path), OperatorPrompt::Required);
    }

    #[test]
    fn test_catering_prompt_with_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu");
        fs::write(&path, "Select catering operator\r\nGate Gourmet\r\n").unwrap();
        assert_eq!(inspect_menu_file(&path), OperatorPrompt::Required);
    }

    #[test]
    fn test_other_menu_not_required() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu");
        fs::write(&path, "Request Deboarding\nRequest Catering\n").unwrap();
        assert_eq!(inspect_menu_file(&path), OperatorPrompt::NotRequired);
    }

    #[test]
    fn test_empty_file_not_required() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu");
        fs::write(&path, "").unwrap();
        assert_eq!(inspect_menu_file(&path), OperatorPrompt::NotRequired);
    }

    #[test]
    fn test_selects_first_operator_when_prompted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu");
        fs::write(&path, "Select handling operator\nSwissport\n").unwrap();

        let bus = MemorySimBus::new();
        let menu = GsxMenu::new(&bus, Duration::from_millis(10));
        assert!(select_operator_if_prompted(&menu, &path, Duration::ZERO).unwrap());
        assert_eq!(bus.menu_selections(), vec![1]);
    }

    #[test]
    fn test_no_selection_without_file() {
        let dir = tempdir().unwrap();
        let bus = MemorySimBus::new();
        let menu = GsxMenu::new(&bus, Duration::from_millis(10));
        let missing = dir.path().join("menu");
        assert!(!select_operator_if_prompted(&menu, &missing, Duration::ZERO).unwrap());
        assert!(bus.menu_selections().is_empty());
    }
}
