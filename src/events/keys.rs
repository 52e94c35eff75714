//! Key bindings per input context.

/// The input context that determines which keys are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyContext {
    /// Navigating the table.
    #[default]
    Table,
    /// Typing into the search box.
    Search,
    /// Editing a row inline.
    Edit,
    /// The help screen is open.
    Help,
}

impl KeyContext {
    /// Heading used on the help screen.
    pub fn display(&self) -> &'static str {
        match self {
            KeyContext::Table => "Table",
            KeyContext::Search => "Search",
            KeyContext::Edit => "Edit",
            KeyContext::Help => "Help",
        }
    }
}

/// A documented key binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    /// Key as shown to the user.
    pub key: &'static str,
    /// What the key does.
    pub description: &'static str,
}

const fn bind(key: &'static str, description: &'static str) -> Keybinding {
    Keybinding { key, description }
}

const TABLE_BINDINGS: &[Keybinding] = &[
    bind("j / ↓", "Move cursor down"),
    bind("k / ↑", "Move cursor up"),
    bind("l / →", "Next page"),
    bind("h / ←", "Previous page"),
    bind("Home / End", "First / last page"),
    bind("1-9", "Jump to page"),
    bind("Space", "Select or deselect row"),
    bind("a", "Select or deselect page"),
    bind("e / Enter", "Edit row"),
    bind("d", "Delete row"),
    bind("D", "Delete selected rows"),
    bind("/", "Search"),
    bind("r", "Reload after a failed load"),
    bind("?", "Show help"),
    bind("q / Ctrl+C", "Quit"),
];

const SEARCH_BINDINGS: &[Keybinding] = &[
    bind("type", "Filter by name, email or role"),
    bind("Ctrl+U", "Clear query"),
    bind("Enter", "Back to table"),
    bind("Esc", "Clear query and back to table"),
];

const EDIT_BINDINGS: &[Keybinding] = &[
    bind("type", "Edit focused field"),
    bind("Tab", "Next field"),
    bind("Shift+Tab", "Previous field"),
    bind("Enter", "Save row"),
    bind("Esc", "Discard changes"),
];

/// All documented bindings, grouped by context.
pub fn get_keybindings_grouped() -> Vec<(KeyContext, Vec<Keybinding>)> {
    vec![
        (KeyContext::Table, TABLE_BINDINGS.to_vec()),
        (KeyContext::Search, SEARCH_BINDINGS.to_vec()),
        (KeyContext::Edit, EDIT_BINDINGS.to_vec()),
    ]
}

/// Get the short hint line for a context.
///
/// Keys are wrapped in brackets so the help bar can style them.
pub fn get_context_hints(context: KeyContext) -> &'static str {
    match context {
        KeyContext::Table => {
            "[j/k] move  [h/l] page  [Space] select  [a] select page  [e] edit  [d] delete  [D] delete selected  [/] search  [?] help  [q] quit"
        }
        KeyContext::Search => "[type] filter  [Enter] done  [Esc] clear",
        KeyContext::Edit => "[type] edit  [Tab] next field  [Enter] save  [Esc] cancel",
        KeyContext::Help => "[j/k] scroll  [Esc/q] close help",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_context_has_hints() {
        for context in [
            KeyContext::Table,
            KeyContext::Search,
            KeyContext::Edit,
            KeyContext::Help,
        ] {
            assert!(get_context_hints(context).starts_with('['));
        }
    }

    #[test]
    fn test_edit_hints_mention_cancel() {
        assert!(get_context_hints(KeyContext::Edit).contains("cancel"));
    }

    #[test]
    fn test_grouped_bindings_cover_input_contexts() {
        let grouped = get_keybindings_grouped();
        let contexts: Vec<KeyContext> = grouped.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            contexts,
            vec![KeyContext::Table, KeyContext::Search, KeyContext::Edit]
        );
        assert!(grouped.iter().all(|(_, bindings)| !bindings.is_empty()));
    }

    #[test]
    fn test_bulk_delete_is_documented() {
        let grouped = get_keybindings_grouped();
        let (_, table) = &grouped[0];
        assert!(table.iter().any(|b| b.key == "D"));
    }
}
