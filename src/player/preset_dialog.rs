//! Modal state for the save-preset dialog.
//!
//! The dialog pairs a free-form name field with the list of presets already
//! on disk, so a set can be saved under a new name or written over an
//! existing one without retyping it.

/// Which pane of the dialog receives typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogFocus {
    NameInput,
    PresetList,
}

#[derive(Clone)]
pub struct PresetDialog {
    pub name: String,
    pub existing: Vec<String>,
    pub selected_index: usize,
    pub focus: DialogFocus,
}

impl PresetDialog {
    pub fn new(suggested_name: String, existing: Vec<String>) -> Self {
        Self {
            name: suggested_name,
            existing,
            selected_index: 0,
            focus: DialogFocus::NameInput,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DialogFocus::NameInput => DialogFocus::PresetList,
            DialogFocus::PresetList => DialogFocus::NameInput,
        };
    }

    pub fn navigate_up(&mut self) {
        if self.focus == DialogFocus::PresetList {
            self.selected_index = self.selected_index.saturating_sub(1);
        }
    }

    pub fn navigate_down(&mut self) {
        if self.focus == DialogFocus::PresetList && !self.existing.is_empty() {
            self.selected_index = (self.selected_index + 1).min(self.existing.len() - 1);
        }
    }

    /// Copy the highlighted preset name into the field and hand focus back
    /// to it, ready for Enter to overwrite.
    pub fn adopt_selected(&mut self) {
        if let Some(name) = self.existing.get(self.selected_index) {
            self.name = name.clone();
            self.focus = DialogFocus::NameInput;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.focus == DialogFocus::NameInput {
            self.name.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.focus == DialogFocus::NameInput {
            self.name.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog() -> PresetDialog {
        PresetDialog::new(
            "gig".to_string(),
            vec!["ambient_set".to_string(), "drums".to_string()],
        )
    }

    #[test]
    fn test_new_focuses_name_field() {
        let dialog = dialog();
        assert_eq!(dialog.focus, DialogFocus::NameInput);
        assert_eq!(dialog.name, "gig");
        assert_eq!(dialog.selected_index, 0);
    }

    #[test]
    fn test_typing_only_edits_name_field() {
        let mut dialog = dialog();
        dialog.push_char('2');
        assert_eq!(dialog.name, "gig2");
        dialog.pop_char();
        assert_eq!(dialog.name, "gig");

        dialog.toggle_focus();
        dialog.push_char('x');
        dialog.pop_char();
        assert_eq!(dialog.name, "gig");
    }

    #[test]
    fn test_navigation_clamps_to_list() {
        let mut dialog = dialog();
        dialog.toggle_focus();

        dialog.navigate_up();
        assert_eq!(dialog.selected_index, 0);

        dialog.navigate_down();
        dialog.navigate_down();
        dialog.navigate_down();
        assert_eq!(dialog.selected_index, 1);
    }

    #[test]
    fn test_navigation_ignored_when_name_focused() {
        let mut dialog = dialog();
        dialog.navigate_down();
        assert_eq!(dialog.selected_index, 0);
    }

    #[test]
    fn test_navigation_with_empty_list() {
        let mut dialog = PresetDialog::new(String::new(), Vec::new());
        dialog.toggle_focus();
        dialog.navigate_down();
        dialog.navigate_up();
        assert_eq!(dialog.selected_index, 0);
    }

    #[test]
    fn test_adopt_selected_copies_name_and_refocuses() {
        let mut dialog = dialog();
        dialog.toggle_focus();
        dialog.navigate_down();
        dialog.adopt_selected();
        assert_eq!(dialog.name, "drums");
        assert_eq!(dialog.focus, DialogFocus::NameInput);
    }
}
