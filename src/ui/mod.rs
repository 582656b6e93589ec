//! UI-agnostic page controls touched by caption generation
//!
//! The page owns a trigger button and a caption selection control. Both are
//! plain data so any front end (terminal, webview bridge, tests) can render
//! them after an invocation.

use serde::Serialize;

/// Id of the option group that holds AI captions
pub const AI_GROUP_ID: &str = "ai-optgroup";
pub const AI_GROUP_LABEL: &str = "🤖 AI Generated Captions";

// ============================================================================
// Trigger button
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ButtonState {
    #[default]
    Idle,
    Busy,
}

impl ButtonState {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonState::Idle => "✨ Generate with AI",
            ButtonState::Busy => "Generating...",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ButtonState::Idle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriggerButton {
    state: ButtonState,
}

impl TriggerButton {
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn label(&self) -> &'static str {
        self.state.label()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Mark the button busy until the returned guard is dropped.
    ///
    /// `observer` hears both transitions, so a renderer can show
    /// "Generating..." while the page itself is borrowed.
    pub fn busy<'a>(&'a mut self, observer: &'a dyn CaptionObserver) -> BusyGuard<'a> {
        self.state = ButtonState::Busy;
        observer.button_changed(ButtonState::Busy);
        BusyGuard {
            button: self,
            observer,
        }
    }
}

/// Restores the button to `Idle` on drop, whichever way the invocation ends
#[must_use = "the button returns to idle as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    button: &'a mut TriggerButton,
    observer: &'a dyn CaptionObserver,
}

impl BusyGuard<'_> {
    pub fn state(&self) -> ButtonState {
        self.button.state
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.button.state = ButtonState::Idle;
        self.observer.button_changed(ButtonState::Idle);
    }
}

// ============================================================================
// Caption selection control
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptionOption {
    pub value: String,
    pub text: String,
}

impl CaptionOption {
    /// Option whose value and display text are the same caption
    pub fn caption(caption: impl Into<String>) -> Self {
        let caption = caption.into();
        Self {
            value: caption.clone(),
            text: caption,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    pub id: String,
    pub label: String,
    pub options: Vec<CaptionOption>,
}

impl OptionGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            options: Vec::new(),
        }
    }

    pub fn push(&mut self, option: CaptionOption) {
        self.options.push(option);
    }

    pub fn values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }
}

/// A select control with loose options followed by option groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptionSelect {
    options: Vec<CaptionOption>,
    groups: Vec<OptionGroup>,
    value: Option<String>,
}

impl CaptionSelect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ungrouped option; the first option added becomes selected
    pub fn add_option(&mut self, option: CaptionOption) {
        if self.value.is_none() {
            self.value = Some(option.value.clone());
        }
        self.options.push(option);
    }

    pub fn add_group(&mut self, group: OptionGroup) {
        if self.value.is_none() {
            self.value = group.options.first().map(|o| o.value.clone());
        }
        self.groups.push(group);
    }

    /// Remove every group with `id`. Returns whether anything was removed.
    pub fn remove_group(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        let removed = self.groups.len() != before;

        if removed && !self.value.as_deref().is_some_and(|v| self.contains(v)) {
            let first = self.iter_options().next().map(|o| o.value.clone());
            self.value = first;
        }
        removed
    }

    pub fn group(&self, id: &str) -> Option<&OptionGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    /// Select the option with `value`; unknown values leave the selection alone
    pub fn set_value(&mut self, value: &str) -> bool {
        if self.contains(value) {
            self.value = Some(value.to_string());
            true
        } else {
            false
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.iter_options().any(|o| o.value == value)
    }

    /// All option values in display order
    pub fn options(&self) -> Vec<&str> {
        self.iter_options().map(|o| o.value.as_str()).collect()
    }

    fn iter_options(&self) -> impl Iterator<Item = &CaptionOption> {
        self.options
            .iter()
            .chain(self.groups.iter().flat_map(|g| g.options.iter()))
    }
}

// ============================================================================
// Page and collaborators
// ============================================================================

/// The two controls a generation run reads and writes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptionPage {
    pub button: TriggerButton,
    pub select: CaptionSelect,
}

impl CaptionPage {
    pub fn new(select: CaptionSelect) -> Self {
        Self {
            button: TriggerButton::default(),
            select,
        }
    }
}

/// Blocking user-facing notice (an alert on a web page)
pub trait UserNotifier {
    fn notify(&self, message: &str);
}

impl<F: Fn(&str)> UserNotifier for F {
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Told when the selected caption changes so dependent UI can refresh
pub trait CaptionObserver {
    fn caption_changed(&self, caption: &str);

    /// Trigger button entered or left `Busy`
    fn button_changed(&self, _state: ButtonState) {}
}

impl<F: Fn(&str)> CaptionObserver for F {
    fn caption_changed(&self, caption: &str) {
        self(caption)
    }
}
