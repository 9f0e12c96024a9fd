//! Core type definitions for the application

/// Which section of the UI is visible
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    #[default]
    Home,
    Search,
    Download,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Home => ActiveSection::Search,
            ActiveSection::Search => ActiveSection::Download,
            ActiveSection::Download => ActiveSection::Home,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Home => ActiveSection::Download,
            ActiveSection::Search => ActiveSection::Home,
            ActiveSection::Download => ActiveSection::Search,
        }
    }
}

/// A tab in the navigation bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// `None` for reserved entries that cannot be opened yet
    pub section: Option<ActiveSection>,
}

pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem { label: "Home", section: Some(ActiveSection::Home) },
    NavItem { label: "Search", section: Some(ActiveSection::Search) },
    NavItem { label: "Library", section: None },
    NavItem { label: "Download", section: Some(ActiveSection::Download) },
];

/// Status line of the download section
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadStatus {
    MissingUrl,
    Started { url: String },
}

/// The credential editor overlay
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsEditor {
    pub input: String,
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    /// Keystrokes go to the search box rather than the result list
    pub search_editing: bool,
    pub grid_selected: usize,
    pub list_selected: usize,
    pub download_input: String,
    pub download_status: Option<DownloadStatus>,
    pub error_message: Option<String>,
    /// Blocking alert that must be acknowledged
    pub alert: Option<String>,
    pub settings_editor: Option<SettingsEditor>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Home,
            search_query: String::new(),
            search_editing: true,
            grid_selected: 0,
            list_selected: 0,
            download_input: String::new(),
            download_status: None,
            error_message: None,
            alert: None,
            settings_editor: None,
            show_help_popup: false,
        }
    }
}
