//! Browser TUI state management.

use cinedex_search::{
    DetailController, DetailState, EnrichedRecord, NavigationContext, SearchView,
};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::TableState;

/// Input mode of the search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Query text input mode.
    Query,
}

/// Screen currently shown.
#[derive(Debug)]
pub enum Screen {
    /// Search results.
    Search,
    /// A single title.
    Detail(DetailController),
}

/// Work the event loop must perform after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do.
    None,
    /// Leave the browser.
    Quit,
    /// Submit query text.
    Submit(String),
    /// Fetch the next page.
    NextPage,
    /// Fetch the previous page.
    PreviousPage,
    /// Switch to the next media type filter.
    CycleFilter,
    /// Reset the search.
    Clear,
    /// Open the detail view for an identifier.
    OpenDetail(String),
    /// Return from the detail view.
    Back,
    /// Open the IMDb page for an identifier.
    OpenImdb(String),
}

/// State for the browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Latest copy of the search state.
    pub view: SearchView,
    /// Table state for the result list.
    pub table_state: TableState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Query text being edited.
    pub input: String,
    /// Current screen.
    pub screen: Screen,
}

impl BrowserState {
    /// Creates a state showing `view`.
    #[must_use]
    pub fn new(view: SearchView) -> Self {
        let input = view.query.text.clone();
        let mut state = Self {
            view,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            input,
            screen: Screen::Search,
        };
        state.clamp_selection();
        state
    }

    /// Replaces the search copy and keeps the cursor in range.
    pub fn sync(&mut self, view: SearchView) {
        self.view = view;
        self.clamp_selection();
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Returns the selected record (if any).
    #[must_use]
    pub fn selected(&self) -> Option<&EnrichedRecord> {
        self.view.results.get(self.table_state.selected()?)
    }

    /// Moves cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current - 1));
        }
    }

    /// Moves cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        let current = self.cursor();
        if current + 1 < self.view.results.len() {
            self.table_state.select(Some(current + 1));
        }
    }

    /// Switches to the detail screen.
    pub fn open_detail(&mut self, id: &str, context: NavigationContext) {
        self.input_mode = InputMode::Normal;
        self.screen = Screen::Detail(DetailController::mount(id, context));
    }

    /// Leaves the detail screen, returning its navigation context.
    pub fn close_detail(&mut self) -> Option<NavigationContext> {
        match std::mem::replace(&mut self.screen, Screen::Search) {
            Screen::Detail(detail) => Some(detail.go_back()),
            Screen::Search => None,
        }
    }

    /// Commits a detail load result if it belongs to the open view.
    pub fn apply_detail(&mut self, id: &str, result: DetailState) -> bool {
        match self.screen {
            Screen::Detail(ref mut detail) => detail.apply(id, result),
            Screen::Search => false,
        }
    }

    /// Maps a key press to an action, updating local state on the way.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Action {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        match self.screen {
            Screen::Detail(ref detail) => match key {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => Action::Back,
                KeyCode::Char('o') => Action::OpenImdb(String::from(detail.id())),
                _ => Action::None,
            },
            Screen::Search => match self.input_mode {
                InputMode::Query => self.handle_query_key(key),
                InputMode::Normal => self.handle_normal_key(key),
            },
        }
    }

    fn handle_query_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Esc => {
                self.input = self.view.query.text.clone();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return Action::Submit(self.input.clone());
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
            }
            _ => {}
        }
        Action::None
    }

    fn handle_normal_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Query;
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_up();
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_down();
                Action::None
            }
            KeyCode::Right | KeyCode::Char('n') => Action::NextPage,
            KeyCode::Left | KeyCode::Char('p') => Action::PreviousPage,
            KeyCode::Char('t') => Action::CycleFilter,
            KeyCode::Char('c') => {
                self.input.clear();
                Action::Clear
            }
            KeyCode::Enter => self
                .selected()
                .map_or(Action::None, |r| Action::OpenDetail(r.summary.id.clone())),
            _ => Action::None,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.view.results.len();
        if len == 0 {
            self.table_state.select(None);
        } else if self.table_state.selected().is_none_or(|i| i >= len) {
            self.table_state.select(Some(0));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinedex_api::omdb::{MovieDetails, SummaryRecord};
    use cinedex_search::{NavigationSnapshot, PLACEHOLDER_POSTER, PageMeta, SearchQuery};

    use super::*;

    fn record(id: &str) -> EnrichedRecord {
        EnrichedRecord::pending(SummaryRecord {
            id: String::from(id),
            title: format!("Title {id}"),
            year: String::from("2005"),
            poster_url: String::from("N/A"),
            media_type: String::from("movie"),
        })
    }

    fn view(ids: &[&str]) -> SearchView {
        SearchView {
            query: SearchQuery {
                text: String::from("batman"),
                ..SearchQuery::default()
            },
            meta: PageMeta {
                current_page: 1,
                total_pages: 3,
            },
            results: ids.iter().map(|id| record(id)).collect(),
            loading: false,
            hydrating: false,
            error: None,
        }
    }

    fn context() -> NavigationContext {
        NavigationContext::back_to_search(NavigationSnapshot {
            query: SearchQuery::default(),
            results: Vec::new(),
            current_page: 1,
            total_pages: 0,
        })
    }

    #[test]
    fn test_new_selects_first_row() {
        // Arrange & Act
        let state = BrowserState::new(view(&["tt1", "tt2"]));

        // Assert
        assert_eq!(state.table_state.selected(), Some(0));
        assert_eq!(state.input, "batman");
    }

    #[test]
    fn test_sync_clamps_cursor() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1", "tt2", "tt3"]));
        state.move_down();
        state.move_down();

        // Act
        state.sync(view(&["tt9"]));

        // Assert
        assert_eq!(state.cursor(), 0);

        // Act
        state.sync(view(&[]));

        // Assert
        assert!(state.table_state.selected().is_none());
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_move_stays_in_bounds() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1", "tt2"]));

        // Act
        state.move_up();
        state.move_down();
        state.move_down();

        // Assert
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_query_editing_submits_text() {
        // Arrange
        let mut state = BrowserState::new(view(&[]));
        state.input.clear();

        // Act
        state.handle_key(KeyCode::Char('/'), KeyModifiers::NONE);
        for c in "supermam".chars() {
            state.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        state.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        state.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        let action = state.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        // Assert
        assert_eq!(action, Action::Submit(String::from("superman")));
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_query_escape_restores_committed_text() {
        // Arrange
        let mut state = BrowserState::new(view(&[]));
        state.handle_key(KeyCode::Char('/'), KeyModifiers::NONE);
        state.handle_key(KeyCode::Char('x'), KeyModifiers::NONE);

        // Act
        let action = state.handle_key(KeyCode::Esc, KeyModifiers::NONE);

        // Assert
        assert_eq!(action, Action::None);
        assert_eq!(state.input, "batman");
    }

    #[test]
    fn test_normal_mode_keys() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1", "tt2"]));

        // Act & Assert
        let cases = [
            (KeyCode::Right, Action::NextPage),
            (KeyCode::Char('n'), Action::NextPage),
            (KeyCode::Left, Action::PreviousPage),
            (KeyCode::Char('p'), Action::PreviousPage),
            (KeyCode::Char('t'), Action::CycleFilter),
            (KeyCode::Char('q'), Action::Quit),
        ];
        for (key, expected) in cases {
            assert_eq!(state.handle_key(key, KeyModifiers::NONE), expected);
        }
    }

    #[test]
    fn test_enter_opens_selected_row() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1", "tt2"]));
        state.move_down();

        // Act
        let action = state.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        // Assert
        assert_eq!(action, Action::OpenDetail(String::from("tt2")));
    }

    #[test]
    fn test_enter_without_results_does_nothing() {
        // Arrange
        let mut state = BrowserState::new(view(&[]));

        // Act
        let action = state.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        // Assert
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_clear_empties_input() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1"]));

        // Act
        let action = state.handle_key(KeyCode::Char('c'), KeyModifiers::NONE);

        // Assert
        assert_eq!(action, Action::Clear);
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1"]));
        state.handle_key(KeyCode::Char('/'), KeyModifiers::NONE);

        // Act
        let action = state.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);

        // Assert
        assert_eq!(action, Action::Quit);
    }

    #[test]
    fn test_detail_screen_keys() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1"]));
        state.open_detail("tt1", context());

        // Act & Assert
        assert_eq!(
            state.handle_key(KeyCode::Char('o'), KeyModifiers::NONE),
            Action::OpenImdb(String::from("tt1"))
        );
        assert_eq!(
            state.handle_key(KeyCode::Esc, KeyModifiers::NONE),
            Action::Back
        );
        assert_eq!(
            state.handle_key(KeyCode::Char('b'), KeyModifiers::NONE),
            Action::Back
        );
        assert_eq!(
            state.handle_key(KeyCode::Char('n'), KeyModifiers::NONE),
            Action::None
        );
    }

    #[test]
    fn test_close_detail_returns_context() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1"]));
        state.open_detail("tt1", context());

        // Act
        let back = state.close_detail();

        // Assert
        assert_eq!(back, Some(context()));
        assert!(matches!(state.screen, Screen::Search));
        assert!(state.close_detail().is_none());
    }

    #[test]
    fn test_apply_detail_only_for_open_view() {
        // Arrange
        let mut state = BrowserState::new(view(&["tt1"]));
        let loaded = DetailState::Loaded {
            details: Box::new(MovieDetails {
                id: String::from("tt1"),
                ..MovieDetails::default()
            }),
            poster: String::from(PLACEHOLDER_POSTER),
        };

        // Act & Assert
        assert!(!state.apply_detail("tt1", loaded.clone()));
        state.open_detail("tt1", context());
        assert!(!state.apply_detail("tt2", loaded.clone()));
        assert!(state.apply_detail("tt1", loaded));
    }
}
