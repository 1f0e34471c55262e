//! Terminal movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Fetches run as tasks on the
//! current runtime; the loop redraws from the session's latest view.

/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cinedex_api::omdb::DirectoryApi;
use cinedex_api::probe::ImageProbe;
use cinedex_search::{DetailState, NavigationContext, SearchSession, imdb_url, load_details};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use self::state::{Action, BrowserState};

/// Delay between frames while idle; lets fetch tasks make progress.
const TICK: Duration = Duration::from_millis(50);

/// Runs the browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser<A, P>(session: SearchSession<A>, probe: Arc<P>) -> Result<()>
where
    A: DirectoryApi + Send + Sync + 'static,
    P: ImageProbe + Send + Sync + 'static,
{
    let mut state = BrowserState::new(session.view());

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &session, &probe).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A, P>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    session: &SearchSession<A>,
    probe: &Arc<P>,
) -> Result<()>
where
    A: DirectoryApi + Send + Sync + 'static,
    P: ImageProbe + Send + Sync + 'static,
{
    let (detail_tx, mut detail_rx) = mpsc::unbounded_channel::<(String, DetailState)>();

    loop {
        while let Ok((id, result)) = detail_rx.try_recv() {
            state.apply_detail(&id, result);
        }
        state.sync(session.view());

        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if event::poll(Duration::ZERO).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let action = state.handle_key(key.code, key.modifiers);
            if action == Action::Quit {
                return Ok(());
            }
            dispatch(action, state, session, probe, &detail_tx);
        } else {
            tokio::time::sleep(TICK).await;
        }
    }
}

/// Performs the work behind an action.
fn dispatch<A, P>(
    action: Action,
    state: &mut BrowserState,
    session: &SearchSession<A>,
    probe: &Arc<P>,
    detail_tx: &mpsc::UnboundedSender<(String, DetailState)>,
) where
    A: DirectoryApi + Send + Sync + 'static,
    P: ImageProbe + Send + Sync + 'static,
{
    match action {
        Action::None | Action::Quit => {}
        Action::Submit(text) => {
            let session = session.clone();
            tokio::spawn(async move { session.submit_query(&text).await });
        }
        Action::NextPage => {
            let session = session.clone();
            tokio::spawn(async move { session.next_page().await });
        }
        Action::PreviousPage => {
            let session = session.clone();
            tokio::spawn(async move { session.previous_page().await });
        }
        Action::CycleFilter => {
            let next = state.view.query.type_filter.next();
            let session = session.clone();
            tokio::spawn(async move { session.change_filter(next).await });
        }
        Action::Clear => session.clear(),
        Action::OpenDetail(id) => {
            // Going back restores this snapshot, so it must not be mid-fetch.
            let Some(snapshot) = session.settled_snapshot() else {
                tracing::debug!(id, "results still loading, detail not opened");
                return;
            };
            state.open_detail(&id, NavigationContext::back_to_search(snapshot));
            let api = Arc::clone(session.api());
            let probe = Arc::clone(probe);
            let tx = detail_tx.clone();
            tokio::spawn(async move {
                let result = load_details(api.as_ref(), probe.as_ref(), &id).await;
                // Receiver gone means the browser has exited.
                let _ = tx.send((id, result));
            });
        }
        Action::Back => {
            if let Some(context) = state.close_detail() {
                session.restore(context.search_state);
            }
        }
        Action::OpenImdb(id) => {
            let url = imdb_url(&id);
            if let Err(e) = open::that(&url) {
                tracing::debug!(url, "failed to open browser: {e}");
            }
        }
    }
}
