//! TUI effects boundary: event loop, terminal lifecycle, input mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui,
//! and is the only place that reads a clock.
//!
//! Architecture: two producer threads feed a single mpsc channel.
//! - Input reader thread: forwards crossterm key and mouse events
//! - Frame clock thread: sends a tick every frame so animations advance
//! The event loop consumes from the channel, dispatching to pure handlers.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::stack::{CardStack, DecisionSink};
use crate::types::Direction;

use super::state::{Action, App, AppEvent, Transition};
use super::update::update;
use super::view::render;

/// Time between animation frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// ============================================================================
// INPUT MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        // Keyboard drag
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Nudge(Direction::Discard)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Nudge(Direction::Accept)),
        KeyCode::Enter => Some(Action::Release),

        // One-key swipes
        KeyCode::Char('a') => Some(Action::Swipe(Direction::Discard)),
        KeyCode::Char('d') => Some(Action::Swipe(Direction::Accept)),

        KeyCode::Char(' ') | KeyCode::Char('f') => Some(Action::Flip),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

/// Map a crossterm mouse event to a semantic Action.
///
/// Only the left button drives the card.
pub fn map_mouse(mouse: MouseEvent) -> Option<Action> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::PointerDown { column, row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Action::PointerDrag { column, row }),
        MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp),
        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards keys and mouse
/// events to the channel.
fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let event = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
                Ok(_) => continue, // resize, focus, key release
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                break; // receiver dropped, TUI is shutting down
            }
        }
    });
}

/// Spawn a thread that sends a tick every frame.
fn spawn_frame_clock(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            thread::sleep(FRAME_INTERVAL);
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI over `stack` until the user quits.
///
/// Returns the stack's sink so the caller can report on the session.
pub fn run<S: DecisionSink>(stack: CardStack<S>) -> io::Result<S> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(stack);

    let (tx, rx) = mpsc::channel::<AppEvent>();

    // Spawn producer threads
    spawn_input_reader(tx.clone());
    spawn_frame_clock(tx);

    let epoch = Instant::now();

    loop {
        let now = epoch.elapsed();
        terminal.draw(|frame| render(&app, now, frame))?;

        if app.should_quit {
            break;
        }

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => break, // all senders dropped
        };

        let now = epoch.elapsed();
        let action = match event {
            AppEvent::Tick => {
                app.stack.tick(now);
                continue;
            }
            AppEvent::Key(key) => map_key(key),
            AppEvent::Mouse(mouse) => map_mouse(mouse),
        };

        if let Some(action) = action {
            handle_action(&mut app, &action, now);
        }
    }

    restore_terminal()?;
    let sink = app.stack.into_sink();
    debug!("tui closed");
    Ok(sink)
}

/// Run an action through the pure transition and feed its inputs to the
/// stack, all at the same `now`.
fn handle_action<S: DecisionSink>(app: &mut App<S>, action: &Action, now: Duration) {
    let view = app.stack_view();
    let ui = std::mem::take(&mut app.ui);

    match update(ui, action, &view) {
        Transition::Step { ui, inputs } => {
            app.ui = ui;
            for input in inputs {
                app.stack.dispatch(input, now);
            }
        }
        Transition::Quit => {
            app.should_quit = true;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
