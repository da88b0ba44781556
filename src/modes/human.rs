use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::game::{Action, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::storage::HighScoreStore;

/// Nominal 60 Hz loop; each snake still moves at its own speed
const TICK_INTERVAL: Duration = Duration::from_millis(16);

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    store: HighScoreStore,
    should_quit: bool,
    pending_actions: Vec<Action>,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: HighScoreStore) -> Self {
        let renderer = Renderer::new(config.time_limit_ms);
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        let high_score = store.load();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(high_score),
            renderer,
            input_handler: InputHandler::new(),
            store,
            should_quit: false,
            pending_actions: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(TICK_INTERVAL);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.metrics.on_game_start();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // One simulation tick followed by one frame
                _ = tick_timer.tick() => {
                    if self.state.is_running() {
                        self.update_game();
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            // the game-over screen is modal: only retry and quit get through
            KeyAction::GameAction(action) if self.state.is_running() => {
                self.pending_actions.push(action);
            }
            KeyAction::Retry if !self.state.is_running() => {
                self.reset_game();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn update_game(&mut self) {
        let now = self.metrics.update();
        let actions = std::mem::take(&mut self.pending_actions);

        let result = self.engine.step(&mut self.state, now, &actions);

        if let Some(outcome) = result.outcome {
            self.finish_session(outcome.final_score);
        }
    }

    fn finish_session(&mut self, final_score: u32) {
        self.metrics.on_game_over(final_score);
        let high_score = match self.store.record(final_score) {
            Ok(high_score) => high_score,
            Err(err) => {
                warn!(?err, "could not persist high score");
                self.metrics.high_score
            }
        };
        self.metrics.high_score = self.metrics.high_score.max(high_score);
        info!(final_score, high_score = self.metrics.high_score, "game over");
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.pending_actions.clear();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
