use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

/// What occupies a grid cell in the drawn frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Food(u32),
    PlayerHead,
    PlayerBody,
    AiHead,
    AiBody,
}

pub struct Renderer {
    time_limit_ms: u64,
}

impl Renderer {
    pub fn new(time_limit_ms: u64) -> Self {
        Self { time_limit_ms }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        // Side panels around the arena
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(18),
                Constraint::Min(0),
                Constraint::Length(18),
            ])
            .split(chunks[1]);

        frame.render_widget(self.render_high_score(metrics), columns[0]);

        if let Some(outcome) = state.outcome {
            let game_over = self.render_game_over(outcome.final_score, metrics);
            frame.render_widget(game_over, columns[1]);
        } else {
            let grid = self.render_grid(state);
            frame.render_widget(grid, columns[1]);
        }

        frame.render_widget(self.render_clock(state), columns[2]);

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn cells(&self, state: &GameState) -> Vec<Cell> {
        let size = state.grid.size();
        let mut cells = vec![Cell::Empty; size * size];
        let slot = |pos: Position| {
            state
                .grid
                .contains(pos)
                .then(|| pos.y as usize * size + pos.x as usize)
        };

        for food in &state.foods {
            if let Some(i) = slot(food.position) {
                cells[i] = Cell::Food(food.score);
            }
        }

        // player drawn last so it stays visible when overlapping
        let mut snakes: Vec<_> = state.snakes.iter().filter(|s| s.alive).collect();
        snakes.sort_by_key(|s| s.is_player());
        for snake in snakes {
            let (head, body) = if snake.is_player() {
                (Cell::PlayerHead, Cell::PlayerBody)
            } else {
                (Cell::AiHead, Cell::AiBody)
            };
            for pos in snake.body_segments() {
                if let Some(i) = slot(*pos) {
                    cells[i] = body;
                }
            }
            if let Some(i) = slot(snake.head()) {
                cells[i] = head;
            }
        }

        cells
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let size = state.grid.size();
        let cells = self.cells(state);

        let lines: Vec<Line> = cells
            .chunks(size.max(1))
            .map(|row| Line::from(row.iter().map(|cell| cell_span(*cell)).collect::<Vec<_>>()))
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake Arena "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let living_ai = state
            .snakes
            .iter()
            .filter(|s| s.alive && !s.is_player())
            .count();
        let boost = if state.player().speed < state.player().base_speed {
            "ON"
        } else {
            "off"
        };

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Rivals: ", Style::default().fg(Color::Yellow)),
            Span::styled(living_ai.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Boost: ", Style::default().fg(Color::Yellow)),
            Span::styled(boost, Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_high_score(&self, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(Span::styled(
                "High Score:",
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(
                metrics.high_score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(text).block(Block::default().borders(Borders::ALL))
    }

    fn render_clock(&self, state: &GameState) -> Paragraph<'_> {
        let remaining = state.remaining_ms(self.time_limit_ms);
        let color = if remaining <= 10_000 {
            Color::Red
        } else {
            Color::White
        };

        Paragraph::new(Line::from(Span::styled(
            GameMetrics::format_remaining(remaining),
            Style::default().fg(color),
        )))
        .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over(&self, final_score: u32, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score : ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score : ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " R  Retry ",
                    Style::default()
                        .fg(Color::Red)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled(
                    " Q  Quit ",
                    Style::default()
                        .fg(Color::Red)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("J", Style::default().fg(Color::Cyan)),
            Span::raw(" boost | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        Cell::Food(score) => Span::styled(
            "O ",
            Style::default()
                .fg(food_color(score))
                .add_modifier(Modifier::BOLD),
        ),
        Cell::PlayerHead => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::PlayerBody => Span::styled("□ ", Style::default().fg(Color::Green)),
        Cell::AiHead => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::AiBody => Span::styled("□ ", Style::default().fg(Color::Red)),
    }
}

/// Richer food gets a warmer color
fn food_color(score: u32) -> Color {
    match score {
        0..=100 => Color::Blue,
        101..=150 => Color::Cyan,
        151..=200 => Color::Yellow,
        201..=250 => Color::Magenta,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Controller, Food, GameConfig, GameEngine, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_cells_layering() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        state.foods.push(Food::new(Position::new(0, 0), 300));
        state.foods.push(Food::new(Position::new(-1, 0), 100));
        let mut ai = Snake::new(Position::new(5, 5), Controller::Wander, 5, 200, 0);
        ai.body = vec![Position::new(5, 6), Position::new(5, 5)];
        state.snakes.push(ai);

        let cells = Renderer::new(90_000).cells(&state);

        assert_eq!(cells[0], Cell::Food(300));
        // player head wins over the AI body segment
        assert_eq!(cells[5 * 10 + 5], Cell::PlayerHead);
        assert_eq!(cells[6 * 10 + 5], Cell::AiHead);
        assert_eq!(cells.iter().filter(|c| **c == Cell::Food(100)).count(), 0);
    }

    #[test]
    fn test_renders_running_and_game_over_frames() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        let renderer = Renderer::new(90_000);
        let metrics = GameMetrics::new(1_200);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal
            .draw(|frame| renderer.render(frame, &state, &metrics))
            .unwrap();

        state.outcome = Some(crate::game::GameOver {
            reason: crate::game::GameOverReason::TimeUp,
            final_score: 350,
        });
        terminal
            .draw(|frame| renderer.render(frame, &state, &metrics))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("350"));
    }
}
