use super::action::Direction;

/// A cell on the game grid; may lie outside the grid after a fatal move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Square coordinate space of fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    pub fn center(&self) -> Position {
        let mid = (self.size / 2) as i32;
        Position::new(mid, mid)
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        let size = self.size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// Directions that keep `from` inside the grid after one step
    pub fn safe_directions(&self, from: Position) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.contains(from.moved_in_direction(*dir)))
            .collect()
    }
}

/// Who decides where a snake goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    /// Driven by keyboard input
    Player,
    /// Random reactive wandering, see [`crate::game::policy`]
    Wander,
}

/// A snake on the board, player or AI
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction committed on the last move
    pub direction: Direction,
    /// Direction that will be committed on the next move
    pub pending_direction: Direction,
    pub controller: Controller,
    pub alive: bool,
    /// Session time of the last death
    pub death_time: Option<u64>,
    /// Milliseconds between moves
    pub speed: u64,
    pub base_speed: u64,
    /// Session time of the last committed move
    pub last_move_time: u64,
    /// Cell the snake re-enters at when revived
    pub spawn_position: Position,
    /// Segments still to be added on upcoming moves
    pub pending_growth: usize,
    initial_length: usize,
}

impl Snake {
    /// Create a snake whose head sits on `spawn`
    ///
    /// Only the head is placed; the rest of the initial length is pending
    /// growth that unfolds one segment per move, so the body never holds
    /// the same cell twice.
    pub fn new(
        spawn: Position,
        controller: Controller,
        initial_length: usize,
        base_speed: u64,
        now: u64,
    ) -> Self {
        let initial_length = initial_length.max(1);
        Self {
            body: vec![spawn],
            direction: Direction::Right,
            pending_direction: Direction::Right,
            controller,
            alive: true,
            death_time: None,
            speed: base_speed,
            base_speed,
            last_move_time: now,
            spawn_position: spawn,
            pending_growth: initial_length - 1,
            initial_length,
        }
    }

    pub fn is_player(&self) -> bool {
        self.controller == Controller::Player
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Logical length, counting growth that has not unfolded yet
    pub fn len(&self) -> usize {
        self.body.len() + self.pending_growth
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Queue a turn; a reversal of the committed direction is ignored
    pub fn set_direction(&mut self, direction: Direction) {
        if !self.direction.is_opposite(direction) {
            self.pending_direction = direction;
        }
    }

    /// Flip between base speed and `boosted` speed
    pub fn toggle_boost(&mut self, boosted: u64) {
        self.speed = if self.speed == self.base_speed {
            boosted
        } else {
            self.base_speed
        };
    }

    /// Advance one cell if `speed` ms have passed since the last move
    ///
    /// Returns whether the snake moved.
    pub fn update(&mut self, now: u64) -> bool {
        if !self.alive || now.saturating_sub(self.last_move_time) < self.speed {
            return false;
        }

        self.direction = self.pending_direction;
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop();
        }

        self.last_move_time = now;
        true
    }

    /// Add one segment, realised on the next move
    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    /// Remove `count` segments from the tail, never dropping the head
    ///
    /// Growth that has not unfolded yet is cancelled first.
    pub fn truncate_tail(&mut self, count: usize) {
        let from_pending = count.min(self.pending_growth);
        self.pending_growth -= from_pending;

        let keep = self.body.len().saturating_sub(count - from_pending).max(1);
        self.body.truncate(keep);
    }

    pub fn die(&mut self, now: u64) {
        self.alive = false;
        self.death_time = Some(now);
    }

    /// Put the snake back at its spawn cell at initial length and base speed
    pub fn revive(&mut self, now: u64) {
        self.body = vec![self.spawn_position];
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.alive = true;
        self.speed = self.base_speed;
        self.last_move_time = now;
        self.pending_growth = self.initial_length - 1;
    }

    /// Cells that turn into food when this snake dies, one per unit of length
    ///
    /// Growth that has not unfolded yet is dropped on the tail cell.
    pub fn remains(&self) -> impl Iterator<Item = Position> + '_ {
        self.body
            .iter()
            .copied()
            .chain(std::iter::repeat_n(self.tail(), self.pending_growth))
    }
}

/// A consumable item on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    pub score: u32,
}

impl Food {
    pub fn new(position: Position, score: u32) -> Self {
        Self { position, score }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// The player was killed by a wall or another snake
    PlayerDied,
    /// The time limit expired
    TimeUp,
}

/// Terminal state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub reason: GameOverReason,
    /// Score accumulated before the fatal tick's deaths were applied
    pub final_score: u32,
}

/// Complete state of one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    /// All snakes; indices are stable for the whole session
    pub snakes: Vec<Snake>,
    pub foods: Vec<Food>,
    /// Index of the player snake in `snakes`
    pub player: usize,
    pub score: u32,
    /// Milliseconds since session start, as of the last tick
    pub elapsed_ms: u64,
    pub outcome: Option<GameOver>,
}

impl GameState {
    /// Create a session holding only the player snake
    pub fn new(grid: Grid, player: Snake) -> Self {
        Self {
            grid,
            snakes: vec![player],
            foods: Vec::new(),
            player: 0,
            score: 0,
            elapsed_ms: 0,
            outcome: None,
        }
    }

    pub fn player(&self) -> &Snake {
        &self.snakes[self.player]
    }

    pub fn player_mut(&mut self) -> &mut Snake {
        &mut self.snakes[self.player]
    }

    pub fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    /// Check if a position is covered by any living snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snakes
            .iter()
            .filter(|snake| snake.alive)
            .any(|snake| snake.body.contains(&pos))
    }

    /// Milliseconds left before the time limit, saturating at zero
    pub fn remaining_ms(&self, time_limit_ms: u64) -> u64 {
        time_limit_ms.saturating_sub(self.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_at(x: i32, y: i32) -> Snake {
        Snake::new(Position::new(x, y), Controller::Player, 5, 200, 0)
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
        assert_eq!(pos.moved_in_direction(Direction::Left), Position::new(4, 5));
    }

    #[test]
    fn test_grid_bounds() {
        let grid = Grid::new(25);
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(24, 24)));
        assert!(!grid.contains(Position::new(-1, 0)));
        assert!(!grid.contains(Position::new(25, 3)));
        assert!(!grid.contains(Position::new(3, 25)));
        assert_eq!(grid.center(), Position::new(12, 12));
    }

    #[test]
    fn test_safe_directions_in_corner() {
        let grid = Grid::new(10);
        let safe = grid.safe_directions(Position::new(0, 0));
        assert_eq!(safe, vec![Direction::Down, Direction::Right]);
        assert_eq!(grid.safe_directions(Position::new(5, 5)).len(), 4);
    }

    #[test]
    fn test_new_snake_unfolds_from_head() {
        let snake = snake_at(3, 3);
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.body, vec![Position::new(3, 3)]);
        assert_eq!(snake.pending_growth, 4);
        assert_eq!(snake.direction, Direction::Right);
    }

    #[test]
    fn test_body_never_repeats_a_cell() {
        let mut snake = snake_at(3, 3);
        for step in 1..=8 {
            snake.update(step * 200);
            let mut cells = snake.body.clone();
            cells.sort_by_key(|p| (p.x, p.y));
            cells.dedup();
            assert_eq!(cells.len(), snake.body.len());
        }
    }

    #[test]
    fn test_update_is_gated_by_speed() {
        let mut snake = snake_at(3, 3);
        assert!(!snake.update(199));
        assert_eq!(snake.head(), Position::new(3, 3));

        assert!(snake.update(200));
        assert_eq!(snake.head(), Position::new(4, 3));
        assert_eq!(snake.len(), 5);

        // next move measured from the last committed move
        assert!(!snake.update(350));
        assert!(snake.update(400));
        assert_eq!(snake.head(), Position::new(5, 3));
    }

    #[test]
    fn test_body_unfolds_from_spawn() {
        let mut snake = snake_at(3, 3);
        for step in 1..=4 {
            snake.update(step * 200);
        }
        assert_eq!(
            snake.body,
            vec![
                Position::new(7, 3),
                Position::new(6, 3),
                Position::new(5, 3),
                Position::new(4, 3),
                Position::new(3, 3),
            ]
        );
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut snake = snake_at(3, 3);
        snake.set_direction(Direction::Left);
        assert_eq!(snake.pending_direction, Direction::Right);

        snake.set_direction(Direction::Up);
        assert_eq!(snake.pending_direction, Direction::Up);
        // not committed until the next move
        assert_eq!(snake.direction, Direction::Right);

        snake.update(200);
        assert_eq!(snake.direction, Direction::Up);
        assert_eq!(snake.head(), Position::new(3, 2));
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut snake = snake_at(3, 3);
        // Up then Left before a move: Left is checked against committed Right
        snake.set_direction(Direction::Up);
        snake.set_direction(Direction::Left);
        assert_eq!(snake.pending_direction, Direction::Up);
    }

    #[test]
    fn test_grow_is_permanent() {
        let mut snake = snake_at(3, 3);
        snake.grow();
        snake.grow();
        assert_eq!(snake.len(), 7);
        assert_eq!(snake.body.len(), 1);

        for step in 1..=6 {
            snake.update(step * 200);
            assert_eq!(snake.len(), 7);
        }
        assert_eq!(snake.body.len(), 7);
        assert_eq!(snake.pending_growth, 0);
    }

    #[test]
    fn test_truncate_tail_consumes_pending_growth_first() {
        let mut snake = snake_at(3, 3);
        for step in 1..=4 {
            snake.update(step * 200);
        }
        snake.grow();
        snake.truncate_tail(3);
        assert_eq!(snake.pending_growth, 0);
        assert_eq!(snake.len(), 3);

        snake.truncate_tail(10);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_toggle_boost() {
        let mut snake = snake_at(3, 3);
        snake.toggle_boost(100);
        assert_eq!(snake.speed, 100);
        snake.toggle_boost(100);
        assert_eq!(snake.speed, 200);
    }

    #[test]
    fn test_die_and_revive() {
        let mut snake = snake_at(3, 3);
        snake.set_direction(Direction::Down);
        snake.update(200);
        snake.grow();
        snake.toggle_boost(100);
        snake.die(500);

        assert!(!snake.alive);
        assert_eq!(snake.death_time, Some(500));
        assert!(!snake.update(10_000));

        snake.revive(3_500);
        assert!(snake.alive);
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.body, vec![Position::new(3, 3)]);
        assert_eq!(snake.direction, Direction::Right);
        assert_eq!(snake.speed, 200);
        assert_eq!(snake.last_move_time, 3_500);
    }

    #[test]
    fn test_remains_cover_logical_length() {
        let mut snake = snake_at(3, 3);
        snake.update(200);
        snake.grow();
        let remains: Vec<_> = snake.remains().collect();
        assert_eq!(remains.len(), snake.len());
        assert_eq!(remains[0], Position::new(4, 3));
        assert_eq!(remains[5], snake.tail());
    }

    #[test]
    fn test_occupancy_ignores_dead_snakes() {
        let grid = Grid::new(10);
        let mut state = GameState::new(grid, snake_at(2, 2));
        state.snakes.push(Snake::new(
            Position::new(6, 6),
            Controller::Wander,
            5,
            200,
            0,
        ));

        assert!(state.is_occupied_by_snake(Position::new(6, 6)));
        state.snakes[1].die(0);
        assert!(!state.is_occupied_by_snake(Position::new(6, 6)));
        assert!(state.is_occupied_by_snake(Position::new(2, 2)));
    }
}
