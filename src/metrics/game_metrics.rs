use std::time::{Duration, Instant};

/// Session clock and cross-session bookkeeping for the front-end
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new(high_score: u32) -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score,
            games_played: 0,
        }
    }

    /// Refresh `elapsed_time` and return it in milliseconds
    pub fn update(&mut self) -> u64 {
        self.elapsed_time = self.start_time.elapsed();
        self.elapsed_ms()
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed_time.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    /// Remaining time with one decimal, e.g. `Time 42.5s`
    pub fn format_remaining(remaining_ms: u64) -> String {
        format!("Time {:.1}s", remaining_ms as f64 / 1000.0)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_formatting() {
        assert_eq!(GameMetrics::format_remaining(90_000), "Time 90.0s");
        assert_eq!(GameMetrics::format_remaining(42_460), "Time 42.5s");
        assert_eq!(GameMetrics::format_remaining(0), "Time 0.0s");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new(10);

        metrics.on_game_over(5);
        assert_eq!(metrics.high_score, 10); // Should not decrease
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(15);
        assert_eq!(metrics.high_score, 15); // Should update
        assert_eq!(metrics.games_played, 2);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::default();
        std::thread::sleep(Duration::from_millis(50));

        assert!(metrics.update() >= 50);

        metrics.on_game_start();
        assert!(metrics.update() < 50);
    }
}
