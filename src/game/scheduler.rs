use std::collections::VecDeque;

/// Something a timer asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SpawnFood,
    SpawnAi,
}

/// Deadline-based timers polled once per tick
///
/// Holds one periodic food deadline and a queue of one-shot AI spawn
/// deadlines, all measured in ms since session start.
#[derive(Debug, Clone)]
pub struct Scheduler {
    food_interval_ms: u64,
    next_food_ms: u64,
    ai_spawns_ms: VecDeque<u64>,
}

impl Scheduler {
    pub fn new(food_interval_ms: u64, ai_spawn_times_ms: &[u64]) -> Self {
        let mut ai_spawns: Vec<u64> = ai_spawn_times_ms.to_vec();
        ai_spawns.sort_unstable();

        Self {
            food_interval_ms,
            next_food_ms: food_interval_ms,
            ai_spawns_ms: ai_spawns.into(),
        }
    }

    /// Return every event whose deadline is at or before `now`
    ///
    /// A periodic deadline missed several times fires once per missed period.
    pub fn poll(&mut self, now: u64) -> Vec<TimerEvent> {
        let mut events = Vec::new();

        while self.next_food_ms <= now {
            events.push(TimerEvent::SpawnFood);
            self.next_food_ms += self.food_interval_ms;
        }

        while self.ai_spawns_ms.front().is_some_and(|&due| due <= now) {
            self.ai_spawns_ms.pop_front();
            events.push(TimerEvent::SpawnAi);
        }

        events
    }
}
