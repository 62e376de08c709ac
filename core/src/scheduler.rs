//! Tick-driven repeating tasks
//!
//! Tasks carry no code; the scheduler only reports which tokens are due on
//! each tick and the owner decides what to run. Cancelling a token stops it
//! from ever being reported again.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

#[derive(Debug, Clone)]
struct Task {
    token: TaskToken,
    interval: u32,
    remaining: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_token: u64,
    ticks: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task due every `interval` ticks, first due `interval` ticks
    /// from now. An interval of 0 is treated as 1.
    pub fn schedule(&mut self, interval: u32) -> TaskToken {
        let interval = interval.max(1);
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.tasks.push(Task {
            token,
            interval,
            remaining: interval,
        });
        token
    }

    /// Returns false if the token was not active
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.token != token);
        self.tasks.len() != before
    }

    pub fn is_active(&self, token: TaskToken) -> bool {
        self.tasks.iter().any(|t| t.token == token)
    }

    /// Advance one tick and return the tokens due, in scheduling order
    pub fn tick(&mut self) -> Vec<TaskToken> {
        self.ticks += 1;
        let mut due = Vec::new();
        for task in &mut self.tasks {
            task.remaining -= 1;
            if task.remaining == 0 {
                task.remaining = task.interval;
                due.push(task.token);
            }
        }
        due
    }

    /// Ticks elapsed since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
