/// Step counter over a fixed race day.
///
/// The engine ticks the clock once per vehicle update; the clock knows
/// nothing about seconds, only step indices.
///
/// # Examples
///
/// ```
/// use vehicle_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3);
/// let mut steps = Vec::new();
///
/// while let Some(step) = clock.tick() {
///     steps.push(step);
/// }
/// assert_eq!(steps, vec![0, 1, 2]);
/// assert!(clock.is_done());
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    current: usize,
    total: usize,
}

impl Clock {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(step)` - The step index (starting from 0) before advancing
    /// * `None` - If every step has been taken
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some(step)
        } else {
            None
        }
    }

    /// Number of steps already taken.
    pub fn elapsed(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_done(&self) -> bool {
        self.current >= self.total
    }
}
