//! Timeline navigation over a recorded run
//!
//! [`Timeline`] owns the immutable step list a run produced and a cursor
//! over it. Moving the cursor never re-executes anything; stepping backward
//! is just reading an earlier snapshot. The cursor starts before the first
//! step, so the initial `advance` lands on step 0; once on a step it never
//! falls off either end.

use crate::snapshot::ExecutionStep;

/// Cursor over an immutable list of execution steps
#[derive(Debug, Default)]
pub struct Timeline {
    steps: Vec<ExecutionStep>,
    /// Index into `steps`; `None` while positioned before the first step
    current: Option<usize>,
}

impl Timeline {
    pub fn new(steps: Vec<ExecutionStep>) -> Self {
        Timeline {
            steps,
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    /// The step under the cursor, or `None` before the first advance
    pub fn current_step(&self) -> Option<&ExecutionStep> {
        self.current.map(|i| &self.steps[i])
    }

    /// Count of steps up to and including the cursor; 0 before the first step
    pub fn position(&self) -> usize {
        self.current.map_or(0, |i| i + 1)
    }

    /// Move one step forward. At the end the cursor stays put and `None`
    /// is returned.
    pub fn advance(&mut self) -> Option<&ExecutionStep> {
        let next = match self.current {
            None if !self.steps.is_empty() => 0,
            Some(i) if i + 1 < self.steps.len() => i + 1,
            _ => return None,
        };
        self.current = Some(next);
        Some(&self.steps[next])
    }

    /// Move one step backward. On the first step (and before the first
    /// advance) the cursor stays put and `None` is returned.
    pub fn retreat(&mut self) -> Option<&ExecutionStep> {
        match self.current {
            Some(i) if i > 0 => {
                self.current = Some(i - 1);
                Some(&self.steps[i - 1])
            }
            _ => None,
        }
    }

    /// Jump directly to the step with this number. Out-of-range targets
    /// leave the cursor unchanged.
    pub fn seek(&mut self, step_number: usize) -> Option<&ExecutionStep> {
        if step_number >= self.steps.len() {
            return None;
        }
        self.current = Some(step_number);
        Some(&self.steps[step_number])
    }

    /// Return the cursor to the before-start position
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::StepEvent;

    fn step(n: usize) -> ExecutionStep {
        ExecutionStep {
            step_number: n,
            line_number: n,
            source_line: format!("x = {}", n),
            variables: Vec::new(),
            event: StepEvent::Line,
            function_name: None,
            error: None,
            output: String::new(),
        }
    }

    fn timeline(count: usize) -> Timeline {
        Timeline::new((0..count).map(step).collect())
    }

    #[test]
    fn test_advance_from_start() {
        let mut timeline = timeline(3);
        assert!(timeline.current_step().is_none());
        assert_eq!(timeline.advance().unwrap().step_number, 0);
        assert_eq!(timeline.advance().unwrap().step_number, 1);
        assert_eq!(timeline.position(), 2);
    }

    #[test]
    fn test_advance_clamps_at_end() {
        let mut timeline = timeline(2);
        timeline.advance();
        timeline.advance();
        assert!(timeline.advance().is_none());
        assert_eq!(timeline.current_step().unwrap().step_number, 1);
    }

    #[test]
    fn test_retreat_clamps_at_first_step() {
        let mut timeline = timeline(3);
        timeline.seek(2);
        assert_eq!(timeline.retreat().unwrap().step_number, 1);
        assert_eq!(timeline.retreat().unwrap().step_number, 0);
        // Stepping back from the first step is a no-op
        assert!(timeline.retreat().is_none());
        assert_eq!(timeline.current_step().unwrap().step_number, 0);
        assert!(timeline.retreat().is_none());
        assert_eq!(timeline.current_step().unwrap().step_number, 0);
    }

    #[test]
    fn test_reset_returns_before_start() {
        let mut timeline = timeline(3);
        timeline.seek(2);
        timeline.reset();
        assert!(timeline.current_step().is_none());
        assert_eq!(timeline.position(), 0);
        assert_eq!(timeline.advance().unwrap().step_number, 0);
    }

    #[test]
    fn test_seek_bounds() {
        let mut timeline = timeline(3);
        assert_eq!(timeline.seek(1).unwrap().step_number, 1);
        assert!(timeline.seek(3).is_none());
        assert!(timeline.seek(usize::MAX).is_none());
        // Failed seek leaves the cursor in place
        assert_eq!(timeline.current_step().unwrap().step_number, 1);
    }

    #[test]
    fn test_navigation_is_read_only() {
        let mut timeline = timeline(3);
        timeline.seek(2);
        timeline.seek(0);
        timeline.seek(2);
        assert_eq!(timeline.current_step().unwrap().source_line, "x = 2");
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn test_empty_timeline() {
        let mut timeline = Timeline::new(Vec::new());
        assert!(timeline.is_empty());
        assert!(timeline.advance().is_none());
        assert!(timeline.retreat().is_none());
        assert!(timeline.seek(0).is_none());
    }
}
