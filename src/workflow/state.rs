use super::WorkflowContext;
use std::fmt;
use tracing::trace;

/// A step of the interactive workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    SourceInput,
    FormatSelection,
    MergeModeSelection,
    FilesSelection,
    Processing,
    Complete,
    /// Out-of-band state for recoverable mistakes.
    Error,
}

/// Successor and predecessor of a state in the fixed workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Option<WorkflowState>,
    pub back: Option<WorkflowState>,
}

impl WorkflowState {
    /// Row of the transition table for this state.
    pub const fn transition(self) -> Transition {
        use WorkflowState::*;
        let (next, back) = match self {
            SourceInput => (Some(FormatSelection), None),
            FormatSelection => (Some(MergeModeSelection), Some(SourceInput)),
            MergeModeSelection => (Some(FilesSelection), Some(FormatSelection)),
            FilesSelection => (Some(Processing), Some(MergeModeSelection)),
            Processing => (Some(Complete), None),
            Complete => (Some(SourceInput), None),
            Error => (Some(SourceInput), None),
        };
        Transition { next, back }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::SourceInput => "source input",
            WorkflowState::FormatSelection => "format selection",
            WorkflowState::MergeModeSelection => "merge mode selection",
            WorkflowState::FilesSelection => "files selection",
            WorkflowState::Processing => "processing",
            WorkflowState::Complete => "complete",
            WorkflowState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Current state, back-stack, and the context of one workflow run.
///
/// [`set_state`](Self::set_state) bypasses the transition table on purpose:
/// the error state is entered from anywhere and left by jumping straight
/// back to the state that failed.
#[derive(Debug, Clone)]
pub struct WorkflowStateMachine {
    state: WorkflowState,
    stack: Vec<WorkflowState>,
    context: WorkflowContext,
}

impl Default for WorkflowStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowStateMachine {
    pub fn new() -> Self {
        Self::with_state(WorkflowState::SourceInput)
    }

    pub fn with_state(initial: WorkflowState) -> Self {
        Self {
            state: initial,
            stack: Vec::new(),
            context: WorkflowContext::default(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Jump to `state` without touching the back-stack.
    pub fn set_state(&mut self, state: WorkflowState) {
        trace!(from = %self.state, to = %state, "direct state assignment");
        self.state = state;
    }

    /// Advance along the transition table, remembering where we came from.
    pub fn next(&mut self) {
        if let Some(next) = self.state.transition().next {
            trace!(from = %self.state, to = %next, "advance");
            self.stack.push(self.state);
            self.state = next;
        }
    }

    /// Return to the previously visited state, if any.
    pub fn back(&mut self) {
        if let Some(previous) = self.stack.pop() {
            trace!(from = %self.state, to = %previous, "back");
            self.state = previous;
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Start over: first state, no history, fresh context.
    pub fn reset(&mut self) {
        self.state = WorkflowState::SourceInput;
        self.stack.clear();
        self.context = WorkflowContext::default();
    }

    /// Previously visited states, oldest first.
    pub fn history(&self) -> &[WorkflowState] {
        &self.stack
    }

    pub fn context(&self) -> &WorkflowContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut WorkflowContext {
        &mut self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const MAIN_PATH: [WorkflowState; 6] = [
        WorkflowState::SourceInput,
        WorkflowState::FormatSelection,
        WorkflowState::MergeModeSelection,
        WorkflowState::FilesSelection,
        WorkflowState::Processing,
        WorkflowState::Complete,
    ];

    #[test]
    fn next_walks_the_main_path() {
        let mut sm = WorkflowStateMachine::new();
        for expected in MAIN_PATH {
            assert_eq!(sm.state(), expected);
            if expected != WorkflowState::Complete {
                sm.next();
            }
        }
        assert_eq!(sm.state(), WorkflowState::Complete);
        assert_eq!(sm.history(), &MAIN_PATH[..5]);
    }

    #[test]
    fn back_unwinds_to_start() {
        let mut sm = WorkflowStateMachine::new();
        for _ in 0..5 {
            sm.next();
        }
        for _ in 0..5 {
            sm.back();
        }
        assert_eq!(sm.state(), WorkflowState::SourceInput);
        assert!(!sm.can_go_back());
    }

    #[test]
    fn next_then_back_is_symmetric_for_every_depth() {
        for depth in 0..=7 {
            let mut sm = WorkflowStateMachine::new();
            for _ in 0..depth {
                sm.next();
            }
            for _ in 0..depth {
                sm.back();
            }
            assert_eq!(sm.state(), WorkflowState::SourceInput, "depth {depth}");
            assert!(!sm.can_go_back(), "depth {depth}");
        }
    }

    #[test]
    fn back_on_empty_stack_is_noop() {
        let mut sm = WorkflowStateMachine::new();
        sm.back();
        assert_eq!(sm.state(), WorkflowState::SourceInput);
    }

    #[test]
    fn complete_wraps_to_source_input() {
        let mut sm = WorkflowStateMachine::with_state(WorkflowState::Complete);
        sm.next();
        assert_eq!(sm.state(), WorkflowState::SourceInput);
        assert!(sm.can_go_back());
    }

    #[test]
    fn error_exits_to_source_input() {
        assert_eq!(
            WorkflowState::Error.transition().next,
            Some(WorkflowState::SourceInput)
        );
        assert_eq!(WorkflowState::Error.transition().back, None);
    }

    #[test]
    fn back_column_matches_predecessors() {
        for pair in MAIN_PATH[..4].windows(2) {
            assert_eq!(pair[1].transition().back, Some(pair[0]));
        }
        assert_eq!(WorkflowState::SourceInput.transition().back, None);
        assert_eq!(WorkflowState::Processing.transition().back, None);
    }

    #[test]
    fn reset_clears_state_stack_and_context() {
        let mut sm = WorkflowStateMachine::new();
        sm.next();
        sm.next();
        sm.context_mut().files.push(PathBuf::from("a.pdf"));
        sm.context_mut().merged_filename = Some("all".into());

        sm.reset();
        assert_eq!(sm.state(), WorkflowState::SourceInput);
        assert!(!sm.can_go_back());
        assert!(sm.context().files.is_empty());
        assert_eq!(sm.context(), &WorkflowContext::default());

        sm.reset();
        assert_eq!(sm.state(), WorkflowState::SourceInput);
    }

    #[test]
    fn set_state_does_not_touch_history() {
        let mut sm = WorkflowStateMachine::new();
        sm.next();
        sm.set_state(WorkflowState::Error);
        assert_eq!(sm.history(), &[WorkflowState::SourceInput]);
        sm.set_state(WorkflowState::FormatSelection);
        assert_eq!(sm.state(), WorkflowState::FormatSelection);
    }
}
