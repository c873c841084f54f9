use super::error::PreprocError;
use crate::core::source::Origin;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FrameKind {
    If,
    Elsif,
    Else,
}

/// One open conditional region. `skip` is the net effect for emission;
/// `any_taken_in_chain` remembers whether any sibling branch already fired.
#[derive(Debug, PartialEq, Clone)]
pub struct IfdefFrame {
    kind: FrameKind,
    taken: bool,
    any_taken_in_chain: bool,
    skip: bool,
    opened_at: Origin,
    directive: String,
}

/// The `` `ifdef ``/`` `endif `` nesting stack. Text is emitted only while
/// every frame on the stack has `skip == false`.
#[derive(Debug, PartialEq)]
pub struct ConditionStack {
    frames: Vec<IfdefFrame>,
}

impl ConditionStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Checks if emission is currently enabled.
    pub fn is_active(&self) -> bool {
        self.frames.iter().all(|f| f.skip == false)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Opens a new conditional region. `cond` is the evaluated
    /// `ifdef`/`ifndef` test for this branch.
    pub fn push(&mut self, cond: bool, opened_at: Origin, directive: &str) {
        let parent_active = self.is_active();
        let taken = parent_active == true && cond == true;
        self.frames.push(IfdefFrame {
            kind: FrameKind::If,
            taken: taken,
            any_taken_in_chain: taken,
            skip: taken == false,
            opened_at: opened_at,
            directive: directive.to_string(),
        });
    }

    /// Switches the innermost frame to an `elsif` branch. The previous
    /// branch must be `if` or `elsif`.
    pub fn elsif(&mut self, cond: bool, at: Origin) -> Result<(), PreprocError> {
        let parent_active = self
            .frames
            .split_last()
            .map(|(_, rest)| rest.iter().all(|f| f.skip == false))
            .unwrap_or(true);
        let frame = match self.frames.last_mut() {
            Some(f) => f,
            None => return Err(PreprocError::DanglingElse(at, "elsif".to_string())),
        };
        if frame.kind == FrameKind::Else {
            return Err(PreprocError::DanglingElse(at, "elsif".to_string()));
        }
        let taken =
            parent_active == true && frame.any_taken_in_chain == false && cond == true;
        frame.kind = FrameKind::Elsif;
        frame.taken = taken;
        frame.any_taken_in_chain = frame.any_taken_in_chain || taken;
        frame.skip = taken == false;
        Ok(())
    }

    /// Switches the innermost frame to its `else` branch.
    pub fn orelse(&mut self, at: Origin) -> Result<(), PreprocError> {
        let parent_active = self
            .frames
            .split_last()
            .map(|(_, rest)| rest.iter().all(|f| f.skip == false))
            .unwrap_or(true);
        let frame = match self.frames.last_mut() {
            Some(f) => f,
            None => return Err(PreprocError::DanglingElse(at, "else".to_string())),
        };
        if frame.kind == FrameKind::Else {
            return Err(PreprocError::DanglingElse(at, "else".to_string()));
        }
        let taken = parent_active == true && frame.any_taken_in_chain == false;
        frame.kind = FrameKind::Else;
        frame.taken = taken;
        frame.any_taken_in_chain = frame.any_taken_in_chain || taken;
        frame.skip = taken == false;
        Ok(())
    }

    /// Closes the innermost conditional region.
    pub fn pop(&mut self, at: Origin) -> Result<(), PreprocError> {
        match self.frames.pop() {
            Some(_) => Ok(()),
            None => Err(PreprocError::DanglingEndif(at)),
        }
    }

    /// Verifies every region was closed by the end of the translation unit.
    pub fn finish(&mut self) -> Result<(), PreprocError> {
        match self.frames.pop() {
            Some(frame) => {
                self.frames.clear();
                Err(PreprocError::UnterminatedIfdef(
                    frame.opened_at,
                    frame.directive,
                ))
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize) -> Origin {
        Origin::new("t.v", line)
    }

    #[test]
    fn taken_and_else_branches() {
        let mut stack = ConditionStack::new();
        stack.push(true, at(1), "ifdef");
        assert_eq!(stack.is_active(), true);
        stack.orelse(at(2)).unwrap();
        assert_eq!(stack.is_active(), false);
        stack.pop(at(3)).unwrap();
        assert_eq!(stack.is_active(), true);
    }

    #[test]
    fn elsif_chain_takes_first_true_branch() {
        let mut stack = ConditionStack::new();
        stack.push(false, at(1), "ifdef");
        assert_eq!(stack.is_active(), false);
        stack.elsif(true, at(2)).unwrap();
        assert_eq!(stack.is_active(), true);
        // a later true branch must not re-open the chain
        stack.elsif(true, at(3)).unwrap();
        assert_eq!(stack.is_active(), false);
        stack.orelse(at(4)).unwrap();
        assert_eq!(stack.is_active(), false);
        stack.pop(at(5)).unwrap();
    }

    #[test]
    fn nested_skip_wins() {
        let mut stack = ConditionStack::new();
        stack.push(false, at(1), "ifdef");
        stack.push(true, at(2), "ifdef");
        assert_eq!(stack.is_active(), false);
        // an else under a skipped parent stays dark
        stack.orelse(at(3)).unwrap();
        assert_eq!(stack.is_active(), false);
        stack.pop(at(4)).unwrap();
        stack.pop(at(5)).unwrap();
    }

    #[test]
    fn dangling_and_unterminated() {
        let mut stack = ConditionStack::new();
        assert!(matches!(
            stack.pop(at(1)),
            Err(PreprocError::DanglingEndif(_))
        ));
        assert!(matches!(
            stack.orelse(at(1)),
            Err(PreprocError::DanglingElse(..))
        ));
        stack.push(true, at(2), "ifndef");
        stack.orelse(at(3)).unwrap();
        // an elsif after else is a hard error
        assert!(matches!(
            stack.elsif(true, at(4)),
            Err(PreprocError::DanglingElse(..))
        ));
        assert!(matches!(
            stack.finish(),
            Err(PreprocError::UnterminatedIfdef(..))
        ));
    }
}
