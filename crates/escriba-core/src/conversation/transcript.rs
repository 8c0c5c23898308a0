//! Ordered conversation transcript.
//!
//! Insertion order is chronological order is display order. The transcript
//! holds at most one placeholder turn at any time; that invariant is
//! enforced where turns are submitted, not by removal semantics.

use super::turn::Turn;

/// An ordered sequence of conversation turns.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn at the end of the transcript.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Removes the trailing placeholder turn, if present.
    ///
    /// Removes at most one turn. The placeholder is always the most recent
    /// turn while an answer is pending, so only the tail is inspected; a
    /// stray placeholder anywhere else would indicate a submit-time
    /// invariant violation and is left untouched.
    pub fn remove_placeholder(&mut self) -> bool {
        match self.turns.last() {
            Some(turn) if turn.is_placeholder => {
                self.turns.pop();
                true
            }
            _ => false,
        }
    }

    /// Replaces the most recent turn matching `predicate` with `new_turn`.
    ///
    /// Returns false and leaves the transcript unchanged when no turn
    /// matches.
    pub fn replace_last_matching<P>(&mut self, predicate: P, new_turn: Turn) -> bool
    where
        P: Fn(&Turn) -> bool,
    {
        match self.turns.iter().rposition(|turn| predicate(turn)) {
            Some(index) => {
                self.turns[index] = new_turn;
                true
            }
            None => false,
        }
    }

    /// Removes the most recent user turn and everything after it, returning
    /// that turn's content so it can be resubmitted.
    ///
    /// Returns `None` (removing nothing) if the transcript contains no user
    /// turn. Resubmitting the returned question re-appends the user turn,
    /// so a regenerate cycle leaves the transcript the same length.
    pub fn rewind_to_last_user(&mut self) -> Option<String> {
        let index = self.turns.iter().rposition(|turn| turn.is_user())?;
        let question = self.turns[index].content.clone();
        self.turns.truncate(index);
        Some(question)
    }

    /// Returns true when any turn is a placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.turns.iter().any(|turn| turn.is_placeholder)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// All turns, in chronological order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns that are real conversation content (placeholder excluded),
    /// used as context for the answering collaborator.
    pub fn context_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|turn| !turn.is_placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::turn::Role;

    #[test]
    fn append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("a"));
        transcript.append(Turn::assistant("b"));
        transcript.append(Turn::user("c"));

        let contents: Vec<&str> = transcript
            .turns()
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(contents, ["a", "b", "c"]);
    }

    #[test]
    fn remove_placeholder_only_removes_tail_placeholder() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("a"));
        transcript.append(Turn::placeholder());

        assert!(transcript.remove_placeholder());
        assert_eq!(transcript.len(), 1);
        // Second removal is a no-op
        assert!(!transcript.remove_placeholder());
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn remove_placeholder_ignores_regular_turns() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("a"));
        transcript.append(Turn::assistant("b"));

        assert!(!transcript.remove_placeholder());
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn rewind_removes_last_user_turn_and_tail() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("a"));
        transcript.append(Turn::assistant("b"));

        let question = transcript.rewind_to_last_user();
        assert_eq!(question.as_deref(), Some("a"));
        assert!(transcript.is_empty());
    }

    #[test]
    fn rewind_keeps_earlier_exchanges() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("a"));
        transcript.append(Turn::assistant("b"));
        transcript.append(Turn::user("c"));
        transcript.append(Turn::assistant("d"));

        let question = transcript.rewind_to_last_user();
        assert_eq!(question.as_deref(), Some("c"));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[1].content, "b");
    }

    #[test]
    fn rewind_on_empty_is_noop() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.rewind_to_last_user(), None);
        assert!(transcript.is_empty());
    }

    #[test]
    fn replace_last_matching_targets_most_recent() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::assistant("first"));
        transcript.append(Turn::user("q"));
        transcript.append(Turn::assistant("second"));

        let replaced =
            transcript.replace_last_matching(|t| t.role == Role::Assistant, Turn::assistant("new"));
        assert!(replaced);
        assert_eq!(transcript.turns()[2].content, "new");
        assert_eq!(transcript.turns()[0].content, "first");
    }

    #[test]
    fn context_turns_excludes_placeholder() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("a"));
        transcript.append(Turn::placeholder());

        assert_eq!(transcript.context_turns().count(), 1);
        assert!(transcript.has_placeholder());
    }
}
