//! Streaming thought/answer splitter
//!
//! Reasoning models wrap their chain of thought in `<think>` ... `</think>`
//! sentinel markers inside the ordinary content stream. The splitter routes
//! each incoming fragment into one of two accumulators so the thought can be
//! shown apart from the final answer, both live and once persisted.

/// Opening sentinel for a thought segment.
pub const THINK_OPEN: &str = "<think>";
/// Closing sentinel for a thought segment.
pub const THINK_CLOSE: &str = "</think>";

/// Which accumulator a fragment landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Thought,
    Answer,
}

/// Streams open in `Thinking`: content ahead of the closing marker counts as
/// thought even when the opening marker never arrives. The opening marker is
/// a no-op for the same reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Thinking,
    Answering,
}

#[derive(Debug)]
pub struct ThoughtSplitter {
    mode: Mode,
    thought: String,
    answer: String,
}

impl ThoughtSplitter {
    pub fn new() -> Self {
        Self {
            mode: Mode::Thinking,
            thought: String::new(),
            answer: String::new(),
        }
    }

    /// Feed one stream fragment. Returns the accumulator the fragment was
    /// appended to, or `None` for a discarded marker fragment.
    ///
    /// Marker fragments are withheld in both modes: a stray marker arriving
    /// after the thought has closed is discarded rather than appended to the
    /// answer.
    ///
    /// A marker split across fragment boundaries is not recognized; Ollama
    /// emits each marker token as a single fragment in practice.
    pub fn push(&mut self, fragment: &str) -> Option<Segment> {
        let is_marker =
            fragment.contains(THINK_OPEN) || fragment.contains(THINK_CLOSE);

        let segment = if is_marker {
            None
        } else {
            match self.mode {
                Mode::Thinking => {
                    self.thought.push_str(fragment);
                    Some(Segment::Thought)
                }
                Mode::Answering => {
                    self.answer.push_str(fragment);
                    Some(Segment::Answer)
                }
            }
        };

        // Checked after the append-or-discard decision, so the transition
        // takes effect starting with the next fragment.
        if fragment.contains(THINK_CLOSE) {
            self.mode = Mode::Answering;
        }

        segment
    }

    pub fn thought(&self) -> &str {
        &self.thought
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Consume the splitter at stream end, yielding `(thought, answer)`.
    pub fn finish(self) -> (String, String) {
        (self.thought, self.answer)
    }
}

impl Default for ThoughtSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(fragments: &[&str]) -> (String, String) {
        let mut splitter = ThoughtSplitter::new();
        for fragment in fragments {
            splitter.push(fragment);
        }
        splitter.finish()
    }

    #[test]
    fn basic_thought_then_answer() {
        let (thought, answer) = split(&["<think>", "A", "</think>", "B"]);
        assert_eq!(thought, "A");
        assert_eq!(answer, "B");
    }

    #[test]
    fn no_markers_accumulates_as_thought() {
        let (thought, answer) = split(&["hello", " ", "world"]);
        assert_eq!(thought, "hello world");
        assert_eq!(answer, "");
    }

    #[test]
    fn missing_close_marker_leaves_answer_empty() {
        let (thought, answer) = split(&["<think>", "still", " thinking", "..."]);
        assert_eq!(thought, "still thinking...");
        assert_eq!(answer, "");
    }

    #[test]
    fn missing_open_marker_still_starts_thinking() {
        let (thought, answer) = split(&["early", "</think>", "late"]);
        assert_eq!(thought, "early");
        assert_eq!(answer, "late");
    }

    #[test]
    fn marker_fragments_are_discarded() {
        let mut splitter = ThoughtSplitter::new();
        assert_eq!(splitter.push(THINK_OPEN), None);
        assert_eq!(splitter.push("pondering"), Some(Segment::Thought));
        assert_eq!(splitter.push(THINK_CLOSE), None);
        assert_eq!(splitter.push("done"), Some(Segment::Answer));
        assert_eq!(splitter.thought(), "pondering");
        assert_eq!(splitter.answer(), "done");
    }

    #[test]
    fn transition_applies_to_next_fragment_only() {
        // The fragment carrying the close marker is itself discarded; only
        // fragments after it reach the answer.
        let (thought, answer) = split(&["a", "tail</think>", "b"]);
        assert_eq!(thought, "a");
        assert_eq!(answer, "b");
    }

    #[test]
    fn stray_marker_after_transition_is_discarded() {
        let (thought, answer) =
            split(&["<think>", "A", "</think>", "B", "<think>", "C"]);
        assert_eq!(thought, "A");
        assert_eq!(answer, "BC");
    }

    #[test]
    fn multi_turn_accumulation() {
        let (thought, answer) =
            split(&["<think>", "one", " two", "</think>", "three", " four"]);
        assert_eq!(thought, "one two");
        assert_eq!(answer, "three four");
    }

    #[test]
    fn empty_stream_yields_empty_buffers() {
        let (thought, answer) = split(&[]);
        assert_eq!(thought, "");
        assert_eq!(answer, "");
    }
}
