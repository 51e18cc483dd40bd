use crate::selection::SelectionEntry;

pub const ROUTINE_HEADING: &str = "Your Personalized Routine:";
pub const ROUTINE_DISCLAIMER: &str = "This is a simple example of your routine. \
The real routine will be generated based on your selections and needs.";
pub const CANNED_REPLY: &str = "Thank you for your question. \
I'll provide more personalized advice once the routine is generated!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub heading: String,
    pub steps: Vec<String>,
    pub disclaimer: String,
}

/// Seam for a real routine backend. The placeholder below is the only
/// implementation for now; swapping in a real one must not touch the
/// selection handling.
pub trait RoutineProvider {
    fn generate(&self, entries: &[SelectionEntry]) -> Routine;
}

pub struct PlaceholderRoutine;

impl RoutineProvider for PlaceholderRoutine {
    fn generate(&self, entries: &[SelectionEntry]) -> Routine {
        Routine {
            heading: ROUTINE_HEADING.to_string(),
            steps: entries
                .iter()
                .map(|entry| format!("{} by {}", entry.name, entry.brand))
                .collect(),
            disclaimer: ROUTINE_DISCLAIMER.to_string(),
        }
    }
}

pub trait ChatResponder {
    fn reply(&self, input: &str) -> String;
}

pub struct CannedResponder;

impl ChatResponder for CannedResponder {
    fn reply(&self, _input: &str) -> String {
        CANNED_REPLY.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    Routine(Routine),
    User(String),
    Assistant(String),
}

#[derive(Debug, Default, Clone)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl ChatLog {
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A generated routine replaces whatever the panel was showing.
    pub fn present_routine(&mut self, routine: Routine) {
        self.entries.clear();
        self.entries.push(ChatEntry::Routine(routine));
    }

    /// Appends the user's text and the responder's reply, in that order.
    /// Empty or whitespace-only input is a silent no-op.
    pub fn submit(&mut self, input: &str, responder: &dyn ChatResponder) -> bool {
        let text = input.trim();
        if text.is_empty() {
            return false;
        }

        self.entries.push(ChatEntry::User(text.to_string()));
        self.entries.push(ChatEntry::Assistant(responder.reply(text)));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CannedResponder, ChatEntry, ChatLog, PlaceholderRoutine, RoutineProvider, CANNED_REPLY,
    };
    use crate::selection::SelectionEntry;

    fn entry(name: &str, brand: &str) -> SelectionEntry {
        SelectionEntry {
            id: name.to_lowercase(),
            name: name.to_string(),
            brand: brand.to_string(),
        }
    }

    #[test]
    fn placeholder_routine_lists_each_selection_once() {
        let routine = PlaceholderRoutine.generate(&[entry("Serum", "Acme")]);
        assert_eq!(routine.steps, vec!["Serum by Acme"]);
        assert!(!routine.disclaimer.is_empty());
    }

    #[test]
    fn placeholder_routine_keeps_selection_order() {
        let routine =
            PlaceholderRoutine.generate(&[entry("Cleanser", "Lait"), entry("Serum", "Acme")]);
        assert_eq!(routine.steps, vec!["Cleanser by Lait", "Serum by Acme"]);
    }

    #[test]
    fn submit_appends_user_text_then_the_canned_reply() {
        let mut log = ChatLog::default();
        assert!(log.submit("What should I use first?", &CannedResponder));

        assert_eq!(log.entries().len(), 2);
        assert_eq!(
            log.entries()[0],
            ChatEntry::User("What should I use first?".to_string())
        );
        assert_eq!(
            log.entries()[1],
            ChatEntry::Assistant(CANNED_REPLY.to_string())
        );
    }

    #[test]
    fn submit_rejects_blank_input_without_logging() {
        let mut log = ChatLog::default();
        assert!(!log.submit("   ", &CannedResponder));
        assert!(log.is_empty());
    }

    #[test]
    fn presenting_a_routine_replaces_the_log() {
        let mut log = ChatLog::default();
        log.submit("hello", &CannedResponder);
        log.present_routine(PlaceholderRoutine.generate(&[entry("Serum", "Acme")]));

        assert_eq!(log.entries().len(), 1);
        assert!(matches!(log.entries()[0], ChatEntry::Routine(_)));
    }
}
