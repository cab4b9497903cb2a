use std::collections::HashSet;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{Question, QuestionStatus};

/// Number of records per fetched page.
pub const PAGE_SIZE: u32 = 10;

/// Shared application state, provided via Leptos context. One source of
/// truth: the form prepends optimistic placeholders here, and the list
/// renders the merged view of placeholders plus the fetched page.
#[derive(Clone)]
pub struct AppState {
    api: ApiClient,

    /// Monotonic fetch counter. A response is dropped when a newer fetch
    /// has started since it was issued.
    fetch_seq: StoredValue<u64>,

    // --- Read signals (for components to subscribe to) ---
    pub pending: ReadSignal<Vec<Question>>,
    pub page_items: ReadSignal<Vec<Question>>,
    pub total: ReadSignal<u32>,
    pub page: ReadSignal<u32>,
    pub loading: ReadSignal<bool>,
    pub submitting: ReadSignal<bool>,
    pub error: ReadSignal<Option<String>>,
    pub expanded: ReadSignal<HashSet<String>>,

    // --- Write signals (for mutating state) ---
    pub set_pending: WriteSignal<Vec<Question>>,
    pub set_page_items: WriteSignal<Vec<Question>>,
    pub set_total: WriteSignal<u32>,
    pub set_page: WriteSignal<u32>,
    pub set_loading: WriteSignal<bool>,
    pub set_submitting: WriteSignal<bool>,
    pub set_error: WriteSignal<Option<String>>,
    pub set_expanded: WriteSignal<HashSet<String>>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide(config: Config) -> Self {
        let (pending, set_pending) = signal(Vec::<Question>::new());
        let (page_items, set_page_items) = signal(Vec::<Question>::new());
        let (total, set_total) = signal(0u32);
        let (page, set_page) = signal(1u32);
        let (loading, set_loading) = signal(false);
        let (submitting, set_submitting) = signal(false);
        let (error, set_error) = signal(None::<String>);
        let (expanded, set_expanded) = signal(HashSet::<String>::new());

        let state = Self {
            api: ApiClient::new(&config),
            fetch_seq: StoredValue::new(0),
            pending,
            page_items,
            total,
            page,
            loading,
            submitting,
            error,
            expanded,
            set_pending,
            set_page_items,
            set_total,
            set_page,
            set_loading,
            set_submitting,
            set_error,
            set_expanded,
        };

        provide_context(state.clone());
        state
    }

    /// The list as displayed: placeholders first, then the fetched page in
    /// most-recent-first order, minus fetched rows that duplicate a
    /// placeholder's text.
    pub fn merged(&self) -> Vec<Question> {
        merge_questions(&self.pending.get(), &self.page_items.get())
    }

    /// Pages in the persisted collection at the current total.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total.get(), PAGE_SIZE)
    }

    /// True on page 1, where First and Previous are no-ops.
    pub fn at_first_page(&self) -> bool {
        at_first_page(self.page.get())
    }

    /// True on the last page (or an empty collection), where Next and Last
    /// are no-ops.
    pub fn at_last_page(&self) -> bool {
        at_last_page(self.page.get(), total_pages(self.total.get(), PAGE_SIZE))
    }

    /// Fetch the current page and replace the displayed page wholesale.
    /// Placeholders whose text now appears in the fetched page adopt the
    /// server record, resolving their status.
    pub fn load_questions(&self) {
        let state = self.clone();
        let seq = self.fetch_seq.get_value() + 1;
        self.fetch_seq.set_value(seq);
        self.set_loading.set(true);
        self.set_error.set(None);
        let page = self.page.get_untracked();

        spawn_local(async move {
            let result = state.api.list_questions(page, PAGE_SIZE).await;
            if state.fetch_seq.get_value() != seq {
                // A newer fetch started; its completion settles the state.
                return;
            }
            match result {
                Ok(fetched) => {
                    state
                        .set_pending
                        .update(|pending| reconcile_pending(pending, &fetched.items));
                    state.set_page_items.set(fetched.items);
                    state.set_total.set(fetched.total);
                }
                Err(e) => {
                    log::error!("Failed to fetch questions: {e}");
                    state.set_error.set(Some(e.to_string()));
                }
            }
            state.set_loading.set(false);
        });
    }

    /// Navigate to `page` (1-indexed, clamped at 1) and fetch it. Expand
    /// state is scoped to the loaded page, so it is cleared here.
    pub fn change_page(&self, page: u32) {
        self.set_page.set(page.max(1));
        self.set_expanded.set(HashSet::new());
        self.load_questions();
    }

    /// Optimistically prepend a placeholder, then submit. On success the
    /// persisted answer is picked up by an immediate re-fetch; on failure
    /// the placeholder is marked failed and the user alerted.
    pub fn submit_question(&self, text: String) {
        let state = self.clone();
        self.set_pending.update(|pending| {
            pending.insert(0, Question::pending(text.clone(), now_iso()));
        });
        self.set_submitting.set(true);
        self.set_error.set(None);

        spawn_local(async move {
            match state.api.submit_question(&text).await {
                Ok(receipt) => {
                    log::debug!(
                        "Question accepted: query_id={:?} status={:?}",
                        receipt.query_id,
                        receipt.status
                    );
                    state.load_questions();
                }
                Err(e) => {
                    log::error!("Failed to submit question: {e}");
                    state.set_pending.update(|pending| mark_failed(pending, &text));
                    alert("Failed to ask question.");
                }
            }
            state.set_submitting.set(false);
        });
    }

    /// Flip one row's expand state.
    pub fn toggle_expanded(&self, key: String) {
        self.set_expanded.update(|expanded| {
            if !expanded.remove(&key) {
                expanded.insert(key);
            }
        });
    }
}

/// Replace each placeholder whose text matches a fetched record with that
/// record, adopting the server's status and answer. Failed placeholders
/// recover the same way when the server turns out to have the question
/// after all. A question asked more than once in a session leaves several
/// placeholders adopting the same record; the identical copies collapse to
/// a single entry so every row keeps its own identity.
fn reconcile_pending(pending: &mut Vec<Question>, fetched: &[Question]) {
    for entry in pending.iter_mut() {
        if let Some(server) = fetched.iter().find(|q| q.question == entry.question) {
            *entry = server.clone();
        }
    }
    let mut seen: Vec<Question> = Vec::new();
    pending.retain(|entry| {
        if seen.contains(entry) {
            false
        } else {
            seen.push(entry.clone());
            true
        }
    });
}

/// Displayed list: placeholders first, then the fetched page reversed into
/// most-recent-first order, skipping fetched rows whose text duplicates a
/// placeholder. A question the user just asked appears exactly once, in the
/// placeholder slot at the front.
fn merge_questions(pending: &[Question], fetched: &[Question]) -> Vec<Question> {
    let mut merged = pending.to_vec();
    merged.extend(
        fetched
            .iter()
            .rev()
            .filter(|q| !pending.iter().any(|p| p.question == q.question))
            .cloned(),
    );
    merged
}

/// Mark the first still-pending placeholder with this text as failed.
fn mark_failed(pending: &mut [Question], text: &str) {
    if let Some(entry) = pending
        .iter_mut()
        .find(|q| q.question == text && q.status == QuestionStatus::Pending)
    {
        entry.status = QuestionStatus::Failed;
    }
}

/// Page count at a fixed page size; zero when the collection is empty.
fn total_pages(total: u32, page_size: u32) -> u32 {
    total.div_ceil(page_size)
}

fn at_first_page(page: u32) -> bool {
    page <= 1
}

fn at_last_page(page: u32, total_pages: u32) -> bool {
    page >= total_pages
}

/// Current browser time as an ISO-8601 string.
fn now_iso() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

/// Raise a blocking browser alert.
fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerBody;

    fn placeholder(text: &str) -> Question {
        placeholder_at(text, "2025-06-01T00:00:00Z")
    }

    fn placeholder_at(text: &str, created_at: &str) -> Question {
        Question::pending(text.into(), created_at.into())
    }

    fn answered(text: &str, answer: &str) -> Question {
        Question {
            question: text.into(),
            status: QuestionStatus::Complete,
            response: AnswerBody::Text(answer.into()),
            created_at: Some("2025-05-30T00:00:00Z".into()),
        }
    }

    fn texts(questions: &[Question]) -> Vec<&str> {
        questions.iter().map(|q| q.question.as_str()).collect()
    }

    #[test]
    fn merge_puts_placeholders_first_and_reverses_the_page() {
        let pending = vec![placeholder("newest")];
        let fetched = vec![answered("a", "1"), answered("b", "2"), answered("c", "3")];

        let merged = merge_questions(&pending, &fetched);

        assert_eq!(texts(&merged), vec!["newest", "c", "b", "a"]);
    }

    #[test]
    fn merge_keeps_a_single_entry_for_a_duplicated_question() {
        let pending = vec![placeholder("shared question")];
        let fetched = vec![answered("shared question", "answer"), answered("other", "x")];

        let merged = merge_questions(&pending, &fetched);

        assert_eq!(texts(&merged), vec!["shared question", "other"]);
        // The surviving entry is the one in the placeholder slot.
        assert_eq!(merged[0].status, QuestionStatus::Pending);
    }

    #[test]
    fn merge_matches_on_exact_text_only() {
        let pending = vec![placeholder("scale my api")];
        let fetched = vec![answered("Scale my api", "case differs")];

        let merged = merge_questions(&pending, &fetched);

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_without_placeholders_is_just_the_reversed_page() {
        let fetched = vec![answered("a", "1"), answered("b", "2")];

        let merged = merge_questions(&[], &fetched);

        assert_eq!(texts(&merged), vec!["b", "a"]);
    }

    #[test]
    fn reconcile_adopts_the_server_record() {
        let mut pending = vec![placeholder("how do I shard")];
        let fetched = vec![answered("how do I shard", "use partition keys")];

        reconcile_pending(&mut pending, &fetched);

        assert_eq!(pending[0].status, QuestionStatus::Complete);
        assert_eq!(pending[0].response.answer_text(), "use partition keys");
        assert_eq!(pending[0].created_at.as_deref(), Some("2025-05-30T00:00:00Z"));
    }

    #[test]
    fn reconcile_recovers_failed_placeholders() {
        let mut pending = vec![placeholder("lost ack")];
        mark_failed(&mut pending, "lost ack");
        assert_eq!(pending[0].status, QuestionStatus::Failed);

        let fetched = vec![answered("lost ack", "it made it after all")];
        reconcile_pending(&mut pending, &fetched);

        assert_eq!(pending[0].status, QuestionStatus::Complete);
    }

    #[test]
    fn reconcile_leaves_unmatched_placeholders_pending() {
        let mut pending = vec![placeholder("still waiting")];
        let fetched = vec![answered("something else", "x")];

        reconcile_pending(&mut pending, &fetched);

        assert_eq!(pending[0].status, QuestionStatus::Pending);
        assert_eq!(pending[0].response.answer_text(), "");
    }

    #[test]
    fn reconcile_collapses_a_reasked_question_into_one_row() {
        let mut pending = vec![
            placeholder_at("scale my api", "2025-06-01T10:00:00Z"),
            placeholder_at("scale my api", "2025-06-01T10:00:05Z"),
        ];
        let fetched = vec![answered("scale my api", "use autoscale rules")];

        reconcile_pending(&mut pending, &fetched);

        // Both copies adopted the same record; only one survives.
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].status, QuestionStatus::Complete);
        assert_eq!(pending[0].created_at.as_deref(), Some("2025-05-30T00:00:00Z"));

        let merged = merge_questions(&pending, &fetched);
        assert_eq!(texts(&merged), vec!["scale my api"]);
    }

    #[test]
    fn reconcile_keeps_unresolved_reasks_apart() {
        let mut pending = vec![
            placeholder_at("scale my api", "2025-06-01T10:00:00Z"),
            placeholder_at("scale my api", "2025-06-01T10:00:05Z"),
        ];

        reconcile_pending(&mut pending, &[]);

        assert_eq!(pending.len(), 2);
        assert_ne!(pending[0].created_at, pending[1].created_at);
    }

    #[test]
    fn mark_failed_targets_the_first_pending_match() {
        let mut pending = vec![
            answered("repeat", "already answered"),
            placeholder("repeat"),
            placeholder("repeat"),
        ];

        mark_failed(&mut pending, "repeat");

        assert_eq!(pending[0].status, QuestionStatus::Complete);
        assert_eq!(pending[1].status, QuestionStatus::Failed);
        assert_eq!(pending[2].status, QuestionStatus::Pending);
    }

    #[test]
    fn mark_failed_ignores_other_texts() {
        let mut pending = vec![placeholder("a")];

        mark_failed(&mut pending, "b");

        assert_eq!(pending[0].status, QuestionStatus::Pending);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(31, 10), 4);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn first_page_guard() {
        assert!(at_first_page(1));
        assert!(!at_first_page(2));
    }

    #[test]
    fn last_page_guard() {
        assert!(at_last_page(3, 3));
        assert!(!at_last_page(2, 3));
        // An empty collection has no page to move to.
        assert!(at_last_page(1, 0));
    }
}
