use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::state::AppState;

/// Trimmed submission text, or `None` when the input is only whitespace.
fn sanitized_question(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Question entry form. Submitting hands the text to the shared state, which
/// shows the optimistic placeholder; the input clears right away rather than
/// waiting on the server.
#[component]
pub fn AskQuestionForm() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (question, set_question) = signal(String::new());

    let is_submitting = move || state.submitting.get();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if is_submitting() {
            return;
        }
        if let Some(text) = sanitized_question(&question.get()) {
            state.submit_question(text);
            set_question.set(String::new());
        }
    };

    view! {
        <div>
            <h2>"Ask a New Question"</h2>
            <form class="ask-form" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Type your question..."
                    prop:value=question
                    on:input=move |ev| {
                        set_question.set(event_target_value(&ev));
                    }
                    disabled=is_submitting
                />
                <button
                    type="submit"
                    disabled=move || is_submitting() || question.get().trim().is_empty()
                >
                    {move || if is_submitting() { "Asking..." } else { "Ask" }}
                </button>
            </form>
        </div>
    }
}
