use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::models::{Question, ReferenceArchitecture};
use crate::state::AppState;

/// Answers longer than this many characters start out collapsed.
const MAX_CHARS: usize = 400;

/// Stable row identity: question text plus creation timestamp. Survives the
/// wholesale page replacement on refetch.
fn row_key(question: &Question) -> String {
    format!(
        "{}@{}",
        question.question,
        question.created_at.as_deref().unwrap_or("")
    )
}

fn is_long(text: &str) -> bool {
    text.chars().count() > MAX_CHARS
}

/// Collapsed form of a long answer: the first `MAX_CHARS` characters plus an
/// ellipsis. Short answers come back unchanged.
fn short_text(text: &str) -> String {
    if !is_long(text) {
        return text.to_string();
    }
    let mut short: String = text.chars().take(MAX_CHARS).collect();
    short.push_str("...");
    short
}

/// Creation timestamp in the browser's locale formatting.
fn format_timestamp(iso: &str) -> String {
    let date = js_sys::Date::new(&JsValue::from_str(iso));
    String::from(date.to_locale_string("default", &JsValue::UNDEFINED))
}

/// Paginated question history. Renders the shared merged view, so optimistic
/// placeholders appear at the front alongside the fetched page.
#[component]
pub fn QuestionsList() -> impl IntoView {
    let state = expect_context::<AppState>();

    let list_body = {
        let state = state.clone();
        move || {
            let questions = state.merged();
            if state.loading.get() {
                view! { <div>"Loading..."</div> }.into_any()
            } else if questions.is_empty() {
                view! { <div>"No questions found."</div> }.into_any()
            } else {
                let state = state.clone();
                view! {
                    <ul>
                        <For
                            each=move || state.merged()
                            key=|q| row_key(q)
                            let:question
                        >
                            <QuestionRow question=question />
                        </For>
                    </ul>
                }
                .into_any()
            }
        }
    };

    view! {
        <div class="questions-list">
            // Error banner
            {move || {
                state.error.get().map(|err| {
                    view! {
                        <div class="error-banner">{err}</div>
                    }
                })
            }}

            <h2>"Previous Questions"</h2>

            {list_body}

            <PaginationBar />
        </div>
    }
}

/// First/Previous/Next/Last controls around a "Page x of y" label.
#[component]
fn PaginationBar() -> impl IntoView {
    let state = expect_context::<AppState>();

    let page = state.page;
    let loading = state.loading;

    let on_first = {
        let state = state.clone();
        move |_| state.change_page(1)
    };
    let on_previous = {
        let state = state.clone();
        move |_| {
            let target = state.page.get_untracked().saturating_sub(1);
            state.change_page(target);
        }
    };
    let on_next = {
        let state = state.clone();
        move |_| {
            let target = state.page.get_untracked() + 1;
            state.change_page(target);
        }
    };
    let on_last = {
        let state = state.clone();
        move |_| {
            let target = state.total_pages();
            state.change_page(target);
        }
    };

    let first_disabled = {
        let state = state.clone();
        move || state.at_first_page() || loading.get()
    };
    let previous_disabled = first_disabled.clone();
    let next_disabled = {
        let state = state.clone();
        move || state.at_last_page() || loading.get()
    };
    let last_disabled = next_disabled.clone();

    let page_label = move || format!(" Page {} of {} ", page.get(), state.total_pages());

    view! {
        <div class="pagination">
            <button on:click=on_first disabled=first_disabled>"First"</button>
            <button on:click=on_previous disabled=previous_disabled>"Previous"</button>
            <span>{page_label}</span>
            <button on:click=on_next disabled=next_disabled>"Next"</button>
            <button on:click=on_last disabled=last_disabled>"Last"</button>
        </div>
    }
}

/// One question record: title, date, status, answer with expand/collapse,
/// and reference links.
#[component]
fn QuestionRow(question: Question) -> impl IntoView {
    let state = expect_context::<AppState>();

    let key = row_key(&question);
    let answer = question.response.answer_text();
    let long = is_long(&answer);
    let references = question.response.reference_architectures().to_vec();
    let timestamp = question
        .created_at
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_default();

    let expanded = state.expanded;
    let is_expanded = {
        let key = key.clone();
        move || expanded.get().contains(&key)
    };

    let shown_text = {
        let answer = answer.clone();
        let is_expanded = is_expanded.clone();
        move || {
            if long && !is_expanded() {
                short_text(&answer)
            } else {
                answer.clone()
            }
        }
    };

    let toggle_label = {
        let is_expanded = is_expanded.clone();
        move || if is_expanded() { "Show less" } else { "Show more" }
    };

    let references_block = {
        let is_expanded = is_expanded.clone();
        move || {
            ((is_expanded() || !long) && !references.is_empty()).then(|| {
                view! {
                    <div class="reference-list">
                        <b>"Reference Architectures:"</b>
                        <ul>
                            {references.iter().cloned().map(reference_item).collect::<Vec<_>>()}
                        </ul>
                    </div>
                }
            })
        }
    };

    let toggle = move |_| state.toggle_expanded(key.clone());

    view! {
        <li class="question-card">
            <div class="question-title">"Q: " {question.question.clone()}</div>
            <div class="question-date">{timestamp}</div>
            <div class="question-status">
                <b>"Status:"</b>
                " "
                {question.status.to_string()}
            </div>
            <div class="question-response">
                <b>"Response:"</b>
                <div class="response-text">
                    {shown_text}
                    {long.then(|| view! {
                        <button class="toggle-btn" on:click=toggle>
                            {toggle_label}
                        </button>
                    })}
                </div>
                {references_block}
            </div>
        </li>
    }
}

/// A single reference-architecture link with its optional summary line.
fn reference_item(reference: ReferenceArchitecture) -> impl IntoView {
    view! {
        <li>
            <a href=reference.url target="_blank" rel="noopener noreferrer">
                {reference.title}
            </a>
            {reference.summary.map(|summary| {
                view! {
                    <br />
                    <span class="reference-summary">{summary}</span>
                }
            })}
        </li>
    }
}
