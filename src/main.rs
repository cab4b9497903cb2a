mod api;
mod components;
mod config;
mod models;
mod state;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::ask_form::AskQuestionForm;
use components::questions_list::QuestionsList;
use config::Config;
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide(Config::from_env());

    // Load the first page on mount
    state.load_questions();

    view! {
        <div class="app-container">
            <h1>"Azure Architecture Q&A"</h1>
            <AskQuestionForm />
            <hr />
            <QuestionsList />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
