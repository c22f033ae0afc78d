//! Small todo list driven by a redux-pipeline store
//!
//! Run with `RUST_LOG=debug` (or put it in `.env`) to see every action the
//! logging middleware forwards.

use anyhow::Result;
use redux_pipeline::{
    Dispatcher, LoggingMiddleware, Middleware, Next, Store, StoreConfig, StoreError,
};

#[derive(Debug, Clone, PartialEq)]
enum Action {
    AddTodo(String),
    Complete(usize),
    ClearCompleted,
    Rejected(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Todo {
    title: String,
    done: bool,
}

#[derive(Debug, Clone, Default)]
struct AppState {
    todos: Vec<Todo>,
    last_error: Option<String>,
}

impl AppState {
    fn open_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.done).count()
    }
}

fn reduce(action: &Action, state: &AppState) -> AppState {
    let mut state = state.clone();
    match action {
        Action::AddTodo(title) => {
            state.todos.push(Todo {
                title: title.clone(),
                done: false,
            });
            state.last_error = None;
        }
        Action::Complete(index) => {
            if let Some(todo) = state.todos.get_mut(*index) {
                todo.done = true;
            }
        }
        Action::ClearCompleted => state.todos.retain(|todo| !todo.done),
        Action::Rejected(reason) => state.last_error = Some(reason.clone()),
    }
    state
}

/// Rejects blank titles and unknown indices instead of letting them reach the reducer
struct ValidationMiddleware;

impl Middleware<AppState, Action> for ValidationMiddleware {
    fn handle(
        &self,
        action: Action,
        dispatcher: &Dispatcher<AppState, Action>,
        next: &Next<Action>,
    ) -> Result<(), StoreError> {
        match action {
            Action::AddTodo(title) if title.trim().is_empty() => {
                dispatcher.dispatch(Action::Rejected("todo title is empty".into()))
            }
            Action::Complete(index) if index >= dispatcher.state().todos.len() => {
                dispatcher.dispatch(Action::Rejected(format!("no todo at index {}", index)))
            }
            Action::AddTodo(title) => next.call(Action::AddTodo(title.trim().to_string())),
            other => next.call(other),
        }
    }
}

/// Clears the list once every todo is done
struct AutoClearMiddleware;

impl Middleware<AppState, Action> for AutoClearMiddleware {
    fn handle(
        &self,
        action: Action,
        dispatcher: &Dispatcher<AppState, Action>,
        next: &Next<Action>,
    ) -> Result<(), StoreError> {
        let completes = matches!(action, Action::Complete(_));
        next.call(action)?;

        let state = dispatcher.state();
        if completes && !state.todos.is_empty() && state.open_count() == 0 {
            log::info!("All todos done, clearing the list");
            dispatcher.dispatch(Action::ClearCompleted)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    // Load .env first so RUST_LOG can live there
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }
    env_logger::init();

    let config = StoreConfig::load();
    let store = Store::builder(reduce, AppState::default())
        .config(config)
        .middleware(LoggingMiddleware::new())
        .middleware(ValidationMiddleware)
        .middleware(AutoClearMiddleware)
        .build();

    let open = store.subscribe_selected(AppState::open_count, |open: &usize| {
        println!("open todos: {}", open);
    });
    store.subscribe(|state: &AppState| {
        if let Some(error) = &state.last_error {
            println!("rejected: {}", error);
        }
    });

    store.dispatch(Action::AddTodo("write the changelog".into()))?;
    store.dispatch(Action::AddTodo("   ".into()))?;
    store.dispatch(Action::AddTodo("tag the release".into()))?;
    store.dispatch(Action::Complete(5))?;
    store.dispatch(Action::Complete(0))?;

    store.unsubscribe(&open);
    store.dispatch(Action::Complete(1))?;

    let state = store.state();
    println!(
        "final: {} todos, last error: {}",
        state.todos.len(),
        state.last_error.as_deref().unwrap_or("none")
    );
    Ok(())
}
