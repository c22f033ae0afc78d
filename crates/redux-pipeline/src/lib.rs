//! Observable single-writer store with a reentrant middleware pipeline
//!
//! A [`Store`] holds one immutable state value. Actions are dispatched through
//! an ordered chain of [`Middleware`] that may rewrite, swallow or multiply
//! them, or dispatch further actions, before a pure reducer computes the next
//! state and subscribers are notified.
//!
//! - The chain is composed from the current middleware list on every
//!   dispatch, so list changes apply to the very next dispatch.
//! - Dispatching from inside a middleware is plain recursion: the nested
//!   dispatch finishes (state replaced, subscribers notified) before the
//!   calling middleware continues.
//! - Errors from the reducer or middleware propagate to the caller; the state
//!   is only replaced once the reducer has returned successfully.
//!
//! # Example
//!
//! ```rust
//! use redux_pipeline::{Dispatcher, Middleware, Next, Store, StoreError};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Debug)]
//! enum Action {
//!     Deposit(u64),
//!     Withdraw(u64),
//!     Rejected(String),
//! }
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Account {
//!     balance: u64,
//!     last_error: Option<String>,
//! }
//!
//! fn reduce(action: &Action, state: &Account) -> Account {
//!     let mut state = state.clone();
//!     match action {
//!         Action::Deposit(amount) => state.balance += amount,
//!         Action::Withdraw(amount) => state.balance -= amount,
//!         Action::Rejected(reason) => state.last_error = Some(reason.clone()),
//!     }
//!     state
//! }
//!
//! /// Turns overdrafts into a rejection instead of letting them through
//! struct OverdraftGuard;
//!
//! impl Middleware<Account, Action> for OverdraftGuard {
//!     fn handle(
//!         &self,
//!         action: Action,
//!         dispatcher: &Dispatcher<Account, Action>,
//!         next: &Next<Action>,
//!     ) -> Result<(), StoreError> {
//!         match action {
//!             Action::Withdraw(amount) if amount > dispatcher.state().balance => {
//!                 dispatcher.dispatch(Action::Rejected(format!("cannot withdraw {}", amount)))
//!             }
//!             other => next.call(other),
//!         }
//!     }
//! }
//!
//! let store = Store::builder(reduce, Account::default())
//!     .middleware(OverdraftGuard)
//!     .build();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! store.subscribe(move |account: &Account| sink.lock().unwrap().push(account.balance));
//!
//! store.dispatch(Action::Deposit(10)).unwrap();
//! store.dispatch(Action::Withdraw(25)).unwrap();
//! store.dispatch(Action::Withdraw(4)).unwrap();
//!
//! assert_eq!(store.state().balance, 6);
//! assert_eq!(store.state().last_error.as_deref(), Some("cannot withdraw 25"));
//! assert_eq!(*seen.lock().unwrap(), vec![10, 10, 6]);
//! ```

mod action;
mod error;
pub mod middleware;
mod pipeline;
mod reducer;
mod store;
mod subscription;

pub use action::AnyAction;
pub use error::StoreError;
pub use middleware::{Dispatcher, LoggingMiddleware, Middleware, Next, SharedMiddleware};
pub use redux_pipeline_config::StoreConfig;
pub use store::{Store, StoreBuilder};
pub use subscription::{Subscription, SubscriptionId};
