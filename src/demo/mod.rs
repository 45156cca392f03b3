//! Small task board served by `wiretree serve`.
//!
//! Exercises every moving part: nested layouts, params, a guard, a static
//! redirect, typed actions, debounced input and the push channel.

mod intent;
mod reducer;
mod state;
mod views;

pub use intent::BoardIntent;
pub use reducer::BoardReducer;
pub use state::{BoardState, Task};

use crate::app::Store;
use crate::router::{RouteDefinition, RouteError, Router};

pub fn routes() -> Vec<RouteDefinition> {
    vec![RouteDefinition::new("/").layout(views::shell).children([
        RouteDefinition::new("/").redirect_to("/tasks"),
        RouteDefinition::new("/tasks")
            .page(views::task_list)
            .child(RouteDefinition::new("/:id").page(views::task_detail)),
        RouteDefinition::new("/settings")
            .guard(views::require_unlocked)
            .page(views::settings),
        RouteDefinition::new("/archive/*").redirect_to("/tasks"),
    ])]
}

pub fn router() -> Result<Router, RouteError> {
    Router::new(routes())
}

pub fn store() -> Store<BoardReducer> {
    Store::new(BoardState::default())
}
