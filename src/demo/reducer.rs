use crate::app::Reducer;

use super::intent::BoardIntent;
use super::state::{BoardState, Task};

pub struct BoardReducer;

impl Reducer for BoardReducer {
    type State = BoardState;
    type Intent = BoardIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            BoardIntent::Draft { value } => {
                state.draft = value;
            }
            BoardIntent::Add { title } => {
                let title = title.unwrap_or_else(|| state.draft.clone());
                let title = title.trim();
                // Blank titles are ignored
                if !title.is_empty() {
                    state.tasks.push(Task {
                        id: state.next_id,
                        title: title.to_string(),
                        done: false,
                    });
                    state.next_id += 1;
                    state.draft.clear();
                }
            }
            BoardIntent::Toggle { id } => {
                if let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) {
                    task.done = !task.done;
                }
            }
            BoardIntent::Remove { id } => {
                state.tasks.retain(|t| t.id != id);
            }
            BoardIntent::ClearDone => {
                state.tasks.retain(|t| !t.done);
            }
            BoardIntent::SetUnlocked(unlocked) => {
                state.unlocked = unlocked;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_uses_draft_and_clears_it() {
        let state = BoardReducer::reduce(
            BoardState::default(),
            BoardIntent::Draft {
                value: "  Ship it ".to_string(),
            },
        );
        let state = BoardReducer::reduce(state, BoardIntent::Add { title: None });
        let last = state.tasks.last().unwrap();
        assert_eq!(last.title, "Ship it");
        assert_eq!(last.id, 3);
        assert_eq!(state.next_id, 4);
        assert!(state.draft.is_empty());
    }

    #[test]
    fn blank_add_is_ignored() {
        let before = BoardState::default();
        let after = BoardReducer::reduce(
            before.clone(),
            BoardIntent::Add {
                title: Some("   ".to_string()),
            },
        );
        assert_eq!(before, after);
    }

    #[test]
    fn toggle_and_clear_done() {
        let state = BoardReducer::reduce(BoardState::default(), BoardIntent::Toggle { id: 2 });
        assert!(state.task(2).unwrap().done);
        let state = BoardReducer::reduce(state, BoardIntent::ClearDone);
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let before = BoardState::default();
        let after = BoardReducer::reduce(before.clone(), BoardIntent::Remove { id: 99 });
        assert_eq!(before, after);
    }
}
