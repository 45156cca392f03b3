use serde::{Deserialize, Serialize};

use crate::app::UiState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub done: bool,
}

/// Whole board state. Serialized as-is into the route model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub next_id: u64,
    /// Text in the "new task" box, mirrored from debounced input.
    pub draft: String,
    /// Unlocks the settings page.
    pub unlocked: bool,
}

impl BoardState {
    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            tasks: vec![
                Task {
                    id: 1,
                    title: "Sketch the route table".to_string(),
                    done: true,
                },
                Task {
                    id: 2,
                    title: "Wire up the push channel".to_string(),
                    done: false,
                },
            ],
            next_id: 3,
            draft: String::new(),
            unlocked: false,
        }
    }
}

impl UiState for BoardState {}
