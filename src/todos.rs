use crate::collection::{next_id, remove_by_id, update_by_id};
use crate::models::Todo;
use crate::store::{JsonStore, KeyValueStore, StoreError, TODOS_KEY};
use crate::utils::Clock;

pub fn default_todos() -> Vec<Todo> {
    vec![
        Todo {
            id: 1,
            text: "Create a start page".to_string(),
            completed: true,
        },
        Todo {
            id: 2,
            text: "Add a todo list".to_string(),
            completed: false,
        },
    ]
}

pub struct TodoManager<S> {
    store: JsonStore<S>,
    todos: Vec<Todo>,
}

impl<S: KeyValueStore> TodoManager<S> {
    pub fn load(store: S) -> Self {
        let store = JsonStore::new(store);
        let todos = store.get_or_else(TODOS_KEY, default_todos);
        Self { store, todos }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn remaining(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// Append a new open todo; blank text is ignored
    pub fn add_todo(&mut self, text: &str, clock: &dyn Clock) -> Result<Option<Todo>, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let todo = Todo {
            id: next_id(clock, &self.todos),
            text: text.to_string(),
            completed: false,
        };
        self.todos.push(todo.clone());
        self.persist()?;
        Ok(Some(todo))
    }

    pub fn toggle_todo(&mut self, id: i64) -> Result<bool, StoreError> {
        if !update_by_id(&mut self.todos, id, |t| t.completed = !t.completed) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn delete_todo(&mut self, id: i64) -> Result<bool, StoreError> {
        if !remove_by_id(&mut self.todos, id) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.set(TODOS_KEY, &self.todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::utils::test_support::FixedClock;
    use chrono::NaiveDate;
    use std::rc::Rc;

    fn clock() -> FixedClock {
        FixedClock::new(1_760_000_000_000, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
    }

    #[test]
    fn blank_text_leaves_list_unchanged() {
        let mut manager = TodoManager::load(MemoryStore::new());
        assert_eq!(manager.add_todo("   ", &clock()).unwrap(), None);
        assert_eq!(manager.todos(), default_todos().as_slice());
    }

    #[test]
    fn add_trims_and_appends_open_todo() {
        let mut manager = TodoManager::load(MemoryStore::new());
        let added = manager.add_todo("  Buy milk ", &clock()).unwrap().unwrap();
        assert_eq!(added.text, "Buy milk");
        assert!(!added.completed);
        assert_eq!(manager.todos().len(), 3);
        assert_eq!(manager.todos().last(), Some(&added));
    }

    #[test]
    fn toggle_and_delete_persist() {
        let store = Rc::new(MemoryStore::new());
        let mut manager = TodoManager::load(store.clone());
        assert!(manager.toggle_todo(2).unwrap());
        assert!(manager.delete_todo(1).unwrap());
        assert!(!manager.toggle_todo(1).unwrap());

        let reloaded = TodoManager::load(store);
        assert_eq!(reloaded.todos().len(), 1);
        assert!(reloaded.todos()[0].completed);
        assert_eq!(reloaded.remaining(), 0);
    }
}
