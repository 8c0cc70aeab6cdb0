//! Todo list and filter stores with complex state

use tincan_vault::{declare_vault, Action, Derived, StoreState, VaultBuilder, VaultError};

#[derive(Clone, Debug)]
struct TodoItem {
    id: usize,
    text: String,
    completed: bool,
}

#[derive(Clone, Debug)]
struct Todos {
    items: Vec<TodoItem>,
    add: Action<String>,
    complete: Action<usize>,
}

impl StoreState for Todos {
    type Patch = Vec<TodoItem>;

    fn merge(&mut self, items: Vec<TodoItem>) {
        self.items = items;
    }
}

#[derive(Clone, Debug)]
struct Filter {
    show_completed: bool,
    visible: Derived<Vec<String>>,
}

impl StoreState for Filter {
    type Patch = bool;

    fn merge(&mut self, show_completed: bool) {
        self.show_completed = show_completed;
    }
}

declare_vault! {
    TodoVault {
        TodoStore = "todos" => Todos,
        FilterStore = "filter" => Filter,
    }
}

fn main() -> Result<(), VaultError> {
    println!("=== Todo Vault ===\n");

    let vault = VaultBuilder::<TodoVault>::new()
        .put(TodoStore, |set, _| Todos {
            items: vec![],
            add: Action::new({
                let set = set.clone();
                move |text: String| {
                    set.merge_with(|s| {
                        let mut items = s.items.clone();
                        items.push(TodoItem {
                            id: items.len() + 1,
                            text,
                            completed: false,
                        });
                        items
                    })
                }
            }),
            complete: Action::new(move |id: usize| {
                set.merge_with(|s| {
                    s.items
                        .iter()
                        .cloned()
                        .map(|todo| TodoItem {
                            completed: todo.completed || todo.id == id,
                            ..todo
                        })
                        .collect()
                })
            }),
        })?
        .register(FilterStore, |ctx| {
            let todos = ctx.vault.container(TodoStore)?.clone();
            let own = ctx.get.clone();
            Ok(Filter {
                show_completed: false,
                visible: Derived::new(move || {
                    let show_completed = own.get().map(|f| f.show_completed).unwrap_or(false);
                    todos.read(|t| {
                        t.items
                            .iter()
                            .filter(|todo| show_completed || !todo.completed)
                            .map(|todo| todo.text.clone())
                            .collect()
                    })
                }),
            })
        })?
        .build()?;

    // Subscribe to state changes
    vault
        .container(TodoStore)?
        .subscribe(|state| {
            println!(
                "State updated! Active todos: {}",
                state.items.iter().filter(|t| !t.completed).count()
            );
        })
        .detach();

    let todos = vault.use_store(TodoStore)?;
    println!("Adding todos...");
    todos.add.call("Learn Tincan".to_string())?;
    todos.add.call("Build a vault".to_string())?;

    println!("\nCompleting todo...");
    todos.complete.call(1)?;

    let filter = vault.container(FilterStore)?;
    println!("\nVisible: {:?}", filter.get_state().visible.get());
    filter.set_state(true);
    println!("Visible with completed: {:?}", filter.get_state().visible.get());

    // Read final state
    println!("\nFinal state: {:#?}", vault.container(TodoStore)?.get_state().items);
    Ok(())
}
