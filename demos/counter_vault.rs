//! Counter and label stores sharing one vault

use tincan_vault::runtime::ReactiveRuntime;
use tincan_vault::{
    create_effect, declare_vault, Action, Derived, StoreState, Vault, VaultBuilder, VaultConfig,
    VaultError,
};

#[derive(Clone, Debug)]
struct Counter {
    value: i64,
    increment: Action,
    decrement: Action,
}

impl StoreState for Counter {
    type Patch = i64;

    fn merge(&mut self, value: i64) {
        self.value = value;
    }
}

#[derive(Clone, Debug)]
struct Toast {
    visible: bool,
    toggle: Action,
}

impl StoreState for Toast {
    type Patch = bool;

    fn merge(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[derive(Clone, Debug)]
struct Labels {
    counter_label: Derived<String>,
    toast_label: Derived<String>,
}

impl StoreState for Labels {
    type Patch = ();

    fn merge(&mut self, _: ()) {}
}

declare_vault! {
    AppVault {
        CounterStore = "counter" => Counter,
        ToastStore = "toast" => Toast,
        LabelsStore = "labels" => Labels,
    }
}

fn build() -> Result<Vault<AppVault>, VaultError> {
    VaultBuilder::with_config(VaultConfig::new().label("demo"))
        .put(CounterStore, |set, _| Counter {
            value: 0,
            increment: Action::new({
                let set = set.clone();
                move |()| set.merge_with(|s| s.value + 1)
            }),
            decrement: Action::new(move |()| set.merge_with(|s| s.value - 1)),
        })?
        .put(ToastStore, |set, _| Toast {
            visible: true,
            toggle: Action::new(move |()| set.merge_with(|s| !s.visible)),
        })?
        .register(LabelsStore, |ctx| {
            let counter = ctx.vault.container(CounterStore)?.clone();
            let toast = ctx.vault.container(ToastStore)?.clone();
            Ok(Labels {
                counter_label: Derived::new(move || {
                    format!("counter: {}", counter.get_state().value)
                }),
                toast_label: Derived::new(move || {
                    format!("toast visible: {}", toast.get_state().visible)
                }),
            })
        })?
        .build()
}

fn main() -> Result<(), VaultError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Counter Vault ===\n");

    ReactiveRuntime::scope(|| -> Result<(), VaultError> {
        let vault = build()?;

        // Re-renders whenever the counter or toast store changes
        let _view = create_effect({
            let vault = vault.clone();
            move || {
                let (Ok(counter), Ok(toast)) =
                    (vault.use_store(CounterStore), vault.use_store(ToastStore))
                else {
                    return;
                };
                println!("render: value={} visible={}", counter.value, toast.visible);
            }
        });

        let _subscription = vault.container(ToastStore)?.subscribe(|state| {
            println!("toast changed: visible={}", state.visible);
        });

        let counter = vault.use_store(CounterStore)?;
        counter.increment.run()?;
        counter.increment.run()?;
        counter.decrement.run()?;
        vault.use_store(ToastStore)?.toggle.run()?;

        let labels = vault.use_store(LabelsStore)?;
        println!("\n{}", labels.counter_label.get());
        println!("{}", labels.toast_label.get());

        Ok(())
    })
}
