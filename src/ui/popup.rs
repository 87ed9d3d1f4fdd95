/// Popup UI for Tab Sweeper extension

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::actions::{
    clean_current_window, clean_every_window, clean_stale, last_clean_label, window_stats,
    ActionOutcome, ActionStatus,
};
use crate::chrome::{format_short_date, ChromeStorage, ChromeTabs, JsClock};
use crate::constants::POPUP_CLOSE_DELAY_MS;
use crate::host::Clock;
use crate::storage::load_last_clean_time;
use log::warn;

#[derive(Clone, Copy, PartialEq)]
enum PopupAction {
    CleanCurrentWindow,
    CleanAllWindows,
    CleanStaleTabs,
}

impl PopupAction {
    fn busy_message(self) -> &'static str {
        match self {
            PopupAction::CleanCurrentWindow => "Cleaning current window...",
            PopupAction::CleanAllWindows => "Cleaning all windows...",
            PopupAction::CleanStaleTabs => "Closing stale tabs...",
        }
    }

    async fn run(self) -> ActionOutcome {
        match self {
            PopupAction::CleanCurrentWindow => {
                clean_current_window(&ChromeTabs, &ChromeStorage, &JsClock).await
            }
            PopupAction::CleanAllWindows => {
                clean_every_window(&ChromeTabs, &ChromeStorage, &JsClock).await
            }
            PopupAction::CleanStaleTabs => clean_stale(&ChromeTabs, &ChromeStorage, &JsClock).await,
        }
    }
}

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Busy(&'static str),
    Done(ActionOutcome),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);
    let stats_text = use_state(String::new);
    let last_clean_text = use_state(String::new);

    // Refresh the info lines; also called after every action
    let refresh = {
        let stats_text = stats_text.clone();
        let last_clean_text = last_clean_text.clone();

        Callback::from(move |_: ()| {
            let stats_text = stats_text.clone();
            let last_clean_text = last_clean_text.clone();

            spawn_local(async move {
                stats_text.set(load_stats_text().await);
                last_clean_text.set(load_last_clean_text().await);
            });
        })
    };

    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let on_action = {
        let state = state.clone();
        let refresh = refresh.clone();

        move |action: PopupAction| {
            let state = state.clone();
            let refresh = refresh.clone();

            Callback::from(move |_: MouseEvent| {
                let state = state.clone();
                let refresh = refresh.clone();

                state.set(AppState::Busy(action.busy_message()));

                spawn_local(async move {
                    let outcome = action.run().await;
                    if outcome.closed_tabs() {
                        close_popup_after(POPUP_CLOSE_DELAY_MS);
                    }
                    state.set(AppState::Done(outcome));
                    refresh.emit(());
                });
            })
        }
    };

    let is_busy = matches!(*state, AppState::Busy(_));

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Sweeper"}</h1>

            <div class="flex-column-gap">
                <Button onclick={on_action(PopupAction::CleanCurrentWindow)} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                    {"Clean Current Window"}
                </Button>
                <Button onclick={on_action(PopupAction::CleanAllWindows)} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Clean All Windows"}
                </Button>
                <Button onclick={on_action(PopupAction::CleanStaleTabs)} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Close Tabs Unvisited for 7 Days"}
                </Button>
            </div>

            // Status display
            {match &*state {
                AppState::Busy(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{*msg}</p>
                    </div>
                },
                AppState::Done(outcome) => {
                    let alert_type = match outcome.status {
                        ActionStatus::Success => AlertType::Success,
                        ActionStatus::NoOp => AlertType::Info,
                        ActionStatus::Error => AlertType::Danger,
                    };
                    html! {
                        <div class="message-top-margin">
                            <Alert r#type={alert_type} title={outcome.message.clone()} inline={true}>
                            </Alert>
                        </div>
                    }
                },
                AppState::Idle => html! {}
            }}

            <p class="stats-text">{(*stats_text).clone()}</p>
            <p class="last-clean-text">{(*last_clean_text).clone()}</p>

            <p class="footer-popup">
                {"Tab Sweeper v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

fn close_popup_after(delay_ms: i32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let target = window.clone();
    let close = Closure::once_into_js(move || {
        if let Err(e) = target.close() {
            warn!("Could not close popup: {:?}", e);
        }
    });
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(close.unchecked_ref(), delay_ms)
    {
        warn!("Could not schedule popup close: {:?}", e);
    }
}

async fn load_stats_text() -> String {
    match window_stats(&ChromeTabs).await {
        Ok(stats) => stats.to_string(),
        Err(e) => {
            warn!("Failed to read window stats: {}", e);
            "Unable to read tab information".to_string()
        }
    }
}

async fn load_last_clean_text() -> String {
    match load_last_clean_time(&ChromeStorage).await {
        Ok(last_clean) => last_clean_label(last_clean, JsClock.now_ms(), format_short_date),
        Err(e) => {
            warn!("Failed to read last cleanup time: {}", e);
            String::new()
        }
    }
}
