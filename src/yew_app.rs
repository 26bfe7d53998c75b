use advent_core::content::full_image_url;
use advent_core::layout::{focus_transform, set_open, window_for_day, FocusTransform};
use gloo::events::EventListener;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::app_config;
use crate::door_view::CalendarWindow;
use crate::layout_store;

const BACKGROUND_IMAGE_URL: &str = "/background.jpg";

#[function_component(App)]
pub(crate) fn app() -> Html {
    let config = use_memo((), |_| app_config::calendar_config());
    let viewport = use_state(layout_store::current_viewport);
    let windows = {
        let config = config.clone();
        let viewport = *viewport;
        use_state(move || layout_store::load_windows(&config, viewport))
    };
    let active_day = use_state(|| None::<u32>);
    let modal_day = use_state(|| None::<u32>);

    {
        let config = config.clone();
        let viewport = viewport.clone();
        let windows = windows.clone();
        use_effect_with(
            ((*windows).clone(), *viewport),
            move |(current_windows, previous)| {
                let current_windows = current_windows.clone();
                let previous = *previous;
                let listener = web_sys::window().map(|target| {
                    EventListener::new(&target, "resize", move |_| {
                        let next_viewport = layout_store::current_viewport();
                        if let Some(next) = layout_store::relayout(
                            &config,
                            &current_windows,
                            previous,
                            next_viewport,
                        ) {
                            windows.set(next);
                            viewport.set(next_viewport);
                        }
                    })
                });
                move || drop(listener)
            },
        );
    }
    {
        let modal_day = modal_day.clone();
        use_effect_with(*active_day, move |active| {
            if active.is_none() {
                modal_day.set(None);
            }
            || ()
        });
    }

    let on_open = {
        let windows = windows.clone();
        let viewport = viewport.clone();
        let active_day = active_day.clone();
        Callback::from(move |day: u32| {
            let mut next = (*windows).clone();
            if set_open(&mut next, day, true) {
                layout_store::save_windows(&next, *viewport);
                windows.set(next);
            }
            active_day.set(Some(day));
        })
    };
    let on_close = {
        let windows = windows.clone();
        let viewport = viewport.clone();
        let active_day = active_day.clone();
        Callback::from(move |day: u32| {
            let mut next = (*windows).clone();
            if set_open(&mut next, day, false) {
                layout_store::save_windows(&next, *viewport);
                windows.set(next);
            }
            active_day.set(None);
        })
    };
    let on_focus = {
        let active_day = active_day.clone();
        Callback::from(move |day: u32| active_day.set(Some(day)))
    };
    let on_opened = {
        let modal_day = modal_day.clone();
        Callback::from(move |day: u32| modal_day.set(Some(day)))
    };
    let zoom_out = {
        let active_day = active_day.clone();
        Callback::from(move |_event: MouseEvent| active_day.set(None))
    };
    let close_modal = {
        let modal_day = modal_day.clone();
        let active_day = active_day.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            modal_day.set(None);
            active_day.set(None);
        })
    };

    let season = config.season();
    let transform = (*active_day)
        .and_then(|day| window_for_day(&windows, day))
        .map(|window| focus_transform(window, *viewport))
        .unwrap_or(FocusTransform::IDENTITY);
    let board_style = format!(
        "position: relative; width: 100dvw; height: 100dvh; transform-origin: 0 0; transition: transform 600ms ease; transform: {};",
        transform.to_css()
    );
    let background_url = AttrValue::from(BACKGROUND_IMAGE_URL);
    let doors = windows
        .iter()
        .map(|window| {
            html! {
                <CalendarWindow
                    key={window.day}
                    window={window.clone()}
                    active_day={*active_day}
                    season={season}
                    now_override={config.now_override}
                    background_url={background_url.clone()}
                    on_open={on_open.clone()}
                    on_close={on_close.clone()}
                    on_focus={on_focus.clone()}
                    on_opened={on_opened.clone()}
                />
            }
        })
        .collect::<Html>();

    html! {
        <main class="advent-calendar">
            <div class="calendar-board" style={board_style} onclick={zoom_out}>
                { doors }
            </div>
            if let Some(day) = *modal_day {
                <div class="modal-backdrop" onclick={close_modal.clone()}>
                    <div class="modal-content" onclick={Callback::from(|event: MouseEvent| event.stop_propagation())}>
                        <img src={full_image_url(day)} alt={format!("Day {day}")} />
                        <button class="modal-close" onclick={close_modal}>{ "Close" }</button>
                    </div>
                </div>
            }
        </main>
    }
}
