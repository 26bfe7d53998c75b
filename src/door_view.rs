use std::cell::{Cell, RefCell};
use std::rc::Rc;

use advent_core::{DoorController, DoorFace, DoorIntent, DoorSnapshot, Point, Season, Window};
use chrono::NaiveDateTime;
use gloo::timers::callback::Timeout;
use web_sys::{MouseEvent, TouchEvent};
use yew::prelude::*;

use crate::clock::{now_ms, wall_clock};
use crate::sinks::ConsoleSinks;

#[derive(Properties, PartialEq)]
pub(crate) struct CalendarWindowProps {
    pub(crate) window: Window,
    pub(crate) active_day: Option<u32>,
    pub(crate) season: Season,
    pub(crate) now_override: Option<NaiveDateTime>,
    pub(crate) background_url: AttrValue,
    pub(crate) on_open: Callback<u32>,
    pub(crate) on_close: Callback<u32>,
    pub(crate) on_focus: Callback<u32>,
    pub(crate) on_opened: Callback<u32>,
}

#[derive(Clone)]
struct DoorHandlers {
    on_open: Callback<u32>,
    on_close: Callback<u32>,
    on_focus: Callback<u32>,
    on_opened: Callback<u32>,
    render: Callback<DoorSnapshot>,
}

/// Owns one door's controller and its single pending timer.
struct DoorRuntime {
    day: u32,
    controller: RefCell<DoorController>,
    timer: RefCell<Option<Timeout>>,
    handlers: RefCell<Option<DoorHandlers>>,
    season: Cell<Season>,
    now_override: Cell<Option<NaiveDateTime>>,
}

impl DoorRuntime {
    fn new(
        window: &Window,
        active_day: Option<u32>,
        season: Season,
        now_override: Option<NaiveDateTime>,
    ) -> Self {
        let now = now_override.unwrap_or_else(wall_clock);
        let controller = DoorController::new(
            window.day,
            window.is_open,
            active_day,
            season.gate(window.day, now),
            now_ms(),
        );
        Self {
            day: window.day,
            controller: RefCell::new(controller),
            timer: RefCell::new(None),
            handlers: RefCell::new(None),
            season: Cell::new(season),
            now_override: Cell::new(now_override),
        }
    }

    fn snapshot(&self) -> DoorSnapshot {
        self.controller.borrow().snapshot()
    }

    fn set_context(&self, season: Season, now_override: Option<NaiveDateTime>, handlers: DoorHandlers) {
        self.season.set(season);
        self.now_override.set(now_override);
        *self.handlers.borrow_mut() = Some(handlers);
    }

    fn refresh_gate(&self) {
        let now = self.now_override.get().unwrap_or_else(wall_clock);
        let gate = self.season.get().gate(self.day, now);
        self.controller.borrow_mut().set_gate(gate);
    }

    fn sync(self: &Rc<Self>, is_open: bool, active_day: Option<u32>) {
        self.refresh_gate();
        self.controller
            .borrow_mut()
            .sync(is_open, active_day, now_ms());
        self.dispatch(Vec::new());
    }

    fn touch_start(self: &Rc<Self>, face: DoorFace, event: &TouchEvent) {
        let Some(point) = touch_point(event, false) else {
            return;
        };
        self.refresh_gate();
        self.controller
            .borrow_mut()
            .touch_start(face, point, now_ms());
        self.dispatch(Vec::new());
    }

    fn touch_move(&self, event: &TouchEvent) {
        if let Some(point) = touch_point(event, false) {
            self.controller.borrow_mut().touch_move(point);
        }
    }

    fn touch_end(self: &Rc<Self>, event: &TouchEvent) {
        let point = touch_point(event, true);
        let intents = self.controller.borrow_mut().touch_end(point, now_ms());
        self.dispatch(intents);
    }

    fn touch_cancel(&self) {
        self.controller.borrow_mut().touch_cancel();
    }

    fn click(self: &Rc<Self>, face: DoorFace) {
        self.refresh_gate();
        let intents = self.controller.borrow_mut().click(face, now_ms());
        self.dispatch(intents);
    }

    fn dispatch(self: &Rc<Self>, intents: Vec<DoorIntent>) {
        let handlers = self.handlers.borrow().clone();
        if let Some(handlers) = handlers.as_ref() {
            for intent in &intents {
                intent.notify(&ConsoleSinks);
                match *intent {
                    DoorIntent::OpenRequest(day) => handlers.on_open.emit(day),
                    DoorIntent::CloseRequest(day) => handlers.on_close.emit(day),
                    DoorIntent::Focus(day) => handlers.on_focus.emit(day),
                    DoorIntent::Opened(day) => handlers.on_opened.emit(day),
                }
            }
        }
        self.rearm();
        if let Some(handlers) = handlers {
            handlers.render.emit(self.snapshot());
        }
    }

    fn rearm(self: &Rc<Self>) {
        self.timer.borrow_mut().take();
        let now = now_ms();
        let Some(deadline) = self.controller.borrow().next_wakeup(now) else {
            return;
        };
        let delay_ms = (deadline - now).max(0.0).ceil() as u32;
        let runtime = Rc::clone(self);
        *self.timer.borrow_mut() = Some(Timeout::new(delay_ms, move || {
            runtime.timer.borrow_mut().take();
            runtime.refresh_gate();
            let intents = runtime.controller.borrow_mut().advance(now_ms());
            runtime.dispatch(intents);
        }));
    }

    fn teardown(&self) {
        self.controller.borrow_mut().teardown();
        self.timer.borrow_mut().take();
        self.handlers.borrow_mut().take();
    }
}

fn touch_point(event: &TouchEvent, use_changed: bool) -> Option<Point> {
    let list = if use_changed {
        event.changed_touches()
    } else {
        event.touches()
    };
    let touch = list.item(0)?;
    Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

fn image_style(url: &str) -> String {
    format!(
        "background-image: url(\"{url}\"); background-size: cover; background-position: center; width: 100%; height: 100%;"
    )
}

fn thumbnail_class(active: bool) -> &'static str {
    if active {
        "absolute inset-0 rounded-lg transition-all duration-500 md:opacity-0 md:transition-delay-0 sm:opacity-100"
    } else {
        "absolute inset-0 rounded-lg transition-all duration-500 sm:opacity-100"
    }
}

fn full_image_class(active: bool) -> &'static str {
    if active {
        "absolute inset-0 rounded-lg transition-all duration-500 hidden md:block md:opacity-100 md:transition-delay-0"
    } else {
        "absolute inset-0 rounded-lg transition-all duration-500 hidden md:block md:opacity-0 md:transition-delay-300"
    }
}

#[function_component(CalendarWindow)]
pub(crate) fn calendar_window(props: &CalendarWindowProps) -> Html {
    let runtime = {
        let window = props.window.clone();
        let active_day = props.active_day;
        let season = props.season;
        let now_override = props.now_override;
        (*use_state(move || Rc::new(DoorRuntime::new(&window, active_day, season, now_override))))
            .clone()
    };
    let snapshot = {
        let runtime = runtime.clone();
        use_state(move || runtime.snapshot())
    };
    {
        let render = snapshot.setter();
        runtime.set_context(
            props.season,
            props.now_override,
            DoorHandlers {
                on_open: props.on_open.clone(),
                on_close: props.on_close.clone(),
                on_focus: props.on_focus.clone(),
                on_opened: props.on_opened.clone(),
                render: Callback::from(move |next: DoorSnapshot| render.set(next)),
            },
        );
    }
    {
        let runtime = runtime.clone();
        use_effect_with(
            (props.window.is_open, props.active_day),
            move |(is_open, active_day)| {
                runtime.sync(*is_open, *active_day);
                || ()
            },
        );
    }
    {
        let runtime = runtime.clone();
        use_effect_with((), move |_| move || runtime.teardown());
    }

    let ontouchstart = {
        let runtime = runtime.clone();
        Callback::from(move |event: TouchEvent| runtime.touch_start(DoorFace::Front, &event))
    };
    let ontouchmove = {
        let runtime = runtime.clone();
        Callback::from(move |event: TouchEvent| runtime.touch_move(&event))
    };
    let ontouchend = {
        let runtime = runtime.clone();
        Callback::from(move |event: TouchEvent| runtime.touch_end(&event))
    };
    let ontouchcancel = {
        let runtime = runtime.clone();
        Callback::from(move |_event: TouchEvent| runtime.touch_cancel())
    };
    let face_click = |face: DoorFace| {
        let runtime = runtime.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            runtime.click(face);
        })
    };
    let face_touch = |face: DoorFace| {
        let runtime = runtime.clone();
        Callback::from(move |event: TouchEvent| {
            event.stop_propagation();
            runtime.touch_start(face, &event);
        })
    };

    let snap = (*snapshot).clone();
    let window = &props.window;
    let container_style = format!(
        "perspective: 2000px; left: {}px; top: {}px; width: {}px; height: {}px; will-change: transform;",
        window.x, window.y, window.width, window.height
    );
    let background_style = format!(
        "background-image: url(\"{}\"); background-size: cover; background-position: center; transform: translate({}px, {}px); width: 100dvw; height: 100dvh; position: absolute; top: 0; left: 0; transform-origin: 0 0;",
        props.background_url, -window.x, -window.y
    );
    let content_cursor = if snap.is_open {
        "cursor: pointer;"
    } else {
        "cursor: default;"
    };

    html! {
        <div
            class="calendar-window absolute pointer-events-auto"
            style={container_style}
            {ontouchstart}
            {ontouchmove}
            {ontouchend}
            {ontouchcancel}
            onclick={face_click(DoorFace::Content)}
        >
            <div class={snap.door_class()} style="transform-style: preserve-3d; will-change: transform;">
                <div class="door-front" onclick={face_click(DoorFace::Front)}>
                    <div class="door-front-image" style={background_style} />
                    <div class="door-number">{ snap.day }</div>
                    if snap.show_start_label {
                        <div class="start-label">{ "Start here" }</div>
                    }
                    if snap.show_message {
                        <div class={snap.message_class()}>{ snap.opening_date_message.clone() }</div>
                    }
                    if snap.show_click_hint {
                        <div class="click-message">{ "Click to open" }</div>
                    }
                </div>
                <div
                    class="door-back"
                    onclick={face_click(DoorFace::Back)}
                    ontouchstart={face_touch(DoorFace::Back)}
                    style="position: absolute; inset: 0; cursor: pointer; z-index: 10; backface-visibility: hidden;"
                />
            </div>
            <div
                class="content-behind rounded-lg"
                onclick={face_click(DoorFace::Content)}
                ontouchstart={face_touch(DoorFace::Content)}
                style={content_cursor}
            >
                if snap.show_content {
                    <div class="relative w-full h-full">
                        <div
                            class={thumbnail_class(snap.prefers_full_image())}
                            style={image_style(&snap.thumbnail_url())}
                        />
                        <div
                            class={full_image_class(snap.prefers_full_image())}
                            style={image_style(&snap.full_image_url())}
                        />
                    </div>
                }
            </div>
        </div>
    }
}
