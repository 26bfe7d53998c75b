mod app_config;
mod clock;
mod door_view;
mod layout_store;
mod local_storage;
mod sinks;
mod yew_app;

use yew_app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
