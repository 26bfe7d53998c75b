use advent_core::DoorSinks;

/// Collaborator sinks that only leave a trace in the console.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ConsoleSinks;

impl DoorSinks for ConsoleSinks {
    fn notify_opened(&self, day: u32) {
        trace("door opened", day);
    }

    fn notify_open_intent(&self, day: u32) {
        trace("analytics: door_open", day);
    }

    fn notify_close_intent(&self, day: u32) {
        trace("analytics: door_close", day);
    }
}

fn trace(label: &str, day: u32) {
    #[cfg(target_arch = "wasm32")]
    {
        gloo::console::log!(label, day);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (label, day);
    }
}
