use std::sync::Arc;

use crate::{
    config::Settings,
    controller::{ClockController, WatchController},
};

pub(crate) type ControllerFactory = Arc<dyn Fn() -> Box<dyn WatchController> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) settings: Arc<Settings>,
    pub(crate) new_controller: ControllerFactory,
}

impl AppState {
    pub(crate) fn new(settings: Settings) -> Self {
        Self::with_controller(
            settings,
            Arc::new(|| Box::new(ClockController::default()) as Box<dyn WatchController>),
        )
    }

    pub(crate) fn with_controller(settings: Settings, new_controller: ControllerFactory) -> Self {
        Self {
            settings: Arc::new(settings),
            new_controller,
        }
    }
}
