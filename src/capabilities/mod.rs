mod location;
mod modal;
mod storage;
mod timer;

pub use self::location::{Location, LocationError, LocationOperation, LocationResult, Position};
pub use self::modal::{Modal, ModalOperation};
pub use self::storage::{Storage, StorageError, StorageOperation, StorageOutput, StorageResult};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};

// Crux's built-in Render capability provides all we need for view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

pub type AppLocation = Location<Event>;
pub type AppModal = Modal<Event>;
pub type AppRender = Render<Event>;
pub type AppStorage = Storage<Event>;
pub type AppTimer = Timer<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub location: Location<Event>,
    pub timer: Timer<Event>,
    pub storage: Storage<Event>,
    pub modal: Modal<Event>,
}
