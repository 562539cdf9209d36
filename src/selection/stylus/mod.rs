pub use self::click::ClickSelection;
pub use self::hover::{resolve_target, HoverQueue, HoverResolver};
pub use self::track::ButtonTracker;

mod click;
mod hover;
mod track;
