use crate::math::{Point, Real};
use crate::stylus::{StylusPose, StylusShape};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InteractionEvent<O> {
    HoverBegin { object: O, point: Point },
    HoverStay { object: O, point: Point },
    HoverEnd { object: O },
    Selected(O),
    Deselected(O),
    DragBegin(O),
    DragEnd(O),
}

impl<O: Copy> InteractionEvent<O> {
    pub fn object(&self) -> O {
        match *self {
            Self::HoverBegin { object, .. }
            | Self::HoverStay { object, .. }
            | Self::HoverEnd { object } => object,
            Self::Selected(object)
            | Self::Deselected(object)
            | Self::DragBegin(object)
            | Self::DragEnd(object) => object,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HoverBegin { .. } => "hover_begin",
            Self::HoverStay { .. } => "hover_stay",
            Self::HoverEnd { .. } => "hover_end",
            Self::Selected(_) => "selected",
            Self::Deselected(_) => "deselected",
            Self::DragBegin(_) => "drag_begin",
            Self::DragEnd(_) => "drag_end",
        }
    }
}

/// Receives interaction events as they fire.
pub trait InteractionListener<O> {
    fn on_event(&mut self, event: &InteractionEvent<O>);

    /// Called once at the end of every tick.
    fn on_frame(&mut self, _dt: Real) {}
}

/// Dispatches events to the registered listeners and keeps the ones fired during the current tick.
pub struct EventBus<O> {
    listeners: Vec<Box<dyn InteractionListener<O>>>,
    frame_events: Vec<InteractionEvent<O>>,
}

impl<O> Default for EventBus<O> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            frame_events: Vec::new(),
        }
    }
}

impl<O: Copy> EventBus<O> {
    pub fn subscribe(&mut self, listener: Box<dyn InteractionListener<O>>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: InteractionEvent<O>) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
        self.frame_events.push(event);
    }

    pub fn begin_frame(&mut self) {
        self.frame_events.clear();
    }

    pub fn end_frame(&mut self, dt: Real) {
        for listener in &mut self.listeners {
            listener.on_frame(dt);
        }
    }

    /// Events fired since the start of the current tick, in firing order.
    pub fn frame_events(&self) -> &[InteractionEvent<O>] {
        &self.frame_events
    }
}

/// Everything a component needs to report what happened during a tick.
pub struct Notifier<'a, O> {
    pub stylus: &'a StylusPose,
    pub events: &'a mut EventBus<O>,
    pub shape: &'a mut dyn StylusShape<O>,
}

impl<'a, O> Notifier<'a, O> {
    pub fn new(
        stylus: &'a StylusPose,
        events: &'a mut EventBus<O>,
        shape: &'a mut dyn StylusShape<O>,
    ) -> Self {
        Self {
            stylus,
            events,
            shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<&'static str>>>);

    impl InteractionListener<u32> for Recorder {
        fn on_event(&mut self, event: &InteractionEvent<u32>) {
            self.0.borrow_mut().push(event.name());
        }
    }

    #[test]
    fn listeners_see_events_in_firing_order() {
        let seen = Rc::new(RefCell::new(vec![]));
        let mut bus = EventBus::default();
        bus.subscribe(Box::new(Recorder(seen.clone())));

        bus.begin_frame();
        bus.emit(InteractionEvent::HoverEnd { object: 1 });
        bus.emit(InteractionEvent::Selected(2));

        assert_eq!(*seen.borrow(), vec!["hover_end", "selected"]);
        assert_eq!(bus.frame_events().len(), 2);
        assert_eq!(bus.frame_events()[1].object(), 2);

        bus.begin_frame();
        assert!(bus.frame_events().is_empty());
    }
}
