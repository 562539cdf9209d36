/// Double-buffered stylus button states.
#[derive(Clone, Debug, Default)]
pub struct ButtonTracker {
    is_pressed: Vec<bool>,
    was_pressed: Vec<bool>,
}

impl ButtonTracker {
    pub fn new(num_buttons: usize) -> Self {
        Self {
            is_pressed: vec![false; num_buttons],
            was_pressed: vec![false; num_buttons],
        }
    }

    pub fn num_buttons(&self) -> usize {
        self.is_pressed.len()
    }

    /// Records this frame's raw states. Missing entries read as released, extra entries are ignored.
    pub fn update(&mut self, raw_pressed: &[bool]) {
        for (i, (is, was)) in self
            .is_pressed
            .iter_mut()
            .zip(self.was_pressed.iter_mut())
            .enumerate()
        {
            *was = *is;
            *is = raw_pressed.get(i).copied().unwrap_or(false);
        }
    }

    pub fn is_down(&self, button: usize) -> bool {
        self.is_pressed.get(button).copied().unwrap_or(false)
    }

    pub fn went_down(&self, button: usize) -> bool {
        !self.was(button) && self.is_down(button)
    }

    pub fn went_up(&self, button: usize) -> bool {
        self.was(button) && !self.is_down(button)
    }

    fn was(&self, button: usize) -> bool {
        self.was_pressed.get(button).copied().unwrap_or(false)
    }
}
