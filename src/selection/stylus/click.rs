use crate::math::{Point, Real};
use crate::selection::SelectionSet;
use std::hash::Hash;

/// Click semantics of the select button: replace, add, or toggle off with the additive modifier.
#[derive(Clone, Debug)]
pub struct ClickSelection {
    was_hovered_selected: bool,
    additive_throughout: bool,
    button_down_position: Point,
}

impl Default for ClickSelection {
    fn default() -> Self {
        Self {
            was_hovered_selected: false,
            additive_throughout: false,
            button_down_position: Point::origin(),
        }
    }
}

impl ClickSelection {
    pub fn button_down_position(&self) -> Point {
        self.button_down_position
    }

    pub fn on_button_down<O: Copy + Eq + Hash>(
        &mut self,
        selection: &mut SelectionSet<O>,
        hovered: Option<O>,
        hovered_is_ui: bool,
        additive: bool,
        stylus_position: Point,
    ) {
        // Clear selection.
        if !additive {
            selection.clear();
        }

        self.was_hovered_selected = false;
        if let Some(hovered) = hovered {
            if !hovered_is_ui {
                self.was_hovered_selected = selection.contains(hovered);
                selection.insert(hovered);
            }
        }

        self.additive_throughout = additive;
        self.button_down_position = stylus_position;
    }

    /// Called on every frame the button stays down.
    pub fn on_button_held(&mut self, additive: bool) {
        self.additive_throughout &= additive;
    }

    /// Returns `true` if the release toggled the hovered object off.
    pub fn on_button_up<O: Copy + Eq + Hash>(
        &mut self,
        selection: &mut SelectionSet<O>,
        hovered: Option<O>,
        hovered_is_ui: bool,
        additive: bool,
        stylus_position: Point,
        min_drag_distance: Real,
    ) -> bool {
        let was_drag =
            na::distance(&stylus_position, &self.button_down_position) > min_drag_distance;
        let additive = self.additive_throughout && additive;
        let was_selected = std::mem::take(&mut self.was_hovered_selected);

        match hovered {
            Some(hovered) if !hovered_is_ui && was_selected && !was_drag && additive => {
                selection.remove(hovered)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(objects: &[u32]) -> SelectionSet<u32> {
        let mut result = SelectionSet::default();
        for o in objects {
            result.insert(*o);
        }
        result
    }

    #[test]
    fn plain_click_replaces_selection() {
        let mut click = ClickSelection::default();
        let mut set = selection(&[2, 3]);
        click.on_button_down(&mut set, Some(1), false, false, Point::origin());
        assert_eq!(set.sorted(), vec![1]);
    }

    #[test]
    fn additive_click_adds_to_selection() {
        let mut click = ClickSelection::default();
        let mut set = selection(&[2]);
        click.on_button_down(&mut set, Some(1), false, true, Point::origin());
        assert_eq!(set.sorted(), vec![1, 2]);
        assert!(!click.on_button_up(&mut set, Some(1), false, true, Point::origin(), 0.01));
        assert_eq!(set.sorted(), vec![1, 2]);
    }

    #[test]
    fn additive_click_on_selected_object_toggles_it_off() {
        let mut click = ClickSelection::default();
        let mut set = selection(&[1, 2]);
        click.on_button_down(&mut set, Some(1), false, true, Point::origin());
        click.on_button_held(true);
        assert!(click.on_button_up(
            &mut set,
            Some(1),
            false,
            true,
            Point::new(0.005, 0.0, 0.0),
            0.01
        ));
        assert_eq!(set.sorted(), vec![2]);
    }

    #[test]
    fn drag_never_toggles_off() {
        let mut click = ClickSelection::default();
        let mut set = selection(&[1]);
        click.on_button_down(&mut set, Some(1), false, true, Point::origin());
        assert!(!click.on_button_up(&mut set, Some(1), false, true, Point::new(0.5, 0.0, 0.0), 0.01));
        assert_eq!(set.sorted(), vec![1]);
    }

    #[test]
    fn plain_click_on_selected_object_keeps_it() {
        let mut click = ClickSelection::default();
        let mut set = selection(&[1]);
        click.on_button_down(&mut set, Some(1), false, false, Point::origin());
        assert!(!click.on_button_up(&mut set, Some(1), false, false, Point::origin(), 0.01));
        assert_eq!(set.sorted(), vec![1]);
    }

    #[test]
    fn releasing_additive_mid_click_prevents_toggle() {
        let mut click = ClickSelection::default();
        let mut set = selection(&[1]);
        click.on_button_down(&mut set, Some(1), false, true, Point::origin());
        click.on_button_held(false);
        assert!(!click.on_button_up(&mut set, Some(1), false, true, Point::origin(), 0.01));
        assert_eq!(set.sorted(), vec![1]);
    }

    #[test]
    fn ui_objects_never_join_selection() {
        let mut click = ClickSelection::default();
        let mut set = selection(&[]);
        click.on_button_down(&mut set, Some(9), true, true, Point::origin());
        assert!(set.is_empty());
        assert!(!click.on_button_up(&mut set, Some(9), true, true, Point::origin(), 0.01));
    }

    #[test]
    fn clicking_empty_space_forgets_previous_hover_state() {
        let mut click = ClickSelection::default();
        let mut set = selection(&[1]);
        click.on_button_down(&mut set, Some(1), false, true, Point::origin());
        click.on_button_up(&mut set, None, false, true, Point::new(1.0, 0.0, 0.0), 0.01);

        click.on_button_down(&mut set, None, false, true, Point::origin());
        // Hover arrives between press and release, it was not selected at press time.
        assert!(!click.on_button_up(&mut set, Some(1), false, true, Point::origin(), 0.01));
        assert_eq!(set.sorted(), vec![1]);
    }
}
