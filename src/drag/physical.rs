use crate::host::{BodyProperties, InteractionHost};
use crate::math::Point;
use std::collections::HashMap;

/// Physics state swapped in while objects are dragged physically.
///
/// Each dragged object loses its own bodies (nested ones included) in favor of a single body
/// with dragging properties, tied to the stylus by a spring. Everything is put back on `end`.
pub struct PhysicalDrag<H: InteractionHost> {
    saved: HashMap<H::Object, BodyProperties>,
    constraints: HashMap<H::Object, H::Constraint>,
}

impl<H: InteractionHost> Default for PhysicalDrag<H> {
    fn default() -> Self {
        Self {
            saved: HashMap::new(),
            constraints: HashMap::new(),
        }
    }
}

impl<H: InteractionHost> PhysicalDrag<H> {
    pub fn is_active(&self) -> bool {
        !self.constraints.is_empty() || !self.saved.is_empty()
    }

    pub fn saved_properties(&self, object: H::Object) -> Option<&BodyProperties> {
        self.saved.get(&object)
    }

    pub fn begin(
        &mut self,
        host: &mut H,
        objects: &[H::Object],
        anchor: &Point,
        dragging: &BodyProperties,
    ) {
        for object in objects {
            // Replace any nested bodies with a single one with dragging properties.
            let velocity = host.velocity(*object).unwrap_or_default();

            for nested in host.nested_bodies(*object) {
                if let Some(properties) = host.body_properties(nested) {
                    self.saved.entry(nested).or_insert(properties);
                    host.remove_body(nested);
                }
            }

            if host.body_properties(*object).is_none() {
                host.install_body(*object, dragging);
                host.set_velocity(*object, &velocity);
            }

            // Constrain the dragged object to the stylus.
            match host.create_constraint(*object, anchor) {
                Some(constraint) => {
                    self.constraints.insert(*object, constraint);
                }
                None => log::warn!("No drag constraint could be created for {:?}", object),
            }
        }

        log::debug!(
            "Physical drag started for {} objects ({} bodies saved)",
            objects.len(),
            self.saved.len()
        );
    }

    pub fn end(&mut self, host: &mut H, objects: &[H::Object]) {
        for object in objects {
            // Delete dragging physics state and restore the original body.
            if let Some(constraint) = self.constraints.remove(object) {
                host.remove_constraint(constraint);
            }

            let velocity = host.velocity(*object).unwrap_or_default();
            host.remove_body(*object);

            if let Some(properties) = self.saved.remove(object) {
                host.install_body(*object, &properties);
                if properties.body_type.is_dynamic() {
                    host.set_velocity(*object, &velocity);
                }
            }
        }

        for (nested, properties) in self.saved.drain() {
            host.install_body(nested, &properties);
        }

        // Leftovers from objects that were not part of this call.
        for (_, constraint) in self.constraints.drain() {
            host.remove_constraint(constraint);
        }

        log::debug!("Physical drag ended for {} objects", objects.len());
    }
}
