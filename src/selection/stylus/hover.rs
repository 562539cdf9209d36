use crate::events::{InteractionEvent, Notifier};
use crate::host::{CandidateHit, SceneQuery};
use crate::layers::{Layer, LayerMask};
use crate::math::{Point, Real};
use crate::stylus::StylusPose;
use std::cmp::Ordering;

/// Objects intersecting the stylus probe, nearest to the hot spot first.
#[derive(Clone, Debug)]
pub struct HoverQueue<O> {
    hits: Vec<CandidateHit<O>>,
}

impl<O> Default for HoverQueue<O> {
    fn default() -> Self {
        Self { hits: Vec::new() }
    }
}

impl<O: Copy> HoverQueue<O> {
    pub fn update<S>(&mut self, scene: &S, stylus: &StylusPose, mask: LayerMask)
    where
        S: SceneQuery<Object = O> + ?Sized,
    {
        let hits = scene.cast_ray(&stylus.ray(), stylus.cast_length(), mask);
        self.set_hits(hits, &stylus.hot_spot_world());
    }

    /// Replaces the queue content, ordered by distance to `hot_spot`. Ties keep their input order.
    pub fn set_hits(&mut self, mut hits: Vec<CandidateHit<O>>, hot_spot: &Point) {
        let key = |hit: &CandidateHit<O>| -> Real { na::distance(&hit.point, hot_spot) };
        hits.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
        self.hits = hits;
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }

    pub fn first(&self) -> Option<&CandidateHit<O>> {
        self.hits.first()
    }

    pub fn hits(&self) -> &[CandidateHit<O>] {
        &self.hits
    }
}

/// Maps the nearest hit to the object that should be hovered.
///
/// UI objects are hovered as-is, anything else goes through `relation`.
pub fn resolve_target<S>(
    scene: &S,
    hit: Option<&CandidateHit<S::Object>>,
    ui_layer: Layer,
    relation: &dyn Fn(&S, S::Object) -> Option<S::Object>,
) -> Option<S::Object>
where
    S: SceneQuery + ?Sized,
{
    let hit = hit?;
    if scene.layer(hit.object) == Some(ui_layer) {
        Some(hit.object)
    } else {
        relation(scene, hit.object)
    }
}

#[derive(Clone, Debug)]
pub struct HoverResolver<O> {
    hovered: Option<O>,
    point: Point,
}

impl<O> Default for HoverResolver<O> {
    fn default() -> Self {
        Self {
            hovered: None,
            point: Point::origin(),
        }
    }
}

impl<O: Copy + Eq + std::fmt::Debug> HoverResolver<O> {
    pub fn hovered(&self) -> Option<O> {
        self.hovered
    }

    /// The contact point with the hovered object, or the last one if nothing is hovered.
    pub fn point(&self) -> Point {
        self.point
    }

    pub fn update(
        &mut self,
        hit: Option<&CandidateHit<O>>,
        target: Option<O>,
        notifier: &mut Notifier<O>,
    ) {
        if let Some(hit) = hit {
            self.point = hit.point;
        }

        self.set_hovered(target, notifier);

        if let (Some(object), Some(_)) = (self.hovered, hit) {
            notifier
                .shape
                .on_hover_stay(notifier.stylus, object, &self.point);
            notifier.events.emit(InteractionEvent::HoverStay {
                object,
                point: self.point,
            });
        }
    }

    /// Changes the hovered object, firing the end of the old hover before the start of the new one.
    pub fn set_hovered(&mut self, target: Option<O>, notifier: &mut Notifier<O>) {
        if target == self.hovered {
            return;
        }

        log::debug!("Hover changed: {:?} -> {:?}", self.hovered, target);

        if let Some(previous) = self.hovered {
            notifier.shape.on_hover_end(notifier.stylus, previous);
            notifier
                .events
                .emit(InteractionEvent::HoverEnd { object: previous });
        }

        if let Some(next) = target {
            notifier.events.emit(InteractionEvent::HoverBegin {
                object: next,
                point: self.point,
            });
            notifier.shape.on_hover_begin(notifier.stylus, next, &self.point);
        }

        self.hovered = target;
    }
}
