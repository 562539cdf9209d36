use crate::host::{SceneQuery, VolumeBounds};
use crate::layers::{Layer, LayerMask};
use crate::math::{Isometry, Point, Rotation, Translation};
use crate::selection::SelectionSet;
use crate::stylus::StylusPose;
use std::collections::{HashMap, HashSet};

/// Filter applied to the owners of overlapping collidables.
#[derive(Copy, Clone, Debug)]
pub struct VolumeFilter {
    pub mask: LayerMask,
    pub ui_layer: Layer,
}

/// A box stretched by the stylus while the select button is held over empty space.
///
/// Every eligible object it overlaps joins the selection and leaves it once the overlap ends.
#[derive(Clone, Debug)]
pub struct SelectionVolume<O> {
    active: bool,
    start: Point,
    end: Point,
    rotation: Rotation,
    // Collidable -> owner resolved when the overlap began.
    colliding: HashMap<O, Option<O>>,
    // Owners are counted since several collidables may alias the same owner.
    owners: HashMap<O, usize>,
}

impl<O> Default for SelectionVolume<O> {
    fn default() -> Self {
        Self {
            active: false,
            start: Point::origin(),
            end: Point::origin(),
            rotation: Rotation::identity(),
            colliding: HashMap::new(),
            owners: HashMap::new(),
        }
    }
}

impl<O: Copy + Eq + std::hash::Hash + std::fmt::Debug> SelectionVolume<O> {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn begin(&mut self, stylus: &StylusPose, axis_aligned: bool) {
        self.start = stylus.hot_spot_world();
        self.end = self.start;
        self.rotation = if axis_aligned {
            Rotation::identity()
        } else {
            stylus.rotation()
        };
        self.active = true;
        log::debug!("Selection volume started at {:?}", self.start);
    }

    pub fn update(&mut self, stylus: &StylusPose) {
        if self.active {
            self.end = stylus.hot_spot_world();
        }
    }

    /// Stops tracking overlaps. Objects selected by the volume stay selected.
    pub fn end(&mut self) {
        if self.active {
            log::debug!("Selection volume stopped at {:?}", self.end);
        }
        self.active = false;
        self.colliding.clear();
        self.owners.clear();
    }

    pub fn bounds(&self) -> Option<VolumeBounds> {
        if !self.active {
            return None;
        }

        let center = na::center(&self.start, &self.end);
        let diagonal = self.rotation.inverse() * (self.end - self.start);
        Some(VolumeBounds {
            pose: Isometry::from_parts(Translation::from(center.coords), self.rotation),
            half_extents: diagonal.abs() * 0.5,
        })
    }

    pub fn overlap_begin<S>(
        &mut self,
        scene: &S,
        collidable: O,
        relation: &dyn Fn(&S, O) -> Option<O>,
        filter: VolumeFilter,
        selection: &mut SelectionSet<O>,
    ) where
        S: SceneQuery<Object = O> + ?Sized,
    {
        if !self.active || self.colliding.contains_key(&collidable) {
            return;
        }

        let owner = relation(scene, collidable).filter(|owner| {
            scene
                .layer(*owner)
                .map(|layer| filter.mask.contains(layer) && layer != filter.ui_layer)
                .unwrap_or(false)
        });
        self.colliding.insert(collidable, owner);

        if let Some(owner) = owner {
            let count = self.owners.entry(owner).or_insert(0);
            *count += 1;
            if *count == 1 {
                selection.insert(owner);
            }
        }
    }

    pub fn overlap_end(&mut self, collidable: O, selection: &mut SelectionSet<O>) {
        if let Some(Some(owner)) = self.colliding.remove(&collidable) {
            if let Some(count) = self.owners.get_mut(&owner) {
                *count -= 1;
                if *count == 0 {
                    self.owners.remove(&owner);
                    selection.remove(owner);
                }
            }
        }
    }

    /// Recomputes overlaps through [`SceneQuery::intersect_volume`] when the host supports it.
    pub fn sync_overlaps<S>(
        &mut self,
        scene: &S,
        relation: &dyn Fn(&S, O) -> Option<O>,
        filter: VolumeFilter,
        selection: &mut SelectionSet<O>,
    ) where
        S: SceneQuery<Object = O> + ?Sized,
    {
        let Some(bounds) = self.bounds() else {
            return;
        };
        let Some(overlapping) = scene.intersect_volume(&bounds, LayerMask::ALL) else {
            return;
        };
        let overlapping: HashSet<O> = overlapping.into_iter().collect();

        let ended: Vec<O> = self
            .colliding
            .keys()
            .filter(|c| !overlapping.contains(*c))
            .copied()
            .collect();
        for collidable in ended {
            self.overlap_end(collidable, selection);
        }

        for collidable in overlapping {
            self.overlap_begin(scene, collidable, relation, filter, selection);
        }
    }
}
