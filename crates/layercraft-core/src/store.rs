//! Ordered layer collection with selection.

use crate::layer::{Layer, LayerId};
use kurbo::Point;
use std::collections::HashMap;

/// Owns every layer record. `z_order` runs back to front.
///
/// Operations addressing an absent id are no-ops that report `false`.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    layers: HashMap<LayerId, Layer>,
    z_order: Vec<LayerId>,
    selected: Option<LayerId>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a layer on top of the stack. Rejects duplicate ids.
    pub fn insert(&mut self, layer: Layer) -> bool {
        let id = layer.id();
        if self.layers.contains_key(&id) {
            log::warn!("Refusing to insert duplicate layer id {}", id);
            return false;
        }
        self.layers.insert(id, layer);
        self.z_order.push(id);
        true
    }

    /// Remove a layer. Clears the selection if it pointed at the removed layer.
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let layer = self.layers.remove(&id)?;
        self.z_order.retain(|&layer_id| layer_id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(layer)
    }

    /// Move the layer at `from` so that it ends at index `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.z_order.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }
        let id = self.z_order.remove(from);
        self.z_order.insert(to, id);
        true
    }

    /// Set the selection. Selecting an absent id clears it.
    ///
    /// Returns `true` if the selection changed.
    pub fn select(&mut self, id: Option<LayerId>) -> bool {
        let next = id.filter(|id| self.layers.contains_key(id));
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    /// Mutate a layer in place.
    pub fn mutate(&mut self, id: LayerId, f: impl FnOnce(&mut Layer)) -> bool {
        match self.layers.get_mut(&id) {
            Some(layer) => {
                f(layer);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    /// Z-index of a layer.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.z_order.iter().position(|&layer_id| layer_id == id)
    }

    /// Layer at a z-index.
    pub fn at(&self, index: usize) -> Option<&Layer> {
        self.z_order.get(index).and_then(|id| self.layers.get(id))
    }

    /// Layers back to front.
    pub fn ordered(&self) -> impl Iterator<Item = &Layer> {
        self.z_order.iter().filter_map(|id| self.layers.get(id))
    }

    pub fn ids(&self) -> &[LayerId] {
        &self.z_order
    }

    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected.and_then(|id| self.layers.get(&id))
    }

    /// Front-most targetable layer under a canvas point.
    pub fn layer_at(&self, point: Point, tolerance: f64) -> Option<LayerId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.layers.get(id))
            .find(|layer| layer.is_targetable() && layer.hit_test(point, tolerance))
            .map(|layer| layer.id())
    }

    /// Copy of the layer sequence, back to front.
    pub fn to_vec(&self) -> Vec<Layer> {
        self.ordered().cloned().collect()
    }

    /// Replace all layers. Clears the selection if its layer is gone.
    pub(crate) fn restore(&mut self, layers: Vec<Layer>) {
        self.layers.clear();
        self.z_order.clear();
        for layer in layers {
            let id = layer.id();
            if self.layers.insert(id, layer).is_none() {
                self.z_order.push(id);
            }
        }
        if let Some(id) = self.selected {
            if !self.layers.contains_key(&id) {
                self.selected = None;
            }
        }
    }
}
