use log::warn;
use slotmap::SlotMap;

use crate::layer::{Layer, LayerKey, LayerOptions};

/// Arena that owns every [`Layer`].
///
/// Compositions and layer references only hold [`LayerKey`]s into this
/// registry, so a layer lives until it is removed here.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: SlotMap<LayerKey, Layer>,
}

impl LayerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, layer: Layer) -> LayerKey {
        self.layers.insert(layer)
    }

    /// Creates a layer from `options` and returns its key.
    pub fn create(&mut self, options: LayerOptions) -> LayerKey {
        self.insert(Layer::new(options))
    }

    /// Removes a layer. Compositions still holding `key` skip it.
    pub fn remove(&mut self, key: LayerKey) -> Option<Layer> {
        self.layers.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: LayerKey) -> Option<&Layer> {
        self.layers.get(key)
    }

    pub fn get_mut(&mut self, key: LayerKey) -> Option<&mut Layer> {
        self.layers.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, key: LayerKey) -> bool {
        self.layers.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerKey, &Layer)> {
        self.layers.iter()
    }

    /// Key of the layer whose mesh-instance lists `key` renders: the
    /// referenced layer when a live reference is set, otherwise `key` itself.
    #[must_use]
    pub fn render_source(&self, key: LayerKey) -> LayerKey {
        match self.layers.get(key).and_then(Layer::layer_reference) {
            Some(reference) if self.layers.contains_key(reference) => reference,
            Some(reference) => {
                warn!("Layer reference {reference:?} of {key:?} is dangling, using own lists");
                key
            }
            None => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_source_follows_reference() {
        let mut registry = LayerRegistry::new();
        let world = registry.create(LayerOptions::named("World"));
        let reflection = registry.create(LayerOptions {
            layer_reference: Some(world),
            ..LayerOptions::named("Reflection")
        });

        assert_eq!(registry.render_source(world), world);
        assert_eq!(registry.render_source(reflection), world);
    }

    #[test]
    fn dangling_reference_falls_back_to_self() {
        let mut registry = LayerRegistry::new();
        let world = registry.create(LayerOptions::named("World"));
        let reflection = registry.create(LayerOptions {
            layer_reference: Some(world),
            ..LayerOptions::named("Reflection")
        });
        registry.remove(world);

        assert_eq!(registry.render_source(reflection), reflection);
    }
}
