//! Conventional layer setup.
//!
//! Most applications start from the same five layers. [`DefaultLayers`]
//! creates them and pushes them into a composition in the standard order:
//!
//! | # | Layer     | Partition   |
//! |---|-----------|-------------|
//! | 0 | World     | opaque      |
//! | 1 | Depth     | opaque      |
//! | 2 | Skybox    | opaque      |
//! | 3 | World     | transparent |
//! | 4 | Immediate | opaque      |
//! | 5 | Immediate | transparent |
//! | 6 | UI        | transparent |
//!
//! Depth sits right after the opaque world so it can capture the opaque
//! depth buffer before skybox and transparent geometry are drawn.

use crate::composition::LayerComposition;
use crate::layer::{
    ClearFlags, ClearOptions, LayerKey, LayerOptions, LayerRegistry, SHADER_PASS_DEPTH, SortMode,
};

pub const LAYER_NAME_WORLD: &str = "World";
pub const LAYER_NAME_DEPTH: &str = "Depth";
pub const LAYER_NAME_SKYBOX: &str = "Skybox";
pub const LAYER_NAME_IMMEDIATE: &str = "Immediate";
pub const LAYER_NAME_UI: &str = "UI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultLayers {
    pub world: LayerKey,
    pub depth: LayerKey,
    pub skybox: LayerKey,
    pub immediate: LayerKey,
    pub ui: LayerKey,
}

impl DefaultLayers {
    /// Creates the default layers in `registry` and appends their sub-layers
    /// to `composition`.
    pub fn install(registry: &mut LayerRegistry, composition: &mut LayerComposition) -> Self {
        let world = registry.create(LayerOptions::named(LAYER_NAME_WORLD));
        let depth = registry.create(LayerOptions {
            shader_pass: SHADER_PASS_DEPTH,
            pass_through: true,
            clear: ClearOptions {
                override_clear: false,
                flags: ClearFlags::DEPTH,
                ..Default::default()
            },
            ..LayerOptions::named(LAYER_NAME_DEPTH)
        });
        let skybox = registry.create(LayerOptions {
            opaque_sort_mode: SortMode::None,
            ..LayerOptions::named(LAYER_NAME_SKYBOX)
        });
        let immediate = registry.create(LayerOptions::named(LAYER_NAME_IMMEDIATE));
        let ui = registry.create(LayerOptions {
            transparent_sort_mode: SortMode::Manual,
            pass_through: true,
            ..LayerOptions::named(LAYER_NAME_UI)
        });

        composition.push_opaque(world);
        composition.push_opaque(depth);
        composition.push_opaque(skybox);
        composition.push_transparent(world);
        composition.push_opaque(immediate);
        composition.push_transparent(immediate);
        composition.push_transparent(ui);

        log::debug!("Installed default layers into composition ({} entries)", composition.len());

        Self {
            world,
            depth,
            skybox,
            immediate,
            ui,
        }
    }

    /// All default layers, in creation order.
    #[must_use]
    pub fn all(&self) -> [LayerKey; 5] {
        [self.world, self.depth, self.skybox, self.immediate, self.ui]
    }
}
