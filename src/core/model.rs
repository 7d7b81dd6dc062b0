use serde::{Deserialize, Serialize};

/// Network architecture settings, carried through to model construction
/// untouched. Zero hidden layers gives the plain linear AR-Net; `d_hidden`
/// is ignored in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub num_hidden_layers: usize,
    pub d_hidden: usize,
}

impl ModelConfig {
    pub fn new(num_hidden_layers: usize, d_hidden: usize) -> Self {
        Self {
            num_hidden_layers,
            d_hidden,
        }
    }
}
