pub mod dense;
pub mod initialization;
pub mod layout;

pub use dense::DenseLayer;
pub use initialization::WeightInit;
pub use layout::{encoded_len, Architecture, LayerView, WeightLayout};
