// Test modules for all components
pub mod test_activations;
pub mod test_linear;
pub mod test_trainer;
