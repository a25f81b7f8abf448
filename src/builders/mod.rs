pub mod config;
pub mod network;

pub use config::TrainConfigBuilder;
pub use network::NetworkBuilder;
