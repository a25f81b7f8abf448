pub mod functions;

pub use functions::{BinaryCrossEntropy, CrossEntropyLoss, Loss, LossKind, PerceptronLoss, MSE};
