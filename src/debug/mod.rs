pub mod gradient_check;
pub mod numerical_check;

pub use gradient_check::gradient_check;
pub use numerical_check::{
    check_buffer,
    check_layers,
    count_non_finite,
    is_finite,
    max_abs,
    NumericalIssue,
};
