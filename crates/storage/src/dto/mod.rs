pub mod athlete;
pub mod category;
pub mod common;
pub mod training_center;
