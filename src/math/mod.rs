pub mod linalg;
pub mod matrix;
pub mod normalize;
