pub mod abs;
pub mod ln;

pub use abs::abs_op;
pub use ln::ln_op;
