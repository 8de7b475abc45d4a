pub mod sigmoid;

pub use sigmoid::sigmoid_op;
