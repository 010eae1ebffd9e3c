mod verification_handler;

pub use verification_handler::*;
