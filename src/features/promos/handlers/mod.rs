mod promo_handler;

pub use promo_handler::*;
