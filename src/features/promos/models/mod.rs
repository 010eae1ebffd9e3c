mod promo;

pub use promo::{NewPromo, Promo, PromoFilter, PromoPatch, PromoStatus};
