mod promo_service;

pub use promo_service::PromoService;
