mod promo_dto;

pub use promo_dto::{
    CreatePromoDto, PromoListQuery, PromoResponseDto, PromoStatusDto, UpdatePromoDto,
};
