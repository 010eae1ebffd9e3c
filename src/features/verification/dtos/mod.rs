mod verification_dto;

pub use verification_dto::{SendCodeDto, VerificationTokenDto};
