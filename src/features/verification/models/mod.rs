mod verification_token;

pub use verification_token::{NewVerificationToken, VerificationToken};
