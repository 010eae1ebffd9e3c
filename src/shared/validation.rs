use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Identity provider user ids: 26 lowercase alphanumeric characters
    /// - Valid: "ab12cd34ef56gh78ij90kl12mn"
    /// - Invalid: "short", "AB12CD34EF56GH78IJ90KL12MN", "ab12-cd34ef56gh78ij90kl12m"
    pub static ref USER_ID_REGEX: Regex = Regex::new(r"^[a-z0-9]{26}$").unwrap();

    /// Phone numbers in international format, digits only with optional leading plus
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{10,15}$").unwrap();

    /// Six digit verification codes
    pub static ref VERIFICATION_CODE_REGEX: Regex = Regex::new(r"^[0-9]{6}$").unwrap();
}

pub fn is_valid_user_id(user_id: &str) -> bool {
    USER_ID_REGEX.is_match(user_id)
}
