use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendCodeDto {
    #[validate(regex(
        path = "*crate::shared::validation::USER_ID_REGEX",
        message = "user_id must be 26 lowercase alphanumeric characters"
    ))]
    pub user_id: String,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "phone must contain 10 to 15 digits"
    ))]
    pub phone: String,
}

/// Handle the member quotes back together with the code
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerificationTokenDto {
    pub token: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_code_validation() {
        let valid = SendCodeDto {
            user_id: "ab12cd34ef56gh78ij90kl12mn".to_string(),
            phone: "+79991234567".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_phone = SendCodeDto {
            phone: "call me".to_string(),
            ..valid
        };
        let err = bad_phone.validate().unwrap_err();
        assert!(err.field_errors().contains_key("phone"));
    }
}
