//! SMS delivery
//!
//! `SmsAeroClient` talks to the SMS Aero gateway; `SmsService` dispatches
//! messages in the background and honours developer mode.

mod sms_aero_client;
mod sms_service;

pub use sms_aero_client::{SmsAeroClient, SmsError, SmsMessage, SmsSender};
pub use sms_service::SmsService;
