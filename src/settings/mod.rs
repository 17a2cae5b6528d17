//! Tenant and domain configuration documents: free-form domain settings,
//! ID card layout and Razorpay credentials.

mod defaults;
mod editor;
mod idcard;
mod path;
mod razorpay;

pub use defaults::default_settings;
pub use editor::{extract_settings, SettingsEditor};
pub use idcard::{list_id_card_settings, IdCardForm, ValidityType, MAX_TERMS};
pub use path::{get_path, parse_value, set_path};
pub use razorpay::{list_razorpay_configs, search_configs, RazorpayForm, RazorpayTarget, GLOBAL_RAZORPAY_PATH};
