//! UIコンポーネント

pub mod donation_list;
pub mod donor_match;
pub mod donor_signup;
pub mod fields;
pub mod get_help;
pub mod header;
pub mod landing;
pub mod location_detail;
pub mod location_list;
pub mod login;
pub mod map_view;
pub mod organization_form;
pub mod survey_form;
