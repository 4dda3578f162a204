//! Give & Get Common Library
//!
//! CLIとWeb(WASM)で共有されるフォーム状態・検証・APIクライアント・地図同期

pub mod about;
pub mod api;
pub mod config;
pub mod donations;
pub mod error;
pub mod form;
pub mod forms;
pub mod map;
pub mod nav;
pub mod needs;
pub mod session;
pub mod submit;
pub mod types;
pub mod validation;

pub use about::AboutContent;
pub use api::{ApiClient, ApiTransport, HttpMethod, HttpReply, PeopleMatchRequest, SupplyMatchRequest};
pub use config::ClientConfig;
pub use donations::{DonationDraft, DonationItem, DonationList};
pub use error::{ApiError, Error, LoadError, Result};
pub use form::{FieldGroup, FieldKey, FieldSpec, FieldValue, FormState};
pub use forms::{DonorForm, Form, OrganizationForm, SurveyForm};
pub use map::{MapEvent, MapSurface, MapSync, RouteOutcome, RouteRequest};
pub use nav::{AuthStore, Route};
pub use needs::{Need, NeedField, NeedsList, Urgency};
pub use session::{MatchSession, QueryOutcome, QueryTicket, SelectionState};
pub use submit::{SubmitReceipt, SubmitStatus, Submission};
pub use types::{Coordinate, LocationEntry, LocationSet};
pub use validation::{Rule, ValidationErrors};
