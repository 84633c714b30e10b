//! Session state and the view model that owns it

pub mod state;
pub mod view_model;

pub use state::{IdentitySlice, MetadataSlice, ReportedFailure, SessionOperation, SessionSnapshot};
pub use view_model::SessionViewModel;
