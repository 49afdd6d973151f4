pub mod dashboard;
pub mod guard;
pub mod listing_form;

pub use dashboard::{AdminDashboard, Notice, NoticeLevel};
pub use guard::{AdminAccess, AdminToken};
pub use listing_form::{ListingDraft, ListingFormError};
