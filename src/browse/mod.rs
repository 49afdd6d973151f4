pub mod navigation;
pub mod pagination;
pub mod session;
pub mod views;

pub use navigation::{NavigationTicket, Navigator};
pub use pagination::PaginationController;
pub use session::{ListingSession, ResultsState, SessionSnapshot, SyncOutcome};
pub use views::{search_by_code, CodeLookup, HomeView, ListingDetail};
