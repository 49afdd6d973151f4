use crate::filters::QueryParameters;
use tokio::sync::watch;
use tracing::debug;

/// A committed navigation: the query string that became current and the
/// generation it was assigned. Later navigations always get a higher
/// generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationTicket {
    generation: u64,
    query: QueryParameters,
}

impl NavigationTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &QueryParameters {
        &self.query
    }
}

/// Owner of the listing page's location.
///
/// [`Navigator::push`] returns once the new location is in place, so
/// whoever holds the ticket may decode it immediately. Observers can follow
/// location changes through [`Navigator::subscribe`].
#[derive(Debug)]
pub struct Navigator {
    path: String,
    location: watch::Sender<NavigationTicket>,
}

impl Navigator {
    pub fn new(path: impl Into<String>) -> Self {
        let (location, _) = watch::channel(NavigationTicket::default());
        Self {
            path: path.into(),
            location,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Make `query` the current location
    pub fn push(&self, query: QueryParameters) -> NavigationTicket {
        let mut committed = NavigationTicket::default();
        self.location.send_modify(|current| {
            current.generation += 1;
            current.query = query;
            committed = current.clone();
        });
        debug!(
            "Navigated to {} (generation {})",
            self.href_for(&committed.query),
            committed.generation
        );
        committed
    }

    /// Navigate to an incoming link such as `/imoveis?city=Belem&page=3`.
    /// Only the query part is used.
    pub fn open(&self, href: &str) -> NavigationTicket {
        self.push(query_from_href(href))
    }

    pub fn current(&self) -> NavigationTicket {
        self.location.borrow().clone()
    }

    /// Whether `ticket` is still the latest navigation
    pub fn is_current(&self, ticket: &NavigationTicket) -> bool {
        self.location.borrow().generation == ticket.generation
    }

    /// Current location as a relative link
    pub fn href(&self) -> String {
        self.href_for(&self.location.borrow().query)
    }

    fn href_for(&self, query: &QueryParameters) -> String {
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query.to_query_string())
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NavigationTicket> {
        self.location.subscribe()
    }
}

/// Query parameters of a link, ignoring its path and fragment
pub fn query_from_href(href: &str) -> QueryParameters {
    let query = href.split_once('?').map(|(_, q)| q).unwrap_or("");
    let query = query.split('#').next().unwrap_or("");
    QueryParameters::parse(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_bumps_generation() {
        let nav = Navigator::new("/imoveis");
        let first = nav.push(QueryParameters::new().with("page", "1"));
        let second = nav.push(QueryParameters::new().with("page", "2"));

        assert!(second.generation() > first.generation());
        assert!(!nav.is_current(&first));
        assert!(nav.is_current(&second));
        assert_eq!(nav.current(), second);
    }

    #[test]
    fn same_query_twice_is_still_a_new_navigation() {
        let nav = Navigator::new("/imoveis");
        let query = QueryParameters::new().with("page", "1");
        let first = nav.push(query.clone());
        let second = nav.push(query);
        assert!(!nav.is_current(&first));
        assert!(nav.is_current(&second));
    }

    #[test]
    fn open_reads_query_part() {
        let nav = Navigator::new("/imoveis");
        let ticket = nav.open("/imoveis?city=Belem&page=3#top");
        assert_eq!(ticket.query().get("city"), Some("Belem"));
        assert_eq!(ticket.query().page(), Some(3));
        assert_eq!(nav.href(), "/imoveis?city=Belem&page=3");

        let bare = nav.open("/imoveis");
        assert!(bare.query().is_empty());
        assert_eq!(nav.href(), "/imoveis");

        let junk = nav.open("/imoveis?foo=bar&page=abc");
        assert!(junk.query().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_latest_location() {
        let nav = Navigator::new("/imoveis");
        let mut rx = nav.subscribe();

        nav.push(QueryParameters::new().with("page", "2"));
        let pushed = nav.push(QueryParameters::new().with("page", "3"));

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), pushed);
    }
}
