/// Identifies one info request; only the newest ticket's answer is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// State that lives for as long as the page is open.
#[derive(Debug, Default)]
pub struct Session {
    /// URL whose info is currently on screen
    current_url: Option<String>,
    pending_info: Option<Ticket>,
    downloads_in_flight: usize,
    issued: u64,
}

impl Session {
    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn is_current(&self, url: &str) -> bool {
        self.current_url.as_deref() == Some(url)
    }

    pub fn set_current_url(&mut self, url: String) {
        self.current_url = Some(url);
    }

    pub fn clear_current_url(&mut self) {
        self.current_url = None;
    }

    /// Starts an info request, superseding any that is still in flight.
    pub fn begin_info(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending_info = Some(ticket);
        ticket
    }

    /// Returns false for a ticket that has been superseded.
    pub fn finish_info(&mut self, ticket: Ticket) -> bool {
        if self.pending_info == Some(ticket) {
            self.pending_info = None;
            true
        } else {
            false
        }
    }

    pub fn begin_download(&mut self) {
        self.downloads_in_flight += 1;
    }

    pub fn finish_download(&mut self) {
        self.downloads_in_flight = self.downloads_in_flight.saturating_sub(1);
    }

    /// True while any request should keep the spinner up.
    pub fn is_busy(&self) -> bool {
        self.pending_info.is_some() || self.downloads_in_flight > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut session = Session::default();
        let first = session.begin_info();
        let second = session.begin_info();
        assert_ne!(first, second);
        assert!(!session.finish_info(first));
        assert!(session.is_busy());
        assert!(session.finish_info(second));
        assert!(!session.is_busy());
        assert!(!session.finish_info(second));
    }

    #[test]
    fn downloads_keep_session_busy() {
        let mut session = Session::default();
        session.begin_download();
        session.begin_download();
        session.finish_download();
        assert!(session.is_busy());
        session.finish_download();
        session.finish_download();
        assert!(!session.is_busy());
    }

    #[test]
    fn current_url_tracking() {
        let mut session = Session::default();
        assert!(!session.is_current("https://a"));
        session.set_current_url("https://a".to_string());
        assert!(session.is_current("https://a"));
        assert_eq!(session.current_url(), Some("https://a"));
        session.clear_current_url();
        assert_eq!(session.current_url(), None);
    }
}
