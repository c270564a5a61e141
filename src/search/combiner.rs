//! Combine-latest join of the query and page inputs.
//!
//! Two slots hold the latest query and the latest page. An update to either
//! slot emits one [`FetchRequest`] built from the new value and the latest
//! value of the other slot. A query update also opens a new session: the
//! generation is bumped and the page slot goes back to 1.

/// One request for the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub query: String,
    pub page: u32,
    /// Session the request belongs to; responses are fenced on it.
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct QueryPageCombiner {
    query: String,
    page: u32,
    generation: u64,
    active: bool,
}

impl QueryPageCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start emitting. Returns the initial request for the empty query, page 1.
    pub fn activate(&mut self) -> FetchRequest {
        self.active = true;
        self.query.clear();
        self.page = 1;
        self.generation += 1;
        self.emit()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> FetchRequest {
        self.query = query.into();
        self.page = 1;
        self.generation += 1;
        self.emit()
    }

    pub fn set_page(&mut self, page: u32) -> FetchRequest {
        self.page = page;
        self.emit()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn emit(&self) -> FetchRequest {
        FetchRequest {
            query: self.query.clone(),
            page: self.page,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_emits_default_query_first_page() {
        let mut c = QueryPageCombiner::new();
        assert!(!c.is_active());
        let req = c.activate();
        assert!(c.is_active());
        assert_eq!(req.query, "");
        assert_eq!(req.page, 1);
        assert_eq!(req.generation, 1);
    }

    #[test]
    fn page_update_uses_latest_query() {
        let mut c = QueryPageCombiner::new();
        c.activate();
        c.set_query("cats");
        let req = c.set_page(2);
        assert_eq!(req.query, "cats");
        assert_eq!(req.page, 2);
        assert_eq!(req.generation, c.generation());
        assert_eq!(c.page(), 2);
    }

    #[test]
    fn query_update_resets_page_and_bumps_generation() {
        let mut c = QueryPageCombiner::new();
        c.activate();
        c.set_query("cats");
        c.set_page(3);
        let before = c.generation();
        let req = c.set_query("dogs");
        assert_eq!(req.page, 1);
        assert_eq!(req.generation, before + 1);
    }

    #[test]
    fn repeating_a_query_still_opens_a_new_session() {
        let mut c = QueryPageCombiner::new();
        c.activate();
        let a = c.set_query("a");
        c.set_query("b");
        let a2 = c.set_query("a");
        assert_eq!(a.query, a2.query);
        assert_ne!(a.generation, a2.generation);
    }
}
