//! Append-only page store for the live search session.
//!
//! Photos of every accepted page live in one flat buffer; each page is a span
//! over it. The flattened list is therefore the storage itself and cannot
//! drift from the pages. Pages that complete ahead of a gap are parked until
//! the missing page lands, so intra-session order always follows page number.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use crate::model::types::{Photo, PhotoId};

/// What happened to a page result handed to [`ResultAccumulator::on_page_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Appended (together with any parked pages it unblocked).
    Appended { added: usize },
    /// Arrived ahead of a missing page; held until the gap fills.
    Parked,
    /// Belongs to a session that is no longer live.
    Stale,
    /// The page number was already stored or parked.
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PageSpan {
    number: u32,
    range: Range<usize>,
}

#[derive(Debug, Default)]
pub struct ResultAccumulator {
    query: String,
    generation: u64,
    photos: Vec<Photo>,
    pages: Vec<PageSpan>,
    parked: BTreeMap<u32, Vec<Photo>>,
    positions: HashMap<PhotoId, usize>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every page and start the session identified by `generation`.
    pub fn reset(&mut self, query: impl Into<String>, generation: u64) {
        self.query = query.into();
        self.generation = generation;
        self.photos.clear();
        self.pages.clear();
        self.parked.clear();
        self.positions.clear();
    }

    pub fn on_page_result(&mut self, generation: u64, page: u32, photos: Vec<Photo>) -> PageOutcome {
        if generation != self.generation {
            return PageOutcome::Stale;
        }
        if self.pages.iter().any(|p| p.number == page) || self.parked.contains_key(&page) {
            return PageOutcome::Duplicate;
        }

        if page != self.next_page_number() {
            self.parked.insert(page, photos);
            return PageOutcome::Parked;
        }

        let before = self.photos.len();
        self.append(page, photos);
        loop {
            let next = self.next_page_number();
            let Some(parked) = self.parked.remove(&next) else {
                break;
            };
            self.append(next, parked);
        }
        PageOutcome::Appended {
            added: self.photos.len() - before,
        }
    }

    fn append(&mut self, number: u32, photos: Vec<Photo>) {
        let start = self.photos.len();
        for photo in photos {
            let idx = self.photos.len();
            self.positions.entry(photo.id.clone()).or_insert(idx);
            self.photos.push(photo);
        }
        self.pages.push(PageSpan {
            number,
            range: start..self.photos.len(),
        });
    }

    /// The page number the session is waiting for next.
    pub fn next_page_number(&self) -> u32 {
        self.pages.last().map_or(1, |p| p.number + 1)
    }

    /// Flattened list: page order, then intra-page order.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Photos of each stored page, in page order.
    pub fn pages(&self) -> impl Iterator<Item = (u32, &[Photo])> + '_ {
        self.pages
            .iter()
            .map(|span| (span.number, &self.photos[span.range.clone()]))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Position of the first occurrence of `id` in the flattened list.
    pub fn position_of(&self, id: &PhotoId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::PhotoAuthor;

    fn photos(prefix: &str, n: usize) -> Vec<Photo> {
        (0..n)
            .map(|i| Photo {
                id: PhotoId::new(format!("{prefix}{i}")),
                width: 10,
                height: 10,
                description: None,
                alt_description: None,
                color: None,
                urls: Default::default(),
                links: Default::default(),
                user: PhotoAuthor {
                    name: "a".into(),
                    username: "a".into(),
                    links: Default::default(),
                },
            })
            .collect()
    }

    fn ids(acc: &ResultAccumulator) -> Vec<String> {
        acc.photos().iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn pages_append_in_order() {
        let mut acc = ResultAccumulator::new();
        acc.reset("cats", 1);
        assert_eq!(
            acc.on_page_result(1, 1, photos("a", 2)),
            PageOutcome::Appended { added: 2 }
        );
        assert_eq!(
            acc.on_page_result(1, 2, photos("b", 1)),
            PageOutcome::Appended { added: 1 }
        );
        assert_eq!(ids(&acc), ["a0", "a1", "b0"]);
        assert_eq!(acc.page_count(), 2);
        assert_eq!(acc.next_page_number(), 3);
        assert_eq!(acc.query(), "cats");
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut acc = ResultAccumulator::new();
        acc.reset("cats", 1);
        acc.on_page_result(1, 1, photos("a", 2));
        acc.reset("dogs", 2);
        assert_eq!(acc.on_page_result(1, 2, photos("b", 3)), PageOutcome::Stale);
        assert!(acc.is_empty());
    }

    #[test]
    fn duplicate_page_is_rejected() {
        let mut acc = ResultAccumulator::new();
        acc.reset("", 1);
        acc.on_page_result(1, 1, photos("a", 2));
        assert_eq!(acc.on_page_result(1, 1, photos("x", 2)), PageOutcome::Duplicate);
        assert_eq!(ids(&acc), ["a0", "a1"]);
    }

    #[test]
    fn out_of_order_pages_are_parked_until_gap_fills() {
        let mut acc = ResultAccumulator::new();
        acc.reset("", 7);
        assert_eq!(acc.on_page_result(7, 3, photos("c", 1)), PageOutcome::Parked);
        assert_eq!(acc.on_page_result(7, 2, photos("b", 1)), PageOutcome::Parked);
        assert!(acc.is_empty());
        assert_eq!(
            acc.on_page_result(7, 1, photos("a", 1)),
            PageOutcome::Appended { added: 3 }
        );
        assert_eq!(ids(&acc), ["a0", "b0", "c0"]);
        let numbers: Vec<u32> = acc.pages().map(|(n, _)| n).collect();
        assert_eq!(numbers, [1, 2, 3]);
    }

    #[test]
    fn position_lookup_tracks_first_occurrence() {
        let mut acc = ResultAccumulator::new();
        acc.reset("", 1);
        acc.on_page_result(1, 1, photos("a", 3));
        acc.on_page_result(1, 2, photos("a", 1));
        assert_eq!(acc.len(), 4);
        assert_eq!(acc.position_of(&PhotoId::new("a0")), Some(0));
        assert_eq!(acc.position_of(&PhotoId::new("a2")), Some(2));
        assert_eq!(acc.position_of(&PhotoId::new("zz")), None);
    }

    #[test]
    fn empty_page_still_counts_as_stored() {
        let mut acc = ResultAccumulator::new();
        acc.reset("", 1);
        assert_eq!(
            acc.on_page_result(1, 1, Vec::new()),
            PageOutcome::Appended { added: 0 }
        );
        assert_eq!(acc.page_count(), 1);
        assert!(acc.is_empty());
    }
}
