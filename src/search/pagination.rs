//! Infinite-scroll page counter.
//!
//! Only one page fetch is outstanding per session. Scroll signals that arrive
//! while it is pending are dropped, and an empty page ends the session's
//! pagination since the provider gives no explicit "has more" flag.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationDriver {
    /// Highest page stored for the session (0 before the first one lands).
    settled: u32,
    pending: Option<u32>,
    exhausted: bool,
}

impl PaginationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// New session: page 1 is being fetched.
    pub fn reset(&mut self) {
        self.settled = 0;
        self.pending = Some(1);
        self.exhausted = false;
    }

    /// Scroller crossed the threshold. Returns the page to request, if any.
    pub fn on_load_more_signal(&mut self) -> Option<u32> {
        if self.pending.is_some() || self.exhausted {
            return None;
        }
        let next = self.settled + 1;
        self.pending = Some(next);
        Some(next)
    }

    /// A page for the live session landed with `count` photos.
    pub fn on_page_settled(&mut self, page: u32, count: usize) {
        if self.pending == Some(page) {
            self.pending = None;
            self.settled = self.settled.max(page);
        }
        if count == 0 {
            self.exhausted = true;
        }
    }

    /// A page fetch failed; the next signal retries the same page.
    pub fn on_page_failed(&mut self, page: u32) {
        if self.pending == Some(page) {
            self.pending = None;
        }
    }

    /// Current page counter: the page in flight, else the last one stored.
    pub fn page(&self) -> u32 {
        self.pending.unwrap_or(self.settled).max(1)
    }

    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Whether a viewport ending at `viewport_end` (exclusive item index) has
/// scrolled past `threshold` (a fraction in `(0, 1]`) of a list of `len` items.
pub fn threshold_reached(viewport_end: usize, len: usize, threshold: f32) -> bool {
    if len == 0 {
        return false;
    }
    let seen = viewport_end.min(len) as f32 / len as f32;
    seen >= threshold
}

/// Edge-triggered load-more signal for a front-end that redraws in a loop.
///
/// A signal fires once per `(viewport_end, len)` pair past the threshold.
/// While the last fetch errored it only fires after [`rearm`](Self::rearm),
/// so a failing page is retried on user input instead of every frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollTrigger {
    last: Option<(usize, usize)>,
    armed: bool,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// User scrolled or typed.
    pub fn rearm(&mut self) {
        self.last = None;
        self.armed = true;
    }

    /// Whether this frame should send the load-more signal.
    pub fn fire(&mut self, viewport_end: usize, len: usize, threshold: f32, errored: bool) -> bool {
        if !threshold_reached(viewport_end, len, threshold) {
            return false;
        }
        let key = Some((viewport_end, len));
        if errored {
            if !self.armed {
                return false;
            }
        } else if self.last == key {
            return false;
        }
        self.armed = false;
        self.last = key;
        true
    }
}
