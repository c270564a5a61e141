//! Active-index state machine over the flattened photo list.

/// Arrow keys as emitted by the rendering layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrow {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

impl From<Arrow> for NavDirection {
    fn from(arrow: Arrow) -> Self {
        match arrow {
            Arrow::Left | Arrow::Up => NavDirection::Previous,
            Arrow::Right | Arrow::Down => NavDirection::Next,
        }
    }
}

/// `At(i)` always satisfies `i < len` for the list it was last updated with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Unset,
    At(usize),
}

impl Cursor {
    pub fn index(self) -> Option<usize> {
        match self {
            Cursor::Unset => None,
            Cursor::At(i) => Some(i),
        }
    }

    pub fn is_active(self, index: usize) -> bool {
        self == Cursor::At(index)
    }

    /// Move one step. From `Unset`, either direction lands on the first photo.
    pub fn navigate(&mut self, direction: NavDirection, len: usize) {
        if len == 0 {
            *self = Cursor::Unset;
            return;
        }
        let last = len - 1;
        *self = match (*self, direction) {
            (Cursor::Unset, _) => Cursor::At(0),
            (Cursor::At(i), NavDirection::Previous) => Cursor::At(i.saturating_sub(1).min(last)),
            (Cursor::At(i), NavDirection::Next) => Cursor::At((i + 1).min(last)),
        };
    }

    /// Jump to a known position; ignored when out of range.
    pub fn focus(&mut self, position: Option<usize>, len: usize) {
        if let Some(i) = position
            && i < len
        {
            *self = Cursor::At(i);
        }
    }

    /// Re-clamp after the list changed. Growth never moves the cursor.
    pub fn list_changed(&mut self, len: usize) {
        match *self {
            _ if len == 0 => *self = Cursor::Unset,
            Cursor::At(i) if i >= len => *self = Cursor::At(len - 1),
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Cursor::Unset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_is_noop_at_boundaries() {
        let mut c = Cursor::At(0);
        c.navigate(NavDirection::Previous, 3);
        assert_eq!(c, Cursor::At(0));

        let mut c = Cursor::At(2);
        c.navigate(NavDirection::Next, 3);
        assert_eq!(c, Cursor::At(2));
    }

    #[test]
    fn navigation_steps_by_one() {
        let mut c = Cursor::At(1);
        c.navigate(NavDirection::Next, 5);
        assert_eq!(c, Cursor::At(2));
        c.navigate(NavDirection::Previous, 5);
        c.navigate(NavDirection::Previous, 5);
        assert_eq!(c, Cursor::At(0));
    }

    #[test]
    fn first_navigation_from_unset_enters_list() {
        let mut c = Cursor::Unset;
        c.navigate(NavDirection::Previous, 4);
        assert_eq!(c, Cursor::At(0));

        let mut empty = Cursor::Unset;
        empty.navigate(NavDirection::Next, 0);
        assert_eq!(empty, Cursor::Unset);
    }

    #[test]
    fn arrows_map_to_directions() {
        assert_eq!(NavDirection::from(Arrow::Left), NavDirection::Previous);
        assert_eq!(NavDirection::from(Arrow::Up), NavDirection::Previous);
        assert_eq!(NavDirection::from(Arrow::Right), NavDirection::Next);
        assert_eq!(NavDirection::from(Arrow::Down), NavDirection::Next);
    }

    #[test]
    fn focus_outside_list_is_ignored() {
        let mut c = Cursor::At(1);
        c.focus(None, 3);
        assert_eq!(c, Cursor::At(1));
        c.focus(Some(9), 3);
        assert_eq!(c, Cursor::At(1));
        c.focus(Some(2), 3);
        assert_eq!(c, Cursor::At(2));
    }

    #[test]
    fn list_changes_clamp_or_keep() {
        let mut c = Cursor::At(5);
        c.list_changed(10);
        assert_eq!(c, Cursor::At(5));
        c.list_changed(3);
        assert_eq!(c, Cursor::At(2));
        c.list_changed(0);
        assert_eq!(c, Cursor::Unset);

        let mut unset = Cursor::Unset;
        unset.list_changed(42);
        assert_eq!(unset, Cursor::Unset);
    }

    #[test]
    fn active_flag_only_for_current_index() {
        assert!(Cursor::At(3).is_active(3));
        assert!(!Cursor::At(3).is_active(2));
        assert!(!Cursor::Unset.is_active(0));
    }
}
