use time::Date;

/// An inclusive span of dates picked out by dragging across the grid
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DragRange {
    pub start: Date,
    pub end: Date,
}

impl DragRange {
    /// Builds a range from two endpoints given in either order
    pub fn between(a: Date, b: Date) -> DragRange {
        DragRange {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// State of a press-move-release selection over the grid
///
/// Endpoints are the dates of the values under the pointer (`None` over
/// empty cells), so a selection refers to days rather than grid positions.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct DragSelection {
    dragging: bool,
    start: Option<Date>,
    end: Option<Date>,
}

impl DragSelection {
    pub fn new() -> DragSelection {
        DragSelection::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn press(&mut self, date: Option<Date>) {
        *self = DragSelection {
            dragging: true,
            start: date,
            end: None,
        };
    }

    pub fn hover(&mut self, date: Option<Date>) {
        if self.dragging {
            self.end = date;
        }
    }

    /// Finishes the drag, returning the selected range if it started and
    /// ended on cells with values
    pub fn release(&mut self, date: Option<Date>) -> Option<DragRange> {
        let start = std::mem::take(self).start;
        Some(DragRange::between(start?, date?))
    }

    /// Abandons any selection in progress
    pub fn clear(&mut self) {
        *self = DragSelection::default();
    }

    /// The range currently being dragged over, if both ends are known
    pub fn current(&self) -> Option<DragRange> {
        if !self.dragging {
            return None;
        }
        Some(DragRange::between(self.start?, self.end?))
    }

    pub fn contains(&self, date: Date) -> bool {
        self.current().is_some_and(|r| r.contains(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_drag_backwards() {
        let mut sel = DragSelection::new();
        sel.press(Some(date!(2016 - 03 - 10)));
        assert!(sel.is_dragging());
        assert_eq!(sel.current(), None);
        sel.hover(Some(date!(2016 - 03 - 04)));
        assert_eq!(
            sel.current(),
            Some(DragRange {
                start: date!(2016 - 03 - 04),
                end: date!(2016 - 03 - 10)
            })
        );
        assert!(sel.contains(date!(2016 - 03 - 04)));
        assert!(sel.contains(date!(2016 - 03 - 07)));
        assert!(sel.contains(date!(2016 - 03 - 10)));
        assert!(!sel.contains(date!(2016 - 03 - 11)));
        let range = sel.release(Some(date!(2016 - 03 - 05)));
        assert_eq!(
            range,
            Some(DragRange {
                start: date!(2016 - 03 - 05),
                end: date!(2016 - 03 - 10)
            })
        );
        assert_eq!(sel, DragSelection::new());
    }

    #[test]
    fn test_hover_without_press_is_ignored() {
        let mut sel = DragSelection::new();
        sel.hover(Some(date!(2016 - 03 - 04)));
        assert_eq!(sel, DragSelection::new());
        assert!(!sel.contains(date!(2016 - 03 - 04)));
    }

    #[test]
    fn test_release_over_empty_cell() {
        let mut sel = DragSelection::new();
        sel.press(Some(date!(2016 - 03 - 10)));
        assert_eq!(sel.release(None), None);
        assert!(!sel.is_dragging());
        sel.press(None);
        sel.hover(Some(date!(2016 - 03 - 11)));
        assert_eq!(sel.current(), None);
        assert_eq!(sel.release(Some(date!(2016 - 03 - 11))), None);
    }

    #[test]
    fn test_clear() {
        let mut sel = DragSelection::new();
        sel.press(Some(date!(2016 - 03 - 10)));
        sel.hover(Some(date!(2016 - 03 - 12)));
        sel.clear();
        assert!(!sel.is_dragging());
        assert!(!sel.contains(date!(2016 - 03 - 11)));
    }
}
