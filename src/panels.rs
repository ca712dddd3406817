//! Ordered collections of panel handles.
//!
//! [`PanelList`] is indexed 0-based like a slice and looked up 1-based by
//! panel id with [`PanelList::get`]. Calls fan out over every handle with
//! [`PanelList::broadcast`], which collects the non-empty results.

use std::ops::{Index, RangeBounds};
use std::slice;

/// Results collected from a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Broadcast<R> {
    /// No handle produced a result.
    Nothing,
    /// Exactly one result, unwrapped.
    One(R),
    /// Several results, in handle order.
    Many(Vec<R>),
}

impl<R> Broadcast<R> {
    /// Collect results: none, one unwrapped, or several.
    #[must_use]
    pub fn from_results(mut results: Vec<R>) -> Self {
        match results.len() {
            0 => Broadcast::Nothing,
            1 => results.pop().map_or(Broadcast::Nothing, Broadcast::One),
            _ => Broadcast::Many(results),
        }
    }

    /// Whether nothing was collected.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Broadcast::Nothing)
    }

    /// The single result, if there is exactly one.
    #[must_use]
    pub fn one(self) -> Option<R> {
        match self {
            Broadcast::One(r) => Some(r),
            _ => None,
        }
    }

    /// All results as a list.
    #[must_use]
    pub fn into_vec(self) -> Vec<R> {
        match self {
            Broadcast::Nothing => Vec::new(),
            Broadcast::One(r) => vec![r],
            Broadcast::Many(rs) => rs,
        }
    }
}

/// Panel handles in panel-id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelList<H> {
    handles: Vec<H>,
}

impl<H> PanelList<H> {
    /// Wrap handles ordered by panel id.
    #[must_use]
    pub fn new(handles: Vec<H>) -> Self {
        Self { handles }
    }

    /// Number of handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handle of a 1-based panel id.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&H> {
        id.checked_sub(1).and_then(|i| self.handles.get(i))
    }

    /// Handles in order.
    pub fn iter(&self) -> slice::Iter<'_, H> {
        self.handles.iter()
    }

    /// Handles as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[H] {
        &self.handles
    }

    /// A new list over a 0-based range.
    ///
    /// Returns `None` if the range falls outside the list.
    #[must_use]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<Self>
    where
        H: Clone,
    {
        let range = (range.start_bound().cloned(), range.end_bound().cloned());
        self.handles.get(range).map(|hs| Self::new(hs.to_vec()))
    }

    /// Call `f` on every handle and collect the `Some` results.
    pub fn broadcast<R>(&self, f: impl FnMut(&H) -> Option<R>) -> Broadcast<R> {
        Broadcast::from_results(self.handles.iter().filter_map(f).collect())
    }

    /// Call `f` on every handle mutably and collect the `Some` results.
    pub fn broadcast_mut<R>(&mut self, f: impl FnMut(&mut H) -> Option<R>) -> Broadcast<R> {
        Broadcast::from_results(self.handles.iter_mut().filter_map(f).collect())
    }

    /// Call a fallible `f` on every handle, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_broadcast<R, E>(
        &self,
        mut f: impl FnMut(&H) -> Result<Option<R>, E>,
    ) -> Result<Broadcast<R>, E> {
        let mut results = Vec::new();
        for handle in &self.handles {
            if let Some(r) = f(handle)? {
                results.push(r);
            }
        }
        Ok(Broadcast::from_results(results))
    }

    /// Read a value from every handle. A single handle's value is unwrapped.
    pub fn fields<R>(&self, f: impl FnMut(&H) -> R) -> Broadcast<R> {
        Broadcast::from_results(self.handles.iter().map(f).collect())
    }

    /// Unwrap into the handles.
    #[must_use]
    pub fn into_vec(self) -> Vec<H> {
        self.handles
    }
}

impl<H> Default for PanelList<H> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<H> Index<usize> for PanelList<H> {
    type Output = H;

    fn index(&self, index: usize) -> &H {
        &self.handles[index]
    }
}

impl<H> IntoIterator for PanelList<H> {
    type Item = H;
    type IntoIter = std::vec::IntoIter<H>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.into_iter()
    }
}

impl<'a, H> IntoIterator for &'a PanelList<H> {
    type Item = &'a H;
    type IntoIter = slice::Iter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.iter()
    }
}

impl<H> FromIterator<H> for PanelList<H> {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> PanelList<&'static str> {
        PanelList::new(vec!["a", "b", "c"])
    }

    #[test]
    fn test_get_is_one_based() {
        let panels = list();
        assert_eq!(panels.get(1), Some(&"a"));
        assert_eq!(panels.get(3), Some(&"c"));
        assert_eq!(panels.get(0), None);
        assert_eq!(panels.get(4), None);
        assert_eq!(panels[0], "a");
    }

    #[test]
    fn test_slice() {
        let panels = list();
        assert_eq!(panels.slice(1..).unwrap().as_slice(), &["b", "c"]);
        assert_eq!(panels.slice(..=0).unwrap().len(), 1);
        assert!(panels.slice(2..5).is_none());
    }

    #[test]
    fn test_broadcast_collects_non_empty() {
        let panels = list();
        let none = panels.broadcast(|_| None::<u8>);
        assert!(none.is_nothing());

        let one = panels.broadcast(|h| (*h == "b").then_some(2));
        assert_eq!(one, Broadcast::One(2));

        let many = panels.broadcast(|h| Some(h.to_uppercase()));
        assert_eq!(many.into_vec(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_broadcast_mut() {
        let mut panels = PanelList::new(vec![1, 2, 3]);
        let out = panels.broadcast_mut(|h| {
            *h *= 10;
            None::<()>
        });
        assert!(out.is_nothing());
        assert_eq!(panels.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn test_try_broadcast_stops_on_error() {
        let panels = PanelList::new(vec![1, 2, 3]);
        let mut seen = Vec::new();
        let result = panels.try_broadcast(|&h| {
            seen.push(h);
            if h == 2 {
                Err("boom")
            } else {
                Ok(Some(h))
            }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_fields_single_unwrapped() {
        let single = PanelList::new(vec![(1, 'x')]);
        assert_eq!(single.fields(|h| h.1), Broadcast::One('x'));
        let panels = list();
        assert_eq!(panels.fields(|h| h.len()), Broadcast::Many(vec![1, 1, 1]));
    }

    #[test]
    fn test_iteration() {
        let panels: PanelList<u32> = (1..=3).collect();
        let total: u32 = panels.iter().sum();
        assert_eq!(total, 6);
        assert_eq!(panels.into_vec(), vec![1, 2, 3]);
    }
}
