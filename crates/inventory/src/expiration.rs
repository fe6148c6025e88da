//! Expiration queries over a point-in-time snapshot of the store.
//!
//! `now` is always supplied by the caller; nothing here reads a clock.

use chrono::{Days, NaiveDate};

use spantry_core::{DomainResult, Entity};

use crate::item::Item;
use crate::store::InventoryStore;

/// Date bounds an expiration query filters on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpirationWindow {
    /// `now <= date <= through`.
    Within { now: NaiveDate, through: NaiveDate },
    /// `date < now`.
    Before { now: NaiveDate },
}

impl ExpirationWindow {
    /// Window of `horizon_days` days starting today, both ends inclusive.
    ///
    /// Saturates at the latest representable date.
    pub fn within(now: NaiveDate, horizon_days: u32) -> Self {
        let through = now
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        Self::Within { now, through }
    }

    pub fn before(now: NaiveDate) -> Self {
        Self::Before { now }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Within { now, through } => date >= now && date <= through,
            Self::Before { now } => date < now,
        }
    }
}

/// Items matching an [`ExpirationWindow`], taken from one store snapshot.
///
/// Ordered by expiration date, then id. Filtering happens lazily during
/// iteration, and the view can be iterated any number of times; later store
/// mutations are never observed.
#[derive(Debug, Clone)]
pub struct ExpirationView {
    window: ExpirationWindow,
    dated: Vec<(NaiveDate, Item)>,
}

impl ExpirationView {
    fn from_snapshot(snapshot: Vec<Item>, window: ExpirationWindow) -> Self {
        let mut dated: Vec<(NaiveDate, Item)> = snapshot
            .into_iter()
            .filter_map(|item| item.expiration_date().map(|date| (date, item)))
            .collect();
        dated.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.id().cmp(b.id())));
        Self { window, dated }
    }

    pub fn window(&self) -> ExpirationWindow {
        self.window
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        let window = self.window;
        self.dated
            .iter()
            .filter(move |(date, _)| window.contains(*date))
            .map(|(_, item)| item)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Owned copies of the matches, in order.
    pub fn to_vec(&self) -> Vec<Item> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a ExpirationView {
    type Item = &'a Item;
    type IntoIter = Box<dyn Iterator<Item = &'a Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Items expiring between `now` and `now + horizon_days`, inclusive.
///
/// Items without an expiration date never match; already-expired items are
/// reported by [`find_expired`] instead.
pub fn find_expiring_within(
    store: &InventoryStore,
    horizon_days: u32,
    now: NaiveDate,
) -> DomainResult<ExpirationView> {
    Ok(ExpirationView::from_snapshot(
        store.list()?,
        ExpirationWindow::within(now, horizon_days),
    ))
}

/// Items whose expiration date is strictly before `now`.
pub fn find_expired(store: &InventoryStore, now: NaiveDate) -> DomainResult<ExpirationView> {
    Ok(ExpirationView::from_snapshot(
        store.list()?,
        ExpirationWindow::before(now),
    ))
}
