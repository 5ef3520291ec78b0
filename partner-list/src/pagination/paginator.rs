use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use leptos::prelude::*;
use tracing::debug;

use super::math;
use crate::{ConfigError, utils::new_paginator_id};

/// Client-side pagination over a reactively supplied, fully loaded item set.
///
/// The current page is the only mutable state. Everything else (the visible slice, the page count)
/// is derived with memos, so it recomputes whenever the items or the page change, and only then.
///
/// An absent item set (not loaded yet, or failed) is treated as empty: zero pages and an empty slice.
/// With zero pages the current page stays at `1` and every navigation call is a no-op.
///
/// Reads are tracked, so calling them inside an effect or memo subscribes to the paginator.
/// The `_untracked` variants don't subscribe.
#[derive(Clone)]
pub struct Paginator<T: Send + Sync + 'static> {
    id: u64,
    page_size: usize,
    requested_page: ArcRwSignal<usize>,
    total_items: ArcMemo<usize>,
    total_pages: ArcMemo<usize>,
    current_page: ArcMemo<usize>,
    visible_slice: ArcMemo<Vec<T>>,
}

impl<T: Send + Sync + 'static> Debug for Paginator<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("id", &self.id)
            .field("page_size", &self.page_size)
            .field("requested_page", &self.requested_page.get_untracked())
            .finish()
    }
}

impl<T> Paginator<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Paginate the items produced by `items`, `page_size` to a page.
    ///
    /// `items` is re-run (and tracked) whenever the derived state is stale, so it should read from
    /// signals, e.g. [`crate::PartnerSource::value`].
    pub fn new(
        items: impl Fn() -> Option<Arc<[T]>> + Send + Sync + 'static,
        page_size: usize,
    ) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        let items = ArcSignal::derive(items);
        let requested_page = ArcRwSignal::new(1);

        let total_items = ArcMemo::new({
            let items = items.clone();
            move |_| items.with(|items| items.as_ref().map_or(0, |items| items.len()))
        });
        let total_pages = ArcMemo::new({
            let total_items = total_items.clone();
            move |_| math::total_pages(total_items.get(), page_size)
        });
        // The item set can shrink underneath the requested page (e.g. after a reload),
        // so observers always see it bounded:
        let current_page = ArcMemo::new({
            let requested_page = requested_page.clone();
            let total_pages = total_pages.clone();
            move |_| math::clamp_page(requested_page.get(), total_pages.get())
        });
        let visible_slice = ArcMemo::new({
            let current_page = current_page.clone();
            move |_| {
                let page = current_page.get();
                items.with(|items| match items {
                    Some(items) => items[math::page_window(items.len(), page_size, page)].to_vec(),
                    None => vec![],
                })
            }
        });

        Ok(Self {
            id: new_paginator_id(),
            page_size,
            requested_page,
            total_items,
            total_pages,
            current_page,
            visible_slice,
        })
    }

    /// Paginate a fixed item set.
    pub fn from_items(items: impl Into<Arc<[T]>>, page_size: usize) -> Result<Self, ConfigError> {
        let items = items.into();
        Self::new(move || Some(items.clone()), page_size)
    }

    /// The maximum number of items on a page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The active page, starting from 1.
    pub fn current_page(&self) -> usize {
        self.current_page.get()
    }

    /// Like [`Paginator::current_page`], without subscribing.
    pub fn current_page_untracked(&self) -> usize {
        self.current_page.get_untracked()
    }

    /// `ceil(items / page size)`, `0` when there are no items.
    pub fn total_pages(&self) -> usize {
        self.total_pages.get()
    }

    /// Like [`Paginator::total_pages`], without subscribing.
    pub fn total_pages_untracked(&self) -> usize {
        self.total_pages.get_untracked()
    }

    /// Number of items across all pages.
    pub fn total_items(&self) -> usize {
        self.total_items.get()
    }

    /// The items on the current page, at most [`Paginator::page_size`] of them.
    pub fn visible_slice(&self) -> Vec<T> {
        self.visible_slice.get()
    }

    /// Like [`Paginator::visible_slice`], without subscribing.
    pub fn visible_slice_untracked(&self) -> Vec<T> {
        self.visible_slice.get_untracked()
    }

    /// Borrow the items on the current page rather than cloning them.
    pub fn with_visible_slice<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.visible_slice.with(|slice| f(slice))
    }

    /// Whether [`Paginator::next_page`] would move.
    pub fn has_next_page(&self) -> bool {
        self.current_page() < self.total_pages()
    }

    /// Whether [`Paginator::previous_page`] would move.
    pub fn has_previous_page(&self) -> bool {
        self.current_page() > 1
    }

    /// Every navigable page number, `1..=total_pages`.
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages()).collect()
    }

    /// The 1-based positions of the first and last visible items, `None` when nothing is visible.
    ///
    /// For 32 items on page 2 of 15 this is `Some((16, 30))`.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        let window = math::page_window(self.total_items(), self.page_size, self.current_page());
        if window.is_empty() {
            None
        } else {
            Some((window.start + 1, window.end))
        }
    }

    /// Move forward one page. No-op on the last page, or when there are no pages.
    ///
    /// Returns whether the page changed.
    pub fn next_page(&self) -> bool {
        let page = self.current_page_untracked();
        if page < self.total_pages_untracked() {
            self.set_page(page, page + 1);
            true
        } else {
            false
        }
    }

    /// Move back one page. No-op on the first page.
    ///
    /// Returns whether the page changed.
    pub fn previous_page(&self) -> bool {
        let page = self.current_page_untracked();
        if page > 1 {
            self.set_page(page, page - 1);
            true
        } else {
            false
        }
    }

    /// Jump to `page`. Silently ignored unless `1 <= page <= total_pages`.
    ///
    /// Returns whether the page changed.
    pub fn go_to_page(&self, page: usize) -> bool {
        let current = self.current_page_untracked();
        if (1..=self.total_pages_untracked()).contains(&page) && page != current {
            self.set_page(current, page);
            true
        } else {
            false
        }
    }

    fn set_page(&self, from: usize, to: usize) {
        debug!(paginator = self.id, from, to, "page changed");
        self.requested_page.set(to);
    }
}
