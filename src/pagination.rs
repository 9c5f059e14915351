//! Page controller for rendered entity lists
//!
//! A [`Pagination`] asks a [`Paginator`] for one page at a time and pushes
//! the result to a [`Renderer`]: a strip of page links with prev/next
//! controls and a list of item summaries.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{library::Paginator, models::Entity};

pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Drawing surface for a paginated list
pub trait Renderer {
    /// Remove every page link from the strip
    fn clear_page_numbers(&mut self);
    fn push_page_number(&mut self, page: usize, active: bool);
    fn set_prev_disabled(&mut self, disabled: bool);
    fn set_next_disabled(&mut self, disabled: bool);
    fn clear_items(&mut self);
    fn push_item(&mut self, text: String);
}

pub struct Pagination<'a, P: ?Sized, R> {
    source: &'a P,
    renderer: R,
    current_page: usize,
    items_per_page: usize,
}

impl<'a, P, R> Pagination<'a, P, R>
where
    P: Paginator + ?Sized,
    R: Renderer,
{
    /// Bind to a source and draw the initial page strip (on page 1)
    pub fn new(source: &'a P, renderer: R, items_per_page: usize) -> Self {
        let mut pagination = Self {
            source,
            renderer,
            current_page: 1,
            items_per_page: items_per_page.max(1),
        };
        pagination.render_page_numbers();
        pagination
    }

    pub fn with_default_page_size(source: &'a P, renderer: R) -> Self {
        Self::new(source, renderer, DEFAULT_PAGE_SIZE)
    }

    pub fn total_pages(&self) -> usize {
        self.source.get_count().div_ceil(self.items_per_page)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Whether `page` is one of the pages in the strip
    pub fn has_page(&self, page: usize) -> bool {
        (1..=self.total_pages()).contains(&page)
    }

    /// Show page `page`. Pages outside `1..=total_pages()` are ignored;
    /// an empty source clears everything that was drawn.
    pub fn go_to_page(&mut self, page: usize) {
        let total_pages = self.total_pages();
        if total_pages == 0 {
            self.clear();
        }
        if page < 1 || page > total_pages {
            tracing::debug!("Ignoring page {} of {}", page, total_pages);
            return;
        }
        self.current_page = page;
        self.render_page_numbers();
        self.render_items();
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn render_page_numbers(&mut self) {
        self.renderer.clear_page_numbers();
        for page in 1..=self.total_pages() {
            self.renderer.push_page_number(page, page == self.current_page);
        }
        self.update_controls();
    }

    fn update_controls(&mut self) {
        let total_pages = self.total_pages();
        self.renderer.set_prev_disabled(self.current_page == 1);
        self.renderer.set_next_disabled(self.current_page == total_pages);
    }

    fn render_items(&mut self) {
        self.renderer.clear_items();
        for item in self.source.get_paginated(self.current_page, self.items_per_page) {
            self.renderer.push_item(item.represent());
        }
    }

    fn clear(&mut self) {
        self.renderer.clear_page_numbers();
        self.renderer.clear_items();
    }
}

/// Link in the page strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageLink {
    pub number: usize,
    pub active: bool,
}

/// Renderer that records what would be drawn, for API responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageView {
    pub pages: Vec<PageLink>,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub items: Vec<String>,
}

impl Renderer for PageView {
    fn clear_page_numbers(&mut self) {
        self.pages.clear();
    }

    fn push_page_number(&mut self, page: usize, active: bool) {
        self.pages.push(PageLink {
            number: page,
            active,
        });
    }

    fn set_prev_disabled(&mut self, disabled: bool) {
        self.prev_disabled = disabled;
    }

    fn set_next_disabled(&mut self, disabled: bool) {
        self.next_disabled = disabled;
    }

    fn clear_items(&mut self) {
        self.items.clear();
    }

    fn push_item(&mut self, text: String) {
        self.items.push(text);
    }
}
