use std::{cell::RefCell, rc::Rc};

use log::debug;

use crate::{
    card::Card,
    input::{HandlerId, SearchField},
    query::Query,
};

pub fn is_match<C: Card + ?Sized>(card: &C, query: &Query) -> bool {
    query.matches(&card.haystack())
}

/// Shows or hides a fixed set of cards to follow a search field.
///
/// The cards are captured once by [`LiveFilter::init`]. Each input change
/// re-evaluates every card; nothing is carried over between calls.
#[derive(Debug)]
pub struct LiveFilter<C: Card> {
    items: Vec<C>,
}

impl<C: Card> LiveFilter<C> {
    pub fn init(items: Vec<C>) -> Self {
        debug!("Live filter holding {} cards", items.len());
        LiveFilter { items }
    }

    pub fn on_input_change(&mut self, raw: &str) {
        let query = Query::parse(raw);
        for item in self.items.iter_mut() {
            let visible = is_match(item, &query);
            item.set_visible(visible);
        }
        debug!(
            "Query {:?} leaves {}/{} cards visible",
            query.as_str(),
            self.visible_count(),
            self.items.len()
        );
    }

    pub fn items(&self) -> &[C] {
        &self.items
    }

    pub fn visible(&self) -> impl Iterator<Item = &C> {
        self.items.iter().filter(|c| c.is_visible())
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }
}

impl<C: Card + 'static> LiveFilter<C> {
    /// Re-runs the filter on every edit of `field`
    pub fn subscribe(handle: &Rc<RefCell<Self>>, field: &mut SearchField) -> HandlerId {
        let filter = Rc::clone(handle);
        field.register(move |value| filter.borrow_mut().on_input_change(value))
    }
}
