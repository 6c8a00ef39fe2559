use log::debug;

/// Identifies a registered handler so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&str)>;

/// A text input that notifies its handlers on every edit.
///
/// Handlers run synchronously, in registration order, before the edit
/// returns. There is no batching: each edit fires each handler once.
pub struct SearchField {
    id: String,
    value: String,
    handlers: Vec<(HandlerId, Handler)>,
    next_id: u64,
}

impl SearchField {
    pub fn new(id: &str) -> Self {
        SearchField {
            id: id.to_string(),
            value: String::new(),
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn register<F: FnMut(&str) + 'static>(&mut self, handler: F) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        debug!("Registered handler {:?} on #{}", id, self.id);
        id
    }

    /// Returns false if the handler was not registered
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        let removed = self.handlers.len() != before;
        if removed {
            debug!("Unregistered handler {:?} from #{}", id, self.id);
        }
        removed
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.changed();
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
        self.changed();
    }

    /// Deletes the last char. Nothing fires when the field is already empty.
    pub fn pop(&mut self) -> Option<char> {
        let popped = self.value.pop();
        if popped.is_some() {
            self.changed();
        }
        popped
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.changed();
    }

    fn changed(&mut self) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(&self.value);
        }
    }
}

impl std::fmt::Debug for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchField")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn recorder(field: &mut SearchField) -> (HandlerId, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = field.register(move |value| sink.borrow_mut().push(value.to_string()));
        (id, seen)
    }

    #[test]
    fn test_every_edit_fires() {
        let mut field = SearchField::new("search");
        let (_, seen) = recorder(&mut field);
        field.push('p');
        field.push('i');
        field.pop();
        field.set_value("pie");
        field.clear();
        assert_eq!(*seen.borrow(), vec!["p", "pi", "p", "pie", ""]);
    }

    #[test]
    fn test_pop_on_empty_is_silent() {
        let mut field = SearchField::new("search");
        let (_, seen) = recorder(&mut field);
        assert_eq!(field.pop(), None);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unregister() {
        let mut field = SearchField::new("search");
        let (first, first_seen) = recorder(&mut field);
        let (_, second_seen) = recorder(&mut field);
        assert_eq!(field.handler_count(), 2);

        assert!(field.unregister(first));
        assert!(!field.unregister(first));
        field.push('x');

        assert!(first_seen.borrow().is_empty());
        assert_eq!(*second_seen.borrow(), vec!["x"]);
    }

    #[test]
    fn test_value_tracks_edits() {
        let mut field = SearchField::new("search");
        field.push('a');
        field.push('b');
        assert_eq!(field.value(), "ab");
        assert_eq!(field.id(), "search");
    }
}
