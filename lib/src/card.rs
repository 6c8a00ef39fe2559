/// Joins the searchable text of a card with a single space
pub fn haystack(name: &str, description: &str) -> String {
    format!("{} {}", name, description)
}

/// Anything the live filter can show or hide
pub trait Card {
    fn get_name(&self) -> &str;

    fn get_description(&self) -> &str;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn haystack(&self) -> String {
        haystack(self.get_name(), self.get_description())
    }
}

impl<C: Card + ?Sized> Card for Box<C> {
    fn get_name(&self) -> &str {
        (**self).get_name()
    }

    fn get_description(&self) -> &str {
        (**self).get_description()
    }

    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }

    fn set_visible(&mut self, visible: bool) {
        (**self).set_visible(visible)
    }
}
