use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    Pending,
    Loaded,
    /// Failed to load; the element is hidden rather than shown broken.
    Hidden,
}

/// Load state of every image reference the views have asked about. A failure only flips
/// the slot to hidden; it never reaches the session's error message.
#[derive(Debug, Default)]
pub struct ImageSlots {
    slots: HashMap<String, ImageLoad>,
}

impl ImageSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `url`. Returns true the first time, meaning the caller should load it.
    pub fn track(&mut self, url: &str) -> bool {
        if self.slots.contains_key(url) {
            return false;
        }
        self.slots.insert(url.to_string(), ImageLoad::Pending);
        true
    }

    pub fn on_load(&mut self, url: &str) {
        self.slots.insert(url.to_string(), ImageLoad::Loaded);
    }

    pub fn on_error(&mut self, url: &str) {
        log::debug!("Hiding broken image {}", url);
        self.slots.insert(url.to_string(), ImageLoad::Hidden);
    }

    pub fn state(&self, url: &str) -> Option<ImageLoad> {
        self.slots.get(url).copied()
    }

    /// The reference to render, or None when there is none or it is known to be broken.
    pub fn visible<'a>(&self, url: Option<&'a str>) -> Option<&'a str> {
        url.filter(|u| self.state(u) != Some(ImageLoad::Hidden))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_only_once() {
        let mut slots = ImageSlots::new();
        assert!(slots.track("a.jpg"));
        assert!(!slots.track("a.jpg"));
        assert_eq!(slots.state("a.jpg"), Some(ImageLoad::Pending));
    }

    #[test]
    fn test_failure_hides_image() {
        let mut slots = ImageSlots::new();
        slots.track("broken.jpg");
        assert_eq!(slots.visible(Some("broken.jpg")), Some("broken.jpg"));

        slots.on_error("broken.jpg");
        assert_eq!(slots.visible(Some("broken.jpg")), None);
        assert!(!slots.track("broken.jpg"), "failed images are not retried");
    }

    #[test]
    fn test_untracked_and_missing() {
        let slots = ImageSlots::new();
        assert_eq!(slots.visible(Some("new.jpg")), Some("new.jpg"));
        assert_eq!(slots.visible(None), None);
    }
}
