//! Visibility source for suspending pollers.
//!
//! Pollers should not drain the backend while nobody is looking. The app
//! feeds terminal focus events into a [`VisibilitySource`]; tests feed it
//! whatever they like.

use tokio::sync::watch;

/// Whether the consuming surface is currently observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_hidden(self) -> bool {
        matches!(self, Visibility::Hidden)
    }
}

/// Injectable two-state visibility capability with change notification.
///
/// Hand its [`subscribe`](Self::subscribe) receivers to pollers; call
/// [`set`](Self::set) from whatever knows about focus.
#[derive(Debug)]
pub struct VisibilitySource {
    tx: watch::Sender<Visibility>,
}

impl VisibilitySource {
    pub fn new(initial: Visibility) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Update the visibility state; subscribers are only woken on an
    /// actual change.
    pub fn set(&self, visibility: Visibility) {
        self.tx.send_if_modified(|current| {
            if *current == visibility {
                false
            } else {
                *current = visibility;
                true
            }
        });
    }

    pub fn get(&self) -> Visibility {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Visibility> {
        self.tx.subscribe()
    }
}

impl Default for VisibilitySource {
    fn default() -> Self {
        Self::new(Visibility::Visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_observed_by_subscribers() {
        let source = VisibilitySource::default();
        let rx = source.subscribe();
        assert_eq!(*rx.borrow(), Visibility::Visible);

        source.set(Visibility::Hidden);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), Visibility::Hidden);
    }

    #[test]
    fn redundant_set_does_not_wake_subscribers() {
        let source = VisibilitySource::default();
        let rx = source.subscribe();

        source.set(Visibility::Visible);
        assert!(!rx.has_changed().unwrap());
    }
}
