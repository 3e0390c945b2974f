//! Decision sink: where committed cards go.
//!
//! The stack only knows that a card was accepted or discarded. Saving an
//! application, writing a log, or calling a remote store is the sink's
//! business; the stack never waits on or inspects the outcome.

use crate::types::Card;

/// Receives one call per committed card, in deck order.
pub trait DecisionSink {
    /// Card swiped right.
    fn on_accept(&mut self, card: &Card);
    /// Card swiped left.
    fn on_discard(&mut self, card: &Card);
}

/// Adapts a pair of closures into a [`DecisionSink`].
pub struct Callbacks<A, D> {
    pub on_accept: A,
    pub on_discard: D,
}

impl<A, D> Callbacks<A, D>
where
    A: FnMut(&Card),
    D: FnMut(&Card),
{
    pub fn new(on_accept: A, on_discard: D) -> Self {
        Callbacks { on_accept, on_discard }
    }
}

impl<A, D> DecisionSink for Callbacks<A, D>
where
    A: FnMut(&Card),
    D: FnMut(&Card),
{
    fn on_accept(&mut self, card: &Card) {
        (self.on_accept)(card)
    }

    fn on_discard(&mut self, card: &Card) {
        (self.on_discard)(card)
    }
}

impl<S: DecisionSink + ?Sized> DecisionSink for &mut S {
    fn on_accept(&mut self, card: &Card) {
        (**self).on_accept(card)
    }

    fn on_discard(&mut self, card: &Card) {
        (**self).on_discard(card)
    }
}

impl<S: DecisionSink + ?Sized> DecisionSink for Box<S> {
    fn on_accept(&mut self, card: &Card) {
        (**self).on_accept(card)
    }

    fn on_discard(&mut self, card: &Card) {
        (**self).on_discard(card)
    }
}

/// Discards every decision.
impl DecisionSink for () {
    fn on_accept(&mut self, _card: &Card) {}
    fn on_discard(&mut self, _card: &Card) {}
}
