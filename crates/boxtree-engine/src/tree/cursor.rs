//! Restartable, lazily materialised sequences.
//!
//! A [`LazyList`] wraps a producer iterator. Every [`ListCursor`] created from
//! it shares one buffer, so each element is pulled from the producer at most
//! once no matter how many cursors walk the list or how often they rewind.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Producer<T> = Box<dyn Iterator<Item = T>>;

struct Shared<T> {
    buffer: Vec<T>,
    /// `None` once the producer reported exhaustion.
    producer: Option<Producer<T>>,
}

impl<T> Shared<T> {
    /// Pull from the producer until the buffer holds `len` elements. Returns
    /// whether it does.
    fn fill_to(&mut self, len: usize) -> bool {
        while self.buffer.len() < len {
            let Some(producer) = self.producer.as_mut() else {
                return false;
            };
            match producer.next() {
                Some(item) => self.buffer.push(item),
                None => {
                    self.producer = None;
                    return false;
                }
            }
        }
        true
    }

    fn fill_all(&mut self) {
        if let Some(producer) = self.producer.take() {
            self.buffer.extend(producer);
        }
    }
}

/// A sequence whose elements are produced on demand and cached.
pub struct LazyList<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> LazyList<T> {
    pub fn new<I>(producer: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                buffer: Vec::new(),
                producer: Some(Box::new(producer.into_iter())),
            })),
        }
    }

    /// A list whose elements are all known up front.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                buffer: items,
                producer: None,
            })),
        }
    }

    /// A fresh cursor positioned before the first element.
    pub fn cursor(&self) -> ListCursor<T> {
        ListCursor {
            shared: Rc::clone(&self.shared),
            index: 0,
        }
    }
}

impl<T> Clone for LazyList<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for LazyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("LazyList")
            .field("cached", &shared.buffer.len())
            .field("exhausted", &shared.producer.is_none())
            .finish()
    }
}

/// Bidirectional cursor over a [`LazyList`].
///
/// The cursor sits *between* elements: `position()` is the number of
/// elements already returned by `next`. Cloning a cursor shares the buffer
/// but gives the clone its own position.
pub struct ListCursor<T> {
    shared: Rc<RefCell<Shared<T>>>,
    index: usize,
}

impl<T: Clone> ListCursor<T> {
    /// Whether `next` would return an element. May pull one element from the
    /// producer.
    pub fn has_next(&self) -> bool {
        self.shared.borrow_mut().fill_to(self.index + 1)
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Step back and return the element stepped over.
    pub fn previous(&mut self) -> Option<T> {
        let item = self.peek_previous()?;
        self.index -= 1;
        Some(item)
    }

    /// The element most recently returned by `next`, without moving.
    pub fn peek_previous(&self) -> Option<T> {
        let index = self.index.checked_sub(1)?;
        self.shared.borrow().buffer.get(index).cloned()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    /// Move back to the start. Returns how many steps were taken.
    pub fn rewind(&mut self) -> usize {
        std::mem::take(&mut self.index)
    }

    /// Advance up to `steps` elements, stopping early at the end.
    pub fn forward(&mut self, steps: usize) {
        for _ in 0..steps {
            if self.next().is_none() {
                break;
            }
        }
    }

    /// Drain every remaining element, leaving the cursor at the end.
    pub fn consume(&mut self) -> Vec<T> {
        let mut shared = self.shared.borrow_mut();
        shared.fill_all();
        let rest = shared.buffer.get(self.index..).map(<[T]>::to_vec).unwrap_or_default();
        self.index = shared.buffer.len().max(self.index);
        rest
    }
}

impl<T: Clone> Iterator for ListCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut shared = self.shared.borrow_mut();
        if !shared.fill_to(self.index + 1) {
            return None;
        }
        let item = shared.buffer[self.index].clone();
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let shared = self.shared.borrow();
        let cached = shared.buffer.len().saturating_sub(self.index);
        match shared.producer {
            Some(ref producer) => (cached, producer.size_hint().1.map(|upper| cached + upper)),
            None => (cached, Some(cached)),
        }
    }
}

impl<T> Clone for ListCursor<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            index: self.index,
        }
    }
}

impl<T> fmt::Debug for ListCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCursor")
            .field("position", &self.index)
            .field("cached", &self.shared.borrow().buffer.len())
            .finish()
    }
}
