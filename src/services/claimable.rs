//! Runtime-checked exclusive claim of a reusable buffer.
//!
//! `Claimable::claim` hands out the value as a `Claimed` guard. The guard
//! resets the value and puts it back when dropped, on every exit path
//! including unwinding. Claiming twice without dropping the first guard
//! is a programming error and panics.

use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/// Clear contents but keep allocations for the next claim.
pub trait Reset {
    fn reset(&mut self);
}

impl<T> Reset for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

pub struct Claimable<T: Reset> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T: Reset + Default> Default for Claimable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Reset> fmt::Debug for Claimable<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Claimable")
            .field("claimed", &self.is_claimed())
            .finish()
    }
}

impl<T: Reset> Claimable<T> {
    pub fn new(value: T) -> Self {
        Claimable {
            slot: Rc::new(RefCell::new(Some(value))),
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.slot.borrow().is_none()
    }

    /// Take exclusive ownership until the guard drops.
    ///
    /// # Panics
    ///
    /// If the value is already claimed.
    pub fn claim(&self) -> Claimed<T> {
        let value = self.slot.borrow_mut().take();
        match value {
            Some(value) => Claimed {
                value: Some(value),
                home: Rc::clone(&self.slot),
            },
            None => panic!("buffer claimed twice; frame processing is not reentrant"),
        }
    }
}

pub struct Claimed<T: Reset> {
    value: Option<T>,
    home: Rc<RefCell<Option<T>>>,
}

impl<T: Reset> Deref for Claimed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unreachable!("claimed value is only taken on drop"),
        }
    }
}

impl<T: Reset> DerefMut for Claimed<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.value {
            Some(value) => value,
            None => unreachable!("claimed value is only taken on drop"),
        }
    }
}

impl<T: Reset> Drop for Claimed<T> {
    fn drop(&mut self) {
        if let Some(mut value) = self.value.take() {
            value.reset();
            *self.home.borrow_mut() = Some(value);
        }
    }
}
