use crate::models::bullet::{Bullet, BulletId};
use crate::models::constants::{BulletState, NUM_STATES};

use super::BulletSystem;

/// Borrowing iterator over live bullets, container by container in
/// `BulletState::PROCESS_ORDER`, each container in insertion order.
pub struct ActiveBullets<'a> {
    system: &'a BulletSystem,
    container: usize,
    index: usize,
}

impl<'a> ActiveBullets<'a> {
    pub(super) fn new(system: &'a BulletSystem) -> Self {
        ActiveBullets {
            system,
            container: 0,
            index: 0,
        }
    }
}

impl<'a> Iterator for ActiveBullets<'a> {
    type Item = &'a Bullet;

    fn next(&mut self) -> Option<&'a Bullet> {
        while self.container < NUM_STATES {
            let state = BulletState::PROCESS_ORDER[self.container];
            let ids = self.system.state_vector(state);
            if let Some(&id) = ids.get(self.index) {
                self.index += 1;
                return self.system.get(id);
            }
            self.container += 1;
            self.index = 0;
        }
        None
    }
}

/// Position in the active order that does not borrow the system, so the
/// caller may kill or damage the bullet it was just handed.
///
/// Removing the bullet last returned by `next` does not skip its successor.
#[derive(Debug, Clone, Default)]
pub struct ActiveCursor {
    container: usize,
    index: usize,
    last: Option<BulletId>,
}

impl ActiveCursor {
    pub fn next(&mut self, system: &BulletSystem) -> Option<BulletId> {
        while self.container < NUM_STATES {
            let ids = system.state_vector(BulletState::PROCESS_ORDER[self.container]);
            if let Some(last) = self.last {
                // The previous bullet left this container; everything after
                // it moved down by one.
                if self.index > 0 && ids.get(self.index - 1) != Some(&last) {
                    self.index -= 1;
                }
                self.last = None;
            }
            if let Some(&id) = ids.get(self.index) {
                self.index += 1;
                self.last = Some(id);
                return Some(id);
            }
            self.container += 1;
            self.index = 0;
        }
        None
    }
}
