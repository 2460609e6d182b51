use serde::{Deserialize, Serialize};

use super::position::Point;

/// Animation a bullet's sprite is playing. Rendering is somebody else's
/// problem; bullets only pick the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Animation {
    #[default]
    Init,
    Flying,
    Persisting,
    Death,
}

/// The visual of a bullet. Owned by the bullet and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sprite {
    pub sprite_id: u16,
    pub position: Point,
    pub direction: u8,
    pub animation: Animation,
}

impl Sprite {
    pub fn new(sprite_id: u16, position: Point, direction: u8) -> Self {
        Sprite {
            sprite_id,
            position,
            direction,
            animation: Animation::Init,
        }
    }

    /// Switch animation. Death is final unless `force` is set.
    pub fn set_animation(&mut self, animation: Animation, force: bool) {
        if self.animation == Animation::Death && !force {
            return;
        }
        self.animation = animation;
    }
}
