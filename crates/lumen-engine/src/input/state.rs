use super::types::KeyTransition;
use super::vk;

/// Live keyboard state, queried at dispatch time.
///
/// Answers whether a virtual key is physically held right now. Used to recover the
/// side of Ctrl/Shift/Alt, which the raw key code does not carry.
pub trait KeyStateQuery {
    fn is_key_down(&self, code: u8) -> bool;
}

/// One modifier pair (e.g. left/right Ctrl).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LateralPair {
    pub left: bool,
    pub right: bool,
}

/// Tracks which side of each ambiguous modifier is currently held.
///
/// A side's flag is set on its down-transition and cleared only when that same
/// side is observed released.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LateralModifiers {
    pub shift: LateralPair,
    pub ctrl: LateralPair,
    pub alt: LateralPair,
}

impl LateralModifiers {
    /// Rewrites a side-agnostic Ctrl/Shift/Alt code into its lateral code and
    /// updates the side flags. Other codes pass through untouched.
    ///
    /// When neither side can be determined from live state or flags, the left side
    /// is assumed.
    pub fn resolve<Q>(&mut self, code: u8, transition: KeyTransition, keys: &Q) -> u8
    where
        Q: KeyStateQuery + ?Sized,
    {
        let (pair, left, right) = match code {
            vk::CONTROL => (&mut self.ctrl, vk::LCONTROL, vk::RCONTROL),
            vk::SHIFT => (&mut self.shift, vk::LSHIFT, vk::RSHIFT),
            vk::MENU => (&mut self.alt, vk::LMENU, vk::RMENU),
            _ => return code,
        };

        match transition {
            KeyTransition::Down => {
                if keys.is_key_down(left) {
                    pair.left = true;
                    left
                } else if keys.is_key_down(right) {
                    pair.right = true;
                    right
                } else {
                    pair.left = true;
                    left
                }
            }
            KeyTransition::Up => {
                if pair.left && !keys.is_key_down(left) {
                    pair.left = false;
                    left
                } else if pair.right && !keys.is_key_down(right) {
                    pair.right = false;
                    right
                } else {
                    pair.left = false;
                    left
                }
            }
        }
    }

    pub fn any_held(&self) -> bool {
        [self.shift, self.ctrl, self.alt]
            .iter()
            .any(|p| p.left || p.right)
    }

    /// Forgets all held sides (e.g. after focus loss).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
