use std::ops::{Deref, DerefMut};

/// Late-initialized state thats assumed to exist once the event loop runs
pub struct Exists<T>(Option<T>);

impl<T> Exists<T> {
    pub const fn none() -> Self {
        Self(None)
    }

    pub fn set(&mut self, value: T) {
        self.0 = Some(value);
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.0.as_mut()
    }
}

impl<T> Deref for Exists<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match &self.0 {
            Some(v) => v,
            None => panic!("Type expected to exist by now but didn't"),
        }
    }
}

impl<T> DerefMut for Exists<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.0 {
            Some(v) => v,
            None => panic!("Type expected to exist by now but didn't"),
        }
    }
}
