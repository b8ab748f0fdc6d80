/// Generational handle: a slot index plus the generation that slot was issued in.
///
/// Handles from different generations never compare equal, even when they
/// share an index, so a handle kept past a table rebuild cannot alias a new slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32, u32); // (index, generation)

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }
}
