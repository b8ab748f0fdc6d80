use foundation::handles::Handle;

/// Identity of a marker within one registry generation.
///
/// The handle index is the marker's slot in its snapshot; the generation is
/// the rebuild that produced it. An id from an older rebuild never resolves
/// against a newer snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub Handle);

impl EntityId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self(Handle::new(index, generation))
    }

    pub fn index(&self) -> u32 {
        self.0.index()
    }

    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}
