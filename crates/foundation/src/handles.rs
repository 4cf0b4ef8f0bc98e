/// Generational handle: a slot index paired with the generation the slot
/// had when the handle was issued. A handle from a freed-and-reused slot
/// no longer matches the slot's generation and must not resolve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    pub fn generation(self) -> u32 {
        self.1
    }
}
