/// NRZI line encoder: a 0 bit toggles the line level, a 1 bit holds it.
///
/// The level persists for the whole transmission, flags included. The line
/// always starts low.
#[derive(Debug, Clone, Default)]
pub struct NrziEncoder {
    level: bool,
}

impl NrziEncoder {
    pub fn new() -> Self {
        Self { level: false }
    }

    pub fn encode(&mut self, bit: bool) -> bool {
        if !bit {
            self.level = !self.level;
        }
        self.level
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

/// Inverse NRZI: no transition is a 1, a transition is a 0.
/// `initial` is the line level before the first symbol.
pub fn nrzi_decode(levels: &[bool], initial: bool) -> Vec<bool> {
    let mut previous = initial;
    levels
        .iter()
        .map(|&level| {
            let bit = level == previous;
            previous = level;
            bit
        })
        .collect()
}
