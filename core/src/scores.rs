/// Keeps the best winning time in seconds. Backends decide how it's persisted.
pub trait HighScoreStore {
    fn best(&self) -> Option<u32>;
    fn set_best(&mut self, secs: u32);
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for &mut T {
    fn best(&self) -> Option<u32> {
        (**self).best()
    }

    fn set_best(&mut self, secs: u32) {
        (**self).set_best(secs)
    }
}

/// Store that forgets everything when dropped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryScores {
    best: Option<u32>,
}

impl MemoryScores {
    pub const fn with_best(secs: u32) -> Self {
        Self { best: Some(secs) }
    }
}

impl HighScoreStore for MemoryScores {
    fn best(&self) -> Option<u32> {
        self.best
    }

    fn set_best(&mut self, secs: u32) {
        self.best = Some(secs);
    }
}
