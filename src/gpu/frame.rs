//! Frame parity bookkeeping.

/// Which generation a frame reads and which it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSlots {
    pub frame: u64,
    /// Generation read by compute (`t % 2`).
    pub source: usize,
    /// Generation written by compute and drawn (`(t + 1) % 2`).
    pub dest: usize,
}

/// Monotonic frame counter `t`; its parity picks the buffer roles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameCounter {
    t: u64,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.t
    }

    /// Buffer roles for the frame about to run.
    pub fn slots(&self) -> FrameSlots {
        FrameSlots {
            frame: self.t,
            source: (self.t & 1) as usize,
            dest: (self.t.wrapping_add(1) & 1) as usize,
        }
    }

    /// The generation holding the latest completed state.
    pub fn stable(&self) -> usize {
        (self.t & 1) as usize
    }

    pub fn advance(&mut self) {
        self.t += 1;
    }
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub slots: FrameSlots,
    /// Whether the flocking kernel was dispatched.
    pub computed: bool,
    /// Generation drawn, or `None` when no image was available.
    pub rendered: Option<usize>,
}
