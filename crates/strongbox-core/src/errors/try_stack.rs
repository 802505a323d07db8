//! Bounded try-stack.
//!
//! Frames are indexed `1..=max`. The stack never grows past `max`: a push at
//! capacity is refused and the caller raises the overflow error instead,
//! without a frame of its own.

/// Phase of a try region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryPhase {
    Entered,
    Body,
    Catch,
    Finally,
    Closed,
}

/// Identifies the region a frame belongs to. Regions unwind to the frame
/// carrying their own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionId(u64);

#[derive(Debug, Clone, Copy)]
pub struct TryFrame {
    pub phase: TryPhase,
    pub region: RegionId,
}

/// The push was refused because `max` frames are already open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryStackFull {
    pub max: usize,
}

#[derive(Debug)]
pub struct TryStack {
    frames: Vec<TryFrame>,
    max: usize,
    next_region: u64,
}

impl TryStack {
    pub fn new(max: usize) -> Self {
        Self {
            frames: Vec::with_capacity(max),
            max,
            next_region: 0,
        }
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push(&mut self) -> Result<RegionId, TryStackFull> {
        if self.frames.len() >= self.max {
            return Err(TryStackFull { max: self.max });
        }

        let region = RegionId(self.next_region);
        self.next_region += 1;
        self.frames.push(TryFrame {
            phase: TryPhase::Entered,
            region,
        });

        Ok(region)
    }

    /// Frame at `depth` (1 is the outermost).
    pub fn frame(&self, depth: usize) -> Option<&TryFrame> {
        depth.checked_sub(1).and_then(|idx| self.frames.get(idx))
    }

    pub fn innermost(&self) -> Option<&TryFrame> {
        self.frames.last()
    }

    /// Set the phase of the innermost frame, which must belong to `region`.
    pub fn set_phase(&mut self, region: RegionId, phase: TryPhase) {
        if let Some(frame) = self.frames.last_mut() {
            debug_assert_eq!(frame.region, region, "try frames closed out of order");
            frame.phase = phase;
        }
    }

    /// Close and remove the innermost frame, which must belong to `region`.
    pub fn pop(&mut self, region: RegionId) -> Option<TryFrame> {
        self.set_phase(region, TryPhase::Closed);
        self.frames.pop()
    }

    /// Change the capacity. Only valid while no frame is open.
    pub(crate) fn resize(&mut self, max: usize) {
        debug_assert!(self.frames.is_empty());
        self.max = max;
        self.frames = Vec::with_capacity(max);
    }
}
