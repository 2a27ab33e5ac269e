//! Call-stack snapshots.
//!
//! A [`Stack`] is an ordered list of opaque [`Frame`]s captured when an
//! [`Annotated`](crate::Annotated) node is built. Index 0 is the call site of
//! the annotating function; increasing indices move towards the program entry
//! point.
//!
//! Capture only records program counters. Turning a frame into a function
//! name, file and line happens lazily when the frame is displayed, and only
//! when the `backtrace` feature is enabled.
//!
//! When a node wraps an error that already carries a stack, the new capture is
//! compared with the inner one and the frames both share are dropped; see
//! [`merge`].

mod merge;
#[cfg(feature = "backtrace")]
mod symbolize;

use alloc::vec::Vec;
use core::fmt;

pub use self::merge::{merge, shared_tail};
#[cfg(feature = "backtrace")]
pub use self::symbolize::{FramePath, FramePrefix, ResolvedFrame};
use crate::hooks;

/// A single captured call frame.
///
/// Frames are compared by their program counter only.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Frame(usize);

impl Frame {
    /// Creates a frame from a raw program counter.
    pub const fn from_ip(ip: usize) -> Self {
        Self(ip)
    }

    /// Returns the raw program counter of this frame.
    pub const fn ip(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({:#x})", self.0)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "backtrace")]
        if let Some(resolved) = self.resolve() {
            return resolved.fmt_with(f, hooks::stack_config().show_full_path);
        }

        write!(f, "{:#x}", self.0)
    }
}

/// An immutable snapshot of the call stack.
///
/// A stack is either *full* or *abbreviated*. An abbreviated stack omits the
/// outermost frames it shares with the stack of the error it wraps.
#[derive(Clone, PartialEq, Eq)]
pub struct Stack {
    frames: Vec<Frame>,
    abbreviated: bool,
}

impl Stack {
    /// Creates a full stack from already captured frames, innermost first.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            abbreviated: false,
        }
    }

    pub(crate) fn abbreviated(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            abbreviated: true,
        }
    }

    /// Returns the frames, innermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Iterates over the frames, innermost first.
    pub fn iter(&self) -> core::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Returns the number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frames were kept.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns `true` if the frames shared with a wrapped stack were omitted.
    pub fn is_abbreviated(&self) -> bool {
        self.abbreviated
    }

    /// Captures the current stack.
    ///
    /// `skip` is the number of frames between the capture and the caller
    /// whose call site should become frame 0. Returns `None` when capture is
    /// disabled or nothing could be unwound.
    #[inline(always)]
    pub(crate) fn capture(skip: usize) -> Option<Self> {
        let config = hooks::stack_config();
        if !config.capture {
            return None;
        }
        let frames = capture_frames(skip, config.max_depth);
        if frames.is_empty() {
            None
        } else {
            Some(Self::from_frames(frames))
        }
    }

    /// Captures the current stack, abbreviating it against `inner` when the
    /// wrapped error already carries one.
    #[inline(always)]
    pub(crate) fn capture_over(skip: usize, inner: Option<&Stack>) -> Option<Self> {
        let config = hooks::stack_config();
        if !config.capture {
            return None;
        }
        let frames = capture_frames(skip, config.max_depth);
        if frames.is_empty() {
            return None;
        }
        match inner {
            Some(inner) if config.abbreviate => Some(merge(frames, inner.frames())),
            _ => Some(Self::from_frames(frames)),
        }
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("frames", &self.frames)
            .field("abbreviated", &self.abbreviated)
            .finish()
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, frame) in self.frames.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Frame;
    type IntoIter = core::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

// Frames belonging to the unwinder itself, below `capture_frames`.
#[cfg(feature = "backtrace")]
const UNWINDER_FRAME_ALLOWANCE: usize = 16;

#[cfg(feature = "backtrace")]
#[inline(never)]
fn capture_frames(skip: usize, max_depth: usize) -> Vec<Frame> {
    let marker = capture_frames as fn(usize, usize) -> Vec<Frame> as usize;
    let limit = max_depth
        .saturating_add(skip)
        .saturating_add(UNWINDER_FRAME_ALLOWANCE);

    let mut raw: Vec<(usize, usize)> = Vec::new();
    backtrace::trace(|frame| {
        raw.push((frame.ip() as usize, frame.symbol_address() as usize));
        raw.len() < limit
    });

    // If this function cannot be located the whole trace is kept.
    let start = raw
        .iter()
        .position(|&(_, symbol_address)| symbol_address == marker)
        .map_or(0, |index| index + 1 + skip);

    raw.into_iter()
        .skip(start)
        .take(max_depth)
        .map(|(ip, _)| Frame(ip))
        .collect()
}

#[cfg(not(feature = "backtrace"))]
#[inline(always)]
fn capture_frames(_skip: usize, _max_depth: usize) -> Vec<Frame> {
    Vec::new()
}
