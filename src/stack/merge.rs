use alloc::vec::Vec;

use super::{Frame, Stack};

/// Counts the frames `outer` and `inner` have in common, starting from the
/// outermost end of both.
pub fn shared_tail(outer: &[Frame], inner: &[Frame]) -> usize {
    outer
        .iter()
        .rev()
        .zip(inner.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Merges a freshly captured stack with the stack of the error it wraps.
///
/// With `i` the number of frames shared from the outermost end:
///
/// - `i == 0`: the stacks are unrelated and `outer` is kept as a full stack.
/// - `i == 1`, or the shorter stack is entirely shared: the last `i` frames
///   are dropped.
/// - otherwise the last `i - 1` frames are dropped, keeping the frame where
///   the two call paths diverge so the outer call site stays visible.
///
/// In the last two cases the result is abbreviated, even when no frames
/// remain.
///
/// # Examples
///
/// ```
/// use errnote::{Frame, stack::merge};
///
/// let frames = |ips: &[usize]| ips.iter().copied().map(Frame::from_ip).collect::<Vec<_>>();
///
/// let merged = merge(frames(&[9, 7, 3, 2, 1]), &frames(&[8, 4, 3, 2, 1]));
/// assert!(merged.is_abbreviated());
/// assert_eq!(merged.frames(), frames(&[9, 7, 3]));
///
/// let unrelated = merge(frames(&[9, 7]), &frames(&[8, 4]));
/// assert!(!unrelated.is_abbreviated());
/// ```
pub fn merge(mut outer: Vec<Frame>, inner: &[Frame]) -> Stack {
    let shared = shared_tail(&outer, inner);
    let overlap = outer.len().min(inner.len());

    let dropped = match shared {
        0 => return Stack::from_frames(outer),
        1 => 1,
        n if n == overlap => n,
        n => n - 1,
    };

    outer.truncate(outer.len() - dropped);
    Stack::abbreviated(outer)
}
