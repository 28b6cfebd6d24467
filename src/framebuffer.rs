//! Ring of frame buffers between the drawing code and the page transfer
//!
//! The ring owns every frame. The producer borrows the slot at the write
//! cursor, the consumer borrows the slot at the read cursor, and nothing is
//! ever copied between them. With two frames this is plain ping-pong
//! buffering: one frame is drawn while the other is still being sent.
//!
//! Running out of slots is not an error. [`FrameBuffer::acquire_writable`]
//! and [`FrameBuffer::acquire_readable`] return `None` and the caller polls
//! again later.

/// Cursor state of the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ring<const N: usize> {
    write: usize,
    read: usize,
    readable: usize,
}

impl<const N: usize> Ring<N> {
    const fn new() -> Self {
        Ring {
            write: 0,
            read: 0,
            readable: 0,
        }
    }

    fn writeable(&self) -> bool {
        self.readable < N
    }

    fn readable(&self) -> bool {
        self.readable > 0
    }

    fn commit_write(&mut self) {
        assert!(
            self.readable < N,
            "commit_write called with all {} frames readable",
            N
        );
        self.write = (self.write + 1) % N;
        self.readable += 1;
    }

    fn commit_read(&mut self) {
        assert!(self.readable > 0, "commit_read called with no readable frame");
        self.read = (self.read + 1) % N;
        self.readable -= 1;
    }
}

/// Fixed ring of `N` frames of `FRAME` bytes each
///
/// Single producer, single consumer. All calls take `&mut self` or `&self`, so
/// a ring shared with an interrupt handler has to sit behind whatever
/// critical-section wrapper the platform provides.
pub struct FrameBuffer<const FRAME: usize, const N: usize> {
    frames: [[u8; FRAME]; N],
    ring: Ring<N>,
}

/// A write that has been handed out but not yet committed
///
/// Returned together with the frame by [`FrameBuffer::split_writable`].
/// Dropping it without calling [`PendingWrite::commit`] abandons the frame;
/// the slot stays writable.
pub struct PendingWrite<'a, const N: usize> {
    ring: &'a mut Ring<N>,
}

impl<const N: usize> PendingWrite<'_, N> {
    /// Hand the frame over to the consumer
    pub fn commit(self) {
        self.ring.commit_write();
    }
}

impl<const FRAME: usize, const N: usize> FrameBuffer<FRAME, N> {
    const AT_LEAST_TWO_FRAMES: () = assert!(N >= 2, "a frame ring needs at least two frames");

    /// Number of frames in the ring
    pub const NUM_FRAMES: usize = N;

    /// Size of each frame in bytes
    pub const FRAME_SIZE: usize = FRAME;

    /// Create a ring with every frame zeroed and nothing readable
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::AT_LEAST_TWO_FRAMES;
        FrameBuffer {
            frames: [[0; FRAME]; N],
            ring: Ring::new(),
        }
    }

    /// Zero every frame and reset all cursors
    pub fn init(&mut self) {
        for frame in self.frames.iter_mut() {
            frame.fill(0);
        }
        self.ring = Ring::new();
    }

    /// Whether a frame is free for drawing
    pub fn writeable(&self) -> bool {
        self.ring.writeable()
    }

    /// The frame at the write cursor, or `None` while every frame is readable
    ///
    /// The borrow ends before [`FrameBuffer::commit_write`] can be called, so
    /// the producer cannot touch the frame after handing it over.
    pub fn acquire_writable(&mut self) -> Option<&mut [u8; FRAME]> {
        if !self.ring.writeable() {
            return None;
        }
        Some(&mut self.frames[self.ring.write])
    }

    /// Like [`FrameBuffer::acquire_writable`], but keeps the commit attached
    /// to the borrow so the frame can be drawn into and committed in one go.
    pub fn split_writable(&mut self) -> Option<(&mut [u8; FRAME], PendingWrite<'_, N>)> {
        let FrameBuffer { frames, ring } = self;
        if !ring.writeable() {
            return None;
        }
        let frame = &mut frames[ring.write];
        Some((frame, PendingWrite { ring }))
    }

    /// Advance the write cursor and mark the written frame readable
    ///
    /// # Panics
    ///
    /// If every frame is already readable, i.e. nothing was acquired.
    pub fn commit_write(&mut self) {
        self.ring.commit_write();
    }

    /// Whether a committed frame is waiting to be sent
    pub fn readable(&self) -> bool {
        self.ring.readable()
    }

    /// The oldest committed frame, or `None` while nothing is readable
    pub fn acquire_readable(&self) -> Option<&[u8; FRAME]> {
        if !self.ring.readable() {
            return None;
        }
        Some(&self.frames[self.ring.read])
    }

    /// Release the frame at the read cursor back to the producer
    ///
    /// # Panics
    ///
    /// If no frame is readable.
    pub fn commit_read(&mut self) {
        self.ring.commit_read();
    }

    /// Frames committed but not yet released by the consumer
    pub fn readable_count(&self) -> usize {
        self.ring.readable
    }

    /// Slot index of the write cursor
    pub fn write_index(&self) -> usize {
        self.ring.write
    }

    /// Slot index of the read cursor
    pub fn read_index(&self) -> usize {
        self.ring.read
    }
}

impl<const FRAME: usize, const N: usize> Default for FrameBuffer<FRAME, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        AcquireWrite,
        CommitWrite,
        AcquireRead,
        CommitRead,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AcquireWrite),
            Just(Op::CommitWrite),
            Just(Op::AcquireRead),
            Just(Op::CommitRead),
        ]
    }

    fn check_cursors<const F: usize, const N: usize>(fb: &FrameBuffer<F, N>) {
        let count = fb.readable_count();
        assert!(count <= N);
        if count == 0 || count == N {
            assert_eq!(fb.write_index(), fb.read_index());
        } else {
            assert_ne!(fb.write_index(), fb.read_index());
        }
        assert_eq!(fb.writeable(), count < N);
        assert_eq!(fb.readable(), count > 0);
    }

    fn run_ops<const N: usize>(ops: &[Op]) {
        let mut fb: FrameBuffer<16, N> = FrameBuffer::new();
        let mut write_held = false;
        let mut read_held = false;

        for op in ops {
            match op {
                Op::AcquireWrite => write_held = fb.acquire_writable().is_some(),
                Op::CommitWrite if write_held => {
                    fb.commit_write();
                    write_held = false;
                }
                Op::AcquireRead => read_held = fb.acquire_readable().is_some(),
                Op::CommitRead if read_held => {
                    fb.commit_read();
                    read_held = false;
                }
                _ => {}
            }
            check_cursors(&fb);

            if fb.readable_count() == N {
                assert!(fb.acquire_writable().is_none());
            }
            if fb.readable_count() == 0 {
                assert!(fb.acquire_readable().is_none());
            }
        }
    }

    proptest! {
        #[test]
        fn cursors_stay_consistent_with_two_frames(ops in proptest::collection::vec(op(), 0..200)) {
            run_ops::<2>(&ops);
        }

        #[test]
        fn cursors_stay_consistent_with_three_frames(ops in proptest::collection::vec(op(), 0..200)) {
            run_ops::<3>(&ops);
        }

        #[test]
        fn cursors_stay_consistent_with_five_frames(ops in proptest::collection::vec(op(), 0..200)) {
            run_ops::<5>(&ops);
        }
    }

    #[test]
    fn test_new_ring_is_empty() {
        let fb: FrameBuffer<8, 2> = FrameBuffer::new();
        assert!(fb.writeable());
        assert!(!fb.readable());
        assert!(fb.acquire_readable().is_none());
        assert_eq!(FrameBuffer::<8, 2>::NUM_FRAMES, 2);
        assert_eq!(FrameBuffer::<8, 2>::FRAME_SIZE, 8);
    }

    #[test]
    fn test_full_ring_refuses_writes() {
        let mut fb: FrameBuffer<8, 2> = FrameBuffer::new();
        for _ in 0..2 {
            assert!(fb.acquire_writable().is_some());
            fb.commit_write();
        }
        assert!(fb.acquire_writable().is_none());
        assert!(fb.split_writable().is_none());
        assert_eq!(fb.readable_count(), 2);
    }

    #[test]
    fn test_frames_are_not_copied() {
        let mut fb: FrameBuffer<8, 2> = FrameBuffer::new();
        let written = {
            let frame = fb.acquire_writable().unwrap();
            frame[3] = 0xA5;
            frame.as_ptr()
        };
        fb.commit_write();

        let frame = fb.acquire_readable().unwrap();
        assert_eq!(frame.as_ptr(), written);
        assert_eq!(frame[3], 0xA5);
    }

    #[test]
    fn test_frames_come_out_in_commit_order() {
        let mut fb: FrameBuffer<1, 3> = FrameBuffer::new();
        for tag in 1..=3u8 {
            fb.acquire_writable().unwrap()[0] = tag;
            fb.commit_write();
        }
        for tag in 1..=3u8 {
            assert_eq!(fb.acquire_readable().unwrap()[0], tag);
            fb.commit_read();
        }
        assert!(!fb.readable());
    }

    #[test]
    fn test_ping_pong_reuse_does_not_leak() {
        let mut fb: FrameBuffer<4, 2> = FrameBuffer::new();
        for cycle in 0..1000u32 {
            let frame = fb.acquire_writable().expect("frame released by previous cycle");
            frame[0] = cycle as u8;
            fb.commit_write();

            assert_eq!(fb.acquire_readable().unwrap()[0], cycle as u8);
            fb.commit_read();
            assert_eq!(fb.readable_count(), 0);
        }
        assert_eq!(fb.write_index(), fb.read_index());
    }

    #[test]
    fn test_draw_while_other_frame_in_flight() {
        let mut fb: FrameBuffer<4, 2> = FrameBuffer::new();
        fb.acquire_writable().unwrap()[0] = 1;
        fb.commit_write();

        // consumer holds frame 0, producer gets frame 1
        let in_flight = fb.acquire_readable().unwrap().as_ptr();
        let drawing = fb.acquire_writable().unwrap().as_ptr();
        assert_ne!(in_flight, drawing);
    }

    #[test]
    fn test_split_writable_commits_once() {
        let mut fb: FrameBuffer<4, 2> = FrameBuffer::new();
        let (frame, pending) = fb.split_writable().unwrap();
        frame[1] = 7;
        pending.commit();
        assert_eq!(fb.readable_count(), 1);
        assert_eq!(fb.acquire_readable().unwrap()[1], 7);
    }

    #[test]
    fn test_dropped_pending_write_keeps_slot() {
        let mut fb: FrameBuffer<4, 2> = FrameBuffer::new();
        drop(fb.split_writable().unwrap());
        assert_eq!(fb.readable_count(), 0);
        assert_eq!(fb.write_index(), 0);
    }

    #[test]
    fn test_init_resets_everything() {
        let mut fb: FrameBuffer<4, 2> = FrameBuffer::new();
        fb.acquire_writable().unwrap().fill(0xFF);
        fb.commit_write();
        fb.init();
        assert_eq!(fb.readable_count(), 0);
        assert_eq!(fb.write_index(), 0);
        assert_eq!(fb.acquire_writable().unwrap(), &[0u8; 4]);
    }

    #[test]
    #[should_panic(expected = "commit_write")]
    fn test_commit_write_on_full_ring_panics() {
        let mut fb: FrameBuffer<4, 2> = FrameBuffer::new();
        fb.commit_write();
        fb.commit_write();
        fb.commit_write();
    }

    #[test]
    #[should_panic(expected = "commit_read")]
    fn test_commit_read_on_empty_ring_panics() {
        let mut fb: FrameBuffer<4, 2> = FrameBuffer::new();
        fb.commit_read();
    }
}
