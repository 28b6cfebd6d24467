//! Page-at-a-time transfer of one frame to a [`PageTransport`]
//!
//! The driver is either idle or sending. [`PagedDisplayDriver::begin`] starts
//! a frame at page 0; every [`PagedDisplayDriver::update`] offers the current
//! page to the transport once and only moves on when the transport took it.
//! After the last page the driver goes idle again and the caller releases the
//! frame back to its ring.
//!
//! The driver never reaches into the frame store itself. The caller passes the
//! frame on every update; it has to be the frame given to `begin` for as long
//! as the transfer runs.

use display_interface::DisplayError;

use crate::transport::PageTransport;
use crate::{FRAME_SIZE, NUM_PAGES, PAGE_SIZE};

/// Outcome of one [`PagedDisplayDriver::update`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// No frame in flight, nothing was sent
    Idle,
    /// The transport refused the page; it is offered again next time
    Retry(usize),
    /// The page was sent, more pages follow
    Sent(usize),
    /// The last page was sent and the driver is idle again
    Complete,
}

/// In-flight frame and the page to send next
#[derive(Debug, Clone, Copy)]
struct Cursor {
    frame: usize,
    page: usize,
}

/// Streams frames page by page into a transport it owns
pub struct PagedDisplayDriver<T> {
    transport: T,
    cursor: Option<Cursor>,
}

impl<T: PageTransport> PagedDisplayDriver<T> {
    /// Number of pages per frame
    pub const NUM_PAGES: usize = NUM_PAGES;

    /// Bytes per page
    pub const PAGE_SIZE: usize = PAGE_SIZE;

    /// Wrap a transport. The driver starts idle.
    pub fn new(transport: T) -> Self {
        PagedDisplayDriver {
            transport,
            cursor: None,
        }
    }

    /// Initialise the transport and drop any frame in flight
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.transport.init()?;
        self.cursor = None;
        Ok(())
    }

    /// Flush the transport and report whether the driver is idle
    pub fn flush(&mut self) -> bool {
        self.transport.flush();
        self.cursor.is_none()
    }

    /// Start sending `frame` from page 0
    pub fn begin(&mut self, frame: &[u8; FRAME_SIZE]) {
        if let Some(cursor) = self.cursor {
            log::warn!("Restarting transfer abandoned at page {}", cursor.page);
        }
        log::debug!("Starting frame transfer");
        self.cursor = Some(Cursor {
            frame: frame.as_ptr() as usize,
            page: 0,
        });
    }

    /// Whether a frame is in flight
    pub fn frame_valid(&self) -> bool {
        self.cursor.is_some()
    }

    /// Index of the next page to send, `None` while idle
    pub fn page(&self) -> Option<usize> {
        self.cursor.map(|cursor| cursor.page)
    }

    /// Offer the current page of `frame` to the transport, at most once
    pub fn update(&mut self, frame: &[u8; FRAME_SIZE]) -> Transfer {
        let Some(cursor) = self.cursor.as_mut() else {
            return Transfer::Idle;
        };
        debug_assert_eq!(
            cursor.frame,
            frame.as_ptr() as usize,
            "update called with a frame other than the one in flight"
        );

        let index = cursor.page;
        let start = index * PAGE_SIZE;
        if !self
            .transport
            .send_page(index, &frame[start..start + PAGE_SIZE])
        {
            log::trace!("Transport busy, retrying page {}", index);
            return Transfer::Retry(index);
        }

        log::trace!("Sent page {}", index);
        cursor.page += 1;
        if cursor.page >= NUM_PAGES {
            self.cursor = None;
            log::debug!("Frame transfer complete");
            return Transfer::Complete;
        }
        Transfer::Sent(index)
    }

    /// The wrapped transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The wrapped transport, for panel controls
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Transport that records every attempt and can refuse a number of them
    pub(crate) struct RecordingTransport {
        pub(crate) attempts: Vec<(usize, Vec<u8>)>,
        pub(crate) accepted: Vec<(usize, Vec<u8>)>,
        /// Refuse page `.0` this many more times
        pub(crate) refuse: Option<(usize, usize)>,
        pub(crate) flushes: usize,
        pub(crate) initialized: bool,
    }

    impl RecordingTransport {
        pub(crate) fn new() -> Self {
            RecordingTransport {
                attempts: Vec::new(),
                accepted: Vec::new(),
                refuse: None,
                flushes: 0,
                initialized: false,
            }
        }

        pub(crate) fn refusing(page: usize, times: usize) -> Self {
            let mut transport = Self::new();
            transport.refuse = Some((page, times));
            transport
        }

        pub(crate) fn stream(&self) -> Vec<u8> {
            self.accepted
                .iter()
                .flat_map(|(_, data)| data.iter().copied())
                .collect()
        }
    }

    impl PageTransport for RecordingTransport {
        fn init(&mut self) -> Result<(), DisplayError> {
            self.initialized = true;
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }

        fn send_page(&mut self, index: usize, data: &[u8]) -> bool {
            self.attempts.push((index, data.to_vec()));
            if let Some((page, remaining)) = self.refuse.as_mut() {
                if *page == index && *remaining > 0 {
                    *remaining -= 1;
                    return false;
                }
            }
            self.accepted.push((index, data.to_vec()));
            true
        }

        fn set_flip_mode(&mut self, _flip180: bool) -> Result<(), DisplayError> {
            Ok(())
        }
    }

    fn numbered_frame() -> [u8; FRAME_SIZE] {
        let mut frame = [0u8; FRAME_SIZE];
        for (i, byte) in frame.iter_mut().enumerate() {
            *byte = (i / PAGE_SIZE) as u8 * 16 + (i % 7) as u8;
        }
        frame
    }

    #[test]
    fn test_idle_update_sends_nothing() {
        let frame = [0u8; FRAME_SIZE];
        let mut driver = PagedDisplayDriver::new(RecordingTransport::new());
        assert_eq!(driver.update(&frame), Transfer::Idle);
        assert!(driver.transport().attempts.is_empty());
        assert!(driver.flush());
    }

    #[test]
    fn test_sends_every_page_once_in_order() {
        let frame = numbered_frame();
        let mut driver = PagedDisplayDriver::new(RecordingTransport::new());
        driver.begin(&frame);

        for page in 0..NUM_PAGES - 1 {
            assert!(!driver.flush());
            assert_eq!(driver.update(&frame), Transfer::Sent(page));
        }
        assert_eq!(driver.update(&frame), Transfer::Complete);
        assert!(driver.flush());
        assert_eq!(driver.update(&frame), Transfer::Idle);

        let transport = driver.into_transport();
        assert_eq!(transport.attempts.len(), NUM_PAGES);
        let indices: Vec<usize> = transport.accepted.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, (0..NUM_PAGES).collect::<Vec<_>>());
        assert_eq!(transport.stream(), frame.to_vec());
    }

    #[test]
    fn test_busy_page_is_retried_with_same_bytes() {
        let frame = numbered_frame();
        let mut driver = PagedDisplayDriver::new(RecordingTransport::refusing(3, 4));
        driver.begin(&frame);

        let mut calls = 0;
        while driver.update(&frame) != Transfer::Complete {
            calls += 1;
            assert!(calls < 100);
        }

        let transport = driver.into_transport();
        let page3: Vec<&Vec<u8>> = transport
            .attempts
            .iter()
            .filter(|(i, _)| *i == 3)
            .map(|(_, data)| data)
            .collect();
        assert_eq!(page3.len(), 5);
        let expected = &frame[3 * PAGE_SIZE..4 * PAGE_SIZE];
        assert!(page3.iter().all(|data| data.as_slice() == expected));

        // nothing after page 3 was attempted before page 3 went through
        let first_page4 = transport.attempts.iter().position(|(i, _)| *i == 4).unwrap();
        let last_page3 = transport.attempts.iter().rposition(|(i, _)| *i == 3).unwrap();
        assert!(last_page3 < first_page4);
        assert_eq!(transport.stream(), frame.to_vec());
    }

    #[test]
    fn test_retry_keeps_cursor() {
        let frame = numbered_frame();
        let mut driver = PagedDisplayDriver::new(RecordingTransport::refusing(0, 2));
        driver.begin(&frame);
        assert_eq!(driver.update(&frame), Transfer::Retry(0));
        assert_eq!(driver.update(&frame), Transfer::Retry(0));
        assert_eq!(driver.page(), Some(0));
        assert_eq!(driver.update(&frame), Transfer::Sent(0));
        assert_eq!(driver.page(), Some(1));
    }

    #[test]
    fn test_init_drops_frame_in_flight() {
        let frame = numbered_frame();
        let mut driver = PagedDisplayDriver::new(RecordingTransport::new());
        driver.begin(&frame);
        driver.update(&frame);
        driver.init().unwrap();
        assert!(!driver.frame_valid());
        assert!(driver.transport().initialized);
    }

    #[test]
    fn test_flush_reaches_transport() {
        let mut driver = PagedDisplayDriver::new(RecordingTransport::new());
        driver.flush();
        driver.flush();
        assert_eq!(driver.transport().flushes, 2);
    }
}
