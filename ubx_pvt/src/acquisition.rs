//! The producer side: reads frames from the receiver and hands every
//! NAV-PVT solution to the [`DoubleBuffer`] held by a shared [`GnssContext`].

use crate::{
    double_buffer::{DoubleBuffer, Snapshot},
    error::{Error, ParserError},
    parser::{read_frame, FrameSynchronizer},
    transport::Transceiver,
    ubx_packets::{commands::RatePreset, decode_frame, NavPvt, UbxPacket},
};
use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Condvar, Mutex,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// Cooperative stop flag with a wakeable wait
#[derive(Debug, Default)]
pub struct Shutdown {
    stopped: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag and wakes any thread inside [`wait`](Self::wait). Idempotent.
    pub fn request_stop(&self) {
        // Taking the lock orders the store against a waiter that just checked the flag
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.stopped.store(true, Ordering::SeqCst);
        self.wake.notify_all();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Sleeps up to `timeout`, returning early with `true` once stop is requested
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        while !self.is_stop_requested() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            guard = match self.wake.wait_timeout(guard, remaining) {
                Ok((guard, _)) => guard,
                Err(e) => e.into_inner().0,
            };
        }
        true
    }
}

/// State shared between the acquisition thread and its consumers
#[derive(Default)]
pub struct GnssContext {
    buffer: DoubleBuffer<NavPvt>,
    shutdown: Shutdown,
}

impl GnssContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Write side, reserved to the acquisition loop
    pub(crate) fn buffer(&self) -> &DoubleBuffer<NavPvt> {
        &self.buffer
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Latest published solution
    pub fn snapshot(&self) -> Option<Snapshot<NavPvt>> {
        self.buffer.snapshot()
    }

    /// Blocks until a solution newer than `after_generation` arrives or `timeout` expires
    pub fn wait_for_fix(&self, after_generation: u64, timeout: Duration) -> Option<Snapshot<NavPvt>> {
        self.buffer.wait_for_update(after_generation, timeout)
    }

    pub fn request_stop(&self) {
        self.shutdown.request_stop();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.shutdown.is_stop_requested()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionConfig {
    /// Pause after each published solution and after each transport failure
    pub cycle_interval: Duration,
    /// Give up a sync scan after this many bytes so shutdown is observed even
    /// when the link only delivers idle bytes. `None` scans without bound.
    pub sync_scan_limit: Option<usize>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self::for_rate(RatePreset::default())
    }
}

impl AcquisitionConfig {
    pub fn for_rate(rate: RatePreset) -> Self {
        Self {
            cycle_interval: rate.cycle_interval(),
            sync_scan_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    Idle,
    Synchronizing,
    Decoding,
    Publishing,
    Stopped,
}

/// Per-outcome counters, returned when the loop ends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionStats {
    /// Complete frames read, whatever their checksum
    pub frames: u64,
    pub published: u64,
    pub checksum_errors: u64,
    pub framing_errors: u64,
    pub size_mismatches: u64,
    pub unrecognized: u64,
    /// Known packets other than NAV-PVT
    pub non_pvt: u64,
    pub transport_errors: u64,
}

/// Result of one acquisition cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A NAV-PVT was handed off under this generation
    Published(u64),
    /// Nothing was published this cycle
    Dropped,
    /// The transport failed; the loop backs off before the next cycle
    LinkFailed,
    /// The link has no more data
    EndOfStream,
}

pub struct AcquisitionLoop<X> {
    link: X,
    ctx: Arc<GnssContext>,
    config: AcquisitionConfig,
    state: AcquisitionState,
    stats: AcquisitionStats,
    /// Transport failures since the last successful read
    link_failures: u64,
}

impl<X: Transceiver> AcquisitionLoop<X> {
    pub fn new(link: X, ctx: Arc<GnssContext>, config: AcquisitionConfig) -> Self {
        Self {
            link,
            ctx,
            config,
            state: AcquisitionState::Idle,
            stats: AcquisitionStats::default(),
            link_failures: 0,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn stats(&self) -> &AcquisitionStats {
        &self.stats
    }

    pub fn context(&self) -> &Arc<GnssContext> {
        &self.ctx
    }

    fn set_state(&mut self, next: AcquisitionState) {
        if self.state != next {
            log::trace!("acquisition: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Runs until stop is requested or the link reaches end of stream
    pub fn run(mut self) -> AcquisitionStats {
        log::info!("Acquisition started");
        while !self.ctx.is_stop_requested() {
            match self.run_cycle() {
                CycleOutcome::Published(_) | CycleOutcome::LinkFailed => {
                    if self.ctx.shutdown().wait(self.config.cycle_interval) {
                        break;
                    }
                },
                CycleOutcome::Dropped => {},
                CycleOutcome::EndOfStream => {
                    log::info!("Link closed");
                    break;
                },
            }
        }
        self.set_state(AcquisitionState::Stopped);
        log::info!("Acquisition stopped: {:?}", self.stats);
        self.stats
    }

    /// One full message cycle: sync, read, validate, decode and, for NAV-PVT, publish
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.set_state(AcquisitionState::Synchronizing);
        let synced = match self.config.sync_scan_limit {
            Some(limit) => FrameSynchronizer::synchronize_within(&mut self.link, limit),
            None => FrameSynchronizer::synchronize(&mut self.link).map_err(Error::from),
        };
        match synced {
            Ok(discarded) => {
                self.link_recovered();
                if discarded > 0 {
                    log::debug!("Discarded {} bytes before frame marker", discarded);
                }
            },
            Err(e) => return self.on_error(e),
        }

        self.set_state(AcquisitionState::Decoding);
        let frame = match read_frame(&mut self.link) {
            Ok(frame) => frame,
            Err(e) => return self.on_error(e),
        };
        self.stats.frames += 1;
        if let Err(e) = frame.validate() {
            return self.on_error(e.into());
        }

        let decoded = decode_frame(&frame);
        if let Some(mismatch) = decoded.size_mismatch {
            self.stats.size_mismatches += 1;
            log::warn!("{}", mismatch);
        }
        match decoded.packet {
            UbxPacket::NavPvt(pvt) => {
                self.set_state(AcquisitionState::Publishing);
                let generation = self.ctx.buffer().publish(pvt);
                self.stats.published += 1;
                log::trace!(
                    "Published NAV-PVT itow={} fix={:?} generation={}",
                    pvt.itow,
                    pvt.fix_type,
                    generation
                );
                CycleOutcome::Published(generation)
            },
            UbxPacket::Unknown { class, msg_id, len } => {
                self.stats.unrecognized += 1;
                log::debug!(
                    "Dropping unrecognized frame class=0x{:02x} id=0x{:02x} len={}",
                    class,
                    msg_id,
                    len
                );
                CycleOutcome::Dropped
            },
            other => {
                self.stats.non_pvt += 1;
                log::debug!("Dropping {} during acquisition", other.name());
                CycleOutcome::Dropped
            },
        }
    }

    fn on_error(&mut self, e: Error) -> CycleOutcome {
        match e {
            Error::Io(ref io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => {
                return CycleOutcome::EndOfStream;
            },
            Error::Io(ref io_err) => {
                self.stats.transport_errors += 1;
                self.link_failures += 1;
                if io_err.kind() == io::ErrorKind::TimedOut {
                    log::debug!("Link timed out");
                } else if self.link_failures == 1 {
                    log::warn!("Link failed: {}", io_err);
                } else {
                    log::debug!("Link failed ({} in a row): {}", self.link_failures, io_err);
                }
                return CycleOutcome::LinkFailed;
            },
            Error::Parser(ParserError::InvalidChecksum { .. }) => self.stats.checksum_errors += 1,
            Error::Parser(_) => self.stats.framing_errors += 1,
            _ => {},
        }
        log::warn!("Dropping cycle: {}", e);
        CycleOutcome::Dropped
    }
}

impl<X> AcquisitionLoop<X> {
    fn link_recovered(&mut self) {
        if self.link_failures > 0 {
            log::info!("Link recovered after {} failed cycles", self.link_failures);
            self.link_failures = 0;
        }
    }
}

impl<X: Transceiver + Send + 'static> AcquisitionLoop<X> {
    /// Runs the loop on a dedicated thread
    pub fn spawn(self) -> io::Result<AcquisitionHandle> {
        let ctx = Arc::clone(&self.ctx);
        let thread = thread::Builder::new()
            .name("ubx-acquisition".into())
            .spawn(move || self.run())?;
        Ok(AcquisitionHandle { ctx, thread })
    }
}

pub struct AcquisitionHandle {
    ctx: Arc<GnssContext>,
    thread: JoinHandle<AcquisitionStats>,
}

impl AcquisitionHandle {
    pub fn context(&self) -> &Arc<GnssContext> {
        &self.ctx
    }

    pub fn request_stop(&self) {
        self.ctx.request_stop();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the loop to end; `Err` carries the panic payload if it panicked
    pub fn join(self) -> thread::Result<AcquisitionStats> {
        self.thread.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        transport::ReplayTransceiver,
        ubx_packets::{commands::POLL_CFG_RATE, GnssFixType},
    };
    use std::io::Cursor;

    fn pvt(itow: u32) -> NavPvt {
        NavPvt {
            itow,
            fix_type: GnssFixType::Fix3D,
            lat: 400_000_000,
            lon: -1_050_000_000,
            ..NavPvt::default()
        }
    }

    fn quick() -> AcquisitionConfig {
        AcquisitionConfig {
            cycle_interval: Duration::ZERO,
            sync_scan_limit: None,
        }
    }

    fn replay(bytes: Vec<u8>) -> ReplayTransceiver<Cursor<Vec<u8>>> {
        ReplayTransceiver::new(Cursor::new(bytes))
    }

    #[test]
    fn cycle_publishes_nav_pvt() {
        let ctx = GnssContext::new();
        let mut acq = AcquisitionLoop::new(
            replay(pvt(1000).into_packet_bytes().to_vec()),
            Arc::clone(&ctx),
            quick(),
        );
        assert_eq!(acq.state(), AcquisitionState::Idle);
        assert_eq!(acq.run_cycle(), CycleOutcome::Published(1));
        assert_eq!(acq.state(), AcquisitionState::Publishing);
        assert_eq!(ctx.snapshot().unwrap().value, pvt(1000));
        assert_eq!(acq.run_cycle(), CycleOutcome::EndOfStream);
    }

    #[test]
    fn non_pvt_frames_are_dropped() {
        let ctx = GnssContext::new();
        let mut bytes = POLL_CFG_RATE.to_vec();
        bytes.extend_from_slice(&[0xb5, 0x62, 0x0a, 0x04, 0x00, 0x00, 0x0e, 0x34]);
        let stats = AcquisitionLoop::new(replay(bytes), Arc::clone(&ctx), quick()).run();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.non_pvt, 1);
        assert_eq!(stats.unrecognized, 1);
        assert_eq!(stats.size_mismatches, 1);
        assert_eq!(stats.published, 0);
        assert!(ctx.snapshot().is_none());
    }

    #[test]
    fn corrupted_frame_is_not_published() {
        let ctx = GnssContext::new();
        let mut frame = pvt(2000).into_packet_bytes();
        frame[NavPvt::FRAME_LEN - 1] ^= 0xff;
        let mut bytes = frame.to_vec();
        bytes.extend_from_slice(&pvt(3000).into_packet_bytes());
        let stats = AcquisitionLoop::new(replay(bytes), Arc::clone(&ctx), quick()).run();
        assert_eq!(stats.checksum_errors, 1);
        assert_eq!(stats.published, 1);
        assert_eq!(ctx.snapshot().unwrap().value.itow, 3000);
    }

    #[test]
    fn bounded_scan_counts_framing_errors() {
        let ctx = GnssContext::new();
        let config = AcquisitionConfig {
            sync_scan_limit: Some(16),
            ..quick()
        };
        let mut acq = AcquisitionLoop::new(replay(vec![0xff; 40]), ctx, config);
        assert_eq!(acq.run_cycle(), CycleOutcome::Dropped);
        assert_eq!(acq.run_cycle(), CycleOutcome::Dropped);
        assert_eq!(acq.run_cycle(), CycleOutcome::EndOfStream);
        assert_eq!(acq.stats().framing_errors, 2);
    }

    /// Fails every exchange with `kind`
    struct BrokenLink(io::ErrorKind);

    impl Transceiver for BrokenLink {
        fn transceive(&mut self, _buf: &mut [u8]) -> io::Result<()> {
            Err(self.0.into())
        }
    }

    #[test]
    fn transport_failures_are_counted_and_reported() {
        let ctx = GnssContext::new();
        let mut acq = AcquisitionLoop::new(BrokenLink(io::ErrorKind::BrokenPipe), ctx, quick());
        assert_eq!(acq.run_cycle(), CycleOutcome::LinkFailed);
        assert_eq!(acq.run_cycle(), CycleOutcome::LinkFailed);
        assert_eq!(acq.stats().transport_errors, 2);
        assert_eq!(acq.link_failures, 2);

        let mut acq = AcquisitionLoop::new(
            BrokenLink(io::ErrorKind::TimedOut),
            GnssContext::new(),
            quick(),
        );
        assert_eq!(acq.run_cycle(), CycleOutcome::LinkFailed);
        assert_eq!(acq.stats().transport_errors, 1);
    }

    #[test]
    fn successful_sync_clears_failure_streak() {
        let mut acq = AcquisitionLoop::new(
            replay(pvt(5).into_packet_bytes().to_vec()),
            GnssContext::new(),
            quick(),
        );
        acq.link_failures = 3;
        assert_eq!(acq.run_cycle(), CycleOutcome::Published(1));
        assert_eq!(acq.link_failures, 0);
    }

    #[test]
    fn stop_before_run_publishes_nothing() {
        let ctx = GnssContext::new();
        ctx.request_stop();
        let acq = AcquisitionLoop::new(
            replay(pvt(1).into_packet_bytes().to_vec()),
            Arc::clone(&ctx),
            quick(),
        );
        let stats = acq.run();
        assert_eq!(stats, AcquisitionStats::default());
        assert!(ctx.snapshot().is_none());
    }

    #[test]
    fn shutdown_wait_wakes_early() {
        let shutdown = Arc::new(Shutdown::new());
        let stopper = {
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                shutdown.request_stop();
            })
        };
        let started = Instant::now();
        assert!(shutdown.wait(Duration::from_secs(30)));
        assert!(started.elapsed() < Duration::from_secs(10));
        stopper.join().unwrap();
        assert!(!Shutdown::new().wait(Duration::from_millis(1)));
    }
}
