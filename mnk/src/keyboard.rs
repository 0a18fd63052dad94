use embassy_time::{Duration, Instant, Ticker};
use heapless::Vec;

use crate::config::{ConfigError, KeyboardConfig};
use crate::dispatcher::{DispatchSummary, Dispatcher, EventEncoder, PostcardEncoder};
use crate::driver::gpio::Gpio;
use crate::event::KeyEvent;
use crate::light::StatusLed;
use crate::matrix::Matrix;
use crate::state::ConnectionStateCell;
use crate::tracker::KeyTracker;
use crate::transport::TransportWriter;

/// What happened in one scan cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Key events confirmed by the tracker
    pub events: usize,
    pub dispatch: DispatchSummary,
    /// The scan failed, key states were left untouched
    pub scan_failed: bool,
    /// The status led was toggled
    pub led_toggled: bool,
}

/// The scan task: matrix, tracker, dispatcher and status led.
///
/// `MAX_EVENTS` is the capacity of the per-scan event buffer, it must be at
/// least `SIDE * ROW * COL`. The default fits the mnk.01 board.
pub struct Keyboard<
    'a,
    G: Gpio,
    W: TransportWriter,
    E: EventEncoder,
    const SIDE: usize,
    const ROW: usize,
    const COL: usize,
    const MAX_EVENTS: usize = 72,
> {
    matrix: Matrix<'a, G, SIDE, ROW, COL>,
    tracker: KeyTracker<SIDE, ROW, COL>,
    dispatcher: Dispatcher<'a, W, E>,
    status_led: Option<StatusLed>,
    scan_interval: Duration,
}

impl<'a, G: Gpio, W: TransportWriter, const SIDE: usize, const ROW: usize, const COL: usize, const MAX_EVENTS: usize>
    Keyboard<'a, G, W, PostcardEncoder, SIDE, ROW, COL, MAX_EVENTS>
{
    /// Create a keyboard sending postcard encoded events
    pub fn new(
        config: &'a KeyboardConfig<'a, SIDE, ROW, COL>,
        gpio: G,
        writer: W,
        state: &'a ConnectionStateCell,
    ) -> Result<Self, ConfigError> {
        Self::with_encoder(config, gpio, writer, PostcardEncoder, state)
    }
}

impl<
    'a,
    G: Gpio,
    W: TransportWriter,
    E: EventEncoder,
    const SIDE: usize,
    const ROW: usize,
    const COL: usize,
    const MAX_EVENTS: usize,
> Keyboard<'a, G, W, E, SIDE, ROW, COL, MAX_EVENTS>
{
    /// Create a keyboard, the config is checked against the GPIO bank first.
    pub fn with_encoder(
        config: &'a KeyboardConfig<'a, SIDE, ROW, COL>,
        gpio: G,
        writer: W,
        encoder: E,
        state: &'a ConnectionStateCell,
    ) -> Result<Self, ConfigError> {
        config.validate(&gpio)?;
        Ok(Self {
            matrix: Matrix::new(&config.matrix, gpio)?,
            tracker: KeyTracker::new(config.debounce),
            dispatcher: Dispatcher::with_encoder(writer, encoder, state),
            status_led: config.status_led.as_ref().map(StatusLed::from_config),
            scan_interval: config.scan_interval,
        })
    }

    /// Configure the matrix and status led pins
    pub fn init(&mut self) -> Result<(), G::Error> {
        self.matrix.init()?;
        if let Some(led) = self.status_led.as_mut() {
            led.init(self.matrix.gpio_mut(), Instant::now())?;
        }
        info!("Keyboard initialized, scan interval: {}ms", self.scan_interval.as_millis());
        Ok(())
    }

    /// Run one scan, debounce and dispatch cycle.
    pub async fn run_once(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        match self.matrix.scan() {
            Ok(snapshot) => {
                let events: Vec<KeyEvent, MAX_EVENTS> = self.tracker.update(snapshot);
                report.events = events.len();
                if !events.is_empty() {
                    report.dispatch = self.dispatcher.dispatch(&events).await;
                }
            }
            Err(_) => {
                error!("Matrix scan failed, skip this cycle");
                report.scan_failed = true;
            }
        }
        if let Some(led) = self.status_led.as_mut() {
            report.led_toggled = led.tick(self.matrix.gpio_mut(), Instant::now());
        }
        report
    }

    /// Run the scan cycle forever, paced by the scan interval.
    pub async fn run(&mut self) -> ! {
        let mut ticker = Ticker::every(self.scan_interval);
        loop {
            self.run_once().await;
            ticker.next().await;
        }
    }

    pub fn tracker(&self) -> &KeyTracker<SIDE, ROW, COL> {
        &self.tracker
    }

    pub fn matrix_mut(&mut self) -> &mut Matrix<'a, G, SIDE, ROW, COL> {
        &mut self.matrix
    }

    pub fn dispatcher(&self) -> &Dispatcher<'a, W, E> {
        &self.dispatcher
    }

    pub fn status_led(&self) -> Option<&StatusLed> {
        self.status_led.as_ref()
    }
}

/// Keyboard of the mnk.01 board, two sides of 6x6 keys
pub type MnkKeyboard<'a, G, W> = Keyboard<'a, G, W, PostcardEncoder, 2, 6, 6>;
