use aria_desk_common::*;
use alloc::rc::Rc;
use core::cell::RefCell;
use embassy_time::{Duration, Instant, Timer};

use crate::alarm::{AlarmBook, AlarmRinger, AlarmScheduler};
use crate::input::ButtonDecoder;
use crate::pages::widgets;
use crate::scheduler::{PageManager, PageSet};

/// 板级外设
pub struct Peripherals<D, A, T, C> {
    pub display: D,
    pub adc: A,
    pub tone: T,
    pub clock: C,
}

/// 主循环
///
/// One `tick` per poll interval: sample the toggle, hand any edge to the
/// page manager, run the scheduler, and once a second check the alarms.
/// While an alarm rings the panel belongs to the alarm screen and the
/// toggle only serves to silence it.
pub struct Device<D, A, T, C, K>
where
    D: Panel,
    A: ButtonAdc,
    T: ToneOutput,
    C: WallClock,
    K: KeyValueStore,
{
    manager: PageManager<D>,
    decoder: ButtonDecoder<A>,
    ringer: AlarmRinger<T>,
    clock: C,
    book: Rc<RefCell<AlarmBook<K>>>,
    alarms: AlarmScheduler,
    poll_interval: Duration,
    ring_poll_interval: Duration,
    housekeeping_interval: Duration,
    last_housekeeping: Option<Instant>,
}

impl<D, A, T, C, K> Device<D, A, T, C, K>
where
    D: Panel,
    A: ButtonAdc,
    T: ToneOutput,
    C: WallClock,
    K: KeyValueStore,
{
    pub fn new(
        peripherals: Peripherals<D, A, T, C>,
        pages: PageSet<D>,
        book: Rc<RefCell<AlarmBook<K>>>,
        config: &DeviceConfig,
    ) -> Self {
        let Peripherals {
            display,
            adc,
            tone,
            clock,
        } = peripherals;
        Self {
            manager: PageManager::new(display, pages, &config.scheduler),
            decoder: ButtonDecoder::new(adc, &config.button),
            ringer: AlarmRinger::new(tone, &config.alarm),
            clock,
            book,
            alarms: AlarmScheduler::new(),
            poll_interval: Duration::from_millis(config.main_loop.poll_interval_ms),
            ring_poll_interval: Duration::from_millis(config.alarm.poll_interval_ms),
            housekeeping_interval: Duration::from_millis(config.main_loop.housekeeping_interval_ms),
            last_housekeeping: None,
        }
    }

    pub fn begin(&mut self, now: Instant) {
        let wall = self.clock.now();
        info!("device starting at {}", wall);
        self.manager.begin(now, wall);
    }

    pub fn tick(&mut self, now: Instant) {
        let wall = self.clock.now();

        if self.ringer.is_ringing() {
            // keep the decoder in step so the dismissing press is not
            // replayed as an edge afterwards
            let state = self.decoder.read_raw();
            self.decoder.observe(state, now);
            if !self.ringer.poll(state.is_pressed(), now) {
                self.manager.end_takeover(now, wall);
            }
            return;
        }

        let edge = self.decoder.read_edge(now);
        if edge.is_pressed() {
            debug!("button {:?}", edge);
        }
        self.manager.handle_button_edge(edge, now, wall);
        self.manager.tick(now, wall, self.decoder.last_state());

        let due = self
            .last_housekeeping
            .is_none_or(|at| now.saturating_duration_since(at) >= self.housekeeping_interval);
        if due {
            self.last_housekeeping = Some(now);
            self.housekeeping(now, wall);
        }
    }

    fn housekeeping(&mut self, now: Instant, wall: jiff::civil::DateTime) {
        let slots = *self.book.borrow().slots();
        let Some(index) = self.alarms.check(&slots, wall) else {
            return;
        };
        let slot = slots[index];
        info!("alarm {} fires at {:02}:{:02}", index + 1, slot.hour, slot.minute);
        self.manager
            .begin_takeover(now, |display| widgets::draw_alarm_screen(display, index, &slot, wall));
        self.ringer.start(Melody::for_tone(slot.tone), now);
    }

    /// Sleep between ticks; shorter while ringing so notes keep time.
    pub fn poll_interval(&self) -> Duration {
        if self.ringer.is_ringing() {
            self.ring_poll_interval
        } else {
            self.poll_interval
        }
    }

    pub fn is_ringing(&self) -> bool {
        self.ringer.is_ringing()
    }

    pub fn manager(&self) -> &PageManager<D> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut PageManager<D> {
        &mut self.manager
    }

    pub async fn run(mut self) -> ! {
        self.begin(Instant::now());
        loop {
            self.tick(Instant::now());
            Timer::after(self.poll_interval()).await;
        }
    }
}
