#![no_std]
#![allow(async_fn_in_trait)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod gpio;
pub mod registry;
pub mod report;

pub use config::*;
pub use error::{ConfigError, HandlerError, RegistryError};
pub use registry::{handler, EventRegistry, Handler, HandlerResult};
pub use report::{Level, LogReporter, NoopReporter, Reporter};

use alloc::sync::Arc;
use core::cell::Cell;

use embassy_futures::join::join;
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};

/// The four events a [`ButtonController`] publishes.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    Push,
    Release,
    Hold,
    Repeat,
}

impl ButtonEvent {
    pub const ALL: [ButtonEvent; 4] = [
        ButtonEvent::Push,
        ButtonEvent::Release,
        ButtonEvent::Hold,
        ButtonEvent::Repeat,
    ];

    /// Name under which the event is declared in the controller's registry.
    pub const fn name(self) -> &'static str {
        match self {
            ButtonEvent::Push => "push",
            ButtonEvent::Release => "release",
            ButtonEvent::Hold => "hold",
            ButtonEvent::Repeat => "repeat",
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Pressed,
    /// Pressed for at least the hold threshold.
    Held,
}

#[derive(Debug, Clone, Copy)]
struct PressState {
    pressed: bool,
    holding: bool,
    /// Bumped on every idle -> pressed transition, never on a redundant push.
    generation: u32,
    pressed_at: Instant,
}

enum HoldCheck {
    Entered,
    Repressed { generation: u32, pressed_at: Instant },
    Done,
}

/// Turns debounced push/release edges into `push`, `release`, `hold` and
/// `repeat` events.
///
/// [`on_edge`](Self::on_edge) is the only input and never blocks. The timing
/// loops live in [`run`](Self::run), which must be spawned once on the
/// application's executor:
///
/// ```ignore
/// static BUTTON: StaticCell<ButtonController> = StaticCell::new();
/// let button = BUTTON.init(ButtonController::new(ButtonConfig::default())?);
/// button.subscribe(ButtonEvent::Hold, handler(|_| Ok(())))?;
/// spawner.spawn(button_task(button))?; // calls button.run().await
/// ```
///
/// A repeat or hold tick that was already past its sleep when a release came
/// in may still be published right after that release. The window is bounded
/// by one tick; `on_edge` does not wait for the loops to settle.
pub struct ButtonController {
    config: ButtonConfig,
    state: Mutex<CriticalSectionRawMutex, Cell<PressState>>,
    registry: EventRegistry<()>,
    repeat_wake: Signal<CriticalSectionRawMutex, ()>,
    hold_wake: Signal<CriticalSectionRawMutex, ()>,
    reporter: Arc<dyn Reporter>,
}

impl ButtonController {
    pub fn new(config: ButtonConfig) -> Result<Self, ConfigError> {
        Self::with_reporter(config, Arc::new(NoopReporter))
    }

    /// Like [`new`](Self::new), reporting registry conditions and state
    /// transitions to `reporter`.
    pub fn with_reporter(
        config: ButtonConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = EventRegistry::with_events(ButtonEvent::ALL.iter().map(|event| event.name()))
            .with_reporter(reporter.clone());
        Ok(Self {
            config,
            state: Mutex::new(Cell::new(PressState {
                pressed: false,
                holding: false,
                generation: 0,
                pressed_at: Instant::from_ticks(0),
            })),
            registry,
            repeat_wake: Signal::new(),
            hold_wake: Signal::new(),
            reporter,
        })
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    pub fn subscribe(&self, event: ButtonEvent, handler: Handler<()>) -> Result<(), RegistryError> {
        self.registry.subscribe(event.name(), handler)
    }

    pub fn unsubscribe(
        &self,
        event: ButtonEvent,
        handler: &Handler<()>,
    ) -> Result<(), RegistryError> {
        self.registry.unsubscribe(event.name(), handler)
    }

    pub fn is_pressed(&self) -> bool {
        self.state.lock(|state| state.get().pressed)
    }

    pub fn is_holding(&self) -> bool {
        self.state.lock(|state| state.get().holding)
    }

    pub fn state(&self) -> ButtonState {
        let state = self.state.lock(Cell::get);
        match (state.pressed, state.holding) {
            (false, _) => ButtonState::Idle,
            (true, false) => ButtonState::Pressed,
            (true, true) => ButtonState::Held,
        }
    }

    /// Feeds one debounced edge: `true` when pressed, `false` when released.
    ///
    /// A push while already pressed publishes `push` again but starts no new
    /// press: hold and repeat timing keep following the first press.
    pub fn on_edge(&self, value: bool) {
        if value {
            let fresh = self.state.lock(|state| {
                let mut current = state.get();
                if current.pressed {
                    return false;
                }
                current.pressed = true;
                current.generation = current.generation.wrapping_add(1);
                current.pressed_at = Instant::now();
                state.set(current);
                true
            });
            if !fresh {
                self.reporter
                    .report(Level::Debug, format_args!("push while already pressed"));
            }
            self.emit(ButtonEvent::Push);
            self.repeat_wake.signal(());
            self.hold_wake.signal(());
        } else {
            let was_holding = self.state.lock(|state| {
                let mut current = state.get();
                let was_holding = current.holding;
                current.pressed = false;
                current.holding = false;
                state.set(current);
                was_holding
            });
            if self.config.suppress_release_after_hold && was_holding {
                self.reporter
                    .report(Level::Debug, format_args!("release after hold suppressed"));
            } else {
                self.emit(ButtonEvent::Release);
            }
        }
    }

    /// Runs the repeat and hold loops. Never returns.
    pub async fn run(&self) -> ! {
        let (never, _) = join(self.repeat_loop(), self.hold_loop()).await;
        never
    }

    async fn repeat_loop(&self) -> ! {
        let interval = self.config.repeat_interval;
        loop {
            self.repeat_wake.wait().await;
            // stale wake left by a push handled while the previous press was still running
            let Some((mut generation, pressed_at)) = self.current_press() else {
                continue;
            };
            let mut next = pressed_at + interval;
            loop {
                Timer::at(next).await;
                match self.current_press() {
                    None => break,
                    Some((current, pressed_at)) if current != generation => {
                        generation = current;
                        next = pressed_at + interval;
                    }
                    Some(_) => {
                        self.emit(ButtonEvent::Repeat);
                        next += interval;
                    }
                }
            }
        }
    }

    async fn hold_loop(&self) -> ! {
        let threshold = self.config.hold_threshold;
        loop {
            self.hold_wake.wait().await;
            let Some((mut generation, mut pressed_at)) = self.current_press() else {
                continue;
            };
            loop {
                Timer::at(pressed_at + threshold).await;
                match self.try_enter_hold(generation) {
                    HoldCheck::Entered => {
                        self.reporter
                            .report(Level::Debug, format_args!("hold threshold reached"));
                        self.emit(ButtonEvent::Hold);
                        break;
                    }
                    HoldCheck::Repressed {
                        generation: current,
                        pressed_at: at,
                    } => {
                        generation = current;
                        pressed_at = at;
                    }
                    HoldCheck::Done => break,
                }
            }
        }
    }

    fn current_press(&self) -> Option<(u32, Instant)> {
        let state = self.state.lock(Cell::get);
        state.pressed.then_some((state.generation, state.pressed_at))
    }

    fn try_enter_hold(&self, generation: u32) -> HoldCheck {
        self.state.lock(|state| {
            let mut current = state.get();
            if !current.pressed || current.holding {
                return HoldCheck::Done;
            }
            if current.generation != generation {
                return HoldCheck::Repressed {
                    generation: current.generation,
                    pressed_at: current.pressed_at,
                };
            }
            current.holding = true;
            state.set(current);
            HoldCheck::Entered
        })
    }

    fn emit(&self, event: ButtonEvent) {
        // declared at construction and never undeclared; handler failures are
        // reported by the registry itself
        let _ = self.registry.publish(event.name(), &());
    }
}
