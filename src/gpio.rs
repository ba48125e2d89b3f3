use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::ButtonController;

/// Any hardware source that can wait for the button to go down and up again.
///
/// Implementations are expected to deliver already debounced levels.
pub trait EdgeDriver {
    type Error;

    async fn wait_for_press(&mut self) -> Result<(), Self::Error>;
    async fn wait_for_release(&mut self) -> Result<(), Self::Error>;
}

/// Pin level that means "pressed".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pull-up wiring, the pin is pulled to ground while pressed.
    Low,
    /// Pull-down wiring, the pin is driven high while pressed.
    High,
}

/// A button wired straight to a GPIO input.
pub struct GpioEdgeSource<P: InputPin> {
    pin: P,
    active_level: ActiveLevel,
}

impl<P: InputPin> GpioEdgeSource<P> {
    pub fn new(pin: P, active_level: ActiveLevel) -> Self {
        Self { pin, active_level }
    }
}

impl<P> EdgeDriver for GpioEdgeSource<P>
where
    P: InputPin + Wait,
{
    type Error = P::Error;

    async fn wait_for_press(&mut self) -> Result<(), Self::Error> {
        match self.active_level {
            ActiveLevel::Low => self.pin.wait_for_low().await,
            ActiveLevel::High => self.pin.wait_for_high().await,
        }
    }

    async fn wait_for_release(&mut self) -> Result<(), Self::Error> {
        match self.active_level {
            ActiveLevel::Low => self.pin.wait_for_high().await,
            ActiveLevel::High => self.pin.wait_for_low().await,
        }
    }
}

/// Feeds every press and release seen by `driver` into `controller`.
///
/// Run it next to [`ButtonController::run`]; it only calls
/// [`on_edge`](ButtonController::on_edge), so it never waits on a handler
/// for longer than the handler itself takes. Returns only when the driver
/// fails; the edge that failed is not fed to the controller.
pub async fn watch<D: EdgeDriver>(
    driver: &mut D,
    controller: &ButtonController,
) -> Result<Infallible, D::Error> {
    loop {
        driver.wait_for_press().await?;
        controller.on_edge(true);
        driver.wait_for_release().await?;
        controller.on_edge(false);
    }
}
