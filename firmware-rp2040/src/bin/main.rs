#![no_std]
#![no_main]

use camera_server_rp2040::{
    vc0706, DeviceProfile, EmbassyClock, EngineConfig, I2cScanner, LedLight, Peripherals,
    ProtocolEngine, Sh1106, UartTransport, Vc0706, HOST_BAUD_RATE, IMAGE_BUFFER_SIZE,
};
use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::{I2C0, UART0, UART1};
use embassy_rp::uart::{Config as UartConfig, Uart};
use static_cell::ConstStaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART0_IRQ => embassy_rp::uart::InterruptHandler<UART0>;
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
    I2C0_IRQ => embassy_rp::i2c::InterruptHandler<I2C0>;
});

/// Compressed image storage, reused by every capture.
static IMAGE_BUFFER: ConstStaticCell<[u8; IMAGE_BUFFER_SIZE]> =
    ConstStaticCell::new([0; IMAGE_BUFFER_SIZE]);

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Camera server starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Host UART ---
    let mut host_config = UartConfig::default();
    host_config.baudrate = HOST_BAUD_RATE;
    let host = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        host_config,
    );

    // --- Camera UART ---
    let mut camera_config = UartConfig::default();
    camera_config.baudrate = vc0706::BAUD_RATE;
    let camera = Uart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        p.DMA_CH2,
        p.DMA_CH3,
        camera_config,
    );

    // --- Board variant ---
    let mut i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, I2cConfig::default());
    let profile = DeviceProfile::detect(&mut I2cScanner::new(&mut i2c));
    info!("Detected {} board", profile.model.name());

    let display = if profile.has_display {
        let mut display = Sh1106::new(i2c);
        match display.init().await {
            Ok(()) => Some(display),
            Err(e) => {
                warn!("Display init failed: {:?}", e);
                None
            }
        }
    } else {
        None
    };

    let light = if profile.has_illumination {
        Some(LedLight::new(Output::new(p.PIN_15, Level::Low)))
    } else {
        None
    };

    let peripherals = Peripherals {
        sensor: Vc0706::new(camera),
        light,
        display,
    };
    let mut engine = ProtocolEngine::new(
        UartTransport::new(host),
        peripherals,
        EmbassyClock,
        IMAGE_BUFFER.take(),
        profile,
        EngineConfig::default(),
    );

    if let Err(e) = engine.start().await {
        error!("Camera reset failed: {:?}", e);
    }

    info!("Camera server initialized, waiting for requests...");
    engine.run().await
}
