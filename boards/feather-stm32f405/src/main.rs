#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

mod display;
mod eth;
mod network;
mod rtc;

stm32_tim2_monotonic!(Mono, 1_000_000);

/// What the board does once the clock has given up
#[derive(Debug, Clone, Copy, defmt::Format)]
pub enum FatalAction {
    /// Stop the clock task; the CPU sleeps in the idle WFI loop
    Halt,
    /// Request a system reset and start over
    #[allow(dead_code)]
    Reset,
}

const FATAL_ACTION: FatalAction = FatalAction::Halt;

/// Carry out [`FATAL_ACTION`]; never returns
async fn fatal_stop() -> ! {
    defmt::error!("Fatal action: {}", FATAL_ACTION);
    match FATAL_ACTION {
        FatalAction::Halt => loop {
            core::future::pending::<()>().await;
        },
        FatalAction::Reset => cortex_m::peripheral::SCB::sys_reset(),
    }
}

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1])]
mod app {
    use super::*;
    use defmt::{error, info};
    use embassy_futures::join::join3;
    use embassy_stm32::exti::ExtiInput;
    use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
    use embassy_stm32::i2c::I2c;
    use embassy_stm32::peripherals;
    use embassy_stm32::rcc::{Hse, HseMode, LsConfig, LseConfig, LseMode};
    use embassy_stm32::rtc::{Rtc, RtcConfig};
    use embassy_stm32::spi::{self, Spi};
    use embassy_stm32::time::Hertz;
    use embassy_time::Delay;

    use digiclock_core::{ClockConfig, DigiClock, ModeSwitches};
    use display::{DigiClockUnit, DisplayConfig};
    use network::{EthLink, NetworkConfig, SntpClient};
    use rtc::StmRtc;

    type SpiPeripheral = embassy_stm32::Peri<'static, peripherals::SPI2>;
    type PinPB13 = embassy_stm32::Peri<'static, peripherals::PB13>;
    type PinPB15 = embassy_stm32::Peri<'static, peripherals::PB15>;
    type PinPB14 = embassy_stm32::Peri<'static, peripherals::PB14>;
    type PinPC6 = embassy_stm32::Peri<'static, peripherals::PC6>;
    type PinPC3 = embassy_stm32::Peri<'static, peripherals::PC3>;
    type PinPC2 = embassy_stm32::Peri<'static, peripherals::PC2>;
    type ExtiChannel = embassy_stm32::Peri<'static, peripherals::EXTI2>;
    type DmaTx = embassy_stm32::Peri<'static, peripherals::DMA1_CH4>;
    type DmaRx = embassy_stm32::Peri<'static, peripherals::DMA1_CH3>;

    type RtcPeripheral = embassy_stm32::Peri<'static, peripherals::RTC>;
    type I2cPeripheral = embassy_stm32::Peri<'static, peripherals::I2C1>;
    type PinPB6 = embassy_stm32::Peri<'static, peripherals::PB6>;
    type PinPB7 = embassy_stm32::Peri<'static, peripherals::PB7>;
    type PinPC7 = embassy_stm32::Peri<'static, peripherals::PC7>;
    type PinPA15 = embassy_stm32::Peri<'static, peripherals::PA15>;

    struct NetworkPeripherals {
        spi: SpiPeripheral,
        sck: PinPB13,
        mosi: PinPB15,
        miso: PinPB14,
        cs: PinPC6,
        reset: PinPC3,
        int: PinPC2,
        exti: ExtiChannel,
        dma_tx: DmaTx,
        dma_rx: DmaRx,
    }

    /// Display bus, mode switches and RTC
    struct ClockPeripherals {
        rtc: RtcPeripheral,
        i2c: I2cPeripheral,
        scl: PinPB6,
        sda: PinPB7,
        /// Colon-flash switch, closed = LOW
        flash_pin: PinPC7,
        /// 24-hour switch, closed = LOW
        hour24_pin: PinPA15,
    }

    #[shared]
    struct Shared {}

    #[local]
    struct Local {}

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("Digi-clock starting...");

        // Adafruit Feather STM32F405: 12 MHz HSE, 32.768 kHz LSE (PC14/PC15)
        let mut config = embassy_stm32::Config::default();
        config.rcc.hse = Some(Hse {
            freq: Hertz(12_000_000),
            mode: HseMode::Oscillator,
        });

        // HSE (12 MHz) / PREDIV(6) = 2 MHz (PLL input)
        // 2 MHz * MUL(168) = 336 MHz (VCO)
        // VCO / DIVP(4) = 84 MHz (SYSCLK)
        config.rcc.pll_src = embassy_stm32::rcc::PllSource::HSE;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            prediv: embassy_stm32::rcc::PllPreDiv::DIV6, // 12 MHz / 6 = 2 MHz
            mul: embassy_stm32::rcc::PllMul::MUL168,     // 2 MHz * 168 = 336 MHz (VCO)
            divp: Some(embassy_stm32::rcc::PllPDiv::DIV4), // 336 MHz / 4 = 84 MHz (SYSCLK)
            divq: Some(embassy_stm32::rcc::PllQDiv::DIV7), // 336 MHz / 7 = 48 MHz
            divr: None,
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_P;
        config.rcc.ahb_pre = embassy_stm32::rcc::AHBPrescaler::DIV1; // 84 MHz
        config.rcc.apb1_pre = embassy_stm32::rcc::APBPrescaler::DIV2; // 42 MHz
        config.rcc.apb2_pre = embassy_stm32::rcc::APBPrescaler::DIV1; // 84 MHz

        config.rcc.ls = LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz(32_768),
                mode: LseMode::Oscillator(embassy_stm32::rcc::LseDrive::MediumHigh),
            }),
        };

        let p = embassy_stm32::init(config);
        info!("System initialized with HSE (12MHz) and LSE (32.768kHz)");

        // TIM2 on APB1: timer clock = 2*APB1 when prescaler != 1
        let timer_clock_hz = 84_000_000;
        Mono::start(timer_clock_hz);
        info!("TIM2 monotonic timer initialized at 1 MHz");

        let net_periph = NetworkPeripherals {
            spi: p.SPI2,
            sck: p.PB13,
            mosi: p.PB15,
            miso: p.PB14,
            cs: p.PC6,
            reset: p.PC3,
            int: p.PC2,
            exti: p.EXTI2,
            dma_tx: p.DMA1_CH4,
            dma_rx: p.DMA1_CH3,
        };

        let clock_periph = ClockPeripherals {
            rtc: p.RTC,
            i2c: p.I2C1,
            scl: p.PB6,
            sda: p.PB7,
            flash_pin: p.PC7,
            hour24_pin: p.PA15,
        };

        clock_task::spawn(net_periph, clock_periph).ok();

        (Shared {}, Local {})
    }

    /// Clock task: brings up the hardware, then runs the clock
    ///
    /// The network stack is !Send, so it is created here and its runners are
    /// joined with the clock instead of living in separate tasks.
    #[task(priority = 1)]
    async fn clock_task(
        _cx: clock_task::Context,
        net: NetworkPeripherals,
        periph: ClockPeripherals,
    ) {
        use embassy_net::{Config, StackResources};
        use static_cell::StaticCell;

        info!("Clock task started");

        let rtc = StmRtc::new(Rtc::new(periph.rtc, RtcConfig::default()));
        info!("Internal RTC initialized with LSE (32.768kHz)");

        let display_config = DisplayConfig::default();
        let i2c = I2c::new_blocking(
            periph.i2c,
            periph.scl,
            periph.sda,
            display_config.frequency,
            Default::default(),
        );
        let display = DigiClockUnit::new(i2c, &display_config);

        let switches = ModeSwitches::new(
            Input::new(periph.flash_pin, Pull::Up),
            Input::new(periph.hour24_pin, Pull::Up),
        );

        let mut spi_config = spi::Config::default();
        spi_config.frequency = Hertz(10_000_000); // 10 MHz for W5500

        let spi = Spi::new(
            net.spi,
            net.sck,
            net.mosi,
            net.miso,
            net.dma_tx,
            net.dma_rx,
            spi_config,
        );

        let eth_periph = eth::EthPeripherals {
            spi,
            cs: Output::new(net.cs, Level::High, Speed::VeryHigh),
            reset: Output::new(net.reset, Level::High, Speed::Low),
            int: ExtiInput::new(net.int, net.exti, Pull::Up),
        };

        let net_config = NetworkConfig::default();
        let (device, w5500_runner) = match eth::init_w5500(eth_periph, net_config.mac_addr).await
        {
            Ok(parts) => parts,
            Err(e) => {
                error!("Ethernet bring-up failed: {}", e);
                fatal_stop().await
            }
        };

        static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
        let (stack, mut net_runner) = embassy_net::new(
            device,
            Config::dhcpv4(Default::default()),
            RESOURCES.init(StackResources::new()),
            net_config.seed,
        );
        info!("Network stack initialized with DHCP");

        let mut link = EthLink::new(stack);
        let sntp = SntpClient::new(stack);
        let mut clock = DigiClock::new(ClockConfig::default(), display, sntp, rtc, switches);

        let app_logic = async {
            let mut delay = Delay;
            let err = clock.run(&mut link, &mut delay).await;
            error!("Clock stopped: {}", err);
            fatal_stop().await
        };

        join3(w5500_runner.run(), net_runner.run(), app_logic).await;
    }

    /// RTIC idle task - WFI sleep mode when no tasks active
    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        info!("Idle task started - entering WFI loop");
        loop {
            cortex_m::asm::wfi();
        }
    }
}
