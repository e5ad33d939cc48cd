use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use minifb::Scale;
use rand::Rng;

use audio::Audio;
use clock::FrameClock;
use demos::Demo;
use joystick::Joystick;
use sid::Sid;
use vic::{Display, Screen};

mod audio;
mod charset;
mod clock;
mod demos;
mod joystick;
mod sid;
mod vic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DemoName {
    Breakout,
    Snake,
    Tetris,
    Fire,
    Starfield,
    Rasterbars,
    Holiday,
    Plasma,
    Scroller,
}

impl DemoName {
    fn title(&self) -> &'static str {
        match self {
            DemoName::Breakout => "breakout",
            DemoName::Snake => "snake",
            DemoName::Tetris => "tetris",
            DemoName::Fire => "fire",
            DemoName::Starfield => "starfield",
            DemoName::Rasterbars => "raster bars",
            DemoName::Holiday => "holiday",
            DemoName::Plasma => "plasma",
            DemoName::Scroller => "scroller",
        }
    }

    fn build(&self, seed: u64) -> Box<dyn Demo> {
        match self {
            DemoName::Breakout => Box::new(demos::breakout::Breakout::new(seed)),
            DemoName::Snake => Box::new(demos::snake::Snake::new(seed)),
            DemoName::Tetris => Box::new(demos::tetris::Tetris::new(seed)),
            DemoName::Fire => Box::new(demos::fire::Fire::new(seed)),
            DemoName::Starfield => Box::new(demos::starfield::Starfield::new(seed)),
            DemoName::Rasterbars => Box::new(demos::rasterbars::RasterBars::new()),
            DemoName::Holiday => Box::new(demos::holiday::Holiday::new(seed)),
            DemoName::Plasma => Box::new(demos::plasma::Plasma::new()),
            DemoName::Scroller => Box::new(demos::scroller::Scroller::new()),
        }
    }
}

/// Single-screen demos and games on a small C64-style machine model.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Which demo to run
    #[arg(value_enum)]
    demo: DemoName,

    /// Seed for demos that use randomness; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Window scale factor (1, 2 or 4)
    #[arg(long, default_value_t = 2)]
    scale: u8,

    /// Run without sound
    #[arg(long)]
    mute: bool,
}

fn window_scale(scale: u8) -> Scale {
    match scale {
        1 => Scale::X1,
        4 => Scale::X4,
        _ => Scale::X2,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("running {} with seed {}", args.demo.title(), seed);

    let mut display = Display::new(
        &format!("demo64 - {} - ESC to exit", args.demo.title()),
        window_scale(args.scale),
    )
    .context("opening display window")?;

    let sid = Arc::new(Mutex::new(Sid::new()));
    let _audio = if args.mute {
        None
    } else {
        match Audio::start(Arc::clone(&sid)) {
            Ok(audio) => Some(audio),
            Err(err) => {
                warn!("no audio: {err}");
                None
            }
        }
    };

    let mut demo = args.demo.build(seed);
    let mut screen = Screen::new();
    let mut clock = FrameClock::new();

    while display.is_open() {
        let input = Joystick::read(display.window());
        {
            let mut sid = sid.lock().unwrap_or_else(|p| p.into_inner());
            demo.tick(input, &mut screen, &mut sid);
        }
        display.present(&screen).context("presenting frame")?;
        clock.tick();
    }

    if let Ok(mut sid) = sid.lock() {
        sid.silence();
    }
    info!("exited after {} frames", clock.frame());
    Ok(())
}
