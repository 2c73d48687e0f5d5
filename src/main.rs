use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use echofx::gen::{ToneSource, Waveform};
use echofx::platform::{AudioOutput, CpalOutput};
use echofx::utils::init_logger;
use echofx::{EffectControls, EffectSettings, Engine, EngineConfig, Toggle};

#[derive(Parser)]
#[command(name = "echofx", version, about = "Real-time echo/reverb/chorus post-processor")]
struct Cli {
    /// Log every clipping event (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a test tone through the effect chain on the default device
    Play {
        #[arg(long, default_value_t = 220.0)]
        frequency: f32,
        #[arg(long, value_enum, default_value_t = Shape::Sine)]
        waveform: Shape,
        #[command(flatten)]
        effects: EffectArgs,
    },
    /// Render a 16-bit WAV file through the effect chain
    Bounce {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        effects: EffectArgs,
    },
}

#[derive(clap::Args)]
struct EffectArgs {
    /// Hot keys of stages to start disabled (E, R, C, V, T, S), comma separated
    #[arg(long, value_delimiter = ',')]
    disable: Vec<char>,
    /// Global volume (0.0-1.0)
    #[arg(long)]
    volume: Option<f32>,
    /// Frames per block
    #[arg(long, default_value_t = 1024)]
    block: usize,
}

impl EffectArgs {
    fn config(&self, sample_rate: u32) -> anyhow::Result<EngineConfig> {
        let mut settings = EffectSettings::default();
        for &key in &self.disable {
            let toggle = Toggle::from_key(key)
                .ok_or_else(|| anyhow::anyhow!("Unknown effect key '{}'", key))?;
            settings.set_enabled(toggle, false);
        }
        if let Some(volume) = self.volume {
            settings.set_param(echofx::Param::GlobalVolume, volume);
        }
        Ok(EngineConfig::new(sample_rate)
            .with_block_frames(self.block)
            .with_settings(settings))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Sine,
    Square,
    Saw,
    Triangle,
}

impl From<Shape> for Waveform {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Sine => Waveform::Sine,
            Shape::Square => Waveform::Square,
            Shape::Saw => Waveform::Saw,
            Shape::Triangle => Waveform::Triangle,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    match cli.cmd {
        Command::Play {
            frequency,
            waveform,
            effects,
        } => play(frequency, waveform.into(), &effects),
        Command::Bounce {
            input,
            output,
            effects,
        } => {
            let config = effects.config(echofx::config::DEFAULT_SAMPLE_RATE)?;
            println!("{}\n", config.settings);
            let summary = echofx::bounce::bounce_wav(&input, &output, config)?;
            println!(
                "Done: {} blocks, {} normalized, peak {:.0}",
                summary.blocks, summary.normalized_blocks, summary.peak
            );
            Ok(())
        }
    }
}

#[derive(Debug, PartialEq)]
enum KeyAction {
    Quit,
    ShowSettings,
    Toggled(Toggle, bool),
    Unknown(char),
}

fn key_action(controls: &EffectControls, key: char) -> KeyAction {
    match key {
        'q' | 'Q' => KeyAction::Quit,
        '?' => KeyAction::ShowSettings,
        _ => match controls.handle_key(key) {
            Some((toggle, enabled)) => KeyAction::Toggled(toggle, enabled),
            None => KeyAction::Unknown(key),
        },
    }
}

fn play(frequency: f32, waveform: Waveform, effects: &EffectArgs) -> anyhow::Result<()> {
    let mut output = CpalOutput::new();
    output.initialize(echofx::config::DEFAULT_SAMPLE_RATE)?;

    let engine = Engine::new(effects.config(output.sample_rate())?)?;
    let controls = engine.controls();
    let source = ToneSource::new(output.sample_rate(), frequency, waveform);

    output.create_stream(engine, Box::new(source))?;
    output.start()?;

    println!("{}\n", controls.snapshot());
    println!("Keys: E R C V T S toggle effects, ? shows settings, q quits (press Enter)");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        for key in line.trim().chars() {
            match key_action(&controls, key) {
                KeyAction::Quit => {
                    output.stop()?;
                    println!("Exiting...");
                    return Ok(());
                }
                KeyAction::ShowSettings => println!("{}", controls.snapshot()),
                // Reported by the control surface's own log line
                KeyAction::Toggled(_, _) => {}
                KeyAction::Unknown(key) => println!("Unknown key '{}'", key),
            }
        }
        io::stdout().flush()?;
    }

    output.stop()?;
    Ok(())
}
