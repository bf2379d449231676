mod window;

use std::path::{Path, PathBuf};

use fractal_explorer::config::DEFAULT_CONFIG_PATH;
use fractal_explorer::control::DEFAULT_SOCKET_PATH;
use fractal_explorer::{
    input_command, Command, Controller, Explorer, ExplorerConfig, ExplorerError, FractalVariant,
    MqttClient, Outcome, PixelBuffer,
};
use log::{error, info, warn};
use window::{Display, RenderTarget};

const WINDOW_TITLE: &str = "Fractal Explorer";

/// Command line overrides on top of the config file
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    size: Option<u32>,
    variant: Option<FractalVariant>,
    threads: Option<usize>,
    no_vsync: bool,
    /// Enable the socket remote control even if the config doesn't
    remote: bool,
    /// Render once, save here and exit without opening a window
    output: Option<PathBuf>,
    /// Write the effective config here and exit
    save_config: Option<PathBuf>,
}

fn print_help() {
    println!("Usage: fractal-explorer [OPTIONS]");
    println!();
    println!("Options:");
    println!(
        "  --config PATH, -c PATH   Config file (default: {})",
        DEFAULT_CONFIG_PATH
    );
    println!("  --size N, -s N           Window and render size in pixels");
    println!("  --variant NAME, -v NAME  mandelbrot, tricorn or burning-ship");
    println!("  --threads N, -t N        Render worker threads (default: one per core)");
    println!("  --output PATH, -o PATH   Render once to a PNG and exit (no window)");
    println!(
        "  --remote                 Accept commands on {} (unless the config names a socket)",
        DEFAULT_SOCKET_PATH
    );
    println!("  --save-config PATH       Write the effective config (file + flags) and exit");
    println!("  --no-vsync               Disable VSync");
    println!("  --help                   Show this help message");
}

/// Parse command line arguments
fn parse_args() -> Result<Args, ExplorerError> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let value = |i: usize, flag: &str| -> Result<&String, ExplorerError> {
        args.get(i + 1)
            .ok_or_else(|| ExplorerError::Usage(format!("{} needs a value", flag)))
    };
    let invalid = |flag: &str, v: &str| ExplorerError::Usage(format!("{} {}: invalid value", flag, v));

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--no-vsync" => parsed.no_vsync = true,
            "--remote" => parsed.remote = true,
            "--config" | "-c" => {
                parsed.config = Some(PathBuf::from(value(i, flag)?));
                i += 1;
            },
            "--size" | "-s" => {
                let v = value(i, flag)?;
                parsed.size = Some(v.parse().map_err(|_| invalid(flag, v))?);
                i += 1;
            },
            "--variant" | "-v" => {
                let v = value(i, flag)?;
                parsed.variant = Some(
                    v.parse()
                        .map_err(|e| ExplorerError::Usage(format!("{}", e)))?,
                );
                i += 1;
            },
            "--threads" | "-t" => {
                let v = value(i, flag)?;
                parsed.threads = Some(v.parse().map_err(|_| invalid(flag, v))?);
                i += 1;
            },
            "--output" | "-o" => {
                parsed.output = Some(PathBuf::from(value(i, flag)?));
                i += 1;
            },
            "--save-config" => {
                parsed.save_config = Some(PathBuf::from(value(i, flag)?));
                i += 1;
            },
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            },
            other => {
                return Err(ExplorerError::Usage(format!(
                    "unknown option '{}' (see --help)",
                    other
                )))
            },
        }
        i += 1;
    }

    Ok(parsed)
}

fn load_config(args: &Args) -> Result<ExplorerConfig, ExplorerError> {
    // An explicitly named config must load; the default one is optional
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::load_or_default(DEFAULT_CONFIG_PATH),
    };

    if let Some(size) = args.size {
        config.display_size = size;
    }
    if let Some(variant) = args.variant {
        config.variant = variant;
    }
    if args.threads.is_some() {
        config.render_threads = args.threads;
    }
    if args.no_vsync {
        config.vsync = false;
    }
    if args.remote && config.socket_path.is_none() {
        config.socket_path = Some(PathBuf::from(DEFAULT_SOCKET_PATH));
    }
    config.validate()?;
    Ok(config)
}

/// Render the configured view once and write it to `path`
fn run_headless(config: &ExplorerConfig, path: &Path) -> Result<(), ExplorerError> {
    let mut explorer = Explorer::new(config)?;
    info!("Rendering with {} threads", explorer.render_threads());
    explorer.start_render();
    explorer.wait();
    explorer.export(path)?;
    Ok(())
}

fn run_window(config: &ExplorerConfig) -> Result<(), ExplorerError> {
    let size = config.display_size;
    let mut explorer = Explorer::new(config)?;

    let (mut display, texture_creator) = Display::with_options(WINDOW_TITLE, size, config.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, size)?;
    let blank = PixelBuffer::square(size);

    // Remote control is optional; the viewer runs fine without it
    let controller = config.socket_path.as_ref().and_then(|path| {
        Controller::new(path)
            .map_err(|e| warn!("Remote control disabled: {}", e))
            .ok()
    });
    let mqtt = config.mqtt.as_ref().and_then(|mqtt| {
        MqttClient::new(mqtt)
            .map_err(|e| warn!("MQTT disabled: {}", e))
            .ok()
    });

    println!("=== {} ===", WINDOW_TITLE);
    println!("Size: {}x{}", size, size);
    println!("Render threads: {}", explorer.render_threads());
    println!("Controls:");
    println!("  Left click   - Zoom in around point");
    println!("  Right click  - Zoom out around point");
    println!("  R / Middle   - Reset view");
    println!("  1 / 2 / 3    - Mandelbrot / Tricorn / Burning Ship");
    println!("  Tab          - Next fractal");
    println!("  S            - Save image to {}", config.export_path.display());
    println!("  Escape       - Quit");
    if let Some(controller) = &controller {
        println!("Remote commands: {}", controller.socket_path().display());
    }

    explorer.start_render();
    let mut last_title = String::new();

    'main: loop {
        let mut commands: Vec<Command> = display
            .poll_events()
            .iter()
            .filter_map(|event| input_command(event, size))
            .collect();
        if let Some(controller) = &controller {
            commands.extend(controller.poll());
        }
        if let Some(mqtt) = &mqtt {
            commands.extend(mqtt.poll());
        }

        for command in commands {
            match explorer.handle(command) {
                Outcome::Quit => break 'main,
                Outcome::Exported(path) => println!("Image saved to {}", path.display()),
                Outcome::ExportFailed(e) => eprintln!("Unable to save: {}", e),
                Outcome::Busy | Outcome::Rendering => {},
            }
        }

        explorer.poll();

        let title = format!("{} - {}", WINDOW_TITLE, explorer.status());
        if title != last_title {
            if let Err(e) = display.set_title(&title) {
                warn!("Failed to set window title: {}", e);
            }
            last_title = title;
        }

        let buffer = explorer.frame().map_or(&blank, |frame| &frame.buffer);
        display.present(&mut target, buffer)?;
    }

    info!("Bye");
    Ok(())
}

fn main() -> Result<(), ExplorerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = parse_args().and_then(|args| {
        let config = load_config(&args)?;
        if let Some(path) = &args.save_config {
            config.save(path)?;
            println!("Config saved to {}", path.display());
            return Ok(());
        }
        match &args.output {
            Some(path) => run_headless(&config, path),
            None => run_window(&config),
        }
    });

    result.map_err(|e| {
        error!("{}", e);
        e
    })
}
