// crates/factory-client/src/main.rs

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{io, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use factory_protocol::{InboundEvent, OutboundMessage};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use factory_client::app::{App, InputMode};
use factory_client::{ui, AppController, ClientConfig, ConnectionManager, TransportDriver, TransportMode};

#[derive(Parser)]
#[clap(name = "factory-client")]
#[clap(about = "Live terminal view of the factory collection")]
struct Cli {
    /// TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// WebSocket endpoint
    #[clap(long)]
    ws_url: Option<String>,

    /// host:port of the framed TCP endpoint
    #[clap(long)]
    tcp_addr: Option<String>,

    /// Preferred transport: websocket or tcp
    #[clap(short, long, value_parser = parse_transport)]
    transport: Option<TransportMode>,

    /// Enable debug logging (to the log file, never the terminal)
    #[clap(short, long)]
    debug: bool,
}

fn parse_transport(s: &str) -> Result<TransportMode, String> {
    TransportMode::parse(s).ok_or_else(|| format!("unknown transport `{}`", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = cli.ws_url {
        config.ws_url = url;
    }
    if let Some(addr) = cli.tcp_addr {
        config.tcp_addr = addr;
    }
    if let Some(mode) = cli.transport {
        config.preferred_transport = mode;
    }

    // Setup logging
    if cli.debug || config.log_file.is_some() {
        let path = config
            .log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("factory-client.log"));
        let file = File::create(&path).with_context(|| format!("cannot create log file {}", path.display()))?;
        let filter = if cli.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, config: ClientConfig) -> Result<()> {
    // Channels between the UI loop and the transport task
    let (tx_to_network, rx_from_app) = mpsc::unbounded_channel::<OutboundMessage>();
    let (tx_to_app, mut rx_from_network) = mpsc::unbounded_channel::<InboundEvent>();

    let (connection, preference_rx) = ConnectionManager::new(config.preferred_transport, tx_to_network);
    let mut app = App::new(AppController::new(connection));

    info!(ws = %config.ws_url, tcp = %config.tcp_addr, "starting");
    let driver = TransportDriver::new(config, preference_rx, tx_to_app);
    let network_handle = tokio::spawn(driver.run(rx_from_app));
    app.controller.start();

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if app.show_help {
                    if matches!(key.code, KeyCode::F(1) | KeyCode::Esc | KeyCode::Char('?')) {
                        app.toggle_help();
                    }
                    continue;
                }

                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => {
                            app.should_quit = true;
                        }
                        KeyCode::Char('n') | KeyCode::Char('N') => {
                            app.new_unit();
                        }
                        KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                            app.edit_selected();
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => {
                            app.delete_selected();
                        }
                        KeyCode::Char('x') | KeyCode::Char('X') => {
                            app.dismiss_error();
                        }

                        // Navigation
                        KeyCode::Up | KeyCode::Char('k') => {
                            app.move_selection_up();
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            app.move_selection_down();
                        }

                        KeyCode::F(1) | KeyCode::Char('?') => {
                            app.toggle_help();
                        }

                        _ => {}
                    },

                    InputMode::Editing => match key.code {
                        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.delete_unit();
                        }
                        KeyCode::Enter => {
                            app.submit();
                        }
                        KeyCode::Esc => {
                            app.cancel_input();
                        }
                        KeyCode::Tab => {
                            app.next_field();
                        }
                        KeyCode::BackTab => {
                            app.prev_field();
                        }
                        KeyCode::Up => {
                            app.step(1);
                        }
                        KeyCode::Down => {
                            app.step(-1);
                        }
                        KeyCode::Backspace => {
                            app.delete_char();
                        }
                        KeyCode::Char(c) => {
                            app.enter_char(c);
                        }
                        _ => {}
                    },
                }
            }
        }

        while let Ok(event) = rx_from_network.try_recv() {
            app.handle_inbound(event);
        }

        if app.should_quit {
            break;
        }
    }

    network_handle.abort();
    Ok(())
}
