use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::controller::{ControllerOptions, PageController};
use crate::pager::DEFAULT_PAGE_SIZE;
use crate::scroll::{self, DEFAULT_SCROLL_THRESHOLD};
use crate::source::live::{self, LiveOptions, LiveSource};
use crate::source::mock::{MockSource, DEFAULT_MOCK_COUNT};
use crate::source::Source;
use crate::surface::{
    ConsoleDocument, MemoryDocument, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
};

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    verbose: u8,
    quiet: bool,
    no_color: bool,
    mock: bool,
    mock_count: usize,
    seed: Option<u64>,
    live: LiveOptions,
    viewport_width: f64,
    viewport_height: f64,
    controller: ControllerOptions,
    scrolls: usize,
    scroll_interval: Duration,
    output: Option<String>,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let mock = if args.live {
        false
    } else if args.mock {
        true
    } else {
        cfg.mock.unwrap_or(true)
    };

    let mock_count = args.count.or(cfg.mock_count).unwrap_or(DEFAULT_MOCK_COUNT);
    let seed = args.seed.or(cfg.seed);

    let live = LiveOptions {
        endpoint: args
            .endpoint
            .or(cfg.endpoint)
            .unwrap_or_else(|| live::DEFAULT_ENDPOINT.to_string()),
        mobile_code: cfg
            .mobile_code
            .unwrap_or_else(|| live::MOBILE_UNIQ_CODE.to_string()),
        desktop_code: cfg
            .desktop_code
            .unwrap_or_else(|| live::DESKTOP_UNIQ_CODE.to_string()),
        breakpoint: cfg.breakpoint.unwrap_or(live::MOBILE_BREAKPOINT),
        proxy: args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty()),
    };
    reqwest::Url::parse(&live.endpoint)
        .map_err(|e| format!("invalid endpoint '{}': {e}", live.endpoint))?;

    let page_size = args.page_size.or(cfg.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err("invalid page_size, expected positive integer".to_string());
    }
    let load_delay_ms = args.delay.or(cfg.load_delay_ms).unwrap_or(500);
    let scroll_threshold = args
        .threshold
        .or(cfg.scroll_threshold)
        .unwrap_or(DEFAULT_SCROLL_THRESHOLD);

    let viewport_width = args
        .width
        .or(cfg.viewport_width)
        .unwrap_or(DEFAULT_VIEWPORT_WIDTH);
    let viewport_height = args
        .height
        .or(cfg.viewport_height)
        .unwrap_or(DEFAULT_VIEWPORT_HEIGHT);

    // config-file values bypass the CLI checks
    validation::positive("viewport_width", viewport_width)?;
    validation::positive("viewport_height", viewport_height)?;
    validation::non_negative("scroll_threshold", scroll_threshold)?;
    validation::positive("breakpoint", live.breakpoint)?;

    let scrolls = args.scrolls.or(cfg.scrolls).unwrap_or(10);
    let scroll_interval_ms = args
        .scroll_interval
        .or(cfg.scroll_interval_ms)
        .unwrap_or(200);

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));

    Ok(RunConfig {
        verbose: args.verbose,
        quiet: args.quiet,
        no_color,
        mock,
        mock_count,
        seed,
        live,
        viewport_width,
        viewport_height,
        controller: ControllerOptions {
            page_size,
            load_delay: Duration::from_millis(load_delay_ms),
            scroll_threshold,
        },
        scrolls,
        scroll_interval: Duration::from_millis(scroll_interval_ms),
        output,
    })
}

fn build_source(run: &RunConfig) -> Result<Source, String> {
    if run.mock {
        return Ok(Source::Mock(MockSource::new(run.mock_count, run.seed)));
    }
    LiveSource::new(run.live.clone())
        .map(Source::Live)
        .map_err(|e| e.to_string())
}

fn print_settings(run: &RunConfig, source: &Source) {
    println!();
    format_kv_line("Source", source.label());
    if run.mock {
        format_kv_line("Records", &run.mock_count.to_string());
        if let Some(seed) = run.seed {
            format_kv_line("Seed", &seed.to_string());
        }
    } else {
        format_kv_line("Endpoint", &run.live.endpoint);
        if let Some(proxy) = run.live.proxy.as_deref() {
            format_kv_line("Proxy", proxy);
        }
    }
    format_kv_line(
        "Viewport",
        &format!("{}x{}", run.viewport_width, run.viewport_height),
    );
    format_kv_line("Page size", &run.controller.page_size.to_string());
    format_kv_line(
        "Delay",
        &format!("{}ms", run.controller.load_delay.as_millis()),
    );
    format_kv_line("Scrolls", &run.scrolls.to_string());
    format_kv_line("Spinners", format_bool(!run.quiet));
    if let Some(output) = run.output.as_deref() {
        format_kv_line("Output", output);
    }
    println!();
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let now = Instant::now();
    let source = build_source(&run)?;
    print_settings(&run, &source);

    let surface = ConsoleDocument::new(
        MemoryDocument::new(run.viewport_width, run.viewport_height),
        !run.quiet,
    );
    let mut controller =
        PageController::new(source, surface, run.controller).map_err(|e| e.to_string())?;

    let loaded = controller.initial_load().await;

    let (tx, rx) = mpsc::channel(16);
    let reader = scroll::drive(tx, scroll::reader_script(run.scrolls), run.scroll_interval);
    let (sent, ()) = tokio::join!(reader, controller.run(rx));

    let state = controller.state();
    let current_page = controller.current_page();
    let pages_requested = controller.pages_requested();
    let records = controller.record_count();
    let document = controller.into_surface().into_document();

    if let Some(path) = run.output.as_deref() {
        tokio::fs::write(path, document.to_html())
            .await
            .map_err(|e| format!("failed to write output '{path}': {e}"))?;
        tracing::info!(path, "page written");
    }

    println!();
    format_kv_line("Records", &records.to_string());
    format_kv_line("Cards", &document.card_count().to_string());
    format_kv_line("Scrolled", &sent.to_string());
    format_kv_line("Requests", &pages_requested.to_string());
    format_kv_line("Next page", &current_page.to_string());
    format_kv_line("State", &format!("{state:?}"));

    println!();
    let elapsed_time = now.elapsed();
    match loaded {
        Ok(_) => {
            println!(
                ":: Completed :: session took {}ms ::",
                elapsed_time.as_millis()
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", document.error_text().red().bold());
            Err(format!("initial load failed: {e}"))
        }
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let config_path = match args.config.as_deref() {
        Some(p) => Some(config::expand_tilde(p)),
        None => config::default_config_path(),
    };

    if args.init_config {
        let path = config_path.ok_or_else(|| "could not determine config path".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!("config written to {}", path.display());
        return Ok(());
    }

    // an explicit --config must exist, the default location may not
    let cfg = match config_path.as_ref() {
        Some(path) => config::load_config(path, args.config.is_none())?,
        None => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;
    crate::logging::init(run.verbose, run.no_color);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
