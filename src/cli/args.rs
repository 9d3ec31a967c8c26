use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "promogrid",
    version,
    about = "scroll-driven promotion grid",
    long_about = "Promogrid loads promotion records from a mock generator or the live inventory API, pages them and appends pages as a scripted reader scrolls.\n\nExamples:\n  promogrid --mock --scrolls 10 -o promotions.html\n  promogrid --live --width 375 -v\n  promogrid --config ~/.promogrid/config.yml\n\nTip: Use --init-config to write a commented default config file."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help_heading = "Output",
        help = "Hide loader spinners."
    )]
    pub quiet: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the final page as HTML to this file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.promogrid/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a default config file to the config path and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'm',
        long = "mock",
        conflicts_with = "live",
        help_heading = "Data",
        help = "Use generated mock records."
    )]
    pub mock: bool,

    #[arg(
        short = 'l',
        long = "live",
        help_heading = "Data",
        help = "Fetch records from the inventory API."
    )]
    pub live: bool,

    #[arg(
        short = 'n',
        long = "count",
        value_name = "N",
        help_heading = "Data",
        help = "Number of mock records to generate."
    )]
    pub count: Option<usize>,

    #[arg(
        long = "seed",
        value_name = "SEED",
        help_heading = "Data",
        help = "Seed the mock date generator for reproducible runs."
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'e',
        long = "endpoint",
        value_name = "URL",
        help_heading = "Data",
        help = "Inventory API endpoint."
    )]
    pub endpoint: Option<String>,

    #[arg(
        short = 'x',
        long = "proxy",
        value_name = "URL",
        help_heading = "Data",
        help = "HTTP proxy for the inventory API."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'W',
        long = "width",
        value_name = "PX",
        help_heading = "Layout",
        help = "Viewport width in logical pixels."
    )]
    pub width: Option<f64>,

    #[arg(
        short = 'H',
        long = "height",
        value_name = "PX",
        help_heading = "Layout",
        help = "Viewport height in logical pixels."
    )]
    pub height: Option<f64>,

    #[arg(
        short = 'p',
        long = "page-size",
        value_name = "N",
        help_heading = "Layout",
        help = "Records per page."
    )]
    pub page_size: Option<usize>,

    #[arg(
        short = 's',
        long = "scrolls",
        value_name = "N",
        help_heading = "Session",
        help = "Number of scroll-to-bottom events the scripted reader sends."
    )]
    pub scrolls: Option<usize>,

    #[arg(
        long = "si",
        visible_alias = "scroll-interval",
        value_name = "MS",
        help_heading = "Session",
        help = "Pause between scripted scroll events in milliseconds."
    )]
    pub scroll_interval: Option<u64>,

    #[arg(
        short = 'd',
        long = "delay",
        value_name = "MS",
        help_heading = "Session",
        help = "Artificial delay before each incremental page in milliseconds."
    )]
    pub delay: Option<u64>,

    #[arg(
        long = "threshold",
        value_name = "PX",
        help_heading = "Session",
        help = "Distance from the document bottom that triggers a load."
    )]
    pub threshold: Option<f64>,
}
