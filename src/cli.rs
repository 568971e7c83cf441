//! Command line arguments.

use clap::error::ErrorKind;
use clap::Parser;
use subnetcalc::output::RenderOptions;
use subnetcalc::processing::RandomSource;

/// Flags that are traditionally spelled with a single dash.
const SINGLE_DASH_FLAGS: [&str; 5] = [
    "-uniquelocal",
    "-uniquelocalhq",
    "-nocolour",
    "-nocolor",
    "-json",
];

#[derive(Parser, Debug)]
#[command(
    name = "subnetcalc",
    version,
    about = "IPv4/IPv6 subnet calculator",
    long_about = None
)]
pub struct CmdArgs {
    /// Address, optionally followed by /PREFIX or /NETMASK
    pub address: String,

    /// Prefix length or netmask, when not given after a slash
    pub mask: Option<String>,

    /// Do not look up names (accepted for compatibility, nothing is resolved)
    #[arg(short = 'n')]
    pub no_lookup: bool,

    /// Replace the first 48 bits with a random unique-local prefix
    #[arg(long = "uniquelocal", conflicts_with = "unique_local_hq")]
    pub unique_local: bool,

    /// Like --uniquelocal, with random bits from the operating system
    #[arg(long = "uniquelocalhq")]
    pub unique_local_hq: bool,

    /// Disable coloured output
    #[arg(long = "nocolour", visible_alias = "nocolor")]
    pub no_colour: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CmdArgs {
    pub fn parse_from_env() -> Result<CmdArgs, clap::Error> {
        CmdArgs::try_parse_from(normalize_args(std::env::args()))
    }

    pub fn random_source(&self) -> Option<RandomSource> {
        if self.unique_local_hq {
            Some(RandomSource::OsRng)
        } else if self.unique_local {
            Some(RandomSource::ThreadRng)
        } else {
            None
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        self.render_options_with(|key| std::env::var_os(key).is_some())
    }

    fn render_options_with(&self, env_is_set: impl Fn(&str) -> bool) -> RenderOptions {
        let env_no_colour = env_is_set("SUBNETCALC_NOCOLOR") || env_is_set("NO_COLOR");
        RenderOptions {
            color: !(self.no_colour || env_no_colour),
            ..RenderOptions::default()
        }
    }
}

/// Rewrite `-uniquelocal` style flags to `--uniquelocal` so clap accepts them.
pub fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            if SINGLE_DASH_FLAGS.contains(&arg.as_str()) {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}

/// Process exit status for an argument error: 0 for `--help`/`--version`, 1 otherwise.
pub fn exit_code(error: &clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
