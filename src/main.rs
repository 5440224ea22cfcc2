mod ui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokensmith::{GenerationRequest, KeystreamSource, Method, OsRngSource};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

const SEED_LEN: usize = 32;

#[derive(Parser)]
#[command(
    name = "tokensmith",
    version,
    about = "Generate opaque random API keys"
)]
struct Cli {
    /// string, bytes, base32, base62 or uuidv4
    #[arg(short, long, env = "TOKENSMITH_METHOD", default_value = "string")]
    method: String,

    /// Characters (string) or bytes (bytes) per key; defaults to 36
    #[arg(short, long, env = "TOKENSMITH_LENGTH", default_value_t = 0)]
    length: u32,

    /// Characters to sample from (string method only)
    #[arg(short, long, env = "TOKENSMITH_POOL")]
    pool: Option<String>,

    /// Rendered as "<prefix>." in front of every key
    #[arg(short = 'P', long, env = "TOKENSMITH_PREFIX")]
    prefix: Option<String>,

    /// Number of keys; above one the output is a list
    #[arg(short, long, env = "TOKENSMITH_BATCH", default_value_t = 0)]
    batch: u32,

    /// Keep hyphens in UUID-shaped output (base32, uuidv4)
    #[arg(short, long, env = "TOKENSMITH_DASHES")]
    dashes: bool,

    #[arg(short, long, value_enum, env = "TOKENSMITH_FORMAT", default_value = "plain")]
    format: Format,

    /// Print keys only
    #[arg(short, long, env = "TOKENSMITH_QUIET")]
    quiet: bool,

    /// Whole request as JSON, e.g. {"method":"base62","batch":5}
    #[arg(
        short,
        long,
        env = "TOKENSMITH_REQUEST",
        conflicts_with_all = ["method", "length", "pool", "prefix", "batch", "dashes"]
    )]
    request: Option<String>,

    /// 64 hex digits seeding a deterministic index source (string method)
    #[arg(long, env = "TOKENSMITH_SEED", hide_env_values = true)]
    seed: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Format {
    Plain,
    Json,
}

fn setup_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn build_request(cli: &Cli) -> Result<GenerationRequest> {
    if let Some(json) = &cli.request {
        let mut request: GenerationRequest =
            serde_json::from_str(json).context("Invalid request JSON")?;
        request.pool = ui::normalize_pool(&request.pool, ui::MAX_POOL_CHARS)?;
        request.prefix =
            ui::normalize_and_validate(&request.prefix, "Prefix", ui::MAX_PREFIX_CHARS)?;
        return Ok(request);
    }

    let method: Method = cli.method.parse()?;

    let pool = match &cli.pool {
        Some(pool) => ui::normalize_pool(pool, ui::MAX_POOL_CHARS)?,
        None => String::new(),
    };
    let prefix = match &cli.prefix {
        Some(prefix) => ui::normalize_and_validate(prefix, "Prefix", ui::MAX_PREFIX_CHARS)?,
        None => String::new(),
    };

    Ok(GenerationRequest::new(method)
        .with_length(cli.length)
        .with_pool(pool)
        .with_prefix(prefix)
        .with_batch(cli.batch)
        .with_dashes(cli.dashes))
}

fn parse_seed(seed: &str) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    let decoded = Zeroizing::new(hex::decode(seed.trim()).context("Seed must be hexadecimal")?);
    if decoded.len() != SEED_LEN {
        anyhow::bail!(
            "Seed must be {} bytes ({} hex digits), got {} bytes",
            SEED_LEN,
            SEED_LEN * 2,
            decoded.len()
        );
    }

    let mut bytes = Zeroizing::new([0u8; SEED_LEN]);
    bytes.copy_from_slice(&decoded);
    Ok(bytes)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing();

    let request = build_request(&cli)?;
    debug!(
        method = %request.method,
        length = request.length,
        batch = request.batch,
        dashes = request.dashes,
        "generating keys"
    );

    let output = match &cli.seed {
        Some(seed) => {
            let seed = parse_seed(seed)?;
            if request.method != Method::String {
                warn!(method = %request.method, "seed only affects the string method");
            }
            let mut index = KeystreamSource::new(&seed);
            tokensmith::generate_with(&request, &mut index, &mut OsRngSource)
        }
        None => tokensmith::generate(&request),
    }
    .context("Key generation failed")?;

    let entropy = request.entropy_bits();
    if entropy < ui::MIN_SAFE_ENTROPY {
        warn!(entropy, "keys carry less than {} bits of entropy", ui::MIN_SAFE_ENTROPY);
    }
    info!(count = output.len(), method = %request.method, "generated keys");

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
        format: match cli.format {
            Format::Plain => ui::OutputFormat::Plain,
            Format::Json => ui::OutputFormat::Json,
        },
    };

    ui::display_output(&output, &request, &options)
}
