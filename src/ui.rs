use anyhow::{Context, Result};
use console::Style;
use tokensmith::{Generated, GenerationRequest};
use unicode_normalization::UnicodeNormalization;

pub const MIN_SAFE_ENTROPY: f64 = 100.0;
pub const PARANOID_ENTROPY: f64 = 256.0;

pub const MAX_PREFIX_CHARS: usize = 64;
pub const MAX_POOL_CHARS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
    pub format: OutputFormat,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn tree_branches(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    }
}

fn validate_control_characters(s: &str, input_name: &str) -> Result<String> {
    let positions: Vec<String> = s
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos.to_string())
        .collect();

    if !positions.is_empty() {
        anyhow::bail!(
            "{} contains {} control character(s) at position(s): {}",
            input_name,
            positions.len(),
            positions.join(", ")
        );
    }

    Ok(s.to_string())
}

/// Trims, NFC-normalizes and screens user-supplied text.
pub fn normalize_and_validate(s: &str, input_name: &str, max_chars: usize) -> Result<String> {
    normalize_untrimmed(s.trim(), input_name, max_chars)
}

/// NFC-normalizes and screens a character pool. Whitespace is kept; it is
/// sample data.
pub fn normalize_pool(s: &str, max_chars: usize) -> Result<String> {
    normalize_untrimmed(s, "Pool", max_chars)
}

fn normalize_untrimmed(s: &str, input_name: &str, max_chars: usize) -> Result<String> {
    let normalized: String = s.nfc().collect();

    let char_count = normalized.chars().count();
    if char_count > max_chars {
        anyhow::bail!(
            "{} too long ({} chars, maximum is {})",
            input_name,
            char_count,
            max_chars
        );
    }

    validate_control_characters(&normalized, input_name)
}

pub fn display_output(
    output: &Generated,
    request: &GenerationRequest,
    options: &DisplayOptions,
) -> Result<()> {
    match options.format {
        OutputFormat::Json => {
            let json = serde_json::to_string(output).context("Failed to encode keys as JSON")?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            for key in output.keys() {
                println!("{}", key);
            }

            if !options.quiet {
                println!();
                display_stats(output, request, options);
            }
        }
    }

    Ok(())
}

fn display_stats(output: &Generated, request: &GenerationRequest, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_branches(options.unicode_support);
    let entropy = request.entropy_bits();

    let (status_icon, entropy_style, status_text) = if entropy >= PARANOID_ENTROPY {
        (check_ok, styled(options, Style::new().green()), "Paranoid")
    } else if entropy >= MIN_SAFE_ENTROPY {
        (check_ok, styled(options, Style::new().green()), "Strong")
    } else {
        (check_warn, styled(options, Style::new().yellow()), "Weak")
    };

    let key_len = output
        .keys()
        .first()
        .map(|k| symbol_count(k, request))
        .unwrap_or(0);

    println!("Stats:");
    println!("  {} Method     {}", branch, request.method);
    println!(
        "  {} Entropy    {} {} bits ({})",
        branch,
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(format!("{:.1}", entropy)),
        entropy_style.apply_to(status_text)
    );
    println!(
        "  {} Length     {} {}",
        branch,
        key_len,
        if key_len == 1 { "char" } else { "chars" }
    );
    if !request.prefix.is_empty() {
        println!("  {} Prefix     {}", branch, request.rendered_prefix());
    }
    println!("  {} Keys       {}", last, output.len());
}

/// Symbols in a key, not counting the prefix or the hyphens of UUID-style
/// grouping.
pub fn symbol_count(key: &str, request: &GenerationRequest) -> usize {
    let prefix = request.rendered_prefix();
    let body = key.strip_prefix(prefix.as_str()).unwrap_or(key);

    if request.dashes && request.method.uses_dashes() {
        body.chars().filter(|&c| c != '-').count()
    } else {
        body.chars().count()
    }
}

fn styled(options: &DisplayOptions, style: Style) -> Style {
    if options.color_support {
        style
    } else {
        Style::new()
    }
}
