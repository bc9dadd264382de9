use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::path::PathBuf;
use tagport_files::common::types::CacheVersion;
use tagport_files::converter::settings::{ConversionSettings, UnsupportedFormatPolicy};
use tagport_files::vertex::types::VertexBufferFormat;

#[derive(Parser, Debug)]
#[command(name = "tagport")]
#[command(version)]
#[command(about = "Converts Halo 3 render geometry into the Halo Online layout")]
pub struct CliArgs {
    #[arg(long, env = "TAGPORT_SOURCE_VERSION", default_value_t = CacheVersion::Halo3Retail)]
    pub source_version: CacheVersion,

    #[arg(long, env = "TAGPORT_TARGET_VERSION", default_value_t = CacheVersion::HaloOnline106708)]
    pub target_version: CacheVersion,

    #[arg(long, help = "Fail on vertex formats without a conversion instead of passing them through")]
    pub strict: bool,

    #[command(subcommand)]
    pub operation_mode: OperationMode,
}

impl CliArgs {
    pub fn conversion_settings(&self) -> ConversionSettings {
        let policy = if self.strict {
            UnsupportedFormatPolicy::Reject
        } else {
            UnsupportedFormatPolicy::PassThrough
        };

        ConversionSettings::new(self.source_version, self.target_version).with_unsupported_formats(policy)
    }
}

#[derive(Subcommand, Debug)]
pub enum OperationMode {
    /// Rewrites a raw block of words from the source into the target byte order.
    RewriteBlock {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 4)]
        word_size: usize,
    },
    /// Prints the element size of a vertex buffer format in both versions.
    ElementSize {
        #[arg(value_parser = parse_vertex_format)]
        format: VertexBufferFormat,
    },
}

// by name ("World") or by id ("1", "0x19")
fn parse_vertex_format(input: &str) -> Result<VertexBufferFormat, String> {
    let raw = match input.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => input.parse::<u16>().ok(),
    };

    if let Some(raw) = raw {
        return VertexBufferFormat::try_from(raw).map_err(|_| format!("No vertex buffer format with id {:#x}", raw));
    }

    VertexBufferFormat::from_name(input).ok_or_else(|| {
        let known = (0u16..=0x1E)
            .filter_map(|raw| VertexBufferFormat::try_from(raw).ok())
            .map(|format| format!("{:?}", format))
            .join(", ");
        format!("Unknown vertex buffer format {}, expected one of: {}", input, known)
    })
}
