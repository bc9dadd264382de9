use crate::settings::{CliArgs, OperationMode};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tagport_files::common::endian::rewrite_words;
use tagport_files::converter::settings::ConversionSettings;
use tagport_files::vertex::codec::{StandardVertexCodec, VertexStreamCodec};
use tagport_files::vertex::types::VertexBufferFormat;

mod settings;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    let settings = args.conversion_settings();
    match &args.operation_mode {
        OperationMode::RewriteBlock {
            input,
            output,
            word_size,
        } => rewrite_block(&settings, input, output, *word_size),
        OperationMode::ElementSize { format } => {
            print_element_size(&settings, *format);
            Ok(())
        }
    }
}

fn rewrite_block(settings: &ConversionSettings, input: &Path, output: &Path, word_size: usize) -> Result<(), anyhow::Error> {
    let data = std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let rewritten = rewrite_words(
        &data,
        settings.source_version.endianness(),
        settings.target_version.endianness(),
        word_size,
    )
    .with_context(|| format!("Failed to rewrite {}", input.display()))?;

    std::fs::write(output, &rewritten).with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!(
        "Rewrote {} bytes in {} byte words from {} to {}",
        rewritten.len(),
        word_size,
        settings.source_version,
        settings.target_version
    );
    Ok(())
}

fn print_element_size(settings: &ConversionSettings, format: VertexBufferFormat) {
    let codec = StandardVertexCodec;
    for version in [settings.source_version, settings.target_version] {
        match codec.element_size(version, format) {
            Some(size) => println!("{:?} in {}: {:#x} bytes", format, version, size),
            None => println!("{:?} in {}: not stored", format, version),
        }
    }
}
