use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};

use zsmpack::{PackConfig, ZsmDocument, compress_document};

/// Read a ZSM file into a byte vector; `-` reads from stdin.
pub(crate) fn read_zsm_as_vec(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Produce a stable set of key/value summary fields for a `ZsmDocument`.
fn summarize_doc(doc: &ZsmDocument) -> Vec<(String, String)> {
    let header = &doc.header;

    let pause_lines = doc.iter().filter(|l| l.ends_on_pause()).count();
    let longest = doc.iter().map(|l| l.len()).max().unwrap_or(0);

    vec![
        ("version".into(), format!("{}", header.version)),
        (
            "loop_offset".into(),
            format!("0x{:06X}", header.loop_offset),
        ),
        (
            "pcm_offset".into(),
            if header.has_pcm() {
                format!("0x{:06X}", header.pcm_offset)
            } else {
                "(none)".into()
            },
        ),
        (
            "fm_channel_mask".into(),
            format!("0b{:08b}", header.fm_channel_mask),
        ),
        (
            "psg_channel_mask".into(),
            format!("0b{:016b}", header.psg_channel_mask),
        ),
        ("tick_rate".into(), format!("{} Hz", header.tick_rate)),
        ("lines".into(), format!("{}", doc.lines.len())),
        ("pause_terminated".into(), format!("{}", pause_lines)),
        (
            "payload_bytes".into(),
            format!("{}", doc.total_payload_bytes()),
        ),
        ("longest_line".into(), format!("{} bytes", longest)),
    ]
}

/// Print a summary table for a ZSM file.
pub(crate) fn info(path: &Path, bytes: &[u8]) -> Result<()> {
    let doc = ZsmDocument::try_from(bytes)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Field"), Cell::new("Value")]);
    for (k, v) in summarize_doc(&doc) {
        table.add_row(vec![Cell::new(k), Cell::new(v)]);
    }
    println!("{}", table);

    Ok(())
}

/// Compress a ZSM file and write the dictionary to `output`.
///
/// The dictionary is fully computed in memory, written to a temporary
/// sibling path and renamed into place, so a failed run never leaves a
/// partial output file behind.
pub(crate) fn pack(path: &Path, bytes: &[u8], output: &Path, config: &PackConfig) -> Result<()> {
    let doc = ZsmDocument::parse_with(bytes, &config.parse_options())
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let dict = compress_document(&doc, config)
        .with_context(|| format!("failed to pack {}", path.display()))?;

    let tmp = output.with_extension("tmp");
    fs::write(&tmp, dict.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, output)
        .with_context(|| format!("failed to rename {} to {}", tmp.display(), output.display()))?;

    let saved = doc
        .total_payload_bytes()
        .saturating_sub(dict.unique_payload_bytes);
    println!(
        "{}: {} lines, {} unique, {} -> {} payload bytes ({} saved), output {} bytes",
        output.display(),
        dict.line_count,
        dict.unique_count,
        doc.total_payload_bytes(),
        dict.unique_payload_bytes,
        saved,
        dict.as_bytes().len()
    );

    Ok(())
}
