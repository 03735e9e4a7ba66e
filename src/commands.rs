//! Command execution.

use crate::config::{Config, BROADCAST_NODE};
use crate::{Addressing, Commands, EncodeFrame, Identity};
use colored::Colorize;
use flnet_protocol::{
    parse, ControlFlags, Cyclic, Frame, Header, ParticipationHeader, Token, TransactionCode,
    WireFormat,
};
use std::path::Path;

type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Executes a command and returns the formatted output.
pub fn execute(cmd: Commands, config: &Config) -> CommandResult<String> {
    match cmd {
        Commands::Decode { hex, file, json } => {
            let bytes = read_input(hex.as_deref(), file.as_deref())?;
            let frame = parse(&bytes)?;
            tracing::debug!(kind = %frame.kind(), len = bytes.len(), "decoded frame");

            if json {
                Ok(serde_json::to_string_pretty(&frame)?)
            } else {
                Ok(format_frame(&frame, bytes.len()))
            }
        }

        Commands::Encode { frame, out } => {
            let frame = build_frame(frame, config)?;
            let bytes = frame.encode()?;
            tracing::debug!(kind = %frame.kind(), len = bytes.len(), "encoded frame");

            match out {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    Ok(format!(
                        "{} {} frame ({} bytes) to {}",
                        "Wrote".green(),
                        frame.kind(),
                        bytes.len(),
                        path.display()
                    ))
                }
                None => Ok(hex::encode(&bytes)),
            }
        }

        Commands::Codes => Ok(format_codes()),
    }
}

/// Builds the requested frame, filling unset options from `config`.
pub fn build_frame(spec: EncodeFrame, config: &Config) -> CommandResult<Frame> {
    let frame = match spec {
        EncodeFrame::Token {
            addr,
            token_holder,
            participating,
        } => {
            let (src, dst) = resolve_nodes(&addr, config)?;
            Frame::Token(
                Token::new(src, dst).with_control(ControlFlags::new(token_holder, participating)),
            )
        }

        EncodeFrame::Trigger { addr, identity } => {
            let (src, dst) = resolve_nodes(&addr, config)?;
            let (node, vendor, manufacturer) = resolve_identity(&identity, config);
            Frame::Trigger(ParticipationHeader::trigger(
                src,
                dst,
                node,
                vendor,
                manufacturer,
            ))
        }

        EncodeFrame::ParticipationRequest { addr, identity } => {
            let (src, dst) = resolve_nodes(&addr, config)?;
            let (node, vendor, manufacturer) = resolve_identity(&identity, config);
            Frame::ParticipationRequest(ParticipationHeader::participation_request(
                src,
                dst,
                node,
                vendor,
                manufacturer,
            ))
        }

        EncodeFrame::Cyclic {
            addr,
            data,
            common_areas,
        } => {
            let (src, dst) = resolve_nodes(&addr, config)?;
            let mut cyclic = Cyclic::new(src, dst, decode_hex(&data)?)?;
            if let Some(areas) = common_areas {
                match areas.as_slice() {
                    &[address1, size1, address2, size2] => {
                        cyclic = cyclic.with_common_areas(address1, size1, address2, size2);
                    }
                    _ => return Err("--common-areas takes exactly 4 values".into()),
                }
            }
            Frame::Cyclic(cyclic)
        }
    };

    Ok(frame)
}

/// Command-line nodes win over config. A broadcast source is refused.
fn resolve_nodes(addr: &Addressing, config: &Config) -> CommandResult<(u8, u8)> {
    let src = addr.src.unwrap_or(config.node.source_node);
    if src == BROADCAST_NODE {
        return Err(format!(
            "source node cannot be the broadcast node ({})",
            BROADCAST_NODE
        )
        .into());
    }
    Ok((src, addr.dst.unwrap_or(config.node.destination_node)))
}

fn resolve_identity<'a>(identity: &'a Identity, config: &'a Config) -> (&'a str, &'a str, &'a str) {
    (
        identity
            .node_name
            .as_deref()
            .unwrap_or(&config.identity.node_name),
        identity
            .vendor_name
            .as_deref()
            .unwrap_or(&config.identity.vendor_name),
        identity
            .manufacturer_name
            .as_deref()
            .unwrap_or(&config.identity.manufacturer_name),
    )
}

fn read_input(hex: Option<&str>, file: Option<&Path>) -> CommandResult<Vec<u8>> {
    match (hex, file) {
        (_, Some(path)) => Ok(std::fs::read(path)?),
        (Some(hex), None) => decode_hex(hex),
        (None, None) => Err("provide frame bytes as HEX or --file <PATH>".into()),
    }
}

/// Decodes hex, ignoring whitespace and an optional `0x` prefix.
fn decode_hex(input: &str) -> CommandResult<Vec<u8>> {
    let cleaned: String = input.split_whitespace().collect();
    let cleaned = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    Ok(hex::decode(cleaned)?)
}

fn format_frame(frame: &Frame, wire_len: usize) -> String {
    let header = frame.header();
    let code = match header.transaction_code() {
        Some(code) => code.to_string(),
        None => "?".to_string(),
    };

    let mut out = format!(
        "{}\n",
        format!("{} frame ({} bytes)", frame.kind(), wire_len).bold()
    );
    out.push_str(&format_header(header, &code));

    match frame {
        Frame::Token(_) => {}
        Frame::Trigger(p) | Frame::ParticipationRequest(p) => {
            out.push_str(&field("node name", p.node_name().cyan()));
            out.push_str(&field("vendor name", p.vendor_name().cyan()));
            out.push_str(&field("manufacturer", p.manufacturer_name().cyan()));
        }
        Frame::Cyclic(c) => {
            out.push_str(&field("data", format!("{} bytes", c.data.len())));
            if c.has_length_mismatch() {
                out.push_str(&field(
                    "warning",
                    format!(
                        "payload length differs from byte size {}",
                        header.frame_byte_size
                    )
                    .yellow(),
                ));
            }
            if !c.data.is_empty() {
                out.push_str(&field("", hex::encode(&c.data).dimmed()));
            }
        }
    }

    out.trim_end().to_string()
}

fn format_header(header: &Header, code: &str) -> String {
    let mut out = String::new();
    out.push_str(&field(
        "type code",
        format!("{} ({})", header.type_code, code.yellow()),
    ));
    out.push_str(&field(
        "source",
        format!(
            "node {} ({:#010x})",
            header.source_node(),
            header.source_address
        ),
    ));
    out.push_str(&field(
        "destination",
        format!(
            "node {} ({:#010x})",
            header.destination_node(),
            header.destination_address
        ),
    ));
    out.push_str(&field(
        "length",
        format!(
            "total {} / byte size {}",
            header.total_frame_length, header.frame_byte_size
        ),
    ));
    out.push_str(&field(
        "sequence",
        format!("{} / {}", header.version_sequence, header.sequence),
    ));
    out.push_str(&field(
        "control",
        format!(
            "token_holder={} participating={}",
            header.control.token_holder, header.control.participating
        ),
    ));
    out.push_str(&field(
        "mode",
        format!(
            "v{}.{} token_mode={}",
            header.mode.major_version, header.mode.minor_version, header.mode.token_mode
        ),
    ));
    out.push_str(&field(
        "common areas",
        format!(
            "{}+{}, {}+{}",
            header.common_address1,
            header.common_size1,
            header.common_address2,
            header.common_size2
        ),
    ));
    out.push_str(&field(
        "block",
        format!(
            "{}/{}",
            header.current_block_number, header.total_block_number
        ),
    ));
    out
}

fn field(name: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<14}{}\n", name, value)
}

fn format_codes() -> String {
    TransactionCode::ALL
        .iter()
        .map(|code| {
            let status = if code.is_dispatchable() {
                "decodable".green()
            } else {
                "not implemented".dimmed()
            };
            format!("{:>5}  {:#06x}  {:<32} {}", code.code(), code.code(), code.name(), status)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
