//! Text form of encoded values.

use std::io::{self, Write};

use dexd_file::DexFile;
use dexd_file::annotation::EncodedAnnotation;
use dexd_file::value::EncodedValue;

use crate::escape::{escape_char, escape_string};
use crate::resolve;
use crate::writer::IndentingWriter;

/// `0x1f` / `-0x1f`.
pub(crate) fn hex(value: i64) -> String {
    if value < 0 {
        format!("-0x{:x}", value.unsigned_abs())
    } else {
        format!("0x{value:x}")
    }
}

fn float(value: f64, suffix: &str) -> String {
    if value.is_nan() {
        format!("NaN{suffix}")
    } else if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{sign}Infinity{suffix}")
    } else {
        format!("{value:?}{suffix}")
    }
}

pub fn write_value<W: Write>(
    out: &mut IndentingWriter<W>,
    dex: &DexFile,
    value: &EncodedValue,
) -> io::Result<()> {
    match value {
        EncodedValue::Byte(v) => write!(out, "{}t", hex(*v as i64)),
        EncodedValue::Short(v) => write!(out, "{}s", hex(*v as i64)),
        EncodedValue::Char(v) => write!(out, "'{}'", escape_char(*v)),
        EncodedValue::Int(v) => write!(out, "{}", hex(*v as i64)),
        EncodedValue::Long(v) => write!(out, "{}L", hex(*v)),
        EncodedValue::Float(v) => {
            // Debug of the widened value would print f64 digits.
            let text = if v.is_finite() {
                format!("{v:?}f")
            } else {
                float(*v as f64, "f")
            };
            out.write_all(text.as_bytes())
        }
        EncodedValue::Double(v) => out.write_all(float(*v, "").as_bytes()),
        EncodedValue::MethodType(idx) => out.write_all(resolve::proto(dex, *idx).as_bytes()),
        EncodedValue::MethodHandle(idx) => write!(out, "method-handle@{idx}"),
        EncodedValue::String(idx) => {
            write!(out, "\"{}\"", escape_string(&resolve::string(dex, *idx)))
        }
        EncodedValue::Type(idx) => out.write_all(resolve::type_descriptor(dex, *idx).as_bytes()),
        EncodedValue::Field(idx) => out.write_all(resolve::field(dex, *idx).as_bytes()),
        EncodedValue::Method(idx) => out.write_all(resolve::method(dex, *idx).as_bytes()),
        EncodedValue::Enum(idx) => write!(out, ".enum {}", resolve::field(dex, *idx)),
        EncodedValue::Array(values) => write_array(out, dex, values),
        EncodedValue::Annotation(annotation) => {
            writeln!(
                out,
                ".subannotation {}",
                resolve::type_descriptor(dex, annotation.type_idx)
            )?;
            write_elements(out, dex, annotation)?;
            out.write_all(b".end subannotation")
        }
        EncodedValue::Null => out.write_all(b"null"),
        EncodedValue::Boolean(b) => write!(out, "{b}"),
    }
}

fn write_array<W: Write>(
    out: &mut IndentingWriter<W>,
    dex: &DexFile,
    values: &[EncodedValue],
) -> io::Result<()> {
    if values.is_empty() {
        return out.write_all(b"{}");
    }
    out.write_all(b"{\n")?;
    out.indent(4);
    for (i, value) in values.iter().enumerate() {
        write_value(out, dex, value)?;
        if i + 1 < values.len() {
            out.write_all(b",")?;
        }
        out.write_all(b"\n")?;
    }
    out.deindent(4);
    out.write_all(b"}")
}

/// `name = value` lines of an annotation body, indented by four.
pub(crate) fn write_elements<W: Write>(
    out: &mut IndentingWriter<W>,
    dex: &DexFile,
    annotation: &EncodedAnnotation,
) -> io::Result<()> {
    out.indent(4);
    for element in &annotation.elements {
        write!(out, "{} = ", resolve::string(dex, element.name_idx))?;
        write_value(out, dex, &element.value)?;
        out.write_all(b"\n")?;
    }
    out.deindent(4);
    Ok(())
}
