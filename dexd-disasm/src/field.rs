use std::io::{self, Write};

use dexd_file::annotation::AnnotationSet;
use dexd_file::class::EncodedField;
use dexd_file::value::EncodedValue;
use dexd_file::{AccessFlags, AccessKind, DexFile};

use crate::annotation::write_annotation_set;
use crate::resolve;
use crate::value::write_value;
use crate::writer::IndentingWriter;

const SET_IN_STATIC_CONSTRUCTOR: &str =
    "#the value of this static final field might be set in the static constructor";

/// Write one `.field` entry.
///
/// `initial_value` is the positionally aligned static initializer, if any.
/// The static-constructor note is only written for a static final field
/// with an initializer when the initializer could be overridden: the field
/// is primitive, or the initializer is not `null`.
pub fn write_field<W: Write>(
    out: &mut IndentingWriter<W>,
    dex: &DexFile,
    field: &EncodedField,
    initial_value: Option<&EncodedValue>,
    annotations: Option<&AnnotationSet>,
    set_in_static_constructor: bool,
) -> io::Result<()> {
    let flags = field.access_flags;
    let field_type = resolve::field_type(dex, field.field_idx);

    if set_in_static_constructor
        && flags.contains(AccessFlags::STATIC | AccessFlags::FINAL)
        && initial_value.is_some_and(|v| field_type.len() == 1 || !v.is_null())
    {
        writeln!(out, "{SET_IN_STATIC_CONSTRUCTOR}")?;
    }

    write!(
        out,
        ".field {}{}:{}",
        flags.prefix(AccessKind::Field),
        resolve::field_name(dex, field.field_idx),
        field_type
    )?;
    if let Some(value) = initial_value {
        out.write_all(b" = ")?;
        write_value(out, dex, value)?;
    }
    out.write_all(b"\n")?;

    if let Some(set) = annotations {
        out.indent(4);
        write_annotation_set(out, dex, set)?;
        out.deindent(4);
        out.write_all(b".end field\n")?;
    }
    Ok(())
}
