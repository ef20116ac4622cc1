use std::io::{self, Write};

use dexd_file::DexFile;
use dexd_file::annotation::AnnotationSet;

use crate::resolve;
use crate::value::write_elements;
use crate::writer::IndentingWriter;

/// Write each annotation of `set` as an `.annotation` block, separated by
/// blank lines.
pub fn write_annotation_set<W: Write>(
    out: &mut IndentingWriter<W>,
    dex: &DexFile,
    set: &AnnotationSet,
) -> io::Result<()> {
    for (i, annotation) in set.annotations.iter().enumerate() {
        if i > 0 {
            out.write_all(b"\n")?;
        }
        writeln!(
            out,
            ".annotation {} {}",
            annotation.visibility,
            resolve::type_descriptor(dex, annotation.annotation.type_idx)
        )?;
        write_elements(out, dex, &annotation.annotation)?;
        out.write_all(b".end annotation\n")?;
    }
    Ok(())
}
