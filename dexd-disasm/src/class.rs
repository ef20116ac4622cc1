//! Whole-class disassembly.

use std::io::{self, Write};

use dexd_file::class::{ClassDef, EncodedField, EncodedMethod};
use dexd_file::{AccessKind, DexFile};

use crate::annotation::write_annotation_set;
use crate::clinit::StaticConstructorFields;
use crate::diagnostic::{Diagnostic, DiagnosticSink, LogSink};
use crate::escape::escape_string;
use crate::field::write_field;
use crate::method::{MethodDefinition, MethodOutcome};
use crate::options::DisassemblyOptions;
use crate::resolve;
use crate::tables::AnnotationTables;
use crate::writer::IndentingWriter;

/// Disassembler for one class definition.
///
/// Annotation tables and the static-constructor field set are computed on
/// construction. Output is produced by [`write_to`](Self::write_to), which
/// keeps going past methods that fail validation; whether any did is
/// remembered in [`had_validation_errors`](Self::had_validation_errors).
#[derive(Debug)]
pub struct ClassDefinition<'a> {
    dex: &'a DexFile,
    class: &'a ClassDef,
    tables: AnnotationTables<'a>,
    clinit_fields: StaticConstructorFields,
    options: DisassemblyOptions,
    validation_errors: bool,
}

impl<'a> ClassDefinition<'a> {
    pub fn new(dex: &'a DexFile, class: &'a ClassDef) -> Self {
        Self::with_options(dex, class, DisassemblyOptions::default())
    }

    pub fn with_options(dex: &'a DexFile, class: &'a ClassDef, options: DisassemblyOptions) -> Self {
        Self {
            dex,
            class,
            tables: AnnotationTables::build(class.annotations.as_ref()),
            clinit_fields: StaticConstructorFields::scan(dex, class.class_data.as_ref()),
            options,
            validation_errors: false,
        }
    }

    pub fn annotation_tables(&self) -> &AnnotationTables<'a> {
        &self.tables
    }

    pub fn static_constructor_fields(&self) -> &StaticConstructorFields {
        &self.clinit_fields
    }

    /// True once any method of this class failed validation. Never reset.
    pub fn had_validation_errors(&self) -> bool {
        self.validation_errors
    }

    /// Write the class, logging method failures.
    pub fn write_to<W: Write>(&mut self, out: W) -> io::Result<()> {
        self.write_to_with(out, &mut LogSink)
    }

    /// Disassemble into a string.
    pub fn to_text(&mut self) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the class, handing every method failure to `sink`.
    pub fn write_to_with<W: Write>(
        &mut self,
        out: W,
        sink: &mut dyn DiagnosticSink,
    ) -> io::Result<()> {
        let dex = self.dex;
        let class = self.class;
        let mut out = IndentingWriter::new(out);

        writeln!(
            out,
            ".class {}{}",
            class.access_flags.prefix(AccessKind::Class),
            resolve::type_descriptor(dex, class.class_idx)
        )?;
        if let Some(superclass) = class.superclass_idx {
            writeln!(out, ".super {}", resolve::type_descriptor(dex, superclass))?;
        }
        if let Some(source) = class.source_file_idx {
            writeln!(
                out,
                ".source \"{}\"",
                escape_string(&resolve::string(dex, source))
            )?;
        }

        if !class.interfaces.is_empty() {
            out.write_all(b"\n# interfaces\n")?;
            for &interface in &class.interfaces {
                writeln!(out, ".implements {}", resolve::type_descriptor(dex, interface))?;
            }
        }

        let class_annotations = class
            .annotations
            .as_ref()
            .and_then(|dir| dir.class_annotations.as_ref());
        if let Some(set) = class_annotations {
            out.write_all(b"\n# annotations\n")?;
            write_annotation_set(&mut out, dex, set)?;
        }

        if let Some(data) = &class.class_data {
            self.write_static_fields(&mut out, &data.static_fields)?;
            self.write_instance_fields(&mut out, &data.instance_fields)?;
            self.write_methods(&mut out, "direct methods", &data.direct_methods, sink)?;
            self.write_methods(&mut out, "virtual methods", &data.virtual_methods, sink)?;
        }

        out.flush()
    }

    fn write_static_fields<W: Write>(
        &self,
        out: &mut IndentingWriter<W>,
        fields: &[EncodedField],
    ) -> io::Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        out.write_all(b"\n# static fields\n")?;
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.write_all(b"\n")?;
            }
            write_field(
                out,
                self.dex,
                field,
                self.class.static_value(i),
                self.tables.field(field.field_idx),
                self.clinit_fields.contains(field.field_idx),
            )?;
        }
        Ok(())
    }

    fn write_instance_fields<W: Write>(
        &self,
        out: &mut IndentingWriter<W>,
        fields: &[EncodedField],
    ) -> io::Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        out.write_all(b"\n# instance fields\n")?;
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.write_all(b"\n")?;
            }
            write_field(
                out,
                self.dex,
                field,
                None,
                self.tables.field(field.field_idx),
                false,
            )?;
        }
        Ok(())
    }

    fn write_methods<W: Write>(
        &mut self,
        out: &mut IndentingWriter<W>,
        section: &str,
        methods: &[EncodedMethod],
        sink: &mut dyn DiagnosticSink,
    ) -> io::Result<()> {
        if methods.is_empty() {
            return Ok(());
        }
        writeln!(out, "\n# {section}")?;
        for (i, method) in methods.iter().enumerate() {
            if i > 0 {
                out.write_all(b"\n")?;
            }
            let idx = method.method_idx;
            let outcome = MethodDefinition::new(self.dex, method, self.options).write_to(
                out,
                self.tables.method(idx),
                self.tables.parameters(idx),
            )?;
            if let MethodOutcome::Failed(error) = outcome {
                self.validation_errors = true;
                sink.report(Diagnostic {
                    method: resolve::method(self.dex, idx).into_owned(),
                    error,
                });
            }
        }
        Ok(())
    }
}
