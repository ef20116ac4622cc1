//! smali-style disassembly of Dalvik class definitions.
//!
//! [`ClassDefinition`] correlates a class's metadata, annotation directory
//! and static initializers into one ordered text listing. A method whose
//! body fails validation is rendered up to the failure and reported; the
//! rest of the class is still written.
//!
//! ```
//! use dexd_disasm::ClassDefinition;
//! use dexd_file::class::ClassDef;
//! use dexd_file::{AccessFlags, DexFile};
//!
//! let mut b = DexFile::builder();
//! let class_idx = b.intern_type("Lcom/example/Empty;");
//! let object = b.intern_type("Ljava/lang/Object;");
//! let mut class = ClassDef::new(class_idx, AccessFlags::PUBLIC);
//! class.superclass_idx = Some(object);
//! b.add_class(class);
//! let dex = b.build();
//!
//! let text = ClassDefinition::new(&dex, &dex.classes()[0]).to_text()?;
//! assert_eq!(text, ".class public Lcom/example/Empty;\n.super Ljava/lang/Object;\n");
//! # Ok::<(), std::io::Error>(())
//! ```

mod annotation;
mod class;
mod clinit;
mod diagnostic;
mod error;
mod escape;
mod field;
mod method;
mod options;
mod resolve;
mod tables;
mod value;
mod writer;

pub use class::ClassDefinition;
pub use clinit::StaticConstructorFields;
pub use diagnostic::{Diagnostic, DiagnosticSink, LogSink};
pub use error::ValidationError;
pub use escape::{escape_char, escape_string};
pub use method::{MethodDefinition, MethodOutcome};
pub use options::DisassemblyOptions;
pub use tables::AnnotationTables;
pub use value::write_value;
pub use writer::IndentingWriter;
