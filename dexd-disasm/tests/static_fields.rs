mod common;

use common::*;
use dexd_disasm::ClassDefinition;
use dexd_file::class::{ClassData, ClassDef, EncodedField, EncodedMethod};
use dexd_file::value::EncodedValue;
use dexd_file::{AccessFlags, DexFile};
use dexd_isa::{Instruction11n, Instruction21c, Opcode};

fn static_final() -> AccessFlags {
    AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::FINAL
}

#[test]
fn initializers_align_with_leading_fields() {
    let mut b = DexFile::builder();
    let class_idx = b.intern_type(CLASS);
    let fields: Vec<u32> = ["A", "B", "C"]
        .iter()
        .map(|name| b.intern_field(CLASS, name, "I"))
        .collect();
    let mut class = ClassDef::new(class_idx, AccessFlags::PUBLIC);
    class.static_values = vec![EncodedValue::Int(1), EncodedValue::Int(2)];
    class.class_data = Some(ClassData {
        static_fields: fields
            .iter()
            .map(|&idx| EncodedField::new(idx, static_final()))
            .collect(),
        ..ClassData::default()
    });
    b.add_class(class);
    let dex = b.build();

    let text = disassemble(&dex, 0).text;
    assert!(text.ends_with(
        "# static fields\n\
         .field public static final A:I = 0x1\n\
         \n\
         .field public static final B:I = 0x2\n\
         \n\
         .field public static final C:I\n"
    ), "{text}");
}

#[test]
fn static_constructor_stores_mark_fields() {
    let mut b = DexFile::builder();
    let class_idx = b.intern_type(CLASS);
    let ints: Vec<u32> = ["A", "B", "C", "D"]
        .iter()
        .map(|name| b.intern_field(CLASS, name, "I"))
        .collect();
    let label = b.intern_field(CLASS, "LABEL", "Ljava/lang/String;");
    let clinit = b.intern_method(CLASS, "<clinit>", "V", &[]);
    assert_eq!(ints[3], 3);

    let mut class = ClassDef::new(class_idx, AccessFlags::PUBLIC);
    class.static_values = vec![
        EncodedValue::Int(0),
        EncodedValue::Int(0),
        EncodedValue::Int(0),
        EncodedValue::Int(0),
        EncodedValue::Null,
    ];
    let mut static_fields: Vec<_> = ints
        .iter()
        .map(|&idx| EncodedField::new(idx, static_final()))
        .collect();
    static_fields.push(EncodedField::new(label, static_final()));
    class.class_data = Some(ClassData {
        static_fields,
        direct_methods: vec![EncodedMethod::new(
            clinit,
            AccessFlags::STATIC | AccessFlags::CONSTRUCTOR,
            Some(code(
                1,
                0,
                &[
                    Instruction11n::new(Opcode::Const4, 0, 5).unwrap().into(),
                    Instruction21c::new(Opcode::Sput, 0, ints[3]).unwrap().into(),
                    Instruction11n::new(Opcode::Const4, 0, 0).unwrap().into(),
                    Instruction21c::new(Opcode::SputObject, 0, label).unwrap().into(),
                    return_void(),
                ],
            )),
        )],
        ..ClassData::default()
    });
    b.add_class(class);
    let dex = b.build();

    let definition = ClassDefinition::new(&dex, &dex.classes()[0]);
    let scanned: Vec<u32> = definition.static_constructor_fields().iter().collect();
    assert_eq!(scanned, vec![3, label]);

    let text = disassemble(&dex, 0).text;
    let note = "#the value of this static final field might be set in the static constructor\n";
    assert_eq!(text.matches(note).count(), 1, "{text}");
    assert!(text.contains(&format!("{note}.field public static final D:I = 0x0\n")));
    assert!(text.contains(".field public static final LABEL:Ljava/lang/String; = null\n"));
}

#[test]
fn no_static_constructor_gives_empty_set() {
    let mut b = DexFile::builder();
    let class_idx = b.intern_type(CLASS);
    let field = b.intern_field(CLASS, "A", "I");
    let mut class = ClassDef::new(class_idx, AccessFlags::PUBLIC);
    class.static_values = vec![EncodedValue::Int(7)];
    class.class_data = Some(ClassData {
        static_fields: vec![EncodedField::new(field, static_final())],
        ..ClassData::default()
    });
    b.add_class(class);
    let dex = b.build();

    let definition = ClassDefinition::new(&dex, &dex.classes()[0]);
    assert!(definition.static_constructor_fields().is_empty());
    assert!(definition.annotation_tables().is_empty());
    assert!(!disassemble(&dex, 0).text.contains("#the value"));
}
