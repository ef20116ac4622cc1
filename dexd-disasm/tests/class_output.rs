mod common;

use common::*;
use dexd_file::annotation::{
    Annotation, AnnotationDirectory, AnnotationSet, AnnotationSetRefList, EncodedAnnotation,
    Visibility,
};
use dexd_file::class::{ClassData, ClassDef, EncodedField, EncodedMethod};
use dexd_file::value::EncodedValue;
use dexd_file::{AccessFlags, DexFile};
use dexd_isa::{Instruction35c, Opcode};

#[test]
fn full_class_listing() {
    let mut b = DexFile::builder();
    let class_idx = b.intern_type(CLASS);
    let object = b.intern_type(OBJECT);
    let runnable = b.intern_type("Ljava/lang/Runnable;");
    let deprecated = b.intern_type("Ljava/lang/Deprecated;");
    let source = b.intern_string("Sample.java");
    let count = b.intern_field(CLASS, "COUNT", "I");
    let name = b.intern_field(CLASS, "NAME", "Ljava/lang/String;");
    let value = b.intern_field(CLASS, "value", "I");
    let hi = b.intern_string("hi");
    let init = b.intern_method(CLASS, "<init>", "V", &[]);
    let super_init = b.intern_method(OBJECT, "<init>", "V", &[]);
    let run = b.intern_method(CLASS, "run", "V", &[]);

    let mut class = ClassDef::new(class_idx, AccessFlags::PUBLIC | AccessFlags::FINAL);
    class.superclass_idx = Some(object);
    class.source_file_idx = Some(source);
    class.interfaces = vec![runnable];
    class.annotations = Some(AnnotationDirectory {
        class_annotations: Some(AnnotationSet::new(vec![Annotation::new(
            Visibility::Runtime,
            EncodedAnnotation::new(deprecated),
        )])),
        ..AnnotationDirectory::default()
    });
    class.static_values = vec![EncodedValue::Int(42), EncodedValue::String(hi)];
    class.class_data = Some(ClassData {
        static_fields: vec![
            EncodedField::new(
                count,
                AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::FINAL,
            ),
            EncodedField::new(name, AccessFlags::PRIVATE | AccessFlags::STATIC),
        ],
        instance_fields: vec![EncodedField::new(value, AccessFlags::PRIVATE)],
        direct_methods: vec![EncodedMethod::new(
            init,
            AccessFlags::PUBLIC | AccessFlags::CONSTRUCTOR,
            Some(code(
                1,
                1,
                &[
                    Instruction35c::new(Opcode::InvokeDirect, &[0], super_init)
                        .unwrap()
                        .into(),
                    return_void(),
                ],
            )),
        )],
        virtual_methods: vec![EncodedMethod::new(
            run,
            AccessFlags::PUBLIC,
            Some(code(1, 1, &[return_void()])),
        )],
    });
    b.add_class(class);
    let dex = b.build();

    let out = disassemble(&dex, 0);
    assert!(!out.had_errors);
    assert!(out.diagnostics.is_empty());
    assert_eq!(
        out.text,
        r#".class public final Lcom/example/Sample;
.super Ljava/lang/Object;
.source "Sample.java"

# interfaces
.implements Ljava/lang/Runnable;

# annotations
.annotation runtime Ljava/lang/Deprecated;
.end annotation

# static fields
.field public static final COUNT:I = 0x2a

.field private static NAME:Ljava/lang/String; = "hi"

# instance fields
.field private value:I

# direct methods
.method public constructor <init>()V
    .registers 1

    invoke-direct {p0}, Ljava/lang/Object;-><init>()V
    return-void
.end method

# virtual methods
.method public run()V
    .registers 1

    return-void
.end method
"#
    );
}

#[test]
fn empty_sections_are_omitted() {
    let mut b = DexFile::builder();
    let class_idx = b.intern_type(CLASS);
    let object = b.intern_type(OBJECT);
    let run = b.intern_method(CLASS, "run", "V", &[]);

    let mut class = ClassDef::new(class_idx, AccessFlags::PUBLIC | AccessFlags::ABSTRACT);
    class.superclass_idx = Some(object);
    class.class_data = Some(ClassData {
        virtual_methods: vec![EncodedMethod::new(
            run,
            AccessFlags::PUBLIC | AccessFlags::ABSTRACT,
            None,
        )],
        ..ClassData::default()
    });
    b.add_class(class);
    let dex = b.build();

    let text = disassemble(&dex, 0).text;
    assert_eq!(
        text,
        ".class public abstract Lcom/example/Sample;\n\
         .super Ljava/lang/Object;\n\
         \n\
         # virtual methods\n\
         .method public abstract run()V\n\
         .end method\n"
    );
    for marker in [
        "# interfaces",
        "# annotations",
        "# static fields",
        "# instance fields",
        "# direct methods",
    ] {
        assert!(!text.contains(marker), "{marker} in {text}");
    }
}

#[test]
fn interface_without_class_data() {
    let mut b = DexFile::builder();
    let class_idx = b.intern_type("Lcom/example/Marker;");
    let object = b.intern_type(OBJECT);
    let mut class = ClassDef::new(
        class_idx,
        AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
    );
    class.superclass_idx = Some(object);
    b.add_class(class);
    let dex = b.build();

    let out = disassemble(&dex, 0);
    assert_eq!(
        out.text,
        ".class public interface abstract Lcom/example/Marker;\n.super Ljava/lang/Object;\n"
    );
    assert!(!out.had_errors);
}

#[test]
fn member_annotations_are_looked_up_by_index() {
    let mut b = DexFile::builder();
    let class_idx = b.intern_type(CLASS);
    let nullable = b.intern_type("Landroidx/annotation/Nullable;");
    // interned first so the field index differs from the method index
    let other = b.intern_field(OBJECT, "unused", "I");
    let field = b.intern_field(CLASS, "label", "Ljava/lang/String;");
    let method = b.intern_method(CLASS, "set", "V", &["Ljava/lang/String;"]);
    assert_ne!(other, field);

    let set = || {
        AnnotationSet::new(vec![Annotation::new(
            Visibility::Build,
            EncodedAnnotation::new(nullable),
        )])
    };
    let mut class = ClassDef::new(class_idx, AccessFlags::PUBLIC);
    class.annotations = Some(AnnotationDirectory {
        class_annotations: None,
        field_annotations: vec![(field, set())],
        method_annotations: vec![],
        parameter_annotations: vec![(
            method,
            AnnotationSetRefList::new(vec![Some(set())]),
        )],
    });
    class.class_data = Some(ClassData {
        instance_fields: vec![EncodedField::new(field, AccessFlags::PRIVATE)],
        virtual_methods: vec![EncodedMethod::new(
            method,
            AccessFlags::PUBLIC,
            Some(code(2, 2, &[return_void()])),
        )],
        ..ClassData::default()
    });
    b.add_class(class);
    let dex = b.build();

    let text = disassemble(&dex, 0).text;
    assert!(text.contains(
        ".field private label:Ljava/lang/String;\n    \
         .annotation build Landroidx/annotation/Nullable;\n    \
         .end annotation\n\
         .end field\n"
    ), "{text}");
    assert!(text.contains(
        ".method public set(Ljava/lang/String;)V\n    \
         .registers 2\n    \
         .param p1    # Ljava/lang/String;\n        \
         .annotation build Landroidx/annotation/Nullable;\n        \
         .end annotation\n    \
         .end param\n\
         \n    \
         return-void\n"
    ), "{text}");
}
