use std::collections::BTreeSet;

use dexd_file::DexFile;
use dexd_file::class::ClassData;
use dexd_isa::Instruction;

const STATIC_CONSTRUCTOR: &str = "<clinit>";

/// Field indices stored to by the class's static constructor.
///
/// Any `sput*` anywhere in `<clinit>` counts, whatever path it lies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticConstructorFields {
    fields: BTreeSet<u32>,
}

impl StaticConstructorFields {
    pub fn scan(dex: &DexFile, class_data: Option<&ClassData>) -> Self {
        let mut fields = BTreeSet::new();
        let Some(class_data) = class_data else {
            return Self { fields };
        };

        for method in &class_data.direct_methods {
            let Some(code) = &method.code else { continue };
            if dex.method_name(method.method_idx).ok() != Some(STATIC_CONSTRUCTOR) {
                continue;
            }
            for item in code.instructions() {
                match item {
                    Ok((_, Instruction::Format21c(insn))) if insn.opcode().is_static_field_store() => {
                        fields.insert(insn.index());
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("Stopped scanning static constructor: {e}");
                        break;
                    }
                }
            }
        }

        log::trace!("fields set in static constructor: {fields:?}");
        Self { fields }
    }

    pub fn contains(&self, field_idx: u32) -> bool {
        self.fields.contains(&field_idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.fields.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
