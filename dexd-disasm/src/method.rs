//! `.method` entries: header directives, annotations and the instruction
//! listing.
//!
//! The body is validated before anything is written. A body that fails
//! validation is still rendered up to the offending instruction, followed by
//! a `# <error>` comment, so the output stays well formed.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::io::{self, Write};

use dexd_file::annotation::{AnnotationSet, AnnotationSetRefList};
use dexd_file::class::EncodedMethod;
use dexd_file::code::{CodeItem, TryBlock};
use dexd_file::pool::PoolKind;
use dexd_file::{AccessFlags, AccessKind, DexFile};
use dexd_isa::{
    ArrayPayload, Format, Instruction, Opcode, OpcodeFlags, PackedSwitchPayload, ReferenceType,
    Registers, SparseSwitchPayload,
};

use crate::annotation::write_annotation_set;
use crate::error::ValidationError;
use crate::escape::escape_string;
use crate::options::DisassemblyOptions;
use crate::resolve;
use crate::value::hex;
use crate::writer::IndentingWriter;

/// How rendering of one method ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodOutcome {
    Complete,
    /// The listing stops before the first invalid instruction.
    Failed(ValidationError),
}

impl MethodOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Complete => None,
            Self::Failed(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LabelKind {
    Catchall,
    Catch,
    Cond,
    Goto,
    Pswitch,
    Sswitch,
    TryStart,
    PswitchData,
    SswitchData,
    ArrayData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Label {
    kind: LabelKind,
    address: u32,
}

impl Label {
    fn new(kind: LabelKind, address: u32) -> Self {
        Self { kind, address }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            LabelKind::Catchall => "catchall",
            LabelKind::Catch => "catch",
            LabelKind::Cond => "cond",
            LabelKind::Goto => "goto",
            LabelKind::Pswitch => "pswitch",
            LabelKind::Sswitch => "sswitch",
            LabelKind::TryStart => "try_start",
            LabelKind::PswitchData => "pswitch_data",
            LabelKind::SswitchData => "sswitch_data",
            LabelKind::ArrayData => "array",
        };
        write!(f, ":{prefix}_{:x}", self.address)
    }
}

fn pool_kind(reference: ReferenceType) -> Option<PoolKind> {
    match reference {
        ReferenceType::None => None,
        ReferenceType::String => Some(PoolKind::String),
        ReferenceType::Type => Some(PoolKind::Type),
        ReferenceType::Field => Some(PoolKind::Field),
        ReferenceType::Method => Some(PoolKind::Method),
    }
}

/// Registers taken by a parameter type.
fn type_width(descriptor: &str) -> u32 {
    if descriptor == "J" || descriptor == "D" { 2 } else { 1 }
}

fn offset_target(address: u32, offset: i32) -> i64 {
    address as i64 + offset as i64
}

/// A decoded body after validation: the valid prefix and the first failure.
struct Body {
    instructions: Vec<(u32, Instruction)>,
    error: Option<ValidationError>,
}

struct Validator<'a> {
    dex: &'a DexFile,
    code: &'a CodeItem,
    index: HashMap<u32, usize>,
    instructions: &'a [(u32, Instruction)],
}

impl Validator<'_> {
    fn instruction_at(&self, target: i64) -> Option<&Instruction> {
        let address = u32::try_from(target).ok()?;
        self.index.get(&address).map(|&i| &self.instructions[i].1)
    }

    /// True when `target` starts an instruction that is not a payload.
    fn is_code(&self, target: i64) -> bool {
        self.instruction_at(target)
            .is_some_and(|insn| !insn.format().is_payload())
    }

    fn check_register(&self, address: u32, register: u32) -> Result<(), ValidationError> {
        if register >= self.code.registers_size as u32 {
            return Err(ValidationError::RegisterOutOfRange {
                address,
                register,
                registers_size: self.code.registers_size,
            });
        }
        Ok(())
    }

    fn check(&self, address: u32, insn: &Instruction) -> Result<(), ValidationError> {
        if let Instruction::Format35c(i) = insn {
            if i.register_count() > 5 {
                return Err(ValidationError::InvalidRegisterCount {
                    address,
                    count: i.register_count(),
                });
            }
        }
        match insn.registers() {
            Some(Registers::List(regs)) => {
                for r in regs {
                    self.check_register(address, r)?;
                }
            }
            Some(Registers::Range { start, count }) if count > 0 => {
                self.check_register(address, start + count - 1)?;
            }
            _ => {}
        }

        let opcode = insn.opcode();
        if let (Some(kind), Some(index)) = (
            pool_kind(opcode.reference_type()),
            insn.reference_index(),
        ) {
            if index as usize >= self.dex.pool_len(kind) {
                return Err(ValidationError::InvalidReference {
                    address,
                    kind,
                    index,
                });
            }
        }

        let Some(offset) = insn.code_offset() else {
            return Ok(());
        };
        let target = offset_target(address, offset);
        let flags = opcode.flags();
        if flags.contains(OpcodeFlags::BRANCH) {
            if !self.is_code(target) {
                return Err(ValidationError::InvalidBranchTarget { address, target });
            }
        } else if flags.contains(OpcodeFlags::SWITCH) {
            let cases: Vec<i32> = match self.instruction_at(target) {
                Some(Instruction::PackedSwitchPayload(p))
                    if opcode == Opcode::PackedSwitch =>
                {
                    p.targets().to_vec()
                }
                Some(Instruction::SparseSwitchPayload(p))
                    if opcode == Opcode::SparseSwitch =>
                {
                    p.targets().to_vec()
                }
                _ => return Err(ValidationError::InvalidPayload { address, target }),
            };
            for case in cases {
                let target = offset_target(address, case);
                if !self.is_code(target) {
                    return Err(ValidationError::InvalidBranchTarget { address, target });
                }
            }
        } else if flags.contains(OpcodeFlags::ARRAY_DATA)
            && !matches!(self.instruction_at(target), Some(Instruction::ArrayPayload(_)))
        {
            return Err(ValidationError::InvalidPayload { address, target });
        }
        Ok(())
    }

    fn check_tries(&self) -> Result<(), ValidationError> {
        let code_size = self.code.insns_size() as i64;
        for block in &self.code.tries {
            let end_ok = block
                .end_address()
                .is_some_and(|end| end as i64 == code_size || self.index.contains_key(&end));
            if block.code_units == 0 || !self.is_code(block.start_address as i64) || !end_ok {
                return Err(ValidationError::InvalidTryBlock {
                    start: block.start_address,
                    code_units: block.code_units,
                });
            }
            let handlers = block
                .handlers
                .iter()
                .map(|h| h.address)
                .chain(block.catch_all);
            for handler in handlers {
                if !self.is_code(handler as i64) {
                    return Err(ValidationError::InvalidBranchTarget {
                        address: block.start_address,
                        target: handler as i64,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Renders one method.
#[derive(Debug, Clone, Copy)]
pub struct MethodDefinition<'a> {
    dex: &'a DexFile,
    method: &'a EncodedMethod,
    options: DisassemblyOptions,
}

impl<'a> MethodDefinition<'a> {
    pub fn new(dex: &'a DexFile, method: &'a EncodedMethod, options: DisassemblyOptions) -> Self {
        Self {
            dex,
            method,
            options,
        }
    }

    fn is_static(&self) -> bool {
        self.method.access_flags.contains(AccessFlags::STATIC)
    }

    /// Parameter type descriptors, or empty when the prototype is unresolvable.
    fn parameters(&self) -> Vec<&'a str> {
        self.dex
            .method_parameters(self.method.method_idx)
            .unwrap_or_default()
    }

    fn validate(&self, code: &CodeItem) -> Body {
        let expected = self.parameters().iter().map(|p| type_width(p)).sum::<u32>()
            + u32::from(!self.is_static());
        if code.ins_size > code.registers_size
            || (self.dex.method_id(self.method.method_idx).is_ok()
                && code.ins_size as u32 != expected)
        {
            return Body {
                instructions: Vec::new(),
                error: Some(ValidationError::InvalidParameterRegisters {
                    registers_size: code.registers_size,
                    ins_size: code.ins_size,
                    expected,
                }),
            };
        }

        let mut instructions = Vec::new();
        let mut error = None;
        for item in code.instructions() {
            match item {
                Ok(pair) => instructions.push(pair),
                Err(source) => {
                    error = Some(ValidationError::Decode {
                        address: (source.offset() / 2) as u32,
                        source,
                    });
                    break;
                }
            }
        }

        let index = instructions
            .iter()
            .enumerate()
            .map(|(i, (address, _))| (*address, i))
            .collect();
        let validator = Validator {
            dex: self.dex,
            code,
            index,
            instructions: &instructions,
        };

        let mut valid = instructions.len();
        for (i, (address, insn)) in instructions.iter().enumerate() {
            if let Err(e) = validator.check(*address, insn) {
                valid = i;
                error = Some(e);
                break;
            }
        }
        if error.is_none() {
            error = validator.check_tries().err();
        }

        instructions.truncate(valid);
        Body {
            instructions,
            error,
        }
    }

    /// Write the `.method` entry. Validation failures are part of the
    /// returned outcome; only output errors are `Err`.
    pub fn write_to<W: Write>(
        &self,
        out: &mut IndentingWriter<W>,
        annotations: Option<&AnnotationSet>,
        parameter_annotations: Option<&AnnotationSetRefList>,
    ) -> io::Result<MethodOutcome> {
        let idx = self.method.method_idx;
        let descriptor = match self.dex.method_id(idx) {
            Ok(m) => format!(
                "{}{}",
                resolve::string(self.dex, m.name_idx),
                resolve::proto(self.dex, m.proto_idx)
            ),
            Err(e) => {
                log::warn!("{e}");
                format!("<invalid method@{idx}>")
            }
        };
        writeln!(
            out,
            ".method {}{}",
            self.method.access_flags.prefix(AccessKind::Method),
            descriptor
        )?;
        out.indent(4);

        let code = self.method.code.as_ref();
        if let Some(code) = code {
            if self.options.locals_directive {
                let locals = code.registers_size.saturating_sub(code.ins_size);
                writeln!(out, ".locals {locals}")?;
            } else {
                writeln!(out, ".registers {}", code.registers_size)?;
            }
        }
        if let Some(list) = parameter_annotations {
            self.write_parameters(out, list)?;
        }
        if let Some(set) = annotations {
            write_annotation_set(out, self.dex, set)?;
        }

        let mut outcome = MethodOutcome::Complete;
        if let Some(code) = code {
            let body = self.validate(code);
            out.write_all(b"\n")?;
            let listing = Listing::new(self.dex, code, self.options, &body);
            listing.write_to(out)?;
            if let Some(error) = body.error {
                log::debug!("method {idx} rendered up to a validation failure");
                writeln!(out, "# {error}")?;
                outcome = MethodOutcome::Failed(error);
            }
        }

        out.deindent(4);
        out.write_all(b".end method\n")?;
        Ok(outcome)
    }

    fn write_parameters<W: Write>(
        &self,
        out: &mut IndentingWriter<W>,
        list: &AnnotationSetRefList,
    ) -> io::Result<()> {
        let mut register = u32::from(!self.is_static());
        for (i, param) in self.parameters().into_iter().enumerate() {
            if let Some(set) = list.get(i).filter(|s| !s.is_empty()) {
                writeln!(out, ".param p{register}    # {param}")?;
                out.indent(4);
                write_annotation_set(out, self.dex, set)?;
                out.deindent(4);
                out.write_all(b".end param\n")?;
            }
            register += type_width(param);
        }
        Ok(())
    }
}

/// Labels and cross-references of a validated body.
struct Listing<'a> {
    dex: &'a DexFile,
    code: &'a CodeItem,
    options: DisassemblyOptions,
    body: &'a Body,
    first_parameter: u32,
    labels: BTreeMap<u32, BTreeSet<Label>>,
    /// Try blocks grouped by end address.
    try_ends: BTreeMap<u32, Vec<&'a TryBlock>>,
    /// Payload address to the address of the switch that uses it.
    payload_owners: HashMap<u32, u32>,
}

impl<'a> Listing<'a> {
    fn new(
        dex: &'a DexFile,
        code: &'a CodeItem,
        options: DisassemblyOptions,
        body: &'a Body,
    ) -> Self {
        let mut listing = Self {
            dex,
            code,
            options,
            body,
            first_parameter: code.registers_size.saturating_sub(code.ins_size) as u32,
            labels: BTreeMap::new(),
            try_ends: BTreeMap::new(),
            payload_owners: HashMap::new(),
        };
        listing.collect_labels();
        listing
    }

    /// Whether the listing writes out the instruction at `address`.
    fn is_rendered(&self, address: u32) -> bool {
        self.body.error.is_none()
            || self
                .body
                .instructions
                .binary_search_by_key(&address, |(a, _)| *a)
                .is_ok()
    }

    fn add_label(&mut self, kind: LabelKind, target: i64) {
        let address = u32::try_from(target).ok().filter(|&a| self.is_rendered(a));
        if let Some(address) = address {
            self.labels
                .entry(address)
                .or_default()
                .insert(Label::new(kind, address));
        }
    }

    fn collect_labels(&mut self) {
        let body = self.body;
        let payloads: HashMap<u32, &Instruction> = body
            .instructions
            .iter()
            .filter(|(_, insn)| insn.format().is_payload())
            .map(|(address, insn)| (*address, insn))
            .collect();

        for (address, insn) in &body.instructions {
            let Some(offset) = insn.code_offset() else {
                continue;
            };
            let target = offset_target(*address, offset);
            match insn.format() {
                Format::Format21t | Format::Format22t => self.add_label(LabelKind::Cond, target),
                Format::Format10t | Format::Format20t | Format::Format30t => {
                    self.add_label(LabelKind::Goto, target)
                }
                Format::Format31t => {
                    let payload = u32::try_from(target).ok().and_then(|t| payloads.get(&t));
                    match payload {
                        Some(Instruction::PackedSwitchPayload(p)) => {
                            self.add_label(LabelKind::PswitchData, target);
                            for &case in p.targets() {
                                self.add_label(LabelKind::Pswitch, offset_target(*address, case));
                            }
                            self.payload_owners.insert(target as u32, *address);
                        }
                        Some(Instruction::SparseSwitchPayload(p)) => {
                            self.add_label(LabelKind::SswitchData, target);
                            for &case in p.targets() {
                                self.add_label(LabelKind::Sswitch, offset_target(*address, case));
                            }
                            self.payload_owners.insert(target as u32, *address);
                        }
                        _ if insn.opcode().flags().contains(OpcodeFlags::ARRAY_DATA) => {
                            self.add_label(LabelKind::ArrayData, target)
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        if body.error.is_some() {
            return;
        }
        let code = self.code;
        for block in &code.tries {
            let Some(end) = block.end_address() else {
                continue;
            };
            self.add_label(LabelKind::TryStart, block.start_address as i64);
            for handler in &block.handlers {
                self.add_label(LabelKind::Catch, handler.address as i64);
            }
            if let Some(address) = block.catch_all {
                self.add_label(LabelKind::Catchall, address as i64);
            }
            self.try_ends.entry(end).or_default().push(block);
        }
    }

    fn register(&self, register: u32) -> String {
        if self.options.parameter_registers && register >= self.first_parameter {
            format!("p{}", register - self.first_parameter)
        } else {
            format!("v{register}")
        }
    }

    fn write_to<W: Write>(&self, out: &mut IndentingWriter<W>) -> io::Result<()> {
        let mut first = true;
        for (address, insn) in &self.body.instructions {
            self.write_labels(out, *address, &mut first)?;
            if self.options.code_offsets {
                writeln!(out, "#@{address:x}")?;
            }
            self.write_instruction(out, *address, insn)?;
            first = false;
        }
        if self.body.error.is_none() {
            self.write_labels(out, self.code.insns_size() as u32, &mut first)?;
        }
        Ok(())
    }

    fn write_labels<W: Write>(
        &self,
        out: &mut IndentingWriter<W>,
        address: u32,
        first: &mut bool,
    ) -> io::Result<()> {
        let ends = self.try_ends.get(&address);
        let labels = self.labels.get(&address);
        if ends.is_none() && labels.is_none() {
            return Ok(());
        }
        if !*first {
            out.write_all(b"\n")?;
        }
        *first = false;

        if let Some(blocks) = ends {
            writeln!(out, ":try_end_{address:x}")?;
            for block in blocks {
                let range = format!(
                    "{{{} .. :try_end_{address:x}}}",
                    Label::new(LabelKind::TryStart, block.start_address)
                );
                for handler in &block.handlers {
                    writeln!(
                        out,
                        ".catch {} {range} {}",
                        resolve::type_descriptor(self.dex, handler.type_idx),
                        Label::new(LabelKind::Catch, handler.address)
                    )?;
                }
                if let Some(handler) = block.catch_all {
                    writeln!(
                        out,
                        ".catchall {range} {}",
                        Label::new(LabelKind::Catchall, handler)
                    )?;
                }
            }
        }
        for label in labels.into_iter().flatten() {
            writeln!(out, "{label}")?;
        }
        Ok(())
    }

    fn case_label(&self, kind: LabelKind, switch: u32, offset: i32) -> Option<Label> {
        let address = u32::try_from(offset_target(switch, offset)).ok()?;
        let label = Label::new(kind, address);
        self.labels.get(&address)?.contains(&label).then_some(label)
    }

    fn reference(&self, insn: &Instruction) -> String {
        let Some(index) = insn.reference_index() else {
            return String::new();
        };
        match insn.opcode().reference_type() {
            ReferenceType::String => {
                format!("\"{}\"", escape_string(&resolve::string(self.dex, index)))
            }
            ReferenceType::Type => resolve::type_descriptor(self.dex, index).into_owned(),
            ReferenceType::Field => resolve::field(self.dex, index).into_owned(),
            ReferenceType::Method => resolve::method(self.dex, index).into_owned(),
            ReferenceType::None => String::new(),
        }
    }

    fn write_instruction<W: Write>(
        &self,
        out: &mut IndentingWriter<W>,
        address: u32,
        insn: &Instruction,
    ) -> io::Result<()> {
        match insn {
            Instruction::PackedSwitchPayload(p) => return self.write_packed_switch(out, address, p),
            Instruction::SparseSwitchPayload(p) => return self.write_sparse_switch(out, address, p),
            Instruction::ArrayPayload(p) => return write_array_data(out, p),
            _ => {}
        }

        let opcode = insn.opcode();
        let mut operands: Vec<String> = Vec::new();
        match insn.registers() {
            Some(Registers::List(regs)) if matches!(insn, Instruction::Format35c(_)) => {
                let regs: Vec<_> = regs.into_iter().map(|r| self.register(r)).collect();
                operands.push(format!("{{{}}}", regs.join(", ")));
            }
            Some(Registers::List(regs)) => {
                operands.extend(regs.into_iter().map(|r| self.register(r)));
            }
            Some(Registers::Range { count: 0, .. }) => operands.push("{}".to_owned()),
            Some(Registers::Range { start, count }) => operands.push(format!(
                "{{{} .. {}}}",
                self.register(start),
                self.register(start + count - 1)
            )),
            None => {}
        }

        if let Some(literal) = insn.literal() {
            let suffix = if opcode.flags().contains(OpcodeFlags::WIDE_LITERAL) { "L" } else { "" };
            operands.push(format!("{}{suffix}", hex(literal)));
        }
        if insn.reference_index().is_some() {
            operands.push(self.reference(insn));
        }
        if let Some(offset) = insn.code_offset() {
            let target = offset_target(address, offset);
            let label = u32::try_from(target).ok().and_then(|t| {
                self.labels.get(&t).and_then(|set| {
                    set.iter()
                        .find(|l| match insn.format() {
                            Format::Format21t | Format::Format22t => l.kind == LabelKind::Cond,
                            Format::Format31t => matches!(
                                l.kind,
                                LabelKind::PswitchData | LabelKind::SswitchData | LabelKind::ArrayData
                            ),
                            _ => l.kind == LabelKind::Goto,
                        })
                        .copied()
                })
            });
            match label {
                Some(label) => operands.push(label.to_string()),
                // target is past the failure, so it has no label
                None => operands.push(hex(offset as i64)),
            }
        }

        if operands.is_empty() {
            writeln!(out, "{opcode}")
        } else {
            writeln!(out, "{opcode} {}", operands.join(", "))
        }
    }

    fn write_packed_switch<W: Write>(
        &self,
        out: &mut IndentingWriter<W>,
        address: u32,
        payload: &PackedSwitchPayload,
    ) -> io::Result<()> {
        writeln!(out, ".packed-switch {}", hex(payload.first_key() as i64))?;
        out.indent(4);
        let owner = self.payload_owners.get(&address);
        for &target in payload.targets() {
            match owner.and_then(|&switch| self.case_label(LabelKind::Pswitch, switch, target)) {
                Some(label) => writeln!(out, "{label}")?,
                None => writeln!(out, "# {}", hex(target as i64))?,
            }
        }
        out.deindent(4);
        out.write_all(b".end packed-switch\n")
    }

    fn write_sparse_switch<W: Write>(
        &self,
        out: &mut IndentingWriter<W>,
        address: u32,
        payload: &SparseSwitchPayload,
    ) -> io::Result<()> {
        out.write_all(b".sparse-switch\n")?;
        out.indent(4);
        let owner = self.payload_owners.get(&address);
        for (key, target) in payload.entries() {
            match owner.and_then(|&switch| self.case_label(LabelKind::Sswitch, switch, target)) {
                Some(label) => writeln!(out, "{} -> {label}", hex(key as i64))?,
                None => writeln!(out, "# {} -> {}", hex(key as i64), hex(target as i64))?,
            }
        }
        out.deindent(4);
        out.write_all(b".end sparse-switch\n")
    }
}

fn write_array_data<W: Write>(
    out: &mut IndentingWriter<W>,
    payload: &ArrayPayload,
) -> io::Result<()> {
    let suffix = match payload.element_width() {
        1 => "t",
        2 => "s",
        8 => "L",
        _ => "",
    };
    writeln!(out, ".array-data {}", payload.element_width())?;
    out.indent(4);
    for element in payload.elements() {
        writeln!(out, "{}{suffix}", hex(element))?;
    }
    out.deindent(4);
    out.write_all(b".end array-data\n")
}

#[cfg(test)]
mod tests {
    use dexd_isa::{
        Instruction10t, Instruction10x, Instruction11n, Instruction11x, Instruction21c,
        Instruction21t, Instruction22b, Instruction22t, Instruction31t, Instruction35c,
    };

    use super::*;

    const CLASS: &str = "Lcom/example/Test;";

    fn render(
        dex: &DexFile,
        method: &EncodedMethod,
        options: DisassemblyOptions,
    ) -> (String, MethodOutcome) {
        let mut out = IndentingWriter::new(Vec::new());
        let outcome = MethodDefinition::new(dex, method, options)
            .write_to(&mut out, None, None)
            .unwrap();
        (String::from_utf8(out.into_inner()).unwrap(), outcome)
    }

    fn static_method(code: CodeItem, method_idx: u32) -> EncodedMethod {
        EncodedMethod::new(method_idx, AccessFlags::PUBLIC | AccessFlags::STATIC, Some(code))
    }

    #[test]
    fn branches_get_labels_and_parameters_use_p_names() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "loop", "V", &["I"]);
        let dex = b.build();

        let code = CodeItem::from_instructions(
            2,
            1,
            &[
                Instruction::Format11n(Instruction11n::new(Opcode::Const4, 0, 0).unwrap()),
                Instruction::Format22t(Instruction22t::new(Opcode::IfGe, 0, 1, 5).unwrap()),
                Instruction::Format22b(Instruction22b::new(Opcode::AddIntLit8, 0, 0, 1).unwrap()),
                Instruction::Format10t(Instruction10t::new(Opcode::Goto, -4).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap()),
            ],
        )
        .unwrap();
        let (text, outcome) = render(&dex, &static_method(code, idx), DisassemblyOptions::default());

        assert_eq!(outcome, MethodOutcome::Complete);
        assert_eq!(
            text,
            ".method public static loop(I)V\n    \
             .registers 2\n\
             \n    \
             const/4 v0, 0x0\n\
             \n    \
             :goto_1\n    \
             if-ge v0, p0, :cond_6\n    \
             add-int/lit8 v0, v0, 0x1\n    \
             goto :goto_1\n\
             \n    \
             :cond_6\n    \
             return-void\n\
             .end method\n"
        );
    }

    #[test]
    fn packed_switch_payload_lists_case_labels() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "pick", "V", &["I"]);
        let dex = b.build();

        let payload = PackedSwitchPayload::new(1, vec![3, 4]).unwrap();
        let code = CodeItem::from_instructions(
            1,
            1,
            &[
                Instruction::Format31t(Instruction31t::new(Opcode::PackedSwitch, 0, 6).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::Nop).unwrap()),
                Instruction::PackedSwitchPayload(payload),
            ],
        )
        .unwrap();
        let (text, outcome) = render(&dex, &static_method(code, idx), DisassemblyOptions::default());

        assert!(!outcome.is_failed(), "{text}");
        assert!(text.contains("packed-switch p0, :pswitch_data_6\n"), "{text}");
        assert!(text.contains("\n    :pswitch_3\n    return-void\n"), "{text}");
        assert!(text.contains(
            "    :pswitch_data_6\n    \
             .packed-switch 0x1\n        \
             :pswitch_3\n        \
             :pswitch_4\n    \
             .end packed-switch\n"
        ), "{text}");
    }

    #[test]
    fn try_blocks_emit_catch_directives_at_their_end() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "guarded", "V", &[]);
        let exception = b.intern_type("Ljava/lang/Exception;");
        let callee = b.intern_method(CLASS, "risky", "V", &[]);
        let dex = b.build();

        let code = CodeItem::from_instructions(
            1,
            0,
            &[
                Instruction::Format35c(Instruction35c::new(Opcode::InvokeStatic, &[], callee).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap()),
                Instruction::Format11x(Instruction11x::new(Opcode::MoveException, 0).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap()),
            ],
        )
        .unwrap()
        .with_tries(vec![TryBlock::new(0, 3).catch(exception, 4)]);
        let (text, outcome) = render(&dex, &static_method(code, idx), DisassemblyOptions::default());

        assert_eq!(outcome, MethodOutcome::Complete);
        assert_eq!(
            text,
            ".method public static guarded()V\n    \
             .registers 1\n\
             \n    \
             :try_start_0\n    \
             invoke-static {}, Lcom/example/Test;->risky()V\n\
             \n    \
             :try_end_3\n    \
             .catch Ljava/lang/Exception; {:try_start_0 .. :try_end_3} :catch_4\n    \
             return-void\n\
             \n    \
             :catch_4\n    \
             move-exception v0\n    \
             return-void\n\
             .end method\n"
        );
    }

    #[test]
    fn invalid_register_stops_listing_with_comment() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "broken", "V", &[]);
        let dex = b.build();

        let code = CodeItem::from_instructions(
            2,
            0,
            &[
                Instruction::Format11n(Instruction11n::new(Opcode::Const4, 1, 7).unwrap()),
                Instruction::Format11n(Instruction11n::new(Opcode::Const4, 5, 0).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap()),
            ],
        )
        .unwrap();
        let (text, outcome) = render(&dex, &static_method(code, idx), DisassemblyOptions::default());

        let error = ValidationError::RegisterOutOfRange {
            address: 1,
            register: 5,
            registers_size: 2,
        };
        assert_eq!(outcome, MethodOutcome::Failed(error.clone()));
        assert_eq!(
            text,
            format!(
                ".method public static broken()V\n    \
                 .registers 2\n\
                 \n    \
                 const/4 v1, 0x7\n    \
                 # {error}\n\
                 .end method\n"
            )
        );
    }

    #[test]
    fn branch_past_failure_renders_raw_offset() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "skip", "V", &["I"]);
        let dex = b.build();

        let code = CodeItem::from_instructions(
            1,
            1,
            &[
                Instruction::Format21t(Instruction21t::new(Opcode::IfEqz, 0, 3).unwrap()),
                Instruction::Format11n(Instruction11n::new(Opcode::Const4, 5, 0).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap()),
            ],
        )
        .unwrap();
        let (text, outcome) = render(&dex, &static_method(code, idx), DisassemblyOptions::default());

        assert!(outcome.is_failed(), "{text}");
        assert!(text.contains("    if-eqz p0, 0x3
"), "{text}");
        assert!(!text.contains(":cond_"), "{text}");
    }

    #[test]
    fn switch_cases_past_failure_render_as_comments() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "pick", "V", &["I"]);
        let dex = b.build();

        let payload = PackedSwitchPayload::new(1, vec![11]).unwrap();
        let code = CodeItem::from_instructions(
            1,
            1,
            &[
                Instruction::Format31t(Instruction31t::new(Opcode::PackedSwitch, 0, 4).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::Nop).unwrap()),
                Instruction::PackedSwitchPayload(payload),
                Instruction::Format11n(Instruction11n::new(Opcode::Const4, 5, 0).unwrap()),
                Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap()),
            ],
        )
        .unwrap();
        let (text, outcome) = render(&dex, &static_method(code, idx), DisassemblyOptions::default());

        assert!(outcome.is_failed(), "{text}");
        assert!(text.contains("packed-switch p0, :pswitch_data_4
"), "{text}");
        assert!(text.contains(
            "    .packed-switch 0x1
                     # 0xb
                 .end packed-switch
"
        ), "{text}");
        assert!(!text.contains(":pswitch_b"), "{text}");
    }

    #[test]
    fn unresolvable_reference_fails_validation() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "load", "V", &[]);
        let dex = b.build();

        let code = CodeItem::from_instructions(
            1,
            0,
            &[Instruction::Format21c(Instruction21c::new(Opcode::ConstString, 0, 900).unwrap())],
        )
        .unwrap();
        let (_, outcome) = render(&dex, &static_method(code, idx), DisassemblyOptions::default());
        assert_eq!(
            outcome.error(),
            Some(&ValidationError::InvalidReference {
                address: 0,
                kind: PoolKind::String,
                index: 900,
            })
        );
    }

    #[test]
    fn parameter_count_mismatch_is_reported_before_decoding() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "wide", "V", &["J"]);
        let dex = b.build();

        let code = CodeItem::from_instructions(
            2,
            1,
            &[Instruction::Format10x(Instruction10x::new(Opcode::ReturnVoid).unwrap())],
        )
        .unwrap();
        let (text, outcome) = render(&dex, &static_method(code, idx), DisassemblyOptions::default());
        assert!(matches!(
            outcome,
            MethodOutcome::Failed(ValidationError::InvalidParameterRegisters { expected: 2, .. })
        ));
        assert!(!text.contains("return-void"));
    }

    #[test]
    fn options_switch_directives_and_offsets() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "id", "I", &["I"]);
        let dex = b.build();

        let code = CodeItem::from_instructions(
            3,
            1,
            &[Instruction::Format11x(Instruction11x::new(Opcode::Return, 2).unwrap())],
        )
        .unwrap();
        let options = DisassemblyOptions {
            parameter_registers: false,
            locals_directive: true,
            code_offsets: true,
        };
        let (text, _) = render(&dex, &static_method(code, idx), options);
        assert!(text.contains("    .locals 2\n"), "{text}");
        assert!(text.contains("    #@0\n    return v2\n"), "{text}");
    }

    #[test]
    fn abstract_method_has_no_body() {
        let mut b = DexFile::builder();
        let idx = b.intern_method(CLASS, "run", "V", &[]);
        let dex = b.build();

        let method = EncodedMethod::new(idx, AccessFlags::PUBLIC | AccessFlags::ABSTRACT, None);
        let (text, outcome) = render(&dex, &method, DisassemblyOptions::default());
        assert_eq!(outcome, MethodOutcome::Complete);
        assert_eq!(text, ".method public abstract run()V\n.end method\n");
    }
}
