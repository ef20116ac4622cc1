//! Dalvik opcode table.
//!
//! One row per defined opcode: value, mnemonic, binary format, the kind of
//! constant-pool item the instruction references, and property flags.
//! Unused opcode slots have no row and are rejected by [`Opcode::from_u8`].

use std::fmt;

use crate::format::Format;

/// Kind of constant-pool item an instruction's index operand refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    None,
    String,
    Type,
    Field,
    Method,
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::String => "string",
            Self::Type => "type",
            Self::Field => "field",
            Self::Method => "method",
        };
        f.write_str(s)
    }
}

bitflags::bitflags! {
    /// Static properties of an opcode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpcodeFlags: u32 {
        /// Carries a relative branch offset (goto, if-*).
        const BRANCH = 0x01;
        /// Carries an offset to a packed- or sparse-switch payload.
        const SWITCH = 0x02;
        /// Carries an offset to a fill-array-data payload.
        const ARRAY_DATA = 0x04;
        /// The literal operand is 64 bits wide.
        const WIDE_LITERAL = 0x08;
        /// Stores into a static field (sput family).
        const STATIC_FIELD_STORE = 0x10;
    }
}

const N: OpcodeFlags = OpcodeFlags::empty();
const BR: OpcodeFlags = OpcodeFlags::BRANCH;
const SW: OpcodeFlags = OpcodeFlags::SWITCH;
const AD: OpcodeFlags = OpcodeFlags::ARRAY_DATA;
const WL: OpcodeFlags = OpcodeFlags::WIDE_LITERAL;
const SS: OpcodeFlags = OpcodeFlags::STATIC_FIELD_STORE;

macro_rules! opcodes {
    ($($value:literal => $variant:ident, $name:literal, $format:ident, $reference:ident, $flags:ident;)*) => {
        /// A defined Dalvik opcode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Opcode {
            $($variant = $value,)*
        }

        impl Opcode {
            /// Look up the opcode for a raw opcode byte.
            pub const fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Textual mnemonic, e.g. `add-int/lit8`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Binary layout used by this opcode.
            pub const fn format(self) -> Format {
                match self {
                    $(Self::$variant => Format::$format,)*
                }
            }

            /// Kind of item referenced by the index operand, if any.
            pub const fn reference_type(self) -> ReferenceType {
                match self {
                    $(Self::$variant => ReferenceType::$reference,)*
                }
            }

            pub const fn flags(self) -> OpcodeFlags {
                match self {
                    $(Self::$variant => $flags,)*
                }
            }

            /// Every defined opcode, in ascending value order.
            pub const ALL: &'static [Opcode] = &[$(Self::$variant,)*];
        }
    };
}

opcodes! {
    0x00 => Nop, "nop", Format10x, None, N;
    0x01 => Move, "move", Format12x, None, N;
    0x02 => MoveFrom16, "move/from16", Format22x, None, N;
    0x03 => Move16, "move/16", Format32x, None, N;
    0x04 => MoveWide, "move-wide", Format12x, None, N;
    0x05 => MoveWideFrom16, "move-wide/from16", Format22x, None, N;
    0x06 => MoveWide16, "move-wide/16", Format32x, None, N;
    0x07 => MoveObject, "move-object", Format12x, None, N;
    0x08 => MoveObjectFrom16, "move-object/from16", Format22x, None, N;
    0x09 => MoveObject16, "move-object/16", Format32x, None, N;
    0x0a => MoveResult, "move-result", Format11x, None, N;
    0x0b => MoveResultWide, "move-result-wide", Format11x, None, N;
    0x0c => MoveResultObject, "move-result-object", Format11x, None, N;
    0x0d => MoveException, "move-exception", Format11x, None, N;
    0x0e => ReturnVoid, "return-void", Format10x, None, N;
    0x0f => Return, "return", Format11x, None, N;
    0x10 => ReturnWide, "return-wide", Format11x, None, N;
    0x11 => ReturnObject, "return-object", Format11x, None, N;
    0x12 => Const4, "const/4", Format11n, None, N;
    0x13 => Const16, "const/16", Format21s, None, N;
    0x14 => Const, "const", Format31i, None, N;
    0x15 => ConstHigh16, "const/high16", Format21h, None, N;
    0x16 => ConstWide16, "const-wide/16", Format21s, None, WL;
    0x17 => ConstWide32, "const-wide/32", Format31i, None, WL;
    0x18 => ConstWide, "const-wide", Format51l, None, WL;
    0x19 => ConstWideHigh16, "const-wide/high16", Format21h, None, WL;
    0x1a => ConstString, "const-string", Format21c, String, N;
    0x1b => ConstStringJumbo, "const-string/jumbo", Format31c, String, N;
    0x1c => ConstClass, "const-class", Format21c, Type, N;
    0x1d => MonitorEnter, "monitor-enter", Format11x, None, N;
    0x1e => MonitorExit, "monitor-exit", Format11x, None, N;
    0x1f => CheckCast, "check-cast", Format21c, Type, N;
    0x20 => InstanceOf, "instance-of", Format22c, Type, N;
    0x21 => ArrayLength, "array-length", Format12x, None, N;
    0x22 => NewInstance, "new-instance", Format21c, Type, N;
    0x23 => NewArray, "new-array", Format22c, Type, N;
    0x24 => FilledNewArray, "filled-new-array", Format35c, Type, N;
    0x25 => FilledNewArrayRange, "filled-new-array/range", Format3rc, Type, N;
    0x26 => FillArrayData, "fill-array-data", Format31t, None, AD;
    0x27 => Throw, "throw", Format11x, None, N;
    0x28 => Goto, "goto", Format10t, None, BR;
    0x29 => Goto16, "goto/16", Format20t, None, BR;
    0x2a => Goto32, "goto/32", Format30t, None, BR;
    0x2b => PackedSwitch, "packed-switch", Format31t, None, SW;
    0x2c => SparseSwitch, "sparse-switch", Format31t, None, SW;
    0x2d => CmplFloat, "cmpl-float", Format23x, None, N;
    0x2e => CmpgFloat, "cmpg-float", Format23x, None, N;
    0x2f => CmplDouble, "cmpl-double", Format23x, None, N;
    0x30 => CmpgDouble, "cmpg-double", Format23x, None, N;
    0x31 => CmpLong, "cmp-long", Format23x, None, N;
    0x32 => IfEq, "if-eq", Format22t, None, BR;
    0x33 => IfNe, "if-ne", Format22t, None, BR;
    0x34 => IfLt, "if-lt", Format22t, None, BR;
    0x35 => IfGe, "if-ge", Format22t, None, BR;
    0x36 => IfGt, "if-gt", Format22t, None, BR;
    0x37 => IfLe, "if-le", Format22t, None, BR;
    0x38 => IfEqz, "if-eqz", Format21t, None, BR;
    0x39 => IfNez, "if-nez", Format21t, None, BR;
    0x3a => IfLtz, "if-ltz", Format21t, None, BR;
    0x3b => IfGez, "if-gez", Format21t, None, BR;
    0x3c => IfGtz, "if-gtz", Format21t, None, BR;
    0x3d => IfLez, "if-lez", Format21t, None, BR;
    0x44 => Aget, "aget", Format23x, None, N;
    0x45 => AgetWide, "aget-wide", Format23x, None, N;
    0x46 => AgetObject, "aget-object", Format23x, None, N;
    0x47 => AgetBoolean, "aget-boolean", Format23x, None, N;
    0x48 => AgetByte, "aget-byte", Format23x, None, N;
    0x49 => AgetChar, "aget-char", Format23x, None, N;
    0x4a => AgetShort, "aget-short", Format23x, None, N;
    0x4b => Aput, "aput", Format23x, None, N;
    0x4c => AputWide, "aput-wide", Format23x, None, N;
    0x4d => AputObject, "aput-object", Format23x, None, N;
    0x4e => AputBoolean, "aput-boolean", Format23x, None, N;
    0x4f => AputByte, "aput-byte", Format23x, None, N;
    0x50 => AputChar, "aput-char", Format23x, None, N;
    0x51 => AputShort, "aput-short", Format23x, None, N;
    0x52 => Iget, "iget", Format22c, Field, N;
    0x53 => IgetWide, "iget-wide", Format22c, Field, N;
    0x54 => IgetObject, "iget-object", Format22c, Field, N;
    0x55 => IgetBoolean, "iget-boolean", Format22c, Field, N;
    0x56 => IgetByte, "iget-byte", Format22c, Field, N;
    0x57 => IgetChar, "iget-char", Format22c, Field, N;
    0x58 => IgetShort, "iget-short", Format22c, Field, N;
    0x59 => Iput, "iput", Format22c, Field, N;
    0x5a => IputWide, "iput-wide", Format22c, Field, N;
    0x5b => IputObject, "iput-object", Format22c, Field, N;
    0x5c => IputBoolean, "iput-boolean", Format22c, Field, N;
    0x5d => IputByte, "iput-byte", Format22c, Field, N;
    0x5e => IputChar, "iput-char", Format22c, Field, N;
    0x5f => IputShort, "iput-short", Format22c, Field, N;
    0x60 => Sget, "sget", Format21c, Field, N;
    0x61 => SgetWide, "sget-wide", Format21c, Field, N;
    0x62 => SgetObject, "sget-object", Format21c, Field, N;
    0x63 => SgetBoolean, "sget-boolean", Format21c, Field, N;
    0x64 => SgetByte, "sget-byte", Format21c, Field, N;
    0x65 => SgetChar, "sget-char", Format21c, Field, N;
    0x66 => SgetShort, "sget-short", Format21c, Field, N;
    0x67 => Sput, "sput", Format21c, Field, SS;
    0x68 => SputWide, "sput-wide", Format21c, Field, SS;
    0x69 => SputObject, "sput-object", Format21c, Field, SS;
    0x6a => SputBoolean, "sput-boolean", Format21c, Field, SS;
    0x6b => SputByte, "sput-byte", Format21c, Field, SS;
    0x6c => SputChar, "sput-char", Format21c, Field, SS;
    0x6d => SputShort, "sput-short", Format21c, Field, SS;
    0x6e => InvokeVirtual, "invoke-virtual", Format35c, Method, N;
    0x6f => InvokeSuper, "invoke-super", Format35c, Method, N;
    0x70 => InvokeDirect, "invoke-direct", Format35c, Method, N;
    0x71 => InvokeStatic, "invoke-static", Format35c, Method, N;
    0x72 => InvokeInterface, "invoke-interface", Format35c, Method, N;
    0x74 => InvokeVirtualRange, "invoke-virtual/range", Format3rc, Method, N;
    0x75 => InvokeSuperRange, "invoke-super/range", Format3rc, Method, N;
    0x76 => InvokeDirectRange, "invoke-direct/range", Format3rc, Method, N;
    0x77 => InvokeStaticRange, "invoke-static/range", Format3rc, Method, N;
    0x78 => InvokeInterfaceRange, "invoke-interface/range", Format3rc, Method, N;
    0x7b => NegInt, "neg-int", Format12x, None, N;
    0x7c => NotInt, "not-int", Format12x, None, N;
    0x7d => NegLong, "neg-long", Format12x, None, N;
    0x7e => NotLong, "not-long", Format12x, None, N;
    0x7f => NegFloat, "neg-float", Format12x, None, N;
    0x80 => NegDouble, "neg-double", Format12x, None, N;
    0x81 => IntToLong, "int-to-long", Format12x, None, N;
    0x82 => IntToFloat, "int-to-float", Format12x, None, N;
    0x83 => IntToDouble, "int-to-double", Format12x, None, N;
    0x84 => LongToInt, "long-to-int", Format12x, None, N;
    0x85 => LongToFloat, "long-to-float", Format12x, None, N;
    0x86 => LongToDouble, "long-to-double", Format12x, None, N;
    0x87 => FloatToInt, "float-to-int", Format12x, None, N;
    0x88 => FloatToLong, "float-to-long", Format12x, None, N;
    0x89 => FloatToDouble, "float-to-double", Format12x, None, N;
    0x8a => DoubleToInt, "double-to-int", Format12x, None, N;
    0x8b => DoubleToLong, "double-to-long", Format12x, None, N;
    0x8c => DoubleToFloat, "double-to-float", Format12x, None, N;
    0x8d => IntToByte, "int-to-byte", Format12x, None, N;
    0x8e => IntToChar, "int-to-char", Format12x, None, N;
    0x8f => IntToShort, "int-to-short", Format12x, None, N;
    0x90 => AddInt, "add-int", Format23x, None, N;
    0x91 => SubInt, "sub-int", Format23x, None, N;
    0x92 => MulInt, "mul-int", Format23x, None, N;
    0x93 => DivInt, "div-int", Format23x, None, N;
    0x94 => RemInt, "rem-int", Format23x, None, N;
    0x95 => AndInt, "and-int", Format23x, None, N;
    0x96 => OrInt, "or-int", Format23x, None, N;
    0x97 => XorInt, "xor-int", Format23x, None, N;
    0x98 => ShlInt, "shl-int", Format23x, None, N;
    0x99 => ShrInt, "shr-int", Format23x, None, N;
    0x9a => UshrInt, "ushr-int", Format23x, None, N;
    0x9b => AddLong, "add-long", Format23x, None, N;
    0x9c => SubLong, "sub-long", Format23x, None, N;
    0x9d => MulLong, "mul-long", Format23x, None, N;
    0x9e => DivLong, "div-long", Format23x, None, N;
    0x9f => RemLong, "rem-long", Format23x, None, N;
    0xa0 => AndLong, "and-long", Format23x, None, N;
    0xa1 => OrLong, "or-long", Format23x, None, N;
    0xa2 => XorLong, "xor-long", Format23x, None, N;
    0xa3 => ShlLong, "shl-long", Format23x, None, N;
    0xa4 => ShrLong, "shr-long", Format23x, None, N;
    0xa5 => UshrLong, "ushr-long", Format23x, None, N;
    0xa6 => AddFloat, "add-float", Format23x, None, N;
    0xa7 => SubFloat, "sub-float", Format23x, None, N;
    0xa8 => MulFloat, "mul-float", Format23x, None, N;
    0xa9 => DivFloat, "div-float", Format23x, None, N;
    0xaa => RemFloat, "rem-float", Format23x, None, N;
    0xab => AddDouble, "add-double", Format23x, None, N;
    0xac => SubDouble, "sub-double", Format23x, None, N;
    0xad => MulDouble, "mul-double", Format23x, None, N;
    0xae => DivDouble, "div-double", Format23x, None, N;
    0xaf => RemDouble, "rem-double", Format23x, None, N;
    0xb0 => AddInt2addr, "add-int/2addr", Format12x, None, N;
    0xb1 => SubInt2addr, "sub-int/2addr", Format12x, None, N;
    0xb2 => MulInt2addr, "mul-int/2addr", Format12x, None, N;
    0xb3 => DivInt2addr, "div-int/2addr", Format12x, None, N;
    0xb4 => RemInt2addr, "rem-int/2addr", Format12x, None, N;
    0xb5 => AndInt2addr, "and-int/2addr", Format12x, None, N;
    0xb6 => OrInt2addr, "or-int/2addr", Format12x, None, N;
    0xb7 => XorInt2addr, "xor-int/2addr", Format12x, None, N;
    0xb8 => ShlInt2addr, "shl-int/2addr", Format12x, None, N;
    0xb9 => ShrInt2addr, "shr-int/2addr", Format12x, None, N;
    0xba => UshrInt2addr, "ushr-int/2addr", Format12x, None, N;
    0xbb => AddLong2addr, "add-long/2addr", Format12x, None, N;
    0xbc => SubLong2addr, "sub-long/2addr", Format12x, None, N;
    0xbd => MulLong2addr, "mul-long/2addr", Format12x, None, N;
    0xbe => DivLong2addr, "div-long/2addr", Format12x, None, N;
    0xbf => RemLong2addr, "rem-long/2addr", Format12x, None, N;
    0xc0 => AndLong2addr, "and-long/2addr", Format12x, None, N;
    0xc1 => OrLong2addr, "or-long/2addr", Format12x, None, N;
    0xc2 => XorLong2addr, "xor-long/2addr", Format12x, None, N;
    0xc3 => ShlLong2addr, "shl-long/2addr", Format12x, None, N;
    0xc4 => ShrLong2addr, "shr-long/2addr", Format12x, None, N;
    0xc5 => UshrLong2addr, "ushr-long/2addr", Format12x, None, N;
    0xc6 => AddFloat2addr, "add-float/2addr", Format12x, None, N;
    0xc7 => SubFloat2addr, "sub-float/2addr", Format12x, None, N;
    0xc8 => MulFloat2addr, "mul-float/2addr", Format12x, None, N;
    0xc9 => DivFloat2addr, "div-float/2addr", Format12x, None, N;
    0xca => RemFloat2addr, "rem-float/2addr", Format12x, None, N;
    0xcb => AddDouble2addr, "add-double/2addr", Format12x, None, N;
    0xcc => SubDouble2addr, "sub-double/2addr", Format12x, None, N;
    0xcd => MulDouble2addr, "mul-double/2addr", Format12x, None, N;
    0xce => DivDouble2addr, "div-double/2addr", Format12x, None, N;
    0xcf => RemDouble2addr, "rem-double/2addr", Format12x, None, N;
    0xd0 => AddIntLit16, "add-int/lit16", Format22s, None, N;
    0xd1 => RsubInt, "rsub-int", Format22s, None, N;
    0xd2 => MulIntLit16, "mul-int/lit16", Format22s, None, N;
    0xd3 => DivIntLit16, "div-int/lit16", Format22s, None, N;
    0xd4 => RemIntLit16, "rem-int/lit16", Format22s, None, N;
    0xd5 => AndIntLit16, "and-int/lit16", Format22s, None, N;
    0xd6 => OrIntLit16, "or-int/lit16", Format22s, None, N;
    0xd7 => XorIntLit16, "xor-int/lit16", Format22s, None, N;
    0xd8 => AddIntLit8, "add-int/lit8", Format22b, None, N;
    0xd9 => RsubIntLit8, "rsub-int/lit8", Format22b, None, N;
    0xda => MulIntLit8, "mul-int/lit8", Format22b, None, N;
    0xdb => DivIntLit8, "div-int/lit8", Format22b, None, N;
    0xdc => RemIntLit8, "rem-int/lit8", Format22b, None, N;
    0xdd => AndIntLit8, "and-int/lit8", Format22b, None, N;
    0xde => OrIntLit8, "or-int/lit8", Format22b, None, N;
    0xdf => XorIntLit8, "xor-int/lit8", Format22b, None, N;
    0xe0 => ShlIntLit8, "shl-int/lit8", Format22b, None, N;
    0xe1 => ShrIntLit8, "shr-int/lit8", Format22b, None, N;
    0xe2 => UshrIntLit8, "ushr-int/lit8", Format22b, None, N;
}

impl Opcode {
    /// Raw opcode byte.
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// True for the `sput` family (int/boolean/byte/char/object/short/wide).
    #[inline]
    pub const fn is_static_field_store(self) -> bool {
        self.flags().contains(OpcodeFlags::STATIC_FIELD_STORE)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
