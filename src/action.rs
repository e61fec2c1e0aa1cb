//! Encoding of the 32-bit actions that make up a PHY patch program.

use std::fmt;

/// Size of one action in the firmware blob.
pub const ACTION_SIZE: usize = core::mem::size_of::<u32>();

const OPCODE_SHIFT: u32 = 28;
const REGNO_SHIFT: u32 = 16;
const REGNO_MASK: u32 = 0x0fff_0000;
const DATA_MASK: u32 = 0x0000_ffff;

macro_rules! opcodes {
    { $( $(#[$meta:meta])* $name:ident = $value:literal => $mnemonic:literal, )+ } => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum OpCode {
            $( $(#[$meta])* $name = $value, )+
        }

        impl OpCode {
            pub const ALL: &'static [OpCode] = &[ $( Self::$name, )+ ];

            pub fn from_bits(bits: u8) -> Option<OpCode> {
                match bits {
                    $( $value => Some(Self::$name), )+
                    _ => None
                }
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $( Self::$name => $mnemonic, )+
                }
            }
        }
    };
}

opcodes! {
    /// `predata = read(regno)`, and bump the read count.
    PhyRead             = 0x0 => "read",
    PhyDataOr           = 0x1 => "or",
    PhyDataAnd          = 0x2 => "and",
    /// Jump back by `regno` actions.
    PhyBjmpn            = 0x3 => "bjmpn",
    /// Select the bus used by reads and writes: `0` for the PHY, `1` for the MAC MCU.
    PhyMdioChg          = 0x4 => "mdio_chg",
    PhyClearReadCount   = 0x7 => "clear_readcount",
    PhyWrite            = 0x8 => "write",
    /// Skip one action if the read count equals `data`.
    PhyReadcountEqSkip  = 0x9 => "readcount_eq_skip",
    PhyCompEqSkipn      = 0xa => "comp_eq_skipn",
    PhyCompNeqSkipn     = 0xb => "comp_neq_skipn",
    PhyWritePrevious    = 0xc => "write_previous",
    PhySkipn            = 0xd => "skipn",
    PhyDelayMs          = 0xe => "delay_ms",
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action(u32);

impl Action {
    /// Bits of `regno` above the 12-bit field are dropped.
    pub fn new(opcode: OpCode, regno: u16, data: u16) -> Action {
        Action((opcode as u32) << OPCODE_SHIFT |
               ((regno as u32) << REGNO_SHIFT) & REGNO_MASK |
               data as u32)
    }

    pub fn from_bits(bits: u32) -> Action {
        Action(bits)
    }

    pub fn from_le_bytes(bytes: [u8; ACTION_SIZE]) -> Action {
        Action(u32::from_le_bytes(bytes))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn to_le_bytes(self) -> [u8; ACTION_SIZE] {
        self.0.to_le_bytes()
    }

    pub fn opcode(self) -> Option<OpCode> {
        OpCode::from_bits((self.0 >> OPCODE_SHIFT) as u8)
    }

    pub fn regno(self) -> u16 {
        ((self.0 & REGNO_MASK) >> REGNO_SHIFT) as u16
    }

    pub fn data(self) -> u16 {
        (self.0 & DATA_MASK) as u16
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Action({:#010x}: {})", self.0, self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (regno, data) = (self.regno(), self.data());
        let Some(opcode) = self.opcode() else {
            return write!(f, ".word {:#010x}", self.0)
        };
        let mnemonic = opcode.mnemonic();
        match opcode {
            OpCode::PhyRead | OpCode::PhyWritePrevious =>
                write!(f, "{} {:#04x}", mnemonic, regno),
            OpCode::PhyDataOr | OpCode::PhyDataAnd =>
                write!(f, "{} {:#06x}", mnemonic, data),
            OpCode::PhyBjmpn | OpCode::PhySkipn =>
                write!(f, "{} {}", mnemonic, regno),
            OpCode::PhyMdioChg =>
                write!(f, "{} {}", mnemonic, if data != 0 { "mac_mcu" } else { "phy" }),
            OpCode::PhyClearReadCount =>
                write!(f, "{}", mnemonic),
            OpCode::PhyWrite =>
                write!(f, "{} {:#04x}, {:#06x}", mnemonic, regno, data),
            OpCode::PhyReadcountEqSkip | OpCode::PhyDelayMs =>
                write!(f, "{} {}", mnemonic, data),
            OpCode::PhyCompEqSkipn | OpCode::PhyCompNeqSkipn =>
                write!(f, "{} {:#06x}, {}", mnemonic, data, regno),
        }
    }
}
