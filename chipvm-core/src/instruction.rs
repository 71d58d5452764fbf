use std::fmt;

/// A raw 16-bit instruction word as fetched from memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn from_bytes(byte_a: u8, byte_b: u8) -> Self {
        Self(u16::from_be_bytes([byte_a, byte_b]))
    }

    pub fn family(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,
    Return,
    Jump { address: u16 },
    Call { address: u16 },
    SkipEqImmediate { x: u8, value: u8 },
    SkipNeImmediate { x: u8, value: u8 },
    SkipEqRegister { x: u8, y: u8 },
    SetImmediate { x: u8, value: u8 },
    AddImmediate { x: u8, value: u8 },
    SetRegister { x: u8, y: u8 },
    Or { x: u8, y: u8 },
    And { x: u8, y: u8 },
    Xor { x: u8, y: u8 },
    AddRegister { x: u8, y: u8 },
    Sub { x: u8, y: u8 },
    ShiftRight { x: u8 },
    SubN { x: u8, y: u8 },
    ShiftLeft { x: u8 },
    SkipNeRegister { x: u8, y: u8 },
    SetIndex { address: u16 },
    JumpOffset { address: u16 },
    Random { x: u8, mask: u8 },
    Draw { x: u8, y: u8, height: u8 },
    SkipKeyPressed { x: u8 },
    SkipKeyNotPressed { x: u8 },
    GetDelay { x: u8 },
    WaitKey { x: u8 },
    SetDelay { x: u8 },
    SetSound { x: u8 },
    AddIndex { x: u8 },
    SpriteAddress { x: u8 },
    Bcd { x: u8 },
    StoreRegisters { x: u8 },
    LoadRegisters { x: u8 },
    /// Anything outside the base instruction set, including `0nnn`.
    Unknown(Opcode),
}

impl Instruction {
    /// Decoding is total: every word maps to some instruction.
    pub fn decode(opcode: Opcode) -> Self {
        use Instruction::*;

        let x = opcode.x();
        let y = opcode.y();
        let value = opcode.kk();
        let address = opcode.nnn();

        match [opcode.family(), x, y, opcode.n()] {
            // family 0 is keyed on the low byte alone
            [0x0, _, 0xE, 0x0] => ClearScreen,
            [0x0, _, 0xE, 0xE] => Return,
            [0x1, _, _, _] => Jump { address },
            [0x2, _, _, _] => Call { address },
            [0x3, _, _, _] => SkipEqImmediate { x, value },
            [0x4, _, _, _] => SkipNeImmediate { x, value },
            [0x5, _, _, _] => SkipEqRegister { x, y },
            [0x6, _, _, _] => SetImmediate { x, value },
            [0x7, _, _, _] => AddImmediate { x, value },
            [0x8, _, _, 0x0] => SetRegister { x, y },
            [0x8, _, _, 0x1] => Or { x, y },
            [0x8, _, _, 0x2] => And { x, y },
            [0x8, _, _, 0x3] => Xor { x, y },
            [0x8, _, _, 0x4] => AddRegister { x, y },
            [0x8, _, _, 0x5] => Sub { x, y },
            [0x8, _, _, 0x6] => ShiftRight { x },
            [0x8, _, _, 0x7] => SubN { x, y },
            [0x8, _, _, 0xE] => ShiftLeft { x },
            [0x9, _, _, _] => SkipNeRegister { x, y },
            [0xA, _, _, _] => SetIndex { address },
            [0xB, _, _, _] => JumpOffset { address },
            [0xC, _, _, _] => Random { x, mask: value },
            [0xD, _, _, height] => Draw { x, y, height },
            [0xE, _, 0x9, 0xE] => SkipKeyPressed { x },
            [0xE, _, 0xA, 0x1] => SkipKeyNotPressed { x },
            [0xF, _, 0x0, 0x7] => GetDelay { x },
            [0xF, _, 0x0, 0xA] => WaitKey { x },
            [0xF, _, 0x1, 0x5] => SetDelay { x },
            [0xF, _, 0x1, 0x8] => SetSound { x },
            [0xF, _, 0x1, 0xE] => AddIndex { x },
            [0xF, _, 0x2, 0x9] => SpriteAddress { x },
            [0xF, _, 0x3, 0x3] => Bcd { x },
            [0xF, _, 0x5, 0x5] => StoreRegisters { x },
            [0xF, _, 0x6, 0x5] => LoadRegisters { x },
            _ => Unknown(opcode),
        }
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Self::decode(Opcode(word))
    }
}

// Conventional assembler mnemonics, used in log output.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { address } => write!(f, "JP {address:#05X}"),
            Call { address } => write!(f, "CALL {address:#05X}"),
            SkipEqImmediate { x, value } => write!(f, "SE V{x:X}, {value:#04X}"),
            SkipNeImmediate { x, value } => write!(f, "SNE V{x:X}, {value:#04X}"),
            SkipEqRegister { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            SetImmediate { x, value } => write!(f, "LD V{x:X}, {value:#04X}"),
            AddImmediate { x, value } => write!(f, "ADD V{x:X}, {value:#04X}"),
            SetRegister { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            AddRegister { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Sub { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            ShiftRight { x } => write!(f, "SHR V{x:X}"),
            SubN { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            ShiftLeft { x } => write!(f, "SHL V{x:X}"),
            SkipNeRegister { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            SetIndex { address } => write!(f, "LD I, {address:#05X}"),
            JumpOffset { address } => write!(f, "JP V0, {address:#05X}"),
            Random { x, mask } => write!(f, "RND V{x:X}, {mask:#04X}"),
            Draw { x, y, height } => write!(f, "DRW V{x:X}, V{y:X}, {height}"),
            SkipKeyPressed { x } => write!(f, "SKP V{x:X}"),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{x:X}"),
            GetDelay { x } => write!(f, "LD V{x:X}, DT"),
            WaitKey { x } => write!(f, "LD V{x:X}, K"),
            SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            SetSound { x } => write!(f, "LD ST, V{x:X}"),
            AddIndex { x } => write!(f, "ADD I, V{x:X}"),
            SpriteAddress { x } => write!(f, "LD F, V{x:X}"),
            Bcd { x } => write!(f, "LD B, V{x:X}"),
            StoreRegisters { x } => write!(f, "LD [I], V{x:X}"),
            LoadRegisters { x } => write!(f, "LD V{x:X}, [I]"),
            Unknown(opcode) => write!(f, "DW {opcode}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn opcode_fields() {
        let opcode = Opcode::from_bytes(0xD1, 0x2F);

        assert_eq!(opcode, Opcode(0xD12F));
        assert_eq!(opcode.family(), 0xD);
        assert_eq!(opcode.x(), 0x1);
        assert_eq!(opcode.y(), 0x2);
        assert_eq!(opcode.kk(), 0x2F);
        assert_eq!(opcode.n(), 0xF);
        assert_eq!(opcode.nnn(), 0x12F);
    }

    #[test]
    fn decodes_every_base_instruction() {
        let cases = [
            (0x00E0, ClearScreen),
            (0x00EE, Return),
            (0x1ABC, Jump { address: 0xABC }),
            (0x2ABC, Call { address: 0xABC }),
            (0x3A12, SkipEqImmediate { x: 0xA, value: 0x12 }),
            (0x4A12, SkipNeImmediate { x: 0xA, value: 0x12 }),
            (0x5AB0, SkipEqRegister { x: 0xA, y: 0xB }),
            (0x6A12, SetImmediate { x: 0xA, value: 0x12 }),
            (0x7A12, AddImmediate { x: 0xA, value: 0x12 }),
            (0x8AB0, SetRegister { x: 0xA, y: 0xB }),
            (0x8AB1, Or { x: 0xA, y: 0xB }),
            (0x8AB2, And { x: 0xA, y: 0xB }),
            (0x8AB3, Xor { x: 0xA, y: 0xB }),
            (0x8AB4, AddRegister { x: 0xA, y: 0xB }),
            (0x8AB5, Sub { x: 0xA, y: 0xB }),
            (0x8AB6, ShiftRight { x: 0xA }),
            (0x8AB7, SubN { x: 0xA, y: 0xB }),
            (0x8ABE, ShiftLeft { x: 0xA }),
            (0x9AB0, SkipNeRegister { x: 0xA, y: 0xB }),
            (0xAABC, SetIndex { address: 0xABC }),
            (0xBABC, JumpOffset { address: 0xABC }),
            (0xCA0F, Random { x: 0xA, mask: 0x0F }),
            (0xDAB5, Draw { x: 0xA, y: 0xB, height: 5 }),
            (0xEA9E, SkipKeyPressed { x: 0xA }),
            (0xEAA1, SkipKeyNotPressed { x: 0xA }),
            (0xFA07, GetDelay { x: 0xA }),
            (0xFA0A, WaitKey { x: 0xA }),
            (0xFA15, SetDelay { x: 0xA }),
            (0xFA18, SetSound { x: 0xA }),
            (0xFA1E, AddIndex { x: 0xA }),
            (0xFA29, SpriteAddress { x: 0xA }),
            (0xFA33, Bcd { x: 0xA }),
            (0xFA55, StoreRegisters { x: 0xA }),
            (0xFA65, LoadRegisters { x: 0xA }),
        ];

        for (word, expected) in cases {
            assert_eq!(Instruction::from(word), expected, "decoding {word:04X}");
        }
    }

    #[test]
    fn unassigned_words_are_unknown() {
        for word in [0x0000, 0x0123, 0x00E1, 0x8AB8, 0x8ABF, 0xEA00, 0xFA00, 0xFAFF] {
            assert_eq!(Instruction::from(word), Unknown(Opcode(word)));
        }
    }

    #[test]
    fn screen_and_return_ignore_x() {
        assert_eq!(Instruction::from(0x01E0), ClearScreen);
        assert_eq!(Instruction::from(0x0FEE), Return);
        assert_eq!(Instruction::from(0x0AE1), Unknown(Opcode(0x0AE1)));
    }

    #[test]
    fn register_skips_ignore_low_nibble() {
        assert_eq!(Instruction::from(0x5AB3), SkipEqRegister { x: 0xA, y: 0xB });
        assert_eq!(Instruction::from(0x9AB7), SkipNeRegister { x: 0xA, y: 0xB });
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Instruction::from(0x00E0).to_string(), "CLS");
        assert_eq!(Instruction::from(0x6A2B).to_string(), "LD VA, 0x2B");
        assert_eq!(Instruction::from(0xD125).to_string(), "DRW V1, V2, 5");
        assert_eq!(Instruction::from(0x2345).to_string(), "CALL 0x345");
        assert_eq!(Instruction::from(0xF355).to_string(), "LD [I], V3");
        assert_eq!(Instruction::from(0x0123).to_string(), "DW 0123");
    }
}
