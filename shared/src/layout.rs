//! Binary layout of records the module stages in its linear memory
//!
//! All fields are little-endian and densely packed at natural alignment,
//! exactly as the module's compiler lays out the C structs:
//!
//! ```text
//! BlockDef (64 bytes)                 ArenaDef (72 bytes)
//!   0  u32     type                     0  u32     blocks pointer
//!   4  i32     id                       4  i32     block count
//!   8  f64     x                        8  f64 x4  build area x, y, w, h
//!  16  f64     y                       40  f64 x4  goal area x, y, w, h
//!  24  f64     w
//!  32  f64     h
//!  40  f64     angle
//!  48  i32 x2  joints
//!  56  u32     joint count
//!  60          padding
//! ```

use byteorder::{ByteOrder, LittleEndian};

/// Maximum number of joint references a block can carry.
pub const MAX_JOINTS: usize = 2;

/// Errors decoding a staged record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Fewer bytes than the record needs
    #[error("record needs {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Type tag outside the known block kinds
    #[error("unknown block type {0}")]
    UnknownBlockKind(u32),

    /// Joint count larger than the fixed joint array
    #[error("joint count {0} exceeds {MAX_JOINTS}")]
    TooManyJoints(u32),

    /// Negative block count in an arena record
    #[error("negative block count {0}")]
    NegativeBlockCount(i32),
}

/// Kind of a design block, in type-tag order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    StaticRect,
    StaticCircle,
    DynamicRect,
    DynamicCircle,
    GoalRect,
    GoalCircle,
    Wheel,
    ClockwiseWheel,
    CounterClockwiseWheel,
    Rod,
    SolidRod,
}

impl BlockKind {
    /// All kinds, indexed by type tag
    pub const ALL: [BlockKind; 11] = [
        BlockKind::StaticRect,
        BlockKind::StaticCircle,
        BlockKind::DynamicRect,
        BlockKind::DynamicCircle,
        BlockKind::GoalRect,
        BlockKind::GoalCircle,
        BlockKind::Wheel,
        BlockKind::ClockwiseWheel,
        BlockKind::CounterClockwiseWheel,
        BlockKind::Rod,
        BlockKind::SolidRod,
    ];

    pub fn from_u32(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Whether the block is drawn as a circle rather than a rectangle
    pub fn is_circle(self) -> bool {
        matches!(
            self,
            BlockKind::StaticCircle
                | BlockKind::DynamicCircle
                | BlockKind::GoalCircle
                | BlockKind::Wheel
                | BlockKind::ClockwiseWheel
                | BlockKind::CounterClockwiseWheel
        )
    }
}

/// Axis-aligned area given by its center and size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const SIZE: usize = 32;

    fn read(bytes: &[u8]) -> Self {
        Self {
            x: LittleEndian::read_f64(&bytes[0..8]),
            y: LittleEndian::read_f64(&bytes[8..16]),
            w: LittleEndian::read_f64(&bytes[16..24]),
            h: LittleEndian::read_f64(&bytes[24..32]),
        }
    }

    fn write(&self, out: &mut [u8]) {
        LittleEndian::write_f64(&mut out[0..8], self.x);
        LittleEndian::write_f64(&mut out[8..16], self.y);
        LittleEndian::write_f64(&mut out[16..24], self.w);
        LittleEndian::write_f64(&mut out[24..32], self.h);
    }

    /// Left edge
    pub fn left(&self) -> f64 {
        self.x - self.w / 2.0
    }

    /// Bottom edge (y grows upward in design space)
    pub fn bottom(&self) -> f64 {
        self.y - self.h / 2.0
    }
}

/// One block of a staged design
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockDef {
    pub kind: BlockKind,
    pub id: i32,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub angle: f64,
    pub joints: [i32; MAX_JOINTS],
    pub joint_count: u32,
}

impl BlockDef {
    pub const SIZE: usize = 64;

    pub fn decode(bytes: &[u8]) -> Result<Self, LayoutError> {
        check_len(bytes, Self::SIZE)?;
        let tag = LittleEndian::read_u32(&bytes[0..4]);
        let kind = BlockKind::from_u32(tag).ok_or(LayoutError::UnknownBlockKind(tag))?;
        let joint_count = LittleEndian::read_u32(&bytes[56..60]);
        if joint_count as usize > MAX_JOINTS {
            return Err(LayoutError::TooManyJoints(joint_count));
        }
        Ok(Self {
            kind,
            id: LittleEndian::read_i32(&bytes[4..8]),
            x: LittleEndian::read_f64(&bytes[8..16]),
            y: LittleEndian::read_f64(&bytes[16..24]),
            w: LittleEndian::read_f64(&bytes[24..32]),
            h: LittleEndian::read_f64(&bytes[32..40]),
            angle: LittleEndian::read_f64(&bytes[40..48]),
            joints: [
                LittleEndian::read_i32(&bytes[48..52]),
                LittleEndian::read_i32(&bytes[52..56]),
            ],
            joint_count,
        })
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        LittleEndian::write_u32(&mut out[0..4], self.kind.tag());
        LittleEndian::write_i32(&mut out[4..8], self.id);
        LittleEndian::write_f64(&mut out[8..16], self.x);
        LittleEndian::write_f64(&mut out[16..24], self.y);
        LittleEndian::write_f64(&mut out[24..32], self.w);
        LittleEndian::write_f64(&mut out[32..40], self.h);
        LittleEndian::write_f64(&mut out[40..48], self.angle);
        LittleEndian::write_i32(&mut out[48..52], self.joints[0]);
        LittleEndian::write_i32(&mut out[52..56], self.joints[1]);
        LittleEndian::write_u32(&mut out[56..60], self.joint_count);
        out
    }

    /// Joint references actually in use
    pub fn joints(&self) -> &[i32] {
        &self.joints[..self.joint_count as usize]
    }
}

/// Header describing a staged design
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaDef {
    pub blocks_ptr: u32,
    pub block_count: u32,
    pub build: Rect,
    pub goal: Rect,
}

impl ArenaDef {
    pub const SIZE: usize = 72;

    pub fn decode(bytes: &[u8]) -> Result<Self, LayoutError> {
        check_len(bytes, Self::SIZE)?;
        let block_count = LittleEndian::read_i32(&bytes[4..8]);
        if block_count < 0 {
            return Err(LayoutError::NegativeBlockCount(block_count));
        }
        Ok(Self {
            blocks_ptr: LittleEndian::read_u32(&bytes[0..4]),
            block_count: block_count as u32,
            build: Rect::read(&bytes[8..40]),
            goal: Rect::read(&bytes[40..72]),
        })
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        LittleEndian::write_u32(&mut out[0..4], self.blocks_ptr);
        LittleEndian::write_u32(&mut out[4..8], self.block_count);
        self.build.write(&mut out[8..40]);
        self.goal.write(&mut out[40..72]);
        out
    }

    /// Byte length of the block array this header points at
    pub fn blocks_len(&self) -> u64 {
        self.block_count as u64 * BlockDef::SIZE as u64
    }
}

fn check_len(bytes: &[u8], expected: usize) -> Result<(), LayoutError> {
    if bytes.len() < expected {
        return Err(LayoutError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}
